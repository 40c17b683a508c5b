//! # fol-api Handlers
//!
//! Coordinates the flow between HTTP requests and the core services.

pub mod announcements;
pub mod articles;
pub mod pages;
pub mod resources;

use std::sync::Arc;

use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use askama::Template;
use fol_core::services::{AnnouncementService, ArticleService, ResourceService, SubscriberService};
use fol_core::traits::AuthProvider;

use crate::error::ApiResult;

/// State shared across all actix-web workers.
pub struct AppState {
    pub articles: ArticleService,
    pub announcements: AnnouncementService,
    pub resources: ResourceService,
    pub subscribers: SubscriberService,
    pub auth: Arc<dyn AuthProvider>,
}

pub(crate) fn render(status: StatusCode, template: &impl Template) -> ApiResult<HttpResponse> {
    let body = template.render()?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

/// Post/redirect/get after a successful mutation.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
