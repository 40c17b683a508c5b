//! Home, about, subscription and editor login.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use fol_core::error::AppError;
use fol_ui::{AboutTemplate, AnnouncementView, IndexTemplate, LoginTemplate, Page, SubscribeTemplate};
use serde::Deserialize;
use tracing::{info, warn};

use super::{render, see_other, AppState};
use crate::error::ApiResult;
use crate::session::SessionContext;

pub async fn home(data: web::Data<AppState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    let latest = data.announcements.latest().await?;
    render(
        StatusCode::OK,
        &IndexTemplate {
            page: Page::new("Flames of Love", caller.is_editor()),
            latest: latest.as_ref().map(AnnouncementView::from),
        },
    )
}

pub async fn about(session: SessionContext) -> ApiResult<HttpResponse> {
    render(
        StatusCode::OK,
        &AboutTemplate {
            page: Page::new("About Us", session.caller().is_editor()),
        },
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

pub async fn subscribe_form(session: SessionContext) -> ApiResult<HttpResponse> {
    render(
        StatusCode::OK,
        &SubscribeTemplate {
            page: Page::new("Subscribe for Updates", session.caller().is_editor()),
            email: String::new(),
            error: None,
            subscribed: false,
        },
    )
}

pub async fn subscribe(
    data: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<SubscribeForm>,
) -> ApiResult<HttpResponse> {
    let page = Page::new("Subscribe for Updates", session.caller().is_editor());
    let email = form.into_inner().email;

    let (status, error) = match data.subscribers.subscribe(&email).await {
        Ok(_) => {
            return render(
                StatusCode::OK,
                &SubscribeTemplate {
                    page,
                    email: String::new(),
                    error: None,
                    subscribed: true,
                },
            )
        }
        Err(AppError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            errors.get("email").map(str::to_string),
        ),
        Err(AppError::Conflict(message)) => (StatusCode::CONFLICT, Some(message)),
        Err(e) => return Err(e.into()),
    };

    render(
        status,
        &SubscribeTemplate {
            page,
            email,
            error,
            subscribed: false,
        },
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.caller().is_editor() {
        return Ok(see_other("/"));
    }
    render(
        StatusCode::OK,
        &LoginTemplate {
            page: Page::new("Log in", false),
            email: String::new(),
            error: None,
        },
    )
}

pub async fn login(
    data: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm { email, password } = form.into_inner();

    if email.trim().is_empty() || password.is_empty() {
        return render(
            StatusCode::BAD_REQUEST,
            &LoginTemplate {
                page: Page::new("Log in", false),
                email,
                error: Some("Email and password are required".to_string()),
            },
        );
    }

    match data.auth.verify_editor(&email, &password).await {
        Some(editor) => {
            session.persist_editor(&editor)?;
            info!(%editor, "editor logged in");
            Ok(see_other("/"))
        }
        None => {
            warn!("failed editor login");
            render(
                StatusCode::UNAUTHORIZED,
                &LoginTemplate {
                    page: Page::new("Log in", false),
                    email,
                    error: Some("Invalid email or password".to_string()),
                },
            )
        }
    }
}

pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    see_other("/")
}
