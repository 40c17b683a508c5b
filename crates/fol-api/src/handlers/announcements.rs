use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use fol_core::error::{AppError, FieldErrors};
use fol_core::models::NewAnnouncement;
use fol_ui::{AnnouncementView, AnnouncementsTemplate, FormValues, Page};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use super::{render, see_other, AppState};
use crate::error::ApiResult;
use crate::session::SessionContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD` from an `<input type="date">`.
    pub date: String,
}

async fn list_page(
    data: &AppState,
    is_editor: bool,
    status: StatusCode,
    form: FormValues,
    errors: FieldErrors,
) -> ApiResult<HttpResponse> {
    let announcements = data.announcements.list().await?;
    render(
        status,
        &AnnouncementsTemplate {
            page: Page::new("Announcements", is_editor),
            announcements: announcements.iter().map(AnnouncementView::from).collect(),
            form,
            errors,
        },
    )
}

pub async fn list(data: web::Data<AppState>, session: SessionContext) -> ApiResult<HttpResponse> {
    list_page(
        &data,
        session.caller().is_editor(),
        StatusCode::OK,
        FormValues::default(),
        FieldErrors::new(),
    )
    .await
}

pub async fn create(
    data: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<AnnouncementForm>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    let form = form.into_inner();
    let echo = FormValues {
        title: form.title.clone(),
        content: form.content.clone(),
        date: form.date.clone(),
        ..FormValues::default()
    };

    let input = NewAnnouncement {
        title: form.title,
        content: form.content,
        date: NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").ok(),
    };

    match data.announcements.create(&caller, input).await {
        Ok(published) => {
            if !published.report.failed.is_empty() {
                warn!(
                    announcement_id = %published.announcement.id,
                    failed = published.report.failed.len(),
                    "some notifications will be retried"
                );
            }
            Ok(see_other("/announcements"))
        }
        Err(AppError::Validation(errors)) => {
            list_page(&data, caller.is_editor(), StatusCode::BAD_REQUEST, echo, errors).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    data: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    data.announcements
        .delete(&session.caller(), path.into_inner())
        .await?;
    Ok(see_other("/announcements"))
}
