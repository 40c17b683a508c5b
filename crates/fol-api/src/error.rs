//! HTTP mapping for `AppError`.
//!
//! Errors that escape a handler render the shared error page. Internal
//! failures are logged here and replaced with a generic message.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use fol_core::error::AppError;
use fol_ui::{ErrorTemplate, Page};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError(AppError::internal(format!("template rendering failed: {err}")))
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound(..) => StatusCode::NOT_FOUND,
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(err: &AppError) -> String {
    match err {
        AppError::NotFound(entity, _) => format!("{entity} not found"),
        AppError::Validation(fields) => fields.to_string(),
        AppError::Unauthorized(_) => "You must be logged in to do that.".to_string(),
        AppError::Conflict(reason) => reason.clone(),
        AppError::Internal(_) => "Something went wrong. Please try again later.".to_string(),
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if let AppError::Internal(detail) = &self.0 {
            error!(error = %detail, "request failed");
        }

        let page = ErrorTemplate {
            page: Page::new(status.canonical_reason().unwrap_or("Error"), false),
            status: status.as_u16(),
            message: public_message(&self.0),
        };
        match page.render() {
            Ok(body) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(body),
            Err(e) => {
                error!(error = %e, "error page failed to render");
                HttpResponse::build(status).body(public_message(&self.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use fol_core::error::FieldErrors;

    #[test]
    fn maps_every_variant_to_its_status() {
        let cases = [
            (AppError::not_found("Article", "x"), StatusCode::NOT_FOUND),
            (AppError::Validation(FieldErrors::new()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("login required".into()), StatusCode::UNAUTHORIZED),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AppError::internal("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[tokio::test]
    async fn internal_details_are_not_shown_to_clients() {
        let response = ApiError(AppError::internal("password=hunter2")).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("hunter2"));
        assert!(body.contains("Something went wrong"));
    }
}
