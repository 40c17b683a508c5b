//! # fol-api
//!
//! The web routing and orchestration layer for Flames of Love.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod session;

use actix_web::web;

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use session::SessionContext;

/// Registers every page and form route.
///
/// Kept free of middleware so tests can mount it behind their own session layer.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{announcements, articles, pages, resources};

    cfg.route("/", web::get().to(pages::home))
        .route("/about", web::get().to(pages::about))
        .service(
            web::resource("/subscribe")
                .route(web::get().to(pages::subscribe_form))
                .route(web::post().to(pages::subscribe)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(pages::login_form))
                .route(web::post().to(pages::login)),
        )
        .route("/logout", web::post().to(pages::logout))
        .service(
            web::resource("/articles")
                .route(web::get().to(articles::list))
                .route(web::post().to(articles::create)),
        )
        .route("/articles/{id}", web::get().to(articles::show))
        .route("/articles/{id}/delete", web::post().to(articles::delete))
        .service(
            web::resource("/announcements")
                .route(web::get().to(announcements::list))
                .route(web::post().to(announcements::create)),
        )
        .route(
            "/announcements/{id}/delete",
            web::post().to(announcements::delete),
        )
        .service(
            web::resource("/resources")
                .route(web::get().to(resources::list))
                .route(web::post().to(resources::create)),
        )
        .route("/resources/{id}", web::get().to(resources::show))
        .route("/resources/{id}/delete", web::post().to(resources::delete));
}
