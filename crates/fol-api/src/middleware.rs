//! Middleware shared by the server binary and the HTTP tests.

use actix_cors::Cors;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::middleware::Logger;

pub const SESSION_COOKIE: &str = "__session";

/// Access log: remote-ip "request-line" status bytes duration.
pub fn request_logger() -> Logger {
    Logger::new(r#"%a "%r" %s %b %Dms"#)
}

/// Browsers send `Origin` on same-site form posts too, so POST stays allowed.
/// Credentials are never exposed cross-origin.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// Signed and encrypted cookie carrying the editor id.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}
