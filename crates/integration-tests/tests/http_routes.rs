//! Routes, forms and the session gate, driven through `actix_web::test`.

mod common;

use std::sync::{Arc, Mutex};

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::*;
use fol_api::middleware::{session_middleware, SESSION_COOKIE};
use fol_api::{configure_routes, AppState};
use fol_core::models::EditorId;
use fol_core::traits::MockAuthProvider;
use uuid::Uuid;

const PASSWORD: &str = "ave-maria";

async fn state() -> web::Data<AppState> {
    let h = harness(
        recording_mailer(Arc::new(Mutex::new(Vec::new()))),
        unreachable_og(),
        fixed_photo(),
    )
    .await;

    let mut auth = MockAuthProvider::new();
    auth.expect_verify_editor().returning(|email, password| {
        (email == "editor@example.org" && password == PASSWORD)
            .then(|| EditorId(email.to_string()))
    });

    web::Data::new(AppState {
        articles: h.articles,
        announcements: h.announcements,
        resources: h.resources,
        subscribers: h.subscribers,
        auth: Arc::new(auth),
    })
}

fn app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(session_middleware(Key::generate(), false))
        .configure(configure_routes)
}

fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn session_cookie(resp: &ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}

async fn body_text(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

#[actix_web::test]
async fn anonymous_deletes_are_unauthorized_for_every_content_type() {
    let app = test::init_service(app(state().await)).await;

    for kind in ["articles", "announcements", "resources"] {
        let req = test::TestRequest::post()
            .uri(&format!("/{kind}/{}/delete", Uuid::now_v7()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{kind}");
    }
}

#[actix_web::test]
async fn anonymous_create_is_unauthorized_and_hides_forms() {
    let app = test::init_service(app(state().await)).await;

    let req = test::TestRequest::post()
        .uri("/articles")
        .set_form([("title", "T"), ("body", "B"), ("category", "Marian")])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let page = body_text(
        test::call_service(&app, test::TestRequest::get().uri("/articles").to_request()).await,
    )
    .await;
    assert!(!page.contains("New article"));
}

#[actix_web::test]
async fn subscribe_form_covers_blank_new_and_duplicate() {
    let app = test::init_service(app(state().await)).await;

    let blank = test::TestRequest::post()
        .uri("/subscribe")
        .set_form([("email", "  ")])
        .to_request();
    let resp = test::call_service(&app, blank).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Email is required"));

    let first = test::TestRequest::post()
        .uri("/subscribe")
        .set_form([("email", "member@example.org")])
        .to_request();
    let resp = test::call_service(&app, first).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Thank you for subscribing"));

    let again = test::TestRequest::post()
        .uri("/subscribe")
        .set_form([("email", "member@example.org")])
        .to_request();
    let resp = test::call_service(&app, again).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(body_text(resp).await.contains("You are already subscribed."));
}

#[actix_web::test]
async fn wrong_password_is_rejected() {
    let app = test::init_service(app(state().await)).await;
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "editor@example.org"), ("password", "nope")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(resp).await.contains("Invalid email or password"));
}

#[actix_web::test]
async fn editor_session_can_create_view_and_delete_an_article() {
    let app = test::init_service(app(state().await)).await;

    let login = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "editor@example.org"), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&resp);

    // Missing title re-renders the form with the field error.
    let invalid = test::TestRequest::post()
        .uri("/articles")
        .cookie(cookie.clone())
        .set_form([("title", ""), ("body", "Body"), ("category", "Marian")])
        .to_request();
    let resp = test::call_service(&app, invalid).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let page = body_text(resp).await;
    assert!(page.contains("Title is required"));
    assert!(page.contains("New article"));

    let create = test::TestRequest::post()
        .uri("/articles")
        .cookie(cookie.clone())
        .set_form([
            ("title", "Morning Offering"),
            ("body", "O Jesus, through the Immaculate Heart of Mary"),
            ("category", "Marian"),
        ])
        .to_request();
    let resp = test::call_service(&app, create).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let article_path = location(&resp);
    assert!(article_path.starts_with("/articles/"));

    let page = body_text(
        test::call_service(&app, test::TestRequest::get().uri(&article_path).to_request()).await,
    )
    .await;
    assert!(page.contains("Morning Offering"));
    assert!(page.contains("O Jesus, through the Immaculate Heart of Mary"));

    let delete = test::TestRequest::post()
        .uri(&format!("{article_path}/delete"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, delete).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/articles");

    let gone = test::call_service(&app, test::TestRequest::get().uri(&article_path).to_request()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn editor_publishes_announcement_shown_on_home_page() {
    let app = test::init_service(app(state().await)).await;

    let login = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "editor@example.org"), ("password", PASSWORD)])
        .to_request();
    let cookie = session_cookie(&test::call_service(&app, login).await);

    let missing_date = test::TestRequest::post()
        .uri("/announcements")
        .cookie(cookie.clone())
        .set_form([("title", "Rosary Walk"), ("content", "Bring a rosary"), ("date", "")])
        .to_request();
    let resp = test::call_service(&app, missing_date).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Date is required"));

    let publish = test::TestRequest::post()
        .uri("/announcements")
        .cookie(cookie)
        .set_form([("title", "Rosary Walk"), ("content", "Bring a rosary"), ("date", "2026-05-03")])
        .to_request();
    let resp = test::call_service(&app, publish).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let home = body_text(test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await).await;
    assert!(home.contains("Rosary Walk"));
    assert!(home.contains("5/3/2026"));
}

#[actix_web::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let app = test::init_service(app(state().await)).await;

    for uri in [
        format!("/articles/{}", Uuid::now_v7()),
        format!("/resources/{}", Uuid::now_v7()),
        "/articles/not-a-uuid".to_string(),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn logout_drops_the_editor_session() {
    let app = test::init_service(app(state().await)).await;
    let login = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "editor@example.org"), ("password", PASSWORD)])
        .to_request();
    let cookie = session_cookie(&test::call_service(&app, login).await);

    let logout = test::TestRequest::post()
        .uri("/logout")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, logout).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    // The purge answers with an expired, empty session cookie.
    let cleared = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri(&format!("/resources/{}/delete", Uuid::now_v7()))
        .cookie(cleared)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
