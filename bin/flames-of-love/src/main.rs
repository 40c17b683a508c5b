//! # Flames of Love Binary
//!
//! Loads settings, assembles the plugins behind the core ports, and serves
//! the site. `flames-of-love hash-password <password>` prints a PHC string
//! for the `auth.editor_password_hash` setting.

use std::sync::Arc;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use configs::{LogSettings, Settings};
use fol_api::middleware::{cors_policy, request_logger, session_middleware};
use fol_api::{configure_routes, AppState};
use fol_auth_simple::SimpleAuthProvider;
use fol_core::services::{AnnouncementService, ArticleService, ResourceService, SubscriberService};
use fol_db_sqlite::SqliteStore;
use fol_mail_sendgrid::{SendGridConfig, SendGridMailer};
use fol_og_scraper::ScrapingOpenGraphFetcher;
use fol_photos_unsplash::{UnsplashConfig, UnsplashPhotos};
use secrecy::ExposeSecret;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(settings: &LogSettings) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    // `init` also installs the `log` bridge, so actix's Logger lands here too.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(settings.json.then(|| fmt::layer().json()))
        .with((!settings.json).then(fmt::layer))
        .init();
}

fn session_key(settings: &Settings) -> anyhow::Result<Key> {
    let raw = settings.server.session_key.expose_secret();
    if raw.is_empty() {
        warn!("server.session_key is not set; editor sessions will not survive a restart");
        return Ok(Key::generate());
    }
    Key::try_from(raw.as_bytes()).context("server.session_key is not a usable cookie key")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("hash-password") {
        let password = args.next().context("usage: flames-of-love hash-password <password>")?;
        let hash = fol_auth_simple::hash_password(&password)
            .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
        println!("{hash}");
        return Ok(());
    }

    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.log);

    // 1. Database
    let store = Arc::new(
        SqliteStore::new(&settings.database.url)
            .await
            .with_context(|| format!("failed to open database {}", settings.database.url))?,
    );

    // 2. Outbound integrations
    if !settings.mail.is_configured() {
        warn!("mail.sendgrid_api_key is not set; announcement emails will fail and be retried");
    }
    let mailer = Arc::new(SendGridMailer::new(SendGridConfig {
        api_key: settings.mail.sendgrid_api_key.clone(),
        api_base: settings.mail.api_base.clone(),
        from_address: settings.mail.from_address.clone(),
        timeout: settings.mail.timeout(),
    })?);

    let og = Arc::new(ScrapingOpenGraphFetcher::new(
        &settings.open_graph.user_agent,
        settings.open_graph.timeout(),
    )?);

    if !settings.photos.is_configured() {
        warn!("photos.unsplash_access_key is not set; articles will use the fallback image");
    }
    let photos = Arc::new(UnsplashPhotos::new(UnsplashConfig {
        access_key: settings.photos.unsplash_access_key.clone(),
        api_base: settings.photos.api_base.clone(),
        query: settings.photos.query.clone(),
        timeout: settings.photos.timeout(),
    })?);

    // 3. Auth
    if settings.auth.editor_email.trim().is_empty() {
        warn!("auth.editor_email is not set; nobody can log in as an editor");
    }
    let auth = Arc::new(SimpleAuthProvider::new(
        &settings.auth.editor_email,
        settings.auth.editor_password_hash.clone(),
    ));

    // 4. Services
    let announcements =
        AnnouncementService::new(store.clone(), mailer, settings.fanout.max_attempts);
    let state = web::Data::new(AppState {
        articles: ArticleService::new(store.clone(), photos),
        announcements: announcements.clone(),
        resources: ResourceService::new(store.clone(), og),
        subscribers: SubscriberService::new(store),
        auth,
    });

    // 5. Outbox sweep. The first tick fires immediately, which also resumes
    // anything a previous process left unsent.
    let retry_interval = settings.fanout.retry_interval();
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(retry_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match announcements.resume_pending().await {
                Ok(reports) if !reports.is_empty() => {
                    let delivered: usize = reports.iter().map(|r| r.delivered).sum();
                    info!(announcements = reports.len(), delivered, "outbox sweep finished");
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "outbox sweep failed"),
            }
        }
    });

    let key = session_key(&settings)?;
    let cookie_secure = settings.server.cookie_secure;
    let bind = settings.bind_address();
    info!(host = %bind.0, port = bind.1, "Flames of Love starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), cookie_secure))
            .wrap(cors_policy())
            .wrap(request_logger())
            .service(Files::new("/static", "./static"))
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
