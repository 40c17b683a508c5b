//! Shared wiring: real SQLite store, mocked outbound ports.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use fol_core::error::{DeliveryError, FetchError};
use fol_core::models::{EditorId, NewAnnouncement, OpenGraph};
use fol_core::services::{
    AnnouncementService, ArticleService, Caller, ResourceService, SubscriberService,
};
use fol_core::traits::{MockMailer, MockOpenGraphFetcher, MockPreviewImageSource};
use fol_db_sqlite::SqliteStore;

pub const MAX_ATTEMPTS: u32 = 3;

pub struct Harness {
    pub store: Arc<SqliteStore>,
    pub articles: ArticleService,
    pub announcements: AnnouncementService,
    pub resources: ResourceService,
    pub subscribers: SubscriberService,
}

pub fn editor() -> Caller {
    Caller::editor(EditorId("editor@example.org".to_string()))
}

/// Records every recipient and succeeds.
pub fn recording_mailer(sent: Arc<Mutex<Vec<String>>>) -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send().returning(move |email| {
        sent.lock().unwrap().push(email.to.clone());
        Ok(())
    });
    mailer
}

pub fn rejecting_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send().returning(|_| {
        Err(DeliveryError::Rejected {
            status: 503,
            body: "unavailable".to_string(),
        })
    });
    mailer
}

pub fn unreachable_og() -> MockOpenGraphFetcher {
    let mut og = MockOpenGraphFetcher::new();
    og.expect_fetch()
        .returning(|_| Err(FetchError::Http("connection refused".to_string())));
    og
}

pub fn og_with_title(title: &'static str) -> MockOpenGraphFetcher {
    let mut og = MockOpenGraphFetcher::new();
    og.expect_fetch().returning(move |_| {
        Ok(OpenGraph {
            title: Some(title.to_string()),
            ..OpenGraph::default()
        })
    });
    og
}

pub fn fixed_photo() -> MockPreviewImageSource {
    let mut photos = MockPreviewImageSource::new();
    photos
        .expect_random_image_url()
        .returning(|| Ok("https://images.example/regular.jpg".to_string()));
    photos
}

pub async fn harness(
    mailer: MockMailer,
    og: MockOpenGraphFetcher,
    photos: MockPreviewImageSource,
) -> Harness {
    let store = Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap());
    Harness {
        articles: ArticleService::new(store.clone(), Arc::new(photos)),
        announcements: AnnouncementService::new(store.clone(), Arc::new(mailer), MAX_ATTEMPTS),
        resources: ResourceService::new(store.clone(), Arc::new(og)),
        subscribers: SubscriberService::new(store.clone()),
        store,
    }
}

pub fn announcement(title: &str, date: (i32, u32, u32)) -> NewAnnouncement {
    NewAnnouncement {
        title: title.to_string(),
        content: format!("{title} details"),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
    }
}
