//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{DeliveryError, FetchError, Result};
use crate::models::{
    Announcement, Article, ArticleListItem, DeliveryOutcome, EditorId, OpenGraph, OutboundEmail,
    PendingDelivery, Resource, ResourceQuery, Subscriber,
};

/// Persistence contract for articles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArticleRepo: Send + Sync {
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>>;
    /// Most recently updated first.
    async fn list_articles(&self) -> Result<Vec<ArticleListItem>>;
    async fn insert_article(&self, article: &Article) -> Result<()>;
    /// Returns `false` when no row had that id.
    async fn delete_article(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for announcements and their delivery outbox.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AnnouncementRepo: Send + Sync {
    async fn get_announcement(&self, id: Uuid) -> Result<Option<Announcement>>;
    /// Ordered by event date, newest first.
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;
    /// Ordered by creation time, not event date.
    async fn latest_announcement(&self) -> Result<Option<Announcement>>;

    /// Stores the announcement and one pending outbox row per current
    /// subscriber in a single transaction. Returns the number of rows queued.
    async fn create_announcement(&self, announcement: &Announcement) -> Result<usize>;

    async fn delete_announcement(&self, id: Uuid) -> Result<bool>;

    /// Unsent outbox rows with fewer than `max_attempts` attempts, optionally
    /// limited to one announcement.
    async fn pending_deliveries(
        &self,
        announcement_id: Option<Uuid>,
        max_attempts: u32,
    ) -> Result<Vec<PendingDelivery>>;

    async fn record_delivery(
        &self,
        announcement_id: Uuid,
        email: &str,
        outcome: &DeliveryOutcome,
    ) -> Result<()>;
}

/// Persistence contract for shared resources.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ResourceRepo: Send + Sync {
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>>;
    async fn list_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>>;
    async fn insert_resource(&self, resource: &Resource) -> Result<()>;
    async fn delete_resource(&self, id: Uuid) -> Result<bool>;
}

/// The newsletter registry.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SubscriberRepo: Send + Sync {
    /// Case-sensitive exact match.
    async fn subscriber_exists(&self, email: &str) -> Result<bool>;
    /// Fails with `AppError::Conflict` when the email is already present.
    async fn add_subscriber(&self, subscriber: &Subscriber) -> Result<()>;
    async fn subscriber_emails(&self) -> Result<Vec<String>>;
}

/// Outbound transactional mail.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> std::result::Result<(), DeliveryError>;
}

/// Link-preview metadata lookup.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait OpenGraphFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<OpenGraph, FetchError>;
}

/// Source of article preview images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PreviewImageSource: Send + Sync {
    async fn random_image_url(&self) -> std::result::Result<String, FetchError>;
}

/// Editor authentication contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the editor id when the credentials match.
    async fn verify_editor(&self, email: &str, password: &str) -> Option<EditorId>;
}
