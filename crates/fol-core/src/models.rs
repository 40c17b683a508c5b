//! # Domain Models
//!
//! These structs represent the content entities of the Flames of Love site.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::body::BodyInput;

/// The fixed set of article categories offered by the editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Prayers & Devotions")]
    PrayersAndDevotions,
    #[serde(rename = "Eucharistic")]
    Eucharistic,
    #[serde(rename = "Marian")]
    Marian,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PrayersAndDevotions,
        Category::Eucharistic,
        Category::Marian,
        Category::Other,
    ];

    /// The label shown to readers and stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PrayersAndDevotions => "Prayers & Devotions",
            Category::Eucharistic => "Eucharistic",
            Category::Marian => "Marian",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive match against the stored labels.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A long-form devotional article written by an editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    /// Serialized rich-text document, opaque to the store.
    pub body: String,
    /// Schema version of `body` (see [`crate::body::BODY_SCHEMA_VERSION`]).
    pub body_version: i32,
    pub category: Category,
    pub preview_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The projection used by the article index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleListItem {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub category: Category,
    pub preview_image_url: String,
}

impl From<Article> for ArticleListItem {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            body: article.body,
            category: article.category,
            preview_image_url: article.preview_image_url,
        }
    }
}

/// Raw author input for a new article, validated by the article service.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub body: BodyInput,
    pub category: String,
    /// When absent the stock-photo source supplies one.
    pub preview_image_url: Option<String>,
}

/// A dated notice sent to every subscriber when it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// The event date chosen by the editor, not the record timestamp.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub date: Option<NaiveDate>,
}

/// Delivery state of one outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// Result of one send attempt, written back to the outbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

/// An outbox row still owed an email. `(announcement_id, email)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub announcement_id: Uuid,
    pub email: String,
    pub attempts: u32,
}

/// An external link shared with the group, enriched with Open Graph data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// Sort override accepted by the resource listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceOrder {
    #[default]
    UpdatedDesc,
    UpdatedAsc,
    CreatedDesc,
    TitleAsc,
}

/// Filter and ordering options for resource listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    #[serde(default)]
    pub order: ResourceOrder,
    pub limit: Option<u32>,
}

/// A newsletter recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Link-preview metadata scraped from a page. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A single plain-text email handed to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Identifier of a logged-in editor, as stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(pub String);

impl EditorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
