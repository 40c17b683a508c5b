//! # fol-ui
//!
//! Askama page templates and the view models they render.
//! Views hold display-ready strings; no formatting happens in templates.

use askama::Template;
use chrono::NaiveDate;
use fol_core::body::{plain_text, snippet};
use fol_core::error::FieldErrors;
use fol_core::models::{Announcement, Article, ArticleListItem, Category, Resource};
use uuid::Uuid;

/// Characters of body text shown on an article card.
pub const CARD_SNIPPET_CHARS: usize = 100;

/// Data every page needs for the layout.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub is_editor: bool,
}

impl Page {
    pub fn new(title: &str, is_editor: bool) -> Self {
        Self {
            title: title.to_string(),
            is_editor,
        }
    }
}

/// `M/D/YYYY`, matching the notification emails.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

// ── View models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnnouncementView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date: String,
}

impl From<&Announcement> for AnnouncementView {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            content: a.content.clone(),
            date: display_date(a.date),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArticleCard {
    pub id: Uuid,
    pub title: String,
    pub category: &'static str,
    pub preview_image_url: String,
    pub snippet: String,
}

impl From<&ArticleListItem> for ArticleCard {
    fn from(item: &ArticleListItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            category: item.category.as_str(),
            preview_image_url: item.preview_image_url.clone(),
            snippet: snippet(&item.body, CARD_SNIPPET_CHARS),
        }
    }
}

/// One category heading on the article index with its cards, newest first.
#[derive(Debug, Clone)]
pub struct ArticleSection {
    pub heading: &'static str,
    pub cards: Vec<ArticleCard>,
}

/// Groups cards in `Category::ALL` order, keeping the list order inside each
/// group. Categories without articles get no section.
pub fn group_by_category(items: &[ArticleListItem]) -> Vec<ArticleSection> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            let cards: Vec<ArticleCard> = items
                .iter()
                .filter(|item| item.category == *category)
                .map(ArticleCard::from)
                .collect();
            (!cards.is_empty()).then(|| ArticleSection {
                heading: category.as_str(),
                cards,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ArticleView {
    pub id: Uuid,
    pub title: String,
    pub category: &'static str,
    pub preview_image_url: String,
    pub paragraphs: Vec<String>,
    pub published: String,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            category: article.category.as_str(),
            preview_image_url: article.preview_image_url.clone(),
            paragraphs: plain_text(&article.body)
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            published: display_date(article.created_at.date_naive()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,
}

impl From<&Resource> for ResourceView {
    fn from(r: &Resource) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            url: r.url.clone(),
            description: r.description.clone(),
            og_title: r.og_title.clone(),
            og_description: r.og_description.clone(),
            og_image_url: r.og_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub label: &'static str,
    pub selected: bool,
}

/// Values echoed back into a create form after a failed submission.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub title: String,
    pub body: String,
    pub content: String,
    pub category: String,
    pub url: String,
    pub description: String,
    pub date: String,
}

// ── Templates ────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: Page,
    pub latest: Option<AnnouncementView>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "subscribe.html")]
pub struct SubscribeTemplate {
    pub page: Page,
    pub email: String,
    pub error: Option<String>,
    pub subscribed: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "articles.html")]
pub struct ArticlesTemplate {
    pub page: Page,
    pub sections: Vec<ArticleSection>,
    pub categories: Vec<CategoryOption>,
    pub form: FormValues,
    pub errors: FieldErrors,
}

impl ArticlesTemplate {
    pub fn new(page: Page, items: &[ArticleListItem], form: FormValues, errors: FieldErrors) -> Self {
        Self {
            page,
            sections: group_by_category(items),
            categories: Category::ALL
                .iter()
                .map(|c| CategoryOption {
                    label: c.as_str(),
                    selected: c.as_str() == form.category,
                })
                .collect(),
            form,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub page: Page,
    pub article: ArticleView,
}

#[derive(Template)]
#[template(path = "announcements.html")]
pub struct AnnouncementsTemplate {
    pub page: Page,
    pub announcements: Vec<AnnouncementView>,
    pub form: FormValues,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "resources.html")]
pub struct ResourcesTemplate {
    pub page: Page,
    pub resources: Vec<ResourceView>,
    pub form: FormValues,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "resource.html")]
pub struct ResourceTemplate {
    pub page: Page,
    pub resource: ResourceView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: Page,
    pub status: u16,
    pub message: String,
}
