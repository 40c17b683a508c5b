//! flames-of-love/crates/fol-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the Flames of Love site.

pub mod body;
pub mod error;
pub mod models;
pub mod services;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use services::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("marian"), None);
        assert_eq!(
            serde_json::to_string(&Category::PrayersAndDevotions).unwrap(),
            "\"Prayers & Devotions\""
        );
    }

    #[test]
    fn article_projection_keeps_display_fields() {
        let now = chrono::Utc::now();
        let article = Article {
            id: uuid::Uuid::now_v7(),
            title: "Hail Holy Queen".to_string(),
            body: "Salve Regina".to_string(),
            body_version: 1,
            category: Category::Marian,
            preview_image_url: "https://images.example/1.jpg".to_string(),
            created_at: now,
            updated_at: now,
        };
        let item = ArticleListItem::from(article.clone());
        assert_eq!(item.id, article.id);
        assert_eq!(item.category, Category::Marian);
    }
}
