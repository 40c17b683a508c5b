use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::access::{authorize, Caller};
use crate::body::BODY_SCHEMA_VERSION;
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{Article, ArticleListItem, Category, NewArticle};
use crate::traits::{ArticleRepo, PreviewImageSource};

/// Used when the stock-photo source cannot supply an image.
pub const FALLBACK_PREVIEW_IMAGE: &str = "/default-image-path.jpg";

/// Article lifecycle: read, create with a preview image, delete.
#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepo>,
    photos: Arc<dyn PreviewImageSource>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepo>, photos: Arc<dyn PreviewImageSource>) -> Self {
        Self { repo, photos }
    }

    pub async fn get(&self, id: Uuid) -> Result<Article> {
        self.repo
            .get_article(id)
            .await?
            .ok_or_else(|| AppError::not_found("Article", id))
    }

    pub async fn list(&self) -> Result<Vec<ArticleListItem>> {
        self.repo.list_articles().await
    }

    pub async fn create(&self, caller: &Caller, input: NewArticle) -> Result<Article> {
        let editor = authorize(caller, "article.create")?;

        let mut errors = FieldErrors::new();
        if input.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if input.body.is_blank() {
            errors.add("body", "Body is required");
        }
        let category = if input.category.trim().is_empty() {
            errors.add("category", "Category is required");
            None
        } else {
            let parsed = Category::parse(input.category.trim());
            if parsed.is_none() {
                errors.add("category", "Unknown category");
            }
            parsed
        };
        let (Some(category), true) = (category, errors.is_empty()) else {
            return Err(AppError::Validation(errors));
        };

        let preview_image_url = match input.preview_image_url.filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => self.random_preview_image().await,
        };

        let now = Utc::now();
        let article = Article {
            id: Uuid::now_v7(),
            title: input.title,
            body: input.body.into_stored(),
            body_version: BODY_SCHEMA_VERSION,
            category,
            preview_image_url,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_article(&article).await?;

        info!(article_id = %article.id, %editor, category = %article.category, "article created");
        Ok(article)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()> {
        let editor = authorize(caller, "article.delete")?;
        if !self.repo.delete_article(id).await? {
            return Err(AppError::not_found("Article", id));
        }
        info!(article_id = %id, %editor, "article deleted");
        Ok(())
    }

    async fn random_preview_image(&self) -> String {
        match self.photos.random_image_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "stock photo lookup failed; using fallback image");
                FALLBACK_PREVIEW_IMAGE.to_string()
            }
        }
    }
}
