use async_trait::async_trait;
use fol_core::error::{AppError, Result};
use fol_core::models::{Article, ArticleListItem, Category};
use fol_core::traits::ArticleRepo;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteStore};

fn category_from_row(row: &SqliteRow) -> Result<Category> {
    let label: String = row.try_get("category").map_err(db_err)?;
    Category::parse(&label).ok_or_else(|| AppError::Internal(format!("unknown category {label:?}")))
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?,
        title: row.try_get("title").map_err(db_err)?,
        body: row.try_get("body").map_err(db_err)?,
        body_version: row.try_get("body_version").map_err(db_err)?,
        category: category_from_row(row)?,
        preview_image_url: row.try_get("preview_image_url").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

#[async_trait]
impl ArticleRepo for SqliteStore {
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(article_from_row).transpose()
    }

    /// Only the columns the index page renders.
    async fn list_articles(&self) -> Result<Vec<ArticleListItem>> {
        let rows = sqlx::query(
            "SELECT id, title, body, category, preview_image_url FROM articles \
             ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(ArticleListItem {
                    id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?,
                    title: row.try_get("title").map_err(db_err)?,
                    body: row.try_get("body").map_err(db_err)?,
                    category: category_from_row(row)?,
                    preview_image_url: row.try_get("preview_image_url").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn insert_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            "INSERT INTO articles (id, title, body, body_version, category, preview_image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(article.id))
        .bind(&article.title)
        .bind(&article.body)
        .bind(article.body_version)
        .bind(article.category.as_str())
        .bind(&article.preview_image_url)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
