use async_trait::async_trait;
use fol_core::error::{AppError, Result};
use fol_core::models::Subscriber;
use fol_core::traits::SubscriberRepo;
use sqlx::Row;

use crate::{db_err, uuid_to_blob, SqliteStore};

#[async_trait]
impl SubscriberRepo for SqliteStore {
    async fn subscriber_exists(&self, email: &str) -> Result<bool> {
        // `=` on TEXT uses the BINARY collation, so this is case-sensitive.
        let row = sqlx::query("SELECT 1 FROM subscribers WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn add_subscriber(&self, subscriber: &Subscriber) -> Result<()> {
        let result = sqlx::query("INSERT INTO subscribers (id, email, created_at) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(subscriber.id))
            .bind(&subscriber.email)
            .bind(subscriber.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("subscriber {} already exists", subscriber.email),
            )),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn subscriber_emails(&self) -> Result<Vec<String>> {
        sqlx::query("SELECT email FROM subscribers ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .iter()
            .map(|row| row.try_get("email").map_err(db_err))
            .collect()
    }
}
