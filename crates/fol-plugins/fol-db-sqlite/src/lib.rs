//! # fol-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `fol-core` domain models. One [`SqliteStore`] implements every
//! repository port; each entity lives in its own module.

mod announcements;
mod articles;
mod resources;
mod schema;
mod subscribers;

use std::str::FromStr;
use std::time::Duration;

use fol_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    ///
    /// In-memory databases live only as long as their connection, so they get
    /// a single connection that is never recycled.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .idle_timeout(Duration::from_secs(600))
        };
        let pool = pool_options.connect_with(options).await.map_err(db_err)?;

        let store = Self { pool };
        schema::migrate(&store.pool).await?;
        info!(%url, "sqlite store ready");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    AppError::internal(e)
}

// Helper for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(blob).map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_applies_schema_once() {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();
        // Re-running the schema is a no-op.
        schema::migrate(store.pool()).await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(store.pool())
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(
            names,
            [
                "announcement_deliveries",
                "announcements",
                "articles",
                "resources",
                "subscribers"
            ]
        );
    }

    #[test]
    fn uuid_blob_round_trip() {
        let id = Uuid::now_v7();
        assert_eq!(blob_to_uuid(&uuid_to_blob(id)).unwrap(), id);
        assert!(blob_to_uuid(&[1, 2, 3]).is_err());
    }
}
