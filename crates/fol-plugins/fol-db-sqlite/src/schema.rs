use fol_core::error::Result;
use sqlx::SqlitePool;

use crate::db_err;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id BLOB PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        body_version INTEGER NOT NULL DEFAULT 1,
        category TEXT NOT NULL,
        preview_image_url TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_updated ON articles(updated_at)",
    r#"
    CREATE TABLE IF NOT EXISTS announcements (
        id BLOB PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_announcements_date ON announcements(date)",
    "CREATE INDEX IF NOT EXISTS idx_announcements_created ON announcements(created_at)",
    // Fan-out outbox. The composite key makes re-enqueueing idempotent.
    r#"
    CREATE TABLE IF NOT EXISTS announcement_deliveries (
        announcement_id BLOB NOT NULL REFERENCES announcements(id) ON DELETE CASCADE,
        email TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        attempts INTEGER NOT NULL DEFAULT 0,
        last_error TEXT,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (announcement_id, email)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_deliveries_status ON announcement_deliveries(status)",
    r#"
    CREATE TABLE IF NOT EXISTS resources (
        id BLOB PRIMARY KEY,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        description TEXT,
        og_title TEXT,
        og_description TEXT,
        og_image_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_resources_updated ON resources(updated_at)",
    r#"
    CREATE TABLE IF NOT EXISTS subscribers (
        id BLOB PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
    "#,
];

/// Creates any missing tables and indexes.
pub(crate) async fn migrate(pool: &SqlitePool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await.map_err(db_err)?;
    }
    Ok(())
}
