use async_trait::async_trait;
use chrono::Utc;
use fol_core::error::Result;
use fol_core::models::{Announcement, DeliveryOutcome, DeliveryStatus, PendingDelivery};
use fol_core::traits::AnnouncementRepo;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteStore};

fn announcement_from_row(row: &SqliteRow) -> Result<Announcement> {
    Ok(Announcement {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?,
        title: row.try_get("title").map_err(db_err)?,
        content: row.try_get("content").map_err(db_err)?,
        date: row.try_get("date").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl AnnouncementRepo for SqliteStore {
    async fn get_announcement(&self, id: Uuid) -> Result<Option<Announcement>> {
        let row = sqlx::query("SELECT * FROM announcements WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(announcement_from_row).transpose()
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        sqlx::query("SELECT * FROM announcements ORDER BY date DESC, created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .iter()
            .map(announcement_from_row)
            .collect()
    }

    async fn latest_announcement(&self) -> Result<Option<Announcement>> {
        let row = sqlx::query("SELECT * FROM announcements ORDER BY created_at DESC, id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(announcement_from_row).transpose()
    }

    /// Announcement plus one outbox row per subscriber, committed atomically.
    /// The subscriber snapshot is read inside the transaction, so a
    /// concurrent sign-up is either queued here or not yet visible.
    async fn create_announcement(&self, announcement: &Announcement) -> Result<usize> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO announcements (id, title, content, date, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(announcement.id))
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.date)
        .bind(announcement.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let queued = sqlx::query(
            "INSERT OR IGNORE INTO announcement_deliveries \
             (announcement_id, email, status, attempts, updated_at) \
             SELECT ?, email, ?, 0, ? FROM subscribers ORDER BY created_at, id",
        )
        .bind(uuid_to_blob(announcement.id))
        .bind(DeliveryStatus::Pending.as_str())
        .bind(announcement.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?
        .rows_affected();

        tx.commit().await.map_err(db_err)?;
        Ok(usize::try_from(queued).unwrap_or(usize::MAX))
    }

    async fn delete_announcement(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn pending_deliveries(
        &self,
        announcement_id: Option<Uuid>,
        max_attempts: u32,
    ) -> Result<Vec<PendingDelivery>> {
        let mut sql = String::from(
            "SELECT announcement_id, email, attempts FROM announcement_deliveries \
             WHERE status != ? AND attempts < ?",
        );
        if announcement_id.is_some() {
            sql.push_str(" AND announcement_id = ?");
        }
        sql.push_str(" ORDER BY rowid");

        let mut query = sqlx::query(&sql)
            .bind(DeliveryStatus::Sent.as_str())
            .bind(i64::from(max_attempts));
        if let Some(id) = announcement_id {
            query = query.bind(uuid_to_blob(id));
        }

        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        rows.iter()
            .map(|row| {
                let attempts: i64 = row.try_get("attempts").map_err(db_err)?;
                Ok(PendingDelivery {
                    announcement_id: blob_to_uuid(
                        &row.try_get::<Vec<u8>, _>("announcement_id").map_err(db_err)?,
                    )?,
                    email: row.try_get("email").map_err(db_err)?,
                    attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
                })
            })
            .collect()
    }

    async fn record_delivery(
        &self,
        announcement_id: Uuid,
        email: &str,
        outcome: &DeliveryOutcome,
    ) -> Result<()> {
        let (status, last_error) = match outcome {
            DeliveryOutcome::Sent => (DeliveryStatus::Sent, None),
            DeliveryOutcome::Failed(reason) => (DeliveryStatus::Failed, Some(reason.as_str())),
        };

        sqlx::query(
            "UPDATE announcement_deliveries \
             SET status = ?, attempts = attempts + 1, last_error = ?, updated_at = ? \
             WHERE announcement_id = ? AND email = ?",
        )
        .bind(status.as_str())
        .bind(last_error)
        .bind(Utc::now())
        .bind(uuid_to_blob(announcement_id))
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
