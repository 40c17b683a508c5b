use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::access::{authorize, Caller};
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{Announcement, DeliveryOutcome, NewAnnouncement, OutboundEmail};
use crate::traits::{AnnouncementRepo, Mailer};

/// Outcome of one fan-out run over an announcement's pending outbox rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub announcement_id: Uuid,
    pub attempted: usize,
    pub delivered: usize,
    /// `(email, error)` for every send that failed in this run.
    pub failed: Vec<(String, String)>,
}

/// A committed announcement and the result of its first fan-out run.
#[derive(Debug, Clone)]
pub struct Published {
    pub announcement: Announcement,
    pub report: FanoutReport,
}

/// The email every subscriber receives for an announcement.
pub fn notification_for(announcement: &Announcement, to: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: format!("New Announcement: {}", announcement.title),
        text: format!(
            "{}\n\nDate: {}",
            announcement.content,
            announcement.date.format("%-m/%-d/%Y")
        ),
    }
}

/// Announcement lifecycle and the subscriber notification fan-out.
///
/// Publishing is two-phase. The announcement and a snapshot of the current
/// subscriber list, taken inside the same store transaction, are committed
/// together as outbox rows keyed by
/// `(announcement_id, email)`; the fan-out then walks the unsent rows. A
/// failed send is recorded on its row and retried by [`resume_pending`],
/// which never re-sends a row already marked sent.
///
/// [`resume_pending`]: AnnouncementService::resume_pending
#[derive(Clone)]
pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepo>,
    mailer: Arc<dyn Mailer>,
    max_attempts: u32,
    // Serializes fan-out runs so the inline run and the retry sweep never
    // pick up the same pending row at once.
    fanout_lock: Arc<Mutex<()>>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepo>, mailer: Arc<dyn Mailer>, max_attempts: u32) -> Self {
        Self {
            repo,
            mailer,
            max_attempts: max_attempts.max(1),
            fanout_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Announcement> {
        self.repo
            .get_announcement(id)
            .await?
            .ok_or_else(|| AppError::not_found("Announcement", id))
    }

    /// Newest event date first.
    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list_announcements().await
    }

    /// The most recently created announcement, whatever its event date.
    pub async fn latest(&self) -> Result<Option<Announcement>> {
        self.repo.latest_announcement().await
    }

    pub async fn create(&self, caller: &Caller, input: NewAnnouncement) -> Result<Published> {
        let editor = authorize(caller, "announcement.create")?;

        let mut errors = FieldErrors::new();
        if input.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if input.content.trim().is_empty() {
            errors.add("content", "Content is required");
        }
        if input.date.is_none() {
            errors.add("date", "Date is required");
        }
        let (Some(date), true) = (input.date, errors.is_empty()) else {
            return Err(AppError::Validation(errors));
        };

        let announcement = Announcement {
            id: Uuid::now_v7(),
            title: input.title,
            content: input.content,
            date,
            created_at: Utc::now(),
        };

        let recipients = self.repo.create_announcement(&announcement).await?;
        info!(
            announcement_id = %announcement.id,
            %editor,
            recipients,
            "announcement published"
        );

        let report = self.fan_out(&announcement).await;
        Ok(Published {
            announcement,
            report,
        })
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()> {
        let editor = authorize(caller, "announcement.delete")?;
        if !self.repo.delete_announcement(id).await? {
            return Err(AppError::not_found("Announcement", id));
        }
        info!(announcement_id = %id, %editor, "announcement deleted");
        Ok(())
    }

    /// Retries every announcement that still has unsent outbox rows.
    pub async fn resume_pending(&self) -> Result<Vec<FanoutReport>> {
        let pending = self.repo.pending_deliveries(None, self.max_attempts).await?;

        let mut ids: Vec<Uuid> = Vec::new();
        for delivery in &pending {
            if !ids.contains(&delivery.announcement_id) {
                ids.push(delivery.announcement_id);
            }
        }

        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            match self.repo.get_announcement(id).await? {
                Some(announcement) => reports.push(self.fan_out(&announcement).await),
                None => warn!(announcement_id = %id, "pending deliveries for a missing announcement"),
            }
        }
        Ok(reports)
    }

    async fn fan_out(&self, announcement: &Announcement) -> FanoutReport {
        let _guard = self.fanout_lock.lock().await;

        let mut report = FanoutReport {
            announcement_id: announcement.id,
            ..FanoutReport::default()
        };

        let pending = match self
            .repo
            .pending_deliveries(Some(announcement.id), self.max_attempts)
            .await
        {
            Ok(pending) => pending,
            Err(e) => {
                error!(announcement_id = %announcement.id, error = %e, "could not load pending deliveries");
                return report;
            }
        };

        for delivery in pending {
            report.attempted += 1;
            let message = notification_for(announcement, &delivery.email);
            let outcome = match self.mailer.send(&message).await {
                Ok(()) => {
                    report.delivered += 1;
                    DeliveryOutcome::Sent
                }
                Err(e) => {
                    warn!(
                        announcement_id = %announcement.id,
                        to = %delivery.email,
                        attempt = delivery.attempts + 1,
                        error = %e,
                        "announcement email failed"
                    );
                    report.failed.push((delivery.email.clone(), e.to_string()));
                    DeliveryOutcome::Failed(e.to_string())
                }
            };

            if let Err(e) = self
                .repo
                .record_delivery(announcement.id, &delivery.email, &outcome)
                .await
            {
                error!(
                    announcement_id = %announcement.id,
                    to = %delivery.email,
                    error = %e,
                    "could not record delivery outcome"
                );
            }
        }

        info!(
            announcement_id = %announcement.id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed.len(),
            "announcement fan-out finished"
        );
        report
    }
}
