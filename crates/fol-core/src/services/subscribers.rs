use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, FieldErrors, Result};
use crate::models::Subscriber;
use crate::traits::SubscriberRepo;

pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed.";

/// Public newsletter sign-up. Email uniqueness is owned by the store.
#[derive(Clone)]
pub struct SubscriberService {
    repo: Arc<dyn SubscriberRepo>,
}

impl SubscriberService {
    pub fn new(repo: Arc<dyn SubscriberRepo>) -> Self {
        Self { repo }
    }

    pub async fn exists(&self, email: &str) -> Result<bool> {
        self.repo.subscriber_exists(email).await
    }

    pub async fn emails(&self) -> Result<Vec<String>> {
        self.repo.subscriber_emails().await
    }

    pub async fn subscribe(&self, email: &str) -> Result<Subscriber> {
        let email = email.trim();
        if email.is_empty() {
            let mut errors = FieldErrors::new();
            errors.add("email", "Email is required");
            return Err(AppError::Validation(errors));
        }

        // Fast path only; the insert below is what enforces uniqueness.
        if self.repo.subscriber_exists(email).await? {
            return Err(AppError::Conflict(ALREADY_SUBSCRIBED.to_string()));
        }

        let subscriber = Subscriber {
            id: Uuid::now_v7(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        match self.repo.add_subscriber(&subscriber).await {
            Ok(()) => {
                info!(subscriber_id = %subscriber.id, "new subscriber");
                Ok(subscriber)
            }
            Err(AppError::Conflict(_)) => Err(AppError::Conflict(ALREADY_SUBSCRIBED.to_string())),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockSubscriberRepo;

    #[tokio::test]
    async fn insert_conflict_wins_over_a_stale_existence_check() {
        let mut repo = MockSubscriberRepo::new();
        // A concurrent request inserted the same email after our check.
        repo.expect_subscriber_exists().returning(|_| Ok(false));
        repo.expect_add_subscriber()
            .returning(|_| Err(AppError::Conflict("UNIQUE constraint failed".into())));

        let service = SubscriberService::new(Arc::new(repo));
        let err = service.subscribe("mary@example.org").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == ALREADY_SUBSCRIBED));
    }

    #[tokio::test]
    async fn existing_email_short_circuits() {
        let mut repo = MockSubscriberRepo::new();
        repo.expect_subscriber_exists()
            .withf(|email: &str| email == "mary@example.org")
            .returning(|_| Ok(true));
        repo.expect_add_subscriber().never();

        let service = SubscriberService::new(Arc::new(repo));
        let err = service.subscribe("  mary@example.org ").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn blank_email_is_a_validation_error() {
        let service = SubscriberService::new(Arc::new(MockSubscriberRepo::new()));
        let err = service.subscribe("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(f) if f.get("email") == Some("Email is required")));
    }
}
