//! # fol-mail-sendgrid
//!
//! `Mailer` backed by the SendGrid v3 mail-send API.

use std::time::Duration;

use async_trait::async_trait;
use fol_core::error::DeliveryError;
use fol_core::models::OutboundEmail;
use fol_core::traits::Mailer;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

pub const DEFAULT_API_BASE: &str = "https://api.sendgrid.com";

/// Connection settings for the SendGrid API.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: SecretString,
    /// Overridable so tests can point at a local server.
    pub api_base: String,
    pub from_address: String,
    pub timeout: Duration,
}

pub struct SendGridMailer {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    from_address: String,
}

impl SendGridMailer {
    pub fn new(config: SendGridConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.api_base.trim_end_matches('/')),
            api_key: config.api_key,
            from_address: config.from_address,
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": self.from_address },
            "subject": email.subject,
            "content": [{ "type": "text/plain", "value": email.text }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(to = %email.to, status = status.as_u16(), "Mail accepted by SendGrid");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
