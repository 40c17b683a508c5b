//! # AppError
//!
//! Centralized error handling for the Flames of Love services.
//! Maps domain-specific failures to actionable error types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Field name to message map returned when form input is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// The primary error type for all fol-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record not found (e.g., Article, Announcement, Resource)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Required form fields missing or invalid
    #[error("validation error: {0}")]
    Validation(FieldErrors),

    /// Caller has no editor session
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Record already exists (e.g., duplicate subscriber email)
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for Flames of Love logic.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure reported by a mail provider for a single message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("mail provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Failure while fetching remote page metadata or a stock photo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("unexpected response: {0}")]
    Parse(String),
}
