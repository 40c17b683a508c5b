//! # fol-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Checks a single configured editor account; there is no user table.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use fol_core::models::EditorId;
use fol_core::traits::AuthProvider;
use secrecy::{ExposeSecret, SecretString};

pub struct SimpleAuthProvider {
    editor_email: String,
    /// PHC string, e.g. `$argon2id$v=19$...`.
    password_hash: SecretString,
}

impl SimpleAuthProvider {
    pub fn new(editor_email: &str, password_hash: SecretString) -> Self {
        Self {
            editor_email: editor_email.trim().to_string(),
            password_hash,
        }
    }
}

/// Produces a PHC hash string suitable for the `auth.editor_password_hash` setting.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn verify_editor(&self, email: &str, password: &str) -> Option<EditorId> {
        if self.editor_email.is_empty() || !email.trim().eq_ignore_ascii_case(&self.editor_email) {
            return None;
        }

        let parsed_hash = match PasswordHash::new(self.password_hash.expose_secret()) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Configured editor password hash is not a valid PHC string");
                return None;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .ok()
            .map(|_| EditorId(self.editor_email.clone()))
    }
}
