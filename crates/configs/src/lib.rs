//! # configs
//!
//! Layered settings for the Flames of Love server.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional, not committed)
//! 4. `FOL__SECTION__KEY` environment variables, after `.env` is loaded

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "FOL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub mail: MailSettings,
    pub open_graph: OpenGraphSettings,
    pub photos: PhotoSettings,
    pub auth: AuthSettings,
    pub fanout: FanoutSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Cookie signing key; at least 64 bytes. Empty means a random per-process key.
    pub session_key: SecretString,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    pub sendgrid_api_key: SecretString,
    pub api_base: String,
    pub from_address: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenGraphSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSettings {
    pub unsplash_access_key: SecretString,
    pub api_base: String,
    pub query: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub editor_email: String,
    pub editor_password_hash: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FanoutSettings {
    pub max_attempts: u32,
    pub retry_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive string; `RUST_LOG` still wins when set.
    pub filter: String,
    pub json: bool,
}

const DEFAULTS: &[(&str, &str)] = &[
    ("server.host", "127.0.0.1"),
    ("server.port", "8080"),
    ("server.session_key", ""),
    ("server.cookie_secure", "false"),
    ("database.url", "sqlite:flames_of_love.db"),
    ("mail.sendgrid_api_key", ""),
    ("mail.api_base", "https://api.sendgrid.com"),
    ("mail.from_address", "flamesofloverosarygroup@gmail.com"),
    ("mail.timeout_secs", "10"),
    ("open_graph.timeout_secs", "5"),
    ("open_graph.user_agent", "flames-of-love-link-preview/0.1"),
    ("photos.unsplash_access_key", ""),
    ("photos.api_base", "https://api.unsplash.com"),
    ("photos.query", "Roman Catholic"),
    ("photos.timeout_secs", "5"),
    ("auth.editor_email", ""),
    ("auth.editor_password_hash", ""),
    ("fanout.max_attempts", "5"),
    ("fanout.retry_interval_secs", "300"),
    ("log.filter", "info"),
    ("log.json", "false"),
];

impl Settings {
    /// Loads `.env`, the optional files under `config/`, and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_sources(Path::new("config"), None)
    }

    /// `env` replaces the process environment when given, which keeps tests hermetic.
    pub fn from_sources(
        config_dir: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in DEFAULTS {
            builder = builder.set_default(*key, *value)?;
        }

        let settings: Settings = builder
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fanout.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "fanout.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fanout.retry_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "fanout.retry_interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        let key_len = self.server.session_key.expose_secret().len();
        if key_len != 0 && key_len < 64 {
            return Err(ConfigError::Invalid {
                key: "server.session_key",
                reason: format!("needs at least 64 bytes, got {key_len}"),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

impl MailSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.sendgrid_api_key.expose_secret().is_empty()
    }
}

impl OpenGraphSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PhotoSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.unsplash_access_key.expose_secret().is_empty()
    }
}

impl FanoutSettings {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}
