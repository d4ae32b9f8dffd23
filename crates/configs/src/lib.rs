//! # configs
//!
//! Layered settings for the YCBN site. Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional, not committed)
//! 4. `YCBN__SECTION__KEY` environment variables, after `.env` is loaded
//!
//! Secrets stay wrapped in `SecretString` until the binary hands them to the
//! adapter that needs them.

use std::collections::HashMap;

use config::{Config, Environment, File};
use domains::JoinPolicy;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub membership: MembershipSettings,
    pub newsletter: NewsletterSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    /// Required when `backend = "postgres"`
    pub url: Option<SecretString>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipSettings {
    pub join_policy: JoinPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterSettings {
    /// Stored on every new subscription
    pub source_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub level: String,
    pub format: LogFormat,
}

impl Settings {
    /// Reads `.env`, the config files and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::build(Environment::with_prefix("YCBN"))
    }

    /// Same layering as `load`, with the environment taken from `vars`
    /// instead of the process.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, SettingsError> {
        Self::build(Environment::with_prefix("YCBN").source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("auth.token_ttl_minutes", 24 * 60)?
            .set_default("membership.join_policy", "direct")?
            .set_default("newsletter.source_label", "website")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), SettingsError> {
        if self.database.backend == DatabaseBackend::Postgres {
            if !cfg!(feature = "db-postgres") {
                return Err(SettingsError::Invalid(
                    "the postgres backend needs a build with the db-postgres feature".into(),
                ));
            }
            if self.database.url.is_none() {
                return Err(SettingsError::Invalid(
                    "database.url is required for the postgres backend".into(),
                ));
            }
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(SettingsError::Invalid("auth.token_ttl_minutes must be positive".into()));
        }
        Ok(())
    }
}
