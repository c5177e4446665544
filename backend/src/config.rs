//! Application configuration.
//!
//! Values come from the environment (a `.env` file is loaded first if
//! present) with defaults for everything. CLI flags override what is read
//! here.
//!
//! | Variable                        | Default    |
//! |---------------------------------|------------|
//! | `SHEETGATE_PORT`                | `3000`     |
//! | `SHEETGATE_USERNAME`            | `admin`    |
//! | `SHEETGATE_PASSWORD`            | `password` |
//! | `SHEETGATE_AUTH_DELAY_MS`       | `1000`     |
//! | `SHEETGATE_SUBMIT_DELAY_MS`     | `1000`     |
//! | `SHEETGATE_INGEST_URL`          | unset (simulated) |
//! | `SHEETGATE_INGEST_TIMEOUT_SECS` | `30`       |
//! | `SHEETGATE_QUOTING`             | `quoted`   |
//! | `SHEETGATE_STATIC_DIR`          | unset      |

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    IdentityProvider, StaticIdentityProvider, DEFAULT_AUTH_DELAY, DEFAULT_PASSWORD,
    DEFAULT_USERNAME,
};
use crate::error::ConfigError;
use crate::ingest::{
    HttpIngestion, PersistenceCollaborator, SimulatedIngestion, DEFAULT_INGEST_TIMEOUT,
    DEFAULT_SUBMIT_DELAY,
};
use crate::session::Session;
use crate::transform::delimited::Delimiting;

pub const DEFAULT_PORT: u16 = 3000;

/// Maximum accepted request body for uploads (50 MB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Fixed credential pair checked by the static identity provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub delay: Duration,
}

/// Where and how the delimited text is submitted.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// `None` selects the simulated collaborator.
    pub endpoint: Option<String>,
    pub delay: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub auth: AuthConfig,
    pub ingest: IngestConfig,
    pub delimiting: Delimiting,
    /// Built frontend served at `/` when set.
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth: AuthConfig {
                username: DEFAULT_USERNAME.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
                delay: DEFAULT_AUTH_DELAY,
            },
            ingest: IngestConfig {
                endpoint: None,
                delay: DEFAULT_SUBMIT_DELAY,
                timeout: DEFAULT_INGEST_TIMEOUT,
            },
            delimiting: Delimiting::default(),
            static_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Load from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Ok(Self {
            port: parse_var(get("SHEETGATE_PORT"), "SHEETGATE_PORT", defaults.port)?,
            auth: AuthConfig {
                username: get("SHEETGATE_USERNAME")
                    .map(str::to_string)
                    .unwrap_or(defaults.auth.username),
                password: get("SHEETGATE_PASSWORD")
                    .map(str::to_string)
                    .unwrap_or(defaults.auth.password),
                delay: millis_var(get("SHEETGATE_AUTH_DELAY_MS"), "SHEETGATE_AUTH_DELAY_MS", defaults.auth.delay)?,
            },
            ingest: IngestConfig {
                endpoint: get("SHEETGATE_INGEST_URL").map(str::to_string),
                delay: millis_var(get("SHEETGATE_SUBMIT_DELAY_MS"), "SHEETGATE_SUBMIT_DELAY_MS", defaults.ingest.delay)?,
                timeout: Duration::from_secs(parse_var(
                    get("SHEETGATE_INGEST_TIMEOUT_SECS"),
                    "SHEETGATE_INGEST_TIMEOUT_SECS",
                    defaults.ingest.timeout.as_secs(),
                )?),
            },
            delimiting: match get("SHEETGATE_QUOTING") {
                Some(v) => v.parse().map_err(|reason| invalid("SHEETGATE_QUOTING", v, reason))?,
                None => defaults.delimiting,
            },
            static_dir: get("SHEETGATE_STATIC_DIR").map(PathBuf::from),
        })
    }

    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        Arc::new(
            StaticIdentityProvider::new(&self.auth.username, &self.auth.password)
                .with_delay(self.auth.delay),
        )
    }

    pub fn persistence(&self) -> Result<Arc<dyn PersistenceCollaborator>, ConfigError> {
        match &self.ingest.endpoint {
            Some(url) => {
                let http = HttpIngestion::new(url.as_str(), self.ingest.timeout)
                    .map_err(|e| invalid("SHEETGATE_INGEST_URL", url, e.to_string()))?;
                Ok(Arc::new(http))
            }
            None => Ok(Arc::new(SimulatedIngestion::new(self.ingest.delay))),
        }
    }

    /// A logged-out session wired to the configured collaborators.
    pub fn build_session(&self) -> Result<Session, ConfigError> {
        Ok(Session::new(
            self.identity_provider(),
            self.persistence()?,
            self.delimiting,
        ))
    }
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_var<T>(value: Option<&str>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.parse().map_err(|e: T::Err| invalid(key, v, e.to_string())),
        None => Ok(default),
    }
}

fn millis_var(value: Option<&str>, key: &str, default: Duration) -> Result<Duration, ConfigError> {
    let ms = parse_var(value, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}
