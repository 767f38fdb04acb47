//! Runtime configuration loaded from TOML.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults documented on each field.

use chrono::NaiveTime;
use diesel::pg::PgConnection;
use diesel::r2d2::{Builder, ConnectionManager, Pool, PoolError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::domain::DEFAULT_SEND_AFTER;
use crate::task::adapters::postgres::TaskPgPool;
use crate::telemetry::{self, TelemetryError};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`Config`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A database pool was requested without `database.url`.
    #[error("database.url is not set")]
    MissingDatabaseUrl,

    /// `database.max_connections` must allow at least one connection.
    #[error("database.max_connections must be at least 1")]
    InvalidMaxConnections,

    /// The connection pool could not be established.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Summary delivery settings.
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or a
    /// value has the wrong shape.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let raw = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. Unset means in-memory storage.
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum pooled connections (default 8).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Returns a connection manager for the configured URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no URL is set.
    pub fn connection_manager(&self) -> Result<ConnectionManager<PgConnection>, ConfigError> {
        self.url
            .as_deref()
            .map(ConnectionManager::<PgConnection>::new)
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Returns a pool builder sized by `max_connections`, ready for further
    /// customisation before [`Builder::build`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxConnections`] when the size is zero.
    pub fn pool_builder(&self) -> Result<Builder<ConnectionManager<PgConnection>>, ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections);
        }
        Ok(Pool::builder().max_size(self.max_connections))
    }

    /// Builds the shared connection pool used by both `PostgreSQL`
    /// repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] or
    /// [`ConfigError::InvalidMaxConnections`] for unusable settings, and
    /// [`ConfigError::Pool`] when the database cannot be reached.
    pub fn build_pool(&self) -> Result<TaskPgPool, ConfigError> {
        let builder = self.pool_builder()?;
        Ok(builder.build(self.connection_manager()?)?)
    }
}

const fn default_max_connections() -> u32 {
    8
}

/// Summary delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Sender address on summary emails.
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Time of day (`HH:MM`, UTC) used for new schedules (default `22:00`).
    #[serde(default = "default_send_after", with = "hour_minute")]
    pub default_send_after: NaiveTime,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            default_send_after: default_send_after(),
        }
    }
}

fn default_sender() -> String {
    "tasks@taskmanager.com".to_owned()
}

const fn default_send_after() -> NaiveTime {
    DEFAULT_SEND_AFTER
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive (default `info`).
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl LoggingConfig {
    /// Installs the global subscriber with the configured filter.
    ///
    /// Returns `Ok(false)` when a subscriber was already installed.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] for an unparsable filter.
    pub fn init_tracing(&self) -> Result<bool, TelemetryError> {
        telemetry::init_tracing(&self.filter)
    }
}

fn default_filter() -> String {
    "info".to_owned()
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
            .map_err(|err| D::Error::custom(format!("invalid time '{raw}': {err}")))
    }
}
