//! Application configuration.
//!
//! Loaded from an optional `invo.toml` next to the binary, then `INVO_*`
//! environment variables, over built-in defaults.
//!
//! | Key                 | Env var                  | Default                    |
//! |---------------------|--------------------------|----------------------------|
//! | `database_path`     | `INVO_DATABASE_PATH`     | `./invo.db`                |
//! | `max_connections`   | `INVO_MAX_CONNECTIONS`   | `5`                        |
//! | `busy_timeout_secs` | `INVO_BUSY_TIMEOUT_SECS` | `5`                        |
//! | `log_filter`        | `INVO_LOG_FILTER`        | `info,invo=debug,sqlx=warn`|

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::pool::DbConfig;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Write lock wait in seconds.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database_path() -> String {
    "./invo.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_log_filter() -> String {
    "info,invo=debug,sqlx=warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `invo.toml` (optional) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("invo").required(false))
                .add_source(Environment::with_prefix("INVO").try_parsing(true)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        Ok(())
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
