//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional `places.toml` in the
//! working directory, then `PLACES__*` environment variables
//! (e.g. `PLACES__SERVER__PORT=9000`, `PLACES__IMPORT__BATCH_SIZE=250`).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::duplicates::KeepPolicyKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub import: ImportSettings,
    pub duplicates: DuplicateSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub json_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportSettings {
    /// Rows committed per store transaction.
    pub batch_size: usize,
    /// Overall budget for one import request.
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl ImportSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            batch_size: 100,
            timeout_secs: 60,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateSettings {
    pub keep_policy: KeepPolicyKind,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("server.json_limit_bytes", 10 * 1024 * 1024_i64)?
            .set_default("database.path", "places.sqlite")?
            .set_default("import.batch_size", 100_i64)?
            .set_default("import.timeout_secs", 60_i64)?
            .set_default("import.max_upload_bytes", 20 * 1024 * 1024_i64)?
            .set_default("duplicates.keep_policy", "oldest")?
            .add_source(config::File::with_name("places").required(false))
            .add_source(config::Environment::with_prefix("PLACES").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.import.batch_size == 0 {
            return Err(ConfigError::Validation {
                message: "import.batch_size must be at least 1".to_string(),
            });
        }
        if self.import.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                message: "import.timeout_secs must be at least 1".to_string(),
            });
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: "database.path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                json_limit_bytes: 10 * 1024 * 1024,
            },
            database: DatabaseSettings {
                path: PathBuf::from("places.sqlite"),
            },
            import: ImportSettings::default(),
            duplicates: DuplicateSettings::default(),
        }
    }
}
