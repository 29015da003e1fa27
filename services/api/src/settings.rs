//! Service settings
//!
//! Defaults are layered under environment variables prefixed with
//! `TWEETER_`; nested keys use a double underscore, e.g.
//! `TWEETER_SERVER__PORT=8080` or `TWEETER_STORAGE__BACKEND=memory`.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "TWEETER";

/// Top-level service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which record store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per collection under `data_dir`
    File,
    /// Process memory; everything is lost on exit
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Load settings from defaults and `TWEETER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001_i64)?
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", "data")?
            .set_default("log_level", "info")?
            .add_source(env.prefix_separator("_").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl ServerSettings {
    /// Socket address to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageSettings {
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    pub fn tweets_path(&self) -> PathBuf {
        self.data_dir.join("tweets.json")
    }
}
