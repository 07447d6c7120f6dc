//! Server configuration from the environment

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::Level;
use poum_core::CatalogConfig;
use poum_feed::FeedPolicy;

pub const DATA_PATH_VAR: &str = "POUM_DATA_PATH";
pub const CONFIG_VAR: &str = "POUM_CONFIG";
pub const LOG_VAR: &str = "POUM_LOG";

/// Extra definitions merged into the built-in catalog
pub const FEED_FILE: &str = "uom.json";
/// Alias seed file
pub const ALIAS_FILE: &str = "unit_aliases.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid POUM_LOG level: {0}")]
    LogLevel(String),
}

/// Contents of the optional JSON file named by `POUM_CONFIG`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub catalog: CatalogConfig,
    pub feed_policy: FeedPolicy,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub catalog: CatalogConfig,
    pub feed_policy: FeedPolicy,
    pub log_level: Level,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_path = env::var(DATA_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let file = match env::var(CONFIG_VAR) {
            Ok(path) => load_config_file(Path::new(&path))?,
            Err(_) => ConfigFile::default(),
        };

        Ok(ServerConfig {
            data_path,
            catalog: file.catalog,
            feed_policy: file.feed_policy,
            log_level: log_level()?,
        })
    }

    pub fn feed_file(&self) -> PathBuf {
        self.data_path.join(FEED_FILE)
    }

    pub fn alias_file(&self) -> PathBuf {
        self.data_path.join(ALIAS_FILE)
    }
}

/// Level from `POUM_LOG`, info when unset
pub fn log_level() -> Result<Level, ConfigError> {
    match env::var(LOG_VAR) {
        Ok(level) => level.parse().map_err(|_| ConfigError::LogLevel(level)),
        Err(_) => Ok(Level::INFO),
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(text: &str) -> Result<ConfigFile, serde_json::Error> {
    serde_json::from_str(text)
}
