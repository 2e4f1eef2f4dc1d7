//! Configuration loading for pager-cli.
//!
//! Configuration is loaded from a TOML file (default: `pager.toml`). Every
//! section and field is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pager_core::{PagingConfig, DEFAULT_PAGE_SIZE};
use pager_mediator::MediatorConfig;

/// Root configuration for pager-cli.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Paging configuration.
    #[serde(default)]
    pub paging: PagingSection,
    /// Store configuration.
    #[serde(default)]
    pub store: StoreSection,
    /// Remote source configuration.
    #[serde(default)]
    pub remote: RemoteSection,
    /// Cache freshness configuration.
    #[serde(default)]
    pub cache: CacheSection,
}

/// Paging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PagingSection {
    /// Search term (default: "android").
    #[serde(default = "default_query")]
    pub query: String,
    /// Items per remote page (default: 30).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Distance from the end that triggers an append (default: page size).
    pub prefetch_distance: Option<u32>,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

/// Remote source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    /// JSON file holding the items the fixture source serves.
    #[serde(default = "default_fixture_path")]
    pub fixture: PathBuf,
}

/// Cache freshness configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSection {
    /// Seconds cached pages stay fresh. Absent means always refresh on start.
    pub timeout_secs: Option<u64>,
}

// Default value functions
fn default_query() -> String {
    "android".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pager.db")
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("repos.json")
}

impl Default for PagingSection {
    fn default() -> Self {
        Self {
            query: default_query(),
            page_size: default_page_size(),
            prefetch_distance: None,
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            fixture: default_fixture_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Mediator configuration for the configured query.
    pub fn mediator_config(&self) -> MediatorConfig {
        let config = MediatorConfig::new(&self.paging.query);
        match self.cache.timeout_secs {
            Some(secs) => config.with_cache_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Paging configuration for the read layer.
    pub fn paging_config(&self) -> PagingConfig {
        let config = PagingConfig::new(self.paging.page_size);
        match self.paging.prefetch_distance {
            Some(distance) => config.with_prefetch_distance(distance),
            None => config,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
