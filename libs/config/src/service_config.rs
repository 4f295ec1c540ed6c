//! Service Configuration Module
//!
//! Provides configuration loading for the pathfinder service.
//! Supports loading from a TOML file with `PATHFINDER_` environment overrides.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::defaults;

/// Main service configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Global settings
    pub global: GlobalConfig,

    /// Path search limits
    pub search: SearchConfig,

    /// Ledger event source
    pub ingestion: IngestionConfig,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
    /// Emit structured JSON logs instead of human-readable lines
    pub json_logs: bool,
}

/// Path search settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub max_path_length: usize,
    pub max_assets_per_path: usize,
    pub include_pools: bool,
    pub timeout_ms: u64,
}

/// Ingestion settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct IngestionConfig {
    /// JSON-lines file of ledger entry changes
    pub events_path: PathBuf,
    /// Add a default pool to every trading pair after loading
    pub synthesize_pools: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::logging::LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_path_length: defaults::search::MAX_PATH_LENGTH,
            max_assets_per_path: defaults::search::MAX_ASSETS_PER_PATH,
            include_pools: defaults::search::INCLUDE_POOLS,
            timeout_ms: defaults::search::TIMEOUT_MS,
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from(defaults::ingestion::EVENTS_PATH),
            synthesize_pools: false,
        }
    }
}

impl PathfinderConfig {
    /// Load configuration from an optional file with environment overrides
    ///
    /// A missing file is not an error; defaults fill every unset field.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if path.exists() {
                info!("Loading config: {:?}", path);
                builder = builder.add_source(File::from(path).required(true));
            } else {
                warn!("Config file not found, using defaults: {:?}", path);
            }
        }

        // Override with environment variables (PATHFINDER_SEARCH__MAX_PATH_LENGTH=3)
        builder = builder.add_source(
            Environment::with_prefix("PATHFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.expand_env_vars()?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Expand environment variables in path values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let raw = self.ingestion.events_path.to_string_lossy().into_owned();
        let expanded =
            shellexpand::full(&raw).context("Failed to expand ingestion events path")?;
        self.ingestion.events_path = PathBuf::from(expanded.as_ref());
        Ok(())
    }

    /// Reject limits the search engine would refuse
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        let ceiling = defaults::search::LIMIT_CEILING;
        if search.max_path_length == 0 || search.max_path_length > ceiling {
            bail!(
                "search.max_path_length must be within 1..={}, got {}",
                ceiling,
                search.max_path_length
            );
        }
        if search.max_assets_per_path == 0 || search.max_assets_per_path > ceiling {
            bail!(
                "search.max_assets_per_path must be within 1..={}, got {}",
                ceiling,
                search.max_assets_per_path
            );
        }
        if search.timeout_ms == 0 {
            bail!("search.timeout_ms must be positive");
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(path: Option<&Path>) -> Result<PathfinderConfig> {
    PathfinderConfig::load(path)
}
