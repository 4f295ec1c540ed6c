//! # Pathfinder Configuration
//!
//! Layered configuration and default values for the pathfinder service.
//!
//! ## Features
//!
//! - **Service Defaults**: Search limits and deadlines used when nothing is configured
//! - **Service Configuration**: TOML file plus `PATHFINDER_` environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use config::{defaults, PathfinderConfig};
//!
//! let config = PathfinderConfig::default();
//! assert_eq!(config.search.max_path_length, defaults::search::MAX_PATH_LENGTH);
//! assert!(config.validate().is_ok());
//! ```

pub mod defaults;
pub mod service_config;

pub use service_config::{
    load_config, GlobalConfig, IngestionConfig, PathfinderConfig, SearchConfig,
};
