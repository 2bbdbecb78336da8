//! Configuration management for ReelBox
//!
//! Layered configuration loaded from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! Configuration can be overridden using environment variables with the
//! pattern `REELBOX__<section>__<key>`, for example:
//! - `REELBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `REELBOX__TMDB__TIMEOUT_MS=5000`
//!
//! The TMDB API key is a secret and is only read from the environment
//! (`TMDB_API_KEY`), never from the TOML file.
//!
//! By default the configuration is loaded from `config/reelbox.toml`; this
//! can be overridden with the `REELBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{CatalogConfig, Config, ServerConfig, TmdbConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
