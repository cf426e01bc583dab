//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{LedgerConfig, LoggingConfig, ServerConfig, ValidationLimits};

/// Loads and provides access to the ledger configuration.
///
/// # File Structure
///
/// ```text
/// server:
///   bind_address: "0.0.0.0:3000"
/// logging:
///   format: compact          # or json
///   default_filter: rental_ledger=info
/// limits:
///   name_max_len: 100
///   max_monthly_rent: "100000000"
///   ...
/// recent_payments_limit: 5
/// ```
///
/// Every section is optional and falls back to its defaults.
///
/// # Example
///
/// ```no_run
/// use rental_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ledger.yaml")?;
/// println!("Listening on {}", loader.server().bind_address);
/// # Ok::<(), rental_ledger::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or mistyped fields (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<LedgerConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Wraps an already built configuration.
    pub fn from_config(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the logging settings.
    pub fn logging(&self) -> &LoggingConfig {
        &self.config.logging
    }

    /// Returns the validation limits.
    pub fn limits(&self) -> &ValidationLimits {
        &self.config.limits
    }

    /// Returns the default size of recent-payment lists.
    pub fn recent_payments_limit(&self) -> usize {
        self.config.recent_payments_limit
    }
}
