//! Configuration loading and management for the rental ledger.
//!
//! This module loads the server, logging and validation settings from a YAML
//! file.
//!
//! # Example
//!
//! ```no_run
//! use rental_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ledger.yaml").unwrap();
//! println!("Recent payments shown: {}", config.recent_payments_limit());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LedgerConfig, LogFormat, LoggingConfig, ServerConfig, ValidationLimits};
