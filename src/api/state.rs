//! Application state for the rental ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::{Clock, SystemClock};
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded configuration and the clock used when a request does not
/// say which day is today.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new application state using the system clock.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new application state with an explicit clock.
    pub fn with_clock(config: ConfigLoader, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            clock,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the requested day, or today by the state's clock.
    pub fn today_or(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested.unwrap_or_else(|| self.clock.today())
    }
}
