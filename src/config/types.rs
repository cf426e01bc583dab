//! Configuration types for the rental ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has
//! defaults, so a partial file (or none of the optional sections) is valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on (e.g. "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            default_filter: "rental_ledger=info".to_string(),
        }
    }
}

/// Field limits applied to mutation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Maximum length of technique names, worker names and positions.
    pub name_max_len: usize,
    /// Maximum length of a technique description.
    pub technique_description_max_len: usize,
    /// Maximum monthly rent.
    pub max_monthly_rent: Decimal,
    /// Maximum planned working days per month.
    pub max_working_days: u32,
    /// Maximum length of a worker description.
    pub worker_description_max_len: usize,
    /// Maximum monthly salary.
    pub max_salary: Decimal,
    /// Maximum length of a photo URL.
    pub photo_url_max_len: usize,
    /// Maximum length of a note title.
    pub note_title_max_len: usize,
    /// Maximum length of a note body.
    pub note_content_max_len: usize,
    /// Maximum single payment amount.
    pub max_payment_amount: Decimal,
    /// Maximum length of a payment note.
    pub payment_note_max_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            name_max_len: 100,
            technique_description_max_len: 1000,
            max_monthly_rent: Decimal::from(100_000_000),
            max_working_days: 31,
            worker_description_max_len: 500,
            max_salary: Decimal::from(10_000_000),
            photo_url_max_len: 2000,
            note_title_max_len: 100,
            note_content_max_len: 2000,
            max_payment_amount: Decimal::from(10_000_000),
            payment_note_max_len: 500,
        }
    }
}

/// The complete ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Field limits.
    pub limits: ValidationLimits,
    /// Number of entries returned by recent-payment queries.
    pub recent_payments_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            limits: ValidationLimits::default(),
            recent_payments_limit: 5,
        }
    }
}
