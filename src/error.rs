//! Error types for the rental ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving rental and
//! payment figures or applying mutations to snapshots.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for the rental ledger.
///
/// All fallible operations in the crate return this error type, making it easy
/// to handle rejected mutations consistently at the service and API layers.
///
/// # Example
///
/// ```
/// use rental_ledger::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidDateRange {
///     start: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///     end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid date range: end date 2024-01-05 is before start date 2024-01-10"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rental window mutation would put the end before the start.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// The start of the rental window.
        start: NaiveDate,
        /// The offending end of the rental window.
        end: NaiveDate,
    },

    /// A malformed interval was passed to the date range utilities.
    #[error("Invalid range: {from} is after {to}")]
    InvalidRange {
        /// The lower bound that was supplied.
        from: NaiveDate,
        /// The upper bound that was supplied.
        to: NaiveDate,
    },

    /// A value could not be canonicalized to a calendar day.
    #[error("Invalid calendar day '{value}'")]
    InvalidDay {
        /// The raw value that failed to parse.
        value: String,
    },

    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// An entity referenced by a mutation does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "technique").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A write was attempted against a stale snapshot.
    #[error("Version conflict on {entity} '{id}': expected {expected}, found {actual}")]
    VersionConflict {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier of the entity.
        id: String,
        /// The version the caller's snapshot carried.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },

    /// The caller has no valid credential.
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the credential was refused.
        reason: String,
    },

    /// The backing store failed; the cause is opaque to the engines.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`] on the given entity kind.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
