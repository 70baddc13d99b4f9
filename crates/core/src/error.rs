//! Error types for ordered collections
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence is never an error: lookups return `Option`. Multi-item operations
//! return [`PartialResult`], which carries whatever was accumulated before the
//! failing request alongside the error.

use thiserror::Error;

/// Result type alias for store and engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a multi-request operation that may fail part way through
pub type PartialResult<T> = std::result::Result<T, Partial<T>>;

/// Error types for ordered collections
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Transport or service failure reported by the store
    #[error("Store error: {0}")]
    Store(String),

    /// A conditional write missed its precondition
    #[error("Conditional check failed")]
    ConditionFailed,

    /// An optimistic increment ran out of attempts
    #[error("Too much contention on {key} / {member}")]
    Contention {
        /// Collection key
        key: String,
        /// Member name
        member: String,
    },

    /// NaN cannot be ordered
    #[error("Invalid score: {0}")]
    InvalidScore(f64),

    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid location: lat {lat}, lon {lon}")]
    InvalidLocation {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },

    /// A stored attribute could not be decoded
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Operation exists in the command set but is not implemented
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store has no table with this name
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

impl Error {
    /// Check if this is a precondition miss
    pub fn is_condition_failed(&self) -> bool {
        matches!(self, Error::ConditionFailed)
    }

    /// Build a corruption error for an attribute that has the wrong shape
    pub fn corrupt_attribute(attribute: &str, detail: impl std::fmt::Display) -> Self {
        Error::Corruption(format!("attribute '{}': {}", attribute, detail))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Results accumulated before a multi-request operation failed
///
/// No rollback happens: writes that succeeded before `error` stay applied,
/// and `value` reflects them (a count, or the items collected so far).
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T> {
    /// What was accumulated before the failure
    pub value: T,
    /// The failure that stopped the operation
    pub error: Error,
}

impl<T> std::fmt::Display for Partial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "interrupted: {}", self.error)
    }
}

impl<T: std::fmt::Debug> std::error::Error for Partial<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> Partial<T> {
    /// Pair an accumulator with the error that interrupted it
    pub fn new(value: T, error: Error) -> Self {
        Self { value, error }
    }

    /// Map the accumulated value, keeping the error
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Partial<U> {
        Partial {
            value: f(self.value),
            error: self.error,
        }
    }

    /// Split into the accumulated value and the error
    pub fn into_parts(self) -> (T, Error) {
        (self.value, self.error)
    }
}

impl<T> From<Partial<T>> for Error {
    fn from(p: Partial<T>) -> Self {
        p.error
    }
}
