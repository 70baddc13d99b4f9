//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from core errors,
//!   including the progress a multi-request command made before failing

use serde::{Deserialize, Serialize};

use crate::Output;

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Validation | `InvalidScore`, `InvalidLocation` | Bad input, nothing written |
/// | Concurrency | `ConditionFailed`, `Contention` | Races with other writers |
/// | Support | `Unsupported` | Command exists but is not implemented |
/// | Progress | `Interrupted` | Failure after partial success |
/// | System | `Store`, `Corruption`, `Config`, `TableNotFound` | Infrastructure errors |
///
/// # Example
///
/// ```ignore
/// use strata_executor::{Command, Error, Executor};
///
/// match executor.execute(cmd) {
///     Ok(output) => { /* handle success */ }
///     Err(Error::Interrupted { completed, cause }) => {
///         println!("Stopped by {} after {:?}", cause, completed);
///     }
///     Err(e) => {
///         println!("Error: {}", e);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Validation Errors ====================
    /// Score cannot be ordered
    #[error("invalid score: {score}")]
    InvalidScore {
        /// The rejected score
        score: f64,
    },

    /// Coordinates outside the valid ranges
    #[error("invalid location: lat {lat}, lon {lon}")]
    InvalidLocation {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },

    // ==================== Concurrency Errors ====================
    /// A conditional write missed its precondition
    #[error("conditional check failed")]
    ConditionFailed,

    /// An increment ran out of attempts
    #[error("too much contention on {key} / {member}")]
    Contention {
        /// Collection key
        key: String,
        /// Member name
        member: String,
    },

    // ==================== Support Errors ====================
    /// Command is part of the vocabulary but not implemented
    #[error("unsupported command: {command}")]
    Unsupported {
        /// Classic command name
        command: String,
    },

    // ==================== Progress Errors ====================
    /// A multi-request command failed after making progress
    ///
    /// Nothing is rolled back: `completed` is what the command achieved
    /// before `cause` stopped it.
    #[error("interrupted: {cause}")]
    Interrupted {
        /// Output for the work done before the failure
        completed: Box<Output>,
        /// The failure
        cause: Box<Error>,
    },

    // ==================== System Errors ====================
    /// Store transport or service failure
    #[error("store error: {reason}")]
    Store {
        /// Message reported by the store
        reason: String,
    },

    /// A stored attribute could not be decoded
    #[error("data corruption: {reason}")]
    Corruption {
        /// What failed to decode
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },

    /// The store has no such table
    #[error("table not found: {table}")]
    TableNotFound {
        /// Table name
        table: String,
    },
}

impl Error {
    /// The failure behind this error, looking through partial progress
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Interrupted { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Output completed before the failure, if any
    pub fn completed(&self) -> Option<&Output> {
        match self {
            Error::Interrupted { completed, .. } => Some(completed),
            _ => None,
        }
    }
}
