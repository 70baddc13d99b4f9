//! Error conversion from core error types.
//!
//! This module provides conversions from `strata_core` errors and partial
//! results to the executor's [`Error`] type.

use strata_core::PartialResult;

use crate::{Error, Output};

/// Convert a core error to an executor Error.
///
/// This preserves all error details while mapping to the appropriate
/// executor error variant.
impl From<strata_core::Error> for Error {
    fn from(err: strata_core::Error) -> Self {
        match err {
            strata_core::Error::Store(reason) => Error::Store { reason },
            strata_core::Error::ConditionFailed => Error::ConditionFailed,
            strata_core::Error::Contention { key, member } => Error::Contention { key, member },
            strata_core::Error::InvalidScore(score) => Error::InvalidScore { score },
            strata_core::Error::InvalidLocation { lat, lon } => Error::InvalidLocation { lat, lon },
            strata_core::Error::Corruption(reason) => Error::Corruption { reason },
            strata_core::Error::Unsupported(command) => Error::Unsupported {
                command: command.to_string(),
            },
            strata_core::Error::Config(reason) => Error::Config { reason },
            strata_core::Error::TableNotFound(table) => Error::TableNotFound { table },
        }
    }
}

/// Convert a core Result to an executor Result.
pub fn convert_result<T>(result: strata_core::Result<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}

/// Convert a partial result, wrapping the value with `wrap` either way.
///
/// A failure that left no progress collapses to the bare cause; otherwise
/// the progress travels in [`Error::Interrupted`].
pub fn convert_partial<T>(result: PartialResult<T>, wrap: fn(T) -> Output) -> crate::Result<Output> {
    match result {
        Ok(value) => Ok(wrap(value)),
        Err(partial) => {
            let (value, cause) = partial.into_parts();
            let completed = wrap(value);
            if completed.is_empty() {
                Err(cause.into())
            } else {
                Err(Error::Interrupted {
                    completed: Box::new(completed),
                    cause: Box::new(cause.into()),
                })
            }
        }
    }
}
