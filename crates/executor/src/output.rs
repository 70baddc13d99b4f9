//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is deterministic:
//! the same command always produces the same output variant (though the values
//! may differ based on store state).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_primitives::{LocatedMembers, Location, ScoredMembers};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output` variant.
/// This mapping is deterministic and documented in the command definitions.
///
/// # Example
///
/// ```text
/// use strata_executor::{Command, Output, Executor};
///
/// let result = executor.execute(Command::ZScore { key, member })?;
///
/// match result {
///     Output::MaybeFloat(Some(score)) => println!("Score: {}", score),
///     Output::MaybeFloat(None) => println!("Not a member"),
///     _ => unreachable!("ZScore always returns MaybeFloat"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    // ==================== Scalars ====================
    /// Unsigned integer result (counts, cardinality)
    Uint(u64),

    /// Optional unsigned integer (rank of a member that may be absent)
    MaybeUint(Option<u64>),

    /// Floating point result (new score after an increment)
    Float(f64),

    /// Optional float (score or distance involving a member that may be absent)
    MaybeFloat(Option<f64>),

    // ==================== Collections ====================
    /// Members with scores, in the order the range produced them
    ScoredMembers(ScoredMembers),

    /// Positions keyed by member
    Positions(HashMap<String, Location>),

    /// Members with positions, in cell order
    Located(LocatedMembers),

    /// Geohashes, in request order
    Hashes(Vec<String>),

    // ==================== Database ====================
    /// Ping response
    Pong {
        /// Executor version
        version: String,
    },
}

impl Output {
    /// Whether the output carries no progress: a zero count or an empty collection
    pub fn is_empty(&self) -> bool {
        match self {
            Output::Uint(n) => *n == 0,
            Output::MaybeUint(n) => n.is_none(),
            Output::MaybeFloat(f) => f.is_none(),
            Output::Float(_) | Output::Pong { .. } => false,
            Output::ScoredMembers(v) => v.is_empty(),
            Output::Positions(m) => m.is_empty(),
            Output::Located(v) => v.is_empty(),
            Output::Hashes(v) => v.is_empty(),
        }
    }
}
