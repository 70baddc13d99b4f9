//! # Strata Executor
//!
//! The command surface for Strata ordered collections.
//!
//! This crate turns the classic sorted-set and geo command vocabulary into
//! calls on the primitives. It provides:
//! - [`Executor`] - dispatches commands against a store
//! - [`Command`]/[`Output`] - serializable instruction set (for SDKs)
//! - [`Error`] - serializable error mirror, including partial progress
//!
//! ## Quick Start
//!
//! ```text
//! use std::sync::Arc;
//! use strata_executor::{AddMode, Command, Executor, TableConfig};
//! use strata_storage::MemoryStore;
//!
//! let config = TableConfig::default();
//! let executor = Executor::new(Arc::new(MemoryStore::with_config(&config)), config);
//!
//! executor.execute(Command::ZAdd {
//!     key: "board".into(),
//!     members: vec![("alice".into(), 10.0)],
//!     mode: AddMode::Upsert,
//! })?;
//! let top = executor.execute(Command::ZRevRange { key: "board".into(), start: 0, stop: 9 })?;
//! ```
//!
//! ## Collections
//!
//! | Collection | Commands |
//! |-----------|----------|
//! | **Sorted set** | `Z*`: scores, ranks, score/lex/rank ranges, pops |
//! | **Geo** | `Geo*`: positions, distances, geohashes, radius search |
//!
//! Both kinds share the table layout, so one key holds either.

#![warn(missing_docs)]

pub(crate) mod bridge;
mod command;
mod convert;
mod error;
mod executor;
mod output;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;

// Re-export the types commands carry so users don't need the lower crates
pub use strata_core::{Store, TableConfig};
pub use strata_primitives::{AddMode, LocatedMembers, Location, ScoredMembers, Unit};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
