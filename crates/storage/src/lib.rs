//! Storage layer for ordered collections
//!
//! This crate implements the wide-column store surface in process:
//! - MemoryStore: partitioned BTreeMap tables with local secondary indexes,
//!   conditional writes and paged queries
//! - testing::FaultyStore: wrapper injecting condition and store failures
//!
//! Production deployments plug a network-backed store in through the same
//! `strata_core::Store` trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod testing;

pub use memory::{MemoryStore, TableSchema};
