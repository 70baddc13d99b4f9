//! Strata ordered collections - sorted sets and geo indexes over a wide-column store
//!
//! Collections are stored one item per member: the collection key is the
//! partition, the member name is the sort key, and an order-preserving
//! score (or a spatial cell id) sits in an indexed secondary attribute.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use strata_ordered::{AddMode, Command, Executor, TableConfig};
//!
//! let config = TableConfig::default();
//! let executor = Executor::new(store, config);
//!
//! executor.execute(Command::ZAdd {
//!     key: "board".into(),
//!     members: vec![("alice".into(), 10.0)],
//!     mode: AddMode::Upsert,
//! })?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which provides a command-based
//! API. Any [`Store`] implementation can back it.
//!
//! Internal implementation details (codec, cursor, cell math) are not
//! exposed - only the executor API is public.

// Re-export the public API from strata-executor
pub use strata_executor::*;
