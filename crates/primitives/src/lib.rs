//! Ordered-collection primitives over a wide-column store
//!
//! Provides stateless facades over a [`Store`](strata_core::Store):
//! - **SortedSet**: members ordered by score, with rank and range queries
//! - **GeoIndex**: members located on the globe, with radius queries
//!
//! ## Design Principle: Stateless Facades
//!
//! Each facade holds only an `Arc<dyn Store>` and a
//! [`TableConfig`](strata_core::TableConfig). Every call is a sequence of
//! store requests; nothing is cached between calls, so any number of
//! facades may share one store.
//!
//! ## Shared Machinery
//!
//! - [`lexical`]: order-preserving score encoding
//! - [`cursor`]: paged range traversal with offset, count and filtering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod geo;
pub mod lexical;
pub mod sorted_set;

pub use cursor::{Budget, RangeCursor, Visit};
pub use geo::{CellId, GeoIndex, LocatedMembers, Location, Unit, EARTH_RADIUS_METERS};
pub use lexical::{decode_score, encode_score};
pub use sorted_set::{AddMode, ScoredMembers, SortedSet};
