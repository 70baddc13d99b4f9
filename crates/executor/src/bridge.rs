//! Bridge module: direct access to the collection primitives.
//!
//! [`Primitives`] holds one facade per collection kind, all sharing the
//! same store and table layout, so command handlers can reach either.

use std::sync::Arc;

use strata_core::{Store, TableConfig};
use strata_primitives::{GeoIndex, SortedSet};

/// Direct access to the collection primitives.
#[derive(Clone)]
pub struct Primitives {
    /// Sorted set primitive
    pub zset: SortedSet,
    /// Geo primitive
    pub geo: GeoIndex,
}

impl Primitives {
    /// Build every primitive over one store and table layout.
    pub fn new(store: Arc<dyn Store>, config: TableConfig) -> Self {
        Self {
            zset: SortedSet::new(store.clone(), config.clone()),
            geo: GeoIndex::new(store, config),
        }
    }
}
