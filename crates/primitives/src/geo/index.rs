//! GeoIndex: members located on the globe
//!
//! A geo collection shares the sorted-set layout: one item per member, with
//! the member's leaf cell id stored as a Number in the secondary key. Radius
//! queries cover the circle with cells, scan each cell's id range on the
//! secondary index and keep candidates whose cell center is within the
//! radius.
//!
//! Positions read back are cell centers, not the exact coordinates written.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use strata_core::{
    AttributeValue, GetRequest, Item, ItemKey, KeyRange, Partial, PartialResult, QueryRequest,
    Result, Store, TableConfig, UpdateExpression, UpdateRequest,
};
use tracing::debug;

use super::cell::CellId;
use super::covering::{cells_to_ranges, covering_for_circle, DEFAULT_MAX_CELLS};
use super::location::{Location, Unit};
use crate::cursor::{Budget, RangeCursor, Visit};

/// Members with their positions
pub type LocatedMembers = Vec<(String, Location)>;

/// Geo collections stored one item per member
#[derive(Clone)]
pub struct GeoIndex {
    store: Arc<dyn Store>,
    config: TableConfig,
    max_cells: usize,
}

impl GeoIndex {
    /// Create a facade over `store` using `config` for the table layout
    pub fn new(store: Arc<dyn Store>, config: TableConfig) -> Self {
        Self {
            store,
            config,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    /// Override the cell budget for radius coverings
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Table layout in use
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn decode_member(&self, item: &Item) -> Result<(String, Location)> {
        let member = item.require_str(&self.config.sort_key)?.to_string();
        let cell = CellId::from_raw(item.require_number(&self.config.secondary_key)?)?;
        Ok((member, cell.center()))
    }

    /// Add members or move them; returns how many were written
    ///
    /// Every location is validated before the first write.
    ///
    /// # Errors
    ///
    /// `InvalidLocation` before any write; otherwise the first store
    /// failure, with the count written before it.
    pub fn add<I, M>(&self, key: &str, members: I) -> PartialResult<u64>
    where
        I: IntoIterator<Item = (M, Location)>,
        M: AsRef<str>,
    {
        let mut cells = Vec::new();
        for (member, location) in members {
            location.validate().map_err(|e| Partial::new(0, e))?;
            cells.push((member, CellId::from_location(&location)));
        }

        let mut written = 0u64;
        for (member, cell) in cells {
            let request = UpdateRequest {
                table: self.config.table.clone(),
                key: ItemKey::new(key, member.as_ref()),
                expression: UpdateExpression::new()
                    .set(&self.config.secondary_key, AttributeValue::number(cell.id())),
            };
            self.store
                .update_item(&request)
                .map_err(|e| Partial::new(written, e))?;
            written += 1;
        }

        debug!(target: "strata::geo", key, written, "Added locations");
        Ok(written)
    }

    /// Positions of the members that exist
    ///
    /// # Errors
    ///
    /// The first store failure, with the positions read before it.
    pub fn position<M: AsRef<str>>(
        &self,
        key: &str,
        members: &[M],
    ) -> PartialResult<HashMap<String, Location>> {
        let mut found = HashMap::new();
        for member in members {
            let member = member.as_ref();
            match self.locate(key, member) {
                Ok(Some(location)) => {
                    found.insert(member.to_string(), location);
                }
                Ok(None) => {}
                Err(e) => return Err(Partial::new(found, e)),
            }
        }
        Ok(found)
    }

    fn locate(&self, key: &str, member: &str) -> Result<Option<Location>> {
        let request = GetRequest {
            table: self.config.table.clone(),
            key: ItemKey::new(key, member),
            projection: vec![self.config.secondary_key.clone()],
            consistent: self.config.consistent_reads,
        };
        match self.store.get_item(&request)? {
            Some(item) => {
                let id = item.require_number(&self.config.secondary_key)?;
                Ok(Some(CellId::from_raw(id)?.center()))
            }
            None => Ok(None),
        }
    }

    /// Distance between two members, `None` unless both exist
    pub fn distance(&self, key: &str, first: &str, second: &str, unit: Unit) -> Result<Option<f64>> {
        let (Some(a), Some(b)) = (self.locate(key, first)?, self.locate(key, second)?) else {
            return Ok(None);
        };
        Ok(Some(a.distance_to(&b, unit)))
    }

    /// Geohash per member, in request order; empty for unknown members
    pub fn hash<M: AsRef<str>>(&self, key: &str, members: &[M]) -> Result<Vec<String>> {
        members
            .iter()
            .map(|member| {
                Ok(self
                    .locate(key, member.as_ref())?
                    .map(|location| location.geohash())
                    .unwrap_or_default())
            })
            .collect()
    }

    /// Members within `radius` of `center`
    ///
    /// Results follow cell order, not distance. `count` of `None` or
    /// `Some(0)` returns every match. A negative radius matches nothing.
    ///
    /// # Errors
    ///
    /// `InvalidLocation` for a bad center; otherwise the first store
    /// failure, with the members found before it.
    pub fn radius(
        &self,
        key: &str,
        center: Location,
        radius: f64,
        unit: Unit,
        count: Option<usize>,
    ) -> PartialResult<LocatedMembers> {
        center.validate().map_err(|e| Partial::new(Vec::new(), e))?;
        if !(radius >= 0.0) {
            return Ok(Vec::new());
        }

        let radius_meters = unit.to_meters(radius);
        let cells = covering_for_circle(&center, radius_meters, self.max_cells);
        let ranges = cells_to_ranges(&cells);
        let budget = Budget::new(0, count);
        debug!(
            target: "strata::geo",
            key,
            radius_meters,
            cells = cells.len(),
            ranges = ranges.len(),
            "Radius query"
        );

        let mut found: LocatedMembers = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (lo, hi) in ranges {
            let remaining = budget.count.map(|c| c - found.len());
            if remaining == Some(0) {
                break;
            }
            let request = QueryRequest::new(&self.config.table, key)
                .on_index(Some(self.config.secondary_index.clone()))
                .with_range(Some(KeyRange::Between(
                    AttributeValue::number(lo),
                    AttributeValue::number(hi),
                )))
                .with_consistent(self.config.consistent_reads);

            found = RangeCursor::new(&*self.store, request).collect(
                Budget::new(0, remaining),
                found,
                |acc, item| {
                    let (member, location) = self.decode_member(&item)?;
                    if center.distance_to(&location, Unit::Meters) > radius_meters
                        || !seen.insert(member.clone())
                    {
                        return Ok(Visit::Rejected);
                    }
                    acc.push((member, location));
                    Ok(Visit::Accepted)
                },
            )?;
        }
        Ok(found)
    }

    /// Members within `radius` of an existing member's position
    ///
    /// Empty when `member` does not exist.
    pub fn radius_by_member(
        &self,
        key: &str,
        member: &str,
        radius: f64,
        unit: Unit,
        count: Option<usize>,
    ) -> PartialResult<LocatedMembers> {
        match self.locate(key, member) {
            Ok(Some(center)) => self.radius(key, center, radius, unit, count),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(Partial::new(Vec::new(), e)),
        }
    }
}
