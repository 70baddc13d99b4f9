//! MemoryStore: in-process wide-column store
//!
//! This module implements the Store trait using:
//! - `BTreeMap<partition, BTreeMap<sort key, Item>>` per table
//! - `parking_lot::RwLock` for thread-safe access
//! - Local secondary indexes evaluated at query time from the partition
//!
//! # Design Notes
//!
//! - **Query surface only**: partition equality plus one sort-attribute range,
//!   on the primary sort key or on one indexed attribute. Nothing else.
//! - **Sparse indexes**: items without the indexed attribute are invisible to
//!   index queries. Equal index values are ordered by sort key.
//! - **Paging**: `limit` bounds the items evaluated per page, optionally
//!   capped by `max_page_items`. A page that stops on its limit always carries
//!   a continuation token, even when nothing follows it.
//! - **Tokens**: hold the key attributes of the last evaluated item and
//!   resume strictly after that position, so deleting the item between pages
//!   is harmless.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::trace;

use strata_core::{
    all_hold, AttributeValue, ContinuationToken, DeleteRequest, Direction, Error, GetRequest,
    Item, ItemKey, QueryPage, QueryRequest, Result, Select, Store, TableConfig, UpdateRequest,
};

/// Key schema of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Partition-key attribute
    pub partition_key: String,
    /// Sort-key attribute
    pub sort_key: String,
    /// Local secondary indexes: index name -> indexed attribute
    pub indexes: BTreeMap<String, String>,
}

impl TableSchema {
    /// Schema with no secondary indexes
    pub fn new(
        name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            indexes: BTreeMap::new(),
        }
    }

    /// Add a local secondary index
    pub fn with_index(mut self, index: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.indexes.insert(index.into(), attribute.into());
        self
    }

    /// Schema matching an engine table layout
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(&config.table, &config.partition_key, &config.sort_key)
            .with_index(&config.secondary_index, &config.secondary_key)
    }

    fn key_item(&self, key: &ItemKey) -> Item {
        Item::new()
            .with(&self.partition_key, AttributeValue::from(key.partition.as_str()))
            .with(&self.sort_key, AttributeValue::from(key.sort.as_str()))
    }
}

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    partitions: BTreeMap<String, BTreeMap<String, Item>>,
}

impl Table {
    fn current(&self, key: &ItemKey) -> Option<&Item> {
        self.partitions
            .get(&key.partition)
            .and_then(|p| p.get(&key.sort))
    }
}

/// Position of an item in the traversal order of one query
struct Position<'a> {
    sort_value: AttributeValue,
    sort_key: &'a str,
    item: &'a Item,
}

fn compare_positions(a_value: &AttributeValue, a_key: &str, b_value: &AttributeValue, b_key: &str) -> Ordering {
    a_value
        .sort_cmp(b_value)
        .then_with(|| a_key.as_bytes().cmp(b_key.as_bytes()))
}

/// In-process store implementing the wide-column surface
///
/// Thread-safe through `parking_lot::RwLock`. Tables must be created before
/// use; requests naming an unknown table fail with `Error::TableNotFound`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    max_page_items: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store without tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one table laid out for the engines
    pub fn with_config(config: &TableConfig) -> Self {
        let store = Self::new();
        store.create_table(TableSchema::from_config(config));
        store
    }

    /// Cap every page at this many items, regardless of the request limit
    ///
    /// Stands in for the size cap a real store applies to each response.
    pub fn with_max_page_items(mut self, max: usize) -> Self {
        self.max_page_items = Some(max.max(1));
        self
    }

    /// Create (or replace) a table
    pub fn create_table(&self, schema: TableSchema) {
        let name = schema.name.clone();
        self.tables.write().insert(
            name,
            Table {
                schema,
                partitions: BTreeMap::new(),
            },
        );
    }

    /// Number of items in one partition of a table
    pub fn partition_len(&self, table: &str, partition: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .and_then(|t| t.partitions.get(partition))
            .map_or(0, |p| p.len())
    }

    fn page_limit(&self, requested: Option<usize>) -> Option<usize> {
        match (requested, self.max_page_items) {
            (Some(r), Some(m)) => Some(r.min(m)),
            (Some(r), None) => Some(r),
            (None, m) => m,
        }
    }
}

impl Store for MemoryStore {
    fn get_item(&self, request: &GetRequest) -> Result<Option<Item>> {
        let tables = self.tables.read();
        let table = tables
            .get(&request.table)
            .ok_or_else(|| Error::TableNotFound(request.table.clone()))?;

        Ok(table.current(&request.key).map(|item| {
            if request.projection.is_empty() {
                item.clone()
            } else {
                item.project(&request.projection)
            }
        }))
    }

    fn update_item(&self, request: &UpdateRequest) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(&request.table)
            .ok_or_else(|| Error::TableNotFound(request.table.clone()))?;

        let schema = &table.schema;
        if let Some((name, _)) = request
            .expression
            .assignments
            .iter()
            .find(|(name, _)| *name == schema.partition_key || *name == schema.sort_key)
        {
            return Err(Error::Store(format!(
                "cannot update key attribute '{}'",
                name
            )));
        }

        if !all_hold(&request.expression.conditions, table.current(&request.key)) {
            trace!(target: "strata::store", table = %request.table, partition = %request.key.partition, sort = %request.key.sort, "Update condition failed");
            return Err(Error::ConditionFailed);
        }

        let key_item = schema.key_item(&request.key);
        let partition = table
            .partitions
            .entry(request.key.partition.clone())
            .or_default();
        let item = partition
            .entry(request.key.sort.clone())
            .or_insert(key_item);
        for (name, value) in &request.expression.assignments {
            item.set(name.clone(), value.clone());
        }
        Ok(())
    }

    fn delete_item(&self, request: &DeleteRequest) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(&request.table)
            .ok_or_else(|| Error::TableNotFound(request.table.clone()))?;

        if !all_hold(&request.conditions, table.current(&request.key)) {
            trace!(target: "strata::store", table = %request.table, partition = %request.key.partition, sort = %request.key.sort, "Delete condition failed");
            return Err(Error::ConditionFailed);
        }

        if let Some(partition) = table.partitions.get_mut(&request.key.partition) {
            partition.remove(&request.key.sort);
            if partition.is_empty() {
                table.partitions.remove(&request.key.partition);
            }
        }
        Ok(())
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryPage> {
        let tables = self.tables.read();
        let table = tables
            .get(&request.table)
            .ok_or_else(|| Error::TableNotFound(request.table.clone()))?;
        let schema = &table.schema;

        let sort_attribute = match &request.index {
            Some(index) => schema
                .indexes
                .get(index)
                .ok_or_else(|| Error::Store(format!("index '{}' not found", index)))?
                .as_str(),
            None => schema.sort_key.as_str(),
        };

        let Some(partition) = table.partitions.get(&request.partition) else {
            return Ok(QueryPage::default());
        };

        let mut positions: Vec<Position<'_>> = partition
            .iter()
            .filter_map(|(sort_key, item)| {
                let sort_value = item.get(sort_attribute)?.clone();
                Some(Position {
                    sort_value,
                    sort_key: sort_key.as_str(),
                    item,
                })
            })
            .filter(|p| {
                request
                    .range
                    .as_ref()
                    .map_or(true, |range| range.contains(&p.sort_value))
            })
            .collect();

        positions.sort_by(|a, b| compare_positions(&a.sort_value, a.sort_key, &b.sort_value, b.sort_key));
        if request.direction == Direction::Reverse {
            positions.reverse();
        }

        if let Some(token) = &request.start_after {
            let last = token.last_evaluated();
            let last_key = last.require_str(&schema.sort_key)?;
            let last_value = if request.index.is_some() {
                last.get(sort_attribute)
                    .cloned()
                    .ok_or_else(|| Error::Store("continuation token does not match index".to_string()))?
            } else {
                AttributeValue::from(last_key)
            };
            positions.retain(|p| {
                let ord = compare_positions(&p.sort_value, p.sort_key, &last_value, last_key);
                match request.direction {
                    Direction::Forward => ord == Ordering::Greater,
                    Direction::Reverse => ord == Ordering::Less,
                }
            });
        }

        let limit = self.page_limit(request.limit);
        let stopped_on_limit = limit.map_or(false, |l| positions.len() >= l);
        if let Some(l) = limit {
            positions.truncate(l);
        }

        let next = if stopped_on_limit {
            positions.last().map(|p| {
                let mut key = schema.key_item(&ItemKey::new(&request.partition, p.sort_key));
                if request.index.is_some() {
                    key.set(sort_attribute, p.sort_value.clone());
                }
                ContinuationToken::new(key)
            })
        } else {
            None
        };

        let count = positions.len();
        let items = match request.select {
            Select::Items => positions.into_iter().map(|p| p.item.clone()).collect(),
            Select::Count => Vec::new(),
        };

        trace!(
            target: "strata::store",
            table = %request.table,
            partition = %request.partition,
            index = ?request.index,
            count,
            more = next.is_some(),
            "Query page"
        );

        Ok(QueryPage { items, count, next })
    }
}
