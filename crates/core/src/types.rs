//! Request and response types for the store surface
//!
//! This module defines:
//! - ItemKey: primary key of an item (partition value + sort value)
//! - Item: attribute map of a stored item
//! - Direction / Select: query traversal and projection
//! - GetRequest, UpdateRequest, DeleteRequest, QueryRequest: store requests
//! - QueryPage / ContinuationToken: one page of query results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::condition::{Condition, KeyRange, UpdateExpression};
use crate::error::{Error, Result};
use crate::value::AttributeValue;

/// Primary key of an item: partition-key value and sort-key value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// Partition-key value (the collection key)
    pub partition: String,
    /// Sort-key value (the member name)
    pub sort: String,
}

impl ItemKey {
    /// Create a new item key
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// Attribute map of a stored item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Item {
    /// Create an empty item
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insertion
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Get an attribute by name
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value)
    }

    /// Check if an attribute is present
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the item has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Keep only the named attributes
    pub fn project(&self, names: &[String]) -> Item {
        Item {
            attributes: self
                .attributes
                .iter()
                .filter(|(k, _)| names.iter().any(|n| n == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Iterate over attributes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }

    /// Get a String attribute, failing with `Corruption` if missing or mistyped
    pub fn require_str(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(AttributeValue::String(s)) => Ok(s),
            Some(other) => Err(Error::corrupt_attribute(
                name,
                format!("expected String, found {}", other.type_name()),
            )),
            None => Err(Error::corrupt_attribute(name, "missing")),
        }
    }

    /// Get a Number attribute parsed as `T`, failing with `Corruption` otherwise
    pub fn require_number<T: std::str::FromStr>(&self, name: &str) -> Result<T> {
        match self.get(name) {
            Some(AttributeValue::Number(text)) => text
                .parse()
                .map_err(|_| Error::corrupt_attribute(name, format!("unparseable number '{}'", text))),
            Some(other) => Err(Error::corrupt_attribute(
                name,
                format!("expected Number, found {}", other.type_name()),
            )),
            None => Err(Error::corrupt_attribute(name, "missing")),
        }
    }
}

impl FromIterator<(String, AttributeValue)> for Item {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Item {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// Traversal direction of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Lowest sort value first
    #[default]
    Forward,
    /// Highest sort value first
    Reverse,
}

impl Direction {
    /// The opposite direction
    pub fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Check if this is ascending traversal
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// What a query returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Select {
    /// Matching items
    #[default]
    Items,
    /// Only the number of matching items
    Count,
}

/// Opaque marker telling the store where the next page resumes
///
/// Holds the key attributes of the last evaluated item. Callers must treat
/// it as opaque and hand it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(Item);

impl ContinuationToken {
    /// Wrap the key attributes of the last evaluated item
    pub fn new(last_evaluated: Item) -> Self {
        Self(last_evaluated)
    }

    /// Key attributes of the last evaluated item
    pub fn last_evaluated(&self) -> &Item {
        &self.0
    }
}

/// Point lookup of one item
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    /// Table name
    pub table: String,
    /// Primary key
    pub key: ItemKey,
    /// Attributes to return (empty = all)
    pub projection: Vec<String>,
    /// Strongly consistent read
    pub consistent: bool,
}

/// Conditional upsert of attributes on one item
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    /// Table name
    pub table: String,
    /// Primary key
    pub key: ItemKey,
    /// Assignments and precondition
    pub expression: UpdateExpression,
}

/// Conditional delete of one item
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    /// Table name
    pub table: String,
    /// Primary key
    pub key: ItemKey,
    /// Precondition evaluated against the current item
    pub conditions: Vec<Condition>,
}

/// Range query within one partition
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Table name
    pub table: String,
    /// Partition-key value (equality)
    pub partition: String,
    /// Secondary index to query; `None` queries the primary sort key
    pub index: Option<String>,
    /// Bound on the sort attribute of the chosen index
    pub range: Option<KeyRange>,
    /// Traversal direction
    pub direction: Direction,
    /// Maximum items evaluated in this page; `None` = store default
    pub limit: Option<usize>,
    /// Resume after this token
    pub start_after: Option<ContinuationToken>,
    /// Items or count
    pub select: Select,
    /// Strongly consistent read
    pub consistent: bool,
}

impl QueryRequest {
    /// Create an unbounded forward item query over one partition
    pub fn new(table: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            partition: partition.into(),
            index: None,
            range: None,
            direction: Direction::Forward,
            limit: None,
            start_after: None,
            select: Select::Items,
            consistent: false,
        }
    }

    /// Query a secondary index instead of the primary sort key
    pub fn on_index(mut self, index: Option<String>) -> Self {
        self.index = index;
        self
    }

    /// Bound the sort attribute
    pub fn with_range(mut self, range: Option<KeyRange>) -> Self {
        self.range = range;
        self
    }

    /// Set traversal direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set projection mode
    pub fn with_select(mut self, select: Select) -> Self {
        self.select = select;
        self
    }

    /// Set read consistency
    pub fn with_consistent(mut self, consistent: bool) -> Self {
        self.consistent = consistent;
        self
    }
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    /// Matching items (empty for `Select::Count`)
    pub items: Vec<Item>,
    /// Number of matching items in this page
    pub count: usize,
    /// Where the next page resumes; `None` when the range is exhausted
    pub next: Option<ContinuationToken>,
}
