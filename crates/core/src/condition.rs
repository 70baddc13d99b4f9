//! Typed condition and update expressions
//!
//! Stores accept preconditions, key ranges and assignments as structured
//! values instead of expression strings. A store implementation evaluates
//! them; engines only assemble them.
//!
//! ```ignore
//! let expr = UpdateExpression::new()
//!     .set("sk2", AttributeValue::from(encoded))
//!     .when(Condition::exists("pk"));
//! ```

use crate::types::Item;
use crate::value::AttributeValue;
use std::cmp::Ordering;

/// Precondition on the current state of an item
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The item exists and carries this attribute
    AttributeExists(String),
    /// The item is missing or does not carry this attribute
    AttributeNotExists(String),
    /// The attribute is present and equal to the value
    Equals(String, AttributeValue),
}

impl Condition {
    /// `attribute_exists(name)`
    pub fn exists(name: impl Into<String>) -> Self {
        Condition::AttributeExists(name.into())
    }

    /// `attribute_not_exists(name)`
    pub fn not_exists(name: impl Into<String>) -> Self {
        Condition::AttributeNotExists(name.into())
    }

    /// `name = value`
    pub fn equals(name: impl Into<String>, value: AttributeValue) -> Self {
        Condition::Equals(name.into(), value)
    }

    /// Evaluate against the current item (`None` when it does not exist)
    pub fn evaluate(&self, current: Option<&Item>) -> bool {
        match self {
            Condition::AttributeExists(name) => current.map_or(false, |item| item.contains(name)),
            Condition::AttributeNotExists(name) => !current.map_or(false, |item| item.contains(name)),
            Condition::Equals(name, expected) => {
                current.and_then(|item| item.get(name)) == Some(expected)
            }
        }
    }
}

/// Check every condition; an empty list always passes
pub fn all_hold(conditions: &[Condition], current: Option<&Item>) -> bool {
    conditions.iter().all(|c| c.evaluate(current))
}

/// Bound on a sort attribute
#[derive(Debug, Clone, PartialEq)]
pub enum KeyRange {
    /// `attr BETWEEN low AND high` (inclusive)
    Between(AttributeValue, AttributeValue),
    /// `attr >= low`
    AtLeast(AttributeValue),
    /// `attr <= high`
    AtMost(AttributeValue),
}

impl KeyRange {
    /// Build a range from optional bounds; `None` when both sides are open
    pub fn from_bounds(low: Option<AttributeValue>, high: Option<AttributeValue>) -> Option<Self> {
        match (low, high) {
            (Some(l), Some(h)) => Some(KeyRange::Between(l, h)),
            (Some(l), None) => Some(KeyRange::AtLeast(l)),
            (None, Some(h)) => Some(KeyRange::AtMost(h)),
            (None, None) => None,
        }
    }

    /// Check if a sort value falls inside the range
    pub fn contains(&self, value: &AttributeValue) -> bool {
        match self {
            KeyRange::Between(low, high) => {
                value.sort_cmp(low) != Ordering::Less && value.sort_cmp(high) != Ordering::Greater
            }
            KeyRange::AtLeast(low) => value.sort_cmp(low) != Ordering::Less,
            KeyRange::AtMost(high) => value.sort_cmp(high) != Ordering::Greater,
        }
    }
}

/// Attribute assignments plus an optional precondition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    /// `SET name = value` assignments
    pub assignments: Vec<(String, AttributeValue)>,
    /// Conditions that must all hold before the write applies
    pub conditions: Vec<Condition>,
}

impl UpdateExpression {
    /// Create an empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `SET name = value` assignment
    pub fn set(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.assignments.push((name.into(), value));
        self
    }

    /// Add a precondition
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}
