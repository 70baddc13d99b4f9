//! Attribute values for wide-column items
//!
//! This module defines:
//! - AttributeValue: closed tagged variant for every value a store item can hold
//!
//! ## Value Model
//!
//! Six variants, mirroring what a wide-column store accepts:
//! - Null, String, Number, Binary, Set (of strings), Map
//!
//! Numbers are carried as their decimal text, exactly like the store's wire
//! representation, so 64-bit cell identifiers survive without going through
//! a float. Ordering is defined only between values of the same variant;
//! stores order sort attributes with [`AttributeValue::sort_cmp`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::str::FromStr;

/// A single attribute value of a stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null value
    Null,
    /// UTF-8 string
    String(String),
    /// Decimal number in text form
    Number(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Set of strings
    Set(BTreeSet<String>),
    /// Nested attribute map
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Build a Number from anything with a decimal `Display`
    pub fn number(n: impl Display) -> Self {
        AttributeValue::Number(n.to_string())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "Null",
            AttributeValue::String(_) => "String",
            AttributeValue::Number(_) => "Number",
            AttributeValue::Binary(_) => "Binary",
            AttributeValue::Set(_) => "Set",
            AttributeValue::Map(_) => "Map",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Get as a string slice if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the decimal text if this is a Number
    pub fn as_number_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Parse a Number into any numeric type
    ///
    /// Returns `None` when the value is not a Number or does not parse as `T`.
    pub fn parse_number<T: FromStr>(&self) -> Option<T> {
        self.as_number_text().and_then(|n| n.parse().ok())
    }

    /// Get as bytes if this is Binary
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Get the nested map if this is a Map
    pub fn as_map(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            AttributeValue::Map(m) => Some(m),
            _ => None,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            AttributeValue::Null => 0,
            AttributeValue::Binary(_) => 1,
            AttributeValue::Number(_) => 2,
            AttributeValue::String(_) => 3,
            AttributeValue::Set(_) => 4,
            AttributeValue::Map(_) => 5,
        }
    }

    /// Total order used for sort-key and index comparisons
    ///
    /// - Strings compare byte-wise
    /// - Binary compares byte-wise
    /// - Numbers compare numerically (integers exactly, otherwise as f64)
    /// - Different variants order by a fixed variant rank
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttributeValue::String(a), AttributeValue::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (AttributeValue::Binary(a), AttributeValue::Binary(b)) => a.cmp(b),
            (AttributeValue::Number(a), AttributeValue::Number(b)) => compare_numbers(a, b),
            (AttributeValue::Set(a), AttributeValue::Set(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.parse::<i128>(), b.parse::<i128>()) {
        return x.cmp(&y);
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        // Unparseable text sorts after every number
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<u64> for AttributeValue {
    fn from(n: u64) -> Self {
        AttributeValue::number(n)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::number(n)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(b: Vec<u8>) -> Self {
        AttributeValue::Binary(b)
    }
}
