//! Core types and traits for ordered collections
//!
//! This crate defines the foundational types used throughout the workspace:
//! - AttributeValue: closed tagged variant for stored attribute values
//! - Item / ItemKey: stored items and their primary keys
//! - Request and page types for the store surface
//! - Condition / KeyRange / UpdateExpression: typed expression builder
//! - Store: the wide-column store trait engines are built on
//! - TableConfig: table layout, loadable from TOML
//! - Error: error type hierarchy, including `Partial` results

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod condition;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types and traits
pub use condition::{all_hold, Condition, KeyRange, UpdateExpression};
pub use config::TableConfig;
pub use error::{Error, Partial, PartialResult, Result};
pub use traits::Store;
pub use types::{
    ContinuationToken, DeleteRequest, Direction, GetRequest, Item, ItemKey, QueryPage,
    QueryRequest, Select, UpdateRequest,
};
pub use value::AttributeValue;
