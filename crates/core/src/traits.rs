//! Core store abstraction
//!
//! This module defines the Store trait: the restricted surface of a sparse,
//! wide-column key-value store that engines are built on. It offers point
//! lookups, conditional single-item writes and paged range queries within one
//! partition. There is no ORDER BY and no multi-attribute inequality index.

use crate::error::Result;
use crate::types::{DeleteRequest, GetRequest, Item, QueryPage, QueryRequest, UpdateRequest};

/// Wide-column store surface
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Store: Send + Sync {
    /// Get one item by primary key
    ///
    /// Returns None if the item doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Store` on transport or service failure.
    fn get_item(&self, request: &GetRequest) -> Result<Option<Item>>;

    /// Apply attribute assignments to one item, creating it if absent
    ///
    /// # Errors
    ///
    /// Returns `Error::ConditionFailed` if any precondition does not hold;
    /// the item is left untouched in that case.
    fn update_item(&self, request: &UpdateRequest) -> Result<()>;

    /// Delete one item
    ///
    /// Deleting a missing item without conditions succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConditionFailed` if any precondition does not hold.
    fn delete_item(&self, request: &DeleteRequest) -> Result<()>;

    /// Fetch one page of a partition-scoped range query
    ///
    /// Results are ordered by the sort attribute of the selected index (or
    /// the primary sort key), ties broken by primary sort key. `next` is
    /// `Some` whenever the page stopped because of `limit`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Store` on transport or service failure.
    fn query(&self, request: &QueryRequest) -> Result<QueryPage>;
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn get_item(&self, request: &GetRequest) -> Result<Option<Item>> {
        (**self).get_item(request)
    }

    fn update_item(&self, request: &UpdateRequest) -> Result<()> {
        (**self).update_item(request)
    }

    fn delete_item(&self, request: &DeleteRequest) -> Result<()> {
        (**self).delete_item(request)
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryPage> {
        (**self).query(request)
    }
}
