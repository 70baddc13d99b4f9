//! Fault injection for engine tests
//!
//! `FaultyStore` wraps another store and fails selected requests on demand:
//!
//! - **Forced condition failures**: the next N conditional updates report
//!   `ConditionFailed` without being applied (simulates a concurrent writer)
//! - **Store failures**: queries, updates or deletes start failing with
//!   `Error::Store` after a given number of successful calls
//!
//! Every request is counted so tests can assert how many round trips an
//! operation made.
//!
//! # Example
//!
//! ```ignore
//! use strata_storage::testing::FaultyStore;
//!
//! let store = FaultyStore::new(MemoryStore::with_config(&config));
//! store.fail_conditional_updates(3);
//! assert!(matches!(zset.incr_by("z", "m", 1.0), Err(Error::Contention { .. })));
//! assert_eq!(store.calls().updates, 3);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use strata_core::{
    DeleteRequest, Error, GetRequest, Item, QueryPage, QueryRequest, Result, Store, UpdateRequest,
};

/// Request counters recorded by [`FaultyStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `get_item` calls
    pub gets: usize,
    /// `update_item` calls
    pub updates: usize,
    /// `delete_item` calls
    pub deletes: usize,
    /// `query` calls
    pub queries: usize,
}

/// Store wrapper that injects failures
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    forced_condition_failures: AtomicUsize,
    queries_before_failure: AtomicUsize,
    updates_before_failure: AtomicUsize,
    deletes_before_failure: AtomicUsize,
    gets: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    queries: AtomicUsize,
}

const NEVER: usize = usize::MAX;

impl<S: Store> FaultyStore<S> {
    /// Wrap a store; no faults are armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            forced_condition_failures: AtomicUsize::new(0),
            queries_before_failure: AtomicUsize::new(NEVER),
            updates_before_failure: AtomicUsize::new(NEVER),
            deletes_before_failure: AtomicUsize::new(NEVER),
            gets: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail the next `n` conditional updates with `ConditionFailed`
    pub fn fail_conditional_updates(&self, n: usize) {
        self.forced_condition_failures.store(n, Ordering::SeqCst);
    }

    /// Let `n` more queries succeed, then fail every query
    pub fn fail_queries_after(&self, n: usize) {
        self.queries_before_failure.store(n, Ordering::SeqCst);
    }

    /// Let `n` more updates succeed, then fail every update
    pub fn fail_updates_after(&self, n: usize) {
        self.updates_before_failure.store(n, Ordering::SeqCst);
    }

    /// Let `n` more deletes succeed, then fail every delete
    pub fn fail_deletes_after(&self, n: usize) {
        self.deletes_before_failure.store(n, Ordering::SeqCst);
    }

    /// Snapshot of the request counters
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            gets: self.gets.load(Ordering::SeqCst),
            updates: self.updates.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
            queries: self.queries.load(Ordering::SeqCst),
        }
    }

    /// Reset the request counters
    pub fn reset_calls(&self) {
        for counter in [&self.gets, &self.updates, &self.deletes, &self.queries] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

/// Consume one unit of a countdown; true once it has run out
fn exhausted(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
            NEVER => Some(NEVER),
            0 => None,
            n => Some(n - 1),
        })
        .is_err()
}

/// Consume one forced failure if any are left
fn take_one(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

impl<S: Store> Store for FaultyStore<S> {
    fn get_item(&self, request: &GetRequest) -> Result<Option<Item>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(request)
    }

    fn update_item(&self, request: &UpdateRequest) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if exhausted(&self.updates_before_failure) {
            return Err(Error::Store("injected update failure".to_string()));
        }
        if !request.expression.conditions.is_empty() && take_one(&self.forced_condition_failures) {
            return Err(Error::ConditionFailed);
        }
        self.inner.update_item(request)
    }

    fn delete_item(&self, request: &DeleteRequest) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if exhausted(&self.deletes_before_failure) {
            return Err(Error::Store("injected delete failure".to_string()));
        }
        self.inner.delete_item(request)
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryPage> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if exhausted(&self.queries_before_failure) {
            return Err(Error::Store("injected query failure".to_string()));
        }
        self.inner.query(request)
    }
}
