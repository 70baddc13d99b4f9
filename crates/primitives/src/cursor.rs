//! Paged range traversal
//!
//! Every range operation walks one partition through repeated store queries.
//! `RangeCursor` owns that loop:
//!
//! - the first `offset` matches are skipped
//! - each remaining item is handed to a visitor that decides whether it
//!   counts toward the requested `count`
//! - each page asks for exactly what is still needed:
//!   `remaining count + offsets still to skip`
//! - traversal stops when the count is reached, the visitor says so, or
//!   the store reports no continuation
//!
//! A failing page does not discard work: the accumulator is returned inside
//! [`Partial`] alongside the error.

use strata_core::{Item, Partial, PartialResult, QueryRequest, Result, Select, Store};
use tracing::trace;

/// Offset and count of a range request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    /// Matches to skip before the first accepted item
    pub offset: usize,
    /// Accepted items to return; `None` = all
    pub count: Option<usize>,
}

impl Budget {
    /// Every match, nothing skipped
    pub fn all() -> Self {
        Self::default()
    }

    /// Skip `offset`, then take `count` (`Some(0)` means all)
    pub fn new(offset: usize, count: Option<usize>) -> Self {
        Self {
            offset,
            count: count.filter(|&c| c > 0),
        }
    }

    /// The first `count` matches
    pub fn first(count: usize) -> Self {
        Self::new(0, Some(count))
    }
}

/// Visitor verdict for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Item was taken; counts toward the budget
    Accepted,
    /// Item was filtered out; does not count
    Rejected,
    /// Stop the traversal now
    Stop,
}

/// Forward-only walk over a store query
pub struct RangeCursor<'a> {
    store: &'a dyn Store,
    request: QueryRequest,
}

impl<'a> RangeCursor<'a> {
    /// Walk the items matched by `request`
    pub fn new(store: &'a dyn Store, request: QueryRequest) -> Self {
        Self { store, request }
    }

    /// Feed matches to `visit` until the budget or the range runs out
    ///
    /// # Errors
    ///
    /// Any store or visitor error stops the walk; the accumulator built so
    /// far comes back in the `Partial`.
    pub fn collect<A, F>(self, budget: Budget, mut acc: A, mut visit: F) -> PartialResult<A>
    where
        F: FnMut(&mut A, Item) -> Result<Visit>,
    {
        let RangeCursor { store, mut request } = self;
        request.select = Select::Items;

        let mut skipped = 0usize;
        let mut accepted = 0usize;
        let mut pages = 0usize;

        loop {
            request.limit = budget
                .count
                .map(|count| (count - accepted).saturating_add(budget.offset - skipped));

            let page = match store.query(&request) {
                Ok(page) => page,
                Err(e) => return Err(Partial::new(acc, e)),
            };
            pages += 1;
            trace!(
                target: "strata::cursor",
                partition = %request.partition,
                page = pages,
                items = page.items.len(),
                more = page.next.is_some(),
                "Fetched page"
            );

            for item in page.items {
                if skipped < budget.offset {
                    skipped += 1;
                    continue;
                }
                match visit(&mut acc, item) {
                    Ok(Visit::Accepted) => accepted += 1,
                    Ok(Visit::Rejected) => {}
                    Ok(Visit::Stop) => return Ok(acc),
                    Err(e) => return Err(Partial::new(acc, e)),
                }
                if budget.count == Some(accepted) {
                    return Ok(acc);
                }
            }

            match page.next {
                Some(token) => request.start_after = Some(token),
                None => return Ok(acc),
            }
        }
    }

    /// Count every match, following continuations to the end
    pub fn count(self) -> Result<u64> {
        let RangeCursor { store, mut request } = self;
        request.select = Select::Count;
        request.limit = None;

        let mut total = 0u64;
        loop {
            let page = store.query(&request)?;
            total += page.count as u64;
            match page.next {
                Some(token) => request.start_after = Some(token),
                None => return Ok(total),
            }
        }
    }
}
