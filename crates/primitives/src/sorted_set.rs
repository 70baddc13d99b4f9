//! SortedSet: score-ordered collections over a wide-column store
//!
//! ## Layout
//!
//! One item per member:
//!
//! | Attribute | Holds |
//! |-----------|-------|
//! | partition key | collection key |
//! | sort key | member name (lexicographic order) |
//! | secondary key | encoded score (see [`crate::lexical`]) |
//!
//! Score-ordered reads go through the local secondary index over the
//! secondary key; lexicographic reads use the primary sort key. Members with
//! equal scores are ordered by name in both directions.
//!
//! ## Atomicity
//!
//! Each member write is atomic on its own. Multi-member operations are
//! sequences of single-item writes: a failure part-way leaves the earlier
//! writes applied and reports them through [`Partial`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_core::{
    AttributeValue, Condition, DeleteRequest, Direction, Error, GetRequest, Item, ItemKey,
    KeyRange, Partial, PartialResult, QueryRequest, Result, Store, TableConfig,
    UpdateExpression, UpdateRequest,
};
use tracing::{debug, warn};

use crate::cursor::{Budget, RangeCursor, Visit};
use crate::lexical::{decode_score, encode_score};

/// Members with their scores, in the order a range produced them
pub type ScoredMembers = Vec<(String, f64)>;

/// Existence precondition for [`SortedSet::add`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddMode {
    /// Insert or overwrite
    #[default]
    Upsert,
    /// Only add members that are not already present
    OnlyIfAbsent,
    /// Only update members that are already present
    OnlyIfPresent,
}

/// Outcome of one optimistic increment attempt
#[derive(Debug)]
enum Attempt {
    Success(f64),
    Conflict,
    Fatal(Error),
}

/// Which sort attribute a range is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Score,
    Lex,
}

/// Sorted sets stored one item per member
///
/// ## Example
///
/// ```rust,ignore
/// use strata_primitives::{AddMode, SortedSet};
///
/// let zset = SortedSet::new(store.clone(), TableConfig::default());
/// zset.add("board", [("alice", 10.0), ("bob", 7.5)], AddMode::Upsert)?;
/// assert_eq!(zset.range("board", 0, -1)?[0].0, "bob");
/// ```
#[derive(Clone)]
pub struct SortedSet {
    store: Arc<dyn Store>,
    config: TableConfig,
}

impl SortedSet {
    /// Create a facade over `store` using `config` for the table layout
    pub fn new(store: Arc<dyn Store>, config: TableConfig) -> Self {
        Self { store, config }
    }

    /// Table layout in use
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn item_key(&self, key: &str, member: &str) -> ItemKey {
        ItemKey::new(key, member)
    }

    fn query(&self, key: &str, axis: Axis) -> QueryRequest {
        let index = match axis {
            Axis::Score => Some(self.config.secondary_index.clone()),
            Axis::Lex => None,
        };
        QueryRequest::new(&self.config.table, key)
            .on_index(index)
            .with_consistent(self.config.consistent_reads)
    }

    fn score_value(score: f64) -> Result<AttributeValue> {
        encode_score(score).map(AttributeValue::String)
    }

    fn lex_value(bound: &str) -> Option<AttributeValue> {
        (!bound.is_empty()).then(|| AttributeValue::from(bound))
    }

    fn decode_member(&self, item: &Item) -> Result<(String, f64)> {
        let member = item.require_str(&self.config.sort_key)?.to_string();
        let score = decode_score(item.require_str(&self.config.secondary_key)?)?;
        Ok((member, score))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Add members or update their scores
    ///
    /// Returns how many members were written. Members skipped because of
    /// `mode` are not counted. All scores are validated before the first
    /// write, so a NaN score leaves the collection untouched.
    ///
    /// # Errors
    ///
    /// `InvalidScore` before any write; otherwise the first store failure,
    /// with the count of members written before it.
    pub fn add<I, M>(&self, key: &str, members: I, mode: AddMode) -> PartialResult<u64>
    where
        I: IntoIterator<Item = (M, f64)>,
        M: AsRef<str>,
    {
        let mut encoded = Vec::new();
        for (member, score) in members {
            let value = Self::score_value(score).map_err(|e| Partial::new(0, e))?;
            encoded.push((member, value));
        }

        let mut written = 0u64;
        for (member, value) in encoded {
            let member = member.as_ref();
            let mut expression = UpdateExpression::new().set(&self.config.secondary_key, value);
            match mode {
                AddMode::Upsert => {}
                AddMode::OnlyIfAbsent => {
                    expression = expression.when(Condition::not_exists(&self.config.partition_key))
                }
                AddMode::OnlyIfPresent => {
                    expression = expression.when(Condition::exists(&self.config.partition_key))
                }
            }
            let request = UpdateRequest {
                table: self.config.table.clone(),
                key: self.item_key(key, member),
                expression,
            };
            match self.store.update_item(&request) {
                Ok(()) => written += 1,
                Err(Error::ConditionFailed) => {
                    debug!(target: "strata::zset", key, member, ?mode, "Add skipped by mode");
                }
                Err(e) => return Err(Partial::new(written, e)),
            }
        }

        debug!(target: "strata::zset", key, written, "Added members");
        Ok(written)
    }

    /// Increment a member's score, creating it at `delta` if absent
    ///
    /// Read, compute, then write conditioned on the score still being the
    /// one that was read. A lost race retries from the read, up to
    /// `increment_attempts` times in total.
    ///
    /// # Errors
    ///
    /// `Contention` once every attempt lost its race; `InvalidScore` if the
    /// delta or the resulting score is NaN.
    pub fn incr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        if delta.is_nan() {
            return Err(Error::InvalidScore(delta));
        }

        let attempts = self.config.increment_attempts;
        for attempt in 1..=attempts {
            match self.try_increment(key, member, delta) {
                Attempt::Success(score) => return Ok(score),
                Attempt::Conflict => {
                    debug!(target: "strata::zset", key, member, attempt, "Increment lost a race");
                }
                Attempt::Fatal(e) => return Err(e),
            }
        }

        warn!(target: "strata::zset", key, member, attempts, "Increment gave up");
        Err(Error::Contention {
            key: key.to_string(),
            member: member.to_string(),
        })
    }

    fn try_increment(&self, key: &str, member: &str, delta: f64) -> Attempt {
        let current = match self.read_score(key, member) {
            Ok(current) => current,
            Err(e) => return Attempt::Fatal(e),
        };

        let (new_score, condition) = match current {
            Some((raw, score)) => (
                score + delta,
                Condition::equals(&self.config.secondary_key, raw),
            ),
            None => (delta, Condition::not_exists(&self.config.secondary_key)),
        };
        let value = match Self::score_value(new_score) {
            Ok(value) => value,
            Err(e) => return Attempt::Fatal(e),
        };

        let request = UpdateRequest {
            table: self.config.table.clone(),
            key: self.item_key(key, member),
            expression: UpdateExpression::new()
                .set(&self.config.secondary_key, value)
                .when(condition),
        };
        match self.store.update_item(&request) {
            Ok(()) => Attempt::Success(new_score),
            Err(Error::ConditionFailed) => Attempt::Conflict,
            Err(e) => Attempt::Fatal(e),
        }
    }

    /// Remove members; returns how many existed
    ///
    /// # Errors
    ///
    /// The first store failure, with the count removed before it.
    pub fn remove<I, M>(&self, key: &str, members: I) -> PartialResult<u64>
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        let mut removed = 0u64;
        for member in members {
            match self.delete_member(key, member.as_ref()) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => return Err(Partial::new(removed, e)),
            }
        }
        debug!(target: "strata::zset", key, removed, "Removed members");
        Ok(removed)
    }

    /// Delete one member; `false` if it was already gone
    fn delete_member(&self, key: &str, member: &str) -> Result<bool> {
        let request = DeleteRequest {
            table: self.config.table.clone(),
            key: self.item_key(key, member),
            conditions: vec![Condition::exists(&self.config.partition_key)],
        };
        match self.store.delete_item(&request) {
            Ok(()) => Ok(true),
            Err(Error::ConditionFailed) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Point reads and counts
    // ========================================================================

    /// Score of a member, `None` if absent
    pub fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(self.read_score(key, member)?.map(|(_, score)| score))
    }

    /// Stored score attribute and its decoded value
    fn read_score(&self, key: &str, member: &str) -> Result<Option<(AttributeValue, f64)>> {
        let request = GetRequest {
            table: self.config.table.clone(),
            key: self.item_key(key, member),
            projection: vec![self.config.secondary_key.clone()],
            consistent: self.config.consistent_reads,
        };
        let Some(item) = self.store.get_item(&request)? else {
            return Ok(None);
        };
        match item.get(&self.config.secondary_key) {
            None => Ok(None),
            Some(raw) => {
                let score = decode_score(item.require_str(&self.config.secondary_key)?)?;
                Ok(Some((raw.clone(), score)))
            }
        }
    }

    /// Number of members
    pub fn card(&self, key: &str) -> Result<u64> {
        RangeCursor::new(&*self.store, self.query(key, Axis::Lex)).count()
    }

    /// Members with `min <= score <= max`
    pub fn count_by_score(&self, key: &str, min: f64, max: f64) -> Result<u64> {
        let range = KeyRange::Between(Self::score_value(min)?, Self::score_value(max)?);
        RangeCursor::new(&*self.store, self.query(key, Axis::Score).with_range(Some(range)))
            .count()
    }

    /// Members with `min <= name <= max`; an empty bound is open
    pub fn count_by_lex(&self, key: &str, min: &str, max: &str) -> Result<u64> {
        let range = KeyRange::from_bounds(Self::lex_value(min), Self::lex_value(max));
        RangeCursor::new(&*self.store, self.query(key, Axis::Lex).with_range(range)).count()
    }

    /// Zero-based position of a member in ascending score order
    pub fn rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.rank_in(key, member, Direction::Forward)
    }

    /// Zero-based position of a member in descending score order
    pub fn rev_rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.rank_in(key, member, Direction::Reverse)
    }

    fn rank_in(&self, key: &str, member: &str, direction: Direction) -> Result<Option<u64>> {
        let Some((raw, _)) = self.read_score(key, member)? else {
            return Ok(None);
        };

        // Everything up to and including the member's score...
        let range = if direction.is_forward() {
            KeyRange::AtMost(raw.clone())
        } else {
            KeyRange::AtLeast(raw.clone())
        };
        let through = RangeCursor::new(&*self.store, self.query(key, Axis::Score).with_range(Some(range)))
            .count()?;

        // ...minus the tied members that come after it
        let ties = self
            .query(key, Axis::Score)
            .with_range(Some(KeyRange::Between(raw.clone(), raw)));
        let later = RangeCursor::new(&*self.store, ties)
            .collect(Budget::all(), 0u64, |later, item| {
                let name = item.require_str(&self.config.sort_key)?;
                let after = if direction.is_forward() {
                    name > member
                } else {
                    name < member
                };
                if after {
                    *later += 1;
                }
                Ok(Visit::Accepted)
            })
            .map_err(Error::from)?;

        Ok(Some(through.saturating_sub(later + 1)))
    }

    // ========================================================================
    // Ranges
    // ========================================================================

    fn scan(
        &self,
        key: &str,
        axis: Axis,
        range: Option<KeyRange>,
        direction: Direction,
        budget: Budget,
    ) -> PartialResult<ScoredMembers> {
        let request = self.query(key, axis).with_range(range).with_direction(direction);
        RangeCursor::new(&*self.store, request).collect(budget, Vec::new(), |acc, item| {
            acc.push(self.decode_member(&item)?);
            Ok(Visit::Accepted)
        })
    }

    fn score_range(min: f64, max: f64) -> Result<Option<KeyRange>> {
        let low = Self::score_value(min)?;
        let high = Self::score_value(max)?;
        Ok(Some(KeyRange::Between(low, high)))
    }

    /// Members with `min <= score <= max`, ascending
    ///
    /// `offset` matches are skipped; `count` of `None` or `Some(0)` returns
    /// all remaining matches.
    pub fn range_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: Option<usize>,
    ) -> PartialResult<ScoredMembers> {
        let range = Self::score_range(min, max).map_err(|e| Partial::new(Vec::new(), e))?;
        self.scan(key, Axis::Score, range, Direction::Forward, Budget::new(offset, count))
    }

    /// Members with `min <= score <= max`, descending
    pub fn rev_range_by_score(
        &self,
        key: &str,
        max: f64,
        min: f64,
        offset: usize,
        count: Option<usize>,
    ) -> PartialResult<ScoredMembers> {
        let range = Self::score_range(min, max).map_err(|e| Partial::new(Vec::new(), e))?;
        self.scan(key, Axis::Score, range, Direction::Reverse, Budget::new(offset, count))
    }

    /// Members with `min <= name <= max`, ascending by name
    ///
    /// An empty bound is open on that side.
    pub fn range_by_lex(
        &self,
        key: &str,
        min: &str,
        max: &str,
        offset: usize,
        count: Option<usize>,
    ) -> PartialResult<ScoredMembers> {
        let range = KeyRange::from_bounds(Self::lex_value(min), Self::lex_value(max));
        self.scan(key, Axis::Lex, range, Direction::Forward, Budget::new(offset, count))
    }

    /// Members with `min <= name <= max`, descending by name
    pub fn rev_range_by_lex(
        &self,
        key: &str,
        max: &str,
        min: &str,
        offset: usize,
        count: Option<usize>,
    ) -> PartialResult<ScoredMembers> {
        let range = KeyRange::from_bounds(Self::lex_value(min), Self::lex_value(max));
        self.scan(key, Axis::Lex, range, Direction::Reverse, Budget::new(offset, count))
    }

    /// Members by rank in ascending score order, inclusive
    ///
    /// Negative ranks count from the end: `-1` is the highest score.
    pub fn range(&self, key: &str, start: i64, stop: i64) -> PartialResult<ScoredMembers> {
        self.rank_range(key, start, stop, Direction::Forward)
    }

    /// Members by rank in descending score order, inclusive
    pub fn rev_range(&self, key: &str, start: i64, stop: i64) -> PartialResult<ScoredMembers> {
        self.rank_range(key, start, stop, Direction::Reverse)
    }

    fn rank_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> PartialResult<ScoredMembers> {
        // Clamp so `-stop` cannot overflow; -i64::MAX is past the end of any set
        let mut start = start.max(-i64::MAX);
        let stop = stop.max(-i64::MAX);
        if start < 0 && stop >= 0 {
            let card = self.card(key).map_err(|e| Partial::new(Vec::new(), e))?;
            start = (card as i64 + start).max(0);
        }

        if start >= 0 && stop >= 0 {
            if stop < start {
                return Ok(Vec::new());
            }
            let budget = Budget::new(to_usize(start), Some(span(start, stop)));
            return self.scan(key, Axis::Score, None, direction, budget);
        }

        if start < 0 && stop < 0 {
            if stop < start {
                return Ok(Vec::new());
            }
            // Same window counted from the other end
            let budget = Budget::new(to_usize(-stop - 1), Some(span(start, stop)));
            let reverse = |mut members: ScoredMembers| {
                members.reverse();
                members
            };
            return self
                .scan(key, Axis::Score, None, direction.flip(), budget)
                .map(reverse)
                .map_err(|partial| partial.map(reverse));
        }

        // start >= 0, stop < 0: find the member at `stop`, then walk up to it
        let tail = self.scan(
            key,
            Axis::Score,
            None,
            direction.flip(),
            Budget::new(to_usize(-stop - 1), Some(1)),
        )
        .map_err(|partial| partial.map(|_| Vec::new()))?;
        let Some((tail_member, tail_score)) = tail.into_iter().next() else {
            return Ok(Vec::new());
        };
        let bound = Self::score_value(tail_score).map_err(|e| Partial::new(Vec::new(), e))?;
        let range = if direction.is_forward() {
            KeyRange::AtMost(bound)
        } else {
            KeyRange::AtLeast(bound)
        };

        let request = self
            .query(key, Axis::Score)
            .with_range(Some(range))
            .with_direction(direction);
        let mut position = 0i64;
        RangeCursor::new(&*self.store, request).collect(Budget::all(), Vec::new(), |acc, item| {
            let (member, score) = self.decode_member(&item)?;
            let is_tail = member == tail_member;
            if position >= start {
                acc.push((member, score));
            }
            position += 1;
            Ok(if is_tail { Visit::Stop } else { Visit::Accepted })
        })
    }

    // ========================================================================
    // Pops and range removal
    // ========================================================================

    /// Remove and return up to `count` members with the lowest scores
    ///
    /// Not atomic: members read here may be changed by another writer before
    /// they are removed.
    pub fn pop_min(&self, key: &str, count: usize) -> PartialResult<ScoredMembers> {
        self.pop(key, count, Direction::Forward)
    }

    /// Remove and return up to `count` members with the highest scores
    pub fn pop_max(&self, key: &str, count: usize) -> PartialResult<ScoredMembers> {
        self.pop(key, count, Direction::Reverse)
    }

    fn pop(&self, key: &str, count: usize, direction: Direction) -> PartialResult<ScoredMembers> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let candidates = self
            .scan(key, Axis::Score, None, direction, Budget::first(count))
            .map_err(|partial| partial.map(|_| Vec::new()))?;
        // Only members this call deleted count as popped
        let mut popped = Vec::with_capacity(candidates.len());
        for (member, score) in candidates {
            match self.delete_member(key, &member) {
                Ok(true) => popped.push((member, score)),
                Ok(false) => {}
                Err(e) => return Err(Partial::new(popped, e)),
            }
        }
        debug!(target: "strata::zset", key, popped = popped.len(), "Popped members");
        Ok(popped)
    }

    fn remove_scanned(&self, key: &str, scanned: PartialResult<ScoredMembers>) -> PartialResult<u64> {
        let members = scanned.map_err(|partial| partial.map(|_| 0))?;
        let names: Vec<&str> = members.iter().map(|(m, _)| m.as_str()).collect();
        self.remove(key, names)
    }

    /// Remove members with `min <= score <= max`; returns how many
    pub fn rem_range_by_score(&self, key: &str, min: f64, max: f64) -> PartialResult<u64> {
        self.remove_scanned(key, self.range_by_score(key, min, max, 0, None))
    }

    /// Remove members with `min <= name <= max`; returns how many
    pub fn rem_range_by_lex(&self, key: &str, min: &str, max: &str) -> PartialResult<u64> {
        self.remove_scanned(key, self.range_by_lex(key, min, max, 0, None))
    }

    /// Remove members by ascending rank, inclusive; returns how many
    pub fn rem_range_by_rank(&self, key: &str, start: i64, stop: i64) -> PartialResult<u64> {
        self.remove_scanned(key, self.range(key, start, stop))
    }

    // ========================================================================
    // Set algebra
    // ========================================================================

    /// Store the union of `keys` into `destination`
    ///
    /// # Errors
    ///
    /// Always `Unsupported`: there is no cross-partition write to build it on.
    pub fn union_store(&self, destination: &str, keys: &[String]) -> Result<u64> {
        debug!(target: "strata::zset", destination, sources = keys.len(), "Union requested");
        Err(Error::Unsupported("ZUNIONSTORE"))
    }

    /// Store the intersection of `keys` into `destination`
    ///
    /// # Errors
    ///
    /// Always `Unsupported`.
    pub fn inter_store(&self, destination: &str, keys: &[String]) -> Result<u64> {
        debug!(target: "strata::zset", destination, sources = keys.len(), "Intersection requested");
        Err(Error::Unsupported("ZINTERSTORE"))
    }
}

/// Nonnegative rank as an offset, saturating on narrow targets
fn to_usize(rank: i64) -> usize {
    usize::try_from(rank).unwrap_or(usize::MAX)
}

/// Members in `start..=stop`; both ranks share a sign and `start <= stop`
fn span(start: i64, stop: i64) -> usize {
    to_usize(stop - start).saturating_add(1)
}
