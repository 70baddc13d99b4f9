//! Sorted set command handlers.
//!
//! Point reads map to optional outputs, ranges to `Output::ScoredMembers`,
//! and writes to counts. Multi-request commands report progress made before
//! a failure through [`Error::Interrupted`](crate::Error::Interrupted).

use std::sync::Arc;

use strata_primitives::AddMode;

use crate::bridge::Primitives;
use crate::convert::{convert_partial, convert_result};
use crate::{Output, Result};

// =============================================================================
// Writes
// =============================================================================

/// Handle ZAdd command.
pub fn zadd(p: &Arc<Primitives>, key: String, members: Vec<(String, f64)>, mode: AddMode) -> Result<Output> {
    convert_partial(p.zset.add(&key, members, mode), Output::Uint)
}

/// Handle ZIncrBy command.
pub fn zincrby(p: &Arc<Primitives>, key: String, member: String, delta: f64) -> Result<Output> {
    let score = convert_result(p.zset.incr_by(&key, &member, delta))?;
    Ok(Output::Float(score))
}

/// Handle ZRem command.
pub fn zrem(p: &Arc<Primitives>, key: String, members: Vec<String>) -> Result<Output> {
    convert_partial(p.zset.remove(&key, members), Output::Uint)
}

// =============================================================================
// Point Reads and Counts
// =============================================================================

/// Handle ZScore command.
pub fn zscore(p: &Arc<Primitives>, key: String, member: String) -> Result<Output> {
    let score = convert_result(p.zset.score(&key, &member))?;
    Ok(Output::MaybeFloat(score))
}

/// Handle ZCard command.
pub fn zcard(p: &Arc<Primitives>, key: String) -> Result<Output> {
    let n = convert_result(p.zset.card(&key))?;
    Ok(Output::Uint(n))
}

/// Handle ZCount command.
pub fn zcount(p: &Arc<Primitives>, key: String, min: f64, max: f64) -> Result<Output> {
    let n = convert_result(p.zset.count_by_score(&key, min, max))?;
    Ok(Output::Uint(n))
}

/// Handle ZLexCount command.
pub fn zlexcount(p: &Arc<Primitives>, key: String, min: String, max: String) -> Result<Output> {
    let n = convert_result(p.zset.count_by_lex(&key, &min, &max))?;
    Ok(Output::Uint(n))
}

/// Handle ZRank and ZRevRank commands.
pub fn zrank(p: &Arc<Primitives>, key: String, member: String, reverse: bool) -> Result<Output> {
    let rank = if reverse {
        p.zset.rev_rank(&key, &member)
    } else {
        p.zset.rank(&key, &member)
    };
    Ok(Output::MaybeUint(convert_result(rank)?))
}

// =============================================================================
// Ranges
// =============================================================================

/// Handle ZRange and ZRevRange commands.
pub fn zrange(p: &Arc<Primitives>, key: String, start: i64, stop: i64, reverse: bool) -> Result<Output> {
    let result = if reverse {
        p.zset.rev_range(&key, start, stop)
    } else {
        p.zset.range(&key, start, stop)
    };
    convert_partial(result, Output::ScoredMembers)
}

/// Handle ZRangeByScore command.
pub fn zrange_by_score(
    p: &Arc<Primitives>,
    key: String,
    min: f64,
    max: f64,
    offset: usize,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(
        p.zset.range_by_score(&key, min, max, offset, count),
        Output::ScoredMembers,
    )
}

/// Handle ZRevRangeByScore command.
pub fn zrev_range_by_score(
    p: &Arc<Primitives>,
    key: String,
    max: f64,
    min: f64,
    offset: usize,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(
        p.zset.rev_range_by_score(&key, max, min, offset, count),
        Output::ScoredMembers,
    )
}

/// Handle ZRangeByLex command.
pub fn zrange_by_lex(
    p: &Arc<Primitives>,
    key: String,
    min: String,
    max: String,
    offset: usize,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(
        p.zset.range_by_lex(&key, &min, &max, offset, count),
        Output::ScoredMembers,
    )
}

/// Handle ZRevRangeByLex command.
pub fn zrev_range_by_lex(
    p: &Arc<Primitives>,
    key: String,
    max: String,
    min: String,
    offset: usize,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(
        p.zset.rev_range_by_lex(&key, &max, &min, offset, count),
        Output::ScoredMembers,
    )
}

// =============================================================================
// Pops and Range Removal
// =============================================================================

/// Handle ZPopMin and ZPopMax commands.
pub fn zpop(p: &Arc<Primitives>, key: String, count: usize, max: bool) -> Result<Output> {
    let result = if max {
        p.zset.pop_max(&key, count)
    } else {
        p.zset.pop_min(&key, count)
    };
    convert_partial(result, Output::ScoredMembers)
}

/// Handle ZRemRangeByScore command.
pub fn zrem_range_by_score(p: &Arc<Primitives>, key: String, min: f64, max: f64) -> Result<Output> {
    convert_partial(p.zset.rem_range_by_score(&key, min, max), Output::Uint)
}

/// Handle ZRemRangeByLex command.
pub fn zrem_range_by_lex(p: &Arc<Primitives>, key: String, min: String, max: String) -> Result<Output> {
    convert_partial(p.zset.rem_range_by_lex(&key, &min, &max), Output::Uint)
}

/// Handle ZRemRangeByRank command.
pub fn zrem_range_by_rank(p: &Arc<Primitives>, key: String, start: i64, stop: i64) -> Result<Output> {
    convert_partial(p.zset.rem_range_by_rank(&key, start, stop), Output::Uint)
}

// =============================================================================
// Set Algebra
// =============================================================================

/// Handle ZUnionStore command.
pub fn zunionstore(p: &Arc<Primitives>, destination: String, keys: Vec<String>) -> Result<Output> {
    let n = convert_result(p.zset.union_store(&destination, &keys))?;
    Ok(Output::Uint(n))
}

/// Handle ZInterStore command.
pub fn zinterstore(p: &Arc<Primitives>, destination: String, keys: Vec<String>) -> Result<Output> {
    let n = convert_result(p.zset.inter_store(&destination, &keys))?;
    Ok(Output::Uint(n))
}
