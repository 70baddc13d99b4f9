//! The Executor - single entry point to the collection primitives.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! appropriate primitive operations and converts results to outputs.

use std::sync::Arc;

use strata_core::{Store, TableConfig};
use tracing::{debug, warn};

use crate::bridge::Primitives;
use crate::handlers::{geo, zset};
use crate::{Command, Output, Result};

/// The command executor - single entry point to the collection primitives.
///
/// The Executor is **stateless**: it holds the primitives, which hold only
/// the store handle and table layout. All state lives in the store.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use strata_executor::{Command, Executor, TableConfig};
///
/// let executor = Executor::new(store, TableConfig::default());
///
/// // Single command execution
/// let result = executor.execute(Command::ZScore {
///     key: "board".into(),
///     member: "alice".into(),
/// })?;
///
/// // Batch execution
/// let results = executor.execute_many(vec![
///     Command::ZCard { key: "board".into() },
///     Command::ZRank { key: "board".into(), member: "alice".into() },
/// ]);
/// ```
#[derive(Clone)]
pub struct Executor {
    primitives: Arc<Primitives>,
}

impl Executor {
    /// Create a new executor over `store` with the given table layout.
    pub fn new(store: Arc<dyn Store>, config: TableConfig) -> Self {
        Self {
            primitives: Arc::new(Primitives::new(store, config)),
        }
    }

    /// Table layout in use.
    pub fn config(&self) -> &TableConfig {
        self.primitives.zset.config()
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(target: "strata::executor", command = name, write = cmd.is_write(), "Executing");
        let result = self.dispatch(cmd);
        if let Err(e) = &result {
            warn!(target: "strata::executor", command = name, error = %e, "Command failed");
        }
        result
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        let p = &self.primitives;
        match cmd {
            // Sorted set commands
            Command::ZAdd { key, members, mode } => zset::zadd(p, key, members, mode),
            Command::ZScore { key, member } => zset::zscore(p, key, member),
            Command::ZCard { key } => zset::zcard(p, key),
            Command::ZCount { key, min, max } => zset::zcount(p, key, min, max),
            Command::ZLexCount { key, min, max } => zset::zlexcount(p, key, min, max),
            Command::ZIncrBy { key, member, delta } => zset::zincrby(p, key, member, delta),
            Command::ZRank { key, member } => zset::zrank(p, key, member, false),
            Command::ZRevRank { key, member } => zset::zrank(p, key, member, true),
            Command::ZRange { key, start, stop } => zset::zrange(p, key, start, stop, false),
            Command::ZRevRange { key, start, stop } => zset::zrange(p, key, start, stop, true),
            Command::ZRangeByScore {
                key,
                min,
                max,
                offset,
                count,
            } => zset::zrange_by_score(p, key, min, max, offset, count),
            Command::ZRevRangeByScore {
                key,
                max,
                min,
                offset,
                count,
            } => zset::zrev_range_by_score(p, key, max, min, offset, count),
            Command::ZRangeByLex {
                key,
                min,
                max,
                offset,
                count,
            } => zset::zrange_by_lex(p, key, min, max, offset, count),
            Command::ZRevRangeByLex {
                key,
                max,
                min,
                offset,
                count,
            } => zset::zrev_range_by_lex(p, key, max, min, offset, count),
            Command::ZRem { key, members } => zset::zrem(p, key, members),
            Command::ZPopMin { key, count } => zset::zpop(p, key, count, false),
            Command::ZPopMax { key, count } => zset::zpop(p, key, count, true),
            Command::ZRemRangeByScore { key, min, max } => zset::zrem_range_by_score(p, key, min, max),
            Command::ZRemRangeByLex { key, min, max } => zset::zrem_range_by_lex(p, key, min, max),
            Command::ZRemRangeByRank { key, start, stop } => {
                zset::zrem_range_by_rank(p, key, start, stop)
            }
            Command::ZUnionStore { destination, keys } => zset::zunionstore(p, destination, keys),
            Command::ZInterStore { destination, keys } => zset::zinterstore(p, destination, keys),

            // Geo commands
            Command::GeoAdd { key, members } => geo::geoadd(p, key, members),
            Command::GeoPos { key, members } => geo::geopos(p, key, members),
            Command::GeoDist {
                key,
                member1,
                member2,
                unit,
            } => geo::geodist(p, key, member1, member2, unit),
            Command::GeoHash { key, members } => geo::geohash(p, key, members),
            Command::GeoRadius {
                key,
                center,
                radius,
                unit,
                count,
            } => geo::georadius(p, key, center, radius, unit, count),
            Command::GeoRadiusByMember {
                key,
                member,
                radius,
                unit,
                count,
            } => geo::georadius_by_member(p, key, member, radius, unit, count),

            // Database commands
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Returns all results in the same order as the input commands.
    /// Execution continues even if some commands fail.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let results = executor.execute_many(vec![cmd1, cmd2, cmd3]);
    /// // results[0] corresponds to cmd1, etc.
    /// ```
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }
}
