//! Command enum defining all executor operations.
//!
//! Commands are the "instruction set" of the executor. Every operation a
//! client can perform is one variant here, named after the classic command
//! it mirrors (`ZAdd` for ZADD, `GeoRadius` for GEORADIUS).
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON for cross-language use
//! - **Typed**: Scores are `f64`, positions are [`Location`]s
//!
//! Optional fields carry `#[serde(default)]` so SDKs may omit them.

use serde::{Deserialize, Serialize};
use strata_primitives::{AddMode, Location, Unit};

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Sorted Set | 22 | Scores, ranks, ranges, pops and range removal |
/// | Geo | 6 | Positions, distances, geohashes and radius search |
/// | Database | 1 | Liveness |
///
/// # Example
///
/// ```text
/// use strata_executor::{Command, AddMode};
///
/// let cmd = Command::ZAdd {
///     key: "board".into(),
///     members: vec![("alice".into(), 10.0)],
///     mode: AddMode::Upsert,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Sorted Set (22) ====================
    /// Add members or update their scores.
    /// Returns: `Output::Uint` (members written)
    ZAdd {
        /// Collection key
        key: String,
        /// Members and scores
        members: Vec<(String, f64)>,
        /// Existence precondition per member
        #[serde(default)]
        mode: AddMode,
    },

    /// Score of one member.
    /// Returns: `Output::MaybeFloat`
    ZScore {
        /// Collection key
        key: String,
        /// Member name
        member: String,
    },

    /// Number of members.
    /// Returns: `Output::Uint`
    ZCard {
        /// Collection key
        key: String,
    },

    /// Number of members with `min <= score <= max`.
    /// Returns: `Output::Uint`
    ZCount {
        /// Collection key
        key: String,
        /// Lowest score, inclusive
        min: f64,
        /// Highest score, inclusive
        max: f64,
    },

    /// Number of members with `min <= name <= max`; empty bounds are open.
    /// Returns: `Output::Uint`
    ZLexCount {
        /// Collection key
        key: String,
        /// Lowest name, inclusive
        #[serde(default)]
        min: String,
        /// Highest name, inclusive
        #[serde(default)]
        max: String,
    },

    /// Add `delta` to a member's score, creating it if needed.
    /// Returns: `Output::Float` (new score)
    ZIncrBy {
        /// Collection key
        key: String,
        /// Member name
        member: String,
        /// Amount to add
        delta: f64,
    },

    /// Zero-based rank in ascending score order.
    /// Returns: `Output::MaybeUint`
    ZRank {
        /// Collection key
        key: String,
        /// Member name
        member: String,
    },

    /// Zero-based rank in descending score order.
    /// Returns: `Output::MaybeUint`
    ZRevRank {
        /// Collection key
        key: String,
        /// Member name
        member: String,
    },

    /// Members by ascending rank, inclusive; negative ranks count from the end.
    /// Returns: `Output::ScoredMembers`
    ZRange {
        /// Collection key
        key: String,
        /// First rank
        start: i64,
        /// Last rank
        stop: i64,
    },

    /// Members by descending rank, inclusive.
    /// Returns: `Output::ScoredMembers`
    ZRevRange {
        /// Collection key
        key: String,
        /// First rank
        start: i64,
        /// Last rank
        stop: i64,
    },

    /// Members with `min <= score <= max`, ascending.
    /// Returns: `Output::ScoredMembers`
    ZRangeByScore {
        /// Collection key
        key: String,
        /// Lowest score, inclusive
        min: f64,
        /// Highest score, inclusive
        max: f64,
        /// Matches to skip
        #[serde(default)]
        offset: usize,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    /// Members with `min <= score <= max`, descending.
    /// Returns: `Output::ScoredMembers`
    ZRevRangeByScore {
        /// Collection key
        key: String,
        /// Highest score, inclusive
        max: f64,
        /// Lowest score, inclusive
        min: f64,
        /// Matches to skip
        #[serde(default)]
        offset: usize,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    /// Members with `min <= name <= max`, ascending by name.
    /// Returns: `Output::ScoredMembers`
    ZRangeByLex {
        /// Collection key
        key: String,
        /// Lowest name, inclusive; empty for open
        #[serde(default)]
        min: String,
        /// Highest name, inclusive; empty for open
        #[serde(default)]
        max: String,
        /// Matches to skip
        #[serde(default)]
        offset: usize,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    /// Members with `min <= name <= max`, descending by name.
    /// Returns: `Output::ScoredMembers`
    ZRevRangeByLex {
        /// Collection key
        key: String,
        /// Highest name, inclusive; empty for open
        #[serde(default)]
        max: String,
        /// Lowest name, inclusive; empty for open
        #[serde(default)]
        min: String,
        /// Matches to skip
        #[serde(default)]
        offset: usize,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    /// Remove members.
    /// Returns: `Output::Uint` (members removed)
    ZRem {
        /// Collection key
        key: String,
        /// Member names
        members: Vec<String>,
    },

    /// Remove and return the lowest-scored members.
    /// Returns: `Output::ScoredMembers`
    ZPopMin {
        /// Collection key
        key: String,
        /// How many to pop
        count: usize,
    },

    /// Remove and return the highest-scored members.
    /// Returns: `Output::ScoredMembers`
    ZPopMax {
        /// Collection key
        key: String,
        /// How many to pop
        count: usize,
    },

    /// Remove members with `min <= score <= max`.
    /// Returns: `Output::Uint` (members removed)
    ZRemRangeByScore {
        /// Collection key
        key: String,
        /// Lowest score, inclusive
        min: f64,
        /// Highest score, inclusive
        max: f64,
    },

    /// Remove members with `min <= name <= max`.
    /// Returns: `Output::Uint` (members removed)
    ZRemRangeByLex {
        /// Collection key
        key: String,
        /// Lowest name, inclusive; empty for open
        #[serde(default)]
        min: String,
        /// Highest name, inclusive; empty for open
        #[serde(default)]
        max: String,
    },

    /// Remove members by ascending rank, inclusive.
    /// Returns: `Output::Uint` (members removed)
    ZRemRangeByRank {
        /// Collection key
        key: String,
        /// First rank
        start: i64,
        /// Last rank
        stop: i64,
    },

    /// Store the union of several sets. Not supported.
    /// Returns: `Output::Uint`
    ZUnionStore {
        /// Key to write
        destination: String,
        /// Keys to combine
        keys: Vec<String>,
    },

    /// Store the intersection of several sets. Not supported.
    /// Returns: `Output::Uint`
    ZInterStore {
        /// Key to write
        destination: String,
        /// Keys to combine
        keys: Vec<String>,
    },

    // ==================== Geo (6) ====================
    /// Add members at positions, or move them.
    /// Returns: `Output::Uint` (members written)
    GeoAdd {
        /// Collection key
        key: String,
        /// Members and positions
        members: Vec<(String, Location)>,
    },

    /// Positions of members; unknown members are omitted.
    /// Returns: `Output::Positions`
    GeoPos {
        /// Collection key
        key: String,
        /// Member names
        members: Vec<String>,
    },

    /// Distance between two members.
    /// Returns: `Output::MaybeFloat`
    GeoDist {
        /// Collection key
        key: String,
        /// First member
        member1: String,
        /// Second member
        member2: String,
        /// Unit of the result
        #[serde(default)]
        unit: Unit,
    },

    /// Geohash per member, in request order; empty for unknown members.
    /// Returns: `Output::Hashes`
    GeoHash {
        /// Collection key
        key: String,
        /// Member names
        members: Vec<String>,
    },

    /// Members within `radius` of a position.
    /// Returns: `Output::Located`
    GeoRadius {
        /// Collection key
        key: String,
        /// Search center
        center: Location,
        /// Search radius in `unit`
        radius: f64,
        /// Unit of `radius`
        #[serde(default)]
        unit: Unit,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    /// Members within `radius` of another member.
    /// Returns: `Output::Located`
    GeoRadiusByMember {
        /// Collection key
        key: String,
        /// Member at the search center
        member: String,
        /// Search radius in `unit`
        radius: f64,
        /// Unit of `radius`
        #[serde(default)]
        unit: Unit,
        /// Matches to return; `None` or 0 for all
        #[serde(default)]
        count: Option<usize>,
    },

    // ==================== Database (1) ====================
    /// Check the executor is alive.
    /// Returns: `Output::Pong`
    Ping,
}

impl Command {
    /// Classic name of the command, for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Command::ZAdd { .. } => "ZADD",
            Command::ZScore { .. } => "ZSCORE",
            Command::ZCard { .. } => "ZCARD",
            Command::ZCount { .. } => "ZCOUNT",
            Command::ZLexCount { .. } => "ZLEXCOUNT",
            Command::ZIncrBy { .. } => "ZINCRBY",
            Command::ZRank { .. } => "ZRANK",
            Command::ZRevRank { .. } => "ZREVRANK",
            Command::ZRange { .. } => "ZRANGE",
            Command::ZRevRange { .. } => "ZREVRANGE",
            Command::ZRangeByScore { .. } => "ZRANGEBYSCORE",
            Command::ZRevRangeByScore { .. } => "ZREVRANGEBYSCORE",
            Command::ZRangeByLex { .. } => "ZRANGEBYLEX",
            Command::ZRevRangeByLex { .. } => "ZREVRANGEBYLEX",
            Command::ZRem { .. } => "ZREM",
            Command::ZPopMin { .. } => "ZPOPMIN",
            Command::ZPopMax { .. } => "ZPOPMAX",
            Command::ZRemRangeByScore { .. } => "ZREMRANGEBYSCORE",
            Command::ZRemRangeByLex { .. } => "ZREMRANGEBYLEX",
            Command::ZRemRangeByRank { .. } => "ZREMRANGEBYRANK",
            Command::ZUnionStore { .. } => "ZUNIONSTORE",
            Command::ZInterStore { .. } => "ZINTERSTORE",
            Command::GeoAdd { .. } => "GEOADD",
            Command::GeoPos { .. } => "GEOPOS",
            Command::GeoDist { .. } => "GEODIST",
            Command::GeoHash { .. } => "GEOHASH",
            Command::GeoRadius { .. } => "GEORADIUS",
            Command::GeoRadiusByMember { .. } => "GEORADIUSBYMEMBER",
            Command::Ping => "PING",
        }
    }

    /// Whether the command may write to the store
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::ZAdd { .. }
                | Command::ZIncrBy { .. }
                | Command::ZRem { .. }
                | Command::ZPopMin { .. }
                | Command::ZPopMax { .. }
                | Command::ZRemRangeByScore { .. }
                | Command::ZRemRangeByLex { .. }
                | Command::ZRemRangeByRank { .. }
                | Command::ZUnionStore { .. }
                | Command::ZInterStore { .. }
                | Command::GeoAdd { .. }
        )
    }
}
