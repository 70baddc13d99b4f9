//! Ordered Collections Test Suite
//!
//! End-to-end coverage of the command surface: every command goes through
//! the [`Executor`] against an in-memory store.
//!
//! ## Modules Covered
//!
//! - `zset`: sorted set commands, ranks, ranges and pops
//! - `geo`: geo commands and radius search
//! - `concurrency`: shared executors under parallel writers
//! - `config`: custom table layouts
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test ordered
//!
//! # Run geo tests only
//! cargo test --test ordered geo::
//!
//! # Run with log output
//! RUST_LOG=strata=debug cargo test --test ordered -- --nocapture
//! ```

use std::sync::{Arc, Once};

use strata_ordered::{AddMode, Command, Executor, Output, TableConfig};
use strata_storage::MemoryStore;

// Test modules by collection
pub mod concurrency;
pub mod config;
pub mod geo;
pub mod zset;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

static INIT_TRACING: Once = Once::new();

/// Route library logs through the test writer once per process
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Quick setup: an executor over an empty in-memory store
pub fn quick_setup() -> Executor {
    init_tracing();
    let config = TableConfig::default();
    Executor::new(Arc::new(MemoryStore::with_config(&config)), config)
}

/// Setup with a store that returns at most `n` items per page
pub fn paged_setup(n: usize) -> Executor {
    init_tracing();
    let config = TableConfig::default();
    Executor::new(
        Arc::new(MemoryStore::with_config(&config).with_max_page_items(n)),
        config,
    )
}

/// Upsert members with scores
pub fn zadd(executor: &Executor, key: &str, members: &[(&str, f64)]) -> u64 {
    let out = executor
        .execute(Command::ZAdd {
            key: key.to_string(),
            members: members.iter().map(|(m, s)| (m.to_string(), *s)).collect(),
            mode: AddMode::Upsert,
        })
        .expect("ZADD failed");
    expect_uint(out)
}

/// Member names of a scored output, in order
pub fn names(output: Output) -> Vec<String> {
    match output {
        Output::ScoredMembers(members) => members.into_iter().map(|(m, _)| m).collect(),
        Output::Located(members) => members.into_iter().map(|(m, _)| m).collect(),
        other => panic!("Expected a member list, got {:?}", other),
    }
}

/// Unwrap an `Output::Uint`
pub fn expect_uint(output: Output) -> u64 {
    match output {
        Output::Uint(n) => n,
        other => panic!("Expected Uint, got {:?}", other),
    }
}
