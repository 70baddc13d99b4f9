//! Behavior tests for SortedSet over the in-memory store
//!
//! Each module drives the public API only:
//!
//! 1. Writes: add modes, idempotence, increments, removal
//! 2. Counts: cardinality, score and lex windows
//! 3. Ranges: score, lex and rank addressing in both directions
//! 4. Pops and range removal
//! 5. Failure handling: contention, partial results, unsupported operations

use std::sync::Arc;

use strata_core::{Error, TableConfig};
use strata_primitives::{AddMode, ScoredMembers, SortedSet};
use strata_storage::testing::FaultyStore;
use strata_storage::MemoryStore;

// ============================================================================
// Test Helpers
// ============================================================================

fn setup() -> SortedSet {
    let config = TableConfig::default();
    SortedSet::new(Arc::new(MemoryStore::with_config(&config)), config)
}

/// Store that pages two items at a time behind a fault injector
fn setup_faulty() -> (SortedSet, Arc<FaultyStore<MemoryStore>>) {
    let config = TableConfig::default();
    let store = Arc::new(FaultyStore::new(
        MemoryStore::with_config(&config).with_max_page_items(2),
    ));
    (SortedSet::new(store.clone(), config), store)
}

fn seed_four(z: &SortedSet) {
    let n = z
        .add(
            "z",
            [("m1", 1.0), ("m2", 2.0), ("m3", 3.0), ("m4", f64::INFINITY)],
            AddMode::Upsert,
        )
        .unwrap();
    assert_eq!(n, 4);
}

fn seed_nine(z: &SortedSet) {
    let members: Vec<(String, f64)> = (1..=9).map(|i| (format!("m{}", i), i as f64)).collect();
    z.add("z", members, AddMode::Upsert).unwrap();
}

fn names(members: &ScoredMembers) -> Vec<&str> {
    members.iter().map(|(m, _)| m.as_str()).collect()
}

// ============================================================================
// Module 1: Writes
// ============================================================================

#[test]
fn test_add_four_and_lookup() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.score("z", "m2").unwrap(), Some(2.0));
    assert_eq!(z.score("z", "m4").unwrap(), Some(f64::INFINITY));
    assert_eq!(z.score("z", "nosuch").unwrap(), None);
}

#[test]
fn test_readd_same_score_is_idempotent() {
    let z = setup();
    seed_four(&z);
    z.add("z", [("m2", 2.0)], AddMode::Upsert).unwrap();
    assert_eq!(z.score("z", "m2").unwrap(), Some(2.0));
    assert_eq!(z.card("z").unwrap(), 4);
}

#[test]
fn test_only_if_absent_counts_new_members() {
    let z = setup();
    seed_four(&z);
    let n = z
        .add("z", [("m1", 100.0), ("m5", 5.0)], AddMode::OnlyIfAbsent)
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(z.score("z", "m1").unwrap(), Some(1.0));
    assert_eq!(z.score("z", "m5").unwrap(), Some(5.0));
}

#[test]
fn test_only_if_present_skips_new_members() {
    let z = setup();
    seed_four(&z);
    let n = z
        .add("z", [("m1", 100.0), ("m5", 5.0)], AddMode::OnlyIfPresent)
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(z.score("z", "m1").unwrap(), Some(100.0));
    assert_eq!(z.score("z", "m5").unwrap(), None);
}

#[test]
fn test_incr_existing_member() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.incr_by("z", "m2", 0.5).unwrap(), 2.5);
    assert_eq!(z.score("z", "m2").unwrap(), Some(2.5));
}

#[test]
fn test_incr_missing_member_creates_it() {
    let z = setup();
    assert_eq!(z.incr_by("z", "fresh", -4.0).unwrap(), -4.0);
    assert_eq!(z.score("z", "fresh").unwrap(), Some(-4.0));
}

#[test]
fn test_incr_infinities_to_nan_rejected() {
    let z = setup();
    seed_four(&z);
    let err = z.incr_by("z", "m4", f64::NEG_INFINITY).unwrap_err();
    assert!(matches!(err, Error::InvalidScore(_)));
    assert_eq!(z.score("z", "m4").unwrap(), Some(f64::INFINITY));
}

#[test]
fn test_remove_skips_missing() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.remove("z", ["m2", "m3", "nosuch"]).unwrap(), 2);
    assert_eq!(z.card("z").unwrap(), 2);
}

// ============================================================================
// Module 2: Counts
// ============================================================================

#[test]
fn test_count_by_score_windows() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.count_by_score("z", 2.0, 3.0).unwrap(), 2);
    assert_eq!(z.count_by_score("z", 2.0, f64::INFINITY).unwrap(), 3);
    assert_eq!(z.count_by_score("z", f64::NEG_INFINITY, f64::INFINITY).unwrap(), 4);
    assert_eq!(z.count_by_score("z", 3.5, 3.9).unwrap(), 0);
}

#[test]
fn test_count_by_score_rejects_nan() {
    let z = setup();
    assert!(matches!(
        z.count_by_score("z", f64::NAN, 1.0),
        Err(Error::InvalidScore(_))
    ));
}

#[test]
fn test_count_by_lex() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.count_by_lex("z", "m2", "m3").unwrap(), 2);
    assert_eq!(z.count_by_lex("z", "", "m2").unwrap(), 2);
    assert_eq!(z.count_by_lex("z", "m3", "").unwrap(), 2);
}

#[test]
fn test_card_of_missing_collection_is_zero() {
    let z = setup();
    assert_eq!(z.card("empty").unwrap(), 0);
}

#[test]
fn test_count_pages_through_small_pages() {
    let (z, store) = setup_faulty();
    seed_nine(&z);
    store.reset_calls();
    assert_eq!(z.card("z").unwrap(), 9);
    assert!(store.calls().queries >= 5);
}

// ============================================================================
// Module 3: Ranges
// ============================================================================

#[test]
fn test_range_by_score_with_offset_and_count() {
    let z = setup();
    seed_nine(&z);
    let got = z.range_by_score("z", 2.0, 8.0, 1, Some(3)).unwrap();
    assert_eq!(names(&got), vec!["m3", "m4", "m5"]);
    assert_eq!(got[0].1, 3.0);
}

#[test]
fn test_rev_range_by_score() {
    let z = setup();
    seed_nine(&z);
    let got = z.rev_range_by_score("z", 8.0, 2.0, 0, Some(2)).unwrap();
    assert_eq!(names(&got), vec!["m8", "m7"]);
}

#[test]
fn test_range_by_score_zero_count_means_all() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(z.range_by_score("z", 1.0, 9.0, 0, Some(0)).unwrap().len(), 9);
}

#[test]
fn test_range_by_lex_both_directions() {
    let z = setup();
    z.add("z", [("apple", 0.0), ("banana", 0.0), ("cherry", 0.0)], AddMode::Upsert)
        .unwrap();
    assert_eq!(
        names(&z.range_by_lex("z", "b", "", 0, None).unwrap()),
        vec!["banana", "cherry"]
    );
    assert_eq!(
        names(&z.rev_range_by_lex("z", "", "", 0, Some(2)).unwrap()),
        vec!["cherry", "banana"]
    );
}

#[test]
fn test_range_by_rank_nonnegative() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(names(&z.range("z", 0, 2).unwrap()), vec!["m1", "m2", "m3"]);
    assert_eq!(names(&z.rev_range("z", 0, 1).unwrap()), vec!["m9", "m8"]);
    assert!(z.range("z", 5, 2).unwrap().is_empty());
}

#[test]
fn test_range_by_rank_both_negative_matches_top_k() {
    let z = setup();
    seed_nine(&z);
    let by_rank = z.range("z", -3, -1).unwrap();
    let mut top = z.rev_range_by_score("z", f64::INFINITY, f64::NEG_INFINITY, 0, Some(3)).unwrap();
    top.reverse();
    assert_eq!(by_rank, top);
    assert_eq!(names(&by_rank), vec!["m7", "m8", "m9"]);

    assert_eq!(names(&z.rev_range("z", -2, -1).unwrap()), vec!["m2", "m1"]);
    assert!(z.range("z", -1, -3).unwrap().is_empty());
}

#[test]
fn test_range_by_rank_positive_start_negative_stop() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(z.range("z", 0, -1).unwrap().len(), 9);
    assert_eq!(names(&z.range("z", 2, -6).unwrap()), vec!["m3", "m4"]);
    assert_eq!(
        names(&z.rev_range("z", 1, -2).unwrap()),
        vec!["m8", "m7", "m6", "m5", "m4", "m3", "m2"]
    );
    assert_eq!(names(&z.rev_range("z", 1, -8).unwrap()), vec!["m8"]);
}

#[test]
fn test_range_by_rank_negative_start_positive_stop() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(names(&z.range("z", -2, 8).unwrap()), vec!["m8", "m9"]);
    assert_eq!(names(&z.range("z", -100, 1).unwrap()), vec!["m1", "m2"]);
}

#[test]
fn test_rank_and_rev_rank() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(z.rank("z", "m1").unwrap(), Some(0));
    assert_eq!(z.rank("z", "m9").unwrap(), Some(8));
    assert_eq!(z.rev_rank("z", "m9").unwrap(), Some(0));
    assert_eq!(z.rev_rank("z", "m3").unwrap(), Some(6));
    assert_eq!(z.rank("z", "nosuch").unwrap(), None);
}

#[test]
fn test_negative_scores_order_before_positive() {
    let z = setup();
    z.add(
        "z",
        [("neg", -2.5), ("zero", 0.0), ("pos", 0.25), ("ninf", f64::NEG_INFINITY)],
        AddMode::Upsert,
    )
    .unwrap();
    assert_eq!(names(&z.range("z", 0, -1).unwrap()), vec!["ninf", "neg", "zero", "pos"]);
}

// ============================================================================
// Module 4: Pops and Range Removal
// ============================================================================

#[test]
fn test_pop_max_then_pop_min() {
    let z = setup();
    seed_nine(&z);
    let top = z.pop_max("z", 2).unwrap();
    assert_eq!(top, vec![("m9".to_string(), 9.0), ("m8".to_string(), 8.0)]);
    assert_eq!(z.card("z").unwrap(), 7);

    let bottom = z.pop_min("z", 2).unwrap();
    assert_eq!(bottom, vec![("m1".to_string(), 1.0), ("m2".to_string(), 2.0)]);
    assert_eq!(z.card("z").unwrap(), 5);
}

#[test]
fn test_pop_more_than_present() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.pop_min("z", 10).unwrap().len(), 4);
    assert_eq!(z.card("z").unwrap(), 0);
}

#[test]
fn test_rem_range_by_score_and_rank() {
    let z = setup();
    seed_nine(&z);
    assert_eq!(z.rem_range_by_score("z", 2.0, 4.0).unwrap(), 3);
    assert_eq!(z.rem_range_by_rank("z", -2, -1).unwrap(), 2);
    assert_eq!(names(&z.range("z", 0, -1).unwrap()), vec!["m1", "m5", "m6", "m7"]);
}

#[test]
fn test_rem_range_by_lex() {
    let z = setup();
    seed_four(&z);
    assert_eq!(z.rem_range_by_lex("z", "m2", "m3").unwrap(), 2);
    assert_eq!(names(&z.range("z", 0, -1).unwrap()), vec!["m1", "m4"]);
}

// ============================================================================
// Module 5: Failure Handling
// ============================================================================

#[test]
fn test_incr_reports_contention_after_three_attempts() {
    let (z, store) = setup_faulty();
    z.add("z", [("m", 1.0)], AddMode::Upsert).unwrap();
    store.reset_calls();
    store.fail_conditional_updates(3);

    match z.incr_by("z", "m", 1.0) {
        Err(Error::Contention { key, member }) => {
            assert_eq!(key, "z");
            assert_eq!(member, "m");
        }
        other => panic!("expected contention, got {:?}", other),
    }
    assert_eq!(store.calls().updates, 3);
    assert_eq!(store.calls().gets, 3);
    assert_eq!(z.score("z", "m").unwrap(), Some(1.0));
}

#[test]
fn test_contention_message_names_key_and_member() {
    let err = Error::Contention {
        key: "board".into(),
        member: "alice".into(),
    };
    assert!(err.to_string().contains("board / alice"));
}

#[test]
fn test_range_failure_returns_partial_results() {
    let (z, store) = setup_faulty();
    seed_nine(&z);
    store.fail_queries_after(1);

    let partial = z.range_by_score("z", 1.0, 9.0, 0, None).unwrap_err();
    assert_eq!(names(&partial.value), vec!["m1", "m2"]);
    assert!(matches!(partial.error, Error::Store(_)));
}

#[test]
fn test_add_failure_reports_written_count() {
    let (z, store) = setup_faulty();
    store.fail_updates_after(2);
    let partial = z
        .add("z", [("a", 1.0), ("b", 2.0), ("c", 3.0)], AddMode::Upsert)
        .unwrap_err();
    assert_eq!(partial.value, 2);
    store.fail_updates_after(usize::MAX);
    assert_eq!(z.card("z").unwrap(), 2);
}

#[test]
fn test_pop_failure_reports_removed_members() {
    let (z, store) = setup_faulty();
    seed_nine(&z);
    store.fail_deletes_after(1);
    let partial = z.pop_min("z", 3).unwrap_err();
    assert_eq!(names(&partial.value), vec!["m1"]);
}

#[test]
fn test_set_algebra_unsupported() {
    let z = setup();
    seed_four(&z);
    let keys = vec!["z".to_string(), "y".to_string()];
    assert!(matches!(z.union_store("dest", &keys), Err(Error::Unsupported(_))));
    assert!(matches!(z.inter_store("dest", &keys), Err(Error::Unsupported(_))));
    assert_eq!(z.card("dest").unwrap(), 0);
}

#[test]
fn test_custom_table_layout() {
    let config = TableConfig::from_toml_str(
        "table = \"boards\"\nsecondary_key = \"score\"\nsecondary_index = \"by_score\"",
    )
    .unwrap();
    let z = SortedSet::new(Arc::new(MemoryStore::with_config(&config)), config);
    z.add("z", [("a", 2.0), ("b", 1.0)], AddMode::Upsert).unwrap();
    assert_eq!(names(&z.range("z", 0, -1).unwrap()), vec!["b", "a"]);
    assert_eq!(z.config().table, "boards");
}
