//! Sorted set commands end to end

use strata_ordered::{AddMode, Command, Error, Output};

use crate::{expect_uint, names, paged_setup, quick_setup, zadd};

fn nine(executor: &strata_ordered::Executor) {
    let members: Vec<(String, f64)> = (1..=9).map(|i| (format!("m{}", i), i as f64)).collect();
    let refs: Vec<(&str, f64)> = members.iter().map(|(m, s)| (m.as_str(), *s)).collect();
    assert_eq!(zadd(executor, "z", &refs), 9);
}

fn range(key: &str, start: i64, stop: i64) -> Command {
    Command::ZRange {
        key: key.into(),
        start,
        stop,
    }
}

fn rev_range(key: &str, start: i64, stop: i64) -> Command {
    Command::ZRevRange {
        key: key.into(),
        start,
        stop,
    }
}

// =============================================================================
// Scores and Counts
// =============================================================================

#[test]
fn test_scores_and_counts() {
    let executor = quick_setup();
    let added = zadd(
        &executor,
        "z",
        &[("m1", 1.0), ("m2", 2.0), ("m3", 3.0), ("m4", f64::INFINITY)],
    );
    assert_eq!(added, 4);

    let score = |member: &str| {
        executor
            .execute(Command::ZScore {
                key: "z".into(),
                member: member.into(),
            })
            .unwrap()
    };
    assert_eq!(score("m2"), Output::MaybeFloat(Some(2.0)));
    assert_eq!(score("m4"), Output::MaybeFloat(Some(f64::INFINITY)));
    assert_eq!(score("nosuch"), Output::MaybeFloat(None));

    let count = |min: f64, max: f64| {
        expect_uint(
            executor
                .execute(Command::ZCount {
                    key: "z".into(),
                    min,
                    max,
                })
                .unwrap(),
        )
    };
    assert_eq!(count(2.0, 3.0), 2);
    assert_eq!(count(2.0, f64::INFINITY), 3);
    assert_eq!(count(f64::NEG_INFINITY, f64::INFINITY), 4);
}

#[test]
fn test_incr_and_remove() {
    let executor = quick_setup();
    zadd(&executor, "z", &[("m1", 1.0), ("m2", 2.0), ("m3", 3.0)]);

    let out = executor
        .execute(Command::ZIncrBy {
            key: "z".into(),
            member: "m2".into(),
            delta: 0.5,
        })
        .unwrap();
    assert_eq!(out, Output::Float(2.5));

    let out = executor
        .execute(Command::ZIncrBy {
            key: "z".into(),
            member: "fresh".into(),
            delta: -4.0,
        })
        .unwrap();
    assert_eq!(out, Output::Float(-4.0));

    let removed = executor
        .execute(Command::ZRem {
            key: "z".into(),
            members: vec!["m2".into(), "m3".into(), "nosuch".into()],
        })
        .unwrap();
    assert_eq!(removed, Output::Uint(2));
    assert_eq!(
        executor.execute(Command::ZCard { key: "z".into() }).unwrap(),
        Output::Uint(2)
    );
}

#[test]
fn test_add_modes() {
    let executor = quick_setup();
    zadd(&executor, "z", &[("a", 1.0)]);

    let out = executor
        .execute(Command::ZAdd {
            key: "z".into(),
            members: vec![("a".into(), 10.0), ("b".into(), 2.0)],
            mode: AddMode::OnlyIfAbsent,
        })
        .unwrap();
    assert_eq!(out, Output::Uint(1));

    let out = executor
        .execute(Command::ZAdd {
            key: "z".into(),
            members: vec![("a".into(), 5.0), ("c".into(), 3.0)],
            mode: AddMode::OnlyIfPresent,
        })
        .unwrap();
    assert_eq!(out, Output::Uint(1));

    assert_eq!(
        executor.execute(range("z", 0, -1)).unwrap(),
        Output::ScoredMembers(vec![("b".into(), 2.0), ("a".into(), 5.0)])
    );
}

#[test]
fn test_lex_count_and_ranges() {
    let executor = quick_setup();
    zadd(
        &executor,
        "letters",
        &[("a", 0.0), ("b", 0.0), ("c", 0.0), ("d", 0.0), ("e", 0.0)],
    );

    let out = executor
        .execute(Command::ZLexCount {
            key: "letters".into(),
            min: "b".into(),
            max: String::new(),
        })
        .unwrap();
    assert_eq!(out, Output::Uint(4));

    let out = executor
        .execute(Command::ZRangeByLex {
            key: "letters".into(),
            min: "b".into(),
            max: "d".into(),
            offset: 1,
            count: None,
        })
        .unwrap();
    assert_eq!(names(out), vec!["c", "d"]);

    let out = executor
        .execute(Command::ZRevRangeByLex {
            key: "letters".into(),
            max: String::new(),
            min: String::new(),
            offset: 0,
            count: Some(2),
        })
        .unwrap();
    assert_eq!(names(out), vec!["e", "d"]);
}

// =============================================================================
// Ranks and Rank Ranges
// =============================================================================

#[test]
fn test_rank_and_rev_rank() {
    let executor = quick_setup();
    nine(&executor);
    let rank = |member: &str, reverse: bool| {
        let cmd = if reverse {
            Command::ZRevRank {
                key: "z".into(),
                member: member.into(),
            }
        } else {
            Command::ZRank {
                key: "z".into(),
                member: member.into(),
            }
        };
        executor.execute(cmd).unwrap()
    };
    assert_eq!(rank("m1", false), Output::MaybeUint(Some(0)));
    assert_eq!(rank("m1", true), Output::MaybeUint(Some(8)));
    assert_eq!(rank("m7", true), Output::MaybeUint(Some(2)));
    assert_eq!(rank("ghost", false), Output::MaybeUint(None));
}

#[test]
fn test_both_negative_matches_top_k() {
    let executor = paged_setup(2);
    nine(&executor);

    let tail = names(executor.execute(range("z", -3, -1)).unwrap());
    let mut top = names(
        executor
            .execute(Command::ZRevRangeByScore {
                key: "z".into(),
                max: f64::INFINITY,
                min: f64::NEG_INFINITY,
                offset: 0,
                count: Some(3),
            })
            .unwrap(),
    );
    top.reverse();
    assert_eq!(tail, top);
    assert_eq!(tail, vec!["m7", "m8", "m9"]);
}

#[test]
fn test_mixed_sign_ranks() {
    let executor = paged_setup(3);
    nine(&executor);
    assert_eq!(
        names(executor.execute(range("z", 2, -3)).unwrap()),
        vec!["m3", "m4", "m5", "m6", "m7"]
    );
    assert_eq!(
        names(executor.execute(rev_range("z", 0, -8)).unwrap()),
        vec!["m9", "m8"]
    );
    assert_eq!(
        names(executor.execute(range("z", -2, 100)).unwrap()),
        vec!["m8", "m9"]
    );
    assert!(names(executor.execute(range("z", 5, 2)).unwrap()).is_empty());
    assert!(names(executor.execute(range("z", 0, -20)).unwrap()).is_empty());
}

#[test]
fn test_score_range_paging() {
    let executor = paged_setup(2);
    nine(&executor);
    let out = executor
        .execute(Command::ZRangeByScore {
            key: "z".into(),
            min: 2.0,
            max: 8.0,
            offset: 3,
            count: Some(2),
        })
        .unwrap();
    assert_eq!(names(out), vec!["m5", "m6"]);
}

#[test]
fn test_extreme_ranks_and_limits() {
    let executor = paged_setup(4);
    nine(&executor);
    assert_eq!(names(executor.execute(range("z", 0, i64::MAX)).unwrap()).len(), 9);
    assert_eq!(names(executor.execute(range("z", i64::MIN, -1)).unwrap()).len(), 9);
    assert!(names(executor.execute(range("z", 0, i64::MIN)).unwrap()).is_empty());
    assert_eq!(
        names(executor.execute(rev_range("z", i64::MIN, -8)).unwrap()),
        vec!["m9", "m8"]
    );

    let out = executor
        .execute(Command::ZRangeByScore {
            key: "z".into(),
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            offset: 7,
            count: Some(usize::MAX),
        })
        .unwrap();
    assert_eq!(names(out), vec!["m8", "m9"]);

    let removed = executor
        .execute(Command::ZRemRangeByRank {
            key: "z".into(),
            start: i64::MIN,
            stop: i64::MAX,
        })
        .unwrap();
    assert_eq!(expect_uint(removed), 9);
}

// =============================================================================
// Pops and Range Removal
// =============================================================================

#[test]
fn test_pops() {
    let executor = quick_setup();
    nine(&executor);

    let out = executor
        .execute(Command::ZPopMax {
            key: "z".into(),
            count: 2,
        })
        .unwrap();
    assert_eq!(
        out,
        Output::ScoredMembers(vec![("m9".into(), 9.0), ("m8".into(), 8.0)])
    );
    assert_eq!(
        executor.execute(Command::ZCard { key: "z".into() }).unwrap(),
        Output::Uint(7)
    );

    let out = executor
        .execute(Command::ZPopMin {
            key: "z".into(),
            count: 2,
        })
        .unwrap();
    assert_eq!(names(out), vec!["m1", "m2"]);

    let out = executor
        .execute(Command::ZPopMin {
            key: "z".into(),
            count: 0,
        })
        .unwrap();
    assert_eq!(out, Output::ScoredMembers(vec![]));
}

#[test]
fn test_remove_ranges() {
    let executor = quick_setup();
    nine(&executor);

    let removed = executor
        .execute(Command::ZRemRangeByScore {
            key: "z".into(),
            min: 2.0,
            max: 3.0,
        })
        .unwrap();
    assert_eq!(removed, Output::Uint(2));

    let removed = executor
        .execute(Command::ZRemRangeByRank {
            key: "z".into(),
            start: -2,
            stop: -1,
        })
        .unwrap();
    assert_eq!(removed, Output::Uint(2));

    let removed = executor
        .execute(Command::ZRemRangeByLex {
            key: "z".into(),
            min: "m5".into(),
            max: "m6".into(),
        })
        .unwrap();
    assert_eq!(removed, Output::Uint(2));

    assert_eq!(
        names(executor.execute(range("z", 0, -1)).unwrap()),
        vec!["m1", "m4", "m7"]
    );
}

// =============================================================================
// Unsupported and Invalid
// =============================================================================

#[test]
fn test_set_algebra_unsupported() {
    let executor = quick_setup();
    for cmd in [
        Command::ZUnionStore {
            destination: "d".into(),
            keys: vec!["a".into(), "b".into()],
        },
        Command::ZInterStore {
            destination: "d".into(),
            keys: vec!["a".into()],
        },
    ] {
        assert!(matches!(executor.execute(cmd), Err(Error::Unsupported { .. })));
    }
}

#[test]
fn test_nan_score_rejected_before_write() {
    let executor = quick_setup();
    let err = executor
        .execute(Command::ZAdd {
            key: "z".into(),
            members: vec![("ok".into(), 1.0), ("bad".into(), f64::NAN)],
            mode: AddMode::Upsert,
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidScore { .. }));
    assert_eq!(
        executor.execute(Command::ZCard { key: "z".into() }).unwrap(),
        Output::Uint(0)
    );
}
