//! Shared executors under parallel writers

use std::thread;

use strata_ordered::{Command, Error, Output};

use crate::{expect_uint, quick_setup};

const THREADS: usize = 4;
const PER_THREAD: usize = 25;

#[test]
fn test_parallel_adds_of_distinct_members() {
    let executor = quick_setup();
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let executor = executor.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    executor
                        .execute(Command::ZAdd {
                            key: "z".into(),
                            members: vec![(format!("t{}-{}", t, i), i as f64)],
                            mode: Default::default(),
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let card = expect_uint(executor.execute(Command::ZCard { key: "z".into() }).unwrap());
    assert_eq!(card, (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_parallel_increments_are_never_lost() {
    let executor = quick_setup();
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let executor = executor.clone();
            thread::spawn(move || {
                let mut applied = 0u64;
                for _ in 0..PER_THREAD {
                    match executor.execute(Command::ZIncrBy {
                        key: "z".into(),
                        member: "hits".into(),
                        delta: 1.0,
                    }) {
                        Ok(Output::Float(_)) => applied += 1,
                        Err(Error::Contention { .. }) => {}
                        other => panic!("unexpected result {:?}", other),
                    }
                }
                applied
            })
        })
        .collect();
    let applied: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(applied > 0);

    let score = executor
        .execute(Command::ZScore {
            key: "z".into(),
            member: "hits".into(),
        })
        .unwrap();
    assert_eq!(score, Output::MaybeFloat(Some(applied as f64)));
}
