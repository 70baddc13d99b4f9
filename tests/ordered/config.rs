//! Custom table layouts through the executor

use std::sync::Arc;

use strata_ordered::{Command, Error, Executor, Location, Output, TableConfig, Unit};
use strata_storage::MemoryStore;

use crate::{init_tracing, names, zadd};

fn custom_setup() -> Executor {
    init_tracing();
    let config = TableConfig::from_toml_str(
        r#"
table = "leaderboards"
partition_key = "board"
sort_key = "player"
secondary_key = "points"
secondary_index = "by_points"
increment_attempts = 5
"#,
    )
    .unwrap();
    Executor::new(Arc::new(MemoryStore::with_config(&config)), config)
}

#[test]
fn test_default_template_loads() {
    let config = TableConfig::from_toml_str(TableConfig::default_toml()).unwrap();
    assert_eq!(config, TableConfig::default());
}

#[test]
fn test_custom_layout_serves_both_collections() {
    let executor = custom_setup();
    assert_eq!(executor.config().table, "leaderboards");
    assert_eq!(executor.config().increment_attempts, 5);

    zadd(&executor, "weekly", &[("ann", 30.0), ("bo", 10.0), ("cy", 20.0)]);
    let out = executor
        .execute(Command::ZRevRange {
            key: "weekly".into(),
            start: 0,
            stop: 1,
        })
        .unwrap();
    assert_eq!(names(out), vec!["ann", "cy"]);

    executor
        .execute(Command::GeoAdd {
            key: "venues".into(),
            members: vec![("hall".into(), Location::new(51.5, -0.125))],
        })
        .unwrap();
    let out = executor
        .execute(Command::GeoRadius {
            key: "venues".into(),
            center: Location::new(51.5, -0.125),
            radius: 1.0,
            unit: Unit::Kilometers,
            count: None,
        })
        .unwrap();
    assert_eq!(names(out), vec!["hall"]);
}

#[test]
fn test_invalid_layout_rejected() {
    let err = TableConfig::from_toml_str("partition_key = \"pk\"\nsort_key = \"pk\"").unwrap_err();
    let err: Error = err.into();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_missing_table_reported() {
    init_tracing();
    let executor = Executor::new(Arc::new(MemoryStore::new()), TableConfig::default());
    let err = executor
        .execute(Command::ZCard { key: "z".into() })
        .unwrap_err();
    assert_eq!(
        err,
        Error::TableNotFound {
            table: "strata".into()
        }
    );
    assert_eq!(
        executor.execute(Command::Ping).map(|o| matches!(o, Output::Pong { .. })),
        Ok(true)
    );
}
