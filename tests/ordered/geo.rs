//! Geo commands end to end

use strata_ordered::{Command, Error, Location, Output, Unit};

use crate::{names, paged_setup, quick_setup};

const PALERMO: Location = Location {
    lat: 38.115556,
    lon: 13.361389,
};
const CATANIA: Location = Location {
    lat: 37.502669,
    lon: 15.087269,
};

fn seed(executor: &strata_ordered::Executor) {
    let out = executor
        .execute(Command::GeoAdd {
            key: "Sicily".into(),
            members: vec![("Palermo".into(), PALERMO), ("Catania".into(), CATANIA)],
        })
        .unwrap();
    assert_eq!(out, Output::Uint(2));
}

fn radius(center: Location, radius: f64, unit: Unit, count: Option<usize>) -> Command {
    Command::GeoRadius {
        key: "Sicily".into(),
        center,
        radius,
        unit,
        count,
    }
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

// =============================================================================
// Point Reads
// =============================================================================

#[test]
fn test_geodist_units() {
    let executor = quick_setup();
    seed(&executor);
    let dist = |unit: Unit| match executor
        .execute(Command::GeoDist {
            key: "Sicily".into(),
            member1: "Palermo".into(),
            member2: "Catania".into(),
            unit,
        })
        .unwrap()
    {
        Output::MaybeFloat(Some(d)) => d,
        other => panic!("Expected a distance, got {:?}", other),
    };
    let km = dist(Unit::Kilometers);
    assert!((km - 166.27).abs() < 0.5, "got {}", km);
    assert!((dist(Unit::Meters) - km * 1000.0).abs() < 1e-6);
    assert!((dist(Unit::Miles) - km * 1000.0 / 1609.34).abs() < 1e-6);
}

#[test]
fn test_geodist_missing_member() {
    let executor = quick_setup();
    seed(&executor);
    let out = executor
        .execute(Command::GeoDist {
            key: "Sicily".into(),
            member1: "Palermo".into(),
            member2: "Agrigento".into(),
            unit: Unit::Meters,
        })
        .unwrap();
    assert_eq!(out, Output::MaybeFloat(None));
}

#[test]
fn test_geopos_and_geohash() {
    let executor = quick_setup();
    seed(&executor);

    match executor
        .execute(Command::GeoPos {
            key: "Sicily".into(),
            members: vec!["Palermo".into(), "Nowhere".into()],
        })
        .unwrap()
    {
        Output::Positions(found) => {
            assert_eq!(found.len(), 1);
            let p = found["Palermo"];
            assert!((p.lat - PALERMO.lat).abs() < 1e-5);
            assert!((p.lon - PALERMO.lon).abs() < 1e-5);
        }
        other => panic!("Expected Positions, got {:?}", other),
    }

    match executor
        .execute(Command::GeoHash {
            key: "Sicily".into(),
            members: vec!["Nowhere".into(), "Palermo".into()],
        })
        .unwrap()
    {
        Output::Hashes(hashes) => {
            assert_eq!(hashes[0], "");
            assert_eq!(hashes[1].len(), 11);
            assert!(hashes[1].starts_with("sqc8b"));
        }
        other => panic!("Expected Hashes, got {:?}", other),
    }
}

// =============================================================================
// Radius Search
// =============================================================================

#[test]
fn test_radius_post_filters_by_distance() {
    let executor = paged_setup(1);
    seed(&executor);
    let exact = PALERMO.distance_to(&CATANIA, Unit::Meters);

    let inside = executor
        .execute(radius(PALERMO, exact + 1.0, Unit::Meters, None))
        .unwrap();
    assert_eq!(sorted(names(inside)), vec!["Catania", "Palermo"]);

    let outside = executor
        .execute(radius(PALERMO, exact - 1.0, Unit::Meters, None))
        .unwrap();
    assert_eq!(names(outside), vec!["Palermo"]);
}

#[test]
fn test_radius_count_and_by_member() {
    let executor = quick_setup();
    seed(&executor);

    let limited = executor
        .execute(radius(PALERMO, 500.0, Unit::Kilometers, Some(1)))
        .unwrap();
    assert_eq!(names(limited).len(), 1);

    let by_member = executor
        .execute(Command::GeoRadiusByMember {
            key: "Sicily".into(),
            member: "Catania".into(),
            radius: 10.0,
            unit: Unit::Kilometers,
            count: None,
        })
        .unwrap();
    assert_eq!(names(by_member), vec!["Catania"]);

    let unknown = executor
        .execute(Command::GeoRadiusByMember {
            key: "Sicily".into(),
            member: "Atlantis".into(),
            radius: 10.0,
            unit: Unit::Kilometers,
            count: None,
        })
        .unwrap();
    assert_eq!(unknown, Output::Located(vec![]));
}

#[test]
fn test_invalid_locations_rejected() {
    let executor = quick_setup();
    let err = executor
        .execute(Command::GeoAdd {
            key: "Sicily".into(),
            members: vec![("bad".into(), Location::new(0.0, 181.0))],
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLocation { .. }));

    let err = executor
        .execute(radius(Location::new(-91.0, 0.0), 1.0, Unit::Meters, None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLocation { .. }));
}
