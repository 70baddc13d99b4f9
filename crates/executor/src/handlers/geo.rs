//! Geo command handlers.

use std::sync::Arc;

use strata_primitives::{Location, Unit};

use crate::bridge::Primitives;
use crate::convert::{convert_partial, convert_result};
use crate::{Output, Result};

/// Handle GeoAdd command.
pub fn geoadd(p: &Arc<Primitives>, key: String, members: Vec<(String, Location)>) -> Result<Output> {
    convert_partial(p.geo.add(&key, members), Output::Uint)
}

/// Handle GeoPos command.
pub fn geopos(p: &Arc<Primitives>, key: String, members: Vec<String>) -> Result<Output> {
    convert_partial(p.geo.position(&key, members.as_slice()), Output::Positions)
}

/// Handle GeoDist command.
pub fn geodist(
    p: &Arc<Primitives>,
    key: String,
    member1: String,
    member2: String,
    unit: Unit,
) -> Result<Output> {
    let distance = convert_result(p.geo.distance(&key, &member1, &member2, unit))?;
    Ok(Output::MaybeFloat(distance))
}

/// Handle GeoHash command.
pub fn geohash(p: &Arc<Primitives>, key: String, members: Vec<String>) -> Result<Output> {
    let hashes = convert_result(p.geo.hash(&key, members.as_slice()))?;
    Ok(Output::Hashes(hashes))
}

/// Handle GeoRadius command.
pub fn georadius(
    p: &Arc<Primitives>,
    key: String,
    center: Location,
    radius: f64,
    unit: Unit,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(p.geo.radius(&key, center, radius, unit, count), Output::Located)
}

/// Handle GeoRadiusByMember command.
pub fn georadius_by_member(
    p: &Arc<Primitives>,
    key: String,
    member: String,
    radius: f64,
    unit: Unit,
    count: Option<usize>,
) -> Result<Output> {
    convert_partial(
        p.geo.radius_by_member(&key, &member, radius, unit, count),
        Output::Located,
    )
}
