//! Geospatial collections
//!
//! - [`cell`]: two-face Hilbert cell ids
//! - [`covering`]: cell coverings of a radius
//! - [`geohash`]: base-32 geohash strings
//! - [`location`]: coordinates, units and distance
//! - [`index`]: the `GeoIndex` facade

pub mod cell;
pub mod covering;
pub mod geohash;
pub mod index;
pub mod location;

pub use cell::CellId;
pub use index::{GeoIndex, LocatedMembers};
pub use location::{Location, Unit, EARTH_RADIUS_METERS};
