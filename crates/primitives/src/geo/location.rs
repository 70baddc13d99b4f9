//! Coordinates, units and great-circle distance

use serde::{Deserialize, Serialize};
use strata_core::{Error, Result};

use super::cell::CellId;
use super::geohash;

/// Earth radius used for every distance, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_372_797.560856;

/// Distance unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Meters
    #[default]
    Meters,
    /// Kilometers
    Kilometers,
    /// International miles
    Miles,
    /// International feet
    Feet,
}

impl Unit {
    /// Length of one unit in meters
    pub fn meters(self) -> f64 {
        match self {
            Unit::Meters => 1.0,
            Unit::Kilometers => 1000.0,
            Unit::Miles => 1609.34,
            Unit::Feet => 0.3048,
        }
    }

    /// Convert a distance in this unit to meters
    pub fn to_meters(self, distance: f64) -> f64 {
        distance * self.meters()
    }

    /// Convert a distance in meters to this unit
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters()
    }
}

/// A point on the globe, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude, -90..=90
    pub lat: f64,
    /// Longitude, -180..=180
    pub lon: f64,
}

impl Location {
    /// Create a location without validating it
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check latitude and longitude are finite and in range
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidLocation {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Great-circle distance by the spherical law of cosines
    pub fn distance_to(&self, other: &Location, unit: Unit) -> f64 {
        unit.from_meters(self.central_angle(other) * EARTH_RADIUS_METERS)
    }

    /// Angle subtended at the Earth's center, in radians
    pub fn central_angle(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let delta_lon = (other.lon - self.lon).to_radians();
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
        // rounding can push the cosine just outside [-1, 1]
        cos_angle.clamp(-1.0, 1.0).acos()
    }

    /// Leaf cell containing this location
    pub fn cell_id(&self) -> CellId {
        CellId::from_location(self)
    }

    /// Standard 11-character geohash
    pub fn geohash(&self) -> String {
        geohash::encode(self, geohash::DEFAULT_PRECISION)
    }
}
