//! Base-32 geohash encoding

use super::location::Location;

/// Characters in a standard geohash
pub const DEFAULT_PRECISION: usize = 11;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Encode `location` as a geohash of `precision` characters
///
/// Bits alternate longitude then latitude, each halving its interval.
pub fn encode(location: &Location, precision: usize) -> String {
    let (mut lat_lo, mut lat_hi) = (-90.0f64, 90.0f64);
    let (mut lon_lo, mut lon_hi) = (-180.0f64, 180.0f64);
    let mut out = String::with_capacity(precision);
    let mut even = true;
    let mut bits = 0u8;
    let mut ch = 0usize;

    while out.len() < precision {
        let (value, lo, hi) = if even {
            (location.lon, &mut lon_lo, &mut lon_hi)
        } else {
            (location.lat, &mut lat_lo, &mut lat_hi)
        };
        let mid = (*lo + *hi) / 2.0;
        ch <<= 1;
        if value >= mid {
            ch |= 1;
            *lo = mid;
        } else {
            *hi = mid;
        }
        even = !even;

        bits += 1;
        if bits == 5 {
            out.push(char::from(BASE32[ch]));
            bits = 0;
            ch = 0;
        }
    }
    out
}
