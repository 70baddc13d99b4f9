//! Cell coverings for radius queries
//!
//! A circle on the sphere (a spherical cap) is approximated by its
//! latitude/longitude bounding rectangle, split at the antimeridian when it
//! wraps. The rectangle is then covered with same-level cells, choosing the
//! deepest level whose covering still fits in `max_cells`.
//!
//! The covering only has to be a superset: radius queries post-filter every
//! candidate by exact distance.

use std::f64::consts::PI;

use super::cell::{face_min_lon, grid_index, CellId, FACE_COUNT, MAX_LEVEL};
use super::location::{Location, EARTH_RADIUS_METERS};

/// Cell budget for a covering
pub const DEFAULT_MAX_CELLS: usize = 8;

/// Slack added to every rectangle edge, in degrees
const EDGE_SLACK_DEGREES: f64 = 1e-9;

/// Rectangle in degrees with `lon_lo <= lon_hi`
#[derive(Debug, Clone, Copy, PartialEq)]
struct LatLonRect {
    lat_lo: f64,
    lat_hi: f64,
    lon_lo: f64,
    lon_hi: f64,
}

impl LatLonRect {
    fn world() -> Self {
        Self {
            lat_lo: -90.0,
            lat_hi: 90.0,
            lon_lo: -180.0,
            lon_hi: 180.0,
        }
    }
}

/// Grid span of one rectangle on one face at one level
#[derive(Debug, Clone, Copy)]
struct FaceSpan {
    face: u8,
    i_lo: u64,
    i_hi: u64,
    j_lo: u64,
    j_hi: u64,
}

impl FaceSpan {
    fn cell_count(&self) -> u64 {
        (self.i_hi - self.i_lo + 1) * (self.j_hi - self.j_lo + 1)
    }
}

/// Cells covering every point within `radius_meters` of `center`
///
/// Returned sorted by id, without duplicates.
pub fn covering_for_circle(center: &Location, radius_meters: f64, max_cells: usize) -> Vec<CellId> {
    let angle = (radius_meters / EARTH_RADIUS_METERS).max(0.0);
    let rects = cap_bounds(center, angle);
    let max_cells = max_cells.max(usize::from(FACE_COUNT) * 2) as u64;

    let mut level = 0u8;
    for candidate in 1..=MAX_LEVEL {
        let count: u64 = rects
            .iter()
            .flat_map(|rect| face_spans(rect, candidate))
            .map(|span| span.cell_count())
            .sum();
        if count > max_cells {
            break;
        }
        level = candidate;
    }

    let mut cells: Vec<CellId> = rects
        .iter()
        .flat_map(|rect| face_spans(rect, level))
        .flat_map(|span| {
            (span.i_lo..=span.i_hi).flat_map(move |i| {
                (span.j_lo..=span.j_hi).map(move |j| CellId::from_face_ij(span.face, i, j, level))
            })
        })
        .collect();
    cells.sort_unstable();
    cells.dedup();
    cells
}

/// Merge cells into sorted, disjoint leaf-id ranges
///
/// Ranges of cells that follow each other along the curve are joined: the
/// only ids between them are even, and leaf ids are always odd.
pub fn cells_to_ranges(cells: &[CellId]) -> Vec<(u64, u64)> {
    let mut bounds: Vec<(u64, u64)> = cells.iter().map(|c| (c.range_min(), c.range_max())).collect();
    bounds.sort_unstable();

    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(bounds.len());
    for (lo, hi) in bounds {
        match merged.last_mut() {
            Some(last) if lo <= last.1.saturating_add(2) => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

/// Bounding rectangles of the cap of `angle` radians around `center`
fn cap_bounds(center: &Location, angle: f64) -> Vec<LatLonRect> {
    if angle >= PI {
        return vec![LatLonRect::world()];
    }

    let angle_deg = angle.to_degrees() + EDGE_SLACK_DEGREES;
    let lat_lo = center.lat - angle_deg;
    let lat_hi = center.lat + angle_deg;

    // A cap containing a pole spans every longitude
    if lat_lo <= -90.0 || lat_hi >= 90.0 {
        return vec![LatLonRect {
            lat_lo: lat_lo.max(-90.0),
            lat_hi: lat_hi.min(90.0),
            lon_lo: -180.0,
            lon_hi: 180.0,
        }];
    }

    let ratio = angle.sin() / center.lat.to_radians().cos();
    if ratio >= 1.0 {
        return vec![LatLonRect {
            lat_lo,
            lat_hi,
            lon_lo: -180.0,
            lon_hi: 180.0,
        }];
    }
    let dlon = ratio.asin().to_degrees() + EDGE_SLACK_DEGREES;
    let lon_lo = center.lon - dlon;
    let lon_hi = center.lon + dlon;

    let rect = |lon_lo: f64, lon_hi: f64| LatLonRect {
        lat_lo,
        lat_hi,
        lon_lo,
        lon_hi,
    };
    if lon_lo < -180.0 {
        vec![rect(lon_lo + 360.0, 180.0), rect(-180.0, lon_hi)]
    } else if lon_hi > 180.0 {
        vec![rect(lon_lo, 180.0), rect(-180.0, lon_hi - 360.0)]
    } else {
        vec![rect(lon_lo, lon_hi)]
    }
}

/// Grid spans of `rect` on each face it touches
fn face_spans(rect: &LatLonRect, level: u8) -> Vec<FaceSpan> {
    let size = 1u64 << level;
    let j_lo = grid_index(rect.lat_lo + 90.0, size);
    let j_hi = grid_index(rect.lat_hi + 90.0, size);

    let mut spans = Vec::with_capacity(2);
    for face in 0..FACE_COUNT {
        let face_lo = face_min_lon(face);
        let face_hi = face_lo + 180.0;
        let touches = if face == 0 {
            rect.lon_lo < face_hi
        } else {
            rect.lon_hi >= face_lo
        };
        if !touches {
            continue;
        }
        let lo = rect.lon_lo.max(face_lo);
        let hi = rect.lon_hi.min(face_hi);
        spans.push(FaceSpan {
            face,
            i_lo: grid_index(lo - face_lo, size),
            i_hi: grid_index(hi - face_lo, size),
            j_lo,
            j_hi,
        });
    }
    spans
}
