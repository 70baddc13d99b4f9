//! Hierarchical cell identifiers
//!
//! The globe is split into two square faces: longitudes `[-180, 0)` and
//! `[0, 180]`, each spanning every latitude. A face is recursively divided
//! into quadrants down to level 30, with the quadrants of each level visited
//! in Hilbert-curve order.
//!
//! ## Bit Layout
//!
//! ```text
//! | face (3 bits) | position (2 bits per level) | 1 | 0 ... 0 |
//!  63         61   60                                       0
//! ```
//!
//! A cell at level `L` carries `2L` position bits followed by a single
//! sentinel `1`. Every leaf beneath the cell therefore falls in
//! `[range_min, range_max]`, so a cell can be queried as one numeric range
//! over the leaf ids of stored locations.

use std::fmt;

use strata_core::{Error, Result};

use super::location::Location;

/// Deepest level; leaf cells are about 2cm across
pub const MAX_LEVEL: u8 = 30;

/// Number of faces
pub const FACE_COUNT: u8 = 2;

const FACE_SHIFT: u32 = 2 * MAX_LEVEL as u32 + 1;
const FACE_SPAN_DEGREES: f64 = 180.0;

/// A cell on the two-face Hilbert grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Wrap a raw id, checking it names a real cell
    pub fn from_raw(id: u64) -> Result<Self> {
        let cell = CellId(id);
        if cell.is_valid() {
            Ok(cell)
        } else {
            Err(Error::Corruption(format!("invalid cell id {}", id)))
        }
    }

    /// Leaf cell containing `location`
    pub fn from_location(location: &Location) -> Self {
        let face = face_of(location.lon);
        let size = 1u64 << MAX_LEVEL;
        let i = grid_index(location.lon - face_min_lon(face), size);
        let j = grid_index(location.lat + 90.0, size);
        Self::from_face_ij(face, i, j, MAX_LEVEL)
    }

    /// Cell at `level` with grid coordinates `(i, j)` on `face`
    ///
    /// `i` and `j` are in `0..2^level`.
    pub fn from_face_ij(face: u8, i: u64, j: u64, level: u8) -> Self {
        let position = xy2d(level, i, j);
        let lsb = lsb_for_level(level);
        CellId((u64::from(face) << FACE_SHIFT) | (position << (2 * (MAX_LEVEL - level) + 1)) | lsb)
    }

    /// Raw 64-bit id
    pub fn id(self) -> u64 {
        self.0
    }

    /// Face number
    pub fn face(self) -> u8 {
        (self.0 >> FACE_SHIFT) as u8
    }

    /// Lowest set bit (the sentinel)
    pub fn lsb(self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// Subdivision level, 0 (whole face) to 30 (leaf)
    pub fn level(self) -> u8 {
        MAX_LEVEL - (self.lsb().trailing_zeros() / 2) as u8
    }

    /// Whether the id has a valid face and sentinel position
    pub fn is_valid(self) -> bool {
        self.face() < FACE_COUNT && self.lsb() & 0x1555_5555_5555_5555 != 0
    }

    /// Ancestor at `level`; `level` must not exceed this cell's level
    pub fn parent(self, level: u8) -> Self {
        let lsb = lsb_for_level(level);
        CellId((self.0 & lsb.wrapping_neg()) | lsb)
    }

    /// Smallest leaf id inside this cell
    pub fn range_min(self) -> u64 {
        self.0 - (self.lsb() - 1)
    }

    /// Largest leaf id inside this cell
    pub fn range_max(self) -> u64 {
        self.0 + (self.lsb() - 1)
    }

    /// Whether `other` lies inside this cell
    pub fn contains(self, other: CellId) -> bool {
        other.0 >= self.range_min() && other.0 <= self.range_max()
    }

    /// Grid coordinates of this cell at its own level
    pub fn face_ij(self) -> (u8, u64, u64) {
        let level = self.level();
        let position_mask = (1u64 << FACE_SHIFT) - 1;
        let position = (self.0 & position_mask) >> (2 * (MAX_LEVEL - level) + 1);
        let (i, j) = d2xy(level, position);
        (self.face(), i, j)
    }

    /// Center of the cell, the representative point for stored locations
    pub fn center(self) -> Location {
        let (face, i, j) = self.face_ij();
        let size = (1u64 << self.level()) as f64;
        let lon = face_min_lon(face) + (i as f64 + 0.5) / size * FACE_SPAN_DEGREES;
        let lat = -90.0 + (j as f64 + 0.5) / size * FACE_SPAN_DEGREES;
        Location::new(lat, lon)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * u32::from(MAX_LEVEL - level))
}

pub(crate) fn face_of(lon: f64) -> u8 {
    if lon < 0.0 {
        0
    } else {
        1
    }
}

pub(crate) fn face_min_lon(face: u8) -> f64 {
    -180.0 + f64::from(face) * FACE_SPAN_DEGREES
}

/// Grid index of `offset` degrees into a face of `size` cells
pub(crate) fn grid_index(offset_degrees: f64, size: u64) -> u64 {
    let scaled = (offset_degrees / FACE_SPAN_DEGREES * size as f64).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as u64).min(size - 1)
    }
}

/// Hilbert index of `(x, y)` on a `2^order` grid
fn xy2d(order: u8, x: u64, y: u64) -> u64 {
    let mut d = 0u64;
    let (mut x, mut y) = (x, y);
    let mut s = if order == 0 { 0 } else { 1u64 << (order - 1) };

    while s > 0 {
        let rx = u64::from(x & s != 0);
        let ry = u64::from(y & s != 0);
        d += s * s * ((3 * rx) ^ ry);
        x &= s - 1;
        y &= s - 1;
        rotate(s, &mut x, &mut y, rx, ry);
        s /= 2;
    }
    d
}

/// Grid coordinates of Hilbert index `d` on a `2^order` grid
fn d2xy(order: u8, d: u64) -> (u64, u64) {
    let n = 1u64 << order;
    let (mut x, mut y) = (0u64, 0u64);
    let mut t = d;
    let mut s = 1u64;

    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

fn rotate(s: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = s - 1 - *x;
            *y = s - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}
