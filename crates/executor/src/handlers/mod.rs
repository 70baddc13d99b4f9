//! Command handlers organized by collection kind.
//!
//! Each submodule handles commands for a specific primitive:
//!
//! | Module | Commands | Primitive |
//! |--------|----------|-----------|
//! | `zset` | 22 | SortedSet |
//! | `geo` | 6 | GeoIndex |

pub mod geo;
pub mod zset;
