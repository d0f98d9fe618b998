//! Coordinate identity for network vertices.
//!
//! Two line endpoints are the same vertex exactly when their coordinates are
//! equal as `f64` values.  No snapping tolerance is applied: endpoints that
//! differ only by floating-point noise stay distinct vertices.

use std::fmt;

pub use geo::Coord;

/// Hashable, exact-equality key for a vertex coordinate.
///
/// Built from the IEEE-754 bit patterns of `x` and `y`.  `-0.0` is folded
/// into `0.0` so the key agrees with float equality; non-finite coordinates
/// are rejected.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct VertexKey {
    x_bits: u64,
    y_bits: u64,
}

impl VertexKey {
    /// Returns `None` if either component is NaN or infinite.
    pub fn new(c: Coord) -> Option<Self> {
        if !(c.x.is_finite() && c.y.is_finite()) {
            return None;
        }
        Some(Self {
            x_bits: canonical_bits(c.x),
            y_bits: canonical_bits(c.y),
        })
    }

    pub fn coord(self) -> Coord {
        Coord {
            x: f64::from_bits(self.x_bits),
            y: f64::from_bits(self.y_bits),
        }
    }
}

#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.coord();
        write!(f, "({}, {})", c.x, c.y)
    }
}
