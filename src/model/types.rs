//! Shared primitive aliases for coordinates and periodic image bookkeeping.

use nalgebra::{Point3, Vector3};

/// Cartesian position in the caller's length unit.
pub type Point = Point3<f64>;

/// Free 3-vector used for displacements and fractional coordinates.
pub type Vector = Vector3<f64>;

/// Integer lattice translation `(i, j, k)` selecting a neighbouring periodic image.
pub type ImageOffset = [i32; 3];

/// Tile coordinates `(i, j, k)` of a replicated unit cell inside a supercell grid.
pub type TileIndex = [usize; 3];

/// Offset of the home image.
pub const ZERO_OFFSET: ImageOffset = [0, 0, 0];

/// Negates every component of an image offset.
pub fn negate_offset(offset: ImageOffset) -> ImageOffset {
    [-offset[0], -offset[1], -offset[2]]
}
