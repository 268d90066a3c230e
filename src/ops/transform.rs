//! Coordinate-space transformations for periodic structures.
//!
//! This module provides rigid translations and rotations, fractional-coordinate views of a
//! structure, and wrapping of atoms back into the primary unit cell.

use crate::model::{
    atom::AtomTable,
    lattice::Lattice,
    structure::Structure,
    types::{Point, Vector},
};
use crate::ops::error::Error;
use crate::utils::parallel::*;
use log::debug;
use nalgebra::{Rotation3, Unit};

/// Shortest axis accepted by [`Transform::rotation_from_axis_angle`].
const AXIS_TOLERANCE: f64 = 1e-12;

/// Collection of coordinate transformations for structures.
///
/// The `Transform` type groups static methods that read a structure and return new coordinates
/// or a new structure; inputs are never modified.
pub struct Transform;

impl Transform {
    /// Translates every atom by `displacement`.
    ///
    /// Bonds and the cell are unchanged; a rigid shift never alters image offsets.
    pub fn translate(structure: &Structure, displacement: &Vector) -> Structure {
        let atoms: AtomTable = structure
            .atoms
            .iter()
            .map(|mut atom| {
                atom.translate_by(displacement);
                atom
            })
            .collect();

        Structure {
            atoms,
            bonds: structure.bonds.clone(),
            cell: structure.cell.clone(),
        }
    }

    /// Moves the geometric center to `target`, or to the origin when `target` is `None`.
    pub fn center_geometry(structure: &Structure, target: Option<Point>) -> Structure {
        let target = target.unwrap_or(Point::origin());
        Self::translate(structure, &(target - structure.geometric_center()))
    }

    /// Builds the rotation by `radians` about `axis` (right-hand rule).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotationAxis`] when `axis` has (numerically) zero length.
    pub fn rotation_from_axis_angle(
        axis: &Vector,
        radians: f64,
    ) -> Result<Rotation3<f64>, Error> {
        Unit::try_new(*axis, AXIS_TOLERANCE)
            .map(|axis| Rotation3::from_axis_angle(&axis, radians))
            .ok_or(Error::InvalidRotationAxis {
                axis: [axis.x, axis.y, axis.z],
            })
    }

    /// Rotates every atom about the origin.
    ///
    /// Bonds and the cell parameters are copied unchanged. The parameters are invariant under
    /// rotation, but the rotated atoms no longer sit in the standard lattice orientation, so
    /// fractional views of a rotated periodic structure describe the unrotated frame.
    pub fn rotate(structure: &Structure, rotation: &Rotation3<f64>) -> Structure {
        let positions: Vec<Point> = structure
            .atoms
            .positions()
            .par_iter()
            .map(|pos| rotation * pos)
            .collect();

        Structure {
            atoms: structure.atoms.with_positions(positions),
            bonds: structure.bonds.clone(),
            cell: structure.cell.clone(),
        }
    }

    /// Expresses every atom position in fractional coordinates of the structure's cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCell`] when the structure has no cell and [`Error::Lattice`] when
    /// the cell is degenerate.
    pub fn fractional_coordinates(structure: &Structure) -> Result<Vec<Vector>, Error> {
        let cell = structure
            .cell
            .as_ref()
            .ok_or(Error::missing_cell("fractional conversion"))?;
        let lattice = cell.lattice()?;
        Ok(lattice.to_fractional(&Self::cartesian_vectors(structure)))
    }

    /// Wraps every atom into the primary cell so that its fractional coordinates lie in `[0, 1)`.
    ///
    /// The wrapped fractional coordinates equal the original ones modulo 1. Structures without a
    /// cell, or with a non-periodic cell, are returned unchanged. Bonds and their image offsets
    /// are copied as-is; run periodic bond perception afterwards if offsets must follow the
    /// moved atoms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lattice`] when the cell is degenerate.
    pub fn wrap_to_cell(structure: &Structure) -> Result<Structure, Error> {
        let Some(cell) = structure.cell.as_ref().filter(|cell| cell.pbc) else {
            debug!("Skipping wrap for a non-periodic structure");
            return Ok(structure.clone());
        };

        let lattice = cell.lattice()?;
        let frac = lattice.to_fractional(&Self::cartesian_vectors(structure));
        let wrapped: Vec<Vector> = frac.par_iter().map(Lattice::wrap_fractional).collect();
        let positions: Vec<Point> = lattice
            .to_cartesian(&wrapped)
            .into_iter()
            .map(Point::from)
            .collect();

        debug!("Wrapped {} atoms into the unit cell", positions.len());

        Ok(Structure {
            atoms: structure.atoms.with_positions(positions),
            bonds: structure.bonds.clone(),
            cell: structure.cell.clone(),
        })
    }

    fn cartesian_vectors(structure: &Structure) -> Vec<Vector> {
        structure
            .atoms
            .positions()
            .iter()
            .map(|p| p.coords)
            .collect()
    }
}
