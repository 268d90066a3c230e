//! Periodic structure container and its replicated supercell form.
//!
//! A `Structure` owns an [`AtomTable`], a bond list keyed by atom identities, and an optional
//! unit cell. Operations never mutate a structure in place; they read one and build another.

use super::atom::{Atom, AtomTable};
use super::cell::CellParameters;
use super::topology::Bond;
use super::types::{Point, TileIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Atoms, bonds, and an optional unit cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Atom rows in storage order.
    pub atoms: AtomTable,
    /// Bonds referencing atom identities.
    #[serde(default)]
    pub bonds: Vec<Bond>,
    /// Unit cell; `None` for non-periodic molecules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellParameters>,
}

impl Structure {
    /// Creates an empty structure without a cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a structure from its parts.
    pub fn from_parts(atoms: AtomTable, bonds: Vec<Bond>, cell: Option<CellParameters>) -> Self {
        Self { atoms, bonds, cell }
    }

    /// Sets the unit cell.
    pub fn with_cell(mut self, cell: CellParameters) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Appends an atom row.
    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    /// Appends a bond.
    pub fn add_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Whether the structure carries a cell flagged as periodic.
    pub fn is_periodic(&self) -> bool {
        self.cell.as_ref().is_some_and(|cell| cell.pbc)
    }

    /// Unweighted centroid of all atom positions, or the origin for an empty structure.
    pub fn geometric_center(&self) -> Point {
        let positions = self.atoms.positions();
        if positions.is_empty() {
            return Point::origin();
        }

        let sum = positions
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Point::from(sum / positions.len() as f64)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ atoms: {}, bonds: {}, periodic: {} }}",
            self.atom_count(),
            self.bond_count(),
            self.is_periodic()
        )
    }
}

/// Structure produced by tiling a unit cell `na × nb × nc` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supercell {
    structure: Structure,
    dims: TileIndex,
}

impl Supercell {
    pub(crate) fn new(structure: Structure, dims: TileIndex) -> Self {
        Self { structure, dims }
    }

    /// Replicated atoms, bonds, and scaled cell.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Replication factors `(na, nb, nc)`.
    pub fn dims(&self) -> TileIndex {
        self.dims
    }

    /// Number of unit-cell images in the grid.
    pub fn image_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// The scaled cell of the supercell.
    pub fn cell(&self) -> Option<&CellParameters> {
        self.structure.cell.as_ref()
    }

    /// Releases the underlying structure.
    pub fn into_structure(self) -> Structure {
        self.structure
    }
}

impl fmt::Display for Supercell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [na, nb, nc] = self.dims;
        write!(f, "Supercell {na}x{nb}x{nc} {}", self.structure)
    }
}
