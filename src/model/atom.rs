//! Atom records and their structure-of-arrays table.
//!
//! [`Atom`] is the row-level value used to build and inspect structures. [`AtomTable`] stores the
//! same fields as parallel columns so that coordinate transforms stream over a contiguous
//! position buffer. Names and element labels are opaque to this crate: they are copied,
//! compared, and qualified during replication, but never interpreted.

use super::types::{Point, TileIndex, Vector};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Single atom with identity, label, and Cartesian position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Identity referenced by bonds; unique within a structure.
    pub id: usize,
    /// Opaque atom label (e.g., `"Zn1"`).
    pub name: SmolStr,
    /// Opaque element or type label.
    #[serde(default, skip_serializing_if = "SmolStr::is_empty")]
    pub element: SmolStr,
    /// Cartesian coordinates.
    pub pos: Point,
    /// Supercell tile this atom was replicated into, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TileIndex>,
}

impl Atom {
    /// Creates an atom with an empty element label and no tile annotation.
    ///
    /// # Arguments
    ///
    /// * `id` - Identity referenced by bonds.
    /// * `name` - Atom label; kept verbatim.
    /// * `pos` - Cartesian position.
    pub fn new(id: usize, name: &str, pos: Point) -> Self {
        Self {
            id,
            name: SmolStr::new(name),
            element: SmolStr::default(),
            pos,
            image: None,
        }
    }

    /// Sets the element label.
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = SmolStr::new(element);
        self
    }

    /// Translates the atom by an arbitrary vector.
    pub fn translate_by(&mut self, vector: &Vector) {
        self.pos += vector;
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ id: {}, name: \"{}\", pos: [{:.3}, {:.3}, {:.3}] }}",
            self.id, self.name, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

/// Column-oriented atom storage.
///
/// Every column has the same length; row `i` of each column describes the same atom. The table
/// serializes as a plain list of [`Atom`] records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Atom>", into = "Vec<Atom>")]
pub struct AtomTable {
    ids: Vec<usize>,
    positions: Vec<Point>,
    names: Vec<SmolStr>,
    elements: Vec<SmolStr>,
    images: Vec<Option<TileIndex>>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `capacity` atoms in every column.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
            elements: Vec::with_capacity(capacity),
            images: Vec::with_capacity(capacity),
        }
    }

    /// Appends one atom row.
    pub fn push(&mut self, atom: Atom) {
        self.ids.push(atom.id);
        self.positions.push(atom.pos);
        self.names.push(atom.name);
        self.elements.push(atom.element);
        self.images.push(atom.image);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn names(&self) -> &[SmolStr] {
        &self.names
    }

    pub fn elements(&self) -> &[SmolStr] {
        &self.elements
    }

    pub fn images(&self) -> &[Option<TileIndex>] {
        &self.images
    }

    /// Materializes row `index` as an [`Atom`].
    pub fn get(&self, index: usize) -> Option<Atom> {
        (index < self.len()).then(|| Atom {
            id: self.ids[index],
            name: self.names[index].clone(),
            element: self.elements[index].clone(),
            pos: self.positions[index],
            image: self.images[index],
        })
    }

    /// Iterates over rows in storage order.
    pub fn iter(&self) -> impl Iterator<Item = Atom> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Returns a copy of the table whose positions are replaced column-wise.
    ///
    /// # Panics
    ///
    /// Panics if `positions` does not hold exactly one entry per atom.
    pub fn with_positions(&self, positions: Vec<Point>) -> Self {
        assert_eq!(
            positions.len(),
            self.len(),
            "Position column length must match the atom count"
        );
        Self {
            positions,
            ..self.clone()
        }
    }
}

impl From<Vec<Atom>> for AtomTable {
    fn from(atoms: Vec<Atom>) -> Self {
        atoms.into_iter().collect()
    }
}

impl From<AtomTable> for Vec<Atom> {
    fn from(table: AtomTable) -> Self {
        table.iter().collect()
    }
}

impl FromIterator<Atom> for AtomTable {
    fn from_iter<T: IntoIterator<Item = Atom>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut table = Self::with_capacity(iter.size_hint().0);
        for atom in iter {
            table.push(atom);
        }
        table
    }
}
