//! Connectivity summaries for replicated frameworks.
//!
//! Atoms are the vertices and bonds the undirected edges; image offsets are ignored, so a bond
//! stitched across a supercell face joins its endpoints like any other bond.

use crate::model::structure::{Structure, Supercell};
use crate::ops::error::Error;
use crate::ops::tables::resolve_bonds;
use log::debug;
use petgraph::unionfind::UnionFind;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Atom, bond, and connected-component counts of a structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    pub atom_count: usize,
    pub bond_count: usize,
    pub connected_component_count: usize,
    /// Size of every component, largest first.
    pub component_sizes: Vec<usize>,
}

impl ConnectivityReport {
    /// Whether all atoms belong to one bonded network.
    pub fn is_single_framework(&self) -> bool {
        self.connected_component_count == 1
    }

    /// Number of atoms not bonded to anything.
    pub fn isolated_atom_count(&self) -> usize {
        self.component_sizes.iter().filter(|&&size| size == 1).count()
    }
}

impl fmt::Display for ConnectivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectivityReport {{ atoms: {}, bonds: {}, components: {} }}",
            self.atom_count, self.bond_count, self.connected_component_count
        )
    }
}

/// Counts atoms, bonds, and connected components of a structure.
///
/// An empty structure has zero components; an atom without bonds is its own component.
///
/// # Errors
///
/// Returns the table errors from bond resolution when a bond references a missing atom, an atom
/// identity is duplicated, or a bond joins an atom to itself.
pub fn analyze_connectivity(structure: &Structure) -> Result<ConnectivityReport, Error> {
    let pairs = resolve_bonds(structure)?;
    let atom_count = structure.atom_count();

    let mut components = UnionFind::<usize>::new(atom_count);
    for &(r1, r2) in &pairs {
        components.union(r1, r2);
    }

    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for root in components.into_labeling() {
        *sizes.entry(root).or_default() += 1;
    }
    let mut component_sizes: Vec<usize> = sizes.into_values().collect();
    component_sizes.sort_unstable_by(|a, b| b.cmp(a));

    let report = ConnectivityReport {
        atom_count,
        bond_count: structure.bond_count(),
        connected_component_count: component_sizes.len(),
        component_sizes,
    };
    debug!("{report}");
    Ok(report)
}

/// Reports the connectivity of a replicated supercell.
///
/// # Errors
///
/// Same conditions as [`analyze_connectivity`].
pub fn validate_supercell(supercell: &Supercell) -> Result<ConnectivityReport, Error> {
    analyze_connectivity(supercell.structure())
}
