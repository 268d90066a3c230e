//! Consistency checks that translate bond identities into atom-table rows.

use crate::model::{atom::AtomTable, structure::Structure};
use crate::ops::error::Error;
use std::collections::HashMap;

/// Maps every atom identity to its row index.
///
/// # Errors
///
/// Returns [`Error::DuplicateAtomId`] when two rows share an identity.
pub(crate) fn index_atoms(atoms: &AtomTable) -> Result<HashMap<usize, usize>, Error> {
    let mut index = HashMap::with_capacity(atoms.len());
    for (row, &id) in atoms.ids().iter().enumerate() {
        if index.insert(id, row).is_some() {
            return Err(Error::DuplicateAtomId { id });
        }
    }
    Ok(index)
}

/// Resolves each bond to the pair of row indices of its endpoints, in bond order.
///
/// The returned pairs follow the stored `(a1, a2)` orientation, which is the orientation the
/// bond's image offset refers to.
///
/// # Errors
///
/// Returns [`Error::DuplicateAtomId`], [`Error::UnknownAtom`], or [`Error::SelfBond`] when the
/// atom and bond tables disagree.
pub(crate) fn resolve_bonds(structure: &Structure) -> Result<Vec<(usize, usize)>, Error> {
    let index = index_atoms(&structure.atoms)?;

    structure
        .bonds
        .iter()
        .map(|bond| {
            if bond.a1 == bond.a2 {
                return Err(Error::SelfBond { id: bond.a1 });
            }
            let lookup = |id: usize| {
                index.get(&id).copied().ok_or(Error::UnknownAtom {
                    a1: bond.a1,
                    a2: bond.a2,
                    missing: id,
                })
            };
            Ok((lookup(bond.a1)?, lookup(bond.a2)?))
        })
        .collect()
}
