//! Minimum-image assignment of periodic bond offsets.
//!
//! For every bond the fractional displacement between its endpoints is wrapped into
//! `(-0.5, 0.5]` along each lattice axis. The removed integer shift identifies the periodic image
//! of the second atom that is nearest to the first, and is stored as the bond's image offset.
//! Offsets depend only on atom positions, so perceiving twice yields the same bonds.

use crate::model::{
    lattice::Lattice,
    structure::Structure,
    topology::Bond,
    types::{Vector, negate_offset},
};
use crate::ops::error::Error;
use crate::ops::tables::resolve_bonds;
use log::debug;

/// Assigns minimum-image offsets to every bond of a periodic structure.
///
/// Structures without a cell, or whose cell is flagged non-periodic, are returned unchanged.
/// Atom positions are never modified; bonds are re-canonicalized and keep their order values.
///
/// # Arguments
///
/// * `structure` - Structure whose bonds should be annotated.
///
/// # Returns
///
/// A new [`Structure`] with updated bond image offsets.
///
/// # Errors
///
/// Returns [`Error::Lattice`] for a degenerate cell or a displacement too large for an image
/// offset, and the table errors from bond resolution when a bond references a missing atom.
pub fn perceive_periodic_bonds(structure: &Structure) -> Result<Structure, Error> {
    let Some(cell) = structure.cell.as_ref().filter(|cell| cell.pbc) else {
        debug!("Skipping periodic bond perception for a non-periodic structure");
        return Ok(structure.clone());
    };

    let lattice = cell.lattice()?;
    let pairs = resolve_bonds(structure)?;
    let frac = fractional_positions(structure, &lattice);

    let mut changed = 0usize;
    let bonds = structure
        .bonds
        .iter()
        .zip(pairs)
        .map(|(bond, (i1, i2))| {
            let (_, shift) = Lattice::minimum_image(&(frac[i2] - frac[i1]))?;
            let image = negate_offset(shift);
            if bond.image != Some(image) {
                changed += 1;
            }
            Ok(Bond::with_image(bond.a1, bond.a2, bond.order, image))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    debug!(
        "Perceived periodic images for {} bonds ({} updated)",
        bonds.len(),
        changed
    );

    Ok(Structure {
        atoms: structure.atoms.clone(),
        bonds,
        cell: structure.cell.clone(),
    })
}

/// Computes each bond's length between `a1` and the image of `a2` selected by its offset.
///
/// Bonds without an offset are measured inside the home cell; non-periodic structures use plain
/// Cartesian distances.
///
/// # Errors
///
/// Same conditions as [`perceive_periodic_bonds`].
pub fn periodic_bond_lengths(structure: &Structure) -> Result<Vec<f64>, Error> {
    let pairs = resolve_bonds(structure)?;
    let positions = structure.atoms.positions();

    let lattice = match structure.cell.as_ref().filter(|cell| cell.pbc) {
        Some(cell) => Some(cell.lattice()?),
        None => None,
    };

    Ok(structure
        .bonds
        .iter()
        .zip(pairs)
        .map(|(bond, (i1, i2))| {
            let shift = lattice
                .as_ref()
                .map_or(Vector::zeros(), |l| l.image_translation(bond.image_or_zero()));
            (positions[i2] + shift - positions[i1]).norm()
        })
        .collect())
}

fn fractional_positions(structure: &Structure, lattice: &Lattice) -> Vec<Vector> {
    let cart: Vec<Vector> = structure
        .atoms
        .positions()
        .iter()
        .map(|p| p.coords)
        .collect();
    lattice.to_fractional(&cart)
}
