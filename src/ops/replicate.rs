//! Supercell construction by tiling a unit cell along its lattice vectors.
//!
//! Tiles are enumerated in row-major order over `(i, j, k)` with `k` varying fastest. Tile `t`
//! occupies output rows `t·N .. (t+1)·N`, and every output atom's identity is its row index.
//! Replicated names are qualified with the tile triple so that they stay unique across the whole
//! supercell, whether or not tile annotations are requested.

use crate::model::{
    atom::{Atom, AtomTable},
    lattice::fractional_to_cartesian,
    structure::{Structure, Supercell},
    topology::Bond,
    types::{ImageOffset, TileIndex, Vector, ZERO_OFFSET},
};
use crate::ops::error::Error;
use crate::ops::tables::resolve_bonds;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::collections::HashSet;

/// Options controlling supercell replication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicateConfig {
    /// Attach the origin tile `(i, j, k)` to every replicated atom.
    pub add_image_indices: bool,
    /// Reconnect periodic bonds across tile boundaries using their image offsets.
    ///
    /// When disabled, every bond is copied inside each tile. A zero offset stays valid there;
    /// a non-zero offset pointed at another tile, so it is cleared and the bond is measured
    /// inside its tile. Bonds repeating an endpoint pair within a tile are dropped.
    ///
    /// When enabled, a bond with offset `(di, dj, dk)` links tile `(i, j, k)` to tile
    /// `((i + di) mod na, (j + dj) mod nb, (k + dk) mod nc)` and its offset is re-expressed in
    /// supercell units, so bond lengths match the unit cell. Bonds are then distinct per
    /// endpoint pair and offset, and exactly one bond per base bond per tile is produced.
    pub stitch_periodic_bonds: bool,
}

impl ReplicateConfig {
    /// Enables or disables tile annotations.
    pub fn with_image_indices(mut self, enabled: bool) -> Self {
        self.add_image_indices = enabled;
        self
    }

    /// Enables or disables cross-tile stitching of periodic bonds.
    pub fn with_stitching(mut self, enabled: bool) -> Self {
        self.stitch_periodic_bonds = enabled;
        self
    }
}

/// Replicates a structure into an `na × nb × nc` supercell.
///
/// Each tile receives a full copy of the atoms translated by `i·a + j·b + k·c`. Bonds are copied
/// per tile with both endpoints remapped into the output identities, canonicalized, and
/// deduplicated. The returned cell has lengths `(a·na, b·nb, c·nc)` and keeps the angles, the
/// periodicity flag, and the space-group label.
///
/// # Arguments
///
/// * `structure` - Unit-cell structure to tile; must carry a cell.
/// * `dims` - Replication factors `[na, nb, nc]`, all positive.
/// * `config` - Annotation and stitching options.
///
/// # Returns
///
/// A [`Supercell`] with `N·na·nb·nc` atoms and `B·na·nb·nc` bonds when the base bonds are
/// distinct.
///
/// # Errors
///
/// Returns [`Error::InvalidReplication`] for a zero factor, [`Error::MissingCell`] when the
/// structure has no cell, [`Error::Lattice`] for a degenerate cell, and the table errors from
/// bond resolution for inconsistent atom/bond tables.
pub fn replicate_supercell(
    structure: &Structure,
    dims: TileIndex,
    config: &ReplicateConfig,
) -> Result<Supercell, Error> {
    let [na, nb, nc] = dims;
    if na == 0 || nb == 0 || nc == 0 {
        return Err(Error::InvalidReplication { na, nb, nc });
    }

    let cell = structure
        .cell
        .as_ref()
        .ok_or(Error::missing_cell("supercell replication"))?;
    let matrix = cell.lattice_matrix()?;
    let pairs = resolve_bonds(structure)?;

    let tiles = tile_grid(dims);
    let translations: Vec<Vector> = tiles
        .iter()
        .map(|&[i, j, k]| {
            fractional_to_cartesian(&matrix, &Vector::new(i as f64, j as f64, k as f64))
        })
        .collect();

    let base = &structure.atoms;
    let n_atoms = base.len();
    let base_names = unique_base_names(base.names());

    let mut atoms = AtomTable::with_capacity(n_atoms * tiles.len());
    for (t, (tile, shift)) in tiles.iter().zip(&translations).enumerate() {
        let [i, j, k] = *tile;
        for row in 0..n_atoms {
            atoms.push(Atom {
                id: t * n_atoms + row,
                name: format_smolstr!("{}_{}_{}_{}", base_names[row], i, j, k),
                element: base.elements()[row].clone(),
                pos: base.positions()[row] + shift,
                image: config.add_image_indices.then_some(*tile),
            });
        }
    }

    let mut bonds = Vec::with_capacity(structure.bond_count() * tiles.len());
    let mut seen = HashSet::with_capacity(bonds.capacity());
    let mut dropped = 0usize;

    for (t, tile) in tiles.iter().enumerate() {
        for (bond, &(r1, r2)) in structure.bonds.iter().zip(&pairs) {
            let id1 = t * n_atoms + r1;
            let replicated = if config.stitch_periodic_bonds {
                let (partner, wrap) = shift_tile(*tile, bond.image_or_zero(), dims);
                let id2 = tile_ordinal(partner, dims) * n_atoms + r2;
                Bond::with_image(id1, id2, bond.order, wrap)
            } else {
                let id2 = t * n_atoms + r2;
                match bond.image.filter(|&image| image == ZERO_OFFSET) {
                    Some(image) => Bond::with_image(id1, id2, bond.order, image),
                    None => Bond::new(id1, id2, bond.order),
                }
            };

            let key_image = replicated.image.filter(|_| config.stitch_periodic_bonds);
            if seen.insert((replicated.a1, replicated.a2, key_image)) {
                bonds.push(replicated);
            } else {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {dropped} duplicate bonds while replicating {na}x{nb}x{nc} supercell");
    }
    debug!(
        "Replicated {} atoms and {} bonds into {na}x{nb}x{nc} supercell ({} atoms, {} bonds)",
        n_atoms,
        structure.bond_count(),
        atoms.len(),
        bonds.len()
    );

    let replicated = Structure::from_parts(atoms, bonds, Some(cell.scaled(na, nb, nc)));
    Ok(Supercell::new(replicated, dims))
}

/// Enumerates tile triples in row-major order (`k` fastest).
fn tile_grid([na, nb, nc]: TileIndex) -> Vec<TileIndex> {
    let mut tiles = Vec::with_capacity(na * nb * nc);
    for i in 0..na {
        for j in 0..nb {
            for k in 0..nc {
                tiles.push([i, j, k]);
            }
        }
    }
    tiles
}

/// Position of a tile in the row-major enumeration.
fn tile_ordinal([i, j, k]: TileIndex, [_, nb, nc]: TileIndex) -> usize {
    (i * nb + j) * nc + k
}

/// Moves `tile` by `offset` with periodic wrap-around inside the grid.
///
/// Returns the destination tile and the number of whole supercells crossed along each axis.
fn shift_tile(tile: TileIndex, offset: ImageOffset, dims: TileIndex) -> (TileIndex, ImageOffset) {
    let mut destination = [0usize; 3];
    let mut crossed = [0i32; 3];
    for axis in 0..3 {
        let target = tile[axis] as i64 + offset[axis] as i64;
        let extent = dims[axis] as i64;
        destination[axis] = target.rem_euclid(extent) as usize;
        crossed[axis] = target.div_euclid(extent) as i32;
    }
    (destination, crossed)
}

/// Makes base-cell names pairwise distinct before tile qualification.
///
/// The first occurrence of a name is kept verbatim; later repeats receive a `__n` suffix
/// (`n ≥ 2`) that collides with neither an input name nor an earlier suffix.
fn unique_base_names(names: &[SmolStr]) -> Vec<SmolStr> {
    let mut taken: HashSet<SmolStr> = names.iter().cloned().collect();
    let mut seen: HashSet<SmolStr> = HashSet::with_capacity(names.len());

    names
        .iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name.clone();
            }
            let mut suffix = 2usize;
            loop {
                let candidate = format_smolstr!("{name}__{suffix}");
                if taken.insert(candidate.clone()) {
                    seen.insert(candidate.clone());
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{cell::CellParameters, lattice::LatticeError, types::Point};
    use crate::ops::{perceive_periodic_bonds, periodic_bond_lengths};

    fn small_structure(cell: CellParameters) -> Structure {
        let mut structure = Structure::new().with_cell(cell);
        structure.add_atom(Atom::new(0, "A1", Point::new(0.0, 0.0, 0.0)).with_element("C"));
        structure.add_atom(Atom::new(1, "A2", Point::new(1.0, 0.2, 0.3)).with_element("H"));
        structure.add_atom(Atom::new(2, "A3", Point::new(2.0, 0.1, 0.4)).with_element("O"));
        structure.add_bond(Bond::new(0, 1, Some(1.0)));
        structure.add_bond(Bond::new(1, 2, Some(1.0)));
        structure
    }

    fn monoclinic() -> CellParameters {
        CellParameters::new(10.0, 12.0, 8.0, 90.0, 100.0, 90.0).with_spacegroup("P 1")
    }

    fn hexagonal() -> CellParameters {
        CellParameters::new(10.0, 10.0, 15.0, 90.0, 90.0, 120.0)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_cell_scaled(base: &CellParameters, scaled: &CellParameters, dims: TileIndex) {
        assert_close(scaled.a, base.a * dims[0] as f64);
        assert_close(scaled.b, base.b * dims[1] as f64);
        assert_close(scaled.c, base.c * dims[2] as f64);
        assert_close(scaled.alpha, base.alpha);
        assert_close(scaled.beta, base.beta);
        assert_close(scaled.gamma, base.gamma);
    }

    fn assert_bonds_valid(structure: &Structure) {
        let atom_count = structure.atom_count();
        let mut pairs = HashSet::new();
        for bond in &structure.bonds {
            assert!(bond.a1 < atom_count && bond.a2 < atom_count);
            assert!(bond.a1 < bond.a2);
            pairs.insert(bond.pair());
        }
        assert_eq!(pairs.len(), structure.bond_count());
    }

    fn assert_names_unique(structure: &Structure) {
        let names: HashSet<_> = structure.atoms.names().iter().collect();
        assert_eq!(names.len(), structure.atom_count());
    }

    #[test]
    fn replicate_monoclinic_scales_counts_cell_and_bonds() {
        let base = small_structure(monoclinic());
        let dims = [2, 1, 3];

        let supercell =
            replicate_supercell(&base, dims, &ReplicateConfig::default().with_image_indices(true))
                .unwrap();
        let out = supercell.structure();

        assert_eq!(supercell.image_count(), 6);
        assert_eq!(out.atom_count(), 3 * 6);
        assert_eq!(out.bond_count(), 2 * 6);
        assert_names_unique(out);
        assert_bonds_valid(out);
        assert_cell_scaled(base.cell.as_ref().unwrap(), supercell.cell().unwrap(), dims);
        assert_close(supercell.cell().unwrap().a, 20.0);
        assert_close(supercell.cell().unwrap().b, 12.0);
        assert_close(supercell.cell().unwrap().c, 24.0);
    }

    #[test]
    fn replicate_hexagonal_scales_counts_cell_and_bonds() {
        let base = small_structure(hexagonal());
        let dims = [3, 2, 1];

        let supercell = replicate_supercell(&base, dims, &ReplicateConfig::default()).unwrap();
        let out = supercell.structure();

        assert_eq!(out.atom_count(), 3 * 6);
        assert_eq!(out.bond_count(), 2 * 6);
        assert_names_unique(out);
        assert_bonds_valid(out);
        assert_cell_scaled(base.cell.as_ref().unwrap(), supercell.cell().unwrap(), dims);
        assert_close(supercell.cell().unwrap().a, 30.0);
        assert_close(supercell.cell().unwrap().b, 20.0);
        assert_close(supercell.cell().unwrap().c, 15.0);
    }

    #[test]
    fn replicate_preserves_cell_metadata() {
        let base = small_structure(monoclinic().with_pbc(false));

        let supercell = replicate_supercell(&base, [2, 2, 2], &ReplicateConfig::default()).unwrap();

        let cell = supercell.cell().unwrap();
        assert!(!cell.pbc);
        assert_eq!(cell.spacegroup.as_deref(), Some("P 1"));
    }

    #[test]
    fn replicate_assigns_identities_equal_to_row_index() {
        let base = small_structure(hexagonal());

        let supercell = replicate_supercell(&base, [2, 2, 1], &ReplicateConfig::default()).unwrap();

        let ids = supercell.structure().atoms.ids();
        assert!(ids.iter().enumerate().all(|(row, &id)| row == id));
    }

    #[test]
    fn replicate_enumerates_tiles_in_row_major_order() {
        let base = small_structure(monoclinic());
        let config = ReplicateConfig::default().with_image_indices(true);

        let supercell = replicate_supercell(&base, [2, 2, 3], &config).unwrap();

        let images = supercell.structure().atoms.images();
        assert_eq!(images[0], Some([0, 0, 0]));
        assert_eq!(images[3], Some([0, 0, 1]));
        assert_eq!(images[3 * 3], Some([0, 1, 0]));
        assert_eq!(images[3 * 6], Some([1, 0, 0]));
        assert_eq!(images[3 * 11 + 2], Some([1, 1, 2]));
    }

    #[test]
    fn replicate_translates_atoms_by_lattice_vectors() {
        let base = small_structure(hexagonal());
        let matrix = base.cell.as_ref().unwrap().lattice_matrix().unwrap();
        let config = ReplicateConfig::default().with_image_indices(true);

        let supercell = replicate_supercell(&base, [3, 2, 1], &config).unwrap();
        let out = &supercell.structure().atoms;

        for row in 0..out.len() {
            let [i, j, k] = out.images()[row].unwrap();
            let base_pos = base.atoms.positions()[row % 3];
            let expected =
                base_pos + matrix.a() * i as f64 + matrix.b() * j as f64 + matrix.c() * k as f64;
            assert!((out.positions()[row] - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn replicate_omits_image_annotations_by_default() {
        let base = small_structure(hexagonal());

        let supercell = replicate_supercell(&base, [2, 1, 1], &ReplicateConfig::default()).unwrap();

        assert!(supercell.structure().atoms.images().iter().all(Option::is_none));
        assert_eq!(supercell.structure().atoms.names()[3], "A1_1_0_0");
    }

    #[test]
    fn replicate_keeps_names_unique_with_duplicate_base_names() {
        let mut base = Structure::new().with_cell(hexagonal());
        for (id, name) in ["O", "O", "O__2", "O"].into_iter().enumerate() {
            base.add_atom(Atom::new(id, name, Point::new(id as f64, 0.0, 0.0)));
        }

        let supercell = replicate_supercell(&base, [2, 2, 2], &ReplicateConfig::default()).unwrap();

        assert_names_unique(supercell.structure());
        let first_tile: Vec<_> = supercell.structure().atoms.names()[..4]
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            first_tile,
            vec!["O_0_0_0", "O__3_0_0_0", "O__2_0_0_0", "O__4_0_0_0"]
        );
    }

    #[test]
    fn replicate_passes_element_and_order_through() {
        let base = small_structure(monoclinic());

        let supercell = replicate_supercell(&base, [1, 2, 1], &ReplicateConfig::default()).unwrap();
        let out = supercell.structure();

        assert_eq!(out.atoms.elements()[4], "H");
        assert!(out.bonds.iter().all(|b| b.order == Some(1.0)));
    }

    #[test]
    fn replicate_keeps_bonds_inside_their_tile() {
        let base = small_structure(monoclinic());

        let supercell = replicate_supercell(&base, [2, 2, 2], &ReplicateConfig::default()).unwrap();

        for bond in &supercell.structure().bonds {
            assert_eq!(bond.a1 / 3, bond.a2 / 3);
        }
    }

    #[test]
    fn replicate_stitches_periodic_bonds_into_neighbouring_tiles() {
        let mut base = Structure::new().with_cell(CellParameters::orthorhombic(4.0, 4.0, 4.0));
        base.add_atom(Atom::new(0, "A", Point::new(0.5, 2.0, 2.0)));
        base.add_atom(Atom::new(1, "B", Point::new(2.5, 2.0, 2.0)));
        base.add_bond(Bond::with_image(0, 1, None, [0, 0, 0]));
        base.add_bond(Bond::with_image(0, 1, None, [-1, 0, 0]));
        let config = ReplicateConfig::default().with_stitching(true);

        let supercell = replicate_supercell(&base, [3, 1, 1], &config).unwrap();
        let bonds = &supercell.structure().bonds;

        assert_eq!(bonds.len(), 6);
        // Tile 0's A reaches B of tile 2 through the lower supercell face.
        assert!(bonds.contains(&Bond::with_image(0, 5, None, [-1, 0, 0])));
        // Tile 1's A reaches B of tile 0 inside the supercell.
        assert!(bonds.contains(&Bond::with_image(2, 1, None, [0, 0, 0])));
        assert_bonds_valid(supercell.structure());
    }

    fn periodic_pair() -> Structure {
        let mut base = Structure::new().with_cell(CellParameters::orthorhombic(4.0, 4.0, 4.0));
        base.add_atom(Atom::new(0, "A", Point::new(0.5, 2.0, 2.0)));
        base.add_atom(Atom::new(1, "B", Point::new(3.5, 2.0, 2.0)));
        base.add_atom(Atom::new(2, "C", Point::new(2.0, 2.0, 2.0)));
        base.add_bond(Bond::with_image(0, 1, Some(1.0), [-1, 0, 0]));
        base.add_bond(Bond::with_image(0, 2, Some(1.0), [0, 0, 0]));
        base
    }

    #[test]
    fn replicate_without_stitching_clears_offsets_that_leave_the_tile() {
        let base = periodic_pair();

        let supercell = replicate_supercell(&base, [2, 1, 1], &ReplicateConfig::default()).unwrap();

        assert_eq!(
            supercell.structure().bonds,
            vec![
                Bond::new(0, 1, Some(1.0)),
                Bond::with_image(0, 2, Some(1.0), [0, 0, 0]),
                Bond::new(3, 4, Some(1.0)),
                Bond::with_image(3, 5, Some(1.0), [0, 0, 0]),
            ]
        );
    }

    #[test]
    fn replicate_without_stitching_keeps_offsets_consistent_with_scaled_cell() {
        let base = periodic_pair();

        let supercell = replicate_supercell(&base, [2, 1, 1], &ReplicateConfig::default()).unwrap();
        let lengths = periodic_bond_lengths(supercell.structure()).unwrap();
        let reperceived = perceive_periodic_bonds(supercell.structure()).unwrap();

        assert_eq!(lengths.len(), 4);
        assert!((lengths[0] - 3.0).abs() < 1e-9);
        assert!((lengths[1] - 1.5).abs() < 1e-9);
        let reperceived_lengths = periodic_bond_lengths(&reperceived).unwrap();
        for (before, after) in lengths.iter().zip(&reperceived_lengths) {
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn replicate_with_stitching_preserves_base_bond_lengths() {
        let base = periodic_pair();
        let base_lengths = periodic_bond_lengths(&base).unwrap();
        let config = ReplicateConfig::default().with_stitching(true);

        let supercell = replicate_supercell(&base, [2, 2, 1], &config).unwrap();
        let lengths = periodic_bond_lengths(supercell.structure()).unwrap();

        assert!((base_lengths[0] - 1.0).abs() < 1e-9);
        assert_eq!(lengths.len(), base_lengths.len() * 4);
        for tile_lengths in lengths.chunks(base_lengths.len()) {
            for (actual, expected) in tile_lengths.iter().zip(&base_lengths) {
                assert!((actual - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn replicate_without_stitching_collapses_repeated_endpoint_pairs() {
        let mut base = Structure::new().with_cell(CellParameters::orthorhombic(4.0, 4.0, 4.0));
        base.add_atom(Atom::new(0, "A", Point::new(0.5, 2.0, 2.0)));
        base.add_atom(Atom::new(1, "B", Point::new(2.5, 2.0, 2.0)));
        base.add_bond(Bond::with_image(0, 1, None, [0, 0, 0]));
        base.add_bond(Bond::with_image(0, 1, None, [-1, 0, 0]));

        let intra = replicate_supercell(&base, [2, 1, 1], &ReplicateConfig::default()).unwrap();
        let stitched = replicate_supercell(
            &base,
            [2, 1, 1],
            &ReplicateConfig::default().with_stitching(true),
        )
        .unwrap();

        assert_eq!(intra.structure().bond_count(), 2);
        assert_bonds_valid(intra.structure());
        assert_eq!(stitched.structure().bond_count(), 4);
        assert_bonds_valid(stitched.structure());
    }

    #[test]
    fn replicate_rejects_zero_factors() {
        let base = small_structure(monoclinic());

        let err = replicate_supercell(&base, [2, 0, 1], &ReplicateConfig::default()).unwrap_err();

        assert_eq!(err, Error::InvalidReplication { na: 2, nb: 0, nc: 1 });
    }

    #[test]
    fn replicate_requires_cell() {
        let mut base = small_structure(monoclinic());
        base.cell = None;

        let err = replicate_supercell(&base, [1, 1, 1], &ReplicateConfig::default()).unwrap_err();

        assert!(matches!(err, Error::MissingCell { .. }));
    }

    #[test]
    fn replicate_propagates_invalid_cell() {
        let base = small_structure(CellParameters::new(5.0, 5.0, 5.0, 90.0, 90.0, 1e-14));

        let err = replicate_supercell(&base, [1, 1, 1], &ReplicateConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            Error::Lattice(LatticeError::InvalidCell { .. })
        ));
    }

    #[test]
    fn replicate_rejects_inconsistent_bond_table() {
        let mut base = small_structure(monoclinic());
        base.add_bond(Bond::new(2, 9, None));

        let err = replicate_supercell(&base, [1, 1, 1], &ReplicateConfig::default()).unwrap_err();

        assert!(matches!(err, Error::UnknownAtom { missing: 9, .. }));
    }

    #[test]
    fn shift_tile_wraps_and_counts_crossings() {
        assert_eq!(shift_tile([0, 1, 2], [-1, 1, 1], [2, 2, 3]), ([1, 0, 0], [-1, 1, 1]));
        assert_eq!(shift_tile([1, 0, 0], [0, 0, 0], [2, 2, 3]), ([1, 0, 0], [0, 0, 0]));
        assert_eq!(shift_tile([0, 0, 0], [5, 0, 0], [2, 1, 1]), ([1, 0, 0], [2, 0, 0]));
    }

    #[test]
    fn tile_ordinal_matches_enumeration_order() {
        let dims = [2, 3, 4];

        for (t, tile) in tile_grid(dims).into_iter().enumerate() {
            assert_eq!(tile_ordinal(tile, dims), t);
        }
    }
}
