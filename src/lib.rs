//! # CellForge
//!
//! **CellForge** is a pure-Rust toolkit for periodic crystal structures. It turns unit-cell parameters into triclinic lattice matrices, assigns minimum-image offsets to bonds that cross cell faces, tiles unit cells into supercells, and reports whether the result forms one bonded network. The crate favors deterministic workflows, strong typing, and clean error surfaces so framework pipelines remain auditable from cell parameters to connectivity checks.
//!
//! ## Features
//!
//! - **Lattice geometry** – `LatticeMatrix` and `Lattice` build the standard a-along-x, b-in-xy orientation from `(a, b, c, α, β, γ)` and convert batches of fractional and Cartesian coordinates backed by `nalgebra`.
//! - **Structure model** – Column-oriented `AtomTable`, canonical `Bond` records with periodic image offsets, and `Structure`/`Supercell` containers that serialize with `serde`.
//! - **Periodic bond perception** – Minimum-image offsets make bonds across cell faces explicit and idempotent.
//! - **Supercell replication** – Row-major tiling with unique names, optional tile annotations, and optional stitching of periodic bonds across tile boundaries.
//! - **Connectivity validation** – Union-find component counting confirms that a replicated framework stays connected.
//!
//! ## Quick Start
//!
//! ```
//! use cell_forge::ops::{
//!     ReplicateConfig, perceive_periodic_bonds, replicate_supercell, validate_supercell,
//! };
//! use cell_forge::{Atom, Bond, CellParameters, Point, Structure};
//!
//! let mut structure = Structure::new().with_cell(CellParameters::orthorhombic(4.0, 4.0, 4.0));
//! structure.add_atom(Atom::new(0, "A", Point::new(0.5, 2.0, 2.0)));
//! structure.add_atom(Atom::new(1, "B", Point::new(2.0, 2.0, 2.0)));
//! structure.add_atom(Atom::new(2, "C", Point::new(3.5, 2.0, 2.0)));
//! structure.add_bond(Bond::new(0, 1, None));
//! structure.add_bond(Bond::new(1, 2, None));
//! structure.add_bond(Bond::new(2, 0, None));
//!
//! let perceived = perceive_periodic_bonds(&structure)?;
//! let config = ReplicateConfig::default().with_stitching(true);
//! let supercell = replicate_supercell(&perceived, [2, 2, 2], &config)?;
//! let report = validate_supercell(&supercell)?;
//!
//! assert_eq!(report.atom_count, 24);
//! assert_eq!(report.bond_count, 24);
//! assert_eq!(report.connected_component_count, 4);
//! # Ok::<(), cell_forge::ops::Error>(())
//! ```

mod model;
mod utils;

pub mod ops;

pub use model::atom::{Atom, AtomTable};
pub use model::cell::CellParameters;
pub use model::lattice::{
    Coordinates, Lattice, LatticeError, LatticeMatrix, cartesian_to_fractional,
    fractional_to_cartesian,
};
pub use model::structure::{Structure, Supercell};
pub use model::topology::Bond;
pub use model::types::{ImageOffset, Point, TileIndex, Vector};
