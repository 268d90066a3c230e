//! Core data structures for periodic crystal structures.
//!
//! This module defines unit cells, lattice geometry, atom tables, bonds, and the structure and
//! supercell containers. These types are produced by format loaders outside this crate and are
//! consumed by the operations in [`crate::ops`].

pub mod atom;
pub mod cell;
pub mod lattice;
pub mod structure;
pub mod topology;
pub mod types;
