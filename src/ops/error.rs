//! Shared error type returned by the operations modules.
//!
//! Lattice failures are forwarded unchanged; the remaining variants describe malformed inputs
//! (such as zero replication factors or inconsistent atom/bond tables) that are never silently
//! corrected.

use crate::model::lattice::LatticeError;
use thiserror::Error;

/// Error conditions surfaced by the operations layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The unit cell is degenerate or its lattice matrix cannot be inverted.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// A replication factor was zero.
    #[error("invalid replication factors {na}x{nb}x{nc}: every factor must be positive")]
    InvalidReplication { na: usize, nb: usize, nc: usize },

    /// The operation needs a unit cell but the structure has none.
    #[error("structure has no unit cell; {operation} requires one")]
    MissingCell { operation: &'static str },

    /// Two atoms share the same identity.
    #[error("duplicate atom id {id}")]
    DuplicateAtomId { id: usize },

    /// A bond references an identity absent from the atom table.
    #[error("bond {a1}-{a2} references unknown atom id {missing}")]
    UnknownAtom { a1: usize, a2: usize, missing: usize },

    /// A bond connects an atom to itself.
    #[error("bond connects atom {id} to itself")]
    SelfBond { id: usize },

    /// A rotation axis has zero length.
    #[error("rotation axis {axis:?} has zero length")]
    InvalidRotationAxis { axis: [f64; 3] },
}

impl Error {
    /// Helper for constructing an [`Error::MissingCell`] variant.
    pub fn missing_cell(operation: &'static str) -> Self {
        Self::MissingCell { operation }
    }
}
