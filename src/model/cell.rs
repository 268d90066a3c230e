//! Crystallographic unit-cell parameters.
//!
//! `CellParameters` is the value object exchanged with format loaders. It carries the six cell
//! constants, a periodicity flag, and an opaque space-group label that every operation passes
//! through unchanged.

use super::lattice::{Lattice, LatticeError, LatticeMatrix};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Unit-cell lengths, angles (degrees), and periodicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Whether the structure is periodic along all three lattice directions.
    #[serde(default = "default_pbc")]
    pub pbc: bool,
    /// Space-group symbol carried for collaborators; never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacegroup: Option<SmolStr>,
}

fn default_pbc() -> bool {
    true
}

impl CellParameters {
    /// Creates a periodic cell without space-group metadata.
    ///
    /// No validation happens here; call [`CellParameters::lattice`] to check that the
    /// parameters describe a realizable cell.
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            pbc: true,
            spacegroup: None,
        }
    }

    /// Cubic/orthorhombic shorthand with all angles at 90°.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(a, b, c, 90.0, 90.0, 90.0)
    }

    /// Sets the periodicity flag.
    pub fn with_pbc(mut self, pbc: bool) -> Self {
        self.pbc = pbc;
        self
    }

    /// Attaches an opaque space-group label.
    pub fn with_spacegroup(mut self, spacegroup: impl Into<SmolStr>) -> Self {
        self.spacegroup = Some(spacegroup.into());
        self
    }

    /// Builds the row-vector lattice matrix for these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidCell`] when the parameters are degenerate.
    pub fn lattice_matrix(&self) -> Result<LatticeMatrix, LatticeError> {
        LatticeMatrix::from_parameters(self.a, self.b, self.c, self.alpha, self.beta, self.gamma)
    }

    /// Builds the lattice together with its inverse.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidCell`] for degenerate parameters and
    /// [`LatticeError::SingularMatrix`] for a flat cell.
    pub fn lattice(&self) -> Result<Lattice, LatticeError> {
        Lattice::new(self.lattice_matrix()?)
    }

    /// Returns a copy with lengths multiplied by the replication factors.
    ///
    /// Angles, the periodicity flag, and the space-group label are unchanged.
    pub fn scaled(&self, na: usize, nb: usize, nc: usize) -> Self {
        Self {
            a: self.a * na as f64,
            b: self.b * nb as f64,
            c: self.c * nc as f64,
            ..self.clone()
        }
    }
}

impl fmt::Display for CellParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell {{ a: {:.4}, b: {:.4}, c: {:.4}, alpha: {:.3}, beta: {:.3}, gamma: {:.3}, pbc: {} }}",
            self.a, self.b, self.c, self.alpha, self.beta, self.gamma, self.pbc
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_creates_periodic_cell_without_spacegroup() {
        let cell = CellParameters::new(1.0, 2.0, 3.0, 80.0, 90.0, 100.0);

        assert!(cell.pbc);
        assert!(cell.spacegroup.is_none());
    }

    #[test]
    fn scaled_multiplies_lengths_for_monoclinic_cell() {
        let cell = CellParameters::new(10.0, 12.0, 8.0, 90.0, 100.0, 90.0);

        let scaled = cell.scaled(2, 1, 3);

        assert_close(scaled.a, 20.0);
        assert_close(scaled.b, 12.0);
        assert_close(scaled.c, 24.0);
        assert_eq!((scaled.alpha, scaled.beta, scaled.gamma), (90.0, 100.0, 90.0));
    }

    #[test]
    fn scaled_passes_metadata_through() {
        let cell = CellParameters::orthorhombic(4.0, 4.0, 4.0)
            .with_pbc(false)
            .with_spacegroup("P 1");

        let scaled = cell.scaled(2, 2, 2);

        assert!(!scaled.pbc);
        assert_eq!(scaled.spacegroup.as_deref(), Some("P 1"));
    }

    #[test]
    fn lattice_propagates_invalid_cell() {
        let cell = CellParameters::new(1.0, 1.0, 1.0, 0.0, 0.0, 60.0);

        assert!(matches!(
            cell.lattice(),
            Err(LatticeError::InvalidCell { .. })
        ));
    }

    #[test]
    fn scaled_lattice_vectors_are_multiples_of_base_vectors() {
        let cell = CellParameters::new(10.0, 10.0, 15.0, 90.0, 90.0, 120.0);
        let base = cell.lattice_matrix().unwrap();

        let scaled = cell.scaled(3, 2, 1).lattice_matrix().unwrap();

        assert!((scaled.a() - base.a() * 3.0).norm() < 1e-12);
        assert!((scaled.b() - base.b() * 2.0).norm() < 1e-12);
        assert!((scaled.c() - base.c()).norm() < 1e-12);
    }

    #[test]
    fn deserialize_defaults_pbc_to_true() {
        let json = r#"{"a":1.0,"b":2.0,"c":3.0,"alpha":90.0,"beta":90.0,"gamma":90.0}"#;

        let cell: CellParameters = serde_json::from_str(json).unwrap();

        assert!(cell.pbc);
        assert_eq!(cell, CellParameters::orthorhombic(1.0, 2.0, 3.0));
    }
}
