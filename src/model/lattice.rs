//! Triclinic lattice geometry and exact fractional/Cartesian transforms.
//!
//! A [`LatticeMatrix`] stores the three cell edge vectors as matrix rows. It is built from the six
//! crystallographic cell parameters with the `a ∥ x`, `b` in the `xy` plane convention and is
//! validated up front, so no transform ever sees a degenerate cell. [`Lattice`] pairs a matrix
//! with its inverse for callers that convert many coordinates against the same cell.

use super::types::{ImageOffset, Vector};
use crate::utils::parallel::*;
use nalgebra::Matrix3;
use thiserror::Error;

/// Smallest admissible `|sin(gamma)|` before the cell is considered collapsed.
const SIN_GAMMA_TOLERANCE: f64 = 1e-10;

/// Negative `cz²` accepted as rounding noise, relative to `c²`.
const CZ_SQUARED_TOLERANCE: f64 = 1e-10;

/// Determinant threshold relative to the product of the row norms.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Failures raised while building or inverting a lattice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// The six cell parameters do not describe a realizable unit cell.
    #[error("invalid unit cell: {reason}")]
    InvalidCell { reason: String },

    /// The lattice matrix has no inverse.
    #[error("lattice matrix is singular (determinant {determinant:e})")]
    SingularMatrix { determinant: f64 },

    /// A fractional displacement is non-finite or too large for an integer image offset.
    #[error("fractional displacement {delta:?} has no representable image offset")]
    ImageOutOfRange { delta: [f64; 3] },
}

impl LatticeError {
    /// Helper for constructing an [`LatticeError::InvalidCell`] variant.
    pub fn invalid_cell(reason: impl Into<String>) -> Self {
        Self::InvalidCell {
            reason: reason.into(),
        }
    }
}

/// Coordinate containers accepted by the batch transforms.
///
/// Single vectors map to single vectors; slices map to freshly allocated vectors of the same
/// length. Every element goes through the same matrix product with no per-point branching.
pub trait Coordinates {
    /// Container produced by the transform.
    type Output;

    /// Applies `transform` to every coordinate (column-vector convention).
    fn apply(&self, transform: &Matrix3<f64>) -> Self::Output;
}

impl Coordinates for Vector {
    type Output = Vector;

    fn apply(&self, transform: &Matrix3<f64>) -> Vector {
        transform * self
    }
}

impl Coordinates for [f64; 3] {
    type Output = [f64; 3];

    fn apply(&self, transform: &Matrix3<f64>) -> [f64; 3] {
        (transform * Vector::from(*self)).into()
    }
}

impl Coordinates for [Vector] {
    type Output = Vec<Vector>;

    fn apply(&self, transform: &Matrix3<f64>) -> Vec<Vector> {
        self.par_iter().map(|v| transform * v).collect()
    }
}

impl Coordinates for Vec<Vector> {
    type Output = Vec<Vector>;

    fn apply(&self, transform: &Matrix3<f64>) -> Vec<Vector> {
        self.as_slice().apply(transform)
    }
}

/// 3×3 matrix whose rows are the Cartesian lattice vectors `a`, `b`, `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeMatrix(Matrix3<f64>);

impl LatticeMatrix {
    /// Builds the lattice matrix for the given cell lengths and angles (degrees).
    ///
    /// Rows follow the convention
    ///
    /// ```text
    /// a = (a, 0, 0)
    /// b = (b·cos γ, b·sin γ, 0)
    /// c = (c·cos β, c·(cos α − cos β·cos γ)/sin γ, √(c² − cx² − cy²))
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidCell`] for non-finite input, non-positive lengths, angles
    /// outside the open interval (0°, 180°), `sin γ ≈ 0`, or a negative implied `cz²`.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, LatticeError> {
        let params = [a, b, c, alpha, beta, gamma];
        if params.iter().any(|v| !v.is_finite()) {
            return Err(LatticeError::invalid_cell(format!(
                "non-finite cell parameter in {params:?}"
            )));
        }

        for (label, length) in [("a", a), ("b", b), ("c", c)] {
            if length <= 0.0 {
                return Err(LatticeError::invalid_cell(format!(
                    "cell length {label} = {length} must be positive"
                )));
            }
        }

        for (label, angle) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(angle > 0.0 && angle < 180.0) {
                return Err(LatticeError::invalid_cell(format!(
                    "cell angle {label} = {angle}° must lie strictly between 0° and 180°"
                )));
            }
        }

        let (alpha, beta, gamma) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
        let (cos_a, cos_b) = (alpha.cos(), beta.cos());
        let (sin_g, cos_g) = gamma.sin_cos();

        if sin_g.abs() < SIN_GAMMA_TOLERANCE {
            return Err(LatticeError::invalid_cell(format!(
                "sin(gamma) = {sin_g:e} is too close to zero"
            )));
        }

        let cx = c * cos_b;
        let cy = c * (cos_a - cos_b * cos_g) / sin_g;
        let cz_squared = c * c - cx * cx - cy * cy;

        if cz_squared < -CZ_SQUARED_TOLERANCE * c * c {
            return Err(LatticeError::invalid_cell(format!(
                "cell angles imply cz² = {cz_squared:e} < 0"
            )));
        }
        let cz = cz_squared.max(0.0).sqrt();

        Ok(Self(Matrix3::new(
            a,
            0.0,
            0.0,
            b * cos_g,
            b * sin_g,
            0.0,
            cx,
            cy,
            cz,
        )))
    }

    /// Wraps explicit lattice vectors without validation.
    pub fn from_rows(a: Vector, b: Vector, c: Vector) -> Self {
        Self(Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]))
    }

    /// Wraps a raw matrix whose rows are lattice vectors, without validation.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self(matrix)
    }

    /// Underlying row-major matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Lattice vector `a`.
    pub fn a(&self) -> Vector {
        self.0.row(0).transpose()
    }

    /// Lattice vector `b`.
    pub fn b(&self) -> Vector {
        self.0.row(1).transpose()
    }

    /// Lattice vector `c`.
    pub fn c(&self) -> Vector {
        self.0.row(2).transpose()
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Computes the matrix inverse.
    ///
    /// The determinant is compared against the product of the row norms, which makes the check
    /// independent of the length unit.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::SingularMatrix`] when the determinant is numerically zero.
    pub fn invert(&self) -> Result<Self, LatticeError> {
        let determinant = self.determinant();
        let scale: f64 = (0..3).map(|i| self.0.row(i).norm()).product();

        if !(determinant.abs() > SINGULAR_TOLERANCE * scale) {
            return Err(LatticeError::SingularMatrix { determinant });
        }

        self.0
            .try_inverse()
            .map(Self)
            .ok_or(LatticeError::SingularMatrix { determinant })
    }
}

/// Converts fractional coordinates to Cartesian ones: `r = f_a·a + f_b·b + f_c·c`.
///
/// Accepts a single vector or a batch; fractional values are not restricted to `[0, 1)`.
pub fn fractional_to_cartesian<C>(matrix: &LatticeMatrix, frac: &C) -> C::Output
where
    C: Coordinates + ?Sized,
{
    frac.apply(&matrix.0.transpose())
}

/// Converts Cartesian coordinates to fractional ones using an already inverted lattice.
pub fn cartesian_to_fractional<C>(inverse: &LatticeMatrix, cart: &C) -> C::Output
where
    C: Coordinates + ?Sized,
{
    cart.apply(&inverse.0.transpose())
}

/// Validated lattice bundled with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    matrix: LatticeMatrix,
    inverse: LatticeMatrix,
}

impl Lattice {
    /// Inverts `matrix` once and keeps both for repeated conversions.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::SingularMatrix`] when `matrix` cannot be inverted.
    pub fn new(matrix: LatticeMatrix) -> Result<Self, LatticeError> {
        let inverse = matrix.invert()?;
        Ok(Self { matrix, inverse })
    }

    /// Builds and inverts the lattice for the given cell parameters (angles in degrees).
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, LatticeError> {
        Self::new(LatticeMatrix::from_parameters(a, b, c, alpha, beta, gamma)?)
    }

    pub fn matrix(&self) -> &LatticeMatrix {
        &self.matrix
    }

    pub fn inverse(&self) -> &LatticeMatrix {
        &self.inverse
    }

    /// Cell volume, always non-negative.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Fractional → Cartesian for a single coordinate or a batch.
    pub fn to_cartesian<C>(&self, frac: &C) -> C::Output
    where
        C: Coordinates + ?Sized,
    {
        fractional_to_cartesian(&self.matrix, frac)
    }

    /// Cartesian → fractional for a single coordinate or a batch.
    pub fn to_fractional<C>(&self, cart: &C) -> C::Output
    where
        C: Coordinates + ?Sized,
    {
        cartesian_to_fractional(&self.inverse, cart)
    }

    /// Cartesian translation `i·a + j·b + k·c` for an integer image offset.
    pub fn image_translation(&self, offset: ImageOffset) -> Vector {
        self.to_cartesian(&Vector::new(
            offset[0] as f64,
            offset[1] as f64,
            offset[2] as f64,
        ))
    }

    /// Maps every fractional component into `[0, 1)`.
    pub fn wrap_fractional(frac: &Vector) -> Vector {
        frac.map(|f| {
            let wrapped = f - f.floor();
            // `f - floor(f)` rounds up to exactly 1.0 for tiny negative inputs.
            if wrapped >= 1.0 { 0.0 } else { wrapped }
        })
    }

    /// Applies the minimum-image convention to a fractional displacement.
    ///
    /// Returns the displacement with every component in `(-0.5, 0.5]` together with the integer
    /// shift that was removed, so that `delta == wrapped + shift`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::ImageOutOfRange`] when a component is non-finite or the shift
    /// does not fit in `±i32::MAX`.
    pub fn minimum_image(delta: &Vector) -> Result<(Vector, ImageOffset), LatticeError> {
        let shift = delta.map(|d| (d - 0.5).ceil());
        let out_of_range = || LatticeError::ImageOutOfRange {
            delta: [delta.x, delta.y, delta.z],
        };
        let offset = [
            checked_offset(shift.x).ok_or_else(out_of_range)?,
            checked_offset(shift.y).ok_or_else(out_of_range)?,
            checked_offset(shift.z).ok_or_else(out_of_range)?,
        ];
        Ok((delta - shift, offset))
    }
}

/// Converts an integral shift to an offset whose negation is also representable.
fn checked_offset(shift: f64) -> Option<i32> {
    let limit = i32::MAX as f64;
    (shift.is_finite() && (-limit..=limit).contains(&shift)).then_some(shift as i32)
}
