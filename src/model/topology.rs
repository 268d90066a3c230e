//! Bonded connectivity expressed between atom identities.
//!
//! Bonds are undirected, but the periodic image offset is directional: it places the second
//! endpoint relative to the first. Constructors therefore canonicalize the endpoint order and
//! negate the offset whenever they swap the endpoints, keeping equality and hashing of the
//! identity pair symmetric without losing geometric meaning.

use super::types::{ImageOffset, ZERO_OFFSET, negate_offset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Undirected bond between two atom identities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    /// Identity of the first atom (the lesser identity after canonicalization).
    pub a1: usize,
    /// Identity of the second atom.
    pub a2: usize,
    /// Opaque bond order, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Cell offset of the periodic image of `a2` that is bonded to `a1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageOffset>,
}

impl Bond {
    /// Creates a bond without periodic image information.
    ///
    /// The smaller identity is stored in `a1`.
    ///
    /// # Arguments
    ///
    /// * `id1` - Identity of one bonded atom.
    /// * `id2` - Identity of the partner atom.
    /// * `order` - Optional bond order carried for collaborators.
    pub fn new(id1: usize, id2: usize, order: Option<f64>) -> Self {
        Self::canonical(id1, id2, order, None)
    }

    /// Creates a bond whose second endpoint sits in the periodic image `image` relative to the
    /// first endpoint.
    ///
    /// When the endpoints are swapped during canonicalization the offset is negated, so the
    /// stored offset always describes `a2` as seen from `a1`.
    pub fn with_image(id1: usize, id2: usize, order: Option<f64>, image: ImageOffset) -> Self {
        Self::canonical(id1, id2, order, Some(image))
    }

    fn canonical(id1: usize, id2: usize, order: Option<f64>, image: Option<ImageOffset>) -> Self {
        if id1 <= id2 {
            Self {
                a1: id1,
                a2: id2,
                order,
                image,
            }
        } else {
            Self {
                a1: id2,
                a2: id1,
                order,
                image: image.map(negate_offset),
            }
        }
    }

    /// Identity pair `(a1, a2)`.
    pub fn pair(&self) -> (usize, usize) {
        (self.a1, self.a2)
    }

    /// Image offset, treating a missing annotation as the home cell.
    pub fn image_or_zero(&self) -> ImageOffset {
        self.image.unwrap_or(ZERO_OFFSET)
    }

    /// Whether the bond reaches into a neighbouring cell.
    pub fn is_periodic(&self) -> bool {
        self.image_or_zero() != ZERO_OFFSET
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [i, j, k] = self.image_or_zero();
        write!(f, "Bond {{ {}-{} image: ({}, {}, {}) }}", self.a1, self.a2, i, j, k)
    }
}
