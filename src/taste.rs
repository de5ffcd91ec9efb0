//! Fixed-dimension taste vectors and the arithmetic used to rank recipes.
//!
//! A taste profile is an 8-dimensional vector over a fixed dimension order.
//! Vectors are either all-zero (no signal) or unit-normalized.

use crate::flavordb::CompoundRecord;

/// Dimension order is fixed; every vector is indexed by this list.
pub const TASTE_DIMENSIONS: [&str; 8] = [
    "sweet", "fruity", "bitter", "umami", "salty", "sour", "spicy", "nutty",
];

/// Epsilon added to the cosine denominator to avoid division by zero
/// when either vector is all-zero.
const COSINE_EPSILON: f64 = 1e-9;

/// An 8-dimensional taste profile.
///
/// Invariant: either all-zero or Euclidean norm 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TasteVector(pub [f64; TASTE_DIMENSIONS.len()]);

impl TasteVector {
    pub fn zero() -> Self {
        Self([0.0; TASTE_DIMENSIONS.len()])
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.norm() == 0.0
    }
}

/// Build a taste vector from a list of compound records.
///
/// For each record's taste descriptor (lowercased), every dimension whose
/// name appears as a substring is incremented by 1. A single descriptor may
/// match several dimensions, but contributes at most 1 to each. Substring
/// matching is intentional and kept as-is ("peanutty" counts as nutty).
///
/// The result is unit-normalized unless no dimension matched at all.
pub fn build_vector(compounds: &[CompoundRecord]) -> TasteVector {
    let mut vector = TasteVector::zero();

    for compound in compounds {
        let descriptor = match compound.taste_descriptor.as_deref() {
            Some(d) if !d.is_empty() => d.to_lowercase(),
            _ => continue,
        };

        for (i, dim) in TASTE_DIMENSIONS.iter().enumerate() {
            if descriptor.contains(dim) {
                vector.0[i] += 1.0;
            }
        }
    }

    let norm = vector.norm();
    if norm > 0.0 {
        for x in vector.0.iter_mut() {
            *x /= norm;
        }
    }
    vector
}

/// Element-wise mean of a set of vectors, used to blend taste inputs.
///
/// Callers must pass at least one vector.
pub fn centroid(vectors: &[TasteVector]) -> TasteVector {
    debug_assert!(!vectors.is_empty(), "centroid of an empty set is undefined");

    let mut mean = TasteVector::zero();
    for v in vectors {
        for (m, x) in mean.0.iter_mut().zip(v.0.iter()) {
            *m += x;
        }
    }
    let n = vectors.len() as f64;
    for m in mean.0.iter_mut() {
        *m /= n;
    }
    mean
}

/// Cosine similarity: dot(a, b) / (‖a‖·‖b‖ + ε).
///
/// For vectors produced by `build_vector` (non-negative components) the
/// result is effectively in [0, 1]; a zero vector on either side yields ~0.
pub fn cosine_similarity(a: &TasteVector, b: &TasteVector) -> f64 {
    let dot: f64 = a.0.iter().zip(b.0.iter()).map(|(x, y)| x * y).sum();
    dot / (a.norm() * b.norm() + COSINE_EPSILON)
}
