//! Least-squares rigid superposition (Kabsch).

use glam::{Mat3, Vec3};
use nalgebra::{Matrix3, Vector3};

use super::{centroid, to_mat3, to_vector};

/// Rigid transform mapping a source position set onto a reference.
///
/// `apply(p) = rotation * (p - source_mean) + reference_mean`; no scale or
/// shear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    /// Proper rotation (column-vector convention).
    pub rotation: Mat3,
    /// Centroid of the source set.
    pub source_mean: Vec3,
    /// Centroid of the reference set.
    pub reference_mean: Vec3,
}

impl Superposition {
    /// Map one source-space point into reference space.
    #[must_use]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        self.rotation * (p - self.source_mean) + self.reference_mean
    }
}

/// Kabsch superposition of `source` onto `reference`.
///
/// Returns `None` when the sets differ in length or are empty. The
/// cross-covariance `Sᵀ·R` of the centered sets is decomposed as `U·Σ·Vᵀ`;
/// when `det(U·Vᵀ) < 0` the last column of `U` is negated so the result is
/// a rotation rather than a reflection.
#[must_use]
pub fn superpose(source: &[Vec3], reference: &[Vec3]) -> Option<Superposition> {
    if source.len() != reference.len() || source.is_empty() {
        return None;
    }

    let source_mean = centroid(source);
    let reference_mean = centroid(reference);
    let sm = to_vector(source_mean);
    let rm = to_vector(reference_mean);

    let h = source.iter().zip(reference).fold(
        Matrix3::<f64>::zeros(),
        |acc, (s, r)| {
            let s: Vector3<f64> = to_vector(*s) - sm;
            let r: Vector3<f64> = to_vector(*r) - rm;
            acc + s * r.transpose()
        },
    );
    if !h.iter().all(|v| v.is_finite()) {
        return None;
    }

    let svd = h.svd(true, true);
    let (mut u, v_t) = (svd.u?, svd.v_t?);
    if (u * v_t).determinant() < 0.0 {
        let mut last = u.column_mut(2);
        last.neg_mut();
    }
    // Row-vector form: aligned_row = centered_row · (U·Vᵀ).
    // Column-vector form is its transpose.
    let row_rotation = u * v_t;

    Some(Superposition {
        rotation: to_mat3(&row_rotation.transpose()),
        source_mean,
        reference_mean,
    })
}

/// Align `source` onto `reference`, returning the superimposed copy of
/// `source`, or `None` when the shapes differ.
#[must_use]
pub fn align_to(source: &[Vec3], reference: &[Vec3]) -> Option<Vec<Vec3>> {
    let fit = superpose(source, reference)?;
    Some(source.iter().map(|p| fit.apply(*p)).collect())
}
