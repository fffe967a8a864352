//! Pure geometry for choosing and stabilizing the viewing frame.
//!
//! - [`orient::best_view`] picks a rotation that spreads a position set
//!   across the screen plane.
//! - [`align::superpose`] finds the least-squares rigid rotation mapping
//!   one position set onto another (Kabsch).
//!
//! Both work in `f64` through nalgebra's SVD and hand back glam types.

pub mod align;
pub mod orient;

pub use align::{align_to, superpose, Superposition};
pub use orient::{best_view, BestView};

use glam::{Mat3, Vec3};
use nalgebra::{Matrix3, Vector3};

/// Centroid of a point set (`Vec3::ZERO` for an empty set).
#[must_use]
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    let sum = points.iter().fold(Vector3::<f64>::zeros(), |acc, p| {
        acc + to_vector(*p)
    });
    to_vec3(&(sum / points.len() as f64))
}

pub(crate) fn to_vector(v: Vec3) -> Vector3<f64> {
    Vector3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

pub(crate) fn to_vec3(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Convert an nalgebra matrix to glam, keeping the same row/column layout.
pub(crate) fn to_mat3(m: &Matrix3<f64>) -> Mat3 {
    Mat3::from_cols(
        to_vec3(&m.column(0).into_owned()),
        to_vec3(&m.column(1).into_owned()),
        to_vec3(&m.column(2).into_owned()),
    )
}

/// Rotation whose rows are the given screen axes: `m * p` yields
/// `(p·x, p·y, p·z)`.
#[must_use]
pub fn rotation_from_rows(x: Vec3, y: Vec3, z: Vec3) -> Mat3 {
    Mat3::from_cols(x, y, z).transpose()
}

/// Build the `[[f32; 3]; 3]` row-major form used by serialized payloads.
#[must_use]
pub fn mat3_to_rows(m: &Mat3) -> [[f32; 3]; 3] {
    let t = m.transpose();
    [t.x_axis.to_array(), t.y_axis.to_array(), t.z_axis.to_array()]
}

/// Inverse of [`mat3_to_rows`].
#[must_use]
pub fn mat3_from_rows(rows: &[[f32; 3]; 3]) -> Mat3 {
    rotation_from_rows(
        Vec3::from_array(rows[0]),
        Vec3::from_array(rows[1]),
        Vec3::from_array(rows[2]),
    )
}
