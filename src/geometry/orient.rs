//! Default viewing orientation from principal axes.

use glam::{Mat3, Vec3};
use nalgebra::{Matrix3, Vector3};

use super::{centroid, rotation_from_rows, to_vector, to_vec3};

/// Orthogonalized axes shorter than this are treated as degenerate.
const AXIS_EPSILON: f64 = 1e-10;

/// Relative margin a candidate must beat the current best by.
const SCORE_TOLERANCE: f64 = 1e-9;

/// Second principal variance (relative to the first) below which the set is
/// considered collinear.
const COLLINEAR_RATIO: f64 = 1e-8;

/// Rotation and center chosen for a position set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestView {
    /// Proper rotation mapping centered world coordinates to view space.
    pub rotation: Mat3,
    /// Mean of the input coordinates.
    pub center: Vec3,
}

impl Default for BestView {
    fn default() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
            center: Vec3::ZERO,
        }
    }
}

/// Pick the rotation that spreads `coords` across the screen plane.
///
/// The principal axes of the centered coordinates (from an SVD of their
/// scatter matrix) are tried in both axis-to-screen mappings and all eight
/// sign combinations. Each candidate's screen-Y axis is orthogonalized
/// against screen-X and screen-Z is their cross product, so every candidate
/// is a proper rotation. Candidates are scored by the ratio of projected
/// X/Y variance and the first best-scoring one is kept.
///
/// Empty, single-point, and collinear inputs get the identity rotation.
#[must_use]
pub fn best_view(coords: &[Vec3]) -> BestView {
    let center = centroid(coords);
    let c = to_vector(center);
    let centered: Vec<Vector3<f64>> =
        coords.iter().map(|p| to_vector(*p) - c).collect();

    let Some(axes) = principal_axes(&centered) else {
        log::debug!(
            "best_view: degenerate input ({} positions), using identity",
            coords.len()
        );
        return BestView {
            rotation: Mat3::IDENTITY,
            center,
        };
    };

    let mut best_score = f64::NEG_INFINITY;
    let mut best_rotation = None;

    for swap in [false, true] {
        for signs in 0..8u8 {
            let sign = |bit: u8| -> f64 {
                if signs & bit == 0 {
                    1.0
                } else {
                    -1.0
                }
            };
            let e1 = axes[0] * sign(1);
            let e2 = axes[1] * sign(2);
            let (x, y) = if swap { (e2, e1) } else { (e1, e2) };

            let Some(rows) = screen_axes(x, y) else {
                continue;
            };
            let score = spread_score(&centered, &rows);
            // Ties (every mapping of the same axes scores alike up to
            // rounding) keep the earliest candidate: long axis on screen X.
            if score > best_score * (1.0 + SCORE_TOLERANCE) {
                best_score = score;
                best_rotation = Some(rows);
            }
        }
    }

    let rotation = best_rotation.map_or(Mat3::IDENTITY, |[x, y, z]| {
        rotation_from_rows(to_vec3(&x), to_vec3(&y), to_vec3(&z))
    });
    BestView { rotation, center }
}

/// Principal axes ordered by decreasing variance, or `None` when the set
/// has fewer than two significant directions.
fn principal_axes(centered: &[Vector3<f64>]) -> Option<[Vector3<f64>; 3]> {
    if centered.len() < 2 {
        return None;
    }
    let scatter = centered
        .iter()
        .fold(Matrix3::<f64>::zeros(), |acc, v| acc + v * v.transpose());
    if !scatter.iter().all(|v| v.is_finite()) {
        return None;
    }

    let svd = scatter.svd(true, false);
    let u = svd.u?;
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        svd.singular_values[b].total_cmp(&svd.singular_values[a])
    });

    let largest = svd.singular_values[order[0]];
    let second = svd.singular_values[order[1]];
    if largest <= AXIS_EPSILON || second <= largest * COLLINEAR_RATIO {
        return None;
    }

    Some(order.map(|i| u.column(i).into_owned()))
}

/// Normalize X, orthogonalize Y against it, and derive Z by cross product.
fn screen_axes(
    x: Vector3<f64>,
    y: Vector3<f64>,
) -> Option<[Vector3<f64>; 3]> {
    let x_norm = x.norm();
    if x_norm < AXIS_EPSILON {
        return None;
    }
    let r0 = x / x_norm;
    let y = y - r0 * y.dot(&r0);
    let y_norm = y.norm();
    if y_norm < AXIS_EPSILON {
        return None;
    }
    let r1 = y / y_norm;
    Some([r0, r1, r0.cross(&r1)])
}

fn spread_score(centered: &[Vector3<f64>], rows: &[Vector3<f64>; 3]) -> f64 {
    let var_x = variance(centered.iter().map(|p| p.dot(&rows[0])));
    let var_y = variance(centered.iter().map(|p| p.dot(&rows[1])));
    var_x.max(var_y) / (var_x.min(var_y) + AXIS_EPSILON)
}

fn variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let (sum, n) = values
        .clone()
        .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return 0.0;
    }
    let mean = sum / n as f64;
    values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64
}
