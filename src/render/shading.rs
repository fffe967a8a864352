//! Depth ordering and the shadow/tint occlusion proxy.

use crate::color::Rgb;
use crate::options::RenderingOptions;
use crate::segments::Segment;

const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Occlusion terms for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    /// Multiplicative darkening in (0, 1]; 1 is unshadowed.
    pub shadow: f32,
    /// Complement of the strongest nearby-farther falloff; 1 is untinted.
    pub tint: f32,
}

impl Shade {
    /// No shadow, no tint.
    pub const NONE: Self = Self {
        shadow: 1.0,
        tint: 1.0,
    };
}

/// Segment indices sorted far to near (ascending average Z). Ties keep
/// input order.
#[must_use]
pub fn draw_order(segments: &[Segment]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&a, &b| segments[a].depth().total_cmp(&segments[b].depth()));
    order
}

fn logistic(x: f32, steepness: f32) -> f32 {
    1.0 / (1.0 + (-steepness * x).exp())
}

/// Mean length of the segments that take part in shading.
fn mean_length(segments: &[Segment]) -> f32 {
    let (sum, n) = segments
        .iter()
        .filter(|s| s.is_shaded())
        .fold((0.0f32, 0usize), |(sum, n), s| (sum + s.length, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

/// Shadow and tint for every segment, indexed like `segments`.
///
/// For each shaded segment, every strictly farther shaded segment whose
/// midpoint lies within the shadow cutoff (3-D) adds
/// `logistic(cutoff - d)` to a sum, and the shadow is
/// `shadow_base ^ sum`. The tint is one minus the largest
/// `logistic(cutoff - d)` over farther segments within the tint cutoff,
/// measured in the screen plane. `order` must come from [`draw_order`].
#[must_use]
pub fn compute_shading(segments: &[Segment], order: &[usize], options: &RenderingOptions) -> Vec<Shade> {
    let mut shades = vec![Shade::NONE; segments.len()];
    if !options.shadow {
        return shades;
    }
    let mean = mean_length(segments);
    if mean <= 0.0 {
        return shades;
    }
    let shadow_cutoff = options.shadow_cutoff_factor * mean;
    let tint_cutoff = options.tint_cutoff_factor * mean;
    let k = options.falloff_steepness;

    for (rank, &i) in order.iter().enumerate() {
        let seg = &segments[i];
        if !seg.is_shaded() {
            continue;
        }
        let mut sum = 0.0f32;
        let mut strongest = 0.0f32;
        for &j in &order[..rank] {
            let other = &segments[j];
            if !other.is_shaded() || other.depth() >= seg.depth() {
                continue;
            }
            let d3 = seg.mid.distance(other.mid);
            if d3 < shadow_cutoff {
                sum += logistic(shadow_cutoff - d3, k);
            }
            let d2 = seg.mid.truncate().distance(other.mid.truncate());
            if d2 < tint_cutoff {
                strongest = strongest.max(logistic(tint_cutoff - d2, k));
            }
        }
        shades[i] = Shade {
            shadow: options.shadow_base.powf(sum),
            tint: 1.0 - strongest,
        };
    }
    shades
}

/// Normalize view-space depth to [0, 1] (1 nearest) over `[-radius, radius]`.
#[must_use]
pub fn normalize_depth(z: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 1.0;
    }
    ((z + radius) / (2.0 * radius)).clamp(0.0, 1.0)
}

fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Final stroke color: fade toward `background` with depth, lighten toward
/// white by the tint deficit, then darken by the shadow.
#[must_use]
pub fn shade(base: Rgb, depth: f32, terms: Shade, options: &RenderingOptions, background: Rgb) -> Rgb {
    let faded = mix(base, background, (1.0 - depth) * options.depth_fade);
    let tinted = mix(faded, WHITE, (1.0 - terms.tint) * options.shadow_strength);
    tinted.map(|c| (c * terms.shadow).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::segments::SegmentKind;

    fn seg(z: f32, x: f32) -> Segment {
        let start = Vec3::new(x, 0.0, z);
        let end = Vec3::new(x + 1.0, 0.0, z);
        Segment {
            start,
            end,
            mid: (start + end) * 0.5,
            length: 1.0,
            i: 0,
            j: 1,
            chain: None,
            color: [0.2, 0.4, 0.6],
            kind: SegmentKind::Backbone,
            width: 1.0,
        }
    }

    #[test]
    fn order_is_far_to_near() {
        let segments = vec![seg(2.0, 0.0), seg(-1.0, 0.0), seg(0.5, 0.0)];
        assert_eq!(draw_order(&segments), vec![1, 2, 0]);
    }

    #[test]
    fn farthest_segment_is_never_shaded() {
        let segments = vec![seg(0.0, 0.0), seg(0.3, 0.0)];
        let order = draw_order(&segments);
        let shades = compute_shading(&segments, &order, &RenderingOptions::default());
        assert_eq!(shades[0], Shade::NONE);
        assert!(shades[1].shadow < 1.0);
        assert!(shades[1].tint < 1.0);
    }

    #[test]
    fn distant_occluders_do_not_shade() {
        let segments = vec![seg(0.0, 0.0), seg(0.3, 50.0)];
        let order = draw_order(&segments);
        let shades = compute_shading(&segments, &order, &RenderingOptions::default());
        assert_eq!(shades[1], Shade::NONE);
    }

    #[test]
    fn shading_can_be_disabled() {
        let segments = vec![seg(0.0, 0.0), seg(0.3, 0.0)];
        let options = RenderingOptions {
            shadow: false,
            ..RenderingOptions::default()
        };
        let shades = compute_shading(&segments, &draw_order(&segments), &options);
        assert!(shades.iter().all(|s| *s == Shade::NONE));
    }

    #[test]
    fn more_occluders_mean_darker() {
        let one = vec![seg(0.0, 0.0), seg(1.0, 0.0)];
        let two = vec![seg(0.0, 0.0), seg(0.5, 0.2), seg(1.0, 0.0)];
        let options = RenderingOptions::default();
        let a = compute_shading(&one, &draw_order(&one), &options)[1].shadow;
        let b = compute_shading(&two, &draw_order(&two), &options)[2].shadow;
        assert!(b < a);
    }

    #[test]
    fn shade_combines_terms() {
        let options = RenderingOptions::default();
        let base = [0.2, 0.4, 0.6];
        assert_eq!(shade(base, 1.0, Shade::NONE, &options, WHITE), base);

        let far = shade(base, 0.0, Shade::NONE, &options, WHITE);
        assert!(far[0] > base[0]);

        let dark = shade(base, 1.0, Shade { shadow: 0.5, tint: 1.0 }, &options, WHITE);
        assert!((dark[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn depth_normalization() {
        assert_eq!(normalize_depth(0.0, 10.0), 0.5);
        assert_eq!(normalize_depth(10.0, 10.0), 1.0);
        assert_eq!(normalize_depth(-50.0, 10.0), 0.0);
        assert_eq!(normalize_depth(3.0, 0.0), 1.0);
    }
}
