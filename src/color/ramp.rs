//! Color ramps and fixed palettes.
//!
//! Ramps map a normalized value in `[0, 1]` to RGB by linear interpolation
//! between evenly spaced stops. Each ramp has a colorblind-safe variant.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::Rgb;

/// Neutral gray used for ligands under chain/rainbow modes.
pub const NEUTRAL_GRAY: Rgb = [0.5, 0.5, 0.5];

/// Confidence at or below which the confidence ramp bottoms out.
const CONFIDENCE_LOW: f32 = 50.0;
/// Confidence at or above which the confidence ramp tops out.
const CONFIDENCE_HIGH: f32 = 90.0;

/// A color ramp defined by N evenly-spaced color stops.
/// `t = 0` maps to the first color, `t = 1` maps to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl ColorRamp {
    /// Ramp through the given stops. A single stop is held constant; an
    /// empty list yields neutral gray.
    #[must_use]
    pub fn new(stops: &[Rgb]) -> Self {
        let stops = match stops {
            [] => vec![NEUTRAL_GRAY, NEUTRAL_GRAY],
            [only] => vec![*only, *only],
            _ => stops.to_vec(),
        };
        Self { stops }
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let n = self.stops.len() - 1;
        let scaled = t * n as f32;
        let idx = (scaled as usize).min(n - 1);
        let frac = scaled - idx as f32;

        let a = &self.stops[idx];
        let b = &self.stops[idx + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }

    /// Red → yellow → green → cyan → blue (a 0°–240° hue sweep).
    #[must_use]
    pub fn hue_sweep() -> Self {
        Self::new(&HUE_STOPS)
    }

    /// Perceptually uniform dark-purple → yellow ramp.
    #[must_use]
    pub fn viridis() -> Self {
        Self::new(&VIRIDIS_STOPS)
    }

    /// Ramp used for the confidence gradient (low → high).
    #[must_use]
    pub fn confidence(colorblind: bool) -> Self {
        if colorblind {
            Self::viridis()
        } else {
            Self::hue_sweep()
        }
    }

    /// Ramp used for sequence rainbows (chain start → chain end).
    #[must_use]
    pub fn rainbow(colorblind: bool) -> Self {
        if colorblind {
            Self::viridis()
        } else {
            let mut stops = HUE_STOPS.to_vec();
            stops.reverse();
            Self { stops }
        }
    }
}

const HUE_STOPS: [Rgb; 5] = [
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0],
];

const VIRIDIS_STOPS: [Rgb; 5] = [
    [0.267, 0.005, 0.329],
    [0.229, 0.322, 0.546],
    [0.128, 0.567, 0.551],
    [0.369, 0.789, 0.383],
    [0.993, 0.906, 0.144],
];

/// Chain palette (PyMOL-style carbon colors).
const CHAIN_PALETTE: [Rgb; 8] = [
    [0.2, 1.0, 0.2],
    [0.0, 1.0, 1.0],
    [1.0, 0.2, 0.8],
    [1.0, 1.0, 0.0],
    [1.0, 0.6, 0.6],
    [0.9, 0.9, 0.9],
    [0.5, 0.5, 1.0],
    [1.0, 0.5, 0.0],
];

/// Okabe–Ito palette.
const CHAIN_PALETTE_COLORBLIND: [Rgb; 8] = [
    [0.902, 0.624, 0.0],
    [0.337, 0.706, 0.914],
    [0.0, 0.620, 0.451],
    [0.941, 0.894, 0.259],
    [0.0, 0.447, 0.698],
    [0.835, 0.369, 0.0],
    [0.800, 0.475, 0.655],
    [0.6, 0.6, 0.6],
];

/// AlphaFold-style confidence bands: very high, confident, low, very low.
const DEEPMIND_BANDS: [(f32, Rgb); 4] = [
    (90.0, [0.0, 0.325, 0.839]),
    (70.0, [0.396, 0.796, 0.953]),
    (50.0, [1.0, 0.859, 0.075]),
    (f32::NEG_INFINITY, [1.0, 0.490, 0.271]),
];

/// Map a 0–100 confidence onto the confidence gradient.
#[must_use]
pub fn confidence_color(confidence: f32, colorblind: bool) -> Rgb {
    let t = (confidence - CONFIDENCE_LOW) / (CONFIDENCE_HIGH - CONFIDENCE_LOW);
    ColorRamp::confidence(colorblind).sample(t)
}

/// Discrete four-band confidence color.
#[must_use]
pub fn deepmind_color(confidence: f32) -> Rgb {
    DEEPMIND_BANDS
        .iter()
        .find(|(threshold, _)| confidence >= *threshold)
        .map_or(DEEPMIND_BANDS[3].1, |(_, rgb)| *rgb)
}

/// Stable palette color for a chain label.
///
/// The label is hashed with FxHash, so a given label always gets the same
/// color regardless of chain order or how many chains are present.
#[must_use]
pub fn chain_color(label: &str, colorblind: bool) -> Rgb {
    let mut hasher = FxHasher::default();
    label.hash(&mut hasher);
    let palette: &[Rgb] = if colorblind {
        &CHAIN_PALETTE_COLORBLIND
    } else {
        &CHAIN_PALETTE
    };
    palette[(hasher.finish() % palette.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints_and_midpoint() {
        let ramp = ColorRamp::new(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 1.0, 1.0]);
        assert_eq!(ramp.sample(0.5), [0.5, 0.5, 0.5]);
        assert_eq!(ramp.sample(7.0), [1.0, 1.0, 1.0]);
        assert_eq!(ramp.sample(f32::NAN), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn confidence_runs_red_to_blue() {
        assert_eq!(confidence_color(0.0, false), [1.0, 0.0, 0.0]);
        assert_eq!(confidence_color(100.0, false), [0.0, 0.0, 1.0]);
        let mid = confidence_color(70.0, false);
        assert_eq!(mid, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn deepmind_bands() {
        assert_eq!(deepmind_color(95.0), DEEPMIND_BANDS[0].1);
        assert_eq!(deepmind_color(90.0), DEEPMIND_BANDS[0].1);
        assert_eq!(deepmind_color(75.0), DEEPMIND_BANDS[1].1);
        assert_eq!(deepmind_color(55.0), DEEPMIND_BANDS[2].1);
        assert_eq!(deepmind_color(10.0), DEEPMIND_BANDS[3].1);
    }

    #[test]
    fn chain_colors_are_stable() {
        assert_eq!(chain_color("A", false), chain_color("A", false));
        assert!(CHAIN_PALETTE.contains(&chain_color("Z", false)));
        assert!(CHAIN_PALETTE_COLORBLIND.contains(&chain_color("Z", true)));
    }
}
