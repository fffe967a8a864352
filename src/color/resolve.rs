//! Per-position color resolution.
//!
//! For each position the frame directive is consulted first, then the
//! object directive; within a layered directive the order is frame,
//! position, chain, object. The first hit wins; positions with no hit use
//! the global mode.

use rustc_hash::FxHashMap;

use super::ramp::{chain_color, confidence_color, deepmind_color, ColorRamp, NEUTRAL_GRAY};
use super::{ColorDirective, ColorMode, ColorValue, Rgb};
use crate::trajectory::Frame;

/// Confidence assumed for positions without one.
const DEFAULT_CONFIDENCE: f32 = 50.0;

/// Inputs to color resolution for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorScheme<'a> {
    /// Mode for positions without an override.
    pub global: ColorMode,
    /// Use colorblind-safe palettes and ramps.
    pub colorblind: bool,
    /// Object-level directive.
    pub object: Option<&'a ColorDirective>,
    /// Frame-level directive.
    pub frame: Option<&'a ColorDirective>,
}

impl ColorScheme<'_> {
    fn lookup(&self, index: usize, chain: Option<&str>) -> Option<ColorValue> {
        self.frame
            .and_then(|d| d.lookup(index, chain))
            .or_else(|| self.object.and_then(|d| d.lookup(index, chain)))
    }
}

/// Sequence-order fraction of each polymer position within its own chain.
fn rainbow_fractions(frame: &Frame) -> Vec<f32> {
    let mut members: FxHashMap<Option<&str>, Vec<usize>> = FxHashMap::default();
    for i in (0..frame.len()).filter(|&i| frame.kind(i).is_polymer()) {
        members.entry(frame.chain(i)).or_default().push(i);
    }
    let mut fractions = vec![0.0; frame.len()];
    for indices in members.values() {
        let span = indices.len().saturating_sub(1).max(1) as f32;
        for (rank, &i) in indices.iter().enumerate() {
            fractions[i] = rank as f32 / span;
        }
    }
    fractions
}

/// `Auto` resolves to chain coloring when polymer positions carry more than
/// one distinct chain label, rainbow otherwise.
fn resolve_auto(frame: &Frame) -> ColorMode {
    let mut first: Option<&str> = None;
    for i in (0..frame.len()).filter(|&i| frame.kind(i).is_polymer()) {
        match (first, frame.chain(i)) {
            (None, label) => first = label,
            (Some(a), Some(b)) if a != b => return ColorMode::Chain,
            _ => {}
        }
    }
    ColorMode::Rainbow
}

/// One RGB color per position of `frame`.
#[must_use]
pub fn resolve_colors(frame: &Frame, scheme: &ColorScheme<'_>) -> Vec<Rgb> {
    let auto = resolve_auto(frame);
    let rainbow_ramp = ColorRamp::rainbow(scheme.colorblind);
    let fractions = rainbow_fractions(frame);

    (0..frame.len())
        .map(|i| {
            let chain = frame.chain(i);
            let confidence = frame.confidence(i).unwrap_or(DEFAULT_CONFIDENCE);
            let value = scheme
                .lookup(i, chain)
                .unwrap_or(ColorValue::Mode(scheme.global));
            let mode = match value {
                ColorValue::Literal(rgb) => return rgb,
                ColorValue::Mode(ColorMode::Auto) => auto,
                ColorValue::Mode(mode) => mode,
            };

            if !frame.kind(i).is_polymer() {
                return match mode {
                    ColorMode::Confidence => confidence_color(confidence, scheme.colorblind),
                    ColorMode::Deepmind => deepmind_color(confidence),
                    _ => NEUTRAL_GRAY,
                };
            }
            match mode {
                ColorMode::Chain => chain_color(chain.unwrap_or("A"), scheme.colorblind),
                ColorMode::Confidence => confidence_color(confidence, scheme.colorblind),
                ColorMode::Deepmind => deepmind_color(confidence),
                ColorMode::Rainbow | ColorMode::Auto => rainbow_ramp.sample(fractions[i]),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::color::LayeredColor;
    use crate::trajectory::{FramePayload, PositionKind};

    fn frame(chains: &[&str], kinds: Option<Vec<PositionKind>>) -> Frame {
        let payload = FramePayload {
            coordinates: (0..chains.len()).map(|i| [i as f32, 0.0, 0.0]).collect(),
            confidences: Some(vec![40.0; chains.len()]),
            chain_labels: Some(chains.iter().map(|&c| c.to_owned()).collect()),
            categories: kinds,
            ..FramePayload::default()
        };
        Frame::from_payload(payload).unwrap()
    }

    #[test]
    fn rainbow_restarts_per_chain() {
        let f = frame(&["A", "A", "A", "B", "B"], None);
        let scheme = ColorScheme {
            global: ColorMode::Rainbow,
            ..ColorScheme::default()
        };
        let colors = resolve_colors(&f, &scheme);
        assert_eq!(colors[0], colors[3]);
        assert_eq!(colors[2], colors[4]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn auto_picks_chain_for_multichain_frames() {
        assert_eq!(resolve_auto(&frame(&["A", "B"], None)), ColorMode::Chain);
        assert_eq!(resolve_auto(&frame(&["A", "A"], None)), ColorMode::Rainbow);
        let ligand_only_differs = frame(
            &["A", "Z"],
            Some(vec![PositionKind::Backbone, PositionKind::Ligand]),
        );
        assert_eq!(resolve_auto(&ligand_only_differs), ColorMode::Rainbow);
    }

    #[test]
    fn ligands_are_gray_unless_confidence_or_literal() {
        let f = frame(
            &["A", "A"],
            Some(vec![PositionKind::Backbone, PositionKind::Ligand]),
        );
        let chain = ColorScheme {
            global: ColorMode::Chain,
            ..ColorScheme::default()
        };
        assert_eq!(resolve_colors(&f, &chain)[1], NEUTRAL_GRAY);

        let confidence = ColorScheme {
            global: ColorMode::Confidence,
            ..ColorScheme::default()
        };
        assert_eq!(resolve_colors(&f, &confidence)[1], confidence_color(40.0, false));

        let literal = ColorDirective::Literal([0.0, 1.0, 0.0]);
        let scheme = ColorScheme {
            global: ColorMode::Chain,
            object: Some(&literal),
            ..ColorScheme::default()
        };
        assert_eq!(resolve_colors(&f, &scheme)[1], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn frame_directive_beats_object_directive() {
        let f = frame(&["A", "B"], None);
        let mut layers = LayeredColor::default();
        let _ = layers.chain.insert("B".to_owned(), ColorValue::Literal([1.0, 0.0, 0.0]));
        let frame_directive = ColorDirective::Layered(layers);
        let object_directive = ColorDirective::Literal([0.0, 0.0, 1.0]);
        let scheme = ColorScheme {
            global: ColorMode::Chain,
            object: Some(&object_directive),
            frame: Some(&frame_directive),
            ..ColorScheme::default()
        };
        let colors = resolve_colors(&f, &scheme);
        assert_eq!(colors, vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn missing_attributes_do_not_panic() {
        let f = Frame::from_coords(vec![Vec3::ZERO, Vec3::X]);
        for global in [
            ColorMode::Auto,
            ColorMode::Chain,
            ColorMode::Confidence,
            ColorMode::Rainbow,
            ColorMode::Deepmind,
        ] {
            let scheme = ColorScheme {
                global,
                ..ColorScheme::default()
            };
            assert_eq!(resolve_colors(&f, &scheme).len(), 2);
        }
    }
}
