//! The viewer's complete update and interaction vocabulary.
//!
//! Producer updates (new objects, frames, metadata) and host input (frame
//! slider, drag, wheel, resize) are all expressed as a [`ViewerCommand`]
//! and applied with [`Viewer::execute`](super::Viewer::execute). Commands
//! deserialize from JSON messages tagged by `"type"`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{ColorDirective, ColorTarget};
use crate::trajectory::{FramePayload, ScatterSeries};

fn default_align() -> bool {
    true
}

/// One update or interaction for a [`Viewer`](super::Viewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerCommand {
    // ── Objects and frames ───────────────────────────────────────────────
    /// Create an empty object and make it current.
    NewObject {
        /// Object name, unique within the viewer.
        name: String,
    },
    /// Append one frame, creating the object on demand.
    AppendFrame {
        /// Target object.
        object: String,
        /// Frame data.
        payload: FramePayload,
        /// Superimpose onto the object's first frame.
        #[serde(default = "default_align")]
        align: bool,
    },
    /// Remove every object and stop playback.
    ClearAll,

    // ── Object metadata ──────────────────────────────────────────────────
    /// Apply a color directive to an object, chain, position set, or frame.
    SetColor {
        /// Target object.
        object: String,
        /// Mode, literal, or layered directive.
        color: ColorDirective,
        /// Narrowing of the directive; whole object when empty.
        #[serde(default)]
        target: ColorTarget,
    },
    /// Replace the object's contacts (raw entries, validated on apply).
    SetContacts {
        /// Target object.
        object: String,
        /// `[i, j, weight, color?]` or `[chainA, resA, chainB, resB, weight, color?]`.
        contacts: Vec<Value>,
    },
    /// Replace the object's explicit bonds (raw `[i, j]` pairs).
    SetBonds {
        /// Target object.
        object: String,
        /// Bond pairs.
        bonds: Vec<Value>,
    },
    /// Replace or clear the object's scatter series.
    SetScatter {
        /// Target object.
        object: String,
        /// New series; clears it when omitted.
        #[serde(default)]
        scatter: Option<ScatterSeries>,
    },
    /// Replace an object's cached orientation.
    SetViewTransform {
        /// Target object; the current object when omitted.
        #[serde(default)]
        object: Option<String>,
        /// Row-major rotation.
        rotation: [[f32; 3]; 3],
        /// Rotation center; keeps the cached center when omitted.
        #[serde(default)]
        center: Option<[f32; 3]>,
    },
    /// Recompute an object's orientation from one of its frames.
    Reorient {
        /// Target object; the current object when omitted.
        #[serde(default)]
        object: Option<String>,
        /// Source frame; the displayed frame when omitted.
        #[serde(default)]
        frame: Option<usize>,
    },

    // ── Playback ─────────────────────────────────────────────────────────
    /// Switch the displayed object.
    SelectObject {
        /// Object to display.
        name: String,
    },
    /// Jump to a frame of the current object.
    SetFrame {
        /// Frame index.
        index: usize,
    },
    /// Start looping playback.
    Play,
    /// Stop playback.
    Pause,
    /// Play if stopped, stop if playing.
    TogglePlayback,

    // ── Camera and surface ───────────────────────────────────────────────
    /// Rotate by a pointer drag delta in pixels.
    Rotate {
        /// `[dx, dy]`.
        delta: [f32; 2],
    },
    /// Zoom by a wheel delta.
    Zoom {
        /// Positive zooms in.
        delta: f32,
    },
    /// Resize the drawing surface.
    Resize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Toggle turntable rotation.
    ToggleAutoRotate,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::color::ColorMode;

    #[test]
    fn messages_are_tagged_by_type() {
        let cmd: ViewerCommand = serde_json::from_value(json!({
            "type": "append_frame",
            "object": "A",
            "payload": { "coordinates": [[0.0, 0.0, 0.0]] }
        }))
        .unwrap();
        match cmd {
            ViewerCommand::AppendFrame { object, align, .. } => {
                assert_eq!(object, "A");
                assert!(align);
            }
            other => panic!("unexpected {other:?}"),
        }

        let cmd: ViewerCommand =
            serde_json::from_value(json!({ "type": "clear_all" })).unwrap();
        assert_eq!(cmd, ViewerCommand::ClearAll);
    }

    #[test]
    fn set_color_defaults_to_whole_object() {
        let cmd: ViewerCommand = serde_json::from_value(json!({
            "type": "set_color",
            "object": "A",
            "color": { "type": "mode", "value": "plddt" }
        }))
        .unwrap();
        assert_eq!(
            cmd,
            ViewerCommand::SetColor {
                object: "A".into(),
                color: ColorDirective::Mode(ColorMode::Confidence),
                target: ColorTarget::default(),
            }
        );
    }

    #[test]
    fn set_scatter_without_series_clears() {
        let cmd: ViewerCommand =
            serde_json::from_value(json!({ "type": "set_scatter", "object": "A" })).unwrap();
        assert_eq!(
            cmd,
            ViewerCommand::SetScatter {
                object: "A".into(),
                scatter: None,
            }
        );

        let cmd: ViewerCommand = serde_json::from_value(json!({
            "type": "set_scatter",
            "object": "A",
            "scatter": { "xlabel": "rmsd", "ylabel": "energy", "points": [[1.0, 2.0]] }
        }))
        .unwrap();
        assert!(matches!(
            cmd,
            ViewerCommand::SetScatter { scatter: Some(ref s), .. } if s.points == [[1.0, 2.0]]
        ));
    }
}
