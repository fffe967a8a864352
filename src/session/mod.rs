//! Saved sessions: every object's frames and metadata plus the options, as
//! one JSON document.
//!
//! Coordinates are rounded to two decimals and confidences to integers.
//! Per-frame chain labels, categories, and bonds that are identical in
//! every frame of an object are written once at the object level and
//! re-expanded on load (a frame's own value wins).

pub mod sync;

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{ColorDirective, ColorTarget};
use crate::engine::Viewer;
use crate::error::FlatmolError;
use crate::geometry::mat3_to_rows;
use crate::options::Options;
use crate::trajectory::{
    Contact, DistanceErrors, Frame, FramePayload, PositionKind, ScatterSeries,
    TrajectoryObject,
};

/// Format version written by [`SessionDocument::capture`].
pub const SESSION_VERSION: &str = "1.0";

/// A complete saved viewer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Format version.
    pub version: String,
    /// Viewer options.
    #[serde(default)]
    pub options: Options,
    /// Objects in creation order.
    #[serde(default)]
    pub objects: Vec<SessionObject>,
    /// Object displayed when the session was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_object: Option<String>,
}

/// One saved object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionObject {
    /// Object name.
    pub name: String,
    /// Frames in append order.
    pub frames: Vec<SessionFrame>,
    /// Chain labels shared by every frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<String>>,
    /// Categories shared by every frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_types: Option<Vec<PositionKind>>,
    /// Per-frame bonds shared by every frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_bonds: Option<Vec<[usize; 2]>>,
    /// Object-level explicit bonds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<Vec<[usize; 2]>>,
    /// Contacts in their array form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Value>,
    /// Object-level color directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDirective>,
    /// Cached row-major rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[[f32; 3]; 3]>,
    /// Cached rotation center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f32; 3]>,
    /// Object-level scatter series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<ScatterSeries>,
}

/// One saved frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionFrame {
    /// Coordinates, rounded to two decimals.
    pub coords: Vec<[f32; 3]>,
    /// Confidences, rounded to integers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidences: Option<Vec<f32>>,
    /// Chain labels, unless hoisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<String>>,
    /// Categories, unless hoisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_types: Option<Vec<PositionKind>>,
    /// Display names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_names: Option<Vec<String>>,
    /// Source residue numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue_numbers: Option<Vec<i32>>,
    /// Explicit bonds, unless hoisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<Vec<[usize; 2]>>,
    /// Scatter point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<[f32; 2]>,
    /// Frame-level color directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDirective>,
    /// Quantized distance-error matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_errors: Option<DistanceErrors>,
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

impl SessionFrame {
    fn from_frame(frame: &Frame) -> Self {
        Self {
            coords: frame
                .coords()
                .iter()
                .map(|c| c.to_array().map(round2))
                .collect(),
            confidences: frame
                .confidences()
                .map(|values| values.iter().copied().map(f32::round).collect()),
            chains: frame.chains().map(<[String]>::to_vec),
            position_types: frame.kinds().map(<[PositionKind]>::to_vec),
            position_names: frame.names().map(<[String]>::to_vec),
            residue_numbers: frame.residue_numbers().map(<[i32]>::to_vec),
            bonds: frame.bonds().map(<[[usize; 2]]>::to_vec),
            scatter: frame.scatter(),
            color: frame.color().cloned(),
            distance_errors: frame.distance_errors().cloned(),
        }
    }

    /// Expand into a producer payload, filling hoisted fields from
    /// `object` where this frame has none.
    fn into_payload(self, object: &SessionObject) -> FramePayload {
        let distance_error_matrix = self.distance_errors.and_then(|d| {
            let checked = DistanceErrors::from_quantized(d.size(), d.quantized().to_vec());
            if checked.is_none() {
                log::warn!("{}: malformed distance-error matrix dropped", object.name);
            }
            checked.map(|d| d.to_rows())
        });
        FramePayload {
            coordinates: self.coords,
            confidences: self.confidences,
            chain_labels: self.chains.or_else(|| object.chains.clone()),
            categories: self.position_types.or_else(|| object.position_types.clone()),
            display_names: self.position_names,
            residue_numbers: self.residue_numbers,
            distance_error_matrix,
            scatter_point: self.scatter.map(|[x, y]| Value::from(vec![x, y])),
            explicit_bonds: self
                .bonds
                .or_else(|| object.frame_bonds.clone())
                .map(|bonds| bonds.iter().map(|b| Value::from(b.to_vec())).collect()),
            color: self.color,
        }
    }
}

/// Value shared by every frame, if all frames carry the same one.
fn shared<T: Clone + PartialEq>(
    frames: &[SessionFrame],
    field: impl Fn(&SessionFrame) -> Option<&T>,
) -> Option<T> {
    let first = field(frames.first()?)?;
    frames
        .iter()
        .all(|f| field(f) == Some(first))
        .then(|| first.clone())
}

impl SessionObject {
    fn from_object(object: &TrajectoryObject) -> Self {
        let mut frames: Vec<SessionFrame> =
            object.frames().iter().map(SessionFrame::from_frame).collect();

        let chains = shared(&frames, |f| f.chains.as_ref());
        let position_types = shared(&frames, |f| f.position_types.as_ref());
        let frame_bonds = shared(&frames, |f| f.bonds.as_ref());
        for frame in &mut frames {
            if chains.is_some() {
                frame.chains = None;
            }
            if position_types.is_some() {
                frame.position_types = None;
            }
            if frame_bonds.is_some() {
                frame.bonds = None;
            }
        }

        Self {
            name: object.name().to_owned(),
            frames,
            chains,
            position_types,
            frame_bonds,
            bonds: object.bonds().map(<[[usize; 2]]>::to_vec),
            contacts: object.contacts().iter().map(Contact::to_value).collect(),
            color: object.color().cloned(),
            rotation: object.view().map(|v| mat3_to_rows(&v.rotation)),
            center: object.view().map(|v| v.center.to_array()),
            scatter: object.scatter().cloned(),
        }
    }

    /// Recreate this object in `viewer`. Frames are appended unaligned
    /// since they were stored aligned.
    fn restore(mut self, viewer: &mut Viewer) -> Result<(), FlatmolError> {
        viewer.new_object(&self.name)?;
        let frames = std::mem::take(&mut self.frames);
        for frame in frames {
            let payload = frame.into_payload(&self);
            let _ = viewer.append_frame(&self.name, payload, false)?;
        }
        let name = self.name.as_str();
        if let Some(bonds) = &self.bonds {
            let values: Vec<Value> =
                bonds.iter().map(|b| Value::from(b.to_vec())).collect();
            viewer.set_bonds(name, &values)?;
        }
        if !self.contacts.is_empty() {
            viewer.set_contacts(name, &self.contacts)?;
        }
        if let Some(color) = self.color.clone() {
            viewer.set_color(name, color, &ColorTarget::default())?;
        }
        if let Some(rotation) = &self.rotation {
            viewer.set_view_transform(
                Some(name),
                rotation,
                self.center.map(Vec3::from_array),
            )?;
        }
        viewer.set_scatter(name, self.scatter.clone())
    }
}

impl SessionDocument {
    /// Snapshot a viewer.
    #[must_use]
    pub fn capture(viewer: &Viewer) -> Self {
        Self {
            version: SESSION_VERSION.to_owned(),
            options: viewer.options().clone(),
            objects: viewer
                .store()
                .objects()
                .map(SessionObject::from_object)
                .collect(),
            current_object: viewer.current_object_name().map(str::to_owned),
        }
    }

    /// Parse a session from JSON text.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Session`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, FlatmolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Session`] if serialization fails.
    pub fn to_json(&self) -> Result<String, FlatmolError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a session file.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Io`] on read failure, [`FlatmolError::Session`] on
    /// malformed JSON.
    pub fn load(path: &Path) -> Result<Self, FlatmolError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write a session file, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Io`] on write failure.
    pub fn save(&self, path: &Path) -> Result<(), FlatmolError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Replace `viewer`'s contents with this session.
    ///
    /// Objects without a name or without frames are skipped. The saved
    /// current object is displayed, else the last restored one.
    ///
    /// # Errors
    ///
    /// Propagates viewer errors (for example duplicate object names).
    pub fn restore(self, viewer: &mut Viewer) -> Result<(), FlatmolError> {
        viewer.clear_all();
        viewer.set_options(self.options);

        let mut last = None;
        for object in self.objects {
            if object.name.is_empty() || object.frames.is_empty() {
                log::warn!("skipping session object '{}' without frames", object.name);
                continue;
            }
            last = Some(object.name.clone());
            object.restore(viewer)?;
        }

        let current = self
            .current_object
            .filter(|name| viewer.store().contains(name))
            .or(last);
        match current {
            Some(name) => viewer.select_object(&name)?,
            None => log::warn!("session contained no objects"),
        }
        log::info!("restored {} objects", viewer.store().len());
        Ok(())
    }
}

impl Viewer {
    /// Save this viewer's state as a session file.
    ///
    /// # Errors
    ///
    /// See [`SessionDocument::save`].
    pub fn save_session(&self, path: &Path) -> Result<(), FlatmolError> {
        SessionDocument::capture(self).save(path)?;
        log::info!("session saved to {}", path.display());
        Ok(())
    }

    /// Replace this viewer's state with a session file.
    ///
    /// # Errors
    ///
    /// See [`SessionDocument::load`] and [`SessionDocument::restore`].
    pub fn load_session(&mut self, path: &Path) -> Result<(), FlatmolError> {
        SessionDocument::load(path)?.restore(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(shift: f32) -> FramePayload {
        FramePayload {
            coordinates: vec![
                [0.004 + shift, 0.0, 0.0],
                [3.8, 0.123, 0.0],
                [7.6, 0.0, 1.0],
            ],
            confidences: Some(vec![40.4, 90.6, 70.0]),
            chain_labels: Some(vec!["A".into(), "A".into(), "A".into()]),
            ..FramePayload::default()
        }
    }

    #[test]
    fn shared_fields_are_hoisted() {
        let mut viewer = Viewer::default();
        let _ = viewer.append_frame("A", payload(0.0), false).unwrap();
        let _ = viewer.append_frame("A", payload(0.5), false).unwrap();

        let doc = SessionDocument::capture(&viewer);
        let object = &doc.objects[0];
        assert_eq!(object.chains.as_deref(), Some(&["A".to_owned(), "A".into(), "A".into()][..]));
        assert!(object.frames.iter().all(|f| f.chains.is_none()));
        assert_eq!(object.frames[0].coords[0], [0.0, 0.0, 0.0]);
        assert_eq!(object.frames[0].coords[1][1], 0.12);
        assert_eq!(object.frames[0].confidences.as_deref(), Some(&[40.0, 91.0, 70.0][..]));
        assert_eq!(doc.current_object.as_deref(), Some("A"));
    }

    #[test]
    fn differing_fields_stay_per_frame() {
        let mut viewer = Viewer::default();
        let _ = viewer.append_frame("A", payload(0.0), false).unwrap();
        let mut other = payload(0.0);
        other.chain_labels = Some(vec!["A".into(), "A".into(), "B".into()]);
        let _ = viewer.append_frame("A", other, false).unwrap();

        let doc = SessionDocument::capture(&viewer);
        assert!(doc.objects[0].chains.is_none());
        assert!(doc.objects[0].frames.iter().all(|f| f.chains.is_some()));
    }

    #[test]
    fn frame_value_wins_over_hoisted() {
        let object = SessionObject {
            name: "A".into(),
            chains: Some(vec!["X".into()]),
            ..SessionObject::default()
        };
        let frame = SessionFrame {
            coords: vec![[0.0; 3]],
            chains: Some(vec!["Y".into()]),
            ..SessionFrame::default()
        };
        let payload = frame.into_payload(&object);
        assert_eq!(payload.chain_labels, Some(vec!["Y".to_owned()]));

        let bare = SessionFrame {
            coords: vec![[0.0; 3]],
            ..SessionFrame::default()
        };
        assert_eq!(bare.into_payload(&object).chain_labels, Some(vec!["X".to_owned()]));
    }
}
