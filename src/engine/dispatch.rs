//! Command dispatch.

use glam::{Vec2, Vec3};
use web_time::Instant;

use super::{Viewer, ViewerCommand};
use crate::error::FlatmolError;

impl ViewerCommand {
    /// Apply this command to `viewer`.
    pub(super) fn execute(self, viewer: &mut Viewer) -> Result<(), FlatmolError> {
        match self {
            Self::NewObject { name } => viewer.new_object(&name),
            Self::AppendFrame {
                object,
                payload,
                align,
            } => viewer.append_frame(&object, payload, align).map(|_| ()),
            Self::ClearAll => {
                viewer.clear_all();
                Ok(())
            }
            Self::SetColor {
                object,
                color,
                target,
            } => viewer.set_color(&object, color, &target),
            Self::SetContacts { object, contacts } => {
                viewer.set_contacts(&object, &contacts)
            }
            Self::SetBonds { object, bonds } => viewer.set_bonds(&object, &bonds),
            Self::SetScatter { object, scatter } => viewer.set_scatter(&object, scatter),
            Self::SetViewTransform {
                object,
                rotation,
                center,
            } => viewer.set_view_transform(
                object.as_deref(),
                &rotation,
                center.map(Vec3::from_array),
            ),
            Self::Reorient { object, frame } => {
                viewer.reorient(object.as_deref(), frame).map(|_| ())
            }
            Self::SelectObject { name } => viewer.select_object(&name),
            Self::SetFrame { index } => viewer.set_frame(index),
            Self::Play => viewer.play(Instant::now()),
            Self::Pause => {
                viewer.pause();
                Ok(())
            }
            Self::TogglePlayback => viewer.toggle_playback(Instant::now()),
            Self::Rotate { delta } => {
                viewer.rotate(Vec2::from_array(delta));
                Ok(())
            }
            Self::Zoom { delta } => {
                viewer.zoom(delta);
                Ok(())
            }
            Self::Resize { width, height } => {
                viewer.resize(width, height);
                Ok(())
            }
            Self::ToggleAutoRotate => {
                viewer.toggle_auto_rotate();
                Ok(())
            }
        }
    }
}
