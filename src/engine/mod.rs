//! The viewer: one independent instance of trajectory store, playback
//! state, camera, and drawing.
//!
//! Every redraw is a full function of the current state: the displayed
//! frame is turned into segments, shaded, and stroked into the viewer's
//! [`DrawList`]. Hosts replay that list onto their own [`Surface`] or read
//! it as SVG. Viewers share no state; hosts that need several keep them in
//! a [`ViewerRegistry`](crate::registry::ViewerRegistry).

pub mod command;
mod dispatch;

use std::path::Path;

use glam::{Mat3, Vec2, Vec3};
use serde_json::Value;
use web_time::{Duration, Instant};

pub use self::command::ViewerCommand;
use crate::camera::CameraController;
use crate::capture::FrameCapture;
use crate::color::{resolve_colors, ColorDirective, ColorScheme, ColorTarget};
use crate::error::FlatmolError;
use crate::geometry::{mat3_from_rows, BestView};
use crate::options::Options;
use crate::playback::{PlaybackController, PlaybackState};
use crate::render::{DepthCompositor, DrawList, Surface, Viewport};
use crate::segments::{Segment, SegmentBuilder};
use crate::trajectory::metadata::{
    load_contact_file, load_scatter_csv, parse_bonds, parse_contacts,
};
use crate::trajectory::{
    AppendOutcome, FramePayload, ScatterSeries, TrajectoryObject,
    TrajectoryStore,
};

/// One viewer instance.
pub struct Viewer {
    options: Options,
    store: TrajectoryStore,
    playback: PlaybackController,
    camera: CameraController,
    current: Option<String>,
    capture: Option<Box<dyn FrameCapture>>,
    /// Frame shown before the recording started.
    resume_frame: usize,
    drawing: DrawList,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Viewer {
    /// Empty viewer.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let playback = PlaybackController::new(Duration::from_millis(
            options.playback.interval_ms,
        ));
        let camera = CameraController::new(&options.camera, &options.playback);
        let mut viewer = Self {
            options,
            store: TrajectoryStore::new(),
            playback,
            camera,
            current: None,
            capture: None,
            resume_frame: 0,
            drawing: DrawList::new(),
        };
        viewer.redraw();
        viewer
    }

    /// Apply a command.
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation reports; see the individual
    /// methods.
    pub fn execute(&mut self, command: ViewerCommand) -> Result<(), FlatmolError> {
        log::trace!("execute {command:?}");
        command.execute(self)
    }

    // ── Objects and frames ───────────────────────────────────────────────

    /// Create an empty object and display it.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::DuplicateObject`] if the name is taken.
    pub fn new_object(&mut self, name: &str) -> Result<(), FlatmolError> {
        self.store.create_object(name)?;
        self.select_object(name)
    }

    /// Validate and append a frame, creating the object on demand.
    ///
    /// The first object to receive a frame becomes current. When the frame
    /// lands on the current object the view follows it unless playing or
    /// recording, and autoplay starts once there are two frames.
    ///
    /// # Errors
    ///
    /// Only propagates store errors; an unusable payload is dropped and
    /// reported as [`AppendOutcome::Dropped`].
    pub fn append_frame(
        &mut self,
        object: &str,
        payload: FramePayload,
        align: bool,
    ) -> Result<AppendOutcome, FlatmolError> {
        self.store.ensure_object(object);
        let outcome = self.store.append_payload(object, payload, align)?;
        let AppendOutcome::Stored { index, .. } = outcome else {
            return Ok(outcome);
        };

        if self.current.is_none() {
            self.current = Some(object.to_owned());
            self.playback.switch_trajectory(0);
        }
        if self.current.as_deref() != Some(object) {
            return Ok(outcome);
        }

        self.playback.set_frame_count(index + 1);
        if index == 0 {
            let rotation = self.store.object(object)?.rotation();
            self.camera.reset(rotation);
        }
        self.playback.follow_latest();
        if self.options.playback.autoplay
            && self.playback.state() == PlaybackState::Idle
            && self.playback.frame_count() >= 2
        {
            if let Err(e) = self.playback.play(Instant::now()) {
                log::debug!("autoplay not started: {e}");
            }
        }
        self.redraw();
        Ok(outcome)
    }

    /// Display another object from its first frame.
    ///
    /// Stops playback; a recording in progress is aborted.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn select_object(&mut self, name: &str) -> Result<(), FlatmolError> {
        let object = self.store.object(name)?;
        let (frame_count, rotation) = (object.frame_count(), object.rotation());
        if self.playback.is_recording() {
            log::info!("switching to '{name}' aborts the recording");
            self.abort_recording();
        }
        self.playback.switch_trajectory(frame_count);
        self.camera.reset(rotation);
        self.current = Some(name.to_owned());
        self.redraw();
        Ok(())
    }

    /// Remove every object.
    pub fn clear_all(&mut self) {
        if self.playback.is_recording() {
            self.abort_recording();
        }
        self.store.clear();
        self.current = None;
        self.playback.switch_trajectory(0);
        self.camera.reset(Mat3::IDENTITY);
        self.redraw();
    }

    // ── Object metadata ──────────────────────────────────────────────────

    /// Apply a color directive to an object, or part of it.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] or, for a frame target,
    /// [`FlatmolError::FrameOutOfRange`].
    pub fn set_color(
        &mut self,
        object: &str,
        color: ColorDirective,
        target: &ColorTarget,
    ) -> Result<(), FlatmolError> {
        self.store.set_color(object, color, target)?;
        self.redraw_if_current(object);
        Ok(())
    }

    /// Replace an object's contacts from raw entries; bad entries are
    /// skipped.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_contacts(&mut self, object: &str, contacts: &[Value]) -> Result<(), FlatmolError> {
        self.store.set_contacts(object, parse_contacts(contacts))?;
        self.redraw_if_current(object);
        Ok(())
    }

    /// Replace an object's contacts from a contact file.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Io`] if the file cannot be read,
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn load_contacts(&mut self, object: &str, path: &Path) -> Result<(), FlatmolError> {
        let contacts = load_contact_file(path)?;
        log::info!("{object}: {} contacts from {}", contacts.len(), path.display());
        self.store.set_contacts(object, contacts)?;
        self.redraw_if_current(object);
        Ok(())
    }

    /// Attach an object-level scatter series from a CSV file.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Io`] if the file cannot be read,
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn load_scatter(&mut self, object: &str, path: &Path) -> Result<(), FlatmolError> {
        let series = load_scatter_csv(path)?;
        if series.is_none() {
            log::warn!("{}: no scatter rows found", path.display());
        }
        self.set_scatter(object, series)
    }

    /// Attach or clear an object-level scatter series.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_scatter(
        &mut self,
        object: &str,
        series: Option<ScatterSeries>,
    ) -> Result<(), FlatmolError> {
        self.store.set_scatter(object, series)
    }

    /// Replace an object's explicit bonds from raw `[i, j]` pairs; bad
    /// pairs are skipped.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_bonds(&mut self, object: &str, bonds: &[Value]) -> Result<(), FlatmolError> {
        self.store.set_bonds(object, parse_bonds(bonds))?;
        self.redraw_if_current(object);
        Ok(())
    }

    /// Replace an object's cached orientation. `object` defaults to the
    /// current object and `center` to the cached center.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] for an unknown or missing object.
    pub fn set_view_transform(
        &mut self,
        object: Option<&str>,
        rotation: &[[f32; 3]; 3],
        center: Option<Vec3>,
    ) -> Result<(), FlatmolError> {
        let name = self.target_name(object)?;
        let cached = self.store.object(&name)?.center();
        let view = BestView {
            rotation: mat3_from_rows(rotation),
            center: center.unwrap_or(cached),
        };
        self.store.set_view(&name, view)?;
        self.apply_view_if_current(&name, view.rotation);
        Ok(())
    }

    /// Recompute an object's orientation from one of its frames.
    ///
    /// `object` defaults to the current object; `frame` defaults to the
    /// displayed frame for the current object and frame 0 otherwise.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] or [`FlatmolError::FrameOutOfRange`].
    pub fn reorient(
        &mut self,
        object: Option<&str>,
        frame: Option<usize>,
    ) -> Result<BestView, FlatmolError> {
        let name = self.target_name(object)?;
        let is_current = self.current.as_deref() == Some(name.as_str());
        let index = frame.unwrap_or(if is_current {
            self.playback.current_frame()
        } else {
            0
        });
        let view = self.store.reorient(&name, index)?;
        log::debug!("{name}: reoriented from frame {index}");
        self.apply_view_if_current(&name, view.rotation);
        Ok(view)
    }

    // ── Playback ─────────────────────────────────────────────────────────

    /// Show frame `index` of the current object.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::FrameOutOfRange`] past the end,
    /// [`FlatmolError::Playback`] while recording.
    pub fn set_frame(&mut self, index: usize) -> Result<(), FlatmolError> {
        self.playback.set_frame(index)?;
        self.redraw();
        Ok(())
    }

    /// Start looping playback.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Playback`] while recording or with fewer than two
    /// frames.
    pub fn play(&mut self, now: Instant) -> Result<(), FlatmolError> {
        self.playback.play(now)
    }

    /// Stop playback.
    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Play if stopped, stop if playing.
    ///
    /// # Errors
    ///
    /// As for [`Self::play`].
    pub fn toggle_playback(&mut self, now: Instant) -> Result<(), FlatmolError> {
        self.playback.toggle(now)
    }

    /// Record every frame of the current object into `capture`, one frame
    /// per [`Self::tick`].
    ///
    /// Nothing changes when capture cannot begin: the viewer stays in its
    /// previous playback state.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Playback`] if already recording or there is nothing
    /// to record, or the error from [`FrameCapture::begin`].
    pub fn start_recording(
        &mut self,
        mut capture: Box<dyn FrameCapture>,
    ) -> Result<(), FlatmolError> {
        if self.playback.is_recording() {
            return Err(FlatmolError::Playback("already recording".to_owned()));
        }
        let frames = self.playback.frame_count();
        if frames == 0 {
            return Err(FlatmolError::Playback("no frames to record".to_owned()));
        }
        let [width, height] = self.options.display.size;
        if let Err(e) = capture.begin(width, height, frames) {
            log::warn!("recording refused: {e}");
            capture.abort();
            return Err(e);
        }
        self.resume_frame = self.playback.current_frame();
        self.playback.start_recording()?;
        self.capture = Some(capture);
        log::info!("recording {frames} frames at {width}x{height}");
        Ok(())
    }

    /// Abandon a recording and return to the frame shown before it.
    pub fn abort_recording(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.abort();
        }
        self.playback.abort_recording(self.resume_frame);
        self.redraw();
    }

    /// Advance time: capture one frame while recording, otherwise advance
    /// playback and turntable rotation. Returns whether the drawing changed.
    ///
    /// # Errors
    ///
    /// A capture failure; the recording is aborted first.
    pub fn tick(&mut self, now: Instant) -> Result<bool, FlatmolError> {
        if self.playback.is_recording() {
            self.capture_step()?;
            return Ok(true);
        }
        let advanced = self.playback.tick(now).is_some();
        let spun = self.camera.auto_rotate_step();
        if advanced || spun {
            self.redraw();
        }
        Ok(advanced || spun)
    }

    fn capture_step(&mut self) -> Result<(), FlatmolError> {
        let Some(index) = self.playback.capture_frame() else {
            return Ok(());
        };
        self.redraw_frame(index);
        let captured = match self.capture.as_mut() {
            Some(capture) => capture.capture(&self.drawing),
            None => Err(FlatmolError::Capture("no capture target".to_owned())),
        };
        if let Err(e) = captured {
            log::warn!("capture failed at frame {index}: {e}");
            self.abort_recording();
            return Err(e);
        }
        if !self.playback.complete_capture() {
            return Ok(());
        }

        let finished = self.capture.take().map_or(Ok(()), |mut c| c.finish());
        if self.resume_frame < self.playback.frame_count() {
            self.playback.set_frame(self.resume_frame)?;
        }
        self.redraw();
        match finished {
            Ok(()) => {
                log::info!("recording finished");
                Ok(())
            }
            Err(e) => {
                log::warn!("recording could not be flushed: {e}");
                Err(e)
            }
        }
    }

    // ── Camera and surface ───────────────────────────────────────────────

    /// Drag-rotate by a pixel delta. Ignored while recording.
    pub fn rotate(&mut self, delta: Vec2) {
        if self.playback.is_recording() {
            return;
        }
        self.camera.rotate(delta);
        self.redraw();
    }

    /// Wheel-zoom. Ignored while recording.
    pub fn zoom(&mut self, delta: f32) {
        if self.playback.is_recording() {
            return;
        }
        self.camera.zoom_by(delta);
        self.redraw();
    }

    /// Resize the drawing surface. Ignored while recording so every
    /// captured frame has the same size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.playback.is_recording() {
            log::debug!("resize to {width}x{height} ignored while recording");
            return;
        }
        self.options.display.size = [width, height];
        self.redraw();
    }

    /// Toggle turntable rotation.
    pub fn toggle_auto_rotate(&mut self) {
        self.camera.set_auto_rotate(!self.camera.auto_rotate());
    }

    /// Replace the options, keeping the current orientation.
    pub fn set_options(&mut self, options: Options) {
        self.camera.apply_options(&options.camera, &options.playback);
        self.camera.set_auto_rotate(options.playback.auto_rotate);
        self.playback
            .set_interval(Duration::from_millis(options.playback.interval_ms));
        self.options = options;
        self.redraw();
    }

    // ── Drawing ──────────────────────────────────────────────────────────

    /// Redraw the displayed frame into [`Self::drawing`].
    pub fn redraw(&mut self) {
        self.redraw_frame(self.playback.current_frame());
    }

    fn redraw_frame(&mut self, index: usize) {
        let mut drawing = std::mem::take(&mut self.drawing);
        self.render_frame(index, &mut drawing);
        self.drawing = drawing;
    }

    fn redraw_if_current(&mut self, object: &str) {
        if self.current.as_deref() == Some(object) {
            self.redraw();
        }
    }

    fn apply_view_if_current(&mut self, object: &str, rotation: Mat3) {
        if self.current.as_deref() == Some(object) {
            self.camera.reset(rotation);
            self.redraw();
        }
    }

    /// Draw frame `index` of the current object onto `surface`.
    pub fn render_frame(&self, index: usize, surface: &mut dyn Surface) {
        let [width, height] = self.options.display.size;
        let Some(object) = self.current_object() else {
            surface.clear(width, height, self.options.display.background);
            return;
        };
        let segments = self.segments_for(object, index);
        let extent = object.extent();
        let viewport = Viewport::fit(
            width,
            height,
            extent.max_extent(),
            self.options.rendering.padding,
            self.camera.zoom(),
        );
        DepthCompositor::new(&self.options).render(
            &segments,
            &viewport,
            extent.max_extent(),
            surface,
        );
    }

    /// Segments of the displayed frame in view space.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.current_object().map_or_else(Vec::new, |object| {
            self.segments_for(object, self.playback.current_frame())
        })
    }

    fn segments_for(&self, object: &TrajectoryObject, index: usize) -> Vec<Segment> {
        let Some(frame) = object.frame(index) else {
            return Vec::new();
        };
        let display = &self.options.display;
        let scheme = ColorScheme {
            global: display.color_mode,
            colorblind: display.colorblind,
            object: object.color(),
            frame: frame.color(),
        };
        let colors = resolve_colors(frame, &scheme);
        SegmentBuilder::new(&self.options.rendering)
            .with_bonds(object.bonds_for(index))
            .with_contacts(object.contacts(), display.contact_color)
            .build(frame, object.extent().mean(), self.camera.rotation(), &colors)
    }

    fn target_name(&self, object: Option<&str>) -> Result<String, FlatmolError> {
        object
            .map(str::to_owned)
            .or_else(|| self.current.clone())
            .ok_or_else(|| FlatmolError::UnknownObject("(no current object)".to_owned()))
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Most recent drawing of the displayed frame.
    #[must_use]
    pub fn drawing(&self) -> &DrawList {
        &self.drawing
    }

    /// The drawing as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.drawing.to_svg()
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// All objects.
    #[must_use]
    pub fn store(&self) -> &TrajectoryStore {
        &self.store
    }

    /// Playback state and frame cursor.
    #[must_use]
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// View rotation and zoom.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Name of the displayed object.
    #[must_use]
    pub fn current_object_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The displayed object.
    #[must_use]
    pub fn current_object(&self) -> Option<&TrajectoryObject> {
        self.current
            .as_deref()
            .and_then(|name| self.store.object(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::capture::MemoryCapture;
    use crate::color::ColorMode;

    fn helix(n: usize, shift: f32) -> FramePayload {
        FramePayload {
            coordinates: (0..n)
                .map(|i| {
                    let t = i as f32 * 1.7;
                    [2.3 * t.cos() + shift, 2.3 * t.sin(), 1.5 * i as f32]
                })
                .collect(),
            ..FramePayload::default()
        }
    }

    fn viewer_with_frames(frames: usize) -> Viewer {
        let mut viewer = Viewer::default();
        for f in 0..frames {
            let _ = viewer.append_frame("A", helix(8, f as f32 * 0.1), true).unwrap();
        }
        viewer
    }

    #[test]
    fn first_frame_selects_object_and_draws() {
        let viewer = viewer_with_frames(1);
        assert_eq!(viewer.current_object_name(), Some("A"));
        assert_eq!(viewer.segments().len(), 7);
        assert!(!viewer.drawing().strokes().is_empty());
        assert_eq!(viewer.drawing().width(), 400);
    }

    #[test]
    fn idle_viewer_follows_new_frames() {
        let viewer = viewer_with_frames(3);
        assert_eq!(viewer.playback().current_frame(), 2);
        assert_eq!(viewer.playback().frame_count(), 3);
    }

    #[test]
    fn empty_payload_is_dropped() {
        let mut viewer = Viewer::default();
        let outcome = viewer
            .append_frame("A", FramePayload::default(), true)
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Dropped);
        assert_eq!(viewer.current_object_name(), None);
    }

    #[test]
    fn switching_objects_stops_playback() {
        let mut viewer = viewer_with_frames(3);
        let _ = viewer.append_frame("B", helix(5, 0.0), true).unwrap();
        let now = Instant::now();
        viewer.play(now).unwrap();
        viewer.select_object("B").unwrap();
        assert_eq!(viewer.playback().state(), PlaybackState::Idle);
        assert_eq!(viewer.playback().current_frame(), 0);
        assert_eq!(viewer.playback().frame_count(), 1);
    }

    #[test]
    fn playback_wraps_and_redraws() {
        let mut viewer = viewer_with_frames(2);
        let start = Instant::now();
        viewer.play(start).unwrap();
        let step = Duration::from_millis(100);
        assert!(viewer.tick(start + step).unwrap());
        assert_eq!(viewer.playback().current_frame(), 0);
        assert!(viewer.tick(start + step * 2).unwrap());
        assert_eq!(viewer.playback().current_frame(), 1);
    }

    #[test]
    fn recording_captures_every_frame_then_idles() {
        let mut viewer = viewer_with_frames(3);
        viewer.set_frame(1).unwrap();
        viewer.start_recording(Box::new(MemoryCapture::new())).unwrap();
        assert!(viewer.playback().is_recording());

        let before = viewer.camera().rotation();
        viewer.rotate(Vec2::new(50.0, 0.0));
        viewer.zoom(3.0);
        assert_eq!(viewer.camera().rotation(), before);
        assert_eq!(viewer.camera().zoom(), 1.0);
        assert!(viewer.set_frame(0).is_err());

        let now = Instant::now();
        for _ in 0..3 {
            assert!(viewer.tick(now).unwrap());
        }
        assert_eq!(viewer.playback().state(), PlaybackState::Idle);
        assert_eq!(viewer.playback().current_frame(), 1);
    }

    #[test]
    fn unavailable_capture_leaves_viewer_untouched() {
        let mut viewer = viewer_with_frames(2);
        let now = Instant::now();
        viewer.play(now).unwrap();
        let err = viewer.start_recording(Box::new(MemoryCapture::unavailable()));
        assert!(matches!(err, Err(FlatmolError::Capture(_))));
        assert_eq!(viewer.playback().state(), PlaybackState::Playing);
    }

    #[test]
    fn second_recording_is_refused() {
        let mut viewer = viewer_with_frames(2);
        viewer.start_recording(Box::new(MemoryCapture::new())).unwrap();
        assert!(matches!(
            viewer.start_recording(Box::new(MemoryCapture::new())),
            Err(FlatmolError::Playback(_))
        ));
    }

    #[test]
    fn view_transform_replaces_camera_rotation() {
        let mut viewer = viewer_with_frames(1);
        let rows = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        viewer.set_view_transform(None, &rows, None).unwrap();
        let expected = mat3_from_rows(&rows);
        assert!(viewer.camera().rotation().abs_diff_eq(expected, 1e-5));
        let object = viewer.current_object().unwrap();
        assert!(object.rotation().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn commands_drive_the_viewer() {
        let mut viewer = Viewer::default();
        viewer
            .execute(ViewerCommand::NewObject { name: "A".into() })
            .unwrap();
        let cmd: ViewerCommand = serde_json::from_value(json!({
            "type": "append_frame",
            "object": "A",
            "payload": {
                "coordinates": [[0, 0, 0], [3.8, 0, 0], [7.6, 0, 0]],
                "chainLabels": ["A", "A", "B"]
            }
        }))
        .unwrap();
        viewer.execute(cmd).unwrap();
        assert_eq!(viewer.segments().len(), 1);

        viewer
            .execute(ViewerCommand::SetColor {
                object: "A".into(),
                color: ColorDirective::Mode(ColorMode::Rainbow),
                target: ColorTarget::default(),
            })
            .unwrap();
        viewer
            .execute(ViewerCommand::SetContacts {
                object: "A".into(),
                contacts: vec![json!([0, 2, 1.5]), json!(["bad"])],
            })
            .unwrap();
        assert_eq!(viewer.segments().len(), 2);

        viewer
            .execute(ViewerCommand::Resize {
                width: 200,
                height: 100,
            })
            .unwrap();
        assert_eq!(viewer.drawing().height(), 100);

        viewer.execute(ViewerCommand::ClearAll).unwrap();
        assert!(viewer.store().is_empty());
        assert!(viewer.drawing().strokes().is_empty());
        assert!(matches!(
            viewer.execute(ViewerCommand::SelectObject { name: "A".into() }),
            Err(FlatmolError::UnknownObject(_))
        ));
    }
}
