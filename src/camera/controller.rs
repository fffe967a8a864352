use glam::{Mat3, Quat, Vec2, Vec3};

use crate::options::{CameraOptions, PlaybackOptions};

/// Interactive view state: orientation, zoom, and turntable spin.
///
/// Rotations are applied in view space (about the fixed screen axes), so a
/// horizontal drag always spins about screen Y regardless of the current
/// orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    orientation: Quat,
    zoom: f32,
    auto_rotate: bool,

    rotate_speed: f32,
    zoom_speed: f32,
    min_zoom: f32,
    max_zoom: f32,
    auto_rotate_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(&CameraOptions::default(), &PlaybackOptions::default())
    }
}

impl CameraController {
    /// Identity orientation at zoom 1.
    #[must_use]
    pub fn new(camera: &CameraOptions, playback: &PlaybackOptions) -> Self {
        Self {
            orientation: Quat::IDENTITY,
            zoom: 1.0,
            auto_rotate: playback.auto_rotate,
            rotate_speed: camera.rotate_speed,
            zoom_speed: camera.zoom_speed,
            min_zoom: camera.min_zoom,
            max_zoom: camera.max_zoom.max(camera.min_zoom),
            auto_rotate_speed: playback.auto_rotate_speed,
        }
    }

    /// Re-read speeds and limits from options, keeping orientation.
    pub fn apply_options(&mut self, camera: &CameraOptions, playback: &PlaybackOptions) {
        self.rotate_speed = camera.rotate_speed;
        self.zoom_speed = camera.zoom_speed;
        self.min_zoom = camera.min_zoom;
        self.max_zoom = camera.max_zoom.max(camera.min_zoom);
        self.auto_rotate_speed = playback.auto_rotate_speed;
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Current view rotation.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_quat(self.orientation)
    }

    /// Current zoom multiplier.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Replace the orientation (e.g. with an object's cached best view).
    pub fn reset(&mut self, rotation: Mat3) {
        self.orientation = Quat::from_mat3(&rotation).normalize();
    }

    /// Drag-rotate by a pixel delta (x right, y down).
    pub fn rotate(&mut self, delta: Vec2) {
        let horizontal = Quat::from_axis_angle(Vec3::Y, delta.x * self.rotate_speed);
        let vertical = Quat::from_axis_angle(Vec3::X, delta.y * self.rotate_speed);
        self.orientation = (vertical * horizontal * self.orientation).normalize();
    }

    /// Wheel-zoom; positive zooms in.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom * (1.0 + delta * self.zoom_speed))
            .clamp(self.min_zoom, self.max_zoom);
    }

    /// Whether turntable rotation is on.
    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Turn turntable rotation on or off.
    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    /// Advance turntable rotation one step. Returns whether the view moved.
    pub fn auto_rotate_step(&mut self) -> bool {
        if !self.auto_rotate || self.auto_rotate_speed == 0.0 {
            return false;
        }
        let spin = Quat::from_axis_angle(Vec3::Y, self.auto_rotate_speed);
        self.orientation = (spin * self.orientation).normalize();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_drag_brings_front_to_the_right() {
        let mut cam = CameraController::default();
        cam.rotate(Vec2::new(std::f32::consts::FRAC_PI_2 / 0.01, 0.0));
        let front = cam.rotation() * Vec3::Z;
        assert!(front.abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn vertical_drag_brings_front_down() {
        let mut cam = CameraController::default();
        cam.rotate(Vec2::new(0.0, std::f32::consts::FRAC_PI_2 / 0.01));
        let front = cam.rotation() * Vec3::Z;
        assert!(front.abs_diff_eq(Vec3::NEG_Y, 1e-4));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = CameraController::default();
        cam.zoom_by(1.0);
        assert!((cam.zoom() - 1.1).abs() < 1e-6);
        for _ in 0..200 {
            cam.zoom_by(5.0);
        }
        assert_eq!(cam.zoom(), 20.0);
        for _ in 0..200 {
            cam.zoom_by(-5.0);
        }
        assert_eq!(cam.zoom(), 0.1);
    }

    #[test]
    fn reset_round_trips_rotation() {
        let mut cam = CameraController::default();
        let r = Mat3::from_rotation_z(0.7) * Mat3::from_rotation_x(-0.3);
        cam.reset(r);
        assert!(cam.rotation().abs_diff_eq(r, 1e-5));
    }

    #[test]
    fn auto_rotate_only_when_enabled() {
        let mut cam = CameraController::default();
        assert!(!cam.auto_rotate_step());
        cam.set_auto_rotate(true);
        assert!(cam.auto_rotate_step());
        assert!(!cam.rotation().abs_diff_eq(Mat3::IDENTITY, 1e-6));
    }
}
