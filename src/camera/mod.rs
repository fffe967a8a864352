//! View orientation and zoom.

mod controller;

pub use controller::CameraController;
