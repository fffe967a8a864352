use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Drag-rotate and wheel-zoom parameters.
pub struct CameraOptions {
    /// Radians per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Zoom change per unit of wheel delta.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Smallest zoom multiplier.
    #[schemars(skip)]
    pub min_zoom: f32,
    /// Largest zoom multiplier.
    #[schemars(skip)]
    pub max_zoom: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.01,
            zoom_speed: 0.1,
            min_zoom: 0.1,
            max_zoom: 20.0,
        }
    }
}
