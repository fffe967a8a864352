use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
/// Frame timing and turntable rotation.
pub struct PlaybackOptions {
    /// Milliseconds between frames while playing.
    #[schemars(title = "Frame Interval (ms)", range(min = 10, max = 2000))]
    pub interval_ms: u64,
    /// Start playing once an object has two frames.
    #[schemars(title = "Autoplay")]
    pub autoplay: bool,
    /// Spin about screen Y each tick.
    #[schemars(title = "Auto-Rotate")]
    pub auto_rotate: bool,
    /// Radians per tick when auto-rotating.
    #[schemars(title = "Auto-Rotate Speed", range(min = 0.0, max = 0.5), extend("step" = 0.005))]
    pub auto_rotate_speed: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            autoplay: false,
            auto_rotate: false,
            auto_rotate_speed: 0.02,
        }
    }
}
