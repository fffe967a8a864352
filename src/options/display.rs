use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{ColorMode, Rgb};

/// Darker underlay drawn beneath each stroke.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OutlineMode {
    /// No underlay.
    None,
    /// Butt-capped underlay; joints stay open.
    Partial,
    /// Round-capped underlay.
    #[default]
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Coloring mode, stroke style, and surface size.
pub struct DisplayOptions {
    /// Color mode for positions without overrides.
    #[schemars(title = "Color Mode")]
    pub color_mode: ColorMode,
    /// Use colorblind-safe palettes.
    #[schemars(title = "Colorblind Palette")]
    pub colorblind: bool,
    /// Outline style.
    #[schemars(title = "Outline")]
    pub outline: OutlineMode,
    /// Base stroke width in pixels.
    #[schemars(title = "Line Width", range(min = 0.5, max = 10.0), extend("step" = 0.5))]
    pub line_width: f32,
    /// Surface size in pixels.
    #[schemars(skip)]
    pub size: [u32; 2],
    /// Background color; depth fade blends toward it.
    #[schemars(skip)]
    pub background: Rgb,
    /// Default color for contact segments without a literal color.
    #[schemars(skip)]
    pub contact_color: Rgb,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Auto,
            colorblind: false,
            outline: OutlineMode::Full,
            line_width: 3.0,
            size: [400, 400],
            background: [1.0, 1.0, 1.0],
            contact_color: [1.0, 0.75, 0.0],
        }
    }
}
