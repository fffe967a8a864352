//! Viewer options with TOML preset support.
//!
//! Display, rendering, playback, and camera settings serialize to/from
//! TOML. Every section uses `#[serde(default)]` so partial files work.

mod camera;
mod display;
mod playback;
mod rendering;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::{DisplayOptions, OutlineMode};
pub use playback::PlaybackOptions;
pub use rendering::RenderingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FlatmolError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Coloring and stroke style.
    pub display: DisplayOptions,
    /// Segment thresholds and shading.
    pub rendering: RenderingOptions,
    /// Frame timing.
    pub playback: PlaybackOptions,
    /// Interaction sensitivity.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Io`] on read failure, [`FlatmolError::OptionsParse`]
    /// on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, FlatmolError> {
        let content = std::fs::read_to_string(path).map_err(FlatmolError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, FlatmolError> {
        toml::from_str(content)
            .map_err(|e| FlatmolError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`FlatmolError::OptionsParse`] if serialization fails,
    /// [`FlatmolError::Io`] on write failure.
    pub fn save(&self, path: &Path) -> Result<(), FlatmolError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlatmolError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(FlatmolError::Io)?;
        }
        std::fs::write(path, content).map_err(FlatmolError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
color_mode = "plddt"

[rendering]
chain_break_distance = 4.2
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.display.color_mode, ColorMode::Confidence);
        assert_eq!(opts.rendering.chain_break_distance, 4.2);
        // Everything else should be default
        assert_eq!(opts.rendering.shadow_base, 0.95);
        assert_eq!(opts.playback.interval_ms, 100);
        assert_eq!(opts.display.outline, OutlineMode::Full);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        assert!(matches!(
            Options::from_toml("[display\n"),
            Err(FlatmolError::OptionsParse(_))
        ));
    }

    #[test]
    fn presets_are_listed_sorted() {
        let dir = std::env::temp_dir().join(format!(
            "flatmol-presets-{}",
            std::process::id()
        ));
        let opts = Options::default();
        opts.save(&dir.join("zeta.toml")).unwrap();
        opts.save(&dir.join("alpha.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        assert_eq!(Options::list_presets(&dir), vec!["alpha", "zeta"]);
        assert_eq!(Options::load(&dir.join("alpha.toml")).unwrap(), opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("rendering"));
        assert!(props.contains_key("playback"));
        assert!(props.contains_key("camera"));

        let rendering = &props["rendering"]["properties"];
        assert!(rendering.get("depth_fade").is_some());
        assert!(rendering.get("shadow_base").is_none());
    }
}
