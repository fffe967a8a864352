use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rendering", inline)]
#[serde(default)]
/// Segment construction thresholds and depth-cue shading parameters.
///
/// Cutoff factors are multiples of the mean segment length of the frame
/// being drawn.
pub struct RenderingOptions {
    /// Enable shadow and tint.
    #[schemars(title = "Shadows")]
    pub shadow: bool,
    /// How strongly tint blends toward white.
    #[schemars(title = "Shadow Strength", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub shadow_strength: f32,
    /// Per-occluder shadow base; raised to the summed falloff.
    #[schemars(skip)]
    pub shadow_base: f32,
    /// 3-D occluder cutoff as a multiple of mean segment length.
    #[schemars(skip)]
    pub shadow_cutoff_factor: f32,
    /// Screen-plane tint cutoff as a multiple of mean segment length.
    #[schemars(skip)]
    pub tint_cutoff_factor: f32,
    /// Logistic falloff steepness.
    #[schemars(skip)]
    pub falloff_steepness: f32,
    /// How far the deepest segments fade toward the background.
    #[schemars(title = "Depth Fade", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub depth_fade: f32,
    /// Close a chain's first and last backbone positions when near.
    #[schemars(title = "Detect Cyclic Chains")]
    pub detect_cyclic: bool,
    /// Protein backbone bond cutoff (Å).
    #[schemars(skip)]
    pub chain_break_distance: f32,
    /// Nucleic backbone bond cutoff (Å).
    #[schemars(skip)]
    pub nucleic_break_distance: f32,
    /// Ligand all-pairs bond cutoff (Å).
    #[schemars(skip)]
    pub ligand_bond_cutoff: f32,
    /// Stroke width multiplier for ligand segments.
    #[schemars(skip)]
    pub ligand_width_scale: f32,
    /// Margin around the structure when fitting to the surface.
    #[schemars(skip)]
    pub padding: f32,
}

impl Default for RenderingOptions {
    fn default() -> Self {
        Self {
            shadow: true,
            shadow_strength: 0.5,
            shadow_base: 0.95,
            shadow_cutoff_factor: 2.0,
            tint_cutoff_factor: 0.5,
            falloff_steepness: 1.0,
            depth_fade: 0.35,
            detect_cyclic: true,
            chain_break_distance: 5.0,
            nucleic_break_distance: 7.5,
            ligand_bond_cutoff: 2.0,
            ligand_width_scale: 0.5,
            padding: 1.1,
        }
    }
}
