//! Color directives, literal color parsing, and per-position resolution.
//!
//! A directive is either a global mode name, a literal color, or a layered
//! set of overrides keyed by frame, position, chain, and object. Resolution
//! of a directive stack into one RGB per position lives in [`resolve`].

pub mod ramp;
pub mod resolve;

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use ramp::{chain_color, confidence_color, deepmind_color, ColorRamp};
pub use resolve::{resolve_colors, ColorScheme};

/// Linear RGB, components in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Named coloring scheme applied to every position that has no override.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Chain mode for multi-chain frames, rainbow otherwise.
    #[default]
    Auto,
    /// Stable palette color per chain label.
    Chain,
    /// Continuous gradient over per-position confidence.
    #[serde(alias = "plddt")]
    Confidence,
    /// Sequence-order gradient within each chain.
    Rainbow,
    /// Four discrete confidence bands.
    Deepmind,
}

impl ColorMode {
    /// Parse a mode name (case-insensitive). `plddt` is accepted as an alias
    /// for confidence.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "chain" => Some(Self::Chain),
            "confidence" | "plddt" => Some(Self::Confidence),
            "rainbow" => Some(Self::Rainbow),
            "deepmind" => Some(Self::Deepmind),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Chain => "chain",
            Self::Confidence => "confidence",
            Self::Rainbow => "rainbow",
            Self::Deepmind => "deepmind",
        }
    }
}

/// A single coloring choice: a mode name or a literal color.
///
/// Serialized as a plain string (`"rainbow"`, `"#ff8000"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorValue {
    /// Use the given mode for matching positions.
    Mode(ColorMode),
    /// Paint matching positions with a fixed color.
    Literal(Rgb),
}

impl ColorValue {
    /// Parse a mode name first, then a literal color.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        ColorMode::from_name(text)
            .map(Self::Mode)
            .or_else(|| parse_literal(text).map(Self::Literal))
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        match value {
            ColorValue::Mode(mode) => mode.as_str().to_owned(),
            ColorValue::Literal(rgb) => to_hex(rgb),
        }
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text).ok_or_else(|| format!("unrecognized color '{text}'"))
    }
}

/// Layered overrides. Lookup order within one layered directive is frame,
/// position, chain, object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredColor {
    /// Applies to every position of the frame carrying this directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<ColorValue>,
    /// Per-position overrides keyed by position index.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub position: BTreeMap<usize, ColorValue>,
    /// Per-chain overrides keyed by chain label.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub chain: BTreeMap<String, ColorValue>,
    /// Fallback for the whole object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ColorValue>,
}

impl LayeredColor {
    /// First matching override for position `index` in `chain`.
    #[must_use]
    pub fn lookup(&self, index: usize, chain: Option<&str>) -> Option<ColorValue> {
        self.frame
            .or_else(|| self.position.get(&index).copied())
            .or_else(|| chain.and_then(|c| self.chain.get(c).copied()))
            .or(self.object)
    }

    /// Fold `other` into `self`: map entries are added or replaced and
    /// scalar layers are replaced when `other` sets them.
    pub fn merge(&mut self, other: Self) {
        if other.frame.is_some() {
            self.frame = other.frame;
        }
        if other.object.is_some() {
            self.object = other.object;
        }
        self.position.extend(other.position);
        self.chain.extend(other.chain);
    }

    /// Whether no layer is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
            && self.object.is_none()
            && self.position.is_empty()
            && self.chain.is_empty()
    }
}

/// A color directive attached to an object or frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColorDirective {
    /// A global mode for every position.
    Mode(ColorMode),
    /// One literal color for every position.
    Literal(#[serde(with = "hex_rgb")] Rgb),
    /// Layered per-frame/position/chain/object overrides.
    #[serde(rename = "advanced")]
    Layered(LayeredColor),
}

impl ColorDirective {
    /// Parse a plain string as a mode or literal directive.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        ColorValue::parse(text).map(Self::from)
    }

    /// Color value this directive assigns to position `index`, if any.
    #[must_use]
    pub fn lookup(&self, index: usize, chain: Option<&str>) -> Option<ColorValue> {
        match self {
            Self::Mode(mode) => Some(ColorValue::Mode(*mode)),
            Self::Literal(rgb) => Some(ColorValue::Literal(*rgb)),
            Self::Layered(layers) => layers.lookup(index, chain),
        }
    }
}

impl From<ColorValue> for ColorDirective {
    fn from(value: ColorValue) -> Self {
        match value {
            ColorValue::Mode(mode) => Self::Mode(mode),
            ColorValue::Literal(rgb) => Self::Literal(rgb),
        }
    }
}

/// Where a `set_color` call applies.
///
/// With neither `chain` nor `positions`, the directive replaces the
/// object-level (or frame-level) directive outright. Otherwise the value is
/// merged into a layered directive under the given keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTarget {
    /// Restrict to one chain label.
    pub chain: Option<String>,
    /// Restrict to these position indices.
    pub positions: Vec<usize>,
    /// Attach to this frame instead of the object.
    pub frame: Option<usize>,
}

impl ColorTarget {
    /// Whether this target narrows below whole-object/frame granularity.
    #[must_use]
    pub fn is_selective(&self) -> bool {
        self.chain.is_some() || !self.positions.is_empty()
    }
}

const NAMED_COLORS: [(&str, Rgb); 16] = [
    ("black", [0.0, 0.0, 0.0]),
    ("white", [1.0, 1.0, 1.0]),
    ("red", [1.0, 0.0, 0.0]),
    ("green", [0.0, 0.502, 0.0]),
    ("lime", [0.0, 1.0, 0.0]),
    ("blue", [0.0, 0.0, 1.0]),
    ("yellow", [1.0, 1.0, 0.0]),
    ("cyan", [0.0, 1.0, 1.0]),
    ("magenta", [1.0, 0.0, 1.0]),
    ("orange", [1.0, 0.647, 0.0]),
    ("purple", [0.502, 0.0, 0.502]),
    ("pink", [1.0, 0.753, 0.796]),
    ("gray", [0.502, 0.502, 0.502]),
    ("grey", [0.502, 0.502, 0.502]),
    ("brown", [0.647, 0.165, 0.165]),
    ("salmon", [0.980, 0.502, 0.447]),
];

/// Parse a literal color: a CSS-style name, `#rrggbb`, `#rgb`, bare
/// `rrggbb`, or `rgb(r, g, b)` / `rgba(r, g, b, a)` with 0–255 channels.
#[must_use]
pub fn parse_literal(text: &str) -> Option<Rgb> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(*rgb);
    }
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_rgb_function(args.strip_suffix(')')?);
    }
    parse_hex(lower.strip_prefix('#').unwrap_or(&lower))
}

fn parse_rgb_function(args: &str) -> Option<Rgb> {
    let channels: Vec<&str> = args.split(',').map(str::trim).collect();
    if !(3..=4).contains(&channels.len()) {
        return None;
    }
    let mut rgb = [0.0; 3];
    for (slot, channel) in rgb.iter_mut().zip(&channels) {
        let v: f32 = channel.parse().ok()?;
        if !(0.0..=255.0).contains(&v) {
            return None;
        }
        *slot = v / 255.0;
    }
    Some(rgb)
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0);
    match digits.len() {
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        3 => {
            let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
            parse_hex(&doubled)
        }
        _ => None,
    }
}

/// Format as lowercase `#rrggbb`.
#[must_use]
pub fn to_hex(rgb: Rgb) -> String {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

mod hex_rgb {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{parse_literal, to_hex, Rgb};

    pub(super) fn serialize<S: Serializer>(rgb: &Rgb, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&to_hex(*rgb))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rgb, D::Error> {
        let text = String::deserialize(d)?;
        parse_literal(&text).ok_or_else(|| D::Error::custom(format!("unrecognized color '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_forms() {
        assert_eq!(parse_literal("red"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_literal("  Blue "), Some([0.0, 0.0, 1.0]));
        assert_eq!(parse_literal("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_literal("00ff00"), Some([0.0, 1.0, 0.0]));
        assert_eq!(parse_literal("#0f0"), Some([0.0, 1.0, 0.0]));
        assert_eq!(parse_literal("rgb(255, 0, 255)"), Some([1.0, 0.0, 1.0]));
        assert_eq!(parse_literal("rgba(0,0,255,0.5)"), Some([0.0, 0.0, 1.0]));
        assert_eq!(parse_literal("rgb(300,0,0)"), None);
        assert_eq!(parse_literal("#12345"), None);
        assert_eq!(parse_literal("not-a-color"), None);
    }

    #[test]
    fn value_parses_modes_before_literals() {
        assert_eq!(
            ColorValue::parse("plddt"),
            Some(ColorValue::Mode(ColorMode::Confidence))
        );
        assert_eq!(
            ColorValue::parse("#000000"),
            Some(ColorValue::Literal([0.0, 0.0, 0.0]))
        );
        assert_eq!(ColorValue::parse("entropy"), None);
    }

    #[test]
    fn layered_lookup_order() {
        let mut layers = LayeredColor {
            object: Some(ColorValue::Mode(ColorMode::Rainbow)),
            ..LayeredColor::default()
        };
        let _ = layers
            .chain
            .insert("B".to_owned(), ColorValue::Literal([0.0, 0.0, 1.0]));
        let _ = layers
            .position
            .insert(3, ColorValue::Literal([1.0, 0.0, 0.0]));

        assert_eq!(layers.lookup(3, Some("B")), Some(ColorValue::Literal([1.0, 0.0, 0.0])));
        assert_eq!(layers.lookup(2, Some("B")), Some(ColorValue::Literal([0.0, 0.0, 1.0])));
        assert_eq!(layers.lookup(2, Some("A")), Some(ColorValue::Mode(ColorMode::Rainbow)));

        layers.frame = Some(ColorValue::Mode(ColorMode::Chain));
        assert_eq!(layers.lookup(3, Some("B")), Some(ColorValue::Mode(ColorMode::Chain)));
    }

    #[test]
    fn merge_extends_maps() {
        let mut base = LayeredColor::default();
        let _ = base.chain.insert("A".to_owned(), ColorValue::Mode(ColorMode::Rainbow));
        let mut update = LayeredColor::default();
        let _ = update.chain.insert("B".to_owned(), ColorValue::Mode(ColorMode::Chain));
        update.object = Some(ColorValue::Literal([1.0, 1.0, 1.0]));
        base.merge(update);
        assert_eq!(base.chain.len(), 2);
        assert!(base.object.is_some());
        assert!(!base.is_empty());
    }

    #[test]
    fn directive_json_shape() {
        let directive = ColorDirective::Literal([1.0, 0.0, 0.0]);
        let json = serde_json::to_value(&directive).unwrap();
        assert_eq!(json, serde_json::json!({"type": "literal", "value": "#ff0000"}));

        let layered: ColorDirective = serde_json::from_value(serde_json::json!({
            "type": "advanced",
            "value": {"chain": {"A": "red"}, "position": {"2": "plddt"}}
        }))
        .unwrap();
        let ColorDirective::Layered(layers) = layered else {
            panic!("expected layered directive");
        };
        assert_eq!(layers.position.get(&2), Some(&ColorValue::Mode(ColorMode::Confidence)));
        assert_eq!(layers.chain.get("A"), Some(&ColorValue::Literal([1.0, 0.0, 0.0])));
    }
}
