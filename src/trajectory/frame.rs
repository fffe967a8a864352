//! Frames, positions, and the host-facing frame payload.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metadata::{parse_bonds, parse_scatter_point, DistanceErrors};
use crate::color::ColorDirective;

/// Category of a drawable position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum PositionKind {
    /// Amino-acid backbone anchor.
    #[default]
    #[serde(rename = "polymer-backbone", alias = "P", alias = "protein")]
    Backbone,
    /// DNA backbone anchor.
    #[serde(rename = "DNA", alias = "D")]
    Dna,
    /// RNA backbone anchor.
    #[serde(rename = "RNA", alias = "R")]
    Rna,
    /// Ligand heavy atom.
    #[serde(rename = "ligand", alias = "L")]
    Ligand,
}

impl PositionKind {
    /// Whether this position takes part in sequential backbone bonding.
    #[must_use]
    pub fn is_polymer(self) -> bool {
        self != Self::Ligand
    }

    /// DNA or RNA.
    #[must_use]
    pub fn is_nucleic(self) -> bool {
        matches!(self, Self::Dna | Self::Rna)
    }
}

/// Borrowed view of one position within a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position<'a> {
    /// Coordinate (aligned if the frame was aligned on append).
    pub coord: Vec3,
    /// Confidence in 0–100.
    pub confidence: Option<f32>,
    /// Chain label.
    pub chain: Option<&'a str>,
    /// Category; absent categories read as backbone.
    pub kind: PositionKind,
    /// Display name.
    pub name: Option<&'a str>,
    /// Source residue number.
    pub residue_number: Option<i32>,
}

/// One snapshot of an object's positions with optional attributes.
///
/// Every per-position attribute that is present has exactly one entry per
/// coordinate; [`Frame::from_payload`] drops mis-sized attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub(crate) coords: Vec<Vec3>,
    pub(crate) confidences: Option<Vec<f32>>,
    pub(crate) chains: Option<Vec<String>>,
    pub(crate) kinds: Option<Vec<PositionKind>>,
    pub(crate) names: Option<Vec<String>>,
    pub(crate) residue_numbers: Option<Vec<i32>>,
    pub(crate) distance_errors: Option<DistanceErrors>,
    pub(crate) scatter: Option<[f32; 2]>,
    pub(crate) bonds: Option<Vec<[usize; 2]>>,
    pub(crate) color: Option<ColorDirective>,
}

/// Keep `attr` only if it has one entry per position.
fn checked<T>(attr: Option<Vec<T>>, len: usize, label: &str) -> Option<Vec<T>> {
    match attr {
        Some(values) if values.len() != len => {
            log::warn!(
                "{label} length {} does not match {len} positions; dropping {label}",
                values.len()
            );
            None
        }
        other => other,
    }
}

impl Frame {
    /// Frame with coordinates only.
    #[must_use]
    pub fn from_coords(coords: Vec<Vec3>) -> Self {
        Self {
            coords,
            ..Self::default()
        }
    }

    /// Validate a payload into a frame.
    ///
    /// Returns `None` only when there are no coordinates. Mis-sized or
    /// malformed optional attributes are logged and dropped individually.
    #[must_use]
    pub fn from_payload(payload: FramePayload) -> Option<Self> {
        let n = payload.coordinates.len();
        if n == 0 {
            log::warn!("frame has no coordinates; dropping frame");
            return None;
        }
        let coords: Vec<Vec3> = payload.coordinates.into_iter().map(Vec3::from).collect();
        if coords.iter().any(|c| !c.is_finite()) {
            log::warn!("frame has non-finite coordinates; dropping frame");
            return None;
        }

        let distance_errors = payload.distance_error_matrix.and_then(|rows| {
            if rows.len() != n {
                log::warn!(
                    "distance-error matrix side {} does not match {n} positions; dropping it",
                    rows.len()
                );
                return None;
            }
            let matrix = DistanceErrors::from_rows(&rows);
            if matrix.is_none() {
                log::warn!("distance-error matrix is not square; dropping it");
            }
            matrix
        });

        let scatter = payload.scatter_point.as_ref().and_then(|value| {
            let point = parse_scatter_point(value);
            if point.is_none() {
                log::warn!("invalid scatter point {value}; dropping it");
            }
            point
        });

        let bonds = payload
            .explicit_bonds
            .as_deref()
            .map(parse_bonds)
            .map(|bonds| {
                let (kept, dropped): (Vec<_>, Vec<_>) =
                    bonds.into_iter().partition(|&[i, j]| i < n && j < n);
                if !dropped.is_empty() {
                    log::warn!("{} bonds out of range for {n} positions; dropping them", dropped.len());
                }
                kept
            })
            .filter(|bonds| !bonds.is_empty());

        Some(Self {
            confidences: checked(payload.confidences, n, "confidences"),
            chains: checked(payload.chain_labels, n, "chain labels"),
            kinds: checked(payload.categories, n, "categories"),
            names: checked(payload.display_names, n, "display names"),
            residue_numbers: checked(payload.residue_numbers, n, "residue numbers"),
            coords,
            distance_errors,
            scatter,
            bonds,
            color: payload.color,
        })
    }

    /// Back to a payload (used by session export and incremental sync).
    #[must_use]
    pub fn to_payload(&self) -> FramePayload {
        FramePayload {
            coordinates: self.coords.iter().map(|c| c.to_array()).collect(),
            confidences: self.confidences.clone(),
            chain_labels: self.chains.clone(),
            categories: self.kinds.clone(),
            display_names: self.names.clone(),
            residue_numbers: self.residue_numbers.clone(),
            distance_error_matrix: self.distance_errors.as_ref().map(DistanceErrors::to_rows),
            scatter_point: self.scatter.map(|[x, y]| Value::from(vec![x, y])),
            explicit_bonds: self
                .bonds
                .as_ref()
                .map(|bonds| bonds.iter().map(|b| Value::from(b.to_vec())).collect()),
            color: self.color.clone(),
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the frame has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates.
    #[must_use]
    pub fn coords(&self) -> &[Vec3] {
        &self.coords
    }

    /// Position `i`, or `None` past the end.
    #[must_use]
    pub fn position(&self, i: usize) -> Option<Position<'_>> {
        Some(Position {
            coord: *self.coords.get(i)?,
            confidence: self.confidence(i),
            chain: self.chain(i),
            kind: self.kind(i),
            name: self.names.as_ref().map(|v| v[i].as_str()),
            residue_number: self.residue_numbers.as_ref().map(|v| v[i]),
        })
    }

    /// Iterate over all positions.
    pub fn positions(&self) -> impl Iterator<Item = Position<'_>> {
        (0..self.len()).filter_map(|i| self.position(i))
    }

    /// Confidence of position `i`.
    #[must_use]
    pub fn confidence(&self, i: usize) -> Option<f32> {
        self.confidences.as_ref().and_then(|v| v.get(i).copied())
    }

    /// Chain label of position `i`.
    #[must_use]
    pub fn chain(&self, i: usize) -> Option<&str> {
        self.chains.as_ref().and_then(|v| v.get(i)).map(String::as_str)
    }

    /// Category of position `i`; backbone when categories are absent.
    #[must_use]
    pub fn kind(&self, i: usize) -> PositionKind {
        self.kinds
            .as_ref()
            .and_then(|v| v.get(i).copied())
            .unwrap_or_default()
    }

    /// Per-position confidences, if present.
    #[must_use]
    pub fn confidences(&self) -> Option<&[f32]> {
        self.confidences.as_deref()
    }

    /// Per-position chain labels, if present.
    #[must_use]
    pub fn chains(&self) -> Option<&[String]> {
        self.chains.as_deref()
    }

    /// Per-position categories, if present.
    #[must_use]
    pub fn kinds(&self) -> Option<&[PositionKind]> {
        self.kinds.as_deref()
    }

    /// Per-position display names, if present.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Per-position residue numbers, if present.
    #[must_use]
    pub fn residue_numbers(&self) -> Option<&[i32]> {
        self.residue_numbers.as_deref()
    }

    /// Quantized distance-error matrix.
    #[must_use]
    pub fn distance_errors(&self) -> Option<&DistanceErrors> {
        self.distance_errors.as_ref()
    }

    /// Scatter point.
    #[must_use]
    pub fn scatter(&self) -> Option<[f32; 2]> {
        self.scatter
    }

    /// Frame-level explicit bonds.
    #[must_use]
    pub fn bonds(&self) -> Option<&[[usize; 2]]> {
        self.bonds.as_deref()
    }

    /// Frame-level color directive.
    #[must_use]
    pub fn color(&self) -> Option<&ColorDirective> {
        self.color.as_ref()
    }

    /// Index of the first position with this chain label and residue number.
    #[must_use]
    pub fn find_residue(&self, chain: &str, residue: i32) -> Option<usize> {
        let chains = self.chains.as_ref()?;
        let numbers = self.residue_numbers.as_ref()?;
        chains
            .iter()
            .zip(numbers)
            .position(|(c, &r)| c == chain && r == residue)
    }
}

/// Per-frame update as delivered by a producer.
///
/// Field names are camelCase; the snake_case names used by saved sessions
/// (`coords`, `plddts`, `chains`, `position_types`, ...) are accepted too.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePayload {
    /// Positions as `[x, y, z]`.
    #[serde(alias = "coords")]
    pub coordinates: Vec<[f32; 3]>,
    /// Per-position confidence in 0–100.
    #[serde(default, alias = "plddts", skip_serializing_if = "Option::is_none")]
    pub confidences: Option<Vec<f32>>,
    /// Per-position chain labels.
    #[serde(default, alias = "chains", skip_serializing_if = "Option::is_none")]
    pub chain_labels: Option<Vec<String>>,
    /// Per-position categories.
    #[serde(
        default,
        alias = "position_types",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<Vec<PositionKind>>,
    /// Per-position display names.
    #[serde(
        default,
        alias = "position_names",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_names: Option<Vec<String>>,
    /// Per-position source residue numbers.
    #[serde(
        default,
        alias = "residue_numbers",
        skip_serializing_if = "Option::is_none"
    )]
    pub residue_numbers: Option<Vec<i32>>,
    /// Square pairwise distance-error matrix.
    #[serde(default, alias = "pae", skip_serializing_if = "Option::is_none")]
    pub distance_error_matrix: Option<Vec<Vec<f32>>>,
    /// Scatter point as `[x, y]` or `{"x": .., "y": ..}`.
    #[serde(default, alias = "scatter", skip_serializing_if = "Option::is_none")]
    pub scatter_point: Option<Value>,
    /// Explicit bonds as `[i, j]` pairs.
    #[serde(default, alias = "bonds", skip_serializing_if = "Option::is_none")]
    pub explicit_bonds: Option<Vec<Value>>,
    /// Frame-level color directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDirective>,
}
