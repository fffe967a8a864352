//! Per-object and per-frame metadata: contacts, explicit bonds, scatter
//! data, and the quantized distance-error matrix.
//!
//! Host-supplied metadata arrives as loosely typed JSON. Each parser here
//! validates entry by entry, logs what it skips, and keeps the rest.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{parse_literal, to_hex, Rgb};
use crate::error::FlatmolError;

use super::Frame;

/// The two endpoints of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactEnds {
    /// Direct position indices.
    Positions(usize, usize),
    /// Chain label plus residue number on each side.
    Residues {
        /// Chain of the first endpoint.
        chain_a: String,
        /// Residue number of the first endpoint.
        residue_a: i32,
        /// Chain of the second endpoint.
        chain_b: String,
        /// Residue number of the second endpoint.
        residue_b: i32,
    },
}

/// A weighted contact drawn as an extra segment between two positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Endpoints.
    pub ends: ContactEnds,
    /// Positive weight; scales stroke width.
    pub weight: f32,
    /// Optional literal color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl Contact {
    /// Resolve the endpoints to position indices within `frame`.
    ///
    /// Residue endpoints match the first position with the given chain label
    /// and residue number. Returns `None` when either side is missing or out
    /// of range.
    #[must_use]
    pub fn resolve(&self, frame: &Frame) -> Option<(usize, usize)> {
        let (i, j) = match &self.ends {
            ContactEnds::Positions(i, j) => (*i, *j),
            ContactEnds::Residues {
                chain_a,
                residue_a,
                chain_b,
                residue_b,
            } => (
                frame.find_residue(chain_a, *residue_a)?,
                frame.find_residue(chain_b, *residue_b)?,
            ),
        };
        (i < frame.len() && j < frame.len() && i != j).then_some((i, j))
    }

    /// Array form accepted by [`parse_contact`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut items: Vec<Value> = match &self.ends {
            ContactEnds::Positions(i, j) => vec![(*i).into(), (*j).into()],
            ContactEnds::Residues {
                chain_a,
                residue_a,
                chain_b,
                residue_b,
            } => vec![
                chain_a.as_str().into(),
                (*residue_a).into(),
                chain_b.as_str().into(),
                (*residue_b).into(),
            ],
        };
        items.push(f64::from(self.weight).into());
        if let Some(color) = self.color {
            items.push(to_hex(color).into());
        }
        Value::Array(items)
    }
}

fn value_to_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}

fn value_to_color(value: &Value) -> Option<Rgb> {
    match value {
        Value::String(text) => parse_literal(text),
        Value::Object(map) => {
            let channel = |key: &str| {
                map.get(key)
                    .and_then(Value::as_f64)
                    .filter(|v| (0.0..=255.0).contains(v))
                    .map(|v| v as f32 / 255.0)
            };
            Some([channel("r")?, channel("g")?, channel("b")?])
        }
        _ => None,
    }
}

/// Parse one contact from either `[i, j, weight, color?]` or
/// `[chainA, resA, chainB, resB, weight, color?]`.
///
/// An unparseable color drops the color, not the contact.
#[must_use]
pub fn parse_contact(value: &Value) -> Option<Contact> {
    let items = value.as_array()?;
    let (ends, rest) = match items.first()? {
        Value::String(chain_a) => {
            if items.len() < 5 {
                return None;
            }
            let ends = ContactEnds::Residues {
                chain_a: chain_a.clone(),
                residue_a: i32::try_from(items[1].as_i64()?).ok()?,
                chain_b: items[2].as_str()?.to_owned(),
                residue_b: i32::try_from(items[3].as_i64()?).ok()?,
            };
            (ends, &items[4..])
        }
        first => {
            if items.len() < 3 {
                return None;
            }
            let ends =
                ContactEnds::Positions(value_to_index(first)?, value_to_index(&items[1])?);
            (ends, &items[2..])
        }
    };
    let weight = rest.first()?.as_f64()? as f32;
    if !(weight.is_finite() && weight > 0.0) {
        return None;
    }
    let color = rest.get(1).and_then(value_to_color);
    Some(Contact {
        ends,
        weight,
        color,
    })
}

/// Parse a list of contact entries, skipping malformed ones.
#[must_use]
pub fn parse_contacts(values: &[Value]) -> Vec<Contact> {
    values
        .iter()
        .filter_map(|value| {
            let contact = parse_contact(value);
            if contact.is_none() {
                log::warn!("skipping invalid contact: {value}");
            }
            contact
        })
        .collect()
}

/// Parse the whitespace-separated contact file format.
///
/// Each non-empty, non-`#` line is either `i j weight [color]` or
/// `chainA resA chainB resB weight [color]`. A trailing color may contain
/// spaces (`rgb(255, 0, 0)`).
#[must_use]
pub fn parse_contact_file(text: &str) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parse_contact_line(&parts) {
            Some(contact) => contacts.push(contact),
            None => log::warn!("skipping contact line {}: {line}", lineno + 1),
        }
    }
    contacts
}

fn parse_contact_line(parts: &[&str]) -> Option<Contact> {
    let positional = || -> Option<(ContactEnds, usize)> {
        let i = parts.first()?.parse().ok()?;
        let j = parts.get(1)?.parse().ok()?;
        Some((ContactEnds::Positions(i, j), 2))
    };
    let residues = || -> Option<(ContactEnds, usize)> {
        Some((
            ContactEnds::Residues {
                chain_a: (*parts.first()?).to_owned(),
                residue_a: parts.get(1)?.parse().ok()?,
                chain_b: (*parts.get(2)?).to_owned(),
                residue_b: parts.get(3)?.parse().ok()?,
            },
            4,
        ))
    };
    let (ends, consumed) = positional().or_else(residues)?;
    let weight: f32 = parts.get(consumed)?.parse().ok()?;
    if !(weight.is_finite() && weight > 0.0) {
        return None;
    }
    let color = parts
        .get(consumed + 1..)
        .filter(|rest| !rest.is_empty())
        .and_then(|rest| parse_literal(&rest.join(" ")));
    Some(Contact {
        ends,
        weight,
        color,
    })
}

/// Read and parse a contact file from disk.
///
/// # Errors
///
/// Returns [`FlatmolError::Io`] if the file cannot be read.
pub fn load_contact_file(path: &Path) -> Result<Vec<Contact>, FlatmolError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_contact_file(&text))
}

/// Parse explicit bonds from `[i, j]` pairs. Negative, non-integer, and
/// self-bonds are skipped.
#[must_use]
pub fn parse_bonds(values: &[Value]) -> Vec<[usize; 2]> {
    values
        .iter()
        .filter_map(|value| {
            let pair = value.as_array().and_then(|items| {
                let i = value_to_index(items.first()?)?;
                let j = value_to_index(items.get(1)?)?;
                (i != j).then_some([i, j])
            });
            if pair.is_none() {
                log::warn!("skipping invalid bond: {value}");
            }
            pair
        })
        .collect()
}

/// Parse a per-frame scatter point from `[x, y]` or `{"x": .., "y": ..}`.
#[must_use]
pub fn parse_scatter_point(value: &Value) -> Option<[f32; 2]> {
    let (x, y) = match value {
        Value::Array(items) if items.len() >= 2 => (items[0].as_f64()?, items[1].as_f64()?),
        Value::Object(map) => (map.get("x")?.as_f64()?, map.get("y")?.as_f64()?),
        _ => return None,
    };
    let point = [x as f32, y as f32];
    point.iter().all(|v| v.is_finite()).then_some(point)
}

/// Object-level scatter plot data with axis labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    /// X axis label.
    pub xlabel: String,
    /// Y axis label.
    pub ylabel: String,
    /// Data points.
    pub points: Vec<[f32; 2]>,
}

/// Parse CSV scatter data: a two-column header row followed by numeric
/// `x,y` rows. Non-numeric rows are skipped; no valid rows yields `None`.
#[must_use]
pub fn parse_scatter_csv(text: &str) -> Option<ScatterSeries> {
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();
    if header.len() < 2 {
        log::warn!("scatter CSV header needs two columns");
        return None;
    }
    let points: Vec<[f32; 2]> = lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(row, line)| {
            let mut cols = line.split(',').map(str::trim);
            let x = cols.next().and_then(|v| v.parse::<f32>().ok());
            let y = cols.next().and_then(|v| v.parse::<f32>().ok());
            match (x, y) {
                (Some(x), Some(y)) => Some([x, y]),
                _ => {
                    log::warn!("skipping scatter CSV row {}", row + 2);
                    None
                }
            }
        })
        .collect();
    if points.is_empty() {
        log::warn!("scatter CSV has no valid rows");
        return None;
    }
    Some(ScatterSeries {
        xlabel: header[0].to_owned(),
        ylabel: header[1].to_owned(),
        points,
    })
}

/// Read and parse a scatter CSV file.
///
/// # Errors
///
/// Returns [`FlatmolError::Io`] if the file cannot be read.
pub fn load_scatter_csv(path: &Path) -> Result<Option<ScatterSeries>, FlatmolError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_scatter_csv(&text))
}

/// Quantization steps per unit of distance error.
const ERROR_STEPS_PER_UNIT: f32 = 8.0;

/// Square matrix of pairwise distance errors, quantized to one byte per
/// entry (1/8 unit resolution, saturating at 31.875).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceErrors {
    size: usize,
    values: Vec<u8>,
}

impl DistanceErrors {
    /// Quantize a row-major square matrix. Returns `None` if any row length
    /// differs from the row count.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f32>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        let values = rows.iter().flatten().map(|&v| quantize(v)).collect();
        Some(Self { size, values })
    }

    /// Rebuild from already-quantized bytes.
    #[must_use]
    pub fn from_quantized(size: usize, values: Vec<u8>) -> Option<Self> {
        (values.len() == size * size).then_some(Self { size, values })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Quantized row-major bytes.
    #[must_use]
    pub fn quantized(&self) -> &[u8] {
        &self.values
    }

    /// Dequantized error between positions `i` and `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.size || j >= self.size {
            return None;
        }
        Some(f32::from(self.values[i * self.size + j]) / ERROR_STEPS_PER_UNIT)
    }

    /// Dequantized rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.values
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|&v| f32::from(v) / ERROR_STEPS_PER_UNIT).collect())
            .collect()
    }
}

fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v * ERROR_STEPS_PER_UNIT).round().clamp(0.0, 255.0) as u8
}
