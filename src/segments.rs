//! Segment construction: which pairs of positions become drawn lines.
//!
//! Positions are moved into view space (`rotation * (p - center)`) first.
//! Backbone segments join consecutive polymer positions of the same chain
//! and category closer than the chain-break distance; cyclic chains get a
//! closing segment. Ligand atoms bond all-pairs under a short cutoff unless
//! explicit bonds are supplied, in which case those replace the inference.
//! Contacts add weighted segments on top.

use glam::{Mat3, Vec3};

use crate::color::Rgb;
use crate::options::RenderingOptions;
use crate::trajectory::{Contact, Frame, PositionKind};

/// What produced a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Consecutive (or loop-closing) polymer positions.
    Backbone,
    /// Distance-inferred ligand bond.
    Ligand,
    /// Explicit bond.
    Bond,
    /// Weighted contact.
    Contact,
}

/// A drawable line between two positions, in view space.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// View-space start.
    pub start: Vec3,
    /// View-space end.
    pub end: Vec3,
    /// Midpoint of `start` and `end`.
    pub mid: Vec3,
    /// Euclidean length.
    pub length: f32,
    /// Origin position index.
    pub i: usize,
    /// Target position index.
    pub j: usize,
    /// Chain label of the origin position.
    pub chain: Option<String>,
    /// Base color before shading.
    pub color: Rgb,
    /// Segment category.
    pub kind: SegmentKind,
    /// Stroke width multiplier.
    pub width: f32,
}

impl Segment {
    fn new(start: Vec3, end: Vec3, i: usize, j: usize, kind: SegmentKind) -> Self {
        Self {
            start,
            end,
            mid: (start + end) * 0.5,
            length: start.distance(end),
            i,
            j,
            chain: None,
            color: [0.5, 0.5, 0.5],
            kind,
            width: 1.0,
        }
    }

    /// Depth sort key: average view-space Z (larger is nearer).
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.mid.z
    }

    /// Whether this segment takes part in shadow/tint.
    #[must_use]
    pub fn is_shaded(&self) -> bool {
        self.kind != SegmentKind::Contact
    }
}

/// Builds segments for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SegmentBuilder<'a> {
    options: &'a RenderingOptions,
    bonds: Option<&'a [[usize; 2]]>,
    contacts: &'a [Contact],
    contact_color: Rgb,
}

impl<'a> SegmentBuilder<'a> {
    /// Builder using the given thresholds, with no bonds or contacts.
    #[must_use]
    pub fn new(options: &'a RenderingOptions) -> Self {
        Self {
            options,
            bonds: None,
            contacts: &[],
            contact_color: [1.0, 0.75, 0.0],
        }
    }

    /// Explicit bonds; when present these replace ligand inference.
    #[must_use]
    pub fn with_bonds(mut self, bonds: Option<&'a [[usize; 2]]>) -> Self {
        self.bonds = bonds;
        self
    }

    /// Contacts and their default color.
    #[must_use]
    pub fn with_contacts(mut self, contacts: &'a [Contact], color: Rgb) -> Self {
        self.contacts = contacts;
        self.contact_color = color;
        self
    }

    fn break_distance(&self, kind: PositionKind) -> f32 {
        if kind.is_nucleic() {
            self.options.nucleic_break_distance
        } else {
            self.options.chain_break_distance
        }
    }

    fn bonds_backbone(&self, frame: &Frame, view: &[Vec3], a: usize, b: usize) -> bool {
        let kind = frame.kind(a);
        kind.is_polymer()
            && kind == frame.kind(b)
            && frame.chain(a) == frame.chain(b)
            && view[a].distance(view[b]) < self.break_distance(kind)
    }

    /// Build every segment of `frame`, viewed with `rotation` about `center`.
    ///
    /// `colors` holds one base color per position; segments take the color
    /// of their origin position.
    #[must_use]
    pub fn build(&self, frame: &Frame, center: Vec3, rotation: Mat3, colors: &[Rgb]) -> Vec<Segment> {
        let view: Vec<Vec3> = frame.coords().iter().map(|p| rotation * (*p - center)).collect();
        let n = view.len();
        let mut segments = Vec::with_capacity(n + self.contacts.len());

        let mut push = |i: usize, j: usize, kind: SegmentKind, width: f32| {
            let mut seg = Segment::new(view[i], view[j], i, j, kind);
            seg.chain = frame.chain(i).map(str::to_owned);
            seg.color = colors.get(i).copied().unwrap_or(seg.color);
            seg.width = width;
            segments.push(seg);
        };

        for i in 1..n {
            if self.bonds_backbone(frame, &view, i - 1, i) {
                push(i - 1, i, SegmentKind::Backbone, 1.0);
            }
        }

        if self.options.detect_cyclic {
            for (first, last) in chain_ends(frame) {
                if self.bonds_backbone(frame, &view, last, first) {
                    push(last, first, SegmentKind::Backbone, 1.0);
                }
            }
        }

        let ligand_width = self.options.ligand_width_scale;
        if let Some(bonds) = self.bonds {
            for &[i, j] in bonds {
                if i >= n || j >= n {
                    log::debug!("bond [{i}, {j}] out of range for {n} positions");
                    continue;
                }
                let both_ligand = !frame.kind(i).is_polymer() && !frame.kind(j).is_polymer();
                push(i, j, SegmentKind::Bond, if both_ligand { ligand_width } else { 1.0 });
            }
        } else {
            let ligands: Vec<usize> = (0..n).filter(|&i| !frame.kind(i).is_polymer()).collect();
            let cutoff = self.options.ligand_bond_cutoff;
            for (k, &i) in ligands.iter().enumerate() {
                for &j in &ligands[k + 1..] {
                    if view[i].distance(view[j]) < cutoff {
                        push(i, j, SegmentKind::Ligand, ligand_width);
                    }
                }
            }
        }

        for contact in self.contacts {
            let Some((i, j)) = contact.resolve(frame) else {
                log::debug!("contact {:?} does not resolve in this frame", contact.ends);
                continue;
            };
            let mut seg = Segment::new(view[i], view[j], i, j, SegmentKind::Contact);
            seg.chain = frame.chain(i).map(str::to_owned);
            seg.color = contact.color.unwrap_or(self.contact_color);
            seg.width = contact.weight;
            segments.push(seg);
        }

        segments
    }
}

/// First and last polymer position of each chain with at least three.
fn chain_ends(frame: &Frame) -> Vec<(usize, usize)> {
    let mut ends: Vec<(Option<&str>, usize, usize, usize)> = Vec::new();
    for i in (0..frame.len()).filter(|&i| frame.kind(i).is_polymer()) {
        let chain = frame.chain(i);
        match ends.iter_mut().find(|(c, ..)| *c == chain) {
            Some((_, _, last, count)) => {
                *last = i;
                *count += 1;
            }
            None => ends.push((chain, i, i, 1)),
        }
    }
    ends.into_iter()
        .filter(|&(_, first, last, count)| count >= 3 && last > first + 1)
        .map(|(_, first, last, _)| (first, last))
        .collect()
}
