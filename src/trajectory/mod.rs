//! Named trajectories of frames with cached orientation and extent.
//!
//! The first frame appended to an object fixes its reference orientation
//! (via [`best_view`]); later frames are optionally superimposed onto that
//! first frame. Coordinates are stored unrotated; rotation happens at draw
//! time. Every append updates the object's running mean and rescans all
//! stored frames for the largest distance from it, so the drawing scale
//! stays stable while frames stream in.

pub mod frame;
pub mod metadata;

use glam::{DVec3, Mat3, Vec3};
use rustc_hash::FxHashMap;

pub use frame::{Frame, FramePayload, Position, PositionKind};
pub use metadata::{Contact, ContactEnds, DistanceErrors, ScatterSeries};

use crate::color::{ColorDirective, ColorTarget, ColorValue, LayeredColor};
use crate::error::FlatmolError;
use crate::geometry::{align_to, best_view, BestView};

/// Running mean of every coordinate appended to an object, and the largest
/// distance of any stored coordinate from that mean.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    sum: DVec3,
    count: usize,
    mean: Vec3,
    max_extent: f32,
}

impl Extent {
    /// Mean of all coordinates seen so far.
    #[must_use]
    pub fn mean(&self) -> Vec3 {
        self.mean
    }

    /// Largest distance from [`Self::mean`] across all stored frames.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        self.max_extent
    }

    /// Number of coordinates accumulated.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    fn accumulate(&mut self, coords: &[Vec3]) {
        for c in coords {
            self.sum += c.as_dvec3();
        }
        self.count += coords.len();
        if self.count > 0 {
            self.mean = (self.sum / self.count as f64).as_vec3();
        }
    }

    fn rescan(&mut self, frames: &[Frame]) {
        let mean = self.mean;
        self.max_extent = frames
            .iter()
            .flat_map(|f| f.coords.iter())
            .map(|c| c.distance(mean))
            .fold(0.0, f32::max);
    }
}

/// One named trajectory.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryObject {
    name: String,
    frames: Vec<Frame>,
    view: Option<BestView>,
    extent: Extent,
    contacts: Vec<Contact>,
    bonds: Option<Vec<[usize; 2]>>,
    color: Option<ColorDirective>,
    scatter: Option<ScatterSeries>,
}

impl TrajectoryObject {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored frames in append order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frame `index`.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Number of stored frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Cached reference rotation; identity before the first frame.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        self.view.map_or(Mat3::IDENTITY, |v| v.rotation)
    }

    /// Cached reference center (mean of the orienting frame).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.view.map_or(Vec3::ZERO, |v| v.center)
    }

    /// Cached orientation, if a frame has been appended or one was set.
    #[must_use]
    pub fn view(&self) -> Option<BestView> {
        self.view
    }

    /// Running mean and max extent.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Object-level contacts.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Object-level explicit bonds.
    #[must_use]
    pub fn bonds(&self) -> Option<&[[usize; 2]]> {
        self.bonds.as_deref()
    }

    /// Object-level color directive.
    #[must_use]
    pub fn color(&self) -> Option<&ColorDirective> {
        self.color.as_ref()
    }

    /// Object-level scatter series.
    #[must_use]
    pub fn scatter(&self) -> Option<&ScatterSeries> {
        self.scatter.as_ref()
    }

    /// Explicit bonds for frame `index`: the frame's own list, else the
    /// object's.
    #[must_use]
    pub fn bonds_for(&self, index: usize) -> Option<&[[usize; 2]]> {
        self.frame(index).and_then(Frame::bonds).or_else(|| self.bonds())
    }

    fn push(&mut self, mut frame: Frame, align: bool) -> AppendOutcome {
        let mut aligned = false;
        match self.frames.first() {
            None => {
                if self.view.is_none() {
                    self.view = Some(best_view(&frame.coords));
                }
            }
            Some(first) if align => {
                if let Some(coords) = align_to(&frame.coords, &first.coords) {
                    frame.coords = coords;
                    aligned = true;
                } else {
                    log::debug!(
                        "{}: frame has {} positions, reference has {}; storing unaligned",
                        self.name,
                        frame.len(),
                        first.len()
                    );
                }
            }
            Some(_) => {}
        }

        self.extent.accumulate(&frame.coords);
        self.frames.push(frame);
        self.extent.rescan(&self.frames);

        AppendOutcome::Stored {
            index: self.frames.len() - 1,
            aligned,
        }
    }
}

/// Result of [`TrajectoryStore::append_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Frame stored at `index`.
    Stored {
        /// Index of the new frame.
        index: usize,
        /// Whether the frame was superimposed onto the first frame.
        aligned: bool,
    },
    /// Frame had no usable coordinates and was dropped.
    Dropped,
}

/// All objects of one viewer, in creation order.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryStore {
    objects: Vec<TrajectoryObject>,
    index: FxHashMap<String, usize>,
    generation: u64,
}

impl TrajectoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::DuplicateObject`] if the name is taken.
    pub fn create_object(&mut self, name: &str) -> Result<(), FlatmolError> {
        if self.index.contains_key(name) {
            return Err(FlatmolError::DuplicateObject(name.to_owned()));
        }
        let _ = self.index.insert(name.to_owned(), self.objects.len());
        self.objects.push(TrajectoryObject::new(name));
        log::debug!("created object '{name}'");
        Ok(())
    }

    /// Create the object if it does not exist yet.
    pub fn ensure_object(&mut self, name: &str) {
        if !self.index.contains_key(name) {
            let _ = self.create_object(name);
        }
    }

    /// Append a validated frame.
    ///
    /// The first frame fixes the object's orientation. Later frames are
    /// superimposed onto the first frame when `align` is set and the
    /// position counts match; otherwise they are stored as given.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn append_frame(
        &mut self,
        name: &str,
        frame: Frame,
        align: bool,
    ) -> Result<AppendOutcome, FlatmolError> {
        let object = self.object_mut(name)?;
        if frame.is_empty() {
            log::warn!("{name}: frame has no coordinates; dropping frame");
            return Ok(AppendOutcome::Dropped);
        }
        Ok(object.push(frame, align))
    }

    /// Validate and append a producer payload.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn append_payload(
        &mut self,
        name: &str,
        payload: FramePayload,
        align: bool,
    ) -> Result<AppendOutcome, FlatmolError> {
        // Resolve the object first so an unknown name is reported even for
        // a payload that would be dropped.
        let _ = self.object(name)?;
        match Frame::from_payload(payload) {
            Some(frame) => self.append_frame(name, frame, align),
            None => Ok(AppendOutcome::Dropped),
        }
    }

    /// Replace the object's explicit bonds; an empty list clears them.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_bonds(&mut self, name: &str, bonds: Vec<[usize; 2]>) -> Result<(), FlatmolError> {
        let object = self.object_mut(name)?;
        object.bonds = (!bonds.is_empty()).then_some(bonds);
        Ok(())
    }

    /// Replace the object's contacts.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_contacts(&mut self, name: &str, contacts: Vec<Contact>) -> Result<(), FlatmolError> {
        self.object_mut(name)?.contacts = contacts;
        Ok(())
    }

    /// Attach an object-level scatter series.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_scatter(
        &mut self,
        name: &str,
        scatter: Option<ScatterSeries>,
    ) -> Result<(), FlatmolError> {
        self.object_mut(name)?.scatter = scatter;
        Ok(())
    }

    /// Apply a color directive to an object or one of its frames.
    ///
    /// A non-selective target replaces the directive outright. A chain or
    /// position target merges into a layered directive; an existing plain
    /// directive is kept as the layered object fallback.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] for an unknown name,
    /// [`FlatmolError::FrameOutOfRange`] for a bad frame target.
    pub fn set_color(
        &mut self,
        name: &str,
        directive: ColorDirective,
        target: &ColorTarget,
    ) -> Result<(), FlatmolError> {
        let object = self.object_mut(name)?;
        let slot = match target.frame {
            Some(index) => {
                let len = object.frames.len();
                &mut object
                    .frames
                    .get_mut(index)
                    .ok_or(FlatmolError::FrameOutOfRange { index, len })?
                    .color
            }
            None => &mut object.color,
        };
        apply_color(slot, directive, target);
        Ok(())
    }

    /// Recompute the object's orientation from frame `index`.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] or [`FlatmolError::FrameOutOfRange`].
    pub fn reorient(&mut self, name: &str, index: usize) -> Result<BestView, FlatmolError> {
        let object = self.object_mut(name)?;
        let len = object.frames.len();
        let frame = object
            .frames
            .get(index)
            .ok_or(FlatmolError::FrameOutOfRange { index, len })?;
        let view = best_view(&frame.coords);
        object.view = Some(view);
        Ok(view)
    }

    /// Replace the cached orientation with an explicit one.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn set_view(&mut self, name: &str, view: BestView) -> Result<(), FlatmolError> {
        self.object_mut(name)?.view = Some(view);
        Ok(())
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
        self.generation += 1;
    }

    /// Number of times the store has been cleared. Objects with the same
    /// name in different generations are unrelated.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Object by name.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] if no object has this name.
    pub fn object(&self, name: &str) -> Result<&TrajectoryObject, FlatmolError> {
        self.index
            .get(name)
            .map(|&i| &self.objects[i])
            .ok_or_else(|| FlatmolError::UnknownObject(name.to_owned()))
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut TrajectoryObject, FlatmolError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.objects[i]),
            None => Err(FlatmolError::UnknownObject(name.to_owned())),
        }
    }

    /// Whether an object with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = &TrajectoryObject> {
        self.objects.iter()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Name of the most recently created object.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.objects.last().map(TrajectoryObject::name)
    }

}

fn apply_color(slot: &mut Option<ColorDirective>, directive: ColorDirective, target: &ColorTarget) {
    if !target.is_selective() {
        *slot = Some(directive);
        return;
    }
    let update = match directive {
        ColorDirective::Layered(layers) => layers,
        simple => {
            let value = match simple {
                ColorDirective::Mode(mode) => ColorValue::Mode(mode),
                ColorDirective::Literal(rgb) => ColorValue::Literal(rgb),
                ColorDirective::Layered(_) => return,
            };
            let mut layers = LayeredColor::default();
            if let Some(chain) = &target.chain {
                let _ = layers.chain.insert(chain.clone(), value);
            }
            for &p in &target.positions {
                let _ = layers.position.insert(p, value);
            }
            layers
        }
    };

    match slot {
        Some(ColorDirective::Layered(existing)) => existing.merge(update),
        _ => {
            let mut merged = LayeredColor {
                object: slot.as_ref().and_then(|d| d.lookup(0, None)),
                ..LayeredColor::default()
            };
            merged.merge(update);
            *slot = Some(ColorDirective::Layered(merged));
        }
    }
}
