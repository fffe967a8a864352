//! Host-owned map from viewer ids to independent viewers.
//!
//! The library keeps no global table; a host that embeds several viewers
//! owns one registry and routes commands by id.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::engine::{Viewer, ViewerCommand};
use crate::error::FlatmolError;
use crate::options::Options;

/// Viewers keyed by host-chosen id.
#[derive(Default)]
pub struct ViewerRegistry {
    viewers: FxHashMap<String, Viewer>,
}

impl ViewerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewer under `id`, replacing any previous viewer with that
    /// id.
    pub fn create(&mut self, id: &str, options: Options) -> &mut Viewer {
        let viewer = Viewer::new(options);
        match self.viewers.entry(id.to_owned()) {
            Entry::Occupied(mut slot) => {
                log::debug!("replacing viewer '{id}'");
                let _ = slot.insert(viewer);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(viewer),
        }
    }

    /// Viewer by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Viewer> {
        self.viewers.get(id)
    }

    /// Mutable viewer by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Viewer> {
        self.viewers.get_mut(id)
    }

    /// Drop a viewer and return it.
    pub fn remove(&mut self, id: &str) -> Option<Viewer> {
        self.viewers.remove(id)
    }

    /// Apply a command to viewer `id`.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::UnknownObject`] naming the id when no such viewer
    /// exists, otherwise whatever the command reports.
    pub fn dispatch(&mut self, id: &str, command: ViewerCommand) -> Result<(), FlatmolError> {
        self.viewers
            .get_mut(id)
            .ok_or_else(|| FlatmolError::UnknownObject(format!("viewer '{id}'")))?
            .execute(command)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.viewers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of viewers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    /// Whether no viewers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::FramePayload;

    #[test]
    fn viewers_are_independent() {
        let mut registry = ViewerRegistry::new();
        let _ = registry.create("left", Options::default());
        let _ = registry.create("right", Options::default());

        registry
            .dispatch(
                "left",
                ViewerCommand::AppendFrame {
                    object: "A".into(),
                    payload: FramePayload {
                        coordinates: vec![[0.0; 3], [3.8, 0.0, 0.0]],
                        ..FramePayload::default()
                    },
                    align: true,
                },
            )
            .unwrap();

        assert_eq!(registry.get("left").unwrap().store().len(), 1);
        assert!(registry.get("right").unwrap().store().is_empty());
        assert_eq!(registry.ids(), ["left", "right"]);
    }

    #[test]
    fn unknown_viewer_is_an_error() {
        let mut registry = ViewerRegistry::new();
        assert!(registry.dispatch("nope", ViewerCommand::Play).is_err());
        let _ = registry.create("a", Options::default());
        assert!(registry.remove("a").is_some());
        assert!(registry.is_empty());
    }
}
