//! Producer-side incremental sync.
//!
//! A producer that streams a [`TrajectoryStore`] to a separate consumer
//! viewer keeps one [`SyncTracker`]. Each [`SyncTracker::collect`] call
//! returns only the commands the consumer has not seen yet: new objects,
//! frames past the last acknowledged count, and object or frame metadata
//! that differs from the last acknowledged snapshot. When the producer was
//! cleared since the last call, the consumer is cleared too and everything
//! is resent.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::color::{ColorDirective, ColorTarget};
use crate::engine::ViewerCommand;
use crate::geometry::{mat3_to_rows, BestView};
use crate::trajectory::{Contact, ScatterSeries, TrajectoryObject, TrajectoryStore};

#[derive(Debug, Clone, PartialEq, Default)]
struct MetadataSnapshot {
    color: Option<ColorDirective>,
    frame_colors: Vec<Option<ColorDirective>>,
    contacts: Vec<Contact>,
    bonds: Option<Vec<[usize; 2]>>,
    view: Option<BestView>,
    scatter: Option<ScatterSeries>,
}

impl MetadataSnapshot {
    fn of(object: &TrajectoryObject) -> Self {
        Self {
            color: object.color().cloned(),
            frame_colors: object.frames().iter().map(|f| f.color().cloned()).collect(),
            contacts: object.contacts().to_vec(),
            bonds: object.bonds().map(<[[usize; 2]]>::to_vec),
            view: object.view(),
            scatter: object.scatter().cloned(),
        }
    }
}

/// Per-object record of what a consumer has already received.
#[derive(Debug, Clone, Default)]
pub struct SyncTracker {
    generation: Option<u64>,
    frames_sent: FxHashMap<String, usize>,
    metadata_sent: FxHashMap<String, MetadataSnapshot>,
}

impl SyncTracker {
    /// Tracker for a consumer that has seen nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames of `object` the consumer has received.
    #[must_use]
    pub fn frames_sent(&self, object: &str) -> usize {
        self.frames_sent.get(object).copied().unwrap_or(0)
    }

    /// Whether the consumer holds state the producer no longer has: the
    /// store was cleared, an object vanished, or one shrank.
    fn is_stale(&self, store: &TrajectoryStore) -> bool {
        self.generation.is_some_and(|g| g != store.generation())
            || self
                .frames_sent
                .keys()
                .any(|name| store.object(name).is_err())
            || store
                .objects()
                .any(|object| object.frame_count() < self.frames_sent(object.name()))
    }

    /// Commands that bring the consumer up to date with `store`, marking
    /// everything returned as sent.
    ///
    /// Frames are sent unaligned since the store already holds them
    /// aligned.
    pub fn collect(&mut self, store: &TrajectoryStore) -> Vec<ViewerCommand> {
        let mut commands = Vec::new();
        if self.is_stale(store) {
            log::debug!("sync: producer was cleared; resending everything");
            self.reset();
            commands.push(ViewerCommand::ClearAll);
        }
        self.generation = Some(store.generation());

        for object in store.objects() {
            let name = object.name();
            let sent = match self.frames_sent.get(name) {
                Some(&sent) => sent,
                None => {
                    commands.push(ViewerCommand::NewObject {
                        name: name.to_owned(),
                    });
                    0
                }
            };
            commands.extend(object.frames().iter().skip(sent).map(|frame| {
                ViewerCommand::AppendFrame {
                    object: name.to_owned(),
                    payload: frame.to_payload(),
                    align: false,
                }
            }));
            let _ = self
                .frames_sent
                .insert(name.to_owned(), object.frame_count());

            let current = MetadataSnapshot::of(object);
            let previous = self.metadata_sent.get(name).cloned().unwrap_or_default();
            if current != previous {
                commands.extend(metadata_changes(name, sent, &previous, &current));
                let _ = self.metadata_sent.insert(name.to_owned(), current);
            }
        }
        if !commands.is_empty() {
            log::debug!("sync: {} commands pending", commands.len());
        }
        commands
    }

    /// Record `store` as fully received, e.g. after the consumer was
    /// initialized from a complete snapshot.
    pub fn mark_synced(&mut self, store: &TrajectoryStore) {
        self.reset();
        self.generation = Some(store.generation());
        for object in store.objects() {
            let name = object.name().to_owned();
            let _ = self.frames_sent.insert(name.clone(), object.frame_count());
            let _ = self
                .metadata_sent
                .insert(name, MetadataSnapshot::of(object));
        }
    }

    /// Forget everything; the next [`Self::collect`] resends it all.
    pub fn reset(&mut self) {
        self.generation = None;
        self.frames_sent.clear();
        self.metadata_sent.clear();
    }
}

/// Metadata commands for one object. Frames from `sent` on were just
/// appended with their own color, so only earlier frames are compared.
fn metadata_changes(
    name: &str,
    sent: usize,
    previous: &MetadataSnapshot,
    current: &MetadataSnapshot,
) -> Vec<ViewerCommand> {
    let mut commands = Vec::new();
    let set_color = |color: &ColorDirective, frame: Option<usize>| ViewerCommand::SetColor {
        object: name.to_owned(),
        color: color.clone(),
        target: ColorTarget {
            frame,
            ..ColorTarget::default()
        },
    };
    if current.color != previous.color {
        if let Some(color) = &current.color {
            commands.push(set_color(color, None));
        }
    }
    for (index, color) in current.frame_colors.iter().enumerate().take(sent) {
        let before = previous.frame_colors.get(index).and_then(Option::as_ref);
        if let Some(color) = color.as_ref().filter(|&c| Some(c) != before) {
            commands.push(set_color(color, Some(index)));
        }
    }
    if current.contacts != previous.contacts {
        commands.push(ViewerCommand::SetContacts {
            object: name.to_owned(),
            contacts: current.contacts.iter().map(Contact::to_value).collect(),
        });
    }
    if current.bonds != previous.bonds {
        commands.push(ViewerCommand::SetBonds {
            object: name.to_owned(),
            bonds: current
                .bonds
                .iter()
                .flatten()
                .map(|b| Value::from(b.to_vec()))
                .collect(),
        });
    }
    if current.view != previous.view {
        if let Some(view) = current.view {
            commands.push(ViewerCommand::SetViewTransform {
                object: Some(name.to_owned()),
                rotation: mat3_to_rows(&view.rotation),
                center: Some(view.center.to_array()),
            });
        }
    }
    if current.scatter != previous.scatter {
        commands.push(ViewerCommand::SetScatter {
            object: name.to_owned(),
            scatter: current.scatter.clone(),
        });
    }
    commands
}
