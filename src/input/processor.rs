//! Converts raw host events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection) and the key-binding map. It is the only thing that sits
//! between raw host events and [`Viewer::execute`](crate::Viewer::execute).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::ViewerCommand;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the DOM `KeyboardEvent.code` format: `"KeyR"`,
/// `"Space"`, `"Escape"`, etc.
///
/// Only discrete commands make sense as key bindings; parameterized
/// commands like `Rotate` come from pointer gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`ViewerCommand`] that can be
/// key-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Play or pause.
    TogglePlayback,
    /// Toggle turntable auto-rotation.
    ToggleAutoRotate,
    /// Recompute the best view from the displayed frame.
    Reorient,
    /// Stop playback.
    Pause,
}

impl KeyCommandTag {
    fn to_command(self) -> ViewerCommand {
        match self {
            Self::TogglePlayback => ViewerCommand::TogglePlayback,
            Self::ToggleAutoRotate => ViewerCommand::ToggleAutoRotate,
            Self::Reorient => ViewerCommand::Reorient {
                object: None,
                frame: None,
            },
            Self::Pause => ViewerCommand::Pause,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Space".into(), KeyCommandTag::TogglePlayback),
            ("KeyT".into(), KeyCommandTag::TogglePlayback),
            ("KeyR".into(), KeyCommandTag::ToggleAutoRotate),
            ("KeyQ".into(), KeyCommandTag::Reorient),
            ("Escape".into(), KeyCommandTag::Pause),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: &str, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.to_owned(), tag);
    }

    /// Remove the binding for `key`.
    pub fn unbind(&mut self, key: &str) {
        let _ = self.bindings.remove(key);
    }
}

/// Converts raw host events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```
/// use flatmol::input::{InputEvent, InputProcessor, MouseButton};
/// use flatmol::Viewer;
///
/// let mut viewer = Viewer::default();
/// let mut input = InputProcessor::new();
/// for event in [
///     InputEvent::MouseButton { button: MouseButton::Left, pressed: true },
///     InputEvent::CursorMoved { x: 12.0, y: 4.0 },
/// ] {
///     if let Some(cmd) = input.handle_event(event) {
///         viewer.execute(cmd).unwrap();
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Last cursor position, once one was seen.
    cursor: Option<(f32, f32)>,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = pressed;
                }
                None
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Zoom { delta }),
            InputEvent::Resized { width, height } => {
                Some(ViewerCommand::Resize { width, height })
            }
        }
    }

    /// Cursor moved: a drag with the primary button held rotates.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<ViewerCommand> {
        let previous = self.cursor.replace((x, y));
        if !self.mouse_pressed {
            return None;
        }
        let (lx, ly) = previous?;
        let delta = [x - lx, y - ly];
        (delta != [0.0, 0.0]).then_some(ViewerCommand::Rotate { delta })
    }
}
