/// Pointer and surface events as the host reports them.
///
/// An [`InputProcessor`](super::InputProcessor) turns these into
/// [`ViewerCommand`](crate::ViewerCommand)s; the viewer never sees them
/// directly.
///
/// ```
/// use flatmol::input::{InputEvent, InputProcessor};
/// use flatmol::ViewerCommand;
///
/// let mut input = InputProcessor::new();
/// let cmd = input.handle_event(InputEvent::Scroll { delta: 1.0 });
/// assert_eq!(cmd, Some(ViewerCommand::Zoom { delta: 1.0 }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position on the drawing surface.
    CursorMoved {
        /// Pixels from the left edge.
        x: f32,
        /// Pixels from the top edge.
        y: f32,
    },
    /// A button went down or up.
    MouseButton {
        /// Button that changed.
        button: MouseButton,
        /// Down when `true`.
        pressed: bool,
    },
    /// Wheel movement; positive zooms in.
    Scroll {
        /// Wheel delta in host units.
        delta: f32,
    },
    /// The drawing surface changed size.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button; drags rotate.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index (0 primary, 1 wheel, 2
    /// secondary). Other indices have no mapping.
    #[must_use]
    pub fn from_dom_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_button_indices() {
        assert_eq!(MouseButton::from_dom_index(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom_index(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_dom_index(4), None);
    }
}
