//! Crate-level error types.

use std::fmt;

/// Errors produced by the flatmol crate.
///
/// Recoverable input problems (mis-sized attributes, malformed contact
/// entries, degenerate geometry) are logged and absorbed where they occur;
/// only caller-visible failures reach this type.
#[derive(Debug)]
pub enum FlatmolError {
    /// No object with the given name exists in the store.
    UnknownObject(String),
    /// An object with the given name already exists.
    DuplicateObject(String),
    /// A frame index past the end of an object's frame list.
    FrameOutOfRange {
        /// Requested frame index.
        index: usize,
        /// Number of frames available.
        len: usize,
    },
    /// Frame capture could not be started or written.
    Capture(String),
    /// Playback transition refused.
    Playback(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Session document parsing/serialization failure.
    Session(String),
}

impl fmt::Display for FlatmolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownObject(name) => write!(f, "unknown object '{name}'"),
            Self::DuplicateObject(name) => {
                write!(f, "object '{name}' already exists")
            }
            Self::FrameOutOfRange { index, len } => {
                write!(f, "frame {index} out of range (object has {len})")
            }
            Self::Capture(msg) => write!(f, "capture error: {msg}"),
            Self::Playback(msg) => write!(f, "playback error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Session(msg) => write!(f, "session error: {msg}"),
        }
    }
}

impl std::error::Error for FlatmolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlatmolError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for FlatmolError {
    fn from(e: serde_json::Error) -> Self {
        Self::Session(e.to_string())
    }
}
