//! Frame capture targets for recording.
//!
//! A recording renders every frame of the selected trajectory into a
//! [`DrawList`] and hands each one to a [`FrameCapture`], one frame per
//! viewer tick.

use std::path::{Path, PathBuf};

use crate::error::FlatmolError;
use crate::render::DrawList;

/// Receives the frames of a recording.
pub trait FrameCapture {
    /// Prepare for `frames` drawings of `width` × `height` pixels.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Capture`] (or I/O) if capture cannot start; the
    /// viewer then refuses the recording.
    fn begin(&mut self, width: u32, height: u32, frames: usize) -> Result<(), FlatmolError>;

    /// Accept one drawing.
    ///
    /// # Errors
    ///
    /// Any failure aborts the recording.
    fn capture(&mut self, drawing: &DrawList) -> Result<(), FlatmolError>;

    /// Flush after the last frame.
    ///
    /// # Errors
    ///
    /// Any failure is reported to the caller; the viewer is idle either way.
    fn finish(&mut self) -> Result<(), FlatmolError>;

    /// Recording abandoned before `finish`.
    fn abort(&mut self) {}
}

/// Writes each frame as a numbered SVG file (`frame_0000.svg`, ...).
#[derive(Debug, Clone)]
pub struct SvgSequenceCapture {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl SvgSequenceCapture {
    /// Capture into `dir`, creating it on [`FrameCapture::begin`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame".to_owned(),
            written: Vec::new(),
        }
    }

    /// Use a different file name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        prefix.clone_into(&mut self.prefix);
        self
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameCapture for SvgSequenceCapture {
    fn begin(&mut self, width: u32, height: u32, frames: usize) -> Result<(), FlatmolError> {
        if width == 0 || height == 0 {
            return Err(FlatmolError::Capture(format!(
                "cannot capture a {width}x{height} surface"
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        self.written.clear();
        log::info!("recording {frames} frames to {}", self.dir.display());
        Ok(())
    }

    fn capture(&mut self, drawing: &DrawList) -> Result<(), FlatmolError> {
        let path = self
            .dir
            .join(format!("{}_{:04}.svg", self.prefix, self.written.len()));
        svg::save(&path, &drawing.to_document())?;
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FlatmolError> {
        log::info!(
            "recording finished: {} frames in {}",
            self.written.len(),
            self.dir.display()
        );
        Ok(())
    }

    fn abort(&mut self) {
        log::warn!(
            "recording aborted after {} frames in {}",
            self.written.len(),
            self.dir.display()
        );
    }
}

/// Keeps captured drawings in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCapture {
    frames: Vec<DrawList>,
    finished: bool,
    aborted: bool,
    unavailable: bool,
}

impl MemoryCapture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture whose `begin` always fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Captured drawings.
    #[must_use]
    pub fn frames(&self) -> &[DrawList] {
        &self.frames
    }

    /// Whether `finish` was called.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the recording was abandoned.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameCapture for MemoryCapture {
    fn begin(&mut self, _width: u32, _height: u32, frames: usize) -> Result<(), FlatmolError> {
        if self.unavailable {
            return Err(FlatmolError::Capture("capture unavailable".to_owned()));
        }
        self.frames = Vec::with_capacity(frames);
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn capture(&mut self, drawing: &DrawList) -> Result<(), FlatmolError> {
        self.frames.push(drawing.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FlatmolError> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Surface;

    #[test]
    fn svg_sequence_writes_numbered_files() {
        let dir = std::env::temp_dir().join(format!("flatmol-capture-{}", std::process::id()));
        let mut capture = SvgSequenceCapture::new(&dir).with_prefix("shot");
        capture.begin(32, 32, 2).unwrap();
        let mut drawing = DrawList::new();
        drawing.clear(32, 32, [1.0; 3]);
        capture.capture(&drawing).unwrap();
        capture.capture(&drawing).unwrap();
        capture.finish().unwrap();

        assert_eq!(capture.written().len(), 2);
        assert!(dir.join("shot_0001.svg").exists());
        let text = std::fs::read_to_string(dir.join("shot_0000.svg")).unwrap();
        assert!(text.starts_with("<svg"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn zero_sized_surface_is_refused() {
        let mut capture = SvgSequenceCapture::new(std::env::temp_dir());
        assert!(matches!(
            capture.begin(0, 10, 1),
            Err(FlatmolError::Capture(_))
        ));
    }

    #[test]
    fn unavailable_memory_capture_fails_to_begin() {
        assert!(MemoryCapture::unavailable().begin(10, 10, 1).is_err());
        assert!(MemoryCapture::new().begin(10, 10, 1).is_ok());
    }
}
