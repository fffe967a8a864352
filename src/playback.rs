//! Playback and recording state machine.
//!
//! ```text
//! Idle ──play (≥2 frames)──▶ Playing ──pause / switch──▶ Idle
//!  │                          │ tick: advance, wrap to 0
//!  └──record──▶ Recording ◀───┘
//!               │ one frame per capture step
//!               └──last frame captured──▶ Idle
//! ```
//!
//! The controller only tracks state and the current frame index. Drawing
//! and capture are driven by the viewer.

use web_time::{Duration, Instant};

use crate::error::FlatmolError;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Showing a fixed frame.
    #[default]
    Idle,
    /// Advancing on a timer, looping at the end.
    Playing,
    /// Stepping through every frame for capture; input is ignored.
    Recording,
}

/// Frame cursor plus playback/recording state for the selected trajectory.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    current: usize,
    frame_count: usize,
    interval: Duration,
    last_advance: Option<Instant>,
}

impl PlaybackController {
    /// Idle controller ticking every `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            current: 0,
            frame_count: 0,
            interval,
            last_advance: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the frame being shown.
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Frames in the selected trajectory.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Whether playback is advancing on its own.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a recording is in progress.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.state == PlaybackState::Recording
    }

    /// Change the tick interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Update the frame count after frames were appended to the selected
    /// trajectory.
    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        if self.current >= frame_count {
            self.current = frame_count.saturating_sub(1);
        }
    }

    /// Select another trajectory: stop whatever was running and show its
    /// first frame.
    pub fn switch_trajectory(&mut self, frame_count: usize) {
        if self.state != PlaybackState::Idle {
            log::debug!("playback: {:?} -> Idle (trajectory switch)", self.state);
        }
        self.state = PlaybackState::Idle;
        self.frame_count = frame_count;
        self.current = 0;
        self.last_advance = None;
    }

    /// Start playing.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Playback`] while recording or with fewer than two
    /// frames.
    pub fn play(&mut self, now: Instant) -> Result<(), FlatmolError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Recording => {
                Err(FlatmolError::Playback("recording in progress".to_owned()))
            }
            PlaybackState::Idle if self.frame_count < 2 => Err(FlatmolError::Playback(
                format!("need at least 2 frames to play, have {}", self.frame_count),
            )),
            PlaybackState::Idle => {
                self.state = PlaybackState::Playing;
                self.last_advance = Some(now);
                log::debug!("playback: Idle -> Playing");
                Ok(())
            }
        }
    }

    /// Stop playing. Has no effect while recording.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Idle;
            self.last_advance = None;
            log::debug!("playback: Playing -> Idle");
        }
    }

    /// Play if idle, pause if playing.
    ///
    /// # Errors
    ///
    /// As for [`Self::play`].
    pub fn toggle(&mut self, now: Instant) -> Result<(), FlatmolError> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play(now)
        }
    }

    /// Jump to frame `index`.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::FrameOutOfRange`] past the end,
    /// [`FlatmolError::Playback`] while recording.
    pub fn set_frame(&mut self, index: usize) -> Result<(), FlatmolError> {
        if self.is_recording() {
            return Err(FlatmolError::Playback("recording in progress".to_owned()));
        }
        if index >= self.frame_count {
            return Err(FlatmolError::FrameOutOfRange {
                index,
                len: self.frame_count,
            });
        }
        self.current = index;
        Ok(())
    }

    /// Show the last frame, unless playing or recording.
    pub fn follow_latest(&mut self) {
        if self.state == PlaybackState::Idle {
            self.current = self.frame_count.saturating_sub(1);
        }
    }

    /// Advance one frame if playing and the interval has elapsed. Returns
    /// the new frame index when it changed.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        if self.state != PlaybackState::Playing || self.frame_count == 0 {
            return None;
        }
        let last = *self.last_advance.get_or_insert(now);
        if now.duration_since(last) < self.interval {
            return None;
        }
        self.last_advance = Some(now);
        self.current = (self.current + 1) % self.frame_count;
        Some(self.current)
    }

    /// Enter recording at frame 0.
    ///
    /// # Errors
    ///
    /// [`FlatmolError::Playback`] if already recording or there is nothing
    /// to record.
    pub fn start_recording(&mut self) -> Result<(), FlatmolError> {
        if self.is_recording() {
            return Err(FlatmolError::Playback("already recording".to_owned()));
        }
        if self.frame_count == 0 {
            return Err(FlatmolError::Playback("no frames to record".to_owned()));
        }
        log::debug!("playback: {:?} -> Recording", self.state);
        self.state = PlaybackState::Recording;
        self.current = 0;
        self.last_advance = None;
        Ok(())
    }

    /// Frame to capture next, if recording.
    #[must_use]
    pub fn capture_frame(&self) -> Option<usize> {
        self.is_recording().then_some(self.current)
    }

    /// Mark the current frame captured. Advances to the next frame, or ends
    /// the recording after the last one. Returns `true` when the recording
    /// finished.
    pub fn complete_capture(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        if self.current + 1 < self.frame_count {
            self.current += 1;
            false
        } else {
            self.state = PlaybackState::Idle;
            log::debug!("playback: Recording -> Idle");
            true
        }
    }

    /// Abandon a recording and return to idle at `restore_frame`.
    pub fn abort_recording(&mut self, restore_frame: usize) {
        if self.is_recording() {
            self.state = PlaybackState::Idle;
            self.current = restore_frame.min(self.frame_count.saturating_sub(1));
            log::debug!("playback: Recording -> Idle (aborted)");
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(frames: usize) -> PlaybackController {
        let mut c = PlaybackController::default();
        c.switch_trajectory(frames);
        c
    }

    #[test]
    fn play_requires_two_frames() {
        let now = Instant::now();
        let mut c = controller(1);
        assert!(c.play(now).is_err());
        assert_eq!(c.state(), PlaybackState::Idle);
        c.set_frame_count(2);
        c.play(now).unwrap();
        assert!(c.is_playing());
    }

    #[test]
    fn ticks_advance_on_interval_and_loop() {
        let start = Instant::now();
        let mut c = controller(3);
        c.play(start).unwrap();
        assert_eq!(c.tick(start + Duration::from_millis(50)), None);
        assert_eq!(c.tick(start + Duration::from_millis(100)), Some(1));
        assert_eq!(c.tick(start + Duration::from_millis(200)), Some(2));
        assert_eq!(c.tick(start + Duration::from_millis(300)), Some(0));
    }

    #[test]
    fn pause_and_switch_stop_playback() {
        let now = Instant::now();
        let mut c = controller(4);
        c.play(now).unwrap();
        c.pause();
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.tick(now + Duration::from_secs(1)), None);

        c.set_frame(2).unwrap();
        c.play(now).unwrap();
        c.switch_trajectory(7);
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.current_frame(), 0);
        assert_eq!(c.frame_count(), 7);
    }

    #[test]
    fn recording_walks_every_frame_then_idles() {
        let now = Instant::now();
        let mut c = controller(3);
        c.play(now).unwrap();
        c.start_recording().unwrap();
        assert!(c.start_recording().is_err());
        assert!(c.play(now).is_err());
        assert!(c.set_frame(1).is_err());

        let mut captured = Vec::new();
        while let Some(frame) = c.capture_frame() {
            captured.push(frame);
            let _ = c.complete_capture();
        }
        assert_eq!(captured, vec![0, 1, 2]);
        assert_eq!(c.state(), PlaybackState::Idle);
        c.play(now).unwrap();
    }

    #[test]
    fn set_frame_bounds() {
        let mut c = controller(2);
        assert!(matches!(
            c.set_frame(2),
            Err(FlatmolError::FrameOutOfRange { index: 2, len: 2 })
        ));
        c.set_frame(1).unwrap();
        assert_eq!(c.current_frame(), 1);
    }
}
