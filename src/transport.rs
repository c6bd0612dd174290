//! Playback transport state machine

use serde::{Deserialize, Serialize};

/// Playback state of the camera path transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// No trajectory, or a degenerate one; media controls inactive
    #[default]
    Idle,
    /// Cursor at a frame, not advancing
    Stopped,
    /// Cursor advancing one frame per tick
    Playing,
    /// Cursor held, resumable
    Paused,
}

impl PlaybackState {
    /// Get the name of this playback state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Check if the transport is actively playing
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if playback can be started or resumed
    #[inline]
    pub fn can_play(&self) -> bool {
        matches!(self, Self::Stopped | Self::Paused)
    }

    /// Check if playback can be paused
    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// The playback state machine: holds the current frame cursor, advances it
/// while playing, and clamps it whenever the trajectory it plays over is
/// rebuilt.
///
/// The transport only deals in frame indices; it never touches the
/// trajectory samples themselves.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Transport {
    state: PlaybackState,
    frame: u64,
    /// Total frames of the bound trajectory (0 while idle)
    frames: u64,
}

impl Transport {
    /// Create an inert transport
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the transport to a trajectory of `frames` samples.
    ///
    /// Fewer than 2 samples means there is nothing to play: the transport
    /// goes `Idle`. Otherwise the cursor is clamped into the new bounds
    /// and a previously idle transport comes up `Stopped`.
    pub fn bind(&mut self, frames: u64) {
        self.frames = frames;
        if frames < 2 {
            self.state = PlaybackState::Idle;
            self.frame = 0;
        } else {
            self.frame = self.frame.min(frames - 1);
            if self.state == PlaybackState::Idle {
                self.state = PlaybackState::Stopped;
            }
        }
    }

    /// Structural store change while playing: stop at the proportionally
    /// re-mapped cursor position, clamped into the new bounds.
    pub fn remap(&mut self, frames: u64) {
        if frames < 2 {
            self.frames = frames;
            self.state = PlaybackState::Idle;
            self.frame = 0;
            return;
        }
        let frame = if self.frames > 1 {
            let ratio = self.frame as f64 / (self.frames - 1) as f64;
            (ratio * (frames - 1) as f64).round() as u64
        } else {
            0
        };
        self.frames = frames;
        self.frame = frame.min(frames - 1);
        if self.state != PlaybackState::Paused {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Start or resume playback. No-op while idle or already playing.
    pub fn play(&mut self) -> bool {
        if !self.state.can_play() {
            return false;
        }
        // Restart from the top when resting at the end of the path.
        if self.state == PlaybackState::Stopped && self.frames > 0 && self.frame == self.frames - 1
        {
            self.frame = 0;
        }
        self.state = PlaybackState::Playing;
        true
    }

    /// Pause playback, keeping the cursor
    pub fn pause(&mut self) -> bool {
        if !self.state.can_pause() {
            return false;
        }
        self.state = PlaybackState::Paused;
        true
    }

    /// Stop playback at the current frame
    pub fn stop(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                self.state = PlaybackState::Stopped;
                true
            }
            _ => false,
        }
    }

    /// Seek to a frame (clamped); any state becomes `Stopped` there.
    /// Used by scrubbing, go-to-first/last, stepping and jump-to-keyframe.
    pub fn seek(&mut self, frame: u64) -> bool {
        if self.state == PlaybackState::Idle {
            return false;
        }
        self.frame = frame.min(self.frames.saturating_sub(1));
        self.state = PlaybackState::Stopped;
        true
    }

    /// Step one frame forward (stops playback)
    #[inline]
    pub fn step_forward(&mut self) -> bool {
        self.seek(self.frame.saturating_add(1))
    }

    /// Step one frame backward (stops playback)
    #[inline]
    pub fn step_backward(&mut self) -> bool {
        self.seek(self.frame.saturating_sub(1))
    }

    /// Jump to the first frame
    #[inline]
    pub fn skip_to_start(&mut self) -> bool {
        self.seek(0)
    }

    /// Jump to the last frame
    #[inline]
    pub fn skip_to_end(&mut self) -> bool {
        self.seek(self.frames.saturating_sub(1))
    }

    /// Advance exactly one frame. Call once per render tick while playing;
    /// the advance is frame-exact, not real-time scaled, so playback stays
    /// in lockstep with the trajectory's own sampling rate.
    ///
    /// Returns the new frame when the cursor moved. Reaching the last
    /// frame auto-transitions to `Stopped`.
    pub fn tick(&mut self) -> Option<u64> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        if self.frame + 1 >= self.frames {
            // End of path.
            self.state = PlaybackState::Stopped;
            return None;
        }
        self.frame += 1;
        Some(self.frame)
    }

    /// Current frame cursor
    #[inline]
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Total frames of the bound trajectory
    #[inline]
    pub fn total_frames(&self) -> u64 {
        self.frames
    }

    /// Current playback state
    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True when the transport is inert or resting (not advancing and not
    /// paused mid-path)
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, PlaybackState::Idle | PlaybackState::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(PlaybackState::Idle.name(), "idle");
        assert_eq!(PlaybackState::Stopped.name(), "stopped");
        assert_eq!(PlaybackState::Playing.name(), "playing");
        assert_eq!(PlaybackState::Paused.name(), "paused");
    }

    #[test]
    fn test_idle_until_bound() {
        let mut t = Transport::new();
        assert!(t.is_idle());
        assert!(!t.play());
        assert!(!t.seek(5));

        t.bind(1);
        assert_eq!(t.state(), PlaybackState::Idle);

        t.bind(10);
        assert_eq!(t.state(), PlaybackState::Stopped);
        assert!(t.play());
        assert_eq!(t.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_play_pause_stop() {
        let mut t = Transport::new();
        t.bind(10);
        assert!(t.play());
        assert!(t.pause());
        assert_eq!(t.state(), PlaybackState::Paused);
        assert!(t.play());
        assert!(t.stop());
        assert_eq!(t.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_remap_proportional() {
        let mut t = Transport::new();
        t.bind(100);
        t.seek(50);
        t.play();
        t.remap(50);
        // 50/99 of the way through 49 clamps near the midpoint; playback
        // has stopped.
        assert_eq!(t.state(), PlaybackState::Stopped);
        assert_eq!(t.current_frame(), 25);
    }

    #[test]
    fn test_remap_to_degenerate() {
        let mut t = Transport::new();
        t.bind(30);
        t.seek(10);
        t.remap(1);
        assert_eq!(t.state(), PlaybackState::Idle);
        assert_eq!(t.current_frame(), 0);
    }
}
