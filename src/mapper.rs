//! Bidirectional mapping between elapsed seconds and frame indices

use crate::store::KeyframeStore;
use log::warn;
use serde::{Deserialize, Serialize};

/// Maps between continuous playback time and discrete frame indices at a
/// scene-wide target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMapper {
    frame_rate: f64,
}

impl FrameMapper {
    /// Create a mapper for the given target frame rate (frames per second)
    #[inline]
    pub fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    /// The target frame rate
    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Playback seconds at a frame index
    #[inline]
    pub fn frame_to_seconds(&self, frame: u64) -> f64 {
        frame as f64 / self.frame_rate
    }

    /// Frame index nearest to a playback time, clamped to `[0, len - 1]`
    #[inline]
    pub fn seconds_to_frame(&self, seconds: f64, len: usize) -> u64 {
        if len == 0 {
            return 0;
        }
        let frame = (seconds * self.frame_rate).round().max(0.0) as u64;
        frame.min(len as u64 - 1)
    }

    /// Approximate total playback duration of a trajectory of `len`
    /// samples; exact only when every run duration is a whole multiple of
    /// the frame period.
    #[inline]
    pub fn total_duration_seconds(&self, len: usize) -> f64 {
        len as f64 / self.frame_rate
    }

    /// Timing feasibility check: every keyframe after the first needs at
    /// least one frame of spacing at the current target rate.
    ///
    /// Returns the indices of keyframes whose gap is shorter than one
    /// frame. Advisory only: path generation still proceeds (one sample
    /// per segment lower bound), the caller surfaces a warning and the
    /// user fixes timings or the frame rate later.
    pub fn check_timings(&self, store: &KeyframeStore) -> Vec<usize> {
        let offending: Vec<usize> = store
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, kf)| kf.seconds * self.frame_rate < 1.0)
            .map(|(i, _)| i)
            .collect();
        if !offending.is_empty() {
            warn!(
                "{} keyframe gap(s) shorter than one frame at {} fps",
                offending.len(),
                self.frame_rate
            );
        }
        offending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{CameraPose, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_seconds_round_trip() {
        let mapper = FrameMapper::new(10.0);
        for frame in [0u64, 1, 7, 29, 100] {
            let secs = mapper.frame_to_seconds(frame);
            assert_eq!(mapper.seconds_to_frame(secs, 1000), frame);
        }
    }

    #[test]
    fn test_seconds_to_frame_clamps() {
        let mapper = FrameMapper::new(10.0);
        assert_eq!(mapper.seconds_to_frame(99.0, 30), 29);
        assert_eq!(mapper.seconds_to_frame(-5.0, 30), 0);
        assert_eq!(mapper.seconds_to_frame(1.0, 0), 0);
    }

    #[test]
    fn test_total_duration() {
        let mapper = FrameMapper::new(25.0);
        assert_relative_eq!(mapper.total_duration_seconds(50), 2.0);
    }

    #[test]
    fn test_check_timings_flags_short_gaps() {
        let pose = CameraPose::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        let mut store = KeyframeStore::new();
        store.append(None, 0.0, pose, 0).unwrap();
        store.append(None, 1.0, pose, 1000).unwrap();
        store.append(None, 0.05, pose, 2000).unwrap();

        let mapper = FrameMapper::new(10.0);
        // 0.05 s * 10 fps = half a frame.
        assert_eq!(mapper.check_timings(&store), vec![2]);

        // At 60 fps the same gap spans three frames.
        let mapper = FrameMapper::new(60.0);
        assert!(mapper.check_timings(&store).is_empty());
    }
}
