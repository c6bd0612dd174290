//! Generated trajectory: dense, frame-indexed resampling of the keyframes
//!
//! The trajectory is a derived, disposable cache. It is regenerated
//! wholesale whenever the keyframe store changes and never patched in
//! place; the store revision it was generated from is recorded so
//! consumers can detect staleness.

use crate::pose::{CameraPose, Vec3};
use crate::spline::Spline;
use crate::store::KeyframeStore;
use serde::{Deserialize, Serialize};

/// One dense sample of the generated trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// Absolute frame index, globally increasing across runs
    pub frame: u64,
    /// Scene time at this sample, epoch milliseconds (linearly
    /// interpolated between the surrounding keyframes' timestamps)
    pub time_ms: i64,
    /// Interpolated camera position
    pub position: Vec3,
    /// Interpolated view direction (not renormalized)
    pub direction: Vec3,
    /// Interpolated up vector (not renormalized)
    pub up: Vec3,
}

impl PathSample {
    /// The camera pose at this sample
    #[inline]
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.direction, self.up)
    }
}

/// The dense camera trajectory generated from a keyframe store
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    samples: Vec<PathSample>,
    frame_rate: f64,
    /// Frame index of the sample exactly at each keyframe's cumulative
    /// time. The last keyframe sits at the half-open end of the timeline,
    /// so its entry equals the total sample count.
    keyframe_frames: Vec<u64>,
    revision: u64,
}

/// Number of frames allocated to a segment of the given duration.
///
/// `ceil(seconds * fps)` with a fuzz band so exact multiples of the frame
/// period are not pushed up by floating-point noise; minimum 1, so a
/// zero-duration segment still yields its single duplicate-time sample.
fn segment_frames(seconds: f64, frame_rate: f64) -> u64 {
    let raw = seconds * frame_rate;
    let rounded = raw.round();
    let frames = if (raw - rounded).abs() < 1e-6 {
        rounded
    } else {
        raw.ceil()
    };
    (frames as u64).max(1)
}

impl Trajectory {
    /// An empty trajectory (fewer than 2 keyframes)
    pub fn empty(frame_rate: f64, revision: u64) -> Self {
        Self {
            samples: Vec::new(),
            frame_rate,
            keyframe_frames: Vec::new(),
            revision,
        }
    }

    /// Generate the dense trajectory for `store` at the given target frame
    /// rate.
    ///
    /// Keyframes are partitioned into maximal seam-free runs; a seam
    /// keyframe is both the final control point of the outgoing run and
    /// the first of the next, so the path stays positionally continuous
    /// while its tangent may break. Position, direction and up are fitted
    /// with independent splines per run. Frames are allocated per segment
    /// (`ceil(seconds * fps)`, minimum 1) and sampled on a `1/fps` grid
    /// anchored at the segment's starting keyframe, so every keyframe
    /// except the last owns the first sample of its outgoing segment.
    pub fn generate(store: &KeyframeStore, frame_rate: f64) -> Self {
        let kfs = store.keyframes();
        let n = kfs.len();
        if n < 2 || frame_rate <= 0.0 {
            return Self::empty(frame_rate, store.revision());
        }

        // Cumulative playback time of each keyframe.
        let mut cum = Vec::with_capacity(n);
        let mut acc = 0.0;
        for (i, kf) in kfs.iter().enumerate() {
            if i > 0 {
                acc += kf.seconds;
            }
            cum.push(acc);
        }

        // Maximal runs between seam boundaries, sharing the seam keyframe.
        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for i in 1..n {
            if kfs[i].seam {
                runs.push((start, i));
                start = i;
            }
        }
        runs.push((start, n - 1));

        let mut samples = Vec::new();
        let mut keyframe_frames = vec![0u64; n];
        let mut frame: u64 = 0;

        for &(run_start, run_end) in &runs {
            if run_start == run_end {
                // A trailing seam keyframe forms a degenerate run with no
                // segments; it is already the shared tail of the previous
                // run and allocates no frames of its own.
                continue;
            }

            let times: Vec<f64> = cum[run_start..=run_end].to_vec();
            let positions = Spline::fit(
                times.clone(),
                kfs[run_start..=run_end].iter().map(|k| k.position).collect(),
            );
            let directions = Spline::fit(
                times.clone(),
                kfs[run_start..=run_end]
                    .iter()
                    .map(|k| k.direction)
                    .collect(),
            );
            let ups = Spline::fit(
                times,
                kfs[run_start..=run_end].iter().map(|k| k.up).collect(),
            );

            for seg in (run_start + 1)..=run_end {
                let k0 = &kfs[seg - 1];
                let k1 = &kfs[seg];
                let seconds = k1.seconds;
                let count = segment_frames(seconds, frame_rate);
                keyframe_frames[seg - 1] = frame;

                for k in 0..count {
                    let t = cum[seg - 1] + k as f64 / frame_rate;
                    let (pose, time_ms) = if seconds <= 0.0 {
                        // Instantaneous segment: one duplicate-time sample
                        // holding the pre-jump pose.
                        (k0.pose(), k0.time)
                    } else {
                        let frac = (t - cum[seg - 1]) / seconds;
                        let time_ms = k0.time + ((k1.time - k0.time) as f64 * frac) as i64;
                        let pose = CameraPose::new(
                            positions.sample(t),
                            directions.sample(t),
                            ups.sample(t),
                        );
                        (pose, time_ms)
                    };
                    samples.push(PathSample {
                        frame,
                        time_ms,
                        position: pose.position,
                        direction: pose.direction,
                        up: pose.up,
                    });
                    frame += 1;
                }
            }
        }

        // Every segment recorded the frame of its starting keyframe; the
        // final keyframe sits at the half-open end of the timeline.
        keyframe_frames[n - 1] = frame;

        Self {
            samples,
            frame_rate,
            keyframe_frames,
            revision: store.revision(),
        }
    }

    /// All samples in frame order
    #[inline]
    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    /// Sample at a frame index
    #[inline]
    pub fn get(&self, frame: u64) -> Option<&PathSample> {
        self.samples.get(frame as usize)
    }

    /// Total number of samples (frames)
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frame rate this trajectory was generated at
    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Store revision this trajectory was generated from
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Approximate playback duration in seconds (`len / fps`)
    #[inline]
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.frame_rate
    }

    /// Absolute frame index of the sample exactly at the cumulative time
    /// of the keyframe at `index`.
    ///
    /// For the final keyframe this is the half-open end of the timeline:
    /// one past the last valid sample index.
    #[inline]
    pub fn frame_of_keyframe(&self, index: usize) -> Option<u64> {
        self.keyframe_frames.get(index).copied()
    }
}
