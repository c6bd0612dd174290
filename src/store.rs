//! Ordered keyframe sequence: the ground truth authored by the user

use crate::keyframe::{self, Keyframe, KeyframeId};
use crate::pose::CameraPose;
use crate::{PathError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Ordered sequence of keyframes plus a revision counter.
///
/// Order is playback order, not insertion order. Every mutating operation
/// bumps the revision; derived state (the generated trajectory) compares
/// revisions instead of observing edits in flight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyframeStore {
    keyframes: Vec<Keyframe>,
    revision: u64,
}

impl KeyframeStore {
    /// Create an empty store
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence, e.g. after loading a keyframes file.
    /// The first keyframe's `seconds` is coerced to 0.
    pub fn replace(&mut self, mut keyframes: Vec<Keyframe>) {
        if let Some(first) = keyframes.first_mut() {
            first.seconds = 0.0;
        }
        self.keyframes = keyframes;
        self.touch();
    }

    /// Append a keyframe capturing the given camera pose.
    ///
    /// `name` of `None` picks the default `"Keyframe {n}"` pattern. The
    /// very first keyframe's spacing is forced to 0 regardless of
    /// `seconds`. Validation failures leave the store untouched.
    pub fn append(
        &mut self,
        name: Option<&str>,
        seconds: f64,
        pose: CameraPose,
        time_ms: i64,
    ) -> Result<KeyframeId> {
        self.insert_at(self.keyframes.len(), name, seconds, pose, time_ms)
    }

    /// Insert a keyframe at an explicit index (0 = before everything,
    /// `len` = append). The first keyframe's spacing is pinned at 0.
    pub fn insert_at(
        &mut self,
        index: usize,
        name: Option<&str>,
        seconds: f64,
        pose: CameraPose,
        time_ms: i64,
    ) -> Result<KeyframeId> {
        if index > self.keyframes.len() {
            return Err(PathError::IndexOutOfBounds {
                index,
                len: self.keyframes.len(),
            });
        }
        let name = match name {
            Some(n) => {
                self.check(keyframe::validate_name(n))?;
                n.to_string()
            }
            None => keyframe::default_name(self.keyframes.len() + 1),
        };
        let seconds = if index == 0 {
            0.0
        } else {
            self.check(keyframe::validate_seconds(seconds))?;
            seconds
        };

        let kf = Keyframe::new(name, pose, time_ms, seconds);
        let id = kf.id;
        self.keyframes.insert(index, kf);
        if index == 0 {
            // The displaced keyframe is no longer first.
            if self.keyframes.len() > 1 && self.keyframes[1].seconds == 0.0 {
                self.keyframes[1].seconds = 1.0;
            }
        }
        self.touch();
        Ok(id)
    }

    /// Insert a synthesized keyframe after `index`.
    ///
    /// Strictly between two keyframes the new pose is the linear midpoint
    /// of the neighbors, spaced at half the split segment's duration; the
    /// successor's spacing is left untouched, so removing the inserted
    /// keyframe restores the previous timeline exactly. After the final
    /// keyframe the pose is linearly extrapolated at parameter 1.5 from
    /// the last two keyframes, spaced by half the last segment's duration.
    pub fn insert_after(&mut self, index: usize) -> Result<KeyframeId> {
        let n = self.keyframes.len();
        if n < 2 {
            return Err(PathError::NotEnoughKeyframes {
                required: 2,
                actual: n,
            });
        }
        if index >= n {
            return Err(PathError::IndexOutOfBounds { index, len: n });
        }

        let (pose, time_ms, seconds) = if index < n - 1 {
            // Interpolate between the two neighbors.
            let k0 = &self.keyframes[index];
            let k1 = &self.keyframes[index + 1];
            let pose = k0.pose().lerp(&k1.pose(), 0.5);
            let time = k0.time + (k1.time - k0.time) / 2;
            (pose, time, k1.seconds / 2.0)
        } else {
            // Extrapolate past the last keyframe from the last two.
            let k0 = &self.keyframes[index - 1];
            let k1 = &self.keyframes[index];
            let pose = k0.pose().lerp(&k1.pose(), 1.5);
            let time = k1.time + (k1.time - k0.time) / 2;
            (pose, time, (k1.seconds / 2.0).max(keyframe::MIN_SECONDS))
        };

        let kf = Keyframe::new(
            keyframe::default_name(self.keyframes.len() + 1),
            pose,
            time_ms,
            seconds,
        );
        let id = kf.id;
        self.keyframes.insert(index + 1, kf);
        self.touch();
        Ok(id)
    }

    /// Remove a keyframe. If it was the first, the new first keyframe's
    /// spacing is reset to 0.
    pub fn remove(&mut self, id: KeyframeId) -> Result<Keyframe> {
        let index = self.index_of(id).ok_or(PathError::KeyframeNotFound {
            id: id.to_string(),
        })?;
        let removed = self.keyframes.remove(index);
        if index == 0 {
            if let Some(first) = self.keyframes.first_mut() {
                first.seconds = 0.0;
            }
        }
        self.touch();
        info!("removed keyframe {:?}", removed.name);
        Ok(removed)
    }

    /// Rename a keyframe in place
    pub fn rename(&mut self, id: KeyframeId, name: &str) -> Result<()> {
        self.check(keyframe::validate_name(name))?;
        let kf = self.get_mut(id)?;
        kf.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Change a keyframe's spacing from the previous keyframe. Rejected
    /// for the first keyframe, whose spacing is pinned at 0.
    pub fn set_seconds(&mut self, id: KeyframeId, seconds: f64) -> Result<()> {
        self.check(keyframe::validate_seconds(seconds))?;
        let index = self.index_of(id).ok_or(PathError::KeyframeNotFound {
            id: id.to_string(),
        })?;
        if index == 0 {
            warn!("seconds of the first keyframe is always 0; edit rejected");
            return Err(PathError::InvalidSeconds { seconds });
        }
        self.keyframes[index].seconds = seconds;
        self.touch();
        Ok(())
    }

    /// Toggle the seam flag of a keyframe
    pub fn set_seam(&mut self, id: KeyframeId, seam: bool) -> Result<()> {
        let kf = self.get_mut(id)?;
        kf.seam = seam;
        self.touch();
        Ok(())
    }

    /// Redistribute per-segment durations proportionally to the spatial
    /// distance between consecutive keyframes, preserving the total
    /// duration. Requires at least three keyframes (two segments).
    pub fn normalize_timing(&mut self) -> Result<()> {
        let n = self.keyframes.len();
        if n < 3 {
            return Err(PathError::NotEnoughKeyframes {
                required: 3,
                actual: n,
            });
        }
        let mut total_time = 0.0;
        let mut total_dist = 0.0;
        for i in 1..n {
            total_time += self.keyframes[i].seconds;
            total_dist += (self.keyframes[i].position - self.keyframes[i - 1].position).norm();
        }
        if total_dist == 0.0 {
            // All keyframes at the same position; nothing to redistribute.
            warn!("normalize: zero total distance, timings unchanged");
            return Ok(());
        }
        for i in 1..n {
            let dist = (self.keyframes[i].position - self.keyframes[i - 1].position).norm();
            self.keyframes[i].seconds = total_time * dist / total_dist;
        }
        self.touch();
        info!("normalized timings over {} keyframes ({total_time:.3}s total)", n);
        Ok(())
    }

    /// Empty the store
    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.touch();
    }

    /// Keyframe by id
    #[inline]
    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    /// Index of a keyframe in playback order
    #[inline]
    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    /// Keyframe at an index
    #[inline]
    pub fn at(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keyframes.iter()
    }

    /// All keyframes in playback order
    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Cumulative playback time of the keyframe at `index`, in seconds
    pub fn cumulative_seconds(&self, index: usize) -> f64 {
        self.keyframes
            .iter()
            .take(index + 1)
            .map(|k| k.seconds)
            .sum()
    }

    /// Total playback duration of the path, in seconds
    #[inline]
    pub fn total_seconds(&self) -> f64 {
        self.keyframes.iter().map(|k| k.seconds).sum()
    }

    /// Monotonic revision counter, bumped by every mutation
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn get_mut(&mut self, id: KeyframeId) -> Result<&mut Keyframe> {
        self.keyframes
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(PathError::KeyframeNotFound {
                id: id.to_string(),
            })
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Log validation failures at the edit boundary before bubbling them
    /// up; callers that pre-validated never reach this path.
    fn check(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            warn!("keyframe edit rejected ({}): {e}", e.category());
        }
        result
    }
}
