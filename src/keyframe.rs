//! Keyframe record and input validation

use crate::pose::{CameraPose, Vec3};
use crate::{PathError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted keyframe name length, in characters
pub const MAX_NAME_LEN: usize = 24;
/// Characters rejected in keyframe names
const FORBIDDEN_NAME_CHARS: &[char] = &[
    '*', '&', '%', '+', '=', '\\', '/', '@', '#', '$', '(', ')', '~',
];

/// Lower bound for the seconds-after-previous spacing
pub const MIN_SECONDS: f64 = 0.0001;
/// Upper bound for the seconds-after-previous spacing
pub const MAX_SECONDS: f64 = 9999.0;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(Uuid);

impl KeyframeId {
    /// Generate a new random id
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A named, timed camera pose in the keyframe store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique identifier for this keyframe
    pub id: KeyframeId,
    /// Display name
    pub name: String,
    /// Camera position
    pub position: Vec3,
    /// Camera view direction
    pub direction: Vec3,
    /// Camera up vector
    pub up: Vec3,
    /// Absolute scene time, epoch milliseconds
    pub time: i64,
    /// Playback seconds elapsed since the previous keyframe.
    /// Always 0 for the first keyframe in the store.
    pub seconds: f64,
    /// Whether the path may have a tangent discontinuity just before this
    /// keyframe (starts a new smoothly-interpolated run)
    #[serde(default)]
    pub seam: bool,
}

impl Keyframe {
    /// Create a new keyframe from a camera pose
    #[inline]
    pub fn new(name: impl Into<String>, pose: CameraPose, time: i64, seconds: f64) -> Self {
        Self {
            id: KeyframeId::new(),
            name: name.into(),
            position: pose.position,
            direction: pose.direction,
            up: pose.up,
            time,
            seconds,
            seam: false,
        }
    }

    /// The camera pose at this keyframe
    #[inline]
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.direction, self.up)
    }
}

/// Default display name for the n-th keyframe (1-based)
#[inline]
pub fn default_name(n: usize) -> String {
    format!("Keyframe {n}")
}

/// Validate a keyframe name: bounded length, restricted character set.
///
/// Exposed so edit widgets can pre-validate with the same predicate the
/// store applies.
pub fn validate_name(name: &str) -> Result<()> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PathError::InvalidName {
            name: name.to_string(),
            reason: format!("longer than {MAX_NAME_LEN} characters"),
        });
    }
    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(PathError::InvalidName {
            name: name.to_string(),
            reason: format!("character {c:?} not allowed"),
        });
    }
    Ok(())
}

/// Validate a seconds-after-previous value: finite, positive, within a
/// sane upper bound.
pub fn validate_seconds(seconds: f64) -> Result<()> {
    if !seconds.is_finite() || !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
        return Err(PathError::InvalidSeconds { seconds });
    }
    Ok(())
}
