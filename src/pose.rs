//! Camera pose types and the pose provider contract

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Double-precision 3D vector used throughout the engine
pub type Vec3 = Vector3<f64>;

/// A full camera pose: position, view direction and up vector.
///
/// Direction and up are carried as independent vectors; the engine never
/// renormalizes or re-orthogonalizes them (the rendering consumer does any
/// final orthonormalization it needs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    #[inline]
    pub fn new(position: Vec3, direction: Vec3, up: Vec3) -> Self {
        Self {
            position,
            direction,
            up,
        }
    }

    /// Component-wise linear interpolation towards `other`.
    ///
    /// `t` is not clamped: t = 1.5 extrapolates past `other`, which is how
    /// a synthetic keyframe beyond the end of the path is produced.
    #[inline]
    pub fn lerp(&self, other: &CameraPose, t: f64) -> CameraPose {
        CameraPose {
            position: self.position.lerp(&other.position, t),
            direction: self.direction.lerp(&other.direction, t),
            up: self.up.lerp(&other.up, t),
        }
    }
}

/// Contract for the collaborator that supplies the live camera state.
///
/// Implemented by the hosting application; consumed by
/// [`CameraPathSession::add_keyframe`](crate::CameraPathSession::add_keyframe)
/// when capturing the current view as a keyframe.
pub trait PoseProvider {
    /// Current camera position
    fn position(&self) -> Vec3;
    /// Current view direction
    fn direction(&self) -> Vec3;
    /// Current up vector
    fn up(&self) -> Vec3;
    /// Current scene time, epoch milliseconds
    fn scene_time_ms(&self) -> i64;

    /// Snapshot the full pose in one call
    #[inline]
    fn pose(&self) -> CameraPose {
        CameraPose::new(self.position(), self.direction(), self.up())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pose_lerp_midpoint() {
        let a = CameraPose::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let b = CameraPose::new(
            Vec3::new(2.0, 4.0, 6.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position.x, 1.0);
        assert_relative_eq!(mid.position.y, 2.0);
        assert_relative_eq!(mid.position.z, 3.0);
        assert_relative_eq!(mid.direction.x, 0.5);
        assert_relative_eq!(mid.up.y, 0.5);
    }

    #[test]
    fn test_pose_lerp_extrapolates() {
        let a = CameraPose::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        let b = CameraPose::new(Vec3::new(2.0, 0.0, 0.0), Vec3::x(), Vec3::y());
        let past = a.lerp(&b, 1.5);
        assert_relative_eq!(past.position.x, 3.0);
    }
}
