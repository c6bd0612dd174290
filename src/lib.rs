//! Camera Path Core
//!
//! A keyframed camera-path authoring and playback engine: sparse, named
//! keyframes (camera pose, scene time, spacing, seam flag) in; a dense,
//! frame-indexed trajectory out, with a scrub/play/pause transport and
//! save/load/export of the keyframe store.

pub mod error;
pub mod event;
pub mod keyframe;
pub mod mapper;
pub mod persist;
pub mod pose;
pub mod session;
pub mod spline;
pub mod store;
pub mod trajectory;
pub mod transport;

// Re-export common types for convenience
pub use error::PathError;
pub use event::{PathEvent, SubscriptionId};
pub use keyframe::{Keyframe, KeyframeId};
pub use mapper::FrameMapper;
pub use pose::{CameraPose, PoseProvider, Vec3};
pub use session::CameraPathSession;
pub use store::KeyframeStore;
pub use trajectory::{PathSample, Trajectory};
pub use transport::{PlaybackState, Transport};

/// Camera path result type
pub type Result<T> = core::result::Result<T, PathError>;
