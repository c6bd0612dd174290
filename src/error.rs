//! Error types for the camera path engine

use serde::{Deserialize, Serialize};

/// Comprehensive error type for camera path operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PathError {
    /// Keyframe not found in the store
    #[error("Keyframe not found: {id}")]
    KeyframeNotFound { id: String },

    /// Keyframe index out of bounds
    #[error("Keyframe index {index} out of bounds (store has {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid keyframe name
    #[error("Invalid keyframe name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Invalid seconds-after-previous value
    #[error("Invalid seconds value: {seconds}")]
    InvalidSeconds { seconds: f64 },

    /// Operation requires more keyframes than the store holds
    #[error("Operation requires at least {required} keyframes, store has {actual}")]
    NotEnoughKeyframes { required: usize, actual: usize },

    /// Malformed keyframe or camera path file
    #[error("Format error: {reason}")]
    Format { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl PathError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::KeyframeNotFound { .. } | Self::IndexOutOfBounds { .. } => "store",
            Self::InvalidName { .. }
            | Self::InvalidSeconds { .. }
            | Self::NotEnoughKeyframes { .. } => "validation",
            Self::Format { .. } | Self::Serialization { .. } => "format",
            Self::Io { .. } => "io",
        }
    }

    /// Validation errors are advisory: the offending operation was a no-op
    /// and the session state is unchanged.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::InvalidSeconds { .. } | Self::NotEnoughKeyframes { .. }
        )
    }
}

impl From<std::io::Error> for PathError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PathError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let store_error = PathError::KeyframeNotFound {
            id: "test".to_string(),
        };
        assert_eq!(store_error.category(), "store");

        let validation_error = PathError::InvalidSeconds { seconds: -1.0 };
        assert_eq!(validation_error.category(), "validation");
        assert!(validation_error.is_validation());

        let io_error = PathError::Io {
            reason: "boom".to_string(),
        };
        assert!(!io_error.is_validation());
    }

    #[test]
    fn test_serialization() {
        let error = PathError::InvalidSeconds { seconds: 0.0 };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: PathError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
