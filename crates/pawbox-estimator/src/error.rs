//! Error types for dimension estimation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while estimating box dimensions from an image.
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// The image could not be read or decoded.
    #[error("Failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// Vision estimation was requested but no client is configured.
    #[error("No vision client configured")]
    VisionUnavailable,

    /// The vision client failed.
    #[error("Vision request failed: {0}")]
    Vision(String),

    /// A model response could not be interpreted.
    #[error("Unparseable model response: {0}")]
    Parse(String),

    /// The estimate did not finish in time.
    #[error("Estimation timed out after {0} ms")]
    Timeout(u64),

    /// A blocking image task panicked or was cancelled.
    #[error("Image task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),
}

impl EstimatorError {
    pub fn image_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures the `auto` method recovers from by falling back to
    /// the image heuristic.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::VisionUnavailable | Self::Vision(_) | Self::Parse(_) | Self::Timeout(_)
        )
    }
}

/// Result type alias for estimator operations.
pub type EstimatorResult<T> = Result<T, EstimatorError>;
