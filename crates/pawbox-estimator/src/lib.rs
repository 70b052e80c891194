//! # PawBox Estimator
//!
//! Estimates enclosure dimensions from a pet photo. A pluggable
//! [`VisionClient`] answers with a JSON estimate that is parsed, clamped, and
//! confidence-blended here; an edge-detection heuristic covers photos the
//! model cannot handle or setups without a model.

pub mod error;
pub mod estimator;
pub mod heuristic;
pub mod parse;
pub mod types;
pub mod vision;

pub use error::{EstimatorError, EstimatorResult};
pub use estimator::{DimensionEstimator, ImageEstimator};
pub use heuristic::{HeuristicEstimator, ImageHints};
pub use parse::{combined_confidence, parse_model_response};
pub use types::{
    clamp_dimension, ConfidenceBreakdown, DimensionEstimate, EstimateMethod, EstimateRequest,
    MAX_DIMENSION, MIN_DIMENSION,
};
pub use vision::{VisionClient, VisionRequest};
