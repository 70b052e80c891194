//! Estimate request and result types

use crate::error::EstimatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Smallest box dimension an estimate may report (mm)
pub const MIN_DIMENSION: f64 = 50.0;
/// Largest box dimension an estimate may report (mm)
pub const MAX_DIMENSION: f64 = 2000.0;

pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 250.0;
pub const DEFAULT_DEPTH: f64 = 300.0;

/// Upper bound on any reported confidence
pub const MAX_CONFIDENCE: f64 = 0.98;

/// Clamp to the physically plausible range.
pub fn clamp_dimension(value: f64) -> f64 {
    value.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Which estimation strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    /// Vision client when configured, heuristic otherwise or on failure
    #[default]
    Auto,
    /// Vision client only; failures propagate
    Vision,
    /// Image edge heuristic only
    Heuristic,
}

impl fmt::Display for EstimateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateMethod::Auto => write!(f, "auto"),
            EstimateMethod::Vision => write!(f, "vision"),
            EstimateMethod::Heuristic => write!(f, "heuristic"),
        }
    }
}

impl FromStr for EstimateMethod {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(EstimateMethod::Auto),
            "vision" => Ok(EstimateMethod::Vision),
            "heuristic" | "edges" => Ok(EstimateMethod::Heuristic),
            _ => Err(EstimatorError::InvalidMethod(s.to_string())),
        }
    }
}

/// Per-aspect confidence reported by a vision model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    #[serde(default)]
    pub animal_recognition: Option<f64>,
    #[serde(default)]
    pub size_estimation: Option<f64>,
    #[serde(default)]
    pub posture_clarity: Option<f64>,
}

/// Estimated enclosure size for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionEstimate {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub confidence: f64,
    #[serde(default)]
    pub notes: String,
    /// Strategy that produced the numbers, e.g. `heuristic` or `vision_fallback`
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture: Option<String>,
}

impl DimensionEstimate {
    /// The default-sized estimate reported when nothing usable was found.
    pub fn fallback(confidence: f64, method: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            depth: DEFAULT_DEPTH,
            confidence,
            notes: notes.into(),
            method: method.into(),
            animal_type: None,
            posture: None,
        }
    }

    pub fn dimensions(&self) -> (f64, f64, f64) {
        (self.width, self.height, self.depth)
    }
}

/// Input to [`crate::DimensionEstimator::estimate`].
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    pub image: PathBuf,
    pub method: EstimateMethod,
    /// Real-world length (mm) of the subject's longest side, for scaling
    /// the pixel bounding box
    pub reference_size: Option<f64>,
}

impl EstimateRequest {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            method: EstimateMethod::Auto,
            reference_size: None,
        }
    }

    pub fn with_method(mut self, method: EstimateMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_reference_size(mut self, reference_size: Option<f64>) -> Self {
        self.reference_size = reference_size;
        self
    }
}
