//! Error types for the CAM tools crate.
//!
//! Dimension validation happens once, at the entry point of generation. Past
//! that point the geometry is plain arithmetic over validated positive reals;
//! the only other failure is a degenerate annotation span, which the document
//! assembler recovers from by omitting that annotation.

use thiserror::Error;

/// Errors that can occur while generating a flat pattern.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamToolError {
    /// A box dimension or the material thickness was rejected.
    #[error("Invalid dimension '{name}' = {value}: {reason}")]
    InvalidDimension {
        name: &'static str,
        value: f64,
        reason: String,
    },

    /// A dimension annotation spans zero length.
    #[error("Degenerate dimension span '{label}'")]
    DegenerateSpan { label: String },

    /// Layout settings were rejected.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Serializing a document to an external format failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl CamToolError {
    /// Stable name of the error kind, for callers that report `kind + message`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDimension { .. } => "InvalidDimension",
            Self::DegenerateSpan { .. } => "DegenerateSpan",
            Self::InvalidParameters(_) => "InvalidParameters",
            Self::ExportFailed(_) => "ExportFailed",
        }
    }

    pub(crate) fn invalid_dimension(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            name,
            value,
            reason: reason.into(),
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
