//! # PawBox
//!
//! Sizes a pet enclosure from a photo and produces a laser-cuttable flat
//! pattern of that box with interlocking tab/slot joints.
//!
//! ## Architecture
//!
//! PawBox is organized as a workspace with multiple crates:
//!
//! 1. **pawbox-core** - Errors and length units
//! 2. **pawbox-camtools** - Flat-pattern layout, joints, annotation, SVG/DXF output
//! 3. **pawbox-estimator** - Photo-based dimension estimation
//! 4. **pawbox-settings** - Configuration files
//! 5. **pawbox** - Output storage, the request service, and the CLI binary

pub mod service;
pub mod storage;

pub use pawbox_camtools::{
    generate, BoxDimensions, BoxStyle, CamToolError, Document, FlatPatternGenerator,
    LayoutSettings, OutputFormat, PanelKind,
};
pub use pawbox_core::{parse_length, MeasurementSystem};
pub use pawbox_estimator::{
    DimensionEstimate, DimensionEstimator, EstimateMethod, EstimateRequest, EstimatorError,
    ImageEstimator, VisionClient,
};
pub use pawbox_settings::Config;
pub use service::{BoxService, GeneratedPattern, PhotoPattern, ServiceError, ServiceResult};
pub use storage::OutputStore;

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for command results
/// - RUST_LOG environment variable support (default `info`)
/// - Pretty or JSON formatting
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
