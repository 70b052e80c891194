//! Request handling: estimate, generate, store.
//!
//! A [`BoxService`] is built once from explicit parts and shared; it holds
//! no mutable state, so concurrent requests need no coordination.

use crate::storage::OutputStore;
use pawbox_camtools::{BoxDimensions, CamToolError, FlatPatternGenerator, OutputFormat};
use pawbox_estimator::{
    DimensionEstimate, DimensionEstimator, EstimateRequest, EstimatorError, ImageEstimator,
};
use pawbox_settings::{Config, EstimatorSettings};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors surfaced to callers of the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Generation(#[from] CamToolError),

    #[error(transparent)]
    Estimation(#[from] EstimatorError),

    #[error("Failed to store pattern: {0}")]
    Storage(#[from] pawbox_core::Error),

    /// The photo was refused before estimation.
    #[error("Rejected image {path}: {reason}")]
    RejectedImage { path: PathBuf, reason: String },
}

impl ServiceError {
    /// Stable error kind for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Generation(e) => e.kind(),
            Self::Estimation(_) => "EstimationFailed",
            Self::Storage(_) => "StorageFailed",
            Self::RejectedImage { .. } => "RejectedImage",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A written pattern file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPattern {
    pub path: PathBuf,
    pub file_name: String,
    pub format: OutputFormat,
    pub dimensions: BoxDimensions,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

/// Estimation plus generation for one photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoPattern {
    pub estimate: DimensionEstimate,
    pub pattern: GeneratedPattern,
}

pub struct BoxService {
    generator: FlatPatternGenerator,
    estimator: Arc<dyn DimensionEstimator>,
    store: OutputStore,
    format: OutputFormat,
    estimate_timeout: Duration,
    photo_limits: EstimatorSettings,
}

impl BoxService {
    pub fn new(
        generator: FlatPatternGenerator,
        estimator: Arc<dyn DimensionEstimator>,
        store: OutputStore,
        format: OutputFormat,
    ) -> Self {
        let photo_limits = EstimatorSettings::default();
        Self {
            generator,
            estimator,
            store,
            format,
            estimate_timeout: Duration::from_millis(photo_limits.timeout_ms),
            photo_limits,
        }
    }

    /// Service wired from configuration with the default image estimator.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_estimator(config, Arc::new(ImageEstimator::new()))
    }

    pub fn from_config_with_estimator(config: &Config, estimator: Arc<dyn DimensionEstimator>) -> Self {
        Self {
            generator: FlatPatternGenerator::new(config.layout, config.generator.style),
            estimator,
            store: OutputStore::new(&config.output.directory, config.output.unique_names),
            format: config.generator.format,
            estimate_timeout: Duration::from_millis(config.estimator.timeout_ms),
            photo_limits: config.estimator.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.estimate_timeout = timeout;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn generator(&self) -> &FlatPatternGenerator {
        &self.generator
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Generate, serialize, and write the pattern for `dims`.
    pub async fn generate(&self, dims: &BoxDimensions) -> ServiceResult<GeneratedPattern> {
        let document = self.generator.generate(dims)?;
        let bytes = document.render(self.format)?;
        let file_name = self.store.file_name(dims, self.format);
        let path = self.store.write(&file_name, &bytes).await?;

        Ok(GeneratedPattern {
            path,
            file_name,
            format: self.format,
            dimensions: *dims,
            canvas_width: document.canvas_width,
            canvas_height: document.canvas_height,
        })
    }

    /// Estimate dimensions for a photo, bounded by the configured timeout.
    pub async fn estimate(&self, request: &EstimateRequest) -> ServiceResult<DimensionEstimate> {
        self.check_photo(request).await?;

        let timeout_ms = self.estimate_timeout.as_millis() as u64;
        let estimate = tokio::time::timeout(self.estimate_timeout, self.estimator.estimate(request))
            .await
            .map_err(|_| EstimatorError::Timeout(timeout_ms))??;

        info!(
            width = estimate.width,
            height = estimate.height,
            depth = estimate.depth,
            confidence = estimate.confidence,
            method = %estimate.method,
            "estimated dimensions"
        );
        Ok(estimate)
    }

    /// Estimate from a photo, then generate a box of that size.
    pub async fn from_image(&self, request: &EstimateRequest, thickness: f64) -> ServiceResult<PhotoPattern> {
        let estimate = self.estimate(request).await?;
        let dims = BoxDimensions::new(estimate.width, estimate.height, estimate.depth, thickness);
        let pattern = self.generate(&dims).await?;
        Ok(PhotoPattern { estimate, pattern })
    }

    async fn check_photo(&self, request: &EstimateRequest) -> ServiceResult<()> {
        let rejected = |reason: String| ServiceError::RejectedImage {
            path: request.image.clone(),
            reason,
        };

        if !self.photo_limits.accepts_extension(&request.image) {
            return Err(rejected(format!(
                "unsupported file type (expected one of {})",
                self.photo_limits.allowed_extensions.join(", ")
            )));
        }

        let metadata = tokio::fs::metadata(&request.image)
            .await
            .map_err(EstimatorError::from)?;
        if metadata.len() > self.photo_limits.max_image_bytes {
            return Err(rejected(format!(
                "{} bytes exceeds the {} byte limit",
                metadata.len(),
                self.photo_limits.max_image_bytes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{GrayImage, Luma};
    use pawbox_camtools::{BoxStyle, LayoutSettings};
    use pawbox_estimator::{EstimateMethod, EstimatorResult};
    use tempfile::TempDir;

    /// Returns a fixed estimate, optionally after a delay.
    struct FixedEstimator {
        estimate: DimensionEstimate,
        delay: Duration,
    }

    #[async_trait]
    impl DimensionEstimator for FixedEstimator {
        async fn estimate(&self, _request: &EstimateRequest) -> EstimatorResult<DimensionEstimate> {
            tokio::time::sleep(self.delay).await;
            Ok(self.estimate.clone())
        }
    }

    fn fixed(width: f64, height: f64, depth: f64, delay: Duration) -> Arc<FixedEstimator> {
        Arc::new(FixedEstimator {
            estimate: DimensionEstimate {
                width,
                height,
                depth,
                confidence: 0.9,
                notes: String::new(),
                method: "fixed".to_string(),
                animal_type: None,
                posture: None,
            },
            delay,
        })
    }

    fn write_photo(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        GrayImage::from_fn(120, 90, |x, y| {
            if (30..90).contains(&x) && (20..70).contains(&y) {
                Luma([25u8])
            } else {
                Luma([230u8])
            }
        })
        .save(&path)
        .unwrap();
        path
    }

    fn service(dir: &TempDir, estimator: Arc<dyn DimensionEstimator>, unique: bool) -> BoxService {
        BoxService::new(
            FlatPatternGenerator::default(),
            estimator,
            OutputStore::new(dir.path().join("outputs"), unique),
            OutputFormat::Svg,
        )
    }

    #[tokio::test]
    async fn test_generate_writes_deterministic_file() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(ImageEstimator::new()), false);

        let dims = BoxDimensions::new(200.0, 150.0, 180.0, 3.0);
        let pattern = service.generate(&dims).await.unwrap();

        assert_eq!(pattern.file_name, "box_200x150x180.svg");
        assert_eq!(pattern.path, dir.path().join("outputs").join("box_200x150x180.svg"));
        assert_eq!(pattern.canvas_width, 824.0);

        let svg = std::fs::read_to_string(&pattern.path).unwrap();
        assert!(svg.contains(r#"<g id="cut">"#));

        // Same box, same bytes, same file.
        let again = service.generate(&dims).await.unwrap();
        assert_eq!(again.path, pattern.path);
        assert_eq!(std::fs::read_to_string(&again.path).unwrap(), svg);
    }

    #[tokio::test]
    async fn test_unique_names_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(ImageEstimator::new()), true);

        let dims = BoxDimensions::new(120.0, 90.0, 100.0, 3.0);
        let a = service.generate(&dims).await.unwrap();
        let b = service.generate(&dims).await.unwrap();
        assert_ne!(a.path, b.path);
        assert!(a.path.exists() && b.path.exists());
    }

    #[tokio::test]
    async fn test_invalid_dimensions_write_nothing() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(ImageEstimator::new()), false);

        let err = service
            .generate(&BoxDimensions::new(0.0, 150.0, 180.0, 3.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidDimension");
        assert!(!dir.path().join("outputs").exists());
    }

    #[tokio::test]
    async fn test_dxf_output() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(ImageEstimator::new()), false).with_format(OutputFormat::Dxf);

        let pattern = service
            .generate(&BoxDimensions::new(200.0, 150.0, 180.0, 3.0))
            .await
            .unwrap();
        assert_eq!(pattern.file_name, "box_200x150x180.dxf");
        let text = std::fs::read_to_string(&pattern.path).unwrap();
        assert!(text.contains("LWPOLYLINE"));
    }

    #[tokio::test]
    async fn test_from_image_uses_estimate() {
        let dir = TempDir::new().unwrap();
        let photo = write_photo(&dir, "cat.png");
        let service = service(&dir, fixed(420.0, 310.0, 360.0, Duration::ZERO), false);

        let result = service
            .from_image(&EstimateRequest::new(&photo), 3.0)
            .await
            .unwrap();
        assert_eq!(result.estimate.method, "fixed");
        assert_eq!(result.pattern.file_name, "box_420x310x360.svg");
        assert!(result.pattern.path.exists());
    }

    #[tokio::test]
    async fn test_estimate_times_out() {
        let dir = TempDir::new().unwrap();
        let photo = write_photo(&dir, "dog.png");
        let service = service(&dir, fixed(400.0, 300.0, 300.0, Duration::from_secs(5)), false)
            .with_timeout(Duration::from_millis(20));

        let err = service
            .estimate(&EstimateRequest::new(&photo))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Estimation(EstimatorError::Timeout(20))));
    }

    #[tokio::test]
    async fn test_unsupported_photo_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not a photo").unwrap();
        let service = service(&dir, fixed(400.0, 300.0, 300.0, Duration::ZERO), false);

        let err = service
            .estimate(&EstimateRequest::new(&path))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RejectedImage");
    }

    #[tokio::test]
    async fn test_config_wiring() {
        let dir = TempDir::new().unwrap();
        let photo = write_photo(&dir, "rabbit.png");

        let mut config = Config::default();
        config.layout = LayoutSettings {
            margin: 15.0,
            spacing: 6.0,
        };
        config.generator.style = BoxStyle::OpenTop;
        config.estimator.method = EstimateMethod::Heuristic;
        config.output.directory = dir.path().join("from-config");

        let service = BoxService::from_config(&config);
        let request = EstimateRequest::new(&photo)
            .with_method(config.estimator.method)
            .with_reference_size(Some(400.0));
        let result = service.from_image(&request, 3.0).await.unwrap();

        assert_eq!(result.estimate.method, "heuristic");
        assert!(result.pattern.path.starts_with(dir.path().join("from-config")));
        let svg = std::fs::read_to_string(&result.pattern.path).unwrap();
        assert!(!svg.contains(">Top<"));
    }
}
