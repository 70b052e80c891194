//! Edge-based subject detection
//!
//! Finds the subject as the bounding box of strong grayscale gradients and
//! scales that box into box dimensions. Also provides the pixel hints that
//! are passed to vision models alongside the photo.

use crate::error::{EstimatorError, EstimatorResult};
use crate::types::{clamp_dimension, round_to, DimensionEstimate};
use image::{imageops, DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Gradient magnitude above which a pixel counts as an edge
pub const EDGE_THRESHOLD: f32 = 120.0;
/// Confidence of a heuristic estimate
pub const HEURISTIC_CONFIDENCE: f64 = 0.45;
/// Confidence when no subject could be found
pub const NO_SUBJECT_CONFIDENCE: f64 = 0.2;

const BLUR_SIGMA: f32 = 1.2;
const WIDTH_FACTOR: f64 = 1.3;
const HEIGHT_FACTOR: f64 = 1.2;
const DEPTH_FACTOR: f64 = 0.9;

/// Pixel bounding box of the detected subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel measurements passed to a vision model as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHints {
    pub bbox_width: u32,
    pub bbox_height: u32,
    /// Long side over short side of the subject box
    pub long_short_ratio: f64,
    /// Subject box area over image area
    pub area_ratio: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl ImageHints {
    pub fn from_subject(subject: &SubjectBox, image_width: u32, image_height: u32) -> Self {
        let long = subject.width.max(subject.height) as f64;
        let short = subject.width.min(subject.height) as f64;
        let image_area = (image_width as f64 * image_height as f64).max(1.0);
        Self {
            bbox_width: subject.width,
            bbox_height: subject.height,
            long_short_ratio: if short > 0.0 { round_to(long / short, 3) } else { 1.0 },
            area_ratio: round_to(subject.width as f64 * subject.height as f64 / image_area, 3),
            image_width,
            image_height,
        }
    }

    pub fn image_size(&self) -> String {
        format!("{}x{}", self.image_width, self.image_height)
    }
}

/// Sobel gradient magnitude of a blurred grayscale image, thresholded into
/// a bounding box. Border pixels are ignored.
pub fn detect_subject(gray: &GrayImage) -> Option<SubjectBox> {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return None;
    }
    let blurred = imageops::blur(gray, BLUR_SIGMA);
    let px = |x: u32, y: u32| blurred.get_pixel(x, y).0[0] as f32;

    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut found = false;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = px(x + 1, y - 1) + 2.0 * px(x + 1, y) + px(x + 1, y + 1)
                - px(x - 1, y - 1)
                - 2.0 * px(x - 1, y)
                - px(x - 1, y + 1);
            let gy = px(x - 1, y + 1) + 2.0 * px(x, y + 1) + px(x + 1, y + 1)
                - px(x - 1, y - 1)
                - 2.0 * px(x, y - 1)
                - px(x + 1, y - 1);
            if (gx * gx + gy * gy).sqrt() > EDGE_THRESHOLD {
                found = true;
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
        }
    }

    found.then(|| SubjectBox {
        x: min.0,
        y: min.1,
        width: max.0 - min.0 + 1,
        height: max.1 - min.1 + 1,
    })
}

/// Estimator that scales the detected subject box.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate from a decoded image.
    ///
    /// With a `reference_size`, the longer side of the subject box is taken
    /// to be that many millimetres; otherwise one pixel is one millimetre.
    pub fn estimate_image(&self, image: &DynamicImage, reference_size: Option<f64>) -> DimensionEstimate {
        let gray = image.to_luma8();
        let Some(subject) = detect_subject(&gray) else {
            warn!("no subject edges found; using default dimensions");
            return DimensionEstimate::fallback(
                NO_SUBJECT_CONFIDENCE,
                "heuristic_fallback",
                "No subject detected; using default dimensions",
            );
        };

        let (bw, bh) = (subject.width as f64, subject.height as f64);
        let scale = match reference_size {
            Some(size) if size > 0.0 => size / bw.max(bh),
            _ => 1.0,
        };
        debug!(bw, bh, scale, "subject box");

        DimensionEstimate {
            width: round_to(clamp_dimension(bw * scale * WIDTH_FACTOR), 1),
            height: round_to(clamp_dimension(bh * scale * HEIGHT_FACTOR), 1),
            depth: round_to(clamp_dimension(bw * scale * DEPTH_FACTOR), 1),
            confidence: HEURISTIC_CONFIDENCE,
            notes: format!(
                "Edge heuristic (subject box {}×{}px)",
                subject.width, subject.height
            ),
            method: "heuristic".to_string(),
            animal_type: None,
            posture: None,
        }
    }

    /// Decode `path` off the async runtime and estimate from it.
    pub async fn estimate_path(&self, path: &Path, reference_size: Option<f64>) -> EstimatorResult<DimensionEstimate> {
        let image = load_image(path).await?;
        let estimator = *self;
        tokio::task::spawn_blocking(move || estimator.estimate_image(&image, reference_size))
            .await
            .map_err(|e| EstimatorError::Task(e.to_string()))
    }
}

/// Decode an image on the blocking pool.
pub async fn load_image(path: &Path) -> EstimatorResult<DynamicImage> {
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::open(&owned).map_err(|e| EstimatorError::image_load(&owned, e))
    })
    .await
    .map_err(|e| EstimatorError::Task(e.to_string()))?
}

/// Subject hints for a decoded image, `None` when nothing stands out.
pub fn image_hints(image: &DynamicImage) -> Option<ImageHints> {
    let gray = image.to_luma8();
    let subject = detect_subject(&gray)?;
    Some(ImageHints::from_subject(&subject, gray.width(), gray.height()))
}
