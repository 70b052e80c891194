//! Method dispatch across the vision client and the edge heuristic.

use crate::error::{EstimatorError, EstimatorResult};
use crate::heuristic::{image_hints, load_image, HeuristicEstimator};
use crate::parse::parse_model_response;
use crate::types::{DimensionEstimate, EstimateMethod, EstimateRequest};
use crate::vision::{build_prompt, mime_type_for, VisionClient, VisionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Anything that turns a photo into box dimensions.
#[async_trait]
pub trait DimensionEstimator: Send + Sync {
    async fn estimate(&self, request: &EstimateRequest) -> EstimatorResult<DimensionEstimate>;
}

/// Vision client when available, edge heuristic otherwise.
#[derive(Clone, Default)]
pub struct ImageEstimator {
    vision: Option<Arc<dyn VisionClient>>,
    heuristic: HeuristicEstimator,
}

impl std::fmt::Debug for ImageEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageEstimator")
            .field("vision", &self.vision.as_ref().map(|v| v.name().to_string()))
            .finish()
    }
}

impl ImageEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vision(mut self, client: Arc<dyn VisionClient>) -> Self {
        self.vision = Some(client);
        self
    }

    pub fn has_vision(&self) -> bool {
        self.vision.is_some()
    }

    async fn estimate_with_vision(
        &self,
        client: &dyn VisionClient,
        request: &EstimateRequest,
    ) -> EstimatorResult<DimensionEstimate> {
        let bytes = tokio::fs::read(&request.image).await?;

        // Hints are advisory; a photo the decoder rejects still goes to the model.
        let hints = match load_image(&request.image).await {
            Ok(image) => tokio::task::spawn_blocking(move || image_hints(&image))
                .await
                .map_err(|e| EstimatorError::Task(e.to_string()))?,
            Err(e) => {
                warn!("skipping pixel hints: {}", e);
                None
            }
        };

        let reply = client
            .complete(VisionRequest {
                prompt: build_prompt(hints.as_ref()),
                mime_type: mime_type_for(&request.image),
                image: bytes,
            })
            .await?;
        Ok(parse_model_response(&reply, client.name()))
    }
}

#[async_trait]
impl DimensionEstimator for ImageEstimator {
    async fn estimate(&self, request: &EstimateRequest) -> EstimatorResult<DimensionEstimate> {
        let use_vision = match request.method {
            EstimateMethod::Vision => true,
            EstimateMethod::Auto => self.vision.is_some(),
            EstimateMethod::Heuristic => false,
        };

        if use_vision {
            let client = self
                .vision
                .as_deref()
                .ok_or(EstimatorError::VisionUnavailable)?;
            match self.estimate_with_vision(client, request).await {
                Ok(estimate) => {
                    info!(method = %estimate.method, confidence = estimate.confidence, "vision estimate");
                    return Ok(estimate);
                }
                Err(e) if request.method == EstimateMethod::Auto && e.is_recoverable() => {
                    warn!("vision estimate failed, falling back to heuristic: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        let estimate = self
            .heuristic
            .estimate_path(&request.image, request.reference_size)
            .await?;
        info!(method = %estimate.method, confidence = estimate.confidence, "heuristic estimate");
        Ok(estimate)
    }
}
