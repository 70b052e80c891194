//! Vision model seam
//!
//! Model clients live outside this crate; they receive the prompt and the
//! raw photo and return the model's text reply, which is parsed here.

use crate::error::EstimatorResult;
use crate::heuristic::ImageHints;
use async_trait::async_trait;
use std::path::Path;

/// Prompt plus photo sent to a vision model.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: String,
    pub mime_type: &'static str,
    pub image: Vec<u8>,
}

/// A multimodal model that answers with a JSON estimate.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Short identifier, recorded as the estimate method.
    fn name(&self) -> &str;

    /// Send the request and return the raw text reply.
    async fn complete(&self, request: VisionRequest) -> EstimatorResult<String>;
}

/// MIME type from the file extension, JPEG when unknown.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Instructions for the model, with pixel hints when available.
pub fn build_prompt(hints: Option<&ImageHints>) -> String {
    let mut prompt = String::from(
        "You are measuring a pet for a cardboard or MDF enclosure. Identify the \
         animal in the photo and estimate outer box dimensions in millimetres \
         that let it rest comfortably.\n",
    );

    if let Some(h) = hints {
        prompt.push_str(&format!(
            "\nPixel measurements of the subject (use them):\n\
             - bounding box: {}px wide x {}px tall\n\
             - long/short side ratio: {}\n\
             - share of the image area: {}\n\
             - image size: {}\n",
            h.bbox_width,
            h.bbox_height,
            h.long_short_ratio,
            h.area_ratio,
            h.image_size()
        ));
    }

    prompt.push_str(
        "\nReason in order:\n\
         1. Identify species and breed.\n\
         2. Recall typical body measurements for it.\n\
         3. Correct for posture and the pixel proportions above.\n\
         4. Compute the box: width = body length x 1.3, height = sitting head height x 1.2, \
         depth = body width x 1.4.\n\
         5. Rate each confidence aspect independently.\n\
         \nReply with a single JSON code block:\n\
         ```json\n\
         {\"animal_type\": \"...\", \"posture\": \"sitting|lying|standing\", \
         \"width\": 0, \"height\": 0, \"depth\": 0, \"confidence\": 0.0, \
         \"confidence_breakdown\": {\"animal_recognition\": 0.0, \"size_estimation\": 0.0, \
         \"posture_clarity\": 0.0}, \"notes\": \"one-line rationale\"}\n\
         ```",
    );
    prompt
}
