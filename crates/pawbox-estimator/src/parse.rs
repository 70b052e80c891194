//! Vision model response parsing and confidence blending.

use crate::error::{EstimatorError, EstimatorResult};
use crate::types::{
    clamp_dimension, round_to, ConfidenceBreakdown, DimensionEstimate, DEFAULT_DEPTH,
    DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_CONFIDENCE,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::warn;

/// Confidence reported when the response could not be parsed
pub const PARSE_FAILURE_CONFIDENCE: f64 = 0.3;
const DEFAULT_RAW_CONFIDENCE: f64 = 0.5;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("invalid fenced block regex")
});

/// Turn a raw model reply into an estimate.
///
/// Never fails: an unparseable reply yields the default-sized estimate with
/// method `{method}_fallback`.
pub fn parse_model_response(raw: &str, method: &str) -> DimensionEstimate {
    match try_parse_model_response(raw, method) {
        Ok(estimate) => estimate,
        Err(e) => {
            let preview: String = raw.chars().take(300).collect();
            warn!(method, "model response rejected: {} ({:?})", e, preview);
            DimensionEstimate::fallback(
                PARSE_FAILURE_CONFIDENCE,
                format!("{}_fallback", method),
                format!("Could not parse the model response; using defaults ({})", method),
            )
        }
    }
}

/// Strict variant of [`parse_model_response`].
pub fn try_parse_model_response(raw: &str, method: &str) -> EstimatorResult<DimensionEstimate> {
    let json = FENCED_BLOCK
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let value: Value =
        serde_json::from_str(json.trim()).map_err(|e| EstimatorError::Parse(e.to_string()))?;
    let data = value
        .as_object()
        .ok_or_else(|| EstimatorError::Parse("expected a JSON object".to_string()))?;

    let width = clamp_dimension(number_field(data, "width", DEFAULT_WIDTH)?);
    let height = clamp_dimension(number_field(data, "height", DEFAULT_HEIGHT)?);
    let depth = clamp_dimension(number_field(data, "depth", DEFAULT_DEPTH)?);

    let raw_confidence = number_field(data, "confidence", DEFAULT_RAW_CONFIDENCE)?;
    let breakdown = match data.get("confidence_breakdown") {
        Some(Value::Object(map)) if !map.is_empty() => Some(ConfidenceBreakdown {
            animal_recognition: optional_number(map, "animal_recognition")?,
            size_estimation: optional_number(map, "size_estimation")?,
            posture_clarity: optional_number(map, "posture_clarity")?,
        }),
        _ => None,
    };

    Ok(DimensionEstimate {
        width: round_to(width, 1),
        height: round_to(height, 1),
        depth: round_to(depth, 1),
        confidence: combined_confidence(raw_confidence, breakdown.as_ref()),
        notes: string_field(data, "notes").unwrap_or_default(),
        method: method.to_string(),
        animal_type: string_field(data, "animal_type"),
        posture: string_field(data, "posture"),
    })
}

/// Blend the model's overall confidence with its per-aspect breakdown.
///
/// `(raw + 0.4·recognition + 0.4·size + 0.2·posture) / 2`, where missing
/// aspects take the raw value. Rounded to three decimals, capped at 0.98.
pub fn combined_confidence(raw: f64, breakdown: Option<&ConfidenceBreakdown>) -> f64 {
    let blended = match breakdown {
        Some(b) => {
            let weighted = b.animal_recognition.unwrap_or(raw) * 0.4
                + b.size_estimation.unwrap_or(raw) * 0.4
                + b.posture_clarity.unwrap_or(raw) * 0.2;
            round_to((raw + weighted) / 2.0, 3)
        }
        None => raw,
    };
    round_to(blended.min(MAX_CONFIDENCE), 3)
}

fn number_field(data: &Map<String, Value>, key: &str, default: f64) -> EstimatorResult<f64> {
    Ok(optional_number(data, key)?.unwrap_or(default))
}

fn optional_number(data: &Map<String, Value>, key: &str) -> EstimatorResult<Option<f64>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| EstimatorError::Parse(format!("'{}' is not a number: {:?}", key, s))),
        Some(other) => Err(EstimatorError::Parse(format!(
            "'{}' is not a number: {}",
            key, other
        ))),
    }
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
