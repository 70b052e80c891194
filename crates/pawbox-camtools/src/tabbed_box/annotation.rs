//! Dimension lines, panel labels, and the legend.

use super::document::{
    Element, Layer, Panel, PathData, Stroke, TextAnchor, TextElement, CUT_COLOR, CUT_STROKE_WIDTH,
    DIMENSION_COLOR,
};
use super::types::{Point, Vector};
use crate::error::{CamToolError, CamToolResult};
use pawbox_core::units::{format_length, MeasurementSystem};
use tracing::debug;

/// Distance of the width dimension line above the Front panel (mm)
pub const WIDTH_DIMENSION_OFFSET: f64 = 10.0;
/// Distance of the height dimension line left of the Front panel (mm)
pub const HEIGHT_DIMENSION_OFFSET: f64 = 12.0;
/// Distance of the depth dimension line left of the Top panel (mm)
pub const DEPTH_DIMENSION_OFFSET: f64 = 12.0;

pub const ARROW_SIZE: f64 = 3.0;
pub const DIMENSION_FONT_SIZE: f64 = 5.0;
/// Spans whose vertical delta is below this are drawn as horizontal
pub const HORIZONTAL_EPSILON: f64 = 0.5;
/// Spans shorter than this produce no annotation
pub const MIN_SPAN_LENGTH: f64 = 0.1;

const LABEL_GAP: f64 = 2.0;
const LEGEND_FONT_SIZE: f64 = 4.5;
const LEGEND_COLOR: &str = "#666";
const LEGEND_BASELINE_INSET: f64 = 7.0;
const LABEL_COLOR: &str = "#555";
const SIZE_COLOR: &str = "#999";

/// `W=200.0mm` style label.
pub fn dimension_label(prefix: char, value_mm: f64) -> String {
    format!("{}={}mm", prefix, format_length(value_mm, MeasurementSystem::Metric))
}

/// A measured span drawn offset from the edge it measures.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLine {
    pub start: Point,
    pub end: Point,
    pub label: String,
    /// Horizontal spans move up by this much, vertical spans move left
    pub offset: f64,
}

impl DimensionLine {
    pub fn new(start: Point, end: Point, label: impl Into<String>, offset: f64) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            offset,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        (self.end.y - self.start.y).abs() < HORIZONTAL_EPSILON
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Dashed line, two arrowheads, and the label.
    pub fn render(&self) -> CamToolResult<Vec<Element>> {
        let length = self.length();
        if length < MIN_SPAN_LENGTH {
            return Err(CamToolError::DegenerateSpan {
                label: self.label.clone(),
            });
        }
        let unit: Vector = (self.end - self.start) / length;
        let mid = Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        );

        let (shift, label) = if self.is_horizontal() {
            let shift = Vector::new(0.0, -self.offset);
            let position = mid + Vector::new(0.0, -self.offset - LABEL_GAP);
            let text = TextElement::new(position, self.label.clone(), DIMENSION_FONT_SIZE, DIMENSION_COLOR)
                .anchored(TextAnchor::Middle);
            (shift, text)
        } else {
            let shift = Vector::new(-self.offset, 0.0);
            let position = mid + Vector::new(-self.offset - LABEL_GAP, 0.0);
            let text = TextElement::new(position, self.label.clone(), DIMENSION_FONT_SIZE, DIMENSION_COLOR)
                .anchored(TextAnchor::Middle)
                .rotated(-90.0);
            (shift, text)
        };

        let a = self.start + shift;
        let b = self.end + shift;

        Ok(vec![
            Element::Line {
                from: a,
                to: b,
                stroke: Stroke::dimension(),
            },
            Element::Path {
                data: arrowhead(a, -unit),
                stroke: None,
                fill: Some(DIMENSION_COLOR),
            },
            Element::Path {
                data: arrowhead(b, unit),
                stroke: None,
                fill: Some(DIMENSION_COLOR),
            },
            Element::Text(label),
        ])
    }
}

/// Append `line` to `layer`, omitting it when the span is degenerate.
pub fn push_dimension(layer: &mut Layer, line: &DimensionLine) {
    match line.render() {
        Ok(elements) => layer.elements.extend(elements),
        Err(err) => debug!(label = %line.label, "omitting annotation: {}", err),
    }
}

/// Triangle with its tip at `tip`, pointing along the unit vector `pointing`.
pub fn arrowhead(tip: Point, pointing: Vector) -> PathData {
    let normal = Vector::new(-pointing.y, pointing.x) * ARROW_SIZE;
    let base = tip - pointing * (2.0 * ARROW_SIZE);
    PathData::polygon(&[tip, base + normal, base - normal])
}

/// Centred name and size text for one panel.
pub fn panel_labels(panel: &Panel) -> [Element; 2] {
    let center = Point::new(
        panel.origin.x + panel.width / 2.0,
        panel.origin.y + panel.height / 2.0,
    );
    let font_size = (panel.width.min(panel.height) / 8.0).clamp(4.0, 8.0);

    let name = TextElement::new(center, panel.label(), font_size, LABEL_COLOR).centered();
    let size = TextElement::new(
        center + Vector::new(0.0, font_size * 1.6),
        format!(
            "{}×{}mm",
            format_length(panel.width, MeasurementSystem::Metric),
            format_length(panel.height, MeasurementSystem::Metric)
        ),
        font_size * 0.85,
        SIZE_COLOR,
    )
    .centered();

    [Element::Text(name), Element::Text(size)]
}

/// Legend along the bottom margin: cut-line and dimension-line samples plus
/// the material note.
pub fn legend(canvas_width: f64, canvas_height: f64, margin: f64, thickness: f64) -> Layer {
    let mut layer = Layer::new("legend");
    let x = margin;
    let y = canvas_height - LEGEND_BASELINE_INSET;
    let sample_y = y - 1.0;

    layer.push(Element::Line {
        from: Point::new(x, sample_y),
        to: Point::new(x + 10.0, sample_y),
        stroke: Stroke {
            color: CUT_COLOR,
            width: CUT_STROKE_WIDTH + 0.3,
            dash: None,
        },
    });
    layer.push(Element::Text(TextElement::new(
        Point::new(x + 12.0, y),
        "Cut line (red)",
        LEGEND_FONT_SIZE,
        LEGEND_COLOR,
    )));

    layer.push(Element::Line {
        from: Point::new(x + 60.0, sample_y),
        to: Point::new(x + 70.0, sample_y),
        stroke: Stroke::dimension(),
    });
    layer.push(Element::Text(TextElement::new(
        Point::new(x + 72.0, y),
        "Dimension line (blue)",
        LEGEND_FONT_SIZE,
        LEGEND_COLOR,
    )));

    layer.push(Element::Text(
        TextElement::new(
            Point::new(canvas_width - margin, y),
            format!(
                "Material thickness {}mm · Generated by PawBox",
                format_length(thickness, MeasurementSystem::Metric)
            ),
            LEGEND_FONT_SIZE,
            LEGEND_COLOR,
        )
        .anchored(TextAnchor::End),
    ));

    layer
}
