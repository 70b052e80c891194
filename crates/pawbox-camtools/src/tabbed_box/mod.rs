//! Tabbed Box Flat Pattern
//!
//! Lays out the panels of a box in a cross (unfolded) arrangement and cuts
//! interlocking tab/slot joints into every mating edge. Generation is a pure
//! function of the box dimensions, layout settings, and box style.

pub mod annotation;
pub mod document;
pub mod dxf_export;
pub mod edges;
pub mod layout;
pub mod svg;
pub mod types;

use crate::error::{CamToolError, CamToolResult};
use annotation::{
    dimension_label, legend, panel_labels, push_dimension, DimensionLine, DEPTH_DIMENSION_OFFSET,
    HEIGHT_DIMENSION_OFFSET, WIDTH_DIMENSION_OFFSET,
};
use document::{Document, Element, Layer, Panel, PathData, Stroke};
use edges::{panel_outline, EdgeSegmentation, MAX_EDGE_LENGTH};
use layout::{Layout, LayoutSettings};
use tracing::info;
use types::{BoxDimensions, BoxStyle, EdgeKind, EdgeRef, PanelKind, Point, Side};

pub use document::OutputFormat;

/// Generate the closed six-panel box with default layout settings.
pub fn generate(width: f64, height: f64, depth: f64, thickness: f64) -> CamToolResult<Document> {
    FlatPatternGenerator::default().generate(&BoxDimensions::new(width, height, depth, thickness))
}

/// Stateless generator; construct once and share freely.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatPatternGenerator {
    settings: LayoutSettings,
    style: BoxStyle,
}

impl FlatPatternGenerator {
    pub fn new(settings: LayoutSettings, style: BoxStyle) -> Self {
        Self { settings, style }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn style(&self) -> BoxStyle {
        self.style
    }

    /// Reject inputs the geometry cannot honour.
    pub fn validate(&self, dims: &BoxDimensions) -> CamToolResult<()> {
        self.settings.validate()?;

        let named = [
            ("width", dims.width),
            ("height", dims.height),
            ("depth", dims.depth),
            ("thickness", dims.thickness),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(CamToolError::invalid_dimension(name, value, "must be a finite length"));
            }
            if value <= 0.0 {
                return Err(CamToolError::invalid_dimension(name, value, "must be greater than zero"));
            }
            if value > MAX_EDGE_LENGTH {
                return Err(CamToolError::invalid_dimension(
                    name,
                    value,
                    format!("must be at most {} mm", MAX_EDGE_LENGTH),
                ));
            }
        }

        let t = dims.thickness;
        if t >= self.settings.spacing {
            return Err(CamToolError::invalid_dimension(
                "thickness",
                t,
                format!("must be less than the panel spacing ({} mm)", self.settings.spacing),
            ));
        }
        if t >= self.settings.margin {
            return Err(CamToolError::invalid_dimension(
                "thickness",
                t,
                format!("must be less than the canvas margin ({} mm)", self.settings.margin),
            ));
        }

        let shortest = [dims.width, dims.height, dims.depth]
            .into_iter()
            .map(|l| EdgeSegmentation::for_length(l).segment_length)
            .fold(f64::INFINITY, f64::min);
        if t >= shortest {
            return Err(CamToolError::invalid_dimension(
                "thickness",
                t,
                format!("must be less than the shortest joint segment ({:.2} mm)", shortest),
            ));
        }

        Ok(())
    }

    /// Panel placement without the path work.
    pub fn layout(&self, dims: &BoxDimensions) -> CamToolResult<Layout> {
        self.validate(dims)?;
        Ok(Layout::compute(dims, &self.settings, self.style))
    }

    pub fn generate(&self, dims: &BoxDimensions) -> CamToolResult<Document> {
        let layout = self.layout(dims)?;

        let panels: Vec<Panel> = layout
            .placements
            .iter()
            .map(|placement| {
                let edges = Side::CLOCKWISE
                    .map(|side| self.style.edge_kind(EdgeRef::new(placement.kind, side)));
                let outline = panel_outline(
                    placement.origin,
                    placement.width,
                    placement.height,
                    &edges,
                    dims.thickness,
                );
                Panel {
                    kind: placement.kind,
                    origin: placement.origin,
                    width: placement.width,
                    height: placement.height,
                    edges,
                    outline: PathData::polygon(&outline),
                }
            })
            .collect();

        let mut cut = Layer::new("cut");
        for panel in &panels {
            cut.push(Element::Path {
                data: panel.outline.clone(),
                stroke: Some(Stroke::cut()),
                fill: None,
            });
            cut.elements.extend(panel_labels(panel));
        }

        let dimension_lines = self.dimension_layer(&panels, dims);
        let legend = legend(
            layout.canvas_width,
            layout.canvas_height,
            self.settings.margin,
            dims.thickness,
        );

        let title = format!(
            "Pet Box {:.0}x{:.0}x{:.0}mm · t={:.1}mm",
            dims.width, dims.height, dims.depth, dims.thickness
        );
        let heading = format!(
            "Pet box flat pattern · W{:.0} × H{:.0} × D{:.0} mm · material thickness {:.1}mm",
            dims.width, dims.height, dims.depth, dims.thickness
        );

        info!(
            style = %self.style,
            width = dims.width,
            height = dims.height,
            depth = dims.depth,
            thickness = dims.thickness,
            canvas_width = layout.canvas_width,
            canvas_height = layout.canvas_height,
            "generated flat pattern"
        );

        Ok(Document {
            title,
            heading,
            dimensions: *dims,
            canvas_width: layout.canvas_width,
            canvas_height: layout.canvas_height,
            panels,
            cut,
            dimension_lines,
            legend,
        })
    }

    /// W and H measured on the Front panel, D on the Top panel (or on the
    /// Bottom panel when the style has no lid).
    fn dimension_layer(&self, panels: &[Panel], dims: &BoxDimensions) -> Layer {
        let mut layer = Layer::new("dimensions");
        let find = |kind: PanelKind| panels.iter().find(|p| p.kind == kind);

        if let Some(front) = find(PanelKind::Front) {
            let o = front.origin;
            push_dimension(
                &mut layer,
                &DimensionLine::new(
                    o,
                    Point::new(o.x + front.width, o.y),
                    dimension_label('W', dims.width),
                    WIDTH_DIMENSION_OFFSET,
                ),
            );
            push_dimension(
                &mut layer,
                &DimensionLine::new(
                    o,
                    Point::new(o.x, o.y + front.height),
                    dimension_label('H', dims.height),
                    HEIGHT_DIMENSION_OFFSET,
                ),
            );
        }

        if let Some(lid) = find(PanelKind::Top).or_else(|| find(PanelKind::Bottom)) {
            let o = lid.origin;
            push_dimension(
                &mut layer,
                &DimensionLine::new(
                    o,
                    Point::new(o.x, o.y + lid.height),
                    dimension_label('D', dims.depth),
                    DEPTH_DIMENSION_OFFSET,
                ),
            );
        }

        layer
    }
}

impl Document {
    /// Serialize in the requested format.
    pub fn render(&self, format: OutputFormat) -> CamToolResult<Vec<u8>> {
        match format {
            OutputFormat::Svg => Ok(self.to_svg().into_bytes()),
            OutputFormat::Dxf => self.to_dxf(),
        }
    }
}

impl Panel {
    pub fn edge(&self, side: Side) -> EdgeKind {
        self.edges[side as usize]
    }
}
