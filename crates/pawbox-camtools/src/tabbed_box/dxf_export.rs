//! DXF serialization of a flat-pattern [`Document`].
//!
//! Panel outlines become closed LWPOLYLINE entities on the `CUT` layer and the
//! panel labels become TEXT on `LABELS`. CAD y grows upward, so every point is
//! flipped against the canvas height. Drawings are written as R2000, the oldest
//! version that carries LWPOLYLINE.

use super::document::{Document, Element, PathData};
use super::types::Point;
use crate::error::{CamToolError, CamToolResult};
use dxf::entities::{Entity as DEntity, EntityType, LwPolyline as DLwPolyline, Text as DText};
use dxf::enums::AcadVersion;
use dxf::tables::Layer as DLayer;
use dxf::{Drawing, LwPolylineVertex, Point as DPoint};
use tracing::debug;

pub const CUT_LAYER: &str = "CUT";
pub const LABEL_LAYER: &str = "LABELS";

impl Document {
    /// Build the DXF drawing for this document.
    pub fn to_dxf_drawing(&self) -> Drawing {
        let mut drawing = Drawing::new();
        drawing.header.version = AcadVersion::R2000;
        for name in [CUT_LAYER, LABEL_LAYER] {
            drawing.add_layer(DLayer {
                name: name.to_string(),
                ..Default::default()
            });
        }

        let flip = |p: &Point| DPoint::new(p.x, self.canvas_height - p.y, 0.0);

        for panel in &self.panels {
            let pl = polyline(&panel.outline, &flip);
            let mut de = DEntity::new(EntityType::LwPolyline(pl));
            de.common.layer = CUT_LAYER.to_string();
            drawing.add_entity(de);
        }

        for element in &self.cut.elements {
            if let Element::Text(text) = element {
                let mut t = DText::default();
                t.location = flip(&text.position);
                t.value = text.content.clone();
                t.text_height = text.font_size.max(0.1);
                let mut de = DEntity::new(EntityType::Text(t));
                de.common.layer = LABEL_LAYER.to_string();
                drawing.add_entity(de);
            }
        }

        debug!(panels = self.panels.len(), "built DXF drawing");
        drawing
    }

    /// Serialize to DXF bytes.
    pub fn to_dxf(&self) -> CamToolResult<Vec<u8>> {
        let drawing = self.to_dxf_drawing();
        let mut buffer = Vec::new();
        drawing
            .save(&mut buffer)
            .map_err(|e| CamToolError::ExportFailed(format!("DXF write failed: {}", e)))?;
        Ok(buffer)
    }
}

fn polyline(outline: &PathData, flip: &impl Fn(&Point) -> DPoint) -> DLwPolyline {
    let mut pl = DLwPolyline::default();
    pl.set_is_closed(outline.is_closed());
    pl.vertices = outline
        .points()
        .enumerate()
        .map(|(i, p)| {
            let flipped = flip(p);
            let mut v = LwPolylineVertex::default();
            v.id = i as i32;
            v.x = flipped.x;
            v.y = flipped.y;
            v
        })
        .collect();
    pl
}
