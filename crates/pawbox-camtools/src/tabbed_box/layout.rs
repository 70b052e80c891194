//! Cross (unfolded) layout of the box panels and the joint adjacency table.
//!
//! ```text
//!                 [Top:    width × depth]
//! [Left: depth×height] [Front: width×height] [Right: depth×height] [Back: width×height]
//!                 [Bottom: width × depth]
//! ```

use super::edges::EdgeSegmentation;
use super::types::{BoxDimensions, BoxStyle, EdgeKind, EdgeRef, Joint, PanelKind, Point, Rect, Side};
use crate::error::{CamToolError, CamToolResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default outer margin around the drawing (mm)
pub const DEFAULT_MARGIN: f64 = 20.0;
/// Default gap between neighbouring panels (mm)
pub const DEFAULT_SPACING: f64 = 8.0;

/// Fixed layout constants, independent of box size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub margin: f64,
    pub spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> CamToolResult<()> {
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return Err(CamToolError::InvalidParameters(format!(
                "margin must be a positive length, got {}",
                self.margin
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(CamToolError::InvalidParameters(format!(
                "spacing must be a positive length, got {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

use PanelKind::{Back, Bottom, Front, Left, Right, Top};

const fn joint(a: PanelKind, a_side: Side, b: PanelKind, b_side: Side) -> Joint {
    Joint {
        a: EdgeRef::new(a, a_side),
        b: EdgeRef::new(b, b_side),
    }
}

/// The twelve physical edges of a closed box, as pairs of panel edges.
const CLOSED_BOX_JOINTS: [Joint; 12] = [
    joint(Front, Side::Top, Top, Side::Bottom),
    joint(Front, Side::Bottom, Bottom, Side::Top),
    joint(Front, Side::Left, Left, Side::Right),
    joint(Front, Side::Right, Right, Side::Left),
    joint(Back, Side::Left, Right, Side::Right),
    joint(Back, Side::Right, Left, Side::Left),
    joint(Back, Side::Top, Top, Side::Top),
    joint(Back, Side::Bottom, Bottom, Side::Bottom),
    joint(Top, Side::Left, Left, Side::Top),
    joint(Top, Side::Right, Right, Side::Top),
    joint(Bottom, Side::Left, Left, Side::Bottom),
    joint(Bottom, Side::Right, Right, Side::Bottom),
];

impl BoxStyle {
    /// Physical joints present in this style.
    pub fn joints(self) -> Vec<Joint> {
        CLOSED_BOX_JOINTS
            .iter()
            .copied()
            .filter(|j| self.has_panel(j.a.panel) && self.has_panel(j.b.panel))
            .collect()
    }

    /// The panel edge this one folds against, if any.
    pub fn mate_of(self, edge: EdgeRef) -> Option<EdgeRef> {
        self.joints().into_iter().find_map(|j| {
            if j.a == edge {
                Some(j.b)
            } else if j.b == edge {
                Some(j.a)
            } else {
                None
            }
        })
    }

    /// Edge classification from the adjacency table.
    ///
    /// Lid and floor carry tabs all round, side walls are slotted all round,
    /// and front/back walls are slotted top and bottom with tabs on their
    /// vertical edges. Unmated edges are straight.
    pub fn edge_kind(self, edge: EdgeRef) -> EdgeKind {
        if !self.has_panel(edge.panel) || self.mate_of(edge).is_none() {
            return EdgeKind::Straight;
        }
        match edge.panel {
            Top | Bottom => EdgeKind::Tab,
            Left | Right => EdgeKind::Slot,
            Front | Back => match edge.side {
                Side::Top | Side::Bottom => EdgeKind::Slot,
                Side::Left | Side::Right => EdgeKind::Tab,
            },
        }
    }
}

/// Where one panel sits on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: PanelKind,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.width, self.height)
    }
}

/// Panel origins plus the canvas that exactly contains them.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Assign every panel of `style` an origin on the shared canvas.
    ///
    /// Assumes `dims` and `settings` were already validated.
    pub fn compute(dims: &BoxDimensions, settings: &LayoutSettings, style: BoxStyle) -> Self {
        let (w, h, d) = (dims.width, dims.height, dims.depth);
        let (m, sp) = (settings.margin, settings.spacing);

        let top_band = if style.has_panel(Top) { d + sp } else { 0.0 };
        let bottom_band = if style.has_panel(Bottom) { sp + d } else { 0.0 };

        let row_y = m + top_band;
        let left_x = m;
        let front_x = left_x + d + sp;
        let right_x = front_x + w + sp;
        let back_x = right_x + d + sp;

        let origin_of = |kind: PanelKind| match kind {
            Top => Point::new(front_x, m),
            Bottom => Point::new(front_x, row_y + h + sp),
            Front => Point::new(front_x, row_y),
            Back => Point::new(back_x, row_y),
            Left => Point::new(left_x, row_y),
            Right => Point::new(right_x, row_y),
        };

        let placements = style
            .panels()
            .into_iter()
            .map(|kind| {
                let (width, height) = kind.size(dims);
                let origin = origin_of(kind);
                debug!(panel = %kind, x = origin.x, y = origin.y, width, height, "placed panel");
                Placement {
                    kind,
                    origin,
                    width,
                    height,
                }
            })
            .collect();

        Self {
            canvas_width: 2.0 * m + d + w + d + w + 3.0 * sp,
            canvas_height: 2.0 * m + top_band + h + bottom_band,
            placements,
        }
    }

    pub fn placement(&self, kind: PanelKind) -> Option<&Placement> {
        self.placements.iter().find(|p| p.kind == kind)
    }

    pub fn canvas(&self) -> Rect {
        Rect::from_origin_size(Point::origin(), self.canvas_width, self.canvas_height)
    }
}

/// Edge length of `edge` for the given box.
pub fn edge_length(edge: EdgeRef, dims: &BoxDimensions) -> f64 {
    let (width, height) = edge.panel.size(dims);
    match edge.side {
        Side::Top | Side::Bottom => width,
        Side::Left | Side::Right => height,
    }
}

/// Segmentation both sides of a joint share.
pub fn joint_segmentation(joint: &Joint, dims: &BoxDimensions) -> (EdgeSegmentation, EdgeSegmentation) {
    (
        EdgeSegmentation::for_length(edge_length(joint.a, dims)),
        EdgeSegmentation::for_length(edge_length(joint.b, dims)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_box_edges_are_all_jointed() {
        for kind in PanelKind::ALL {
            for side in Side::CLOCKWISE {
                let edge = EdgeRef::new(kind, side);
                assert!(BoxStyle::Closed.mate_of(edge).is_some(), "{:?} has no mate", edge);
                assert_ne!(BoxStyle::Closed.edge_kind(edge), EdgeKind::Straight);
            }
        }
    }

    #[test]
    fn test_open_top_frees_wall_tops() {
        let style = BoxStyle::OpenTop;
        assert_eq!(style.joints().len(), 8);
        for wall in [Front, Back, Left, Right] {
            assert_eq!(style.edge_kind(EdgeRef::new(wall, Side::Top)), EdgeKind::Straight);
            assert_ne!(style.edge_kind(EdgeRef::new(wall, Side::Bottom)), EdgeKind::Straight);
        }
        assert_eq!(style.edge_kind(EdgeRef::new(Top, Side::Bottom)), EdgeKind::Straight);
    }

    #[test]
    fn test_reference_layout() {
        let dims = BoxDimensions::new(200.0, 150.0, 180.0, 3.0);
        let layout = Layout::compute(&dims, &LayoutSettings::default(), BoxStyle::Closed);
        // 2*20 + 180 + 200 + 180 + 200 + 3*8 and 2*20 + 180 + 150 + 180 + 2*8
        assert_eq!(layout.canvas_width, 824.0);
        assert_eq!(layout.canvas_height, 566.0);

        let front = layout.placement(Front).unwrap();
        assert_eq!(front.origin, Point::new(208.0, 208.0));
        assert_eq!(layout.placement(Top).unwrap().origin, Point::new(208.0, 20.0));
        assert_eq!(layout.placement(Bottom).unwrap().origin, Point::new(208.0, 366.0));
        assert_eq!(layout.placement(Left).unwrap().origin, Point::new(20.0, 208.0));
        assert_eq!(layout.placement(Right).unwrap().origin, Point::new(416.0, 208.0));
        assert_eq!(layout.placement(Back).unwrap().origin, Point::new(604.0, 208.0));
    }

    #[test]
    fn test_open_top_layout_drops_top_row() {
        let dims = BoxDimensions::new(200.0, 150.0, 180.0, 3.0);
        let layout = Layout::compute(&dims, &LayoutSettings::default(), BoxStyle::OpenTop);
        assert_eq!(layout.placements.len(), 5);
        assert_eq!(layout.canvas_height, 40.0 + 150.0 + 8.0 + 180.0);
        assert_eq!(layout.placement(Front).unwrap().origin, Point::new(208.0, 20.0));
        assert!(layout.placement(Top).is_none());
    }

    #[test]
    fn test_layout_settings_validation() {
        assert!(LayoutSettings::default().validate().is_ok());
        let bad = LayoutSettings {
            margin: 20.0,
            spacing: 0.0,
        };
        assert!(matches!(bad.validate(), Err(CamToolError::InvalidParameters(_))));
    }
}
