//! Type definitions for the tabbed box flat pattern

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canvas point in millimetres, y pointing down.
pub type Point = Point2<f64>;
/// Canvas displacement in millimetres.
pub type Vector = Vector2<f64>;

/// Outer size of the box and the sheet thickness it is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Material thickness, also the tab height
    pub thickness: f64,
}

impl BoxDimensions {
    pub fn new(width: f64, height: f64, depth: f64, thickness: f64) -> Self {
        Self {
            width,
            height,
            depth,
            thickness,
        }
    }
}

/// The six faces of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl PanelKind {
    pub const ALL: [PanelKind; 6] = [
        PanelKind::Top,
        PanelKind::Bottom,
        PanelKind::Front,
        PanelKind::Back,
        PanelKind::Left,
        PanelKind::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Top => "Top",
            PanelKind::Bottom => "Bottom",
            PanelKind::Front => "Front",
            PanelKind::Back => "Back",
            PanelKind::Left => "Left",
            PanelKind::Right => "Right",
        }
    }

    /// Panel-local (width, height) on the canvas.
    pub fn size(self, dims: &BoxDimensions) -> (f64, f64) {
        match self {
            PanelKind::Top | PanelKind::Bottom => (dims.width, dims.depth),
            PanelKind::Front | PanelKind::Back => (dims.width, dims.height),
            PanelKind::Left | PanelKind::Right => (dims.depth, dims.height),
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of a rectangular panel, in clockwise tracing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    pub const CLOCKWISE: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Unit walking direction when the panel is traced clockwise (y down).
    pub fn direction(self) -> Vector {
        match self {
            Side::Top => Vector::new(1.0, 0.0),
            Side::Right => Vector::new(0.0, 1.0),
            Side::Bottom => Vector::new(-1.0, 0.0),
            Side::Left => Vector::new(0.0, -1.0),
        }
    }

    /// Unit normal pointing away from the panel interior.
    pub fn outward(self) -> Vector {
        let d = self.direction();
        Vector::new(d.y, -d.x)
    }
}

/// How a panel edge is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Free boundary, one straight line
    Straight,
    /// Fingers protruding outward by the material thickness
    Tab,
    /// Recesses cut inward by the material thickness
    Slot,
}

impl EdgeKind {
    /// The classification the mating edge must carry.
    pub fn mate(self) -> EdgeKind {
        match self {
            EdgeKind::Straight => EdgeKind::Straight,
            EdgeKind::Tab => EdgeKind::Slot,
            EdgeKind::Slot => EdgeKind::Tab,
        }
    }
}

/// Supported box variants. Each owns its panel set and adjacency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxStyle {
    /// Six panels, every edge jointed
    #[default]
    Closed,
    /// No lid; the top edges of the walls are left straight
    OpenTop,
}

impl BoxStyle {
    pub fn has_panel(self, kind: PanelKind) -> bool {
        match self {
            BoxStyle::Closed => true,
            BoxStyle::OpenTop => kind != PanelKind::Top,
        }
    }

    pub fn panels(self) -> Vec<PanelKind> {
        PanelKind::ALL
            .into_iter()
            .filter(|kind| self.has_panel(*kind))
            .collect()
    }
}

impl fmt::Display for BoxStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxStyle::Closed => write!(f, "closed"),
            BoxStyle::OpenTop => write!(f, "open-top"),
        }
    }
}

impl FromStr for BoxStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closed" | "box" | "closedbox" => Ok(BoxStyle::Closed),
            "open-top" | "opentop" | "open" => Ok(BoxStyle::OpenTop),
            _ => Err(format!("Unknown box style: {}", s)),
        }
    }
}

/// A panel edge identified by panel and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    pub panel: PanelKind,
    pub side: Side,
}

impl EdgeRef {
    pub const fn new(panel: PanelKind, side: Side) -> Self {
        Self { panel, side }
    }
}

/// Two panel edges that meet across one physical edge of the folded box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joint {
    pub a: EdgeRef,
    pub b: EdgeRef,
}

/// Axis-aligned rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + width, origin.y + height),
        }
    }

    /// Bounding box of a point set, `None` when empty.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut rect = Rect {
            min: first,
            max: first,
        };
        for p in iter {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// True when the interiors share any area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outward_normals_point_away_from_panel() {
        assert_eq!(Side::Top.outward(), Vector::new(0.0, -1.0));
        assert_eq!(Side::Right.outward(), Vector::new(1.0, 0.0));
        assert_eq!(Side::Bottom.outward(), Vector::new(0.0, 1.0));
        assert_eq!(Side::Left.outward(), Vector::new(-1.0, 0.0));
    }

    #[test]
    fn test_panel_sizes() {
        let dims = BoxDimensions::new(200.0, 150.0, 180.0, 3.0);
        assert_eq!(PanelKind::Top.size(&dims), (200.0, 180.0));
        assert_eq!(PanelKind::Front.size(&dims), (200.0, 150.0));
        assert_eq!(PanelKind::Right.size(&dims), (180.0, 150.0));
    }

    #[test]
    fn test_box_style_parsing() {
        assert_eq!("closed".parse::<BoxStyle>(), Ok(BoxStyle::Closed));
        assert_eq!("open-top".parse::<BoxStyle>(), Ok(BoxStyle::OpenTop));
        assert!("TypeTray".parse::<BoxStyle>().is_err());
        assert_eq!(BoxStyle::OpenTop.panels().len(), 5);
        assert_eq!(BoxStyle::Closed.to_string(), "closed");
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::from_origin_size(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rect::from_origin_size(Point::new(10.0, 0.0), 10.0, 10.0);
        let c = Rect::from_origin_size(Point::new(5.0, 5.0), 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert_eq!(EdgeKind::Tab.mate(), EdgeKind::Slot);
    }
}
