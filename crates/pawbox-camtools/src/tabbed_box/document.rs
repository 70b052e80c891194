//! Vector line-drawing document produced by the flat-pattern generator.

use super::types::{BoxDimensions, EdgeKind, PanelKind, Point, Rect};
use std::fmt;
use std::str::FromStr;

pub const CUT_COLOR: &str = "#E02020";
pub const CUT_STROKE_WIDTH: f64 = 0.5;
pub const DIMENSION_COLOR: &str = "#4488FF";
pub const DIMENSION_STROKE_WIDTH: f64 = 0.4;
pub const DIMENSION_DASH: (f64, f64) = (2.0, 2.0);
pub const BACKGROUND_COLOR: &str = "#FAFAFA";
pub const FONT_FAMILY: &str = "Arial,sans-serif";

/// Path command in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// Sequence of path commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut commands = Vec::with_capacity(points.len() + 1);
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            commands.push(PathCommand::MoveTo(*first));
            commands.extend(iter.map(|p| PathCommand::LineTo(*p)));
            commands.push(PathCommand::Close);
        }
        Self { commands }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.commands.iter().filter_map(|c| match c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::Close => None,
        })
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::enclosing(self.points())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }
}

/// Stroke style for lines and outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn cut() -> Self {
        Self {
            color: CUT_COLOR,
            width: CUT_STROKE_WIDTH,
            dash: None,
        }
    }

    pub fn dimension() -> Self {
        Self {
            color: DIMENSION_COLOR,
            width: DIMENSION_STROKE_WIDTH,
            dash: Some(DIMENSION_DASH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub position: Point,
    pub content: String,
    pub font_size: f64,
    pub color: &'static str,
    pub anchor: TextAnchor,
    /// Vertically centre on `position` instead of sitting on the baseline
    pub centered: bool,
    pub bold: bool,
    /// Rotation in degrees about `position`
    pub rotation: Option<f64>,
}

impl TextElement {
    pub fn new(position: Point, content: impl Into<String>, font_size: f64, color: &'static str) -> Self {
        Self {
            position,
            content: content.into(),
            font_size,
            color,
            anchor: TextAnchor::Start,
            centered: false,
            bold: false,
            rotation: None,
        }
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered(mut self) -> Self {
        self.anchor = TextAnchor::Middle;
        self.centered = true;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Path {
        data: PathData,
        stroke: Option<Stroke>,
        fill: Option<&'static str>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Text(TextElement),
}

/// Named group of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: &'static str,
    pub elements: Vec<Element>,
}

impl Layer {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathData> {
        self.elements.iter().filter_map(|e| match e {
            Element::Path { data, .. } => Some(data),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Line { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }
}

/// One generated panel: placement, edge classification, and cut outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Indexed by `Side as usize`
    pub edges: [EdgeKind; 4],
    pub outline: PathData,
}

impl Panel {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.width, self.height)
    }

    /// Bounds including tab protrusions.
    pub fn cut_bounds(&self) -> Rect {
        self.outline.bounds().unwrap_or_else(|| self.bounds())
    }
}

/// Serialization target for a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Dxf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Dxf => "dxf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "dxf" => Ok(OutputFormat::Dxf),
            _ => Err(format!("Unsupported output format: {}", s)),
        }
    }
}

/// Complete flat-pattern drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub heading: String,
    pub dimensions: BoxDimensions,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub panels: Vec<Panel>,
    /// Panel outlines plus their centred labels
    pub cut: Layer,
    pub dimension_lines: Layer,
    pub legend: Layer,
}

impl Document {
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn canvas(&self) -> Rect {
        Rect::from_origin_size(Point::origin(), self.canvas_width, self.canvas_height)
    }

    pub fn layers(&self) -> [&Layer; 3] {
        [&self.cut, &self.dimension_lines, &self.legend]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_is_closed() {
        let data = PathData::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
        ]);
        assert!(data.is_closed());
        assert_eq!(data.points().count(), 3);
        let bounds = data.bounds().unwrap();
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 5.0);
        assert!(PathData::polygon(&[]).commands.is_empty());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("SVG".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert_eq!("dxf".parse::<OutputFormat>(), Ok(OutputFormat::Dxf));
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Dxf.extension(), "dxf");
    }
}
