//! SVG serialization of a flat-pattern [`Document`].

use super::document::{
    Document, Element, Layer, PathCommand, PathData, Stroke, TextAnchor, TextElement,
    BACKGROUND_COLOR, FONT_FAMILY,
};
use super::types::Point;

const HEADING_FONT_SIZE: f64 = 7.0;
const HEADING_BASELINE: f64 = 9.0;
const HEADING_COLOR: &str = "#222";

impl PathData {
    /// `d` attribute with two-decimal coordinates.
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => d.push_str(&format!("M {:.2} {:.2} ", p.x, p.y)),
                PathCommand::LineTo(p) => d.push_str(&format!("L {:.2} {:.2} ", p.x, p.y)),
                PathCommand::Close => d.push_str("Z "),
            }
        }
        d.trim_end().to_string()
    }
}

impl Document {
    /// Render as standalone SVG sized in millimetres.
    ///
    /// The output depends only on the document contents, so identical inputs
    /// serialize to identical bytes.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.canvas_width, self.canvas_height);
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{w:.2}mm" height="{h:.2}mm" viewBox="0 0 {w:.2} {h:.2}" xmlns="http://www.w3.org/2000/svg">
  <title>{}</title>
  <rect width="{w:.2}" height="{h:.2}" fill="{}"/>
"#,
            escape_xml(&self.title),
            BACKGROUND_COLOR,
        ));

        let heading = TextElement::new(
            Point::new(w / 2.0, HEADING_BASELINE),
            self.heading.clone(),
            HEADING_FONT_SIZE,
            HEADING_COLOR,
        )
        .anchored(TextAnchor::Middle)
        .bold();
        svg.push_str("  ");
        svg.push_str(&text_to_svg(&heading));
        svg.push('\n');

        for layer in self.layers() {
            svg.push_str(&layer_to_svg(layer));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn layer_to_svg(layer: &Layer) -> String {
    let mut svg = format!("  <g id=\"{}\">\n", layer.id);
    for element in &layer.elements {
        svg.push_str("    ");
        svg.push_str(&element_to_svg(element));
        svg.push('\n');
    }
    svg.push_str("  </g>\n");
    svg
}

fn element_to_svg(element: &Element) -> String {
    match element {
        Element::Path { data, stroke, fill } => {
            let stroke_attrs = stroke
                .as_ref()
                .map(stroke_to_svg)
                .unwrap_or_else(|| r#"stroke="none""#.to_string());
            format!(
                r#"<path d="{}" fill="{}" {}/>"#,
                data.to_svg_path(),
                fill.unwrap_or("none"),
                stroke_attrs
            )
        }
        Element::Line { from, to, stroke } => format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_to_svg(stroke)
        ),
        Element::Text(text) => text_to_svg(text),
    }
}

fn stroke_to_svg(stroke: &Stroke) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.2}""#,
        stroke.color, stroke.width
    );
    if let Some((on, off)) = stroke.dash {
        attrs.push_str(&format!(r#" stroke-dasharray="{},{}""#, on, off));
    }
    attrs
}

fn text_to_svg(text: &TextElement) -> String {
    let (x, y) = (text.position.x, text.position.y);
    let mut attrs = format!(
        r#"x="{:.2}" y="{:.2}" font-size="{:.2}" font-family="{}" fill="{}" text-anchor="{}""#,
        x,
        y,
        text.font_size,
        FONT_FAMILY,
        text.color,
        text.anchor.as_str()
    );
    if text.centered {
        attrs.push_str(r#" dominant-baseline="middle""#);
    }
    if text.bold {
        attrs.push_str(r#" font-weight="bold""#);
    }
    if let Some(angle) = text.rotation {
        attrs.push_str(&format!(
            r#" transform="rotate({:.2} {:.2} {:.2})""#,
            angle, x, y
        ));
    }
    format!("<text {}>{}</text>", attrs, escape_xml(&text.content))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_data_formatting() {
        let data = PathData::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.5, 0.0),
            Point::new(10.5, 5.0),
        ]);
        assert_eq!(
            data.to_svg_path(),
            "M 0.00 0.00 L 10.50 0.00 L 10.50 5.00 Z"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let text = TextElement::new(Point::new(1.0, 2.0), "A & <B>", 4.0, "#555");
        let svg = text_to_svg(&text);
        assert!(svg.contains("A &amp; &lt;B&gt;"));
        assert!(!svg.contains("transform"));
    }

    #[test]
    fn test_rotated_text_rotates_about_anchor() {
        let text = TextElement::new(Point::new(3.0, 4.0), "H", 5.0, "#4488FF").rotated(-90.0);
        assert!(text_to_svg(&text).contains(r#"transform="rotate(-90.00 3.00 4.00)""#));
    }

    #[test]
    fn test_dashed_stroke() {
        let attrs = stroke_to_svg(&Stroke::dimension());
        assert_eq!(
            attrs,
            r##"stroke="#4488FF" stroke-width="0.40" stroke-dasharray="2,2""##
        );
    }
}
