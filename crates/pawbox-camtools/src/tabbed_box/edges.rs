//! Tab/slot edge synthesis
//!
//! An edge of length `L` is split into `N = max(2, floor(L / 40))` joint units
//! of two segments each. Plain segments run along the edge; detour segments
//! step out (tab) or in (slot) by the material thickness, run across, and step
//! back.
//!
//! Panels are all traced clockwise on the same sheet, so the two edges of a
//! joint are always walked in opposite directions. Tab detours sit on the
//! odd segments counted from the edge start; slot detours sit on the odd
//! segments counted from the edge end, which puts every recess exactly under
//! its mating tab once folded.

use super::types::{EdgeKind, Point, Side, Vector};

/// Nominal edge length per joint unit (mm)
pub const JOINT_PITCH: f64 = 40.0;
/// Every jointed edge gets at least this many tab/slot units
pub const MIN_JOINT_UNITS: usize = 2;
/// Longest panel edge the generator accepts (mm)
pub const MAX_EDGE_LENGTH: f64 = 10_000.0;
/// Joint units on an edge of [`MAX_EDGE_LENGTH`]
pub const MAX_JOINT_UNITS: usize = (MAX_EDGE_LENGTH / JOINT_PITCH) as usize;

/// Segment count and length for one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegmentation {
    pub length: f64,
    /// Joint units `N`; the edge has `2N` segments
    pub units: usize,
    pub segment_length: f64,
}

impl EdgeSegmentation {
    /// Unit count is capped at [`MAX_JOINT_UNITS`]; longer edges are
    /// rejected before generation.
    pub fn for_length(length: f64) -> Self {
        let units = (length / JOINT_PITCH)
            .floor()
            .max(MIN_JOINT_UNITS as f64)
            .min(MAX_JOINT_UNITS as f64) as usize;
        Self {
            length,
            units,
            segment_length: length / (2 * units) as f64,
        }
    }

    pub fn segment_count(&self) -> usize {
        2 * self.units
    }

    /// Whether segment `index` (counted from the edge start) is a detour.
    pub fn is_detour(&self, index: usize, kind: EdgeKind) -> bool {
        match kind {
            EdgeKind::Straight => false,
            EdgeKind::Tab => index % 2 == 1,
            EdgeKind::Slot => (self.segment_count() - 1 - index) % 2 == 1,
        }
    }

    /// Detour spans as `(start, end)` distances from the edge start.
    pub fn detour_spans(&self, kind: EdgeKind) -> Vec<(f64, f64)> {
        (0..self.segment_count())
            .filter(|i| self.is_detour(*i, kind))
            .map(|i| {
                let start = i as f64 * self.segment_length;
                (start, start + self.segment_length)
            })
            .collect()
    }
}

/// Append the vertices of one edge to `points`, starting after `start`.
///
/// Returns the edge end point.
pub fn trace_edge(
    points: &mut Vec<Point>,
    start: Point,
    length: f64,
    side: Side,
    kind: EdgeKind,
    thickness: f64,
) -> Point {
    let direction = side.direction();
    if kind == EdgeKind::Straight {
        let end = start + direction * length;
        points.push(end);
        return end;
    }

    let seg = EdgeSegmentation::for_length(length);
    let step = direction * seg.segment_length;
    let offset: Vector = match kind {
        EdgeKind::Tab => side.outward() * thickness,
        _ => -side.outward() * thickness,
    };

    let mut cursor = start;
    for i in 0..seg.segment_count() {
        if seg.is_detour(i, kind) {
            let out = cursor + offset;
            let across = out + step;
            points.push(out);
            points.push(across);
            cursor += step;
        } else {
            cursor += step;
        }
        points.push(cursor);
    }

    // Land exactly on the corner regardless of accumulated rounding.
    let end = start + direction * length;
    if let Some(last) = points.last_mut() {
        *last = end;
    }
    end
}

/// Closed outline of a `width × height` panel at `origin`, traced clockwise
/// from the top-left corner. `edges` is indexed by [`Side`].
///
/// The first vertex is the top-left corner and is not repeated at the end;
/// the caller closes the path.
pub fn panel_outline(
    origin: Point,
    width: f64,
    height: f64,
    edges: &[EdgeKind; 4],
    thickness: f64,
) -> Vec<Point> {
    let mut points = vec![origin];
    let mut cursor = origin;

    for side in Side::CLOCKWISE {
        let length = match side {
            Side::Top | Side::Bottom => width,
            Side::Left | Side::Right => height,
        };
        cursor = trace_edge(&mut points, cursor, length, side, edges[side as usize], thickness);
    }

    // The left edge ends back on the start corner.
    points.pop();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmentation_caps_units() {
        let seg = EdgeSegmentation::for_length(MAX_EDGE_LENGTH);
        assert_eq!(seg.units, 250);

        let seg = EdgeSegmentation::for_length(1e21);
        assert_eq!(seg.units, MAX_JOINT_UNITS);
        assert_eq!(seg.segment_count(), 2 * MAX_JOINT_UNITS);
    }

    #[test]
    fn test_minimum_segmentation() {
        let seg = EdgeSegmentation::for_length(50.0);
        assert_eq!(seg.units, 2);
        assert_eq!(seg.segment_count(), 4);
        assert_eq!(seg.segment_length, 12.5);

        let seg = EdgeSegmentation::for_length(79.9);
        assert_eq!(seg.units, 2);
    }

    #[test]
    fn test_long_edge_segmentation() {
        let seg = EdgeSegmentation::for_length(200.0);
        assert_eq!(seg.units, 5);
        assert_eq!(seg.segment_length, 20.0);

        let seg = EdgeSegmentation::for_length(150.0);
        assert_eq!(seg.units, 3);
        assert_eq!(seg.segment_length, 25.0);
    }

    #[test]
    fn test_tab_and_slot_detours_alternate() {
        let seg = EdgeSegmentation::for_length(80.0);
        let tabs: Vec<bool> = (0..4).map(|i| seg.is_detour(i, EdgeKind::Tab)).collect();
        let slots: Vec<bool> = (0..4).map(|i| seg.is_detour(i, EdgeKind::Slot)).collect();
        assert_eq!(tabs, vec![false, true, false, true]);
        assert_eq!(slots, vec![true, false, true, false]);
        assert!(seg.detour_spans(EdgeKind::Straight).is_empty());
    }

    #[test]
    fn test_straight_edge_is_single_line() {
        let mut points = vec![Point::new(0.0, 0.0)];
        let end = trace_edge(
            &mut points,
            Point::new(0.0, 0.0),
            120.0,
            Side::Top,
            EdgeKind::Straight,
            3.0,
        );
        assert_eq!(end, Point::new(120.0, 0.0));
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_tab_edge_protrudes_by_thickness() {
        let mut points = vec![Point::new(10.0, 10.0)];
        trace_edge(&mut points, Point::new(10.0, 10.0), 80.0, Side::Top, EdgeKind::Tab, 3.0);
        // 2 plain + 2 detours (3 vertices each)
        assert_eq!(points.len(), 1 + 2 + 2 * 3);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min_y, 7.0);
        assert_eq!(max_y, 10.0);
    }

    #[test]
    fn test_slot_edge_recesses_by_thickness() {
        let mut points = vec![Point::new(0.0, 0.0)];
        let end = trace_edge(&mut points, Point::new(0.0, 0.0), 60.0, Side::Right, EdgeKind::Slot, 2.0);
        assert_eq!(end, Point::new(0.0, 60.0));
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min_x, -2.0);
        assert_eq!(max_x, 0.0);
    }

    #[test]
    fn test_outline_is_closed_at_origin() {
        let edges = [EdgeKind::Tab, EdgeKind::Slot, EdgeKind::Straight, EdgeKind::Tab];
        let outline = panel_outline(Point::new(5.0, 5.0), 100.0, 60.0, &edges, 3.0);
        assert_eq!(outline[0], Point::new(5.0, 5.0));
        assert_ne!(*outline.last().unwrap(), Point::new(5.0, 5.0));
    }
}
