//! Property-based tests for flat-pattern invariants.

use proptest::prelude::*;

use pawbox_camtools::tabbed_box::edges::{trace_edge, EdgeSegmentation, MIN_JOINT_UNITS};
use pawbox_camtools::tabbed_box::layout::{edge_length, joint_segmentation};
use pawbox_camtools::tabbed_box::types::Point;
use pawbox_camtools::{BoxDimensions, BoxStyle, EdgeKind, FlatPatternGenerator, LayoutSettings, Side};

/// Box extents whose shortest joint segment is at least 5 mm.
fn arb_extent() -> impl Strategy<Value = f64> {
    20.0f64..600.0
}

/// Thickness below every segment length and the default spacing.
fn arb_thickness() -> impl Strategy<Value = f64> {
    0.5f64..4.9
}

fn arb_style() -> impl Strategy<Value = BoxStyle> {
    prop_oneof![Just(BoxStyle::Closed), Just(BoxStyle::OpenTop)]
}

const TOL: f64 = 1e-9;

/// Offset spans of a traced edge in edge-local coordinates.
///
/// Returns `(along_start, along_end, across)` for each pair of consecutive
/// vertices that sit off the edge line, `across` positive outward.
fn traced_detours(side: Side, kind: EdgeKind, length: f64, t: f64) -> Vec<(f64, f64, f64)> {
    let start = Point::new(0.0, 0.0);
    let mut points = vec![start];
    trace_edge(&mut points, start, length, side, kind, t);

    let local: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let v = p - start;
            (v.dot(&side.direction()), v.dot(&side.outward()))
        })
        .collect();

    let mut spans = Vec::new();
    let mut i = 0;
    while i + 1 < local.len() {
        let (a, b) = (local[i], local[i + 1]);
        if a.1.abs() > t / 2.0 && b.1.abs() > t / 2.0 {
            spans.push((a.0, b.0, a.1));
            i += 2;
        } else {
            i += 1;
        }
    }
    spans
}

proptest! {
    #[test]
    fn mating_edges_are_complementary(
        w in arb_extent(),
        h in arb_extent(),
        d in arb_extent(),
        t in arb_thickness(),
        style in arb_style(),
    ) {
        let dims = BoxDimensions::new(w, h, d, t);
        for joint in style.joints() {
            let ka = style.edge_kind(joint.a);
            let kb = style.edge_kind(joint.b);
            prop_assert_ne!(ka, EdgeKind::Straight);
            prop_assert_eq!(ka.mate(), kb, "{:?} / {:?}", joint.a, joint.b);

            let (sa, sb) = joint_segmentation(&joint, &dims);
            prop_assert_eq!(sa.units, sb.units);
            prop_assert!((sa.segment_length - sb.segment_length).abs() < TOL);
        }
    }
}

proptest! {
    #[test]
    fn tabs_land_on_slots(
        w in arb_extent(),
        h in arb_extent(),
        d in arb_extent(),
        t in arb_thickness(),
        style in arb_style(),
    ) {
        let dims = BoxDimensions::new(w, h, d, t);
        for joint in style.joints() {
            let length = edge_length(joint.a, &dims);
            let (sa, sb) = joint_segmentation(&joint, &dims);
            let ka = style.edge_kind(joint.a);
            let kb = style.edge_kind(joint.b);

            // The mating edge is walked in the opposite direction.
            let mut mapped: Vec<(f64, f64)> = sa
                .detour_spans(ka)
                .into_iter()
                .map(|(s, e)| (length - e, length - s))
                .collect();
            mapped.sort_by(|x, y| x.0.total_cmp(&y.0));
            let mate = sb.detour_spans(kb);

            prop_assert_eq!(mapped.len(), mate.len());
            for (m, n) in mapped.iter().zip(mate.iter()) {
                prop_assert!((m.0 - n.0).abs() < 1e-6 && (m.1 - n.1).abs() < 1e-6,
                    "{:?}: {:?} vs {:?}", joint, m, n);
            }
        }
    }
}

proptest! {
    #[test]
    fn traced_tabs_fill_traced_slots(
        w in arb_extent(),
        h in arb_extent(),
        d in arb_extent(),
        t in arb_thickness(),
    ) {
        let dims = BoxDimensions::new(w, h, d, t);
        let style = BoxStyle::Closed;
        for joint in style.joints() {
            let (tab, slot) = match style.edge_kind(joint.a) {
                EdgeKind::Tab => (joint.a, joint.b),
                _ => (joint.b, joint.a),
            };
            let length = edge_length(tab, &dims);
            let tabs = traced_detours(tab.side, EdgeKind::Tab, length, t);
            let slots = traced_detours(slot.side, EdgeKind::Slot, length, t);

            prop_assert!(!tabs.is_empty());
            prop_assert_eq!(tabs.len(), slots.len());
            prop_assert!(tabs.iter().all(|s| (s.2 - t).abs() < 1e-6), "tab depth {:?}", tabs);
            prop_assert!(slots.iter().all(|s| (s.2 + t).abs() < 1e-6), "slot depth {:?}", slots);

            // Walked in opposite directions, so reverse the tab positions.
            let mut mapped: Vec<(f64, f64)> =
                tabs.iter().map(|s| (length - s.1, length - s.0)).collect();
            mapped.sort_by(|x, y| x.0.total_cmp(&y.0));
            for (m, n) in mapped.iter().zip(slots.iter()) {
                prop_assert!((m.0 - n.0).abs() < 1e-6 && (m.1 - n.1).abs() < 1e-6,
                    "{:?}: {:?} vs {:?}", joint, m, n);
            }
        }
    }
}

proptest! {
    #[test]
    fn panels_never_overlap_and_stay_on_canvas(
        w in arb_extent(),
        h in arb_extent(),
        d in arb_extent(),
        t in arb_thickness(),
        style in arb_style(),
    ) {
        let generator = FlatPatternGenerator::new(LayoutSettings::default(), style);
        let doc = generator.generate(&BoxDimensions::new(w, h, d, t)).unwrap();
        let canvas = doc.canvas();

        for (i, a) in doc.panels.iter().enumerate() {
            let bounds = a.cut_bounds();
            prop_assert!(canvas.contains(&bounds), "{} leaves the canvas", a.kind);
            for b in &doc.panels[i + 1..] {
                prop_assert!(!bounds.overlaps(&b.cut_bounds()), "{} overlaps {}", a.kind, b.kind);
            }
        }
    }
}

proptest! {
    #[test]
    fn minimum_segmentation(length in 0.1f64..2000.0) {
        let seg = EdgeSegmentation::for_length(length);
        if length < 80.0 {
            prop_assert_eq!(seg.units, MIN_JOINT_UNITS);
        } else {
            prop_assert_eq!(seg.units, (length / 40.0).floor() as usize);
        }
        prop_assert!((seg.segment_length * seg.segment_count() as f64 - length).abs() < 1e-9);
    }
}

proptest! {
    #[test]
    fn svg_output_is_deterministic(
        w in arb_extent(),
        h in arb_extent(),
        d in arb_extent(),
        t in arb_thickness(),
    ) {
        let dims = BoxDimensions::new(w, h, d, t);
        let first = FlatPatternGenerator::default().generate(&dims).unwrap().to_svg();
        let second = FlatPatternGenerator::default().generate(&dims).unwrap().to_svg();
        prop_assert_eq!(first, second);
    }
}
