#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;
use crate::anchor::{AnchorArrow, AnchorDefinition};
use crate::config::{ArrowOverrides, ConfigOverrides};
use crate::input::Phase;
use crate::style::{AnchorStatus, AnchorStyle, CircleStyle, LineStatus, StyleTables};
use crate::surface::surface_test::{Call, RecordingSurface};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn loc_approx_eq(a: Location, b: Location) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Helpers
// =============================================================

fn visible() -> AnchorStyle {
    AnchorStyle {
        anchor_circle: CircleStyle { fill_color: Some("#eee".into()), ..Default::default() },
        ..Default::default()
    }
}

fn tables() -> StyleTables {
    let anchor = HashMap::from([
        ("not-selected".to_owned(), visible()),
        ("selected".to_owned(), visible()),
        ("error".to_owned(), visible()),
    ]);
    let line = HashMap::from([
        ("normal".to_owned(), LineStyle { line_color: "blue".into(), line_width: 3.0 }),
        ("error".to_owned(), LineStyle { line_color: "red".into(), line_width: 3.0 }),
    ]);
    StyleTables::new(anchor, line, ["error"]).expect("tables")
}

fn row() -> Vec<Anchor> {
    (0..3)
        .map(|i| {
            let mut a = Anchor::new(AnchorDefinition {
                id: (i + 1).to_string(),
                location: Location::new(50.0 + 100.0 * f64::from(i), 50.0),
                arrow: None,
                anchor_circle_radius: 30.0,
                center_circle_radius: 10.0,
            });
            a.set_status(AnchorStatus::Selected);
            a
        })
        .collect()
}

fn state(selection: Vec<usize>) -> InteractionState {
    InteractionState { selection, ..Default::default() }
}

fn render(anchors: &[Anchor], state: &InteractionState, config: &Config) -> RecordingSurface {
    let styles = tables();
    let mut surface = RecordingSurface::new();
    draw(&mut surface, &Scene { anchors, state, config, styles: &styles }).expect("draw");
    surface
}

fn first_index(calls: &[Call], pred: impl Fn(&Call) -> bool) -> Option<usize> {
    calls.iter().position(pred)
}

fn last_index(calls: &[Call], pred: impl Fn(&Call) -> bool) -> Option<usize> {
    calls.iter().rposition(pred)
}

fn is_line(c: &Call) -> bool {
    matches!(c, Call::StrokePath { .. })
}

fn is_circle(c: &Call) -> bool {
    matches!(c, Call::FillCircle { .. } | Call::StrokeCircle { .. })
}

fn is_arrow(c: &Call) -> bool {
    matches!(c, Call::FillPath { .. })
}

// =============================================================
// arrow_head
// =============================================================

#[test]
fn arrow_on_horizontal_segment() {
    let head = arrow_head(Location::new(0.0, 0.0), Location::new(100.0, 0.0), 16.0, 5.0).expect("arrow");
    assert!(loc_approx_eq(head.tip, Location::new(21.0, 0.0)));
    assert!(loc_approx_eq(head.left, Location::new(16.0, -5.0)));
    assert!(loc_approx_eq(head.right, Location::new(16.0, 5.0)));
}

#[test]
fn arrow_on_vertical_segment() {
    let head = arrow_head(Location::new(0.0, 100.0), Location::new(0.0, 0.0), 16.0, 5.0).expect("arrow");
    assert!(loc_approx_eq(head.tip, Location::new(0.0, 79.0)));
    assert!(loc_approx_eq(head.left, Location::new(-5.0, 84.0)));
    assert!(loc_approx_eq(head.right, Location::new(5.0, 84.0)));
}

#[test]
fn arrow_on_diagonal_segment_is_perpendicular() {
    let from = Location::new(50.0, 50.0);
    let to = Location::new(150.0, 150.0);
    let head = arrow_head(from, to, 16.0, 5.0).expect("arrow");

    let unit = std::f64::consts::FRAC_1_SQRT_2;
    let center = Location::new(50.0 + 16.0 * unit, 50.0 + 16.0 * unit);
    assert!(loc_approx_eq(head.tip, Location::new(50.0 + 21.0 * unit, 50.0 + 21.0 * unit)));

    for corner in [head.left, head.right] {
        assert!(approx_eq(distance(corner, center), 5.0));
        let dot = (corner.x - center.x) * unit + (corner.y - center.y) * unit;
        assert!(dot.abs() < 1e-6);
    }
    assert!(!loc_approx_eq(head.left, head.right));
}

#[test]
fn arrow_tip_is_size_beyond_center() {
    let from = Location::new(10.0, 20.0);
    let to = Location::new(70.0, 100.0);
    let head = arrow_head(from, to, 30.0, 8.0).expect("arrow");
    assert!(approx_eq(distance(from, head.tip), 38.0));
}

#[test]
fn arrow_with_zero_size_has_degenerate_corners() {
    // Radius zero: the perpendicular at best touches the circle. Corners either
    // collapse to the origin or coincide with the circle center.
    let head = arrow_head(Location::new(0.0, 0.0), Location::new(30.0, 40.0), 10.0, 0.0).expect("arrow");
    let center = Location::new(6.0, 8.0);
    assert!(loc_approx_eq(head.tip, center));
    for corner in [head.left, head.right] {
        assert!(corner == Location::ORIGIN || distance(corner, center) < 1e-6);
    }
}

#[test]
fn arrow_between_coincident_points_is_none() {
    assert!(arrow_head(Location::new(5.0, 5.0), Location::new(5.0, 5.0), 16.0, 5.0).is_none());
}

// =============================================================
// draw: layering
// =============================================================

#[test]
fn frame_starts_with_clear() {
    let surface = render(&row(), &state(vec![]), &Config::default());
    assert_eq!(surface.calls.first(), Some(&Call::Clear));
}

#[test]
fn every_anchor_is_drawn_regardless_of_selection() {
    let surface = render(&row(), &state(vec![]), &Config::default());
    assert_eq!(surface.circle_count(), 3);
}

#[test]
fn single_selection_draws_no_lines_or_arrows() {
    let surface = render(&row(), &state(vec![0]), &Config::default());
    assert!(surface.stroke_paths().is_empty());
    assert!(surface.fill_paths().is_empty());
}

#[test]
fn lines_render_beneath_anchors_by_default() {
    let surface = render(&row(), &state(vec![0, 1, 2]), &Config::default());
    assert_eq!(surface.stroke_paths().len(), 2);
    let last_line = last_index(&surface.calls, is_line).expect("line");
    let first_circle = first_index(&surface.calls, is_circle).expect("circle");
    assert!(last_line < first_circle);
}

#[test]
fn lines_render_above_anchors_when_covering() {
    let config = Config::with_overrides(&ConfigOverrides { line_cover_anchor: Some(true), ..Default::default() });
    let surface = render(&row(), &state(vec![0, 1, 2]), &config);
    let first_line = first_index(&surface.calls, is_line).expect("line");
    let last_circle = last_index(&surface.calls, is_circle).expect("circle");
    assert!(first_line > last_circle);
}

#[test]
fn arrows_render_last() {
    for cover in [false, true] {
        let config = Config::with_overrides(&ConfigOverrides { line_cover_anchor: Some(cover), ..Default::default() });
        let surface = render(&row(), &state(vec![0, 1, 2]), &config);
        let first_arrow = first_index(&surface.calls, is_arrow).expect("arrow");
        let last_other = last_index(&surface.calls, |c| is_line(c) || is_circle(c)).expect("other");
        assert!(first_arrow > last_other);
        assert_eq!(surface.fill_paths().len(), 2);
    }
}

#[test]
fn lines_connect_adjacent_pairs_in_selection_order() {
    let surface = render(&row(), &state(vec![2, 0, 1]), &Config::default());
    let paths = surface.stroke_paths();
    assert_eq!(paths[0], &vec![Location::new(250.0, 50.0), Location::new(50.0, 50.0)]);
    assert_eq!(paths[1], &vec![Location::new(50.0, 50.0), Location::new(150.0, 50.0)]);
}

#[test]
fn live_line_only_while_dragging() {
    let pointer = Location::new(120.0, 200.0);
    let dragging = InteractionState { phase: Phase::Dragging { pointer }, ..state(vec![0, 1]) };
    let surface = render(&row(), &dragging, &Config::default());
    let paths = surface.stroke_paths();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[1], &vec![Location::new(150.0, 50.0), pointer]);

    let idle = render(&row(), &state(vec![0, 1]), &Config::default());
    assert_eq!(idle.stroke_paths().len(), 1);
}

#[test]
fn live_line_without_selection_is_skipped() {
    let dragging = InteractionState { phase: Phase::Dragging { pointer: Location::ORIGIN }, ..Default::default() };
    let surface = render(&row(), &dragging, &Config::default());
    assert!(surface.stroke_paths().is_empty());
}

#[test]
fn hidden_arrows_are_not_drawn() {
    let config = Config::with_overrides(&ConfigOverrides {
        arrow: Some(ArrowOverrides { show: Some(false), ..Default::default() }),
        ..Default::default()
    });
    let surface = render(&row(), &state(vec![0, 1, 2]), &config);
    assert!(surface.fill_paths().is_empty());
}

#[test]
fn arrow_uses_starting_anchor_override() {
    let mut anchors = row();
    anchors[0] = Anchor::new(AnchorDefinition {
        id: "1".into(),
        location: Location::new(50.0, 50.0),
        arrow: Some(AnchorArrow { size: None, distance: Some(40.0) }),
        anchor_circle_radius: 30.0,
        center_circle_radius: 10.0,
    });
    let surface = render(&anchors, &state(vec![0, 1, 2]), &Config::default());
    let arrows = surface.fill_paths();
    // Override on anchor 1: tip at 50 + 40 + 5. Anchor 2 uses the defaults: 150 + 16 + 5.
    assert!(loc_approx_eq(arrows[0][0], Location::new(95.0, 50.0)));
    assert!(loc_approx_eq(arrows[1][0], Location::new(171.0, 50.0)));
}

#[test]
fn lines_and_arrows_use_line_status_color() {
    let error = tables().extra("error").cloned().expect("registered");
    let st = InteractionState { line_status: LineStatus::Extra(error), ..state(vec![0, 1]) };
    let surface = render(&row(), &st, &Config::default());
    for call in &surface.calls {
        match call {
            Call::StrokePath { color, width, .. } => {
                assert_eq!(color, "red");
                assert_eq!(*width, 3.0);
            }
            Call::FillPath { color, .. } => assert_eq!(color, "red"),
            _ => {}
        }
    }
}

#[test]
fn draw_propagates_surface_errors() {
    let styles = tables();
    let anchors = row();
    let st = state(vec![]);
    let config = Config::default();
    let mut surface = RecordingSurface { fail_circles: true, ..Default::default() };
    let result = draw(&mut surface, &Scene { anchors: &anchors, state: &st, config: &config, styles: &styles });
    assert!(result.is_err());
}
