use super::*;
use crate::anchor::AnchorDefinition;
use crate::config::ConfigOverrides;
use crate::geom::Location;

// =============================================================
// Helpers
// =============================================================

/// 3x3 grid, ids "1".."9" row-major, centers 100px apart, radius 30.
fn grid() -> Vec<Anchor> {
    (0..9)
        .map(|i| {
            let (row, col) = (i / 3, i % 3);
            Anchor::new(AnchorDefinition {
                id: (i + 1).to_string(),
                location: Location::new(50.0 + 100.0 * f64::from(col), 50.0 + 100.0 * f64::from(row)),
                arrow: None,
                anchor_circle_radius: 30.0,
                center_circle_radius: 10.0,
            })
        })
        .collect()
}

fn config(auto: bool, repeat: bool) -> Config {
    Config::with_overrides(&ConfigOverrides {
        line_auto_select: Some(auto),
        anchor_repeat_select: Some(repeat),
        ..Default::default()
    })
}

// Index of the anchor with a 1-based grid id.
fn at(id: usize) -> usize {
    id - 1
}

// =============================================================
// can_select
// =============================================================

#[test]
fn can_select_without_repeat_rejects_any_previous() {
    assert!(can_select(&[], 0, false));
    assert!(!can_select(&[0, 1], 0, false));
    assert!(can_select(&[0, 1], 2, false));
}

#[test]
fn can_select_with_repeat_rejects_only_consecutive() {
    assert!(can_select(&[0, 1], 0, true));
    assert!(!can_select(&[0, 1], 1, true));
}

// =============================================================
// pick
// =============================================================

#[test]
fn first_pick_appends_hit_only() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[], at(1), &config(true, false)), Some(vec![at(1)]));
}

#[test]
fn pick_out_of_range_is_rejected() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[], 42, &config(false, false)), None);
}

#[test]
fn auto_select_infers_middle_of_row() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1)], at(3), &config(true, false)), Some(vec![at(2), at(3)]));
}

#[test]
fn auto_select_disabled_skips_middle() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1)], at(3), &config(false, false)), Some(vec![at(3)]));
}

#[test]
fn auto_select_diagonal_crosses_center() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1)], at(9), &config(true, false)), Some(vec![at(5), at(9)]));
}

#[test]
fn auto_select_orders_closest_first() {
    // A 1x4 row: picking from the last to the first visits 3 then 2.
    let anchors: Vec<Anchor> = (0..4)
        .map(|i| {
            Anchor::new(AnchorDefinition {
                id: format!("r{i}"),
                location: Location::new(50.0 + 100.0 * f64::from(i), 50.0),
                arrow: None,
                anchor_circle_radius: 30.0,
                center_circle_radius: 10.0,
            })
        })
        .collect();
    assert_eq!(pick(&anchors, &[3], 0, &config(true, false)), Some(vec![2, 1, 0]));
}

#[test]
fn auto_select_skips_already_selected_without_repeat() {
    let anchors = grid();
    // 2 already selected: going 1 -> 3 must not add 2 again.
    assert_eq!(pick(&anchors, &[at(2), at(1)], at(3), &config(true, false)), Some(vec![at(3)]));
}

#[test]
fn auto_select_reselects_crossed_anchor_with_repeat() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(2), at(1)], at(3), &config(true, true)), Some(vec![at(2), at(3)]));
}

#[test]
fn knight_move_crosses_nothing() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1)], at(6), &config(true, false)), Some(vec![at(6)]));
}

#[test]
fn repeat_disabled_rejects_revisit() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1), at(2)], at(1), &config(false, false)), None);
}

#[test]
fn repeat_enabled_allows_revisit() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1), at(2)], at(1), &config(false, true)), Some(vec![at(1)]));
}

#[test]
fn repeat_enabled_rejects_consecutive_duplicate() {
    let anchors = grid();
    assert_eq!(pick(&anchors, &[at(1), at(2)], at(2), &config(true, true)), None);
}
