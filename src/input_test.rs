use super::*;
use crate::style::ExtraStatus;

fn dragging_at(x: f64, y: f64) -> InteractionState {
    InteractionState { phase: Phase::Dragging { pointer: Location::new(x, y) }, ..Default::default() }
}

// =============================================================
// InteractionState defaults
// =============================================================

#[test]
fn default_state_is_idle_and_empty() {
    let state = InteractionState::default();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.frozen);
    assert!(state.selection.is_empty());
    assert_eq!(state.line_status, LineStatus::Normal);
    assert!(!state.is_dragging());
    assert!(state.pointer().is_none());
}

#[test]
fn dragging_exposes_pointer() {
    let state = dragging_at(3.0, 4.0);
    assert!(state.is_dragging());
    assert_eq!(state.pointer(), Some(Location::new(3.0, 4.0)));
}

#[test]
fn last_selected_is_tail_of_selection() {
    let state = InteractionState { selection: vec![4, 1, 7], ..Default::default() };
    assert_eq!(state.last_selected(), Some(7));
    assert_eq!(InteractionState::default().last_selected(), None);
}

// =============================================================
// cleared
// =============================================================

#[test]
fn cleared_drops_selection_and_line_status() {
    let state = InteractionState {
        selection: vec![0, 1],
        line_status: LineStatus::Extra(ExtraStatus::new("error")),
        ..dragging_at(1.0, 1.0)
    };
    let next = state.cleared();
    assert!(next.selection.is_empty());
    assert_eq!(next.line_status, LineStatus::Normal);
}

#[test]
fn cleared_keeps_phase_and_freeze() {
    let state = InteractionState { frozen: true, selection: vec![2], ..dragging_at(5.0, 6.0) };
    let next = state.cleared();
    assert!(next.frozen);
    assert_eq!(next.phase, state.phase);
}

// =============================================================
// PointerEvent
// =============================================================

#[test]
fn pointer_events_carry_locations() {
    let start = PointerEvent::Start(Location::new(1.0, 2.0));
    assert!(matches!(start, PointerEvent::Start(p) if p == Location::new(1.0, 2.0)));
    assert_ne!(PointerEvent::End, PointerEvent::Leave);
}

#[test]
fn pick_modes_distinct() {
    assert_ne!(PickMode::Start, PickMode::Move);
}
