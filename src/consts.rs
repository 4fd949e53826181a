//! Shared constants for the gesture engine.

// ── Status names ────────────────────────────────────────────────

/// Style-table key for anchors that are not part of the selection.
pub const STATUS_NOT_SELECTED: &str = "not-selected";

/// Style-table key for anchors in the current selection.
pub const STATUS_SELECTED: &str = "selected";

/// Style-table key for connecting lines before any extra status is applied.
pub const STATUS_NORMAL: &str = "normal";

// ── Arrow defaults ──────────────────────────────────────────────

/// Radius of the auxiliary circle that shapes each arrowhead.
pub const DEFAULT_ARROW_SIZE: f64 = 5.0;

/// Offset of the arrowhead from the starting anchor's center.
pub const DEFAULT_ARROW_DISTANCE: f64 = 16.0;

// ── Shadows ─────────────────────────────────────────────────────

/// Shadow color meaning "no shadow".
pub const SHADOW_NONE_COLOR: &str = "transparent";
