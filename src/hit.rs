#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::anchor::Anchor;
use crate::geom::{Location, distance};

/// Index of the first anchor whose outer circle strictly contains `pt`.
///
/// Overlapping anchors resolve to definition order. A point exactly on the
/// outer radius is not a hit.
#[must_use]
pub fn hit_test(pt: Location, anchors: &[Anchor]) -> Option<usize> {
    anchors
        .iter()
        .position(|anchor| distance(pt, anchor.location()) < anchor.anchor_circle_radius())
}
