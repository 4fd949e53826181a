//! Selection-update step: which anchors a newly hit anchor appends.
//!
//! Given the current selection (indices into the anchor list) and a hit, the
//! step either rejects the hit or returns the indices to append in order:
//! first any anchors the straight segment from the last selection crosses
//! (when auto-select is on), closest first, then the hit itself.

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;

use crate::anchor::Anchor;
use crate::config::Config;
use crate::geom::{Circle, Segment, distance, segment_intersects_circle};

/// Whether `candidate` may be appended to `selection`.
///
/// Without repeat-select an anchor may appear once. With it, only an
/// immediate repeat of the last entry is refused.
#[must_use]
pub fn can_select(selection: &[usize], candidate: usize, repeat: bool) -> bool {
    if repeat {
        selection.last() != Some(&candidate)
    } else {
        !selection.contains(&candidate)
    }
}

/// Indices to append for a hit on `hit`, or `None` if the hit is rejected.
#[must_use]
pub fn pick(anchors: &[Anchor], selection: &[usize], hit: usize, config: &Config) -> Option<Vec<usize>> {
    let repeat = config.anchor_repeat_select;
    if hit >= anchors.len() || !can_select(selection, hit, repeat) {
        return None;
    }

    let mut appended = match selection.last() {
        Some(&last) if config.line_auto_select => crossed(anchors, selection, last, hit, repeat),
        _ => Vec::new(),
    };
    appended.push(hit);
    Some(appended)
}

/// Anchors crossed by the segment `from -> to`, ordered by distance from `from`.
fn crossed(anchors: &[Anchor], selection: &[usize], from: usize, to: usize, repeat: bool) -> Vec<usize> {
    let origin = anchors[from].location();
    let segment = Segment { start: origin, end: anchors[to].location() };

    let mut found: Vec<(usize, f64)> = anchors
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != from && i != to)
        .filter(|&(i, _)| repeat || !selection.contains(&i))
        .filter(|(_, anchor)| {
            segment_intersects_circle(
                segment,
                Circle { center: anchor.location(), radius: anchor.anchor_circle_radius() },
            )
        })
        .map(|(i, anchor)| (i, distance(origin, anchor.location())))
        .collect();

    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found.into_iter().map(|(i, _)| i).collect()
}
