//! Matrix factory: evenly spaced rectangular grids of anchor definitions.
//!
//! Anchors are laid out row-major inside the padded surface. Between two
//! adjacent anchors the gap is `(span - 2 * radius * count) / (count - 1)`,
//! so the first and last anchor of each row/column touch the padding. A single
//! row or column has no gap and is centered in the padded span instead.

#[cfg(test)]
#[path = "matrix_test.rs"]
mod matrix_test;

use serde::{Deserialize, Serialize};

use crate::anchor::{AnchorDefinition, AnchorId};
use crate::geom::Location;

/// Drawing-surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Padding between the grid and the surface edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    /// Same padding on every edge.
    Uniform(f64),
    /// Per-edge padding.
    Edges { top: f64, right: f64, bottom: f64, left: f64 },
}

impl Padding {
    /// `(top, right, bottom, left)`.
    #[must_use]
    pub fn edges(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Uniform(p) => (p, p, p, p),
            Self::Edges { top, right, bottom, left } => (top, right, bottom, left),
        }
    }
}

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSize {
    pub row: u32,
    pub column: u32,
}

/// Radii shared by every generated anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRadii {
    pub anchor_circle_radius: f64,
    pub center_circle_radius: f64,
}

/// Input to [`anchor_matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixOptions {
    pub canvas_size: CanvasSize,
    pub padding: Padding,
    pub matrix: MatrixSize,
    pub anchor: AnchorRadii,
}

/// Grid with ids `"1"`, `"2"`, ... left to right, top to bottom.
#[must_use]
pub fn anchor_matrix(options: &MatrixOptions) -> Vec<AnchorDefinition> {
    let columns = options.matrix.column;
    anchor_matrix_with_ids(options, |row, column| default_id(row, column, columns))
}

/// Row-major counter for 1-based `(row, column)`, computed wide enough for any `u32` grid.
fn default_id(row: u32, column: u32, columns: u32) -> AnchorId {
    (u64::from(row.saturating_sub(1)) * u64::from(columns) + u64::from(column)).to_string()
}

/// Grid whose ids come from `custom_id(row, column)`, both 1-based.
#[must_use]
pub fn anchor_matrix_with_ids<F>(options: &MatrixOptions, custom_id: F) -> Vec<AnchorDefinition>
where
    F: Fn(u32, u32) -> AnchorId,
{
    let MatrixOptions { canvas_size, padding, matrix, anchor } = *options;
    let (top, right, bottom, left) = padding.edges();
    let radius = anchor.anchor_circle_radius;

    let ys = axis_centers(top, canvas_size.height - top - bottom, matrix.row, radius);
    let xs = axis_centers(left, canvas_size.width - left - right, matrix.column, radius);

    let mut defs = Vec::with_capacity(ys.len() * xs.len());
    for (i, &y) in ys.iter().enumerate() {
        for (j, &x) in xs.iter().enumerate() {
            defs.push(AnchorDefinition {
                id: custom_id(ordinal(i), ordinal(j)),
                location: Location::new(x, y),
                arrow: None,
                anchor_circle_radius: anchor.anchor_circle_radius,
                center_circle_radius: anchor.center_circle_radius,
            });
        }
    }
    defs
}

/// Center coordinates of `count` anchors spread over `span` starting at `start`.
fn axis_centers(start: f64, span: f64, count: u32, radius: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start + span / 2.0],
        n => {
            let n_f = f64::from(n);
            let gap = (span - 2.0 * radius * n_f) / (n_f - 1.0);
            (0..n).map(|k| start + radius + f64::from(k) * (2.0 * radius + gap)).collect()
        }
    }
}

/// 1-based ordinal of a loop index bounded by a `u32` count.
fn ordinal(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |i| i + 1)
}
