//! Plane geometry used by hit-testing, auto-select and arrow construction.
//!
//! Everything here is pure and allocation-free. Coordinates are surface-local
//! CSS pixels with `y` growing downward, matching the drawing surface.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin, used as the collapse point for degenerate arrow corners.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
}

/// A straight segment between two locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Location,
    pub end: Location,
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Location,
    pub radius: f64,
}

/// Result of intersecting an infinite line with a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersections {
    /// The line misses the circle.
    None,
    /// The line touches the circle at exactly one point.
    Tangent(Location),
    /// The line crosses the circle. The two points are in solver order
    /// (`+sqrt` root first), not sorted.
    Secant(Location, Location),
}

/// Euclidean distance between two locations.
#[must_use]
pub fn distance(a: Location, b: Location) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Intersect the line `y = slope * x + intercept` with the circle of radius
/// `radius` centered at `center`.
///
/// Substituting the line into `(x - cx)^2 + (y - cy)^2 = r^2` gives
/// `A x^2 + B x + C = 0` with `A = k^2 + 1`, `B = 2 (k b - k cy - cx)` and
/// `C = cx^2 + cy^2 + b^2 - r^2 - 2 b cy`. The sign of the discriminant picks
/// the variant.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn line_circle_intersections(slope: f64, intercept: f64, center: Location, radius: f64) -> Intersections {
    let (k, b) = (slope, intercept);
    let (cx, cy) = (center.x, center.y);

    let qa = k.mul_add(k, 1.0);
    let qb = 2.0 * (k * b - k * cy - cx);
    let qc = cx * cx + cy * cy + b * b - radius * radius - 2.0 * b * cy;

    let delta = qb * qb - 4.0 * qa * qc;
    if delta < 0.0 {
        return Intersections::None;
    }
    if delta == 0.0 {
        let x = -qb / (2.0 * qa);
        return Intersections::Tangent(Location::new(x, k.mul_add(x, b)));
    }

    let root = delta.sqrt();
    let x1 = (-qb + root) / (2.0 * qa);
    let x2 = (-qb - root) / (2.0 * qa);
    Intersections::Secant(Location::new(x1, k.mul_add(x1, b)), Location::new(x2, k.mul_add(x2, b)))
}

/// Whether `segment` passes through `circle`.
///
/// The circle center is projected onto the line through the segment. If the
/// projection parameter falls outside `[0, 1]` the answer is `false`, even when
/// an endpoint itself lies inside the circle. Otherwise the squared distance
/// from the projected point to the center is compared against `radius^2`
/// (inclusive). A zero-length segment never intersects.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn segment_intersects_circle(segment: Segment, circle: Circle) -> bool {
    let dx = segment.end.x - segment.start.x;
    let dy = segment.end.y - segment.start.y;
    let length_sq = dx.mul_add(dx, dy * dy);
    if length_sq == 0.0 {
        return false;
    }

    let to_center_x = circle.center.x - segment.start.x;
    let to_center_y = circle.center.y - segment.start.y;
    let t = dx.mul_add(to_center_x, dy * to_center_y) / length_sq;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let px = t.mul_add(dx, segment.start.x);
    let py = t.mul_add(dy, segment.start.y);
    let dist_sq = (px - circle.center.x).powi(2) + (py - circle.center.y).powi(2);
    dist_sq <= circle.radius * circle.radius
}
