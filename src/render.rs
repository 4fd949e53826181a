//! Frame composition: draws the full pattern scene onto a [`Surface`].
//!
//! Layers, bottom first:
//! 1. clear
//! 2. connecting lines and the live pointer line (unless lines cover anchors)
//! 3. every anchor
//! 4. connecting lines and the live pointer line (if lines cover anchors)
//! 5. arrowheads, always on top
//!
//! This module reads engine state and produces draw calls. It never mutates
//! application state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::anchor::Anchor;
use crate::config::Config;
use crate::geom::{Intersections, Location, distance, line_circle_intersections};
use crate::input::InteractionState;
use crate::style::{LineStyle, StyleLookup};
use crate::surface::{Surface, SurfaceError};

/// The three corners of an arrowhead triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub tip: Location,
    pub left: Location,
    pub right: Location,
}

impl ArrowHead {
    #[must_use]
    pub fn points(&self) -> [Location; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Everything a frame needs, borrowed from the engine.
pub struct Scene<'a, L: StyleLookup + ?Sized> {
    pub anchors: &'a [Anchor],
    pub state: &'a InteractionState,
    pub config: &'a Config,
    pub styles: &'a L,
}

/// Draw one full frame.
///
/// # Errors
///
/// Returns the first [`SurfaceError`] raised by the surface.
pub fn draw<S, L>(surface: &mut S, scene: &Scene<'_, L>) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
    L: StyleLookup + ?Sized,
{
    surface.clear()?;

    let line_style = scene.styles.line_style(&scene.state.line_status);
    let cover = scene.config.line_cover_anchor;

    if !cover {
        draw_lines(surface, scene, line_style)?;
    }
    for anchor in scene.anchors {
        anchor.render(surface, scene.styles)?;
    }
    if cover {
        draw_lines(surface, scene, line_style)?;
    }

    if scene.config.arrow.show {
        if let Some(style) = line_style {
            draw_arrows(surface, scene, style)?;
        }
    }
    Ok(())
}

/// Locations of the selected anchors, in selection order.
fn selected_locations<L: StyleLookup + ?Sized>(scene: &Scene<'_, L>) -> Vec<Location> {
    scene
        .state
        .selection
        .iter()
        .filter_map(|&i| scene.anchors.get(i))
        .map(Anchor::location)
        .collect()
}

fn draw_lines<S, L>(surface: &mut S, scene: &Scene<'_, L>, style: Option<&LineStyle>) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
    L: StyleLookup + ?Sized,
{
    let Some(style) = style else {
        return Ok(());
    };
    let points = selected_locations(scene);

    for pair in points.windows(2) {
        surface.stroke_path(pair, style.line_width, &style.line_color)?;
    }

    if let (Some(pointer), Some(&last)) = (scene.state.pointer(), points.last()) {
        surface.stroke_path(&[last, pointer], style.line_width, &style.line_color)?;
    }
    Ok(())
}

fn draw_arrows<S, L>(surface: &mut S, scene: &Scene<'_, L>, style: &LineStyle) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
    L: StyleLookup + ?Sized,
{
    for pair in scene.state.selection.windows(2) {
        let (Some(from), Some(to)) = (scene.anchors.get(pair[0]), scene.anchors.get(pair[1])) else {
            continue;
        };
        let over = from.arrow().unwrap_or_default();
        let dist = over.distance.unwrap_or(scene.config.arrow.distance);
        let size = over.size.unwrap_or(scene.config.arrow.size);

        if let Some(head) = arrow_head(from.location(), to.location(), dist, size) {
            surface.fill_path(&head.points(), &style.line_color)?;
        }
    }
    Ok(())
}

/// Arrowhead on the segment `from -> to`.
///
/// An auxiliary circle of radius `size` is centered `distance` units from
/// `from` toward `to`. The tip sits `size` units further along; the back
/// corners are where the perpendicular through the circle center meets the
/// circle. Vertical and horizontal segments use closed forms; every other
/// direction goes through [`line_circle_intersections`], and if that solve
/// does not return two points both corners collapse to the origin.
///
/// Returns `None` when `from == to` (no direction).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn arrow_head(from: Location, to: Location, distance_from: f64, size: f64) -> Option<ArrowHead> {
    let d = distance(from, to);
    if d == 0.0 {
        return None;
    }
    let ux = (to.x - from.x) / d;
    let uy = (to.y - from.y) / d;

    let center = Location::new(distance_from.mul_add(ux, from.x), distance_from.mul_add(uy, from.y));
    let reach = distance_from + size;
    let tip = Location::new(reach.mul_add(ux, from.x), reach.mul_add(uy, from.y));

    let (left, right) = if from.x == to.x {
        (Location::new(center.x - size, center.y), Location::new(center.x + size, center.y))
    } else if from.y == to.y {
        (Location::new(center.x, center.y - size), Location::new(center.x, center.y + size))
    } else {
        let slope = (to.y - from.y) / (to.x - from.x);
        let perp = -1.0 / slope;
        let intercept = center.y - perp * center.x;
        match line_circle_intersections(perp, intercept, center, size) {
            Intersections::Secant(a, b) => (a, b),
            Intersections::Tangent(_) | Intersections::None => (Location::ORIGIN, Location::ORIGIN),
        }
    };

    Some(ArrowHead { tip, left, right })
}
