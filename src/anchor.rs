//! Anchors: the selectable circular nodes of the pattern grid.
//!
//! An [`AnchorDefinition`] is immutable host input. The engine turns each one
//! into an [`Anchor`], which adds a mutable [`AnchorStatus`]. Anchors hold no
//! reference back to the engine; [`Anchor::render`] receives a
//! [`StyleLookup`] for the duration of the draw.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use serde::{Deserialize, Serialize};

use crate::geom::Location;
use crate::style::{AnchorStatus, CircleStyle, Shadow, StyleLookup};
use crate::surface::{Surface, SurfaceError};

/// Unique anchor identifier within one definition set.
pub type AnchorId = String;

/// Per-anchor arrow override for pairs starting at this anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorArrow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Host-supplied description of one anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorDefinition {
    pub id: AnchorId,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<AnchorArrow>,
    pub anchor_circle_radius: f64,
    pub center_circle_radius: f64,
}

/// Runtime anchor: static geometry plus current status.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    id: AnchorId,
    location: Location,
    arrow: Option<AnchorArrow>,
    anchor_circle_radius: f64,
    center_circle_radius: f64,
    status: AnchorStatus,
}

impl Anchor {
    /// A `NotSelected` anchor with the geometry of `def`.
    #[must_use]
    pub fn new(def: AnchorDefinition) -> Self {
        Self {
            id: def.id,
            location: def.location,
            arrow: def.arrow,
            anchor_circle_radius: def.anchor_circle_radius,
            center_circle_radius: def.center_circle_radius,
            status: AnchorStatus::NotSelected,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn arrow(&self) -> Option<AnchorArrow> {
        self.arrow
    }

    /// Radius of the outer circle; also the hit radius.
    #[must_use]
    pub fn anchor_circle_radius(&self) -> f64 {
        self.anchor_circle_radius
    }

    #[must_use]
    pub fn center_circle_radius(&self) -> f64 {
        self.center_circle_radius
    }

    #[must_use]
    pub fn status(&self) -> &AnchorStatus {
        &self.status
    }

    /// Assign a status. No validation happens here.
    pub fn set_status(&mut self, status: AnchorStatus) {
        self.status = status;
    }

    /// Draw the outer circle, then the center circle, in the style of the
    /// current status. A status with no style draws nothing.
    ///
    /// # Errors
    ///
    /// Propagates the first failing surface call.
    pub fn render<S, L>(&self, surface: &mut S, styles: &L) -> Result<(), SurfaceError>
    where
        S: Surface + ?Sized,
        L: StyleLookup + ?Sized,
    {
        let Some(style) = styles.anchor_style(&self.status) else {
            return Ok(());
        };
        draw_circle(surface, self.location, self.anchor_circle_radius, &style.anchor_circle)?;
        draw_circle(surface, self.location, self.center_circle_radius, &style.center_circle)
    }
}

/// Draw one circle: border inset by half its width, fill inset by the full
/// border width. The shadow covers only these calls.
fn draw_circle<S>(surface: &mut S, center: Location, radius: f64, style: &CircleStyle) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
{
    if !style.is_visible() {
        return Ok(());
    }

    surface.set_shadow(&style.shadow());
    let drawn = stroke_and_fill(surface, center, radius, style);
    surface.set_shadow(&Shadow::none());
    drawn
}

fn stroke_and_fill<S>(surface: &mut S, center: Location, radius: f64, style: &CircleStyle) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
{
    let inset = style.inset();
    if let Some((width, color)) = style.border() {
        surface.stroke_circle(center, radius - inset / 2.0, width, color)?;
    }
    if let Some(color) = style.fill() {
        surface.fill_circle(center, radius - inset, color)?;
    }
    Ok(())
}
