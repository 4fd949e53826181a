//! Drawing-surface abstraction and its browser implementation.
//!
//! The engine never creates or sizes a canvas. It draws through [`Surface`],
//! which the host supplies already attached and sized. [`CanvasSurface`] is the
//! stock implementation over a `CanvasRenderingContext2d`. The pointer helpers
//! at the bottom translate DOM mouse and touch events into surface-local
//! [`Location`]s.
//!
//! All fallible Canvas2D calls map their `JsValue` error into
//! [`SurfaceError::Js`] and propagate it.

#[cfg(test)]
#[path = "surface_test.rs"]
pub(crate) mod surface_test;

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::geom::Location;
use crate::style::Shadow;

/// Error raised by a drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The canvas refused to hand out a 2D context.
    #[error("unable to obtain a 2d rendering context")]
    ContextUnavailable,
    /// A Canvas2D call failed.
    #[error("canvas call failed: {0}")]
    Js(String),
}

impl From<JsValue> for SurfaceError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

/// Minimal drawing capability required by the engine.
pub trait Surface {
    /// Clear the whole surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Set the device-pixel scale. Calling twice with the same ratio is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call.
    fn scale(&mut self, ratio: f64) -> Result<(), SurfaceError>;

    /// Shadow applied to subsequent strokes and fills.
    fn set_shadow(&mut self, shadow: &Shadow);

    /// Stroke a circle outline.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call (e.g. a negative radius).
    fn stroke_circle(&mut self, center: Location, radius: f64, width: f64, color: &str) -> Result<(), SurfaceError>;

    /// Fill a circle.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call (e.g. a negative radius).
    fn fill_circle(&mut self, center: Location, radius: f64, color: &str) -> Result<(), SurfaceError>;

    /// Stroke an open polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call.
    fn stroke_path(&mut self, points: &[Location], width: f64, color: &str) -> Result<(), SurfaceError>;

    /// Fill the closed polygon through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the backend rejects the call.
    fn fill_path(&mut self, points: &[Location], color: &str) -> Result<(), SurfaceError>;
}

/// [`Surface`] over a browser canvas element.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ContextUnavailable`] if the canvas has no 2D
    /// context, or [`SurfaceError::Js`] if the lookup itself throws.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    /// The underlying canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace(&self, points: &[Location]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x, p.y);
            } else {
                self.ctx.line_to(p.x, p.y);
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.ctx.clear_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        Ok(())
    }

    fn scale(&mut self, ratio: f64) -> Result<(), SurfaceError> {
        self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)?;
        Ok(())
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ctx.set_shadow_color(&shadow.color);
        self.ctx.set_shadow_blur(shadow.blur);
        self.ctx.set_shadow_offset_x(shadow.offset_x);
        self.ctx.set_shadow_offset_y(shadow.offset_y);
    }

    fn stroke_circle(&mut self, center: Location, radius: f64, width: f64, color: &str) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_circle(&mut self, center: Location, radius: f64, color: &str) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_path(&mut self, points: &[Location], width: f64, color: &str) -> Result<(), SurfaceError> {
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(color);
        self.trace(points);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_path(&mut self, points: &[Location], color: &str) -> Result<(), SurfaceError> {
        self.trace(points);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }
}

// =============================================================
// Pointer translation
// =============================================================

/// Surface-local location of a mouse event.
#[must_use]
pub fn mouse_location(ev: &MouseEvent, canvas: &HtmlCanvasElement) -> Location {
    let rect = canvas.get_bounding_client_rect();
    Location::new(f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top())
}

/// Surface-local location of the first changed touch, if the event has one.
#[must_use]
pub fn touch_location(ev: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<Location> {
    let touch = ev.changed_touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some(Location::new(f64::from(touch.page_x()) - rect.left(), f64::from(touch.page_y()) - rect.top()))
}
