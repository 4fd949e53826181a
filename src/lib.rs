//! Gesture pattern selector for a 2D drawing surface.
//!
//! A grid of circular anchors is connected by dragging a pointer across them,
//! producing an ordered selection sequence for lock-pattern entry or
//! verification. This crate owns the interaction engine: pointer-state
//! tracking, hit-testing, inference of anchors crossed by a drag, per-status
//! styling and the geometry of the directional arrows. The host wires native
//! input events to the engine and acts on the selection callbacks.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`anchor`] | Anchor definitions and the runtime anchor entity |
//! | [`style`] | Statuses, style tables and the [`style::StyleLookup`] capability |
//! | [`config`] | Behavior configuration and sparse overrides |
//! | [`input`] | Pointer events and the interaction state they drive |
//! | [`hit`] | Hit-testing against anchors |
//! | [`select`] | The selection-update step, including auto-select |
//! | [`render`] | Frame composition and arrowhead geometry |
//! | [`surface`] | Drawing-surface abstraction and the browser canvas backend |
//! | [`matrix`] | Grid factory for anchor definitions |
//! | [`geom`] | Points, distances and line/circle intersection |
//! | [`consts`] | Built-in status names and defaults |

pub mod anchor;
pub mod config;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod matrix;
pub mod render;
pub mod select;
pub mod style;
pub mod surface;

pub use anchor::{Anchor, AnchorDefinition};
pub use engine::{Action, Engine, EngineCore, EngineOptions, Events, StatusError};
pub use geom::Location;
pub use matrix::{MatrixOptions, anchor_matrix, anchor_matrix_with_ids};
pub use surface::{CanvasSurface, Surface, SurfaceError};
