//! Input model: pointer events and the interaction state they drive.
//!
//! Host platforms map their native mouse/touch events onto the four
//! [`PointerEvent`] kinds. [`InteractionState`] is the complete mutable state
//! of the pointer state machine. The engine computes a fresh value for every
//! transition and swaps it in whole, so a transition is always observable as a
//! before/after pair.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Location;
use crate::style::LineStatus;

/// A pointer event in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press (mouse down / touch start).
    Start(Location),
    /// Pointer moved (mouse move / touch move).
    Move(Location),
    /// Release (mouse up / touch end).
    End,
    /// Pointer left the surface. Handled exactly like [`PointerEvent::End`].
    Leave,
}

/// Which selection callback a pick reports through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// The pick that begins a drag.
    Start,
    /// Every later pick of the same drag.
    Move,
}

/// Drag phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag began on an anchor and has not ended.
    Dragging {
        /// Latest raw pointer location, the free end of the live line.
        pointer: Location,
    },
}

/// Complete interaction state: phase, freeze flag, selection and line status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub phase: Phase,
    /// While set, every pointer event is ignored.
    pub frozen: bool,
    /// Indices into the anchor list, in visit order.
    pub selection: Vec<usize>,
    /// Status shared by all connecting lines and arrows.
    pub line_status: LineStatus,
}

impl InteractionState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The live pointer location while dragging.
    #[must_use]
    pub fn pointer(&self) -> Option<Location> {
        match self.phase {
            Phase::Idle => None,
            Phase::Dragging { pointer } => Some(pointer),
        }
    }

    /// Index of the most recently selected anchor.
    #[must_use]
    pub fn last_selected(&self) -> Option<usize> {
        self.selection.last().copied()
    }

    /// The resting state after a reset, keeping the current phase and freeze flag.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self { phase: self.phase, frozen: self.frozen, selection: Vec::new(), line_status: LineStatus::Normal }
    }
}
