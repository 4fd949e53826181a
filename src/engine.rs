use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use web_sys::HtmlCanvasElement;

use crate::anchor::{Anchor, AnchorDefinition};
use crate::config::{Config, ConfigOverrides};
use crate::geom::Location;
use crate::hit::hit_test;
use crate::input::{InteractionState, Phase, PickMode, PointerEvent};
use crate::matrix::{MatrixOptions, anchor_matrix};
use crate::render::{self, Scene};
use crate::select;
use crate::style::{AnchorStatus, AnchorStyle, LineStatus, LineStyle, StyleError, StyleTables, is_builtin_status};
use crate::surface::{CanvasSurface, Surface, SurfaceError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
///
/// Selection actions carry a snapshot of the selected anchors in visit order,
/// taken when the action was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The first anchor of a new drag was selected.
    Start(Vec<Anchor>),
    /// More anchors joined the selection during a drag.
    Update(Vec<Anchor>),
    /// A drag with a non-empty selection finished.
    End(Vec<Anchor>),
    /// State changed; recompose the frame.
    RenderNeeded,
}

/// Why [`EngineCore::set_status`] refused a status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// Built-in statuses are managed by the engine itself.
    #[error("`{0}` is a built-in status; only extra statuses can be set")]
    BuiltIn(String),
    /// The status has no registered anchor and line style.
    #[error("status `{0}` has no registered anchor and line style")]
    Unregistered(String),
    /// There is nothing to apply the status to.
    #[error("no anchors are selected")]
    EmptySelection,
}

/// Error constructing a browser-backed [`Engine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

fn default_device_pixel_ratio() -> f64 {
    1.0
}

/// Everything needed to build an engine, in the host's JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    pub anchor_defines: Vec<AnchorDefinition>,
    pub anchor_status_styles: HashMap<String, AnchorStyle>,
    pub line_status_styles: HashMap<String, LineStyle>,
    /// Caller-declared statuses beyond the built-ins, e.g. `["error"]`.
    #[serde(default)]
    pub extra_statuses: Vec<String>,
    #[serde(default)]
    pub config: ConfigOverrides,
    /// Handed to [`Surface::scale`] at construction and on every resize.
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

impl EngineOptions {
    /// Parse options from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the style tables against the declared extra statuses.
    ///
    /// # Errors
    ///
    /// See [`StyleTables::new`].
    pub fn style_tables(&self) -> Result<StyleTables, StyleError> {
        StyleTables::new(
            self.anchor_status_styles.clone(),
            self.line_status_styles.clone(),
            self.extra_statuses.iter().cloned(),
        )
    }
}

/// Core engine state: everything that doesn't depend on a drawing surface.
///
/// Separated from [`Engine`] so the pointer state machine, selection rules and
/// status API can be tested without a canvas.
#[derive(Debug, Clone)]
pub struct EngineCore {
    anchors: Vec<Anchor>,
    styles: StyleTables,
    config: Config,
    state: InteractionState,
}

impl EngineCore {
    #[must_use]
    pub fn new(definitions: Vec<AnchorDefinition>, styles: StyleTables, overrides: &ConfigOverrides) -> Self {
        Self {
            anchors: definitions.into_iter().map(Anchor::new).collect(),
            styles,
            config: Config::with_overrides(overrides),
            state: InteractionState::default(),
        }
    }

    /// Build from host options, validating the style tables first.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] if the style tables are incomplete.
    pub fn from_options(options: &EngineOptions) -> Result<Self, StyleError> {
        let styles = options.style_tables()?;
        Ok(Self::new(options.anchor_defines.clone(), styles, &options.config))
    }

    // --- Pointer input ---

    /// Advance the state machine by one pointer event. Frozen engines ignore everything.
    pub fn handle(&mut self, event: PointerEvent) -> Vec<Action> {
        if self.state.frozen {
            return Vec::new();
        }
        match event {
            PointerEvent::Start(pt) => self.on_start(pt),
            PointerEvent::Move(pt) => self.on_move(pt),
            PointerEvent::End | PointerEvent::Leave => self.on_end(),
        }
    }

    pub fn on_pointer_down(&mut self, pt: Location) -> Vec<Action> {
        self.handle(PointerEvent::Start(pt))
    }

    pub fn on_pointer_move(&mut self, pt: Location) -> Vec<Action> {
        self.handle(PointerEvent::Move(pt))
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.handle(PointerEvent::End)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.handle(PointerEvent::Leave)
    }

    fn on_start(&mut self, pt: Location) -> Vec<Action> {
        let hit = hit_test(pt, &self.anchors);
        let mut next = self.state.clone();

        // A press on an anchor starts a fresh pattern.
        if hit.is_some() {
            self.reset_anchor_statuses();
            next = next.cleared();
            next.phase = Phase::Dragging { pointer: pt };
        }

        let mut actions: Vec<Action> = self.pick(&mut next, hit, PickMode::Start).into_iter().collect();
        self.commit(next);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn on_move(&mut self, pt: Location) -> Vec<Action> {
        if !self.state.is_dragging() {
            return Vec::new();
        }
        let mut next = self.state.clone();
        next.phase = Phase::Dragging { pointer: pt };

        let hit = hit_test(pt, &self.anchors);
        let mut actions: Vec<Action> = self.pick(&mut next, hit, PickMode::Move).into_iter().collect();
        self.commit(next);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn on_end(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.state.is_dragging() && !self.state.selection.is_empty() {
            actions.push(Action::End(self.snapshot(&self.state.selection)));
        }
        self.commit(InteractionState { phase: Phase::Idle, ..self.state.clone() });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Run the selection-update step for `hit` against `next`.
    fn pick(&mut self, next: &mut InteractionState, hit: Option<usize>, mode: PickMode) -> Option<Action> {
        let appended = select::pick(&self.anchors, &next.selection, hit?, &self.config)?;
        for &i in &appended {
            if let Some(anchor) = self.anchors.get_mut(i) {
                anchor.set_status(AnchorStatus::Selected);
            }
        }
        next.selection.extend(appended);

        let snapshot = self.snapshot(&next.selection);
        Some(match mode {
            PickMode::Start => Action::Start(snapshot),
            PickMode::Move => Action::Update(snapshot),
        })
    }

    fn commit(&mut self, next: InteractionState) {
        if next.is_dragging() != self.state.is_dragging() {
            debug!(dragging = next.is_dragging(), selected = next.selection.len(), "drag phase changed");
        }
        self.state = next;
    }

    fn snapshot(&self, selection: &[usize]) -> Vec<Anchor> {
        selection.iter().filter_map(|&i| self.anchors.get(i)).cloned().collect()
    }

    fn reset_anchor_statuses(&mut self) {
        for anchor in &mut self.anchors {
            anchor.set_status(AnchorStatus::NotSelected);
        }
    }

    // --- Status / lifecycle ---

    /// Move the whole selection and the line status into the extra status `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] without changing anything if `tag` is built-in,
    /// not registered, or there is no selection.
    pub fn set_status(&mut self, tag: &str) -> Result<Vec<Action>, StatusError> {
        if is_builtin_status(tag) {
            return Err(StatusError::BuiltIn(tag.to_owned()));
        }
        let extra = match self.styles.extra(tag) {
            Some(extra) if self.styles.has_anchor_style(tag) && self.styles.has_line_style(tag) => extra.clone(),
            _ => return Err(StatusError::Unregistered(tag.to_owned())),
        };
        if self.state.selection.is_empty() {
            return Err(StatusError::EmptySelection);
        }

        for &i in &self.state.selection {
            if let Some(anchor) = self.anchors.get_mut(i) {
                anchor.set_status(AnchorStatus::Extra(extra.clone()));
            }
        }
        self.commit(InteractionState { line_status: LineStatus::Extra(extra), ..self.state.clone() });
        Ok(vec![Action::RenderNeeded])
    }

    /// Clear the selection and return every anchor to `NotSelected`.
    pub fn reset(&mut self) -> Vec<Action> {
        self.reset_anchor_statuses();
        self.commit(self.state.cleared());
        vec![Action::RenderNeeded]
    }

    /// Ignore all pointer input until [`EngineCore::unfreeze`].
    pub fn freeze(&mut self) {
        self.commit(InteractionState { frozen: true, ..self.state.clone() });
    }

    pub fn unfreeze(&mut self) {
        self.commit(InteractionState { frozen: false, ..self.state.clone() });
    }

    /// Replace the anchor set, carrying statuses and the selection over by id.
    ///
    /// Selected anchors whose id is gone are dropped from the selection.
    pub fn resize(&mut self, definitions: Vec<AnchorDefinition>, overrides: Option<&ConfigOverrides>) -> Vec<Action> {
        if let Some(overrides) = overrides {
            overrides.apply(&mut self.config);
        }

        let old = std::mem::take(&mut self.anchors);
        let anchors: Vec<Anchor> = definitions
            .into_iter()
            .map(|def| {
                let mut anchor = Anchor::new(def);
                if let Some(prev) = old.iter().find(|prev| prev.id() == anchor.id()) {
                    anchor.set_status(prev.status().clone());
                }
                anchor
            })
            .collect();

        let selection: Vec<usize> = self
            .state
            .selection
            .iter()
            .filter_map(|&i| old.get(i))
            .filter_map(|prev| anchors.iter().position(|a| a.id() == prev.id()))
            .collect();

        debug!(
            anchors = anchors.len(),
            selected = selection.len(),
            dropped = self.state.selection.len() - selection.len(),
            "anchors rebuilt"
        );
        self.anchors = anchors;
        self.commit(InteractionState { selection, ..self.state.clone() });
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Snapshot of the selected anchors in visit order.
    #[must_use]
    pub fn selection(&self) -> Vec<Anchor> {
        self.snapshot(&self.state.selection)
    }

    /// Ids of the selected anchors in visit order.
    #[must_use]
    pub fn selection_ids(&self) -> Vec<&str> {
        self.state.selection.iter().filter_map(|&i| self.anchors.get(i)).map(Anchor::id).collect()
    }

    /// Look up an anchor by id.
    #[must_use]
    pub fn anchor(&self, id: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id() == id)
    }

    #[must_use]
    pub fn line_status(&self) -> &LineStatus {
        &self.state.line_status
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn styles(&self) -> &StyleTables {
        &self.styles
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.state.frozen
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Borrowed view handed to the frame composer.
    #[must_use]
    pub fn scene(&self) -> Scene<'_, StyleTables> {
        Scene { anchors: &self.anchors, state: &self.state, config: &self.config, styles: &self.styles }
    }
}

/// Selection callback. Receives the selected anchors in visit order and a
/// [`Control`] for calling back into the engine.
pub type Callback = Box<dyn FnMut(&[Anchor], &mut Control<'_>)>;

/// Optional callbacks fired by [`Engine`].
#[derive(Default)]
pub struct Events {
    pub start: Option<Callback>,
    pub update: Option<Callback>,
    pub end: Option<Callback>,
}

impl Events {
    #[must_use]
    pub fn on_start(mut self, f: impl FnMut(&[Anchor], &mut Control<'_>) + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_update(mut self, f: impl FnMut(&[Anchor], &mut Control<'_>) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_end(mut self, f: impl FnMut(&[Anchor], &mut Control<'_>) + 'static) -> Self {
        self.end = Some(Box::new(f));
        self
    }
}

/// Engine access from inside a callback.
///
/// Changes apply to the core immediately. The actions they produce are queued
/// and run by [`Engine`] after the callback returns, so a pattern can be
/// checked and marked from the `end` callback:
///
/// ```ignore
/// Events::default().on_end(|anchors, ctl| {
///     if !matches_stored_pattern(anchors) && ctl.set_status("error").is_err() {
///         ctl.reset();
///     }
/// });
/// ```
pub struct Control<'a> {
    core: &'a mut EngineCore,
    pending: Vec<Action>,
}

impl Control<'_> {
    #[must_use]
    pub fn core(&self) -> &EngineCore {
        self.core
    }

    /// See [`EngineCore::set_status`].
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] when the status cannot be applied; nothing changes.
    pub fn set_status(&mut self, tag: &str) -> Result<(), StatusError> {
        match self.core.set_status(tag) {
            Ok(actions) => {
                self.pending.extend(actions);
                Ok(())
            }
            Err(e) => {
                warn!(status = tag, error = %e, "set_status ignored");
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        let actions = self.core.reset();
        self.pending.extend(actions);
    }

    pub fn freeze(&mut self) {
        self.core.freeze();
    }

    pub fn unfreeze(&mut self) {
        self.core.unfreeze();
    }
}

/// The full engine. Wraps [`EngineCore`] and owns the drawing surface.
///
/// Every state change recomposes the frame synchronously; callbacks fire in
/// the same turn, before the redraw.
pub struct Engine<S> {
    surface: S,
    core: EngineCore,
    events: Events,
    device_pixel_ratio: f64,
}

impl<S: Surface> Engine<S> {
    /// Build an engine over `surface` and draw the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] if the style tables are incomplete.
    pub fn new(surface: S, options: &EngineOptions, events: Events) -> Result<Self, StyleError> {
        let core = EngineCore::from_options(options)?;
        Ok(Self::with_core(surface, core, events, options.device_pixel_ratio))
    }

    /// Wrap an existing core, scale the surface and draw the first frame.
    pub fn with_core(surface: S, core: EngineCore, events: Events, device_pixel_ratio: f64) -> Self {
        let mut engine = Self { surface, core, events, device_pixel_ratio };
        engine.apply_scale();
        engine.render();
        engine
    }

    // --- Input events ---

    pub fn handle(&mut self, event: PointerEvent) {
        let actions = self.core.handle(event);
        self.dispatch(actions);
    }

    pub fn on_pointer_down(&mut self, pt: Location) {
        self.handle(PointerEvent::Start(pt));
    }

    pub fn on_pointer_move(&mut self, pt: Location) {
        self.handle(PointerEvent::Move(pt));
    }

    pub fn on_pointer_up(&mut self) {
        self.handle(PointerEvent::End);
    }

    pub fn on_pointer_leave(&mut self) {
        self.handle(PointerEvent::Leave);
    }

    // --- Status / lifecycle ---

    /// See [`EngineCore::set_status`]. Rejections are logged and returned.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] when the status cannot be applied; nothing changes.
    pub fn set_status(&mut self, tag: &str) -> Result<(), StatusError> {
        match self.core.set_status(tag) {
            Ok(actions) => {
                self.dispatch(actions);
                Ok(())
            }
            Err(e) => {
                warn!(status = tag, error = %e, "set_status ignored");
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        let actions = self.core.reset();
        self.dispatch(actions);
    }

    pub fn freeze(&mut self) {
        self.core.freeze();
        debug!("input frozen");
    }

    pub fn unfreeze(&mut self) {
        self.core.unfreeze();
        debug!("input unfrozen");
    }

    /// Rebuild the anchors for a resized surface. The host has already resized
    /// the surface itself; the device-pixel scale is reapplied here.
    pub fn resize(&mut self, definitions: Vec<AnchorDefinition>, overrides: Option<&ConfigOverrides>) {
        self.apply_scale();
        let actions = self.core.resize(definitions, overrides);
        self.dispatch(actions);
    }

    /// Grid factory; see [`anchor_matrix`].
    #[must_use]
    pub fn anchor_matrix(options: &MatrixOptions) -> Vec<AnchorDefinition> {
        anchor_matrix(options)
    }

    // --- Render ---

    /// Draw the current state. Surface failures are logged, never raised.
    pub fn render(&mut self) {
        if let Err(e) = render::draw(&mut self.surface, &self.core.scene()) {
            error!(error = %e, "frame composition failed");
        }
    }

    fn apply_scale(&mut self) {
        if let Err(e) = self.surface.scale(self.device_pixel_ratio) {
            error!(error = %e, ratio = self.device_pixel_ratio, "surface scale failed");
        }
    }

    /// Run actions in order. Callback actions may queue more actions; a redraw
    /// is skipped when another one is still queued behind it.
    fn dispatch(&mut self, actions: Vec<Action>) {
        let mut queue = VecDeque::from(actions);
        while let Some(action) = queue.pop_front() {
            let nested = match action {
                Action::Start(anchors) => fire(self.events.start.as_mut(), &anchors, &mut self.core),
                Action::Update(anchors) => fire(self.events.update.as_mut(), &anchors, &mut self.core),
                Action::End(anchors) => fire(self.events.end.as_mut(), &anchors, &mut self.core),
                Action::RenderNeeded => {
                    if !queue.iter().any(|a| matches!(a, Action::RenderNeeded)) {
                        self.render();
                    }
                    continue;
                }
            };
            queue.extend(nested);
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn selection(&self) -> Vec<Anchor> {
        self.core.selection()
    }
}

impl Engine<CanvasSurface> {
    /// Build an engine drawing on a browser canvas the host already attached and sized.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Surface`] if the canvas yields no 2D context and
    /// [`EngineError::Style`] if the style tables are incomplete.
    pub fn from_canvas(canvas: HtmlCanvasElement, options: &EngineOptions, events: Events) -> Result<Self, EngineError> {
        let surface = CanvasSurface::new(canvas)?;
        Ok(Self::new(surface, options, events)?)
    }
}

fn fire(callback: Option<&mut Callback>, anchors: &[Anchor], core: &mut EngineCore) -> Vec<Action> {
    let Some(callback) = callback else {
        return Vec::new();
    };
    let mut control = Control { core, pending: Vec::new() };
    callback(anchors, &mut control);
    control.pending
}
