//! The editing session: one object owning every piece of editor state.
//!
//! The presentation layer holds an `EditingSession`, feeds it input
//! events, and renders `snapshot()`. Programmatic calls (property panels,
//! host code) go through the methods here and report errors; pointer and
//! keyboard input goes through `handle`, which never does.

use kurbo::{Point, Size, Vec2};
use serde::Serialize;
use smallvec::SmallVec;
use vb_core::config::EditorConfig;
use vb_core::error::{EditorError, EditorResult};
use vb_core::hit::hit_test_all;
use vb_core::id::ElementId;
use vb_core::model::{CanvasElement, ElementContent, ElementPatch};
use vb_core::selection::Selection;
use vb_core::store::{EditSource, ElementStore};
use vb_core::viewport::{ViewportController, ViewportState};

use crate::commands::{EditState, History};
use crate::interaction::Interaction;

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Visible and hidden elements, in paint order.
    pub elements: Vec<CanvasElement>,
    pub viewport: ViewportState,
    pub selection: Option<ElementId>,
    pub interaction: Interaction,
    /// Store revision this snapshot was taken at.
    pub revision: u64,
}

#[derive(Debug)]
pub struct EditingSession {
    pub(crate) config: EditorConfig,
    pub(crate) store: ElementStore,
    pub(crate) selection: Selection,
    pub(crate) viewport: ViewportController,
    pub(crate) interaction: Interaction,
    pub(crate) history: History,
    /// Space is held: primary drags pan.
    pub(crate) pan_key_held: bool,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl EditingSession {
    /// Create a session, rejecting an invalid config.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::new(),
            selection: Selection::new(),
            viewport: ViewportController::new(&config),
            interaction: Interaction::Idle,
            history: History::new(config.history_depth),
            pan_key_held: false,
            config,
        }
    }

    /// Replace the canvas with `elements` (e.g. a saved document).
    ///
    /// Resets selection, gesture and history. On a duplicate id nothing
    /// is replaced.
    pub fn load(&mut self, elements: Vec<CanvasElement>) -> EditorResult<()> {
        let mut store = ElementStore::new();
        for element in elements {
            store.add(element)?;
        }
        log::debug!("loaded {} elements", store.len());
        // Keep the revision counter monotonic across loads.
        self.store.restore(store.to_vec());
        self.selection.clear();
        self.interaction = Interaction::Idle;
        self.history.clear();
        Ok(())
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.store.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selection.selected()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Every visible element under a screen point, topmost first.
    pub fn elements_at(&self, screen: Point) -> SmallVec<[ElementId; 4]> {
        hit_test_all(&self.store, self.viewport.screen_to_canvas(screen))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            elements: self.store.paint_order().into_iter().cloned().collect(),
            viewport: *self.viewport.state(),
            selection: self.selection.selected(),
            interaction: self.interaction.clone(),
            revision: self.store.revision(),
        }
    }

    // ─── History plumbing ────────────────────────────────────────────────

    pub(crate) fn edit_state(&self) -> EditState {
        EditState {
            elements: self.store.to_vec(),
            selection: self.selection,
        }
    }

    /// Run `op` as one undoable step. Nothing is recorded when it fails.
    pub(crate) fn edit<T>(
        &mut self,
        description: &str,
        op: impl FnOnce(&mut Self) -> EditorResult<T>,
    ) -> EditorResult<T> {
        let before = self.edit_state();
        let out = op(self)?;
        let after = self.edit_state();
        self.history.record(before, after, description);
        Ok(out)
    }

    fn restore(&mut self, state: EditState) {
        self.store.restore(state.elements);
        self.selection = state.selection;
        self.selection.reconcile(&self.store);
    }

    pub(crate) fn require_idle(&self, attempted: &'static str) -> EditorResult<()> {
        if self.interaction.is_idle() {
            Ok(())
        } else {
            Err(EditorError::InvalidState {
                state: self.interaction.name(),
                attempted,
            })
        }
    }

    /// Undo the last step. Returns its description, or `None` when there
    /// is nothing to undo. Refused mid-gesture.
    pub fn undo(&mut self) -> EditorResult<Option<String>> {
        self.require_idle("undo")?;
        Ok(self.history.undo().map(|(state, desc)| {
            self.restore(state);
            log::debug!("undo '{desc}'");
            desc
        }))
    }

    pub fn redo(&mut self) -> EditorResult<Option<String>> {
        self.require_idle("redo")?;
        Ok(self.history.redo().map(|(state, desc)| {
            self.restore(state);
            log::debug!("redo '{desc}'");
            desc
        }))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Element operations ──────────────────────────────────────────────

    /// Insert a fully-formed element as one undoable step.
    pub fn add_element(&mut self, element: CanvasElement) -> EditorResult<()> {
        self.edit("add element", |s| s.store.add(element))
    }

    /// Merge `patch` into an element. Programmatic: locked elements are
    /// editable here.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> EditorResult<bool> {
        self.edit("edit element", |s| s.store.update(id, patch))
    }

    /// Remove an element. The selection is cleared in the same step when
    /// it pointed at `id`.
    pub fn delete_element(&mut self, id: ElementId) -> EditorResult<CanvasElement> {
        self.edit("delete", |s| {
            let removed = s.store.remove(id)?;
            s.selection.forget(id);
            Ok(removed)
        })
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self) -> EditorResult<Option<CanvasElement>> {
        match self.selection.selected() {
            Some(id) => self.delete_element(id).map(Some),
            None => Ok(None),
        }
    }

    /// Copy an element, offset by the configured delta, on top of the
    /// stack. The copy becomes the selection.
    pub fn duplicate_element(&mut self, id: ElementId) -> EditorResult<ElementId> {
        let offset = self.config.duplicate_offset;
        self.edit("duplicate", |s| {
            let copy = s.store.duplicate(id, offset)?;
            s.selection.select(&s.store, Some(copy))?;
            Ok(copy)
        })
    }

    pub fn duplicate_selected(&mut self) -> EditorResult<Option<ElementId>> {
        match self.selection.selected() {
            Some(id) => self.duplicate_element(id).map(Some),
            None => Ok(None),
        }
    }

    pub fn bring_forward(&mut self, id: ElementId) -> EditorResult<u32> {
        self.edit("bring forward", |s| s.store.bring_forward(id))
    }

    pub fn send_backward(&mut self, id: ElementId) -> EditorResult<u32> {
        self.edit("send backward", |s| s.store.send_backward(id))
    }

    pub fn set_locked(&mut self, id: ElementId, locked: bool) -> EditorResult<bool> {
        self.update_element(
            id,
            ElementPatch {
                locked: Some(locked),
                ..ElementPatch::default()
            },
        )
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> EditorResult<bool> {
        self.update_element(
            id,
            ElementPatch {
                visible: Some(visible),
                ..ElementPatch::default()
            },
        )
    }

    pub fn set_position(&mut self, id: ElementId, position: Point) -> EditorResult<bool> {
        self.update_element(id, ElementPatch::position(position))
    }

    /// Non-positive or non-finite sizes are clamped to the configured
    /// minimum element size.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> EditorResult<bool> {
        let min = self.config.min_element_size;
        let clamp = |v: f64| if v.is_finite() { v.max(min) } else { min };
        let size = Size::new(clamp(size.width), clamp(size.height));
        self.update_element(
            id,
            ElementPatch {
                size: Some(size),
                ..ElementPatch::default()
            },
        )
    }

    pub fn set_rotation(&mut self, id: ElementId, degrees: f64) -> EditorResult<bool> {
        self.update_element(id, ElementPatch::rotation(degrees))
    }

    pub fn set_content(&mut self, id: ElementId, content: ElementContent) -> EditorResult<bool> {
        self.update_element(
            id,
            ElementPatch {
                content: Some(content),
                ..ElementPatch::default()
            },
        )
    }

    /// Set one presentation style override; an empty value removes it.
    pub fn set_style(&mut self, id: ElementId, key: &str, value: &str) -> EditorResult<bool> {
        self.update_element(
            id,
            ElementPatch {
                styles: Some([(key.to_string(), value.to_string())].into()),
                ..ElementPatch::default()
            },
        )
    }

    /// Keyboard nudge. Treated as direct manipulation, so locked elements
    /// refuse it.
    pub(crate) fn nudge(&mut self, id: ElementId, delta: Vec2) -> EditorResult<bool> {
        let position = self
            .store
            .get(id)
            .ok_or(EditorError::NotFound(id))?
            .position
            + delta;
        self.edit("nudge", |s| {
            s.store
                .update_as(id, ElementPatch::position(position), EditSource::Pointer)
        })
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Programmatic selection; locked elements are allowed.
    pub fn select(&mut self, id: Option<ElementId>) -> EditorResult<()> {
        self.selection.select(&self.store, id)
    }

    /// Pointer selection; locked elements are refused.
    pub fn select_from_pointer(&mut self, id: Option<ElementId>) -> EditorResult<()> {
        self.selection.select_from_pointer(&self.store, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out()
    }

    pub fn set_zoom(&mut self, value: f64) -> f64 {
        self.viewport.set_zoom(value)
    }

    pub fn zoom_at(&mut self, factor: f64, screen: Point) -> bool {
        self.viewport.zoom_at(factor, screen)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.viewport.toggle_grid()
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.viewport.toggle_snap()
    }

    pub fn set_snap(&mut self, enabled: bool) {
        self.viewport.set_snap(enabled);
    }

    pub fn set_grid_size(&mut self, size: u32) {
        self.viewport.set_grid_size(size);
    }

    pub fn set_surface_size(&mut self, surface: Size) {
        self.viewport.set_surface_size(surface);
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.viewport.screen_to_canvas(screen)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.viewport.canvas_to_screen(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vb_core::model::ShapeType;

    fn session_with(ids: &[&str]) -> EditingSession {
        let mut s = EditingSession::default();
        for (z, id) in ids.iter().enumerate() {
            s.add_element(
                CanvasElement::new(
                    ElementId::intern(id),
                    ElementContent::shape(ShapeType::Rectangle),
                    Point::new(10.0, 10.0),
                    Size::new(40.0, 40.0),
                )
                .with_z_index(z as u32),
            )
            .unwrap();
        }
        s
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = EditorConfig {
            min_zoom: 3.0,
            ..EditorConfig::default()
        };
        assert!(matches!(EditingSession::new(config), Err(EditorError::Config(_))));
    }

    #[test]
    fn new_reports_nan_zoom_bound_instead_of_panicking() {
        let config = EditorConfig {
            max_zoom: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(matches!(EditingSession::new(config), Err(EditorError::Config(_))));
    }

    #[test]
    fn delete_selected_clears_selection_with_removal() {
        let mut s = session_with(&["sess_b"]);
        let b = ElementId::intern("sess_b");
        s.select(Some(b)).unwrap();

        let removed = s.delete_selected().unwrap().unwrap();
        assert_eq!(removed.id, b);
        let snap = s.snapshot();
        assert_eq!(snap.selection, None);
        assert!(snap.elements.iter().all(|e| e.id != b));
    }

    #[test]
    fn failed_delete_keeps_selection() {
        let mut s = session_with(&["sess_keep"]);
        let keep = ElementId::intern("sess_keep");
        s.select(Some(keep)).unwrap();
        assert!(s.delete_element(ElementId::intern("sess_nobody")).is_err());
        assert_eq!(s.selected(), Some(keep));
        assert_eq!(s.history().undo_len(), 1);
    }

    #[test]
    fn duplicate_selects_the_copy() {
        let mut s = session_with(&["sess_src"]);
        let src = ElementId::intern("sess_src");
        s.select(Some(src)).unwrap();
        let copy = s.duplicate_selected().unwrap().unwrap();
        assert_eq!(s.selected(), Some(copy));
        assert_eq!(s.element(copy).unwrap().position, Point::new(30.0, 30.0));
    }

    #[test]
    fn property_edits_undo_one_at_a_time() {
        let mut s = session_with(&["sess_props"]);
        let id = ElementId::intern("sess_props");
        s.set_rotation(id, 30.0).unwrap();
        s.set_style(id, "opacity", "0.5").unwrap();

        assert_eq!(s.undo().unwrap().as_deref(), Some("edit element"));
        assert!(s.element(id).unwrap().styles.is_empty());
        assert_eq!(s.element(id).unwrap().rotation, 30.0);

        s.undo().unwrap();
        assert_eq!(s.element(id).unwrap().rotation, 0.0);

        s.redo().unwrap();
        assert_eq!(s.element(id).unwrap().rotation, 30.0);
    }

    #[test]
    fn set_size_clamps_to_minimum() {
        let mut s = session_with(&["sess_size"]);
        let id = ElementId::intern("sess_size");
        s.set_size(id, Size::new(-5.0, f64::NAN)).unwrap();
        assert_eq!(s.element(id).unwrap().size, Size::new(1.0, 1.0));
    }

    #[test]
    fn locked_element_is_programmatically_editable() {
        let mut s = session_with(&["sess_locked"]);
        let id = ElementId::intern("sess_locked");
        s.set_locked(id, true).unwrap();
        assert!(s.set_position(id, Point::new(99.0, 1.0)).unwrap());
        assert!(s.set_locked(id, false).unwrap());
    }

    #[test]
    fn undo_restores_deleted_selection() {
        let mut s = session_with(&["sess_undo_del"]);
        let id = ElementId::intern("sess_undo_del");
        s.select(Some(id)).unwrap();
        s.delete_selected().unwrap();
        s.undo().unwrap();
        assert!(s.store().contains(id));
        assert_eq!(s.selected(), Some(id));
    }

    #[test]
    fn load_replaces_everything_or_nothing() {
        let mut s = session_with(&["sess_old"]);
        s.select(Some(ElementId::intern("sess_old"))).unwrap();

        let el = |id: &str| {
            CanvasElement::new(
                ElementId::intern(id),
                ElementContent::text(id),
                Point::ZERO,
                Size::new(10.0, 10.0),
            )
        };
        let err = s.load(vec![el("sess_dup"), el("sess_dup")]).unwrap_err();
        assert_eq!(err, EditorError::DuplicateId(ElementId::intern("sess_dup")));
        assert!(s.store().contains(ElementId::intern("sess_old")));

        s.load(vec![el("sess_new")]).unwrap();
        assert_eq!(s.store().len(), 1);
        assert_eq!(s.selected(), None);
        assert!(!s.can_undo());
    }

    #[test]
    fn snapshot_serializes() {
        let s = session_with(&["sess_json"]);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["elements"][0]["id"], "sess_json");
        assert_eq!(json["interaction"]["state"], "idle");
        assert_eq!(json["viewport"]["zoom"], 1.0);
    }
}
