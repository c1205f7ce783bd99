//! Interaction state machine.
//!
//! At most one gesture is active at a time. Pointer gestures on elements
//! (drag, resize, rotate) write through the store's pointer path, so a
//! locked target is refused before anything is written, and they are
//! batched into a single undo entry. Palette drags only end through a
//! drop, a cancel, or Escape; the palette may be dragging from outside the
//! canvas, so pointer up and leave do not end them.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Pointer down | Drag | Rotate | Wheel |
//! |----------|--------------|------|--------|-------|
//! | **Shift** | — | Axis-constrain | Snap angle | — |
//! | **Alt** | Duplicate, drag the copy | — | — | — |
//! | **⌘/Ctrl** | Pan | — | — | Zoom at cursor |

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use vb_core::error::{EditorError, EditorResult};
use vb_core::geometry::{
    ResizeHandle, angle_around, angle_delta, pin_rotated, resize_rect, rotate_about, snap_angle,
};
use vb_core::hit::{HandleHit, HandleMetrics, hit_test, hit_test_handles};
use vb_core::id::ElementId;
use vb_core::model::{CanvasElement, ElementPatch};
use vb_core::store::EditSource;

use crate::input::{GestureSource, InputEvent, Modifiers, PointerButton};
use crate::palette::{DropTarget, PaletteDescriptor, drop_position, reconcile_drop};
use crate::session::EditingSession;
use crate::shortcuts::{ShortcutAction, ShortcutMap};

/// The active gesture. Screen-space anchors are kept so every move is
/// computed from the gesture start, not accumulated per event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        /// Last pointer position; pan is fed incremental deltas.
        last: Point,
    },
    DraggingElement {
        id: ElementId,
        /// Element position when the drag began.
        origin: Point,
        start: Point,
    },
    ResizingElement {
        id: ElementId,
        handle: ResizeHandle,
        start_rect: Rect,
        start: Point,
    },
    RotatingElement {
        id: ElementId,
        /// Canvas-space pivot.
        center: Point,
        start_rotation: f64,
        /// Pointer angle around `center` when the gesture began.
        start_angle: f64,
    },
    DraggingFromPalette {
        descriptor: PaletteDescriptor,
        /// Snapped canvas position a drop would land on, once known.
        hover: Option<Point>,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Panning { .. } => "panning",
            Interaction::DraggingElement { .. } => "dragging an element",
            Interaction::ResizingElement { .. } => "resizing an element",
            Interaction::RotatingElement { .. } => "rotating an element",
            Interaction::DraggingFromPalette { .. } => "dragging from the palette",
        }
    }

    /// The element this gesture manipulates, if any.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Interaction::DraggingElement { id, .. }
            | Interaction::ResizingElement { id, .. }
            | Interaction::RotatingElement { id, .. } => Some(*id),
            _ => None,
        }
    }

    fn history_label(&self) -> &'static str {
        match self {
            Interaction::ResizingElement { .. } => "resize",
            Interaction::RotatingElement { .. } => "rotate",
            _ => "move",
        }
    }
}

impl EditingSession {
    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Feed one input event. Never fails: errors here are pointer noise
    /// (stale targets, locked elements) and are logged and absorbed. A
    /// pointer gesture whose own target vanished or got locked drops back
    /// to idle; any other event that does not fit the current state is
    /// ignored.
    pub fn handle(&mut self, event: InputEvent) {
        let gesture = event.is_gesture();
        if let Err(err) = self.dispatch(event) {
            log::debug!("absorbed while {}: {err}", self.interaction.name());
            if gesture && self.target_lost(&err) {
                self.end_interaction();
            }
        }
    }

    fn target_lost(&self, err: &EditorError) -> bool {
        match (self.interaction.target(), err) {
            (Some(target), EditorError::NotFound(id) | EditorError::Locked(id)) => *id == target,
            _ => false,
        }
    }

    /// Drain `source`, handling each event in order. Returns the count.
    pub fn pump(&mut self, source: &mut impl GestureSource) -> usize {
        let mut handled = 0;
        while let Some(event) = source.next_event() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    fn dispatch(&mut self, event: InputEvent) -> EditorResult<()> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(Point::new(x, y), button, modifiers),
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(Point::new(x, y), modifiers)
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                if !matches!(self.interaction, Interaction::DraggingFromPalette { .. }) {
                    self.end_interaction();
                }
                Ok(())
            }
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => {
                self.wheel(Point::new(x, y), Vec2::new(dx, dy), modifiers);
                Ok(())
            }
            InputEvent::KeyDown { key, modifiers } => match ShortcutMap::resolve(&key, modifiers) {
                Some(action) => self.run_shortcut(action),
                None => Ok(()),
            },
            InputEvent::KeyUp { key } => {
                if key == " " {
                    self.pan_key_held = false;
                }
                Ok(())
            }
            InputEvent::PaletteDragStart { descriptor } => self.begin_palette_drag(descriptor),
            InputEvent::PaletteDrop { x, y, target } => {
                self.drop_palette(Point::new(x, y), target).map(|_| ())
            }
            InputEvent::PaletteDragCancel => self.cancel_palette_drag(),
        }
    }

    fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> EditorResult<()> {
        if !self.interaction.is_idle() {
            log::debug!("pointer down ignored while {}", self.interaction.name());
            return Ok(());
        }

        let pan = match button {
            PointerButton::Primary => modifiers.cmd() || self.pan_key_held,
            PointerButton::Middle | PointerButton::Secondary => true,
        };
        if pan {
            return self.begin_pan(screen);
        }

        if let Some((id, hit)) = self.selected_handle_at(screen) {
            return match hit {
                HandleHit::Resize(handle) => self.begin_resize(id, handle, screen),
                HandleHit::Rotate => self.begin_rotate(id, screen),
            };
        }

        match hit_test(&self.store, self.viewport.screen_to_canvas(screen)) {
            Some(id) if modifiers.alt => self.begin_drag_copy(id, screen).map(|_| ()),
            Some(id) => self.begin_drag(id, screen),
            None => {
                self.selection.clear();
                Ok(())
            }
        }
    }

    fn selected_handle_at(&self, screen: Point) -> Option<(ElementId, HandleHit)> {
        let id = self.selection.selected()?;
        let element = self.store.get(id).filter(|e| e.visible && !e.locked)?;
        let metrics = HandleMetrics {
            handle_size: self.config.handle_size,
            rotate_offset: self.config.rotate_handle_offset,
        };
        hit_test_handles(element, &self.viewport.transform(), screen, metrics).map(|h| (id, h))
    }

    /// Advance the active gesture to `screen`.
    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> EditorResult<()> {
        match &mut self.interaction {
            Interaction::Idle => Ok(()),
            Interaction::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan(delta.x, delta.y);
                Ok(())
            }
            Interaction::DraggingElement { id, origin, start } => {
                let (id, origin, delta) = (*id, *origin, screen - *start);
                self.drag_to(id, origin, delta, modifiers.shift)
            }
            Interaction::ResizingElement {
                id,
                handle,
                start_rect,
                start,
            } => {
                let (id, handle, start_rect, delta) = (*id, *handle, *start_rect, screen - *start);
                self.resize_to(id, handle, start_rect, delta)
            }
            Interaction::RotatingElement {
                id,
                center,
                start_rotation,
                start_angle,
            } => {
                let pointer_angle = angle_around(self.viewport.screen_to_canvas(screen), *center);
                let sweep = angle_delta(*start_angle, pointer_angle);
                let (id, rotation) = (*id, *start_rotation + sweep);
                self.rotate_to(id, rotation, modifiers.shift)
            }
            Interaction::DraggingFromPalette { hover, .. } => {
                *hover = Some(drop_position(&self.viewport, screen));
                Ok(())
            }
        }
    }

    fn wheel(&mut self, screen: Point, delta: Vec2, modifiers: Modifiers) {
        if !self.interaction.is_idle() {
            log::debug!("wheel ignored while {}", self.interaction.name());
            return;
        }
        if modifiers.cmd() {
            let factor = 1.0 - delta.y * self.config.wheel_zoom_sensitivity;
            self.viewport.zoom_at(factor, screen);
        } else {
            self.viewport.pan(-delta.x, -delta.y);
        }
    }

    // ─── Gesture start / end ─────────────────────────────────────────────

    fn transition(&mut self, next: Interaction) {
        log::debug!("{} → {}", self.interaction.name(), next.name());
        self.interaction = next;
    }

    /// A visible, unlocked element a pointer gesture may act on.
    fn gesture_target(&self, id: ElementId) -> EditorResult<&CanvasElement> {
        let element = self
            .store
            .get(id)
            .filter(|e| e.visible)
            .ok_or(EditorError::NotFound(id))?;
        if element.locked {
            return Err(EditorError::Locked(id));
        }
        Ok(element)
    }

    pub fn begin_pan(&mut self, screen: Point) -> EditorResult<()> {
        self.require_idle("pan")?;
        self.transition(Interaction::Panning { last: screen });
        Ok(())
    }

    /// Start dragging `id`. The element becomes the selection.
    pub fn begin_drag(&mut self, id: ElementId, screen: Point) -> EditorResult<()> {
        self.require_idle("drag")?;
        let origin = self.gesture_target(id)?.position;
        self.selection.select_from_pointer(&self.store, Some(id))?;
        let state = self.edit_state();
        self.history.begin_batch(state);
        self.transition(Interaction::DraggingElement {
            id,
            origin,
            start: screen,
        });
        Ok(())
    }

    /// Duplicate `id` and drag the copy. Copy and move undo together.
    pub fn begin_drag_copy(&mut self, id: ElementId, screen: Point) -> EditorResult<ElementId> {
        self.require_idle("drag")?;
        self.gesture_target(id)?;
        let before = self.edit_state();
        let copy = self.store.duplicate(id, Vec2::ZERO)?;
        self.selection.select_from_pointer(&self.store, Some(copy))?;
        let origin = self.gesture_target(copy)?.position;
        self.history.begin_batch(before);
        self.transition(Interaction::DraggingElement {
            id: copy,
            origin,
            start: screen,
        });
        Ok(copy)
    }

    pub fn begin_resize(
        &mut self,
        id: ElementId,
        handle: ResizeHandle,
        screen: Point,
    ) -> EditorResult<()> {
        self.require_idle("resize")?;
        let start_rect = self.gesture_target(id)?.bounds();
        self.selection.select_from_pointer(&self.store, Some(id))?;
        let state = self.edit_state();
        self.history.begin_batch(state);
        self.transition(Interaction::ResizingElement {
            id,
            handle,
            start_rect,
            start: screen,
        });
        Ok(())
    }

    pub fn begin_rotate(&mut self, id: ElementId, screen: Point) -> EditorResult<()> {
        self.require_idle("rotate")?;
        let element = self.gesture_target(id)?;
        let center = element.center();
        let start_rotation = element.rotation;
        let start_angle = angle_around(self.viewport.screen_to_canvas(screen), center);
        self.selection.select_from_pointer(&self.store, Some(id))?;
        let state = self.edit_state();
        self.history.begin_batch(state);
        self.transition(Interaction::RotatingElement {
            id,
            center,
            start_rotation,
            start_angle,
        });
        Ok(())
    }

    pub fn begin_palette_drag(&mut self, descriptor: PaletteDescriptor) -> EditorResult<()> {
        self.require_idle("start a palette drag")?;
        self.transition(Interaction::DraggingFromPalette {
            descriptor,
            hover: None,
        });
        Ok(())
    }

    /// Finish the active gesture. Whatever was last written stays; an
    /// element gesture that changed something becomes one undo entry.
    pub fn end_interaction(&mut self) {
        let previous = std::mem::take(&mut self.interaction);
        if previous.is_idle() {
            return;
        }
        if previous.target().is_some() {
            let state = self.edit_state();
            self.history.end_batch(state, previous.history_label());
        }
        log::debug!("{} → idle", previous.name());
    }

    /// Complete a palette drag. A drop on the canvas places a component
    /// and selects it; a drop elsewhere is discarded.
    pub fn drop_palette(
        &mut self,
        screen: Point,
        target: DropTarget,
    ) -> EditorResult<Option<ElementId>> {
        let descriptor = match std::mem::take(&mut self.interaction) {
            Interaction::DraggingFromPalette { descriptor, .. } => descriptor,
            other => {
                let err = EditorError::InvalidState {
                    state: other.name(),
                    attempted: "drop a palette item",
                };
                self.interaction = other;
                return Err(err);
            }
        };
        log::debug!("dragging from the palette → idle");
        let default_size = self.config.default_component_size;
        self.edit("place component", |s| {
            let placed = reconcile_drop(
                &descriptor,
                target,
                screen,
                &mut s.store,
                &s.viewport,
                default_size,
            )?;
            if let Some(id) = placed {
                s.selection.select(&s.store, Some(id))?;
            }
            Ok(placed)
        })
    }

    pub fn cancel_palette_drag(&mut self) -> EditorResult<()> {
        if !matches!(self.interaction, Interaction::DraggingFromPalette { .. }) {
            return Err(EditorError::InvalidState {
                state: self.interaction.name(),
                attempted: "cancel a palette drag",
            });
        }
        self.transition(Interaction::Idle);
        Ok(())
    }

    // ─── Per-move writes ─────────────────────────────────────────────────

    fn drag_to(
        &mut self,
        id: ElementId,
        origin: Point,
        screen_delta: Vec2,
        constrain: bool,
    ) -> EditorResult<()> {
        let mut delta = self.viewport.transform().delta_to_canvas(screen_delta);
        if constrain {
            if delta.x.abs() >= delta.y.abs() {
                delta.y = 0.0;
            } else {
                delta.x = 0.0;
            }
        }
        let position = self.viewport.snap(origin + delta);
        self.store
            .update_as(id, ElementPatch::position(position), EditSource::Pointer)?;
        log::trace!("drag {id} → ({:.1}, {:.1})", position.x, position.y);
        Ok(())
    }

    fn resize_to(
        &mut self,
        id: ElementId,
        handle: ResizeHandle,
        start_rect: Rect,
        screen_delta: Vec2,
    ) -> EditorResult<()> {
        let rotation = self.store.get(id).ok_or(EditorError::NotFound(id))?.rotation;
        let delta = self.viewport.transform().delta_to_canvas(screen_delta);
        // Handles move along the element's own axes.
        let local = rotate_about(delta.to_point(), Point::ZERO, -rotation).to_vec2();
        let rect = resize_rect(
            start_rect,
            handle,
            local,
            self.config.min_element_size,
            self.viewport.snap_grid(),
        );
        let rect = pin_rotated(start_rect, rect, handle, rotation);
        self.store
            .update_as(id, ElementPatch::bounds(rect), EditSource::Pointer)?;
        log::trace!("resize {id} → {:.1}x{:.1}", rect.width(), rect.height());
        Ok(())
    }

    fn rotate_to(&mut self, id: ElementId, rotation: f64, snap: bool) -> EditorResult<()> {
        let rotation = if snap {
            snap_angle(rotation, self.config.rotation_snap_degrees)
        } else {
            rotation
        };
        self.store
            .update_as(id, ElementPatch::rotation(rotation), EditSource::Pointer)?;
        log::trace!("rotate {id} → {rotation:.1}°");
        Ok(())
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Perform a shortcut action against the current selection.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> EditorResult<()> {
        log::debug!("shortcut {action:?}");
        let selected = self.selection.selected();
        match action {
            ShortcutAction::Undo => self.undo().map(|_| ()),
            ShortcutAction::Redo => self.redo().map(|_| ()),
            ShortcutAction::Delete => self.delete_selected().map(|_| ()),
            ShortcutAction::Duplicate => self.duplicate_selected().map(|_| ()),
            ShortcutAction::ToggleLock => match selected {
                Some(id) => {
                    let locked = self.store.get(id).ok_or(EditorError::NotFound(id))?.locked;
                    self.set_locked(id, !locked).map(|_| ())
                }
                None => Ok(()),
            },
            ShortcutAction::Nudge { dx, dy, large } => match selected {
                Some(id) => {
                    let step = if large {
                        f64::from(self.viewport.state().grid_size)
                    } else {
                        1.0
                    };
                    let delta = Vec2::new(f64::from(dx), f64::from(dy)) * step;
                    self.nudge(id, delta).map(|_| ())
                }
                None => Ok(()),
            },
            ShortcutAction::ZoomIn => {
                self.viewport.zoom_in();
                Ok(())
            }
            ShortcutAction::ZoomOut => {
                self.viewport.zoom_out();
                Ok(())
            }
            ShortcutAction::ResetView => {
                self.viewport.reset_view();
                Ok(())
            }
            ShortcutAction::ToggleGrid => {
                self.viewport.toggle_grid();
                Ok(())
            }
            ShortcutAction::ToggleSnap => {
                self.viewport.toggle_snap();
                Ok(())
            }
            ShortcutAction::PanStart => {
                self.pan_key_held = true;
                Ok(())
            }
            ShortcutAction::BringForward => match selected {
                Some(id) => self.bring_forward(id).map(|_| ()),
                None => Ok(()),
            },
            ShortcutAction::SendBackward => match selected {
                Some(id) => self.send_backward(id).map(|_| ()),
                None => Ok(()),
            },
            ShortcutAction::Deselect => {
                if matches!(self.interaction, Interaction::DraggingFromPalette { .. }) {
                    return self.cancel_palette_drag();
                }
                self.selection.clear();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use pretty_assertions::assert_eq;
    use vb_core::model::{ElementContent, ShapeType};

    fn session_with_box(id: &str) -> (EditingSession, ElementId) {
        let mut s = EditingSession::default();
        let id = ElementId::intern(id);
        s.add_element(CanvasElement::new(
            id,
            ElementContent::shape(ShapeType::Rectangle),
            Point::new(100.0, 100.0),
            Size::new(100.0, 50.0),
        ))
        .unwrap();
        (s, id)
    }

    #[test]
    fn states_name_themselves() {
        assert_eq!(Interaction::Idle.name(), "idle");
        let pan = Interaction::Panning { last: Point::ZERO };
        assert_eq!(pan.name(), "panning");
        assert_eq!(pan.target(), None);
    }

    #[test]
    fn begin_resize_while_panning_is_invalid_state() {
        let (mut s, id) = session_with_box("ix_invalid");
        s.begin_pan(Point::ZERO).unwrap();
        let err = s
            .begin_resize(id, ResizeHandle::Right, Point::ZERO)
            .unwrap_err();
        assert_eq!(
            err,
            EditorError::InvalidState {
                state: "panning",
                attempted: "resize"
            }
        );
        assert_eq!(err.to_string(), "cannot resize while panning");
    }

    #[test]
    fn drag_writes_origin_plus_scaled_delta() {
        let (mut s, id) = session_with_box("ix_drag");
        s.set_zoom(2.0);
        s.begin_drag(id, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(s.selected(), Some(id));

        s.pointer_move(Point::new(30.0, 50.0), Modifiers::NONE).unwrap();
        assert_eq!(s.element(id).unwrap().position, Point::new(110.0, 120.0));

        // Each move is relative to the gesture start, not the last move.
        s.pointer_move(Point::new(30.0, 50.0), Modifiers::NONE).unwrap();
        assert_eq!(s.element(id).unwrap().position, Point::new(110.0, 120.0));
    }

    #[test]
    fn shift_drag_constrains_to_dominant_axis() {
        let (mut s, id) = session_with_box("ix_axis");
        s.begin_drag(id, Point::ZERO).unwrap();
        s.pointer_move(Point::new(40.0, 7.0), Modifiers::SHIFT).unwrap();
        assert_eq!(s.element(id).unwrap().position, Point::new(140.0, 100.0));
    }

    #[test]
    fn drag_snaps_when_enabled() {
        let (mut s, id) = session_with_box("ix_snap");
        s.set_snap(true);
        s.begin_drag(id, Point::ZERO).unwrap();
        s.pointer_move(Point::new(13.0, 28.0), Modifiers::NONE).unwrap();
        assert_eq!(s.element(id).unwrap().position, Point::new(120.0, 120.0));
    }

    #[test]
    fn resize_from_corner_and_edge() {
        let (mut s, id) = session_with_box("ix_resize");
        s.begin_resize(id, ResizeHandle::BottomRight, Point::ZERO).unwrap();
        s.pointer_move(Point::new(20.0, 30.0), Modifiers::NONE).unwrap();
        s.end_interaction();
        let el = s.element(id).unwrap();
        assert_eq!(el.position, Point::new(100.0, 100.0));
        assert_eq!(el.size, Size::new(120.0, 80.0));

        s.begin_resize(id, ResizeHandle::Left, Point::ZERO).unwrap();
        s.pointer_move(Point::new(500.0, 40.0), Modifiers::NONE).unwrap();
        let el = s.element(id).unwrap();
        // Clamped to the minimum, right edge anchored.
        assert_eq!(el.size, Size::new(1.0, 80.0));
        assert_eq!(el.position, Point::new(219.0, 100.0));
    }

    #[test]
    fn rotate_follows_pointer_angle() {
        let (mut s, id) = session_with_box("ix_rotate");
        // Centre is (150, 125); start due right of it.
        s.begin_rotate(id, Point::new(200.0, 125.0)).unwrap();
        s.pointer_move(Point::new(150.0, 175.0), Modifiers::NONE).unwrap();
        assert!((s.element(id).unwrap().rotation - 90.0).abs() < 1e-9);

        // Shift snaps to 15° steps.
        s.pointer_move(Point::new(200.0, 140.0), Modifiers::SHIFT).unwrap();
        assert_eq!(s.element(id).unwrap().rotation, 15.0);
    }

    #[test]
    fn hidden_element_cannot_be_dragged() {
        let (mut s, id) = session_with_box("ix_hidden");
        s.set_visible(id, false).unwrap();
        assert_eq!(s.begin_drag(id, Point::ZERO), Err(EditorError::NotFound(id)));
        assert!(s.interaction().is_idle());
    }

    #[test]
    fn locked_element_refuses_gestures() {
        let (mut s, id) = session_with_box("ix_locked");
        s.set_locked(id, true).unwrap();
        assert_eq!(s.begin_drag(id, Point::ZERO), Err(EditorError::Locked(id)));
        assert_eq!(s.begin_rotate(id, Point::ZERO), Err(EditorError::Locked(id)));
        assert!(s.interaction().is_idle());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn drop_without_palette_drag_is_invalid() {
        let (mut s, _) = session_with_box("ix_nodrop");
        assert!(matches!(
            s.drop_palette(Point::ZERO, DropTarget::Canvas),
            Err(EditorError::InvalidState { state: "idle", .. })
        ));
        s.begin_pan(Point::ZERO).unwrap();
        assert!(s.drop_palette(Point::ZERO, DropTarget::Canvas).is_err());
        // The pan survives the rejected drop.
        assert_eq!(s.interaction().name(), "panning");
    }

    #[test]
    fn alt_drag_moves_a_copy() {
        let (mut s, id) = session_with_box("ix_alt");
        let copy = s.begin_drag_copy(id, Point::ZERO).unwrap();
        s.pointer_move(Point::new(50.0, 0.0), Modifiers::NONE).unwrap();
        s.end_interaction();

        assert_eq!(s.element(id).unwrap().position, Point::new(100.0, 100.0));
        assert_eq!(s.element(copy).unwrap().position, Point::new(150.0, 100.0));
        assert_eq!(s.selected(), Some(copy));

        // Copy and move are one undo step.
        s.undo().unwrap();
        assert!(!s.store().contains(copy));
    }

    #[test]
    fn nudge_uses_grid_step_when_large() {
        let (mut s, id) = session_with_box("ix_nudge");
        s.select(Some(id)).unwrap();
        s.run_shortcut(ShortcutAction::Nudge {
            dx: 1,
            dy: 0,
            large: false,
        })
        .unwrap();
        s.run_shortcut(ShortcutAction::Nudge {
            dx: 0,
            dy: -1,
            large: true,
        })
        .unwrap();
        assert_eq!(s.element(id).unwrap().position, Point::new(101.0, 80.0));
    }
}
