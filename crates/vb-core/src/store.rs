//! The ordered collection of placed elements.
//!
//! Elements are kept in insertion order; paint and hit-test order is
//! ascending `z_index` with ties broken by insertion order. Canvases hold
//! tens of elements, so lookups and z-order recomputation are linear scans.

use crate::error::{EditorError, EditorResult};
use crate::id::ElementId;
use crate::model::{CanvasElement, ElementKind, ElementPatch};
use kurbo::Vec2;

/// Which caller is mutating an element. Pointer gestures may never touch a
/// locked element; programmatic edits (property panels) always may.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSource {
    Programmatic,
    Pointer,
}

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<CanvasElement>,
    /// Bumped on every committed mutation.
    revision: u64,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter()
    }

    /// Elements in paint order: ascending z-index, stable on ties.
    pub fn paint_order(&self) -> Vec<&CanvasElement> {
        let mut ordered: Vec<&CanvasElement> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Monotonic mutation counter, for change detection by renderers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn max_z_index(&self) -> Option<u32> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    pub fn min_z_index(&self) -> Option<u32> {
        self.elements.iter().map(|e| e.z_index).min()
    }

    /// An ID for `kind` that no store holds yet.
    pub fn fresh_id(&self, kind: ElementKind) -> ElementId {
        let id = ElementId::mint(kind.id_prefix());
        debug_assert!(!self.contains(id));
        id
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> EditorResult<&mut CanvasElement> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EditorError::NotFound(id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Insert a fully-formed element.
    pub fn add(&mut self, element: CanvasElement) -> EditorResult<()> {
        if self.contains(element.id) {
            return Err(EditorError::DuplicateId(element.id));
        }
        log::debug!("add {} ({:?}) z={}", element.id, element.kind(), element.z_index);
        self.elements.push(element);
        self.revision += 1;
        Ok(())
    }

    /// Merge `patch` into the element. Returns whether anything changed.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) -> EditorResult<bool> {
        self.update_as(id, patch, EditSource::Programmatic)
    }

    /// Like `update`, but on behalf of `source`.
    ///
    /// For `EditSource::Pointer` on a locked element: geometry changes are
    /// rejected with `Locked` before anything is written, and flag-only
    /// patches are ignored (`Ok(false)`).
    pub fn update_as(
        &mut self,
        id: ElementId,
        patch: ElementPatch,
        source: EditSource,
    ) -> EditorResult<bool> {
        let element = self.get_mut(id)?;
        if source == EditSource::Pointer && element.locked {
            if patch.touches_geometry() {
                return Err(EditorError::Locked(id));
            }
            log::debug!("ignoring pointer flag change on locked {id}");
            return Ok(false);
        }
        let changed = patch.apply_to(element);
        if changed {
            self.revision += 1;
        }
        Ok(changed)
    }

    /// Remove and return the element.
    pub fn remove(&mut self, id: ElementId) -> EditorResult<CanvasElement> {
        let idx = self.index_of(id).ok_or(EditorError::NotFound(id))?;
        let removed = self.elements.remove(idx);
        self.revision += 1;
        log::debug!("remove {id}");
        Ok(removed)
    }

    /// Move the element above everything: `z = max(all) + 1`.
    ///
    /// Always jumps, even when the element is already on top.
    pub fn bring_forward(&mut self, id: ElementId) -> EditorResult<u32> {
        let top = self.max_z_index().ok_or(EditorError::NotFound(id))?;
        let element = self.get_mut(id)?;
        element.z_index = top.saturating_add(1);
        let z = element.z_index;
        self.revision += 1;
        Ok(z)
    }

    /// Move the element below everything: `z = max(0, min(all) - 1)`.
    pub fn send_backward(&mut self, id: ElementId) -> EditorResult<u32> {
        let bottom = self.min_z_index().ok_or(EditorError::NotFound(id))?;
        let element = self.get_mut(id)?;
        element.z_index = bottom.saturating_sub(1);
        let z = element.z_index;
        self.revision += 1;
        Ok(z)
    }

    /// Clone the element with a fresh ID, shifted by `offset`, on top of
    /// the stack. Every other attribute (flags included) is copied.
    pub fn duplicate(&mut self, id: ElementId, offset: Vec2) -> EditorResult<ElementId> {
        let source = self.get(id).ok_or(EditorError::NotFound(id))?;
        let mut clone = source.clone();
        clone.id = self.fresh_id(clone.kind());
        clone.position += offset;
        clone.z_index = self.max_z_index().unwrap_or(0).saturating_add(1);
        let new_id = clone.id;
        self.add(clone)?;
        Ok(new_id)
    }

    /// Owned copy of every element, insertion order preserved.
    pub fn to_vec(&self) -> Vec<CanvasElement> {
        self.elements.clone()
    }

    /// Replace the whole collection (undo/redo restore).
    pub fn restore(&mut self, elements: Vec<CanvasElement>) {
        self.elements = elements;
        self.revision += 1;
    }
}
