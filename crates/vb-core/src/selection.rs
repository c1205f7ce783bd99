//! Single-element selection.
//!
//! Two entry points share one piece of state: pointer selection refuses
//! locked elements, programmatic selection (e.g. a properties panel that
//! needs to unlock something) does not.

use crate::error::{EditorError, EditorResult};
use crate::id::ElementId;
use crate::store::ElementStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Programmatic selection. `None` clears.
    pub fn select(&mut self, store: &ElementStore, id: Option<ElementId>) -> EditorResult<()> {
        if let Some(id) = id
            && !store.contains(id)
        {
            return Err(EditorError::NotFound(id));
        }
        self.selected = id;
        Ok(())
    }

    /// Pointer selection. Locked elements cannot become the selection here.
    ///
    /// A missing id fails with `NotFound`; a present but locked one fails
    /// with `Locked` rather than `NotFound`, so callers can tell a stale id
    /// from a refused one. The state is left untouched either way.
    pub fn select_from_pointer(
        &mut self,
        store: &ElementStore,
        id: Option<ElementId>,
    ) -> EditorResult<()> {
        if let Some(id) = id {
            let element = store.get(id).ok_or(EditorError::NotFound(id))?;
            if element.locked {
                return Err(EditorError::Locked(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it points at `id`. Call in the same step that
    /// removes `id` from the store.
    pub fn forget(&mut self, id: ElementId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Drop the selection if it no longer resolves in `store`.
    pub fn reconcile(&mut self, store: &ElementStore) {
        if let Some(id) = self.selected
            && !store.contains(id)
        {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanvasElement, ElementContent};
    use kurbo::{Point, Size};

    fn store_with(id: &str, locked: bool) -> ElementStore {
        let mut store = ElementStore::new();
        let mut el = CanvasElement::new(
            ElementId::intern(id),
            ElementContent::text("label"),
            Point::ZERO,
            Size::new(40.0, 20.0),
        );
        el.locked = locked;
        store.add(el).unwrap();
        store
    }

    #[test]
    fn select_missing_fails_and_keeps_state() {
        let store = store_with("sel_present", false);
        let mut sel = Selection::new();
        sel.select(&store, Some(ElementId::intern("sel_present"))).unwrap();
        let err = sel
            .select(&store, Some(ElementId::intern("sel_absent")))
            .unwrap_err();
        assert!(matches!(err, EditorError::NotFound(_)));
        assert_eq!(sel.selected(), Some(ElementId::intern("sel_present")));
    }

    #[test]
    fn pointer_cannot_select_locked_but_program_can() {
        let store = store_with("sel_locked", true);
        let id = ElementId::intern("sel_locked");
        let mut sel = Selection::new();

        assert_eq!(
            sel.select_from_pointer(&store, Some(id)),
            Err(EditorError::Locked(id))
        );
        assert!(sel.is_empty());

        sel.select(&store, Some(id)).unwrap();
        assert!(sel.is_selected(id));
    }

    #[test]
    fn select_none_clears() {
        let store = store_with("sel_clear", false);
        let mut sel = Selection::new();
        sel.select(&store, Some(ElementId::intern("sel_clear"))).unwrap();
        sel.select_from_pointer(&store, None).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn forget_only_matching_id() {
        let store = store_with("sel_forget", false);
        let id = ElementId::intern("sel_forget");
        let mut sel = Selection::new();
        sel.select(&store, Some(id)).unwrap();
        sel.forget(ElementId::intern("someone_else"));
        assert!(sel.is_selected(id));
        sel.forget(id);
        assert!(sel.is_empty());
    }

    #[test]
    fn reconcile_drops_dangling_selection() {
        let mut store = store_with("sel_gone", false);
        let id = ElementId::intern("sel_gone");
        let mut sel = Selection::new();
        sel.select(&store, Some(id)).unwrap();
        store.remove(id).unwrap();
        sel.reconcile(&store);
        assert!(sel.is_empty());
    }
}
