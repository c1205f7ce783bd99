//! Undo/redo history.
//!
//! Every entry stores the full element list and selection before and after
//! the edit. Canvases hold tens of elements, so whole-state snapshots are
//! cheaper to reason about than per-mutation inverses.
//!
//! Pointer gestures use **batching**: the state is captured when the
//! gesture starts and compared when it ends, so a drag of a hundred moves
//! undoes in a single step, and a gesture that changed nothing (e.g. a
//! drag on a locked element) leaves no entry at all.

use vb_core::model::CanvasElement;
use vb_core::selection::Selection;

/// Editable state captured for undo.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub elements: Vec<CanvasElement>,
    pub selection: Selection,
}

#[derive(Debug, Clone)]
struct Entry {
    before: EditState,
    after: EditState,
    description: String,
}

/// Manages undo/redo stacks with batch grouping for gestures.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// State captured at the start of the outermost batch.
    batch_before: Option<EditState>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            batch_depth: 0,
            batch_before: None,
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Start a batch group. Edits until the matching `end_batch` collapse
    /// into one entry.
    pub fn begin_batch(&mut self, current: EditState) {
        if self.batch_depth == 0 {
            self.batch_before = Some(current);
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, push one entry
    /// if the state actually changed. Returns whether an entry was pushed.
    pub fn end_batch(&mut self, current: EditState, description: &str) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        match self.batch_before.take() {
            Some(before) => self.push(before, current, description),
            None => false,
        }
    }

    /// Record a discrete edit. Inside a batch this is a no-op: the batch
    /// snapshot already covers it.
    pub fn record(&mut self, before: EditState, after: EditState, description: &str) -> bool {
        if self.is_batching() {
            return false;
        }
        self.push(before, after, description)
    }

    fn push(&mut self, before: EditState, after: EditState, description: &str) -> bool {
        if before == after {
            return false;
        }
        log::debug!("history: push '{description}'");
        self.undo_stack.push(Entry {
            before,
            after,
            description: description.to_string(),
        });
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // New edit invalidates the redo branch.
        self.redo_stack.clear();
        true
    }

    /// Pop the last entry. Returns the state to restore and its description.
    pub fn undo(&mut self) -> Option<(EditState, String)> {
        let entry = self.undo_stack.pop()?;
        let restore = (entry.before.clone(), entry.description.clone());
        self.redo_stack.push(entry);
        Some(restore)
    }

    /// Re-apply the last undone entry.
    pub fn redo(&mut self) -> Option<(EditState, String)> {
        let entry = self.redo_stack.pop()?;
        let restore = (entry.after.clone(), entry.description.clone());
        self.undo_stack.push(entry);
        Some(restore)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_before = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use pretty_assertions::assert_eq;
    use vb_core::id::ElementId;
    use vb_core::model::ElementContent;

    fn state(labels: &[&str]) -> EditState {
        EditState {
            elements: labels
                .iter()
                .map(|l| {
                    CanvasElement::new(
                        ElementId::intern(l),
                        ElementContent::text(*l),
                        Point::ZERO,
                        Size::new(10.0, 10.0),
                    )
                })
                .collect(),
            selection: Selection::new(),
        }
    }

    #[test]
    fn record_then_undo_redo() {
        let mut h = History::new(10);
        assert!(h.record(state(&[]), state(&["h_a"]), "add"));

        let (restored, desc) = h.undo().unwrap();
        assert_eq!(restored, state(&[]));
        assert_eq!(desc, "add");
        assert!(h.can_redo());

        let (restored, _) = h.redo().unwrap();
        assert_eq!(restored, state(&["h_a"]));
        assert!(!h.can_redo());
    }

    #[test]
    fn unchanged_edit_is_not_recorded() {
        let mut h = History::new(10);
        assert!(!h.record(state(&["h_same"]), state(&["h_same"]), "noop"));
        assert!(!h.can_undo());
    }

    #[test]
    fn batch_collapses_to_one_entry() {
        let mut h = History::new(10);
        h.begin_batch(state(&[]));
        // Discrete records inside the batch are folded in.
        assert!(!h.record(state(&[]), state(&["h_b1"]), "inner"));
        h.begin_batch(state(&["h_b1"]));
        assert!(!h.end_batch(state(&["h_b1"]), "nested"));
        assert!(h.end_batch(state(&["h_b1", "h_b2"]), "gesture"));
        assert_eq!(h.undo_len(), 1);

        let (restored, desc) = h.undo().unwrap();
        assert_eq!(restored, state(&[]));
        assert_eq!(desc, "gesture");
    }

    #[test]
    fn empty_batch_leaves_no_entry() {
        let mut h = History::new(10);
        h.begin_batch(state(&["h_idle"]));
        assert!(!h.end_batch(state(&["h_idle"]), "gesture"));
        assert!(!h.can_undo());
        // Unbalanced end is ignored.
        assert!(!h.end_batch(state(&[]), "stray"));
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut h = History::new(10);
        h.record(state(&[]), state(&["h_r1"]), "one");
        h.undo();
        assert!(h.can_redo());
        h.record(state(&[]), state(&["h_r2"]), "two");
        assert!(!h.can_redo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut h = History::new(2);
        h.record(state(&[]), state(&["d1"]), "1");
        h.record(state(&["d1"]), state(&["d1", "d2"]), "2");
        h.record(state(&["d1", "d2"]), state(&["d1", "d2", "d3"]), "3");
        assert_eq!(h.undo_len(), 2);
        assert_eq!(h.undo().unwrap().1, "3");
        assert_eq!(h.undo().unwrap().1, "2");
        assert!(h.undo().is_none());
    }
}
