//! Error taxonomy for the editing model.
//!
//! Programmatic calls (property panels, host code) get these back as
//! `Err`. Pointer and keyboard dispatch absorbs them instead; see
//! `vb_editor::session::EditingSession::handle`.

use crate::id::ElementId;
use thiserror::Error;

/// Errors raised by store, selection, viewport and interaction operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// The operation referenced an element that is not in the store.
    #[error("element not found: {0}")]
    NotFound(ElementId),

    /// An element with this ID already exists.
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// An interaction transition was attempted from an incompatible state.
    #[error("cannot {attempted} while {state}")]
    InvalidState {
        state: &'static str,
        attempted: &'static str,
    },

    /// A pointer-driven operation targeted a locked element.
    #[error("element is locked: {0}")]
    Locked(ElementId),

    /// Configuration was malformed or out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the editing core.
pub type EditorResult<T> = Result<T, EditorError>;

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Config(err.to_string())
    }
}
