//! Keyboard shortcut mapping.
//!
//! `ShortcutMap::resolve` turns a `KeyboardEvent.key` value plus modifiers
//! into a `ShortcutAction`. Either `ctrl` or `meta` counts as the command
//! modifier, so the same table serves macOS and everything else.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    ToggleLock,
    /// Move the selection by one unit (`large`: one grid cell) per axis.
    Nudge { dx: i8, dy: i8, large: bool },

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleGrid,
    ToggleSnap,
    /// Space held: primary drags pan until released.
    PanStart,

    // ── Z-order ──
    BringForward,
    SendBackward,

    // ── UI ──
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// `None` when the combo is unbound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.cmd();
        let shift = modifiers.shift;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "'" | "\"" => Some(ShortcutAction::ToggleSnap),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "l" | "L" => Some(ShortcutAction::ToggleLock),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                "]" => Some(ShortcutAction::BringForward),
                "[" => Some(ShortcutAction::SendBackward),
                "'" => Some(ShortcutAction::ToggleGrid),
                _ => None,
            };
        }

        if let Some((dx, dy)) = arrow(key) {
            return Some(ShortcutAction::Nudge {
                dx,
                dy,
                large: shift,
            });
        }

        if shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}

fn arrow(key: &str) -> Option<(i8, i8)> {
    match key {
        "ArrowLeft" => Some((-1, 0)),
        "ArrowRight" => Some((1, 0)),
        "ArrowUp" => Some((0, -1)),
        "ArrowDown" => Some((0, 1)),
        _ => None,
    }
}
