//! Input abstraction layer.
//!
//! The host's gesture recognizer normalizes mouse, touch, keyboard and
//! palette drags into `InputEvent`s. Coordinates are screen pixels.

use crate::palette::{DropTarget, PaletteDescriptor};
use kurbo::Point;
use std::collections::VecDeque;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub const CMD: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    /// The pointer left the canvas surface mid-gesture.
    PointerLeave,
    /// Wheel or trackpad scroll at `(x, y)`.
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`, `" "`).
    KeyDown {
        key: String,
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
    },
    /// The palette started dragging a component.
    PaletteDragStart {
        descriptor: PaletteDescriptor,
    },
    PaletteDrop {
        x: f64,
        y: f64,
        target: DropTarget,
    },
    PaletteDragCancel,
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. }
            | Self::PaletteDrop { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// Pointer and palette events drive gestures; keyboard events do not.
    pub fn is_gesture(&self) -> bool {
        !matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. })
    }
}

/// Anything that yields input events in dispatch order.
pub trait GestureSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

impl GestureSource for VecDeque<InputEvent> {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_accepts_ctrl_or_meta() {
        assert!(Modifiers::CMD.cmd());
        assert!(
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            }
            .cmd()
        );
        assert!(!Modifiers::SHIFT.cmd());
    }

    #[test]
    fn position_only_for_located_events() {
        assert_eq!(
            InputEvent::pointer_down(3.0, 4.0).position(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(InputEvent::PointerLeave.position(), None);
        assert!(!InputEvent::key("z", Modifiers::CMD).is_gesture());
        assert!(InputEvent::PaletteDragCancel.is_gesture());
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue: VecDeque<InputEvent> =
            [InputEvent::pointer_down(0.0, 0.0), InputEvent::pointer_up(0.0, 0.0)].into();
        assert_eq!(queue.next_event(), Some(InputEvent::pointer_down(0.0, 0.0)));
        assert_eq!(queue.next_event(), Some(InputEvent::pointer_up(0.0, 0.0)));
        assert_eq!(queue.next_event(), None);
    }
}
