pub mod commands;
pub mod input;
pub mod interaction;
pub mod palette;
pub mod session;
pub mod shortcuts;

pub use commands::History;
pub use input::{GestureSource, InputEvent, Modifiers, PointerButton};
pub use interaction::Interaction;
pub use palette::{DropTarget, PaletteDescriptor};
pub use session::{EditingSession, SessionSnapshot};
pub use shortcuts::{ShortcutAction, ShortcutMap};
