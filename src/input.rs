use egui::Pos2;

mod router;

pub use router::{resolve_open_gesture, route_event};

/// Input the engine reacts to, already translated from the host toolkit.
///
/// Pointer positions are canvas-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button went down over the canvas
    PointerDown { position: Pos2 },
    /// Pointer moved while the button is held
    PointerMove { position: Pos2 },
    /// Primary button was released
    PointerUp { position: Pos2 },
    /// Characters typed into the open text field
    TextTyped(String),
    TextBackspace,
    /// Explicit confirm (Enter)
    TextConfirm,
    /// Explicit cancel (Escape)
    TextCancel,
    /// The text field lost keyboard focus
    TextFocusLost,
}
