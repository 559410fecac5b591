//! Input events.
//!
//! Backends translate their native events into these types before handing
//! them to the application core; nothing here exposes winit.

mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent, TextEvent,
};
