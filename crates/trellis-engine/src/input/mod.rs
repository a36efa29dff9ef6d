//! Input subsystem.
//!
//! Public types are platform-agnostic. The runtime feeds winit events through
//! [`platform`] to produce [`InputEvent`]s.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub(crate) use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};
