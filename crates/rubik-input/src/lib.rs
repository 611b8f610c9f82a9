//! Keyboard and mouse state, and the rebindable action table that turns
//! them into cube commands.

pub mod bindings;
pub mod keyboard;
pub mod mouse;

pub use bindings::{Binding, BindingError, Conflict, CubeAction, KeyBindings, MouseButtonBinding};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::{CLICK_SLOP_PX, MouseState};
