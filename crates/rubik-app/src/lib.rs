//! Cube viewer application: frame loop, platform directories, and the
//! session that ties the cube engine to input and cameras.

pub mod controller;
pub mod game_loop;
pub mod platform;
pub mod session;

pub use controller::{FrameTargets, InputController};
pub use game_loop::GameLoop;
pub use platform::{PlatformDirs, PlatformError};
pub use session::Session;
