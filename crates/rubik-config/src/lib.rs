//! Configuration for the cube viewer.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Every section defaults field by field, so older or partial
//! files still load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, CubeConfig, DebugConfig, InputConfig, WindowConfig};
pub use error::ConfigError;
