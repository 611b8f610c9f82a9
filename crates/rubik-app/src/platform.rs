//! Per-user directories for configuration, key bindings and logs.
//!
//! Paths follow OS conventions (XDG on Linux, Known Folders on Windows,
//! Library on macOS) through the `dirs` crate.

use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "rubik-cube";

const KEYBINDINGS_FILE: &str = "keybindings.ron";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where the viewer keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` and `keybindings.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolves the OS directories without creating them.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| app_config.join("logs"));
        Ok(Self {
            config_dir: app_config,
            log_dir,
        })
    }

    /// Resolves the OS directories and creates them.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if resolution or creation fails.
    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Directories under a caller-chosen root, as used by `--config`.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if a directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    pub fn keybindings_path(&self) -> PathBuf {
        self.config_dir.join(KEYBINDINGS_FILE)
    }
}
