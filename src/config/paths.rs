//! Path resolution for punch configuration and data files.
//!
//! All punch data is stored in `~/.punch/`:
//! - `config.yaml` - Main configuration file
//! - `punch.log` - Log output (the TUI owns the terminal)

use std::path::PathBuf;

use crate::error::PunchError;

/// Paths to punch configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.punch/`
    pub root: PathBuf,
    /// Config file: `~/.punch/config.yaml`
    pub config_file: PathBuf,
    /// Log file: `~/.punch/punch.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// `PUNCH_HOME` overrides the root directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PunchError> {
        if let Some(root) = std::env::var_os("PUNCH_HOME").filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or_else(|| PunchError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".punch")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            log_file: root.join("punch.log"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PunchError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                PunchError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".punch")))
    }
}
