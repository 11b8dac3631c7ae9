//! Unified path management for vscls files.
//!
//! ```text
//! ~/.config/vscls/        # Config directory (platform config dir + "vscls")
//! ├── config.toml         # User configuration
//! ├── state.toml          # Machine id and other generated state
//! └── logs/               # Rolling log files
//!     └── vscls.log.YYYY-MM-DD
//! ```
//!
//! Secrets are not stored here; they live in the OS keyring.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "vscls";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find the configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for vscls_core::VsclsError {
    fn from(err: PathError) -> Self {
        vscls_core::VsclsError::config(err.to_string())
    }
}

/// Resolves every file vscls reads or writes.
#[derive(Debug, Clone)]
pub struct VsclsPaths {
    root: PathBuf,
}

impl VsclsPaths {
    /// Uses `base` as the config directory, or the platform default
    /// (`~/.config/vscls` on Linux) when `None`.
    pub fn new(base: Option<&Path>) -> Result<Self, PathError> {
        let root = match base {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR_NAME),
        };
        Ok(Self { root })
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root_ends_with_app_name() {
        // Not every CI sandbox has a config dir
        if let Ok(paths) = VsclsPaths::new(None) {
            assert!(paths.config_dir().ends_with("vscls"));
        }
    }

    #[test]
    fn test_files_live_under_base() {
        let base = PathBuf::from("/tmp/vscls-test");
        let paths = VsclsPaths::new(Some(&base)).unwrap();

        assert_eq!(paths.config_file(), base.join("config.toml"));
        assert_eq!(paths.state_file(), base.join("state.toml"));
        assert!(paths.logs_dir().starts_with(&base));
        assert!(paths.logs_dir().ends_with("logs"));
    }
}
