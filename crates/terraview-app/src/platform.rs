//! Directory resolution for config, logs and output.

use std::path::{Path, PathBuf};

use crate::error::AppError;

const APP_NAME: &str = "terraview";

/// Where the viewer reads and writes files.
#[derive(Debug, Clone, PartialEq)]
pub struct AppDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Platform directories, without creating them.
    pub fn resolve() -> Result<Self, AppError> {
        let base = dirs::config_dir().ok_or(AppError::NoConfigDir)?;
        let app = base.join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| app.join("logs"));
        Ok(Self {
            config_dir: app,
            log_dir,
        })
    }

    /// Directories rooted under `root`, for tests and `--config` overrides.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }

    pub fn create_all(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::resolve_with_root(tmp.path());
        assert_eq!(dirs.config_dir, tmp.path());
        dirs.create_all().unwrap();
        assert!(dirs.log_dir.is_dir());
    }
}
