//! # Configuration
//!
//! Verso configuration is loaded with [`confique`] from, in priority order:
//! 1. **Environment variables**: `VERSO_MODULE_DIR`, `VERSO_PROGRESS_STEP`,
//!    `VERSO_CASE_SENSITIVE`.
//! 2. **Config file**: `verso.toml` in the OS config directory (via `directories`), or an
//!    explicit path.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `module_dir` | `<data dir>/modules` | Directory of JSON module files |
//! | `progress_step` | `1` | Minimum percentage points between search progress reports |
//! | `case_sensitive` | `false` | Default case handling for text searches |

use crate::error::Result;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "verso.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("rs", "verso", "verso")
}

/// Configuration for verso, stored in `verso.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersoConfig {
    /// Directory holding module files. Falls back to the OS data directory.
    #[config(env = "VERSO_MODULE_DIR")]
    pub module_dir: Option<PathBuf>,

    #[config(env = "VERSO_PROGRESS_STEP", default = 1)]
    pub progress_step: u8,

    /// Whether text searches match case unless told otherwise.
    #[config(env = "VERSO_CASE_SENSITIVE", default = false)]
    pub case_sensitive: bool,
}

impl Default for VersoConfig {
    fn default() -> Self {
        Self {
            module_dir: None,
            progress_step: 1,
            case_sensitive: false,
        }
    }
}

impl VersoConfig {
    /// Loads environment, then `path` (or the default config file when `None`), then
    /// defaults. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        match path {
            Some(path) => builder = builder.file(path),
            None => {
                if let Some(default) = default_config_path() {
                    builder = builder.file(default);
                }
            }
        }
        let config = builder.load()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// The configured module directory, or `<data dir>/modules`, or `./modules` when the
    /// OS offers no data directory.
    pub fn module_dir(&self) -> PathBuf {
        self.module_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("modules")))
            .unwrap_or_else(|| PathBuf::from("modules"))
    }

    pub fn progress_step(&self) -> u8 {
        self.progress_step.clamp(1, 100)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = VersoConfig::default();
        assert_eq!(config.progress_step(), 1);
        assert!(!config.case_sensitive);
        assert!(config.module_dir().ends_with("modules"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "module_dir = \"/srv/modules\"\nprogress_step = 5\ncase_sensitive = true\n",
        )
        .unwrap();
        let config = VersoConfig::load(Some(&path)).unwrap();
        assert_eq!(config.module_dir(), PathBuf::from("/srv/modules"));
        assert_eq!(config.progress_step(), 5);
        assert!(config.case_sensitive);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = VersoConfig::load(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.progress_step, 1);
    }

    #[test]
    fn test_progress_step_is_clamped() {
        let config = VersoConfig {
            progress_step: 0,
            ..Default::default()
        };
        assert_eq!(config.progress_step(), 1);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "progress_step = \"lots\"\n").unwrap();
        assert!(matches!(
            VersoConfig::load(Some(&path)),
            Err(crate::error::VersoError::Config(_))
        ));
    }
}
