//! Settings locating the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DATA_ENV_VAR: &str = "INVOICE_DESK_DATA";
pub const DEFAULT_DATA_ROOT: &str = "~/Documents/Invoices";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    pub data_root: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
        }
    }
}

impl AppSettings {
    /// Data directory with `~` expanded. The environment override wins.
    pub fn data_dir(&self) -> PathBuf {
        let raw = std::env::var(DATA_ENV_VAR).unwrap_or_else(|_| self.data_root.clone());
        PathBuf::from(expand_home_dir(&raw))
    }
}

pub fn config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "invoice-desk", "app") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).ok();
        }
        return config_dir.join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

/// `Ok(None)` when no settings were saved yet.
pub fn load_settings(path: &Path) -> Result<Option<AppSettings>> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file");
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    let toml_str = toml::to_string_pretty(settings).map_err(|e| Error::Tool {
        tool: "toml",
        detail: e.to_string(),
    })?;
    fs::write(path, toml_str).map_err(|e| Error::io(path, e))
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
