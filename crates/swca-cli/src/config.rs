//! User preferences.
//!
//! Stored as `preferences.json` under `<config dir>/swca/`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Environment variable holding the asset-extraction root.
pub const RESOURCES_ENV: &str = "SWCA_RESOURCES";

/// Persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// The extraction's `resources` folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_folder: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blender_path: Option<PathBuf>,
}

impl Preferences {
    /// Get the default preferences file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("swca").join(PREFERENCES_FILE_NAME))
    }

    /// Loads preferences, treating a missing file as empty preferences.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::debug!("loading preferences from {}", path.display());
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))?;
        log::info!("saved preferences to {}", path.display());
        Ok(())
    }

    /// Picks the asset-extraction root: flag, then environment, then file.
    pub fn resolve_resources(&self, flag: Option<&Path>, env: Option<OsString>) -> Option<PathBuf> {
        let (source, folder) = if let Some(flag) = flag {
            ("--resources", Some(flag.to_path_buf()))
        } else if let Some(env) = env.filter(|v| !v.is_empty()) {
            (RESOURCES_ENV, Some(PathBuf::from(env)))
        } else {
            ("preferences", self.resources_folder.clone())
        };
        match &folder {
            Some(folder) => log::info!("resources folder {} (from {})", folder.display(), source),
            None => log::info!("no resources folder configured"),
        }
        folder
    }
}

/// Returns the preferences file to use, honouring a `--config` override.
pub fn preferences_path(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => Preferences::default_path().context("Failed to determine config directory"),
    }
}
