//! Config command implementation
//!
//! Shows and edits the preferences file.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use swca_gather::check_resources;

use crate::config::{preferences_path, Preferences};

fn show_value(value: Option<&Path>) -> String {
    value
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".dimmed().to_string())
}

/// Prints the preferences.
pub fn show(config: Option<&Path>) -> Result<ExitCode> {
    let path = preferences_path(config)?;
    let prefs = Preferences::load(&path)?;

    println!("{} {}", "Preferences:".bold(), path.display());
    println!(
        "  resources_folder = {} ({})",
        show_value(prefs.resources_folder.as_deref()),
        check_resources(prefs.resources_folder.as_deref())
    );
    println!(
        "  blender_path     = {}",
        show_value(prefs.blender_path.as_deref())
    );
    Ok(ExitCode::SUCCESS)
}

/// Stores the asset-extraction root after checking it.
pub fn set_resources(config: Option<&Path>, folder: &Path) -> Result<ExitCode> {
    let status = check_resources(Some(folder));
    if !status.is_usable() {
        bail!("The 'resources' folder is {}", status.verbose());
    }

    let path = preferences_path(config)?;
    let mut prefs = Preferences::load(&path)?;
    prefs.resources_folder = Some(folder.to_path_buf());
    prefs.save(&path)?;

    println!("{} resources_folder = {}", "ok".green(), folder.display());
    Ok(ExitCode::SUCCESS)
}

/// Stores the Blender executable.
pub fn set_blender(config: Option<&Path>, blender: &Path) -> Result<ExitCode> {
    if !blender.is_file() {
        bail!("Blender executable not found: {}", blender.display());
    }

    let path = preferences_path(config)?;
    let mut prefs = Preferences::load(&path)?;
    prefs.blender_path = Some(blender.to_path_buf());
    prefs.save(&path)?;

    println!("{} blender_path = {}", "ok".green(), blender.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use swca_gather::RESOURCES_PROBE;

    #[test]
    fn test_set_resources_persists_valid_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let resources = tmp.path().join("resources");
        fs::create_dir_all(resources.join(RESOURCES_PROBE)).unwrap();
        let config = tmp.path().join("swca").join("preferences.json");

        set_resources(Some(&config), &resources).unwrap();
        let prefs = Preferences::load(&config).unwrap();
        assert_eq!(prefs.resources_folder, Some(resources));
    }

    #[test]
    fn test_set_resources_rejects_folder_without_materials() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("preferences.json");

        let err = set_resources(Some(&config), tmp.path()).unwrap_err();
        assert!(err.to_string().contains("'resources' folder"));
        assert!(!config.exists());
    }

    #[test]
    fn test_set_blender_keeps_resources() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("preferences.json");
        let blender = tmp.path().join("blender");
        fs::write(&blender, "").unwrap();
        Preferences {
            resources_folder: Some(tmp.path().join("resources")),
            blender_path: None,
        }
        .save(&config)
        .unwrap();

        set_blender(Some(&config), &blender).unwrap();
        let prefs = Preferences::load(&config).unwrap();
        assert_eq!(prefs.blender_path, Some(blender));
        assert_eq!(prefs.resources_folder, Some(tmp.path().join("resources")));
    }
}
