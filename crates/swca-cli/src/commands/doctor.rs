//! Doctor command implementation
//!
//! Checks preferences, the asset-extraction root, and Blender.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::{Command, ExitCode};
use swca_gather::{check_resources, ResourcesStatus};

use super::assemble::HostSettings;
use crate::config::{preferences_path, Preferences, RESOURCES_ENV};

/// Run the doctor command
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(config: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "SWTOR Character Assembler Doctor".cyan().bold());
    println!("{}", "================================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!("  {} swca v{}", "->".green(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("{}", "Configuration:".bold());
    let path = preferences_path(config)?;
    let prefs = match Preferences::load(&path) {
        Ok(prefs) => {
            let state = if path.exists() { "found" } else { "not created yet" };
            println!("  {} Preferences {} ({})", "ok".green(), path.display(), state);
            prefs
        }
        Err(e) => {
            println!("  {} {:#}", "!!".red(), e);
            all_ok = false;
            Preferences::default()
        }
    };

    let resources = prefs.resolve_resources(None, std::env::var_os(RESOURCES_ENV));
    match check_resources(resources.as_deref()) {
        ResourcesStatus::Set => println!(
            "  {} 'resources' folder {}",
            "ok".green(),
            resources.unwrap_or_default().display()
        ),
        status => {
            println!("  {} 'resources' folder is {}", "!!".yellow(), status.verbose());
            println!(
                "     {}",
                "Without it, assets cannot be gathered into character folders.".dimmed()
            );
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Dependencies:".bold());
    let orchestrator = HostSettings::default().orchestrator(&prefs);
    match orchestrator.find_blender() {
        Ok(blender) => {
            let version = blender_version(&blender).unwrap_or_else(|| "unknown".to_string());
            println!("  {} Blender {} ({})", "ok".green(), version, blender.display());
            println!(
                "     {}",
                "The .gr2 importer add-on (io_scene_gr2) must be installed in it.".dimmed()
            );
        }
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

fn parse_blender_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Blender "))
        .map(|v| v.trim().to_string())
}

fn blender_version(blender: &Path) -> Option<String> {
    let output = Command::new(blender).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_blender_version(&String::from_utf8_lossy(&output.stdout))
}
