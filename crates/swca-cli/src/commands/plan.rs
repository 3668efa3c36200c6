//! Plan command implementation
//!
//! Prints the copy plan of a character without touching the filesystem.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use swca_gather::{check_resources, CharacterFolder, CopyPlan, CopyPlanner};
use swca_manifest::{AssetKind, AssetManifest, SkeletonManifest};

use super::reporting::print_plan_warning;
use crate::config::{preferences_path, Preferences, RESOURCES_ENV};

/// Resolves the copy plan of `manifest`.
pub fn build_plan(manifest: &Path, resources: &Path) -> Result<CopyPlan> {
    let parsed = AssetManifest::load(manifest)
        .with_context(|| format!("Failed to load manifest: {}", manifest.display()))?;
    let character = CharacterFolder::from_manifest_path(manifest);
    let skeleton = SkeletonManifest::load_optional(&character.skeleton_manifest_path())
        .context("Failed to load skeleton manifest")?;
    Ok(CopyPlanner::new(resources, &character).plan(&parsed, skeleton.as_ref()))
}

/// Run the plan command
///
/// # Returns
/// Exit code: 0 if the plan has no warnings, 1 otherwise
pub fn run(
    manifest: &Path,
    resources: Option<&Path>,
    config: Option<&Path>,
    json_output: bool,
) -> Result<ExitCode> {
    let prefs = Preferences::load(&preferences_path(config)?)?;
    let resources = prefs.resolve_resources(resources, std::env::var_os(RESOURCES_ENV));
    let status = check_resources(resources.as_deref());
    let root = match resources.filter(|_| status.is_usable()) {
        Some(root) => root,
        None => bail!("The 'resources' folder is {}", status.verbose()),
    };

    let plan = build_plan(manifest, &root)?;

    if json_output {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{}", json);
    } else {
        println!("{} {}", "Copy plan for".cyan().bold(), manifest.display());
        println!();
        for item in &plan.items {
            println!("  {} - {}", item.slot.bold(), item.kind.as_str());
            println!("     {}", item.source.display().to_string().dimmed());
            println!("     {}", item.destination.display());
        }
        println!();
        if !plan.warnings.is_empty() {
            println!("{}", "Warnings:".yellow().bold());
            for warning in &plan.warnings {
                print_plan_warning(warning);
            }
            println!();
        }
        println!(
            "{} models, {} material definitions, {} texture maps, {} skeleton",
            plan.count(AssetKind::Model),
            plan.count(AssetKind::MaterialDefinition),
            plan.count(AssetKind::TextureMap),
            plan.count(AssetKind::SkeletonModel)
        );
    }

    if plan.warnings.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
