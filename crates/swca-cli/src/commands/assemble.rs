//! Assemble command implementation
//!
//! Gathers a character's assets, imports it through Blender and organises
//! the result.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use swca_assembler::{AssembleOptions, Assembler, AssemblyReport, MemoryScene};
use swca_backend_blender::{
    BlenderImporter, Orchestrator, OrchestratorConfig, DEFAULT_TIMEOUT_SECS,
};
use swca_gather::CharacterFolder;

use super::reporting::{print_assembly_report, print_copy_progress};
use crate::config::{preferences_path, Preferences, RESOURCES_ENV};

/// How to reach Blender.
#[derive(Debug, Clone)]
pub struct HostSettings {
    /// The session `.blend` file.
    pub blend: Option<PathBuf>,
    /// Blender executable, overriding preferences and lookup.
    pub blender: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            blend: None,
            blender: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HostSettings {
    pub(crate) fn orchestrator(&self, prefs: &Preferences) -> Orchestrator {
        let mut config = OrchestratorConfig::default().timeout_secs(self.timeout_secs);
        if let Some(blender) = self.blender.as_ref().or(prefs.blender_path.as_ref()) {
            config = config.blender_path(blender);
        }
        Orchestrator::with_config(config)
    }
}

/// Returns `<character folder>/<character>.blend`.
pub fn default_blend(manifest: &Path) -> PathBuf {
    let character = CharacterFolder::from_manifest_path(manifest);
    character.root().join(format!("{}.blend", character.name()))
}

/// Run the assemble command
///
/// # Arguments
/// * `manifest` - Path to the character's `paths.json`
/// * `resources` - Asset-extraction root from the command line
/// * `options` - Assembly options
/// * `host` - Blender settings
/// * `config` - Preferences file override
/// * `json_output` - Print the report as JSON
///
/// # Returns
/// Exit code: 0 unless the run was cancelled
pub fn run(
    manifest: &Path,
    resources: Option<&Path>,
    options: AssembleOptions,
    host: &HostSettings,
    config: Option<&Path>,
    json_output: bool,
) -> Result<ExitCode> {
    let prefs = Preferences::load(&preferences_path(config)?)?;
    let resources = prefs.resolve_resources(resources, std::env::var_os(RESOURCES_ENV));
    let blend = host
        .blend
        .clone()
        .unwrap_or_else(|| default_blend(manifest));

    if !json_output {
        println!("{} {}", "Assembling".cyan().bold(), manifest.display());
        println!("  {} {}", "blend".dimmed(), blend.display());
        println!();
    }

    let mut importer = BlenderImporter::new(host.orchestrator(&prefs), Some(blend));
    let mut scene = MemoryScene::new();

    let mut assembler = Assembler::new(options);
    if let Some(root) = resources {
        assembler = assembler.resources(root);
    }
    if !json_output {
        assembler = assembler.on_progress(print_copy_progress);
    }
    let report = assembler.run(manifest, &mut importer, &mut scene);

    finish(&report, json_output)
}

fn finish(report: &AssemblyReport, json_output: bool) -> Result<ExitCode> {
    if json_output {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_assembly_report(report);
    }

    if report.is_cancelled() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
