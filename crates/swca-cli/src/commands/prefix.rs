//! Prefix command implementation
//!
//! Prefixes the names of objects in a `.blend`, together with their
//! materials and collections.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use swca_assembler::{add_prefix, MemoryScene, SceneGraph};
use swca_backend_blender::BlenderImporter;

use super::assemble::HostSettings;
use crate::config::{preferences_path, Preferences};

/// Picks the named objects plus every object inside the named collections.
pub fn select_objects(
    scene: &MemoryScene,
    objects: &[String],
    collections: &[String],
) -> Result<Vec<String>> {
    let mut selected = Vec::new();
    for object in objects {
        if !scene.has_object(object) {
            bail!("No object named '{}'", object);
        }
        if !selected.contains(object) {
            selected.push(object.clone());
        }
    }
    for collection in collections {
        if !scene.has_collection(collection) {
            bail!("No collection named '{}'", collection);
        }
        for object in scene.collection_objects_recursive(collection) {
            if !selected.contains(&object) {
                selected.push(object);
            }
        }
    }
    Ok(selected)
}

/// Run the prefix command
pub fn run(
    host: &HostSettings,
    prefix: &str,
    objects: &[String],
    collections: &[String],
    config: Option<&Path>,
) -> Result<ExitCode> {
    let Some(blend) = host.blend.clone() else {
        bail!("A .blend file is required");
    };
    if !blend.is_file() {
        bail!("No .blend file at {}", blend.display());
    }
    if prefix.is_empty() {
        bail!("The prefix must not be empty");
    }

    let prefs = Preferences::load(&preferences_path(config)?)?;
    let importer = BlenderImporter::new(host.orchestrator(&prefs), Some(blend.clone()));
    let mut scene = importer
        .inspect()
        .with_context(|| format!("Failed to inspect {}", blend.display()))?;

    let selected = select_objects(&scene, objects, collections)?;
    if selected.is_empty() {
        bail!("Nothing to prefix: name objects with --object or --collection");
    }

    let summary = add_prefix(&mut scene, &selected, prefix);
    let operations = scene.take_journal();
    if !operations.is_empty() {
        importer
            .apply(operations)
            .with_context(|| format!("Failed to rename in {}", blend.display()))?;
    }

    println!(
        "{} {} objects, {} armatures, {} materials, {} collections prefixed with '{}'",
        "ok".green(),
        summary.objects,
        summary.armatures,
        summary.materials,
        summary.collections,
        prefix
    );
    Ok(ExitCode::SUCCESS)
}
