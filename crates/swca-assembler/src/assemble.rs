//! The top-level assembly operation.

use std::path::{Path, PathBuf};

use swca_gather::{
    check_resources, ensure_black_dds, CharacterFolder, CopyExecutor, CopyItem, CopyPlanner,
    CopyStatus, BLACK_DDS_PATH,
};
use swca_manifest::{AssetManifest, PresetManifest, SkeletonManifest};

use crate::importer::{CharacterImporter, ImportOutcome};
use crate::options::AssembleOptions;
use crate::reconcile::reconcile;
use crate::report::{AssemblyReport, GatherSummary};
use crate::scene::{ObjectKind, SceneGraph};

type ProgressFn<'a> = Box<dyn FnMut(&CopyItem, &CopyStatus) + 'a>;

/// Assembles characters from their `paths.json`.
///
/// A run never fails: every outcome, including a rejected manifest, is a
/// [`AssemblyReport`] with a terminal status.
pub struct Assembler<'a> {
    options: AssembleOptions,
    resources: Option<PathBuf>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler with no asset-extraction root.
    pub fn new(options: AssembleOptions) -> Self {
        Self {
            options,
            resources: None,
            progress: None,
        }
    }

    /// Sets the asset-extraction `resources` root.
    pub fn resources(mut self, root: impl Into<PathBuf>) -> Self {
        self.resources = Some(root.into());
        self
    }

    /// Reports each copy as it completes.
    pub fn on_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(&CopyItem, &CopyStatus) + 'a,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Gathers, imports and reconciles one character.
    pub fn run<S, I>(
        &mut self,
        manifest_path: &Path,
        importer: &mut I,
        scene: &mut S,
    ) -> AssemblyReport
    where
        S: SceneGraph + ?Sized,
        I: CharacterImporter<S> + ?Sized,
    {
        let character = CharacterFolder::from_manifest_path(manifest_path);
        let mut report = AssemblyReport::new(character.name());

        let manifest = match AssetManifest::load(manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::error!("{}", e);
                return report.cancel(e.to_string());
            }
        };

        let skeleton = match SkeletonManifest::load_optional(&character.skeleton_manifest_path()) {
            Ok(skeleton) => skeleton,
            Err(e) => {
                report.warn(format!("Ignoring the skeleton: {}", e));
                None
            }
        };

        let resources = check_resources(self.resources.as_deref());
        match self.resources.clone().filter(|_| resources.is_usable()) {
            Some(root) => self.gather(&root, &character, &manifest, skeleton.as_ref(), &mut report),
            None => report.warn(format!(
                "The 'resources' folder is {} Skipping asset gathering.",
                resources.verbose()
            )),
        }

        let gather_text = match &report.gathering {
            Some(summary) if summary.failed > 0 => {
                "Character's assets copied to its folder. SOME FILES FAILED TO BE COPIED!"
            }
            Some(_) => "Character's assets copied to its folder.",
            None => "Asset gathering skipped.",
        };

        if self.options.gather_only {
            return report.finish(gather_text);
        }

        log::info!("importing {}", manifest_path.display());
        let objects = match importer.import_character(manifest_path, scene) {
            Ok(ImportOutcome::Imported(objects)) => objects,
            Ok(ImportOutcome::Cancelled) => {
                report.warn(format!(
                    "The .gr2 importer failed to import {}",
                    manifest_path.display()
                ));
                return report.cancel(format!("{} Character import cancelled.", gather_text));
            }
            Err(e) => {
                report.warn(format!("[{}] {}", e.code(), e));
                let mut text = String::from(
                    "The .gr2 importer crashed while processing this character's paths file. \
                     Please check if any of its assets is missing.",
                );
                if !resources.is_usable() {
                    text.push_str(
                        " If an asset extraction's 'resources' folder is available, \
                         set it and try again.",
                    );
                }
                return report.cancel(text);
            }
        };
        report.imported_objects = objects.clone();

        let skeleton_object = if self.options.import_skeleton {
            skeleton
                .as_ref()
                .and_then(SkeletonManifest::reference)
                .and_then(|reference| character.destination_of(&reference))
                .and_then(|model| import_skeleton(importer, scene, &model, &mut report))
        } else {
            None
        };

        let preset = if self.options.collect {
            match PresetManifest::load_optional(&character.preset_manifest_path()) {
                Ok(preset) => preset,
                Err(e) => {
                    report.warn(format!("Ignoring the in-game names: {}", e));
                    None
                }
            }
        } else {
            None
        };

        let reconciliation = reconcile(
            scene,
            character.name(),
            &objects,
            skeleton_object.as_deref(),
            preset.as_ref(),
            &self.options,
        );
        report.skeleton = skeleton_object;
        report.reconciliation = Some(reconciliation);

        if let Err(e) = importer.commit(scene) {
            report.warn(format!("[{}] {}", e.code(), e));
        }

        let summary = format!(
            "{} Character imported: {} objects.",
            gather_text,
            report.imported_objects.len()
        );
        report.finish(summary)
    }

    fn gather(
        &mut self,
        root: &Path,
        character: &CharacterFolder,
        manifest: &AssetManifest,
        skeleton: Option<&SkeletonManifest>,
        report: &mut AssemblyReport,
    ) {
        match ensure_black_dds(root) {
            Ok(true) => log::info!("placed a missing {} in {}", BLACK_DDS_PATH, root.display()),
            Ok(false) => {}
            Err(e) => report.warn(format!("Could not place {}: {}", BLACK_DDS_PATH, e)),
        }

        let plan = CopyPlanner::new(root, character).plan(manifest, skeleton);
        for warning in &plan.warnings {
            report.warn(format!(
                "{} - [{}] {}: {}",
                warning.slot,
                warning.code,
                warning.path.display(),
                warning.message
            ));
        }

        let executor = CopyExecutor::new(self.options.preserve_existing);
        let outcome = match self.progress.as_mut() {
            Some(progress) => {
                executor.execute_with_progress(&plan.items, |item, status| progress(item, status))
            }
            None => executor.execute(&plan.items),
        };
        report.failed_items = outcome.failed_items();
        report.gathering = Some(GatherSummary::from_outcome(plan.items.len(), &outcome));
    }
}

/// Imports the skeleton model, returning its armature object.
fn import_skeleton<S, I>(
    importer: &mut I,
    scene: &mut S,
    model: &Path,
    report: &mut AssemblyReport,
) -> Option<String>
where
    S: SceneGraph + ?Sized,
    I: CharacterImporter<S> + ?Sized,
{
    match importer.import_model(model, scene) {
        Ok(ImportOutcome::Imported(objects)) => {
            let armature = objects
                .iter()
                .find(|name| scene.object_kind(name) == Some(ObjectKind::Armature))
                .or_else(|| objects.first())
                .cloned();
            if armature.is_none() {
                report.warn(format!("No skeleton object imported from {}", model.display()));
            }
            armature
        }
        Ok(ImportOutcome::Cancelled) => {
            report.warn(format!(
                "The .gr2 importer failed to import {}",
                model.display()
            ));
            None
        }
        Err(e) => {
            report.warn(format!("[{}] {}", e.code(), e));
            None
        }
    }
}
