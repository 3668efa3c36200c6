//! The `.gr2` importer reached through Blender.
//!
//! Every call runs one Blender session against the same `.blend` file: the
//! imports add objects to it, and [`CharacterImporter::commit`] replays the
//! journaled reconciliation on it.

use std::path::{Path, PathBuf};

use swca_assembler::{
    CharacterImporter, ImportError, ImportOutcome, ImportResult, MemoryScene, SceneOp,
};

use crate::error::{BlenderError, BlenderResult};
use crate::orchestrator::{HostMode, Orchestrator};
use crate::report::{HostJob, HostReport};

/// A [`CharacterImporter`] backed by a headless Blender.
#[derive(Debug, Clone)]
pub struct BlenderImporter {
    orchestrator: Orchestrator,
    blend: Option<PathBuf>,
}

impl BlenderImporter {
    /// Creates an importer working on `blend`.
    ///
    /// Without a `.blend` each session starts from an empty file and nothing
    /// is kept, which is only useful for dry runs.
    pub fn new(orchestrator: Orchestrator, blend: Option<PathBuf>) -> Self {
        Self {
            orchestrator,
            blend,
        }
    }

    pub fn blend(&self) -> Option<&Path> {
        self.blend.as_deref()
    }

    /// Mirrors every object and collection of the `.blend` into a fresh scene.
    pub fn inspect(&self) -> BlenderResult<MemoryScene> {
        let report = self
            .orchestrator
            .run_job(HostMode::Inspect, &HostJob::new(self.blend.clone()))?;
        let mut scene = MemoryScene::new();
        report.seed(&mut scene);
        Ok(scene)
    }

    /// Replays `operations` on the `.blend` and saves it.
    pub fn apply(&self, operations: Vec<SceneOp>) -> BlenderResult<HostReport> {
        log::info!("applying {} scene operations", operations.len());
        let job = HostJob::new(self.blend.clone()).operations(operations);
        self.orchestrator.run_job(HostMode::Apply, &job)
    }

    fn import(
        &self,
        mode: HostMode,
        path: &Path,
        scene: &mut MemoryScene,
    ) -> ImportResult<ImportOutcome> {
        let job = HostJob::new(self.blend.clone()).filepath(path);
        let report = self
            .orchestrator
            .run_job(mode, &job)
            .map_err(|e| import_error(path, e))?;

        if report.cancelled {
            return Ok(ImportOutcome::Cancelled);
        }
        report.seed(scene);
        Ok(ImportOutcome::Imported(report.object_names()))
    }
}

impl CharacterImporter<MemoryScene> for BlenderImporter {
    fn import_character(
        &mut self,
        manifest: &Path,
        scene: &mut MemoryScene,
    ) -> ImportResult<ImportOutcome> {
        self.import(HostMode::ImportCharacter, manifest, scene)
    }

    fn import_model(&mut self, model: &Path, scene: &mut MemoryScene) -> ImportResult<ImportOutcome> {
        self.import(HostMode::ImportModel, model, scene)
    }

    fn commit(&mut self, scene: &mut MemoryScene) -> ImportResult<()> {
        let operations = scene.take_journal();
        if operations.is_empty() {
            return Ok(());
        }
        self.apply(operations)
            .map(|_| ())
            .map_err(|e| ImportError::Commit(format!("[{}] {}", e.code(), e)))
    }
}

fn import_error(path: &Path, e: BlenderError) -> ImportError {
    if e.is_unavailable() {
        ImportError::Unavailable(format!("[{}] {}", e.code(), e))
    } else {
        ImportError::Fault {
            path: path.to_path_buf(),
            message: format!("[{}] {}", e.code(), e),
        }
    }
}
