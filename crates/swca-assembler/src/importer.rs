//! Importer port.

use std::path::Path;

use crate::error::ImportResult;
use crate::scene::SceneGraph;

/// Result of one import call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Names of the objects the import created, in creation order.
    Imported(Vec<String>),
    /// The importer declined the file.
    Cancelled,
}

impl ImportOutcome {
    /// Returns the created objects, or `None` when cancelled.
    pub fn objects(&self) -> Option<&[String]> {
        match self {
            ImportOutcome::Imported(objects) => Some(objects),
            ImportOutcome::Cancelled => None,
        }
    }
}

/// The external `.gr2` importer, working on a scene of type `S`.
///
/// Implementations must add the objects they create to `scene` and return
/// their names.
pub trait CharacterImporter<S: SceneGraph + ?Sized> {
    /// Imports a whole character from its `paths.json`.
    fn import_character(&mut self, manifest: &Path, scene: &mut S) -> ImportResult<ImportOutcome>;

    /// Imports a single model file, typically the skeleton.
    fn import_model(&mut self, model: &Path, scene: &mut S) -> ImportResult<ImportOutcome>;

    /// Writes scene changes made after the imports back to the host.
    fn commit(&mut self, _scene: &mut S) -> ImportResult<()> {
        Ok(())
    }
}
