//! The optional `skeleton.json` companion manifest.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ManifestError, ManifestResult};
use crate::manifest::{AssetKind, AssetReference};
use crate::{SKELETON_FILE_NAME, SKELETON_SLOT};

/// Points at the character's rigging skeleton model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SkeletonManifest {
    #[serde(default)]
    pub path: Option<String>,
}

impl SkeletonManifest {
    /// Parses a skeleton manifest from a JSON string.
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        serde_json::from_str(json).map_err(|e| ManifestError::parse(SKELETON_FILE_NAME, e))
    }

    /// Reads a skeleton manifest, returning `None` when the file is absent.
    pub fn load_optional(path: &Path) -> ManifestResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ManifestError::read(path, e)),
        }
    }

    /// Returns the skeleton model reference, if the manifest names one.
    pub fn reference(&self) -> Option<AssetReference> {
        let path = self.path.as_deref().filter(|p| !p.is_empty())?;
        Some(AssetReference {
            slot: SKELETON_SLOT.to_string(),
            kind: AssetKind::SkeletonModel,
            relative_path: path.to_string(),
            folder: Vec::new(),
            auxiliary: None,
        })
    }
}
