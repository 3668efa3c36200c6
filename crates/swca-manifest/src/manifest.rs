//! The `paths.json` asset manifest.
//!
//! The exporter writes one JSON object per body or gear slot. Regular slots
//! list their models and a `materialInfo`; the `skinMats` record instead
//! nests one sub-record per skin material under `materialInfo.mats`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ManifestError, ManifestResult};
use crate::{EYE_SLOT, MANIFEST_FILE_NAME, SKIN_MATS_SLOT, TEXTURE_EXTENSION};

/// Kind of asset a reference points at. Decides the destination subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A `.gr2` model.
    Model,
    /// A `.mat` material definition.
    MaterialDefinition,
    /// A `.dds` texture map.
    TextureMap,
    /// The `.gr2` rigging skeleton.
    SkeletonModel,
}

impl AssetKind {
    /// Returns the character subfolder this kind of asset is copied into.
    pub fn subtree(&self) -> &'static str {
        match self {
            AssetKind::Model => "models",
            AssetKind::MaterialDefinition | AssetKind::TextureMap => "materials",
            AssetKind::SkeletonModel => "skeleton",
        }
    }

    /// Returns the human-readable label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Model => "model",
            AssetKind::MaterialDefinition => "material definition",
            AssetKind::TextureMap => "texture map",
            AssetKind::SkeletonModel => "skeleton model",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Material references of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialInfo {
    /// Relative path to the `.mat` definition.
    pub mat_path: Option<String>,
    /// Channel name to relative path, in manifest order. Not every value is
    /// a texture; see [`MaterialInfo::textures`].
    pub dds_paths: Vec<(String, String)>,
    /// Eye textures. Always copied to the `eye` folder.
    pub eye_mat_info: Option<Box<MaterialInfo>>,
}

impl MaterialInfo {
    /// Returns the `ddsPaths` values that are actually texture files.
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        textures(&self.dds_paths)
    }
}

/// A regular body or gear slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssets {
    pub slot_name: String,
    pub models: Vec<String>,
    pub material_info: Option<MaterialInfo>,
}

/// One skin material nested inside the `skinMats` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinMat {
    pub slot_name: String,
    pub material_info: Option<MaterialInfo>,
    /// Textures listed directly on the sub-record.
    pub dds_paths: Vec<(String, String)>,
}

impl SkinMat {
    /// Returns every texture of this skin material: the ones listed on the
    /// sub-record first, then those inside its `materialInfo`.
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        textures(&self.dds_paths).chain(self.material_info.iter().flat_map(|m| m.textures()))
    }
}

/// The `skinMats` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinMatsRecord {
    pub slot_name: String,
    pub mats: Vec<SkinMat>,
}

/// A validated `paths.json` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRecord {
    Slot(SlotAssets),
    SkinMats(SkinMatsRecord),
}

impl SlotRecord {
    /// Returns the record's slot name.
    pub fn slot_name(&self) -> &str {
        match self {
            SlotRecord::Slot(s) => &s.slot_name,
            SlotRecord::SkinMats(s) => &s.slot_name,
        }
    }
}

/// Where auxiliary maps found inside a material definition are placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryPlacement {
    pub slot: String,
    pub folder: Vec<String>,
}

/// A flattened manifest entry: one file to gather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// Logical slot label (e.g. `chest`, `eye`, `skinMats: torso`).
    pub slot: String,
    pub kind: AssetKind,
    /// The path exactly as written in the manifest.
    pub relative_path: String,
    /// Destination folders below the kind's subtree.
    pub folder: Vec<String>,
    /// For material definitions: where maps referenced inside go.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<AuxiliaryPlacement>,
}

impl AssetReference {
    fn new(slot: impl Into<String>, kind: AssetKind, path: &str, folder: Vec<String>) -> Self {
        Self {
            slot: slot.into(),
            kind,
            relative_path: path.to_string(),
            folder,
            auxiliary: None,
        }
    }
}

/// An ordered `paths.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetManifest {
    pub records: Vec<SlotRecord>,
}

impl AssetManifest {
    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        let raw: Vec<RawRecord> =
            serde_json::from_str(json).map_err(|e| ManifestError::parse(MANIFEST_FILE_NAME, e))?;
        Ok(Self {
            records: raw.into_iter().map(RawRecord::validate).collect(),
        })
    }

    /// Reads and parses a manifest. The file name must end in `paths.json`.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        if !path.to_string_lossy().ends_with(MANIFEST_FILE_NAME) {
            return Err(ManifestError::NotAManifest {
                path: path.to_path_buf(),
                expected: MANIFEST_FILE_NAME,
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::read(path, e))?;
        Self::from_json(&content)
    }

    /// Flattens every record into the files it references, in manifest
    /// order. Non-texture `ddsPaths` values are dropped here.
    pub fn references(&self) -> Vec<AssetReference> {
        let mut refs = Vec::new();
        for record in &self.records {
            match record {
                SlotRecord::Slot(slot) => slot_references(slot, &mut refs),
                SlotRecord::SkinMats(skin) => skin_references(skin, &mut refs),
            }
        }
        refs
    }
}

fn slot_references(slot: &SlotAssets, refs: &mut Vec<AssetReference>) {
    let name = slot.slot_name.as_str();
    for model in &slot.models {
        refs.push(AssetReference::new(
            name,
            AssetKind::Model,
            model,
            vec![name.to_string()],
        ));
    }

    let Some(info) = &slot.material_info else {
        return;
    };

    if let Some(mat_path) = &info.mat_path {
        let mut reference = AssetReference::new(
            name,
            AssetKind::MaterialDefinition,
            mat_path,
            vec![name.to_string()],
        );
        reference.auxiliary = Some(AuxiliaryPlacement {
            slot: name.to_string(),
            folder: vec![name.to_string()],
        });
        refs.push(reference);
    }

    for texture in info.textures() {
        refs.push(AssetReference::new(
            name,
            AssetKind::TextureMap,
            texture,
            vec![name.to_string()],
        ));
    }

    if let Some(eye) = &info.eye_mat_info {
        for texture in eye.textures() {
            refs.push(AssetReference::new(
                EYE_SLOT,
                AssetKind::TextureMap,
                texture,
                vec![EYE_SLOT.to_string()],
            ));
        }
    }
}

fn skin_references(skin: &SkinMatsRecord, refs: &mut Vec<AssetReference>) {
    let outer = skin.slot_name.as_str();
    for mat in &skin.mats {
        let label = format!("{}: {}", outer, mat.slot_name);
        let folder = vec![outer.to_string(), mat.slot_name.clone()];

        if let Some(mat_path) = mat.material_info.as_ref().and_then(|m| m.mat_path.as_ref()) {
            let mut reference = AssetReference::new(
                label.clone(),
                AssetKind::MaterialDefinition,
                mat_path,
                folder.clone(),
            );
            // Maps found inside skin materials are shared by the whole skin.
            reference.auxiliary = Some(AuxiliaryPlacement {
                slot: outer.to_string(),
                folder: vec![outer.to_string()],
            });
            refs.push(reference);
        }

        for texture in mat.textures() {
            refs.push(AssetReference::new(
                label.clone(),
                AssetKind::TextureMap,
                texture,
                folder.clone(),
            ));
        }
    }
}

fn textures(dds_paths: &[(String, String)]) -> impl Iterator<Item = &str> {
    dds_paths
        .iter()
        .map(|(_, path)| path.as_str())
        .filter(|path| path.ends_with(TEXTURE_EXTENSION))
}

// ============================================================================
// Raw serde shapes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    slot_name: String,
    #[serde(default)]
    models: Option<Vec<Option<String>>>,
    #[serde(default)]
    material_info: Option<RawMaterialInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMaterialInfo {
    #[serde(default)]
    mat_path: Option<String>,
    #[serde(default)]
    dds_paths: Option<Map<String, Value>>,
    #[serde(default)]
    eye_mat_info: Option<Box<RawMaterialInfo>>,
    #[serde(default)]
    mats: Option<Vec<RawSkinMat>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSkinMat {
    slot_name: String,
    #[serde(default)]
    material_info: Option<RawMaterialInfo>,
    #[serde(default)]
    dds_paths: Option<Map<String, Value>>,
}

impl RawRecord {
    fn validate(self) -> SlotRecord {
        if self.slot_name == SKIN_MATS_SLOT {
            let mats = self
                .material_info
                .and_then(|m| m.mats)
                .unwrap_or_default()
                .into_iter()
                .map(|mat| SkinMat {
                    slot_name: mat.slot_name,
                    material_info: mat.material_info.map(RawMaterialInfo::validate),
                    dds_paths: string_entries(mat.dds_paths),
                })
                .collect();
            return SlotRecord::SkinMats(SkinMatsRecord {
                slot_name: self.slot_name,
                mats,
            });
        }

        SlotRecord::Slot(SlotAssets {
            slot_name: self.slot_name,
            models: self
                .models
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter(|m| !m.is_empty())
                .collect(),
            material_info: self.material_info.map(RawMaterialInfo::validate),
        })
    }
}

impl RawMaterialInfo {
    fn validate(self) -> MaterialInfo {
        MaterialInfo {
            mat_path: self.mat_path.filter(|p| !p.is_empty()),
            dds_paths: string_entries(self.dds_paths),
            eye_mat_info: self.eye_mat_info.map(|eye| Box::new(eye.validate())),
        }
    }
}

/// Keeps the string-valued entries; the exporter also writes numbers and
/// nulls under `ddsPaths`.
fn string_entries(map: Option<Map<String, Value>>) -> Vec<(String, String)> {
    map.unwrap_or_default()
        .into_iter()
        .filter_map(|(channel, value)| match value {
            Value::String(path) => Some((channel, path)),
            other => {
                log::debug!("ignoring non-string ddsPaths entry {}: {}", channel, other);
                None
            }
        })
        .collect()
}
