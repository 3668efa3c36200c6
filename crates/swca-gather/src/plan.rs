//! Path resolution and copy planning.
//!
//! Sources always live under the asset-extraction root; destinations always
//! live under the character's own folder, in `models/`, `materials/` or
//! `skeleton/` subtrees keyed by slot.

use std::path::{Path, PathBuf};

use serde::Serialize;
use swca_manifest::paths::{climbs_out, file_name, is_plain_segment, to_relative_path};
use swca_manifest::{
    scan_auxiliary_maps, AssetKind, AssetManifest, AssetReference, MaterialFileError,
    SkeletonManifest, PRESET_FILE_NAME, SKELETON_FILE_NAME,
};

use crate::error::PlanPathError;

/// A character folder exported next to its `paths.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterFolder {
    root: PathBuf,
    name: String,
}

impl CharacterFolder {
    /// Derives the character folder from its manifest path.
    ///
    /// Files live next to the manifest. The character is named after the
    /// folder above it, as exports nest `Name/Name/paths.json`.
    pub fn from_manifest_path(manifest_path: &Path) -> Self {
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = root
            .parent()
            .and_then(Path::file_name)
            .or_else(|| root.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Character".to_string());
        Self { root, name }
    }

    /// Returns the folder holding `paths.json`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the name used for the character's top-level collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the folder an asset kind is copied into.
    pub fn subtree(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.subtree())
    }

    /// Returns where a reference is copied to, or `None` when its path has
    /// no file name or would land outside the character folder.
    pub fn destination_of(&self, reference: &AssetReference) -> Option<PathBuf> {
        self.destination(reference.kind, &reference.folder, &reference.relative_path)
            .ok()
            .flatten()
    }

    pub(crate) fn destination(
        &self,
        kind: AssetKind,
        folder: &[String],
        relative_path: &str,
    ) -> Result<Option<PathBuf>, PlanPathError> {
        if climbs_out(relative_path) {
            return Err(PlanPathError::ClimbsOut {
                path: relative_path.to_string(),
            });
        }
        let Some(name) = file_name(relative_path) else {
            return Ok(None);
        };
        let bad = folder
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(name))
            .find(|segment| !is_plain_segment(segment));
        if let Some(segment) = bad {
            return Err(PlanPathError::BadSegment {
                segment: segment.to_string(),
            });
        }
        let mut destination = self.subtree(kind);
        destination.extend(folder);
        destination.push(name);
        Ok(Some(destination))
    }

    /// Returns the companion `skeleton.json` path.
    pub fn skeleton_manifest_path(&self) -> PathBuf {
        self.root.join(SKELETON_FILE_NAME)
    }

    /// Returns the companion `preset.json` path.
    pub fn preset_manifest_path(&self) -> PathBuf {
        self.root.join(PRESET_FILE_NAME)
    }
}

/// One file to copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyItem {
    pub slot: String,
    pub kind: AssetKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A reference that produced no copy: an unreadable material definition, or
/// a path that would leave the asset root or the character folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanWarning {
    pub slot: String,
    /// The material's source file, or the rejected path as written.
    pub path: PathBuf,
    pub code: &'static str,
    pub message: String,
}

/// The ordered result of planning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
    pub items: Vec<CopyItem>,
    pub warnings: Vec<PlanWarning>,
}

impl CopyPlan {
    /// Returns the skeleton model item, if planned.
    pub fn skeleton(&self) -> Option<&CopyItem> {
        self.items
            .iter()
            .find(|item| item.kind == AssetKind::SkeletonModel)
    }

    /// Returns the number of planned items of a kind.
    pub fn count(&self, kind: AssetKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    fn reject(&mut self, slot: &str, path: &str, err: PlanPathError) {
        log::warn!("not copying {} {}: {}", slot, path, err);
        self.warnings.push(PlanWarning {
            slot: slot.to_string(),
            path: PathBuf::from(path),
            code: err.code(),
            message: format!("not copied: {}", err),
        });
    }
}

/// Finds texture maps referenced inside a material definition.
pub trait MaterialScanner {
    fn auxiliary_maps(&self, material: &Path) -> Result<Vec<String>, MaterialFileError>;
}

/// Reads material definitions from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMaterialScanner;

impl MaterialScanner for FsMaterialScanner {
    fn auxiliary_maps(&self, material: &Path) -> Result<Vec<String>, MaterialFileError> {
        scan_auxiliary_maps(material)
    }
}

/// Resolves manifest references into a [`CopyPlan`].
pub struct CopyPlanner<'a, S = FsMaterialScanner> {
    resources_root: &'a Path,
    character: &'a CharacterFolder,
    scanner: S,
}

impl<'a> CopyPlanner<'a, FsMaterialScanner> {
    /// Creates a planner that scans material definitions on disk.
    pub fn new(resources_root: &'a Path, character: &'a CharacterFolder) -> Self {
        Self {
            resources_root,
            character,
            scanner: FsMaterialScanner,
        }
    }
}

impl<'a, S: MaterialScanner> CopyPlanner<'a, S> {
    /// Replaces the material scanner.
    pub fn with_scanner<T: MaterialScanner>(self, scanner: T) -> CopyPlanner<'a, T> {
        CopyPlanner {
            resources_root: self.resources_root,
            character: self.character,
            scanner,
        }
    }

    /// Plans every copy for a manifest and its optional skeleton, in
    /// manifest order with the skeleton last.
    pub fn plan(&self, manifest: &AssetManifest, skeleton: Option<&SkeletonManifest>) -> CopyPlan {
        let mut plan = CopyPlan::default();
        let references = manifest
            .references()
            .into_iter()
            .chain(skeleton.and_then(SkeletonManifest::reference));

        for reference in references {
            let item = match self.resolve_reference(&reference) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(err) => {
                    plan.reject(&reference.slot, &reference.relative_path, err);
                    continue;
                }
            };

            let auxiliary = match (&reference.auxiliary, reference.kind) {
                (Some(aux), AssetKind::MaterialDefinition) => Some(aux),
                _ => None,
            };
            let material_source = item.source.clone();
            plan.items.push(item);

            if let Some(aux) = auxiliary {
                match self.scanner.auxiliary_maps(&material_source) {
                    Ok(maps) => {
                        for map in maps {
                            match self.resolve(&aux.slot, AssetKind::TextureMap, &map, &aux.folder)
                            {
                                Ok(Some(item)) => plan.items.push(item),
                                Ok(None) => {}
                                Err(err) => plan.reject(&aux.slot, &map, err),
                            }
                        }
                    }
                    Err(err) => {
                        log::warn!("no auxiliary maps for {}: {}", reference.slot, err);
                        plan.warnings.push(PlanWarning {
                            slot: reference.slot.clone(),
                            path: material_source,
                            code: err.code(),
                            message: format!("no auxiliary maps read: {}", err),
                        });
                    }
                }
            }
        }

        log::debug!(
            "planned {} copies ({} warnings) for {}",
            plan.items.len(),
            plan.warnings.len(),
            self.character.name()
        );
        plan
    }

    /// Resolves one reference. `Ok(None)` when the path has no file name.
    pub fn resolve_reference(
        &self,
        reference: &AssetReference,
    ) -> Result<Option<CopyItem>, PlanPathError> {
        self.resolve(
            &reference.slot,
            reference.kind,
            &reference.relative_path,
            &reference.folder,
        )
    }

    fn resolve(
        &self,
        slot: &str,
        kind: AssetKind,
        relative_path: &str,
        folder: &[String],
    ) -> Result<Option<CopyItem>, PlanPathError> {
        let Some(destination) = self.character.destination(kind, folder, relative_path)? else {
            log::debug!("skipping {} {} without a file name", slot, kind);
            return Ok(None);
        };
        let source = self.resources_root.join(to_relative_path(relative_path));
        Ok(Some(CopyItem {
            slot: slot.to_string(),
            kind,
            source,
            destination,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct StaticScanner(HashMap<PathBuf, Result<Vec<String>, ()>>);

    impl MaterialScanner for StaticScanner {
        fn auxiliary_maps(&self, material: &Path) -> Result<Vec<String>, MaterialFileError> {
            match self.0.get(material) {
                Some(Ok(maps)) => Ok(maps.clone()),
                Some(Err(())) => Err(MaterialFileError::Read {
                    path: material.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt"),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn character() -> CharacterFolder {
        CharacterFolder::from_manifest_path(Path::new("/chars/Satele/Satele/paths.json"))
    }

    #[test]
    fn test_character_folder() {
        let character = character();
        assert_eq!(character.root(), Path::new("/chars/Satele/Satele"));
        assert_eq!(character.name(), "Satele");
        assert_eq!(
            character.skeleton_manifest_path(),
            Path::new("/chars/Satele/Satele/skeleton.json")
        );
    }

    #[test]
    fn test_skeleton_destination_without_planning() {
        let character = character();
        let skeleton = SkeletonManifest::from_json(r#"{"path": "/art/spec/bmn_skeleton.gr2"}"#)
            .unwrap();
        let destination = character.destination_of(&skeleton.reference().unwrap());
        assert_eq!(
            destination,
            Some(character.root().join("skeleton").join("bmn_skeleton.gr2"))
        );
    }

    #[test]
    fn test_character_name_falls_back_to_parent() {
        let character = CharacterFolder::from_manifest_path(Path::new("Satele/paths.json"));
        assert_eq!(character.name(), "Satele");
    }

    #[test]
    fn test_leading_separator_is_not_an_anchor() {
        let character = character();
        let root = Path::new("/res");
        let planner = CopyPlanner::new(root, &character).with_scanner(StaticScanner(HashMap::new()));
        let manifest = AssetManifest::from_json(
            r#"[{"slotName": "chest", "models": ["\\art\\chest.gr2", "/art/chest_b.gr2", "art/chest_c.gr2"]}]"#,
        )
        .unwrap();
        let plan = planner.plan(&manifest, None);
        let sources: Vec<_> = plan.items.iter().map(|i| i.source.clone()).collect();
        assert_eq!(
            sources,
            vec![
                root.join("art").join("chest.gr2"),
                root.join("art").join("chest_b.gr2"),
                root.join("art").join("chest_c.gr2"),
            ]
        );
        assert_eq!(
            plan.items[0].destination,
            character.root().join("models").join("chest").join("chest.gr2")
        );
    }

    #[test]
    fn test_eye_textures_ignore_enclosing_slot() {
        let character = character();
        let planner = CopyPlanner::new(Path::new("/res"), &character)
            .with_scanner(StaticScanner(HashMap::new()));
        let manifest = AssetManifest::from_json(
            r#"[{"slotName": "head", "materialInfo": {"eyeMatInfo": {"ddsPaths": {"d": "\\art\\eye\\eye_d.dds"}}}}]"#,
        )
        .unwrap();
        let plan = planner.plan(&manifest, None);
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].slot, "eye");
        assert_eq!(
            plan.items[0].destination,
            character.root().join("materials").join("eye").join("eye_d.dds")
        );
    }

    #[test]
    fn test_auxiliary_maps_follow_their_material() {
        let character = character();
        let root = Path::new("/res");
        let material = root.join("art").join("shaders").join("hair.mat");
        let scanner = StaticScanner(HashMap::from([(
            material,
            Ok(vec!["\\art\\hair\\hair_dir.dds".to_string()]),
        )]));
        let planner = CopyPlanner::new(root, &character).with_scanner(scanner);
        let manifest = AssetManifest::from_json(
            r#"[{"slotName": "hair", "materialInfo": {"matPath": "\\art\\shaders\\hair.mat", "ddsPaths": {"d": "\\art\\hair\\hair_d.dds"}}}]"#,
        )
        .unwrap();
        let plan = planner.plan(&manifest, None);
        let kinds: Vec<_> = plan.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AssetKind::MaterialDefinition,
                AssetKind::TextureMap,
                AssetKind::TextureMap
            ]
        );
        assert_eq!(
            plan.items[1].destination,
            character.root().join("materials").join("hair").join("hair_dir.dds")
        );
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_unreadable_material_is_a_warning() {
        let character = character();
        let root = Path::new("/res");
        let material = root.join("art").join("broken.mat");
        let scanner = StaticScanner(HashMap::from([(material.clone(), Err(()))]));
        let planner = CopyPlanner::new(root, &character).with_scanner(scanner);
        let manifest = AssetManifest::from_json(
            r#"[{"slotName": "face", "materialInfo": {"matPath": "\\art\\broken.mat"}}]"#,
        )
        .unwrap();
        let plan = planner.plan(&manifest, None);
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].path, material);
        assert_eq!(plan.warnings[0].code, "MATERIAL_001");
    }

    #[test]
    fn test_skeleton_goes_last_into_skeleton_folder() {
        let character = character();
        let planner = CopyPlanner::new(Path::new("/res"), &character)
            .with_scanner(StaticScanner(HashMap::new()));
        let manifest =
            AssetManifest::from_json(r#"[{"slotName": "boot", "models": ["\\art\\boot.gr2"]}]"#)
                .unwrap();
        let skeleton = SkeletonManifest::from_json(r#"{"path": "\\art\\spec\\bfn_skeleton.gr2"}"#)
            .unwrap();
        let plan = planner.plan(&manifest, Some(&skeleton));
        assert_eq!(plan.items.len(), 2);
        let skeleton_item = plan.skeleton().unwrap();
        assert_eq!(skeleton_item.slot, "Skeleton");
        assert_eq!(
            skeleton_item.destination,
            character.root().join("skeleton").join("bfn_skeleton.gr2")
        );
    }

    fn plan_one(json: &str) -> CopyPlan {
        let character = character();
        let planner = CopyPlanner::new(Path::new("/res"), &character)
            .with_scanner(StaticScanner(HashMap::new()));
        planner.plan(&AssetManifest::from_json(json).unwrap(), None)
    }

    #[test]
    fn test_parent_segments_are_rejected() {
        let plan = plan_one(
            r#"[{"slotName": "chest", "models": ["\\..\\..\\etc\\passwd.gr2", "\\art\\chest.gr2"]}]"#,
        );
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].source, Path::new("/res/art/chest.gr2"));
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].code, "PLAN_001");
        assert_eq!(plan.warnings[0].path, Path::new("\\..\\..\\etc\\passwd.gr2"));
    }

    #[test]
    fn test_slot_names_cannot_leave_the_character_folder() {
        let plan = plan_one(
            r#"[{"slotName": "../../../outside", "models": ["\\art\\boot.gr2"]}, {"slotName": "", "models": ["\\art\\hand.gr2"]}]"#,
        );
        assert!(plan.items.is_empty());
        let codes: Vec<_> = plan.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec!["PLAN_002", "PLAN_002"]);
        assert_eq!(plan.warnings[0].slot, "../../../outside");
    }

    #[test]
    fn test_trailing_parent_segment_is_rejected() {
        let plan = plan_one(r#"[{"slotName": "boot", "models": ["\\art\\x\\.."]}]"#);
        assert!(plan.items.is_empty());
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].code, "PLAN_001");
    }

    #[test]
    fn test_auxiliary_maps_cannot_climb_out() {
        let character = character();
        let root = Path::new("/res");
        let material = root.join("art").join("hair.mat");
        let scanner = StaticScanner(HashMap::from([(
            material,
            Ok(vec![
                "\\..\\secrets.dds".to_string(),
                "\\art\\hair_dir.dds".to_string(),
            ]),
        )]));
        let planner = CopyPlanner::new(root, &character).with_scanner(scanner);
        let manifest = AssetManifest::from_json(
            r#"[{"slotName": "hair", "materialInfo": {"matPath": "\\art\\hair.mat"}}]"#,
        )
        .unwrap();
        let plan = planner.plan(&manifest, None);
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].slot, "hair");
        assert_eq!(plan.warnings[0].code, "PLAN_001");
    }

    #[test]
    fn test_destination_of_rejected_path_is_none() {
        let character = character();
        let skeleton =
            SkeletonManifest::from_json(r#"{"path": "\\art\\..\\..\\bfn_skeleton.gr2"}"#).unwrap();
        assert_eq!(character.destination_of(&skeleton.reference().unwrap()), None);
    }
}
