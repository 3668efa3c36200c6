//! SWTOR Character Manifest Library
//!
//! This crate provides the data model and parsers for the files that describe
//! a character exported by TORCommunity.com:
//!
//! - **`paths.json`** - per-slot model, material and texture references
//! - **`skeleton.json`** - optional path to the character's rigging skeleton
//! - **`preset.json`** - optional in-game display names for armor gear
//! - **`.mat` files** - material definitions, scanned for extra texture maps
//!
//! Manifests are validated once at parse time into tagged records, so the
//! rest of the pipeline never needs to probe for optional keys.
//!
//! # Example
//!
//! ```
//! use swca_manifest::{AssetKind, AssetManifest};
//!
//! let json = r#"[
//!     {
//!         "slotName": "chest",
//!         "models": ["\\art\\dynamic\\chest\\model\\chest_a01.gr2"],
//!         "materialInfo": {
//!             "ddsPaths": {
//!                 "diffuseMap": "\\art\\dynamic\\chest\\chest_a01_d.dds",
//!                 "paletteMap": "notATexture"
//!             }
//!         }
//!     }
//! ]"#;
//!
//! let manifest = AssetManifest::from_json(json).unwrap();
//! let refs = manifest.references();
//! assert_eq!(refs.len(), 2);
//! assert_eq!(refs[0].kind, AssetKind::Model);
//! assert_eq!(refs[1].kind, AssetKind::TextureMap);
//! ```
//!
//! # Modules
//!
//! - [`manifest`]: `paths.json` records and reference flattening
//! - [`skeleton`]: `skeleton.json`
//! - [`preset`]: `preset.json`
//! - [`material`]: auxiliary texture scanner for `.mat` files
//! - [`paths`]: game-relative path normalisation helpers
//! - [`error`]: Error types

pub mod error;
pub mod manifest;
pub mod material;
pub mod paths;
pub mod preset;
pub mod skeleton;

// Re-export commonly used types at the crate root
pub use error::{ManifestError, ManifestResult, MaterialFileError};
pub use manifest::{
    AssetKind, AssetManifest, AssetReference, AuxiliaryPlacement, MaterialInfo, SkinMat,
    SkinMatsRecord, SlotAssets, SlotRecord,
};
pub use material::{parse_auxiliary_maps, scan_auxiliary_maps, AUXILIARY_SEMANTICS};
pub use preset::{GearPreset, PresetManifest};
pub use skeleton::SkeletonManifest;

/// File name marker every asset manifest ends with.
pub const MANIFEST_FILE_NAME: &str = "paths.json";

/// Companion skeleton manifest, next to `paths.json`.
pub const SKELETON_FILE_NAME: &str = "skeleton.json";

/// Companion preset (display-name) manifest, next to `paths.json`.
pub const PRESET_FILE_NAME: &str = "preset.json";

/// Sentinel slot name whose records carry nested skin materials.
pub const SKIN_MATS_SLOT: &str = "skinMats";

/// Slot (and destination folder) used for every eye texture.
pub const EYE_SLOT: &str = "eye";

/// Slot label used for the skeleton model.
pub const SKELETON_SLOT: &str = "Skeleton";

/// Extension of every texture map in the game assets.
pub const TEXTURE_EXTENSION: &str = ".dds";
