//! Scene reconciliation.
//!
//! Freshly imported objects are split into armor gear and body parts by
//! name, then organised under a collection named after the character:
//!
//! ```text
//! <character>
//! ├── <skeleton object>
//! ├── GEAR
//! │   ├── <in-game gear name>
//! │   └── ...
//! └── BODY
//! ```

use serde::Serialize;
use swca_manifest::PresetManifest;

use crate::options::AssembleOptions;
use crate::scene::{link_collection_to_collection, link_objects_to_collection, SceneGraph};

/// First name tokens of armor gear objects.
pub const ARMOR_SLOTS: [&str; 7] = ["face", "chest", "bracer", "hand", "waist", "leg", "boot"];

/// Collection holding body parts.
pub const BODY_COLLECTION: &str = "BODY";

/// Collection holding the per-gear collections.
pub const GEAR_COLLECTION: &str = "GEAR";

/// Returns true when an object name denotes a body part rather than gear.
pub fn is_body_part(name: &str) -> bool {
    if name.contains("underwear") || name.contains("naked") {
        return true;
    }
    let slot = name.split('_').next().unwrap_or_default();
    !ARMOR_SLOTS.contains(&slot)
}

/// Objects split by [`is_body_part`], each side in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub armor_gear: Vec<String>,
    pub body_parts: Vec<String>,
}

/// Splits object names into armor gear and body parts.
pub fn partition<I, T>(names: I) -> Partition
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut partition = Partition::default();
    for name in names {
        let name = name.into();
        if is_body_part(&name) {
            partition.body_parts.push(name);
        } else {
            partition.armor_gear.push(name);
        }
    }
    partition
}

/// What reconciliation did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    #[serde(flatten)]
    pub partition: Partition,
    /// Objects parented to the skeleton.
    pub bound: Vec<String>,
    /// In-game gear collections filled.
    pub gear_collections: Vec<String>,
    /// Body parts deleted in armor-only mode.
    pub removed: Vec<String>,
}

/// Binds and organises the objects created by a character import.
///
/// `skeleton` is the imported skeleton object, if any. `preset` supplies the
/// in-game gear names; without it, gear stays where the importer put it
/// when collecting.
pub fn reconcile<S: SceneGraph + ?Sized>(
    scene: &mut S,
    character: &str,
    objects: &[String],
    skeleton: Option<&str>,
    preset: Option<&PresetManifest>,
    options: &AssembleOptions,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    if let Some(skeleton) = skeleton.filter(|_| options.binds() && !objects.is_empty()) {
        let parent_inverse = scene
            .world_matrix(skeleton)
            .map(|m| m.inverse())
            .unwrap_or_default();
        for object in objects {
            scene.parent_to_armature(object, skeleton, parent_inverse);
            result.bound.push(object.clone());
        }
        scene.set_show_in_front(skeleton, true);
        log::info!("bound {} objects to {}", result.bound.len(), skeleton);
    }

    result.partition = partition(objects.iter().cloned());
    let Partition {
        armor_gear,
        body_parts,
    } = &result.partition;

    if let Some(skeleton) = skeleton.filter(|_| options.import_skeleton) {
        link_objects_to_collection(scene, &[skeleton], character);
    }

    if armor_gear.is_empty() {
        log::info!("{} has no armor gear", character);
    } else if !options.collect {
        link_objects_to_collection(scene, armor_gear, character);
    } else if let Some(preset) = preset {
        for (_, gear) in preset.gear() {
            let matches: Vec<&String> = armor_gear
                .iter()
                .filter(|name| name.contains(gear.slot.as_str()))
                .collect();
            if matches.is_empty() {
                continue;
            }
            link_objects_to_collection(scene, &matches, &gear.name);
            link_collection_to_collection(scene, &gear.name, GEAR_COLLECTION);
            result.gear_collections.push(gear.name.clone());
        }
        if !result.gear_collections.is_empty() {
            link_collection_to_collection(scene, GEAR_COLLECTION, character);
        }
    }

    if body_parts.is_empty() {
        log::info!("{} has no body parts", character);
    } else if options.armor_only {
        for object in body_parts {
            scene.remove_object(object);
            result.removed.push(object.clone());
        }
    } else if options.collect {
        link_objects_to_collection(scene, body_parts, BODY_COLLECTION);
        link_collection_to_collection(scene, BODY_COLLECTION, character);
    } else {
        link_objects_to_collection(scene, body_parts, character);
    }

    result
}
