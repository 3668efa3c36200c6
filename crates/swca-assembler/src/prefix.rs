//! Name prefixing.
//!
//! Importing a second character into the same file collides on names such
//! as `BODY` or the shared skin materials. Prefixing a character's objects,
//! their materials and their collections keeps successive imports apart.
//! Names already carrying the prefix are left alone.

use serde::Serialize;

use crate::scene::{ObjectKind, SceneGraph, SCENE_COLLECTION};

/// Counts of renamed data-blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixSummary {
    pub objects: usize,
    pub armatures: usize,
    pub materials: usize,
    pub collections: usize,
}

impl PrefixSummary {
    pub fn total(&self) -> usize {
        self.objects + self.armatures + self.materials + self.collections
    }
}

/// Prefixes `objects`, their armature data, their materials and the
/// collections they are linked to.
pub fn add_prefix<S, T>(scene: &mut S, objects: &[T], prefix: &str) -> PrefixSummary
where
    S: SceneGraph + ?Sized,
    T: AsRef<str>,
{
    let mut summary = PrefixSummary::default();
    if prefix.is_empty() {
        return summary;
    }

    for object in objects {
        let mut name = object.as_ref().to_string();
        if !scene.has_object(&name) {
            log::warn!("no object named {}", name);
            continue;
        }

        if !name.starts_with(prefix) {
            if scene.object_kind(&name) == Some(ObjectKind::Armature) {
                if let Some(data) = scene.armature_data(&name) {
                    if !data.starts_with(prefix) {
                        scene.rename_armature_data(&data, &format!("{prefix}{data}"));
                        summary.armatures += 1;
                    }
                }
            }
            let renamed = format!("{prefix}{name}");
            scene.rename_object(&name, &renamed);
            if scene.has_object(&renamed) {
                name = renamed;
                summary.objects += 1;
            }
        }

        for material in scene.object_materials(&name) {
            if !material.starts_with(prefix) {
                scene.rename_material(&material, &format!("{prefix}{material}"));
                summary.materials += 1;
            }
        }

        for collection in scene.object_collections(&name) {
            if collection != SCENE_COLLECTION && !collection.starts_with(prefix) {
                scene.rename_collection(&collection, &format!("{prefix}{collection}"));
                summary.collections += 1;
            }
        }
    }

    log::info!("prefixed {} names with {:?}", summary.total(), prefix);
    summary
}
