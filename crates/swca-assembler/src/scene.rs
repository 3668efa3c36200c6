//! Scene-graph port.
//!
//! Names identify objects and collections, as they do in the host editor.
//! The scene's master collection is addressed as [`SCENE_COLLECTION`].

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Name of the scene's root collection.
pub const SCENE_COLLECTION: &str = "Scene Collection";

/// Object type as far as assembly cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Mesh,
    Armature,
    #[serde(other)]
    Other,
}

/// A scene object as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: ObjectKind,
    /// Name of the object's data-block; armatures are renamed with their object.
    pub data_name: Option<String>,
    pub matrix_world: Mat4,
    pub materials: Vec<String>,
    pub collections: Vec<String>,
}

impl ObjectInfo {
    /// Creates a mesh at the origin with no materials or collections.
    pub fn mesh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh,
            data_name: None,
            matrix_world: Mat4::IDENTITY,
            materials: Vec::new(),
            collections: Vec::new(),
        }
    }

    /// Creates an armature whose data-block shares its name.
    pub fn armature(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data_name: Some(name.clone()),
            kind: ObjectKind::Armature,
            ..Self::mesh(name)
        }
    }

    pub fn with_matrix(mut self, matrix_world: Mat4) -> Self {
        self.matrix_world = matrix_world;
        self
    }

    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collections.push(collection.into());
        self
    }
}

/// Find/create/link/parent/rename operations on a host scene.
///
/// Mutations on missing objects or collections are no-ops.
pub trait SceneGraph {
    fn has_object(&self, name: &str) -> bool;
    fn object_kind(&self, name: &str) -> Option<ObjectKind>;
    /// Data-block name of an armature object.
    fn armature_data(&self, object: &str) -> Option<String>;
    fn object_materials(&self, object: &str) -> Vec<String>;
    /// Every collection the object is linked to, [`SCENE_COLLECTION`] included.
    fn object_collections(&self, object: &str) -> Vec<String>;
    fn world_matrix(&self, object: &str) -> Option<Mat4>;

    fn has_collection(&self, name: &str) -> bool;
    /// Every collection the collection is a child of, [`SCENE_COLLECTION`] included.
    fn collection_parents(&self, name: &str) -> Vec<String>;

    fn create_collection(&mut self, name: &str);
    fn link_object(&mut self, object: &str, collection: &str);
    fn unlink_object(&mut self, object: &str, collection: &str);
    fn link_collection(&mut self, child: &str, parent: &str);
    fn unlink_collection(&mut self, child: &str, parent: &str);
    fn remove_object(&mut self, name: &str);

    /// Parents `child` to `armature` with armature deformation.
    fn parent_to_armature(&mut self, child: &str, armature: &str, parent_inverse: Mat4);
    fn set_show_in_front(&mut self, object: &str, show: bool);

    fn rename_object(&mut self, from: &str, to: &str);
    fn rename_armature_data(&mut self, from: &str, to: &str);
    fn rename_material(&mut self, from: &str, to: &str);
    fn rename_collection(&mut self, from: &str, to: &str);
}

/// Moves objects into a collection.
///
/// Each object is unlinked from every collection it is in first. The
/// collection is created if missing, and attached to the scene root if it
/// has no parent.
pub fn link_objects_to_collection<S, T>(scene: &mut S, objects: &[T], collection: &str)
where
    S: SceneGraph + ?Sized,
    T: AsRef<str>,
{
    if objects.is_empty() {
        return;
    }
    ensure_collection(scene, collection);
    for object in objects {
        let object = object.as_ref();
        if !scene.has_object(object) {
            log::debug!("cannot link missing object {}", object);
            continue;
        }
        for current in scene.object_collections(object) {
            scene.unlink_object(object, &current);
        }
        scene.link_object(object, collection);
    }
    attach_orphan(scene, collection);
}

/// Moves a collection under another one, with the same create and
/// root-attachment rules as [`link_objects_to_collection`].
pub fn link_collection_to_collection<S>(scene: &mut S, child: &str, parent: &str)
where
    S: SceneGraph + ?Sized,
{
    if child == parent || !scene.has_collection(child) {
        log::debug!("cannot move collection {} into {}", child, parent);
        return;
    }
    ensure_collection(scene, parent);
    for current in scene.collection_parents(child) {
        scene.unlink_collection(child, &current);
    }
    scene.link_collection(child, parent);
    attach_orphan(scene, parent);
}

fn ensure_collection<S: SceneGraph + ?Sized>(scene: &mut S, name: &str) {
    if !scene.has_collection(name) {
        scene.create_collection(name);
    }
}

fn attach_orphan<S: SceneGraph + ?Sized>(scene: &mut S, collection: &str) {
    if collection != SCENE_COLLECTION && scene.collection_parents(collection).is_empty() {
        scene.link_collection(collection, SCENE_COLLECTION);
    }
}

/// Converts a matrix to the row-major arrays used on the wire.
pub fn matrix_to_rows(matrix: Mat4) -> [[f32; 4]; 4] {
    matrix.transpose().to_cols_array_2d()
}

/// Reads a matrix from row-major arrays.
pub fn matrix_from_rows(rows: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(rows).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_row_major_round_trip_keeps_translation_in_last_column() {
        let matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let rows = matrix_to_rows(matrix);
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
        assert_eq!(matrix_from_rows(&rows), matrix);
    }

    #[test]
    fn test_armature_shares_data_name() {
        let skeleton = ObjectInfo::armature("bfn_skeleton");
        assert_eq!(skeleton.kind, ObjectKind::Armature);
        assert_eq!(skeleton.data_name.as_deref(), Some("bfn_skeleton"));
    }
}
