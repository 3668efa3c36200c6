//! In-memory scene with a mutation journal.
//!
//! Seeding calls ([`MemoryScene::insert_object`],
//! [`MemoryScene::insert_collection`]) mirror what the host already holds and
//! are not journaled. Every [`SceneGraph`] mutation that changes the scene is
//! appended to the journal as a [`SceneOp`].

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::scene::{matrix_to_rows, ObjectInfo, ObjectKind, SceneGraph, SCENE_COLLECTION};

/// One journaled scene mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneOp {
    CreateCollection { name: String },
    LinkObject { object: String, collection: String },
    UnlinkObject { object: String, collection: String },
    LinkCollection { child: String, parent: String },
    UnlinkCollection { child: String, parent: String },
    RemoveObject { object: String },
    ParentToArmature {
        child: String,
        armature: String,
        /// Row-major.
        matrix_parent_inverse: [[f32; 4]; 4],
    },
    SetShowInFront { object: String, show: bool },
    RenameObject { from: String, to: String },
    RenameArmatureData { from: String, to: String },
    RenameMaterial { from: String, to: String },
    RenameCollection { from: String, to: String },
}

#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    kind: ObjectKind,
    data_name: Option<String>,
    matrix_world: Mat4,
    materials: Vec<String>,
    parent: Option<String>,
    show_in_front: bool,
}

#[derive(Debug, Clone, Default)]
struct SceneCollection {
    name: String,
    children: Vec<String>,
    objects: Vec<String>,
}

/// A [`SceneGraph`] held in memory.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    objects: Vec<SceneObject>,
    collections: Vec<SceneCollection>,
    journal: Vec<SceneOp>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Creates a scene holding only its root collection.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            collections: vec![SceneCollection {
                name: SCENE_COLLECTION.to_string(),
                ..Default::default()
            }],
            journal: Vec::new(),
        }
    }

    /// Adds an object the host already holds. Objects without collections
    /// go to the scene root.
    pub fn insert_object(&mut self, info: ObjectInfo) {
        if self.has_object(&info.name) {
            log::debug!("object {} already in scene", info.name);
            return;
        }
        let collections = if info.collections.is_empty() {
            vec![SCENE_COLLECTION.to_string()]
        } else {
            info.collections
        };
        for collection in &collections {
            let entry = self.collection_entry(collection);
            if !entry.objects.contains(&info.name) {
                entry.objects.push(info.name.clone());
            }
        }
        self.objects.push(SceneObject {
            name: info.name,
            kind: info.kind,
            data_name: info.data_name,
            matrix_world: info.matrix_world,
            materials: info.materials,
            parent: None,
            show_in_front: false,
        });
    }

    /// Adds a collection the host already holds, with its child collections.
    pub fn insert_collection(&mut self, name: &str, children: &[String]) {
        for child in children {
            self.collection_entry(child);
        }
        let entry = self.collection_entry(name);
        for child in children {
            if !entry.children.contains(child) {
                entry.children.push(child.clone());
            }
        }
    }

    /// Returns the journaled mutations.
    pub fn journal(&self) -> &[SceneOp] {
        &self.journal
    }

    /// Drains the journal.
    pub fn take_journal(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.journal)
    }

    /// Returns the names of every object, in insertion order.
    pub fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    /// Returns a snapshot of an object.
    pub fn object(&self, name: &str) -> Option<ObjectInfo> {
        let object = self.find_object(name)?;
        Some(ObjectInfo {
            name: object.name.clone(),
            kind: object.kind,
            data_name: object.data_name.clone(),
            matrix_world: object.matrix_world,
            materials: object.materials.clone(),
            collections: self.object_collections(name),
        })
    }

    /// Returns the objects directly in a collection.
    pub fn collection_objects(&self, name: &str) -> Vec<String> {
        self.find_collection(name)
            .map(|c| c.objects.clone())
            .unwrap_or_default()
    }

    /// Returns the child collections of a collection.
    pub fn collection_children(&self, name: &str) -> Vec<String> {
        self.find_collection(name)
            .map(|c| c.children.clone())
            .unwrap_or_default()
    }

    /// Returns every object in a collection and its descendants.
    pub fn collection_objects_recursive(&self, name: &str) -> Vec<String> {
        let mut objects = Vec::new();
        let mut pending = vec![name.to_string()];
        let mut visited = Vec::new();
        while let Some(current) = pending.pop() {
            if visited.contains(&current) {
                continue;
            }
            if let Some(collection) = self.find_collection(&current) {
                for object in &collection.objects {
                    if !objects.contains(object) {
                        objects.push(object.clone());
                    }
                }
                pending.extend(collection.children.iter().rev().cloned());
            }
            visited.push(current);
        }
        objects
    }

    /// Returns the parent of an object.
    pub fn parent_of(&self, object: &str) -> Option<&str> {
        self.find_object(object)?.parent.as_deref()
    }

    /// Returns whether an object is drawn in front.
    pub fn show_in_front(&self, object: &str) -> bool {
        self.find_object(object).is_some_and(|o| o.show_in_front)
    }

    fn find_object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn find_object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    fn find_collection(&self, name: &str) -> Option<&SceneCollection> {
        self.collections.iter().find(|c| c.name == name)
    }

    fn find_collection_mut(&mut self, name: &str) -> Option<&mut SceneCollection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    fn collection_entry(&mut self, name: &str) -> &mut SceneCollection {
        let index = match self.collections.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.collections.push(SceneCollection {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.collections.len() - 1
            }
        };
        &mut self.collections[index]
    }

    /// True when `ancestor` is `name` or contains it at any depth.
    fn is_ancestor(&self, ancestor: &str, name: &str) -> bool {
        if ancestor == name {
            return true;
        }
        self.find_collection(ancestor).is_some_and(|c| {
            c.children
                .iter()
                .any(|child| self.is_ancestor(child, name))
        })
    }
}

impl SceneGraph for MemoryScene {
    fn has_object(&self, name: &str) -> bool {
        self.find_object(name).is_some()
    }

    fn object_kind(&self, name: &str) -> Option<ObjectKind> {
        self.find_object(name).map(|o| o.kind)
    }

    fn armature_data(&self, object: &str) -> Option<String> {
        self.find_object(object)
            .filter(|o| o.kind == ObjectKind::Armature)
            .and_then(|o| o.data_name.clone())
    }

    fn object_materials(&self, object: &str) -> Vec<String> {
        self.find_object(object)
            .map(|o| o.materials.clone())
            .unwrap_or_default()
    }

    fn object_collections(&self, object: &str) -> Vec<String> {
        self.collections
            .iter()
            .filter(|c| c.objects.iter().any(|o| o == object))
            .map(|c| c.name.clone())
            .collect()
    }

    fn world_matrix(&self, object: &str) -> Option<Mat4> {
        self.find_object(object).map(|o| o.matrix_world)
    }

    fn has_collection(&self, name: &str) -> bool {
        self.find_collection(name).is_some()
    }

    fn collection_parents(&self, name: &str) -> Vec<String> {
        self.collections
            .iter()
            .filter(|c| c.children.iter().any(|child| child == name))
            .map(|c| c.name.clone())
            .collect()
    }

    fn create_collection(&mut self, name: &str) {
        if self.has_collection(name) {
            return;
        }
        self.collection_entry(name);
        self.journal.push(SceneOp::CreateCollection {
            name: name.to_string(),
        });
    }

    fn link_object(&mut self, object: &str, collection: &str) {
        if !self.has_object(object) {
            return;
        }
        let Some(entry) = self.find_collection_mut(collection) else {
            return;
        };
        if entry.objects.iter().any(|o| o == object) {
            return;
        }
        entry.objects.push(object.to_string());
        self.journal.push(SceneOp::LinkObject {
            object: object.to_string(),
            collection: collection.to_string(),
        });
    }

    fn unlink_object(&mut self, object: &str, collection: &str) {
        let Some(entry) = self.find_collection_mut(collection) else {
            return;
        };
        let before = entry.objects.len();
        entry.objects.retain(|o| o != object);
        if entry.objects.len() != before {
            self.journal.push(SceneOp::UnlinkObject {
                object: object.to_string(),
                collection: collection.to_string(),
            });
        }
    }

    fn link_collection(&mut self, child: &str, parent: &str) {
        if !self.has_collection(child) || self.is_ancestor(child, parent) {
            return;
        }
        let Some(entry) = self.find_collection_mut(parent) else {
            return;
        };
        if entry.children.iter().any(|c| c == child) {
            return;
        }
        entry.children.push(child.to_string());
        self.journal.push(SceneOp::LinkCollection {
            child: child.to_string(),
            parent: parent.to_string(),
        });
    }

    fn unlink_collection(&mut self, child: &str, parent: &str) {
        let Some(entry) = self.find_collection_mut(parent) else {
            return;
        };
        let before = entry.children.len();
        entry.children.retain(|c| c != child);
        if entry.children.len() != before {
            self.journal.push(SceneOp::UnlinkCollection {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }
    }

    fn remove_object(&mut self, name: &str) {
        let before = self.objects.len();
        self.objects.retain(|o| o.name != name);
        if self.objects.len() == before {
            return;
        }
        for collection in &mut self.collections {
            collection.objects.retain(|o| o != name);
        }
        for object in &mut self.objects {
            if object.parent.as_deref() == Some(name) {
                object.parent = None;
            }
        }
        self.journal.push(SceneOp::RemoveObject {
            object: name.to_string(),
        });
    }

    fn parent_to_armature(&mut self, child: &str, armature: &str, parent_inverse: Mat4) {
        if child == armature || !self.has_object(armature) {
            return;
        }
        let Some(object) = self.find_object_mut(child) else {
            return;
        };
        object.parent = Some(armature.to_string());
        self.journal.push(SceneOp::ParentToArmature {
            child: child.to_string(),
            armature: armature.to_string(),
            matrix_parent_inverse: matrix_to_rows(parent_inverse),
        });
    }

    fn set_show_in_front(&mut self, object: &str, show: bool) {
        let Some(entry) = self.find_object_mut(object) else {
            return;
        };
        if entry.show_in_front == show {
            return;
        }
        entry.show_in_front = show;
        self.journal.push(SceneOp::SetShowInFront {
            object: object.to_string(),
            show,
        });
    }

    fn rename_object(&mut self, from: &str, to: &str) {
        if from == to || self.has_object(to) {
            return;
        }
        let Some(object) = self.find_object_mut(from) else {
            return;
        };
        object.name = to.to_string();
        for object in &mut self.objects {
            if object.parent.as_deref() == Some(from) {
                object.parent = Some(to.to_string());
            }
        }
        for collection in &mut self.collections {
            for name in collection.objects.iter_mut().filter(|n| n.as_str() == from) {
                *name = to.to_string();
            }
        }
        self.journal.push(SceneOp::RenameObject {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    fn rename_armature_data(&mut self, from: &str, to: &str) {
        let mut renamed = false;
        for object in &mut self.objects {
            if object.kind == ObjectKind::Armature && object.data_name.as_deref() == Some(from) {
                object.data_name = Some(to.to_string());
                renamed = true;
            }
        }
        if renamed {
            self.journal.push(SceneOp::RenameArmatureData {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    fn rename_material(&mut self, from: &str, to: &str) {
        let mut renamed = false;
        for object in &mut self.objects {
            for material in object.materials.iter_mut().filter(|m| m.as_str() == from) {
                *material = to.to_string();
                renamed = true;
            }
        }
        if renamed {
            self.journal.push(SceneOp::RenameMaterial {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    fn rename_collection(&mut self, from: &str, to: &str) {
        if from == SCENE_COLLECTION || from == to || self.has_collection(to) {
            return;
        }
        let Some(entry) = self.find_collection_mut(from) else {
            return;
        };
        entry.name = to.to_string();
        for collection in &mut self.collections {
            for child in collection.children.iter_mut().filter(|c| c.as_str() == from) {
                *child = to.to_string();
            }
        }
        self.journal.push(SceneOp::RenameCollection {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{link_collection_to_collection, link_objects_to_collection};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seeding_is_not_journaled() {
        let mut scene = MemoryScene::new();
        scene.insert_collection(SCENE_COLLECTION, &["Props".to_string()]);
        scene.insert_object(ObjectInfo::mesh("lamp").in_collection("Props"));
        scene.insert_object(ObjectInfo::mesh("chest_01"));

        assert!(scene.journal().is_empty());
        assert_eq!(scene.collection_objects("Props"), vec!["lamp"]);
        assert_eq!(scene.object_collections("chest_01"), vec![SCENE_COLLECTION]);
    }

    #[test]
    fn test_move_creates_and_attaches_to_root() {
        let mut scene = MemoryScene::new();
        scene.insert_object(ObjectInfo::mesh("chest_01"));

        link_objects_to_collection(&mut scene, &["chest_01"], "GEAR");
        assert_eq!(scene.object_collections("chest_01"), vec!["GEAR"]);
        assert_eq!(scene.collection_parents("GEAR"), vec![SCENE_COLLECTION]);
        assert_eq!(
            scene.journal(),
            &[
                SceneOp::CreateCollection { name: "GEAR".into() },
                SceneOp::UnlinkObject {
                    object: "chest_01".into(),
                    collection: SCENE_COLLECTION.into()
                },
                SceneOp::LinkObject {
                    object: "chest_01".into(),
                    collection: "GEAR".into()
                },
                SceneOp::LinkCollection {
                    child: "GEAR".into(),
                    parent: SCENE_COLLECTION.into()
                },
            ]
        );
    }

    #[test]
    fn test_collection_move_unlinks_from_root() {
        let mut scene = MemoryScene::new();
        scene.insert_collection(SCENE_COLLECTION, &["BODY".to_string()]);

        link_collection_to_collection(&mut scene, "BODY", "Satele");
        assert_eq!(scene.collection_parents("BODY"), vec!["Satele"]);
        assert_eq!(scene.collection_parents("Satele"), vec![SCENE_COLLECTION]);
        assert_eq!(scene.collection_children(SCENE_COLLECTION), vec!["Satele"]);
    }

    #[test]
    fn test_cycles_are_refused() {
        let mut scene = MemoryScene::new();
        scene.insert_collection(SCENE_COLLECTION, &["A".to_string()]);
        scene.insert_collection("A", &["B".to_string()]);
        scene.link_collection("A", "B");
        assert_eq!(scene.collection_parents("A"), vec![SCENE_COLLECTION]);
    }

    #[test]
    fn test_remove_clears_links_and_parenting() {
        let mut scene = MemoryScene::new();
        scene.insert_object(ObjectInfo::armature("skeleton"));
        scene.insert_object(ObjectInfo::mesh("naked_torso"));
        scene.parent_to_armature("naked_torso", "skeleton", Mat4::IDENTITY);
        assert_eq!(scene.parent_of("naked_torso"), Some("skeleton"));

        scene.remove_object("skeleton");
        assert!(!scene.has_object("skeleton"));
        assert_eq!(scene.parent_of("naked_torso"), None);
        assert!(scene.collection_objects(SCENE_COLLECTION) == vec!["naked_torso"]);
    }

    #[test]
    fn test_recursive_objects() {
        let mut scene = MemoryScene::new();
        scene.insert_collection("Satele", &["GEAR".to_string()]);
        scene.insert_object(ObjectInfo::mesh("skeleton").in_collection("Satele"));
        scene.insert_object(ObjectInfo::mesh("chest_01").in_collection("GEAR"));
        assert_eq!(
            scene.collection_objects_recursive("Satele"),
            vec!["skeleton", "chest_01"]
        );
    }

    #[test]
    fn test_journal_serializes_tagged() {
        let op = SceneOp::SetShowInFront {
            object: "skeleton".into(),
            show: true,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"op":"set_show_in_front","object":"skeleton","show":true}"#);
    }
}
