//! Job and report types exchanged with the Blender entrypoint.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use swca_assembler::scene::matrix_from_rows;
use swca_assembler::{MemoryScene, ObjectInfo, ObjectKind, SceneOp};

/// Input of one Blender run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostJob {
    /// The session `.blend`, opened if it exists and saved afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend: Option<PathBuf>,
    /// File handed to the importer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    /// Scene operations to replay.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<SceneOp>,
}

impl HostJob {
    pub fn new(blend: Option<PathBuf>) -> Self {
        Self {
            blend,
            ..Default::default()
        }
    }

    pub fn filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.filepath = Some(path.into());
        self
    }

    pub fn operations(mut self, operations: Vec<SceneOp>) -> Self {
        self.operations = operations;
        self
    }
}

/// An object described by Blender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_name: Option<String>,
    /// Row-major world matrix.
    pub matrix_world: [[f32; 4]; 4],
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub collections: Vec<String>,
}

impl HostObject {
    pub fn to_info(&self) -> ObjectInfo {
        ObjectInfo {
            name: self.name.clone(),
            kind: self.kind,
            data_name: self.data_name.clone(),
            matrix_world: matrix_from_rows(&self.matrix_world),
            materials: self.materials.clone(),
            collections: self.collections.clone(),
        }
    }
}

/// A collection and its child collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostCollection {
    pub name: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Report written by the Blender entrypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReport {
    /// Whether the job ran to completion.
    pub ok: bool,
    /// Whether the importer declined the file.
    #[serde(default)]
    pub cancelled: bool,
    /// Error message if the job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Blender version used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blender_version: Option<String>,
    /// Objects created by an import, or every object for `inspect`.
    #[serde(default)]
    pub objects: Vec<HostObject>,
    /// Every collection in the file, the scene collection included.
    #[serde(default)]
    pub collections: Vec<HostCollection>,
}

impl HostReport {
    /// Creates a successful report.
    pub fn success(objects: Vec<HostObject>, collections: Vec<HostCollection>) -> Self {
        Self {
            ok: true,
            cancelled: false,
            error: None,
            blender_version: None,
            objects,
            collections,
        }
    }

    /// Creates a failed report.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            cancelled: false,
            error: Some(error.into()),
            blender_version: None,
            objects: Vec::new(),
            collections: Vec::new(),
        }
    }

    /// Returns the names of the reported objects.
    pub fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    /// Mirrors the reported collections and objects into `scene`.
    pub fn seed(&self, scene: &mut MemoryScene) {
        for collection in &self.collections {
            scene.insert_collection(&collection.name, &collection.children);
        }
        for object in &self.objects {
            scene.insert_object(object.to_info());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swca_assembler::{SceneGraph, SCENE_COLLECTION};

    const REPORT: &str = r#"{
        "ok": true,
        "blender_version": "4.1.0",
        "objects": [
            {
                "name": "bfnnew_skeleton",
                "kind": "ARMATURE",
                "data_name": "bfnnew_skeleton",
                "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0.5], [0, 0, 0, 1]],
                "collections": ["Scene Collection"]
            },
            {
                "name": "chest_jedi_a01",
                "kind": "MESH",
                "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
                "materials": ["chest_jedi_a01"],
                "collections": ["Props"]
            },
            {
                "name": "Light",
                "kind": "LIGHT",
                "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]
            }
        ],
        "collections": [
            { "name": "Scene Collection", "children": ["Props"] },
            { "name": "Props" }
        ]
    }"#;

    #[test]
    fn test_parse_report() {
        let report: HostReport = serde_json::from_str(REPORT).unwrap();
        assert!(report.ok);
        assert!(!report.cancelled);
        assert_eq!(report.objects[0].kind, ObjectKind::Armature);
        assert_eq!(report.objects[2].kind, ObjectKind::Other);
        assert_eq!(
            report.object_names(),
            vec!["bfnnew_skeleton", "chest_jedi_a01", "Light"]
        );
    }

    #[test]
    fn test_seed_scene() {
        let report: HostReport = serde_json::from_str(REPORT).unwrap();
        let mut scene = MemoryScene::new();
        report.seed(&mut scene);

        assert_eq!(scene.collection_parents("Props"), vec![SCENE_COLLECTION]);
        assert_eq!(scene.object_collections("chest_jedi_a01"), vec!["Props"]);
        let translation = scene.world_matrix("bfnnew_skeleton").unwrap().w_axis;
        assert_eq!(translation.z, 0.5);
        assert!(scene.journal().is_empty());
    }

    #[test]
    fn test_job_omits_empty_fields() {
        let job = HostJob::new(None).filepath("Satele/paths.json");
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(json, r#"{"filepath":"Satele/paths.json"}"#);
    }
}
