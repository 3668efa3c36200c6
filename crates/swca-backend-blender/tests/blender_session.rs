//! Full assembly through the orchestrator, with a shell script standing in
//! for Blender. The script records each job and answers with a canned report.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use swca_assembler::{
    AssembleOptions, Assembler, AssemblyStatus, MemoryScene, SceneGraph, SceneOp,
};
use swca_backend_blender::{BlenderImporter, HostJob, Orchestrator, OrchestratorConfig};

// Spawning while another test writes its script can fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

const CHARACTER_REPORT: &str = r#"{
    "ok": true,
    "objects": [
        {
            "name": "naked_torso_bfn",
            "kind": "MESH",
            "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
            "materials": ["skin_torso"],
            "collections": ["Scene Collection"]
        },
        {
            "name": "chest_jedi_a01",
            "kind": "MESH",
            "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
            "collections": ["Scene Collection"]
        }
    ],
    "collections": [{ "name": "Scene Collection" }]
}"#;

const SKELETON_REPORT: &str = r#"{
    "ok": true,
    "objects": [
        {
            "name": "bfnnew_skeleton",
            "kind": "ARMATURE",
            "data_name": "bfnnew_skeleton",
            "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 2], [0, 0, 0, 1]],
            "collections": ["Scene Collection"]
        }
    ],
    "collections": [{ "name": "Scene Collection" }]
}"#;

struct Session {
    _tmp: tempfile::TempDir,
    root: PathBuf,
    manifest: PathBuf,
    blend: PathBuf,
    jobs: PathBuf,
    reports: PathBuf,
    blender: PathBuf,
}

impl Session {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Satele_Shan").join("Satele_Shan");
        fs::create_dir_all(&root).unwrap();
        let manifest = root.join("paths.json");
        fs::write(
            &manifest,
            r#"[{ "slotName": "chest", "models": ["/art/dynamic/chest/chest_jedi_a01.gr2"] }]"#,
        )
        .unwrap();
        fs::write(
            root.join("skeleton.json"),
            r#"{ "path": "/art/dynamic/spec/bfnnew_skeleton.gr2" }"#,
        )
        .unwrap();
        fs::write(
            root.join("preset.json"),
            r#"{ "chestGear": { "name": "Jedi Battlemaster's Robe", "slot": "chest" } }"#,
        )
        .unwrap();

        let jobs = tmp.path().join("jobs");
        let reports = tmp.path().join("reports");
        fs::create_dir_all(&jobs).unwrap();
        fs::create_dir_all(&reports).unwrap();

        let blender = tmp.path().join("blender");
        let script = format!(
            r#"#!/bin/sh
while [ $# -gt 0 ]; do
    case "$1" in
        --mode) mode="$2"; shift ;;
        --job) job="$2"; shift ;;
        --report) report="$2"; shift ;;
    esac
    shift
done
cp "$job" "{jobs}/$mode.json"
cp "{reports}/$mode.json" "$report"
"#,
            jobs = jobs.display(),
            reports = reports.display()
        );
        fs::write(&blender, script).unwrap();
        fs::set_permissions(&blender, fs::Permissions::from_mode(0o755)).unwrap();

        let blend = root.join("Satele_Shan.blend");
        Self {
            _tmp: tmp,
            root,
            manifest,
            blend,
            jobs,
            reports,
            blender,
        }
    }

    fn answer(&self, mode: &str, report: &str) {
        fs::write(self.reports.join(format!("{mode}.json")), report).unwrap();
    }

    fn job(&self, mode: &str) -> Option<HostJob> {
        let path = self.jobs.join(format!("{mode}.json"));
        path.exists()
            .then(|| serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap())
    }

    fn importer(&self) -> BlenderImporter {
        let config = OrchestratorConfig::default()
            .blender_path(&self.blender)
            .timeout_secs(30);
        BlenderImporter::new(Orchestrator::with_config(config), Some(self.blend.clone()))
    }
}

fn assemble(session: &Session) -> (swca_assembler::AssemblyReport, MemoryScene) {
    let mut importer = session.importer();
    let mut scene = MemoryScene::new();
    let report = Assembler::new(AssembleOptions::default()).run(
        &session.manifest,
        &mut importer,
        &mut scene,
    );
    (report, scene)
}

fn has_op(ops: &[SceneOp], expected: &SceneOp) -> bool {
    ops.iter().any(|op| op == expected)
}

#[test]
fn test_import_reconcile_and_apply() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let session = Session::new();
    session.answer("import_character", CHARACTER_REPORT);
    session.answer("import_model", SKELETON_REPORT);
    session.answer("apply", r#"{ "ok": true }"#);

    let (report, scene) = assemble(&session);

    // No resources folder: gathering is skipped with a warning.
    assert_eq!(report.status, AssemblyStatus::SuccessWithWarnings);
    assert_eq!(
        report.imported_objects,
        vec!["naked_torso_bfn", "chest_jedi_a01"]
    );
    assert_eq!(report.skeleton.as_deref(), Some("bfnnew_skeleton"));

    let character = session.job("import_character").unwrap();
    assert_eq!(character.filepath.as_deref(), Some(session.manifest.as_path()));
    assert_eq!(character.blend.as_deref(), Some(session.blend.as_path()));

    let skeleton = session.job("import_model").unwrap();
    assert_eq!(
        skeleton.filepath,
        Some(session.root.join("skeleton").join("bfnnew_skeleton.gr2"))
    );

    let apply = session.job("apply").unwrap();
    assert!(scene.journal().is_empty());
    assert!(has_op(
        &apply.operations,
        &SceneOp::LinkObject {
            object: "chest_jedi_a01".into(),
            collection: "Jedi Battlemaster's Robe".into(),
        }
    ));
    assert!(has_op(
        &apply.operations,
        &SceneOp::LinkCollection {
            child: "BODY".into(),
            parent: "Satele_Shan".into(),
        }
    ));
    assert!(has_op(
        &apply.operations,
        &SceneOp::SetShowInFront {
            object: "bfnnew_skeleton".into(),
            show: true,
        }
    ));
    let inverse = apply.operations.iter().find_map(|op| match op {
        SceneOp::ParentToArmature {
            child,
            matrix_parent_inverse,
            ..
        } if child == "naked_torso_bfn" => Some(*matrix_parent_inverse),
        _ => None,
    });
    assert_eq!(inverse.map(|rows| rows[2][3]), Some(-2.0));

    assert_eq!(scene.collection_objects("BODY"), vec!["naked_torso_bfn"]);
    assert_eq!(scene.collection_parents("Satele_Shan"), vec!["Scene Collection"]);
}

#[test]
fn test_cancelled_import_applies_nothing() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let session = Session::new();
    session.answer("import_character", r#"{ "ok": true, "cancelled": true }"#);

    let (report, scene) = assemble(&session);

    assert_eq!(report.status, AssemblyStatus::Cancelled);
    assert!(session.job("import_model").is_none());
    assert!(session.job("apply").is_none());
    assert!(scene.object_names().is_empty());
}

#[test]
fn test_script_failure_cancels_with_fault() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let session = Session::new();
    session.answer(
        "import_character",
        r#"{ "ok": false, "error": "KeyError: 'slotName'" }"#,
    );

    let (report, _) = assemble(&session);

    assert_eq!(report.status, AssemblyStatus::Cancelled);
    assert!(report.summary.contains("crashed"));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("IMPORT_002") && w.contains("slotName")));
}

#[test]
fn test_inspect_mirrors_blend() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let session = Session::new();
    session.answer("inspect", SKELETON_REPORT);

    let scene = session.importer().inspect().unwrap();

    assert!(scene.has_object("bfnnew_skeleton"));
    assert_eq!(
        scene.armature_data("bfnnew_skeleton").as_deref(),
        Some("bfnnew_skeleton")
    );
    let job = session.job("inspect").unwrap();
    assert_eq!(job.filepath, None);
    assert!(job.operations.is_empty());
}

#[test]
fn test_missing_report_is_an_error() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let session = Session::new();

    // No canned answer: the script's cp fails and no report is written.
    let err = session.importer().inspect().unwrap_err();
    assert!(
        err.code() == "BLENDER_004" || err.code() == "BLENDER_007",
        "unexpected error {}",
        err
    );
}
