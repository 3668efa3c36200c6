//! SWTOR Character Assembler
//!
//! This crate runs the whole character assembly without depending on any
//! particular 3D editor. The editor is reached through two ports:
//!
//! - [`SceneGraph`] - find/create/link/parent/rename operations on the scene
//! - [`CharacterImporter`] - the external `.gr2` importer, which reports the
//!   objects it created instead of leaving the caller to diff the scene
//!
//! # Pipeline
//!
//! 1. Parse `paths.json` and its companion manifests
//! 2. Gather every referenced asset into the character folder
//! 3. Import the character (and its skeleton) through the importer port
//! 4. Reconcile the created objects into `BODY`/`GEAR` collections,
//!    binding them to the skeleton when asked to
//!
//! [`MemoryScene`] is an in-memory [`SceneGraph`] that journals every
//! mutation as a [`SceneOp`], so a host adapter can replay reconciliation in
//! one batch after the import has succeeded.
//!
//! # Example
//!
//! ```ignore
//! use swca_assembler::{AssembleOptions, Assembler, MemoryScene};
//!
//! let mut scene = MemoryScene::new();
//! let report = Assembler::new(AssembleOptions::default())
//!     .resources(Path::new("/extraction/resources"))
//!     .run(Path::new("Satele_Shan/Satele_Shan/paths.json"), &mut importer, &mut scene);
//!
//! println!("{}: {}", report.status, report.summary);
//! ```
//!
//! # Crate Structure
//!
//! - [`assemble`] - The top-level assembly operation
//! - [`reconcile`] - Body/gear partitioning and collection organisation
//! - [`prefix`] - Name prefixing for successive imports into one file
//! - [`scene`] - Scene-graph port and collection link helpers
//! - [`memory`] - In-memory journaling scene
//! - [`importer`] - Importer port
//! - [`options`] - Assembly options
//! - [`report`] - Assembly status and report
//! - [`error`] - Error types

pub mod assemble;
pub mod error;
pub mod importer;
pub mod memory;
pub mod options;
pub mod prefix;
pub mod reconcile;
pub mod report;
pub mod scene;

pub use assemble::Assembler;
pub use error::{ImportError, ImportResult};
pub use importer::{CharacterImporter, ImportOutcome};
pub use memory::{MemoryScene, SceneOp};
pub use options::AssembleOptions;
pub use prefix::{add_prefix, PrefixSummary};
pub use reconcile::{
    is_body_part, partition, reconcile, Partition, Reconciliation, ARMOR_SLOTS, BODY_COLLECTION,
    GEAR_COLLECTION,
};
pub use report::{AssemblyReport, AssemblyStatus, GatherSummary};
pub use scene::{
    link_collection_to_collection, link_objects_to_collection, ObjectInfo, ObjectKind, SceneGraph,
    SCENE_COLLECTION,
};
