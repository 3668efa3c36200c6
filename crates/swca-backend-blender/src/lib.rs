//! SWTOR Character Assembler Blender Backend
//!
//! This crate drives the `.gr2` importer add-on inside a headless Blender
//! and exposes it as a [`swca_assembler::CharacterImporter`].
//!
//! # Architecture
//!
//! The backend uses a two-part architecture:
//!
//! 1. **Rust Orchestrator** - Spawns Blender, passes jobs, and collects reports
//! 2. **Python Entrypoint** - Runs inside Blender to import, inspect, or
//!    replay scene operations
//!
//! Communication happens via JSON files:
//! - A [`HostJob`] is written to a temp file and passed to Blender
//! - Blender writes a [`HostReport`] describing the objects and collections
//!   it touched
//!
//! Reconciliation itself runs in Rust against a
//! [`swca_assembler::MemoryScene`] seeded from the reports. Its journal is
//! replayed in one `apply` session once the imports are done.
//!
//! # Example
//!
//! ```ignore
//! use swca_assembler::{AssembleOptions, Assembler, MemoryScene};
//! use swca_backend_blender::{BlenderImporter, Orchestrator};
//!
//! let mut importer = BlenderImporter::new(Orchestrator::new(), Some(blend));
//! let mut scene = MemoryScene::new();
//! let report = Assembler::new(AssembleOptions::default()).run(&manifest, &mut importer, &mut scene);
//! ```
//!
//! # Blender Requirements
//!
//! Blender and the `.gr2` importer add-on must be installed. The
//! orchestrator searches for Blender in:
//!
//! 1. The configured path
//! 2. `BLENDER_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations
//!
//! # Crate Structure
//!
//! - [`orchestrator`] - Blender subprocess management
//! - [`importer`] - The importer port implementation
//! - [`report`] - Job and report types
//! - [`error`] - Error types

pub mod error;
pub mod importer;
pub mod orchestrator;
pub mod report;

pub use error::{BlenderError, BlenderResult};
pub use importer::BlenderImporter;
pub use orchestrator::{HostMode, Orchestrator, OrchestratorConfig, DEFAULT_TIMEOUT_SECS};
pub use report::{HostCollection, HostJob, HostObject, HostReport};
