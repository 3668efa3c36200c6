//! SWTOR Character Asset Gathering
//!
//! This crate turns a parsed character manifest into files on disk. It is
//! split in two steps so the plan can be inspected before anything is
//! written:
//!
//! 1. **Planning** ([`plan`]) - resolves every manifest reference against the
//!    asset-extraction root and the character folder, scanning material
//!    definitions for extra texture maps on the way.
//! 2. **Execution** ([`executor`]) - copies the planned files, skipping
//!    existing destinations when asked to, and collecting per-item errors
//!    instead of aborting.
//!
//! # Example
//!
//! ```ignore
//! use swca_gather::{CharacterFolder, CopyExecutor, CopyPlanner};
//! use swca_manifest::AssetManifest;
//!
//! let manifest_path = Path::new("Satele_Shan/Satele_Shan/paths.json");
//! let manifest = AssetManifest::load(manifest_path)?;
//! let character = CharacterFolder::from_manifest_path(manifest_path);
//!
//! let plan = CopyPlanner::new(Path::new("/extraction/resources"), &character)
//!     .plan(&manifest, None);
//! let outcome = CopyExecutor::new(true).execute(&plan.items);
//! println!("{} copied, {} preserved", outcome.copied, outcome.preserved);
//! ```
//!
//! # Crate Structure
//!
//! - [`plan`] - Path resolution and copy planning
//! - [`executor`] - Copy execution
//! - [`resources`] - Asset-extraction root validation
//! - [`placeholder`] - The `black.dds` default texture
//! - [`error`] - Error types

pub mod error;
pub mod executor;
pub mod placeholder;
pub mod plan;
pub mod resources;

pub use error::{CopyItemError, CopyStage, PlanPathError};
pub use executor::{CopyExecutor, CopyOutcome, CopyStatus};
pub use placeholder::{ensure_black_dds, BLACK_DDS_PATH};
pub use plan::{
    CharacterFolder, CopyItem, CopyPlan, CopyPlanner, FsMaterialScanner, MaterialScanner,
    PlanWarning,
};
pub use resources::{check_resources, ResourcesStatus, RESOURCES_PROBE};
