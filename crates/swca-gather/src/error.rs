//! Error types for copy planning and execution.

use std::fmt;
use std::path::PathBuf;

use swca_manifest::AssetKind;
use thiserror::Error;

/// Step of a copy that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    /// Creating the destination folder.
    CreateDir,
    /// Copying the file itself.
    Copy,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStage::CreateDir => write!(f, "creating destination folder"),
            CopyStage::Copy => write!(f, "copying"),
        }
    }
}

/// A single plan item that could not be copied. Never aborts the batch.
#[derive(Debug, Error)]
#[error("{slot} - {kind} - {}: {stage} failed: {source}", .source_path.display())]
pub struct CopyItemError {
    pub slot: String,
    pub kind: AssetKind,
    pub source_path: PathBuf,
    pub destination: PathBuf,
    pub stage: CopyStage,
    #[source]
    pub source: std::io::Error,
}

impl CopyItemError {
    /// Returns the stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self.stage {
            CopyStage::CreateDir => "GATHER_001",
            CopyStage::Copy => "GATHER_002",
        }
    }

    /// Returns the `slot - kind - source` identity shown in summaries.
    pub fn identity(&self) -> String {
        format!(
            "{} - {} - {}",
            self.slot,
            self.kind,
            self.source_path.display()
        )
    }
}

/// A manifest path that would place a copy outside its root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanPathError {
    /// The game-relative path has a `..` segment.
    #[error("'{path}' climbs out of its root")]
    ClimbsOut { path: String },

    /// A destination folder or file name is empty, `.`/`..` or holds a separator.
    #[error("'{segment}' is not a usable folder or file name")]
    BadSegment { segment: String },
}

impl PlanPathError {
    /// Returns the stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            PlanPathError::ClimbsOut { .. } => "PLAN_001",
            PlanPathError::BadSegment { .. } => "PLAN_002",
        }
    }
}
