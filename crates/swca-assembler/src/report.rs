//! Assembly status and report.

use std::fmt;

use serde::Serialize;
use swca_gather::CopyOutcome;

use crate::reconcile::Reconciliation;

/// Terminal status of an assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssemblyStatus {
    Success,
    SuccessWithWarnings,
    Cancelled,
}

impl AssemblyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyStatus::Success => "success",
            AssemblyStatus::SuccessWithWarnings => "success-with-warnings",
            AssemblyStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssemblyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Totals of the gathering phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatherSummary {
    pub planned: usize,
    pub copied: usize,
    pub preserved: usize,
    pub failed: usize,
}

impl GatherSummary {
    pub fn from_outcome(planned: usize, outcome: &CopyOutcome) -> Self {
        Self {
            planned,
            copied: outcome.copied,
            preserved: outcome.preserved,
            failed: outcome.errors.len(),
        }
    }
}

/// Everything an assembly run reports back.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub status: AssemblyStatus,
    /// Name of the character's top-level collection.
    pub character: String,
    /// Human-readable outcome.
    pub summary: String,
    pub warnings: Vec<String>,
    /// `slot - kind - source` of every file that failed to copy.
    pub failed_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gathering: Option<GatherSummary>,
    pub imported_objects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<Reconciliation>,
}

impl AssemblyReport {
    pub(crate) fn new(character: impl Into<String>) -> Self {
        Self {
            status: AssemblyStatus::Success,
            character: character.into(),
            summary: String::new(),
            warnings: Vec::new(),
            failed_items: Vec::new(),
            gathering: None,
            imported_objects: Vec::new(),
            skeleton: None,
            reconciliation: None,
        }
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Ends the run as cancelled.
    pub(crate) fn cancel(mut self, summary: impl Into<String>) -> Self {
        self.status = AssemblyStatus::Cancelled;
        self.summary = summary.into();
        self
    }

    /// Ends the run, deriving the status from the collected warnings.
    pub(crate) fn finish(mut self, summary: impl Into<String>) -> Self {
        self.status = if self.warnings.is_empty() && self.failed_items.is_empty() {
            AssemblyStatus::Success
        } else {
            AssemblyStatus::SuccessWithWarnings
        };
        self.summary = summary.into();
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AssemblyStatus::Cancelled
    }
}
