//! Copy execution.
//!
//! Each item is independent: a failure is recorded and the batch goes on.
//! With `preserve_existing` set, files already in the character folder are
//! left alone so retouched textures survive a re-run.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use crate::error::{CopyItemError, CopyStage};
use crate::plan::CopyItem;

/// What happened to one plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyStatus {
    /// The file was copied.
    Copied,
    /// The destination existed and was kept.
    Preserved,
    /// The copy failed; the message is the error text.
    Failed(String),
}

impl CopyStatus {
    /// Returns the label printed in progress lines.
    pub fn label(&self) -> &str {
        match self {
            CopyStatus::Copied => "COPIED",
            CopyStatus::Preserved => "PRESERVED",
            CopyStatus::Failed(_) => "FAILED",
        }
    }
}

/// Totals of a copy batch.
#[derive(Debug, Default)]
pub struct CopyOutcome {
    pub copied: usize,
    pub preserved: usize,
    pub errors: Vec<CopyItemError>,
}

impl CopyOutcome {
    /// Returns true when every item was copied or preserved.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the `slot - kind - source` identity of every failed item.
    pub fn failed_items(&self) -> Vec<String> {
        self.errors.iter().map(CopyItemError::identity).collect()
    }
}

/// Executes copy plans.
#[derive(Debug, Clone, Copy)]
pub struct CopyExecutor {
    preserve_existing: bool,
}

impl Default for CopyExecutor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CopyExecutor {
    /// Creates an executor. `preserve_existing` skips destinations that
    /// already exist.
    pub fn new(preserve_existing: bool) -> Self {
        Self { preserve_existing }
    }

    /// Copies every item.
    pub fn execute(&self, items: &[CopyItem]) -> CopyOutcome {
        self.execute_with_progress(items, |_, _| {})
    }

    /// Copies every item, reporting each one as it completes.
    pub fn execute_with_progress<F>(&self, items: &[CopyItem], mut progress: F) -> CopyOutcome
    where
        F: FnMut(&CopyItem, &CopyStatus),
    {
        let mut outcome = CopyOutcome::default();
        for item in items {
            let status = match self.copy_item(item) {
                Ok(status) => status,
                Err(err) => {
                    log::warn!("{}", err);
                    let status = CopyStatus::Failed(err.source.to_string());
                    outcome.errors.push(err);
                    status
                }
            };
            match status {
                CopyStatus::Copied => outcome.copied += 1,
                CopyStatus::Preserved => outcome.preserved += 1,
                CopyStatus::Failed(_) => {}
            }
            progress(item, &status);
        }
        log::info!(
            "copy batch done: {} copied, {} preserved, {} failed",
            outcome.copied,
            outcome.preserved,
            outcome.errors.len()
        );
        outcome
    }

    fn copy_item(&self, item: &CopyItem) -> Result<CopyStatus, CopyItemError> {
        let fail = |stage, source| CopyItemError {
            slot: item.slot.clone(),
            kind: item.kind,
            source_path: item.source.clone(),
            destination: item.destination.clone(),
            stage,
            source,
        };

        if let Some(parent) = item.destination.parent() {
            if !parent.exists() {
                log::debug!("creating {}", parent.display());
                create_dir_all_permissive(parent).map_err(|e| fail(CopyStage::CreateDir, e))?;
            }
        }

        if self.preserve_existing && item.destination.exists() {
            return Ok(CopyStatus::Preserved);
        }

        copy_with_metadata(&item.source, &item.destination)
            .map_err(|e| fail(CopyStage::Copy, e))?;
        Ok(CopyStatus::Copied)
    }
}

/// Creates a folder and its parents, user-accessible on unix.
fn create_dir_all_permissive(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(dir)
}

/// Copies contents, timestamps and permissions.
fn copy_with_metadata(source: &Path, destination: &Path) -> io::Result<u64> {
    let metadata = fs::metadata(source)?;
    let mut reader = File::open(source)?;
    let mut writer = File::create(destination)?;
    let bytes = io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    drop(writer);

    // Last, so a read-only source does not block the timestamp update.
    fs::set_permissions(destination, metadata.permissions())?;
    Ok(bytes)
}
