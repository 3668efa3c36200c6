//! Error types for the importer port.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for importer operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Failures of the external importer or the host it runs in.
///
/// A cancellation reported by the importer is not an error; see
/// [`crate::ImportOutcome::Cancelled`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// The importer or its host could not be started.
    #[error("importer unavailable: {0}")]
    Unavailable(String),

    /// The importer crashed while importing a file.
    #[error("importer crashed while importing {}: {message}", .path.display())]
    Fault { path: PathBuf, message: String },

    /// Reconciled scene changes could not be written back to the host.
    #[error("failed to apply scene changes: {0}")]
    Commit(String),
}

impl ImportError {
    /// Returns the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Unavailable(_) => "IMPORT_001",
            ImportError::Fault { .. } => "IMPORT_002",
            ImportError::Commit(_) => "IMPORT_003",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ImportError::Fault {
            path: PathBuf::from("Jedi/paths.json"),
            message: "KeyError: 'slotName'".into(),
        };
        assert_eq!(err.code(), "IMPORT_002");
        assert!(err.to_string().contains("Jedi/paths.json"));
        assert_eq!(ImportError::Commit("x".into()).code(), "IMPORT_003");
    }
}
