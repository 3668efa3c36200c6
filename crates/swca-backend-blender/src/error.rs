//! Error types for the Blender host adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for Blender host operations.
pub type BlenderResult<T> = Result<T, BlenderError>;

/// Errors that can occur while driving Blender.
#[derive(Debug, Error)]
pub enum BlenderError {
    /// Blender executable not found.
    #[error("Blender executable not found. Ensure Blender is installed and in PATH, or set BLENDER_PATH environment variable")]
    BlenderNotFound,

    /// Failed to spawn Blender process.
    #[error("Failed to spawn Blender process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Blender process timed out.
    #[error("Blender process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Blender process exited with non-zero status.
    #[error("Blender process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to serialize a job for Blender.
    #[error("Failed to serialize job: {0}")]
    SerializeJobFailed(#[source] serde_json::Error),

    /// Failed to write the job file for Blender.
    #[error("Failed to write job file: {0}")]
    WriteJobFailed(#[source] std::io::Error),

    /// Failed to read report from Blender.
    #[error("Failed to read Blender report from {path}: {source}")]
    ReadReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse report JSON from Blender.
    #[error("Failed to parse Blender report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),

    /// The script inside Blender raised.
    #[error("Blender job failed: {message}")]
    JobFailed { message: String },

    /// Python entrypoint script not found.
    #[error("Python entrypoint script not found at: {path}")]
    EntrypointNotFound { path: PathBuf },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlenderError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new job failed error.
    pub fn job_failed(message: impl Into<String>) -> Self {
        Self::JobFailed {
            message: message.into(),
        }
    }

    /// True when Blender could not be started at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BlenderError::BlenderNotFound
                | BlenderError::SpawnFailed(_)
                | BlenderError::EntrypointNotFound { .. }
        )
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            BlenderError::BlenderNotFound => "BLENDER_001",
            BlenderError::SpawnFailed(_) => "BLENDER_002",
            BlenderError::Timeout { .. } => "BLENDER_003",
            BlenderError::ProcessFailed { .. } => "BLENDER_004",
            BlenderError::SerializeJobFailed(_) => "BLENDER_005",
            BlenderError::WriteJobFailed(_) => "BLENDER_006",
            BlenderError::ReadReportFailed { .. } => "BLENDER_007",
            BlenderError::ParseReportFailed(_) => "BLENDER_008",
            BlenderError::JobFailed { .. } => "BLENDER_009",
            BlenderError::EntrypointNotFound { .. } => "BLENDER_010",
            BlenderError::Io(_) => "BLENDER_011",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlenderError::BlenderNotFound;
        assert!(err.to_string().contains("Blender executable not found"));
        assert!(err.is_unavailable());

        let err = BlenderError::Timeout { timeout_secs: 600 };
        assert!(err.to_string().contains("600 seconds"));
        assert!(!err.is_unavailable());

        let err = BlenderError::process_failed(1, "Traceback");
        assert!(err.to_string().contains("Traceback"));
        assert_eq!(err.code(), "BLENDER_004");
    }

    #[test]
    fn test_job_failed() {
        let err = BlenderError::job_failed("The .gr2 importer add-on is not enabled");
        assert!(err.to_string().contains("add-on is not enabled"));
        assert_eq!(err.code(), "BLENDER_009");
    }
}
