//! Error types for manifest and material parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors raised while reading one of the character's JSON manifests.
///
/// Any of these is fatal for the manifest it concerns.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The selected file is not a `paths.json` manifest.
    #[error("'{path}' is not a '{expected}' file")]
    NotAManifest { path: PathBuf, expected: &'static str },

    /// The manifest could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not parseable as the expected JSON structure.
    #[error("Malformed {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    /// Returns a stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            ManifestError::NotAManifest { .. } => "MANIFEST_001",
            ManifestError::Read { .. } => "MANIFEST_002",
            ManifestError::Parse { .. } => "MANIFEST_003",
        }
    }

    pub(crate) fn parse(document: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { document, source }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while scanning a `.mat` material definition.
///
/// Callers treat these as "no auxiliary maps found": material files in the
/// extraction are not guaranteed to be well formed.
#[derive(Debug, Error)]
pub enum MaterialFileError {
    /// The material file could not be opened.
    #[error("Failed to read material file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The material file is not well-formed XML.
    #[error("Failed to parse material file{}: {source}", path_suffix(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: roxmltree::Error,
    },
}

impl MaterialFileError {
    /// Returns a stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            MaterialFileError::Read { .. } => "MATERIAL_001",
            MaterialFileError::Parse { .. } => "MATERIAL_002",
        }
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ManifestError::NotAManifest {
            path: PathBuf::from("character/other.json"),
            expected: "paths.json",
        };
        assert!(err.to_string().contains("is not a 'paths.json' file"));
        assert_eq!(err.code(), "MANIFEST_001");

        let err = ManifestError::read(
            "x/paths.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("x/paths.json"));
        assert_eq!(err.code(), "MANIFEST_002");
    }

    #[test]
    fn test_material_error_display() {
        let source = roxmltree::Document::parse("<material>").unwrap_err();
        let err = MaterialFileError::Parse {
            path: Some(PathBuf::from("a.mat")),
            source,
        };
        assert!(err.to_string().starts_with("Failed to parse material file a.mat"));
        assert_eq!(err.code(), "MATERIAL_002");
    }
}
