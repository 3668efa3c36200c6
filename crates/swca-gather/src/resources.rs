//! Validation of the asset-extraction `resources` root.

use std::fmt;
use std::path::Path;

/// Subfolder every extraction's `resources` root contains.
pub const RESOURCES_PROBE: &str = "art/shaders/materials";

/// Usability of a configured `resources` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcesStatus {
    /// No folder configured.
    NotSet,
    /// The path exists but is not a `resources` root.
    NotValid(String),
    /// Nothing exists at the path.
    NotFound,
    /// A valid `resources` root.
    Set,
}

impl ResourcesStatus {
    /// Returns true when assets can be gathered from the root.
    pub fn is_usable(&self) -> bool {
        matches!(self, ResourcesStatus::Set)
    }

    /// Returns the short status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourcesStatus::NotSet => "NOT SET",
            ResourcesStatus::NotValid(_) => "NOT VALID",
            ResourcesStatus::NotFound => "NOT FOUND",
            ResourcesStatus::Set => "SET",
        }
    }

    /// Returns the status with its explanation.
    pub fn verbose(&self) -> String {
        match self {
            ResourcesStatus::NotSet => "NOT SET.".to_string(),
            ResourcesStatus::NotValid(reason) => format!("NOT VALID. {}", reason),
            ResourcesStatus::NotFound => {
                "NOT FOUND. No folder can be found at the specified path.".to_string()
            }
            ResourcesStatus::Set => "SET. This is a valid 'resources' folder.".to_string(),
        }
    }
}

impl fmt::Display for ResourcesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks a configured root by probing for [`RESOURCES_PROBE`].
pub fn check_resources(root: Option<&Path>) -> ResourcesStatus {
    let Some(root) = root.filter(|r| !r.as_os_str().is_empty()) else {
        return ResourcesStatus::NotSet;
    };
    if !root.exists() {
        return ResourcesStatus::NotFound;
    }
    if !root.is_dir() {
        return ResourcesStatus::NotValid("This is not a folder path.".to_string());
    }
    if root.join(RESOURCES_PROBE).is_dir() {
        ResourcesStatus::Set
    } else {
        ResourcesStatus::NotValid(
            "This folder isn't a valid 'resources' directory root.".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_set() {
        assert_eq!(check_resources(None), ResourcesStatus::NotSet);
        assert_eq!(check_resources(Some(Path::new(""))), ResourcesStatus::NotSet);
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let status = check_resources(Some(&dir.path().join("nowhere")));
        assert_eq!(status, ResourcesStatus::NotFound);
        assert!(!status.is_usable());
    }

    #[test]
    fn test_not_valid() {
        let dir = tempfile::tempdir().unwrap();
        let status = check_resources(Some(dir.path()));
        assert_eq!(status.as_str(), "NOT VALID");

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(check_resources(Some(&file))
            .verbose()
            .contains("not a folder path"));
    }

    #[test]
    fn test_set() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(RESOURCES_PROBE)).unwrap();
        let status = check_resources(Some(dir.path()));
        assert!(status.is_usable());
        assert_eq!(status.to_string(), "SET");
    }
}
