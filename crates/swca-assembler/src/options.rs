//! Assembly options.

use serde::{Deserialize, Serialize};

/// The six switches of a character assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembleOptions {
    /// Copy the assets without importing the character.
    pub gather_only: bool,
    /// Keep files already present in the character folder.
    pub preserve_existing: bool,
    /// Organise objects in collections named after their in-game names.
    pub collect: bool,
    /// Delete body parts, keeping armor gear only.
    pub armor_only: bool,
    /// Import the rigging skeleton when the character has one.
    pub import_skeleton: bool,
    /// Parent imported objects to the skeleton.
    pub bind_to_skeleton: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            gather_only: false,
            preserve_existing: true,
            collect: true,
            armor_only: false,
            import_skeleton: true,
            bind_to_skeleton: true,
        }
    }
}

impl AssembleOptions {
    /// Returns true when objects are bound to an imported skeleton.
    pub fn binds(&self) -> bool {
        self.import_skeleton && self.bind_to_skeleton
    }
}
