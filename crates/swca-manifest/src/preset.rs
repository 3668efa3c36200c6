//! The optional `preset.json` companion manifest.
//!
//! Only entries whose key contains `Gear` matter: they give the in-game
//! display name of an armor piece and the substring its objects carry.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ManifestError, ManifestResult};
use crate::PRESET_FILE_NAME;

/// Marker a preset key must contain to describe armor gear.
pub const GEAR_KEY_MARKER: &str = "Gear";

/// In-game name and object-name substring of one armor piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearPreset {
    pub name: String,
    pub slot: String,
}

/// Ordered preset entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresetManifest {
    entries: Vec<(String, Option<GearPreset>)>,
}

impl PresetManifest {
    /// Parses a preset manifest from a JSON string.
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        let map: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| ManifestError::parse(PRESET_FILE_NAME, e))?;
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let preset = gear_preset(&value);
                (key, preset)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Reads a preset manifest, returning `None` when the file is absent.
    pub fn load_optional(path: &Path) -> ManifestResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ManifestError::read(path, e)),
        }
    }

    /// Returns the non-null gear entries, in file order.
    pub fn gear(&self) -> impl Iterator<Item = (&str, &GearPreset)> {
        self.entries.iter().filter_map(|(key, preset)| {
            if !key.contains(GEAR_KEY_MARKER) {
                return None;
            }
            preset.as_ref().map(|p| (key.as_str(), p))
        })
    }
}

fn gear_preset(value: &Value) -> Option<GearPreset> {
    let object = value.as_object()?;
    let name = object.get("name")?.as_str()?;
    let slot = object.get("slot")?.as_str()?;
    if slot.is_empty() {
        return None;
    }
    Some(GearPreset {
        name: name.to_string(),
        slot: slot.to_string(),
    })
}
