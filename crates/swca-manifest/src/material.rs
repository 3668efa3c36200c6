//! Auxiliary texture scanner for `.mat` material definitions.
//!
//! Some shaders reference maps that `paths.json` never lists: the direction
//! map used by hair and the animated wrinkle map and mask used by faces.
//! Their values are extensionless game paths such as `\art\x\y`.

use std::path::Path;

use crate::error::MaterialFileError;
use crate::paths::ensure_leading_separator;
use crate::TEXTURE_EXTENSION;

/// Input semantics consulted, in the order their maps are returned.
pub const AUXILIARY_SEMANTICS: [&str; 3] =
    ["DirectionMap", "animatedWrinkleMap", "animatedWrinkleMask"];

/// Reads a material file and returns its auxiliary texture paths.
pub fn scan_auxiliary_maps(path: &Path) -> Result<Vec<String>, MaterialFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| MaterialFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_auxiliary_maps(&content).map_err(|err| match err {
        MaterialFileError::Parse { source, .. } => MaterialFileError::Parse {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}

/// Extracts auxiliary texture paths from material XML.
///
/// Each returned path carries the texture extension and a leading
/// separator; slash direction is kept as written.
pub fn parse_auxiliary_maps(xml: &str) -> Result<Vec<String>, MaterialFileError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|source| MaterialFileError::Parse { path: None, source })?;
    let root = doc.root_element();

    let mut maps = Vec::new();
    for semantic in AUXILIARY_SEMANTICS {
        let input = root
            .children()
            .filter(|n| n.has_tag_name("input"))
            .find(|n| input_semantic(n) == Some(semantic));
        let Some(input) = input else {
            continue;
        };
        let value = input
            .children()
            .find(|n| n.has_tag_name("value"))
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match value {
            Some(value) => {
                maps.push(ensure_leading_separator(&format!(
                    "{}{}",
                    value, TEXTURE_EXTENSION
                )));
            }
            None => log::debug!("material input {} has no value", semantic),
        }
    }
    Ok(maps)
}

/// The semantic is a child element in game files; an attribute is accepted
/// too.
fn input_semantic<'a>(input: &roxmltree::Node<'a, '_>) -> Option<&'a str> {
    if let Some(attr) = input.attribute("semantic") {
        return Some(attr.trim());
    }
    input
        .children()
        .find(|n| n.has_tag_name("semantic"))
        .and_then(|n| n.text())
        .map(str::trim)
}
