//! Game-relative path helpers.
//!
//! Manifest paths are written Windows-style (`\art\dynamic\...`), sometimes
//! with forward slashes, with or without a leading separator. The leading
//! separator is an artifact of the exporter, not a filesystem anchor.

use std::path::PathBuf;

/// Returns true for either slash direction.
pub fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Strips every leading separator from a game-relative path.
pub fn strip_leading_separator(path: &str) -> &str {
    path.trim_start_matches(is_separator)
}

/// Prefixes a backslash unless the path already starts with a separator.
///
/// Slash direction is left untouched.
pub fn ensure_leading_separator(path: &str) -> String {
    if path.starts_with(is_separator) {
        path.to_string()
    } else {
        format!("\\{}", path)
    }
}

/// Converts a game-relative path into a relative [`PathBuf`] using the
/// platform's separator.
pub fn to_relative_path(path: &str) -> PathBuf {
    strip_leading_separator(path)
        .split(is_separator)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Returns the last component of a game-relative path, whichever separator
/// it uses.
pub fn file_name(path: &str) -> Option<&str> {
    path.split(is_separator)
        .rev()
        .find(|segment| !segment.is_empty())
}

/// Returns true when a game-relative path has a `..` segment.
pub fn climbs_out(path: &str) -> bool {
    path.split(is_separator).any(|segment| segment == "..")
}

/// Returns true for a name usable as a single path component.
pub fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains(is_separator)
}
