//! Path normalization

use std::path::{Component, Path};

/// Forward-slash form of a path string.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Join the normal components of a relative path with `/`.
///
/// Used for archive entry names and for matching paths reported to the browser,
/// which must not depend on the host separator.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
