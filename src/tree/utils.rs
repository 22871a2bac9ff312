//! Shared utility functions for tree walking

use std::io;
use std::path::{MAIN_SEPARATOR, Path};

fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}

fn basename(path: &str) -> &str {
    path.rsplit(is_separator).next().unwrap_or("")
}

fn dirname(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(0) => &path[..1],
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Display name of the root directory.
///
/// Trailing separators are ignored; if nothing is left the parent's name is
/// used instead.
pub fn root_name(root: &Path) -> String {
    let text = root.to_string_lossy();
    let name = basename(text.trim_end_matches(is_separator));
    if name.is_empty() {
        basename(dirname(&text)).to_string()
    } else {
        name.to_string()
    }
}

/// Name of a directory as used for directory-scoped rules; empty when the
/// path has no final normal component.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Line reported in place of a directory's children when listing fails.
pub fn listing_error_message(err: &io::Error) -> String {
    if err.kind() == io::ErrorKind::PermissionDenied {
        "Access Denied".to_string()
    } else {
        err.to_string()
    }
}
