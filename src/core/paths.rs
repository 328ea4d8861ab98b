//! Lexical path utilities
//!
//! Tag derivation never touches the filesystem: paths are handled as
//! '/'-separated strings so the same input yields the same tag on every
//! platform, whether or not the referenced file exists.

use std::path::Path;

/// Normalize a platform path to use '/' as separator
pub fn normalize_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve '.' and '..' components lexically.
///
/// `..` segments that climb past the start of a relative path are kept,
/// so `../foo` stays `../foo`. An empty result collapses to `.`.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join a relative path onto a base directory.
///
/// An absolute `rel` replaces `base` outright, matching the usual
/// path-join convention.
pub fn join(base: &str, rel: &str) -> String {
    if rel.starts_with('/') || base.is_empty() {
        rel.to_string()
    } else {
        format!("{base}/{rel}")
    }
}

/// Express `path` relative to `base`, inserting `..` segments as needed.
///
/// Both arguments are normalized first; either both must be absolute or
/// both relative for the result to be meaningful.
pub fn relative_from(path: &str, base: &str) -> String {
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<&str> = path.split('/').filter(|c| !c.is_empty() && *c != ".").collect();
    let base_parts: Vec<&str> = base.split('/').filter(|c| !c.is_empty() && *c != ".").collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..");
    }
    parts.extend(&path_parts[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Directory portion of a '/'-separated path ("" when there is none).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}
