//! Relative-path ("docroot") computation.
//!
//! Everything here is lexical: no filesystem access, no failure modes.
//! Paths are rendered with forward slashes regardless of host platform.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components lexically.
///
/// `..` at the start of a relative path is kept (there is nothing to pop);
/// symlinks are not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if popped {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Make `path` absolute against `base` (if relative), then normalize.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Relative path from `dir` up (or across) to `root`, forward-slashed.
///
/// Equal directories yield the empty string.
pub fn relative_from(dir: &Path, root: &Path) -> String {
    let from: Vec<String> = components_of(&normalize(dir));
    let to: Vec<String> = components_of(&normalize(root));

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_owned());
    }
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

/// The `docroot` variable value for a document living in `dir`: the relative
/// path back to `root` with a trailing `/`, or the empty string when `dir`
/// already is the root.
pub fn docroot_value(dir: &Path, root: &Path) -> String {
    let relative = relative_from(dir, root);
    if relative.is_empty() {
        String::new()
    } else {
        format!("{relative}/")
    }
}

fn components_of(path: &Path) -> Vec<String> {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
