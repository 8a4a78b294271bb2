//! Workspace folders and `${workspaceFolder}` placeholder resolution.

use std::path::{self, Component, Path, PathBuf};

const WORKSPACE_PLACEHOLDER: &str = "${workspaceFolder}";

/// A named workspace root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    name: String,
    path: PathBuf,
}

impl WorkspaceFolder {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: normalize_path(&path.into()),
        }
    }

    /// Build a folder from a `file://` URI as sent by editors.
    ///
    /// Returns `None` for non-file URIs.
    #[must_use]
    pub fn from_uri(name: impl Into<String>, uri: &str) -> Option<Self> {
        let path = url::Url::parse(uri).ok()?.to_file_path().ok()?;
        Some(Self::new(name, path))
    }

    /// Folder named after the last component of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, path)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lexically normalize a path: drop `.` components and fold `..`.
///
/// Does not touch the filesystem, so symlinks are not resolved.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = Vec::new();
    for c in path.components() {
        match c {
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(c),
            },
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Replace `${workspaceFolder}` with `default_folder` and every
/// `${workspaceFolder:<name>}` with the matching folder's path.
///
/// Named placeholders without a matching folder are left as written.
#[must_use]
pub fn substitute_placeholders(
    raw: &str,
    default_folder: &Path,
    folders: &[WorkspaceFolder],
) -> String {
    let mut out = raw.replace(WORKSPACE_PLACEHOLDER, &default_folder.to_string_lossy());
    for folder in folders {
        let named = format!("${{workspaceFolder:{}}}", folder.name);
        if out.contains(&named) {
            out = out.replace(&named, &folder.path.to_string_lossy());
        }
    }
    out
}

/// Substitute placeholders, then anchor relative results at `default_folder`.
///
/// The result is absolute whenever `default_folder` is (or the current
/// directory can be determined) and is lexically normalized.
#[must_use]
pub fn resolve_path(raw: &str, default_folder: &Path, folders: &[WorkspaceFolder]) -> PathBuf {
    let substituted = PathBuf::from(substitute_placeholders(raw, default_folder, folders));
    let joined = if substituted.is_absolute() {
        substituted
    } else {
        default_folder.join(substituted)
    };
    let absolute = path::absolute(&joined).unwrap_or(joined);
    normalize_path(&absolute)
}
