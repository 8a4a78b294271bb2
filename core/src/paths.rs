//! Path resolution and the exclusion / workspace-containment policy.

use std::path::{Path, PathBuf};

use tidyscan_config::{ResolvedConfig, normalize_path};

/// Resolves paths reported by the analyzer relative to one primary document.
pub(crate) struct PathResolver<'a> {
    config: &'a ResolvedConfig,
    primary: &'a Path,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a ResolvedConfig, primary: &'a Path) -> Self {
        Self { config, primary }
    }

    /// Absolute, normalized form of `raw` without applying any policy.
    ///
    /// Empty means the primary document; relative paths are anchored at the
    /// primary document's directory.
    pub fn absolutize(&self, raw: &str) -> PathBuf {
        if raw.is_empty() {
            return self.primary.to_path_buf();
        }
        let raw = Path::new(raw);
        if raw.is_absolute() {
            return normalize_path(raw);
        }
        let base = self.primary.parent().unwrap_or_else(|| Path::new("."));
        normalize_path(&base.join(raw))
    }

    /// Absolutize `raw`, then drop it if policy rejects the result.
    pub fn resolve(&self, raw: &str) -> Option<PathBuf> {
        let path = self.absolutize(raw);
        if self.accepts(&path) {
            Some(path)
        } else {
            tracing::trace!(path = %path.display(), "Dropping diagnostics for filtered path");
            None
        }
    }

    /// Whether diagnostics for `path` may appear in the result map.
    pub fn accepts(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        if self
            .config
            .excludes()
            .iter()
            .any(|pattern| !pattern.is_empty() && text.contains(pattern.as_str()))
        {
            return false;
        }
        if !self.config.workspace_only() {
            return true;
        }
        let folders = self.config.workspace_folders();
        folders.is_empty() || folders.iter().any(|f| path.starts_with(f.path()))
    }
}
