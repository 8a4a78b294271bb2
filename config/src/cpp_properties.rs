//! Companion build configuration read from `.vscode/c_cpp_properties.json`.
//!
//! Each workspace folder may carry a C/C++ tooling settings file listing
//! include directories and language standards. We fold every configuration
//! entry of every folder into one [`CompanionSettings`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::workspace::{WorkspaceFolder, resolve_path};

/// Settings file location relative to a workspace folder.
const PROPERTIES_FILE: &str = ".vscode/c_cpp_properties.json";

#[derive(Debug, Default, Deserialize)]
struct PropertiesFile {
    #[serde(default)]
    configurations: Vec<PropertiesEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertiesEntry {
    #[serde(default)]
    include_path: Vec<String>,
    c_standard: Option<String>,
    cpp_standard: Option<String>,
}

/// Include directories and standards gathered from all workspace folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanionSettings {
    pub include_paths: Vec<PathBuf>,
    pub c_standard: Option<String>,
    pub cpp_standard: Option<String>,
}

impl CompanionSettings {
    /// Read the settings file of every folder. Missing or malformed files are
    /// skipped.
    #[must_use]
    pub fn read(folders: &[WorkspaceFolder]) -> Self {
        let mut settings = Self::default();
        for folder in folders {
            let path = folder.path().join(PROPERTIES_FILE);
            if !path.exists() {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<PropertiesFile>(&content).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(file) => settings.absorb(file, folder.path(), folders),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "Ignoring companion settings: {err}");
                }
            }
        }
        settings
    }

    fn absorb(&mut self, file: PropertiesFile, folder: &Path, folders: &[WorkspaceFolder]) {
        for entry in file.configurations {
            for raw in &entry.include_path {
                let resolved = resolve_path(raw, folder, folders);
                self.add_include_pattern(&resolved);
            }
            if let Some(standard) = entry.c_standard {
                self.c_standard = Some(standard);
            }
            if let Some(standard) = entry.cpp_standard {
                self.cpp_standard = Some(standard);
            }
        }
    }

    /// `dir/**` adds `dir` and every nested directory, `dir/*` adds `dir` and
    /// its immediate subdirectories, anything else is added as written.
    fn add_include_pattern(&mut self, pattern: &Path) {
        let text = pattern.to_string_lossy();
        if let Some(base) = text.strip_suffix("/**") {
            let base = PathBuf::from(base);
            self.push_unique(base.clone());
            for dir in subdirectories(&base, true) {
                self.push_unique(dir);
            }
        } else if let Some(base) = text.strip_suffix("/*") {
            let base = PathBuf::from(base);
            self.push_unique(base.clone());
            for dir in subdirectories(&base, false) {
                self.push_unique(dir);
            }
        } else {
            self.push_unique(pattern.to_path_buf());
        }
    }

    fn push_unique(&mut self, path: PathBuf) {
        if !self.include_paths.contains(&path) {
            self.include_paths.push(path);
        }
    }
}

/// Directories below `dir` in sorted order. Symlinked directories are not
/// followed.
fn subdirectories(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(path = %dir.display(), "Include directory not readable");
        return found;
    };
    let mut children: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    children.sort();
    for child in children {
        found.push(child.clone());
        if recursive {
            found.extend(subdirectories(&child, true));
        }
    }
    found
}
