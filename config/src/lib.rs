//! Configuration loading and resolution for tidyscan.
//!
//! [`Configuration`] is the raw, user-facing record (TOML). Resolving it
//! against the workspace folders produces an immutable [`ResolvedConfig`]
//! which the pipeline consumes.
//!
//! ```toml
//! executable = "clang-tidy-18"
//! header_filter = ".*"
//! system_include_path = ["${workspaceFolder}/third_party/include"]
//! excludes = ["/vendor/"]
//! workspace_only = true
//! ```

mod cpp_properties;
mod resolved;
mod workspace;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use cpp_properties::CompanionSettings;
pub use resolved::ResolvedConfig;
pub use workspace::{WorkspaceFolder, normalize_path, resolve_path, substitute_placeholders};

/// Name of the per-project configuration file looked up in the workspace root.
pub const PROJECT_CONFIG_FILE: &str = ".tidyscan.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How to invoke the analyzer and which of its findings to keep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Analyzer executable name or path.
    pub executable: String,
    /// Directories passed as `-isystem` include paths.
    #[serde(alias = "systemIncludePath")]
    pub system_include_path: Vec<String>,
    /// Language identifiers that are analyzed (e.g. `c`, `cpp`).
    #[serde(alias = "lintLanguages")]
    pub lint_languages: Vec<String>,
    /// Compiler arguments forwarded ahead of the analyzer's own.
    #[serde(alias = "extraCompilerArgs")]
    pub extra_compiler_args: Vec<String>,
    /// Pattern selecting which headers the analyzer reports on.
    #[serde(alias = "headerFilter")]
    pub header_filter: String,
    /// Raw analyzer arguments, appended verbatim.
    pub args: Vec<String>,
    /// Diagnostics whose file path contains any of these substrings are dropped.
    pub excludes: Vec<String>,
    /// Drop diagnostics for files outside every workspace folder.
    #[serde(alias = "workspaceOnly")]
    pub workspace_only: bool,
    /// Capture the analyzer's stderr and append it to stdout before parsing.
    #[serde(alias = "mergeStderr")]
    pub merge_stderr: bool,
    /// Kill runs that take longer than this. No limit when unset.
    #[serde(alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            executable: String::from("clang-tidy"),
            system_include_path: Vec::new(),
            lint_languages: vec![String::from("c"), String::from("cpp")],
            extra_compiler_args: vec![String::from("-Weverything")],
            header_filter: String::from(".*"),
            args: Vec::new(),
            excludes: Vec::new(),
            workspace_only: false,
            merge_stderr: false,
            timeout_secs: None,
        }
    }
}

impl Configuration {
    /// Parse a single TOML document on top of the defaults.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load layered configuration.
    ///
    /// Layers, later wins key by key: defaults, the user file
    /// (`~/.tidyscan/config.toml`), the project file in `workspace_root`, and
    /// `explicit`. Missing implicit files are skipped; broken implicit files
    /// are logged and skipped. An explicit file must exist and parse.
    pub fn load(workspace_root: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();
        let mut origin = None;

        let implicit = user_config_path()
            .into_iter()
            .chain(workspace_root.map(|root| root.join(PROJECT_CONFIG_FILE)));
        for path in implicit {
            if !path.exists() {
                continue;
            }
            match read_layer(&path) {
                Ok(table) => {
                    tracing::debug!(path = %path.display(), "Loaded config layer");
                    merged.extend(table);
                    origin = Some(path);
                }
                Err(err) => tracing::warn!("Skipping config layer: {err}"),
            }
        }

        if let Some(path) = explicit {
            merged.extend(read_layer(path)?);
            origin = Some(path.to_path_buf());
        }

        // Layers are valid on their own; mixing a key with its alias across
        // layers can still collide.
        toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: origin.unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE)),
                source,
            })
    }

    /// Resolve placeholders and derive the analyzer arguments.
    #[must_use]
    pub fn resolve(&self, workspace_folders: &[WorkspaceFolder]) -> ResolvedConfig {
        ResolvedConfig::new(self, workspace_folders)
    }
}

/// Location of the user-level config file.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tidyscan").join("config.toml"))
}

/// Read one config file as a raw table, rejecting values of the wrong type.
fn read_layer(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let table: toml::Table = toml::from_str(&content).map_err(parse_error)?;
    toml::Value::Table(table.clone())
        .try_into::<Configuration>()
        .map_err(parse_error)?;
    Ok(table)
}
