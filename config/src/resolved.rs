//! Configuration after placeholder resolution, ready for the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Configuration;
use crate::cpp_properties::CompanionSettings;
use crate::workspace::{WorkspaceFolder, resolve_path, substitute_placeholders};

/// Immutable configuration for one or more analysis runs.
///
/// Paths are absolute and placeholders are substituted. `base_args` holds
/// every analyzer argument that does not depend on the analyzed document.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    executable: String,
    lint_languages: Vec<String>,
    header_filter: String,
    system_include_paths: Vec<PathBuf>,
    extra_compiler_args: Vec<String>,
    args: Vec<String>,
    excludes: Vec<String>,
    workspace_only: bool,
    workspace_folders: Vec<WorkspaceFolder>,
    default_workspace_folder: PathBuf,
    companion: CompanionSettings,
    base_args: Vec<String>,
    merge_stderr: bool,
    timeout: Option<Duration>,
}

impl ResolvedConfig {
    pub(crate) fn new(config: &Configuration, folders: &[WorkspaceFolder]) -> Self {
        let default_workspace_folder = folders
            .first()
            .map_or_else(|| PathBuf::from("."), |f| f.path().to_path_buf());

        let substitute = |raw: &String| substitute_placeholders(raw, &default_workspace_folder, folders);

        // Excludes are substring patterns, not paths: substitute only.
        let excludes: Vec<String> = config.excludes.iter().map(substitute).collect();
        let system_include_paths: Vec<PathBuf> = config
            .system_include_path
            .iter()
            .map(|raw| resolve_path(raw, &default_workspace_folder, folders))
            .collect();
        let extra_compiler_args: Vec<String> =
            config.extra_compiler_args.iter().map(substitute).collect();
        let args: Vec<String> = config.args.iter().map(substitute).collect();

        if !config.header_filter.is_empty()
            && let Err(err) = regex::Regex::new(&config.header_filter)
        {
            tracing::warn!(
                pattern = %config.header_filter,
                "Header filter is not a valid regular expression, passing it through: {err}"
            );
        }

        let companion = CompanionSettings::read(folders);

        let mut resolved = Self {
            executable: config.executable.clone(),
            lint_languages: config.lint_languages.clone(),
            header_filter: config.header_filter.clone(),
            system_include_paths,
            extra_compiler_args,
            args,
            excludes,
            workspace_only: config.workspace_only,
            workspace_folders: folders.to_vec(),
            default_workspace_folder,
            companion,
            base_args: Vec::new(),
            merge_stderr: config.merge_stderr,
            timeout: config.timeout_secs.map(Duration::from_secs),
        };
        resolved.base_args = resolved.derive_base_args();
        resolved
    }

    fn derive_base_args(&self) -> Vec<String> {
        let mut args = vec![String::from("--export-fixes=-")];
        if !self.header_filter.is_empty() {
            args.push(format!("-header-filter={}", self.header_filter));
        }
        for path in &self.system_include_paths {
            args.push(format!("-extra-arg=-isystem{}", path.display()));
        }
        for arg in &self.extra_compiler_args {
            args.push(format!("-extra-arg-before={arg}"));
        }
        args.extend(self.args.iter().cloned());
        for path in &self.companion.include_paths {
            args.push(format!("-extra-arg=-I{}", path.display()));
        }
        args
    }

    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Whether documents with this language identifier are analyzed.
    #[must_use]
    pub fn accepts_language(&self, language_id: &str) -> bool {
        self.lint_languages.iter().any(|l| l == language_id)
    }

    #[must_use]
    pub fn header_filter(&self) -> &str {
        &self.header_filter
    }

    #[must_use]
    pub fn system_include_paths(&self) -> &[PathBuf] {
        &self.system_include_paths
    }

    #[must_use]
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    #[must_use]
    pub fn workspace_only(&self) -> bool {
        self.workspace_only
    }

    #[must_use]
    pub fn workspace_folders(&self) -> &[WorkspaceFolder] {
        &self.workspace_folders
    }

    #[must_use]
    pub fn default_workspace_folder(&self) -> &Path {
        &self.default_workspace_folder
    }

    #[must_use]
    pub fn c_standard(&self) -> Option<&str> {
        self.companion.c_standard.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn cpp_standard(&self) -> Option<&str> {
        self.companion
            .cpp_standard
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Analyzer arguments shared by every document.
    #[must_use]
    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    #[must_use]
    pub fn merge_stderr(&self) -> bool {
        self.merge_stderr
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
