//! Shared test utilities and fixtures
//!
//! Integration tests run the real pipeline against a fake analyzer: a shell
//! script in a temporary workspace that prints canned output.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::slice;
use std::sync::Arc;

use tempfile::TempDir;
use tidyscan_config::{Configuration, WorkspaceFolder};
use tidyscan_core::{Analyzer, Document};

/// A temporary workspace with a fake analyzer executable.
pub struct Workspace {
    dir: TempDir,
    root: WorkspaceFolder,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp workspace");
        let root = WorkspaceFolder::from_path(dir.path());
        Self { dir, root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn folder(&self) -> &WorkspaceFolder {
        &self.root
    }

    /// Write `content` to `relative` inside the workspace, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write workspace file");
        path
    }

    /// Install a fake analyzer running `body` and return its path.
    pub fn analyzer_script(&self, body: &str) -> PathBuf {
        let path = self.dir.path().join(".bin").join("fake-clang-tidy");
        fs::create_dir_all(path.parent().expect("script has parent")).expect("create bin dir");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
        path
    }

    /// Install a fake analyzer that prints `output` verbatim.
    pub fn canned_analyzer(&self, output: &str) -> PathBuf {
        let canned = self.dir.path().join(".bin").join("canned-output");
        fs::create_dir_all(canned.parent().expect("canned has parent")).expect("create bin dir");
        fs::write(&canned, output).expect("write canned output");
        self.analyzer_script(&format!("cat '{}'", canned.display()))
    }

    /// Default configuration pointing at `program`, resolved for this workspace.
    pub fn analyzer(&self, program: &Path, tweak: impl FnOnce(&mut Configuration)) -> Analyzer {
        let mut config = Configuration {
            executable: program.to_string_lossy().into_owned(),
            ..Configuration::default()
        };
        tweak(&mut config);
        Analyzer::new(Arc::new(config.resolve(slice::from_ref(&self.root))))
    }

    /// Load a workspace file as a document.
    pub fn document(&self, relative: &str, language_id: &str) -> Arc<Document> {
        let path = self.root().join(relative);
        Arc::new(Document::read(&path, language_id).expect("read document"))
    }
}

/// An exported-fixes block with one flat finding.
pub fn fixes_block(rule: &str, message: &str, offset: usize, file_path: &str) -> String {
    format!(
        "---\nMainSourceFile: 'main.cpp'\nDiagnostics:\n  - DiagnosticName: '{rule}'\n    Message: '{message}'\n    FileOffset: {offset}\n    FilePath: '{file_path}'\n...\n"
    )
}

/// Path to the built `tidyscan` binary.
pub fn tidyscan_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tidyscan"))
}
