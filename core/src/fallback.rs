//! Retry against an alternate source file when a run reports nothing.
//!
//! Headers are rarely analyzable on their own: the analyzer needs a
//! translation unit that includes them. [`FallbackPolicy`] remembers which
//! primary file reported on which header and, when a header comes back
//! clean, runs once more against that primary file (or a same-named
//! sibling source).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::analyzer::{AnalysisEvent, AnalysisReport, Analyzer};
use crate::document::Document;
use crate::error::InvokeError;

/// Extensions tried, in order, when looking for a sibling source file.
const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "cxx"];

/// Non-primary file → the primary file whose run reported on it.
#[derive(Debug, Clone, Default)]
pub struct FileAssociations {
    map: HashMap<PathBuf, PathBuf>,
}

impl FileAssociations {
    /// Learn from every non-primary path in `report`.
    pub fn record(&mut self, report: &AnalysisReport) {
        let primary = report.document().path();
        for path in report.diagnostics().paths() {
            if path != primary {
                self.map.insert(path.to_path_buf(), primary.to_path_buf());
            }
        }
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Path> {
        self.map.get(path).map(PathBuf::as_path)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

/// Opt-in single retry on an empty result.
#[derive(Debug, Default)]
pub struct FallbackPolicy {
    associations: Mutex<FileAssociations>,
}

impl FallbackPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze `document`; on zero findings, analyze its alternate once.
    ///
    /// The returned report always has an entry for `document`'s path. A
    /// failing retry is logged and the first report is returned.
    pub async fn analyze(
        &self,
        analyzer: &Analyzer,
        document: Arc<Document>,
    ) -> Result<AnalysisReport, InvokeError> {
        let report = analyzer.analyze(Arc::clone(&document)).await?;
        self.associations.lock().await.record(&report);
        if report.total_count() > 0 {
            return Ok(report);
        }

        let Some(alternate) = self.alternate_for(document.path()).await else {
            return Ok(report);
        };
        let alternate = match Document::read(&alternate, document.language_id()) {
            Ok(doc) => Arc::new(doc),
            Err(e) => {
                tracing::debug!(path = %alternate.display(), "Cannot read alternate file: {e}");
                return Ok(report);
            }
        };
        tracing::debug!(
            path = %document.path().display(),
            alternate = %alternate.path().display(),
            "No diagnostics, retrying with alternate file"
        );

        match analyzer.analyze(alternate).await {
            Ok(mut retry) => {
                self.associations.lock().await.record(&retry);
                retry
                    .diagnostics_mut()
                    .ensure_entry(document.path().to_path_buf());
                Ok(retry)
            }
            Err(e) => {
                tracing::warn!(path = %document.path().display(), "Alternate run failed: {e}");
                Ok(report)
            }
        }
    }

    /// Run [`Self::analyze`] on a task and deliver the outcome on `events`,
    /// the same way [`Analyzer::spawn`] does.
    pub fn spawn(
        self: &Arc<Self>,
        analyzer: &Analyzer,
        document: Arc<Document>,
        events: mpsc::Sender<AnalysisEvent>,
    ) -> JoinHandle<()> {
        let policy = Arc::clone(self);
        let analyzer = analyzer.clone();
        tokio::spawn(async move {
            let path = document.path().to_path_buf();
            let event = match policy.analyze(&analyzer, document).await {
                Ok(report) => AnalysisEvent::Completed(report),
                Err(error) => {
                    tracing::warn!(path = %path.display(), "Analysis failed: {error}");
                    AnalysisEvent::Failed { path, error }
                }
            };
            let _ = events.send(event).await;
        })
    }

    /// Snapshot of the learned associations.
    pub async fn associations(&self) -> FileAssociations {
        self.associations.lock().await.clone()
    }

    async fn alternate_for(&self, path: &Path) -> Option<PathBuf> {
        if let Some(known) = self.associations.lock().await.get(path)
            && known != path
        {
            return Some(known.to_path_buf());
        }
        sibling_source(path)
    }
}

/// `dir/name.{c,cpp,cxx}` for a non-source `dir/name.ext`, if one exists.
fn sibling_source(path: &Path) -> Option<PathBuf> {
    let is_source = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
    if is_source {
        return None;
    }
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}
