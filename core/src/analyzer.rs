//! Analyzer facade: one invocation per document.
//!
//! Each call builds its own document cache and result map; nothing is shared
//! between concurrent runs except the immutable configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tidyscan_config::ResolvedConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::collate::{self, DiagnosticMap};
use crate::document::Document;
use crate::error::InvokeError;
use crate::invocation::Invocation;
use crate::process::{self, RunOptions};

/// The outcome of one completed run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    document: Arc<Document>,
    diagnostics: DiagnosticMap,
}

impl AnalysisReport {
    pub(crate) fn new(document: Arc<Document>, diagnostics: DiagnosticMap) -> Self {
        Self {
            document,
            diagnostics,
        }
    }

    /// The document the run was started for.
    #[must_use]
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticMap {
        &self.diagnostics
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut DiagnosticMap {
        &mut self.diagnostics
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.diagnostics.total_count()
    }
}

/// Delivered exactly once per spawned run.
#[derive(Debug)]
pub enum AnalysisEvent {
    Completed(AnalysisReport),
    Failed { path: PathBuf, error: InvokeError },
}

/// Runs the analyzer against documents using one resolved configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: Arc<ResolvedConfig>,
}

impl Analyzer {
    #[must_use]
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Whether `document`'s language is configured for analysis.
    #[must_use]
    pub fn accepts(&self, document: &Document) -> bool {
        self.config.accepts_language(document.language_id())
    }

    /// Run the analyzer on `document` and collate its output.
    ///
    /// Documents in languages that are not analyzed get an empty report
    /// without spawning anything.
    pub async fn analyze(&self, document: Arc<Document>) -> Result<AnalysisReport, InvokeError> {
        if !self.accepts(&document) {
            tracing::debug!(
                path = %document.path().display(),
                language = document.language_id(),
                "Language not analyzed, skipping"
            );
            let empty = DiagnosticMap::new(document.path());
            return Ok(AnalysisReport::new(document, empty));
        }

        let invocation = Invocation::build(&self.config, document.path(), document.language_id());
        let options = RunOptions {
            merge_stderr: self.config.merge_stderr(),
            timeout: self.config.timeout(),
        };
        let output = process::run(&invocation, options).await?;
        let diagnostics = collate::collate(&self.config, &document, &output);

        tracing::info!(
            path = %document.path().display(),
            total = diagnostics.total_count(),
            "Analysis complete"
        );
        Ok(AnalysisReport::new(document, diagnostics))
    }

    /// Run [`Self::analyze`] on a task and deliver the outcome on `events`.
    ///
    /// A dropped receiver is not an error; the result is discarded.
    pub fn spawn(
        &self,
        document: Arc<Document>,
        events: mpsc::Sender<AnalysisEvent>,
    ) -> JoinHandle<()> {
        let analyzer = self.clone();
        tokio::spawn(async move {
            let path = document.path().to_path_buf();
            let event = match analyzer.analyze(document).await {
                Ok(report) => AnalysisEvent::Completed(report),
                Err(error) => {
                    tracing::warn!(path = %path.display(), "Analysis failed: {error}");
                    AnalysisEvent::Failed { path, error }
                }
            };
            let _ = events.send(event).await;
        })
    }
}
