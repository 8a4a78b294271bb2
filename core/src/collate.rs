//! Turning captured analyzer output into the per-file result map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tidyscan_config::ResolvedConfig;
use tidyscan_types::{Diagnostic, DiagnosticSeverity, Range, Replacement};

use crate::document::{Document, DocumentCache};
use crate::parse::{self, CompilerMessage, Finding, RawReplacement};
use crate::paths::PathResolver;

/// Diagnostics grouped by absolute file path, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticMap {
    files: BTreeMap<PathBuf, Vec<Diagnostic>>,
    total: usize,
}

impl DiagnosticMap {
    /// A map holding an empty entry for `primary`.
    pub(crate) fn new(primary: &Path) -> Self {
        let mut map = Self::default();
        map.ensure_entry(primary.to_path_buf());
        map
    }

    pub(crate) fn ensure_entry(&mut self, path: PathBuf) {
        self.files.entry(path).or_default();
    }

    pub(crate) fn push(&mut self, path: PathBuf, diagnostic: Diagnostic) {
        self.files.entry(path).or_default().push(diagnostic);
        self.total += 1;
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[Diagnostic]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Diagnostic])> {
        self.files
            .iter()
            .map(|(path, items)| (path.as_path(), items.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Total diagnostic count across all files.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total
    }

    fn count_by_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|d| d.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Warning)
    }

    /// Compact status string, e.g. "E:2 W:5". Empty when there is nothing.
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.total == 0 {
            return String::new();
        }
        format!("E:{} W:{}", self.error_count(), self.warning_count())
    }
}

/// Build the result map for one run over `document`.
pub(crate) fn collate(
    config: &ResolvedConfig,
    document: &Arc<Document>,
    output: &str,
) -> DiagnosticMap {
    let mut collator = Collator::new(config, document);
    for message in parse::compiler_errors(output) {
        collator.add_compiler_error(message);
    }
    for finding in parse::findings(output) {
        collator.add_finding(finding);
    }
    let map = collator.map;
    tracing::debug!(
        path = %document.path().display(),
        files = map.files.len(),
        total = map.total_count(),
        "Collated diagnostics"
    );
    map
}

/// Run-scoped state shared by both parser passes.
struct Collator<'a> {
    resolver: PathResolver<'a>,
    cache: DocumentCache,
    map: DiagnosticMap,
}

impl<'a> Collator<'a> {
    fn new(config: &'a ResolvedConfig, document: &'a Arc<Document>) -> Self {
        Self {
            resolver: PathResolver::new(config, document.path()),
            cache: DocumentCache::new(Arc::clone(document)),
            map: DiagnosticMap::new(document.path()),
        }
    }

    fn add_compiler_error(&mut self, message: CompilerMessage) {
        let Some(path) = self.resolver.resolve(&message.path) else {
            return;
        };
        let diagnostic = Diagnostic::new(
            Range::point(message.position),
            message.message,
            DiagnosticSeverity::Error,
        );
        self.map.push(path, diagnostic);
    }

    fn add_finding(&mut self, finding: Finding) {
        // Error findings are reported by the compiler pass.
        if DiagnosticSeverity::classify(&finding.rule).is_error() {
            return;
        }
        let Some(path) = self.resolver.resolve(&finding.file_path) else {
            return;
        };
        // Unreadable files still get a diagnostic, positioned in the primary.
        let target = self
            .cache
            .get_or_load(&path)
            .unwrap_or_else(|| Arc::clone(self.cache.primary()));
        let position = target.position_at(finding.file_offset);

        let replacements: Vec<Replacement> = finding
            .replacements
            .iter()
            .map(|raw| self.replacement(raw))
            .collect();

        let diagnostic = Diagnostic::new(
            Range::point(position),
            format!("{} ({})", finding.message, finding.rule),
            DiagnosticSeverity::Warning,
        )
        .with_replacements(&replacements);
        self.map.push(path, diagnostic);
    }

    /// Replacement ranges use the replacement's own file, never the finding's.
    fn replacement(&mut self, raw: &RawReplacement) -> Replacement {
        let path = self.resolver.absolutize(&raw.file_path);
        let replacement = Replacement::new(
            path.clone(),
            raw.offset,
            raw.length,
            raw.replacement_text.clone(),
        );
        match self.cache.get_or_load(&path) {
            Some(doc) => {
                let range = Range::new(
                    doc.position_at(replacement.offset),
                    doc.position_at(replacement.end_offset()),
                );
                replacement.with_range(range)
            }
            None => replacement,
        }
    }
}
