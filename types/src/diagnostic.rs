//! Position-resolved diagnostics produced by the pipeline.

use std::path::Path;

use serde::Serialize;

use crate::fix_token::{self, FixTokenError};
use crate::position::Range;
use crate::replacement::Replacement;

/// Source tag attached to every diagnostic produced by the pipeline.
pub const DIAGNOSTIC_SOURCE: &str = "clang-tidy";

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    /// Classify an analyzer severity word or rule identifier.
    ///
    /// Anything ending in "error" (`error`, `fatal error`,
    /// `clang-diagnostic-error`) is an error; everything else is a warning.
    #[must_use]
    pub fn classify(word: &str) -> Self {
        if word.trim_end().ends_with("error") {
            Self::Error
        } else {
            Self::Warning
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single diagnostic attributed to one file.
///
/// Fields are private; the pipeline constructs diagnostics and consumers
/// read them through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    range: Range,
    severity: DiagnosticSeverity,
    message: String,
    source: &'static str,
    /// Encoded replacement list, see [`fix_token`].
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(range: Range, message: String, severity: DiagnosticSeverity) -> Self {
        Self {
            range,
            severity,
            message,
            source: DIAGNOSTIC_SOURCE,
            fix: None,
        }
    }

    /// Attach suggested replacements as an opaque fix token.
    ///
    /// An empty list attaches nothing.
    #[must_use]
    pub fn with_replacements(mut self, replacements: &[Replacement]) -> Self {
        self.fix = if replacements.is_empty() {
            None
        } else {
            Some(fix_token::encode(replacements))
        };
        self
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn source(&self) -> &str {
        self.source
    }

    /// The opaque fix token, if the analyzer suggested replacements.
    #[must_use]
    pub fn fix_token(&self) -> Option<&str> {
        self.fix.as_deref()
    }

    /// Decode the attached replacements. No token decodes to an empty list.
    pub fn replacements(&self) -> Result<Vec<Replacement>, FixTokenError> {
        match &self.fix {
            Some(token) => fix_token::decode(token),
            None => Ok(Vec::new()),
        }
    }

    /// Format as `path:line:col: severity: [source] message` (1-indexed for display).
    #[must_use]
    pub fn display_with_path(&self, path: &Path) -> String {
        format!(
            "{}:{}:{}: {}: [{}] {}",
            path.display(),
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity.label(),
            self.source,
            self.message,
        )
    }
}
