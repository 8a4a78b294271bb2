//! The exported-fixes YAML block.
//!
//! With `--export-fixes=-` the analyzer prints one YAML document between a
//! `---` line and a `...` line, mixed in with its normal output. Two layouts
//! exist: older releases put `Message`, `FileOffset`, `FilePath` and
//! `Replacements` directly on each finding, newer ones nest them under
//! `DiagnosticMessage`. Both decode to [`Finding`].

use serde::Deserialize;

const BLOCK_START: &str = "---";
const BLOCK_END: &str = "...";

/// One analyzer finding, layout-independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Finding {
    pub rule: String,
    pub message: String,
    pub file_offset: usize,
    pub file_path: String,
    pub replacements: Vec<RawReplacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawReplacement {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub replacement_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportedFixes {
    #[serde(default)]
    diagnostics: Option<Vec<RawFinding>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFinding {
    #[serde(default)]
    diagnostic_name: String,
    diagnostic_message: Option<RawMessage>,
    #[serde(flatten)]
    flat: RawMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMessage {
    #[serde(default)]
    message: String,
    #[serde(default)]
    file_offset: usize,
    #[serde(default)]
    file_path: String,
    #[serde(default)]
    replacements: Option<Vec<RawReplacement>>,
}

impl From<RawFinding> for Finding {
    fn from(raw: RawFinding) -> Self {
        let body = raw.diagnostic_message.unwrap_or(raw.flat);
        Self {
            rule: raw.diagnostic_name,
            message: body.message,
            file_offset: body.file_offset,
            file_path: body.file_path,
            replacements: body.replacements.unwrap_or_default(),
        }
    }
}

/// Text between the first `---` line and the next `...` line.
pub(crate) fn locate_block(text: &str) -> Option<&str> {
    let mut start = None;
    let mut cursor = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end();
        match start {
            None if content == BLOCK_START => start = Some(cursor + line.len()),
            Some(begin) if content == BLOCK_END => return Some(&text[begin..cursor]),
            _ => {}
        }
        cursor += line.len();
    }
    None
}

/// All findings in the exported-fixes block of `text`.
///
/// A missing or undecodable block yields no findings.
pub(crate) fn findings(text: &str) -> Vec<Finding> {
    let Some(block) = locate_block(text) else {
        tracing::debug!("No exported-fixes block in analyzer output");
        return Vec::new();
    };
    match serde_yml::from_str::<ExportedFixes>(block) {
        Ok(fixes) => fixes
            .diagnostics
            .unwrap_or_default()
            .into_iter()
            .map(Finding::from)
            .collect(),
        Err(e) => {
            tracing::debug!("Cannot decode exported-fixes block: {e}");
            Vec::new()
        }
    }
}
