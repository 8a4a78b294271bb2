//! Suggested text substitutions and the edits derived from them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::position::Range;

/// A suggested substitution of `length` bytes at `offset` in `file_path`.
///
/// `range` is only present when the target file's content could be resolved
/// at the time the replacement was computed; it is always expressed in the
/// coordinates of `file_path` itself.
///
/// Field names follow the analyzer's export format so that fix tokens stay
/// readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Replacement {
    pub file_path: PathBuf,
    pub offset: usize,
    pub length: usize,
    pub replacement_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Replacement {
    #[must_use]
    pub fn new(file_path: PathBuf, offset: usize, length: usize, replacement_text: String) -> Self {
        Self {
            file_path,
            offset,
            length,
            replacement_text,
            range: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Byte offset one past the replaced span.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// The edit this replacement stands for, when its range is known.
    #[must_use]
    pub fn to_text_edit(&self) -> Option<TextEdit> {
        self.range.map(|range| TextEdit {
            range,
            new_text: self.replacement_text.clone(),
        })
    }
}

/// A range-addressed text edit, ready for an editor to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// Group replacements into per-file edits.
///
/// Each edit is keyed by its replacement's own file. Replacements without a
/// computed range cannot be applied and are skipped.
#[must_use]
pub fn edits_by_file(replacements: &[Replacement]) -> BTreeMap<PathBuf, Vec<TextEdit>> {
    let mut edits: BTreeMap<PathBuf, Vec<TextEdit>> = BTreeMap::new();
    for replacement in replacements {
        if let Some(edit) = replacement.to_text_edit() {
            edits
                .entry(replacement.file_path.clone())
                .or_default()
                .push(edit);
        }
    }
    edits
}
