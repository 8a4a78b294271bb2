//! Documents and the per-run document cache.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tidyscan_config::normalize_path;
use tidyscan_types::Position;

use crate::position::LineIndex;

/// The raw content of one file plus its line index.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    language_id: String,
    version: i32,
    content: Vec<u8>,
    index: LineIndex,
}

impl Document {
    /// Build a document. `path` is normalized lexically.
    #[must_use]
    pub fn new(
        path: impl AsRef<Path>,
        language_id: impl Into<String>,
        version: i32,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        let content = content.into();
        let index = LineIndex::new(&content);
        Self {
            path: normalize_path(path.as_ref()),
            language_id: language_id.into(),
            version,
            content,
            index,
        }
    }

    /// Read a document from disk with version 0.
    pub fn read(path: &Path, language_id: impl Into<String>) -> io::Result<Self> {
        let content = fs::read(path)?;
        Ok(Self::new(path, language_id, 0, content))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Zero-based position of a byte offset in this document.
    #[must_use]
    pub fn position_at(&self, byte_offset: usize) -> Position {
        self.index.position_at(&self.content, byte_offset)
    }
}

/// Documents referenced during one pipeline run, keyed by normalized path.
///
/// Each distinct path is loaded at most once; failed loads are remembered so
/// they are not retried within the run.
pub(crate) struct DocumentCache {
    primary: Arc<Document>,
    entries: HashMap<PathBuf, Option<Arc<Document>>>,
}

impl DocumentCache {
    pub fn new(primary: Arc<Document>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(primary.path().to_path_buf(), Some(Arc::clone(&primary)));
        Self { primary, entries }
    }

    pub fn primary(&self) -> &Arc<Document> {
        &self.primary
    }

    /// The cached document for `path`, loading it from disk on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Option<Arc<Document>> {
        let key = normalize_path(path);
        if let Some(entry) = self.entries.get(&key) {
            return entry.clone();
        }
        let loaded = match Document::read(&key, self.primary.language_id()) {
            Ok(doc) => {
                tracing::debug!(path = %key.display(), "Loaded auxiliary document");
                Some(Arc::new(doc))
            }
            Err(e) => {
                tracing::debug!(path = %key.display(), "Cannot load referenced file: {e}");
                None
            }
        };
        self.entries.insert(key, loaded.clone());
        loaded
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
