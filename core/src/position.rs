//! Byte offset to line/character conversion.
//!
//! The analyzer reports offsets in encoded bytes of the file. Editors address
//! text by line and code point. [`LineIndex`] records where each line starts
//! (in bytes) and decodes only the bytes between a line start and the
//! requested offset, so multi-byte characters count once.

use tidyscan_types::Position;

/// Line start offsets of one file's raw bytes.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line begins. Always starts with 0.
    line_starts: Vec<usize>,
    /// Byte offset where each line's content ends (before its terminator).
    line_ends: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(content: &[u8]) -> Self {
        let mut line_starts = vec![0];
        let mut line_ends = Vec::new();
        let mut i = 0;
        while i < content.len() {
            match content[i] {
                b'\r' => {
                    line_ends.push(i);
                    if content.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                b'\n' => {
                    line_ends.push(i);
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        line_ends.push(content.len());
        Self {
            line_starts,
            line_ends,
        }
    }

    #[cfg(test)]
    pub(crate) fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based position of `byte_offset` within `content`.
    ///
    /// `content` must be the bytes this index was built from. Offsets past
    /// the end clamp to the end; offsets inside a line terminator clamp to the
    /// end of that line's content. An offset that splits a multi-byte
    /// sequence counts the partial sequence as one character.
    #[must_use]
    pub fn position_at(&self, content: &[u8], byte_offset: usize) -> Position {
        let offset = byte_offset.min(content.len());
        // line_starts[0] == 0 <= offset, so the partition point is >= 1.
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let offset = offset.min(self.line_ends[line]);
        let character = String::from_utf8_lossy(&content[start..offset]).chars().count();
        Position::new(line as u32, character as u32)
    }
}
