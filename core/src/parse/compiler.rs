//! Compiler-style diagnostic lines.
//!
//! ```text
//! src/a.cpp:12:5: error: use of undeclared identifier 'y'
//!     y = 2;
//!     ^
//! ```
//!
//! A header line is only recognized when the two snippet lines follow it.

use tidyscan_types::{DiagnosticSeverity, Position};

/// One compiler-style header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompilerMessage {
    pub path: String,
    /// Zero-based.
    pub position: Position,
    pub severity: String,
    pub message: String,
}

/// Every compiler-style message in `text` whose severity ends in `error`.
pub(crate) fn compiler_errors(text: &str) -> Vec<CompilerMessage> {
    let mut messages = scan(text);
    messages.retain(|m| DiagnosticSeverity::classify(&m.severity).is_error());
    messages
}

/// Every compiler-style message in `text`, in order.
pub(crate) fn scan(text: &str) -> Vec<CompilerMessage> {
    let lines: Vec<&str> = text.lines().collect();
    let mut found = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        // Header plus the two snippet lines.
        if i + 2 < lines.len()
            && let Some(message) = parse_header(lines[i])
        {
            found.push(message);
            i += 3;
        } else {
            i += 1;
        }
    }
    found
}

/// Parse `<path>:<line>:<column>: <severity>:<message>`.
///
/// The path may itself contain `:`; the first `:<digits>:<digits>: ` after a
/// non-empty prefix ends it.
fn parse_header(line: &str) -> Option<CompilerMessage> {
    let mut search = line.chars().next()?.len_utf8();
    while let Some(rel) = line.get(search..)?.find(':') {
        let colon = search + rel;
        if let Some((row, col, rest)) = line_and_column(&line[colon + 1..]) {
            let (severity, message) = rest.split_once(':')?;
            let severity = severity.trim();
            if severity.is_empty() {
                return None;
            }
            return Some(CompilerMessage {
                path: line[..colon].to_string(),
                position: Position::from_one_based(row, col),
                severity: severity.to_string(),
                message: message.trim().to_string(),
            });
        }
        search = colon + 1;
    }
    None
}

/// Split `<digits>:<digits>: <rest>` into its parts.
fn line_and_column(s: &str) -> Option<(u32, u32, &str)> {
    let (row, rest) = leading_number(s)?;
    let rest = rest.strip_prefix(':')?;
    let (col, rest) = leading_number(rest)?;
    let rest = rest.strip_prefix(": ")?;
    Some((row, col, rest))
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}
