//! Opaque fix token attached to diagnostics.
//!
//! The token is a JSON array of replacement records:
//!
//! ```text
//! [{"FilePath": "/abs/a.cpp", "Offset": 12, "Length": 4,
//!   "ReplacementText": "nullptr", "Range": {"start": {..}, "end": {..}}}]
//! ```
//!
//! `Range` is omitted when it could not be computed. Consumers decode the
//! token back into [`Replacement`]s to build an edit.

use thiserror::Error;

use crate::replacement::Replacement;

#[derive(Debug, Error)]
#[error("malformed fix token: {0}")]
pub struct FixTokenError(#[from] serde_json::Error);

/// Encode replacements into a token.
#[must_use]
pub fn encode(replacements: &[Replacement]) -> String {
    // Serializing plain structs with string keys into a String cannot fail.
    serde_json::to_string(replacements).unwrap_or_else(|_| String::from("[]"))
}

/// Decode a token produced by [`encode`].
pub fn decode(token: &str) -> Result<Vec<Replacement>, FixTokenError> {
    Ok(serde_json::from_str(token)?)
}
