//! Diagnostic domain types for tidyscan.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The pipeline in `tidyscan-core` produces these; editor integrations consume them.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod diagnostic;
pub mod fix_token;
mod position;
mod replacement;

pub use diagnostic::{DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticSeverity};
pub use fix_token::FixTokenError;
pub use position::{Position, Range};
pub use replacement::{Replacement, TextEdit, edits_by_file};
