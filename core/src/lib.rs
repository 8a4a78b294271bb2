//! The tidyscan diagnostic pipeline.
//!
//! An [`Analyzer`] runs clang-tidy against one document, captures its output
//! and turns the two formats mixed in it (compiler-style error lines and the
//! exported-fixes YAML block) into a [`DiagnosticMap`] keyed by absolute file
//! path. Offsets are converted to line/character positions against the file
//! they refer to, which may be a header rather than the analyzed document.

mod analyzer;
mod collate;
mod document;
mod error;
mod fallback;
mod invocation;
mod parse;
mod paths;
mod position;
mod process;

pub use analyzer::{AnalysisEvent, AnalysisReport, Analyzer};
pub use collate::DiagnosticMap;
pub use document::Document;
pub use error::InvokeError;
pub use fallback::{FallbackPolicy, FileAssociations};
pub use invocation::Invocation;
pub use position::LineIndex;
