//! Parsers for the two formats mixed in the analyzer's output.

mod compiler;
mod fixes;

pub(crate) use compiler::{CompilerMessage, compiler_errors};
pub(crate) use fixes::{Finding, RawReplacement, findings};
