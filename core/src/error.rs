use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure to run the analyzer to completion.
///
/// Parsing problems are never errors: unparsable output yields fewer
/// diagnostics, not an `InvokeError`.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("analyzer executable '{executable}' not found: {source}")]
    NotFound {
        executable: String,
        source: which::Error,
    },
    #[error("failed to spawn '{executable}': {source}")]
    Spawn {
        executable: String,
        source: io::Error,
    },
    #[error("failed to read analyzer output: {source}")]
    Read { source: io::Error },
    #[error("'{executable}' did not finish within {}s", after.as_secs())]
    TimedOut { executable: String, after: Duration },
}
