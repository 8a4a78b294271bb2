//! Integration test suite

#[cfg(unix)]
mod cli;
#[cfg(unix)]
mod pipeline;
