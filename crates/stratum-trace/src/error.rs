//! Error types for log analysis

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TraceError>;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("running dot failed: {0}")]
    Dot(String),
}

/// Why one log line was skipped. Parse failures never abort a batch; the
/// reader collects them alongside the entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("unexpected end of line")]
    UnexpectedEol,

    #[error("invalid count: {0}")]
    InvalidCount(String),
}
