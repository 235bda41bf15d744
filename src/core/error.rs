use std::io;
use thiserror::Error;

/// Crate-wide error type.
///
/// `Validation` carries the exact caller-facing message for construction
/// failures; the display form is the bare message so callers (and tests)
/// can match on it verbatim.
#[derive(Error, Debug)]
pub enum SvnError {
    #[error("{0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SvnError {
    pub fn validation(message: impl Into<String>) -> Self {
        SvnError::Validation(message.into())
    }
}
