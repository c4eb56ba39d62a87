//! Error types for the parsing and rendering layers.
//!
//! [`BackendError`] is built with [`thiserror`] and converts into the core
//! [`AnotexError`] at the crate boundary.

use anotex_core::AnotexError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// PDF structure or syntax could not be parsed.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed content stream.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] AnotexError),
}

impl From<BackendError> for AnotexError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => AnotexError::ParseError(msg),
            BackendError::Io(e) => AnotexError::Io(e.to_string()),
            BackendError::Interpreter(msg) => {
                AnotexError::ParseError(format!("content stream: {msg}"))
            }
            BackendError::Core(e) => e,
        }
    }
}
