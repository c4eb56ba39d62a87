//! Error type and extraction options for anotex.
//!
//! [`AnotexError`] covers the fatal conditions at the document-open and
//! format-detection boundary. Below that boundary nothing fails; problems are
//! logged and the affected annotation contributes no text.

use std::fmt;
use std::path::PathBuf;

use crate::unicode_norm::UnicodeNorm;

/// Fatal errors raised while locating, detecting, or opening a document.
#[derive(Debug, Clone, PartialEq)]
pub enum AnotexError {
    /// The input path does not resolve to a file.
    NotFound(PathBuf),
    /// No importer or exporter is registered for the requested format.
    UnsupportedFormat(String),
    /// The document could not be interpreted as its claimed format.
    ParseError(String),
    /// The document is encrypted and no password was supplied.
    PasswordRequired,
    /// The supplied password does not open the document.
    InvalidPassword,
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: usize,
        actual_value: usize,
    },
    /// I/O failure reading input or writing output.
    Io(String),
}

impl fmt::Display for AnotexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnotexError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            AnotexError::UnsupportedFormat(what) => write!(f, "unsupported format: {what}"),
            AnotexError::ParseError(msg) => write!(f, "parse error: {msg}"),
            AnotexError::PasswordRequired => {
                write!(f, "document is encrypted and requires a password")
            }
            AnotexError::InvalidPassword => write!(f, "the supplied password is incorrect"),
            AnotexError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            AnotexError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for AnotexError {}

impl From<std::io::Error> for AnotexError {
    fn from(err: std::io::Error) -> Self {
        AnotexError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnotexError>;

/// Options controlling how documents are opened and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum nesting depth for form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Maximum input size in bytes (default: no limit).
    pub max_input_bytes: Option<usize>,
    /// Unicode normalization applied to rendered glyph text (default: none).
    pub unicode_norm: UnicodeNorm,
    /// Password for encrypted documents.
    pub password: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_input_bytes: None,
            unicode_norm: UnicodeNorm::None,
            password: None,
        }
    }
}

impl ExtractOptions {
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    pub fn with_unicode_norm(mut self, norm: UnicodeNorm) -> Self {
        self.unicode_norm = norm;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Fail with [`AnotexError::ResourceLimitExceeded`] if `len` is over
    /// the input size limit.
    pub fn check_input_size(&self, len: usize) -> Result<()> {
        match self.max_input_bytes {
            Some(limit) if len > limit => Err(AnotexError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: limit,
                actual_value: len,
            }),
            _ => Ok(()),
        }
    }
}
