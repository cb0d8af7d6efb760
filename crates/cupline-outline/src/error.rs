//! Error types for outline reading and writing.

use thiserror::Error;

/// Errors raised by the outline codecs and polyline tools.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed outline text.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// A polyline too short or too flat for the requested construction.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl OutlineError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for outline operations.
pub type Result<T> = std::result::Result<T, OutlineError>;
