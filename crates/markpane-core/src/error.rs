//! Error types for editor operations.
//!
//! None of these are fatal: event entry points log them and carry on.

use thiserror::Error;

/// Errors that can occur while handling host messages, rendering or configuring.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// A host message or config blob was not valid JSON for its type.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A host message had a shape we do not understand.
    #[error("unexpected host message `{action}`: {reason}")]
    UnexpectedMessage { action: String, reason: String },

    /// Syntax highlighting failed for a code block.
    #[error("highlight error: {0}")]
    Highlight(String),

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<syntect::Error> for EditorError {
    fn from(e: syntect::Error) -> Self {
        EditorError::Highlight(e.to_string())
    }
}
