//! Error types for the tagweave library.

use std::io;
use thiserror::Error;

/// Result type alias for tagweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during tag processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading configuration or writing output.
    ///
    /// Structural I/O failures are never recovered: they abort the run
    /// and surface to the top-level caller.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tag content or invalid build input (e.g. a non-numeric
    /// work-item identifier, or an empty table grid). Signals a caller or
    /// content error, not a system fault.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A data-source or converter collaborator call failed. Caught per
    /// tag-match by the dispatcher and rendered as an inline error marker.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Malformed table markup passed to the materializer.
    #[error("Table markup error at byte {position}: {message}")]
    MarkupParse {
        /// What went wrong.
        message: String,
        /// Approximate byte position reported by the tokenizer.
        position: u64,
    },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a markup parse error from a tokenizer failure.
    pub(crate) fn markup(message: impl Into<String>, position: u64) -> Self {
        Error::MarkupParse {
            message: message.into(),
            position,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MarkupParse {
            message: err.to_string(),
            position: 0,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidArgument("work item id must be numeric".into());
        assert_eq!(
            err.to_string(),
            "Invalid argument: work item id must be numeric"
        );

        let err = Error::markup("unterminated row", 42);
        assert_eq!(
            err.to_string(),
            "Table markup error at byte 42: unterminated row"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
