use thiserror::Error;

/// Convenience alias for `Result<T, QuillError>`.
pub type QuillResult<T> = Result<T, QuillError>;

/// Errors raised while rendering a result or applying render options.
#[derive(Error, Debug)]
pub enum QuillError {
    /// The underlying cursor failed mid-stream. Fatal to the current render
    /// pass; lines already written stay on screen.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown table style \"{name}\"; known styles: {known}")]
    UnknownTableStyle { name: String, known: String },

    #[error("Unknown output format \"{name}\"; known formats: {known}")]
    UnknownFormat { name: String, known: String },

    #[error("Invalid value \"{value}\" for option {option}: {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// `next_row` was called on an exhausted source.
    #[error("No more rows")]
    Exhausted,
}

impl QuillError {
    pub fn fetch(e: impl std::fmt::Display) -> Self {
        QuillError::Fetch(e.to_string())
    }

    pub fn invalid_option(option: &str, value: &str, reason: impl Into<String>) -> Self {
        QuillError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single metadata lookup. Never fatal: the affected candidate
/// group is simply left out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata lookup not supported: {0}")]
    Unsupported(&'static str),

    #[error("metadata query failed: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let e = QuillError::fetch("connection reset");
        assert_eq!(e.to_string(), "Fetch error: connection reset");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let e: QuillError = io.into();
        assert!(matches!(e, QuillError::Io(_)));
    }

    #[test]
    fn test_invalid_option_display() {
        let e = QuillError::invalid_option("header_interval", "abc", "expected a number");
        assert_eq!(
            e.to_string(),
            "Invalid value \"abc\" for option header_interval: expected a number"
        );
    }
}
