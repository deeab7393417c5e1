use thiserror::Error;

/// Result type alias for detokenizer operations
pub type Result<T> = std::result::Result<T, DetokError>;

/// Errors that can occur while detokenizing a C64 BASIC file
#[derive(Debug, Error)]
pub enum DetokError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unrecognized command byte was encountered under the `raise` error policy
    #[error("unrecognized command byte 0x{byte:02X} on line {lineno}")]
    UnrecognizedCommand {
        /// The offending byte
        byte: u8,
        /// The BASIC line number it occurred on
        lineno: u16,
    },

    /// Attempted to concatenate tokens from different source lines
    #[error("cannot concatenate tokens from line {lineno_a} and line {lineno_b}")]
    MismatchedLine {
        /// Line number of the first token
        lineno_a: u16,
        /// Line number of the second token
        lineno_b: u16,
    },

    /// Attempted to concatenate tokens tagged with different languages
    #[error("cannot concatenate tokens of different languages on line {lineno}")]
    MismatchedLanguage {
        /// Line number the tokens are on
        lineno: u16,
    },

    /// The tagset JSON failed to parse
    #[error("failed to parse tagset: {0}")]
    TagsetParse(#[from] serde_json::Error),

    /// The tagset path could not be read
    #[error("invalid tagset file: {0}")]
    InvalidTagsetPath(String),
}

impl DetokError {
    /// Create an invalid-tagset-path error with context
    pub fn invalid_tagset_path<S: Into<String>>(message: S) -> Self {
        DetokError::InvalidTagsetPath(message.into())
    }
}
