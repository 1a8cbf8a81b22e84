use thiserror::Error;

/// Main error type for invfile operations
#[derive(Error, Debug)]
pub enum InvFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{field} value {value} does not fit in {width} byte(s)")]
    Overflow {
        field: &'static str,
        value: u128,
        width: usize,
    },

    #[error("Term is {len} bytes long, the key length prefix holds at most 255")]
    KeyTooLong { len: usize },

    #[error("Term is not valid UTF-8: {0}")]
    InvalidKey(#[from] std::str::Utf8Error),

    #[error("Truncated frame starting at byte offset {offset}")]
    TruncatedFrame { offset: u64 },

    #[error("Posting payload of {len} bytes is not a multiple of the {entry_size}-byte entry size")]
    MalformedPayload { len: usize, entry_size: usize },

    #[error("Term {term:?} written after {previous:?}, segment terms must be strictly ascending")]
    OutOfOrder { previous: String, term: String },

    #[error("Invalid frame layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Term dictionary error: {0}")]
    TermDictionary(#[from] fst::Error),
}

/// Result type alias for invfile operations
pub type Result<T> = std::result::Result<T, InvFileError>;

impl InvFileError {
    /// Check if this error means the segment bytes themselves are damaged
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            InvFileError::TruncatedFrame { .. }
                | InvFileError::MalformedPayload { .. }
                | InvFileError::InvalidKey(_)
        )
    }
}
