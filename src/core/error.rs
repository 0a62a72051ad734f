//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The closed event buffer is not valid JSON
    #[error("invalid JSON at offset {offset}: {message}")]
    Validation { offset: usize, message: String },

    /// A child node does not start with an opening brace or bracket
    #[error("corrupted event buffer: node at offset {offset} is not a container")]
    CorruptBuffer { offset: usize },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Label or namespace pattern failed to compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a validation error from a serde_json parse failure over `buf`
    pub fn validation(buf: &[u8], err: &serde_json::Error) -> Self {
        LoggerError::Validation {
            offset: byte_offset(buf, err.line(), err.column()),
            message: err.to_string(),
        }
    }

    /// Create a corrupted buffer error
    pub fn corrupt_buffer(offset: usize) -> Self {
        LoggerError::CorruptBuffer { offset }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Offset into the event buffer, for validation and corruption errors
    pub fn offset(&self) -> Option<usize> {
        match self {
            LoggerError::Validation { offset, .. } | LoggerError::CorruptBuffer { offset } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}

// serde_json reports 1-based line and column positions.
fn byte_offset(buf: &[u8], line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line {
        match buf[line_start..].iter().position(|&b| b == b'\n') {
            Some(pos) => line_start += pos + 1,
            None => return buf.len(),
        }
    }
    (line_start + column.saturating_sub(1)).min(buf.len())
}
