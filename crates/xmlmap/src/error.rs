//! Error types for xmlmap

use std::fmt;
use thiserror::Error;

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed XML reported by the reader
    Syntax,
    /// Element or attribute name the serializer cannot represent
    InvalidName { name: String },
    /// Value tree that does not follow the reserved key conventions
    Shape,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    /// Failure while emitting the serialized document
    Serialize,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "malformed xml"),
            Self::InvalidName { name } => write!(f, "invalid xml name: {name:?}"),
            Self::Shape => write!(f, "unsupported value shape"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::Serialize => write!(f, "serialization failed"),
        }
    }
}

/// Main error type for xmlmap
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    offset: Option<usize>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            offset: None,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset: None,
            message: message.into(),
        }
    }

    /// Create a syntax error at a byte offset of the input
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            offset: Some(offset),
            message: message.into(),
        }
    }

    pub fn invalid_name(name: &str) -> Self {
        Self::new(ErrorKind::InvalidName {
            name: name.to_string(),
        })
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Shape, message)
    }

    pub fn serialize(cause: impl fmt::Display) -> Self {
        Self::with_message(ErrorKind::Serialize, cause.to_string())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input, when the error came from the reader
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "error at byte {offset}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Result type alias for xmlmap
pub type Result<T> = std::result::Result<T, Error>;
