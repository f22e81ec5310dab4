//! Errors produced while tokenizing or rendering a format string.

/// A user-facing format error.
///
/// Every variant aborts the render that produced it; no partial output is
/// ever returned alongside an error. Missing context keys and helper type
/// mismatches are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The format string violates the template grammar.
    #[error("[format error] {message} (position {position})")]
    Syntax {
        /// Byte offset of the offending input in the format string.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// A `{{fn(name)}}` directive names a helper that is not registered.
    #[error("[format error] unknown template function: {0}")]
    UnknownFunction(String),

    /// The format string exceeds the configured maximum length.
    #[error("[format error] the maximum format string length is {max} (got {length})")]
    TooLong {
        /// Length of the rejected format string in bytes.
        length: usize,
        /// Configured limit in bytes.
        max: usize,
    },
}

impl FormatError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Byte offset of a syntax error, if this is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}
