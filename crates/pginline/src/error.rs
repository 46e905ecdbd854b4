//! Error types for pginline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for pginline operations.
pub type InlineResult<T> = Result<T, InlineError>;

/// A syntax error reported by the grammar while validating a template.
///
/// `line` and `column` are 1-based; `column` counts chars, not bytes. `text` is the
/// offending token in the caller's original casing, empty at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Syntax error at {line}:{column}: '{text}' ({message})")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub message: String,
}

/// A placeholder whose index cannot be resolved against the supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterIndexError {
    /// The placeholder marker was not followed by any digits.
    #[error("Missing parameter index")]
    Missing,
    /// The digits after the marker do not form a usable integer.
    #[error("Invalid parameter index: {text}")]
    Invalid { text: String },
    /// The index is below 1 or above the number of supplied values.
    #[error("Parameter index {index} out of range ({count})")]
    OutOfRange { index: i64, count: usize },
}

/// Error type for pginline operations.
#[derive(Debug, Error)]
pub enum InlineError {
    /// The template is not a single syntactically valid statement.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// A placeholder index is missing, malformed, or out of range.
    #[error(transparent)]
    ParameterIndex(#[from] ParameterIndexError),
    /// A parameter value has no literal rendering rule.
    #[error("Unsupported data type: {type_name}")]
    UnsupportedType { type_name: String },
    /// A rendering rule failed for a supported value.
    #[error("Format error: {0}")]
    Format(String),
    /// The template exceeds the configured size limit.
    #[error("SQL template is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },
}

impl InlineError {
    /// Create an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Check if this is a syntax error
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Check if this is a parameter index error
    pub fn is_parameter_index_error(&self) -> bool {
        matches!(self, Self::ParameterIndex(_))
    }

    /// Check if this is an unsupported type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }

    /// The syntax error, if this is one.
    pub fn as_syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }
}
