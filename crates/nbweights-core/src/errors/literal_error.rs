//! Literal expression errors.
//!
//! Columns are 1-based character offsets into the stripped source line.

use super::error_code::{self, NbErrorCode};

/// Errors raised while parsing or evaluating a weight literal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected `{found}` at column {column}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        column: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("invalid number literal `{text}` at column {column}")]
    InvalidNumber { text: String, column: usize },

    #[error("number literal `{text}` at column {column} is out of range")]
    NumberOutOfRange { text: String, column: usize },

    #[error("name `{name}` is not defined (column {column})")]
    UnknownName { name: String, column: usize },

    #[error("call to `{callee}` is not allowed (column {column})")]
    UnsupportedCall { callee: String, column: usize },

    #[error("`{callee}` at column {column}: {message}")]
    BadArguments {
        callee: String,
        message: String,
        column: usize,
    },

    #[error("bad operand type for unary {op}: '{kind}' (column {column})")]
    BadOperand {
        op: char,
        kind: &'static str,
        column: usize,
    },

    #[error("unsupported dtype `{dtype}`")]
    UnsupportedDtype { dtype: String },

    #[error("array at column {column} has inhomogeneous shape")]
    RaggedArray { column: usize },

    #[error("'{kind}' value is not iterable")]
    NotIterable { kind: &'static str },

    #[error("expression nested deeper than {limit} levels at column {column}")]
    TooDeep { limit: usize, column: usize },

    #[error("unexpected trailing input at column {column}")]
    TrailingInput { column: usize },
}

impl NbErrorCode for LiteralError {
    fn error_code(&self) -> &'static str {
        error_code::LITERAL_ERROR
    }
}
