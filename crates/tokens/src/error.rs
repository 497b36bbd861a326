//! Token stream error type.

use thiserror::Error;

/// Lexical or structural failure while reading a JSON token stream.
///
/// Positions are byte offsets into the input slice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character at byte {0}")]
    UnexpectedCharacter(usize),
    #[error("invalid literal at byte {0}")]
    InvalidLiteral(usize),
    #[error("invalid number at byte {0}")]
    InvalidNumber(usize),
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("unbalanced end token at byte {0}")]
    UnbalancedEnd(usize),
    #[error("trailing data at byte {0}")]
    TrailingData(usize),
}
