//! Error types for legacy property-list parsing.

use thiserror::Error;

/// Errors that can occur while parsing the legacy plist syntax.
///
/// Positions are 1-based and count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlistError {
    /// Input ended in the middle of a value.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// A character that cannot start or continue the current construct.
    #[error("unexpected character '{found}' at {line}:{column}, expected {expected}")]
    UnexpectedCharacter {
        line: usize,
        column: usize,
        found: char,
        expected: &'static str,
    },

    /// A quoted string without its closing quote.
    #[error("unterminated string starting on line {line}")]
    UnterminatedString { line: usize },

    /// A `/*` comment without its closing `*/`.
    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },

    /// Backslash escape the dialect does not define.
    #[error("invalid escape sequence '\\{sequence}' on line {line}")]
    InvalidEscape { line: usize, sequence: String },

    /// Non-trivia content after the top-level value.
    #[error("unexpected content after the top-level value at {line}:{column}")]
    TrailingContent { line: usize, column: usize },
}

/// Result type alias for plist parsing.
pub type Result<T> = std::result::Result<T, PlistError>;
