//! Parser error types.

use crate::lexer::{Location, Token};

/// A parse error.
///
/// Parsing stops at the first error; there is no recovery mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {location}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// Where the error was detected.
    pub location: Location,
    /// What the parser expected (if applicable).
    pub expected: Option<String>,
    /// What the parser found instead.
    pub found: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: Token) -> Self {
        let expected: String = expected.into();
        if found.is_end() {
            return Self::unexpected_eof(expected, found.location);
        }
        Self {
            message: format!("Unexpected token: expected {expected}, found {found}"),
            location: found.location,
            expected: Some(expected),
            found: Some(found.to_string()),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, location: Location) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("Unexpected end of input: expected {expected}"),
            location,
            expected: Some(expected),
            found: Some("end of input".to_string()),
        }
    }

    /// Creates an error for a character-level mismatch.
    #[must_use]
    pub fn unexpected_char(expected: char, found: char, location: Location) -> Self {
        Self {
            message: format!("Unexpected character: expected {expected:?}, found {found:?}"),
            location,
            expected: Some(expected.to_string()),
            found: Some(found.to_string()),
        }
    }
}
