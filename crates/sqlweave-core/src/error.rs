//! The crate-level error.

use crate::lexer::Location;
use crate::parser::ParseError;
use crate::resolve::ResolveError;

/// Any error [`crate::analyze`] or [`crate::transpile`] can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input did not parse.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The input parsed but its names did not resolve.
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

impl Error {
    /// Returns where in the input the error was found.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Parse(err) => err.location,
            Self::Resolve(err) => err.location(),
        }
    }
}

/// Result type for whole-pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
