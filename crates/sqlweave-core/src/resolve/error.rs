//! Resolver errors.

use core::fmt;

use thiserror::Error;

use crate::lexer::Location;

/// How a symbol was used against its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MisuseKind {
    /// A scalar used as a table source.
    ScalarAsTable,
    /// A table variable used as a scalar operand.
    TableAsScalar,
    /// A variable called like a function.
    VariableInvoked,
}

impl fmt::Display for MisuseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ScalarAsTable => "Scalar used as a table",
            Self::TableAsScalar => "Table used as a scalar",
            Self::VariableInvoked => "Variable invoked as a function",
        })
    }
}

/// An error found while building symbol tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Undefined symbol '{name}' at {location}")]
    Undefined { name: String, location: Location },

    #[error("Duplicate symbol '{name}' at {location}, first defined at {previous}")]
    Duplicate {
        name: String,
        location: Location,
        previous: Location,
    },

    #[error("{misuse}: '{name}' at {location}")]
    Misuse {
        name: String,
        misuse: MisuseKind,
        location: Location,
    },
}

impl ResolveError {
    /// Returns where the offending reference or definition is.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Undefined { location, .. }
            | Self::Duplicate { location, .. }
            | Self::Misuse { location, .. } => *location,
        }
    }

    /// Returns the offending name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Undefined { name, .. }
            | Self::Duplicate { name, .. }
            | Self::Misuse { name, .. } => name,
        }
    }
}
