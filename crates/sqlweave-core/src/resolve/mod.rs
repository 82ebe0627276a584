//! Symbol resolution.
//!
//! The resolver walks a parsed batch keeping a chain of scopes, one per
//! statement list, SELECT, INSERT, UPDATE, DELETE, MERGE and WITH. When a
//! scope closes its [`SymbolTable`] is attached to the node that owns it;
//! every reference that resolves records a [`Binding`].

mod error;
mod resolver;
mod symbol;

use serde::Deserialize;

pub use error::{MisuseKind, ResolveError};
pub use resolver::Resolver;
pub use symbol::{
    Binding, ScopeKind, SymbolInfo, SymbolKind, SymbolOrigin, SymbolTable, TranslationRule, Usage,
};

/// Resolver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Require bare column, operand and function names to resolve.
    /// Variables must always resolve.
    pub strict: bool,
}

impl ResolverOptions {
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Symbols the host makes visible to a whole batch, such as the columns
/// and tables of a known schema or the parameters of a procedure body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub scalars: Vec<String>,
    pub tables: Vec<String>,
    /// Variables, spelled in either convention.
    pub variables: Vec<String>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scalar such as a column name.
    #[must_use]
    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.scalars.push(name.into());
        self
    }

    /// Adds a table name.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.tables.push(name.into());
        self
    }

    /// Adds a variable, reachable under both spellings.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }
}
