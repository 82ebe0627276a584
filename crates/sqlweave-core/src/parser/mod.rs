//! SQL Parser
//!
//! A hand-written recursive descent parser. Expressions are parsed with a
//! precedence ladder: one function per precedence level, each folding
//! left-associatively over the next tighter level.

mod error;
mod expression;
#[allow(clippy::module_inception)]
mod parser;
mod statement;

use serde::Deserialize;

pub use error::ParseError;
pub use parser::{parse_with, Parser};

/// Parser configuration.
///
/// Deserializable so hosts can load it alongside their own settings; any
/// field left out keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Deepest nesting of statements, sub-queries and parenthesized
    /// expressions accepted before parsing fails.
    pub max_depth: usize,
}

impl ParserOptions {
    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}
