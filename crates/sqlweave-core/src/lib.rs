//! # sqlweave-core
//!
//! A dialect-aware SQL front end: lexer, recursive-descent parser, symbol
//! resolver and renderer sharing one AST across dialects.
//!
//! This crate provides:
//! - A lazy lexer with a longest-match operator trie per dialect
//! - A token stream with unbounded put-back and mark/reset snapshots
//! - An immutable AST whose rewrites share untouched subtrees
//! - A [`dialect::Dialect`] trait specializing the shared grammar and
//!   renderer, with [`dialect::StandardDialect`] as the strict baseline
//! - A scope-chain [`resolve::Resolver`] that binds names and records how
//!   variables translate between `@name` and bare `name` conventions
//!
//! Dialects beyond the standard one live in their own crates.
//!
//! ## Parsing and rendering
//!
//! ```rust
//! use sqlweave_core::dialect::StandardDialect;
//! use sqlweave_core::{parse_with, render};
//!
//! let ast = parse_with("select * from MyTable where ColumnA = 1", &StandardDialect).unwrap();
//! assert_eq!(render(&ast, &StandardDialect), "SELECT * FROM MyTable WHERE ColumnA = 1;");
//! ```
//!
//! ## Resolving names
//!
//! ```rust
//! use sqlweave_core::dialect::StandardDialect;
//! use sqlweave_core::resolve::{Environment, ResolverOptions};
//! use sqlweave_core::{analyze, Error};
//!
//! let strict = ResolverOptions::default().with_strict(true);
//! let env = Environment::new().scalar("ColumnA").table("MyTable");
//!
//! assert!(analyze("SELECT ColumnA FROM MyTable", &StandardDialect, strict, &env).is_ok());
//! let err = analyze("SELECT Nope FROM MyTable", &StandardDialect, strict, &env).unwrap_err();
//! assert!(matches!(err, Error::Resolve(_)));
//! ```

pub mod ast;
pub mod dialect;
mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod transform;
pub mod visit;

use tracing::debug;

pub use ast::{Expr, Statement, StatementList};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use lexer::{Lexer, Location, Token, TokenKind};
pub use parser::{parse_with, ParseError, Parser, ParserOptions};
pub use render::render;
pub use resolve::{Environment, ResolveError, Resolver, ResolverOptions};
pub use transform::{fold_constants, translate_variables};

/// Parses `sql` with `dialect` and resolves it against `environment`.
///
/// The returned tree carries its symbol tables and bindings.
pub fn analyze(
    sql: &str,
    dialect: &dyn Dialect,
    options: ResolverOptions,
    environment: &Environment,
) -> Result<StatementList> {
    let ast = parse_with(sql, dialect)?;
    Resolver::new(dialect)
        .with_options(options)
        .with_environment(environment.clone())
        .resolve(&ast)?;
    Ok(ast)
}

/// Converts `sql` from one dialect to another.
///
/// The input is parsed and leniently resolved with `from`, variables are
/// respelled when the two dialects spell them differently, and the result
/// is rendered with `to`.
pub fn transpile(
    sql: &str,
    from: &dyn Dialect,
    to: &dyn Dialect,
    environment: &Environment,
) -> Result<String> {
    debug!(from = from.name(), to = to.name(), "transpile");
    let ast = analyze(sql, from, ResolverOptions::default(), environment)?;
    let ast = if from.variable_style() == to.variable_style() {
        ast
    } else {
        translate_variables(&ast, to.variable_style())
    };
    Ok(render(&ast, to))
}
