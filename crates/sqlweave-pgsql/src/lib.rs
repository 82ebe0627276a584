//! # sqlweave-pgsql
//!
//! PostgreSQL extensions for `sqlweave-core`.
//!
//! # How PostgreSQL differs from the standard dialect
//!
//! - **Variables** are bare names. Inside [PL/pgSQL] they are declared with
//!   `DECLARE x INT := 0` and assigned with `x := x + 1`.
//! - **[LIMIT]** and `OFFSET` limit rows.
//! - **[Casts]** may be written `expr::type`.
//! - **IF** takes statement lists: `IF c THEN ... ELSE ... END IF`.
//! - **[CALL]** runs procedures: `CALL proc(1, b => 2)`.
//! - Recursive CTEs are introduced by `WITH RECURSIVE`.
//! - `||` concatenates strings.
//!
//! [PL/pgSQL]: https://www.postgresql.org/docs/current/plpgsql-declarations.html
//! [LIMIT]: https://www.postgresql.org/docs/current/queries-limit.html
//! [Casts]: https://www.postgresql.org/docs/current/sql-expressions.html#SQL-SYNTAX-TYPE-CASTS
//! [CALL]: https://www.postgresql.org/docs/current/sql-call.html
//!
//! ## Example
//!
//! ```rust
//! use sqlweave_pgsql::{parse, render};
//!
//! let ast = parse("select id::text from users limit 5").unwrap();
//! assert_eq!(render(&ast), "SELECT id::text FROM users LIMIT 5;");
//! ```

mod dialect;

pub use dialect::PostgresDialect;

use sqlweave_core::ast::StatementList;
use sqlweave_core::parser::{parse_with, ParseError};

/// Parses PostgreSQL text.
pub fn parse(sql: &str) -> Result<StatementList, ParseError> {
    parse_with(sql, &PostgresDialect)
}

/// Renders a tree as PostgreSQL text.
#[must_use]
pub fn render(list: &StatementList) -> String {
    sqlweave_core::render::render(list, &PostgresDialect)
}
