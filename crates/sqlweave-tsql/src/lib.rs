//! # sqlweave-tsql
//!
//! SQL Server extensions for `sqlweave-core`.
//!
//! # How SQL Server differs from the standard dialect
//!
//! - **[Variables]** are written `@name`; `@@name` are system variables
//!   that always resolve.
//! - **Identifier quoting** uses square brackets, `[My Table]`, with `]]`
//!   escaping a closing bracket. Double quotes also work.
//! - **[TOP]** limits rows: `SELECT TOP (10) ...`, `TOP 5 PERCENT`, and on
//!   UPDATE and DELETE. Rendered to another dialect it becomes that
//!   dialect's row limit.
//! - **[APPLY]**: `CROSS APPLY` and `OUTER APPLY` join table-valued
//!   expressions.
//! - **[IF...ELSE]** takes a single statement per branch, grouping more
//!   with `BEGIN ... END`.
//! - **[EXECUTE]** runs procedures: `EXEC @rc = proc @a = 1, @b OUTPUT`.
//! - **Compound assignment**: `SET @x += 1`.
//! - Recursive CTEs need no `RECURSIVE` keyword.
//!
//! [Variables]: https://learn.microsoft.com/sql/t-sql/language-elements/variables-transact-sql
//! [TOP]: https://learn.microsoft.com/sql/t-sql/queries/top-transact-sql
//! [APPLY]: https://learn.microsoft.com/sql/t-sql/queries/from-transact-sql
//! [IF...ELSE]: https://learn.microsoft.com/sql/t-sql/language-elements/if-else-transact-sql
//! [EXECUTE]: https://learn.microsoft.com/sql/t-sql/language-elements/execute-transact-sql
//!
//! ## Example
//!
//! ```rust
//! use sqlweave_tsql::{parse, render};
//!
//! let ast = parse("select top 10 * from [Order Details] where Qty > 5").unwrap();
//! assert_eq!(render(&ast), "SELECT TOP (10) * FROM [Order Details] WHERE Qty > 5;");
//! ```

mod dialect;

pub use dialect::TSqlDialect;

use sqlweave_core::ast::StatementList;
use sqlweave_core::parser::{parse_with, ParseError};

/// Parses SQL Server text.
pub fn parse(sql: &str) -> Result<StatementList, ParseError> {
    parse_with(sql, &TSqlDialect)
}

/// Renders a tree as SQL Server text.
#[must_use]
pub fn render(list: &StatementList) -> String {
    sqlweave_core::render::render(list, &TSqlDialect)
}
