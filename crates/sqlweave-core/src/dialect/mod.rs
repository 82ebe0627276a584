//! SQL Dialect support.
//!
//! Every dialect shares one grammar and one renderer. This module provides
//! the trait through which a dialect switches grammar features on or off,
//! claims extra statements, and picks how the renderer spells things.

mod standard;

pub use standard::StandardDialect;

use crate::ast::Statement;
use crate::lexer::LexerConfig;
use crate::parser::{ParseError, Parser};

/// Keywords reserved by every dialect.
pub const COMMON_KEYWORDS: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CASE", "CAST", "CROSS",
    "CURRENT_DATE", "CURRENT_TIMESTAMP", "CURRENT_USER", "DECLARE", "DEFAULT", "DELETE", "DESC",
    "DISTINCT", "ELSE", "END", "EXCEPT", "EXISTS", "FALSE", "FETCH", "FIRST", "FROM", "FULL",
    "GROUP", "HAVING", "IF", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEFT",
    "LIKE", "MATCHED", "MERGE", "NEXT", "NOT", "NULL", "OFFSET", "ON", "ONLY", "OR", "ORDER",
    "OUTER", "OVER", "PARTITION", "RIGHT", "ROW", "ROWS", "SELECT", "SET", "SOME", "TABLE",
    "THEN", "TRUE", "UNION", "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

/// Multi-character operators every dialect lexes.
pub const COMMON_OPERATORS: &[&str] = &["<=", ">=", "<>", "!="];

/// Function names every dialect treats as built in.
pub const COMMON_FUNCTIONS: &[&str] = &[
    "ABS", "AVG", "CEILING", "COALESCE", "CONCAT", "COUNT", "DENSE_RANK", "FLOOR", "LAG", "LEAD",
    "LEFT", "LOWER", "MAX", "MIN", "NULLIF", "RANK", "REPLACE", "RIGHT", "ROUND", "ROW_NUMBER",
    "SUBSTRING", "SUM", "TRIM", "UPPER",
];

/// How a dialect spells variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableStyle {
    /// `@name`
    Sigil,
    /// `name`
    Bare,
}

/// How a dialect spells a row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowLimitStyle {
    /// `OFFSET n ROWS FETCH FIRST m ROWS ONLY`
    OffsetFetch,
    /// `LIMIT m OFFSET n`
    LimitOffset,
}

/// How a dialect writes conditional blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfStyle {
    /// `IF cond stmt [ELSE stmt]`, grouping with `BEGIN ... END`.
    Compact,
    /// `IF cond THEN stmts [ELSE stmts] END IF`.
    Block,
}

/// How a dialect invokes stored procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStyle {
    /// `EXEC proc @a = 1, @b OUTPUT`
    Exec,
    /// `CALL proc(1, b => 2)`
    Call,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the keyword and operator tables the lexer uses.
    fn lexer_config(&self) -> &LexerConfig;

    /// Claims statements the shared grammar does not know.
    ///
    /// Called before the built-in dispatch with the stream positioned at
    /// the statement's first token. Return `None`, leaving the stream
    /// untouched, to fall through.
    fn parse_statement(&self, parser: &mut Parser<'_>) -> Option<Result<Statement, ParseError>> {
        let _ = parser;
        None
    }

    /// Returns whether unrecognized statements are kept as raw tokens
    /// instead of failing the parse.
    fn permissive(&self) -> bool {
        false
    }

    /// Returns how variables are spelled.
    fn variable_style(&self) -> VariableStyle {
        VariableStyle::Bare
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Returns how row limits are rendered.
    fn row_limit_style(&self) -> RowLimitStyle {
        RowLimitStyle::OffsetFetch
    }

    /// Returns whether `LIMIT` is accepted.
    fn supports_limit(&self) -> bool {
        false
    }

    /// Returns whether `TOP` is accepted.
    fn supports_top(&self) -> bool {
        false
    }

    /// Returns whether `CROSS APPLY` / `OUTER APPLY` are accepted.
    fn supports_apply(&self) -> bool {
        false
    }

    /// Returns whether `expr::type` casts are accepted.
    fn supports_double_colon_cast(&self) -> bool {
        false
    }

    /// Returns whether `+=` style assignments are accepted.
    fn supports_compound_assignment(&self) -> bool {
        false
    }

    /// Returns whether recursive CTEs are introduced by `WITH RECURSIVE`.
    fn recursive_keyword(&self) -> bool {
        true
    }

    /// Returns how IF statements are written.
    fn if_style(&self) -> IfStyle {
        IfStyle::Block
    }

    /// Returns how procedures are invoked.
    fn call_style(&self) -> CallStyle {
        CallStyle::Call
    }

    /// Returns the token introducing a DECLARE initializer.
    fn declare_initializer(&self) -> &'static str {
        "DEFAULT"
    }

    /// Returns whether variable assignment is written `SET x = v` rather
    /// than `x := v`.
    fn set_keyword(&self) -> bool {
        true
    }

    /// Returns true if `name` is a built-in function, which always
    /// resolves.
    fn is_builtin_function(&self, name: &str) -> bool {
        is_listed(COMMON_FUNCTIONS, name)
    }
}

/// Case-insensitive membership in a keyword-style list.
#[must_use]
pub fn is_listed(list: &[&str], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_listed_ignores_case() {
        assert!(is_listed(COMMON_FUNCTIONS, "count"));
        assert!(is_listed(COMMON_KEYWORDS, "Select"));
        assert!(!is_listed(COMMON_FUNCTIONS, "getdate"));
    }

    #[test]
    fn test_keyword_table_is_uppercase() {
        assert!(COMMON_KEYWORDS
            .iter()
            .all(|k| k.chars().all(|c| !c.is_ascii_lowercase())));
    }
}
