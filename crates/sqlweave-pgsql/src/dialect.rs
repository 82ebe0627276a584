//! PostgreSQL dialect implementation.

use std::sync::LazyLock;

use sqlweave_core::ast::Statement;
use sqlweave_core::dialect::{
    is_listed, CallStyle, Dialect, IfStyle, RowLimitStyle, COMMON_FUNCTIONS, COMMON_KEYWORDS,
    COMMON_OPERATORS,
};
use sqlweave_core::lexer::{LexerConfig, TokenKind};
use sqlweave_core::parser::{ParseError, Parser};

static LEXER_CONFIG: LazyLock<LexerConfig> = LazyLock::new(|| {
    LexerConfig::new(
        COMMON_KEYWORDS.iter().copied().chain(KEYWORDS.iter().copied()),
        COMMON_OPERATORS.iter().copied().chain(OPERATORS.iter().copied()),
    )
});

const KEYWORDS: &[&str] = &["CALL", "LIMIT", "RECURSIVE"];

const OPERATORS: &[&str] = &["||", "::", ":=", "=>"];

const FUNCTIONS: &[&str] = &[
    "ARRAY_AGG", "DATE_TRUNC", "GENERATE_SERIES", "NOW", "STRING_AGG", "TO_CHAR",
];

/// PostgreSQL dialect.
///
/// Covers plain SQL plus the PL/pgSQL statements that carry variables:
/// `DECLARE`, `x := v` assignments and block `IF`. Statements the grammar
/// does not model are kept as raw tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn lexer_config(&self) -> &LexerConfig {
        &LEXER_CONFIG
    }

    fn parse_statement(&self, parser: &mut Parser<'_>) -> Option<Result<Statement, ParseError>> {
        if parser.tokens().next_is(TokenKind::Keyword, Some("CALL"), false) {
            return Some(parser.parse_call());
        }
        parser.parse_bare_assignment()
    }

    fn permissive(&self) -> bool {
        true
    }

    fn row_limit_style(&self) -> RowLimitStyle {
        RowLimitStyle::LimitOffset
    }

    fn supports_limit(&self) -> bool {
        true
    }

    fn supports_double_colon_cast(&self) -> bool {
        true
    }

    fn if_style(&self) -> IfStyle {
        IfStyle::Block
    }

    fn call_style(&self) -> CallStyle {
        CallStyle::Call
    }

    fn declare_initializer(&self) -> &'static str {
        ":="
    }

    fn set_keyword(&self) -> bool {
        false
    }

    fn is_builtin_function(&self, name: &str) -> bool {
        is_listed(COMMON_FUNCTIONS, name) || is_listed(FUNCTIONS, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlweave_core::dialect::VariableStyle;

    #[test]
    fn test_postgres_dialect() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.name(), "postgres");
        assert!(dialect.permissive());
        assert_eq!(dialect.variable_style(), VariableStyle::Bare);
        assert_eq!(dialect.row_limit_style(), RowLimitStyle::LimitOffset);
        assert!(!dialect.supports_top());
        assert!(dialect.recursive_keyword());
        assert_eq!(dialect.quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_lexer_tables() {
        let config = PostgresDialect.lexer_config();
        assert!(config.is_keyword("limit"));
        assert!(config.is_operator("::"));
        assert!(config.is_operator(":="));
        assert!(!config.is_keyword("TOP"));
    }

    #[test]
    fn test_builtins() {
        assert!(PostgresDialect.is_builtin_function("now"));
        assert!(!PostgresDialect.is_builtin_function("GETDATE"));
    }
}
