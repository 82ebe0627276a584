//! SQL Server dialect implementation.

use std::sync::LazyLock;

use sqlweave_core::ast::Statement;
use sqlweave_core::dialect::{
    is_listed, CallStyle, Dialect, IfStyle, VariableStyle, COMMON_FUNCTIONS, COMMON_KEYWORDS,
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

const KEYWORDS: &[&str] = &["EXEC", "EXECUTE", "TOP"];

const OPERATORS: &[&str] = &["!<", "!>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^="];

const FUNCTIONS: &[&str] = &[
    "CHARINDEX", "CONVERT", "DATEADD", "DATEDIFF", "DATEPART", "GETDATE", "GETUTCDATE", "ISNULL",
    "LEN", "NEWID", "OBJECT_ID", "SCOPE_IDENTITY",
];

/// SQL Server dialect.
///
/// Variables carry an `@` sigil, identifiers are bracket-quoted and
/// statements the grammar does not model (`PRINT`, `RAISERROR`,
/// `BEGIN TRANSACTION`, DDL) are kept as raw tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct TSqlDialect;

impl TSqlDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for TSqlDialect {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn lexer_config(&self) -> &LexerConfig {
        &LEXER_CONFIG
    }

    fn parse_statement(&self, parser: &mut Parser<'_>) -> Option<Result<Statement, ParseError>> {
        let tokens = parser.tokens();
        if tokens.next_is(TokenKind::Keyword, Some("EXEC"), false)
            || tokens.next_is(TokenKind::Keyword, Some("EXECUTE"), false)
        {
            return Some(parser.parse_execute());
        }
        None
    }

    fn permissive(&self) -> bool {
        true
    }

    fn variable_style(&self) -> VariableStyle {
        VariableStyle::Sigil
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    fn supports_top(&self) -> bool {
        true
    }

    fn supports_apply(&self) -> bool {
        true
    }

    fn supports_compound_assignment(&self) -> bool {
        true
    }

    fn recursive_keyword(&self) -> bool {
        false
    }

    fn if_style(&self) -> IfStyle {
        IfStyle::Compact
    }

    fn call_style(&self) -> CallStyle {
        CallStyle::Exec
    }

    fn declare_initializer(&self) -> &'static str {
        "="
    }

    fn is_builtin_function(&self, name: &str) -> bool {
        is_listed(COMMON_FUNCTIONS, name) || is_listed(FUNCTIONS, name)
    }
}
