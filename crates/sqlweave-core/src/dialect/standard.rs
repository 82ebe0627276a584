//! SQL-standard dialect.

use std::sync::LazyLock;

use super::{Dialect, COMMON_KEYWORDS, COMMON_OPERATORS};
use crate::ast::Statement;
use crate::lexer::{LexerConfig, TokenKind};
use crate::parser::{ParseError, Parser};

static LEXER_CONFIG: LazyLock<LexerConfig> = LazyLock::new(|| {
    LexerConfig::new(
        COMMON_KEYWORDS.iter().copied().chain(["CALL", "RECURSIVE"]),
        COMMON_OPERATORS.iter().copied().chain(["||", "=>"]),
    )
});

/// The strict SQL-standard subset.
///
/// Unknown statements are errors, variables are bare names, procedures are
/// invoked with `CALL` and conditionals use `IF .. THEN .. END IF`. This is
/// also the dialect `Display` implementations render with.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDialect;

impl Dialect for StandardDialect {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn lexer_config(&self) -> &LexerConfig {
        &LEXER_CONFIG
    }

    fn parse_statement(&self, parser: &mut Parser<'_>) -> Option<Result<Statement, ParseError>> {
        if parser.tokens().next_is(TokenKind::Keyword, Some("CALL"), false) {
            return Some(parser.parse_call());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CallStyle, IfStyle, VariableStyle};

    #[test]
    fn test_standard_defaults() {
        let dialect = StandardDialect;
        assert_eq!(dialect.name(), "standard");
        assert!(!dialect.permissive());
        assert_eq!(dialect.variable_style(), VariableStyle::Bare);
        assert_eq!(dialect.if_style(), IfStyle::Block);
        assert_eq!(dialect.call_style(), CallStyle::Call);
        assert_eq!(dialect.quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_standard_lexer_config() {
        let config = StandardDialect.lexer_config();
        assert!(config.is_keyword("call"));
        assert!(config.is_keyword("recursive"));
        assert!(!config.is_keyword("top"));
        assert!(config.is_operator("||"));
        assert!(!config.is_operator("+="));
    }
}
