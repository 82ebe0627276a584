//! SQL Parser implementation: stream helpers, statement dispatch and
//! SELECT.

use std::sync::Arc;

use tracing::trace;

use super::error::ParseError;
use super::ParserOptions;
use crate::ast::{
    AliasExpr, Annotation, Compound, DerivedTable, Expr, Identifier, Join, JoinKind, JoinOperator,
    List, ObjectIdentifier, OrderDirection, OrderItem, Paren, Query, RowLimit, SelectStatement,
    SetOperator, Statement, StatementList, TableAlias, TableReference, TableSource, TopClause,
    MAX_IDENTIFIER_PARTS,
};
use crate::dialect::Dialect;
use crate::lexer::{Lexer, Location, Token, TokenKind, TokenStream};

/// Keywords that start a statement of the shared grammar.
pub(super) const STATEMENT_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "MERGE", "DECLARE", "SET", "IF", "BEGIN",
    "EXEC", "EXECUTE", "CALL",
];

/// SQL Parser.
///
/// One parser serves every dialect: the [`Dialect`] decides which optional
/// clauses are accepted and may claim extra statements through
/// [`Dialect::parse_statement`].
pub struct Parser<'a> {
    pub(super) tokens: TokenStream<'a>,
    pub(super) dialect: &'a dyn Dialect,
    options: ParserOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Self {
        Self {
            tokens: TokenStream::new(Lexer::new(input, dialect.lexer_config())),
            dialect,
            options: ParserOptions::default(),
            depth: 0,
        }
    }

    /// Replaces the parser options.
    #[must_use]
    pub const fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the dialect this parser follows.
    #[must_use]
    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Gives dialect hooks direct access to the token stream.
    pub fn tokens(&mut self) -> &mut TokenStream<'a> {
        &mut self.tokens
    }

    /// Parses the whole input as a statement list.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` at the first token the grammar cannot accept.
    pub fn parse(&mut self) -> Result<StatementList, ParseError> {
        let location = self.tokens.location();
        let statements = self.parse_statements(&[])?;
        let token = self.tokens.next();
        if !token.is_end() {
            return Err(ParseError::unexpected("statement", token));
        }
        Ok(StatementList::new(statements, false, location))
    }

    /// Parses statements until end of input or one of the `terminators`
    /// keywords, skipping redundant separators.
    pub(super) fn parse_statements(
        &mut self,
        terminators: &[&str],
    ) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.tokens.skip(TokenKind::Symbol, Some(";"));
            let token = self.tokens.peek();
            if token.is_end() || terminators.iter().any(|t| token.is_keyword(t)) {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    /// Parses a single statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(|p| {
            let dialect = p.dialect;
            if let Some(result) = dialect.parse_statement(p) {
                return result;
            }
            let token = p.tokens.peek();
            trace!(token = %token, dialect = dialect.name(), "dispatching statement");
            if token.kind == TokenKind::Keyword {
                match token.value.as_str() {
                    "SELECT" => return p.parse_select().map(Statement::Select),
                    "WITH" => return p.parse_with(),
                    "INSERT" => return p.parse_insert(),
                    "UPDATE" => return p.parse_update(),
                    "DELETE" => return p.parse_delete(),
                    "MERGE" => return p.parse_merge(),
                    "DECLARE" => return p.parse_declare(),
                    "SET" => return p.parse_set(),
                    "IF" => return p.parse_if(),
                    "BEGIN" => {
                        if let Some(block) = p.parse_block()? {
                            return Ok(Statement::Block(Arc::new(block)));
                        }
                    }
                    _ => {}
                }
            }
            p.parse_unknown()
        })
    }

    /// Runs `f` one nesting level deeper, failing past the configured
    /// maximum depth.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::new(
                format!(
                    "Nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
                self.tokens.location(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Returns true if the next token is the given keyword.
    pub(super) fn peek_keyword(&mut self, keyword: &str) -> bool {
        self.tokens.next_is(TokenKind::Keyword, Some(keyword), false)
    }

    /// Consumes the given keyword if it is next.
    pub(super) fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.tokens.next_is(TokenKind::Keyword, Some(keyword), true)
    }

    /// Consumes the given keyword or fails.
    pub(super) fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        self.tokens.expect(TokenKind::Keyword, Some(keyword))
    }

    /// Returns true if the next token is the given symbol.
    pub(super) fn peek_symbol(&mut self, symbol: &str) -> bool {
        self.tokens.next_is(TokenKind::Symbol, Some(symbol), false)
    }

    /// Consumes the given symbol if it is next.
    pub(super) fn eat_symbol(&mut self, symbol: &str) -> bool {
        self.tokens.next_is(TokenKind::Symbol, Some(symbol), true)
    }

    /// Consumes the given symbol or fails.
    pub(super) fn expect_symbol(&mut self, symbol: &str) -> Result<Token, ParseError> {
        self.tokens.expect(TokenKind::Symbol, Some(symbol))
    }

    /// Consumes a word that may be a keyword in one dialect and a plain
    /// identifier in another (`SOURCE`, `OUTPUT`, `PERCENT`).
    pub(super) fn eat_word(&mut self, word: &str) -> bool {
        let token = self.tokens.next();
        let matched = matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier)
            && !token.quoted
            && token.value.eq_ignore_ascii_case(word);
        if !matched {
            self.tokens.put_back(token);
        }
        matched
    }

    /// Parses a single identifier.
    pub(super) fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.tokens.expect(TokenKind::Identifier, None)?;
        Ok(Identifier {
            value: token.value,
            quoted: token.quoted,
            location: token.location,
        })
    }

    /// Parses a dotted name of up to four parts.
    ///
    /// A dot that is not followed by an identifier is left unread, so the
    /// caller can still see `t.*`.
    pub(super) fn parse_object_identifier(&mut self) -> Result<ObjectIdentifier, ParseError> {
        let mut parts = vec![self.parse_identifier()?];
        loop {
            let mark = self.tokens.mark();
            if !self.eat_symbol(".") {
                break;
            }
            if self.tokens.peek_kind() != TokenKind::Identifier {
                self.tokens.reset(mark);
                break;
            }
            parts.push(self.parse_identifier()?);
        }
        if parts.len() > MAX_IDENTIFIER_PARTS {
            return Err(ParseError::new(
                format!("Object name has more than {MAX_IDENTIFIER_PARTS} parts"),
                parts[0].location,
            ));
        }
        Ok(ObjectIdentifier::new(parts))
    }

    /// Parses `item (, item)*`.
    pub(super) fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.eat_symbol(",") {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Parses `( inner )`.
    pub(super) fn parse_paren<T>(
        &mut self,
        inner: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Paren<T>, ParseError> {
        let location = self.expect_symbol("(")?.location;
        let inner = inner(self)?;
        self.expect_symbol(")")?;
        Ok(Paren::new(inner, location))
    }

    /// Parses `(a, b, c)`.
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<Identifier>, ParseError> {
        Ok(self
            .parse_paren(|p| p.parse_comma_separated(Self::parse_identifier))?
            .inner)
    }

    /// Parses a parenthesized expression list such as a VALUES row.
    pub(super) fn parse_expression_row(&mut self) -> Result<Arc<Paren<List<Expr>>>, ParseError> {
        let paren = self.parse_paren(|p| {
            let location = p.tokens.location();
            Ok(List::new(
                p.parse_comma_separated(Self::parse_expression)?,
                location,
            ))
        })?;
        Ok(Arc::new(paren))
    }

    /// Parses `(SELECT ...)`.
    pub(super) fn parse_subquery(&mut self) -> Result<Arc<Paren<Query>>, ParseError> {
        Ok(Arc::new(self.parse_paren(Self::parse_select)?))
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// Parses a SELECT statement including any trailing set operation.
    pub(super) fn parse_select(&mut self) -> Result<Query, ParseError> {
        self.nested(|p| {
            let location = p.expect_keyword("SELECT")?.location;
            let distinct = if p.eat_keyword("DISTINCT") {
                true
            } else {
                p.eat_keyword("ALL");
                false
            };
            let top = p.parse_top()?;

            let columns_location = p.tokens.location();
            let columns = List::new(
                p.parse_comma_separated(Self::parse_select_item)?,
                columns_location,
            );

            let from = if p.eat_keyword("FROM") {
                p.parse_comma_separated(Self::parse_table_source)?
            } else {
                vec![]
            };

            let where_clause = if p.eat_keyword("WHERE") {
                Some(p.parse_expression()?)
            } else {
                None
            };

            let group_by = if p.eat_keyword("GROUP") {
                p.expect_keyword("BY")?;
                p.parse_comma_separated(Self::parse_expression)?
            } else {
                vec![]
            };

            let having = if p.eat_keyword("HAVING") {
                Some(p.parse_expression()?)
            } else {
                None
            };

            let order_by = p.parse_order_by()?;
            let limit = p.parse_row_limit()?;
            let compound = p.parse_compound()?;

            Ok(Arc::new(SelectStatement {
                distinct,
                top,
                columns,
                from,
                where_clause,
                group_by,
                having,
                order_by,
                limit,
                compound,
                scope: Annotation::new(),
                location,
            }))
        })
    }

    /// Parses a column expression with an optional alias.
    fn parse_select_item(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        let alias = if self.eat_keyword("AS") {
            Some(self.parse_identifier()?)
        } else if self.tokens.peek_kind() == TokenKind::Identifier {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(match alias {
            Some(alias) => {
                let location = expr.location();
                Expr::Alias(Arc::new(AliasExpr {
                    expr,
                    alias,
                    location,
                }))
            }
            None => expr,
        })
    }

    /// Parses `TOP (n) [PERCENT]` or `TOP n` where the dialect has it.
    pub(super) fn parse_top(&mut self) -> Result<Option<Arc<TopClause>>, ParseError> {
        if !self.dialect.supports_top() || !self.peek_keyword("TOP") {
            return Ok(None);
        }
        let location = self.tokens.next().location;
        let count = if self.peek_symbol("(") {
            self.parse_paren(Self::parse_expression)?.inner
        } else {
            self.parse_unary()?
        };
        let percent = self.eat_word("PERCENT");
        Ok(Some(Arc::new(TopClause {
            count,
            percent,
            location,
        })))
    }

    /// Parses `ORDER BY item, ...` if present.
    pub(super) fn parse_order_by(&mut self) -> Result<Vec<OrderItem>, ParseError> {
        if !self.eat_keyword("ORDER") {
            return Ok(vec![]);
        }
        self.expect_keyword("BY")?;
        self.parse_comma_separated(|p| {
            let expr = p.parse_expression()?;
            let direction = if p.eat_keyword("ASC") {
                Some(OrderDirection::Asc)
            } else if p.eat_keyword("DESC") {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            Ok(OrderItem { expr, direction })
        })
    }

    /// Parses `OFFSET .. FETCH ..` or, where supported, `LIMIT .. OFFSET ..`.
    fn parse_row_limit(&mut self) -> Result<Option<Arc<RowLimit>>, ParseError> {
        let location = self.tokens.location();
        let supports_limit = self.dialect.supports_limit();
        let mut offset = None;
        let mut count = None;

        if supports_limit && self.eat_keyword("LIMIT") {
            count = Some(self.parse_expression()?);
            if self.eat_keyword("OFFSET") {
                offset = Some(self.parse_expression()?);
                self.eat_rows();
            }
        } else if self.eat_keyword("OFFSET") {
            offset = Some(self.parse_expression()?);
            self.eat_rows();
            if supports_limit && self.eat_keyword("LIMIT") {
                count = Some(self.parse_expression()?);
            }
        }

        if count.is_none() && self.eat_keyword("FETCH") {
            if !self.eat_keyword("FIRST") {
                self.expect_keyword("NEXT")?;
            }
            count = Some(self.parse_expression()?);
            if !self.eat_rows() {
                return Err(ParseError::unexpected("ROWS", self.tokens.peek()));
            }
            self.expect_keyword("ONLY")?;
        }

        if offset.is_none() && count.is_none() {
            return Ok(None);
        }
        Ok(Some(Arc::new(RowLimit {
            offset,
            count,
            location,
        })))
    }

    fn eat_rows(&mut self) -> bool {
        self.eat_keyword("ROWS") || self.eat_keyword("ROW")
    }

    /// Parses `UNION [ALL] | EXCEPT | INTERSECT` followed by a SELECT.
    fn parse_compound(&mut self) -> Result<Option<Arc<Compound>>, ParseError> {
        let location = self.tokens.location();
        let op = if self.eat_keyword("UNION") {
            SetOperator::Union
        } else if self.eat_keyword("EXCEPT") {
            SetOperator::Except
        } else if self.eat_keyword("INTERSECT") {
            SetOperator::Intersect
        } else {
            return Ok(None);
        };
        let all = self.eat_keyword("ALL");
        let right = self.parse_select()?;
        Ok(Some(Arc::new(Compound {
            op,
            all,
            right,
            location,
        })))
    }

    // =========================================================================
    // FROM
    // =========================================================================

    /// Parses a table factor followed by any number of joins.
    pub(super) fn parse_table_source(&mut self) -> Result<TableSource, ParseError> {
        let mut source = self.parse_table_factor()?;
        while let Some(operator) = self.parse_join_operator() {
            let right = self.parse_table_factor()?;
            let condition = if operator.kind.has_condition() {
                self.expect_keyword("ON")?;
                Some(self.parse_expression()?)
            } else {
                None
            };
            let location = source.location();
            source = TableSource::Join(Arc::new(Join {
                left: source,
                operator,
                right,
                condition,
                location,
            }));
        }
        Ok(source)
    }

    /// Accumulates join keywords one token at a time. Returns `None`, with
    /// every consumed token put back, unless a complete operator follows.
    fn parse_join_operator(&mut self) -> Option<JoinOperator> {
        let mark = self.tokens.mark();
        let first = self.tokens.next();
        if first.kind != TokenKind::Keyword {
            self.tokens.put_back(first);
            return None;
        }
        let supports_apply = self.dialect.supports_apply();
        let mut words = vec![first.value.clone()];
        let kind = match first.value.as_str() {
            "JOIN" => {
                return Some(JoinOperator {
                    kind: JoinKind::Inner,
                    text: first.value,
                })
            }
            "INNER" => JoinKind::Inner,
            "LEFT" => JoinKind::Left,
            "RIGHT" => JoinKind::Right,
            "FULL" => JoinKind::Full,
            "CROSS" => JoinKind::Cross,
            "OUTER" if supports_apply => JoinKind::OuterApply,
            _ => {
                self.tokens.put_back(first);
                return None;
            }
        };

        if matches!(kind, JoinKind::Left | JoinKind::Right | JoinKind::Full)
            && self.eat_keyword("OUTER")
        {
            words.push("OUTER".to_string());
        }

        let operator = if matches!(kind, JoinKind::Cross | JoinKind::OuterApply)
            && supports_apply
            && self.eat_word("APPLY")
        {
            words.push("APPLY".to_string());
            let kind = if kind == JoinKind::Cross {
                JoinKind::CrossApply
            } else {
                JoinKind::OuterApply
            };
            Some(kind)
        } else if kind != JoinKind::OuterApply && self.eat_keyword("JOIN") {
            words.push("JOIN".to_string());
            Some(kind)
        } else {
            None
        };

        if let Some(kind) = operator {
            return Some(JoinOperator {
                kind,
                text: words.join(" "),
            });
        }
        trace!(tokens = words.len(), "incomplete join operator, backtracking");
        self.tokens.reset(mark);
        None
    }

    /// Parses a table reference, derived table or table-valued function.
    pub(super) fn parse_table_factor(&mut self) -> Result<TableSource, ParseError> {
        let location = self.tokens.location();
        if self.peek_symbol("(") {
            let subquery = self.parse_subquery()?;
            let alias = self.parse_table_alias()?;
            return Ok(TableSource::Derived(Arc::new(DerivedTable {
                subquery,
                alias,
                location,
            })));
        }
        Ok(TableSource::Table(Arc::new(
            self.parse_table_reference(true)?,
        )))
    }

    /// Parses a named table or table variable with an optional alias.
    pub(super) fn parse_table_reference(
        &mut self,
        allow_function: bool,
    ) -> Result<TableReference, ParseError> {
        let token = self.tokens.peek();
        let location = token.location;
        let target = match token.kind {
            TokenKind::Variable => {
                self.tokens.next();
                Expr::variable(token.value, location)
            }
            TokenKind::Identifier => {
                let name = self.parse_object_identifier()?;
                if allow_function && self.peek_symbol("(") {
                    self.parse_function_call(name)?
                } else {
                    Expr::Identifier(Arc::new(name))
                }
            }
            _ => return Err(ParseError::unexpected("table name", token)),
        };
        let alias = self.parse_table_alias()?;
        Ok(TableReference {
            target,
            alias,
            location,
        })
    }

    /// Parses `[AS] alias [(columns)]`.
    fn parse_table_alias(&mut self) -> Result<Option<TableAlias>, ParseError> {
        let explicit = self.eat_keyword("AS");
        if !explicit && self.tokens.peek_kind() != TokenKind::Identifier {
            return Ok(None);
        }
        let name = self.parse_identifier()?;
        let columns = if self.peek_symbol("(") {
            self.parse_identifier_list()?
        } else {
            vec![]
        };
        Ok(Some(TableAlias { name, columns }))
    }

    /// Returns the location of the next token.
    pub(super) fn location(&mut self) -> Location {
        self.tokens.location()
    }
}

/// Parses `input` with `dialect` and default options.
///
/// # Errors
///
/// Returns a `ParseError` at the first token the grammar cannot accept.
pub fn parse_with(input: &str, dialect: &dyn Dialect) -> Result<StatementList, ParseError> {
    Parser::new(input, dialect).parse()
}
