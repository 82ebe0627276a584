//! Expression parsing.
//!
//! One function per precedence level, loosest first:
//! OR, AND, NOT, comparison, additive, multiplicative, unary, primary.

use std::sync::Arc;

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    BetweenExpr, BinaryOp, CaseExpr, CastExpr, DataType, ExistsExpr, Expr, FunctionCall, InExpr,
    InValues, IsNullExpr, KeywordValue, List, NullLiteral, Number, ObjectIdentifier, OverExpr,
    PrefixExpr, QuantifiedExpr, Quantifier, UnaryOp, WhenClause, Wildcard, MAX_PRECISION,
};
use crate::lexer::{Location, TokenKind};

/// Keywords that stand for a value on their own.
const VALUE_KEYWORDS: &[&str] = &[
    "TRUE",
    "FALSE",
    "DEFAULT",
    "CURRENT_DATE",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
];

impl Parser<'_> {
    /// Parses an expression.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid expression.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_or)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("OR") {
            let right = self.parse_and()?;
            left = Expr::infix(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("AND") {
            let right = self.parse_not()?;
            left = Expr::infix(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        let location = self.location();
        if self.eat_keyword("NOT") {
            let operand = self.nested(Self::parse_not)?;
            return Ok(Expr::Prefix(Arc::new(PrefixExpr {
                op: UnaryOp::Not,
                operand,
                location,
            })));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let token = self.tokens.peek();
            let location = left.location();

            if token.kind == TokenKind::Symbol {
                let Some(op) = BinaryOp::comparison(&token.value) else {
                    return Ok(left);
                };
                self.tokens.next();
                left = match self.parse_quantifier() {
                    Some(quantifier) => Expr::Quantified(Arc::new(QuantifiedExpr {
                        left,
                        op,
                        quantifier,
                        subquery: self.parse_subquery()?,
                        location,
                    })),
                    None => {
                        let right = self.parse_additive()?;
                        Expr::infix(left, op, right)
                    }
                };
                continue;
            }

            if token.kind != TokenKind::Keyword {
                return Ok(left);
            }

            let mark = self.tokens.mark();
            let negated = self.eat_keyword("NOT");
            if self.eat_keyword("BETWEEN") {
                let low = self.parse_additive()?;
                self.expect_keyword("AND")?;
                let high = self.parse_additive()?;
                left = Expr::Between(Arc::new(BetweenExpr {
                    expr: left,
                    negated,
                    low,
                    high,
                    location,
                }));
            } else if self.eat_keyword("IN") {
                let values = self.parse_in_values()?;
                left = Expr::In(Arc::new(InExpr {
                    expr: left,
                    negated,
                    values,
                    location,
                }));
            } else if self.eat_keyword("LIKE") {
                let op = if negated {
                    BinaryOp::NotLike
                } else {
                    BinaryOp::Like
                };
                let right = self.parse_additive()?;
                left = Expr::infix(left, op, right);
            } else if !negated && self.eat_keyword("IS") {
                let negated = self.eat_keyword("NOT");
                self.expect_keyword("NULL")?;
                left = Expr::IsNull(Arc::new(IsNullExpr {
                    expr: left,
                    negated,
                    location,
                }));
            } else {
                self.tokens.reset(mark);
                return Ok(left);
            }
        }
    }

    /// Consumes `ALL`, `ANY` or `SOME` when a sub-query follows.
    fn parse_quantifier(&mut self) -> Option<Quantifier> {
        let quantifier = if self.peek_keyword("ALL") {
            Quantifier::All
        } else if self.peek_keyword("ANY") {
            Quantifier::Any
        } else if self.peek_keyword("SOME") {
            Quantifier::Some
        } else {
            return None;
        };
        let keyword = self.tokens.next();
        if self.peek_symbol("(") {
            return Some(quantifier);
        }
        self.tokens.put_back(keyword);
        None
    }

    fn parse_in_values(&mut self) -> Result<InValues, ParseError> {
        if self.starts_subquery() {
            return Ok(InValues::Subquery(self.parse_subquery()?));
        }
        Ok(InValues::List(self.parse_expression_row()?))
    }

    /// Returns true if the stream is at `( SELECT`.
    pub(super) fn starts_subquery(&mut self) -> bool {
        let open = self.tokens.next();
        let result = open.is_symbol("(") && self.peek_keyword("SELECT");
        self.tokens.put_back(open);
        result
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let token = self.tokens.peek();
            let op = match token.kind {
                TokenKind::Symbol => BinaryOp::additive(&token.value),
                _ => None,
            };
            let Some(op) = op else {
                return Ok(left);
            };
            self.tokens.next();
            let right = self.parse_multiplicative()?;
            left = Expr::infix(left, op, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let token = self.tokens.peek();
            let op = match token.kind {
                TokenKind::Symbol => BinaryOp::multiplicative(&token.value),
                _ => None,
            };
            let Some(op) = op else {
                return Ok(left);
            };
            self.tokens.next();
            let right = self.parse_unary()?;
            left = Expr::infix(left, op, right);
        }
    }

    /// Parses prefix `-`, `+` and `~`, or a primary expression.
    pub(super) fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let token = self.tokens.peek();
        let op = match token.value.as_str() {
            "-" if token.kind == TokenKind::Symbol => Some(UnaryOp::Neg),
            "+" if token.kind == TokenKind::Symbol => Some(UnaryOp::Plus),
            "~" if token.kind == TokenKind::Symbol => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.tokens.next();
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::Prefix(Arc::new(PrefixExpr {
                op,
                operand,
                location: token.location,
            })));
        }
        if self.peek_keyword("NULL") {
            self.tokens.next();
            return Ok(Expr::Null(Arc::new(NullLiteral {
                location: token.location,
            })));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    /// Applies `::type` casts where the dialect lexes `::`.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        if !self.dialect.supports_double_colon_cast() {
            return Ok(expr);
        }
        while self.eat_symbol("::") {
            let location = expr.location();
            let data_type = Arc::new(self.parse_data_type()?);
            expr = Expr::Cast(Arc::new(CastExpr {
                expr,
                data_type,
                shorthand: true,
                location,
            }));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.tokens.next();
        let location = token.location;
        match token.kind {
            TokenKind::Number => Number::parse(&token.value)
                .map(|value| Expr::number(value, location))
                .ok_or_else(|| {
                    ParseError::new(
                        format!(
                            "Numeric literal {} exceeds {MAX_PRECISION} digits",
                            token.value
                        ),
                        location,
                    )
                }),
            TokenKind::QuotedString => Ok(Expr::string(token.value, location)),
            TokenKind::Variable => Ok(Expr::variable(token.value, location)),
            TokenKind::Identifier => {
                self.tokens.put_back(token);
                self.parse_name_expression()
            }
            TokenKind::Symbol if token.value == "(" => {
                self.tokens.put_back(token);
                if self.starts_subquery() {
                    return Ok(Expr::Subquery(self.parse_subquery()?));
                }
                let paren = self.parse_paren(Self::parse_expression)?;
                Ok(Expr::Paren(Arc::new(paren)))
            }
            TokenKind::Symbol if token.value == "*" => Ok(Expr::Wildcard(Arc::new(Wildcard {
                qualifier: None,
                location,
            }))),
            TokenKind::Keyword => match token.value.as_str() {
                "CASE" => self.parse_case(location),
                "CAST" => self.parse_cast(location),
                "EXISTS" => Ok(Expr::Exists(Arc::new(ExistsExpr {
                    subquery: self.parse_subquery()?,
                    location,
                }))),
                "LEFT" | "RIGHT" if self.peek_symbol("(") => {
                    let name = ObjectIdentifier::single(token.value, location);
                    self.parse_function_call(name)
                }
                keyword if VALUE_KEYWORDS.contains(&keyword) => {
                    Ok(Expr::Keyword(Arc::new(KeywordValue {
                        keyword: token.value,
                        location,
                    })))
                }
                _ => {
                    self.tokens.put_back(token.clone());
                    Err(ParseError::unexpected("expression", token))
                }
            },
            _ => {
                self.tokens.put_back(token.clone());
                Err(ParseError::unexpected("expression", token))
            }
        }
    }

    /// Parses an identifier, `qualifier.*` or a function call.
    fn parse_name_expression(&mut self) -> Result<Expr, ParseError> {
        let name = self.parse_object_identifier()?;
        if self.peek_symbol("(") {
            return self.parse_function_call(name);
        }
        let mark = self.tokens.mark();
        if self.eat_symbol(".") {
            if self.peek_symbol("*") {
                self.tokens.next();
                let location = name.location;
                return Ok(Expr::Wildcard(Arc::new(Wildcard {
                    qualifier: Some(Arc::new(name)),
                    location,
                })));
            }
            self.tokens.reset(mark);
        }
        Ok(Expr::Identifier(Arc::new(name)))
    }

    /// Parses `(args) [OVER (...)]` after a function name.
    pub(super) fn parse_function_call(
        &mut self,
        name: ObjectIdentifier,
    ) -> Result<Expr, ParseError> {
        let location = name.location;
        self.expect_symbol("(")?;
        let distinct = self.eat_keyword("DISTINCT");
        let args_location = self.location();
        let args = if self.peek_symbol(")") {
            vec![]
        } else {
            self.parse_comma_separated(Self::parse_expression)?
        };
        self.expect_symbol(")")?;

        let function = Expr::Function(Arc::new(FunctionCall {
            name: Arc::new(name),
            distinct,
            args: List::new(args, args_location),
            location,
        }));
        if !self.eat_keyword("OVER") {
            return Ok(function);
        }

        self.expect_symbol("(")?;
        let partition_by = if self.eat_keyword("PARTITION") {
            self.expect_keyword("BY")?;
            self.parse_comma_separated(Self::parse_expression)?
        } else {
            vec![]
        };
        let order_by = self.parse_order_by()?;
        self.expect_symbol(")")?;
        Ok(Expr::Over(Arc::new(OverExpr {
            function,
            partition_by,
            order_by,
            location,
        })))
    }

    /// Parses the rest of `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
    fn parse_case(&mut self, location: Location) -> Result<Expr, ParseError> {
        let operand = if self.peek_keyword("WHEN") {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut whens = Vec::new();
        while self.eat_keyword("WHEN") {
            let condition = self.parse_expression()?;
            self.expect_keyword("THEN")?;
            let result = self.parse_expression()?;
            whens.push(WhenClause { condition, result });
        }
        if whens.is_empty() {
            return Err(ParseError::unexpected("WHEN", self.tokens.peek()));
        }

        let else_result = if self.eat_keyword("ELSE") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_keyword("END")?;

        Ok(Expr::Case(Arc::new(CaseExpr {
            operand,
            whens,
            else_result,
            location,
        })))
    }

    /// Parses the rest of `CAST(expr AS type)`.
    fn parse_cast(&mut self, location: Location) -> Result<Expr, ParseError> {
        self.expect_symbol("(")?;
        let expr = self.parse_expression()?;
        self.expect_keyword("AS")?;
        let data_type = Arc::new(self.parse_data_type()?);
        self.expect_symbol(")")?;
        Ok(Expr::Cast(Arc::new(CastExpr {
            expr,
            data_type,
            shorthand: false,
            location,
        })))
    }

    /// Parses a type name with optional arguments.
    ///
    /// Type names are ordinary identifiers; `DOUBLE PRECISION` and
    /// `CHARACTER VARYING` are the two-word forms accepted.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let token = self.tokens.next();
        if !matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword) {
            self.tokens.put_back(token.clone());
            return Err(ParseError::unexpected("data type", token));
        }
        let mut name = token.value;
        if name.eq_ignore_ascii_case("DOUBLE") && self.eat_word("PRECISION") {
            name.push_str(" PRECISION");
        } else if (name.eq_ignore_ascii_case("CHARACTER") || name.eq_ignore_ascii_case("CHAR"))
            && self.eat_word("VARYING")
        {
            name.push_str(" VARYING");
        }

        let mut data_type = DataType::new(name, token.location);
        if self.eat_symbol("(") {
            data_type.args = self.parse_comma_separated(|p| {
                let arg = p.tokens.next();
                match arg.kind {
                    TokenKind::Number | TokenKind::Identifier | TokenKind::Keyword => Ok(arg.value),
                    _ => {
                        p.tokens.put_back(arg.clone());
                        Err(ParseError::unexpected("type argument", arg))
                    }
                }
            })?;
            self.expect_symbol(")")?;
        }
        Ok(data_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expr, Number, Statement, UnaryOp};
    use crate::dialect::StandardDialect;
    use crate::parser::Parser;

    fn expr(sql: &str) -> Expr {
        Parser::new(sql, &StandardDialect)
            .parse_expression()
            .expect("expression parses")
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        let Expr::Infix(add) = expr("1 + 2 * 3") else {
            panic!("expected infix");
        };
        assert_eq!(add.op, BinaryOp::Add);
        let Expr::Infix(mul) = &add.right else {
            panic!("expected infix on the right");
        };
        assert_eq!(mul.op, BinaryOp::Mul);
    }

    #[test]
    fn test_left_associative() {
        let Expr::Infix(sub) = expr("10 - 4 - 3") else {
            panic!("expected infix");
        };
        assert!(matches!(&sub.left, Expr::Infix(inner) if inner.op == BinaryOp::Sub));
        assert_eq!(sub.right.as_number(), Some(Number::Int(3)));
    }

    #[test]
    fn test_negative_operand() {
        let Expr::Infix(add) = expr("1 + 2 * -3") else {
            panic!("expected infix");
        };
        let Expr::Infix(mul) = &add.right else {
            panic!("expected infix on the right");
        };
        let Expr::Prefix(neg) = &mul.right else {
            panic!("expected prefix");
        };
        assert_eq!(neg.op, UnaryOp::Neg);
        assert_eq!(neg.operand.as_number(), Some(Number::Int(3)));
    }

    #[test]
    fn test_not_between() {
        let Expr::Between(between) = expr("a NOT BETWEEN 1 AND 5") else {
            panic!("expected between");
        };
        assert!(between.negated);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let Expr::Infix(or) = expr("a = 1 OR b = 2 AND c = 3") else {
            panic!("expected infix");
        };
        assert_eq!(or.op, BinaryOp::Or);
        assert!(matches!(&or.right, Expr::Infix(and) if and.op == BinaryOp::And));
    }

    #[test]
    fn test_case_as_operand() {
        let Expr::Infix(add) = expr("1 + CASE WHEN a = 1 THEN 2 ELSE 3 END") else {
            panic!("expected infix");
        };
        assert!(matches!(add.right, Expr::Case(_)));
    }

    #[test]
    fn test_numeric_overflow_is_error() {
        let digits = "9".repeat(40);
        let err = Parser::new(&digits, &StandardDialect)
            .parse_expression()
            .expect_err("too many digits");
        assert!(err.message.contains("exceeds 38 digits"));
    }

    #[test]
    fn test_in_subquery() {
        let Expr::In(in_expr) = expr("a IN (SELECT b FROM t)") else {
            panic!("expected in");
        };
        assert!(matches!(in_expr.values, crate::ast::InValues::Subquery(_)));
    }

    #[test]
    fn test_quantified_comparison() {
        assert!(matches!(
            expr("a > ALL (SELECT b FROM t)"),
            Expr::Quantified(_)
        ));
    }

    #[test]
    fn test_count_star() {
        let Expr::Function(call) = expr("COUNT(*)") else {
            panic!("expected function");
        };
        assert!(matches!(call.args[0], Expr::Wildcard(_)));
    }

    #[test]
    fn test_window_function() {
        let Expr::Over(over) = expr("ROW_NUMBER() OVER (PARTITION BY a ORDER BY b DESC)") else {
            panic!("expected over");
        };
        assert_eq!(over.partition_by.len(), 1);
        assert_eq!(over.order_by.len(), 1);
    }

    #[test]
    fn test_scalar_subquery_in_select() {
        let list = crate::parser::parse_with("SELECT (SELECT 1)", &StandardDialect)
            .expect("parses");
        let Statement::Select(select) = &list.statements[0] else {
            panic!("expected select");
        };
        assert!(matches!(select.columns[0], Expr::Subquery(_)));
    }
}
