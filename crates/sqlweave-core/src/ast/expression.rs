//! Expression AST types.

use std::sync::Arc;

use super::{Annotation, DataType, List, Node, Number, OrderItem, Paren, Query, Same};
use crate::lexer::Location;
use crate::resolve::Binding;

/// Most parts an object identifier may have (`server.database.schema.name`).
pub const MAX_IDENTIFIER_PARTS: usize = 4;

/// A single name, possibly written with delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name without delimiters, in source casing.
    pub value: String,
    /// Whether the name was written as `[name]` or `"name"`.
    pub quoted: bool,
    /// Source location.
    pub location: Location,
}

impl Identifier {
    /// Creates an undelimited identifier.
    #[must_use]
    pub fn new(value: impl Into<String>, location: Location) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            location,
        }
    }

    /// Returns true if the identifier names `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.value.eq_ignore_ascii_case(name)
    }
}

/// A dotted object name of up to [`MAX_IDENTIFIER_PARTS`] parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    /// The parts, outermost qualifier first.
    pub parts: Vec<Identifier>,
    /// The symbol this name resolved to.
    pub binding: Annotation<Binding>,
    /// Location of the first part.
    pub location: Location,
}

impl ObjectIdentifier {
    /// Creates an object identifier from its parts.
    #[must_use]
    pub fn new(parts: Vec<Identifier>) -> Self {
        let location = parts.first().map(|p| p.location).unwrap_or_default();
        Self {
            parts,
            binding: Annotation::new(),
            location,
        }
    }

    /// Creates a single-part identifier.
    #[must_use]
    pub fn single(name: impl Into<String>, location: Location) -> Self {
        Self::new(vec![Identifier::new(name, location)])
    }

    /// Returns the last part, the object's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.parts.last().map_or("", |p| p.value.as_str())
    }

    /// Returns the parts before the name.
    #[must_use]
    pub fn qualifier(&self) -> &[Identifier] {
        &self.parts[..self.parts.len().saturating_sub(1)]
    }

    /// Returns true for an unqualified name.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.parts.len() == 1
    }

    /// Returns the dotted name as written, without delimiters.
    #[must_use]
    pub fn dotted(&self) -> String {
        join_parts(&self.parts)
    }
}

/// Joins identifier parts with dots.
pub(crate) fn join_parts(parts: &[Identifier]) -> String {
    parts
        .iter()
        .map(|p| p.value.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// A sigil-prefixed variable reference such as `@total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The name including its sigil.
    pub name: String,
    /// The symbol this variable resolved to.
    pub binding: Annotation<Binding>,
    /// Source location.
    pub location: Location,
}

impl Variable {
    /// Creates a variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            binding: Annotation::new(),
            location,
        }
    }

    /// Returns true for `@@name` system variables.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.name.starts_with("@@")
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // String and bitwise
    Concat,
    BitAnd,
    BitOr,
    BitXor,

    // Comparison
    Eq,
    /// `<>`
    NotEq,
    /// `!=`
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `!<`
    NotLt,
    /// `!>`
    NotGt,
    Like,
    NotLike,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::BangEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::NotLt => "!<",
            Self::NotGt => "!>",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Maps a multiplicative symbol.
    #[must_use]
    pub fn multiplicative(symbol: &str) -> Option<Self> {
        match symbol {
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "%" => Some(Self::Mod),
            _ => None,
        }
    }

    /// Maps an additive symbol.
    #[must_use]
    pub fn additive(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "||" => Some(Self::Concat),
            "&" => Some(Self::BitAnd),
            "|" => Some(Self::BitOr),
            "^" => Some(Self::BitXor),
            _ => None,
        }
    }

    /// Maps a comparison symbol.
    #[must_use]
    pub fn comparison(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Eq),
            "<>" => Some(Self::NotEq),
            "!=" => Some(Self::BangEq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::LtEq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::GtEq),
            "!<" => Some(Self::NotLt),
            "!>" => Some(Self::NotGt),
            _ => None,
        }
    }

    /// Maps a compound assignment symbol such as `+=` to its operator.
    #[must_use]
    pub fn compound_assignment(symbol: &str) -> Option<Self> {
        let op = symbol.strip_suffix('=')?;
        match op {
            "+" | "-" | "&" | "|" | "^" => Self::additive(op),
            "*" | "/" | "%" => Self::multiplicative(op),
            _ => None,
        }
    }

    /// Returns true for `+ - * / %`.
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    /// `NOT`
    Not,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::Not => "NOT",
        }
    }
}

/// Quantifier of a comparison against a sub-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
    Some,
}

impl Quantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::Some => "SOME",
        }
    }
}

/// `left op right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfixExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
    pub location: Location,
}

/// `op operand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub location: Location,
}

/// `expr [NOT] BETWEEN low AND high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetweenExpr {
    pub expr: Expr,
    pub negated: bool,
    pub low: Expr,
    pub high: Expr,
    pub location: Location,
}

/// The right-hand side of `IN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InValues {
    /// `(1, 2, 3)`
    List(Arc<Paren<List<Expr>>>),
    /// `(SELECT ...)`
    Subquery(Arc<Paren<Query>>),
}

impl Same for InValues {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a.same(b),
            (Self::Subquery(a), Self::Subquery(b)) => a.same(b),
            _ => false,
        }
    }
}

/// `expr [NOT] IN (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InExpr {
    pub expr: Expr,
    pub negated: bool,
    pub values: InValues,
    pub location: Location,
}

/// `expr IS [NOT] NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsNullExpr {
    pub expr: Expr,
    pub negated: bool,
    pub location: Location,
}

/// `EXISTS (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsExpr {
    pub subquery: Arc<Paren<Query>>,
    pub location: Location,
}

/// `left op ALL|ANY|SOME (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantifiedExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub quantifier: Quantifier,
    pub subquery: Arc<Paren<Query>>,
    pub location: Location,
}

/// One `WHEN condition THEN result` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

impl Same for WhenClause {
    fn same(&self, other: &Self) -> bool {
        self.condition.same(&other.condition) && self.result.same(&other.result)
    }
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpr {
    pub operand: Option<Expr>,
    pub whens: Vec<WhenClause>,
    pub else_result: Option<Expr>,
    pub location: Location,
}

/// `CAST(expr AS type)`, or `expr::type` when `shorthand` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub expr: Expr,
    pub data_type: Arc<DataType>,
    pub shorthand: bool,
    pub location: Location,
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The function name.
    pub name: Arc<ObjectIdentifier>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The arguments.
    pub args: List<Expr>,
    pub location: Location,
}

/// `function OVER (PARTITION BY ... ORDER BY ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverExpr {
    pub function: Expr,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderItem>,
    pub location: Location,
}

/// `expr AS alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasExpr {
    pub expr: Expr,
    pub alias: Identifier,
    pub location: Location,
}

/// A numeric literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    pub value: Number,
    pub location: Location,
}

/// A string literal; `value` holds the unescaped contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub location: Location,
}

/// The `NULL` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullLiteral {
    pub location: Location,
}

/// A keyword used as a value, e.g. `DEFAULT` or `CURRENT_TIMESTAMP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordValue {
    pub keyword: String,
    pub location: Location,
}

/// `*` or `qualifier.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wildcard {
    pub qualifier: Option<Arc<ObjectIdentifier>>,
    pub location: Location,
}

/// An SQL expression.
///
/// Every variant holds its node behind an [`Arc`], so cloning an
/// expression is cheap and rewrites can share untouched subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Infix(Arc<InfixExpr>),
    Prefix(Arc<PrefixExpr>),
    Between(Arc<BetweenExpr>),
    In(Arc<InExpr>),
    IsNull(Arc<IsNullExpr>),
    Exists(Arc<ExistsExpr>),
    Quantified(Arc<QuantifiedExpr>),
    Case(Arc<CaseExpr>),
    Cast(Arc<CastExpr>),
    Function(Arc<FunctionCall>),
    Over(Arc<OverExpr>),
    Paren(Arc<Paren<Expr>>),
    Subquery(Arc<Paren<Query>>),
    Alias(Arc<AliasExpr>),
    Identifier(Arc<ObjectIdentifier>),
    Variable(Arc<Variable>),
    Number(Arc<NumberLiteral>),
    String(Arc<StringLiteral>),
    Null(Arc<NullLiteral>),
    Keyword(Arc<KeywordValue>),
    Wildcard(Arc<Wildcard>),
}

impl Expr {
    /// Returns the location of the expression's left-most token.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Infix(e) => e.location,
            Self::Prefix(e) => e.location,
            Self::Between(e) => e.location,
            Self::In(e) => e.location,
            Self::IsNull(e) => e.location,
            Self::Exists(e) => e.location,
            Self::Quantified(e) => e.location,
            Self::Case(e) => e.location,
            Self::Cast(e) => e.location,
            Self::Function(e) => e.location,
            Self::Over(e) => e.location,
            Self::Paren(e) => e.location,
            Self::Subquery(e) => e.location,
            Self::Alias(e) => e.location,
            Self::Identifier(e) => e.location,
            Self::Variable(e) => e.location,
            Self::Number(e) => e.location,
            Self::String(e) => e.location,
            Self::Null(e) => e.location,
            Self::Keyword(e) => e.location,
            Self::Wildcard(e) => e.location,
        }
    }

    /// Creates a numeric literal.
    #[must_use]
    pub fn number(value: Number, location: Location) -> Self {
        Self::Number(Arc::new(NumberLiteral { value, location }))
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>, location: Location) -> Self {
        Self::String(Arc::new(StringLiteral {
            value: value.into(),
            location,
        }))
    }

    /// Creates a single-part identifier reference.
    #[must_use]
    pub fn identifier(name: impl Into<String>, location: Location) -> Self {
        Self::Identifier(Arc::new(ObjectIdentifier::single(name, location)))
    }

    /// Creates a variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>, location: Location) -> Self {
        Self::Variable(Arc::new(Variable::new(name, location)))
    }

    /// Creates an infix expression located at its left operand.
    #[must_use]
    pub fn infix(left: Self, op: BinaryOp, right: Self) -> Self {
        let location = left.location();
        Self::Infix(Arc::new(InfixExpr {
            left,
            op,
            right,
            location,
        }))
    }

    /// Returns the numeric value of a literal.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(n.value),
            _ => None,
        }
    }

    /// Returns true for an unqualified identifier or a variable, the
    /// shapes assignment targets take.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        match self {
            Self::Variable(_) => true,
            Self::Identifier(id) => id.parts.len() <= 2,
            _ => false,
        }
    }
}

impl Same for Expr {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Infix(a), Self::Infix(b)) => a.same(b),
            (Self::Prefix(a), Self::Prefix(b)) => a.same(b),
            (Self::Between(a), Self::Between(b)) => a.same(b),
            (Self::In(a), Self::In(b)) => a.same(b),
            (Self::IsNull(a), Self::IsNull(b)) => a.same(b),
            (Self::Exists(a), Self::Exists(b)) => a.same(b),
            (Self::Quantified(a), Self::Quantified(b)) => a.same(b),
            (Self::Case(a), Self::Case(b)) => a.same(b),
            (Self::Cast(a), Self::Cast(b)) => a.same(b),
            (Self::Function(a), Self::Function(b)) => a.same(b),
            (Self::Over(a), Self::Over(b)) => a.same(b),
            (Self::Paren(a), Self::Paren(b)) => a.same(b),
            (Self::Subquery(a), Self::Subquery(b)) => a.same(b),
            (Self::Alias(a), Self::Alias(b)) => a.same(b),
            (Self::Identifier(a), Self::Identifier(b)) => a.same(b),
            (Self::Variable(a), Self::Variable(b)) => a.same(b),
            (Self::Number(a), Self::Number(b)) => a.same(b),
            (Self::String(a), Self::String(b)) => a.same(b),
            (Self::Null(a), Self::Null(b)) => a.same(b),
            (Self::Keyword(a), Self::Keyword(b)) => a.same(b),
            (Self::Wildcard(a), Self::Wildcard(b)) => a.same(b),
            _ => false,
        }
    }
}

impl Node for InfixExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.op == other.op && self.left.same(&other.left) && self.right.same(&other.right)
    }
}

impl Node for PrefixExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.op == other.op && self.operand.same(&other.operand)
    }
}

impl Node for BetweenExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.negated == other.negated
            && self.expr.same(&other.expr)
            && self.low.same(&other.low)
            && self.high.same(&other.high)
    }
}

impl Node for InExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.negated == other.negated
            && self.expr.same(&other.expr)
            && self.values.same(&other.values)
    }
}

impl Node for IsNullExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.negated == other.negated && self.expr.same(&other.expr)
    }
}

impl Node for ExistsExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.subquery.same(&other.subquery)
    }
}

impl Node for QuantifiedExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.op == other.op
            && self.quantifier == other.quantifier
            && self.left.same(&other.left)
            && self.subquery.same(&other.subquery)
    }
}

impl Node for CaseExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.operand.same(&other.operand)
            && self.whens.same(&other.whens)
            && self.else_result.same(&other.else_result)
    }
}

impl Node for CastExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.shorthand == other.shorthand
            && self.expr.same(&other.expr)
            && self.data_type.same(&other.data_type)
    }
}

impl Node for FunctionCall {
    fn same_as(&self, other: &Self) -> bool {
        self.distinct == other.distinct
            && self.name.same(&other.name)
            && self.args.same(&other.args)
    }
}

impl Node for OverExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.function.same(&other.function)
            && self.partition_by.same(&other.partition_by)
            && self.order_by.same(&other.order_by)
    }
}

impl Node for AliasExpr {
    fn same_as(&self, other: &Self) -> bool {
        self.alias == other.alias && self.expr.same(&other.expr)
    }
}

impl Node for Wildcard {
    fn same_as(&self, other: &Self) -> bool {
        self.qualifier.same(&other.qualifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one() -> Expr {
        Expr::number(Number::Int(1), Location::default())
    }

    #[test]
    fn test_infix_location_is_left_operand() {
        let left = Expr::identifier("a", Location::new(1, 8));
        let expr = Expr::infix(left, BinaryOp::Eq, one());
        assert_eq!(expr.location().position(), (1, 8));
    }

    #[test]
    fn test_update_shares_unchanged_subtree() {
        let Expr::Infix(infix) = Expr::infix(one(), BinaryOp::Add, one()) else {
            unreachable!()
        };
        let next = InfixExpr {
            left: infix.left.clone(),
            right: infix.right.clone(),
            ..(*infix).clone()
        };
        assert!(Arc::ptr_eq(&InfixExpr::update(&infix, next), &infix));

        let changed = InfixExpr {
            right: one(),
            ..(*infix).clone()
        };
        assert!(!Arc::ptr_eq(&InfixExpr::update(&infix, changed), &infix));

        let changed_op = InfixExpr {
            op: BinaryOp::Sub,
            ..(*infix).clone()
        };
        let updated = InfixExpr::update(&infix, changed_op);
        assert!(!Arc::ptr_eq(&updated, &infix));
        assert_eq!(updated.op, BinaryOp::Sub);
    }

    #[test]
    fn test_same_is_identity_not_equality() {
        let a = one();
        assert!(a.same(&a.clone()));
        assert!(!a.same(&one()));
        assert_eq!(a, one());
    }

    #[test]
    fn test_operator_tables() {
        assert_eq!(BinaryOp::compound_assignment("+="), Some(BinaryOp::Add));
        assert_eq!(BinaryOp::compound_assignment("%="), Some(BinaryOp::Mod));
        assert_eq!(BinaryOp::compound_assignment("<="), None);
        assert_eq!(BinaryOp::comparison("!<"), Some(BinaryOp::NotLt));
        assert_eq!(BinaryOp::additive("||"), Some(BinaryOp::Concat));
    }

    #[test]
    fn test_object_identifier_parts() {
        let id = ObjectIdentifier::new(vec![
            Identifier::new("dbo", Location::new(1, 1)),
            Identifier::new("Users", Location::new(1, 5)),
        ]);
        assert_eq!(id.name(), "Users");
        assert_eq!(id.qualifier().len(), 1);
        assert_eq!(id.dotted(), "dbo.Users");
        assert!(!id.is_single());
    }
}
