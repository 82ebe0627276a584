//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Nodes are immutable once built. Children sit behind [`std::sync::Arc`]
//! so rewrites share every subtree they leave untouched, see [`Node`].

mod annotation;
mod clause;
mod expression;
mod node;
mod number;
mod statement;
mod types;

pub use annotation::Annotation;
pub use clause::{
    AssignOp, Assignment, Compound, Cte, Declaration, DerivedTable, Join, JoinKind, JoinOperator,
    MergeAction, MergeScope, MergeWhen, OrderDirection, OrderItem, ProcedureArg, RowLimit,
    SetOperator, TableAlias, TableReference, TableSource, TopClause,
};
pub(crate) use expression::join_parts;
pub use expression::{
    AliasExpr, BetweenExpr, BinaryOp, CaseExpr, CastExpr, ExistsExpr, Expr, FunctionCall,
    Identifier, InExpr, InValues, InfixExpr, IsNullExpr, KeywordValue, NullLiteral, NumberLiteral,
    ObjectIdentifier, OverExpr, PrefixExpr, QuantifiedExpr, Quantifier, StringLiteral, UnaryOp,
    Variable, WhenClause, Wildcard, MAX_IDENTIFIER_PARTS,
};
pub use node::{List, Node, Paren, Same};
pub use number::{Decimal, Number, NumberKind, MAX_PRECISION};
pub use statement::{
    DeleteStatement, ExecuteStatement, IfStatement, DeclareStatement, InsertSource,
    InsertStatement, MergeStatement, Query, Scope, SelectStatement, SetBody, SetStatement,
    Statement, StatementList, UnknownStatement, UpdateStatement, WithStatement,
};
pub use types::{ColumnDef, DataType};
