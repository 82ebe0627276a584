//! Clause-level AST types shared by several statements.

use std::sync::Arc;

use super::{ColumnDef, DataType, Expr, Identifier, List, Node, Paren, Query, Same};
use crate::lexer::Location;

/// `AS name [(column, ...)]` after a table source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    pub name: Identifier,
    pub columns: Vec<Identifier>,
}

/// A named table, table variable or table-valued function in FROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    /// An [`Expr::Identifier`], [`Expr::Variable`] or [`Expr::Function`].
    pub target: Expr,
    pub alias: Option<TableAlias>,
    pub location: Location,
}

impl TableReference {
    /// Returns the name other clauses use to refer to this source.
    #[must_use]
    pub fn exposed_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(&alias.name.value);
        }
        match &self.target {
            Expr::Identifier(id) => Some(id.name()),
            Expr::Variable(v) => Some(&v.name),
            Expr::Function(f) => Some(f.name.name()),
            _ => None,
        }
    }
}

/// `(SELECT ...) AS alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTable {
    pub subquery: Arc<Paren<Query>>,
    pub alias: Option<TableAlias>,
    pub location: Location,
}

/// The kind of a join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    CrossApply,
    OuterApply,
}

impl JoinKind {
    /// Returns true if the join takes an `ON` condition.
    #[must_use]
    pub const fn has_condition(&self) -> bool {
        matches!(self, Self::Inner | Self::Left | Self::Right | Self::Full)
    }
}

/// A join operator and the keywords it was written with, e.g.
/// `LEFT OUTER JOIN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOperator {
    pub kind: JoinKind,
    pub text: String,
}

/// `left operator right [ON condition]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub left: TableSource,
    pub operator: JoinOperator,
    pub right: TableSource,
    pub condition: Option<Expr>,
    pub location: Location,
}

/// One entry of a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Table(Arc<TableReference>),
    Derived(Arc<DerivedTable>),
    Join(Arc<Join>),
}

impl TableSource {
    /// Returns the location of the source's left-most token.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Table(t) => t.location,
            Self::Derived(d) => d.location,
            Self::Join(j) => j.location,
        }
    }
}

impl Same for TableSource {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Table(a), Self::Table(b)) => a.same(b),
            (Self::Derived(a), Self::Derived(b)) => a.same(b),
            (Self::Join(a), Self::Join(b)) => a.same(b),
            _ => false,
        }
    }
}

impl Node for TableReference {
    fn same_as(&self, other: &Self) -> bool {
        self.alias == other.alias && self.target.same(&other.target)
    }
}

impl Node for DerivedTable {
    fn same_as(&self, other: &Self) -> bool {
        self.alias == other.alias && self.subquery.same(&other.subquery)
    }
}

impl Node for Join {
    fn same_as(&self, other: &Self) -> bool {
        self.operator == other.operator
            && self.left.same(&other.left)
            && self.right.same(&other.right)
            && self.condition.same(&other.condition)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `expr [ASC|DESC]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
}

impl Same for OrderItem {
    fn same(&self, other: &Self) -> bool {
        self.direction == other.direction && self.expr.same(&other.expr)
    }
}

/// `TOP (n) [PERCENT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopClause {
    pub count: Expr,
    pub percent: bool,
    pub location: Location,
}

impl Node for TopClause {
    fn same_as(&self, other: &Self) -> bool {
        self.percent == other.percent && self.count.same(&other.count)
    }
}

/// A row limit, independent of how a dialect spells it
/// (`OFFSET .. FETCH` or `LIMIT .. OFFSET`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLimit {
    pub offset: Option<Expr>,
    pub count: Option<Expr>,
    pub location: Location,
}

impl Node for RowLimit {
    fn same_as(&self, other: &Self) -> bool {
        self.offset.same(&other.offset) && self.count.same(&other.count)
    }
}

/// The operator of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=` or `:=`
    Assign,
    /// `+=`, `-=` and friends.
    Compound(super::BinaryOp),
}

/// `target = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// A column identifier or a variable.
    pub target: Expr,
    pub op: AssignOp,
    pub value: Expr,
}

impl Same for Assignment {
    fn same(&self, other: &Self) -> bool {
        self.op == other.op && self.target.same(&other.target) && self.value.same(&other.value)
    }
}

/// `name [(columns)] AS (query)` inside WITH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cte {
    pub name: Identifier,
    pub columns: Vec<Identifier>,
    pub query: Arc<Paren<Query>>,
    /// Whether the query refers to the CTE's own name.
    pub recursive: bool,
    pub location: Location,
}

impl Node for Cte {
    fn same_as(&self, other: &Self) -> bool {
        self.name == other.name
            && self.columns == other.columns
            && self.recursive == other.recursive
            && self.query.same(&other.query)
    }
}

/// `BY SOURCE` / `BY TARGET` after `WHEN NOT MATCHED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeScope {
    Source,
    Target,
}

impl MergeScope {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Target => "TARGET",
        }
    }
}

/// The action of a MERGE WHEN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// `UPDATE SET ...`
    Update(Vec<Assignment>),
    /// `DELETE`
    Delete,
    /// `INSERT [(columns)] VALUES (...)`; `values` is `None` for
    /// `DEFAULT VALUES`.
    Insert {
        columns: Vec<Identifier>,
        values: Option<Arc<Paren<List<Expr>>>>,
    },
}

impl Same for MergeAction {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Update(a), Self::Update(b)) => a.same(b),
            (Self::Delete, Self::Delete) => true,
            (
                Self::Insert {
                    columns: a_columns,
                    values: a,
                },
                Self::Insert {
                    columns: b_columns,
                    values: b,
                },
            ) => a_columns == b_columns && a.same(b),
            _ => false,
        }
    }
}

/// `WHEN [NOT] MATCHED [BY SOURCE|TARGET] [AND condition] THEN action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWhen {
    pub matched: bool,
    pub scope: Option<MergeScope>,
    pub condition: Option<Expr>,
    pub action: MergeAction,
    pub location: Location,
}

impl Node for MergeWhen {
    fn same_as(&self, other: &Self) -> bool {
        self.matched == other.matched
            && self.scope == other.scope
            && self.condition.same(&other.condition)
            && self.action.same(&other.action)
    }
}

/// One variable in a DECLARE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// An [`Expr::Variable`], or an [`Expr::Identifier`] in dialects
    /// without a variable sigil.
    pub name: Expr,
    /// The scalar type; `None` for table variables.
    pub data_type: Option<Arc<DataType>>,
    /// Columns of a `TABLE (...)` variable.
    pub table_columns: Option<Vec<ColumnDef>>,
    pub initial: Option<Expr>,
    pub location: Location,
}

impl Declaration {
    /// Returns the declared name as written, sigil included.
    #[must_use]
    pub fn declared_name(&self) -> String {
        match &self.name {
            Expr::Variable(v) => v.name.clone(),
            Expr::Identifier(id) => id.dotted(),
            _ => String::new(),
        }
    }

    /// Returns true for `DECLARE @t TABLE (...)`.
    #[must_use]
    pub const fn is_table(&self) -> bool {
        self.table_columns.is_some()
    }
}

impl Node for Declaration {
    fn same_as(&self, other: &Self) -> bool {
        self.table_columns == other.table_columns
            && self.name.same(&other.name)
            && self.data_type.same(&other.data_type)
            && self.initial.same(&other.initial)
    }
}

/// An argument of EXEC or CALL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureArg {
    /// Parameter name for named arguments.
    pub name: Option<Expr>,
    pub value: Expr,
    /// Whether the argument was marked `OUTPUT`.
    pub output: bool,
}

impl Same for ProcedureArg {
    fn same(&self, other: &Self) -> bool {
        self.output == other.output
            && self.name.same(&other.name)
            && self.value.same(&other.value)
    }
}

/// Set operators combining two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    Except,
    Intersect,
}

impl SetOperator {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
        }
    }
}

/// `UNION [ALL] right`, chained after a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub op: SetOperator,
    pub all: bool,
    pub right: Query,
    pub location: Location,
}

impl Node for Compound {
    fn same_as(&self, other: &Self) -> bool {
        self.op == other.op && self.all == other.all && self.right.same(&other.right)
    }
}
