//! Statement AST types.

use std::sync::Arc;

use super::{
    Annotation, Assignment, Compound, Cte, Declaration, Expr, Identifier, List, MergeWhen, Node,
    ObjectIdentifier, OrderItem, Paren, ProcedureArg, RowLimit, Same, TableReference, TableSource,
    TopClause,
};
use crate::lexer::{Location, Token};
use crate::resolve::SymbolTable;

/// A SELECT used as a sub-query.
pub type Query = Arc<SelectStatement>;

/// The symbol table the resolver attaches to a scope-owning node.
pub type Scope = Annotation<Arc<SymbolTable>>;

/// A sequence of statements; the root of every parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementList {
    pub statements: Vec<Statement>,
    /// Whether the list was written as `BEGIN ... END`.
    pub bracketed: bool,
    pub scope: Scope,
    pub location: Location,
}

impl StatementList {
    /// Creates a list.
    #[must_use]
    pub fn new(statements: Vec<Statement>, bracketed: bool, location: Location) -> Self {
        Self {
            statements,
            bracketed,
            scope: Annotation::new(),
            location,
        }
    }

    /// Returns the number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the list holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for StatementList {
    fn same_as(&self, other: &Self) -> bool {
        self.bracketed == other.bracketed && self.statements.same(&other.statements)
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub distinct: bool,
    pub top: Option<Arc<TopClause>>,
    pub columns: List<Expr>,
    /// Comma separated FROM entries; joins nest inside an entry.
    pub from: Vec<TableSource>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Arc<RowLimit>>,
    /// A following `UNION`/`EXCEPT`/`INTERSECT` query.
    pub compound: Option<Arc<Compound>>,
    pub scope: Scope,
    pub location: Location,
}

impl Node for SelectStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.distinct == other.distinct
            && self.top.same(&other.top)
            && self.columns.same(&other.columns)
            && self.from.same(&other.from)
            && self.where_clause.same(&other.where_clause)
            && self.group_by.same(&other.group_by)
            && self.having.same(&other.having)
            && self.order_by.same(&other.order_by)
            && self.limit.same(&other.limit)
            && self.compound.same(&other.compound)
    }
}

/// Where INSERT takes its rows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    /// `VALUES (...), (...)`
    Values(Vec<Arc<Paren<List<Expr>>>>),
    /// `SELECT ...`
    Query(Query),
    /// `DEFAULT VALUES`
    DefaultValues,
}

impl Same for InsertSource {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Values(a), Self::Values(b)) => a.same(b),
            (Self::Query(a), Self::Query(b)) => a.same(b),
            (Self::DefaultValues, Self::DefaultValues) => true,
            _ => false,
        }
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    /// An [`Expr::Identifier`] or a table [`Expr::Variable`].
    pub target: Expr,
    pub columns: Vec<Identifier>,
    pub source: InsertSource,
    pub scope: Scope,
    pub location: Location,
}

impl Node for InsertStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.target.same(&other.target)
            && self.source.same(&other.source)
    }
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub top: Option<Arc<TopClause>>,
    pub target: Arc<TableReference>,
    pub assignments: Vec<Assignment>,
    pub from: Vec<TableSource>,
    pub where_clause: Option<Expr>,
    pub scope: Scope,
    pub location: Location,
}

impl Node for UpdateStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.top.same(&other.top)
            && self.target.same(&other.target)
            && self.assignments.same(&other.assignments)
            && self.from.same(&other.from)
            && self.where_clause.same(&other.where_clause)
    }
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    pub top: Option<Arc<TopClause>>,
    pub target: Arc<TableReference>,
    pub from: Vec<TableSource>,
    pub where_clause: Option<Expr>,
    pub scope: Scope,
    pub location: Location,
}

impl Node for DeleteStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.top.same(&other.top)
            && self.target.same(&other.target)
            && self.from.same(&other.from)
            && self.where_clause.same(&other.where_clause)
    }
}

/// A MERGE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatement {
    pub target: Arc<TableReference>,
    /// A table reference or derived table after `USING`.
    pub source: TableSource,
    pub condition: Expr,
    pub clauses: Vec<Arc<MergeWhen>>,
    pub scope: Scope,
    pub location: Location,
}

impl Node for MergeStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.target.same(&other.target)
            && self.source.same(&other.source)
            && self.condition.same(&other.condition)
            && self.clauses.same(&other.clauses)
    }
}

/// `WITH cte, ... statement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithStatement {
    pub ctes: Vec<Arc<Cte>>,
    pub body: Statement,
    pub scope: Scope,
    pub location: Location,
}

impl WithStatement {
    /// Returns true if any CTE refers to itself.
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.ctes.iter().any(|cte| cte.recursive)
    }
}

impl Node for WithStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.ctes.same(&other.ctes) && self.body.same(&other.body)
    }
}

/// `IF condition statement [ELSE statement]`.
///
/// Block-form `IF .. THEN .. END IF` stores unbracketed statement lists
/// as its branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    pub condition: Expr,
    pub then_branch: Statement,
    pub else_branch: Option<Statement>,
    pub location: Location,
}

impl Node for IfStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.condition.same(&other.condition)
            && self.then_branch.same(&other.then_branch)
            && self.else_branch.same(&other.else_branch)
    }
}

/// `DECLARE declaration, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclareStatement {
    pub declarations: Vec<Arc<Declaration>>,
    pub location: Location,
}

impl Node for DeclareStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.declarations.same(&other.declarations)
    }
}

/// What a SET statement does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetBody {
    /// `SET @x = 1`, or `x := 1` in dialects without SET.
    Assign(Assignment),
    /// A session option, e.g. `SET NOCOUNT ON` or `SET search_path = public`.
    Option { name: Identifier, value: Expr },
}

impl Same for SetBody {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Assign(a), Self::Assign(b)) => a.same(b),
            (
                Self::Option {
                    name: a_name,
                    value: a,
                },
                Self::Option {
                    name: b_name,
                    value: b,
                },
            ) => a_name == b_name && a.same(b),
            _ => false,
        }
    }
}

/// A SET statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatement {
    pub body: SetBody,
    pub location: Location,
}

impl Node for SetStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.body.same(&other.body)
    }
}

/// `EXEC [@status =] procedure args` or `CALL procedure(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteStatement {
    pub return_status: Option<Expr>,
    pub procedure: Arc<ObjectIdentifier>,
    pub args: Vec<ProcedureArg>,
    pub location: Location,
}

impl Node for ExecuteStatement {
    fn same_as(&self, other: &Self) -> bool {
        self.return_status.same(&other.return_status)
            && self.procedure.same(&other.procedure)
            && self.args.same(&other.args)
    }
}

/// A statement the grammar does not model, kept as raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatement {
    pub tokens: Vec<Token>,
    pub location: Location,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(Query),
    Insert(Arc<InsertStatement>),
    Update(Arc<UpdateStatement>),
    Delete(Arc<DeleteStatement>),
    Merge(Arc<MergeStatement>),
    With(Arc<WithStatement>),
    If(Arc<IfStatement>),
    Declare(Arc<DeclareStatement>),
    Set(Arc<SetStatement>),
    Execute(Arc<ExecuteStatement>),
    Block(Arc<StatementList>),
    Unknown(Arc<UnknownStatement>),
}

impl Statement {
    /// Returns the location of the statement's first token.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Select(s) => s.location,
            Self::Insert(s) => s.location,
            Self::Update(s) => s.location,
            Self::Delete(s) => s.location,
            Self::Merge(s) => s.location,
            Self::With(s) => s.location,
            Self::If(s) => s.location,
            Self::Declare(s) => s.location,
            Self::Set(s) => s.location,
            Self::Execute(s) => s.location,
            Self::Block(s) => s.location,
            Self::Unknown(s) => s.location,
        }
    }
}

impl Same for Statement {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Select(a), Self::Select(b)) => a.same(b),
            (Self::Insert(a), Self::Insert(b)) => a.same(b),
            (Self::Update(a), Self::Update(b)) => a.same(b),
            (Self::Delete(a), Self::Delete(b)) => a.same(b),
            (Self::Merge(a), Self::Merge(b)) => a.same(b),
            (Self::With(a), Self::With(b)) => a.same(b),
            (Self::If(a), Self::If(b)) => a.same(b),
            (Self::Declare(a), Self::Declare(b)) => a.same(b),
            (Self::Set(a), Self::Set(b)) => a.same(b),
            (Self::Execute(a), Self::Execute(b)) => a.same(b),
            (Self::Block(a), Self::Block(b)) => a.same(b),
            (Self::Unknown(a), Self::Unknown(b)) => a.same(b),
            _ => false,
        }
    }
}
