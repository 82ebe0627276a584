//! Copy-on-write tree rewriting.

use std::sync::Arc;

use crate::ast::{
    AliasExpr, Assignment, BetweenExpr, CaseExpr, CastExpr, Compound, Cte, Declaration,
    DeclareStatement, DeleteStatement, DerivedTable, ExecuteStatement, ExistsExpr, Expr,
    FunctionCall, IfStatement, InExpr, InValues, InfixExpr, InsertSource, InsertStatement,
    IsNullExpr, Join, List, MergeAction, MergeStatement, MergeWhen, Node, OrderItem, OverExpr,
    Paren, PrefixExpr, ProcedureArg, QuantifiedExpr, Query, RowLimit, SelectStatement, SetBody,
    SetStatement, Statement, StatementList, TableReference, TableSource, TopClause,
    UpdateStatement, WhenClause, WithStatement,
};

/// A tree rewrite.
///
/// Every method returns the node to use in place of its argument. The
/// defaults rebuild a node only when one of its children changed, so a
/// rewriter that changes nothing returns the input tree itself.
pub trait Rewriter: Sized {
    fn rewrite_statement_list(&mut self, list: &StatementList) -> StatementList {
        rewrite_statement_list(self, list)
    }

    fn rewrite_statement(&mut self, statement: &Statement) -> Statement {
        rewrite_statement(self, statement)
    }

    fn rewrite_query(&mut self, query: &Query) -> Query {
        rewrite_query(self, query)
    }

    fn rewrite_table_source(&mut self, source: &TableSource) -> TableSource {
        rewrite_table_source(self, source)
    }

    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        rewrite_expr(self, expr)
    }
}

pub fn rewrite_statement_list<R: Rewriter>(rewriter: &mut R, list: &StatementList) -> StatementList {
    StatementList {
        statements: list
            .statements
            .iter()
            .map(|s| rewriter.rewrite_statement(s))
            .collect(),
        bracketed: list.bracketed,
        scope: list.scope.clone(),
        location: list.location,
    }
}

pub fn rewrite_statement<R: Rewriter>(rewriter: &mut R, statement: &Statement) -> Statement {
    match statement {
        Statement::Select(query) => Statement::Select(rewriter.rewrite_query(query)),
        Statement::Insert(s) => Statement::Insert(InsertStatement::update(
            s,
            InsertStatement {
                target: rewriter.rewrite_expr(&s.target),
                source: match &s.source {
                    InsertSource::Values(rows) => InsertSource::Values(
                        rows.iter().map(|row| rewrite_row(rewriter, row)).collect(),
                    ),
                    InsertSource::Query(query) => InsertSource::Query(rewriter.rewrite_query(query)),
                    InsertSource::DefaultValues => InsertSource::DefaultValues,
                },
                ..(**s).clone()
            },
        )),
        Statement::Update(s) => Statement::Update(UpdateStatement::update(
            s,
            UpdateStatement {
                top: rewrite_top(rewriter, s.top.as_ref()),
                target: rewrite_table_reference(rewriter, &s.target),
                assignments: rewrite_assignments(rewriter, &s.assignments),
                from: rewrite_sources(rewriter, &s.from),
                where_clause: rewrite_option(rewriter, s.where_clause.as_ref()),
                ..(**s).clone()
            },
        )),
        Statement::Delete(s) => Statement::Delete(DeleteStatement::update(
            s,
            DeleteStatement {
                top: rewrite_top(rewriter, s.top.as_ref()),
                target: rewrite_table_reference(rewriter, &s.target),
                from: rewrite_sources(rewriter, &s.from),
                where_clause: rewrite_option(rewriter, s.where_clause.as_ref()),
                ..(**s).clone()
            },
        )),
        Statement::Merge(s) => Statement::Merge(MergeStatement::update(
            s,
            MergeStatement {
                target: rewrite_table_reference(rewriter, &s.target),
                source: rewriter.rewrite_table_source(&s.source),
                condition: rewriter.rewrite_expr(&s.condition),
                clauses: s
                    .clauses
                    .iter()
                    .map(|when| rewrite_merge_when(rewriter, when))
                    .collect(),
                ..(**s).clone()
            },
        )),
        Statement::With(s) => Statement::With(WithStatement::update(
            s,
            WithStatement {
                ctes: s.ctes.iter().map(|cte| rewrite_cte(rewriter, cte)).collect(),
                body: rewriter.rewrite_statement(&s.body),
                ..(**s).clone()
            },
        )),
        Statement::If(s) => Statement::If(IfStatement::update(
            s,
            IfStatement {
                condition: rewriter.rewrite_expr(&s.condition),
                then_branch: rewriter.rewrite_statement(&s.then_branch),
                else_branch: s
                    .else_branch
                    .as_ref()
                    .map(|branch| rewriter.rewrite_statement(branch)),
                location: s.location,
            },
        )),
        Statement::Declare(s) => Statement::Declare(DeclareStatement::update(
            s,
            DeclareStatement {
                declarations: s
                    .declarations
                    .iter()
                    .map(|declaration| rewrite_declaration(rewriter, declaration))
                    .collect(),
                location: s.location,
            },
        )),
        Statement::Set(s) => Statement::Set(SetStatement::update(
            s,
            SetStatement {
                body: match &s.body {
                    SetBody::Assign(assignment) => {
                        SetBody::Assign(rewrite_assignment(rewriter, assignment))
                    }
                    SetBody::Option { name, value } => SetBody::Option {
                        name: name.clone(),
                        value: rewriter.rewrite_expr(value),
                    },
                },
                location: s.location,
            },
        )),
        Statement::Execute(s) => Statement::Execute(ExecuteStatement::update(
            s,
            ExecuteStatement {
                return_status: rewrite_option(rewriter, s.return_status.as_ref()),
                args: s
                    .args
                    .iter()
                    .map(|arg| ProcedureArg {
                        value: rewriter.rewrite_expr(&arg.value),
                        ..arg.clone()
                    })
                    .collect(),
                ..(**s).clone()
            },
        )),
        Statement::Block(list) => {
            Statement::Block(StatementList::update(list, rewriter.rewrite_statement_list(list)))
        }
        Statement::Unknown(_) => statement.clone(),
    }
}

pub fn rewrite_query<R: Rewriter>(rewriter: &mut R, query: &Query) -> Query {
    SelectStatement::update(
        query,
        SelectStatement {
            top: rewrite_top(rewriter, query.top.as_ref()),
            columns: rewrite_list(rewriter, &query.columns),
            from: rewrite_sources(rewriter, &query.from),
            where_clause: rewrite_option(rewriter, query.where_clause.as_ref()),
            group_by: rewrite_exprs(rewriter, &query.group_by),
            having: rewrite_option(rewriter, query.having.as_ref()),
            order_by: rewrite_order_by(rewriter, &query.order_by),
            limit: query.limit.as_ref().map(|limit| {
                RowLimit::update(
                    limit,
                    RowLimit {
                        offset: rewrite_option(rewriter, limit.offset.as_ref()),
                        count: rewrite_option(rewriter, limit.count.as_ref()),
                        location: limit.location,
                    },
                )
            }),
            compound: query.compound.as_ref().map(|compound| {
                Compound::update(
                    compound,
                    Compound {
                        right: rewriter.rewrite_query(&compound.right),
                        ..(**compound).clone()
                    },
                )
            }),
            ..(**query).clone()
        },
    )
}

pub fn rewrite_table_source<R: Rewriter>(rewriter: &mut R, source: &TableSource) -> TableSource {
    match source {
        TableSource::Table(table) => TableSource::Table(rewrite_table_reference(rewriter, table)),
        TableSource::Derived(derived) => TableSource::Derived(DerivedTable::update(
            derived,
            DerivedTable {
                subquery: rewrite_subquery(rewriter, &derived.subquery),
                ..(**derived).clone()
            },
        )),
        TableSource::Join(join) => TableSource::Join(Join::update(
            join,
            Join {
                left: rewriter.rewrite_table_source(&join.left),
                right: rewriter.rewrite_table_source(&join.right),
                condition: rewrite_option(rewriter, join.condition.as_ref()),
                ..(**join).clone()
            },
        )),
    }
}

pub fn rewrite_expr<R: Rewriter>(rewriter: &mut R, expr: &Expr) -> Expr {
    match expr {
        Expr::Infix(e) => Expr::Infix(InfixExpr::update(
            e,
            InfixExpr {
                left: rewriter.rewrite_expr(&e.left),
                right: rewriter.rewrite_expr(&e.right),
                ..(**e).clone()
            },
        )),
        Expr::Prefix(e) => Expr::Prefix(PrefixExpr::update(
            e,
            PrefixExpr {
                operand: rewriter.rewrite_expr(&e.operand),
                ..(**e).clone()
            },
        )),
        Expr::Between(e) => Expr::Between(BetweenExpr::update(
            e,
            BetweenExpr {
                expr: rewriter.rewrite_expr(&e.expr),
                low: rewriter.rewrite_expr(&e.low),
                high: rewriter.rewrite_expr(&e.high),
                ..(**e).clone()
            },
        )),
        Expr::In(e) => Expr::In(InExpr::update(
            e,
            InExpr {
                expr: rewriter.rewrite_expr(&e.expr),
                values: match &e.values {
                    InValues::List(row) => InValues::List(rewrite_row(rewriter, row)),
                    InValues::Subquery(query) => {
                        InValues::Subquery(rewrite_subquery(rewriter, query))
                    }
                },
                ..(**e).clone()
            },
        )),
        Expr::IsNull(e) => Expr::IsNull(IsNullExpr::update(
            e,
            IsNullExpr {
                expr: rewriter.rewrite_expr(&e.expr),
                ..(**e).clone()
            },
        )),
        Expr::Exists(e) => Expr::Exists(ExistsExpr::update(
            e,
            ExistsExpr {
                subquery: rewrite_subquery(rewriter, &e.subquery),
                location: e.location,
            },
        )),
        Expr::Quantified(e) => Expr::Quantified(QuantifiedExpr::update(
            e,
            QuantifiedExpr {
                left: rewriter.rewrite_expr(&e.left),
                subquery: rewrite_subquery(rewriter, &e.subquery),
                ..(**e).clone()
            },
        )),
        Expr::Case(e) => Expr::Case(CaseExpr::update(
            e,
            CaseExpr {
                operand: rewrite_option(rewriter, e.operand.as_ref()),
                whens: e
                    .whens
                    .iter()
                    .map(|when| WhenClause {
                        condition: rewriter.rewrite_expr(&when.condition),
                        result: rewriter.rewrite_expr(&when.result),
                    })
                    .collect(),
                else_result: rewrite_option(rewriter, e.else_result.as_ref()),
                location: e.location,
            },
        )),
        Expr::Cast(e) => Expr::Cast(CastExpr::update(
            e,
            CastExpr {
                expr: rewriter.rewrite_expr(&e.expr),
                ..(**e).clone()
            },
        )),
        Expr::Function(call) => Expr::Function(FunctionCall::update(
            call,
            FunctionCall {
                args: rewrite_list(rewriter, &call.args),
                ..(**call).clone()
            },
        )),
        Expr::Over(e) => Expr::Over(OverExpr::update(
            e,
            OverExpr {
                function: rewriter.rewrite_expr(&e.function),
                partition_by: rewrite_exprs(rewriter, &e.partition_by),
                order_by: rewrite_order_by(rewriter, &e.order_by),
                location: e.location,
            },
        )),
        Expr::Paren(e) => Expr::Paren(Paren::update(
            e,
            Paren::new(rewriter.rewrite_expr(&e.inner), e.location),
        )),
        Expr::Subquery(query) => Expr::Subquery(rewrite_subquery(rewriter, query)),
        Expr::Alias(e) => Expr::Alias(AliasExpr::update(
            e,
            AliasExpr {
                expr: rewriter.rewrite_expr(&e.expr),
                ..(**e).clone()
            },
        )),
        Expr::Identifier(_)
        | Expr::Variable(_)
        | Expr::Number(_)
        | Expr::String(_)
        | Expr::Null(_)
        | Expr::Keyword(_)
        | Expr::Wildcard(_) => expr.clone(),
    }
}

fn rewrite_option<R: Rewriter>(rewriter: &mut R, expr: Option<&Expr>) -> Option<Expr> {
    expr.map(|e| rewriter.rewrite_expr(e))
}

fn rewrite_exprs<R: Rewriter>(rewriter: &mut R, exprs: &[Expr]) -> Vec<Expr> {
    exprs.iter().map(|e| rewriter.rewrite_expr(e)).collect()
}

fn rewrite_list<R: Rewriter>(rewriter: &mut R, list: &List<Expr>) -> List<Expr> {
    List::new(rewrite_exprs(rewriter, &list.items), list.location)
}

fn rewrite_row<R: Rewriter>(
    rewriter: &mut R,
    row: &Arc<Paren<List<Expr>>>,
) -> Arc<Paren<List<Expr>>> {
    Paren::update(row, Paren::new(rewrite_list(rewriter, &row.inner), row.location))
}

fn rewrite_subquery<R: Rewriter>(rewriter: &mut R, query: &Arc<Paren<Query>>) -> Arc<Paren<Query>> {
    Paren::update(
        query,
        Paren::new(rewriter.rewrite_query(&query.inner), query.location),
    )
}

fn rewrite_order_by<R: Rewriter>(rewriter: &mut R, items: &[OrderItem]) -> Vec<OrderItem> {
    items
        .iter()
        .map(|item| OrderItem {
            expr: rewriter.rewrite_expr(&item.expr),
            direction: item.direction,
        })
        .collect()
}

fn rewrite_sources<R: Rewriter>(rewriter: &mut R, sources: &[TableSource]) -> Vec<TableSource> {
    sources
        .iter()
        .map(|s| rewriter.rewrite_table_source(s))
        .collect()
}

fn rewrite_table_reference<R: Rewriter>(
    rewriter: &mut R,
    table: &Arc<TableReference>,
) -> Arc<TableReference> {
    TableReference::update(
        table,
        TableReference {
            target: rewriter.rewrite_expr(&table.target),
            ..(**table).clone()
        },
    )
}

fn rewrite_top<R: Rewriter>(
    rewriter: &mut R,
    top: Option<&Arc<TopClause>>,
) -> Option<Arc<TopClause>> {
    top.map(|top| {
        TopClause::update(
            top,
            TopClause {
                count: rewriter.rewrite_expr(&top.count),
                ..(**top).clone()
            },
        )
    })
}

fn rewrite_assignment<R: Rewriter>(rewriter: &mut R, assignment: &Assignment) -> Assignment {
    Assignment {
        target: rewriter.rewrite_expr(&assignment.target),
        op: assignment.op,
        value: rewriter.rewrite_expr(&assignment.value),
    }
}

fn rewrite_assignments<R: Rewriter>(rewriter: &mut R, assignments: &[Assignment]) -> Vec<Assignment> {
    assignments
        .iter()
        .map(|a| rewrite_assignment(rewriter, a))
        .collect()
}

fn rewrite_merge_when<R: Rewriter>(rewriter: &mut R, when: &Arc<MergeWhen>) -> Arc<MergeWhen> {
    MergeWhen::update(
        when,
        MergeWhen {
            condition: rewrite_option(rewriter, when.condition.as_ref()),
            action: match &when.action {
                MergeAction::Update(assignments) => {
                    MergeAction::Update(rewrite_assignments(rewriter, assignments))
                }
                MergeAction::Delete => MergeAction::Delete,
                MergeAction::Insert { columns, values } => MergeAction::Insert {
                    columns: columns.clone(),
                    values: values.as_ref().map(|row| rewrite_row(rewriter, row)),
                },
            },
            ..(**when).clone()
        },
    )
}

fn rewrite_cte<R: Rewriter>(rewriter: &mut R, cte: &Arc<Cte>) -> Arc<Cte> {
    Cte::update(
        cte,
        Cte {
            query: rewrite_subquery(rewriter, &cte.query),
            ..(**cte).clone()
        },
    )
}

fn rewrite_declaration<R: Rewriter>(
    rewriter: &mut R,
    declaration: &Arc<Declaration>,
) -> Arc<Declaration> {
    Declaration::update(
        declaration,
        Declaration {
            name: rewriter.rewrite_expr(&declaration.name),
            initial: rewrite_option(rewriter, declaration.initial.as_ref()),
            ..(**declaration).clone()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Number, Same};
    use crate::dialect::StandardDialect;
    use crate::parser::parse_with;

    struct Identity;

    impl Rewriter for Identity {}

    struct BumpNumbers;

    impl Rewriter for BumpNumbers {
        fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
            match expr.as_number() {
                Some(Number::Int(n)) => Expr::number(Number::Int(n + 1), expr.location()),
                _ => rewrite_expr(self, expr),
            }
        }
    }

    struct AddToSub;

    impl Rewriter for AddToSub {
        fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
            match expr {
                Expr::Infix(e) if e.op == BinaryOp::Add => Expr::Infix(InfixExpr::update(
                    e,
                    InfixExpr {
                        op: BinaryOp::Sub,
                        ..(**e).clone()
                    },
                )),
                _ => rewrite_expr(self, expr),
            }
        }
    }

    struct DropAliases;

    impl Rewriter for DropAliases {
        fn rewrite_table_source(&mut self, source: &TableSource) -> TableSource {
            match source {
                TableSource::Table(t) => TableSource::Table(TableReference::update(
                    t,
                    TableReference {
                        alias: None,
                        ..(**t).clone()
                    },
                )),
                _ => rewrite_table_source(self, source),
            }
        }
    }

    #[test]
    fn test_operator_change_is_kept() {
        let list = parse_with("SELECT a + b FROM t", &StandardDialect).expect("parses");
        let rewritten = AddToSub.rewrite_statement_list(&list);
        assert_eq!(rewritten.to_string(), "SELECT a - b FROM t;");
        assert_eq!(list.to_string(), "SELECT a + b FROM t;");
    }

    #[test]
    fn test_alias_change_is_kept() {
        let list = parse_with("SELECT a FROM t AS x, u", &StandardDialect).expect("parses");
        let rewritten = DropAliases.rewrite_statement_list(&list);
        assert_eq!(rewritten.to_string(), "SELECT a FROM t, u;");

        let (Statement::Select(before), Statement::Select(after)) =
            (&list.statements[0], &rewritten.statements[0])
        else {
            panic!("expected selects");
        };
        assert!(!before.from[0].same(&after.from[0]));
        assert!(before.from[1].same(&after.from[1]));
    }

    #[test]
    fn test_identity_shares_everything() {
        let list = parse_with(
            "SELECT a, b + 1 FROM t WHERE c IN (SELECT d FROM u); UPDATE t SET a = 1",
            &StandardDialect,
        )
        .expect("parses");
        let rewritten = Identity.rewrite_statement_list(&list);
        assert!(rewritten.statements.same(&list.statements));
    }

    #[test]
    fn test_rewrite_copies_only_the_changed_path() {
        let list = parse_with("SELECT a FROM t WHERE b = 1", &StandardDialect).expect("parses");
        let rewritten = BumpNumbers.rewrite_statement_list(&list);

        let (Statement::Select(before), Statement::Select(after)) =
            (&list.statements[0], &rewritten.statements[0])
        else {
            panic!("expected selects");
        };
        assert!(!Arc::ptr_eq(before, after));
        assert!(before.columns.same(&after.columns));
        assert!(before.from.same(&after.from));
        let Some(Expr::Infix(infix)) = &after.where_clause else {
            panic!("expected infix");
        };
        assert_eq!(infix.right.as_number(), Some(Number::Int(2)));
    }
}
