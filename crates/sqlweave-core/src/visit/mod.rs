//! Tree traversal.
//!
//! [`Visitor`] walks a tree read-only and may fail; [`Rewriter`] rebuilds
//! it, sharing every subtree it leaves untouched. Each trait method has a
//! matching free `walk_*` / `rewrite_*` function holding the default
//! traversal, so an override can do its own work and then continue into the
//! children.

mod find;
mod rewrite;

pub use find::{find_nodes, NodeRef};
pub use rewrite::{
    rewrite_expr, rewrite_query, rewrite_statement, rewrite_statement_list,
    rewrite_table_source, Rewriter,
};

use crate::ast::{
    Assignment, Cte, Declaration, DeclareStatement, DeleteStatement, DerivedTable,
    ExecuteStatement, Expr, FunctionCall, IfStatement, InValues, InsertSource, InsertStatement,
    Join, MergeAction, MergeStatement, MergeWhen, ObjectIdentifier, SelectStatement, SetBody,
    SetStatement, Statement, StatementList, TableReference, TableSource, UnknownStatement,
    UpdateStatement, Variable, WithStatement,
};

/// A read-only, fallible tree walk.
///
/// The `'ast` lifetime lets implementations keep references into the tree.
pub trait Visitor<'ast>: Sized {
    /// The error that stops the walk.
    type Error;

    fn visit_statement_list(&mut self, list: &'ast StatementList) -> Result<(), Self::Error> {
        walk_statement_list(self, list)
    }

    fn visit_statement(&mut self, statement: &'ast Statement) -> Result<(), Self::Error> {
        walk_statement(self, statement)
    }

    fn visit_select(&mut self, select: &'ast SelectStatement) -> Result<(), Self::Error> {
        walk_select(self, select)
    }

    fn visit_insert(&mut self, insert: &'ast InsertStatement) -> Result<(), Self::Error> {
        walk_insert(self, insert)
    }

    fn visit_update(&mut self, update: &'ast UpdateStatement) -> Result<(), Self::Error> {
        walk_update(self, update)
    }

    fn visit_delete(&mut self, delete: &'ast DeleteStatement) -> Result<(), Self::Error> {
        walk_delete(self, delete)
    }

    fn visit_merge(&mut self, merge: &'ast MergeStatement) -> Result<(), Self::Error> {
        walk_merge(self, merge)
    }

    fn visit_merge_when(&mut self, when: &'ast MergeWhen) -> Result<(), Self::Error> {
        walk_merge_when(self, when)
    }

    fn visit_with(&mut self, with: &'ast WithStatement) -> Result<(), Self::Error> {
        walk_with(self, with)
    }

    fn visit_cte(&mut self, cte: &'ast Cte) -> Result<(), Self::Error> {
        self.visit_select(&cte.query.inner)
    }

    fn visit_if(&mut self, stmt: &'ast IfStatement) -> Result<(), Self::Error> {
        walk_if(self, stmt)
    }

    fn visit_declare(&mut self, declare: &'ast DeclareStatement) -> Result<(), Self::Error> {
        for declaration in &declare.declarations {
            self.visit_declaration(declaration)?;
        }
        Ok(())
    }

    fn visit_declaration(&mut self, declaration: &'ast Declaration) -> Result<(), Self::Error> {
        walk_declaration(self, declaration)
    }

    fn visit_set(&mut self, set: &'ast SetStatement) -> Result<(), Self::Error> {
        walk_set(self, set)
    }

    fn visit_execute(&mut self, execute: &'ast ExecuteStatement) -> Result<(), Self::Error> {
        walk_execute(self, execute)
    }

    fn visit_unknown(&mut self, unknown: &'ast UnknownStatement) -> Result<(), Self::Error> {
        let _ = unknown;
        Ok(())
    }

    fn visit_table_source(&mut self, source: &'ast TableSource) -> Result<(), Self::Error> {
        walk_table_source(self, source)
    }

    fn visit_table_reference(&mut self, table: &'ast TableReference) -> Result<(), Self::Error> {
        self.visit_expr(&table.target)
    }

    fn visit_derived_table(&mut self, derived: &'ast DerivedTable) -> Result<(), Self::Error> {
        self.visit_select(&derived.subquery.inner)
    }

    fn visit_join(&mut self, join: &'ast Join) -> Result<(), Self::Error> {
        walk_join(self, join)
    }

    fn visit_assignment(&mut self, assignment: &'ast Assignment) -> Result<(), Self::Error> {
        self.visit_expr(&assignment.target)?;
        self.visit_expr(&assignment.value)
    }

    fn visit_expr(&mut self, expr: &'ast Expr) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }

    fn visit_function_call(&mut self, call: &'ast FunctionCall) -> Result<(), Self::Error> {
        walk_function_call(self, call)
    }

    fn visit_object_identifier(&mut self, id: &'ast ObjectIdentifier) -> Result<(), Self::Error> {
        let _ = id;
        Ok(())
    }

    fn visit_variable(&mut self, variable: &'ast Variable) -> Result<(), Self::Error> {
        let _ = variable;
        Ok(())
    }
}

pub fn walk_statement_list<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    list: &'ast StatementList,
) -> Result<(), V::Error> {
    for statement in &list.statements {
        visitor.visit_statement(statement)?;
    }
    Ok(())
}

pub fn walk_statement<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    statement: &'ast Statement,
) -> Result<(), V::Error> {
    match statement {
        Statement::Select(s) => visitor.visit_select(s),
        Statement::Insert(s) => visitor.visit_insert(s),
        Statement::Update(s) => visitor.visit_update(s),
        Statement::Delete(s) => visitor.visit_delete(s),
        Statement::Merge(s) => visitor.visit_merge(s),
        Statement::With(s) => visitor.visit_with(s),
        Statement::If(s) => visitor.visit_if(s),
        Statement::Declare(s) => visitor.visit_declare(s),
        Statement::Set(s) => visitor.visit_set(s),
        Statement::Execute(s) => visitor.visit_execute(s),
        Statement::Block(s) => visitor.visit_statement_list(s),
        Statement::Unknown(s) => visitor.visit_unknown(s),
    }
}

/// Visits the clauses of a SELECT in source order.
pub fn walk_select<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    select: &'ast SelectStatement,
) -> Result<(), V::Error> {
    if let Some(top) = &select.top {
        visitor.visit_expr(&top.count)?;
    }
    for column in &select.columns {
        visitor.visit_expr(column)?;
    }
    for source in &select.from {
        visitor.visit_table_source(source)?;
    }
    if let Some(expr) = &select.where_clause {
        visitor.visit_expr(expr)?;
    }
    for expr in &select.group_by {
        visitor.visit_expr(expr)?;
    }
    if let Some(expr) = &select.having {
        visitor.visit_expr(expr)?;
    }
    for item in &select.order_by {
        visitor.visit_expr(&item.expr)?;
    }
    if let Some(limit) = &select.limit {
        if let Some(offset) = &limit.offset {
            visitor.visit_expr(offset)?;
        }
        if let Some(count) = &limit.count {
            visitor.visit_expr(count)?;
        }
    }
    if let Some(compound) = &select.compound {
        visitor.visit_select(&compound.right)?;
    }
    Ok(())
}

pub fn walk_insert<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    insert: &'ast InsertStatement,
) -> Result<(), V::Error> {
    visitor.visit_expr(&insert.target)?;
    match &insert.source {
        InsertSource::Values(rows) => {
            for row in rows {
                for value in &row.inner {
                    visitor.visit_expr(value)?;
                }
            }
            Ok(())
        }
        InsertSource::Query(query) => visitor.visit_select(query),
        InsertSource::DefaultValues => Ok(()),
    }
}

pub fn walk_update<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    update: &'ast UpdateStatement,
) -> Result<(), V::Error> {
    if let Some(top) = &update.top {
        visitor.visit_expr(&top.count)?;
    }
    visitor.visit_table_reference(&update.target)?;
    for source in &update.from {
        visitor.visit_table_source(source)?;
    }
    for assignment in &update.assignments {
        visitor.visit_assignment(assignment)?;
    }
    if let Some(expr) = &update.where_clause {
        visitor.visit_expr(expr)?;
    }
    Ok(())
}

pub fn walk_delete<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    delete: &'ast DeleteStatement,
) -> Result<(), V::Error> {
    if let Some(top) = &delete.top {
        visitor.visit_expr(&top.count)?;
    }
    visitor.visit_table_reference(&delete.target)?;
    for source in &delete.from {
        visitor.visit_table_source(source)?;
    }
    if let Some(expr) = &delete.where_clause {
        visitor.visit_expr(expr)?;
    }
    Ok(())
}

pub fn walk_merge<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    merge: &'ast MergeStatement,
) -> Result<(), V::Error> {
    visitor.visit_table_reference(&merge.target)?;
    visitor.visit_table_source(&merge.source)?;
    visitor.visit_expr(&merge.condition)?;
    for when in &merge.clauses {
        visitor.visit_merge_when(when)?;
    }
    Ok(())
}

pub fn walk_merge_when<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    when: &'ast MergeWhen,
) -> Result<(), V::Error> {
    if let Some(condition) = &when.condition {
        visitor.visit_expr(condition)?;
    }
    match &when.action {
        MergeAction::Update(assignments) => {
            for assignment in assignments {
                visitor.visit_assignment(assignment)?;
            }
        }
        MergeAction::Delete => {}
        MergeAction::Insert { values, .. } => {
            if let Some(values) = values {
                for value in &values.inner {
                    visitor.visit_expr(value)?;
                }
            }
        }
    }
    Ok(())
}

pub fn walk_with<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    with: &'ast WithStatement,
) -> Result<(), V::Error> {
    for cte in &with.ctes {
        visitor.visit_cte(cte)?;
    }
    visitor.visit_statement(&with.body)
}

pub fn walk_if<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    stmt: &'ast IfStatement,
) -> Result<(), V::Error> {
    visitor.visit_expr(&stmt.condition)?;
    visitor.visit_statement(&stmt.then_branch)?;
    if let Some(else_branch) = &stmt.else_branch {
        visitor.visit_statement(else_branch)?;
    }
    Ok(())
}

pub fn walk_declaration<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    declaration: &'ast Declaration,
) -> Result<(), V::Error> {
    if let Some(initial) = &declaration.initial {
        visitor.visit_expr(initial)?;
    }
    visitor.visit_expr(&declaration.name)
}

pub fn walk_set<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    set: &'ast SetStatement,
) -> Result<(), V::Error> {
    match &set.body {
        SetBody::Assign(assignment) => visitor.visit_assignment(assignment),
        SetBody::Option { value, .. } => visitor.visit_expr(value),
    }
}

pub fn walk_execute<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    execute: &'ast ExecuteStatement,
) -> Result<(), V::Error> {
    if let Some(status) = &execute.return_status {
        visitor.visit_expr(status)?;
    }
    for arg in &execute.args {
        visitor.visit_expr(&arg.value)?;
    }
    Ok(())
}

pub fn walk_table_source<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    source: &'ast TableSource,
) -> Result<(), V::Error> {
    match source {
        TableSource::Table(table) => visitor.visit_table_reference(table),
        TableSource::Derived(derived) => visitor.visit_derived_table(derived),
        TableSource::Join(join) => visitor.visit_join(join),
    }
}

pub fn walk_join<'ast, V: Visitor<'ast>>(visitor: &mut V, join: &'ast Join) -> Result<(), V::Error> {
    visitor.visit_table_source(&join.left)?;
    visitor.visit_table_source(&join.right)?;
    if let Some(condition) = &join.condition {
        visitor.visit_expr(condition)?;
    }
    Ok(())
}

pub fn walk_function_call<'ast, V: Visitor<'ast>>(
    visitor: &mut V,
    call: &'ast FunctionCall,
) -> Result<(), V::Error> {
    for arg in &call.args {
        visitor.visit_expr(arg)?;
    }
    Ok(())
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast Expr) -> Result<(), V::Error> {
    match expr {
        Expr::Infix(e) => {
            visitor.visit_expr(&e.left)?;
            visitor.visit_expr(&e.right)
        }
        Expr::Prefix(e) => visitor.visit_expr(&e.operand),
        Expr::Between(e) => {
            visitor.visit_expr(&e.expr)?;
            visitor.visit_expr(&e.low)?;
            visitor.visit_expr(&e.high)
        }
        Expr::In(e) => {
            visitor.visit_expr(&e.expr)?;
            match &e.values {
                InValues::List(list) => {
                    for value in &list.inner {
                        visitor.visit_expr(value)?;
                    }
                    Ok(())
                }
                InValues::Subquery(query) => visitor.visit_select(&query.inner),
            }
        }
        Expr::IsNull(e) => visitor.visit_expr(&e.expr),
        Expr::Exists(e) => visitor.visit_select(&e.subquery.inner),
        Expr::Quantified(e) => {
            visitor.visit_expr(&e.left)?;
            visitor.visit_select(&e.subquery.inner)
        }
        Expr::Case(e) => {
            if let Some(operand) = &e.operand {
                visitor.visit_expr(operand)?;
            }
            for when in &e.whens {
                visitor.visit_expr(&when.condition)?;
                visitor.visit_expr(&when.result)?;
            }
            if let Some(else_result) = &e.else_result {
                visitor.visit_expr(else_result)?;
            }
            Ok(())
        }
        Expr::Cast(e) => visitor.visit_expr(&e.expr),
        Expr::Function(call) => visitor.visit_function_call(call),
        Expr::Over(e) => {
            visitor.visit_expr(&e.function)?;
            for expr in &e.partition_by {
                visitor.visit_expr(expr)?;
            }
            for item in &e.order_by {
                visitor.visit_expr(&item.expr)?;
            }
            Ok(())
        }
        Expr::Paren(e) => visitor.visit_expr(&e.inner),
        Expr::Subquery(query) => visitor.visit_select(&query.inner),
        Expr::Alias(e) => visitor.visit_expr(&e.expr),
        Expr::Identifier(id) => visitor.visit_object_identifier(id),
        Expr::Variable(variable) => visitor.visit_variable(variable),
        Expr::Wildcard(w) => match &w.qualifier {
            Some(qualifier) => visitor.visit_object_identifier(qualifier),
            None => Ok(()),
        },
        Expr::Number(_) | Expr::String(_) | Expr::Null(_) | Expr::Keyword(_) => Ok(()),
    }
}
