//! SQL text generation.
//!
//! One renderer serves every dialect. The [`Dialect`] picks the spellings
//! that differ: identifier quoting, row limits, IF and procedure-call forms,
//! DECLARE initializers and assignment syntax. Constructs a dialect lacks
//! are rewritten into an equivalent it has where one exists (`TOP n` becomes
//! a row limit, `x += 1` becomes `x = x + 1`, `x::int` becomes a `CAST`).
//!
//! `Display` on AST nodes renders with [`StandardDialect`].
//!
//! Parenthesized expressions keep their [`Paren`](crate::ast::Paren) node,
//! so rendering a parsed tree reproduces its grouping. For trees built or
//! rewritten in code, operands are wrapped where precedence requires.

use core::fmt;

use crate::ast::{
    AssignOp, Assignment, BinaryOp, ColumnDef, Cte, Declaration, DeclareStatement,
    DeleteStatement, ExecuteStatement, Expr, Identifier, IfStatement, InValues, InsertSource,
    InsertStatement, MergeAction, MergeStatement, MergeWhen, Number, ObjectIdentifier, OrderItem,
    ProcedureArg, RowLimit, SelectStatement, SetBody, SetStatement, Statement, StatementList,
    TableAlias, TableReference, TableSource, TopClause, UnaryOp, UnknownStatement,
    UpdateStatement, WithStatement,
};
use crate::dialect::{CallStyle, Dialect, IfStyle, RowLimitStyle, StandardDialect};
use crate::lexer::{Token, TokenKind};

const INDENT: &str = "    ";

// Binding strength, loosest first. An operand binding looser than its
// position requires is parenthesized.
const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const UNARY: u8 = 7;
const ATOMIC: u8 = 8;

/// Renders a statement list as `dialect` text, one statement per line,
/// each terminated by `;`.
#[must_use]
pub fn render(list: &StatementList, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::new(dialect);
    renderer.statements(&list.statements);
    renderer.out
}

/// Renders a single statement without a terminator.
#[must_use]
pub fn render_statement(statement: &Statement, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::new(dialect);
    renderer.statement(statement);
    renderer.out
}

/// Renders an expression.
#[must_use]
pub fn render_expr(expr: &Expr, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::new(dialect);
    renderer.expr(expr);
    renderer.out
}

struct Renderer<'d> {
    dialect: &'d dyn Dialect,
    out: String,
    depth: usize,
}

impl<'d> Renderer<'d> {
    fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            out: String::new(),
            depth: 0,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn comma_separated<T>(&mut self, items: &[T], mut render: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            render(self, item);
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statements(&mut self, statements: &[Statement]) {
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.statement(statement);
            self.push(";");
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(s) => self.select(s),
            Statement::Insert(s) => self.insert(s),
            Statement::Update(s) => self.update(s),
            Statement::Delete(s) => self.delete(s),
            Statement::Merge(s) => self.merge(s),
            Statement::With(s) => self.with(s),
            Statement::If(s) => self.if_statement(s),
            Statement::Declare(s) => self.declare(s),
            Statement::Set(s) => self.set(s),
            Statement::Execute(s) => self.execute(s),
            Statement::Block(s) => self.block(s),
            Statement::Unknown(s) => self.unknown(s),
        }
    }

    fn block(&mut self, list: &StatementList) {
        self.push("BEGIN");
        if !list.is_empty() {
            self.depth += 1;
            self.newline();
            self.statements(&list.statements);
            self.depth -= 1;
        }
        self.newline();
        self.push("END");
    }

    fn select(&mut self, select: &SelectStatement) {
        self.push("SELECT");
        if select.distinct {
            self.push(" DISTINCT");
        }

        // TOP moves to the row limit in dialects without it.
        let top_as_limit = select.top.as_ref().filter(|top| {
            !self.dialect.supports_top() && !top.percent && select.limit.is_none()
        });
        if let Some(top) = &select.top {
            if top_as_limit.is_none() {
                self.top(top);
            }
        }

        self.push(" ");
        self.comma_separated(&select.columns.items, Self::expr);

        if !select.from.is_empty() {
            self.push(" FROM ");
            self.comma_separated(&select.from, Self::table_source);
        }
        if let Some(expr) = &select.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
        if !select.group_by.is_empty() {
            self.push(" GROUP BY ");
            self.comma_separated(&select.group_by, Self::expr);
        }
        if let Some(expr) = &select.having {
            self.push(" HAVING ");
            self.expr(expr);
        }
        self.order_by(&select.order_by);

        if let Some(limit) = &select.limit {
            self.row_limit(limit);
        } else if let Some(top) = top_as_limit {
            self.row_limit(&RowLimit {
                offset: None,
                count: Some(top.count.clone()),
                location: top.location,
            });
        }

        if let Some(compound) = &select.compound {
            self.push(" ");
            self.push(compound.op.as_str());
            if compound.all {
                self.push(" ALL");
            }
            self.push(" ");
            self.select(&compound.right);
        }
    }

    fn top(&mut self, top: &TopClause) {
        self.push(" TOP (");
        self.expr(&top.count);
        self.push(")");
        if top.percent {
            self.push(" PERCENT");
        }
    }

    fn order_by(&mut self, items: &[OrderItem]) {
        if !items.is_empty() {
            self.push(" ");
            self.order_items(items);
        }
    }

    fn order_items(&mut self, items: &[OrderItem]) {
        self.push("ORDER BY ");
        self.comma_separated(items, |r, item| {
            r.expr(&item.expr);
            if let Some(direction) = item.direction {
                r.push(" ");
                r.push(direction.as_str());
            }
        });
    }

    fn row_limit(&mut self, limit: &RowLimit) {
        match self.dialect.row_limit_style() {
            RowLimitStyle::LimitOffset => {
                if let Some(count) = &limit.count {
                    self.push(" LIMIT ");
                    self.expr(count);
                }
                if let Some(offset) = &limit.offset {
                    self.push(" OFFSET ");
                    self.expr(offset);
                }
            }
            RowLimitStyle::OffsetFetch => {
                if let Some(offset) = &limit.offset {
                    self.push(" OFFSET ");
                    self.expr(offset);
                    self.push(" ROWS");
                }
                if let Some(count) = &limit.count {
                    self.push(if limit.offset.is_some() {
                        " FETCH NEXT "
                    } else {
                        " FETCH FIRST "
                    });
                    self.expr(count);
                    self.push(" ROWS ONLY");
                }
            }
        }
    }

    fn insert(&mut self, insert: &InsertStatement) {
        self.push("INSERT INTO ");
        self.expr(&insert.target);
        if !insert.columns.is_empty() {
            self.push(" ");
            self.identifier_list(&insert.columns);
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                self.push(" VALUES ");
                self.comma_separated(rows, |r, row| r.expr_list(&row.inner.items));
            }
            InsertSource::Query(query) => {
                self.push(" ");
                self.select(query);
            }
            InsertSource::DefaultValues => self.push(" DEFAULT VALUES"),
        }
    }

    fn update(&mut self, update: &UpdateStatement) {
        self.push("UPDATE");
        if let Some(top) = &update.top {
            self.top(top);
        }
        self.push(" ");
        self.table_reference(&update.target);
        self.push(" SET ");
        self.comma_separated(&update.assignments, |r, a| r.assignment(a, "="));
        if !update.from.is_empty() {
            self.push(" FROM ");
            self.comma_separated(&update.from, Self::table_source);
        }
        if let Some(expr) = &update.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
    }

    fn delete(&mut self, delete: &DeleteStatement) {
        self.push("DELETE");
        if let Some(top) = &delete.top {
            self.top(top);
        }
        self.push(" FROM ");
        self.table_reference(&delete.target);
        if !delete.from.is_empty() {
            self.push(" FROM ");
            self.comma_separated(&delete.from, Self::table_source);
        }
        if let Some(expr) = &delete.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
    }

    fn merge(&mut self, merge: &MergeStatement) {
        self.push("MERGE INTO ");
        self.table_reference(&merge.target);
        self.push(" USING ");
        self.table_source(&merge.source);
        self.push(" ON ");
        self.expr(&merge.condition);
        for when in &merge.clauses {
            self.merge_when(when);
        }
    }

    fn merge_when(&mut self, when: &MergeWhen) {
        self.push(if when.matched {
            " WHEN MATCHED"
        } else {
            " WHEN NOT MATCHED"
        });
        if let Some(scope) = when.scope {
            self.push(" BY ");
            self.push(scope.as_str());
        }
        if let Some(condition) = &when.condition {
            self.push(" AND ");
            self.expr(condition);
        }
        self.push(" THEN ");
        match &when.action {
            MergeAction::Update(assignments) => {
                self.push("UPDATE SET ");
                self.comma_separated(assignments, |r, a| r.assignment(a, "="));
            }
            MergeAction::Delete => self.push("DELETE"),
            MergeAction::Insert { columns, values } => {
                self.push("INSERT");
                if !columns.is_empty() {
                    self.push(" ");
                    self.identifier_list(columns);
                }
                match values {
                    Some(values) => {
                        self.push(" VALUES ");
                        self.expr_list(&values.inner.items);
                    }
                    None => self.push(" DEFAULT VALUES"),
                }
            }
        }
    }

    fn with(&mut self, with: &WithStatement) {
        self.push("WITH ");
        if self.dialect.recursive_keyword() && with.is_recursive() {
            self.push("RECURSIVE ");
        }
        self.comma_separated(&with.ctes, |r, cte| r.cte(cte));
        self.newline();
        self.statement(&with.body);
    }

    fn cte(&mut self, cte: &Cte) {
        self.identifier(&cte.name);
        if !cte.columns.is_empty() {
            self.push(" ");
            self.identifier_list(&cte.columns);
        }
        self.push(" AS (");
        self.select(&cte.query.inner);
        self.push(")");
    }

    fn if_statement(&mut self, stmt: &IfStatement) {
        self.push("IF ");
        self.expr(&stmt.condition);
        match self.dialect.if_style() {
            IfStyle::Compact => {
                self.compact_branch(&stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.newline();
                    self.push("ELSE");
                    self.compact_branch(else_branch);
                }
            }
            IfStyle::Block => {
                self.push(" THEN");
                self.block_branch(&stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.newline();
                    self.push("ELSE");
                    self.block_branch(else_branch);
                }
                self.newline();
                self.push("END IF");
            }
        }
    }

    /// One statement, grouping several with `BEGIN ... END`.
    fn compact_branch(&mut self, branch: &Statement) {
        self.depth += 1;
        self.newline();
        match branch {
            Statement::Block(list) if !list.bracketed => match list.statements.as_slice() {
                [only] => self.statement(only),
                _ => self.block(list),
            },
            _ => self.statement(branch),
        }
        self.depth -= 1;
    }

    /// Statements each terminated by `;`, up to the next ELSE or END IF.
    fn block_branch(&mut self, branch: &Statement) {
        self.depth += 1;
        let statements = match branch {
            Statement::Block(list) => list.statements.as_slice(),
            _ => core::slice::from_ref(branch),
        };
        for statement in statements {
            self.newline();
            self.statement(statement);
            self.push(";");
        }
        self.depth -= 1;
    }

    fn declare(&mut self, declare: &DeclareStatement) {
        self.push("DECLARE ");
        self.comma_separated(&declare.declarations, |r, d| r.declaration(d));
    }

    fn declaration(&mut self, declaration: &Declaration) {
        self.expr(&declaration.name);
        if let Some(columns) = &declaration.table_columns {
            self.push(" TABLE (");
            self.comma_separated(columns, Self::column_def);
            self.push(")");
        } else if let Some(data_type) = &declaration.data_type {
            self.push(" ");
            self.push(&data_type.to_string());
        }
        if let Some(initial) = &declaration.initial {
            self.push(" ");
            self.push(self.dialect.declare_initializer());
            self.push(" ");
            self.expr(initial);
        }
    }

    fn column_def(&mut self, column: &ColumnDef) {
        self.identifier(&column.name);
        self.push(" ");
        self.push(&column.data_type.to_string());
        match column.nullable {
            Some(true) => self.push(" NULL"),
            Some(false) => self.push(" NOT NULL"),
            None => {}
        }
        if column.primary_key {
            self.push(" PRIMARY KEY");
        }
    }

    fn set(&mut self, set: &SetStatement) {
        match &set.body {
            SetBody::Assign(assignment) if self.dialect.set_keyword() => {
                self.push("SET ");
                self.assignment(assignment, "=");
            }
            SetBody::Assign(assignment) => self.assignment(assignment, ":="),
            SetBody::Option { name, value } => {
                self.push("SET ");
                self.identifier(name);
                self.push(if self.dialect.set_keyword() { " " } else { " = " });
                self.expr(value);
            }
        }
    }

    /// Renders `target op value`, expanding compound operators the dialect
    /// lacks into `target = target op value`.
    fn assignment(&mut self, assignment: &Assignment, assign: &str) {
        self.expr(&assignment.target);
        match assignment.op {
            AssignOp::Assign => {
                self.push(" ");
                self.push(assign);
                self.push(" ");
                self.expr(&assignment.value);
            }
            AssignOp::Compound(op) if self.dialect.supports_compound_assignment() => {
                self.push(" ");
                self.push(op.as_str());
                self.push("= ");
                self.expr(&assignment.value);
            }
            AssignOp::Compound(op) => {
                self.push(" ");
                self.push(assign);
                self.push(" ");
                self.expr(&assignment.target);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.operand(&assignment.value, binary_precedence(op) + 1);
            }
        }
    }

    fn execute(&mut self, execute: &ExecuteStatement) {
        match self.dialect.call_style() {
            CallStyle::Exec => {
                self.push("EXEC ");
                if let Some(status) = &execute.return_status {
                    self.expr(status);
                    self.push(" = ");
                }
                self.object_identifier(&execute.procedure);
                if !execute.args.is_empty() {
                    self.push(" ");
                    self.comma_separated(&execute.args, Self::exec_argument);
                }
            }
            // CALL has no return status.
            CallStyle::Call => {
                self.push("CALL ");
                self.object_identifier(&execute.procedure);
                self.push("(");
                self.comma_separated(&execute.args, Self::call_argument);
                self.push(")");
            }
        }
    }

    fn exec_argument(&mut self, arg: &ProcedureArg) {
        match &arg.name {
            Some(Expr::Identifier(id)) => {
                self.push("@");
                self.push(id.name());
                self.push(" = ");
            }
            Some(name) => {
                self.expr(name);
                self.push(" = ");
            }
            None => {}
        }
        self.expr(&arg.value);
        if arg.output {
            self.push(" OUTPUT");
        }
    }

    fn call_argument(&mut self, arg: &ProcedureArg) {
        match &arg.name {
            Some(Expr::Variable(v)) => {
                self.push(v.name.trim_start_matches('@'));
                self.push(" => ");
            }
            Some(name) => {
                self.expr(name);
                self.push(" => ");
            }
            None => {}
        }
        self.expr(&arg.value);
    }

    fn unknown(&mut self, unknown: &UnknownStatement) {
        for (i, token) in unknown.tokens.iter().enumerate() {
            if i > 0 {
                self.push(" ");
            }
            self.token(token);
        }
    }

    fn token(&mut self, token: &Token) {
        match token.kind {
            TokenKind::QuotedString => self.string(&token.value),
            TokenKind::Identifier if token.quoted => {
                let quoted = self.dialect.quote_identifier(&token.value);
                self.push(&quoted);
            }
            _ => self.push(&token.value),
        }
    }

    // =========================================================================
    // Table sources
    // =========================================================================

    fn table_source(&mut self, source: &TableSource) {
        match source {
            TableSource::Table(table) => self.table_reference(table),
            TableSource::Derived(derived) => {
                self.push("(");
                self.select(&derived.subquery.inner);
                self.push(")");
                self.table_alias(derived.alias.as_ref());
            }
            TableSource::Join(join) => {
                self.table_source(&join.left);
                self.push(" ");
                self.push(&join.operator.text);
                self.push(" ");
                self.table_source(&join.right);
                if let Some(condition) = &join.condition {
                    self.push(" ON ");
                    self.expr(condition);
                }
            }
        }
    }

    fn table_reference(&mut self, table: &TableReference) {
        self.expr(&table.target);
        self.table_alias(table.alias.as_ref());
    }

    fn table_alias(&mut self, alias: Option<&TableAlias>) {
        let Some(alias) = alias else {
            return;
        };
        self.push(" AS ");
        self.identifier(&alias.name);
        if !alias.columns.is_empty() {
            self.push(" ");
            self.identifier_list(&alias.columns);
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Renders `expr`, parenthesized if it binds looser than `min`.
    fn operand(&mut self, expr: &Expr, min: u8) {
        if precedence(expr) < min {
            self.push("(");
            self.expr(expr);
            self.push(")");
        } else {
            self.expr(expr);
        }
    }

    fn expr_list(&mut self, exprs: &[Expr]) {
        self.push("(");
        self.comma_separated(exprs, Self::expr);
        self.push(")");
    }

    fn subquery(&mut self, query: &SelectStatement) {
        self.push("(");
        self.select(query);
        self.push(")");
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Infix(e) => {
                let level = binary_precedence(e.op);
                self.operand(&e.left, level);
                self.push(" ");
                self.push(e.op.as_str());
                self.push(" ");
                self.operand(&e.right, level + 1);
            }
            Expr::Prefix(e) if e.op == UnaryOp::Not => {
                self.push("NOT ");
                self.operand(&e.operand, NOT);
            }
            Expr::Prefix(e) => {
                self.push(e.op.as_str());
                // `- -1` must not become a `--` comment.
                if matches!(&e.operand, Expr::Prefix(_))
                    || matches!(&e.operand, Expr::Number(n) if is_negative(n.value))
                {
                    self.push(" ");
                }
                self.operand(&e.operand, UNARY);
            }
            Expr::Between(e) => {
                self.operand(&e.expr, COMPARISON);
                self.push(if e.negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.operand(&e.low, ADDITIVE);
                self.push(" AND ");
                self.operand(&e.high, ADDITIVE);
            }
            Expr::In(e) => {
                self.operand(&e.expr, COMPARISON);
                self.push(if e.negated { " NOT IN " } else { " IN " });
                match &e.values {
                    InValues::List(list) => self.expr_list(&list.inner.items),
                    InValues::Subquery(query) => self.subquery(&query.inner),
                }
            }
            Expr::IsNull(e) => {
                self.operand(&e.expr, COMPARISON);
                self.push(if e.negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Exists(e) => {
                self.push("EXISTS ");
                self.subquery(&e.subquery.inner);
            }
            Expr::Quantified(e) => {
                self.operand(&e.left, COMPARISON);
                self.push(" ");
                self.push(e.op.as_str());
                self.push(" ");
                self.push(e.quantifier.as_str());
                self.push(" ");
                self.subquery(&e.subquery.inner);
            }
            Expr::Case(e) => {
                self.push("CASE");
                if let Some(operand) = &e.operand {
                    self.push(" ");
                    self.expr(operand);
                }
                for when in &e.whens {
                    self.push(" WHEN ");
                    self.expr(&when.condition);
                    self.push(" THEN ");
                    self.expr(&when.result);
                }
                if let Some(else_result) = &e.else_result {
                    self.push(" ELSE ");
                    self.expr(else_result);
                }
                self.push(" END");
            }
            Expr::Cast(e) => {
                let data_type = e.data_type.to_string();
                if e.shorthand
                    && self.dialect.supports_double_colon_cast()
                    && precedence(&e.expr) == ATOMIC
                {
                    self.expr(&e.expr);
                    self.push("::");
                    self.push(&data_type);
                } else {
                    self.push("CAST(");
                    self.expr(&e.expr);
                    self.push(" AS ");
                    self.push(&data_type);
                    self.push(")");
                }
            }
            Expr::Function(call) => {
                self.name(&call.name);
                self.push("(");
                if call.distinct {
                    self.push("DISTINCT ");
                }
                self.comma_separated(&call.args.items, Self::expr);
                self.push(")");
            }
            Expr::Over(e) => {
                self.expr(&e.function);
                self.push(" OVER (");
                if !e.partition_by.is_empty() {
                    self.push("PARTITION BY ");
                    self.comma_separated(&e.partition_by, Self::expr);
                }
                if !e.order_by.is_empty() {
                    if !e.partition_by.is_empty() {
                        self.push(" ");
                    }
                    self.order_items(&e.order_by);
                }
                self.push(")");
            }
            Expr::Paren(e) => {
                self.push("(");
                self.expr(&e.inner);
                self.push(")");
            }
            Expr::Subquery(query) => self.subquery(&query.inner),
            Expr::Alias(e) => {
                self.operand(&e.expr, OR);
                self.push(" AS ");
                self.identifier(&e.alias);
            }
            Expr::Identifier(id) => self.object_identifier(id),
            Expr::Variable(v) => self.push(&v.name),
            Expr::Number(n) => self.push(&n.value.to_string()),
            Expr::String(s) => self.string(&s.value),
            Expr::Null(_) => self.push("NULL"),
            Expr::Keyword(k) => self.push(&k.keyword),
            Expr::Wildcard(w) => {
                if let Some(qualifier) = &w.qualifier {
                    self.object_identifier(qualifier);
                    self.push(".");
                }
                self.push("*");
            }
        }
    }

    fn string(&mut self, value: &str) {
        self.push("'");
        self.push(&value.replace('\'', "''"));
        self.push("'");
    }

    /// Writes a name, quoting it if it was quoted or if the dialect would
    /// read it as a keyword.
    fn identifier(&mut self, id: &Identifier) {
        if id.quoted || self.dialect.lexer_config().is_keyword(&id.value) {
            let quoted = self.dialect.quote_identifier(&id.value);
            self.push(&quoted);
        } else {
            self.push(&id.value);
        }
    }

    fn object_identifier(&mut self, id: &ObjectIdentifier) {
        for (i, part) in id.parts.iter().enumerate() {
            if i > 0 {
                self.push(".");
            }
            self.identifier(part);
        }
    }

    /// Writes a function name. Keyword-named functions such as `LEFT` stay
    /// unquoted.
    fn name(&mut self, id: &ObjectIdentifier) {
        for (i, part) in id.parts.iter().enumerate() {
            if i > 0 {
                self.push(".");
            }
            if part.quoted {
                let quoted = self.dialect.quote_identifier(&part.value);
                self.push(&quoted);
            } else {
                self.push(&part.value);
            }
        }
    }

    fn identifier_list(&mut self, ids: &[Identifier]) {
        self.push("(");
        self.comma_separated(ids, Self::identifier);
        self.push(")");
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Alias(_) => 0,
        Expr::Infix(e) => binary_precedence(e.op),
        Expr::Prefix(e) if e.op == UnaryOp::Not => NOT,
        Expr::Prefix(_) => UNARY,
        Expr::Between(_) | Expr::In(_) | Expr::IsNull(_) | Expr::Quantified(_) => COMPARISON,
        Expr::Number(n) if is_negative(n.value) => UNARY,
        _ => ATOMIC,
    }
}

const fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => OR,
        BinaryOp::And => AND,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => MULTIPLICATIVE,
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Concat
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor => ADDITIVE,
        _ => COMPARISON,
    }
}

const fn is_negative(number: Number) -> bool {
    match number {
        Number::Int(v) => v < 0,
        Number::BigInt(v) => v < 0,
        Number::Numeric(d) => d.mantissa() < 0,
    }
}

impl fmt::Display for StatementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &StandardDialect))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_statement(self, &StandardDialect))
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new(&StandardDialect);
        renderer.select(self);
        f.write_str(&renderer.out)
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new(&StandardDialect);
        renderer.table_source(self);
        f.write_str(&renderer.out)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_expr(self, &StandardDialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Location;
    use crate::parser::parse_with;

    fn standard(sql: &str) -> String {
        render(
            &parse_with(sql, &StandardDialect).expect("parses"),
            &StandardDialect,
        )
    }

    #[test]
    fn test_render_select() {
        assert_eq!(
            standard("select * from MyTable where ColumnA = 1"),
            "SELECT * FROM MyTable WHERE ColumnA = 1;"
        );
    }

    #[test]
    fn test_render_statements_on_lines() {
        assert_eq!(standard("SELECT 1; SELECT 2"), "SELECT 1;\nSELECT 2;");
    }

    #[test]
    fn test_render_keeps_source_parens() {
        assert_eq!(standard("SELECT (1 + 2) * 3"), "SELECT (1 + 2) * 3;");
    }

    #[test]
    fn test_constructed_tree_gets_parens() {
        let loc = Location::default();
        let sum = Expr::infix(
            Expr::number(Number::Int(1), loc),
            BinaryOp::Add,
            Expr::number(Number::Int(2), loc),
        );
        let product = Expr::infix(sum, BinaryOp::Mul, Expr::number(Number::Int(3), loc));
        assert_eq!(product.to_string(), "(1 + 2) * 3");

        let right = Expr::infix(
            Expr::number(Number::Int(1), loc),
            BinaryOp::Sub,
            Expr::infix(
                Expr::number(Number::Int(2), loc),
                BinaryOp::Sub,
                Expr::number(Number::Int(3), loc),
            ),
        );
        assert_eq!(right.to_string(), "1 - (2 - 3)");
    }

    #[test]
    fn test_double_negation_spaced() {
        assert_eq!(standard("SELECT - -1"), "SELECT - -1;");
        let loc = Location::default();
        let minus = Expr::infix(
            Expr::number(Number::Int(1), loc),
            BinaryOp::Sub,
            Expr::number(Number::Int(-3), loc),
        );
        assert_eq!(minus.to_string(), "1 - -3");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(standard("SELECT 'it''s'"), "SELECT 'it''s';");
    }

    #[test]
    fn test_keyword_named_identifier_quoted() {
        let loc = Location::default();
        let column = Expr::identifier("select", loc);
        assert_eq!(column.to_string(), "\"select\"");
    }

    #[test]
    fn test_window_function() {
        assert_eq!(
            standard("SELECT ROW_NUMBER() OVER (ORDER BY a DESC) FROM t"),
            "SELECT ROW_NUMBER() OVER (ORDER BY a DESC) FROM t;"
        );
        assert_eq!(
            standard("SELECT SUM(x) OVER (PARTITION BY a ORDER BY b) FROM t"),
            "SELECT SUM(x) OVER (PARTITION BY a ORDER BY b) FROM t;"
        );
    }

    #[test]
    fn test_block_if() {
        assert_eq!(
            standard("IF a = 1 THEN SELECT 1; SELECT 2; ELSE SELECT 3; END IF"),
            "IF a = 1 THEN\n    SELECT 1;\n    SELECT 2;\nELSE\n    SELECT 3;\nEND IF;"
        );
    }

    #[test]
    fn test_row_limit() {
        assert_eq!(
            standard("SELECT a FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"),
            "SELECT a FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY;"
        );
    }
}
