//! Scope-chain symbol resolution.

use std::iter;
use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use super::symbol::{
    Binding, ScopeKind, SymbolInfo, SymbolKind, SymbolOrigin, SymbolTable, TranslationRule, Usage,
};
use super::{Environment, MisuseKind, ResolveError, ResolverOptions};
use crate::ast::{
    join_parts, Annotation, Assignment, BinaryOp, Declaration, DeleteStatement, DerivedTable,
    ExecuteStatement, Expr, FunctionCall, Identifier, InsertSource, InsertStatement, MergeStatement,
    ObjectIdentifier, Scope, SelectStatement, SetBody, SetStatement, StatementList,
    TableReference, UpdateStatement, Variable, WithStatement,
};
use crate::dialect::{Dialect, VariableStyle};
use crate::lexer::Location;
use crate::visit::{walk_expr, walk_function_call, walk_merge_when, walk_statement_list, Visitor};

/// Builds the symbol tables of a parsed batch.
///
/// Each scope-owning node gets the table of the symbols it defines, and
/// every identifier or variable that resolves records its [`Binding`].
///
/// ```
/// use sqlweave_core::dialect::StandardDialect;
/// use sqlweave_core::parser::parse_with;
/// use sqlweave_core::resolve::{Environment, Resolver, ResolverOptions};
///
/// let ast = parse_with("SELECT ColumnA FROM MyTable", &StandardDialect).unwrap();
/// Resolver::new(&StandardDialect)
///     .with_options(ResolverOptions::default().with_strict(true))
///     .with_environment(Environment::new().scalar("ColumnA").table("MyTable"))
///     .resolve(&ast)
///     .unwrap();
/// ```
pub struct Resolver<'d> {
    dialect: &'d dyn Dialect,
    options: ResolverOptions,
    environment: Environment,
}

impl<'d> Resolver<'d> {
    /// Creates a lenient resolver with an empty environment.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            options: ResolverOptions::default(),
            environment: Environment::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the symbols visible to the whole batch.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Resolves `list`, attaching symbol tables and bindings.
    ///
    /// Annotations are write-once: resolving the same tree again reports
    /// the same errors but keeps the first bindings.
    pub fn resolve(&self, list: &StatementList) -> Result<(), ResolveError> {
        let mut builder = ScopeBuilder {
            dialect: self.dialect,
            strict: self.options.strict,
            current: self.environment.symbol_table(),
            enclosing: Vec::new(),
        };
        builder.visit_statement_list(list)
    }
}

/// The walk behind [`Resolver::resolve`].
///
/// `current` is the innermost open scope; `enclosing` holds the rest of
/// the chain, outermost first. The environment frame is always at the
/// bottom.
struct ScopeBuilder<'d> {
    dialect: &'d dyn Dialect,
    strict: bool,
    current: SymbolTable,
    enclosing: Vec<SymbolTable>,
}

impl ScopeBuilder<'_> {
    fn push(&mut self, kind: ScopeKind) {
        let parent = mem::replace(&mut self.current, SymbolTable::new(kind));
        self.enclosing.push(parent);
        debug!(scope = kind.as_str(), depth = self.enclosing.len(), "enter scope");
    }

    fn pop(&mut self, slot: &Scope) {
        let Some(parent) = self.enclosing.pop() else {
            return;
        };
        let table = mem::replace(&mut self.current, parent);
        debug!(
            scope = table.kind().as_str(),
            symbols = table.len(),
            depth = self.enclosing.len(),
            "leave scope"
        );
        slot.set(Arc::new(table));
    }

    fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        iter::once(&self.current)
            .chain(self.enclosing.iter().rev())
            .find_map(|frame| frame.get(name))
    }

    /// Looks up `name`, records the use, and returns a copy of the symbol.
    fn use_symbol(&mut self, name: &str, mark: impl FnOnce(&mut Usage)) -> Option<SymbolInfo> {
        self.use_symbol_where(name, |_| true, mark)
    }

    /// Like [`Self::use_symbol`], passing over symbols `accept` rejects.
    fn use_symbol_where(
        &mut self,
        name: &str,
        accept: impl Fn(&SymbolInfo) -> bool,
        mark: impl FnOnce(&mut Usage),
    ) -> Option<SymbolInfo> {
        let symbol = iter::once(&mut self.current)
            .chain(self.enclosing.iter_mut().rev())
            .find_map(|frame| frame.get_mut(name).filter(|symbol| accept(symbol)))?;
        mark(&mut symbol.usage);
        Some(symbol.clone())
    }

    /// Defines `symbol` in the current scope. Only a shadow may be
    /// replaced.
    fn define(&mut self, symbol: SymbolInfo) -> Result<(), ResolveError> {
        if let Some(existing) = self.current.get(&symbol.name) {
            if !existing.shadow {
                return Err(ResolveError::Duplicate {
                    name: symbol.name,
                    location: symbol.defined_at,
                    previous: existing.defined_at,
                });
            }
        }
        trace!(
            name = %symbol.name,
            kind = symbol.kind.as_str(),
            scope = self.current.kind().as_str(),
            "define symbol"
        );
        self.current.insert(symbol);
        Ok(())
    }

    /// Defines a variable under its own spelling plus a shadow under the
    /// other one.
    fn define_variable(
        &mut self,
        name: &str,
        kind: SymbolKind,
        location: Location,
    ) -> Result<SymbolInfo, ResolveError> {
        let symbol = variable_symbol(name, kind, location);
        self.define(symbol.clone())?;
        let shadow = shadow_symbol(&symbol);
        if !self.current.contains(&shadow.name) {
            self.current.insert(shadow);
        }
        Ok(symbol)
    }

    /// Records an assignment, defining the variable on first use.
    fn assign(&mut self, name: &str, location: Location, binding: &Annotation<Binding>) {
        if name.starts_with("@@") {
            return;
        }
        if self.lookup(name).is_none() {
            self.define_in_block(name, location);
        }
        if let Some(symbol) = self.use_symbol(name, |usage| usage.assigned = true) {
            binding.set(symbol.binding());
        }
    }

    /// Defines an undeclared variable, with its shadow, in the innermost
    /// statement list so later statements of the batch see it.
    fn define_in_block(&mut self, name: &str, location: Location) {
        let symbol = variable_symbol(name, SymbolKind::Scalar, location);
        let shadow = shadow_symbol(&symbol);
        let Some(frame) = iter::once(&mut self.current)
            .chain(self.enclosing.iter_mut().rev())
            .find(|frame| frame.kind() == ScopeKind::Block)
        else {
            return;
        };
        trace!(name, scope = frame.kind().as_str(), "define assigned variable");
        if !frame.contains(&shadow.name) {
            frame.insert(shadow);
        }
        frame.insert(symbol);
    }

    fn resolve_assignment(
        &mut self,
        assignment: &Assignment,
        column_target: bool,
    ) -> Result<(), ResolveError> {
        self.visit_expr(&assignment.value)?;
        match &assignment.target {
            Expr::Variable(v) => self.assign(&v.name, v.location, &v.binding),
            Expr::Identifier(id) if !column_target && id.is_single() => {
                self.assign(id.name(), id.location, &id.binding);
            }
            target => self.visit_expr(target)?,
        }
        Ok(())
    }

    /// Resolves a variable reference, which must always succeed.
    fn resolve_variable(
        &mut self,
        variable: &Variable,
        mark: impl FnOnce(&mut Usage),
    ) -> Result<Option<SymbolInfo>, ResolveError> {
        if variable.is_system() {
            return Ok(None);
        }
        let Some(symbol) = self.use_symbol(&variable.name, mark) else {
            return Err(ResolveError::Undefined {
                name: variable.name.clone(),
                location: variable.location,
            });
        };
        variable.binding.set(symbol.binding());
        Ok(Some(symbol))
    }

    /// Resolves what a table reference reads from.
    fn resolve_table_target(&mut self, target: &Expr) -> Result<(), ResolveError> {
        match target {
            Expr::Identifier(id) => self.bind_table_name(id),
            Expr::Variable(v) => match self.resolve_variable(v, |usage| usage.table = true)? {
                Some(symbol) if symbol.kind == SymbolKind::Scalar => Err(ResolveError::Misuse {
                    name: v.name.clone(),
                    misuse: MisuseKind::ScalarAsTable,
                    location: v.location,
                }),
                _ => Ok(()),
            },
            Expr::Function(call) => walk_function_call(self, call),
            other => self.visit_expr(other),
        }
    }

    /// Binds a table name to a CTE, table variable or environment table.
    ///
    /// Shadows never match: a bare table name is not a variable. Other
    /// single-part names must resolve in strict mode; multi-part names
    /// belong to the database and are left unbound.
    fn bind_table_name(&mut self, id: &ObjectIdentifier) -> Result<(), ResolveError> {
        let name = id.dotted();
        let found = self.use_symbol_where(
            &name,
            |symbol| !symbol.shadow && (symbol.kind == SymbolKind::Table || symbol.is_variable()),
            |usage| usage.table = true,
        );
        match found {
            Some(symbol) if symbol.kind == SymbolKind::Table => {
                id.binding.set(symbol.binding());
                Ok(())
            }
            Some(_) => Err(ResolveError::Misuse {
                name,
                misuse: MisuseKind::ScalarAsTable,
                location: id.location,
            }),
            None if self.strict && id.is_single() => Err(ResolveError::Undefined {
                name,
                location: id.location,
            }),
            None => Ok(()),
        }
    }

    /// Registers the name a table source is known by.
    fn expose(&mut self, table: &TableReference) -> Result<(), ResolveError> {
        if table.alias.is_none() && matches!(table.target, Expr::Variable(_)) {
            return Ok(());
        }
        let Some(name) = table.exposed_name() else {
            return Ok(());
        };
        let location = table.alias.as_ref().map_or(table.location, |a| a.name.location);
        self.define(SymbolInfo::new(
            name,
            SymbolOrigin::Alias,
            SymbolKind::Table,
            location,
        ))
    }

    /// Resolves the target of UPDATE or DELETE, which may name a source
    /// its FROM clause already exposed.
    fn resolve_dml_target(&mut self, target: &TableReference) -> Result<(), ResolveError> {
        if let (None, Expr::Identifier(id)) = (&target.alias, &target.target) {
            if id.is_single() && self.current.contains(id.name()) {
                if let Some(symbol) = self.use_symbol(id.name(), |usage| usage.table = true) {
                    id.binding.set(symbol.binding());
                }
                return Ok(());
            }
        }
        self.visit_table_reference(target)
    }

    /// Binds `qualifier.name`: first as a whole, then through the table
    /// its qualifier names.
    fn bind_qualified(&mut self, id: &ObjectIdentifier) {
        if let Some(symbol) = self.use_symbol(&id.dotted(), |usage| usage.scalar = true) {
            id.binding.set(symbol.binding());
            return;
        }
        if let Some(symbol) = self.use_source(id.qualifier()) {
            id.binding.set(symbol.binding());
        }
    }

    /// Finds the table source a qualifier refers to.
    fn use_source(&mut self, qualifier: &[Identifier]) -> Option<SymbolInfo> {
        let whole = join_parts(qualifier);
        let last = qualifier.last().map(|part| part.value.clone())?;
        let is_source = |symbol: &SymbolInfo| !symbol.shadow && symbol.kind == SymbolKind::Table;
        let name = [whole, last]
            .into_iter()
            .find(|name| self.lookup(name).is_some_and(is_source))?;
        self.use_symbol_where(&name, is_source, |usage| usage.table = true)
    }

    /// Resolves a SELECT list entry. In sigil dialects `@x = expr` assigns.
    fn resolve_column(&mut self, column: &Expr) -> Result<(), ResolveError> {
        match column {
            Expr::Alias(alias) => {
                self.visit_expr(&alias.expr)?;
                if !self.current.contains(&alias.alias.value) {
                    self.current.insert(SymbolInfo::new(
                        &alias.alias.value,
                        SymbolOrigin::Alias,
                        SymbolKind::Scalar,
                        alias.alias.location,
                    ));
                }
                Ok(())
            }
            Expr::Infix(infix)
                if infix.op == BinaryOp::Eq
                    && self.dialect.variable_style() == VariableStyle::Sigil =>
            {
                match &infix.left {
                    Expr::Variable(v) => {
                        self.visit_expr(&infix.right)?;
                        self.assign(&v.name, v.location, &v.binding);
                        Ok(())
                    }
                    _ => self.visit_expr(column),
                }
            }
            _ => self.visit_expr(column),
        }
    }
}

impl<'ast> Visitor<'ast> for ScopeBuilder<'_> {
    type Error = ResolveError;

    fn visit_statement_list(&mut self, list: &'ast StatementList) -> Result<(), ResolveError> {
        self.push(ScopeKind::Block);
        walk_statement_list(self, list)?;
        self.pop(&list.scope);
        Ok(())
    }

    /// Clauses are visited in evaluation order so the select list sees the
    /// FROM sources and ORDER BY sees the column aliases.
    fn visit_select(&mut self, select: &'ast SelectStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::Select);
        for source in &select.from {
            self.visit_table_source(source)?;
        }
        if let Some(expr) = &select.where_clause {
            self.visit_expr(expr)?;
        }
        for expr in &select.group_by {
            self.visit_expr(expr)?;
        }
        if let Some(expr) = &select.having {
            self.visit_expr(expr)?;
        }
        if let Some(top) = &select.top {
            self.visit_expr(&top.count)?;
        }
        for column in &select.columns {
            self.resolve_column(column)?;
        }
        for item in &select.order_by {
            self.visit_expr(&item.expr)?;
        }
        if let Some(limit) = &select.limit {
            for expr in limit.offset.iter().chain(&limit.count) {
                self.visit_expr(expr)?;
            }
        }
        self.pop(&select.scope);
        if let Some(compound) = &select.compound {
            self.visit_select(&compound.right)?;
        }
        Ok(())
    }

    fn visit_insert(&mut self, insert: &'ast InsertStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::Insert);
        self.resolve_table_target(&insert.target)?;
        match &insert.source {
            InsertSource::Values(rows) => {
                for value in rows.iter().flat_map(|row| &row.inner) {
                    self.visit_expr(value)?;
                }
            }
            InsertSource::Query(query) => self.visit_select(query)?,
            InsertSource::DefaultValues => {}
        }
        self.pop(&insert.scope);
        Ok(())
    }

    fn visit_update(&mut self, update: &'ast UpdateStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::Update);
        for source in &update.from {
            self.visit_table_source(source)?;
        }
        self.resolve_dml_target(&update.target)?;
        if let Some(top) = &update.top {
            self.visit_expr(&top.count)?;
        }
        for assignment in &update.assignments {
            self.resolve_assignment(assignment, true)?;
        }
        if let Some(expr) = &update.where_clause {
            self.visit_expr(expr)?;
        }
        self.pop(&update.scope);
        Ok(())
    }

    fn visit_delete(&mut self, delete: &'ast DeleteStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::Delete);
        for source in &delete.from {
            self.visit_table_source(source)?;
        }
        self.resolve_dml_target(&delete.target)?;
        if let Some(top) = &delete.top {
            self.visit_expr(&top.count)?;
        }
        if let Some(expr) = &delete.where_clause {
            self.visit_expr(expr)?;
        }
        self.pop(&delete.scope);
        Ok(())
    }

    fn visit_merge(&mut self, merge: &'ast MergeStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::Merge);
        self.visit_table_reference(&merge.target)?;
        self.visit_table_source(&merge.source)?;
        self.visit_expr(&merge.condition)?;
        for when in &merge.clauses {
            walk_merge_when(self, when)?;
        }
        self.pop(&merge.scope);
        Ok(())
    }

    fn visit_with(&mut self, with: &'ast WithStatement) -> Result<(), ResolveError> {
        self.push(ScopeKind::With);
        for cte in &with.ctes {
            let symbol = SymbolInfo::new(
                &cte.name.value,
                SymbolOrigin::UserDeclared,
                SymbolKind::Table,
                cte.name.location,
            );
            if cte.recursive {
                self.define(symbol)?;
                self.visit_cte(cte)?;
            } else {
                self.visit_cte(cte)?;
                self.define(symbol)?;
            }
        }
        self.visit_statement(&with.body)?;
        self.pop(&with.scope);
        Ok(())
    }

    /// The initializer is resolved before the name comes into scope.
    fn visit_declaration(&mut self, declaration: &'ast Declaration) -> Result<(), ResolveError> {
        if let Some(initial) = &declaration.initial {
            self.visit_expr(initial)?;
        }
        let kind = if declaration.is_table() {
            SymbolKind::Table
        } else {
            SymbolKind::Scalar
        };
        match &declaration.name {
            Expr::Variable(v) => {
                let symbol = self.define_variable(&v.name, kind, v.location)?;
                v.binding.set(symbol.binding());
            }
            Expr::Identifier(id) => {
                let symbol = self.define_variable(&id.dotted(), kind, id.location)?;
                id.binding.set(symbol.binding());
            }
            other => self.visit_expr(other)?,
        }
        Ok(())
    }

    fn visit_set(&mut self, set: &'ast SetStatement) -> Result<(), ResolveError> {
        match &set.body {
            SetBody::Assign(assignment) => self.resolve_assignment(assignment, false),
            SetBody::Option { value, .. } => self.visit_expr(value),
        }
    }

    fn visit_execute(&mut self, execute: &'ast ExecuteStatement) -> Result<(), ResolveError> {
        if let Some(status) = &execute.return_status {
            match status {
                Expr::Variable(v) => self.assign(&v.name, v.location, &v.binding),
                other => self.visit_expr(other)?,
            }
        }
        for arg in &execute.args {
            match &arg.value {
                Expr::Variable(v) if arg.output => self.assign(&v.name, v.location, &v.binding),
                value => self.visit_expr(value)?,
            }
        }
        Ok(())
    }

    fn visit_table_reference(&mut self, table: &'ast TableReference) -> Result<(), ResolveError> {
        self.resolve_table_target(&table.target)?;
        self.expose(table)
    }

    fn visit_derived_table(&mut self, derived: &'ast DerivedTable) -> Result<(), ResolveError> {
        self.visit_select(&derived.subquery.inner)?;
        if let Some(alias) = &derived.alias {
            self.define(SymbolInfo::new(
                &alias.name.value,
                SymbolOrigin::Alias,
                SymbolKind::Table,
                alias.name.location,
            ))?;
        }
        Ok(())
    }

    fn visit_assignment(&mut self, assignment: &'ast Assignment) -> Result<(), ResolveError> {
        self.resolve_assignment(assignment, true)
    }

    fn visit_expr(&mut self, expr: &'ast Expr) -> Result<(), ResolveError> {
        let Expr::Wildcard(wildcard) = expr else {
            return walk_expr(self, expr);
        };
        let Some(qualifier) = &wildcard.qualifier else {
            return Ok(());
        };
        match self.use_source(&qualifier.parts) {
            Some(symbol) => {
                qualifier.binding.set(symbol.binding());
                Ok(())
            }
            None if self.strict => Err(ResolveError::Undefined {
                name: qualifier.dotted(),
                location: qualifier.location,
            }),
            None => Ok(()),
        }
    }

    fn visit_function_call(&mut self, call: &'ast FunctionCall) -> Result<(), ResolveError> {
        let name = &call.name;
        if name.is_single() && !self.dialect.is_builtin_function(name.name()) {
            let found = self.use_symbol_where(
                name.name(),
                |symbol| !symbol.shadow,
                |usage| usage.invoked = true,
            );
            match found {
                Some(symbol) if symbol.is_variable() => {
                    return Err(ResolveError::Misuse {
                        name: name.name().to_string(),
                        misuse: MisuseKind::VariableInvoked,
                        location: name.location,
                    });
                }
                Some(symbol) => {
                    name.binding.set(symbol.binding());
                }
                None if self.strict => {
                    return Err(ResolveError::Undefined {
                        name: name.name().to_string(),
                        location: name.location,
                    });
                }
                None => {}
            }
        }
        walk_function_call(self, call)
    }

    /// Bare names must resolve in strict mode; qualified names never fail.
    /// A bare name reaches a scalar variable through its shadow, never a
    /// table variable.
    fn visit_object_identifier(&mut self, id: &'ast ObjectIdentifier) -> Result<(), ResolveError> {
        if !id.is_single() {
            self.bind_qualified(id);
            return Ok(());
        }
        let found = self.use_symbol_where(
            id.name(),
            |symbol| !symbol.shadow || symbol.kind == SymbolKind::Scalar,
            |usage| usage.scalar = true,
        );
        match found {
            Some(symbol) if symbol.kind == SymbolKind::Table && symbol.is_variable() => {
                Err(ResolveError::Misuse {
                    name: id.name().to_string(),
                    misuse: MisuseKind::TableAsScalar,
                    location: id.location,
                })
            }
            Some(symbol) => {
                id.binding.set(symbol.binding());
                Ok(())
            }
            None if self.strict => Err(ResolveError::Undefined {
                name: id.name().to_string(),
                location: id.location,
            }),
            None => Ok(()),
        }
    }

    fn visit_variable(&mut self, variable: &'ast Variable) -> Result<(), ResolveError> {
        match self.resolve_variable(variable, |usage| usage.scalar = true)? {
            Some(symbol) if symbol.kind == SymbolKind::Table => Err(ResolveError::Misuse {
                name: variable.name.clone(),
                misuse: MisuseKind::TableAsScalar,
                location: variable.location,
            }),
            _ => Ok(()),
        }
    }
}

fn variable_symbol(name: &str, kind: SymbolKind, location: Location) -> SymbolInfo {
    let mut symbol = SymbolInfo::new(name, SymbolOrigin::UserDeclared, kind, location);
    symbol.translation = Some(TranslationRule::for_name(name));
    symbol
}

fn shadow_symbol(symbol: &SymbolInfo) -> SymbolInfo {
    let name = TranslationRule::for_name(&symbol.name).apply(&symbol.name);
    let mut shadow = variable_symbol(&name, symbol.kind, symbol.defined_at);
    shadow.origin = symbol.origin;
    shadow.shadow = true;
    shadow
}

impl Environment {
    /// Builds the outermost scope from the host's symbols.
    pub(super) fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::new(ScopeKind::Environment);
        let location = Location::default();
        for name in &self.scalars {
            table.insert(SymbolInfo::new(
                name,
                SymbolOrigin::Environmental,
                SymbolKind::Scalar,
                location,
            ));
        }
        for name in &self.tables {
            table.insert(SymbolInfo::new(
                name,
                SymbolOrigin::Environmental,
                SymbolKind::Table,
                location,
            ));
        }
        for name in &self.variables {
            let mut symbol = variable_symbol(name, SymbolKind::Scalar, location);
            symbol.origin = SymbolOrigin::Environmental;
            let shadow = shadow_symbol(&symbol);
            if !table.contains(&shadow.name) {
                table.insert(shadow);
            }
            table.insert(symbol);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::dialect::StandardDialect;
    use crate::parser::parse_with;

    fn resolve(
        sql: &str,
        environment: Environment,
        strict: bool,
    ) -> Result<StatementList, ResolveError> {
        let list = parse_with(sql, &StandardDialect).expect("parses");
        Resolver::new(&StandardDialect)
            .with_options(ResolverOptions::default().with_strict(strict))
            .with_environment(environment)
            .resolve(&list)?;
        Ok(list)
    }

    fn first_select(list: &StatementList) -> &SelectStatement {
        match &list.statements[0] {
            Statement::Select(select) => select.as_ref(),
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_select_scope_holds_exposed_tables() {
        let list = resolve("SELECT a FROM t AS x, u", Environment::new(), false).expect("resolves");
        let scope = first_select(&list).scope.get().expect("scope attached");
        assert_eq!(scope.kind(), ScopeKind::Select);
        assert!(scope.contains("X"));
        assert!(scope.contains("u"));
        assert!(!scope.contains("t"));
        assert!(list.scope.get().is_some());
    }

    #[test]
    fn test_qualified_column_binds_to_source() {
        let list = resolve("SELECT x.a FROM t AS x", Environment::new().table("t"), true)
            .expect("resolves");
        let Expr::Identifier(id) = &first_select(&list).columns[0] else {
            panic!("expected identifier");
        };
        let binding = id.binding.get().expect("bound");
        assert_eq!(binding.name, "x");
        assert_eq!(binding.kind, SymbolKind::Table);
    }

    #[test]
    fn test_usage_flags_recorded() {
        let list =
            resolve("DECLARE n INT; SELECT n FROM t", Environment::new(), false).expect("resolves");
        let scope = list.scope.get().expect("scope attached");
        let symbol = scope.get("n").expect("declared");
        assert!(symbol.usage.scalar);
        assert!(!symbol.usage.assigned);
        assert!(scope.get("@n").is_some_and(|s| s.shadow));
    }

    #[test]
    fn test_environment_variable_has_shadow() {
        let table = Environment::new().variable("@limit").symbol_table();
        assert!(!table.get("@limit").expect("original").shadow);
        assert!(table.get("limit").expect("shadow").shadow);
    }
}
