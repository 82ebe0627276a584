//! Tests for name resolution: scopes, bindings and resolver errors.

mod common;
use common::*;

use sqlweave_core::ast::{Expr, Statement, StatementList, TableSource};
use sqlweave_core::dialect::StandardDialect;
use sqlweave_core::resolve::{MisuseKind, ScopeKind, SymbolKind, SymbolOrigin};
use sqlweave_core::{analyze, Environment, Error, ResolveError, Resolver, ResolverOptions};

fn strict(sql: &str, env: &Environment) -> Result<StatementList, ResolveError> {
    resolve_with(sql, env, true)
}

fn lenient(sql: &str) -> StatementList {
    resolve_with(sql, &Environment::new(), false)
        .unwrap_or_else(|e| panic!("Failed to resolve: {sql}\nError: {e}"))
}

fn resolve_with(sql: &str, env: &Environment, strict: bool) -> Result<StatementList, ResolveError> {
    let list = parse(sql);
    Resolver::new(&StandardDialect)
        .with_options(ResolverOptions::default().with_strict(strict))
        .with_environment(env.clone())
        .resolve(&list)?;
    Ok(list)
}

fn table_target(source: &TableSource) -> &Expr {
    match source {
        TableSource::Table(table) => &table.target,
        other => panic!("Expected table reference, got {other:?}"),
    }
}

// ===================================================================
// Strict and lenient modes
// ===================================================================

#[test]
fn lenient_accepts_unknown_columns() {
    lenient("SELECT Nope FROM MyTable WHERE Other = 1");
}

#[test]
fn strict_reports_undefined_at_reference() {
    let env = Environment::new().scalar("ColumnA").table("MyTable");
    let err = strict("SELECT Nope FROM MyTable", &env).unwrap_err();
    assert_eq!(
        err,
        ResolveError::Undefined {
            name: "Nope".to_string(),
            location: err.location(),
        }
    );
    assert_eq!(err.location().position(), (1, 8));
}

#[test]
fn strict_accepts_environment_symbols() {
    let env = Environment::new().scalar("a").scalar("b").table("t");
    strict("SELECT a, b FROM t WHERE a > b ORDER BY a", &env).expect("resolves");
}

#[test]
fn environment_lookup_ignores_case() {
    let env = Environment::new().scalar("ColumnA").table("T");
    strict("SELECT columna FROM t", &env).expect("resolves");
}

#[test]
fn strict_checks_functions_but_not_builtins() {
    let env = Environment::new().scalar("a").table("t");
    strict("SELECT COUNT(*), max(a) FROM t", &env).expect("builtins resolve");
    let err = strict("SELECT my_func(a) FROM t", &env).unwrap_err();
    assert_eq!(err.name(), "my_func");
}

#[test]
fn qualified_names_never_fail() {
    let env = Environment::new().table("t");
    strict("SELECT x.anything FROM t AS x", &env).expect("resolves");
    strict("SELECT a FROM dbo.Unknown AS x", &Environment::new().scalar("a")).expect("resolves");
}

#[test]
fn strict_checks_wildcard_qualifier() {
    let env = Environment::new().table("t");
    strict("SELECT x.* FROM t AS x", &env).expect("resolves");
    let err = strict("SELECT y.* FROM t AS x", &env).unwrap_err();
    assert_eq!(err.name(), "y");
}

#[test]
fn column_alias_visible_in_order_by() {
    let env = Environment::new().scalar("a").table("t");
    strict("SELECT a AS total FROM t ORDER BY total", &env).expect("resolves");
}

#[test]
fn analyze_wraps_resolver_errors() {
    let err = analyze(
        "SELECT Nope",
        &StandardDialect,
        ResolverOptions::default().with_strict(true),
        &Environment::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Resolve(ResolveError::Undefined { .. })));
    assert_eq!(err.location().position(), (1, 8));
}

#[test]
fn strict_reports_unknown_table() {
    let env = Environment::new().scalar("ColumnA");
    let err = strict("SELECT ColumnA FROM NoSuchTable", &env).unwrap_err();
    assert_eq!(err.name(), "NoSuchTable");
    assert_eq!(err.location().position(), (1, 21));
    lenient("SELECT ColumnA FROM NoSuchTable");
}

#[test]
fn strict_binds_environment_tables() {
    let env = Environment::new().scalar("a").table("Orders");
    let list = strict("SELECT a FROM orders", &env).expect("resolves");
    let Statement::Select(select) = &list.statements[0] else {
        panic!("Expected SELECT");
    };
    let Expr::Identifier(id) = table_target(&select.from[0]) else {
        panic!("Expected identifier");
    };
    let binding = id.binding.get().expect("bound");
    assert_eq!(binding.origin, SymbolOrigin::Environmental);
    assert_eq!(binding.kind, SymbolKind::Table);
}

#[test]
fn strict_checks_dml_targets() {
    let env = Environment::new().scalar("a").table("t");
    strict("UPDATE t SET a = 1; DELETE FROM t WHERE a = 2", &env).expect("resolves");
    let err = strict("INSERT INTO u (a) VALUES (1)", &env).unwrap_err();
    assert_eq!(err.name(), "u");
}

// ===================================================================
// Variables
// ===================================================================

#[test]
fn declared_variable_binds() {
    let list = lenient("DECLARE n INT; SELECT n");
    let Statement::Select(select) = &list.statements[1] else {
        panic!("Expected SELECT");
    };
    let Expr::Identifier(id) = &select.columns[0] else {
        panic!("Expected identifier");
    };
    let binding = id.binding.get().expect("bound");
    assert_eq!(binding.origin, SymbolOrigin::UserDeclared);
    assert_eq!(binding.kind, SymbolKind::Scalar);
    assert_eq!(binding.defined_at.position(), (1, 9));
}

#[test]
fn initializer_cannot_see_its_own_variable() {
    let err = strict("DECLARE n INT DEFAULT n", &Environment::new()).unwrap_err();
    assert_eq!(err.name(), "n");
}

#[test]
fn assignment_defines_variable() {
    let list = strict("SET n = 1; SELECT n", &Environment::new()).expect("resolves");
    let symbol = list.scope.get().expect("scope").get("n").cloned().expect("defined");
    assert!(symbol.usage.assigned);
    assert!(symbol.usage.scalar);
}

#[test]
fn environment_variable_resolves_under_both_spellings() {
    let env = Environment::new().variable("@cap");
    strict("SELECT cap", &env).expect("resolves");
}

#[test]
fn duplicate_declaration() {
    let err = strict("DECLARE n INT; DECLARE n INT", &Environment::new()).unwrap_err();
    let ResolveError::Duplicate {
        name,
        location,
        previous,
    } = err
    else {
        panic!("Expected duplicate");
    };
    assert_eq!(name, "n");
    assert_eq!(location.position(), (1, 24));
    assert_eq!(previous.position(), (1, 9));
}

#[test]
fn nested_block_may_redeclare() {
    lenient("DECLARE n INT; BEGIN DECLARE n INT; SELECT n; END");
}

// ===================================================================
// Misuse
// ===================================================================

#[test]
fn scalar_variable_used_as_table() {
    let err = strict("DECLARE x INT; SELECT * FROM x", &Environment::new()).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Misuse {
            misuse: MisuseKind::ScalarAsTable,
            ..
        }
    ));
}

#[test]
fn table_variable_used_as_scalar() {
    let err = strict("DECLARE t TABLE (id INT); SELECT t", &Environment::new()).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Misuse {
            misuse: MisuseKind::TableAsScalar,
            ..
        }
    ));
}

#[test]
fn variable_invoked_as_function() {
    let err = strict("DECLARE x INT; SELECT x(1)", &Environment::new()).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Misuse {
            misuse: MisuseKind::VariableInvoked,
            ..
        }
    ));
    assert_eq!(err.location().position(), (1, 23));
}

#[test]
fn misuse_is_reported_in_lenient_mode() {
    let list = parse("DECLARE x INT; SELECT * FROM x");
    assert!(Resolver::new(&StandardDialect).resolve(&list).is_err());
}

// ===================================================================
// Tables and CTEs
// ===================================================================

#[test]
fn duplicate_table_alias() {
    let env = Environment::new().table("t").table("u");
    let err = strict("SELECT * FROM t AS x, u AS x", &env).unwrap_err();
    assert!(matches!(err, ResolveError::Duplicate { .. }));
}

#[test]
fn duplicate_cte_name() {
    let err = strict(
        "WITH c AS (SELECT 1 AS a), c AS (SELECT 2 AS a) SELECT * FROM c",
        &Environment::new(),
    )
    .unwrap_err();
    assert_eq!(err.name(), "c");
}

#[test]
fn cte_is_visible_only_inside_its_statement() {
    let list = lenient("WITH c AS (SELECT 1 AS a) SELECT * FROM c; SELECT * FROM c");

    let Statement::With(with) = &list.statements[0] else {
        panic!("Expected WITH");
    };
    assert_eq!(with.scope.get().expect("scope").kind(), ScopeKind::With);
    let Statement::Select(body) = &with.body else {
        panic!("Expected SELECT body");
    };
    let Expr::Identifier(inside) = table_target(&body.from[0]) else {
        panic!("Expected identifier");
    };
    assert_eq!(inside.binding.get().map(|b| b.kind), Some(SymbolKind::Table));

    let Statement::Select(after) = &list.statements[1] else {
        panic!("Expected SELECT");
    };
    let Expr::Identifier(outside) = table_target(&after.from[0]) else {
        panic!("Expected identifier");
    };
    assert!(outside.binding.get().is_none());
}

#[test]
fn recursive_cte_sees_itself() {
    let sql = "WITH c AS (SELECT 1 AS n UNION ALL SELECT n FROM c) SELECT * FROM c";
    let list = lenient(sql);
    let Statement::With(with) = &list.statements[0] else {
        panic!("Expected WITH");
    };
    let compound = with.ctes[0].query.inner.compound.as_ref().expect("union");
    let Expr::Identifier(id) = table_target(&compound.right.from[0]) else {
        panic!("Expected identifier");
    };
    assert!(id.binding.get().is_some());
}

#[test]
fn subquery_sees_outer_sources() {
    let env = Environment::new().scalar("a").table("t").table("u");
    strict(
        "SELECT a FROM t AS x WHERE EXISTS (SELECT * FROM u WHERE u.id = x.id)",
        &env,
    )
    .expect("resolves");
}

#[test]
fn scopes_are_attached() {
    let list = lenient("SELECT a FROM t AS x");
    assert_eq!(list.scope.get().expect("batch scope").kind(), ScopeKind::Block);
    let Statement::Select(select) = &list.statements[0] else {
        panic!("Expected SELECT");
    };
    let scope = select.scope.get().expect("select scope");
    assert_eq!(scope.kind(), ScopeKind::Select);
    assert!(scope.contains("x"));
}
