//! Tests for PostgreSQL syntax: casts, LIMIT, PL/pgSQL variables, block IF
//! and CALL.

use sqlweave_core::ast::{Expr, SetBody, Statement, StatementList};
use sqlweave_core::resolve::Resolver;
use sqlweave_core::{fold_constants, Environment, ResolverOptions};
use sqlweave_pgsql::{parse, render, PostgresDialect};

fn parse_ok(sql: &str) -> StatementList {
    parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

fn round_trip(sql: &str) -> String {
    let ast1 = parse_ok(sql);
    let rendered1 = render(&ast1);
    let ast2 = parse_ok(&rendered1);
    assert_eq!(render(&ast2), rendered1, "Round-trip failed for: {sql}");
    assert_eq!(ast1, ast2, "Re-parsed tree differs for: {sql}");
    rendered1
}

// ===================================================================
// Expressions
// ===================================================================

#[test]
fn double_colon_cast() {
    let list = parse_ok("SELECT id::text FROM users");
    let Statement::Select(select) = &list.statements[0] else {
        panic!("Expected SELECT");
    };
    assert!(matches!(&select.columns[0], Expr::Cast(cast) if cast.shorthand));
    assert_eq!(
        round_trip("select id::text from users"),
        "SELECT id::text FROM users;"
    );
}

#[test]
fn cast_shorthand_keeps_parentheses() {
    assert_eq!(
        round_trip("SELECT (a + 1)::bigint FROM t"),
        "SELECT (a + 1)::bigint FROM t;"
    );
    assert_eq!(
        round_trip("SELECT CAST(a + 1 AS bigint) FROM t"),
        "SELECT CAST(a + 1 AS bigint) FROM t;"
    );
}

#[test]
fn string_concatenation() {
    assert_eq!(
        round_trip("SELECT given || ' ' || family FROM people"),
        "SELECT given || ' ' || family FROM people;"
    );
}

#[test]
fn folding_casts() {
    let list = fold_constants(&parse_ok("SELECT 7.9::int, (2 + 3) * 4"));
    assert_eq!(render(&list), "SELECT 7, 20;");
}

// ===================================================================
// Row limits
// ===================================================================

#[test]
fn limit_and_offset() {
    assert_eq!(
        round_trip("SELECT a FROM t ORDER BY a LIMIT 10 OFFSET 20"),
        "SELECT a FROM t ORDER BY a LIMIT 10 OFFSET 20;"
    );
    assert_eq!(
        round_trip("SELECT a FROM t OFFSET 5"),
        "SELECT a FROM t OFFSET 5;"
    );
}

#[test]
fn fetch_is_rendered_as_limit() {
    assert_eq!(
        render(&parse_ok("SELECT a FROM t FETCH FIRST 3 ROWS ONLY")),
        "SELECT a FROM t LIMIT 3;"
    );
}

// ===================================================================
// PL/pgSQL
// ===================================================================

#[test]
fn declare_and_bare_assignment() {
    let list = parse_ok("DECLARE total INT := 0; total := total + 1");
    let Statement::Set(set) = &list.statements[1] else {
        panic!("Expected assignment");
    };
    assert!(matches!(set.body, SetBody::Assign(_)));
    assert_eq!(
        round_trip("DECLARE total INT := 0; total := total + 1"),
        "DECLARE total INT := 0;\ntotal := total + 1;"
    );
}

#[test]
fn set_changes_a_setting() {
    let list = parse_ok("SET search_path TO public");
    let Statement::Set(set) = &list.statements[0] else {
        panic!("Expected SET");
    };
    assert!(matches!(&set.body, SetBody::Option { name, .. } if name.value == "search_path"));
    assert_eq!(render(&list), "SET search_path = PUBLIC;");
    round_trip("SET search_path = public");
}

#[test]
fn declared_variables_resolve_strictly() {
    let list = parse_ok("DECLARE total INT := 0; total := total + 1; SELECT total");
    Resolver::new(&PostgresDialect)
        .with_options(ResolverOptions::default().with_strict(true))
        .with_environment(Environment::new())
        .resolve(&list)
        .expect("resolves");
    let symbol = list.scope.get().expect("scope").get("total").cloned().expect("declared");
    assert!(symbol.usage.assigned);
    assert!(symbol.usage.scalar);
}

#[test]
fn block_if() {
    assert_eq!(
        round_trip("IF a = 1 THEN SELECT 1; SELECT 2; ELSE SELECT 3; END IF"),
        "IF a = 1 THEN\n    SELECT 1;\n    SELECT 2;\nELSE\n    SELECT 3;\nEND IF;"
    );
}

// ===================================================================
// CALL and CTEs
// ===================================================================

#[test]
fn call_with_named_arguments() {
    assert_eq!(
        round_trip("call archive(30, keep => true)"),
        "CALL archive(30, keep => TRUE);"
    );
}

#[test]
fn recursive_cte() {
    let sql = "WITH RECURSIVE c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5) SELECT n FROM c";
    assert_eq!(
        round_trip(sql),
        "WITH RECURSIVE c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5)\nSELECT n FROM c;"
    );
}

#[test]
fn unknown_statements_are_captured() {
    let list = parse_ok("VACUUM ANALYZE users; SELECT 1");
    assert_eq!(list.len(), 2);
    assert!(matches!(list.statements[0], Statement::Unknown(_)));
    assert_eq!(render(&list), "VACUUM ANALYZE users;\nSELECT 1;");
}
