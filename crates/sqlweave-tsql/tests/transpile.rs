//! Tests for converting between SQL Server and PostgreSQL.

use sqlweave_core::dialect::StandardDialect;
use sqlweave_core::{transpile, Environment, Error};
use sqlweave_pgsql::PostgresDialect;
use sqlweave_tsql::TSqlDialect;

fn to_postgres(sql: &str) -> String {
    transpile(sql, &TSqlDialect, &PostgresDialect, &Environment::new())
        .unwrap_or_else(|e| panic!("Failed to transpile: {sql}\nError: {e}"))
}

fn to_tsql(sql: &str) -> String {
    transpile(sql, &PostgresDialect, &TSqlDialect, &Environment::new())
        .unwrap_or_else(|e| panic!("Failed to transpile: {sql}\nError: {e}"))
}

// ===================================================================
// Variables
// ===================================================================

#[test]
fn sigil_variables_become_bare() {
    assert_eq!(
        to_postgres("DECLARE @x INT = 1; SELECT @x"),
        "DECLARE x INT := 1;\nSELECT x;"
    );
}

#[test]
fn bare_variables_gain_sigil() {
    assert_eq!(
        to_tsql("DECLARE x INT := 1; SELECT x"),
        "DECLARE @x INT = 1;\nSELECT @x;"
    );
}

#[test]
fn columns_keep_their_names() {
    assert_eq!(
        to_tsql("DECLARE n INT := 0; SELECT a FROM t WHERE a > n"),
        "DECLARE @n INT = 0;\nSELECT a FROM t WHERE a > @n;"
    );
}

#[test]
fn assignments() {
    assert_eq!(
        to_postgres("DECLARE @n INT = 0; SET @n = @n + 1"),
        "DECLARE n INT := 0;\nn := n + 1;"
    );
    assert_eq!(
        to_tsql("DECLARE n INT := 0; n := n * 2"),
        "DECLARE @n INT = 0;\nSET @n = @n * 2;"
    );
}

#[test]
fn compound_assignment_is_expanded() {
    assert_eq!(
        to_postgres("DECLARE @n INT = 0; SET @n += 2"),
        "DECLARE n INT := 0;\nn := n + 2;"
    );
    assert_eq!(
        to_postgres("DECLARE @n INT = 10; SET @n -= 1 + 2"),
        "DECLARE n INT := 10;\nn := n - (1 + 2);"
    );
}

#[test]
fn environment_variables_translate() {
    let env = Environment::new().variable("@since");
    let sql = transpile(
        "SELECT * FROM orders WHERE created > @since",
        &TSqlDialect,
        &PostgresDialect,
        &env,
    )
    .expect("transpiles");
    assert_eq!(sql, "SELECT * FROM orders WHERE created > since;");
}

#[test]
fn undeclared_variable_fails() {
    let err = transpile("SELECT @x", &TSqlDialect, &PostgresDialect, &Environment::new())
        .unwrap_err();
    assert!(matches!(err, Error::Resolve(_)));
}

// ===================================================================
// Row limits
// ===================================================================

#[test]
fn top_becomes_limit() {
    assert_eq!(
        to_postgres("SELECT TOP 5 a FROM t ORDER BY a"),
        "SELECT a FROM t ORDER BY a LIMIT 5;"
    );
}

#[test]
fn limit_offset_becomes_offset_fetch() {
    assert_eq!(
        to_tsql("SELECT a FROM t ORDER BY a LIMIT 10 OFFSET 20"),
        "SELECT a FROM t ORDER BY a OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
}

#[test]
fn standard_fetch_first() {
    let sql = transpile(
        "SELECT TOP (3) a FROM t",
        &TSqlDialect,
        &StandardDialect,
        &Environment::new(),
    )
    .expect("transpiles");
    assert_eq!(sql, "SELECT a FROM t FETCH FIRST 3 ROWS ONLY;");
}

// ===================================================================
// Control flow and procedures
// ===================================================================

#[test]
fn compact_if_becomes_block() {
    assert_eq!(
        to_postgres("DECLARE @x INT = 1; IF @x > 0 SELECT 1 ELSE SELECT 2"),
        "DECLARE x INT := 1;\nIF x > 0 THEN\n    SELECT 1;\nELSE\n    SELECT 2;\nEND IF;"
    );
}

#[test]
fn block_if_becomes_compact() {
    assert_eq!(
        to_tsql("DECLARE x INT := 1; IF x > 0 THEN SELECT 1; SELECT 2; END IF"),
        "DECLARE @x INT = 1;\nIF @x > 0\n    BEGIN\n        SELECT 1;\n        SELECT 2;\n    END;"
    );
}

#[test]
fn exec_becomes_call() {
    assert_eq!(to_postgres("EXEC dbo.archive 30"), "CALL dbo.archive(30);");
    assert_eq!(
        to_postgres("EXEC archive @days = 30"),
        "CALL archive(days => 30);"
    );
}

#[test]
fn call_becomes_exec() {
    assert_eq!(to_tsql("CALL archive(days => 30)"), "EXEC archive @days = 30;");
    assert_eq!(to_tsql("CALL refresh()"), "EXEC refresh;");
}

// ===================================================================
// Other syntax
// ===================================================================

#[test]
fn identifier_quoting() {
    assert_eq!(
        to_postgres("SELECT [Order Id] FROM [Order Details]"),
        "SELECT \"Order Id\" FROM \"Order Details\";"
    );
    assert_eq!(
        to_tsql("SELECT \"Order Id\" FROM \"Order Details\""),
        "SELECT [Order Id] FROM [Order Details];"
    );
}

#[test]
fn double_colon_cast_becomes_cast() {
    assert_eq!(
        to_tsql("SELECT id::text FROM users"),
        "SELECT CAST(id AS text) FROM users;"
    );
}

#[test]
fn recursive_cte_gains_keyword() {
    assert_eq!(
        to_postgres(
            "WITH c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5) SELECT n FROM c"
        ),
        "WITH RECURSIVE c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5)\nSELECT n FROM c;"
    );
    assert_eq!(
        to_tsql(
            "WITH RECURSIVE c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5) SELECT n FROM c"
        ),
        "WITH c AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM c WHERE n < 5)\nSELECT n FROM c;"
    );
}

#[test]
fn unknown_statements_pass_through() {
    assert_eq!(
        to_postgres("PRINT 'done'"),
        "PRINT 'done';"
    );
}
