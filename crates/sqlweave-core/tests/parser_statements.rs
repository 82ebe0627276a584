//! Tests for statements beyond SELECT: DML, MERGE, variables, control flow
//! and procedure calls.

mod common;
use common::*;

use sqlweave_core::ast::{AssignOp, InsertSource, SetBody, Statement};
use sqlweave_core::dialect::StandardDialect;
use sqlweave_core::{Parser, ParserOptions};

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_values() {
    let Statement::Insert(insert) = parse_statement("insert into t (a, b) values (1, 'x'), (2, 'y')")
    else {
        panic!("Expected INSERT");
    };
    assert_eq!(insert.columns.len(), 2);
    let InsertSource::Values(rows) = &insert.source else {
        panic!("Expected VALUES");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(
        parse("insert into t (a, b) values (1, 'x'), (2, 'y')").to_string(),
        "INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y');"
    );
}

#[test]
fn insert_from_query() {
    let Statement::Insert(insert) = parse_statement("INSERT INTO t SELECT a FROM u") else {
        panic!("Expected INSERT");
    };
    assert!(matches!(insert.source, InsertSource::Query(_)));
    round_trip("INSERT INTO t (a) SELECT a FROM u WHERE a > 0");
}

#[test]
fn insert_default_values() {
    let Statement::Insert(insert) = parse_statement("INSERT INTO t DEFAULT VALUES") else {
        panic!("Expected INSERT");
    };
    assert!(matches!(insert.source, InsertSource::DefaultValues));
    round_trip("INSERT INTO t DEFAULT VALUES");
}

#[test]
fn insert_target_cannot_be_aliased() {
    let err = parse_err("INSERT INTO t AS x VALUES (1)");
    assert_eq!(err.message, "INSERT target cannot be aliased");
}

#[test]
fn insert_needs_a_source() {
    let err = parse_err("INSERT INTO t (a)");
    assert_eq!(err.expected.as_deref(), Some("VALUES, SELECT or DEFAULT VALUES"));
}

// ===================================================================
// UPDATE / DELETE
// ===================================================================

#[test]
fn update_with_where() {
    let Statement::Update(update) = parse_statement("UPDATE t SET a = 1, b = b + 1 WHERE c = 2")
    else {
        panic!("Expected UPDATE");
    };
    assert_eq!(update.assignments.len(), 2);
    assert!(update.assignments.iter().all(|a| a.op == AssignOp::Assign));
    assert_eq!(
        parse("update t set a = 1, b = b + 1 where c = 2").to_string(),
        "UPDATE t SET a = 1, b = b + 1 WHERE c = 2;"
    );
}

#[test]
fn update_from_join() {
    round_trip("UPDATE x SET a = y.a FROM t AS x INNER JOIN u AS y ON x.id = y.id");
}

#[test]
fn compound_assignment_needs_dialect_support() {
    let err = parse_err("UPDATE t SET a += 1");
    assert_eq!(err.expected.as_deref(), Some("assignment operator"));
}

#[test]
fn delete_gains_from() {
    assert_eq!(
        parse("DELETE t WHERE a = 1").to_string(),
        "DELETE FROM t WHERE a = 1;"
    );
    round_trip("DELETE FROM t WHERE a IN (SELECT a FROM u)");
}

// ===================================================================
// MERGE
// ===================================================================

#[test]
fn merge_round_trips() {
    round_trip(
        "MERGE INTO t USING s ON t.id = s.id \
         WHEN MATCHED AND s.gone = 1 THEN DELETE \
         WHEN MATCHED THEN UPDATE SET v = s.v \
         WHEN NOT MATCHED THEN INSERT (id, v) VALUES (s.id, s.v)",
    );
}

#[test]
fn merge_by_source() {
    let Statement::Merge(merge) =
        parse_statement("MERGE INTO t USING s ON t.id = s.id WHEN NOT MATCHED BY SOURCE THEN DELETE")
    else {
        panic!("Expected MERGE");
    };
    assert!(merge.clauses[0].scope.is_some());
    round_trip("MERGE INTO t USING s ON t.id = s.id WHEN NOT MATCHED BY SOURCE THEN DELETE");
}

// ===================================================================
// DECLARE / SET
// ===================================================================

#[test]
fn declare_scalars() {
    let Statement::Declare(declare) = parse_statement("DECLARE n INT DEFAULT 0, s VARCHAR(10)")
    else {
        panic!("Expected DECLARE");
    };
    assert_eq!(declare.declarations.len(), 2);
    assert!(declare.declarations[0].initial.is_some());
    assert!(declare.declarations[1].initial.is_none());
    assert_eq!(
        parse("DECLARE n INT DEFAULT 0, s VARCHAR(10)").to_string(),
        "DECLARE n INT DEFAULT 0, s VARCHAR(10);"
    );
}

#[test]
fn declare_table_variable() {
    let sql = "DECLARE t TABLE (id INT NOT NULL PRIMARY KEY, name VARCHAR(50) NULL)";
    let Statement::Declare(declare) = parse_statement(sql) else {
        panic!("Expected DECLARE");
    };
    assert!(declare.declarations[0].is_table());
    assert_eq!(parse(sql).to_string(), format!("{sql};"));
}

#[test]
fn set_assignment_and_option() {
    let Statement::Set(set) = parse_statement("SET n = n + 1") else {
        panic!("Expected SET");
    };
    assert!(matches!(set.body, SetBody::Assign(_)));

    let Statement::Set(set) = parse_statement("SET NOCOUNT ON") else {
        panic!("Expected SET");
    };
    assert!(matches!(&set.body, SetBody::Option { name, .. } if name.value == "NOCOUNT"));
    assert_eq!(parse("SET NOCOUNT ON").to_string(), "SET NOCOUNT ON;");
}

// ===================================================================
// IF / BEGIN ... END
// ===================================================================

#[test]
fn if_block_round_trips() {
    round_trip("IF a = 1 THEN SELECT 1; ELSE SELECT 2; END IF");
    round_trip("IF EXISTS (SELECT * FROM t) THEN DELETE FROM t; END IF");
}

#[test]
fn if_without_then_is_an_error() {
    let err = parse_err("IF a = 1 SELECT 1");
    assert_eq!(err.expected.as_deref(), Some("keyword 'THEN'"));
}

#[test]
fn begin_end_renders_indented() {
    assert_eq!(
        parse("BEGIN SELECT 1; SELECT 2; END").to_string(),
        "BEGIN\n    SELECT 1;\n    SELECT 2;\nEND;"
    );
    round_trip("BEGIN SELECT 1; BEGIN SELECT 2; END; END");
}

#[test]
fn unclosed_block_is_an_error() {
    let err = parse_err("BEGIN SELECT 1;");
    assert_eq!(err.found.as_deref(), Some("end of input"));
}

// ===================================================================
// CALL
// ===================================================================

#[test]
fn call_with_named_argument() {
    let Statement::Execute(call) = parse_statement("CALL p(1, x => 2)") else {
        panic!("Expected CALL");
    };
    assert_eq!(call.args.len(), 2);
    assert!(call.args[0].name.is_none());
    assert!(call.args[1].name.is_some());
    assert_eq!(parse("call p(1, x => 2)").to_string(), "CALL p(1, x => 2);");
    round_trip("CALL p()");
}

// ===================================================================
// Errors
// ===================================================================

#[test]
fn unknown_statement_is_an_error() {
    let err = parse_err("PRINT 'hi'");
    assert_eq!(err.expected.as_deref(), Some("statement"));
    assert_eq!(err.location.position(), (1, 1));
}

#[test]
fn incomplete_statements() {
    assert_eq!(parse_err("SELECT").found.as_deref(), Some("end of input"));
    assert_eq!(parse_err("SELECT * FROM").found.as_deref(), Some("end of input"));
    parse_err("SELECT (1 + 2");
}

#[test]
fn error_reports_line_and_column() {
    let err = parse_err("SELECT a\nFROM t\nWHERE = 1");
    assert_eq!(err.location.position(), (3, 7));
}

#[test]
fn nesting_limit() {
    let sql = "BEGIN BEGIN BEGIN SELECT 1; END; END; END";
    let options = ParserOptions::default().with_max_depth(3);
    let err = Parser::new(sql, &StandardDialect)
        .with_options(options)
        .parse()
        .expect_err("too deep");
    assert!(err.message.contains("maximum depth of 3"));

    let options = ParserOptions::default().with_max_depth(5);
    assert!(Parser::new(sql, &StandardDialect)
        .with_options(options)
        .parse()
        .is_ok());
}
