#![allow(dead_code)]

use sqlweave_core::ast::{Query, Statement, StatementList};
use sqlweave_core::dialect::{Dialect, StandardDialect};
use sqlweave_core::render::render;
use sqlweave_core::{parse_with, ParseError};

pub fn parse(sql: &str) -> StatementList {
    parse_in(sql, &StandardDialect)
}

pub fn parse_in(sql: &str, dialect: &dyn Dialect) -> StatementList {
    parse_with(sql, dialect).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_with(sql, &StandardDialect)
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_statement(sql: &str) -> Statement {
    let list = parse(sql);
    assert_eq!(list.len(), 1, "Expected one statement in: {sql}");
    list.statements[0].clone()
}

pub fn parse_select(sql: &str) -> Query {
    match parse_statement(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

/// Verifies that rendering is a fixed point and that the rendered text
/// parses back to the same tree.
pub fn round_trip(sql: &str) {
    round_trip_in(sql, &StandardDialect);
}

pub fn round_trip_in(sql: &str, dialect: &dyn Dialect) {
    let ast1 = parse_in(sql, dialect);
    let rendered1 = render(&ast1, dialect);
    let ast2 = parse_in(&rendered1, dialect);
    let rendered2 = render(&ast2, dialect);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(ast1, ast2, "Re-parsed tree differs for: {sql}");
}
