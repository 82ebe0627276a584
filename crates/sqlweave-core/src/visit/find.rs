//! Generic node search.

use core::convert::Infallible;

use super::{walk_expr, walk_select, walk_statement, walk_table_source, Visitor};
use crate::ast::{Expr, SelectStatement, Statement, StatementList, TableSource};

/// A borrowed node of one of the searchable families.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    List(&'a StatementList),
    Statement(&'a Statement),
    Query(&'a SelectStatement),
    TableSource(&'a TableSource),
    Expr(&'a Expr),
}

struct Finder<'a, F> {
    predicate: F,
    found: Vec<NodeRef<'a>>,
}

impl<'a, F: FnMut(&NodeRef<'a>) -> bool> Finder<'a, F> {
    fn check(&mut self, node: NodeRef<'a>) {
        if (self.predicate)(&node) {
            self.found.push(node);
        }
    }
}

impl<'a, F: FnMut(&NodeRef<'a>) -> bool> Visitor<'a> for Finder<'a, F> {
    type Error = Infallible;

    fn visit_statement(&mut self, statement: &'a Statement) -> Result<(), Infallible> {
        self.check(NodeRef::Statement(statement));
        walk_statement(self, statement)
    }

    fn visit_select(&mut self, select: &'a SelectStatement) -> Result<(), Infallible> {
        self.check(NodeRef::Query(select));
        walk_select(self, select)
    }

    fn visit_table_source(&mut self, source: &'a TableSource) -> Result<(), Infallible> {
        self.check(NodeRef::TableSource(source));
        walk_table_source(self, source)
    }

    fn visit_expr(&mut self, expr: &'a Expr) -> Result<(), Infallible> {
        self.check(NodeRef::Expr(expr));
        walk_expr(self, expr)
    }
}

/// Returns every node under `root`, `root` included, for which `predicate`
/// holds, in pre-order.
pub fn find_nodes<'a, F>(root: NodeRef<'a>, predicate: F) -> Vec<NodeRef<'a>>
where
    F: FnMut(&NodeRef<'a>) -> bool,
{
    let mut finder = Finder {
        predicate,
        found: Vec::new(),
    };
    let result = match root {
        NodeRef::List(list) => {
            finder.check(root);
            finder.visit_statement_list(list)
        }
        NodeRef::Statement(statement) => finder.visit_statement(statement),
        NodeRef::Query(select) => finder.visit_select(select),
        NodeRef::TableSource(source) => finder.visit_table_source(source),
        NodeRef::Expr(expr) => finder.visit_expr(expr),
    };
    match result {
        Ok(()) => finder.found,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::StandardDialect;
    use crate::parser::parse_with;

    #[test]
    fn test_find_numbers() {
        let list = parse_with("SELECT 1, a + 2 FROM t WHERE b = (SELECT 3)", &StandardDialect)
            .expect("parses");
        let numbers = find_nodes(NodeRef::List(&list), |node| {
            matches!(node, NodeRef::Expr(Expr::Number(_)))
        });
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn test_find_includes_root() {
        let list = parse_with("SELECT 1", &StandardDialect).expect("parses");
        let Statement::Select(select) = &list.statements[0] else {
            panic!("expected select");
        };
        let queries = find_nodes(NodeRef::Query(select), |node| {
            matches!(node, NodeRef::Query(_))
        });
        assert_eq!(queries.len(), 1);
    }
}
