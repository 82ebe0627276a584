//! Constant folding over numeric literals.

use tracing::trace;

use crate::ast::{BinaryOp, Expr, Number, StatementList, UnaryOp};
use crate::visit::{rewrite_expr, Rewriter};

/// Folds arithmetic, negation, parentheses and numeric casts whose operands
/// are all numeric literals.
///
/// Operands are promoted to the wider sub-kind first. Operations that
/// overflow or divide by zero are left as written.
#[must_use]
pub fn fold_constants(list: &StatementList) -> StatementList {
    ConstantFolder.rewrite_statement_list(list)
}

struct ConstantFolder;

impl Rewriter for ConstantFolder {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        let expr = rewrite_expr(self, expr);
        match fold(&expr) {
            Some(value) => {
                trace!(%value, "folded constant");
                Expr::number(value, expr.location())
            }
            None => expr,
        }
    }
}

fn fold(expr: &Expr) -> Option<Number> {
    match expr {
        Expr::Infix(e) => {
            let (left, right) = (e.left.as_number()?, e.right.as_number()?);
            match e.op {
                BinaryOp::Add => left.checked_add(right),
                BinaryOp::Sub => left.checked_sub(right),
                BinaryOp::Mul => left.checked_mul(right),
                BinaryOp::Div => left.checked_div(right),
                BinaryOp::Mod => left.checked_rem(right),
                _ => None,
            }
        }
        Expr::Prefix(e) => match e.op {
            UnaryOp::Neg => e.operand.as_number()?.checked_neg(),
            UnaryOp::Plus => e.operand.as_number(),
            UnaryOp::BitNot | UnaryOp::Not => None,
        },
        Expr::Paren(e) => e.inner.as_number(),
        Expr::Cast(e) => e.expr.as_number()?.cast(e.data_type.number_kind()?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decimal, Statement};
    use crate::dialect::StandardDialect;
    use crate::parser::parse_with;

    fn folded_column(sql: &str) -> Expr {
        let list = fold_constants(&parse_with(sql, &StandardDialect).expect("parses"));
        let Statement::Select(select) = &list.statements[0] else {
            panic!("expected select");
        };
        select.columns[0].clone()
    }

    #[test]
    fn test_fold_respects_precedence() {
        assert_eq!(
            folded_column("SELECT 1 + 2 * 3").as_number(),
            Some(Number::Int(7))
        );
        assert_eq!(
            folded_column("SELECT (1 + 2) * 3").as_number(),
            Some(Number::Int(9))
        );
        assert_eq!(
            folded_column("SELECT 1 + 2 * -3").as_number(),
            Some(Number::Int(-5))
        );
    }

    #[test]
    fn test_fold_promotes() {
        assert_eq!(
            folded_column("SELECT 5000000000 + 1").as_number(),
            Some(Number::BigInt(5_000_000_001))
        );
        assert_eq!(
            folded_column("SELECT 1.5 * 2").as_number(),
            Decimal::new(30, 1).map(Number::Numeric)
        );
    }

    #[test]
    fn test_fold_cast() {
        assert_eq!(
            folded_column("SELECT CAST(7.9 AS INT)").as_number(),
            Some(Number::Int(7))
        );
        assert_eq!(
            folded_column("SELECT CAST(3 AS BIGINT)").as_number(),
            Some(Number::BigInt(3))
        );
    }

    #[test]
    fn test_unfoldable_left_alone() {
        assert!(matches!(folded_column("SELECT 1 / 0"), Expr::Infix(_)));
        assert!(matches!(folded_column("SELECT a + 1"), Expr::Infix(_)));
        assert!(matches!(folded_column("SELECT CAST(1 AS VARCHAR)"), Expr::Cast(_)));
    }

    #[test]
    fn test_untouched_tree_is_shared() {
        let list = parse_with("SELECT a FROM t WHERE b = c", &StandardDialect).expect("parses");
        let folded = fold_constants(&list);
        let (Statement::Select(before), Statement::Select(after)) =
            (&list.statements[0], &folded.statements[0])
        else {
            panic!("expected selects");
        };
        assert!(std::sync::Arc::ptr_eq(before, after));
    }
}
