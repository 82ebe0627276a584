//! Variable spelling translation between sigil and bare dialects.

use std::sync::Arc;

use tracing::trace;

use crate::ast::{Annotation, Expr, ObjectIdentifier, StatementList, Variable};
use crate::dialect::VariableStyle;
use crate::resolve::{Binding, TranslationRule};
use crate::visit::{rewrite_expr, Rewriter};

/// Respells resolved variables for a dialect using `style`.
///
/// Only references the resolver bound to a variable are touched, so the
/// tree must have been resolved first. Columns, tables and unresolved names
/// keep their spelling. Bindings carry over to the respelled nodes.
#[must_use]
pub fn translate_variables(list: &StatementList, style: VariableStyle) -> StatementList {
    VariableTranslator { style }.rewrite_statement_list(list)
}

struct VariableTranslator {
    style: VariableStyle,
}

impl Rewriter for VariableTranslator {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        match (self.style, expr) {
            (VariableStyle::Bare, Expr::Variable(variable)) => {
                match rule(&variable.binding) {
                    Some(TranslationRule::StripSigil) => {
                        let name = TranslationRule::StripSigil.apply(&variable.name);
                        trace!(from = %variable.name, to = %name, "translate variable");
                        let id = ObjectIdentifier::single(name, variable.location);
                        carry(&variable.binding, &id.binding);
                        Expr::Identifier(Arc::new(id))
                    }
                    _ => expr.clone(),
                }
            }
            (VariableStyle::Sigil, Expr::Identifier(id)) if id.is_single() => {
                match rule(&id.binding) {
                    Some(TranslationRule::AddSigil) => {
                        let name = TranslationRule::AddSigil.apply(id.name());
                        trace!(from = %id.name(), to = %name, "translate variable");
                        let variable = Variable::new(name, id.location);
                        carry(&id.binding, &variable.binding);
                        Expr::Variable(Arc::new(variable))
                    }
                    _ => expr.clone(),
                }
            }
            _ => rewrite_expr(self, expr),
        }
    }
}

fn rule(binding: &Annotation<Binding>) -> Option<TranslationRule> {
    binding.get().and_then(|b| b.translation)
}

fn carry(from: &Annotation<Binding>, to: &Annotation<Binding>) {
    if let Some(binding) = from.get() {
        to.set(binding.clone());
    }
}
