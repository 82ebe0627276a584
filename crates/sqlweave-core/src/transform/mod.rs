//! Whole-tree rewrites built on [`crate::visit::Rewriter`].

mod fold;
mod translate;

pub use fold::fold_constants;
pub use translate::translate_variables;
