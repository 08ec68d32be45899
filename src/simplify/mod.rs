//! Tree simplification passes.
//!
//! Both passes run before name binding and only look at literals and
//! statement structure:
//!
//! - `constant_fold`: evaluates operators over number literals and removes
//!   if/while statements whose condition is a known constant
//! - `unreachable`: drops statements that follow a return or break and makes
//!   sure every function ends in a return

pub mod constant_fold;
pub mod unreachable;

use crate::{ast::tree::SyntaxTree, errors::errors::Error};

/// Constant folding followed by unreachable-code removal.
pub fn simplify_syntax_tree(tree: &mut SyntaxTree) -> Result<(), Error> {
    constant_fold::constant_fold_syntax_tree(tree)?;
    unreachable::remove_unreachable_code_syntax_tree(tree)
}

#[cfg(test)]
mod tests;
