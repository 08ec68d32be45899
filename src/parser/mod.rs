//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a tree of nodes in a [`SyntaxTree`](crate::ast::tree::SyntaxTree)
//! arena. It uses a Pratt parser for expressions with proper operator
//! precedence and handles:
//!
//! - Global declarations and function definitions
//! - Statement parsing (blocks with declarations, control flow, print)
//! - Expression parsing (binary and unary operators, calls, indexing)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
