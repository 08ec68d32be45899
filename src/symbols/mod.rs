//! Symbol tables and name binding.
//!
//! This module builds the global symbol table and one local table per
//! function, binds every identifier to the symbol it refers to, and moves
//! string literals into the string table:
//!
//! - `symbol`: symbols, their kinds and the handles stored on tree nodes
//! - `symbol_table`: append-only tables with a stack of lookup scopes
//! - `string_table`: the ordered list of string literals
//! - `globals`: the scan that creates global, function and parameter symbols
//! - `binder`: the per-function walk that resolves names
//! - `print`: dumps of the tables and the string list

pub mod binder;
pub mod globals;
pub mod print;
pub mod string_table;
pub mod symbol;
pub mod symbol_table;
