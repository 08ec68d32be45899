use std::fmt::Write;

use crate::ast::{print::dump_syntax_tree, tree::SyntaxTree};

use super::{string_table::StringTable, symbol::SymbolKind, symbol_table::SymbolTable};

/// Prints `<sequence>: <KIND>(<name>)` per symbol, recursing into function
/// tables with four more spaces of indentation.
pub fn print_symbol_table(table: &SymbolTable, nesting: usize) -> String {
    let mut out = String::new();
    write_symbol_table(table, nesting, &mut out);
    out
}

fn write_symbol_table(table: &SymbolTable, nesting: usize, out: &mut String) {
    for symbol in table.symbols() {
        writeln!(
            out,
            "{:indent$}{}: {}({})",
            "",
            symbol.sequence_number,
            symbol.kind,
            symbol.name,
            indent = nesting * 4
        )
        .unwrap();

        if symbol.kind == SymbolKind::Function {
            if let Some(locals) = &symbol.function_table {
                write_symbol_table(locals, nesting + 1, out);
            }
        }
    }
}

pub fn print_string_list(strings: &StringTable) -> String {
    let mut out = String::new();
    for (index, string) in strings.iter().enumerate() {
        writeln!(out, "{}: {}", index, string).unwrap();
    }
    out
}

/// The symbol tables, the string list and the bound tree, in that order.
pub fn print_tables(tree: &SyntaxTree, globals: &SymbolTable, strings: &StringTable) -> String {
    let mut out = print_symbol_table(globals, 0);
    out.push_str("\n == STRING LIST ==\n");
    out.push_str(&print_string_list(strings));
    out.push_str("\n == BOUND SYNTAX TREE ==\n");
    out.push_str(&dump_syntax_tree(tree, Some(globals)));
    out
}
