//! The global-declaration scan.
//!
//! Walks the top level of the tree once, creating a symbol for every global
//! variable, global array and function. Each function symbol gets its own
//! local table, pre-populated with its parameters. Any name collision here is
//! fatal.

use tracing::debug;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        tree::SyntaxTree,
    },
    errors::errors::Error,
};

use super::{
    symbol::{Symbol, SymbolId, SymbolKind, TableId},
    symbol_table::SymbolTable,
};

pub fn find_globals(tree: &mut SyntaxTree) -> Result<SymbolTable, Error> {
    let mut globals = SymbolTable::new(TableId::Global);
    let Some(root) = tree.root() else {
        return Ok(globals);
    };

    for global in tree.children(root).to_vec().into_iter().flatten() {
        match tree.kind(global) {
            NodeKind::GlobalDeclaration => declare_global_variables(tree, &mut globals, global)?,
            NodeKind::Function => declare_function(tree, &mut globals, global)?,
            _ => {}
        }
    }

    debug!(symbols = globals.len(), "collected global symbols");
    Ok(globals)
}

fn declare_global_variables(tree: &mut SyntaxTree, globals: &mut SymbolTable, declaration: NodeId) -> Result<(), Error> {
    let Some(variables) = tree.child(declaration, 0) else {
        return Ok(());
    };

    for variable in tree.children(variables).to_vec().into_iter().flatten() {
        let (identifier, kind) = match tree.kind(variable) {
            NodeKind::Identifier => (variable, SymbolKind::GlobalVar),
            NodeKind::ArrayIndexing => match tree.child(variable, 0) {
                Some(name) => (name, SymbolKind::GlobalArray),
                None => continue,
            },
            _ => continue,
        };

        declare(tree, globals, identifier, variable, kind)?;
    }

    Ok(())
}

fn declare_function(tree: &mut SyntaxTree, globals: &mut SymbolTable, function: NodeId) -> Result<(), Error> {
    let Some(name_node) = tree.child(function, 0) else {
        return Ok(());
    };

    let mut locals = SymbolTable::new(TableId::Function(globals.next_sequence()));

    if let Some(parameters) = tree.child(function, 1) {
        for parameter in tree.children(parameters).to_vec().into_iter().flatten() {
            declare(tree, &mut locals, parameter, parameter, SymbolKind::Parameter)?;
        }
    }

    let name = identifier_name(tree, name_node);
    let symbol = globals.insert(Symbol::function(name, function, locals), tree.position(name_node))?;
    tree.node_mut(name_node).symbol = Some(symbol);

    Ok(())
}

/// Inserts a symbol named after `identifier` and binds the identifier to it.
/// `declaring` is the node recorded as the symbol's declaration.
pub(crate) fn declare(
    tree: &mut SyntaxTree,
    table: &mut SymbolTable,
    identifier: NodeId,
    declaring: NodeId,
    kind: SymbolKind,
) -> Result<SymbolId, Error> {
    let name = identifier_name(tree, identifier);
    let symbol = table.insert(Symbol::new(name, kind, declaring), tree.position(identifier))?;
    tree.node_mut(identifier).symbol = Some(symbol);
    Ok(symbol)
}

pub(crate) fn identifier_name(tree: &SyntaxTree, identifier: NodeId) -> String {
    tree.node(identifier).identifier().unwrap_or_default().to_string()
}
