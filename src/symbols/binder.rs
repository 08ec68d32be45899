//! Name binding.
//!
//! After the global scan, every function body is walked once with the
//! function's scope chain active. Blocks with a declaration section open a
//! new scope for their locals, identifiers are bound to the nearest symbol
//! with their name, and string literals are moved into the string table and
//! replaced by references to it.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::{
    ast::{
        ast::{NodeData, NodeId, NodeKind},
        tree::SyntaxTree,
    },
    errors::errors::{Error, ErrorImpl},
    MAX_NESTING_DEPTH,
};

use super::{
    globals::{find_globals, identifier_name},
    string_table::StringTable,
    symbol::{Symbol, SymbolKind},
    symbol_table::{ScopeChain, SymbolTable},
};

/// Builds the global table and every local table, binds all identifiers and
/// fills `strings` with the program's string literals in document order.
pub fn create_tables(tree: &mut SyntaxTree, strings: &mut StringTable) -> Result<SymbolTable, Error> {
    let mut globals = find_globals(tree)?;

    let functions: Vec<(usize, NodeId)> = globals
        .symbols()
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Function)
        .map(|symbol| (symbol.sequence_number, symbol.node))
        .collect();

    for (sequence, function) in functions {
        let body = tree.child(function, 2);
        let Some(scopes) = globals.scope_chain(sequence) else {
            continue;
        };

        Binder::new(&mut *tree, &mut *strings, scopes).bind(body)?;

        debug!(
            function = globals.get(sequence).map(|symbol| symbol.name.as_str()),
            locals = globals.function_table(sequence).map(SymbolTable::len),
            "bound function body"
        );
    }

    Ok(globals)
}

pub struct Binder<'a> {
    tree: &'a mut SyntaxTree,
    strings: &'a mut StringTable,
    scopes: ScopeChain<'a>,
    depth: usize,
}

impl<'a> Binder<'a> {
    pub fn new(tree: &'a mut SyntaxTree, strings: &'a mut StringTable, scopes: ScopeChain<'a>) -> Self {
        Binder {
            tree,
            strings,
            scopes,
            depth: 0,
        }
    }

    pub fn bind(&mut self, node: Option<NodeId>) -> Result<(), Error> {
        let Some(id) = node else {
            return Ok(());
        };

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING_DEPTH },
                self.tree.position(id),
            ));
        }

        self.depth += 1;
        let result = self.bind_node(id);
        self.depth -= 1;
        result
    }

    fn bind_node(&mut self, id: NodeId) -> Result<(), Error> {
        match self.tree.kind(id) {
            NodeKind::Identifier => self.bind_identifier(id),
            NodeKind::StringLiteral => self.intern_string(id),
            NodeKind::Block if self.tree.child_count(id) == 2 => {
                let declarations = self.tree.child(id, 0);
                let statements = self.tree.child(id, 1);

                let mut block = self.enter_block();
                block.declare_locals(declarations)?;
                block.bind(statements)
            }
            NodeKind::Block => {
                let statements = self.tree.child(id, 0);
                self.bind(statements)
            }
            _ => {
                for child in self.tree.children(id).to_vec() {
                    self.bind(child)?;
                }
                Ok(())
            }
        }
    }

    fn bind_identifier(&mut self, id: NodeId) -> Result<(), Error> {
        let name = identifier_name(self.tree, id);

        match self.scopes.lookup(&name) {
            Some(symbol) => {
                self.tree.node_mut(id).symbol = Some(symbol);
                Ok(())
            }
            None => Err(Error::new(ErrorImpl::UnresolvedSymbol { name }, self.tree.position(id))),
        }
    }

    fn intern_string(&mut self, id: NodeId) -> Result<(), Error> {
        let position = self.tree.position(id);
        let Some(literal) = self.tree.node_mut(id).take_string_literal() else {
            return Ok(());
        };

        let index = self
            .strings
            .add(literal)
            .map_err(|_| Error::new(ErrorImpl::AllocationFailure, position))?;

        let node = self.tree.node_mut(id);
        node.kind = NodeKind::StringListReference;
        node.data = NodeData::StringListIndex(index);
        Ok(())
    }

    /// Adds a local variable for every name in a block's declaration list to
    /// the current scope.
    fn declare_locals(&mut self, declarations: Option<NodeId>) -> Result<(), Error> {
        let Some(declarations) = declarations else {
            return Ok(());
        };

        for declaration in self.tree.children(declarations).to_vec().into_iter().flatten() {
            for identifier in self.tree.children(declaration).to_vec().into_iter().flatten() {
                let name = identifier_name(self.tree, identifier);
                let symbol = self.scopes.insert(
                    Symbol::new(name, SymbolKind::LocalVar, identifier),
                    self.tree.position(identifier),
                )?;
                self.tree.node_mut(identifier).symbol = Some(symbol);
            }
        }

        Ok(())
    }

    fn enter_block<'b>(&'b mut self) -> BlockScope<'b, 'a> {
        self.scopes.push_scope();
        BlockScope { binder: self }
    }
}

/// A pushed block scope. Dropping it pops the scope, on every exit path.
struct BlockScope<'b, 'a> {
    binder: &'b mut Binder<'a>,
}

impl<'a> Deref for BlockScope<'_, 'a> {
    type Target = Binder<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.binder
    }
}

impl DerefMut for BlockScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.binder
    }
}

impl Drop for BlockScope<'_, '_> {
    fn drop(&mut self) {
        self.binder.scopes.pop_scope();
    }
}
