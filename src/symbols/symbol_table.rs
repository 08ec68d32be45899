//! Append-only symbol tables with scoped name lookup.
//!
//! A table owns its symbols in insertion order; the index of a symbol is its
//! sequence number. Names are bound in a stack of [`Scope`]s. Lookups search
//! the innermost scope first. Popping a scope forgets its names but never the
//! symbols themselves.

use std::collections::HashMap;

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::symbol::{Symbol, SymbolId, TableId};

/// One layer of name bindings.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    names: HashMap<String, usize>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    id: TableId,
    symbols: Vec<Symbol>,
    base: Scope,
    nested: Vec<Scope>,
}

impl SymbolTable {
    pub fn new(id: TableId) -> Self {
        SymbolTable {
            id,
            symbols: vec![],
            base: Scope::default(),
            nested: vec![],
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, sequence: usize) -> Option<&Symbol> {
        self.symbols.get(sequence)
    }

    /// Sequence number the next inserted symbol will receive.
    pub fn next_sequence(&self) -> usize {
        self.symbols.len()
    }

    /// Number of scopes on the stack, the base scope included.
    pub fn scope_depth(&self) -> usize {
        self.nested.len() + 1
    }

    pub fn current_scope(&self) -> &Scope {
        self.nested.last().unwrap_or(&self.base)
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        self.nested.last_mut().unwrap_or(&mut self.base)
    }

    /// Adds `symbol` with the next sequence number and binds its name in the
    /// current scope. Shadowing a name from an outer scope is allowed; a name
    /// already bound in the current scope is a `DuplicateSymbol` error.
    pub fn insert(&mut self, mut symbol: Symbol, position: Position) -> Result<SymbolId, Error> {
        let sequence = self.symbols.len();
        let scope = self.current_scope_mut();

        if scope.names.contains_key(&symbol.name) {
            return Err(Error::new(ErrorImpl::DuplicateSymbol { name: symbol.name }, position));
        }

        scope.names.insert(symbol.name.clone(), sequence);
        symbol.sequence_number = sequence;
        self.symbols.push(symbol);

        Ok(SymbolId {
            table: self.id,
            sequence,
        })
    }

    /// Searches the scopes of this table from the innermost outwards.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.nested
            .iter()
            .rev()
            .chain(std::iter::once(&self.base))
            .find_map(|scope| scope.get(name))
            .map(|sequence| SymbolId {
                table: self.id,
                sequence,
            })
    }

    pub fn push_scope(&mut self) {
        self.nested.push(Scope::default());
    }

    /// Discards the innermost scope. The base scope is never popped; returns
    /// false if only the base scope was left.
    pub fn pop_scope(&mut self) -> bool {
        self.nested.pop().is_some()
    }

    /// Finds the symbol behind `id`, descending into function tables as needed.
    pub fn resolve(&self, id: SymbolId) -> Option<&Symbol> {
        if id.table == self.id {
            return self.symbols.get(id.sequence);
        }

        match id.table {
            TableId::Function(function) => self.function_table(function)?.resolve(id),
            TableId::Global => None,
        }
    }

    pub fn function_table(&self, sequence: usize) -> Option<&SymbolTable> {
        self.symbols.get(sequence)?.function_table.as_ref()
    }

    /// The lookup chain used while binding the body of the function with the
    /// given sequence number: its local scopes, then this table's current scope.
    pub fn scope_chain(&mut self, function: usize) -> Option<ScopeChain<'_>> {
        let globals = self.nested.last().unwrap_or(&self.base);
        let local = self.symbols.get_mut(function)?.function_table.as_mut()?;

        Some(ScopeChain { globals, local })
    }
}

/// A function's local table layered over the global scope.
pub struct ScopeChain<'a> {
    globals: &'a Scope,
    local: &'a mut SymbolTable,
}

impl<'a> ScopeChain<'a> {
    pub fn insert(&mut self, symbol: Symbol, position: Position) -> Result<SymbolId, Error> {
        self.local.insert(symbol, position)
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        let found = self.local.lookup(name).or_else(|| {
            self.globals.get(name).map(|sequence| SymbolId {
                table: TableId::Global,
                sequence,
            })
        });
        trace!(name, ?found, "lookup");
        found
    }

    pub fn push_scope(&mut self) {
        self.local.push_scope();
    }

    pub fn pop_scope(&mut self) -> bool {
        self.local.pop_scope()
    }

    pub fn local(&self) -> &SymbolTable {
        self.local
    }
}
