use std::fmt::Display;

use crate::ast::ast::NodeId;

use super::symbol_table::SymbolTable;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum SymbolKind {
    GlobalVar,
    GlobalArray,
    Function,
    Parameter,
    LocalVar,
}

impl SymbolKind {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::GlobalVar => "GLOBAL_VAR",
            SymbolKind::GlobalArray => "GLOBAL_ARRAY",
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Parameter => "PARAMETER",
            SymbolKind::LocalVar => "LOCAL_VAR",
        }
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which table owns a symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TableId {
    Global,
    /// The local table of the function whose symbol has this global sequence number.
    Function(usize),
}

/// Non-owning reference from a tree node to a symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SymbolId {
    pub table: TableId,
    pub sequence: usize,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The node that declared this symbol.
    pub node: NodeId,
    /// Position in the owning table, assigned on insertion.
    pub sequence_number: usize,
    /// Only function symbols own a local table.
    pub function_table: Option<SymbolTable>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, node: NodeId) -> Self {
        Symbol {
            name: name.into(),
            kind,
            node,
            sequence_number: 0,
            function_table: None,
        }
    }

    pub fn function(name: impl Into<String>, node: NodeId, table: SymbolTable) -> Self {
        Symbol {
            function_table: Some(table),
            ..Symbol::new(name, SymbolKind::Function, node)
        }
    }
}
