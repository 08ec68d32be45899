use std::fmt::Display;

use crate::symbols::symbol::SymbolId;

/// Node Kinds
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum NodeKind {
    List,
    GlobalDeclaration,
    ArrayIndexing,
    Variable,
    Function,
    Block,
    AssignmentStatement,
    ReturnStatement,
    PrintStatement,
    IfStatement,
    WhileStatement,
    BreakStatement,
    Operator,
    FunctionCall,
    Identifier,
    NumberLiteral,
    StringLiteral,
    StringListReference,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::List => "LIST",
            NodeKind::GlobalDeclaration => "GLOBAL_DECLARATION",
            NodeKind::ArrayIndexing => "ARRAY_INDEXING",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Function => "FUNCTION",
            NodeKind::Block => "BLOCK",
            NodeKind::AssignmentStatement => "ASSIGNMENT_STATEMENT",
            NodeKind::ReturnStatement => "RETURN_STATEMENT",
            NodeKind::PrintStatement => "PRINT_STATEMENT",
            NodeKind::IfStatement => "IF_STATEMENT",
            NodeKind::WhileStatement => "WHILE_STATEMENT",
            NodeKind::BreakStatement => "BREAK_STATEMENT",
            NodeKind::Operator => "OPERATOR",
            NodeKind::FunctionCall => "FUNCTION_CALL",
            NodeKind::Identifier => "IDENTIFIER",
            NodeKind::NumberLiteral => "NUMBER_LITERAL",
            NodeKind::StringLiteral => "STRING_LITERAL",
            NodeKind::StringListReference => "STRING_LIST_REFERENCE",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Handle to a node in a [`SyntaxTree`](super::tree::SyntaxTree) arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node payload. Which variant is in use is decided by the node's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    None,
    /// Static operator text such as `"+"`. Not owned by the node.
    Operator(&'static str),
    Identifier(String),
    Number(i64),
    /// Includes the surrounding quotation marks.
    StringLiteral(String),
    StringListIndex(usize),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Owned child slots. A slot is `None` where the grammar allows an absent
    /// child, such as an if without an else.
    pub children: Vec<Option<NodeId>>,
    pub data: NodeData,
    /// The symbol this node refers to. Only identifiers are bound.
    pub symbol: Option<SymbolId>,
    /// Byte offset of the token that started this node.
    pub offset: u32,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Option<NodeId>>) -> Self {
        Node {
            kind,
            children,
            data: NodeData::None,
            symbol: None,
            offset: 0,
        }
    }

    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied().flatten()
    }

    pub fn operator(&self) -> Option<&'static str> {
        match self.data {
            NodeData::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.data {
            NodeData::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<i64> {
        match self.data {
            NodeData::Number(value) if self.kind == NodeKind::NumberLiteral => Some(value),
            _ => None,
        }
    }

    pub fn string_literal(&self) -> Option<&str> {
        match &self.data {
            NodeData::StringLiteral(literal) => Some(literal),
            _ => None,
        }
    }

    /// Moves the string literal payload out, leaving the node without payload.
    pub fn take_string_literal(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.data, NodeData::None) {
            NodeData::StringLiteral(literal) => Some(literal),
            other => {
                self.data = other;
                None
            }
        }
    }

    pub fn string_list_index(&self) -> Option<usize> {
        match self.data {
            NodeData::StringListIndex(index) => Some(index),
            _ => None,
        }
    }
}
