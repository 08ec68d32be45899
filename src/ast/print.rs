//! Human-readable dumps of a syntax tree.
//!
//! Two forms are produced from the same per-node label: an indented text
//! listing and a Graphviz graph whose node names are the arena handles.
//! Setting the `GRAPHVIZ_OUTPUT` environment variable selects the graph form
//! in [`dump_syntax_tree`].

use std::fmt::Write;

use crate::symbols::symbol_table::SymbolTable;

use super::{
    ast::{NodeData, NodeId},
    tree::SyntaxTree,
};

pub const GRAPHVIZ_ENV: &str = "GRAPHVIZ_OUTPUT";

/// Dumps the whole tree in the form selected by the environment.
pub fn dump_syntax_tree(tree: &SyntaxTree, symbols: Option<&SymbolTable>) -> String {
    if std::env::var_os(GRAPHVIZ_ENV).is_some() {
        graphviz_syntax_tree(tree, symbols)
    } else {
        print_syntax_tree(tree, symbols)
    }
}

/// `KIND (payload) SYMBOL_KIND(sequence)`, leaving out the parts a node lacks.
pub fn node_label(tree: &SyntaxTree, id: NodeId, symbols: Option<&SymbolTable>) -> String {
    let node = tree.node(id);
    let mut label = String::from(node.kind.name());

    match &node.data {
        NodeData::None => {}
        NodeData::Operator(operator) => write!(label, " ({})", operator).unwrap(),
        NodeData::Identifier(name) => write!(label, " ({})", name).unwrap(),
        NodeData::Number(value) => write!(label, " ({})", value).unwrap(),
        NodeData::StringLiteral(literal) => write!(label, " ({})", literal).unwrap(),
        NodeData::StringListIndex(index) => write!(label, " ({})", index).unwrap(),
    }

    if let (Some(symbol_id), Some(table)) = (node.symbol, symbols) {
        if let Some(symbol) = table.resolve(symbol_id) {
            write!(label, " {}({})", symbol.kind, symbol.sequence_number).unwrap();
        }
    }

    label
}

pub fn print_syntax_tree(tree: &SyntaxTree, symbols: Option<&SymbolTable>) -> String {
    let mut out = String::new();
    print_node(tree, tree.root(), symbols, 0, &mut out);
    out
}

fn print_node(tree: &SyntaxTree, node: Option<NodeId>, symbols: Option<&SymbolTable>, nesting: usize, out: &mut String) {
    let Some(id) = node else {
        writeln!(out, "{:nesting$}(NULL)", "").unwrap();
        return;
    };

    writeln!(out, "{:nesting$}{}", "", node_label(tree, id, symbols)).unwrap();

    for child in tree.children(id) {
        print_node(tree, *child, symbols, nesting + 1, out);
    }
}

pub fn graphviz_syntax_tree(tree: &SyntaxTree, symbols: Option<&SymbolTable>) -> String {
    let mut out = String::from("graph \"\" {\n node[shape=box];\n");
    if let Some(root) = tree.root() {
        graphviz_node(tree, root, symbols, &mut out);
    }
    out.push_str("}\n");
    out
}

fn graphviz_node(tree: &SyntaxTree, id: NodeId, symbols: Option<&SymbolTable>, out: &mut String) {
    let label = escape_graphviz(&node_label(tree, id, symbols));
    writeln!(out, "node{} [label=\"{}\"];", id, label).unwrap();

    for (i, child) in tree.children(id).iter().enumerate() {
        match child {
            Some(child) => {
                writeln!(out, "node{} -- node{} ;", id, child).unwrap();
                graphviz_node(tree, *child, symbols, out);
            }
            None => writeln!(out, "node{} -- node{}NULL{} ;", id, id, i).unwrap(),
        }
    }
}

fn escape_graphviz(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
