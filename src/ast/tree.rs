//! The node arena.
//!
//! Every node of a compilation unit lives in one `SyntaxTree` and is addressed
//! by a [`NodeId`]. A node is owned by exactly one parent slot (or by the tree
//! root). Operations that detach a subtree hand its handle back to the caller,
//! who must either attach it somewhere else or pass it to
//! [`SyntaxTree::destroy`]. Freed slots are never reused, so a stale handle
//! can not alias a newer node.

use std::rc::Rc;

use crate::Position;

use super::ast::{Node, NodeData, NodeId, NodeKind};

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Option<Node>>,
    live: usize,
    root: Option<NodeId>,
    file: Rc<String>,
}

impl SyntaxTree {
    pub fn new(file: Rc<String>) -> Self {
        SyntaxTree {
            nodes: vec![],
            live: 0,
            root: None,
            file,
        }
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Installs a new root and returns the previous one, which the caller now owns.
    pub fn set_root(&mut self, root: Option<NodeId>) -> Option<NodeId> {
        std::mem::replace(&mut self.root, root)
    }

    /// Number of nodes that have been created and not yet destroyed.
    pub fn live_nodes(&self) -> usize {
        self.live
    }

    pub fn create(&mut self, kind: NodeKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.insert(Node::new(kind, children))
    }

    pub fn create_at(&mut self, kind: NodeKind, children: Vec<Option<NodeId>>, offset: u32) -> NodeId {
        let mut node = Node::new(kind, children);
        node.offset = offset;
        self.insert(node)
    }

    pub fn create_list(&mut self, elements: Vec<NodeId>, offset: u32) -> NodeId {
        self.create_at(NodeKind::List, elements.into_iter().map(Some).collect(), offset)
    }

    pub fn create_identifier(&mut self, name: impl Into<String>, offset: u32) -> NodeId {
        self.create_leaf(NodeKind::Identifier, NodeData::Identifier(name.into()), offset)
    }

    pub fn create_number(&mut self, value: i64, offset: u32) -> NodeId {
        self.create_leaf(NodeKind::NumberLiteral, NodeData::Number(value), offset)
    }

    pub fn create_string_literal(&mut self, literal: impl Into<String>, offset: u32) -> NodeId {
        self.create_leaf(NodeKind::StringLiteral, NodeData::StringLiteral(literal.into()), offset)
    }

    pub fn create_operator(&mut self, operator: &'static str, operands: Vec<NodeId>, offset: u32) -> NodeId {
        let mut node = Node::new(NodeKind::Operator, operands.into_iter().map(Some).collect());
        node.data = NodeData::Operator(operator);
        node.offset = offset;
        self.insert(node)
    }

    fn create_leaf(&mut self, kind: NodeKind, data: NodeData, offset: u32) -> NodeId {
        let mut node = Node::new(kind, vec![]);
        node.data = data;
        node.offset = offset;
        self.insert(node)
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.live += 1;
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Panics if `id` was destroyed; holding a freed handle is a bug in the caller.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("use of destroyed node {}", id),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.index()).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("use of destroyed node {}", id),
        }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[Option<NodeId>] {
        &self.node(id).children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).child(index)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    pub fn position(&self, id: NodeId) -> Position {
        Position(self.node(id).offset, Rc::clone(&self.file))
    }

    /// Appends `element` to a `LIST` node and returns the list.
    pub fn append_to_list(&mut self, list: NodeId, element: NodeId) -> NodeId {
        let node = self.node_mut(list);
        assert_eq!(node.kind, NodeKind::List, "append_to_list on a {} node", node.kind);
        node.children.push(Some(element));
        list
    }

    /// Detaches the child in slot `index`, leaving the slot empty.
    pub fn take_child(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.node_mut(parent).children.get_mut(index).and_then(Option::take)
    }

    /// Stores `child` in slot `index` and returns whatever was detached from it.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, child: Option<NodeId>) -> Option<NodeId> {
        let slot = &mut self.node_mut(parent).children[index];
        std::mem::replace(slot, child)
    }

    /// Shortens the child list to `len` slots, returning the detached children.
    pub fn truncate_children(&mut self, parent: NodeId, len: usize) -> Vec<NodeId> {
        let children = &mut self.node_mut(parent).children;
        if len >= children.len() {
            return vec![];
        }
        children.drain(len..).flatten().collect()
    }

    /// Removes empty slots from a `LIST` node, keeping the order of the rest.
    pub fn compact_list(&mut self, list: NodeId) {
        let node = self.node_mut(list);
        debug_assert_eq!(node.kind, NodeKind::List);
        node.children.retain(Option::is_some);
    }

    /// Turns `id` into a number literal in place, destroying its children.
    pub fn make_number_literal(&mut self, id: NodeId, value: i64) {
        let node = self.node_mut(id);
        let children = std::mem::take(&mut node.children);
        node.kind = NodeKind::NumberLiteral;
        node.data = NodeData::Number(value);
        node.symbol = None;

        for child in children.into_iter().flatten() {
            self.destroy(child);
        }
    }

    /// Destroys the subtree rooted at `id`, children before their parent.
    ///
    /// Owned payloads (identifier names, string literals) are released with the
    /// node. The symbol reference and operator text are not owned and are
    /// simply forgotten.
    pub fn destroy(&mut self, id: NodeId) {
        let mut pending = vec![(id, false)];

        while let Some((current, expanded)) = pending.pop() {
            if expanded {
                match self.nodes.get_mut(current.index()).and_then(Option::take) {
                    Some(_) => self.live -= 1,
                    None => panic!("node {} destroyed twice", current),
                }
                continue;
            }

            let Some(node) = self.get(current) else {
                panic!("node {} destroyed twice", current);
            };
            let children: Vec<NodeId> = node.children.iter().rev().flatten().copied().collect();
            pending.push((current, true));
            pending.extend(children.into_iter().map(|child| (child, false)));
        }
    }

    /// Handles of every node in the subtree rooted at `id`, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            out.push(current);
            for child in self.node(current).children.iter().rev().flatten() {
                pending.push(*child);
            }
        }

        out
    }
}
