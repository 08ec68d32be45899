/// AST (Abstract Syntax Tree) module
/// Contains the node representation and the arena that owns every node
///
/// Submodules:
/// - ast: Node kinds, payloads and handles
/// - tree: The node arena and its structural mutation primitives
/// - print: Text and Graphviz dumps of a tree
pub mod ast;
pub mod print;
pub mod tree;
