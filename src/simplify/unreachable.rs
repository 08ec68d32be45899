use tracing::debug;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        tree::SyntaxTree,
    },
    errors::errors::{Error, ErrorImpl},
    MAX_NESTING_DEPTH,
};

/// Removes statements that can never run because a return or break comes
/// before them, then makes every function end in a return.
pub fn remove_unreachable_code_syntax_tree(tree: &mut SyntaxTree) -> Result<(), Error> {
    let Some(root) = tree.root() else {
        return Ok(());
    };

    for function in tree.children(root).to_vec().into_iter().flatten() {
        if tree.kind(function) != NodeKind::Function || tree.child_count(function) < 3 {
            continue;
        }

        let body = tree.child(function, 2);
        let mut reducer = UnreachableCodeRemover::new(tree);
        let interrupts = reducer.reduce(body)?;

        if reducer.removed > 0 {
            debug!(function = %function, removed = reducer.removed, "removed unreachable statements");
        }

        if !interrupts {
            append_return(tree, function);
        }
    }

    Ok(())
}

/// Wraps the body of `function` as `{ body; return 0; }`.
fn append_return(tree: &mut SyntaxTree, function: NodeId) {
    let zero = tree.create_number(0, 0);
    let return_node = tree.create(NodeKind::ReturnStatement, vec![Some(zero)]);

    let body = tree.take_child(function, 2);
    let statements = body.into_iter().chain([return_node]).collect();
    let statement_list = tree.create_list(statements, 0);
    let new_body = tree.create(NodeKind::Block, vec![Some(statement_list)]);

    tree.replace_child(function, 2, Some(new_body));
    debug!(function = %function, "appended return 0");
}

pub struct UnreachableCodeRemover<'t> {
    tree: &'t mut SyntaxTree,
    depth: usize,
    removed: usize,
}

impl<'t> UnreachableCodeRemover<'t> {
    pub fn new(tree: &'t mut SyntaxTree) -> Self {
        UnreachableCodeRemover {
            tree,
            depth: 0,
            removed: 0,
        }
    }

    /// Returns true if executing `node` is guaranteed to leave the function
    /// through a return or the enclosing loop through a break.
    pub fn reduce(&mut self, node: Option<NodeId>) -> Result<bool, Error> {
        let Some(id) = node else {
            return Ok(false);
        };

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING_DEPTH },
                self.tree.position(id),
            ));
        }

        self.depth += 1;
        let result = self.reduce_node(id);
        self.depth -= 1;
        result
    }

    fn reduce_node(&mut self, id: NodeId) -> Result<bool, Error> {
        match self.tree.kind(id) {
            NodeKind::ReturnStatement | NodeKind::BreakStatement => Ok(true),
            NodeKind::IfStatement => {
                // Without an else the empty path always falls through.
                let (then_branch, else_branch) = (self.tree.child(id, 1), self.tree.child(id, 2));
                let then_interrupts = self.reduce(then_branch)?;
                let else_interrupts = self.reduce(else_branch)?;
                Ok(then_interrupts && else_interrupts)
            }
            NodeKind::WhileStatement => {
                // The body may never run, or may break out.
                let body = self.tree.child(id, 1);
                self.reduce(body)?;
                Ok(false)
            }
            NodeKind::Block => {
                // The statement list is always the last child.
                let last = self.tree.child_count(id).saturating_sub(1);
                let Some(statement_list) = self.tree.child(id, last) else {
                    return Ok(false);
                };
                self.reduce_statements(statement_list)
            }
            _ => Ok(false),
        }
    }

    fn reduce_statements(&mut self, statement_list: NodeId) -> Result<bool, Error> {
        for i in 0..self.tree.child_count(statement_list) {
            let statement = self.tree.child(statement_list, i);
            if self.reduce(statement)? {
                let unreachable = self.tree.truncate_children(statement_list, i + 1);
                self.removed += unreachable.len();
                for statement in unreachable {
                    self.tree.destroy(statement);
                }
                return Ok(true);
            }
        }

        Ok(false)
    }
}
