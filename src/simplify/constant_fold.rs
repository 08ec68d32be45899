use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        tree::SyntaxTree,
    },
    errors::errors::{Error, ErrorImpl},
    MAX_NESTING_DEPTH,
};

/// Folds the whole tree in place. Running it a second time changes nothing.
pub fn constant_fold_syntax_tree(tree: &mut SyntaxTree) -> Result<(), Error> {
    let root = tree.set_root(None);

    let mut folder = ConstantFolder::new(tree);
    let root = folder.fold(root)?;
    let folds = folder.folds;

    tree.set_root(root);
    debug!(folds, "constant folding done");
    Ok(())
}

/// Evaluates `operator` over literal operands with wrapping 64-bit arithmetic.
///
/// Comparisons and `!` produce 0 or 1. Division by zero is an error rather
/// than whatever the host would do.
pub fn evaluate(operator: &str, operands: &[i64]) -> Result<i64, ErrorImpl> {
    match (operator, operands) {
        ("-", [operand]) => Ok(operand.wrapping_neg()),
        ("!", [operand]) => Ok((*operand == 0) as i64),
        ("==", [lhs, rhs]) => Ok((lhs == rhs) as i64),
        ("!=", [lhs, rhs]) => Ok((lhs != rhs) as i64),
        ("<", [lhs, rhs]) => Ok((lhs < rhs) as i64),
        ("<=", [lhs, rhs]) => Ok((lhs <= rhs) as i64),
        (">", [lhs, rhs]) => Ok((lhs > rhs) as i64),
        (">=", [lhs, rhs]) => Ok((lhs >= rhs) as i64),
        ("+", [lhs, rhs]) => Ok(lhs.wrapping_add(*rhs)),
        ("-", [lhs, rhs]) => Ok(lhs.wrapping_sub(*rhs)),
        ("*", [lhs, rhs]) => Ok(lhs.wrapping_mul(*rhs)),
        ("/", [_, 0]) => Err(ErrorImpl::DivisionByZero),
        ("/", [lhs, rhs]) => Ok(lhs.wrapping_div(*rhs)),
        _ => Err(ErrorImpl::UnknownOperator {
            operator: operator.to_string(),
            operands: operands.len(),
        }),
    }
}

pub struct ConstantFolder<'t> {
    tree: &'t mut SyntaxTree,
    depth: usize,
    folds: usize,
}

impl<'t> ConstantFolder<'t> {
    pub fn new(tree: &'t mut SyntaxTree) -> Self {
        ConstantFolder {
            tree,
            depth: 0,
            folds: 0,
        }
    }

    /// Folds the subtree rooted at `node` and returns the root that replaces it.
    ///
    /// Every child is detached while it is folded and the result is attached
    /// in its place, so the tree never holds a handle to a destroyed node.
    pub fn fold(&mut self, node: Option<NodeId>) -> Result<Option<NodeId>, Error> {
        let Some(id) = node else {
            return Ok(None);
        };

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING_DEPTH },
                self.tree.position(id),
            ));
        }

        self.depth += 1;
        let result = self.fold_node(id);
        self.depth -= 1;
        result
    }

    fn fold_node(&mut self, id: NodeId) -> Result<Option<NodeId>, Error> {
        for i in 0..self.tree.child_count(id) {
            let child = self.tree.take_child(id, i);
            let folded = self.fold(child)?;
            self.tree.replace_child(id, i, folded);
        }

        match self.tree.kind(id) {
            NodeKind::List => {
                // Statements folded to nothing leave their list.
                self.tree.compact_list(id);
                Ok(Some(id))
            }
            NodeKind::Operator => self.fold_operator(id).map(Some),
            NodeKind::IfStatement => Ok(self.fold_if(id)),
            NodeKind::WhileStatement => Ok(self.fold_while(id)),
            _ => Ok(Some(id)),
        }
    }

    fn fold_operator(&mut self, id: NodeId) -> Result<NodeId, Error> {
        let operands: Option<Vec<i64>> = self
            .tree
            .children(id)
            .iter()
            .map(|child| child.and_then(|child| self.tree.node(child).number()))
            .collect();

        let Some(operands) = operands else {
            return Ok(id);
        };

        let operator = self.tree.node(id).operator().unwrap_or_default();
        let value = evaluate(operator, &operands).map_err(|error| Error::new(error, self.tree.position(id)))?;

        trace!(operator, ?operands, value, "folded operator");
        self.tree.make_number_literal(id, value);
        self.folds += 1;
        Ok(id)
    }

    fn condition(&self, id: NodeId) -> Option<i64> {
        self.tree.child(id, 0).and_then(|condition| self.tree.node(condition).number())
    }

    /// Replaces an if with a literal condition by the branch it always takes.
    fn fold_if(&mut self, id: NodeId) -> Option<NodeId> {
        let Some(condition) = self.condition(id) else {
            return Some(id);
        };

        let taken = if condition != 0 {
            self.tree.take_child(id, 1)
        } else if self.tree.child_count(id) == 3 {
            self.tree.take_child(id, 2)
        } else {
            None
        };

        self.tree.destroy(id);
        self.folds += 1;
        taken
    }

    /// Deletes a while whose condition is literally 0. Loops with a nonzero
    /// literal condition stay, their body may still break out.
    fn fold_while(&mut self, id: NodeId) -> Option<NodeId> {
        match self.condition(id) {
            Some(0) => {
                self.tree.destroy(id);
                self.folds += 1;
                None
            }
            _ => Some(id),
        }
    }
}
