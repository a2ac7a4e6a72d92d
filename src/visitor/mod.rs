//! Traversal-driven operations over a node tree.
//!
//! [`traverse`] walks a subtree depth-first in child order: it calls
//! [`NodeVisitor::visit`] on a node, recurses into each child, then calls
//! [`NodeVisitor::on_leave`]. The filtered-tree builder does not use the
//! callback protocol; it threads its output parent through an explicit
//! recursion instead (see [`FilteredTreeBuilderVisitor`]).

pub mod extension;
pub mod filtered;
pub mod predicate;
pub mod visibility;

pub use extension::ExtensionCollectorVisitor;
pub use filtered::FilteredTreeBuilderVisitor;
pub use predicate::NodePredicate;
pub use visibility::VisibilityFilterVisitor;

use crate::fs::node::Node;

/// A per-node operation driven by [`traverse`].
pub trait NodeVisitor {
    fn visit(&mut self, node: &mut Node);

    /// Called once all of `node`'s children have been traversed.
    fn on_leave(&mut self, _node: &Node) {}
}

/// Pre-order traversal of `node` and its descendants.
pub fn traverse<V: NodeVisitor + ?Sized>(node: &mut Node, visitor: &mut V) {
    visitor.visit(node);
    for child in node.children.iter_mut() {
        traverse(child, visitor);
    }
    visitor.on_leave(node);
}
