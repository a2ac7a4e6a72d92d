use tracing::debug;

use crate::fs::node::Node;
use crate::visitor::NodePredicate;

/// Builds an independent copy of the subset of a tree that passes a
/// predicate.
///
/// A node is kept if it matches the predicate or is a directory; a node
/// that is dropped takes its whole subtree with it. The node the build
/// starts from is always emitted, matching or not.
///
/// The output parent is passed down the recursion, so the shape of the
/// copy follows the input depth by construction.
pub struct FilteredTreeBuilderVisitor {
    predicate: NodePredicate,
    result: Option<Node>,
}

impl FilteredTreeBuilderVisitor {
    pub fn new(predicate: NodePredicate) -> Self {
        Self {
            predicate,
            result: None,
        }
    }

    /// Build the filtered copy of `root`, retain it, and return a copy.
    pub fn build(&mut self, root: &Node) -> Node {
        let mut out_root = root.detached();
        for child in &root.children {
            self.copy_filtered(child, &mut out_root);
        }
        debug!(
            "filtered {} of {} nodes under {}",
            out_root.count(),
            root.count(),
            root.full_path.display()
        );
        self.result = Some(out_root.clone());
        out_root
    }

    /// Fresh deep copy of the last build, if any.
    pub fn filtered(&self) -> Option<Node> {
        self.result.clone()
    }

    fn copy_filtered(&self, node: &Node, out_parent: &mut Node) {
        if !(self.predicate)(node) && !node.is_directory() {
            return;
        }
        let mut copy = node.detached();
        for child in &node.children {
            self.copy_filtered(child, &mut copy);
        }
        out_parent.children.push(copy);
    }
}
