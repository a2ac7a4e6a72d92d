use crate::fs::node::Node;
use crate::visitor::{NodePredicate, NodeVisitor};

/// Marks each node visible if it matches the predicate.
///
/// Directories are always left visible; only files and unknown entries
/// can be hidden.
pub struct VisibilityFilterVisitor {
    predicate: NodePredicate,
}

impl VisibilityFilterVisitor {
    pub fn new(predicate: NodePredicate) -> Self {
        Self { predicate }
    }
}

impl NodeVisitor for VisibilityFilterVisitor {
    fn visit(&mut self, node: &mut Node) {
        node.is_visible = (self.predicate)(node) || node.is_directory();
    }
}
