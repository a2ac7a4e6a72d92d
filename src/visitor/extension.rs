use std::collections::BTreeSet;

use crate::fs::node::Node;
use crate::visitor::NodeVisitor;

/// Collects the distinct, lower-cased extensions of all files visited.
///
/// Files without an extension contribute nothing.
#[derive(Debug, Default, Clone)]
pub struct ExtensionCollectorVisitor {
    extensions: BTreeSet<String>,
}

impl ExtensionCollectorVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn into_extensions(self) -> BTreeSet<String> {
        self.extensions
    }
}

impl NodeVisitor for ExtensionCollectorVisitor {
    fn visit(&mut self, node: &mut Node) {
        if !node.is_file() {
            return;
        }
        let ext = node.extension_lowercase();
        if !ext.is_empty() {
            self.extensions.insert(ext);
        }
    }
}
