use std::collections::BTreeSet;

use crate::fs::node::Node;

/// Node filter used by the visibility and filtered-tree visitors.
pub type NodePredicate = Box<dyn Fn(&Node) -> bool>;

/// Matches files whose lower-cased extension is one of `extensions`.
///
/// The given extensions are lower-cased up front, so `.TXT` and `.txt`
/// select the same files.
pub fn extension_in<I, S>(extensions: I) -> NodePredicate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let wanted: BTreeSet<String> = extensions
        .into_iter()
        .map(|ext| ext.as_ref().to_lowercase())
        .collect();
    Box::new(move |node: &Node| node.is_file() && wanted.contains(&node.extension_lowercase()))
}

/// Matches every node.
pub fn always_visible() -> NodePredicate {
    Box::new(|_: &Node| true)
}
