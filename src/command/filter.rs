use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tracing::debug;

use crate::command::Command;
use crate::error::{AppError, Result};
use crate::fs::node::Node;
use crate::fs::state::StateFlags;
use crate::fs::tree::Tree;
use crate::visitor::predicate::{always_visible, extension_in};
use crate::visitor::{traverse, NodePredicate, VisibilityFilterVisitor};

/// Per-path visibility captured before a filter runs.
#[derive(Debug, Default, Clone)]
struct VisibilitySnapshot(HashMap<PathBuf, bool>);

impl VisibilitySnapshot {
    fn capture(root: &Node) -> Self {
        let mut map = HashMap::new();
        Self::capture_into(root, &mut map);
        Self(map)
    }

    fn capture_into(node: &Node, map: &mut HashMap<PathBuf, bool>) {
        map.insert(node.full_path.clone(), node.is_visible);
        for child in &node.children {
            Self::capture_into(child, map);
        }
    }

    /// Restore captured visibility. Nodes loaded after the capture keep
    /// their current value.
    fn restore(&self, node: &mut Node) {
        if let Some(&visible) = self.0.get(&node.full_path) {
            node.is_visible = visible;
        }
        for child in node.children.iter_mut() {
            self.restore(child);
        }
    }
}

/// Run a visibility filter over the whole tree, returning the prior state.
fn run_filter(tree: &mut Tree, predicate: NodePredicate) -> VisibilitySnapshot {
    let snapshot = VisibilitySnapshot::capture(tree.root_node());
    let mut visitor = VisibilityFilterVisitor::new(predicate);
    traverse(tree.root_node_mut(), &mut visitor);
    tree.set_state(StateFlags::FILTER_CHANGED);
    snapshot
}

fn restore_filter(tree: &mut Tree, snapshot: Option<&VisibilitySnapshot>, name: &str) -> Result<()> {
    let snapshot = snapshot.ok_or_else(|| AppError::NothingToUndo(name.to_string()))?;
    snapshot.restore(tree.root_node_mut());
    tree.set_state(StateFlags::FILTER_CHANGED);
    Ok(())
}

/// Show only files whose extension is in the selected set.
///
/// An empty set shows everything, the same as [`ResetFilterCmd`].
pub struct ApplyFilterCmd {
    extensions: BTreeSet<String>,
    name: String,
    snapshot: Option<VisibilitySnapshot>,
}

impl ApplyFilterCmd {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();
        let name = if extensions.is_empty() {
            "Apply filter (all)".to_string()
        } else {
            let list: Vec<&str> = extensions.iter().map(String::as_str).collect();
            format!("Apply filter ({})", list.join(", "))
        };
        Self {
            extensions,
            name,
            snapshot: None,
        }
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    fn predicate(&self) -> NodePredicate {
        if self.extensions.is_empty() {
            always_visible()
        } else {
            extension_in(self.extensions.iter())
        }
    }
}

impl Command for ApplyFilterCmd {
    fn execute(&mut self, tree: &mut Tree) {
        debug!("applying extension filter {:?}", self.extensions);
        self.snapshot = Some(run_filter(tree, self.predicate()));
    }

    fn undo(&mut self, tree: &mut Tree) -> Result<()> {
        restore_filter(tree, self.snapshot.as_ref(), &self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Mark every node visible.
#[derive(Default)]
pub struct ResetFilterCmd {
    snapshot: Option<VisibilitySnapshot>,
}

impl ResetFilterCmd {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for ResetFilterCmd {
    fn execute(&mut self, tree: &mut Tree) {
        self.snapshot = Some(run_filter(tree, always_visible()));
    }

    fn undo(&mut self, tree: &mut Tree) -> Result<()> {
        restore_filter(tree, self.snapshot.as_ref(), self.name())
    }

    fn name(&self) -> &str {
        "Reset filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_tree() -> (TempDir, Tree) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("guide.txt"), "").unwrap();
        fs::write(dir.path().join("docs").join("logo.png"), "").unwrap();
        fs::write(dir.path().join("a.TXT"), "").unwrap();
        fs::write(dir.path().join("b.rs"), "").unwrap();
        let mut tree = Tree::new(dir.path());
        tree.expand_path(&dir.path().join("docs")).unwrap();
        tree.take_state();
        (dir, tree)
    }

    fn visible_names(node: &Node, out: &mut Vec<String>) {
        if node.is_visible {
            out.push(node.name.clone());
        }
        for child in &node.children {
            visible_names(child, out);
        }
    }

    fn visible(tree: &Tree) -> Vec<String> {
        let mut out = Vec::new();
        visible_names(tree.root_node(), &mut out);
        out.sort();
        out
    }

    #[test]
    fn apply_filter_hides_other_files() {
        let (_dir, mut tree) = setup_tree();
        let mut cmd = ApplyFilterCmd::new([".txt"]);
        cmd.execute(&mut tree);

        let root_name = tree.root_node().name.clone();
        let mut expected = vec![root_name, "a.TXT".into(), "docs".into(), "guide.txt".into()];
        expected.sort();
        assert_eq!(visible(&tree), expected);
        assert!(tree.check_state(StateFlags::FILTER_CHANGED));
    }

    #[test]
    fn apply_filter_lowercases_selection() {
        let cmd = ApplyFilterCmd::new([".TXT", ".Rs"]);
        let exts: Vec<&str> = cmd.extensions().iter().map(String::as_str).collect();
        assert_eq!(exts, vec![".rs", ".txt"]);
        assert_eq!(cmd.name(), "Apply filter (.rs, .txt)");
    }

    #[test]
    fn empty_selection_shows_everything() {
        let (_dir, mut tree) = setup_tree();
        ApplyFilterCmd::new([".png"]).execute(&mut tree);
        let mut cmd = ApplyFilterCmd::new(Vec::<String>::new());
        cmd.execute(&mut tree);
        assert_eq!(visible(&tree).len(), tree.root_node().count());
        assert_eq!(cmd.name(), "Apply filter (all)");
    }

    #[test]
    fn undo_restores_previous_visibility() {
        let (_dir, mut tree) = setup_tree();
        let mut first = ApplyFilterCmd::new([".png"]);
        first.execute(&mut tree);
        let after_first = visible(&tree);

        let mut second = ApplyFilterCmd::new([".rs"]);
        second.execute(&mut tree);
        assert_ne!(visible(&tree), after_first);

        second.undo(&mut tree).unwrap();
        assert_eq!(visible(&tree), after_first);

        first.undo(&mut tree).unwrap();
        assert_eq!(visible(&tree).len(), tree.root_node().count());
    }

    #[test]
    fn undo_before_execute_fails() {
        let (_dir, mut tree) = setup_tree();
        let mut cmd = ApplyFilterCmd::new([".rs"]);
        assert!(matches!(cmd.undo(&mut tree), Err(AppError::NothingToUndo(_))));
        let mut reset = ResetFilterCmd::new();
        assert!(matches!(reset.undo(&mut tree), Err(AppError::NothingToUndo(_))));
    }

    #[test]
    fn reset_shows_everything_and_undoes() {
        let (_dir, mut tree) = setup_tree();
        ApplyFilterCmd::new([".rs"]).execute(&mut tree);
        let filtered = visible(&tree);

        let mut reset = ResetFilterCmd::new();
        reset.execute(&mut tree);
        assert_eq!(visible(&tree).len(), tree.root_node().count());

        reset.undo(&mut tree).unwrap();
        assert_eq!(visible(&tree), filtered);
    }

    #[test]
    fn undo_ignores_nodes_loaded_after_execute() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("later")).unwrap();
        fs::write(dir.path().join("later").join("x.md"), "").unwrap();
        let mut tree = Tree::new(dir.path());

        let mut cmd = ApplyFilterCmd::new([".rs"]);
        cmd.execute(&mut tree);
        tree.expand_path(&dir.path().join("later")).unwrap();
        cmd.undo(&mut tree).unwrap();

        let later = tree.handle_for(&dir.path().join("later").join("x.md")).unwrap();
        assert!(tree.node(&later).unwrap().is_visible);
    }
}
