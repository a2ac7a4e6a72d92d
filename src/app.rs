use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::{ApplyFilterCmd, CommandHistory, ResetFilterCmd};
use crate::config::AppConfig;
use crate::error::Result;
use crate::fs::node::Node;
use crate::fs::sort::SortCriteria;
use crate::fs::state::StateFlags;
use crate::fs::tree::Tree;
use crate::render::{render_tree, RenderOptions};
use crate::visitor::predicate::{always_visible, extension_in};
use crate::visitor::{traverse, ExtensionCollectorVisitor, FilteredTreeBuilderVisitor};

/// Owns the tree and the command history, and reacts to the tree's state
/// flags.
pub struct App {
    tree: Tree,
    history: CommandHistory,
    /// Extensions seen in the loaded part of the tree.
    extensions: BTreeSet<String>,
}

impl App {
    /// Create an app rooted at `path`, configured from `config`.
    ///
    /// The tree is expanded to the configured depth and the extension
    /// cache is filled before returning.
    pub fn new(path: &Path, config: &AppConfig) -> Result<Self> {
        let mut tree = Tree::new(path);
        let criteria = config.sort_criteria()?;
        if criteria != tree.sort_criteria() {
            // The root's children were sorted by the default criteria.
            tree.set_sort_criteria(criteria);
        }

        let mut app = Self::with_tree(tree);
        app.expand_to_depth(config.expand_depth());
        app.sync_state();
        Ok(app)
    }

    pub fn with_tree(tree: Tree) -> Self {
        let mut app = Self {
            tree,
            history: CommandHistory::new(),
            extensions: BTreeSet::new(),
        };
        app.collect_extensions();
        app
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Cached extensions from the last collection.
    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Re-scan the loaded tree for file extensions.
    pub fn collect_extensions(&mut self) -> &BTreeSet<String> {
        let mut collector = ExtensionCollectorVisitor::new();
        traverse(self.tree.root_node_mut(), &mut collector);
        self.extensions = collector.into_extensions();
        debug!("collected {} extensions", self.extensions.len());
        &self.extensions
    }

    pub fn apply_filter<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let command = ApplyFilterCmd::new(extensions);
        self.history.execute(Box::new(command), &mut self.tree);
    }

    pub fn reset_filter(&mut self) {
        self.history
            .execute(Box::new(ResetFilterCmd::new()), &mut self.tree);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.tree)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.tree)
    }

    /// Independent copy of the loaded tree holding only files with one of
    /// `extensions` plus every directory. An empty set copies everything.
    pub fn filtered_tree(&self, extensions: &[String]) -> Node {
        let predicate = if extensions.is_empty() {
            always_visible()
        } else {
            extension_in(extensions)
        };
        FilteredTreeBuilderVisitor::new(predicate).build(self.tree.root_node())
    }

    /// Load directories until `depth` levels below the root are present.
    ///
    /// The root's own children are always loaded, so depths 0 and 1 do
    /// nothing. Directories that fail to list are skipped. Returns how many
    /// directories were newly expanded.
    pub fn expand_to_depth(&mut self, depth: usize) -> usize {
        let mut frontier = child_directories(self.tree.root_node());
        let mut expanded = 0;

        for _ in 1..depth {
            let mut next = Vec::new();
            for path in frontier {
                match self.tree.expand_path(&path) {
                    Ok(true) => expanded += 1,
                    Ok(false) => {}
                    Err(e) => {
                        debug!("skipping {}: {}", path.display(), e);
                        continue;
                    }
                }
                if let Some(node) = self
                    .tree
                    .handle_for(&path)
                    .and_then(|h| self.tree.node(&h))
                {
                    next.extend(child_directories(node));
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        debug!("expanded {} directories to depth {}", expanded, depth);
        expanded
    }

    /// Consume the tree's pending state flags and react to them.
    ///
    /// New nodes refresh the extension cache. A new root also clears the
    /// command history, whose snapshots refer to the old tree.
    pub fn sync_state(&mut self) -> StateFlags {
        let flags = self.tree.take_state();
        if flags.contains(StateFlags::ROOT_CHANGED) {
            self.history.clear();
        }
        if flags.intersects(StateFlags::NODE_EXPANDED | StateFlags::ROOT_CHANGED) {
            self.collect_extensions();
        }
        if !flags.is_empty() {
            debug!("handled {:?}", flags);
        }
        flags
    }

    /// Ask `picker` for a new root folder, starting from the current one.
    ///
    /// Returns `false` if the picker was cancelled or returned an empty
    /// path.
    pub fn choose_root_folder<F>(&mut self, picker: F) -> bool
    where
        F: FnOnce(&Path) -> Option<PathBuf>,
    {
        let Some(path) = picker(self.tree.root_folder()) else {
            debug!("root folder selection cancelled");
            return false;
        };
        if !self.tree.set_root_folder(&path) {
            return false;
        }
        info!("root folder set to {}", path.display());
        self.sync_state();
        true
    }

    pub fn set_sort_criteria(&mut self, criteria: SortCriteria) {
        self.tree.set_sort_criteria(criteria);
        self.sync_state();
    }

    pub fn render(&self, options: RenderOptions) -> String {
        render_tree(self.tree.root_node(), options)
    }
}

fn child_directories(node: &Node) -> Vec<PathBuf> {
    node.children
        .iter()
        .filter(|c| c.is_directory())
        .map(|c| c.full_path.clone())
        .collect()
}
