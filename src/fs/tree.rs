use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::fs::listing::{EntryInfo, FileSystem, LocalFileSystem};
use crate::fs::node::{Node, NodeKind};
use crate::fs::sort::SortCriteria;
use crate::fs::state::StateFlags;

/// Non-owning reference to a node inside a [`Tree`].
///
/// A handle is only valid for the tree generation it was issued in; once
/// the root is rebuilt every older handle resolves to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    generation: u64,
    path: PathBuf,
}

impl NodeHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// In-memory, lazily populated mirror of a directory subtree.
pub struct Tree {
    root: Node,
    /// Path of the current node, always resolved within `root`.
    current: PathBuf,
    /// Bumped every time the root is rebuilt.
    generation: u64,
    /// Previous root folders, most recent first, without duplicates.
    dir_history: Vec<PathBuf>,
    sort_criteria: SortCriteria,
    state: StateFlags,
    filesystem: Box<dyn FileSystem>,
}

impl Tree {
    /// Create a tree rooted at `path` using the local filesystem.
    ///
    /// Only the root's immediate children are loaded.
    pub fn new(path: &Path) -> Self {
        Self::with_filesystem(path, Box::new(LocalFileSystem), SortCriteria::default())
    }

    /// Create a tree rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(&cwd))
    }

    pub fn with_filesystem(
        path: &Path,
        filesystem: Box<dyn FileSystem>,
        sort_criteria: SortCriteria,
    ) -> Self {
        let mut tree = Self {
            root: Node::directory(Node::display_name(path), path),
            current: path.to_path_buf(),
            generation: 0,
            dir_history: Vec::new(),
            sort_criteria,
            state: StateFlags::NONE,
            filesystem,
        };
        tree.root = tree.build(path);
        tree
    }

    /// Build a directory node for `path` with its immediate children.
    ///
    /// A missing or unreadable path yields an empty, already-populated
    /// directory rather than an error.
    pub fn build(&self, path: &Path) -> Node {
        let mut root = Node::directory(Node::display_name(path), path);
        root.has_unexpanded_children = false;

        if !self.filesystem.exists(path) {
            debug!("build target {} does not exist", path.display());
            return root;
        }
        if let Err(e) = Self::populate(self.filesystem.as_ref(), self.sort_criteria, &mut root) {
            debug!("could not list {}: {}", path.display(), e);
        }
        root
    }

    /// Load the children of an unexpanded directory.
    ///
    /// Returns `Ok(false)` without touching anything if the handle is stale,
    /// the node is not a directory, or it was already expanded. A listing
    /// failure is returned as `AppError::Expand`; the node is then left
    /// expanded with no children.
    pub fn expand(&mut self, handle: &NodeHandle) -> Result<bool> {
        if handle.generation != self.generation {
            debug!("ignoring expand of stale handle {}", handle.path.display());
            return Ok(false);
        }
        let sort_criteria = self.sort_criteria;
        let Some(node) = Self::find_node_mut(&mut self.root, &handle.path) else {
            debug!("no node at {} to expand", handle.path.display());
            return Ok(false);
        };
        if node.kind != NodeKind::Directory || !node.has_unexpanded_children {
            return Ok(false);
        }

        node.children.clear();
        node.has_unexpanded_children = false;

        match Self::populate(self.filesystem.as_ref(), sort_criteria, node) {
            Ok(()) => {
                self.state.insert(StateFlags::NODE_EXPANDED);
                Ok(true)
            }
            Err(source) => {
                warn!("failed to expand {}: {}", handle.path.display(), source);
                Err(AppError::Expand {
                    path: handle.path.clone(),
                    source,
                })
            }
        }
    }

    /// Convenience wrapper around [`Tree::expand`] for a path in the tree.
    pub fn expand_path(&mut self, path: &Path) -> Result<bool> {
        match self.handle_for(path) {
            Some(handle) => self.expand(&handle),
            None => Ok(false),
        }
    }

    /// Replace the root with a fresh build of `path`.
    ///
    /// The previous root is moved to the front of the directory history.
    /// An empty path is rejected and leaves the tree untouched.
    pub fn set_root_folder(&mut self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            warn!("tried to set empty root path");
            return false;
        }
        let previous = self.root.full_path.clone();
        self.dir_history.retain(|p| p != &previous);
        self.dir_history.insert(0, previous);

        self.rebuild(path);
        true
    }

    /// Rebuild from the current root path, discarding all expansion state.
    pub fn refresh_root_node(&mut self) {
        let path = self.root.full_path.clone();
        self.rebuild(&path);
    }

    /// Change the sort criteria and re-sort the current node's children.
    ///
    /// Only the current node is re-sorted; deeper directories pick up the
    /// new order the next time they are built or expanded.
    pub fn set_sort_criteria(&mut self, criteria: SortCriteria) {
        if self.sort_criteria == criteria {
            return;
        }
        self.sort_criteria = criteria;
        if let Some(node) = Self::find_node_mut(&mut self.root, &self.current) {
            criteria.sort(&mut node.children);
        }
        self.state.insert(StateFlags::SORTING_CHANGED);
    }

    pub fn sort_criteria(&self) -> SortCriteria {
        self.sort_criteria
    }

    pub fn root_node(&self) -> &Node {
        &self.root
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn root_folder(&self) -> &Path {
        &self.root.full_path
    }

    pub fn root_handle(&self) -> NodeHandle {
        NodeHandle {
            generation: self.generation,
            path: self.root.full_path.clone(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dir_history(&self) -> &[PathBuf] {
        &self.dir_history
    }

    /// Issue a handle for the node at `path`, if the tree contains it.
    pub fn handle_for(&self, path: &Path) -> Option<NodeHandle> {
        Self::find_node(&self.root, path).map(|node| NodeHandle {
            generation: self.generation,
            path: node.full_path.clone(),
        })
    }

    pub fn node(&self, handle: &NodeHandle) -> Option<&Node> {
        if handle.generation != self.generation {
            return None;
        }
        Self::find_node(&self.root, &handle.path)
    }

    pub fn node_mut(&mut self, handle: &NodeHandle) -> Option<&mut Node> {
        if handle.generation != self.generation {
            return None;
        }
        Self::find_node_mut(&mut self.root, &handle.path)
    }

    /// The current node, or `None` if it disappeared when an ancestor was
    /// re-expanded.
    pub fn current_node(&self) -> Option<&Node> {
        Self::find_node(&self.root, &self.current)
    }

    pub fn current_path(&self) -> &Path {
        &self.current
    }

    pub fn current_children(&self) -> &[Node] {
        self.current_node()
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Point the current node at `handle`. Returns `false` for stale or
    /// unknown handles.
    pub fn set_current_node(&mut self, handle: &NodeHandle) -> bool {
        if self.node(handle).is_none() {
            debug!("cannot make {} current", handle.path.display());
            return false;
        }
        self.current = handle.path.clone();
        true
    }

    pub fn state(&self) -> StateFlags {
        self.state
    }

    pub fn check_state(&self, flag: StateFlags) -> bool {
        self.state.intersects(flag)
    }

    pub fn set_state(&mut self, flag: StateFlags) {
        self.state.insert(flag);
    }

    /// Return all pending flags and clear them.
    pub fn take_state(&mut self) -> StateFlags {
        std::mem::take(&mut self.state)
    }

    fn rebuild(&mut self, path: &Path) {
        self.root = self.build(path);
        self.current = path.to_path_buf();
        self.generation += 1;
        self.state.insert(StateFlags::ROOT_CHANGED);
    }

    /// Fill `node.children` from a listing of `node.full_path` and sort them.
    fn populate(
        filesystem: &dyn FileSystem,
        sort_criteria: SortCriteria,
        node: &mut Node,
    ) -> io::Result<()> {
        let entries = filesystem.list_directory(&node.full_path)?;
        node.children = entries.into_iter().map(node_from_entry).collect();
        sort_criteria.sort(&mut node.children);
        Ok(())
    }

    fn find_node<'a>(node: &'a Node, target: &Path) -> Option<&'a Node> {
        if node.full_path == target {
            return Some(node);
        }
        node.children
            .iter()
            .filter(|child| target.starts_with(&child.full_path))
            .find_map(|child| Self::find_node(child, target))
    }

    fn find_node_mut<'a>(node: &'a mut Node, target: &Path) -> Option<&'a mut Node> {
        if node.full_path == target {
            return Some(node);
        }
        for child in node.children.iter_mut() {
            if target.starts_with(&child.full_path) {
                if let Some(found) = Self::find_node_mut(child, target) {
                    return Some(found);
                }
            }
        }
        None
    }
}

fn node_from_entry(entry: EntryInfo) -> Node {
    let name = Node::display_name(&entry.path);
    match entry.kind {
        NodeKind::Directory => Node::directory(name, entry.path),
        NodeKind::File => Node::file(name, entry.path, entry.size),
        NodeKind::Unknown => Node::unknown(name, entry.path),
    }
}
