use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Type of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
    /// Entry that is neither a regular file nor a directory (socket, fifo, ...).
    Unknown,
}

/// A node in the in-memory filesystem tree.
///
/// Children are owned exclusively by their parent. `Clone` is a deep copy,
/// which is what the filtered-tree builder hands back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub name: String,
    pub full_path: PathBuf,
    pub kind: NodeKind,
    /// Size in bytes. Only meaningful for `NodeKind::File`.
    pub size: u64,
    /// True for a directory whose children have not been loaded yet.
    pub has_unexpanded_children: bool,
    pub is_visible: bool,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a directory node whose children are not loaded yet.
    pub fn directory(name: impl Into<String>, full_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            kind: NodeKind::Directory,
            size: 0,
            has_unexpanded_children: true,
            is_visible: true,
            children: Vec::new(),
        }
    }

    /// Create a file node with a known size.
    pub fn file(name: impl Into<String>, full_path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            kind: NodeKind::File,
            size,
            has_unexpanded_children: false,
            is_visible: true,
            children: Vec::new(),
        }
    }

    pub fn unknown(name: impl Into<String>, full_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            kind: NodeKind::Unknown,
            size: 0,
            has_unexpanded_children: false,
            is_visible: true,
            children: Vec::new(),
        }
    }

    /// Display name for a path: its final component, or the whole path
    /// when there is none (e.g. `/` or `C:\`).
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Extension derived from the name, including the leading `.`.
    ///
    /// Empty for non-files and for names without a `.`; a name ending in
    /// `.` yields `"."`. Case is preserved.
    pub fn extension(&self) -> &str {
        if self.kind != NodeKind::File {
            return "";
        }
        match self.name.rfind('.') {
            Some(pos) => &self.name[pos..],
            None => "",
        }
    }

    /// Lower-cased derived extension.
    pub fn extension_lowercase(&self) -> String {
        self.extension().to_lowercase()
    }

    /// Copy of this node's own attributes with no children attached.
    pub fn detached(&self) -> Node {
        Node {
            name: self.name.clone(),
            full_path: self.full_path.clone(),
            kind: self.kind,
            size: self.size,
            has_unexpanded_children: self.has_unexpanded_children,
            is_visible: self.is_visible,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match self.kind {
            NodeKind::Directory => writeln!(f, "[DIR] {}", self.name)?,
            NodeKind::File => writeln!(f, "[FILE] {} ({} bytes)", self.name, self.size)?,
            NodeKind::Unknown => writeln!(f, "[UNKNOWN] {}", self.name)?,
        }
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Node {
        Node::file(name, PathBuf::from("/tmp").join(name), 0)
    }

    #[test]
    fn extension_includes_dot() {
        assert_eq!(file("notes.txt").extension(), ".txt");
        assert_eq!(file("archive.tar.GZ").extension(), ".GZ");
    }

    #[test]
    fn extension_empty_without_dot() {
        assert_eq!(file("Makefile").extension(), "");
    }

    #[test]
    fn extension_of_trailing_dot() {
        assert_eq!(file("weird.").extension(), ".");
    }

    #[test]
    fn extension_empty_for_directory() {
        let dir = Node::directory("src.d", "/tmp/src.d");
        assert_eq!(dir.extension(), "");
    }

    #[test]
    fn extension_lowercase_folds_case() {
        assert_eq!(file("a.TXT").extension_lowercase(), ".txt");
    }

    #[test]
    fn new_directory_is_unexpanded_and_visible() {
        let dir = Node::directory("alpha", "/tmp/alpha");
        assert!(dir.has_unexpanded_children);
        assert!(dir.is_visible);
        assert!(dir.children.is_empty());
    }

    #[test]
    fn file_never_flagged_unexpanded() {
        assert!(!file("a.rs").has_unexpanded_children);
    }

    #[test]
    fn display_name_falls_back_to_whole_path() {
        assert_eq!(Node::display_name(Path::new("/tmp/alpha")), "alpha");
        assert_eq!(Node::display_name(Path::new("/")), "/");
    }

    #[test]
    fn detached_drops_children() {
        let mut dir = Node::directory("alpha", "/tmp/alpha");
        dir.children.push(file("a.rs"));
        let copy = dir.detached();
        assert_eq!(copy.name, "alpha");
        assert!(copy.children.is_empty());
        assert_eq!(dir.children.len(), 1);
    }

    #[test]
    fn clone_is_deep() {
        let mut dir = Node::directory("alpha", "/tmp/alpha");
        dir.children.push(file("a.rs"));
        let mut copy = dir.clone();
        copy.children[0].is_visible = false;
        assert!(dir.children[0].is_visible);
        assert_eq!(copy.count(), 2);
    }

    #[test]
    fn display_lists_children_indented() {
        let mut dir = Node::directory("alpha", "/tmp/alpha");
        dir.children.push(Node::file("a.rs", "/tmp/alpha/a.rs", 12));
        let text = dir.to_string();
        assert_eq!(text, "[DIR] alpha\n  [FILE] a.rs (12 bytes)\n");
    }
}
