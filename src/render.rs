//! Plain-text rendering of a [`Node`] tree with box-drawing connectors.

use crate::fs::node::{Node, NodeKind};

/// Controls which nodes are drawn and how.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Skip nodes whose `is_visible` flag is false.
    pub only_visible: bool,
    /// Append a human-readable size to file lines.
    pub show_size: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            only_visible: true,
            show_size: true,
        }
    }
}

/// Format a byte count with binary units, keeping about three significant
/// digits: `512 B`, `1.50 KB`, `12.3 MB`, `140 GB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else if size < 10.0 {
        format!("{:.2} {}", size, UNITS[unit])
    } else if size < 100.0 {
        format!("{:.1} {}", size, UNITS[unit])
    } else {
        format!("{:.0} {}", size, UNITS[unit])
    }
}

/// Render `root` and its loaded descendants, one line per node.
pub fn render_tree(root: &Node, options: RenderOptions) -> String {
    let mut out = label(root, options);
    out.push('\n');
    render_children(root, "", options, &mut out);
    out
}

fn render_children(node: &Node, prefix: &str, options: RenderOptions, out: &mut String) {
    let shown: Vec<&Node> = node
        .children
        .iter()
        .filter(|child| !options.only_visible || child.is_visible)
        .collect();

    for (i, child) in shown.iter().enumerate() {
        let is_last = i + 1 == shown.len();
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&label(child, options));
        out.push('\n');

        if !child.children.is_empty() {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            render_children(child, &child_prefix, options, out);
        }
    }
}

fn label(node: &Node, options: RenderOptions) -> String {
    match node.kind {
        NodeKind::Directory if node.has_unexpanded_children => format!("{}/ [+]", node.name),
        NodeKind::Directory => format!("{}/", node.name),
        NodeKind::File if options.show_size => {
            format!("{} ({})", node.name, format_size(node.size))
        }
        NodeKind::File => node.name.clone(),
        NodeKind::Unknown => format!("{} [?]", node.name),
    }
}
