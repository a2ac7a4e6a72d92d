use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::AppError;
use crate::fs::node::{Node, NodeKind};

/// Sort criteria for a directory's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortCriteria {
    /// Directories first, then case-insensitive name.
    #[default]
    TypeThenName,
    /// Directories first, then files grouped by extension, then other
    /// entries.
    Extension,
    /// Case-insensitive name only.
    Name,
    /// Directories first, then files by size (largest first), then other
    /// entries.
    Size,
    /// Reserved: keeps the listing order.
    DateModified,
}

impl SortCriteria {
    /// Get the display label for the sort criteria.
    pub fn label(&self) -> &'static str {
        match self {
            SortCriteria::TypeThenName => "Type then Name",
            SortCriteria::Extension => "Extension",
            SortCriteria::Name => "Name",
            SortCriteria::Size => "Size",
            SortCriteria::DateModified => "Date Modified",
        }
    }

    /// Compare two siblings under this criteria.
    ///
    /// Extension and Size group nodes by kind (directories, files, then
    /// other entries) so their file-only keys never compare across groups.
    /// Every criteria except `DateModified` ends with a raw-name tie-break
    /// so that only identical names compare equal.
    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        match self {
            SortCriteria::TypeThenName => dirs_first(a, b).then_with(|| by_name(a, b)),
            SortCriteria::Extension => kind_rank(a)
                .cmp(&kind_rank(b))
                .then_with(|| {
                    if a.is_file() && b.is_file() {
                        a.extension_lowercase().cmp(&b.extension_lowercase())
                    } else {
                        Ordering::Equal
                    }
                })
                .then_with(|| by_name(a, b)),
            SortCriteria::Name => by_name(a, b),
            SortCriteria::Size => kind_rank(a)
                .cmp(&kind_rank(b))
                .then_with(|| {
                    if a.is_file() && b.is_file() {
                        b.size.cmp(&a.size)
                    } else {
                        Ordering::Equal
                    }
                })
                .then_with(|| by_name(a, b)),
            SortCriteria::DateModified => Ordering::Equal,
        }
    }

    /// Sort a slice of siblings in place (non-recursive).
    pub fn sort(&self, children: &mut [Node]) {
        children.sort_by(|a, b| self.compare(a, b));
    }
}

fn kind_rank(node: &Node) -> u8 {
    match node.kind {
        NodeKind::Directory => 0,
        NodeKind::File => 1,
        NodeKind::Unknown => 2,
    }
}

fn dirs_first(a: &Node, b: &Node) -> Ordering {
    b.is_directory().cmp(&a.is_directory())
}

fn by_name(a: &Node, b: &Node) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts both config-style names (`type-then-name`, `size`) and the
/// display labels (`Type then Name`), case-insensitively.
impl FromStr for SortCriteria {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "typethenname" | "type" => Ok(SortCriteria::TypeThenName),
            "extension" | "ext" => Ok(SortCriteria::Extension),
            "name" => Ok(SortCriteria::Name),
            "size" => Ok(SortCriteria::Size),
            "datemodified" | "modified" => Ok(SortCriteria::DateModified),
            _ => Err(AppError::InvalidSortCriteria(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> Node {
        Node::file(name, format!("/r/{name}"), size)
    }

    fn dir(name: &str) -> Node {
        Node::directory(name, format!("/r/{name}"))
    }

    fn other(name: &str) -> Node {
        Node::unknown(name, format!("/r/{name}"))
    }

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    fn sample() -> Vec<Node> {
        vec![
            file("b.txt", 10),
            dir("Zeta"),
            file("A.rs", 300),
            dir("alpha"),
            file("c.RS", 20),
            other("m"),
            file("Makefile", 5),
            other("a.sock"),
        ]
    }

    #[test]
    fn type_then_name_puts_dirs_first() {
        let mut nodes = sample();
        SortCriteria::TypeThenName.sort(&mut nodes);
        assert_eq!(
            names(&nodes),
            vec!["alpha", "Zeta", "A.rs", "a.sock", "b.txt", "c.RS", "m", "Makefile"]
        );
    }

    #[test]
    fn extension_groups_files() {
        let mut nodes = sample();
        SortCriteria::Extension.sort(&mut nodes);
        assert_eq!(
            names(&nodes),
            vec!["alpha", "Zeta", "Makefile", "A.rs", "c.RS", "b.txt", "a.sock", "m"]
        );
    }

    #[test]
    fn name_ignores_kind() {
        let mut nodes = sample();
        SortCriteria::Name.sort(&mut nodes);
        assert_eq!(
            names(&nodes),
            vec!["A.rs", "a.sock", "alpha", "b.txt", "c.RS", "m", "Makefile", "Zeta"]
        );
    }

    #[test]
    fn size_is_descending_for_files() {
        let mut nodes = sample();
        SortCriteria::Size.sort(&mut nodes);
        assert_eq!(
            names(&nodes),
            vec!["alpha", "Zeta", "A.rs", "c.RS", "b.txt", "Makefile", "a.sock", "m"]
        );
    }

    #[test]
    fn size_ties_break_on_name() {
        let mut nodes = vec![file("b", 7), file("a", 7)];
        SortCriteria::Size.sort(&mut nodes);
        assert_eq!(names(&nodes), vec!["a", "b"]);
    }

    #[test]
    fn date_modified_keeps_listing_order() {
        let mut nodes = sample();
        let before: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        SortCriteria::DateModified.sort(&mut nodes);
        let after: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn sorting_is_idempotent() {
        for &criteria in SortCriteria::value_variants() {
            let mut once = sample();
            criteria.sort(&mut once);
            let mut twice = once.clone();
            criteria.sort(&mut twice);
            assert_eq!(once, twice, "{criteria} not idempotent");
        }
    }

    #[test]
    fn case_variants_are_ordered() {
        let a = file("readme", 0);
        let b = file("README", 0);
        for criteria in [
            SortCriteria::TypeThenName,
            SortCriteria::Extension,
            SortCriteria::Name,
            SortCriteria::Size,
        ] {
            assert_ne!(criteria.compare(&a, &b), Ordering::Equal);
            assert_eq!(criteria.compare(&a, &b), criteria.compare(&b, &a).reverse());

            let (x, y) = (other("fifo"), other("FIFO"));
            assert_ne!(criteria.compare(&x, &y), Ordering::Equal);
            assert_eq!(criteria.compare(&x, &y), criteria.compare(&y, &x).reverse());
        }
    }

    #[test]
    fn mixed_kinds_sort_independent_of_input_order() {
        for criteria in [SortCriteria::Extension, SortCriteria::Size] {
            let mut forward = vec![file("z.aa", 100), file("a.zz", 1), other("m")];
            let mut rotated = vec![other("m"), file("z.aa", 100), file("a.zz", 1)];
            criteria.sort(&mut forward);
            criteria.sort(&mut rotated);
            assert_eq!(names(&forward), names(&rotated), "{criteria} depends on input order");
        }
    }

    #[test]
    fn compare_is_transitive_over_mixed_kinds() {
        let nodes = sample();
        for &criteria in SortCriteria::value_variants() {
            for a in &nodes {
                for b in &nodes {
                    for c in &nodes {
                        if criteria.compare(a, b) == Ordering::Less
                            && criteria.compare(b, c) == Ordering::Less
                        {
                            assert_eq!(
                                criteria.compare(a, c),
                                Ordering::Less,
                                "{criteria}: {} < {} < {}",
                                a.name,
                                b.name,
                                c.name
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn parse_names_and_labels() {
        assert_eq!(
            "type-then-name".parse::<SortCriteria>().unwrap(),
            SortCriteria::TypeThenName
        );
        assert_eq!(
            "Date Modified".parse::<SortCriteria>().unwrap(),
            SortCriteria::DateModified
        );
        assert_eq!("SIZE".parse::<SortCriteria>().unwrap(), SortCriteria::Size);
        assert!(matches!(
            "bogus".parse::<SortCriteria>(),
            Err(AppError::InvalidSortCriteria(_))
        ));
    }
}
