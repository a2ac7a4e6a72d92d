use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Cross-component event bits raised by the tree and consumed by whoever
/// orchestrates it.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct StateFlags(u32);

impl StateFlags {
    pub const NONE: StateFlags = StateFlags(0);
    /// A directory was lazily expanded.
    pub const NODE_EXPANDED: StateFlags = StateFlags(1 << 0);
    /// Node visibility was changed by a filter command.
    pub const FILTER_CHANGED: StateFlags = StateFlags(1 << 1);
    /// The root was rebuilt (new root folder or refresh).
    pub const ROOT_CHANGED: StateFlags = StateFlags(1 << 2);
    pub const SORTING_CHANGED: StateFlags = StateFlags(1 << 3);

    const NAMES: [(StateFlags, &'static str); 4] = [
        (StateFlags::NODE_EXPANDED, "NODE_EXPANDED"),
        (StateFlags::FILTER_CHANGED, "FILTER_CHANGED"),
        (StateFlags::ROOT_CHANGED, "ROOT_CHANGED"),
        (StateFlags::SORTING_CHANGED, "SORTING_CHANGED"),
    ];

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `other` is set.
    pub fn intersects(&self, other: StateFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set.
    pub fn contains(&self, other: StateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: StateFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for StateFlags {
    type Output = StateFlags;

    fn bitor(self, rhs: StateFlags) -> StateFlags {
        StateFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for StateFlags {
    fn bitor_assign(&mut self, rhs: StateFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("StateFlags(NONE)");
        }
        let set: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "StateFlags({})", set.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(StateFlags::default().is_empty());
        assert_eq!(StateFlags::default(), StateFlags::NONE);
    }

    #[test]
    fn insert_and_contains() {
        let mut flags = StateFlags::NONE;
        flags.insert(StateFlags::NODE_EXPANDED);
        flags |= StateFlags::FILTER_CHANGED;
        assert!(flags.contains(StateFlags::NODE_EXPANDED | StateFlags::FILTER_CHANGED));
        assert!(!flags.contains(StateFlags::ROOT_CHANGED));
        assert!(flags.intersects(StateFlags::FILTER_CHANGED | StateFlags::ROOT_CHANGED));
        assert!(!flags.intersects(StateFlags::ROOT_CHANGED | StateFlags::SORTING_CHANGED));
    }

    #[test]
    fn debug_lists_set_names() {
        let flags = StateFlags::NODE_EXPANDED | StateFlags::ROOT_CHANGED;
        assert_eq!(format!("{flags:?}"), "StateFlags(NODE_EXPANDED | ROOT_CHANGED)");
        assert_eq!(format!("{:?}", StateFlags::NONE), "StateFlags(NONE)");
    }
}
