//! Undoable operations over a [`Tree`] and the linear history that runs them.

pub mod filter;

pub use filter::{ApplyFilterCmd, ResetFilterCmd};

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::fs::tree::Tree;

/// A unit of work that can be executed against a tree and undone.
///
/// Redo re-runs `execute` on the same object, so `execute` must be safe to
/// call again after `undo`.
pub trait Command {
    fn execute(&mut self, tree: &mut Tree);

    fn undo(&mut self, tree: &mut Tree) -> Result<()>;

    fn name(&self) -> &str;
}

/// Linear command history with a cursor.
///
/// Commands before the cursor have been executed; commands at or after it
/// can be redone. Executing a new command discards the redo tail.
#[derive(Default)]
pub struct CommandHistory {
    history: Vec<Box<dyn Command>>,
    current_index: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `command` and record it, truncating anything that could have
    /// been redone.
    pub fn execute(&mut self, mut command: Box<dyn Command>, tree: &mut Tree) {
        if self.current_index < self.history.len() {
            debug!(
                "discarding {} redoable command(s)",
                self.history.len() - self.current_index
            );
            self.history.truncate(self.current_index);
        }
        command.execute(tree);
        info!("Executed: {}", command.name());
        self.history.push(command);
        self.current_index += 1;
    }

    /// Undo the command before the cursor. Returns `false` if there was
    /// nothing to undo.
    ///
    /// A command whose own undo fails is logged; the cursor still moves so
    /// that history stays linear.
    pub fn undo(&mut self, tree: &mut Tree) -> bool {
        if !self.can_undo() {
            debug!("Nothing to undo");
            return false;
        }
        self.current_index -= 1;
        let command = &mut self.history[self.current_index];
        match command.undo(tree) {
            Ok(()) => info!("Undone: {}", command.name()),
            Err(e) => warn!("Undo of {} failed: {}", command.name(), e),
        }
        true
    }

    /// Re-execute the command at the cursor. Returns `false` if there was
    /// nothing to redo.
    pub fn redo(&mut self, tree: &mut Tree) -> bool {
        if !self.can_redo() {
            debug!("Nothing to redo");
            return false;
        }
        let command = &mut self.history[self.current_index];
        command.execute(tree);
        info!("Redone: {}", command.name());
        self.current_index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.history.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn command_name(&self, index: usize) -> Option<&str> {
        self.history.get(index).map(|c| c.name())
    }

    pub fn names(&self) -> Vec<&str> {
        self.history.iter().map(|c| c.name()).collect()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.history.clear();
        self.current_index = 0;
    }
}

impl fmt::Display for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Command History:")?;
        for (i, command) in self.history.iter().enumerate() {
            let marker = if i + 1 == self.current_index {
                " (current)"
            } else {
                ""
            };
            writeln!(f, "{}: {}{}", i, command.name(), marker)?;
        }
        Ok(())
    }
}
