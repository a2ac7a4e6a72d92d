//! In-memory mirror of a directory tree with lazy expansion, sorting,
//! extension filtering and undoable filter commands.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod log_level;
pub mod render;
pub mod visitor;
