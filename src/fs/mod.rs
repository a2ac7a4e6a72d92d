pub mod listing;
pub mod node;
pub mod sort;
pub mod state;
pub mod tree;
