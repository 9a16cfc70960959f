//! Reference model: resolved symbol occurrences and the trees built from them.

pub mod tree;
pub mod types;

pub use tree::{PreOrder, ReferenceTree};
pub use types::Reference;
