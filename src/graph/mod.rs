//! Relation graphs: the directed graphs impact queries produce.
//!
//! Provides the graph model, construction from reference trees, the
//! merge/map algorithms that combine partial results, and DOT output.

pub mod builder;
pub mod dot;
pub mod engine;
pub mod merge;

pub use builder::to_graph;
pub use dot::{edge_kind_writer, empty_writer, to_dot, write_dot, ReferenceWriter};
pub use engine::{EdgeKind, ReferenceGraph, RelationGraph, UndirectedGraph, VertexId};
pub use merge::{merge, merge_distinct};
