//! # Impact
//!
//! Impact graphs for code: given a symbol, which other symbols are affected
//! when it changes.
//!
//! A [`Resolver`] answers point queries about a code base (outline, symbol
//! at a position, references, call and type hierarchies). The
//! [`Referencer`] lifts those answers into [`Reference`]s and
//! [`ReferenceTree`]s, [`graph`] turns trees into relation graphs and merges
//! them, and [`impact`] composes everything into one impact graph that can
//! be written out as DOT.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use impact::{analyze, ImpactOptions, ImpactRequest, MemoryResolver, Referencer};
//! use impact::graph::{edge_kind_writer, to_dot, ReferenceWriter};
//!
//! let index = MemoryResolver::load(Path::new("index.json")).unwrap();
//! let referencer = Referencer::new(index);
//!
//! let request = ImpactRequest {
//!     names: vec!["geo::Shape::area".to_string()],
//!     ..Default::default()
//! };
//! let options = ImpactOptions { follow_calls: true, ..Default::default() };
//! let graph = analyze(&referencer, options, &request).unwrap();
//!
//! let writer = ReferenceWriter::default();
//! println!("{}", to_dot(&graph, |id, r| writer.write(id, r), edge_kind_writer));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod impact;
pub mod reference;
pub mod referencer;
pub mod resolver;

// Re-exports for convenience
pub use config::ImpactConfig;
pub use error::{ImpactError, Result};
pub use graph::{EdgeKind, ReferenceGraph, RelationGraph};
pub use impact::{analyze, ImpactAnalyzer, ImpactOptions, ImpactRequest};
pub use reference::{Reference, ReferenceTree};
pub use referencer::Referencer;
pub use resolver::memory::MemoryResolver;
pub use resolver::Resolver;
