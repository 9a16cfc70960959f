//! Resolver boundary, the code-intelligence backend behind every query.
//!
//! The rest of the crate never parses or indexes source. It asks a
//! [`Resolver`] point questions and turns the answers into references,
//! trees and graphs. [`MemoryResolver`] is the bundled implementation,
//! backed by a serialisable symbol index.

pub mod memory;
pub mod types;

use std::path::Path;

use crate::error::Result;

pub use memory::{CallEntry, Document, InheritanceEntry, MemoryResolver, Occurrence, SymbolEntry, SymbolId};
pub use types::{
    CallHierarchyItem, DocumentSymbol, IncomingCall, Location, Position, Range, SymbolDetails,
    SymbolKind, SymbolLocation, TypeHierarchyItem,
};

/// Point queries answered by a code-intelligence backend.
///
/// Every call is a blocking request/response. Backend failures surface as
/// [`ImpactError::Backend`](crate::ImpactError::Backend).
pub trait Resolver {
    /// Register or refresh in-memory content for a file.
    fn update_document(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Top-level symbol outline of a document, children nested.
    fn outline(&self, path: &Path) -> Result<Vec<DocumentSymbol>>;

    /// The symbol covering `pos`, if any.
    fn resolve_at(&self, path: &Path, pos: Position) -> Result<Option<SymbolDetails>>;

    /// All symbols matching a qualified or unqualified name.
    fn resolve_by_name(&self, name: &str, fuzzy: bool) -> Result<Vec<SymbolLocation>>;

    /// Declarations of the type of the symbol at `pos`.
    fn type_of(&self, path: &Path, pos: Position) -> Result<Vec<Location>>;

    /// Canonical declaration site of the symbol at `pos`.
    fn preferred_declaration(&self, path: &Path, pos: Position) -> Result<Option<Location>>;

    /// Every textual reference to the symbol at `pos`.
    fn references_to(&self, path: &Path, pos: Position) -> Result<Vec<Location>>;

    fn prepare_call_hierarchy(&self, path: &Path, pos: Position)
        -> Result<Vec<CallHierarchyItem>>;

    fn incoming_calls(&self, item: &CallHierarchyItem) -> Result<Vec<IncomingCall>>;

    fn prepare_type_hierarchy(&self, path: &Path, pos: Position)
        -> Result<Vec<TypeHierarchyItem>>;

    fn supertypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>>;

    fn subtypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>>;
}
