//! Query orchestration over a [`Resolver`].
//!
//! The [`Referencer`] turns raw resolver answers into [`Reference`]s and
//! [`ReferenceTree`]s: document outlines, symbol lookups, containment
//! chains, usages, and (in [`hierarchy`]) call and type hierarchies.

pub mod hierarchy;

use std::path::Path;
use tracing::{debug, warn};

use crate::error::{tolerated, ImpactError, Result};
use crate::reference::{Reference, ReferenceTree};
use crate::resolver::memory::unqualified;
use crate::resolver::{DocumentSymbol, Location, Position, Range, Resolver, SymbolKind};

/// Symbol-level queries built from resolver point queries.
#[derive(Debug, Clone)]
pub struct Referencer<R> {
    resolver: R,
}

impl<R: Resolver> Referencer<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Register or refresh the content of a file with the resolver.
    pub fn update_file(&mut self, file: &Path, content: &str) -> Result<()> {
        self.resolver.update_document(file, content)
    }

    // ─── Lookups ────────────────────────────────────────────────

    /// The symbol tree of a file, rooted at a File reference.
    ///
    /// Children mirror the outline's nesting; each outline entry is resolved
    /// to its exact identity and keeps its definition span as `full_range`.
    pub fn query_file(&self, file: &Path) -> Result<ReferenceTree> {
        let outline = self.resolver.outline(file)?;
        let children = self.outline_children(file, &outline)?;
        Ok(ReferenceTree::new(Reference::file(file), children))
    }

    /// Entries that fail to resolve are dropped along with their subtree.
    fn outline_children(
        &self,
        file: &Path,
        symbols: &[DocumentSymbol],
    ) -> Result<Vec<ReferenceTree>> {
        let mut children = Vec::new();
        for symbol in symbols {
            let tree = self.outline_tree(file, symbol);
            if let Some(tree) = tolerated("outline entry", &symbol.name, tree)? {
                children.push(tree);
            }
        }
        Ok(children)
    }

    fn outline_tree(&self, file: &Path, symbol: &DocumentSymbol) -> Result<ReferenceTree> {
        let reference = self
            .resolve_item(file, symbol.selection_range.start, &symbol.name, symbol.kind)?
            .with_full_range(symbol.range);
        let children = self.outline_children(file, &symbol.children)?;
        Ok(ReferenceTree::new(reference, children))
    }

    /// The symbol at `pos`, or `None` when no symbol covers it.
    pub fn query_location(&self, file: &Path, pos: Position) -> Result<Option<Reference>> {
        let Some(details) = self.resolver.resolve_at(file, pos)? else {
            return Ok(None);
        };
        Ok(Some(Reference {
            kind: details.kind,
            uri: file.to_path_buf(),
            name_range: details.range,
            full_range: None,
            namespace_scopes: details.namespace_scope,
            local_scopes: details.local_scope,
            name: details.name,
        }))
    }

    pub fn query_location_at(&self, location: &Location) -> Result<Option<Reference>> {
        self.query_location(&location.uri, location.range.start)
    }

    /// Every symbol matching `name`.
    ///
    /// Without `fuzzy`, hits whose unqualified spelling differs from the
    /// unqualified part of `name` are dropped. A hit the resolver fails on is
    /// skipped, the other hits are kept.
    pub fn query_name(&self, name: &str, fuzzy: bool) -> Result<Vec<Reference>> {
        let wanted = unqualified(name);
        let mut result = Vec::new();
        for symbol in self.resolver.resolve_by_name(name, fuzzy)? {
            if !fuzzy && symbol.name != wanted {
                continue;
            }
            let located = self.query_location_at(&symbol.location);
            match tolerated("name hit", &symbol.name, located)? {
                Some(Some(reference)) => result.push(reference),
                Some(None) => debug!(name = %symbol.name, "name hit does not resolve to a symbol"),
                None => {}
            }
        }
        Ok(result)
    }

    /// Resolve a symbol handed out by the resolver (outline entry, hierarchy
    /// item). Falls back to the handle's own data when the position no longer
    /// resolves.
    pub(crate) fn resolve_item(
        &self,
        file: &Path,
        pos: Position,
        name: &str,
        kind: SymbolKind,
    ) -> Result<Reference> {
        if let Some(reference) = self.query_location(file, pos)? {
            return Ok(reference);
        }
        warn!(file = %file.display(), %pos, name, "resolver item does not resolve, using its own data");
        Ok(Reference {
            kind,
            uri: file.to_path_buf(),
            name_range: Range::new(pos, pos),
            full_range: None,
            namespace_scopes: String::new(),
            local_scopes: String::new(),
            name: name.to_string(),
        })
    }

    // ─── Containment ────────────────────────────────────────────

    /// The innermost reference in `reference`'s file that properly
    /// contains it. The File reference when nothing else does.
    pub fn find_container(&self, reference: &Reference) -> Result<Reference> {
        let mut tree = self.query_file(&reference.uri)?;
        loop {
            let next = tree
                .children
                .iter()
                .position(|child| child.reference.contains(reference) && child.reference != *reference);
            match next {
                Some(index) => tree = tree.children.swap_remove(index),
                None => return Ok(tree.reference),
            }
        }
    }

    /// The chain from the File reference down to the innermost reference
    /// containing `reference`, one child per level.
    ///
    /// Unlike [`find_container`](Self::find_container) the chain may end at
    /// `reference` itself when it is part of the outline.
    pub fn find_container_path(&self, reference: &Reference) -> Result<ReferenceTree> {
        let mut tree = self.query_file(&reference.uri)?;

        let mut current = &mut tree;
        loop {
            let next = current
                .children
                .iter()
                .position(|child| child.reference.contains(reference));
            let Some(index) = next else {
                break;
            };
            let chosen = current.children.swap_remove(index);
            current.children = vec![chosen];
            current = &mut current.children[0];
        }

        Ok(tree)
    }

    // ─── Declarations and Usages ────────────────────────────────

    /// The reference's type, resolved at its declaration.
    pub fn find_type(&self, reference: &Reference) -> Result<Reference> {
        let (file, pos) = reference.file_pos();
        let declaration = self
            .resolver
            .type_of(file, pos)?
            .into_iter()
            .next()
            .ok_or_else(|| ImpactError::not_found(format!("type of {reference}")))?;
        self.query_location_at(&declaration)?
            .ok_or_else(|| ImpactError::not_found(format!("type declaration of {reference}")))
    }

    /// The canonical declaration of the symbol `reference` names.
    pub fn find_preferred_declaration(&self, reference: &Reference) -> Result<Option<Reference>> {
        let (file, pos) = reference.file_pos();
        match self.resolver.preferred_declaration(file, pos)? {
            Some(location) => self.query_location_at(&location),
            None => Ok(None),
        }
    }

    /// Usages of `reference`, attached as leaves under its declaration.
    ///
    /// The declaration itself is never listed as one of its usages, and usages
    /// the resolver fails on are left out.
    pub fn find_references(&self, reference: &Reference) -> Result<ReferenceTree> {
        let root = self
            .find_preferred_declaration(reference)?
            .unwrap_or_else(|| reference.clone());

        let (file, pos) = reference.file_pos();
        let mut children = Vec::new();
        for location in self.resolver.references_to(file, pos)? {
            if root.is_at(&location) {
                continue;
            }
            let located = self.query_location_at(&location);
            match tolerated("usage", location.uri.display(), located)? {
                Some(Some(usage)) => children.push(ReferenceTree::leaf(usage)),
                Some(None) => debug!(file = %location.uri.display(), range = %location.range, "usage does not resolve"),
                None => {}
            }
        }

        Ok(ReferenceTree::new(root, children))
    }
}
