//
//  hierarchy.rs
//  Impact
//

use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use super::Referencer;
use crate::error::{tolerated, ImpactError, Result};
use crate::reference::{Reference, ReferenceTree};
use crate::resolver::{CallHierarchyItem, Range, Resolver, SymbolKind, TypeHierarchyItem};

/// Common view of call- and type-hierarchy handles.
trait HierarchyItem {
    fn uri(&self) -> &Path;
    fn name(&self) -> &str;
    fn kind(&self) -> SymbolKind;
    fn range(&self) -> Range;
    fn selection_range(&self) -> Range;
}

macro_rules! impl_hierarchy_item {
    ($($item:ty),*) => {$(
        impl HierarchyItem for $item {
            fn uri(&self) -> &Path { &self.uri }
            fn name(&self) -> &str { &self.name }
            fn kind(&self) -> SymbolKind { self.kind }
            fn range(&self) -> Range { self.range }
            fn selection_range(&self) -> Range { self.selection_range }
        }
    )*};
}

impl_hierarchy_item!(CallHierarchyItem, TypeHierarchyItem);

#[derive(Debug, Clone, Copy)]
enum TypeDirection {
    Supertypes,
    Subtypes,
}

impl<R: Resolver> Referencer<R> {
    // ─── Callers ────────────────────────────────────────────────

    /// Functions calling `reference` directly.
    pub fn find_direct_callers(&self, reference: &Reference) -> Result<Vec<Reference>> {
        let mut result = Vec::new();
        for item in self.prepare_calls(reference)? {
            for call in self.resolver.incoming_calls(&item)? {
                let caller = self.item_reference(&call.from);
                if let Some(caller) = tolerated("caller", &call.from.name, caller)? {
                    result.push(caller);
                }
            }
        }
        Ok(result)
    }

    /// `reference`'s declaration with its callers, their callers, and so on.
    pub fn find_caller_hierarchies(&self, reference: &Reference) -> Result<ReferenceTree> {
        let items = self.prepare_calls(reference)?;
        let callers = |item: &CallHierarchyItem| -> Result<Vec<CallHierarchyItem>> {
            Ok(self
                .resolver
                .incoming_calls(item)?
                .into_iter()
                .map(|call| call.from)
                .collect())
        };
        self.expand(&items[0], &callers, &mut HashSet::new())
    }

    // ─── Type Hierarchy ─────────────────────────────────────────

    pub fn find_direct_supertypes(&self, reference: &Reference) -> Result<Vec<Reference>> {
        self.direct_types(reference, TypeDirection::Supertypes)
    }

    pub fn find_supertype_hierarchies(&self, reference: &Reference) -> Result<ReferenceTree> {
        self.type_hierarchy(reference, TypeDirection::Supertypes)
    }

    pub fn find_direct_subtypes(&self, reference: &Reference) -> Result<Vec<Reference>> {
        self.direct_types(reference, TypeDirection::Subtypes)
    }

    pub fn find_subtype_hierarchies(&self, reference: &Reference) -> Result<ReferenceTree> {
        self.type_hierarchy(reference, TypeDirection::Subtypes)
    }

    fn related_types(
        &self,
        item: &TypeHierarchyItem,
        direction: TypeDirection,
    ) -> Result<Vec<TypeHierarchyItem>> {
        match direction {
            TypeDirection::Supertypes => self.resolver.supertypes(item),
            TypeDirection::Subtypes => self.resolver.subtypes(item),
        }
    }

    fn direct_types(&self, reference: &Reference, direction: TypeDirection) -> Result<Vec<Reference>> {
        let mut result = Vec::new();
        for item in self.prepare_types(reference)? {
            for related in self.related_types(&item, direction)? {
                let reference = self.item_reference(&related);
                if let Some(reference) = tolerated("related type", &related.name, reference)? {
                    result.push(reference);
                }
            }
        }
        Ok(result)
    }

    fn type_hierarchy(&self, reference: &Reference, direction: TypeDirection) -> Result<ReferenceTree> {
        let items = self.prepare_types(reference)?;
        let related = |item: &TypeHierarchyItem| self.related_types(item, direction);
        self.expand(&items[0], &related, &mut HashSet::new())
    }

    // ─── Shared ─────────────────────────────────────────────────

    /// Preferred declaration, required before any hierarchy query.
    fn declaration_of(&self, reference: &Reference) -> Result<Reference> {
        self.find_preferred_declaration(reference)?.ok_or_else(|| {
            ImpactError::PreconditionViolation(format!("no declaration resolves for {reference}"))
        })
    }

    /// Call hierarchy handles for `reference`'s declaration. Never empty.
    fn prepare_calls(&self, reference: &Reference) -> Result<Vec<CallHierarchyItem>> {
        let declaration = self.declaration_of(reference)?;
        let (file, pos) = declaration.file_pos();
        let items = self.resolver.prepare_call_hierarchy(file, pos)?;
        if items.is_empty() {
            return Err(ImpactError::not_found(format!("call hierarchy for {declaration}")));
        }
        Ok(items)
    }

    /// Type hierarchy handles for `reference`'s declaration. Never empty.
    fn prepare_types(&self, reference: &Reference) -> Result<Vec<TypeHierarchyItem>> {
        let declaration = self.declaration_of(reference)?;
        let (file, pos) = declaration.file_pos();
        let items = self.resolver.prepare_type_hierarchy(file, pos)?;
        if items.is_empty() {
            return Err(ImpactError::not_found(format!("type hierarchy for {declaration}")));
        }
        Ok(items)
    }

    fn item_reference<I: HierarchyItem>(&self, item: &I) -> Result<Reference> {
        Ok(self
            .resolve_item(item.uri(), item.selection_range().start, item.name(), item.kind())?
            .with_full_range(item.range()))
    }

    /// Expand `item` recursively through `next`.
    ///
    /// A symbol already expanded elsewhere in this hierarchy shows up again as
    /// a leaf, so cycles terminate and diamonds are not materialised twice.
    /// A related item that fails to resolve is dropped with its subtree, and
    /// an item whose relations cannot be fetched stays a leaf.
    fn expand<I, F>(
        &self,
        item: &I,
        next: &F,
        visited: &mut HashSet<Reference>,
    ) -> Result<ReferenceTree>
    where
        I: HierarchyItem,
        F: Fn(&I) -> Result<Vec<I>>,
    {
        let reference = self.item_reference(item)?;
        if !visited.insert(reference.clone()) {
            debug!(symbol = %reference, "already expanded, kept as leaf");
            return Ok(ReferenceTree::leaf(reference));
        }

        let mut children = Vec::new();
        let related = tolerated("hierarchy", &reference, next(item))?.unwrap_or_default();
        for child in related {
            let expanded = self.expand(&child, next, visited);
            if let Some(tree) = tolerated("hierarchy item", child.name(), expanded)? {
                children.push(tree);
            }
        }
        Ok(ReferenceTree::new(reference, children))
    }
}
