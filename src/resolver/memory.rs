//
//  memory.rs
//  Impact
//

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::*;
use super::Resolver;
use crate::error::{ImpactError, Result};

/// Index of a symbol inside a [`MemoryResolver`].
pub type SymbolId = usize;

/// Content and (optional) explicit outline of one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub content: String,
    /// When empty, the outline is derived from the definitions in the file.
    #[serde(default)]
    pub outline: Vec<DocumentSymbol>,
}

/// A declared symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub kind: SymbolKind,
    pub name: String,
    #[serde(default)]
    pub namespace_scope: String,
    #[serde(default)]
    pub local_scope: String,
    /// Name span of the canonical declaration.
    pub declaration: Location,
    /// Whole definition span, for symbols defined in the index.
    #[serde(default)]
    pub full_range: Option<Range>,
    /// Symbol naming this symbol's type.
    #[serde(default)]
    pub type_of: Option<SymbolId>,
}

impl SymbolEntry {
    pub fn new(kind: SymbolKind, name: impl Into<String>, declaration: Location) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace_scope: String::new(),
            local_scope: String::new(),
            declaration,
            full_range: None,
            type_of: None,
        }
    }

    pub fn with_scopes(mut self, namespace_scope: &str, local_scope: &str) -> Self {
        self.namespace_scope = namespace_scope.to_string();
        self.local_scope = local_scope.to_string();
        self
    }

    pub fn with_full_range(mut self, range: Range) -> Self {
        self.full_range = Some(range);
        self
    }

    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace_scope, self.local_scope, self.name)
    }

    fn container_name(&self) -> String {
        format!("{}{}", self.namespace_scope, self.local_scope)
            .trim_end_matches("::")
            .to_string()
    }

    fn body(&self) -> Range {
        self.full_range.unwrap_or(self.declaration.range)
    }
}

/// One textual mention of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub symbol: SymbolId,
    pub location: Location,
}

/// `caller` calls `callee` at `site`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEntry {
    pub caller: SymbolId,
    pub callee: SymbolId,
    pub site: Location,
}

/// `subtype` derives from `supertype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InheritanceEntry {
    pub subtype: SymbolId,
    pub supertype: SymbolId,
}

/// A [`Resolver`] answering from a prebuilt symbol index held in memory.
///
/// The index is plain data (JSON on disk) so it can be produced by any
/// external indexer, or assembled in code through the builder methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryResolver {
    #[serde(default)]
    documents: BTreeMap<PathBuf, Document>,
    #[serde(default)]
    symbols: Vec<SymbolEntry>,
    #[serde(default)]
    occurrences: Vec<Occurrence>,
    #[serde(default)]
    calls: Vec<CallEntry>,
    #[serde(default)]
    inheritance: Vec<InheritanceEntry>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Persistence ────────────────────────────────────────────

    pub fn from_json(json: &str) -> Result<Self> {
        let resolver: Self = serde_json::from_str(json)?;
        resolver.validate()?;
        Ok(resolver)
    }

    /// Load an index previously written with [`MemoryResolver::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let resolver = Self::from_json(&json)?;
        debug!(
            index = %path.display(),
            symbols = resolver.symbols.len(),
            occurrences = resolver.occurrences.len(),
            "loaded symbol index"
        );
        Ok(resolver)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject indexes whose cross references point past the symbol table.
    fn validate(&self) -> Result<()> {
        let count = self.symbols.len();
        let dangling = self.occurrences.iter().map(|o| o.symbol)
            .chain(self.calls.iter().flat_map(|c| [c.caller, c.callee]))
            .chain(self.inheritance.iter().flat_map(|i| [i.subtype, i.supertype]))
            .chain(self.symbols.iter().filter_map(|s| s.type_of))
            .find(|&id| id >= count);
        match dangling {
            Some(id) => Err(ImpactError::Backend(format!(
                "index refers to symbol #{id} but only {count} symbols are declared"
            ))),
            None => Ok(()),
        }
    }

    // ─── Building ───────────────────────────────────────────────

    /// Declare a symbol. Its declaration counts as an occurrence.
    pub fn declare(&mut self, symbol: SymbolEntry) -> SymbolId {
        let id = self.symbols.len();
        self.occurrences.push(Occurrence {
            symbol: id,
            location: symbol.declaration.clone(),
        });
        self.symbols.push(symbol);
        id
    }

    pub fn occurrence(&mut self, symbol: SymbolId, location: Location) {
        self.occurrences.push(Occurrence { symbol, location });
    }

    /// Record a call. The call site also counts as an occurrence of the callee.
    pub fn call(&mut self, caller: SymbolId, callee: SymbolId, site: Location) {
        self.occurrence(callee, site.clone());
        self.calls.push(CallEntry { caller, callee, site });
    }

    pub fn inherit(&mut self, subtype: SymbolId, supertype: SymbolId) {
        self.inheritance.push(InheritanceEntry { subtype, supertype });
    }

    pub fn set_type(&mut self, symbol: SymbolId, type_symbol: SymbolId) {
        if let Some(entry) = self.symbols.get_mut(symbol) {
            entry.type_of = Some(type_symbol);
        }
    }

    pub fn set_outline(&mut self, path: impl Into<PathBuf>, outline: Vec<DocumentSymbol>) {
        self.documents.entry(path.into()).or_default().outline = outline;
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolEntry> {
        self.symbols.get(id)
    }

    pub fn document(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    // ─── Lookups ────────────────────────────────────────────────

    /// Innermost occurrence covering `pos`.
    fn symbol_at(&self, path: &Path, pos: Position) -> Option<(SymbolId, &Occurrence)> {
        self.occurrences
            .iter()
            .filter(|o| o.location.uri == path && o.location.range.contains(pos))
            .min_by_key(|o| o.location.range.extent())
            .map(|o| (o.symbol, o))
    }

    fn symbol_for(&self, uri: &Path, selection_range: &Range) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.declaration.uri == uri && s.declaration.range == *selection_range)
    }

    fn call_item(&self, id: SymbolId) -> Option<CallHierarchyItem> {
        self.symbols.get(id).map(|s| CallHierarchyItem {
            name: s.name.clone(),
            kind: s.kind,
            uri: s.declaration.uri.clone(),
            range: s.body(),
            selection_range: s.declaration.range,
        })
    }

    fn type_item(&self, id: SymbolId) -> Option<TypeHierarchyItem> {
        self.symbols.get(id).map(|s| TypeHierarchyItem {
            name: s.name.clone(),
            kind: s.kind,
            uri: s.declaration.uri.clone(),
            range: s.body(),
            selection_range: s.declaration.range,
        })
    }

    /// Outline built from the definitions in `path`, nested by containment.
    fn derived_outline(&self, path: &Path) -> Vec<DocumentSymbol> {
        let mut definitions: Vec<&SymbolEntry> = self
            .symbols
            .iter()
            .filter(|s| s.declaration.uri == path && s.full_range.is_some())
            .collect();
        definitions.sort_by(|a, b| {
            let (ra, rb) = (a.body(), b.body());
            ra.start.cmp(&rb.start).then(rb.end.cmp(&ra.end))
        });

        let mut roots = Vec::new();
        let mut stack: Vec<DocumentSymbol> = Vec::new();
        for symbol in definitions {
            let node = DocumentSymbol {
                name: symbol.name.clone(),
                kind: symbol.kind,
                range: symbol.body(),
                selection_range: symbol.declaration.range,
                children: Vec::new(),
            };
            while stack
                .last()
                .is_some_and(|top| !top.range.contains_range(&node.range))
            {
                if let Some(done) = stack.pop() {
                    attach(&mut stack, &mut roots, done);
                }
            }
            stack.push(node);
        }
        while let Some(done) = stack.pop() {
            attach(&mut stack, &mut roots, done);
        }
        roots
    }

    fn stale_item(name: &str) -> ImpactError {
        ImpactError::Backend(format!("hierarchy item '{name}' no longer resolves"))
    }
}

fn attach(stack: &mut [DocumentSymbol], roots: &mut Vec<DocumentSymbol>, node: DocumentSymbol) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Case-insensitive fuzzy name matcher, `arr` matches `array`.
struct FuzzyName {
    pattern: Pattern,
    matcher: Matcher,
}

impl FuzzyName {
    fn new(query: &str) -> Self {
        Self {
            pattern: Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart),
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    fn matches(&mut self, candidate: &str) -> bool {
        let haystack = Utf32String::from(candidate);
        self.pattern
            .score(haystack.slice(..), &mut self.matcher)
            .is_some()
    }
}

pub(crate) fn unqualified(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

impl Resolver for MemoryResolver {
    fn update_document(&mut self, path: &Path, content: &str) -> Result<()> {
        self.documents.entry(path.to_path_buf()).or_default().content = content.to_string();
        Ok(())
    }

    fn outline(&self, path: &Path) -> Result<Vec<DocumentSymbol>> {
        if let Some(document) = self.documents.get(path) {
            if !document.outline.is_empty() {
                return Ok(document.outline.clone());
            }
        }
        let known = self.documents.contains_key(path)
            || self.symbols.iter().any(|s| s.declaration.uri == path);
        if !known {
            return Err(ImpactError::Backend(format!(
                "{} is not part of the index",
                path.display()
            )));
        }
        Ok(self.derived_outline(path))
    }

    fn resolve_at(&self, path: &Path, pos: Position) -> Result<Option<SymbolDetails>> {
        Ok(self.symbol_at(path, pos).and_then(|(id, occurrence)| {
            self.symbols.get(id).map(|s| SymbolDetails {
                kind: s.kind,
                name: s.name.clone(),
                namespace_scope: s.namespace_scope.clone(),
                local_scope: s.local_scope.clone(),
                range: occurrence.location.range,
            })
        }))
    }

    fn resolve_by_name(&self, name: &str, fuzzy: bool) -> Result<Vec<SymbolLocation>> {
        let query = name.trim_start_matches("::");
        let suffix = format!("::{query}");
        let mut fuzzy_name = fuzzy.then(|| FuzzyName::new(unqualified(query)));

        Ok(self
            .symbols
            .iter()
            .filter(|s| match fuzzy_name.as_mut() {
                Some(fuzzy_name) => fuzzy_name.matches(&s.name),
                None => {
                    let qualified = s.qualified_name();
                    qualified == query || qualified.ends_with(&suffix)
                }
            })
            .map(|s| SymbolLocation {
                name: s.name.clone(),
                container_name: s.container_name(),
                kind: s.kind,
                location: s.declaration.clone(),
            })
            .collect())
    }

    fn type_of(&self, path: &Path, pos: Position) -> Result<Vec<Location>> {
        Ok(self
            .symbol_at(path, pos)
            .and_then(|(id, _)| self.symbols.get(id))
            .and_then(|s| s.type_of)
            .and_then(|ty| self.symbols.get(ty))
            .map(|ty| vec![ty.declaration.clone()])
            .unwrap_or_default())
    }

    fn preferred_declaration(&self, path: &Path, pos: Position) -> Result<Option<Location>> {
        Ok(self
            .symbol_at(path, pos)
            .and_then(|(id, _)| self.symbols.get(id))
            .map(|s| s.declaration.clone()))
    }

    fn references_to(&self, path: &Path, pos: Position) -> Result<Vec<Location>> {
        let Some((id, _)) = self.symbol_at(path, pos) else {
            return Ok(Vec::new());
        };
        Ok(self
            .occurrences
            .iter()
            .filter(|o| o.symbol == id)
            .map(|o| o.location.clone())
            .collect())
    }

    fn prepare_call_hierarchy(
        &self,
        path: &Path,
        pos: Position,
    ) -> Result<Vec<CallHierarchyItem>> {
        Ok(self
            .symbol_at(path, pos)
            .filter(|(id, _)| self.symbols.get(*id).is_some_and(|s| s.kind.is_callable()))
            .and_then(|(id, _)| self.call_item(id))
            .into_iter()
            .collect())
    }

    fn incoming_calls(&self, item: &CallHierarchyItem) -> Result<Vec<IncomingCall>> {
        let callee = self
            .symbol_for(&item.uri, &item.selection_range)
            .ok_or_else(|| Self::stale_item(&item.name))?;

        // One entry per caller, call sites grouped, in first-seen order.
        let mut grouped: Vec<(SymbolId, Vec<Range>)> = Vec::new();
        for call in self.calls.iter().filter(|c| c.callee == callee) {
            match grouped.iter_mut().find(|(caller, _)| *caller == call.caller) {
                Some((_, sites)) => sites.push(call.site.range),
                None => grouped.push((call.caller, vec![call.site.range])),
            }
        }

        Ok(grouped
            .into_iter()
            .filter_map(|(caller, from_ranges)| {
                self.call_item(caller)
                    .map(|from| IncomingCall { from, from_ranges })
            })
            .collect())
    }

    fn prepare_type_hierarchy(
        &self,
        path: &Path,
        pos: Position,
    ) -> Result<Vec<TypeHierarchyItem>> {
        Ok(self
            .symbol_at(path, pos)
            .filter(|(id, _)| {
                self.symbols
                    .get(*id)
                    .is_some_and(|s| s.kind.is_type() || s.kind == SymbolKind::Interface)
            })
            .and_then(|(id, _)| self.type_item(id))
            .into_iter()
            .collect())
    }

    fn supertypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>> {
        let id = self
            .symbol_for(&item.uri, &item.selection_range)
            .ok_or_else(|| Self::stale_item(&item.name))?;
        Ok(self
            .inheritance
            .iter()
            .filter(|i| i.subtype == id)
            .filter_map(|i| self.type_item(i.supertype))
            .collect())
    }

    fn subtypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>> {
        let id = self
            .symbol_for(&item.uri, &item.selection_range)
            .ok_or_else(|| Self::stale_item(&item.name))?;
        Ok(self
            .inheritance
            .iter()
            .filter(|i| i.supertype == id)
            .filter_map(|i| self.type_item(i.subtype))
            .collect())
    }
}
