//
//  types.rs
//  Impact
//

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::resolver::{Location, Position, Range, SymbolKind};

/// One resolved symbol occurrence.
///
/// Identity covers everything except `full_range`: the same declaration
/// can be observed with or without its body span depending on which query
/// produced it, and both observations must compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub kind: SymbolKind,
    /// Canonical file path.
    pub uri: PathBuf,
    /// Minimal span of the symbol's name.
    pub name_range: Range,
    /// Whole definition span, when known.
    pub full_range: Option<Range>,
    pub namespace_scopes: String,
    pub local_scopes: String,
    pub name: String,
}

impl Reference {
    /// A File-kind reference standing for a whole file.
    pub fn file(uri: impl Into<PathBuf>) -> Self {
        Self {
            kind: SymbolKind::File,
            uri: uri.into(),
            name_range: Range::default(),
            full_range: None,
            namespace_scopes: String::new(),
            local_scopes: String::new(),
            name: String::new(),
        }
    }

    pub fn with_full_range(mut self, full_range: Range) -> Self {
        self.full_range = Some(full_range);
        self
    }

    /// Whether `other` lies inside this reference.
    ///
    /// A File reference contains everything in its file. Anything else
    /// contains `other` when `other`'s name falls within this reference's
    /// full range, or its name range if no full range was recorded.
    pub fn contains(&self, other: &Reference) -> bool {
        self.uri == other.uri
            && (self.kind == SymbolKind::File
                || self
                    .full_range
                    .unwrap_or(self.name_range)
                    .contains_range(&other.name_range))
    }

    /// The file and position the resolver should be asked about.
    pub fn file_pos(&self) -> (&Path, Position) {
        (&self.uri, self.name_range.start)
    }

    pub fn location(&self) -> Location {
        Location::new(self.uri.clone(), self.name_range)
    }

    /// Whether this reference sits exactly at `location`.
    pub fn is_at(&self, location: &Location) -> bool {
        self.uri == location.uri && self.name_range == location.range
    }

    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace_scopes, self.local_scopes, self.name)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.uri == other.uri
            && self.name_range == other.name_range
            && self.namespace_scopes == other.namespace_scopes
            && self.local_scopes == other.local_scopes
            && self.name == other.name
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.uri.hash(state);
        self.name_range.hash(state);
        self.namespace_scopes.hash(state);
        self.local_scopes.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == SymbolKind::File {
            write!(f, "{} {}", self.kind, self.uri.display())
        } else {
            write!(
                f,
                "{} {} {}:{}",
                self.kind,
                self.qualified_name(),
                self.uri.display(),
                self.name_range
            )
        }
    }
}
