//
//  types.rs
//  Impact
//

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ─── Positions and Ranges ───────────────────────────────────────

/// A zero-based line/character position in a document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A half-open span `[start, end)` in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Single-line range, handy for identifiers.
    pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    /// An empty range contains only its own start.
    pub fn contains(&self, pos: Position) -> bool {
        if self.start == self.end {
            return pos == self.start;
        }
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely within this range. Every range contains itself.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Ordering key used to pick the innermost of several candidate ranges.
    pub(crate) fn extent(&self) -> (u32, u32) {
        let lines = self.end.line.saturating_sub(self.start.line);
        let chars = if lines == 0 {
            self.end.character.saturating_sub(self.start.character)
        } else {
            self.end.character
        };
        (lines, chars)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A range inside a specific file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: PathBuf,
    pub range: Range,
}

impl Location {
    pub fn new(uri: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}

// ─── Symbol Kinds ───────────────────────────────────────────────

/// Category of a resolved symbol, mirroring the LSP symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Module => "Module",
            Self::Namespace => "Namespace",
            Self::Package => "Package",
            Self::Class => "Class",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Enum => "Enum",
            Self::Interface => "Interface",
            Self::Function => "Function",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Key => "Key",
            Self::Null => "Null",
            Self::EnumMember => "EnumMember",
            Self::Struct => "Struct",
            Self::Event => "Event",
            Self::Operator => "Operator",
            Self::TypeParameter => "TypeParameter",
        }
    }

    /// Kinds that can appear in a call hierarchy.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::Constructor | Self::Function | Self::Interface | Self::Method | Self::Operator
        )
    }

    /// Kinds that can appear in a type hierarchy.
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Class | Self::Enum | Self::Struct)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Resolver Payloads ──────────────────────────────────────────

/// One entry of a document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Entire definition span.
    pub range: Range,
    /// Span of the symbol's name.
    pub selection_range: Range,
    #[serde(default)]
    pub children: Vec<DocumentSymbol>,
}

/// What the resolver knows about the symbol under a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDetails {
    pub kind: SymbolKind,
    pub name: String,
    /// e.g. `a::b::`
    pub namespace_scope: String,
    /// e.g. `Foo::`
    pub local_scope: String,
    /// Exact span of the name at the queried position.
    pub range: Range,
}

/// A name-lookup hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolLocation {
    pub name: String,
    pub container_name: String,
    pub kind: SymbolKind,
    pub location: Location,
}

/// Handle into the resolver's call hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallHierarchyItem {
    pub name: String,
    pub kind: SymbolKind,
    pub uri: PathBuf,
    pub range: Range,
    pub selection_range: Range,
}

/// A caller together with the call sites inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingCall {
    pub from: CallHierarchyItem,
    pub from_ranges: Vec<Range>,
}

/// Handle into the resolver's type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHierarchyItem {
    pub name: String,
    pub kind: SymbolKind,
    pub uri: PathBuf,
    pub range: Range,
    pub selection_range: Range,
}
