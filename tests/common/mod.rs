//! Shared fixture for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use impact::error::{ImpactError, Result};
use impact::resolver::{
    CallHierarchyItem, DocumentSymbol, IncomingCall, Location, Position, Range, SymbolDetails,
    SymbolEntry, SymbolId, SymbolKind, SymbolLocation, TypeHierarchyItem,
};
use impact::{MemoryResolver, Resolver};

pub const SHAPES: &str = "/ws/src/shapes.cpp";
pub const MAIN: &str = "/ws/src/main.cpp";

pub fn at(file: &str, line: u32, start: u32, end: u32) -> Location {
    Location::new(file, Range::on_line(line, start, end))
}

pub fn body(start: u32, end: u32) -> Range {
    Range::new(Position::new(start, 0), Position::new(end, 80))
}

/// shapes.cpp
/// ```text
///  0  namespace geo { struct Shape {
///  1    virtual double area();
///  2  };
///  5  struct Circle : Shape {
///  6  };
///  7  Circle unit;
///  8  void draw(Shape& s) {
///  9    s.area();
/// 10    s.area();
/// 11  } }
/// ```
///
/// main.cpp
/// ```text
///  0  void ping(int n) {
///  1    pong(n - 1);
///  2  }
///  4  void pong(int n) {
///  5    ping(n - 1);
///  6  }
///  8  int main() {
///  9    draw(geo::unit);
/// 10  }
/// 12  struct Base {};
/// 13  struct Left : Base {};
/// 14  struct Right : Base {};
/// 15  struct Bottom : Left, Right {};
/// ```
pub fn index() -> MemoryResolver {
    let mut index = MemoryResolver::new();

    let shape = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Shape", at(SHAPES, 0, 23, 28))
            .with_scopes("geo::", "")
            .with_full_range(body(0, 2)),
    );
    let area = index.declare(
        SymbolEntry::new(SymbolKind::Method, "area", at(SHAPES, 1, 17, 21))
            .with_scopes("geo::", "Shape::")
            .with_full_range(body(1, 1)),
    );
    let circle = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Circle", at(SHAPES, 5, 7, 13))
            .with_scopes("geo::", "")
            .with_full_range(body(5, 6)),
    );
    let unit = index.declare(
        SymbolEntry::new(SymbolKind::Variable, "unit", at(SHAPES, 7, 7, 11)).with_scopes("geo::", ""),
    );
    let draw = index.declare(
        SymbolEntry::new(SymbolKind::Function, "draw", at(SHAPES, 8, 5, 9))
            .with_scopes("geo::", "")
            .with_full_range(body(8, 11)),
    );
    index.inherit(circle, shape);
    index.set_type(unit, circle);
    index.call(draw, area, at(SHAPES, 9, 4, 8));
    index.call(draw, area, at(SHAPES, 10, 4, 8));

    let ping = index.declare(
        SymbolEntry::new(SymbolKind::Function, "ping", at(MAIN, 0, 5, 9)).with_full_range(body(0, 2)),
    );
    let pong = index.declare(
        SymbolEntry::new(SymbolKind::Function, "pong", at(MAIN, 4, 5, 9)).with_full_range(body(4, 6)),
    );
    let main = index.declare(
        SymbolEntry::new(SymbolKind::Function, "main", at(MAIN, 8, 4, 8)).with_full_range(body(8, 10)),
    );
    index.call(ping, pong, at(MAIN, 1, 4, 8));
    index.call(pong, ping, at(MAIN, 5, 4, 8));
    index.call(main, draw, at(MAIN, 9, 4, 8));

    let base = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Base", at(MAIN, 12, 7, 11)).with_full_range(body(12, 12)),
    );
    let left = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Left", at(MAIN, 13, 7, 11)).with_full_range(body(13, 13)),
    );
    let right = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Right", at(MAIN, 14, 7, 12)).with_full_range(body(14, 14)),
    );
    let bottom = index.declare(
        SymbolEntry::new(SymbolKind::Struct, "Bottom", at(MAIN, 15, 7, 13)).with_full_range(body(15, 15)),
    );
    index.inherit(left, base);
    index.inherit(right, base);
    index.inherit(bottom, left);
    index.inherit(bottom, right);

    index
}

/// Id of the first symbol declared as `name`.
pub fn id_of(index: &MemoryResolver, name: &str) -> SymbolId {
    (0..)
        .map_while(|id| index.symbol(id).map(|symbol| (id, symbol)))
        .find(|(_, symbol)| symbol.name == name)
        .map(|(id, _)| id)
        .unwrap()
}

/// [`index`] plus a `run` in each file.
/// ```text
/// shapes.cpp
///  9    s.area(); run();
/// 10    s.area(); run();
/// 13  void run() {}       // geo::run
///
/// main.cpp
///  9    draw(geo::unit); geo::run();
/// 17  void run() {}
/// ```
pub fn index_with_run() -> MemoryResolver {
    let mut index = index();
    let draw = id_of(&index, "draw");
    let main = id_of(&index, "main");

    let run = index.declare(
        SymbolEntry::new(SymbolKind::Function, "run", at(SHAPES, 13, 5, 8))
            .with_scopes("geo::", "")
            .with_full_range(body(13, 13)),
    );
    index.declare(
        SymbolEntry::new(SymbolKind::Function, "run", at(MAIN, 17, 5, 8)).with_full_range(body(17, 17)),
    );
    index.call(draw, run, at(SHAPES, 9, 14, 17));
    index.call(draw, run, at(SHAPES, 10, 14, 17));
    index.call(main, run, at(MAIN, 9, 27, 30));

    index
}

/// Failures to inject into [`FaultyResolver`].
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Every query about these files fails.
    pub files: Vec<PathBuf>,
    /// Every hierarchy query fails.
    pub hierarchies: bool,
}

/// A resolver that fails on demand and delegates everything else.
#[derive(Debug, Clone)]
pub struct FaultyResolver {
    pub inner: MemoryResolver,
    pub faults: Faults,
}

impl FaultyResolver {
    pub fn new(inner: MemoryResolver, faults: Faults) -> Self {
        Self { inner, faults }
    }

    fn check_file(&self, path: &Path) -> Result<()> {
        if self.faults.files.iter().any(|f| f == path) {
            return Err(ImpactError::Backend(format!("cannot parse {}", path.display())));
        }
        Ok(())
    }

    fn check_hierarchy(&self) -> Result<()> {
        if self.faults.hierarchies {
            return Err(ImpactError::Backend("hierarchy request timed out".to_string()));
        }
        Ok(())
    }
}

impl Resolver for FaultyResolver {
    fn update_document(&mut self, path: &Path, content: &str) -> Result<()> {
        self.inner.update_document(path, content)
    }

    fn outline(&self, path: &Path) -> Result<Vec<DocumentSymbol>> {
        self.check_file(path)?;
        self.inner.outline(path)
    }

    fn resolve_at(&self, path: &Path, pos: Position) -> Result<Option<SymbolDetails>> {
        self.check_file(path)?;
        self.inner.resolve_at(path, pos)
    }

    fn resolve_by_name(&self, name: &str, fuzzy: bool) -> Result<Vec<SymbolLocation>> {
        self.inner.resolve_by_name(name, fuzzy)
    }

    fn type_of(&self, path: &Path, pos: Position) -> Result<Vec<Location>> {
        self.check_file(path)?;
        self.inner.type_of(path, pos)
    }

    fn preferred_declaration(&self, path: &Path, pos: Position) -> Result<Option<Location>> {
        self.check_file(path)?;
        self.inner.preferred_declaration(path, pos)
    }

    fn references_to(&self, path: &Path, pos: Position) -> Result<Vec<Location>> {
        self.check_file(path)?;
        self.inner.references_to(path, pos)
    }

    fn prepare_call_hierarchy(&self, path: &Path, pos: Position) -> Result<Vec<CallHierarchyItem>> {
        self.check_file(path)?;
        self.check_hierarchy()?;
        self.inner.prepare_call_hierarchy(path, pos)
    }

    fn incoming_calls(&self, item: &CallHierarchyItem) -> Result<Vec<IncomingCall>> {
        self.check_hierarchy()?;
        self.inner.incoming_calls(item)
    }

    fn prepare_type_hierarchy(&self, path: &Path, pos: Position) -> Result<Vec<TypeHierarchyItem>> {
        self.check_file(path)?;
        self.check_hierarchy()?;
        self.inner.prepare_type_hierarchy(path, pos)
    }

    fn supertypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>> {
        self.check_hierarchy()?;
        self.inner.supertypes(item)
    }

    fn subtypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>> {
        self.check_hierarchy()?;
        self.inner.subtypes(item)
    }
}
