//
//  dot.rs
//  Impact
//

use petgraph::EdgeType;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use super::engine::{EdgeKind, RelationGraph, VertexId};
use crate::reference::Reference;
use crate::resolver::SymbolKind;

/// Writer producing no attributes, for vertices or edges.
pub fn empty_writer<I, T: ?Sized>(_id: I, _value: &T) -> String {
    String::new()
}

/// `style="solid"` and friends.
pub fn edge_kind_writer(_id: (VertexId, VertexId), kind: &EdgeKind) -> String {
    format!("style=\"{}\"", kind.as_str())
}

/// Render `graph` in DOT.
///
/// One statement per line: the header, one line per vertex in insertion
/// order, one line per edge in insertion order. Attribute strings come from
/// the writers. Ids are only meaningful within this output.
pub fn to_dot<V, E, Ty, VW, EW>(
    graph: &RelationGraph<V, E, Ty>,
    vertex_writer: VW,
    edge_writer: EW,
) -> String
where
    Ty: EdgeType,
    VW: Fn(VertexId, &V) -> String,
    EW: Fn((VertexId, VertexId), &E) -> String,
{
    let (header, connector) = if graph.is_directed() {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };

    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "{header} {{");
    for (id, vertex) in graph.vertices() {
        let _ = writeln!(out, "  {} [{}];", id.index(), vertex_writer(id, vertex));
    }
    for ((source, target), edge) in graph.edges() {
        let _ = writeln!(
            out,
            "  {} {} {} [{}];",
            source.index(),
            connector,
            target.index(),
            edge_writer((source, target), edge)
        );
    }
    out.push_str("}\n");
    out
}

/// [`to_dot`] straight into a writer.
pub fn write_dot<W, V, E, Ty, VW, EW>(
    out: &mut W,
    graph: &RelationGraph<V, E, Ty>,
    vertex_writer: VW,
    edge_writer: EW,
) -> io::Result<()>
where
    W: io::Write,
    Ty: EdgeType,
    VW: Fn(VertexId, &V) -> String,
    EW: Fn((VertexId, VertexId), &E) -> String,
{
    out.write_all(to_dot(graph, vertex_writer, edge_writer).as_bytes())
}

pub(crate) fn html_escaped(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 5);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Vertex writer drawing a reference as an HTML-like table:
/// kind, scopes and name, file path, name and full ranges.
#[derive(Debug, Clone, Default)]
pub struct ReferenceWriter {
    /// Paths are rendered relative to this directory when they lie under it.
    pub workspace_root: Option<PathBuf>,
}

impl ReferenceWriter {
    pub fn new(workspace_root: Option<PathBuf>) -> Self {
        Self { workspace_root }
    }

    fn display_path(&self, path: &Path) -> String {
        self.workspace_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .display()
            .to_string()
    }

    pub fn write(&self, _id: VertexId, reference: &Reference) -> String {
        let mut result = String::from(
            "label=<\n    <TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">\n",
        );

        let _ = write!(
            result,
            "      <TR>\n        <TD COLSPAN=\"6\">{}</TD>\n      </TR>\n",
            reference.kind
        );

        if reference.kind != SymbolKind::File {
            let _ = write!(
                result,
                "      <TR>\n        <TD COLSPAN=\"2\">{}</TD><TD COLSPAN=\"2\">{}</TD><TD COLSPAN=\"2\">{}</TD>\n      </TR>\n",
                html_escaped(&reference.namespace_scopes),
                html_escaped(&reference.local_scopes),
                html_escaped(&reference.name)
            );
        }

        let _ = write!(
            result,
            "      <TR>\n        <TD COLSPAN=\"6\">{}</TD>\n      </TR>\n",
            html_escaped(&self.display_path(&reference.uri))
        );

        if reference.kind != SymbolKind::File {
            let full = reference
                .full_range
                .map(|r| r.to_string())
                .unwrap_or_default();
            let _ = write!(
                result,
                "      <TR>\n        <TD COLSPAN=\"3\">{}</TD><TD COLSPAN=\"3\">{}</TD>\n      </TR>\n",
                reference.name_range, full
            );
        }

        result.push_str("    </TABLE>>,\n    shape=none");
        result
    }
}
