//
//  engine.rs
//  Impact
//

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, EdgeType, Undirected};
use serde::{Deserialize, Serialize};

use crate::reference::Reference;

/// Vertex id, assigned at insertion and stable only within one graph.
pub type VertexId = NodeIndex;

/// Rendering hint distinguishing relation kinds in one combined graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Solid,
    Dashed,
    Dotted,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Solid => "solid",
            EdgeKind::Dashed => "dashed",
            EdgeKind::Dotted => "dotted",
        }
    }
}

/// A graph of values connected by at most one edge per vertex pair.
///
/// Adding an edge between an already connected pair replaces the edge's
/// value instead of creating a parallel edge.
#[derive(Debug, Clone)]
pub struct RelationGraph<V, E, Ty: EdgeType = Directed> {
    pub(crate) graph: Graph<V, E, Ty>,
}

/// Directed graph of references, the shape every impact query produces.
pub type ReferenceGraph = RelationGraph<Reference, EdgeKind>;

pub type UndirectedGraph<V, E> = RelationGraph<V, E, Undirected>;

impl<V, E, Ty: EdgeType> RelationGraph<V, E, Ty> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: Graph::default(),
        }
    }

    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    // ─── Vertex Operations ──────────────────────────────────────

    /// Add a vertex. No deduplication happens here.
    pub fn add_vertex(&mut self, value: V) -> VertexId {
        self.graph.add_node(value)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.graph.node_weight(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// First vertex equal to `value`.
    pub fn find_vertex(&self, value: &V) -> Option<VertexId>
    where
        V: PartialEq,
    {
        self.vertices().find(|(_, v)| *v == value).map(|(id, _)| id)
    }

    // ─── Edge Operations ────────────────────────────────────────

    /// Add an edge, or overwrite the value of the existing one.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, value: E) {
        self.graph.update_edge(source, target, value);
    }

    pub fn edge(&self, source: VertexId, target: VertexId) -> Option<&E> {
        self.graph
            .find_edge(source, target)
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    pub fn has_edge(&self, source: VertexId, target: VertexId) -> bool {
        self.graph.find_edge(source, target).is_some()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges in insertion order as `((source, target), value)`.
    pub fn edges(&self) -> impl Iterator<Item = ((VertexId, VertexId), &E)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| ((edge.source(), edge.target()), edge.weight()))
    }

    /// Edges resolved to vertex values, handy for comparing graphs whose
    /// ids differ.
    pub fn edge_values(&self) -> impl Iterator<Item = (&V, &V, &E)> + '_ {
        self.edges()
            .map(move |((s, t), e)| (&self.graph[s], &self.graph[t], e))
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

impl<V, E, Ty: EdgeType> Default for RelationGraph<V, E, Ty> {
    fn default() -> Self {
        Self::new()
    }
}
