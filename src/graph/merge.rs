//
//  merge.rs
//  Impact
//

use petgraph::EdgeType;
use std::collections::HashMap;
use std::hash::Hash;

use super::engine::{RelationGraph, VertexId};

impl<V, E, Ty> RelationGraph<V, E, Ty>
where
    V: Clone + Eq + Hash,
    E: Clone,
    Ty: EdgeType,
{
    /// Merge `other` into this graph, collapsing equal vertices.
    ///
    /// A vertex of `other` equal to one already here is not re-inserted;
    /// its edges land on the existing vertex. New vertices get fresh ids.
    pub fn merge_by(&mut self, other: &Self) -> &mut Self {
        let mut ids: HashMap<V, VertexId> = HashMap::with_capacity(self.vertex_count());
        for (id, vertex) in self.vertices() {
            ids.entry(vertex.clone()).or_insert(id);
        }

        let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(other.vertex_count());
        for (old_id, vertex) in other.vertices() {
            let new_id = match ids.get(vertex) {
                Some(&id) => id,
                None => {
                    let id = self.add_vertex(vertex.clone());
                    ids.insert(vertex.clone(), id);
                    id
                }
            };
            remap.insert(old_id, new_id);
        }

        for ((source, target), edge) in other.edges() {
            if let (Some(&s), Some(&t)) = (remap.get(&source), remap.get(&target)) {
                self.add_edge(s, t, edge.clone());
            }
        }

        self
    }

    /// Project every vertex through `mapper`, collapsing equal results.
    ///
    /// Edges follow their endpoints. An edge whose endpoints collapse onto
    /// the same mapped vertex is dropped, so no self-loop is introduced.
    pub fn map<W, F>(&self, mut mapper: F) -> RelationGraph<W, E, Ty>
    where
        W: Clone + Eq + Hash,
        F: FnMut(&V) -> W,
    {
        let mut result = RelationGraph::new();
        let mut ids: HashMap<W, VertexId> = HashMap::new();
        let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(self.vertex_count());

        for (old_id, vertex) in self.vertices() {
            let mapped = mapper(vertex);
            let new_id = match ids.get(&mapped) {
                Some(&id) => id,
                None => {
                    let id = result.add_vertex(mapped.clone());
                    ids.insert(mapped, id);
                    id
                }
            };
            remap.insert(old_id, new_id);
        }

        for ((source, target), edge) in self.edges() {
            if let (Some(&s), Some(&t)) = (remap.get(&source), remap.get(&target)) {
                if s != t {
                    result.add_edge(s, t, edge.clone());
                }
            }
        }

        result
    }
}

impl<V, E, Ty> RelationGraph<V, E, Ty>
where
    V: Clone,
    E: Clone,
    Ty: EdgeType,
{
    /// Append `other` as-is: every vertex of `other` is inserted anew,
    /// whether or not an equal one already exists.
    pub fn merge_distinct_by(&mut self, other: &Self) -> &mut Self {
        let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(other.vertex_count());
        for (old_id, vertex) in other.vertices() {
            remap.insert(old_id, self.add_vertex(vertex.clone()));
        }

        for ((source, target), edge) in other.edges() {
            if let (Some(&s), Some(&t)) = (remap.get(&source), remap.get(&target)) {
                self.add_edge(s, t, edge.clone());
            }
        }

        self
    }
}

/// Fresh graph holding `lhs` and `rhs` with equal vertices collapsed.
pub fn merge<V, E, Ty>(
    lhs: &RelationGraph<V, E, Ty>,
    rhs: &RelationGraph<V, E, Ty>,
) -> RelationGraph<V, E, Ty>
where
    V: Clone + Eq + Hash,
    E: Clone,
    Ty: EdgeType,
{
    let mut result = RelationGraph::new();
    result.merge_by(lhs).merge_by(rhs);
    result
}

/// Fresh graph holding `lhs` and `rhs` side by side.
pub fn merge_distinct<V, E, Ty>(
    lhs: &RelationGraph<V, E, Ty>,
    rhs: &RelationGraph<V, E, Ty>,
) -> RelationGraph<V, E, Ty>
where
    V: Clone,
    E: Clone,
    Ty: EdgeType,
{
    let mut result = RelationGraph::new();
    result.merge_distinct_by(lhs).merge_distinct_by(rhs);
    result
}
