//
//  builder.rs
//  Impact
//

use std::collections::VecDeque;

use super::engine::{EdgeKind, ReferenceGraph, VertexId};
use crate::reference::ReferenceTree;

/// Build a relation graph from a reference tree.
///
/// Breadth-first from the root. Every tree node becomes its own vertex,
/// equal references included, and every parent/child pair one edge of
/// `edge_kind`. With `reverse_edge` the edge points child → parent, so a
/// container path reads "X is contained by ..." instead of "... contains X".
pub fn to_graph(tree: &ReferenceTree, edge_kind: EdgeKind, reverse_edge: bool) -> ReferenceGraph {
    let mut graph = ReferenceGraph::new();

    let mut queue: VecDeque<(&ReferenceTree, VertexId)> = VecDeque::new();
    let root = graph.add_vertex(tree.reference.clone());
    queue.push_back((tree, root));

    while let Some((node, id)) = queue.pop_front() {
        for child in &node.children {
            let child_id = graph.add_vertex(child.reference.clone());
            if reverse_edge {
                graph.add_edge(child_id, id, edge_kind);
            } else {
                graph.add_edge(id, child_id, edge_kind);
            }
            queue.push_back((child, child_id));
        }
    }

    graph
}
