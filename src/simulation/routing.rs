//! Network-wide shortest-path precomputation
//!
//! Builds, once at network-build time, a stepping-stone table sized
//! nodes×nodes: for every (source, target) pair it stores only the second
//! node from the source on the time-weighted shortest path. Paths are
//! reconstructed on demand by repeated lookup, trading O(V²) memory for
//! O(path length) reconstruction without storing explicit path lists.

use ordered_float::OrderedFloat;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::edge::Edge;
use super::types::NodeId;

/// All-pairs shortest-path table over the road network
///
/// Read-only after construction.
#[derive(Debug)]
pub struct RoutingTable {
    /// `next_hop[s][t]` is the second node on the shortest path s→t, or
    /// `None` when t is unreachable from s. `next_hop[s][s]` is `s`.
    next_hop: Vec<Vec<Option<NodeId>>>,
}

impl RoutingTable {
    /// Precomputes the table for a network of `node_count` nodes.
    ///
    /// Each edge is weighted by its crossing time at the speed limit, so
    /// shortest means fastest, not geometrically shortest.
    pub fn build(node_count: usize, edges: &[Edge]) -> Self {
        let mut graph: DiGraph<NodeId, f32> = DiGraph::new();
        let indices: Vec<NodeIndex> = (0..node_count)
            .map(|i| graph.add_node(NodeId(i)))
            .collect();
        for edge in edges {
            graph.add_edge(
                indices[edge.from.0],
                indices[edge.to.0],
                edge.crossing_time(),
            );
        }

        let next_hop = (0..node_count)
            .map(|source| single_source_hops(&graph, &indices, source))
            .collect();

        Self { next_hop }
    }

    /// Reconstructs the full node sequence from `from` to `to`, both ends
    /// included. Returns an empty path when no route exists; `path(s, s)`
    /// is `[s]`.
    pub fn path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        if from.0 >= self.next_hop.len() || to.0 >= self.next_hop.len() {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        let mut path = vec![from];
        let mut current = from;
        while current != to {
            match self.next_hop[current.0][to.0] {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => return Vec::new(),
            }
        }
        path
    }

    /// True when a route from `from` to `to` exists.
    pub fn reachable(&self, from: NodeId, to: NodeId) -> bool {
        from == to
            || self
                .next_hop
                .get(from.0)
                .and_then(|row| row.get(to.0))
                .is_some_and(Option::is_some)
    }
}

/// One Dijkstra run from `source`, recording for every reached node the
/// first hop taken out of the source instead of the full predecessor
/// chain. Suffixes of shortest paths are shortest paths, so repeated
/// lookups through these rows reconstruct any route.
fn single_source_hops(
    graph: &DiGraph<NodeId, f32>,
    indices: &[NodeIndex],
    source: usize,
) -> Vec<Option<NodeId>> {
    let node_count = indices.len();
    let mut dist = vec![f32::INFINITY; node_count];
    let mut first_hop: Vec<Option<NodeId>> = vec![None; node_count];
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    first_hop[source] = Some(NodeId(source));
    heap.push(Reverse((OrderedFloat(0.0f32), source)));

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for edge in graph.edges(indices[u]) {
            let v = graph[edge.target()].0;
            let candidate = d + *edge.weight();
            if candidate < dist[v] {
                dist[v] = candidate;
                first_hop[v] = if u == source {
                    Some(NodeId(v))
                } else {
                    first_hop[u]
                };
                heap.push(Reverse((OrderedFloat(candidate), v)));
            }
        }
    }

    first_hop[source] = Some(NodeId(source));
    first_hop
}
