//! Read-only access to an undirected, length-weighted road network.
//!
//! Every planner in this crate is written against [`RoadNetwork`] instead of a
//! concrete representation, so the same walk engine runs over the full
//! [`RoadGraph`](super::RoadGraph) and over a radius-bounded
//! [`BoundedSubgraph`](super::BoundedSubgraph) view of it.
//!
//! # Edge format
//! Neighbors are yielded as `(node, length)` pairs, where `length` is the
//! non-negative weight of the connecting edge in metres. Edges are undirected:
//! if `b` is a neighbor of `a` with length `w`, then `a` is a neighbor of `b`
//! with the same `w`.

use super::road_graph::Coordinate;

/// Unified read access for road network representations.
pub trait RoadNetwork {
    /// Returns the number of node slots addressable by this network.
    ///
    /// Node indices are `0..node_count()`. Views may leave some of these
    /// indices out; use [`contains`](Self::contains) to test membership.
    fn node_count(&self) -> usize;

    /// Returns `true` if `node` belongs to this network.
    fn contains(&self, node: usize) -> bool;

    /// Returns the member nodes in ascending index order.
    fn nodes(&self) -> Vec<usize>;

    /// Returns the neighbors of `node` with their edge lengths.
    ///
    /// Non-member nodes have no neighbors.
    fn neighbors(&self, node: usize) -> Vec<(usize, f64)>;

    /// Returns the number of distinct undirected edges.
    fn edge_count(&self) -> usize;

    /// Returns the length of the edge `{a, b}`, independent of orientation.
    fn edge_length(&self, a: usize, b: usize) -> Option<f64> {
        self.neighbors(a)
            .into_iter()
            .find_map(|(n, len)| (n == b).then_some(len))
    }

    /// Returns `true` if `{a, b}` is an edge.
    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_length(a, b).is_some()
    }

    /// Returns the number of edges incident to `node`.
    fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Returns the identifier `node` had in the source data.
    ///
    /// Defaults to the index itself.
    fn external_id(&self, node: usize) -> u64 {
        node as u64
    }

    /// Returns the geographic position of `node`, if known.
    fn coordinate(&self, _node: usize) -> Option<Coordinate> {
        None
    }
}

/// Sums the edge lengths along `nodes`.
///
/// Returns `None` if a consecutive pair is not an edge of `graph`. A walk of
/// zero or one node has length `0.0`.
pub fn route_length<G: RoadNetwork + ?Sized>(graph: &G, nodes: &[usize]) -> Option<f64> {
    nodes
        .windows(2)
        .map(|pair| graph.edge_length(pair[0], pair[1]))
        .sum()
}
