//! Radius-bounded induced subgraphs.
//!
//! A [`BoundedSubgraph`] keeps every node whose network distance from a center
//! node is at most `radius`, together with every edge of the parent graph whose
//! two endpoints are both kept. It is a view: node indices are shared with the
//! parent, so a walk planned inside the subgraph is directly a walk in the
//! parent graph.
//!
//! Distances are computed with Dijkstra's algorithm and a cutoff, so the cost
//! of extraction is proportional to the size of the neighborhood rather than
//! the whole graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::road_graph::Coordinate;
use super::traits::RoadNetwork;

/// Min-heap entry for Dijkstra's algorithm.
#[derive(Clone, Copy)]
struct DistanceEntry {
    node: usize,
    distance: f64,
}

impl Eq for DistanceEntry {}

impl PartialEq for DistanceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for DistanceEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the smallest distance pops first.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for DistanceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes network distances from `source` to every node within `cutoff`.
///
/// The source itself is included at distance `0.0` when it belongs to `graph`;
/// otherwise the result is empty.
pub fn distances_within<G: RoadNetwork + ?Sized>(
    graph: &G,
    source: usize,
    cutoff: f64,
) -> HashMap<usize, f64> {
    let mut settled: HashMap<usize, f64> = HashMap::new();
    if !graph.contains(source) || cutoff < 0.0 {
        return settled;
    }

    let mut best: HashMap<usize, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();
    best.insert(source, 0.0);
    heap.push(DistanceEntry {
        node: source,
        distance: 0.0,
    });

    while let Some(DistanceEntry { node, distance }) = heap.pop() {
        if settled.contains_key(&node) {
            continue;
        }
        settled.insert(node, distance);

        for (neighbor, length) in graph.neighbors(node) {
            if settled.contains_key(&neighbor) {
                continue;
            }
            let candidate = distance + length;
            if candidate > cutoff {
                continue;
            }
            let is_shorter = best.get(&neighbor).map_or(true, |&d| candidate < d);
            if is_shorter {
                best.insert(neighbor, candidate);
                heap.push(DistanceEntry {
                    node: neighbor,
                    distance: candidate,
                });
            }
        }
    }

    settled
}

/// The induced subgraph of nodes within a network distance of a center.
pub struct BoundedSubgraph<'g, G: ?Sized> {
    parent: &'g G,
    center: usize,
    radius: f64,
    distances: HashMap<usize, f64>,
}

impl<'g, G: RoadNetwork + ?Sized> BoundedSubgraph<'g, G> {
    /// Extracts the subgraph of `parent` within `radius` of `center`.
    ///
    /// If `center` is not a node of `parent`, the subgraph is empty.
    pub fn new(parent: &'g G, center: usize, radius: f64) -> Self {
        let distances = distances_within(parent, center, radius);
        Self {
            parent,
            center,
            radius,
            distances,
        }
    }

    /// Returns the center node.
    pub fn center(&self) -> usize {
        self.center
    }

    /// Returns the distance cutoff.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the network distance from the center to `node`, if kept.
    pub fn distance_to(&self, node: usize) -> Option<f64> {
        self.distances.get(&node).copied()
    }

    /// Returns the number of kept nodes.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` if no node was kept.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Returns the parent graph.
    pub fn parent(&self) -> &'g G {
        self.parent
    }
}

impl<G: RoadNetwork + ?Sized> RoadNetwork for BoundedSubgraph<'_, G> {
    fn node_count(&self) -> usize {
        self.parent.node_count()
    }

    fn contains(&self, node: usize) -> bool {
        self.distances.contains_key(&node)
    }

    fn nodes(&self) -> Vec<usize> {
        let mut nodes: Vec<usize> = self.distances.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    fn neighbors(&self, node: usize) -> Vec<(usize, f64)> {
        if !self.contains(node) {
            return Vec::new();
        }
        let mut nbrs = self.parent.neighbors(node);
        nbrs.retain(|&(n, _)| self.contains(n));
        nbrs
    }

    fn edge_count(&self) -> usize {
        // Each undirected edge is seen from both endpoints except self-loops.
        let mut twice = 0usize;
        for &node in self.distances.keys() {
            for (n, _) in self.neighbors(node) {
                twice += if n == node { 2 } else { 1 };
            }
        }
        twice / 2
    }

    fn edge_length(&self, a: usize, b: usize) -> Option<f64> {
        if self.contains(a) && self.contains(b) {
            self.parent.edge_length(a, b)
        } else {
            None
        }
    }

    fn external_id(&self, node: usize) -> u64 {
        self.parent.external_id(node)
    }

    fn coordinate(&self, node: usize) -> Option<Coordinate> {
        self.parent.coordinate(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    /// 0 -100- 1 -200- 2 -300- 3, plus a 50 m spur 1 - 4.
    fn line() -> RoadGraph {
        let mut b = RoadGraph::builder();
        for id in 0..5 {
            b.add_node(id, None).unwrap();
        }
        b.add_edge(0, 1, 100.0).unwrap();
        b.add_edge(1, 2, 200.0).unwrap();
        b.add_edge(2, 3, 300.0).unwrap();
        b.add_edge(1, 4, 50.0).unwrap();
        b.build()
    }

    #[test]
    fn bounded_subgraph_respects_cutoff() {
        let g = line();
        let sub = BoundedSubgraph::new(&g, 0, 300.0);
        assert_eq!(sub.nodes(), vec![0, 1, 2, 4]);
        assert_eq!(sub.distance_to(2), Some(300.0));
        assert_eq!(sub.distance_to(3), None);
        assert_eq!(sub.edge_count(), 3);
        // Induced: the 2-3 edge is gone because 3 is outside.
        assert_eq!(sub.neighbors(2), vec![(1, 200.0)]);
        assert!(!sub.has_edge(2, 3));
    }

    #[test]
    fn bounded_subgraph_zero_radius_keeps_only_center() {
        let g = line();
        let sub = BoundedSubgraph::new(&g, 1, 0.0);
        assert_eq!(sub.nodes(), vec![1]);
        assert!(sub.neighbors(1).is_empty());
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn bounded_subgraph_unknown_center_is_empty() {
        let g = line();
        let sub = BoundedSubgraph::new(&g, 42, 1_000.0);
        assert!(sub.is_empty());
        assert!(sub.neighbors(42).is_empty());
    }

    #[test]
    fn bounded_subgraph_uses_shortest_distance() {
        // Triangle where the direct edge is longer than the detour.
        let mut b = RoadGraph::builder();
        for id in 0..3 {
            b.add_node(id, None).unwrap();
        }
        b.add_edge(0, 2, 500.0).unwrap();
        b.add_edge(0, 1, 100.0).unwrap();
        b.add_edge(1, 2, 100.0).unwrap();
        let g = b.build();

        let d = distances_within(&g, 0, f64::INFINITY);
        assert_eq!(d.get(&2), Some(&200.0));

        let sub = BoundedSubgraph::new(&g, 0, 200.0);
        assert_eq!(sub.len(), 3);
        // All three nodes are inside, so the long edge is kept too.
        assert_eq!(sub.edge_length(2, 0), Some(500.0));
    }
}
