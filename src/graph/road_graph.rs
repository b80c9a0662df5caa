//! An in-memory undirected road graph with dense node indices.
//!
//! Nodes are addressed by `usize` index for cache-friendly traversal. Each node
//! also remembers the identifier it had in its source data (for example an
//! OpenStreetMap node id) and, optionally, its geographic position so that
//! planned routes can be handed to a track writer.
//!
//! Adjacency is stored symmetrically: an edge `{a, b}` appears in both `a`'s
//! and `b`'s lists with the same length. Parallel edges are not modelled; the
//! first length recorded for a pair wins.
//!
//! ### Performance Characteristics
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `neighbors` | \(O(\deg)\) | copies the adjacency list |
//! | `edge_length` | \(O(\deg)\) | linear scan of the smaller list |
//! | `index_of` | \(O(1)\) expected | hash lookup by external id |
//! | `add_edge` (builder) | \(O(\deg)\) | checks for an existing edge first |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::traits::RoadNetwork;

/// Errors raised while assembling a [`RoadGraph`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// A node with this external id was already added.
    #[error("duplicate node id: {0}")]
    DuplicateNode(u64),

    /// An edge references an external id that was never added.
    #[error("unknown node id: {0}")]
    UnknownNode(u64),

    /// An edge length was negative.
    #[error("edge {from}-{to} has negative length {length}")]
    NegativeLength {
        /// External id of one endpoint.
        from: u64,
        /// External id of the other endpoint.
        to: u64,
        /// Offending length.
        length: f64,
    },

    /// An edge length was NaN or infinite.
    #[error("edge {from}-{to} has non-finite length")]
    NonFiniteLength {
        /// External id of one endpoint.
        from: u64,
        /// External id of the other endpoint.
        to: u64,
    },

    /// A node index was outside `0..node_count`.
    #[error("node index {index} out of bounds for {count} nodes")]
    NodeOutOfBounds {
        /// Offending index.
        index: usize,
        /// Number of nodes in the graph.
        count: usize,
    },
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude (the `y` axis).
    pub lat: f64,
    /// Longitude (the `x` axis).
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone)]
struct NodeRecord {
    external_id: u64,
    coordinate: Option<Coordinate>,
}

/// An immutable undirected road graph.
///
/// Build one with [`RoadGraphBuilder`] or load a snapshot with
/// [`snapshot::load`](super::snapshot::load).
#[derive(Debug, Clone)]
pub struct RoadGraph {
    nodes: Vec<NodeRecord>,
    adjacency: Vec<Vec<(usize, f64)>>,
    index: HashMap<u64, usize>,
    edge_count: usize,
}

impl RoadGraph {
    /// Returns a builder for a new graph.
    pub fn builder() -> RoadGraphBuilder {
        RoadGraphBuilder::new()
    }

    /// Returns the dense index assigned to an external id.
    pub fn index_of(&self, external_id: u64) -> Option<usize> {
        self.index.get(&external_id).copied()
    }

    /// Borrows the adjacency list of `node` without copying.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn neighbor_slice(&self, node: usize) -> &[(usize, f64)] {
        assert!(node < self.adjacency.len(), "node {node} out of bounds");
        &self.adjacency[node]
    }

    /// Iterates every undirected edge once as `(a, b, length)` with `a <= b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, nbrs)| {
            nbrs.iter()
                .filter(move |&&(b, _)| a <= b)
                .map(move |&(b, len)| (a, b, len))
        })
    }

    /// Returns the total length of all edges.
    pub fn total_length(&self) -> f64 {
        self.edges().map(|(_, _, len)| len).sum()
    }

    /// Checks that `node` is a valid index.
    pub fn check_node(&self, node: usize) -> Result<(), GraphError> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfBounds {
                index: node,
                count: self.nodes.len(),
            })
        }
    }
}

impl RoadNetwork for RoadGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, node: usize) -> bool {
        node < self.nodes.len()
    }

    fn nodes(&self) -> Vec<usize> {
        (0..self.nodes.len()).collect()
    }

    fn neighbors(&self, node: usize) -> Vec<(usize, f64)> {
        self.adjacency.get(node).cloned().unwrap_or_default()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn edge_length(&self, a: usize, b: usize) -> Option<f64> {
        let (Some(la), Some(lb)) = (self.adjacency.get(a), self.adjacency.get(b)) else {
            return None;
        };
        // Adjacency is symmetric, so scan whichever side is shorter.
        let (list, target) = if la.len() <= lb.len() { (la, b) } else { (lb, a) };
        list.iter()
            .find_map(|&(n, len)| (n == target).then_some(len))
    }

    fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }

    /// # Panics
    /// Panics if `node` is out of bounds.
    fn external_id(&self, node: usize) -> u64 {
        assert!(node < self.nodes.len(), "node {node} out of bounds");
        self.nodes[node].external_id
    }

    fn coordinate(&self, node: usize) -> Option<Coordinate> {
        self.nodes.get(node).and_then(|n| n.coordinate)
    }
}

/// Incremental, validating constructor for [`RoadGraph`].
#[derive(Debug, Default)]
pub struct RoadGraphBuilder {
    nodes: Vec<NodeRecord>,
    adjacency: Vec<Vec<(usize, f64)>>,
    index: HashMap<u64, usize>,
    edge_count: usize,
}

impl RoadGraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            adjacency: Vec::with_capacity(nodes),
            index: HashMap::with_capacity(nodes),
            edge_count: 0,
        }
    }

    /// Adds a node and returns its dense index.
    pub fn add_node(
        &mut self,
        external_id: u64,
        coordinate: Option<Coordinate>,
    ) -> Result<usize, GraphError> {
        if self.index.contains_key(&external_id) {
            return Err(GraphError::DuplicateNode(external_id));
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeRecord {
            external_id,
            coordinate,
        });
        self.adjacency.push(Vec::new());
        self.index.insert(external_id, idx);
        Ok(idx)
    }

    /// Adds the undirected edge `{from, to}` between two external ids.
    ///
    /// Returns `Ok(false)` if the pair was already connected; the existing
    /// length is kept.
    pub fn add_edge(&mut self, from: u64, to: u64, length: f64) -> Result<bool, GraphError> {
        if !length.is_finite() {
            return Err(GraphError::NonFiniteLength { from, to });
        }
        if length < 0.0 {
            return Err(GraphError::NegativeLength { from, to, length });
        }
        let a = *self.index.get(&from).ok_or(GraphError::UnknownNode(from))?;
        let b = *self.index.get(&to).ok_or(GraphError::UnknownNode(to))?;

        if self.adjacency[a].iter().any(|&(n, _)| n == b) {
            debug!(from, to, length, "ignoring parallel edge");
            return Ok(false);
        }

        self.adjacency[a].push((b, length));
        if a != b {
            self.adjacency[b].push((a, length));
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Returns the number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finishes construction.
    pub fn build(self) -> RoadGraph {
        RoadGraph {
            nodes: self.nodes,
            adjacency: self.adjacency,
            index: self.index,
            edge_count: self.edge_count,
        }
    }
}
