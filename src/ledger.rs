//! The edge usage ledger.
//!
//! Records which undirected edges have already been traversed by an accepted
//! route during one exploration run. The ledger only grows: there is no way to
//! remove an edge once it has been committed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::RoadNetwork;

/// Identity of an undirected edge.
///
/// The endpoints are stored in ascending order, so `EdgeKey::new(a, b)` and
/// `EdgeKey::new(b, a)` are equal and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: usize,
    hi: usize,
}

impl EdgeKey {
    /// Creates the key for the edge `{a, b}`.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Returns the endpoints, smaller index first.
    #[inline]
    pub fn endpoints(self) -> (usize, usize) {
        (self.lo, self.hi)
    }

    /// Returns `true` if `node` is one of the endpoints.
    #[inline]
    pub fn touches(self, node: usize) -> bool {
        self.lo == node || self.hi == node
    }
}

impl From<(usize, usize)> for EdgeKey {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

/// How much of a network the ledger covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Ledger edges that exist in the network.
    pub used_edges: usize,
    /// Edges in the network.
    pub total_edges: usize,
    /// `used_edges / total_edges`, or `0.0` for an edgeless network.
    pub fraction: f64,
}

/// A monotonically growing set of traversed edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeLedger {
    used: HashSet<EdgeKey>,
}

impl EdgeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `{a, b}` has been traversed.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.used.contains(&EdgeKey::new(a, b))
    }

    /// Returns `true` if `key` has been traversed.
    #[inline]
    pub fn contains_key(&self, key: EdgeKey) -> bool {
        self.used.contains(&key)
    }

    /// Records `{a, b}`. Returns `true` if it was not already present.
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        self.used.insert(EdgeKey::new(a, b))
    }

    /// Records every edge in `edges` and returns how many were new.
    pub fn commit<I>(&mut self, edges: I) -> usize
    where
        I: IntoIterator<Item = EdgeKey>,
    {
        edges
            .into_iter()
            .filter(|&key| self.used.insert(key))
            .count()
    }

    /// Returns the number of traversed edges.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns `true` if nothing has been traversed yet.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Iterates the traversed edges in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.used.iter().copied()
    }

    /// Counts the edges incident to `node` in `graph` that are not yet used.
    pub fn unused_degree<G: RoadNetwork + ?Sized>(&self, graph: &G, node: usize) -> usize {
        graph
            .neighbors(node)
            .into_iter()
            .filter(|&(n, _)| !self.contains(node, n))
            .count()
    }

    /// Measures the ledger against `graph`.
    pub fn coverage<G: RoadNetwork + ?Sized>(&self, graph: &G) -> CoverageStats {
        let total_edges = graph.edge_count();
        let used_edges = self
            .used
            .iter()
            .filter(|key| {
                let (a, b) = key.endpoints();
                graph.has_edge(a, b)
            })
            .count();
        let fraction = if total_edges == 0 {
            0.0
        } else {
            used_edges as f64 / total_edges as f64
        };
        CoverageStats {
            used_edges,
            total_edges,
            fraction,
        }
    }
}

impl Extend<EdgeKey> for EdgeLedger {
    fn extend<I: IntoIterator<Item = EdgeKey>>(&mut self, iter: I) {
        self.commit(iter);
    }
}
