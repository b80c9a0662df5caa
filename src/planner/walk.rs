//! Constrained random walks.
//!
//! A walk grows one edge at a time from a start node. At every step the
//! neighbors of the current node are shuffled and then stably partitioned so
//! that edges absent from the [`EdgeLedger`] are tried before edges that were
//! already used. The first neighbor whose edge keeps the running total at or
//! below `max_distance` is taken. Growth stops as soon as the total reaches
//! `min_distance` or no neighbor fits.
//!
//! Used edges are penalised, never excluded: on a fully explored neighborhood
//! the walk simply retraces known roads.
//!
//! Each attempt is independent; the engine retries from scratch up to
//! `max_attempts` times and returns the first walk that reaches the band.
//! The ledger is only read here. Committing a walk is the caller's job.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::graph::RoadNetwork;
use crate::ledger::{EdgeKey, EdgeLedger};

/// Bounds for a single call to [`attempt_walk`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    /// Shortest acceptable walk, in metres.
    pub min_distance: f64,
    /// Longest acceptable walk, in metres.
    pub max_distance: f64,
    /// Independent attempts before giving up.
    pub max_attempts: usize,
    /// Edges appended per attempt at most.
    pub max_steps: usize,
}

/// An accepted walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    nodes: Vec<usize>,
    length: f64,
    edges: Vec<EdgeKey>,
}

impl Walk {
    /// Returns the visited nodes in order, start first.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the start node.
    pub fn start(&self) -> usize {
        self.nodes[0]
    }

    /// Returns the final node.
    pub fn end(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the summed edge length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the number of edges stepped over, counting repeats.
    pub fn steps(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns the distinct edges traversed, in first-traversal order.
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Consumes the walk, returning its nodes.
    pub fn into_nodes(self) -> Vec<usize> {
        self.nodes
    }
}

/// Why [`attempt_walk`] produced no walk.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WalkFailure {
    /// Every attempt stopped short of `min_distance`.
    #[error("no walk reached the minimum distance after {attempts} attempts (best {best_distance:.1} m)")]
    DistanceUnmet {
        /// Attempts made.
        attempts: usize,
        /// Longest total reached by any attempt.
        best_distance: f64,
    },
}

/// Orders `neighbors` so ledger-absent edges come first.
///
/// The sort is stable, so the relative order within each partition (for
/// example the order produced by a prior shuffle) is preserved.
pub fn prioritize_neighbors(current: usize, neighbors: &mut [(usize, f64)], ledger: &EdgeLedger) {
    neighbors.sort_by_key(|&(n, _)| ledger.contains(current, n));
}

/// Tries to build a walk from `start` whose length lies in
/// `[params.min_distance, params.max_distance]`.
///
/// # Panics
/// Panics if `start` is not a node of `graph`.
pub fn attempt_walk<G, R>(
    graph: &G,
    start: usize,
    ledger: &EdgeLedger,
    params: &WalkParams,
    rng: &mut R,
) -> Result<Walk, WalkFailure>
where
    G: RoadNetwork + ?Sized,
    R: Rng + ?Sized,
{
    assert!(graph.contains(start), "start node {start} not in graph");
    debug_assert!(params.min_distance <= params.max_distance);

    let mut best_distance = 0.0f64;

    for attempt in 0..params.max_attempts {
        let walk = grow(graph, start, ledger, params, rng);

        if walk.length >= params.min_distance {
            debug!(
                start,
                attempt,
                length = walk.length,
                steps = walk.steps(),
                "walk accepted"
            );
            return Ok(walk);
        }

        trace!(start, attempt, length = walk.length, "walk fell short");
        best_distance = best_distance.max(walk.length);
    }

    debug!(
        start,
        attempts = params.max_attempts,
        best_distance,
        "no walk reached the minimum distance"
    );
    Err(WalkFailure::DistanceUnmet {
        attempts: params.max_attempts,
        best_distance,
    })
}

/// One attempt: greedy growth until the minimum is met or no edge fits.
fn grow<G, R>(
    graph: &G,
    start: usize,
    ledger: &EdgeLedger,
    params: &WalkParams,
    rng: &mut R,
) -> Walk
where
    G: RoadNetwork + ?Sized,
    R: Rng + ?Sized,
{
    let mut nodes = vec![start];
    let mut current = start;
    let mut total = 0.0f64;
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for _ in 0..params.max_steps {
        let mut neighbors = graph.neighbors(current);
        if neighbors.is_empty() {
            break;
        }
        neighbors.shuffle(rng);
        prioritize_neighbors(current, &mut neighbors, ledger);

        let next = neighbors
            .iter()
            .copied()
            .find(|&(_, length)| total + length <= params.max_distance);

        let Some((neighbor, length)) = next else {
            break;
        };

        total += length;
        nodes.push(neighbor);
        let key = EdgeKey::new(current, neighbor);
        if seen.insert(key) {
            edges.push(key);
        }
        current = neighbor;

        if total >= params.min_distance {
            break;
        }
    }

    Walk {
        nodes,
        length: total,
        edges,
    }
}
