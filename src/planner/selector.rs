//! Recovery: finding a fresh place to explore from.
//!
//! When no route can be found around the current node, the explorer jumps to
//! a node whose incident edges are mostly untraveled. The search samples
//! nodes at random instead of scanning the whole graph, which bounds its cost
//! on large networks at the price of sometimes missing a candidate.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::graph::RoadNetwork;
use crate::ledger::EdgeLedger;

/// Default fraction of unused incident edges a node must exceed.
pub const DEFAULT_UNEXPLORED_THRESHOLD: f64 = 0.5;

/// Returns the fraction of `node`'s incident edges that are not in `ledger`.
///
/// A node with no incident edges has fraction `0.0`.
pub fn unexplored_fraction<G: RoadNetwork + ?Sized>(
    graph: &G,
    ledger: &EdgeLedger,
    node: usize,
) -> f64 {
    let neighbors = graph.neighbors(node);
    if neighbors.is_empty() {
        return 0.0;
    }
    let unused = neighbors
        .iter()
        .filter(|&&(n, _)| !ledger.contains(node, n))
        .count();
    unused as f64 / neighbors.len() as f64
}

/// Samples up to `tries` nodes and returns the first whose unexplored
/// fraction is strictly greater than `threshold`.
pub fn pick_unexplored_node<G, R>(
    graph: &G,
    ledger: &EdgeLedger,
    tries: usize,
    threshold: f64,
    rng: &mut R,
) -> Option<usize>
where
    G: RoadNetwork + ?Sized,
    R: Rng + ?Sized,
{
    if tries == 0 {
        return None;
    }
    let nodes = graph.nodes();

    for attempt in 0..tries {
        let &candidate = nodes.choose(rng)?;
        let fraction = unexplored_fraction(graph, ledger, candidate);
        trace!(candidate, fraction, attempt, "sampled relocation candidate");
        if fraction > threshold {
            debug!(candidate, fraction, attempt, "picked unexplored node");
            return Some(candidate);
        }
    }

    debug!(tries, threshold, "no unexplored node found");
    None
}
