//! Radius escalation.
//!
//! Walks are first searched for in a small neighborhood of the current node,
//! which keeps each attempt cheap and the route local. Only when a
//! neighborhood yields nothing is the radius widened.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::walk::{attempt_walk, Walk, WalkParams};
use crate::graph::{BoundedSubgraph, RoadNetwork};
use crate::ledger::EdgeLedger;

/// The sequence of search radii, in metres.
///
/// Radii are `initial, initial + step, …` for as long as the radius is below
/// `max + step`, so the last radius tried is at or just above `max`. A
/// schedule whose `initial` exceeds `max` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusSchedule {
    /// First radius tried.
    pub initial: f64,
    /// Upper bound of the schedule.
    pub max: f64,
    /// Increment between radii. Must be positive.
    pub step: f64,
}

impl RadiusSchedule {
    /// Creates a schedule.
    pub const fn new(initial: f64, max: f64, step: f64) -> Self {
        Self { initial, max, step }
    }

    /// Iterates the radii in increasing order.
    ///
    /// Yields nothing when `step` is not positive or `initial > max`.
    pub fn radii(&self) -> impl Iterator<Item = f64> {
        let Self { initial, max, step } = *self;
        let valid = step > 0.0 && step.is_finite() && initial <= max;
        let end = max + step;
        (0u32..)
            .map(move |i| initial + step * f64::from(i))
            .take_while(move |&r| valid && r < end)
    }
}

/// Outcome of [`find_route`].
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSearch {
    /// A walk was found in the neighborhood of the given radius.
    Found {
        /// The accepted walk.
        walk: Walk,
        /// Radius of the subgraph the walk was built in.
        radius: f64,
    },
    /// No radius in the schedule yielded a walk.
    NoRoute,
}

impl RouteSearch {
    /// Returns the walk, if one was found.
    pub fn into_walk(self) -> Option<Walk> {
        match self {
            Self::Found { walk, .. } => Some(walk),
            Self::NoRoute => None,
        }
    }
}

/// Searches ever larger neighborhoods of `current` for a walk.
///
/// Stops at the first radius whose subgraph yields a walk. Radii whose
/// subgraph leaves out `current` (negative ones) are skipped.
///
/// # Panics
/// Panics if `current` is not a node of `graph`.
pub fn find_route<G, R>(
    graph: &G,
    current: usize,
    ledger: &EdgeLedger,
    schedule: &RadiusSchedule,
    params: &WalkParams,
    rng: &mut R,
) -> RouteSearch
where
    G: RoadNetwork + ?Sized,
    R: Rng + ?Sized,
{
    assert!(graph.contains(current), "node {current} not in graph");

    for radius in schedule.radii() {
        let subgraph = BoundedSubgraph::new(graph, current, radius);
        if !subgraph.contains(current) {
            trace!(node = current, radius, "radius excludes the start node");
            continue;
        }
        debug!(
            node = current,
            radius,
            nodes = subgraph.len(),
            "searching neighborhood"
        );

        if let Ok(walk) = attempt_walk(&subgraph, current, ledger, params, rng) {
            info!(
                node = current,
                radius,
                length = walk.length(),
                "route found"
            );
            return RouteSearch::Found { walk, radius };
        }
    }

    debug!(node = current, "radius schedule exhausted");
    RouteSearch::NoRoute
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn schedule_overshoots_max_by_less_than_step() {
        let radii: Vec<f64> = RadiusSchedule::new(2500.0, 15_000.0, 1000.0).radii().collect();
        assert_eq!(radii.first(), Some(&2500.0));
        assert_eq!(radii.last(), Some(&15_500.0));
        assert_eq!(radii.len(), 14);
    }

    #[test]
    fn schedule_includes_exact_max() {
        let radii: Vec<f64> = RadiusSchedule::new(1000.0, 3000.0, 1000.0).radii().collect();
        assert_eq!(radii, vec![1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn schedule_with_initial_above_max_is_empty() {
        assert_eq!(RadiusSchedule::new(3500.0, 3000.0, 1000.0).radii().count(), 0);
        assert_eq!(RadiusSchedule::new(5000.0, 3000.0, 1000.0).radii().count(), 0);
    }

    #[test]
    fn schedule_rejects_non_positive_step() {
        assert_eq!(RadiusSchedule::new(0.0, 10.0, 0.0).radii().count(), 0);
        assert_eq!(RadiusSchedule::new(0.0, 10.0, -1.0).radii().count(), 0);
    }

    /// A straight road of `n` 100 m segments.
    fn road(n: u64) -> RoadGraph {
        let mut b = RoadGraph::builder();
        for id in 0..=n {
            b.add_node(id, None).unwrap();
        }
        for id in 0..n {
            b.add_edge(id, id + 1, 100.0).unwrap();
        }
        b.build()
    }

    fn params(min: f64, max: f64) -> WalkParams {
        WalkParams {
            min_distance: min,
            max_distance: max,
            max_attempts: 20,
            max_steps: 100,
        }
    }

    #[test]
    fn escalates_until_neighborhood_is_large_enough() {
        // Radius 0 keeps only the start node, so at least one widening is needed.
        let g = road(10);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let schedule = RadiusSchedule::new(0.0, 1000.0, 100.0);
        match find_route(&g, 0, &EdgeLedger::new(), &schedule, &params(500.0, 500.0), &mut rng) {
            RouteSearch::Found { walk, radius } => {
                assert_eq!(walk.length(), 500.0);
                assert!(radius >= 100.0, "radius 0 keeps only the start node");
                assert!(walk
                    .nodes()
                    .iter()
                    .all(|&n| n as f64 * 100.0 <= radius));
            }
            RouteSearch::NoRoute => panic!("expected a route"),
        }
    }

    #[test]
    fn returns_no_route_when_band_unreachable() {
        // 150 m cannot be assembled from 100 m segments within a 150 m cap.
        let g = road(5);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let schedule = RadiusSchedule::new(100.0, 500.0, 100.0);
        let result = find_route(&g, 0, &EdgeLedger::new(), &schedule, &params(150.0, 150.0), &mut rng);
        assert_eq!(result, RouteSearch::NoRoute);
        assert!(result.into_walk().is_none());
    }

    #[test]
    fn first_successful_radius_wins() {
        let g = road(10);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let schedule = RadiusSchedule::new(200.0, 1000.0, 100.0);
        let result = find_route(&g, 0, &EdgeLedger::new(), &schedule, &params(100.0, 100.0), &mut rng);
        assert!(matches!(result, RouteSearch::Found { radius, .. } if radius == 200.0));
    }

    #[test]
    fn negative_radii_are_skipped() {
        // 0 - 1 - 2, 100 m segments.
        let g = road(2);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let schedule = RadiusSchedule::new(-100.0, 500.0, 100.0);
        match find_route(&g, 0, &EdgeLedger::new(), &schedule, &params(100.0, 200.0), &mut rng) {
            RouteSearch::Found { walk, radius } => {
                assert_eq!(radius, 100.0);
                assert_eq!(walk.start(), 0);
                assert!(walk.length() >= 100.0 && walk.length() <= 200.0);
            }
            RouteSearch::NoRoute => panic!("expected a route"),
        }
    }
}
