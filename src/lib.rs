//! # `wayfarer` - Coverage-Driven Route Exploration
//!
//! Plans a sequence of exploratory routes over a road network so that, route
//! after route, as much of the network as possible gets traveled, while every
//! single route stays within a target distance band.
//!
//! ## Architecture
//!
//! Components, leaves first:
//!
//! 1. **Road networks** ([`RoadNetwork`], [`RoadGraph`], [`BoundedSubgraph`]):
//!    - Undirected graphs with non-negative edge lengths in metres
//!    - Radius-bounded induced views sharing node indices with their parent
//!    - JSON snapshots for graphs prepared by external map tooling
//!
//! 2. **Edge ledger** ([`EdgeLedger`]):
//!    - Unordered edge identity (`{a, b} == {b, a}`)
//!    - Grows monotonically over one run, never persisted across runs
//!
//! 3. **Planners** ([`planner`]):
//!    - Constrained random walks that prefer untraveled edges
//!    - Radius escalation around the current node
//!    - Random sampling for a mostly-unexplored restart node
//!
//! 4. **Exploration loop** ([`Explorer`]):
//!    - Explicit `Searching → Advancing → Searching` / `Relocating` / `Done`
//!      state machine
//!    - Emits each accepted route to a [`RouteSink`]
//!
//! ### Invariants
//!
//! **Band**: every accepted walk has length in `[min_distance, max_distance]`.
//!
//! **Containment**: every consecutive pair of an accepted walk is an edge of the
//! subgraph it was planned in.
//!
//! **Monotone ledger**: the ledger only gains edges, and only edges of
//! accepted walks.
//!
//! ## Example
//!
//! ```rust
//! use wayfarer::{Explorer, ExplorerConfig, RoadGraph, VecSink};
//!
//! let mut builder = RoadGraph::builder();
//! for id in 0..4 {
//!     builder.add_node(id, None).unwrap();
//! }
//! for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     builder.add_edge(a, b, 1000.0).unwrap();
//! }
//! let graph = builder.build();
//!
//! let config = ExplorerConfig::new()
//!     .with_distance_band(1900.0, 2100.0)
//!     .with_radii(1000.0, 4000.0, 1000.0)
//!     .with_seed(7);
//!
//! let mut explorer = Explorer::new(&graph, config).unwrap();
//! let mut sink = VecSink::new();
//! let summary = explorer.run_routes(&mut sink, 3).unwrap();
//!
//! assert_eq!(summary.routes, 3);
//! for route in sink.routes() {
//!     assert_eq!(route.length_m, 2000.0);
//! }
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod explore;
pub mod graph;
pub mod ledger;
pub mod planner;

pub use explore::{
    ExplorationEvent, ExplorationState, ExplorationSummary, Explorer, ExplorerConfig, JsonLinesSink,
    PlannedRoute, RouteSink, VecSink,
};
pub use graph::{BoundedSubgraph, Coordinate, GraphError, RoadGraph, RoadNetwork};
pub use ledger::{CoverageStats, EdgeKey, EdgeLedger};
pub use planner::{RadiusSchedule, RouteSearch, Walk, WalkFailure, WalkParams};

// Compile-time checks on the hot-path value types.
const _: () = {
    use core::mem;

    // Edge identity is two indices and nothing else.
    assert!(mem::size_of::<EdgeKey>() == 2 * mem::size_of::<usize>());

    // Adjacency entries stay a (node, length) pair with no padding growth.
    assert!(mem::size_of::<(usize, f64)>() <= 2 * mem::size_of::<u64>());
};
