//! Road network representations and traversals.
//!
//! - `traits`: the [`RoadNetwork`] access trait every planner is written against
//! - `road_graph`: the in-memory [`RoadGraph`] and its validating builder
//! - `bounded`: radius-bounded induced views ([`BoundedSubgraph`])
//! - `snapshot`: JSON load/save for graphs produced by external map tooling

pub mod bounded;
pub mod road_graph;
pub mod snapshot;
pub mod traits;

#[cfg(any(test, feature = "proptest"))]
pub mod arbitrary;

pub use bounded::{distances_within, BoundedSubgraph};
pub use road_graph::{Coordinate, GraphError, RoadGraph, RoadGraphBuilder};
pub use traits::{route_length, RoadNetwork};
