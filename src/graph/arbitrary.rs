//! `proptest` strategies for road graphs.

use proptest::prelude::*;

use super::road_graph::{Coordinate, RoadGraph};

/// Generates graphs with `1..=max_nodes` nodes and up to `max_edges` edges of
/// length `1.0..max_length`.
///
/// Node `i` has external id `i` and a coordinate on a small grid, so generated
/// graphs can be fed straight into the exploration loop.
pub fn road_graph(
    max_nodes: usize,
    max_edges: usize,
    max_length: f64,
) -> impl Strategy<Value = RoadGraph> {
    (1..=max_nodes.max(1)).prop_flat_map(move |n| {
        let edge = (0..n, 0..n, 1.0..max_length.max(1.0 + f64::EPSILON));
        proptest::collection::vec(edge, 0..=max_edges).prop_map(move |edges| {
            let mut builder = RoadGraph::builder();
            for i in 0..n {
                let coord = Coordinate::new((i / 16) as f64 * 1e-3, (i % 16) as f64 * 1e-3);
                builder
                    .add_node(i as u64, Some(coord))
                    .expect("unique ids");
            }
            // Parallel edges come back as `Ok(false)` and are dropped.
            for (a, b, len) in edges {
                let _ = builder.add_edge(a as u64, b as u64, len);
            }
            builder.build()
        })
    })
}
