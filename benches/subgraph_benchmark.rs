use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wayfarer::graph::{distances_within, RoadGraphBuilder};
use wayfarer::{BoundedSubgraph, RoadGraph, RoadNetwork};

fn grid(side: u64) -> RoadGraph {
    let mut builder = RoadGraphBuilder::with_capacity((side * side) as usize);
    for id in 0..side * side {
        builder.add_node(id, None).unwrap();
    }
    for y in 0..side {
        for x in 0..side {
            let id = y * side + x;
            if x + 1 < side {
                builder.add_edge(id, id + 1, 100.0).unwrap();
            }
            if y + 1 < side {
                builder.add_edge(id, id + side, 100.0).unwrap();
            }
        }
    }
    builder.build()
}

fn bench_subgraph_extraction(c: &mut Criterion) {
    let side = 100;
    let graph = grid(side);
    let center = (side / 2 * side + side / 2) as usize;

    for radius in [500.0, 2_500.0, 10_000.0] {
        c.bench_function(&format!("distances_within_r{radius}"), |b| {
            b.iter(|| black_box(distances_within(&graph, center, black_box(radius))));
        });
    }

    c.bench_function("bounded_subgraph_edge_count_r2500", |b| {
        let sub = BoundedSubgraph::new(&graph, center, 2_500.0);
        b.iter(|| black_box(sub.edge_count()));
    });

    c.bench_function("bounded_subgraph_neighbors_r2500", |b| {
        let sub = BoundedSubgraph::new(&graph, center, 2_500.0);
        let nodes = sub.nodes();
        b.iter(|| {
            let mut total = 0usize;
            for &node in &nodes {
                total += sub.neighbors(node).len();
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, bench_subgraph_extraction);
criterion_main!(benches);
