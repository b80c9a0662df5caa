use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wayfarer::planner::{attempt_walk, pick_unexplored_node, WalkFailure, WalkParams};
use wayfarer::{
    Coordinate, EdgeLedger, ExplorationEvent, ExplorationState, Explorer, ExplorerConfig,
    RoadGraph, RoadNetwork, VecSink,
};

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;

/// A - B - C - D - A, every edge 1000 m.
fn cycle() -> RoadGraph {
    let mut builder = RoadGraph::builder();
    for id in 0..4 {
        builder.add_node(id, None).unwrap();
    }
    for (a, b) in [(A, B), (B, C), (C, D), (D, A)] {
        builder.add_edge(a as u64, b as u64, 1000.0).unwrap();
    }
    builder.build()
}

/// A `w` x `h` street grid with 100 m blocks and coordinates.
fn grid(w: u64, h: u64) -> RoadGraph {
    let mut builder = RoadGraph::builder();
    for y in 0..h {
        for x in 0..w {
            let coord = Coordinate::new(37.3 + y as f64 * 1e-3, -121.9 + x as f64 * 1e-3);
            builder.add_node(y * w + x, Some(coord)).unwrap();
        }
    }
    for y in 0..h {
        for x in 0..w {
            let id = y * w + x;
            if x + 1 < w {
                builder.add_edge(id, id + 1, 100.0).unwrap();
            }
            if y + 1 < h {
                builder.add_edge(id, id + w, 100.0).unwrap();
            }
        }
    }
    builder.build()
}

#[test]
fn test_one_step_walk_on_cycle_is_accepted() {
    let g = cycle();
    let params = WalkParams {
        min_distance: 0.0,
        max_distance: 10_000.0,
        max_attempts: 1,
        max_steps: 1,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let walk = attempt_walk(&g, A, &EdgeLedger::new(), &params, &mut rng).unwrap();
    assert_eq!(walk.nodes().len(), 2);
    assert_eq!(walk.length(), 1000.0);
}

#[test]
fn test_unreachable_minimum_on_cycle_fails() {
    let g = cycle();
    let params = WalkParams {
        min_distance: 5000.0,
        max_distance: 10_000.0,
        max_attempts: 5,
        max_steps: 1,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let result = attempt_walk(&g, A, &EdgeLedger::new(), &params, &mut rng);
    assert!(matches!(result, Err(WalkFailure::DistanceUnmet { attempts: 5, .. })));
}

#[test]
fn test_ledger_edge_is_tried_last() {
    let g = cycle();
    let mut ledger = EdgeLedger::new();
    ledger.insert(A, B);
    let params = WalkParams {
        min_distance: 0.0,
        max_distance: 10_000.0,
        max_attempts: 1,
        max_steps: 1,
    };
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let walk = attempt_walk(&g, A, &ledger, &params, &mut rng).unwrap();
        assert_eq!(walk.nodes(), &[A, D]);
    }
}

#[test]
fn test_selector_on_single_isolated_node_gives_up() {
    let mut builder = RoadGraph::builder();
    builder.add_node(1, None).unwrap();
    let g = builder.build();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(pick_unexplored_node(&g, &EdgeLedger::new(), 25, 0.5, &mut rng), None);
}

#[test]
fn test_explorer_routes_chain_and_stay_in_band() {
    let g = grid(6, 6);
    let config = ExplorerConfig::new()
        .with_distance_band(800.0, 1200.0)
        .with_radii(300.0, 1500.0, 300.0)
        .with_walk_limits(50, 200)
        .with_selector(50, 0.5)
        .with_seed(2024);

    let mut explorer = Explorer::new(&g, config).unwrap();
    let mut sink = VecSink::new();
    let mut ledger_sizes = vec![0];
    let mut previous_end = explorer.current();

    while explorer.route_count() < 12 {
        let event = explorer.step(&mut sink).unwrap();
        if let ExplorationEvent::RouteCommitted { end, .. } = event {
            ledger_sizes.push(explorer.ledger().len());
            let route = sink.routes().last().unwrap();
            assert_eq!(Some(route.nodes[0]), previous_end);
            assert_eq!(explorer.current(), Some(end));
            previous_end = Some(end);
        }
        assert_ne!(explorer.state(), ExplorationState::Done);
    }

    assert!(ledger_sizes.windows(2).all(|w| w[0] <= w[1]));

    for (i, route) in sink.routes().iter().enumerate() {
        assert_eq!(route.index, i + 1);
        assert!(route.length_m >= 800.0 && route.length_m <= 1200.0);
        assert_eq!(route.coordinates.len(), route.nodes.len());
        assert_eq!(route.external_ids.len(), route.nodes.len());
        assert!(route.coordinates.iter().all(Option::is_some));
        let summed = wayfarer::graph::route_length(&g, &route.nodes).unwrap();
        assert!((summed - route.length_m).abs() < 1e-6);
    }

    let new_edges: usize = sink.routes().iter().map(|r| r.new_edges).sum();
    assert_eq!(new_edges, explorer.ledger().len());

    let summary = explorer.summary();
    assert_eq!(summary.routes, 12);
    assert_eq!(summary.coverage.used_edges, explorer.ledger().len());
    assert_eq!(summary.coverage.total_edges, g.edge_count());
}

#[test]
fn test_explorer_relocates_off_an_isolated_start() {
    // Node 0 stands alone; nodes 1..=36 form a grid.
    let mut builder = RoadGraph::builder();
    builder.add_node(1_000, None).unwrap();
    let g_grid = grid(6, 6);
    for n in g_grid.nodes() {
        builder.add_node(g_grid.external_id(n), g_grid.coordinate(n)).unwrap();
    }
    for (a, b, len) in g_grid.edges() {
        builder
            .add_edge(g_grid.external_id(a), g_grid.external_id(b), len)
            .unwrap();
    }
    let g = builder.build();

    let config = ExplorerConfig::new()
        .with_distance_band(400.0, 600.0)
        .with_radii(200.0, 600.0, 200.0)
        .with_walk_limits(20, 50)
        .with_selector(500, 0.5)
        .with_seed(5);
    let mut explorer = Explorer::new(&g, config).unwrap().start_at(0).unwrap();
    let mut sink = VecSink::new();

    assert_eq!(explorer.step(&mut sink).unwrap(), ExplorationEvent::Stuck { node: 0 });
    match explorer.step(&mut sink).unwrap() {
        ExplorationEvent::Relocated { from, to } => {
            assert_eq!(from, 0);
            assert_ne!(to, 0);
        }
        other => panic!("expected relocation, got {other:?}"),
    }
    assert!(matches!(
        explorer.step(&mut sink).unwrap(),
        ExplorationEvent::RouteFound { .. }
    ));
    assert!(matches!(
        explorer.step(&mut sink).unwrap(),
        ExplorationEvent::RouteCommitted { index: 1, .. }
    ));
    assert_eq!(explorer.summary().relocations, 1);
}
