//! Shortest-path routing and trip demand tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use traffic_flow::simulation::demand::{rush_multiplier, TripDemand, RUSH_MULTIPLIER};
use traffic_flow::simulation::types::SPEED_BIAS_CLAMP;
use traffic_flow::simulation::{
    parse_network, Edge, EdgeId, Node, NodeId, Position, RoutingTable, SimWorld,
};

/// Triangle where the detour through b is faster than the direct road.
fn detour_world() -> SimWorld {
    let builder = parse_network(
        "\
node,a,0,0,0
node,b,400,0,0
node,c,800,0,0
node,island,0,900,0
road,ac_direct,a,c,1000,10,1
road,ab,a,b,400,20,1
road,bc,b,c,400,20,1
",
    )
    .unwrap();
    builder.build(Some(0)).unwrap()
}

#[test]
fn test_routing_picks_fastest_not_fewest_hops() {
    let world = detour_world();
    let a = world.nodes().next().unwrap().id;
    let b = world.nodes().nth(1).unwrap().id;
    let c = world.nodes().nth(2).unwrap().id;

    // Direct a->c costs 100s, the detour costs 40s
    assert_eq!(world.shortest_path(a, c), vec![a, b, c]);
    assert_eq!(world.shortest_path(b, c), vec![b, c]);
}

#[test]
fn test_routing_prefers_direct_road_when_faster() {
    let builder = parse_network(
        "\
node,a,0,0,0
node,b,400,0,0
node,c,800,0,0
road,ab,a,b,400,20,1
road,bc,b,c,400,20,1
road,ac_direct,a,c,400,40,1
",
    )
    .unwrap();
    let world = builder.build(Some(0)).unwrap();
    let a = world.nodes().next().unwrap().id;
    let c = world.nodes().nth(2).unwrap().id;

    // Direct a->c costs 10s, the detour 40s
    assert_eq!(world.shortest_path(a, c), vec![a, c]);
}

#[test]
fn test_routing_trivial_and_unreachable_paths() {
    let world = detour_world();
    let a = world.nodes().next().unwrap().id;
    let island = world.nodes().nth(3).unwrap().id;

    assert_eq!(world.shortest_path(a, a), vec![a]);
    assert!(world.shortest_path(a, island).is_empty());
    assert!(world.shortest_path(island, a).is_empty());
    // One-way roads: c cannot get back to a
    let c = world.nodes().nth(2).unwrap().id;
    assert!(world.shortest_path(c, a).is_empty());
}

#[test]
fn test_routing_path_follows_real_edges() {
    let world = detour_world();
    let a = world.nodes().next().unwrap().id;
    let c = world.nodes().nth(2).unwrap().id;

    let path = world.shortest_path(a, c);
    assert!(path.len() >= 2);
    for pair in path.windows(2) {
        let joined = world
            .node(pair[0])
            .unwrap()
            .out_edges
            .iter()
            .any(|&eid| world.edge(eid).unwrap().to == pair[1]);
        assert!(joined, "path hop {:?} -> {:?} has no edge", pair[0], pair[1]);
    }
}

#[test]
fn test_reachability_matches_path_reconstruction() {
    // One-way a->b, node 2 isolated
    let edges = vec![Edge::new(
        EdgeId(0),
        "ab".into(),
        NodeId(0),
        NodeId(1),
        100.0,
        10.0,
        1,
    )];
    let table = RoutingTable::build(3, &edges);

    assert!(table.reachable(NodeId(0), NodeId(1)));
    assert!(!table.reachable(NodeId(1), NodeId(0)));
    assert!(!table.reachable(NodeId(0), NodeId(2)));
    // Every node reaches itself
    assert!(table.reachable(NodeId(2), NodeId(2)));

    assert_eq!(table.path(NodeId(0), NodeId(1)), vec![NodeId(0), NodeId(1)]);
    assert!(table.path(NodeId(1), NodeId(0)).is_empty());
}

#[test]
fn test_unroutable_demand_is_skipped_not_spawned() {
    // Two populated towns with no roads at all
    let builder = parse_network(
        "\
node,a,0,0,10000
node,b,1000,0,10000
",
    )
    .unwrap();
    let mut world = builder.build(Some(7)).unwrap();

    for _ in 0..3000 {
        world.tick(1.0).unwrap();
    }

    let stats = world.stats();
    assert!(stats.trips_skipped > 0);
    assert_eq!(stats.trips_spawned, 0);
    assert_eq!(world.vehicle_count(), 0);
}

fn demand_nodes(populations: &[u32]) -> Vec<Node> {
    populations
        .iter()
        .enumerate()
        .map(|(i, &population)| {
            Node::new(
                NodeId(i),
                format!("n{i}"),
                Position::new(i as f32, 0.0),
                population,
            )
        })
        .collect()
}

#[test]
fn test_demand_pairs_weighted_by_population() {
    let nodes = demand_nodes(&[10, 0, 5]);
    let demand = TripDemand::new(&nodes).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let (origin, destination) = demand.sample_pair(&mut rng).unwrap();
        assert_ne!(origin, destination);
        // The unpopulated node carries no demand mass
        assert_ne!(origin, NodeId(1));
        assert_ne!(destination, NodeId(1));
    }
}

#[test]
fn test_demand_empty_without_population() {
    let nodes = demand_nodes(&[0, 0]);
    let demand = TripDemand::new(&nodes).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    assert!(demand.sample_pair(&mut rng).is_none());
    assert_eq!(demand.expected_spawns(8.0 * 3600.0, 1.0), 0.0);
}

#[test]
fn test_speed_bias_is_clamped() {
    let nodes = demand_nodes(&[10, 10]);
    let demand = TripDemand::new(&nodes).unwrap();
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..200 {
        let bias = demand.sample_bias(&mut rng);
        assert!(bias.abs() <= SPEED_BIAS_CLAMP);
    }
}

#[test]
fn test_rush_hour_windows() {
    assert_eq!(rush_multiplier(8.0 * 3600.0), RUSH_MULTIPLIER);
    assert_eq!(rush_multiplier(7.0 * 3600.0), RUSH_MULTIPLIER);
    assert_eq!(rush_multiplier(17.0 * 3600.0), RUSH_MULTIPLIER);
    assert_eq!(rush_multiplier(9.0 * 3600.0), 1.0);
    assert_eq!(rush_multiplier(12.0 * 3600.0), 1.0);
    assert_eq!(rush_multiplier(0.0), 1.0);
    // The clock wraps at day boundaries
    assert_eq!(rush_multiplier(86_400.0 + 8.0 * 3600.0), RUSH_MULTIPLIER);
}

#[test]
fn test_rush_hour_scales_expected_spawns() {
    let nodes = demand_nodes(&[600, 600]);
    let demand = TripDemand::new(&nodes).unwrap();

    let off_peak = demand.expected_spawns(12.0 * 3600.0, 1.0);
    let peak = demand.expected_spawns(8.0 * 3600.0, 1.0);
    assert!(off_peak > 0.0);
    assert!((peak - RUSH_MULTIPLIER * off_peak).abs() < 1e-6);
}
