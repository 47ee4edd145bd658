//! Network file parsing, builder validation, and whole-world runs.

use traffic_flow::simulation::{parse_network, NetworkBuilder, SimWorld, VehicleLocation, TripId};

fn two_town_world() -> SimWorld {
    // One long road and a seeded trip across it
    let builder = parse_network(
        "\
# two towns, one road
node,a,0,0,0
node,b,4000,0,0
road,main,a,b,1000,20,1
route,a,b
",
    )
    .unwrap();
    builder.build(Some(1)).unwrap()
}

#[test]
fn test_parse_network_counts() {
    let builder = parse_network(
        "\
node,a,0,0,100
node,b,100,0,200

# a comment between commands
road,ab,a,b,500,25,2
road,ba,b,a,500,25,2
",
    )
    .unwrap();
    let world = builder.build(Some(0)).unwrap();
    assert_eq!(world.node_count(), 2);
    assert_eq!(world.edge_count(), 2);
    assert_eq!(world.vehicle_count(), 0);
}

#[test]
fn test_parse_rejects_unknown_command() {
    let err = parse_network("bridge,a,b").unwrap_err();
    assert!(err.to_string().contains("unknown command"));
}

#[test]
fn test_parse_rejects_bad_field() {
    let err = parse_network("node,a,0,zero,100").unwrap_err();
    assert!(format!("{err:#}").contains("invalid y"));
}

#[test]
fn test_parse_rejects_wrong_arity() {
    let err = parse_network("node,a,0,0").unwrap_err();
    assert!(err.to_string().contains("node takes 4 fields"));
}

#[test]
fn test_builder_rejects_duplicate_label() {
    let mut builder = NetworkBuilder::new();
    builder.add_node("a", 0.0, 0.0, 10).unwrap();
    let err = builder.add_node("a", 1.0, 1.0, 10).unwrap_err();
    assert!(err.to_string().contains("duplicate node label"));
}

#[test]
fn test_builder_rejects_unknown_edge_endpoint() {
    let mut builder = NetworkBuilder::new();
    builder.add_node("a", 0.0, 0.0, 10).unwrap();
    let err = builder
        .add_edge("broken", "a", "missing", 100.0, 10.0, 1)
        .unwrap_err();
    assert!(err.to_string().contains("unknown node label"));
}

#[test]
fn test_builder_rejects_seed_route_without_edge() {
    let mut builder = NetworkBuilder::new();
    builder.add_node("a", 0.0, 0.0, 0).unwrap();
    builder.add_node("b", 100.0, 0.0, 0).unwrap();
    builder.add_trip(&["a", "b"]).unwrap();
    let err = builder.build(Some(0)).unwrap_err();
    assert!(err.to_string().contains("missing edge"));
}

#[test]
fn test_seeded_trip_crosses_and_completes() {
    let mut world = two_town_world();
    assert_eq!(world.vehicle_count(), 1);

    // 1000m at a held 20 m/s: strictly past the end on tick 52
    for _ in 0..60 {
        world.tick(1.0).unwrap();
    }

    let stats = world.stats();
    assert_eq!(stats.trips_spawned, 1);
    assert_eq!(stats.trips_completed, 1);
    assert_eq!(world.vehicle_count(), 0);

    let records = world.drain_trip_records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.trip, TripId(0));
    assert!(record.duration >= 50.0);
    assert_eq!(record.spawned_at, 0.0);
    assert!(world.drain_trip_records().is_empty());
}

#[test]
fn test_locate_vehicle_across_containers() {
    let mut world = two_town_world();
    let node_a = world.nodes().next().unwrap().id;

    // Before the first tick the seeded vehicle waits at its origin
    assert_eq!(
        world.locate_vehicle(TripId(0)),
        Some(VehicleLocation::AtNode { node: node_a })
    );

    // After a few ticks it is driving on the road
    for _ in 0..3 {
        world.tick(1.0).unwrap();
    }
    match world.locate_vehicle(TripId(0)) {
        Some(VehicleLocation::OnEdge { position, speed, lane, .. }) => {
            assert!(position > 0.0);
            assert_eq!(speed, 20.0);
            assert_eq!(lane, 0);
        }
        other => panic!("expected the vehicle on an edge, got {other:?}"),
    }

    assert!(world.locate_vehicle(TripId(99)).is_none());
}

#[test]
fn test_node_position_query() {
    let world = two_town_world();
    let node_b = world.nodes().nth(1).unwrap().id;
    let position = world.node_position(node_b).unwrap();
    assert_eq!(position.x, 4000.0);
    assert_eq!(position.y, 0.0);
}

#[test]
fn test_collect_merges_arrivals_from_multiple_inbound_edges() {
    // Two equal roads converge on c; both seeded vehicles exit on the
    // same tick and both must be collected and completed
    let builder = parse_network(
        "\
node,a,0,0,0
node,b,0,200,0
node,c,500,100,0
road,ac,a,c,100,20,1
road,bc,b,c,100,20,1
route,a,c
route,b,c
",
    )
    .unwrap();
    let mut world = builder.build(Some(0)).unwrap();
    assert_eq!(world.vehicle_count(), 2);
    let c = world.nodes().nth(2).unwrap();
    assert_eq!(c.in_edges.len(), 2);
    assert!(c.out_edges.is_empty());

    for _ in 0..10 {
        world.tick(1.0).unwrap();
    }

    assert_eq!(world.stats().trips_completed, 2);
    assert_eq!(world.vehicle_count(), 0);
    assert_eq!(world.drain_trip_records().len(), 2);
}

#[test]
fn test_builder_label_lookup() {
    let builder = parse_network(
        "\
node,a,0,0,0
node,b,100,0,0
road,ab,a,b,100,10,1
",
    )
    .unwrap();
    let a = builder.node_id("a").unwrap();
    let b = builder.node_id("b").unwrap();
    assert!(builder.node_id("missing").is_none());

    let world = builder.build(Some(0)).unwrap();
    assert_eq!(world.shortest_path(a, b), vec![a, b]);
}

#[test]
fn test_vehicles_are_conserved_and_edges_stay_ordered() {
    // Fully connected triangle with demand-driven spawning
    let builder = parse_network(
        "\
node,a,0,0,20000
node,b,1000,0,20000
node,c,500,800,20000
road,ab,a,b,500,25,2
road,ba,b,a,500,25,2
road,bc,b,c,500,25,2
road,cb,c,b,500,25,2
road,ca,c,a,500,25,2
road,ac,a,c,500,25,2
",
    )
    .unwrap();
    let mut world = builder.build(Some(42)).unwrap();

    for _ in 0..300 {
        world.tick(1.0).unwrap();
        let stats = world.stats();
        assert_eq!(
            world.vehicle_count() as u64,
            stats.trips_spawned - stats.trips_completed
        );
        for edge in world.edges() {
            assert!(edge.is_ordered(), "edge '{}' lost its ordering", edge.label);
        }
    }

    // The run should have produced real traffic
    assert!(world.stats().trips_spawned > 0);
    assert_eq!(world.stats().trips_skipped, 0);
}

#[test]
fn test_occupancy_query_on_world() {
    let mut world = two_town_world();
    for _ in 0..5 {
        world.tick(1.0).unwrap();
    }
    let edge_id = world.edges().next().unwrap().id;
    let bins = world.edge_occupancy(edge_id, 100.0).unwrap();
    assert_eq!(bins.len(), 10);
    assert_eq!(bins.iter().sum::<usize>(), 1);
}
