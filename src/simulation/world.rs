//! Main simulation world that ties everything together
//!
//! Owns the node and edge arenas, the routing table, the demand model and
//! the simulation clock, and drives the synchronous tick loop: edges step,
//! trips spawn, nodes collect and distribute. Single-threaded throughout;
//! a vehicle is owned by exactly one edge or node at any instant and moves
//! between containers at most once per tick.

use anyhow::{bail, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use super::demand::TripDemand;
use super::edge::Edge;
use super::node::Node;
use super::routing::RoutingTable;
use super::stats::{SimulationStats, TripRecord};
use super::types::{EdgeId, NodeId, Position, TripId};
use super::vehicle::Vehicle;

/// Where a vehicle currently is, as reported by [`SimWorld::locate_vehicle`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleLocation {
    /// Driving along an edge
    OnEdge {
        edge: EdgeId,
        position: f32,
        lane: u32,
        speed: f32,
    },
    /// Waiting in a node's holding area
    AtNode { node: NodeId },
}

/// The simulation engine
#[derive(Debug)]
pub struct SimWorld {
    /// Node arena, indexed by `NodeId`
    nodes: Vec<Node>,
    /// Edge arena, indexed by `EdgeId`
    edges: Vec<Edge>,
    /// All-pairs shortest paths, read-only after construction
    routing: RoutingTable,
    /// OD demand model
    demand: TripDemand,
    /// Aggregate counters
    stats: SimulationStats,
    /// Completed trips awaiting a drain
    trip_log: Vec<TripRecord>,
    /// Simulation clock, in s
    time: f32,
    /// The run's random generator; all stochastic decisions draw from it
    rng: StdRng,
    next_trip_id: u64,
}

impl SimWorld {
    /// Assembles a world from builder output and seeds any build-time
    /// trips into their origin nodes.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        routing: RoutingTable,
        demand: TripDemand,
        rng: StdRng,
        seed_routes: Vec<Vec<NodeId>>,
    ) -> Self {
        let mut world = Self {
            nodes,
            edges,
            routing,
            demand,
            stats: SimulationStats::default(),
            trip_log: Vec::new(),
            time: 0.0,
            rng,
            next_trip_id: 0,
        };
        for route in seed_routes {
            world.spawn_trip(route, 0.0);
        }
        world
    }

    /// Advances the simulation by one step of `dt` seconds.
    ///
    /// Fails only on a graph/routing inconsistency discovered while
    /// distributing vehicles; that is a configuration error and the run
    /// must not continue past it.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        self.time += dt;
        for edge in &mut self.edges {
            edge.step(dt);
        }
        self.generate_trips(dt);
        self.collect();
        self.distribute()
    }

    /// Samples the demand model and spawns the resulting trips.
    fn generate_trips(&mut self, dt: f32) {
        let expected = self.demand.expected_spawns(self.time, dt);
        let mut count = expected.floor() as u32;
        let remainder = f64::from(expected.fract()).clamp(0.0, 1.0);
        if remainder > 0.0 && self.rng.random_bool(remainder) {
            count += 1;
        }

        for _ in 0..count {
            let Some((origin, destination)) = self.demand.sample_pair(&mut self.rng) else {
                return;
            };
            let route = self.routing.path(origin, destination);
            if route.len() < 2 {
                self.stats.trips_skipped += 1;
                debug!(
                    "no route from node {} to node {}, trip skipped",
                    origin.0, destination.0
                );
                continue;
            }
            let bias = self.demand.sample_bias(&mut self.rng);
            self.spawn_trip(route, bias);
        }
    }

    /// Creates a vehicle for the route and places it at the origin node.
    fn spawn_trip(&mut self, route: Vec<NodeId>, bias: f32) {
        let Some(&origin) = route.first() else {
            return;
        };
        let trip = TripId(self.next_trip_id);
        self.next_trip_id += 1;
        let vehicle = Vehicle::new(trip, route, bias, self.time);
        self.stats.trips_spawned += 1;
        self.nodes[origin.0].receive(vehicle);
    }

    /// Gathers vehicles that finished their edge into the destination
    /// nodes' holding areas.
    fn collect(&mut self) {
        let nodes = &mut self.nodes;
        for edge in &mut self.edges {
            let exiting = edge.take_exiting();
            if !exiting.is_empty() {
                nodes[edge.to.0].receive_all(exiting);
            }
        }
    }

    /// Routes every held vehicle onto its next edge, or completes its trip.
    ///
    /// A vehicle whose route asks for a hop with no matching outbound edge
    /// indicates an inconsistent graph; that aborts the run rather than
    /// dropping the vehicle.
    fn distribute(&mut self) -> Result<()> {
        for index in 0..self.nodes.len() {
            let node_id = self.nodes[index].id;
            let vehicles = self.nodes[index].take_holding();
            for mut vehicle in vehicles {
                if vehicle.route_head() == Some(node_id) {
                    vehicle.pop_route_head();
                }
                match vehicle.route_head() {
                    None => self.complete_trip(vehicle),
                    Some(next) => {
                        let out_edge = self.nodes[index]
                            .out_edges
                            .iter()
                            .copied()
                            .find(|&eid| self.edges[eid.0].to == next);
                        match out_edge {
                            Some(edge_id) => self.edges[edge_id.0].enter(vehicle),
                            None => bail!(
                                "vehicle {} at node '{}' has no outbound edge toward node {}",
                                vehicle.trip.0,
                                self.nodes[index].label,
                                next.0
                            ),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Records a finished trip and discards the vehicle.
    fn complete_trip(&mut self, vehicle: Vehicle) {
        self.stats.trips_completed += 1;
        self.trip_log.push(TripRecord {
            trip: vehicle.trip,
            origin: vehicle.origin,
            destination: vehicle.destination,
            duration: vehicle.age,
            spawned_at: vehicle.spawned_at,
        });
    }

    // --- Query surface ---

    /// Current simulation clock, in s.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Aggregate counters for the run so far.
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Number of vehicles anywhere in the network, edges and holding
    /// areas included.
    pub fn vehicle_count(&self) -> usize {
        let on_edges: usize = self.edges.iter().map(Edge::vehicle_count).sum();
        let at_nodes: usize = self.nodes.iter().map(Node::holding_count).sum();
        on_edges + at_nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Iterates all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates all edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Position of a node in the network plane.
    pub fn node_position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(id.0).map(|n| n.position)
    }

    /// Fastest path between two nodes, both ends included; empty when no
    /// route exists.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        self.routing.path(from, to)
    }

    /// Vehicle counts binned along an edge by distance.
    pub fn edge_occupancy(&self, id: EdgeId, bin_distance: f32) -> Option<Vec<usize>> {
        self.edges.get(id.0).map(|e| e.occupancy_histogram(bin_distance))
    }

    /// Finds a vehicle by trip id, wherever it currently is.
    pub fn locate_vehicle(&self, trip: TripId) -> Option<VehicleLocation> {
        for edge in &self.edges {
            if let Some(vehicle) = edge.find_vehicle(trip) {
                return Some(VehicleLocation::OnEdge {
                    edge: edge.id,
                    position: vehicle.position,
                    lane: vehicle.lane,
                    speed: vehicle.speed,
                });
            }
        }
        for node in &self.nodes {
            if node.find_vehicle(trip).is_some() {
                return Some(VehicleLocation::AtNode { node: node.id });
            }
        }
        None
    }

    /// Drains the completed-trip records accumulated since the last call.
    pub fn drain_trip_records(&mut self) -> Vec<TripRecord> {
        std::mem::take(&mut self.trip_log)
    }

    /// Prints a one-screen summary of the world state.
    pub fn print_summary(&self) {
        println!("=== Traffic Flow Summary ===");
        println!("Time: {:.1}s", self.time);
        println!(
            "Nodes: {}, Edges: {}, Vehicles: {}",
            self.node_count(),
            self.edge_count(),
            self.vehicle_count()
        );
        println!(
            "Trips: {} spawned, {} completed, {} skipped",
            self.stats.trips_spawned, self.stats.trips_completed, self.stats.trips_skipped
        );
        for edge in &self.edges {
            if edge.vehicle_count() > 0 {
                println!(
                    "  Edge '{}': {} vehicles over {:.0}m",
                    edge.label,
                    edge.vehicle_count(),
                    edge.length
                );
            }
        }
    }
}
