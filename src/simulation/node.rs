//! Network nodes: trip origins, destinations and transfer points
//!
//! A node holds the vehicles that are currently "at" it, either freshly
//! spawned or collected off an inbound edge, until the world's distribute
//! pass routes them onward. Incident edges are referenced by arena id, so
//! there are no node/edge ownership cycles.

use super::types::{EdgeId, NodeId, Position, TripId};
use super::vehicle::Vehicle;

/// A city or intersection in the road network
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
    /// Population mass driving the origin-destination demand weighting
    pub population: u32,
    /// Edges that end at this node
    pub in_edges: Vec<EdgeId>,
    /// Edges that start at this node
    pub out_edges: Vec<EdgeId>,
    /// Vehicles at this node awaiting distribution
    holding: Vec<Vehicle>,
}

impl Node {
    pub fn new(id: NodeId, label: String, position: Position, population: u32) -> Self {
        Self {
            id,
            label,
            position,
            population,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            holding: Vec::new(),
        }
    }

    /// Places a vehicle in the holding area (spawn or edge exit).
    pub fn receive(&mut self, vehicle: Vehicle) {
        self.holding.push(vehicle);
    }

    /// Appends a batch of vehicles collected off an inbound edge.
    pub fn receive_all(&mut self, vehicles: Vec<Vehicle>) {
        self.holding.extend(vehicles);
    }

    /// Drains the holding area for the distribute pass.
    pub fn take_holding(&mut self) -> Vec<Vehicle> {
        std::mem::take(&mut self.holding)
    }

    /// Number of vehicles currently waiting at the node.
    pub fn holding_count(&self) -> usize {
        self.holding.len()
    }

    /// Looks up a held vehicle by trip id.
    pub fn find_vehicle(&self, trip: TripId) -> Option<&Vehicle> {
        self.holding.iter().find(|v| v.trip == trip)
    }
}
