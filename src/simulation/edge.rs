//! Road segments and the per-tick edge step protocol
//!
//! An edge owns the vehicles currently driving on it as a sequence ordered
//! by ascending position. One step applies decisions, integrates
//! kinematics, repairs the ordering invariant with a single local-swap
//! pass, and sets aside vehicles that crossed the segment boundary for the
//! destination node to collect.

use std::collections::VecDeque;

use super::observation::Observation;
use super::policy::decide;
use super::types::{safety_margin, EdgeId, NodeId, TripId, MIN_EDGE_LENGTH, MIN_SPEED_LIMIT};
use super::vehicle::Vehicle;

/// A one-way road segment between two nodes
#[derive(Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub label: String,
    /// Source node
    pub from: NodeId,
    /// Destination node
    pub to: NodeId,
    /// Segment length, in m
    pub length: f32,
    /// Speed limit, in m/s
    pub speed_limit: f32,
    /// Number of lanes; lane 0 is the rightmost
    pub lanes: u32,
    /// Vehicles on the segment, ordered by ascending position
    vehicles: VecDeque<Vehicle>,
    /// Vehicles that crossed the boundary this tick, in position order
    exiting: Vec<Vehicle>,
}

impl Edge {
    /// Creates an edge, clamping degenerate lengths and limits to small
    /// positive minima instead of letting negative distances propagate.
    pub fn new(
        id: EdgeId,
        label: String,
        from: NodeId,
        to: NodeId,
        length: f32,
        speed_limit: f32,
        lanes: u32,
    ) -> Self {
        Self {
            id,
            label,
            from,
            to,
            length: length.max(MIN_EDGE_LENGTH),
            speed_limit: speed_limit.max(MIN_SPEED_LIMIT),
            lanes: lanes.max(1),
            vehicles: VecDeque::new(),
            exiting: Vec::new(),
        }
    }

    /// Time to cross the segment at the speed limit, in s.
    ///
    /// This is the edge weight used by the routing precomputation.
    pub fn crossing_time(&self) -> f32 {
        self.length / self.speed_limit
    }

    /// Advances every vehicle on the edge by one time step.
    pub fn step(&mut self, dt: f32) {
        self.apply_decisions(dt);
        for vehicle in &mut self.vehicles {
            vehicle.advance(dt);
        }
        self.restore_order();
        self.harvest_exiting();
    }

    /// Builds each vehicle's observation and applies the policy's action.
    fn apply_decisions(&mut self, dt: f32) {
        for i in 0..self.vehicles.len() {
            let observation = Observation::build(&self.vehicles, i, self.lanes);
            let margin = safety_margin(self.vehicles[i].speed);
            let action = decide(margin, &observation);
            action.apply(&mut self.vehicles[i], dt, self.speed_limit);
        }
    }

    /// Repairs the ordering invariant with a single forward pass.
    ///
    /// Per-tick displacement is bounded, so any inversion spans at most one
    /// neighbor; swapping adjacent pairs and stepping back one index after
    /// a swap propagates the correction in O(n) without a full sort.
    fn restore_order(&mut self) {
        let mut i = 0;
        while i + 1 < self.vehicles.len() {
            if self.vehicles[i].position > self.vehicles[i + 1].position {
                self.vehicles.swap(i, i + 1);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
    }

    /// Moves vehicles past the end of the segment into the exiting buffer,
    /// preserving position order.
    fn harvest_exiting(&mut self) {
        let mut crossed = Vec::new();
        while self
            .vehicles
            .back()
            .is_some_and(|v| v.position > self.length)
        {
            if let Some(vehicle) = self.vehicles.pop_back() {
                crossed.push(vehicle);
            }
        }
        crossed.reverse();
        self.exiting.extend(crossed);
    }

    /// Places a vehicle at the start of the segment.
    pub fn enter(&mut self, mut vehicle: Vehicle) {
        vehicle.sync_to_edge(self.speed_limit);
        self.vehicles.push_front(vehicle);
    }

    /// Drains the vehicles that crossed the boundary, in position order.
    pub fn take_exiting(&mut self) -> Vec<Vehicle> {
        std::mem::take(&mut self.exiting)
    }

    /// Number of vehicles currently driving on the segment.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Iterates the vehicles in ascending position order.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Looks up a vehicle on this segment by trip id.
    pub fn find_vehicle(&self, trip: TripId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.trip == trip)
    }

    /// Vehicle counts binned along the segment by distance.
    ///
    /// `bin_distance` is the width of one bin; the last bin absorbs any
    /// remainder of the segment.
    pub fn occupancy_histogram(&self, bin_distance: f32) -> Vec<usize> {
        let bin_distance = bin_distance.max(1.0);
        let bin_count = (self.length / bin_distance).ceil().max(1.0) as usize;
        let mut bins = vec![0usize; bin_count];
        for vehicle in &self.vehicles {
            let index = (vehicle.position / bin_distance) as usize;
            bins[index.min(bin_count - 1)] += 1;
        }
        bins
    }

    /// True while the position-ordering invariant holds.
    pub fn is_ordered(&self) -> bool {
        self.vehicles
            .iter()
            .zip(self.vehicles.iter().skip(1))
            .all(|(a, b)| a.position <= b.position)
    }
}
