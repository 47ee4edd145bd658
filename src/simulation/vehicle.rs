//! Per-vehicle state and kinematic primitives
//!
//! All operations here are total functions over the vehicle's own state;
//! gap checking and lane bounds live in the decision policy, and ownership
//! transfers between edges and nodes are handled by the world.

use super::types::{NodeId, TripId, ACCEL_RATE, HARD_BRAKE_RATE, SOFT_BRAKE_RATE};

/// A single vehicle making one trip through the network
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Trip identifier, assigned at spawn
    pub trip: TripId,
    /// Distance along the current edge, in m
    pub position: f32,
    /// Longitudinal speed, in m/s
    pub speed: f32,
    /// Lane index; 0 is the rightmost lane, higher is further left
    pub lane: u32,
    /// Seconds since spawn
    pub age: f32,
    /// Simulation clock at spawn time
    pub spawned_at: f32,
    /// First node of the trip
    pub origin: NodeId,
    /// Last node of the trip
    pub destination: NodeId,
    /// Personal offset added to the edge speed limit when cruising
    bias: f32,
    /// Remaining route, consumed from the front as nodes are reached
    route: Vec<NodeId>,
}

impl Vehicle {
    /// Creates a vehicle for the given route.
    ///
    /// The route must be the full node sequence from origin to destination;
    /// an empty route produces a trip that completes at its first
    /// distribution.
    pub fn new(trip: TripId, route: Vec<NodeId>, bias: f32, spawned_at: f32) -> Self {
        let origin = route.first().copied().unwrap_or(NodeId(0));
        let destination = route.last().copied().unwrap_or(origin);
        Self {
            trip,
            position: 0.0,
            speed: 0.0,
            lane: 0,
            age: 0.0,
            spawned_at,
            origin,
            destination,
            bias,
            route,
        }
    }

    /// Speed the vehicle tries to hold on an edge with the given limit.
    pub fn target_speed(&self, speed_limit: f32) -> f32 {
        (speed_limit + self.bias).max(0.0)
    }

    /// Increases speed at the fixed acceleration rate, floored at zero.
    pub fn accelerate(&mut self, dt: f32) {
        self.speed = (self.speed + ACCEL_RATE * dt).max(0.0);
    }

    /// Decreases speed at the comfortable braking rate, clamped at zero.
    pub fn soft_brake(&mut self, dt: f32) {
        self.speed = (self.speed - SOFT_BRAKE_RATE * dt).max(0.0);
    }

    /// Decreases speed at the emergency braking rate, clamped at zero.
    pub fn hard_brake(&mut self, dt: f32) {
        self.speed = (self.speed - HARD_BRAKE_RATE * dt).max(0.0);
    }

    /// Steers toward the personal target speed for the given limit,
    /// settling exactly on it rather than overshooting at coarse steps.
    pub fn cruise(&mut self, dt: f32, speed_limit: f32) {
        let target = self.target_speed(speed_limit);
        if self.speed < target {
            self.speed = (self.speed + ACCEL_RATE * dt).min(target);
        } else if self.speed > target {
            self.speed = (self.speed - SOFT_BRAKE_RATE * dt).max(target);
        }
    }

    /// Shifts the lane index by `delta` (+1 = left, -1 = right).
    ///
    /// Lane existence is not checked here; the decision policy only emits
    /// lane changes into lanes it has confirmed exist.
    pub fn change_lane(&mut self, delta: i32) {
        self.lane = (self.lane as i32 + delta).max(0) as u32;
    }

    /// Integrates position and age over one time step.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.speed * dt;
        self.age += dt;
    }

    /// Resets edge-local state on entry to a new edge: position 0, lane 0,
    /// speed snapped to the edge limit (the on-ramp merge discontinuity).
    pub fn sync_to_edge(&mut self, speed_limit: f32) {
        self.position = 0.0;
        self.lane = 0;
        self.speed = speed_limit;
    }

    /// Next node on the remaining route, if any.
    pub fn route_head(&self) -> Option<NodeId> {
        self.route.first().copied()
    }

    /// Consumes the head of the remaining route.
    pub fn pop_route_head(&mut self) -> Option<NodeId> {
        if self.route.is_empty() {
            None
        } else {
            Some(self.route.remove(0))
        }
    }

    /// True once every node of the route has been visited.
    pub fn route_is_complete(&self) -> bool {
        self.route.is_empty()
    }
}
