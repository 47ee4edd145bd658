//! Core types for the traffic flow engine
//!
//! Standalone identifiers, geometry and tuning constants shared by every
//! module.

/// Stable integer identifier of a node (city/intersection).
///
/// Assigned densely by the network builder, in insertion order, and never
/// reassigned afterwards: the routing table and external consumers index
/// by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Stable integer identifier of an edge (road segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Identifier of a single trip, unique for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(pub u64);

/// A 2-D position in the network plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Acceleration applied by Cruise when below the target speed, in m/s²
pub const ACCEL_RATE: f32 = 2.0;

/// Deceleration applied by Cruise when above the target speed, in m/s²
pub const SOFT_BRAKE_RATE: f32 = 4.0;

/// Deceleration applied by HardBrake, in m/s²
pub const HARD_BRAKE_RATE: f32 = 10.0;

/// Safety margin at standstill, in m
pub const MARGIN_BASE: f32 = 20.0;

/// Safety margin growth per m/s of the focal vehicle's speed
pub const MARGIN_PER_SPEED: f32 = 0.35;

/// A forward gap inside the margin is still safe while the neighbor is not
/// closing faster than this, in m/s (dv = neighbor speed - own speed)
pub const FRONT_CLOSING_THRESHOLD: f32 = -10.0;

/// A rear gap inside the margin is still safe while the neighbor behind is
/// not gaining on us faster than this, in m/s
pub const REAR_APPROACH_THRESHOLD: f32 = 10.0;

/// Standard deviation of the per-vehicle speed bias, in m/s
pub const SPEED_BIAS_STDDEV: f32 = 3.0;

/// The speed bias is clamped to this magnitude, in m/s
pub const SPEED_BIAS_CLAMP: f32 = 5.0;

/// Minimum usable edge length, in m; shorter edges are clamped up
pub const MIN_EDGE_LENGTH: f32 = 1.0;

/// Minimum usable speed limit, in m/s; slower limits are clamped up
pub const MIN_SPEED_LIMIT: f32 = 1.0;

/// Speed-dependent safety distance used for both the observation scan and
/// the gap-acceptance tests of the decision policy
pub fn safety_margin(speed: f32) -> f32 {
    MARGIN_BASE + MARGIN_PER_SPEED * speed
}
