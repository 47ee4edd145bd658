//! Trip statistics
//!
//! Completed trips are recorded as individual rows and drained on demand;
//! aggregate counters stay cheap enough to read every tick.

use super::types::{NodeId, TripId};

/// One completed trip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRecord {
    pub trip: TripId,
    pub origin: NodeId,
    pub destination: NodeId,
    /// Travel time from spawn to arrival, in s
    pub duration: f32,
    /// Simulation clock at spawn
    pub spawned_at: f32,
}

/// Aggregate counters for one simulation run
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStats {
    /// Trips created by the generator or seeded at build time
    pub trips_spawned: u64,
    /// Trips that reached their destination
    pub trips_completed: u64,
    /// Sampled OD pairs discarded because no route existed
    pub trips_skipped: u64,
}
