//! Nearby-traffic snapshots
//!
//! Built fresh for every vehicle on every tick by scanning the edge's
//! position-ordered vehicle sequence outward from the focal vehicle; never
//! stored between ticks.

use std::collections::VecDeque;

use super::types::safety_margin;
use super::vehicle::Vehicle;

/// Relative view of one nearby vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborObs {
    /// Signed longitudinal gap, neighbor position minus focal position, in m
    pub dx: f32,
    /// Relative speed, neighbor speed minus focal speed, in m/s
    pub dv: f32,
}

/// Snapshot of the traffic around one vehicle
///
/// Each slot holds the closest qualifying neighbor only. Slots for lanes
/// that do not exist are left empty and the corresponding existence flag
/// is false, rather than being filled with sentinel distances.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub front: Option<NeighborObs>,
    pub back: Option<NeighborObs>,
    pub left_front: Option<NeighborObs>,
    pub left_back: Option<NeighborObs>,
    pub right_front: Option<NeighborObs>,
    pub right_back: Option<NeighborObs>,
    pub left_lane_exists: bool,
    pub right_lane_exists: bool,
}

impl Observation {
    /// Builds the snapshot for `vehicles[focal]`.
    ///
    /// Scans outward in both directions until the gap exceeds the focal
    /// vehicle's safety margin, classifying neighbors by lane offset
    /// (offsets of two or more lanes are ignored) and keeping the closest
    /// one ahead and behind per lane bucket.
    pub fn build(vehicles: &VecDeque<Vehicle>, focal: usize, lane_count: u32) -> Self {
        let ego = &vehicles[focal];
        let margin = safety_margin(ego.speed);

        let mut obs = Observation {
            left_lane_exists: ego.lane + 1 < lane_count,
            right_lane_exists: ego.lane > 0,
            ..Default::default()
        };

        // Ahead: positions ascend with the index, so the first hit per
        // bucket is the closest one.
        for other in vehicles.iter().skip(focal + 1) {
            let dx = other.position - ego.position;
            if dx > margin {
                break;
            }
            let slot = match obs.bucket(ego.lane, other.lane, true) {
                Some(slot) => slot,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(NeighborObs {
                    dx,
                    dv: other.speed - ego.speed,
                });
            }
        }

        // Behind: walk down from the focal index.
        for other in vehicles.iter().take(focal).rev() {
            let dx = other.position - ego.position;
            if dx < -margin {
                break;
            }
            let slot = match obs.bucket(ego.lane, other.lane, false) {
                Some(slot) => slot,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(NeighborObs {
                    dx,
                    dv: other.speed - ego.speed,
                });
            }
        }

        obs
    }

    fn bucket(
        &mut self,
        ego_lane: u32,
        other_lane: u32,
        ahead: bool,
    ) -> Option<&mut Option<NeighborObs>> {
        let d_lane = other_lane as i32 - ego_lane as i32;
        match (d_lane, ahead) {
            (0, true) => Some(&mut self.front),
            (0, false) => Some(&mut self.back),
            (1, true) => Some(&mut self.left_front),
            (1, false) => Some(&mut self.left_back),
            (-1, true) => Some(&mut self.right_front),
            (-1, false) => Some(&mut self.right_back),
            _ => None,
        }
    }
}
