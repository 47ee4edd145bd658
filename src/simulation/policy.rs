//! Lane-change and car-following decision policy
//!
//! A deterministic rule evaluated per vehicle per tick. Encodes a
//! rightmost-lane preference with conservative gap acceptance: return
//! right when the right lane is open, hold the lane while the forward gap
//! is acceptable, overtake left otherwise, and brake hard as the last
//! resort. Stateless between calls; no randomness.

use super::action::Action;
use super::observation::{NeighborObs, Observation};
use super::types::{FRONT_CLOSING_THRESHOLD, REAR_APPROACH_THRESHOLD};

/// Maps one observation to one action for the focal vehicle.
///
/// `margin` is the focal vehicle's speed-dependent safety distance.
pub fn decide(margin: f32, obs: &Observation) -> Action {
    if obs.right_lane_exists && lane_is_safe(margin, &obs.right_front, &obs.right_back) {
        return Action::Composite(vec![Action::ChangeLaneRight, Action::Cruise]);
    }

    if front_is_safe(margin, &obs.front) {
        return Action::Cruise;
    }

    if obs.left_lane_exists && lane_is_safe(margin, &obs.left_front, &obs.left_back) {
        return Action::Composite(vec![Action::ChangeLaneLeft, Action::Cruise]);
    }

    Action::HardBrake
}

/// A target lane is safe when both its forward and rear gaps are.
fn lane_is_safe(margin: f32, front: &Option<NeighborObs>, back: &Option<NeighborObs>) -> bool {
    front_is_safe(margin, front) && rear_is_safe(margin, back)
}

/// A forward neighbor is acceptable when the gap exceeds the margin or the
/// neighbor is not closing in faster than the threshold. No neighbor is
/// always safe.
fn front_is_safe(margin: f32, front: &Option<NeighborObs>) -> bool {
    match front {
        None => true,
        Some(n) => n.dx > margin || n.dv > FRONT_CLOSING_THRESHOLD,
    }
}

/// A rear neighbor is acceptable when it is further back than the margin
/// or approaching slower than the threshold.
fn rear_is_safe(margin: f32, back: &Option<NeighborObs>) -> bool {
    match back {
        None => true,
        Some(n) => n.dx < -margin || n.dv < REAR_APPROACH_THRESHOLD,
    }
}
