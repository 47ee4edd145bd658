//! Driving actions emitted by the decision policy
//!
//! The action set is fixed and small, so it is a closed enum rather than a
//! trait object hierarchy. Applying an action mutates exactly one
//! vehicle's kinematic state and nothing else.

use super::vehicle::Vehicle;

/// A pure driving instruction for one vehicle over one time step
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Track the personal target speed for the current edge
    Cruise,
    /// Decelerate at the emergency rate
    HardBrake,
    /// Shift one lane left (toward higher lane indices)
    ChangeLaneLeft,
    /// Shift one lane right (toward lane 0)
    ChangeLaneRight,
    /// Apply several actions in order within the same step
    Composite(Vec<Action>),
}

impl Action {
    /// Applies the instruction to the vehicle's kinematic state.
    pub fn apply(&self, vehicle: &mut Vehicle, dt: f32, speed_limit: f32) {
        match self {
            Action::Cruise => vehicle.cruise(dt, speed_limit),
            Action::HardBrake => vehicle.hard_brake(dt),
            Action::ChangeLaneLeft => vehicle.change_lane(1),
            Action::ChangeLaneRight => vehicle.change_lane(-1),
            Action::Composite(actions) => {
                for action in actions {
                    action.apply(vehicle, dt, speed_limit);
                }
            }
        }
    }

    /// True if applying this action would move the vehicle one lane left.
    pub fn moves_left(&self) -> bool {
        match self {
            Action::ChangeLaneLeft => true,
            Action::Composite(actions) => actions.iter().any(Action::moves_left),
            _ => false,
        }
    }

    /// True if applying this action would move the vehicle one lane right.
    pub fn moves_right(&self) -> bool {
        match self {
            Action::ChangeLaneRight => true,
            Action::Composite(actions) => actions.iter().any(Action::moves_right),
            _ => false,
        }
    }
}
