//! Population-weighted stochastic trip generation
//!
//! Demand is derived once from node population weights into an
//! origin-destination probability matrix; each tick the expected spawn
//! count follows a diurnal commute curve with two rush-hour windows.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::node::Node;
use super::types::{NodeId, SPEED_BIAS_CLAMP, SPEED_BIAS_STDDEV};

/// Fraction of the population that makes one commute trip per day
pub const DAILY_COMMUTE_FRACTION: f32 = 0.3;

/// Length of a simulated day, in s
pub const SECONDS_PER_DAY: f32 = 86_400.0;

/// Morning rush-hour window, in hours of the simulated day
pub const MORNING_RUSH: (f32, f32) = (7.0, 9.0);

/// Evening rush-hour window, in hours of the simulated day
pub const EVENING_RUSH: (f32, f32) = (16.0, 18.0);

/// Demand multiplier inside the rush-hour windows
pub const RUSH_MULTIPLIER: f32 = 4.0;

/// Origin-destination demand model for one network
#[derive(Debug)]
pub struct TripDemand {
    /// Cumulative OD probabilities, parallel to `pairs`
    cumulative: Vec<f32>,
    /// (origin, destination) for each matrix entry
    pairs: Vec<(NodeId, NodeId)>,
    /// Sum of node populations
    total_population: f32,
    /// Sampler for the per-vehicle speed bias
    bias_distr: Normal<f32>,
}

impl TripDemand {
    /// Derives the OD matrix from node population weights: the probability
    /// mass of a pair is proportional to the product of its endpoint
    /// populations. Same-node pairs carry no mass.
    pub fn new(nodes: &[Node]) -> Result<Self> {
        let mut weights = Vec::new();
        let mut pairs = Vec::new();
        for origin in nodes {
            for destination in nodes {
                if origin.id == destination.id {
                    continue;
                }
                let mass = origin.population as f32 * destination.population as f32;
                if mass > 0.0 {
                    weights.push(mass);
                    pairs.push((origin.id, destination.id));
                }
            }
        }

        let total_mass: f32 = weights.iter().sum();
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for weight in &weights {
            running += weight / total_mass;
            cumulative.push(running);
        }

        let total_population = nodes.iter().map(|n| n.population as f32).sum();
        let bias_distr = Normal::new(0.0, SPEED_BIAS_STDDEV)
            .context("speed bias distribution is misconfigured")?;

        Ok(Self {
            cumulative,
            pairs,
            total_population,
            bias_distr,
        })
    }

    /// Expected number of trips to start during a step of `dt` seconds at
    /// simulation clock `time`.
    pub fn expected_spawns(&self, time: f32, dt: f32) -> f32 {
        if self.pairs.is_empty() {
            return 0.0;
        }
        let base_rate = self.total_population * DAILY_COMMUTE_FRACTION / SECONDS_PER_DAY;
        base_rate * rush_multiplier(time) * dt
    }

    /// Draws one (origin, destination) pair from the OD matrix.
    pub fn sample_pair(&self, rng: &mut StdRng) -> Option<(NodeId, NodeId)> {
        if self.pairs.is_empty() {
            return None;
        }
        let draw: f32 = rng.random_range(0.0..1.0);
        let index = self
            .cumulative
            .iter()
            .position(|&c| draw < c)
            .unwrap_or(self.pairs.len() - 1);
        Some(self.pairs[index])
    }

    /// Draws a clamped personal speed bias for a new vehicle.
    pub fn sample_bias(&self, rng: &mut StdRng) -> f32 {
        self.bias_distr
            .sample(rng)
            .clamp(-SPEED_BIAS_CLAMP, SPEED_BIAS_CLAMP)
    }
}

/// Demand multiplier for the time of day; elevated during the two fixed
/// rush-hour windows.
pub fn rush_multiplier(time: f32) -> f32 {
    let hour = (time.rem_euclid(SECONDS_PER_DAY)) / 3600.0;
    let in_window = |(start, end): (f32, f32)| hour >= start && hour < end;
    if in_window(MORNING_RUSH) || in_window(EVENING_RUSH) {
        RUSH_MULTIPLIER
    } else {
        1.0
    }
}
