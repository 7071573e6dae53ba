//! # Climate Drift Model
//!
//! Per-tick update of storage-room temperature and humidity.
//!
//! With the fan running both variables are pulled toward their targets
//! (proportional gain 0.1 for temperature, 0.05 for humidity). With the fan off
//! the room warms by a constant 0.1 °C per tick while humidity random-walks with
//! no bias. Every tick adds centred uniform noise scaled by the drift rate and
//! clamps the result to the configured physical bounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RandomSource;
use crate::domain::Reading;

const FAN_TEMP_GAIN: f64 = 0.1;
const FAN_HUMIDITY_GAIN: f64 = 0.05;
const AMBIENT_WARMING_C_PER_TICK: f64 = 0.1;

/// Closed interval a simulated value is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Drift model constants. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Optimal storage temperature (°C)
    pub target_temp: f64,
    /// Optimal storage humidity (%RH)
    pub target_humidity: f64,
    /// Noise amplitude applied to temperature each tick
    pub temp_drift_rate: f64,
    /// Noise amplitude applied to humidity each tick
    pub humidity_drift_rate: f64,
    pub temp_bounds: Bounds,
    pub humidity_bounds: Bounds,
    /// Simulation tick period
    pub tick_interval_ms: u64,
}

impl SimulationConfig {
    pub const STORAGE: SimulationConfig = SimulationConfig {
        target_temp: 25.0,
        target_humidity: 60.0,
        temp_drift_rate: 0.2,
        humidity_drift_rate: 0.8,
        temp_bounds: Bounds::new(20.0, 40.0),
        humidity_bounds: Bounds::new(40.0, 90.0),
        tick_interval_ms: 2000,
    };
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::STORAGE
    }
}

/// Compute the reading that follows `current`.
///
/// Temperature and humidity are both derived from the pre-tick reading; one
/// uniform sample is drawn for temperature, then one for humidity.
pub fn advance(
    current: &Reading,
    fan_on: bool,
    config: &SimulationConfig,
    rng: &mut dyn RandomSource,
    at: DateTime<Utc>,
) -> Reading {
    let temp_noise = (rng.uniform() - 0.5) * config.temp_drift_rate;
    let temp_step = if fan_on {
        (config.target_temp - current.temperature) * FAN_TEMP_GAIN
    } else {
        AMBIENT_WARMING_C_PER_TICK
    };
    let temperature = config
        .temp_bounds
        .clamp(current.temperature + temp_step + temp_noise);

    let humidity_noise = (rng.uniform() - 0.5) * config.humidity_drift_rate;
    let humidity_step = if fan_on {
        (config.target_humidity - current.humidity) * FAN_HUMIDITY_GAIN
    } else {
        0.0
    };
    let humidity = config
        .humidity_bounds
        .clamp(current.humidity + humidity_step + humidity_noise);

    Reading::new(at, temperature, humidity)
}
