use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped temperature/humidity sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%RH)
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }

    /// Reading the monitor starts from before the first tick.
    pub fn initial(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, INITIAL_TEMPERATURE_C, INITIAL_HUMIDITY_PERCENT)
    }
}

pub const INITIAL_TEMPERATURE_C: f64 = 28.5;
pub const INITIAL_HUMIDITY_PERCENT: f64 = 65.0;
