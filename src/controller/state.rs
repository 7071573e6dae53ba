//! Monitor state and its transitions.
//!
//! All mutable monitor data lives in one [`MonitorState`]. Every external event is
//! applied by [`reduce`], which never mutates its input and returns the complete
//! next state, so readers always see a consistent reading/fan/history/alert set.

use chrono::{DateTime, Utc};

use crate::domain::{classify, AlertLevel, HistoryBuffer, Reading};
use crate::simulation::{advance, RandomSource, SimulationConfig};

/// Auto control switches the fan on above this temperature (°C)
pub const AUTO_FAN_ON_ABOVE_C: f64 = 30.0;
/// Auto control switches the fan off below this temperature (°C)
pub const AUTO_FAN_OFF_BELOW_C: f64 = 28.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    /// Incremented on every transition that changes the state
    pub version: u64,
    pub reading: Reading,
    pub fan_on: bool,
    pub history: HistoryBuffer,
    /// Derived from `reading`, recomputed on every tick
    pub alert_level: AlertLevel,
    /// When false, ticks are dropped
    pub is_active: bool,
}

impl MonitorState {
    pub fn new(initial: Reading, history_capacity: usize, is_active: bool) -> Self {
        Self {
            version: 0,
            alert_level: classify(&initial),
            reading: initial,
            fan_on: false,
            history: HistoryBuffer::new(history_capacity),
            is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorEvent {
    /// Simulation timer fired
    Tick { at: DateTime<Utc> },
    /// Operator flipped the fan switch
    ToggleFan,
    /// One-shot automatic fan decision from the current temperature
    AutoFan,
    /// Start or stop the simulation
    SetActive(bool),
}

/// Apply `event` to `state`.
pub fn reduce(
    state: &MonitorState,
    event: MonitorEvent,
    config: &SimulationConfig,
    rng: &mut dyn RandomSource,
) -> MonitorState {
    match event {
        MonitorEvent::Tick { at } => {
            if !state.is_active {
                return state.clone();
            }
            let reading = advance(&state.reading, state.fan_on, config, rng, at);
            // History records the reading that was current when the timer fired,
            // stamped with the tick time, so it trails `reading` by one step.
            let mut history = state.history.clone();
            history.append(Reading::new(at, state.reading.temperature, state.reading.humidity));
            MonitorState {
                version: state.version + 1,
                alert_level: classify(&reading),
                reading,
                history,
                ..state.clone()
            }
        }
        MonitorEvent::ToggleFan => with_fan(state, !state.fan_on),
        MonitorEvent::AutoFan => match auto_fan_decision(state.reading.temperature) {
            Some(fan_on) => with_fan(state, fan_on),
            None => state.clone(),
        },
        MonitorEvent::SetActive(is_active) => {
            if state.is_active == is_active {
                return state.clone();
            }
            MonitorState {
                version: state.version + 1,
                is_active,
                ..state.clone()
            }
        }
    }
}

/// Fan state requested by auto control, or `None` inside the dead band.
pub fn auto_fan_decision(temperature: f64) -> Option<bool> {
    if temperature > AUTO_FAN_ON_ABOVE_C {
        Some(true)
    } else if temperature < AUTO_FAN_OFF_BELOW_C {
        Some(false)
    } else {
        None
    }
}

fn with_fan(state: &MonitorState, fan_on: bool) -> MonitorState {
    if state.fan_on == fan_on {
        return state.clone();
    }
    MonitorState {
        version: state.version + 1,
        fan_on,
        ..state.clone()
    }
}
