//! # Storage Climate Simulation
//!
//! Generates the "live" readings of the storage room. There is no physical sensor;
//! the room is modelled by a drift rule that reacts to the fan actuator.
//!
//! ## Components
//!
//! - **Drift**: per-tick temperature/humidity update with fan feedback and clamping
//! - **Random**: injectable uniform sample source (seeded `StdRng` in production)
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use onion_storage_monitor::domain::Reading;
//! use onion_storage_monitor::simulation::{advance, ConstantRandom, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut rng = ConstantRandom(0.5);
//!
//! let start = Reading::initial(Utc::now());
//! let next = advance(&start, false, &config, &mut rng, Utc::now());
//! assert!((next.temperature - 28.6).abs() < 1e-9);
//! ```

pub mod drift;
pub mod random;

pub use drift::{advance, Bounds, SimulationConfig};
#[cfg(test)]
pub use random::MockRandomSource;
pub use random::{ConstantRandom, RandomSource, SeededRandom};
