pub mod scheduler;
pub mod snapshot;
pub mod state;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, MonitorSettings};
use crate::domain::{AlertLevel, Reading};
use crate::simulation::{RandomSource, SeededRandom, SimulationConfig};

pub use scheduler::{PeriodicTask, Scheduler, TaskHandle, TaskStatus, TokioScheduler};
pub use snapshot::{DashboardSnapshot, MetricCard};
pub use state::{reduce, MonitorEvent, MonitorState};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub monitor: Arc<Monitor>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let rng = Box::new(SeededRandom::new(cfg.monitor.random_seed));
        let monitor = Arc::new(Monitor::new(
            SimulationConfig::default(),
            &cfg.monitor,
            rng,
        ));
        Self { cfg, monitor }
    }
}

/// Owns the monitor state and applies events to it one at a time.
pub struct Monitor {
    config: SimulationConfig,
    state: RwLock<MonitorState>,
    rng: Mutex<Box<dyn RandomSource>>,
    clock: RwLock<DateTime<Utc>>,
    session_id: Uuid,
}

impl Monitor {
    pub fn new(
        config: SimulationConfig,
        settings: &MonitorSettings,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let now = Utc::now();
        let state = MonitorState::new(
            Reading::initial(now),
            settings.history_capacity,
            settings.start_active,
        );
        Self {
            config,
            state: RwLock::new(state),
            rng: Mutex::new(rng),
            clock: RwLock::new(now),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Apply one event and commit the resulting state in a single write.
    pub async fn dispatch(&self, event: MonitorEvent) -> MonitorState {
        let mut state = self.state.write().await;
        let next = {
            let mut rng = self.rng.lock();
            reduce(&state, event, &self.config, &mut **rng)
        };

        if next.version != state.version {
            log_transition(&state, &next, event);
        }

        *state = next.clone();
        next
    }

    pub async fn tick(&self) -> MonitorState {
        self.dispatch(MonitorEvent::Tick { at: Utc::now() }).await
    }

    /// Flip the fan. Returns the new fan state.
    pub async fn toggle_fan(&self) -> bool {
        self.dispatch(MonitorEvent::ToggleFan).await.fan_on
    }

    /// One-shot automatic fan decision. Returns the resulting fan state.
    pub async fn auto_fan(&self) -> bool {
        self.dispatch(MonitorEvent::AutoFan).await.fan_on
    }

    pub async fn set_active(&self, active: bool) -> bool {
        self.dispatch(MonitorEvent::SetActive(active)).await.is_active
    }

    pub async fn state(&self) -> MonitorState {
        self.state.read().await.clone()
    }

    pub async fn history(&self) -> Vec<Reading> {
        self.state.read().await.history.snapshot()
    }

    pub async fn set_clock(&self, now: DateTime<Utc>) {
        *self.clock.write().await = now;
    }

    pub async fn current_time(&self) -> DateTime<Utc> {
        *self.clock.read().await
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let current_time = self.current_time().await;
        let state = self.state.read().await;
        DashboardSnapshot::build(self.session_id, current_time, &state, &self.config)
    }
}

fn log_transition(prev: &MonitorState, next: &MonitorState, event: MonitorEvent) {
    match event {
        MonitorEvent::Tick { .. } => {
            debug!(
                version = next.version,
                temperature_c = next.reading.temperature,
                humidity_percent = next.reading.humidity,
                fan_on = next.fan_on,
                alert_level = %next.alert_level,
                history_len = next.history.len(),
                "simulation tick"
            );
            if next.alert_level != prev.alert_level {
                if next.alert_level == AlertLevel::Critical {
                    warn!(
                        from = %prev.alert_level,
                        temperature_c = next.reading.temperature,
                        humidity_percent = next.reading.humidity,
                        "alert level escalated to critical"
                    );
                } else {
                    info!(from = %prev.alert_level, to = %next.alert_level, "alert level changed");
                }
            }
        }
        MonitorEvent::ToggleFan | MonitorEvent::AutoFan => {
            info!(
                fan_on = next.fan_on,
                temperature_c = next.reading.temperature,
                auto = matches!(event, MonitorEvent::AutoFan),
                "fan state changed"
            );
        }
        MonitorEvent::SetActive(active) => {
            info!(active, "simulation activity changed");
        }
    }
}

/// Advances the simulation once per firing.
pub struct SimulationTick {
    monitor: Arc<Monitor>,
}

#[async_trait]
impl PeriodicTask for SimulationTick {
    fn name(&self) -> &'static str {
        "simulation_tick"
    }

    async fn run(&self) -> Result<()> {
        self.monitor.tick().await;
        Ok(())
    }
}

/// Refreshes the displayed wall clock. Has no effect on the simulation.
pub struct ClockTick {
    monitor: Arc<Monitor>,
}

#[async_trait]
impl PeriodicTask for ClockTick {
    fn name(&self) -> &'static str {
        "clock_tick"
    }

    async fn run(&self) -> Result<()> {
        self.monitor.set_clock(Utc::now()).await;
        Ok(())
    }
}

pub fn spawn_controller_tasks(state: &AppState, scheduler: &dyn Scheduler) -> Vec<TaskHandle> {
    let monitor = state.monitor.clone();
    let tick_period = Duration::from_millis(monitor.config().tick_interval_ms);
    let clock_period = Duration::from_millis(state.cfg.monitor.clock_interval_ms);

    vec![
        scheduler.schedule(
            tick_period,
            Arc::new(SimulationTick {
                monitor: monitor.clone(),
            }),
        ),
        scheduler.schedule(clock_period, Arc::new(ClockTick { monitor })),
    ]
}
