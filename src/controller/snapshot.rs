use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::MonitorState;
use crate::domain::{
    advisories, humidity_level, storage_quality, temperature_level, Advisory, AlertLevel,
    Reading, SessionStats, StorageQuality,
};
use crate::simulation::SimulationConfig;

/// One metric tile of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MetricCard {
    pub value: f64,
    pub unit: &'static str,
    pub target: f64,
    pub level: AlertLevel,
    pub label: &'static str,
}

impl MetricCard {
    fn new(value: f64, unit: &'static str, target: f64, level: AlertLevel) -> Self {
        Self {
            value,
            unit,
            target,
            level,
            label: level.metric_label(),
        }
    }
}

/// Everything a dashboard needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub session_id: Uuid,
    pub version: u64,
    pub current_time: DateTime<Utc>,
    pub reading: Reading,
    pub fan_on: bool,
    pub fan_status: &'static str,
    pub is_active: bool,
    pub alert_level: AlertLevel,
    pub status_text: &'static str,
    pub system_health: &'static str,
    pub temperature: MetricCard,
    pub humidity: MetricCard,
    pub advisories: Vec<Advisory>,
    pub storage_quality: StorageQuality,
    pub stats: SessionStats,
}

impl DashboardSnapshot {
    pub fn build(
        session_id: Uuid,
        current_time: DateTime<Utc>,
        state: &MonitorState,
        config: &SimulationConfig,
    ) -> Self {
        let reading = state.reading;
        Self {
            session_id,
            version: state.version,
            current_time,
            reading,
            fan_on: state.fan_on,
            fan_status: fan_status_text(state.fan_on),
            is_active: state.is_active,
            alert_level: state.alert_level,
            status_text: state.alert_level.status_text(),
            system_health: state.alert_level.health_label(),
            temperature: MetricCard::new(
                reading.temperature,
                "°C",
                config.target_temp,
                temperature_level(reading.temperature),
            ),
            humidity: MetricCard::new(
                reading.humidity,
                "%",
                config.target_humidity,
                humidity_level(reading.humidity),
            ),
            advisories: advisories(&reading),
            storage_quality: storage_quality(&reading),
            stats: state.history.aggregate(),
        }
    }
}

pub fn fan_status_text(fan_on: bool) -> &'static str {
    if fan_on {
        "Cooling system active"
    } else {
        "System in standby"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_initial_state() {
        let now = Utc::now();
        let state = MonitorState::new(Reading::initial(now), 50, true);
        let snap = DashboardSnapshot::build(Uuid::nil(), now, &state, &SimulationConfig::default());

        assert_eq!(snap.alert_level, AlertLevel::Safe);
        assert_eq!(snap.status_text, "Optimal Storage Conditions");
        assert_eq!(snap.system_health, "Healthy");
        assert_eq!(snap.fan_status, "System in standby");
        assert_eq!(snap.temperature.value, 28.5);
        assert_eq!(snap.temperature.target, 25.0);
        assert_eq!(snap.temperature.label, "Optimal");
        assert_eq!(snap.humidity.target, 60.0);
        assert_eq!(snap.stats, SessionStats::default());
        // 28.5 °C is far above the advisory scale
        assert_eq!(snap.advisories[0].severity, AlertLevel::Critical);
        assert_eq!(snap.storage_quality, StorageQuality::Poor);
    }

    #[test]
    fn test_metric_cards_classify_independently() {
        let now = Utc::now();
        let state = MonitorState::new(Reading::new(now, 25.0, 71.0), 50, true);
        let snap = DashboardSnapshot::build(Uuid::nil(), now, &state, &SimulationConfig::default());

        assert_eq!(snap.alert_level, AlertLevel::Warning);
        assert_eq!(snap.temperature.level, AlertLevel::Safe);
        assert_eq!(snap.humidity.level, AlertLevel::Warning);
        assert_eq!(snap.humidity.label, "Warning");
    }
}
