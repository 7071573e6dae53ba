//! Threshold-based alert classification.
//!
//! Two independent threshold families exist:
//! - the headline severity (30/32 °C, 70/72 %RH) drives the status banner and
//!   the metric cards,
//! - the advisory tier (6/8 °C, 80/90 %RH) drives the itemised alert list and the
//!   storage quality rating.
//!
//! They are intentionally kept apart; changing either set changes what operators see.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::Reading;

/// Headline temperature thresholds (°C)
pub const TEMP_WARNING_C: f64 = 30.0;
pub const TEMP_CRITICAL_C: f64 = 32.0;
/// Headline humidity thresholds (%RH)
pub const HUMIDITY_WARNING_PERCENT: f64 = 70.0;
pub const HUMIDITY_CRITICAL_PERCENT: f64 = 72.0;

/// Advisory temperature thresholds (°C)
pub const ADVISORY_TEMP_WARNING_C: f64 = 6.0;
pub const ADVISORY_TEMP_CRITICAL_C: f64 = 8.0;
/// Advisory humidity thresholds (%RH)
pub const ADVISORY_HUMIDITY_WARNING_PERCENT: f64 = 80.0;
pub const ADVISORY_HUMIDITY_CRITICAL_PERCENT: f64 = 90.0;
/// Upper limits (inclusive) for an excellent storage rating
pub const EXCELLENT_TEMP_MAX_C: f64 = 4.0;
pub const EXCELLENT_HUMIDITY_MAX_PERCENT: f64 = 70.0;

/// Severity tier, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Safe,
    Warning,
    Critical,
}

impl AlertLevel {
    /// Banner text shown for the headline level.
    pub fn status_text(&self) -> &'static str {
        match self {
            AlertLevel::Safe => "Optimal Storage Conditions",
            AlertLevel::Warning => "Monitoring Required",
            AlertLevel::Critical => "Immediate Action Required",
        }
    }

    /// Label used by the system health indicator.
    pub fn health_label(&self) -> &'static str {
        match self {
            AlertLevel::Safe => "Healthy",
            AlertLevel::Warning => "Warning",
            AlertLevel::Critical => "Critical",
        }
    }

    /// Label used on a single metric card.
    pub fn metric_label(&self) -> &'static str {
        match self {
            AlertLevel::Safe => "Optimal",
            AlertLevel::Warning => "Warning",
            AlertLevel::Critical => "Critical",
        }
    }
}

fn tier(value: f64, warning: f64, critical: f64) -> AlertLevel {
    if value > critical {
        AlertLevel::Critical
    } else if value > warning {
        AlertLevel::Warning
    } else {
        AlertLevel::Safe
    }
}

/// Headline level of the temperature alone.
pub fn temperature_level(temperature: f64) -> AlertLevel {
    tier(temperature, TEMP_WARNING_C, TEMP_CRITICAL_C)
}

/// Headline level of the humidity alone.
pub fn humidity_level(humidity: f64) -> AlertLevel {
    tier(humidity, HUMIDITY_WARNING_PERCENT, HUMIDITY_CRITICAL_PERCENT)
}

/// Headline severity: worst of the per-variable levels.
pub fn classify(reading: &Reading) -> AlertLevel {
    temperature_level(reading.temperature).max(humidity_level(reading.humidity))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
    System,
}

/// One entry of the itemised alert list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub severity: AlertLevel,
    pub metric: Metric,
    pub message: String,
    pub recommended_action: String,
}

impl Advisory {
    fn new(severity: AlertLevel, metric: Metric, message: &str, action: &str) -> Self {
        Self {
            severity,
            metric,
            message: message.to_string(),
            recommended_action: action.to_string(),
        }
    }
}

/// Itemised advisories on the secondary threshold family.
///
/// Temperature and humidity each raise at most one advisory; when neither does,
/// a single safe entry is returned so the list is never empty.
pub fn advisories(reading: &Reading) -> Vec<Advisory> {
    let mut alerts = Vec::with_capacity(2);

    if reading.temperature > ADVISORY_TEMP_CRITICAL_C {
        alerts.push(Advisory::new(
            AlertLevel::Critical,
            Metric::Temperature,
            "Temperature critically high",
            "Activate cooling immediately",
        ));
    } else if reading.temperature > ADVISORY_TEMP_WARNING_C {
        alerts.push(Advisory::new(
            AlertLevel::Warning,
            Metric::Temperature,
            "Temperature elevated",
            "Monitor closely",
        ));
    }

    if reading.humidity > ADVISORY_HUMIDITY_CRITICAL_PERCENT {
        alerts.push(Advisory::new(
            AlertLevel::Critical,
            Metric::Humidity,
            "Humidity critically high",
            "Improve ventilation",
        ));
    } else if reading.humidity > ADVISORY_HUMIDITY_WARNING_PERCENT {
        alerts.push(Advisory::new(
            AlertLevel::Warning,
            Metric::Humidity,
            "Humidity elevated",
            "Check ventilation",
        ));
    }

    if alerts.is_empty() {
        alerts.push(Advisory::new(
            AlertLevel::Safe,
            Metric::System,
            "All systems normal",
            "Continue monitoring",
        ));
    }

    alerts
}

/// Overall storage rating shown in the reports panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum StorageQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

pub fn storage_quality(reading: &Reading) -> StorageQuality {
    let (t, h) = (reading.temperature, reading.humidity);
    if t > ADVISORY_TEMP_CRITICAL_C || h > ADVISORY_HUMIDITY_CRITICAL_PERCENT {
        StorageQuality::Poor
    } else if t > ADVISORY_TEMP_WARNING_C || h > ADVISORY_HUMIDITY_WARNING_PERCENT {
        StorageQuality::Fair
    } else if t <= EXCELLENT_TEMP_MAX_C && h <= EXCELLENT_HUMIDITY_MAX_PERCENT {
        StorageQuality::Excellent
    } else {
        StorageQuality::Good
    }
}
