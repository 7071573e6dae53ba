use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use validator::Validate;

use crate::domain::DEFAULT_HISTORY_CAPACITY;
use crate::telemetry::LoggingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {section} configuration: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: validator::ValidationErrors,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 10,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Runtime settings of the monitor. The drift model itself is not configurable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitorSettings {
    /// Number of readings kept for charts and export
    #[validate(range(min = 1, max = 10000))]
    pub history_capacity: usize,
    /// Period of the displayed wall clock
    #[validate(range(min = 100, max = 60000))]
    pub clock_interval_ms: u64,
    /// Fixed seed for reproducible sessions
    pub random_seed: Option<u64>,
    /// Whether the simulation runs right after startup
    pub start_active: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            clock_interval_ms: 1000,
            random_seed: None,
            start_active: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("OSM__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate().map_err(|source| ConfigError::Invalid {
            section: "server",
            source,
        })?;
        self.monitor.validate().map_err(|source| ConfigError::Invalid {
            section: "monitor",
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.monitor.history_capacity, 50);
        assert_eq!(cfg.monitor.clock_interval_ms, 1000);
        assert!(cfg.monitor.start_active);
        assert_eq!(cfg.server.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(
            r#"
            [server]
            port = 9090

            [monitor]
            history_capacity = 120
            random_seed = 42

            [logging]
            format = "pretty"
            "#,
        ));
        let cfg = Config::from_figment(figment).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.monitor.history_capacity, 120);
        assert_eq!(cfg.monitor.random_seed, Some(42));
        assert_eq!(cfg.logging.format, crate::telemetry::LogFormat::Pretty);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(
            r#"
            [monitor]
            history_capacity = 0
            "#,
        ));
        let err = Config::from_figment(figment).unwrap_err();
        assert!(err.to_string().contains("monitor"));
    }
}
