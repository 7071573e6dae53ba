//! # Onion Storage Monitor
//!
//! Simulated climate monitoring for an onion storage room: a drift simulation of
//! temperature and humidity, threshold alerting, a rolling session history, a
//! simulated fan actuator and CSV export, served over a small HTTP API.

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod export;
pub mod simulation;
pub mod telemetry;
