#![cfg(test)]
//! Concurrency tests for the monitor
//!
//! Many readers poll the monitor while ticks, fan commands and activity changes
//! are applied concurrently. Every observed state must be internally consistent:
//! - the newest history entry is the previously committed reading, stamped
//!   with the same tick time as the current reading
//! - the alert level matches the current reading
//! - history never exceeds its capacity
//! - values stay inside the simulation bounds

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use onion_storage_monitor::config::MonitorSettings;
use onion_storage_monitor::controller::{Monitor, MonitorState};
use onion_storage_monitor::domain::classify;
use onion_storage_monitor::simulation::{SeededRandom, SimulationConfig};

fn monitor(capacity: usize) -> Arc<Monitor> {
    let settings = MonitorSettings {
        history_capacity: capacity,
        random_seed: Some(7),
        ..MonitorSettings::default()
    };
    Arc::new(Monitor::new(
        SimulationConfig::default(),
        &settings,
        Box::new(SeededRandom::new(settings.random_seed)),
    ))
}

fn assert_consistent(state: &MonitorState, capacity: usize) {
    let cfg = SimulationConfig::default();
    assert!(state.history.len() <= capacity);
    assert_eq!(state.alert_level, classify(&state.reading));
    assert!(cfg.temp_bounds.contains(state.reading.temperature));
    assert!(cfg.humidity_bounds.contains(state.reading.humidity));
    if let Some(latest) = state.history.latest() {
        assert_eq!(latest.timestamp, state.reading.timestamp);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_see_consistent_state() {
    const CAPACITY: usize = 20;
    let monitor = monitor(CAPACITY);
    let mut set = JoinSet::new();

    for _ in 0..8 {
        let m = monitor.clone();
        set.spawn(async move {
            for _ in 0..200 {
                let state = m.state().await;
                assert_consistent(&state, CAPACITY);
                tokio::task::yield_now().await;
            }
        });
    }

    let writer = monitor.clone();
    set.spawn(async move {
        for i in 0..300u32 {
            let before = writer.state().await.reading;
            let next = writer.tick().await;
            let recorded = next.history.latest().copied().expect("tick records history");
            assert_eq!(recorded.temperature, before.temperature);
            assert_eq!(recorded.humidity, before.humidity);
            if i % 17 == 0 {
                writer.toggle_fan().await;
            }
            if i % 29 == 0 {
                writer.auto_fan().await;
            }
            tokio::task::yield_now().await;
        }
    });

    while let Some(result) = set.join_next().await {
        result.expect("task panicked");
    }

    let final_state = monitor.state().await;
    assert_consistent(&final_state, CAPACITY);
    assert_eq!(final_state.history.len(), CAPACITY);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_versions_are_strictly_ordered() {
    let monitor = monitor(50);
    let mut set = JoinSet::new();

    for _ in 0..4 {
        let m = monitor.clone();
        set.spawn(async move {
            let mut versions = Vec::new();
            for _ in 0..50 {
                versions.push(m.tick().await.version);
            }
            versions
        });
    }

    let mut all = Vec::new();
    while let Some(result) = set.join_next().await {
        let versions = result.expect("task panicked");
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        all.extend(versions);
    }

    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 200);
    assert_eq!(monitor.state().await.version, 200);
}

#[tokio::test]
#[ignore]
async fn test_tick_latency_under_read_load() {
    let monitor = monitor(50);
    let mut set = JoinSet::new();

    for _ in 0..50 {
        let m = monitor.clone();
        set.spawn(async move {
            for _ in 0..1000 {
                let _ = m.snapshot().await;
            }
        });
    }

    let start = Instant::now();
    for _ in 0..100 {
        monitor.tick().await;
    }
    let elapsed = start.elapsed();

    while set.join_next().await.is_some() {}

    println!("100 ticks under read load: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(1));
}
