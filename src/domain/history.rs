use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Reading;

/// Default number of readings retained for charts and export.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Rolling window of the most recent readings, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Append the newest reading, evicting the oldest ones beyond capacity.
    pub fn append(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Chronological copy of the buffer contents.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.iter().copied().collect()
    }

    /// Mean temperature and humidity over the whole window.
    pub fn aggregate(&self) -> SessionStats {
        if self.readings.is_empty() {
            return SessionStats::default();
        }

        let (temp_sum, humidity_sum) = self
            .readings
            .iter()
            .fold((0.0, 0.0), |(t, h), r| (t + r.temperature, h + r.humidity));
        let count = self.readings.len();

        SessionStats {
            avg_temperature: temp_sum / count as f64,
            avg_humidity: humidity_sum / count as f64,
            count,
        }
    }
}

/// Aggregate statistics over the history window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn reading_at(seconds: i64, temperature: f64, humidity: f64) -> Reading {
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        Reading::new(start + Duration::seconds(seconds), temperature, humidity)
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut buffer = HistoryBuffer::new(3);
        for i in 0..5 {
            buffer.append(reading_at(i * 2, 20.0 + i as f64, 60.0));
        }

        assert_eq!(buffer.len(), 3);
        let temps: Vec<f64> = buffer.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![22.0, 23.0, 24.0]);
        assert_eq!(buffer.latest().unwrap().temperature, 24.0);
    }

    #[test]
    fn test_default_capacity() {
        let mut buffer = HistoryBuffer::default();
        assert_eq!(buffer.capacity(), 50);
        for i in 0..60 {
            buffer.append(reading_at(i, 25.0, 60.0));
        }
        assert_eq!(buffer.len(), 50);
        assert_eq!(buffer.snapshot()[0].timestamp, reading_at(10, 0.0, 0.0).timestamp);
    }

    #[test]
    fn test_aggregate_empty() {
        let buffer = HistoryBuffer::new(10);
        assert_eq!(buffer.aggregate(), SessionStats::default());
        assert_eq!(buffer.aggregate().count, 0);
    }

    #[test]
    fn test_aggregate_identical_readings() {
        let mut buffer = HistoryBuffer::new(10);
        for i in 0..4 {
            buffer.append(reading_at(i, 26.5, 63.0));
        }

        let stats = buffer.aggregate();
        assert!((stats.avg_temperature - 26.5).abs() < 1e-12);
        assert!((stats.avg_humidity - 63.0).abs() < 1e-12);
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_aggregate_mean() {
        let mut buffer = HistoryBuffer::new(10);
        buffer.append(reading_at(0, 20.0, 50.0));
        buffer.append(reading_at(2, 30.0, 70.0));

        let stats = buffer.aggregate();
        assert_eq!(stats.avg_temperature, 25.0);
        assert_eq!(stats.avg_humidity, 60.0);
        assert_eq!(stats.count, 2);
    }

    proptest! {
        #[test]
        fn prop_keeps_last_capacity_in_order(capacity in 1usize..64, extra in 1usize..64) {
            let mut buffer = HistoryBuffer::new(capacity);
            let total = capacity + extra;
            for i in 0..total {
                buffer.append(reading_at(i as i64, i as f64, 50.0));
                prop_assert!(buffer.len() <= capacity);
            }

            let kept: Vec<f64> = buffer.iter().map(|r| r.temperature).collect();
            let expected: Vec<f64> = (extra..total).map(|i| i as f64).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
