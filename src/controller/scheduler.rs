use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Work executed on every firing of a periodic timer.
#[async_trait]
pub trait PeriodicTask: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    async fn run(&self) -> Result<()>;
}

/// Registers periodic tasks and hands back a handle that cancels them.
pub trait Scheduler {
    fn schedule(&self, interval: Duration, task: Arc<dyn PeriodicTask>) -> TaskHandle;
}

/// Task status tracking
#[derive(Debug, Clone, Default)]
pub struct TaskStatus {
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub run_count: u64,
    pub success_count: u64,
    pub error_count: u64,
}

impl TaskStatus {
    fn record(&mut self, started: DateTime<Utc>, result: &Result<()>) {
        self.last_run = Some(started);
        self.run_count += 1;
        match result {
            Ok(()) => {
                self.last_success = Some(started);
                self.success_count += 1;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.error_count += 1;
            }
        }
    }
}

/// Cancellation handle for a scheduled task.
pub struct TaskHandle {
    name: &'static str,
    token: CancellationToken,
    status: Arc<RwLock<TaskStatus>>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop future firings. A run already in progress completes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn status(&self) -> TaskStatus {
        self.status.read().await.clone()
    }

    /// Cancel and wait for the task loop to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            warn!(task = self.name, error = %e, "periodic task ended abnormally");
        }
    }
}

/// Scheduler backed by tokio intervals.
///
/// The first firing happens one full interval after scheduling. Firings missed
/// while a run is still in progress are skipped, never replayed.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    root: CancellationToken,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every task scheduled through this scheduler.
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, task: Arc<dyn PeriodicTask>) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        let token = self.root.child_token();
        let status = Arc::new(RwLock::new(TaskStatus::default()));
        let name = task.name();

        let loop_token = token.clone();
        let loop_status = status.clone();
        let join = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(task = name, period_ms = period.as_millis() as u64, "periodic task started");

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let started = Utc::now();
                        let result = task.run().await;
                        if let Err(e) = &result {
                            warn!(task = name, error = %e, "periodic task failed");
                        }
                        loop_status.write().await.record(started, &result);
                    }
                }
            }

            debug!(task = name, "periodic task stopped");
        });

        TaskHandle {
            name,
            token,
            status,
            join,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Counter {
        hits: AtomicU64,
        fail: bool,
    }

    #[async_trait]
    impl PeriodicTask for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn run(&self) -> Result<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    fn counter(fail: bool) -> Arc<Counter> {
        Arc::new(Counter {
            hits: AtomicU64::new(0),
            fail,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_every_interval() {
        let scheduler = TokioScheduler::new();
        let task = counter(false);
        let handle = scheduler.schedule(Duration::from_secs(2), task.clone());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(task.hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(4200)).await;
        assert_eq!(task.hits.load(Ordering::SeqCst), 3);

        let status = handle.status().await;
        assert_eq!(status.run_count, 3);
        assert_eq!(status.success_count, 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_future_runs() {
        let scheduler = TokioScheduler::new();
        let task = counter(false);
        let handle = scheduler.schedule(Duration::from_secs(1), task.clone());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        let seen = task.hits.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(task.hits.load(Ordering::SeqCst), seen);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_recorded_and_loop_continues() {
        let scheduler = TokioScheduler::new();
        let task = counter(true);
        let handle = scheduler.schedule(Duration::from_secs(1), task.clone());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let status = handle.status().await;
        assert_eq!(status.error_count, 3);
        assert_eq!(status.last_error.as_deref(), Some("boom"));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_shutdown_cancels_children() {
        let scheduler = TokioScheduler::new();
        let a = scheduler.schedule(Duration::from_secs(1), counter(false));
        let b = scheduler.schedule(Duration::from_secs(2), counter(false));

        scheduler.shutdown();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        a.shutdown().await;
        b.shutdown().await;
    }
}
