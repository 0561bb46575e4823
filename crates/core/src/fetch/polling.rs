//! Interval-driven re-execution of a fetch handle
//!
//! The poller owns its task: cancellation is explicit via [`Poller::stop`],
//! [`Poller::shutdown`] joins the task, and dropping the poller cancels it.
//! An in-flight fetch is allowed to finish; no further ticks are scheduled.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::handle::FetchHandle;

/// Background task calling [`FetchHandle::execute`] every `interval`
pub struct Poller {
    interval: Duration,
    cancellation: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling task. The first execution happens immediately.
    pub fn start<T, E>(fetch: FetchHandle<T, E>, interval: Duration) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + std::fmt::Display + 'static,
    {
        let cancellation = CancellationToken::new();
        let task = tokio::spawn(Self::run(fetch, interval, cancellation.clone()));
        debug!(interval_ms = interval.as_millis() as u64, "poller started");

        Self { interval, cancellation, task: Some(task) }
    }

    async fn run<T, E>(fetch: FetchHandle<T, E>, interval: Duration, cancel: CancellationToken)
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + std::fmt::Display + 'static,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(err) = fetch.execute().await {
                        warn!(error = %err, "poll fetch failed");
                    }
                }
            }
        }
        debug!("poller stopped");
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.cancellation.is_cancelled()
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop scheduling further executions.
    pub fn stop(&mut self) {
        self.cancellation.cancel();
    }

    /// Replace the polling task, e.g. after the interval or the fetch changed.
    pub fn restart<T, E>(&mut self, fetch: FetchHandle<T, E>, interval: Duration)
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + std::fmt::Display + 'static,
    {
        self.stop();
        *self = Self::start(fetch, interval);
    }

    /// Stop and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancellation.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "poller task ended abnormally");
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
