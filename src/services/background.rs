//! Bounded pool for detached work
//!
//! Each task runs on its own tokio task with its own timeout. Failures and
//! timeouts only reach the log. When the pool is full the task is dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{trace, warn};

use crate::errors::Result;
use crate::metrics::{MetricsRecorder, NoopMetrics};

#[derive(Clone)]
pub struct BackgroundTasks {
    permits: Arc<Semaphore>,
    capacity: u32,
    timeout: Duration,
    metrics: Arc<dyn MetricsRecorder>,
}

impl BackgroundTasks {
    pub fn new(max_in_flight: usize, timeout: Duration) -> Self {
        let capacity = u32::try_from(max_in_flight.max(1)).unwrap_or(u32::MAX);
        Self {
            permits: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
            timeout,
            metrics: NoopMetrics::arc(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Submit `task`. Returns `false` when the pool was saturated and the task
    /// was dropped.
    ///
    /// The task does not borrow from the caller, so dropping the caller's
    /// future does not cancel it.
    pub fn spawn<F>(&self, label: impl Into<String>, task: F) -> bool
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let label = label.into();
        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    "Background pool saturated ({} in flight), dropping task '{}'",
                    self.capacity, label
                );
                self.metrics.inc_background_dropped();
                return false;
            }
        };

        let timeout = self.timeout;
        tokio::spawn(async move {
            let _permit = permit;
            match tokio::time::timeout(timeout, task).await {
                Ok(Ok(())) => trace!("Background task '{}' finished", label),
                Ok(Err(e)) => warn!("Background task '{}' failed: {}", label, e),
                Err(_) => warn!("Background task '{}' timed out after {:?}", label, timeout),
            }
        });
        true
    }

    pub fn in_flight(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.permits.available_permits())
    }

    /// Wait until every task submitted so far has finished.
    pub async fn drain(&self) {
        if let Ok(all) = self.permits.acquire_many(self.capacity).await {
            drop(all);
        }
    }
}
