use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::services::BackgroundTasks;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, draining background tasks...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}

/// Wait for detached stats writes and notifications to finish.
pub async fn drain_background_tasks(tasks: &BackgroundTasks) {
    let pending = tasks.in_flight();
    if pending == 0 {
        return;
    }

    info!("Waiting for {} background tasks", pending);
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), tasks.drain()).await {
        Ok(()) => info!("All background tasks completed"),
        Err(_) => error!(
            "Background tasks still running after {} seconds, abandoning {}",
            SHUTDOWN_TIMEOUT_SECS,
            tasks.in_flight()
        ),
    }
}
