//! Service layer
//!
//! Transport-agnostic business logic shared by the HTTP handlers.

mod background;
mod link_service;
mod stats_service;

use std::future::Future;
use std::time::Duration;

pub use background::BackgroundTasks;
pub use link_service::{LinkService, LinkServiceSettings};
pub use stats_service::StatsService;

use crate::errors::{Result, ShortstatError};

/// Bound a store call. An elapsed deadline becomes `Timeout`.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, op: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| ShortstatError::timeout(format!("{} exceeded {:?}", op, deadline)))?
}
