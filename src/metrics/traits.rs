//! MetricsRecorder trait for dependency injection

use std::sync::Arc;

/// Trait for recording application metrics.
///
/// All methods are no-op by default. Implementations must be thread-safe.
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync {
    // ===== Links =====

    fn inc_link_created(&self) {}

    /// `result` is one of `success`, `not_found`, `error`
    fn inc_resolve(&self, result: &str) {}

    // ===== Cache =====

    fn inc_cache_hit(&self, cache: &str) {}

    /// Also counted when the cache errored or timed out.
    fn inc_cache_miss(&self, cache: &str) {}

    // ===== Background work =====

    /// A detached task was dropped because the pool was full.
    fn inc_background_dropped(&self) {}

    /// A stats write, read or cleanup failed and was swallowed.
    fn inc_stats_failure(&self, operation: &str) {}
}

/// Records nothing. Default for services built without a registry.
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {}

impl NoopMetrics {
    pub fn arc() -> Arc<dyn MetricsRecorder> {
        Arc::new(Self)
    }
}
