//! Prometheus metrics
//!
//! Services record through `MetricsRecorder`; the HTTP layer exports the
//! `PrometheusMetrics` registry at `/metrics`.

mod registry;
mod system;
mod traits;

pub use registry::PrometheusMetrics;
pub use traits::{MetricsRecorder, NoopMetrics};
