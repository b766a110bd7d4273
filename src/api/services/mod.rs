pub mod health;
pub mod links;
pub mod metrics;
pub mod redirect;
pub mod stats;

pub use health::{AppStartTime, HealthService, health_routes};
pub use links::{LinkHandlers, link_routes};
pub use metrics::{MetricsService, metrics_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use stats::{StatsHandlers, stats_routes};
