//! Prometheus registry owned by the server
//!
//! Built once at startup and shared as `Arc<PrometheusMetrics>`; there is no
//! global instance.

use prometheus::{Counter, CounterVec, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use super::system::ProcessSampler;
use super::traits::MetricsRecorder;
use crate::errors::{Result, ShortstatError};

pub struct PrometheusMetrics {
    registry: Registry,

    // ===== Links =====
    links_created_total: Counter,
    resolves_total: CounterVec,

    // ===== Cache =====
    cache_hits_total: CounterVec,
    cache_misses_total: CounterVec,

    // ===== Background work =====
    background_tasks_dropped_total: Counter,
    background_tasks_in_flight: Gauge,
    stats_failures_total: CounterVec,

    // ===== Process =====
    uptime_seconds: Gauge,
    process_memory_bytes: GaugeVec,
    process_cpu_seconds: Gauge,

    process: ProcessSampler,
}

impl PrometheusMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let links_created_total = Counter::new(
            "shortstat_links_created_total",
            "Total number of short links created",
        )?;
        let resolves_total = CounterVec::new(
            Opts::new("shortstat_resolves_total", "Total code resolutions by result"),
            &["result"],
        )?;
        let cache_hits_total = CounterVec::new(
            Opts::new("shortstat_cache_hits_total", "Total lookup cache hits"),
            &["cache"],
        )?;
        let cache_misses_total = CounterVec::new(
            Opts::new(
                "shortstat_cache_misses_total",
                "Total lookup cache misses, including cache errors",
            ),
            &["cache"],
        )?;
        let background_tasks_dropped_total = Counter::new(
            "shortstat_background_tasks_dropped_total",
            "Detached tasks dropped because the pool was saturated",
        )?;
        let background_tasks_in_flight = Gauge::new(
            "shortstat_background_tasks_in_flight",
            "Detached tasks currently running",
        )?;
        let stats_failures_total = CounterVec::new(
            Opts::new(
                "shortstat_stats_failures_total",
                "Swallowed stats store failures by operation",
            ),
            &["operation"],
        )?;
        let uptime_seconds = Gauge::new("shortstat_uptime_seconds", "Server uptime in seconds")?;
        let process_memory_bytes = GaugeVec::new(
            Opts::new("shortstat_process_memory_bytes", "Process memory by type"),
            &["type"],
        )?;
        let process_cpu_seconds = Gauge::new(
            "shortstat_process_cpu_seconds_total",
            "Accumulated process CPU time in seconds",
        )?;

        registry.register(Box::new(links_created_total.clone()))?;
        registry.register(Box::new(resolves_total.clone()))?;
        registry.register(Box::new(cache_hits_total.clone()))?;
        registry.register(Box::new(cache_misses_total.clone()))?;
        registry.register(Box::new(background_tasks_dropped_total.clone()))?;
        registry.register(Box::new(background_tasks_in_flight.clone()))?;
        registry.register(Box::new(stats_failures_total.clone()))?;
        registry.register(Box::new(uptime_seconds.clone()))?;
        registry.register(Box::new(process_memory_bytes.clone()))?;
        registry.register(Box::new(process_cpu_seconds.clone()))?;

        Ok(Self {
            registry,
            links_created_total,
            resolves_total,
            cache_hits_total,
            cache_misses_total,
            background_tasks_dropped_total,
            background_tasks_in_flight,
            stats_failures_total,
            uptime_seconds,
            process_memory_bytes,
            process_cpu_seconds,
            process: ProcessSampler::new(),
        })
    }

    /// Refresh the gauges that are sampled rather than counted.
    pub fn refresh(&self, uptime_seconds: u64, background_in_flight: usize) {
        self.uptime_seconds.set(uptime_seconds as f64);
        self.background_tasks_in_flight
            .set(background_in_flight as f64);

        if let Some(sample) = self.process.sample() {
            self.process_memory_bytes
                .with_label_values(&["rss"])
                .set(sample.rss_bytes as f64);
            self.process_memory_bytes
                .with_label_values(&["virtual"])
                .set(sample.virtual_bytes as f64);
            self.process_cpu_seconds.set(sample.cpu_seconds);
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ShortstatError::serialization(format!("Failed to encode metrics: {}", e)))?;
        String::from_utf8(buffer)
            .map_err(|e| ShortstatError::serialization(format!("Metrics output is not UTF-8: {}", e)))
    }
}

impl MetricsRecorder for PrometheusMetrics {
    fn inc_link_created(&self) {
        self.links_created_total.inc();
    }

    fn inc_resolve(&self, result: &str) {
        self.resolves_total.with_label_values(&[result]).inc();
    }

    fn inc_cache_hit(&self, cache: &str) {
        self.cache_hits_total.with_label_values(&[cache]).inc();
    }

    fn inc_cache_miss(&self, cache: &str) {
        self.cache_misses_total.with_label_values(&[cache]).inc();
    }

    fn inc_background_dropped(&self) {
        self.background_tasks_dropped_total.inc();
    }

    fn inc_stats_failure(&self, operation: &str) {
        self.stats_failures_total
            .with_label_values(&[operation])
            .inc();
    }
}
