//! Shortstat - URL shortener with best-effort link analytics
//!
//! Short codes resolve through a look-aside cache in front of a durable link
//! store. Analytics events are recorded on the side and never decide whether
//! a link operation succeeds.
//!
//! # Architecture
//! - `services`: link and stats orchestration, background task pool
//! - `storage`: link/stats store traits, SeaORM and in-memory backends
//! - `cache`: lookup cache trait, moka/redis/null implementations
//! - `notify`: link-creation announcements
//! - `metrics`: Prometheus registry
//! - `api`: HTTP handlers
//! - `config`: configuration loading
//! - `runtime`: application lifecycle
//! - `system`: logging

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod notify;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
