//! Application lifecycle
//!
//! - `lifetime`: wiring collaborators at startup, draining at shutdown
//! - `modes`: execution modes (HTTP server)

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
