//! HTTP adapter
//!
//! Handlers only translate requests into service calls and encode results.

pub mod helpers;
pub mod services;
pub mod types;
