//! Utility modules shared across the crate.
//!
//! - http: retrying HTTP client construction
//! - logging: tracing setup and the error context
//! - metrics: Prometheus registry and metrics endpoint
//! - parsing: string helpers
//! - tests: builders and helpers for tests

pub mod http;
pub mod logging;
pub mod metrics;
pub mod parsing;

pub use http::*;
pub use parsing::*;
