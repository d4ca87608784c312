//! Middleware wrapped around every dispatched action.
//!
//! - [`TracingMiddleware`] logs each request and tags the response with its id
//! - [`MetricsMiddleware`] counts requests, status classes and latency

mod core;
mod metrics;
mod tracing;

pub use core::Middleware;
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
