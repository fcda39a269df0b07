//! Service metrics: process-wide counters with Prometheus exposition.
//!
//! Counters are monotonic for the lifetime of the process and reset only on
//! restart. The durable per-request aggregates live in the prediction store;
//! this module only covers the in-process view.

mod metrics;

pub use metrics::{ServiceMetrics, PROMETHEUS_CONTENT_TYPE};
