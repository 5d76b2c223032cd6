//! Lightweight in-process metrics (dependency-free).
//!
//! Counters are stored as atomics keyed by sorted label pairs and rendered in
//! Prometheus text format.

pub mod metrics;

pub use metrics::{CounterVec, FocusMetrics};
