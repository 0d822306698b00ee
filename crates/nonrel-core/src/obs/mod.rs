//! Observability: the metrics sink boundary and a counting sink.
//!
//! Query execution never touches counters directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

mod metrics;
mod sink;

// re-exports
pub use metrics::{CountingMetricsSink, MetricsSnapshot};
pub use sink::{ExecKind, MetricsEvent, MetricsSink, NoopMetricsSink};

pub(crate) use sink::Span;
