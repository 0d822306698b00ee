//! Metrics sink boundary.
use derive_more::Display;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ExecKind {
    #[display("load")]
    Load,
    #[display("count")]
    Count,
    #[display("insert")]
    Insert,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    ExecStart {
        kind: ExecKind,
        entity: &'a str,
    },
    ExecFinish {
        kind: ExecKind,
        entity: &'a str,
        rows: u64,
    },
    RowsScanned {
        entity: &'a str,
        rows: u64,
    },
    QueryRejected {
        entity: &'a str,
    },
}

///
/// MetricsSink
///
/// Receives execution events. Implementations must be cheap to call; the
/// compiler records events synchronously on the calling thread.
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// NoopMetricsSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _: MetricsEvent<'_>) {}
}

/// Span
/// RAII guard that emits start/finish events for one compiler operation.
/// Finish accounting happens on drop, so early returns are still counted.

pub(crate) struct Span<'a> {
    sink: &'a dyn MetricsSink,
    kind: ExecKind,
    entity: String,
    rows: u64,
}

impl<'a> Span<'a> {
    #[must_use]
    pub(crate) fn new(sink: &'a dyn MetricsSink, kind: ExecKind, entity: &str) -> Self {
        sink.record(MetricsEvent::ExecStart { kind, entity });

        Self {
            sink,
            kind,
            entity: entity.to_string(),
            rows: 0,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }

    pub(crate) const fn add_row(&mut self) {
        self.rows = self.rows.saturating_add(1);
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        self.sink.record(MetricsEvent::ExecFinish {
            kind: self.kind,
            entity: &self.entity,
            rows: self.rows,
        });
    }
}

///
/// TESTS
///
