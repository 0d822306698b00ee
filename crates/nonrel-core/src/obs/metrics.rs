use crate::obs::sink::{ExecKind, MetricsEvent, MetricsSink};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// CountingMetricsSink
///
/// Process-local counters keyed by execution kind.
/// Entity names are not retained; use a custom sink for per-entity breakdowns.
///

#[derive(Debug, Default)]
pub struct CountingMetricsSink {
    load_calls: AtomicU64,
    count_calls: AtomicU64,
    insert_calls: AtomicU64,
    update_calls: AtomicU64,
    delete_calls: AtomicU64,
    rows_loaded: AtomicU64,
    rows_deleted: AtomicU64,
    rows_scanned: AtomicU64,
    queries_rejected: AtomicU64,
}

impl CountingMetricsSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let read = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        MetricsSnapshot {
            load_calls: read(&self.load_calls),
            count_calls: read(&self.count_calls),
            insert_calls: read(&self.insert_calls),
            update_calls: read(&self.update_calls),
            delete_calls: read(&self.delete_calls),
            rows_loaded: read(&self.rows_loaded),
            rows_deleted: read(&self.rows_deleted),
            rows_scanned: read(&self.rows_scanned),
            queries_rejected: read(&self.queries_rejected),
        }
    }

    /// Reset every counter to zero.
    pub fn reset(&self) {
        for counter in [
            &self.load_calls,
            &self.count_calls,
            &self.insert_calls,
            &self.update_calls,
            &self.delete_calls,
            &self.rows_loaded,
            &self.rows_deleted,
            &self.rows_scanned,
            &self.queries_rejected,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    const fn calls(&self, kind: ExecKind) -> &AtomicU64 {
        match kind {
            ExecKind::Load => &self.load_calls,
            ExecKind::Count => &self.count_calls,
            ExecKind::Insert => &self.insert_calls,
            ExecKind::Update => &self.update_calls,
            ExecKind::Delete => &self.delete_calls,
        }
    }
}

impl MetricsSink for CountingMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ExecStart { kind, .. } => {
                self.calls(kind).fetch_add(1, Ordering::Relaxed);
            }
            MetricsEvent::ExecFinish { kind, rows, .. } => match kind {
                ExecKind::Load => {
                    self.rows_loaded.fetch_add(rows, Ordering::Relaxed);
                }
                ExecKind::Delete => {
                    self.rows_deleted.fetch_add(rows, Ordering::Relaxed);
                }
                ExecKind::Count | ExecKind::Insert | ExecKind::Update => {}
            },
            MetricsEvent::RowsScanned { rows, .. } => {
                self.rows_scanned.fetch_add(rows, Ordering::Relaxed);
            }
            MetricsEvent::QueryRejected { .. } => {
                self.queries_rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

///
/// MetricsSnapshot
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub load_calls: u64,
    pub count_calls: u64,
    pub insert_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,
    pub rows_loaded: u64,
    pub rows_deleted: u64,
    pub rows_scanned: u64,
    pub queries_rejected: u64,
}

///
/// TESTS
///
