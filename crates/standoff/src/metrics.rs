use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::Conversion;

pub struct Metrics {
    // Documents
    documents_converted: AtomicUsize,
    documents_failed: AtomicUsize,

    // Output
    entities_emitted: AtomicUsize,
    relations_emitted: AtomicUsize,
    relations_dropped: AtomicUsize,

    // Repair
    spans_relocated: AtomicUsize,
    entities_unresolved: AtomicUsize,

    // Timing (in microseconds)
    total_convert_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            documents_converted: AtomicUsize::new(0),
            documents_failed: AtomicUsize::new(0),
            entities_emitted: AtomicUsize::new(0),
            relations_emitted: AtomicUsize::new(0),
            relations_dropped: AtomicUsize::new(0),
            spans_relocated: AtomicUsize::new(0),
            entities_unresolved: AtomicUsize::new(0),
            total_convert_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_conversion(&self, conversion: &Conversion, duration: Duration) {
        self.documents_converted.fetch_add(1, Ordering::Relaxed);
        self.total_convert_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        let document = &conversion.document;
        self.entities_emitted
            .fetch_add(document.entities.len(), Ordering::Relaxed);
        self.relations_emitted
            .fetch_add(document.relations.len(), Ordering::Relaxed);
        self.relations_dropped
            .fetch_add(conversion.dropped_relations.len(), Ordering::Relaxed);

        // One record can cover several spans.
        for record in &conversion.repairs {
            let moved = record
                .old_spans
                .iter()
                .zip(&record.new_spans)
                .filter(|(old, new)| old != new)
                .count();
            self.spans_relocated.fetch_add(moved, Ordering::Relaxed);
            if record.unresolved {
                self.entities_unresolved.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_failure(&self, duration: Duration) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
        self.total_convert_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let converted = self.documents_converted.load(Ordering::Relaxed);
        let failed = self.documents_failed.load(Ordering::Relaxed);
        MetricsSnapshot {
            documents_converted: converted,
            documents_failed: failed,
            entities_emitted: self.entities_emitted.load(Ordering::Relaxed),
            relations_emitted: self.relations_emitted.load(Ordering::Relaxed),
            relations_dropped: self.relations_dropped.load(Ordering::Relaxed),
            spans_relocated: self.spans_relocated.load(Ordering::Relaxed),
            entities_unresolved: self.entities_unresolved.load(Ordering::Relaxed),
            avg_convert_time_ms: self.avg_time_ms(&self.total_convert_time_us, converted + failed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: usize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        if count > 0 {
            total / count as f64 / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub documents_converted: usize,
    pub documents_failed: usize,
    pub entities_emitted: usize,
    pub relations_emitted: usize,
    pub relations_dropped: usize,
    pub spans_relocated: usize,
    pub entities_unresolved: usize,
    pub avg_convert_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
