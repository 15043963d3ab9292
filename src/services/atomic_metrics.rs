use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ErrorKind;

/// Process-wide QR MPM request counters. Observational only; no request
/// reads them.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    requests: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    validation_failed: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub validation_failed: u64,
    pub success_rate: f64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        if kind == ErrorKind::Validation {
            self.validation_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let succeeded = self.succeeded.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests,
            succeeded,
            failed: self.failed.load(Ordering::Relaxed),
            validation_failed: self.validation_failed.load(Ordering::Relaxed),
            success_rate: if requests > 0 {
                (succeeded as f64 / requests as f64) * 100.0
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = AtomicMetrics::new();
        for _ in 0..4 {
            metrics.increment_requests();
        }
        metrics.increment_succeeded();
        metrics.record_failure(ErrorKind::Validation);
        metrics.record_failure(ErrorKind::Protocol);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 4);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.validation_failed, 1);
        assert_eq!(snapshot.success_rate, 25.0);
    }

    #[test]
    fn test_empty_success_rate() {
        assert_eq!(AtomicMetrics::new().snapshot().success_rate, 0.0);
    }
}
