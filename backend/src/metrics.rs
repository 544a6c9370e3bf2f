//! Process-wide upload counters and request gauges.

use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Instant;

/// Counters and gauges shared by every request.
#[derive(Debug)]
pub struct Metrics {
    uploads_total: AtomicU64,
    upload_bytes_sum: AtomicU64,
    requests_in_progress: AtomicI64,
    started: Instant,
}

/// Point-in-time copy of [`Metrics`], served by `/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_s: f64,
    pub counters: Counters,
    pub gauges: Gauges,
}

#[derive(Debug, Clone, Serialize)]
pub struct Counters {
    pub uploads_total: u64,
    pub upload_bytes_sum: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Gauges {
    pub requests_in_progress: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            uploads_total: AtomicU64::new(0),
            upload_bytes_sum: AtomicU64::new(0),
            requests_in_progress: AtomicI64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one accepted upload of `bytes` bytes.
    pub fn record_upload(&self, bytes: u64) {
        self.uploads_total.fetch_add(1, Ordering::Relaxed);
        self.upload_bytes_sum.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Mark a request as started. The gauge drops again when the guard is dropped.
    pub fn track_request(&self) -> InProgressGuard<'_> {
        self.requests_in_progress.fetch_add(1, Ordering::Relaxed);
        InProgressGuard { metrics: self }
    }

    pub fn requests_in_progress(&self) -> i64 {
        self.requests_in_progress.load(Ordering::Relaxed)
    }

    pub fn uptime_s(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_s: self.uptime_s(),
            counters: Counters {
                uploads_total: self.uploads_total.load(Ordering::Relaxed),
                upload_bytes_sum: self.upload_bytes_sum.load(Ordering::Relaxed),
            },
            gauges: Gauges {
                requests_in_progress: self.requests_in_progress(),
            },
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-progress gauge on drop, including on panic unwind.
pub struct InProgressGuard<'a> {
    metrics: &'a Metrics,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.metrics.requests_in_progress.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_gauges() {
        let m = Metrics::new();
        assert_eq!(m.snapshot().counters.uploads_total, 0);

        m.record_upload(100);
        {
            let _guard = m.track_request();
            assert_eq!(m.requests_in_progress(), 1);
        }

        let snap = m.snapshot();
        assert_eq!(snap.counters.uploads_total, 1);
        assert_eq!(snap.counters.upload_bytes_sum, 100);
        assert_eq!(snap.gauges.requests_in_progress, 0);
        assert!(snap.uptime_s >= 0.0);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let m = Metrics::new();
        m.record_upload(5);
        let json = serde_json::to_value(m.snapshot()).unwrap();
        assert_eq!(json["counters"]["uploads_total"], 1);
        assert_eq!(json["counters"]["upload_bytes_sum"], 5);
        assert_eq!(json["gauges"]["requests_in_progress"], 0);
        assert!(json["uptime_s"].is_number());
    }
}
