//! Cross-cycle metrics aggregation.
//!
//! A reservoir resets its counters at every harvest. [`ReservoirMetrics`]
//! keeps running totals across cycles so a host can report lifetime drop
//! rates and spot allocation failures. Recording is lock-free.
//!
//! # Examples
//!
//! ```
//! use reservoircraft::metrics::{ReservoirMetrics, ReservoirStats};
//!
//! let metrics = ReservoirMetrics::new();
//! metrics.record_harvest(&ReservoirStats { seen: 10, saved: 8, dropped: 2, ..Default::default() });
//! metrics.record_harvest(&ReservoirStats { seen: 6, saved: 6, ..Default::default() });
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.cycles, 2);
//! assert_eq!(snapshot.seen, 16);
//! assert_eq!(snapshot.dropped, 2);
//! ```

use super::stats::ReservoirStats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Running totals across harvest cycles.
///
/// Cloning shares the underlying counters.
#[derive(Debug, Clone)]
pub struct ReservoirMetrics {
    counters: Arc<Counters>,
    start_time: Instant,
}

#[derive(Debug, Default)]
struct Counters {
    cycles: AtomicU64,
    seen: AtomicU64,
    saved: AtomicU64,
    dropped: AtomicU64,
    rejected: AtomicU64,
    evicted: AtomicU64,
    allocation_failures: AtomicU64,
}

impl ReservoirMetrics {
    /// Creates a collector with all totals at zero.
    pub fn new() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            start_time: Instant::now(),
        }
    }

    /// Adds a finished cycle's statistics to the totals.
    pub fn record_harvest(&self, stats: &ReservoirStats) {
        let c = &self.counters;
        c.cycles.fetch_add(1, Ordering::Relaxed);
        c.seen.fetch_add(stats.seen, Ordering::Relaxed);
        c.saved.fetch_add(stats.saved, Ordering::Relaxed);
        c.dropped.fetch_add(stats.dropped, Ordering::Relaxed);
        c.rejected.fetch_add(stats.rejected, Ordering::Relaxed);
        c.evicted.fetch_add(stats.evicted, Ordering::Relaxed);
    }

    /// Records an insert lost to a failed storage allocation.
    pub fn record_allocation_failure(&self) {
        self.counters
            .allocation_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Number of allocation failures recorded so far.
    pub fn allocation_failures(&self) -> u64 {
        self.counters.allocation_failures.load(Ordering::Relaxed)
    }

    /// Time since the collector was created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Reads every total.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            cycles: c.cycles.load(Ordering::Relaxed),
            seen: c.seen.load(Ordering::Relaxed),
            saved: c.saved.load(Ordering::Relaxed),
            dropped: c.dropped.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            evicted: c.evicted.load(Ordering::Relaxed),
            allocation_failures: c.allocation_failures.load(Ordering::Relaxed),
            uptime: self.uptime(),
        }
    }

    /// Resets every total to zero.
    pub fn reset(&self) {
        let c = &self.counters;
        for counter in [
            &c.cycles,
            &c.seen,
            &c.saved,
            &c.dropped,
            &c.rejected,
            &c.evicted,
            &c.allocation_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for ReservoirMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Totals read from a [`ReservoirMetrics`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Harvest cycles recorded.
    pub cycles: u64,
    /// Events offered across all cycles.
    pub seen: u64,
    /// Events harvested across all cycles.
    pub saved: u64,
    /// Events lost across all cycles.
    pub dropped: u64,
    /// Newcomers rejected across all cycles.
    pub rejected: u64,
    /// Retained events evicted across all cycles.
    pub evicted: u64,
    /// Inserts lost to allocation failures.
    pub allocation_failures: u64,
    /// Time since the collector was created.
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Lifetime fraction of seen events that were not harvested.
    pub fn drop_rate(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.seen as f64
    }

    /// Average events offered per cycle.
    pub fn seen_per_cycle(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.seen as f64 / self.cycles as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_is_zeroed() {
        let snapshot = ReservoirMetrics::new().snapshot();
        assert_eq!(snapshot.cycles, 0);
        assert_eq!(snapshot.seen, 0);
        assert_eq!(snapshot.drop_rate(), 0.0);
        assert_eq!(snapshot.seen_per_cycle(), 0.0);
    }

    #[test]
    fn test_record_harvest_accumulates() {
        let metrics = ReservoirMetrics::new();
        let stats = ReservoirStats {
            seen: 8,
            saved: 4,
            dropped: 4,
            rejected: 1,
            evicted: 3,
            capacity: 4,
        };
        metrics.record_harvest(&stats);
        metrics.record_harvest(&stats);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.seen, 16);
        assert_eq!(snapshot.saved, 8);
        assert_eq!(snapshot.rejected, 2);
        assert_eq!(snapshot.evicted, 6);
        assert_eq!(snapshot.drop_rate(), 0.5);
        assert_eq!(snapshot.seen_per_cycle(), 8.0);
    }

    #[test]
    fn test_allocation_failures() {
        let metrics = ReservoirMetrics::new();
        metrics.record_allocation_failure();
        metrics.record_allocation_failure();
        assert_eq!(metrics.allocation_failures(), 2);
    }

    #[test]
    fn test_clone_shares_counters() {
        let metrics = ReservoirMetrics::new();
        let clone = metrics.clone();
        clone.record_allocation_failure();
        assert_eq!(metrics.allocation_failures(), 1);
    }

    #[test]
    fn test_concurrent_recording() {
        let metrics = ReservoirMetrics::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.record_harvest(&ReservoirStats {
                            seen: 1,
                            ..Default::default()
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().seen, 400);
    }

    #[test]
    fn test_reset() {
        let metrics = ReservoirMetrics::new();
        metrics.record_harvest(&ReservoirStats {
            seen: 3,
            ..Default::default()
        });
        metrics.record_allocation_failure();
        metrics.reset();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.cycles, 0);
        assert_eq!(snapshot.seen, 0);
        assert_eq!(snapshot.allocation_failures, 0);
    }
}
