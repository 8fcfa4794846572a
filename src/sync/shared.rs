//! Mutex-guarded reservoir shared by concurrent producers.
//!
//! Every method takes `&self` and holds the lock for exactly one reservoir
//! operation, so a `SharedReservoir` can be put in an `Arc` and handed to
//! every producer thread. Harvests are recorded into a [`ReservoirMetrics`]
//! collector that outlives the individual cycles.
//!
//! # Examples
//!
//! ```
//! use reservoircraft::sync::SharedReservoir;
//! use reservoircraft::Sample;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let reservoir = Arc::new(SharedReservoir::new(100).unwrap());
//!
//! let handles: Vec<_> = (0..4u64)
//!     .map(|worker| {
//!         let reservoir = Arc::clone(&reservoir);
//!         thread::spawn(move || {
//!             for i in 0..50u64 {
//!                 let tick = worker * 50 + i;
//!                 reservoir.add(Sample::new(tick as f64, tick, worker)).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! let harvest = reservoir.harvest();
//! assert_eq!(harvest.stats.seen, 200);
//! assert_eq!(harvest.events.len(), 100);
//! assert_eq!(harvest.events[0].priority, 199.0);
//! assert_eq!(reservoir.metrics().snapshot().cycles, 1);
//! ```

use crate::error::{ReservoirError, Result};
use crate::metrics::{ReservoirMetrics, ReservoirStats};
use crate::reservoir::{Event, EventReservoir, Harvest};
use parking_lot::Mutex;
use std::fmt;

/// An [`EventReservoir`] behind a `parking_lot::Mutex`.
///
/// A `RwLock` would not help here: the discard hook is `FnMut + Send` but
/// not `Sync`, and every hot-path operation mutates.
pub struct SharedReservoir<E> {
    inner: Mutex<EventReservoir<E>>,
    metrics: ReservoirMetrics,
}

impl<E: Event> SharedReservoir<E> {
    /// Creates a shared reservoir retaining at most `capacity` events
    /// (0 for unbounded).
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`] if `capacity == 1`.
    pub fn new(capacity: usize) -> Result<Self> {
        EventReservoir::new(capacity).map(Self::from_reservoir)
    }

    /// Wraps an existing reservoir.
    pub fn from_reservoir(reservoir: EventReservoir<E>) -> Self {
        Self {
            inner: Mutex::new(reservoir),
            metrics: ReservoirMetrics::new(),
        }
    }

    /// Records harvests into `metrics` instead of a private collector.
    #[must_use]
    pub fn with_metrics(mut self, metrics: ReservoirMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Offers `event`. See [`EventReservoir::add`].
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::AllocationFailed`] if an unbounded
    /// reservoir cannot grow. The failure is also counted in
    /// [`metrics`](Self::metrics).
    pub fn add(&self, event: E) -> Result<bool> {
        let result = self.inner.lock().add(event);
        if let Err(ReservoirError::AllocationFailed { .. }) = result {
            self.metrics.record_allocation_failure();
        }
        result
    }

    /// Folds a producer-local reservoir into this one. See
    /// [`EventReservoir::merge`].
    ///
    /// # Errors
    ///
    /// Returns the first allocation failure.
    pub fn merge(&self, other: EventReservoir<E>) -> Result<()> {
        let result = self.inner.lock().merge(other);
        if let Err(ReservoirError::AllocationFailed { .. }) = result {
            self.metrics.record_allocation_failure();
        }
        result
    }

    /// Copies every retained event into `sink`. See [`EventReservoir::export`].
    pub fn export<S>(&self, sink: &mut S)
    where
        E: Clone,
        S: Extend<E>,
    {
        self.inner.lock().export(sink);
    }

    /// Ends the current cycle and records its statistics.
    pub fn harvest(&self) -> Harvest<E> {
        let harvest = self.inner.lock().harvest();
        self.metrics.record_harvest(&harvest.stats);
        harvest
    }

    /// Current accounting.
    pub fn stats(&self) -> ReservoirStats {
        self.inner.lock().stats()
    }

    /// See [`EventReservoir::number_seen`].
    pub fn number_seen(&self) -> u64 {
        self.inner.lock().number_seen()
    }

    /// See [`EventReservoir::number_saved`].
    pub fn number_saved(&self) -> u64 {
        self.inner.lock().number_saved()
    }

    /// Installs a discard hook. See [`EventReservoir::on_discard`].
    ///
    /// The hook runs while the reservoir's lock is held, from inside
    /// [`add`](Self::add) and [`merge`](Self::merge). It must not call back
    /// into the same `SharedReservoir`: the lock is not reentrant and the
    /// call deadlocks. Hand discarded events to a channel or a separate
    /// collection instead.
    pub fn on_discard<F>(&self, hook: F)
    where
        F: FnMut(E) + Send + 'static,
    {
        self.inner.lock().on_discard(hook);
    }

    /// Runs `f` with exclusive access to the reservoir.
    ///
    /// Keep `f` short: every producer waits on the same lock.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut EventReservoir<E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Cross-cycle totals.
    pub fn metrics(&self) -> &ReservoirMetrics {
        &self.metrics
    }

    /// Unwraps the reservoir.
    pub fn into_inner(self) -> EventReservoir<E> {
        self.inner.into_inner()
    }
}

impl<E: Event> From<EventReservoir<E>> for SharedReservoir<E> {
    fn from(reservoir: EventReservoir<E>) -> Self {
        Self::from_reservoir(reservoir)
    }
}

impl<E: Event> Default for SharedReservoir<E> {
    fn default() -> Self {
        Self::from_reservoir(EventReservoir::default())
    }
}

impl<E> fmt::Debug for SharedReservoir<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(inner) => f
                .debug_struct("SharedReservoir")
                .field("inner", &*inner)
                .finish(),
            None => f
                .debug_struct("SharedReservoir")
                .field("inner", &"<locked>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservoir::Sample;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_is_send_sync() {
        assert_send_sync::<SharedReservoir<Sample<String>>>();
    }

    #[test]
    fn test_add_and_stats() {
        let reservoir = SharedReservoir::new(2).unwrap();
        assert!(!reservoir.add(Sample::new(1.0, 0, ())).unwrap());
        assert!(!reservoir.add(Sample::new(2.0, 1, ())).unwrap());
        assert!(reservoir.add(Sample::new(3.0, 2, ())).unwrap());

        let stats = reservoir.stats();
        assert_eq!(stats.seen, 3);
        assert_eq!(stats.saved, 2);
        assert_eq!(stats.evicted, 1);
        assert_eq!(reservoir.number_seen(), 3);
        assert_eq!(reservoir.number_saved(), 2);
    }

    #[test]
    fn test_concurrent_producers() {
        let reservoir = Arc::new(SharedReservoir::new(64).unwrap());
        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let reservoir = Arc::clone(&reservoir);
                thread::spawn(move || {
                    for i in 0..1_000u64 {
                        let priority = ((worker * 7919 + i * 104_729) % 10_007) as f64;
                        reservoir.add(Sample::new(priority, i, worker)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = reservoir.stats();
        assert_eq!(stats.seen, 8_000);
        assert_eq!(stats.saved, 64);
        assert_eq!(stats.dropped, 8_000 - 64);
        assert_eq!(stats.rejected + stats.evicted, stats.dropped);
    }

    #[test]
    fn test_harvest_records_metrics() {
        let reservoir = SharedReservoir::new(2).unwrap();
        for cycle in 0..3u64 {
            for i in 0..5u64 {
                reservoir
                    .add(Sample::new(i as f64, cycle * 10 + i, ()))
                    .unwrap();
            }
            let harvest = reservoir.harvest();
            assert_eq!(harvest.events.len(), 2);
        }

        let snapshot = reservoir.metrics().snapshot();
        assert_eq!(snapshot.cycles, 3);
        assert_eq!(snapshot.seen, 15);
        assert_eq!(snapshot.saved, 6);
        assert_eq!(snapshot.dropped, 9);
        assert_eq!(reservoir.number_seen(), 0);
    }

    #[test]
    fn test_shared_metrics_collector() {
        let metrics = ReservoirMetrics::new();
        let a = SharedReservoir::new(0).unwrap().with_metrics(metrics.clone());
        let b = SharedReservoir::new(0).unwrap().with_metrics(metrics.clone());
        a.add(Sample::new(1.0, 0, ())).unwrap();
        b.add(Sample::new(1.0, 0, ())).unwrap();
        a.harvest();
        b.harvest();
        assert_eq!(metrics.snapshot().seen, 2);
    }

    #[test]
    fn test_merge_producer_local() {
        let shared = SharedReservoir::new(3).unwrap();
        let mut local = EventReservoir::new(0).unwrap();
        for i in 0..5u64 {
            local.add(Sample::new(i as f64, i, ())).unwrap();
        }
        shared.merge(local).unwrap();
        assert_eq!(shared.number_seen(), 5);
        assert_eq!(shared.number_saved(), 3);
    }

    #[test]
    fn test_discard_hook_through_lock() {
        let discarded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&discarded);
        let reservoir = SharedReservoir::new(2).unwrap();
        reservoir.on_discard(move |_: Sample<()>| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        for i in 0..4u64 {
            reservoir.add(Sample::new(i as f64, i, ())).unwrap();
        }
        assert_eq!(discarded.load(Ordering::Relaxed), 2);
        drop(reservoir);
        assert_eq!(discarded.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_with_lock_and_into_inner() {
        let reservoir = SharedReservoir::new(4).unwrap();
        reservoir.add(Sample::new(9.0, 0, "x")).unwrap();
        let top = reservoir.with_lock(|r| r.peek_highest().map(|s| s.payload));
        assert_eq!(top, Some("x"));

        let mut exported = Vec::new();
        reservoir.export(&mut exported);
        assert_eq!(exported.len(), 1);

        let inner = reservoir.into_inner();
        assert_eq!(inner.number_saved(), 1);
    }

    #[test]
    fn test_growth_failure_recorded_in_metrics() {
        let mut inner = EventReservoir::new(0).unwrap();
        inner.limit_growth(8);
        let reservoir = SharedReservoir::from_reservoir(inner);
        for i in 0..8u64 {
            reservoir.add(Sample::new(i as f64, i, ())).unwrap();
        }

        let err = reservoir.add(Sample::new(9.0, 8, ())).unwrap_err();
        assert!(matches!(err, ReservoirError::AllocationFailed { .. }));
        assert_eq!(reservoir.metrics().allocation_failures(), 1);
        assert_eq!(reservoir.number_seen(), 9);
        assert_eq!(reservoir.number_saved(), 8);

        let mut local = EventReservoir::new(0).unwrap();
        local.add(Sample::new(1.0, 20, ())).unwrap();
        assert!(reservoir.merge(local).is_err());
        assert_eq!(reservoir.metrics().allocation_failures(), 2);
        assert_eq!(reservoir.number_seen(), 10);
    }

    #[test]
    fn test_debug_output() {
        let reservoir = SharedReservoir::new(2).unwrap();
        reservoir.add(Sample::new(1.0, 0, 7u8)).unwrap();
        let debug = format!("{reservoir:?}");
        assert!(debug.contains("SharedReservoir"));
        assert!(debug.contains("saved: 1"));

        let locked = reservoir.with_lock(|_| format!("{reservoir:?}"));
        assert!(locked.contains("<locked>"));
    }
}
