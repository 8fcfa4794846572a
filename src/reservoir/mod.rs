//! Priority sampling reservoir for telemetry events.
//!
//! An [`EventReservoir`] is a [`MinMaxHeap`] bounded at the reservoir's
//! capacity and ordered by [`EventOrder`], plus seen/saved accounting.
//! Producers call [`add`](EventReservoir::add) for every event they create;
//! the reservoir keeps the highest-priority subset and counts the rest.
//!
//! # Lifecycle
//!
//! ```text
//! Empty ──add──► Filling ──(saved == capacity)──► Full
//!   ▲               every add accepted              every add rejects the
//!   │                                               newcomer or evicts the
//!   └──────────────────── harvest() ─────────────── current minimum
//! ```
//!
//! Capacity is fixed at construction. A full reservoir stays full until it
//! is harvested (which starts a new cycle) or dropped.
//!
//! # Examples
//!
//! ```
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let mut reservoir = EventReservoir::new(2).unwrap();
//! assert!(!reservoir.add(Sample::new(100.0, 1, "a")).unwrap());
//! assert!(!reservoir.add(Sample::new(1.0, 2, "b")).unwrap());
//! assert!(reservoir.add(Sample::new(2.0, 3, "c")).unwrap());   // evicts "b"
//! assert!(reservoir.add(Sample::new(0.5, 4, "d")).unwrap());   // rejected
//!
//! assert_eq!(reservoir.number_seen(), 4);
//! assert_eq!(reservoir.number_saved(), 2);
//!
//! let mut exported = Vec::new();
//! reservoir.export(&mut exported);
//! let mut names: Vec<_> = exported.iter().map(|s| s.payload).collect();
//! names.sort_unstable();
//! assert_eq!(names, vec!["a", "c"]);
//! ```

pub mod clock;
pub mod config;
pub mod event;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ReservoirConfig, DEFAULT_CAPACITY};
pub use event::{Event, EventOrder, Sample};

use crate::builder::ReservoirBuilder;
use crate::core::{Bound, Comparator, DiscardFn, Insertion, MinMaxHeap};
use crate::error::Result;
use crate::metrics::ReservoirStats;
use std::fmt;

/// Bounded, priority-biased sample of events.
///
/// Not internally synchronized; see [`SharedReservoir`](crate::sync::SharedReservoir)
/// for a locked wrapper.
pub struct EventReservoir<E> {
    heap: MinMaxHeap<E, EventOrder>,
    name: String,
    seen: u64,
    rejected: u64,
    evicted: u64,
}

impl<E: Event> EventReservoir<E> {
    /// Creates a reservoir retaining at most `capacity` events.
    ///
    /// A capacity of 0 creates an unbounded reservoir.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`](crate::ReservoirError::InvalidBound)
    /// if `capacity == 1`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_limit(Bound::new(capacity)?, config::DEFAULT_NAME)
    }

    /// Starts a [`ReservoirBuilder`].
    #[must_use]
    pub fn builder() -> ReservoirBuilder<E> {
        ReservoirBuilder::new()
    }

    /// Creates a reservoir from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns any error reported by [`ReservoirConfig::validate`].
    pub fn from_config(config: &ReservoirConfig) -> Result<Self> {
        let limit = config.validate()?;
        Self::with_limit(limit, &config.name)
    }

    pub(crate) fn with_limit(limit: Bound, name: &str) -> Result<Self> {
        let heap = MinMaxHeap::with_limit(limit, EventOrder)?;

        #[cfg(feature = "trace")]
        tracing::debug!(reservoir = name, capacity = limit.get(), "created event reservoir");

        Ok(Self {
            heap,
            name: name.to_string(),
            seen: 0,
            rejected: 0,
            evicted: 0,
        })
    }

    /// Offers `event` to the reservoir.
    ///
    /// Returns `true` if the reservoir's occupancy did not grow: either the
    /// event was rejected outright or a lower-priority event was evicted to
    /// make room. Returns `false` when the event was accepted into spare
    /// capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::AllocationFailed`](crate::ReservoirError::AllocationFailed)
    /// if an unbounded reservoir cannot grow. The event is still counted as
    /// seen, and is therefore reported as dropped.
    pub fn add(&mut self, event: E) -> Result<bool> {
        self.seen += 1;
        let outcome = self.heap.insert(event)?;
        match outcome {
            Insertion::Inserted => {}
            Insertion::Replaced => self.evicted += 1,
            Insertion::Rejected => self.rejected += 1,
        }
        Ok(outcome.displaced())
    }

    /// Number of [`add`](Self::add) calls since creation or the last harvest.
    #[inline]
    pub fn number_seen(&self) -> u64 {
        self.seen
    }

    /// Number of events currently retained.
    #[inline]
    pub fn number_saved(&self) -> u64 {
        self.heap.len() as u64
    }

    /// `number_seen() - number_saved()`.
    #[inline]
    pub fn number_dropped(&self) -> u64 {
        self.seen.saturating_sub(self.number_saved())
    }

    /// Retention limit, 0 when unbounded.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.bound()
    }

    /// Returns `true` if no events are retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if a bounded reservoir holds `capacity` events.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.is_full()
    }

    /// Name used in logs and metric names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The heap holding the retained events.
    pub fn heap(&self) -> &MinMaxHeap<E, EventOrder> {
        &self.heap
    }

    /// Iterates over retained events in raw heap order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.heap.iter()
    }

    /// The lowest-priority retained event, the next to be evicted.
    pub fn peek_lowest(&self) -> Option<&E> {
        self.heap.peek_min()
    }

    /// The highest-priority retained event.
    pub fn peek_highest(&self) -> Option<&E> {
        self.heap.peek_max()
    }

    /// Removes and returns the lowest-priority retained event.
    pub fn pop_lowest(&mut self) -> Option<E> {
        self.heap.pop_min()
    }

    /// Removes and returns the highest-priority retained event.
    pub fn pop_highest(&mut self) -> Option<E> {
        self.heap.pop_max()
    }

    /// Copies every retained event into `sink` in raw heap order.
    ///
    /// The reservoir is not modified: exporting twice yields the same events
    /// and leaves `number_saved` unchanged.
    pub fn export<S>(&self, sink: &mut S)
    where
        E: Clone,
        S: Extend<E>,
    {
        sink.extend(self.heap.iter().cloned());
    }

    /// Clones the retained events, highest priority first.
    pub fn to_sorted_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        let mut events: Vec<E> = self.heap.iter().cloned().collect();
        events.sort_by(|a, b| EventOrder.compare(b, a));
        events
    }

    /// Sends every event discarded from now on (rejected, evicted, or still
    /// retained when the reservoir is dropped) to `hook`.
    pub fn on_discard<F>(&mut self, hook: F)
    where
        F: FnMut(E) + Send + 'static,
    {
        self.heap.set_discard(hook);
    }

    #[cfg(test)]
    pub(crate) fn limit_growth(&mut self, max: usize) {
        self.heap.limit_growth(max);
    }

    pub(crate) fn on_discard_boxed(&mut self, hook: DiscardFn<E>) {
        self.heap.set_discard_boxed(hook);
    }

    /// Current accounting.
    pub fn stats(&self) -> ReservoirStats {
        ReservoirStats {
            seen: self.seen,
            saved: self.number_saved(),
            dropped: self.number_dropped(),
            rejected: self.rejected,
            evicted: self.evicted,
            capacity: self.capacity() as u64,
        }
    }

    /// Ends the current cycle.
    ///
    /// Takes every retained event, highest priority first, together with the
    /// cycle's statistics, and leaves the reservoir empty with all counters
    /// at zero. Capacity and the discard hook are kept.
    ///
    /// ```
    /// use reservoircraft::{EventReservoir, Sample};
    ///
    /// let mut reservoir = EventReservoir::new(2).unwrap();
    /// for (tick, p) in [3.0, 9.0, 1.0].into_iter().enumerate() {
    ///     reservoir.add(Sample::new(p, tick as u64, ())).unwrap();
    /// }
    ///
    /// let harvest = reservoir.harvest();
    /// let priorities: Vec<f64> = harvest.events.iter().map(|s| s.priority).collect();
    /// assert_eq!(priorities, vec![9.0, 3.0]);
    /// assert_eq!(harvest.stats.dropped, 1);
    /// assert_eq!(reservoir.number_seen(), 0);
    /// ```
    pub fn harvest(&mut self) -> Harvest<E> {
        let stats = self.stats();
        let events = self.heap.drain_descending();
        self.seen = 0;
        self.rejected = 0;
        self.evicted = 0;

        #[cfg(feature = "trace")]
        tracing::debug!(
            reservoir = %self.name,
            seen = stats.seen,
            saved = stats.saved,
            dropped = stats.dropped,
            "harvested event reservoir"
        );

        Harvest { events, stats }
    }

    /// Folds `other` into this reservoir.
    ///
    /// Every event retained by `other` is offered here, subject to this
    /// reservoir's eviction policy, and `other`'s seen count is added to this
    /// one so drops recorded there still show up in the totals.
    ///
    /// # Errors
    ///
    /// Returns the first allocation failure. The failed event and every
    /// event not yet merged at that point go to this reservoir's discard
    /// hook, and `other`'s counts are still folded in.
    pub fn merge(&mut self, mut other: EventReservoir<E>) -> Result<()> {
        let incoming = other.seen;
        let events = std::mem::replace(
            &mut other.heap,
            MinMaxHeap::with_comparator(EventOrder),
        )
        .into_vec();

        #[cfg(feature = "trace")]
        tracing::debug!(
            reservoir = %self.name,
            from = %other.name,
            events = events.len(),
            seen = incoming,
            "merging event reservoir"
        );

        self.seen += incoming;
        self.rejected += other.rejected;
        self.evicted += other.evicted;

        let mut events = events.into_iter();
        let mut failure = None;
        for event in events.by_ref() {
            match self.heap.insert(event) {
                Ok(Insertion::Inserted) => {}
                Ok(Insertion::Replaced) => self.evicted += 1,
                Ok(Insertion::Rejected) => self.rejected += 1,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        match failure {
            Some(err) => {
                self.heap.dispose_all(events);
                Err(err)
            }
            None => Ok(()),
        }
    }
}

impl<E: Event> Default for EventReservoir<E> {
    /// An empty, unbounded reservoir.
    fn default() -> Self {
        Self {
            heap: MinMaxHeap::with_comparator(EventOrder),
            name: config::DEFAULT_NAME.to_string(),
            seen: 0,
            rejected: 0,
            evicted: 0,
        }
    }
}

impl<'a, E: Event> IntoIterator for &'a EventReservoir<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E> fmt::Debug for EventReservoir<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventReservoir")
            .field("name", &self.name)
            .field("capacity", &self.heap.bound())
            .field("seen", &self.seen)
            .field("saved", &self.heap.len())
            .finish()
    }
}

/// Events and statistics of a finished cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest<E> {
    /// Retained events, highest priority first.
    pub events: Vec<E>,
    /// Accounting at the moment of harvest.
    pub stats: ReservoirStats,
}

impl<E> Harvest<E> {
    /// Returns `true` if the cycle retained nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
