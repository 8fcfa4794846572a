//! Events and the order a reservoir keeps them in.
//!
//! The reservoir does not care what an event carries. It only needs a
//! priority and a monotonic timestamp, exposed through the [`Event`] trait.
//! [`Sample`] is a ready-made event wrapping an arbitrary payload.

use super::clock::Clock;
use crate::core::Comparator;
use std::cmp::Ordering;
use std::sync::Arc;

/// A telemetry event that can be sampled by priority.
pub trait Event {
    /// Sampling priority. Higher values are kept in preference to lower ones.
    fn priority(&self) -> f64;

    /// Monotonic timestamp of the event. Later events have larger values.
    fn timestamp(&self) -> u64;
}

impl<E: Event + ?Sized> Event for Box<E> {
    #[inline]
    fn priority(&self) -> f64 {
        (**self).priority()
    }

    #[inline]
    fn timestamp(&self) -> u64 {
        (**self).timestamp()
    }
}

impl<E: Event + ?Sized> Event for Arc<E> {
    #[inline]
    fn priority(&self) -> f64 {
        (**self).priority()
    }

    #[inline]
    fn timestamp(&self) -> u64 {
        (**self).timestamp()
    }
}

/// Priority-then-recency order used by every reservoir.
///
/// Events compare by priority first (using IEEE 754 total order, so NaN
/// priorities sort consistently; `-0.0` and `0.0` are equal priorities). On
/// equal priority the more recent event,
/// the one with the larger timestamp, ranks higher. The heap minimum is
/// therefore the lowest-priority, oldest event, and that is what a full
/// reservoir evicts.
///
/// ```
/// use reservoircraft::core::Comparator;
/// use reservoircraft::reservoir::{EventOrder, Sample};
/// use std::cmp::Ordering;
///
/// let old = Sample::new(0.5, 10, "old");
/// let new = Sample::new(0.5, 20, "new");
/// let low = Sample::new(0.1, 30, "low");
///
/// assert_eq!(EventOrder.compare(&new, &old), Ordering::Greater);
/// assert_eq!(EventOrder.compare(&low, &old), Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOrder;

impl<E: Event> Comparator<E> for EventOrder {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        // Adding +0.0 folds -0.0 into 0.0 before the total order sees it.
        (a.priority() + 0.0)
            .total_cmp(&(b.priority() + 0.0))
            .then_with(|| a.timestamp().cmp(&b.timestamp()))
    }
}

/// An event carrying a caller-defined payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample<T> {
    /// Sampling priority.
    pub priority: f64,
    /// Monotonic timestamp.
    pub timestamp: u64,
    /// Event body, opaque to the reservoir.
    pub payload: T,
}

impl<T> Sample<T> {
    /// Creates a sample with an explicit timestamp.
    #[must_use]
    pub fn new(priority: f64, timestamp: u64, payload: T) -> Self {
        Self {
            priority,
            timestamp,
            payload,
        }
    }

    /// Creates a sample stamped with the current reading of `clock`.
    ///
    /// ```
    /// use reservoircraft::reservoir::{ManualClock, Sample};
    ///
    /// let clock = ManualClock::new();
    /// clock.advance(42);
    /// let sample = Sample::now(0.7, "checkout", &clock);
    /// assert_eq!(sample.timestamp, 42);
    /// ```
    #[must_use]
    pub fn now<C: Clock + ?Sized>(priority: f64, payload: T, clock: &C) -> Self {
        Self::new(priority, clock.now(), payload)
    }

    /// Consumes the sample and returns its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Maps the payload, keeping priority and timestamp.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sample<U> {
        Sample {
            priority: self.priority,
            timestamp: self.timestamp,
            payload: f(self.payload),
        }
    }
}

impl<T> Event for Sample<T> {
    #[inline]
    fn priority(&self) -> f64 {
        self.priority
    }

    #[inline]
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}
