//! Builder for min-max heaps.
//!
//! # Type-State Pattern
//!
//! `build()` only exists once a comparator has been chosen, so a heap without
//! an order cannot be constructed:
//!
//! ```text
//! MinMaxHeapBuilder<T, NoComparator> ──.comparator(c)──► MinMaxHeapBuilder<T, C> ──.build()──► MinMaxHeap<T, C>
//!                                    ──.natural_order()──►
//! ```
//!
//! # Examples
//!
//! ```
//! use reservoircraft::builder::MinMaxHeapBuilder;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let discarded = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&discarded);
//!
//! let mut heap = MinMaxHeapBuilder::new()
//!     .bound(2)
//!     .comparator(|a: &u32, b: &u32| a.cmp(b))
//!     .on_discard(move |_| { counter.fetch_add(1, Ordering::Relaxed); })
//!     .build()
//!     .unwrap();
//!
//! for v in [1, 2, 3] {
//!     heap.insert(v).unwrap();
//! }
//! assert_eq!(discarded.load(Ordering::Relaxed), 1);
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use reservoircraft::builder::MinMaxHeapBuilder;
//!
//! let result = MinMaxHeapBuilder::<u32, _>::new().bound(1).natural_order().build();
//! assert!(result.is_err());
//! ```

use crate::core::{Bound, Comparator, DiscardFn, MinMaxHeap, Natural};
use crate::error::Result;

/// Type-state marker: no comparator chosen yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComparator;

/// Builder for [`MinMaxHeap`].
pub struct MinMaxHeapBuilder<T, C = NoComparator> {
    bound: usize,
    cmp: C,
    discard: Option<DiscardFn<T>>,
}

impl<T> MinMaxHeapBuilder<T, NoComparator> {
    /// Create a new heap builder. Heaps are unbounded unless
    /// [`bound`](Self::bound) is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bound: 0,
            cmp: NoComparator,
            discard: None,
        }
    }
}

impl<T> Default for MinMaxHeapBuilder<T, NoComparator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> MinMaxHeapBuilder<T, C> {
    /// Set the maximum number of retained values (0 for unbounded).
    ///
    /// Validated by [`build`](MinMaxHeapBuilder::build).
    #[must_use]
    pub fn bound(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    /// Set the order of the heap.
    #[must_use]
    pub fn comparator<C2>(self, cmp: C2) -> MinMaxHeapBuilder<T, C2>
    where
        C2: Comparator<T>,
    {
        MinMaxHeapBuilder {
            bound: self.bound,
            cmp,
            discard: self.discard,
        }
    }

    /// Order the heap by `T`'s [`Ord`] implementation.
    #[must_use]
    pub fn natural_order(self) -> MinMaxHeapBuilder<T, Natural>
    where
        T: Ord,
    {
        self.comparator(Natural)
    }

    /// Set the hook that takes ownership of discarded values.
    #[must_use]
    pub fn on_discard<F>(mut self, hook: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        self.discard = Some(Box::new(hook));
        self
    }
}

impl<T, C: Comparator<T>> MinMaxHeapBuilder<T, C> {
    /// Build the heap.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`](crate::ReservoirError::InvalidBound)
    /// if the bound is 1, or an allocation error if storage cannot be
    /// reserved.
    pub fn build(self) -> Result<MinMaxHeap<T, C>> {
        let limit = Bound::new(self.bound)?;
        let mut heap = MinMaxHeap::with_limit(limit, self.cmp)?;
        if let Some(hook) = self.discard {
            heap.set_discard_boxed(hook);
        }
        Ok(heap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Reverse;
    use crate::error::ReservoirError;

    #[test]
    fn test_defaults_to_unbounded() {
        let heap: MinMaxHeap<u32> = MinMaxHeapBuilder::new().natural_order().build().unwrap();
        assert_eq!(heap.bound(), 0);
        assert!(!heap.has_discard());
    }

    #[test]
    fn test_bound_is_validated() {
        let err = MinMaxHeapBuilder::<u32, _>::new()
            .bound(1)
            .natural_order()
            .build()
            .unwrap_err();
        assert_eq!(err, ReservoirError::InvalidBound { bound: 1 });
    }

    #[test]
    fn test_bound_can_follow_comparator() {
        let heap = MinMaxHeapBuilder::<u32, _>::new()
            .comparator(Reverse(Natural))
            .bound(3)
            .build()
            .unwrap();
        assert_eq!(heap.bound(), 3);
        assert_eq!(heap.capacity(), 3);
    }

    #[test]
    fn test_discard_survives_comparator_change() {
        let heap = MinMaxHeapBuilder::<u32, _>::new()
            .on_discard(|_| {})
            .natural_order()
            .build()
            .unwrap();
        assert!(heap.has_discard());
    }

    #[test]
    fn test_borrowed_values() {
        let words = vec![String::from("pear"), String::from("fig"), String::from("kiwi")];
        let mut heap = MinMaxHeapBuilder::<&str, _>::new()
            .bound(2)
            .natural_order()
            .build()
            .unwrap();
        for word in &words {
            heap.insert(word.as_str()).unwrap();
        }
        assert_eq!(heap.peek_min(), Some(&"kiwi"));
        assert_eq!(heap.peek_max(), Some(&"pear"));
    }
}
