//! Double-ended priority queue stored as an implicit min-max tree.
//!
//! A min-max heap alternates "min levels" and "max levels" by depth. Every
//! node on a min level is no greater than any of its descendants, and every
//! node on a max level is no smaller than any of its descendants. The
//! minimum is therefore always the root and the maximum is one of the root's
//! two children, which gives O(1) peeks and O(log n) pops at both ends from a
//! single flat array.
//!
//! # Bounded Eviction
//!
//! A heap built with [`Bound::AtMost`] never holds more than `bound` values.
//! Once full, an incoming value must be strictly greater than the current
//! minimum to be admitted; the minimum is then evicted to make room. Anything
//! else is turned away. This turns the heap into a priority-biased reservoir
//! sampler that always keeps the `bound` greatest values seen.
//!
//! # Discard Hook
//!
//! Values that leave the heap without being handed back to the caller
//! (rejected newcomers, evicted minimums, [`clear`](MinMaxHeap::clear) and
//! values still resident when the heap is dropped) are passed to the discard
//! hook exactly once. Without a hook they are simply dropped. Values returned
//! by [`pop_min`](MinMaxHeap::pop_min), [`pop_max`](MinMaxHeap::pop_max) or
//! [`into_vec`](MinMaxHeap::into_vec) never reach the hook.
//!
//! # Examples
//!
//! ```
//! use reservoircraft::core::MinMaxHeap;
//!
//! let mut heap = MinMaxHeap::new();
//! for value in [5, 1, 9, 3, 7] {
//!     heap.insert(value).unwrap();
//! }
//!
//! assert_eq!(heap.peek_min(), Some(&1));
//! assert_eq!(heap.peek_max(), Some(&9));
//! assert_eq!(heap.pop_max(), Some(9));
//! assert_eq!(heap.pop_min(), Some(1));
//! assert_eq!(heap.len(), 3);
//! ```
//!
//! ## As a Reservoir
//!
//! ```
//! use reservoircraft::core::{Insertion, MinMaxHeap, Natural};
//!
//! let mut top = MinMaxHeap::bounded(3, Natural).unwrap();
//! for value in [4, 8, 1, 6, 2, 9] {
//!     top.insert(value).unwrap();
//! }
//!
//! assert_eq!(top.into_sorted_vec(), vec![6, 8, 9]);
//! ```

use super::compare::{Comparator, Natural};
use super::level::{self, ROOT};
use super::Bound;
use crate::builder::MinMaxHeapBuilder;
use crate::error::{ReservoirError, Result};
use std::fmt;

/// Initial slot count of an unbounded heap. Storage doubles from here.
pub const DEFAULT_CHUNK_SIZE: usize = 8;

/// Hook that takes ownership of discarded values.
pub type DiscardFn<T> = Box<dyn FnMut(T) + Send>;

/// Outcome of [`MinMaxHeap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// The value was stored and nothing was displaced.
    Inserted,
    /// The value was stored after evicting the previous minimum.
    Replaced,
    /// The heap was full and the value did not beat the minimum; it was
    /// discarded.
    Rejected,
}

impl Insertion {
    /// Returns `true` if the heap's size did not grow as a result of the call.
    #[inline]
    #[must_use]
    pub fn displaced(self) -> bool {
        !matches!(self, Insertion::Inserted)
    }

    /// Returns `true` if the inserted value is now resident in the heap.
    #[inline]
    #[must_use]
    pub fn retained(self) -> bool {
        !matches!(self, Insertion::Rejected)
    }
}

/// A possibly-bounded double-ended priority queue.
///
/// `C` decides the order of values and is fixed for the lifetime of the heap.
pub struct MinMaxHeap<T, C = Natural> {
    data: Vec<T>,
    capacity: usize,
    limit: Bound,
    cmp: C,
    discard: Option<DiscardFn<T>>,
    /// Largest capacity `grow` may reach; growth past it fails.
    #[cfg(test)]
    growth_ceiling: Option<usize>,
}

impl<T: Ord> MinMaxHeap<T, Natural> {
    /// Creates an empty unbounded heap ordered by `T`'s [`Ord`].
    ///
    /// Storage for [`DEFAULT_CHUNK_SIZE`] values is reserved up front.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T> MinMaxHeap<T, Natural> {
    /// Starts a [`MinMaxHeapBuilder`].
    ///
    /// ```
    /// use reservoircraft::core::MinMaxHeap;
    ///
    /// let heap = MinMaxHeap::<u8>::builder().bound(4).natural_order().build().unwrap();
    /// assert_eq!(heap.capacity(), 4);
    /// ```
    #[must_use]
    pub fn builder() -> MinMaxHeapBuilder<T> {
        MinMaxHeapBuilder::new()
    }
}

impl<T: Ord> Default for MinMaxHeap<T, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> MinMaxHeap<T, C> {
    /// Maximum number of retained values, or 0 if the heap is unbounded.
    #[inline]
    pub fn bound(&self) -> usize {
        self.limit.get()
    }

    /// The heap's [`Bound`].
    #[inline]
    pub fn limit(&self) -> Bound {
        self.limit
    }

    /// Number of value slots currently backed by storage.
    ///
    /// Bounded heaps report exactly their bound. Unbounded heaps start at
    /// [`DEFAULT_CHUNK_SIZE`] and double whenever they fill up.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the heap is bounded and holds `bound` values.
    #[inline]
    pub fn is_full(&self) -> bool {
        match self.limit {
            Bound::Unbounded => false,
            Bound::AtMost(n) => self.data.len() >= n,
        }
    }

    /// The comparator ordering this heap.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Replaces the discard hook.
    ///
    /// The new hook receives every value discarded from now on, including
    /// values still resident when the heap is cleared or dropped.
    pub fn set_discard<F>(&mut self, hook: F)
    where
        F: FnMut(T) + Send + 'static,
    {
        self.discard = Some(Box::new(hook));
    }

    /// Installs an already boxed hook.
    pub(crate) fn set_discard_boxed(&mut self, hook: DiscardFn<T>) {
        self.discard = Some(hook);
    }

    /// Removes the discard hook. Discarded values are dropped from now on.
    pub fn clear_discard(&mut self) {
        self.discard = None;
    }

    /// Returns `true` if a discard hook is installed.
    #[inline]
    pub fn has_discard(&self) -> bool {
        self.discard.is_some()
    }

    /// The minimum value, or `None` if the heap is empty.
    #[inline]
    pub fn peek_min(&self) -> Option<&T> {
        self.data.first()
    }

    /// Iterates over every value in raw storage order.
    ///
    /// The order is neither sorted nor breadth-first by priority; it is the
    /// order values happen to occupy in the backing array.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Calls `f` on every value in raw storage order.
    ///
    /// The traversal always visits every value.
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.data.iter().for_each(f);
    }

    /// Discards every value through the discard hook, keeping the storage.
    pub fn clear(&mut self) {
        match self.discard.as_mut() {
            Some(hook) => self.data.drain(..).for_each(|value| hook(value)),
            None => self.data.clear(),
        }
    }

    /// Consumes the heap and returns its values in raw storage order.
    ///
    /// Ownership of every value passes to the caller.
    pub fn into_vec(mut self) -> Vec<T> {
        std::mem::take(&mut self.data)
    }

    fn dispose(&mut self, value: T) {
        match self.discard.as_mut() {
            Some(hook) => hook(value),
            None => drop(value),
        }
    }

    /// Passes every value of `values` to the discard hook.
    pub(crate) fn dispose_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.dispose(value);
        }
    }
}

impl<T, C: Comparator<T>> MinMaxHeap<T, C> {
    /// Creates an empty unbounded heap ordered by `cmp`.
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(DEFAULT_CHUNK_SIZE),
            capacity: DEFAULT_CHUNK_SIZE,
            limit: Bound::Unbounded,
            cmp,
            discard: None,
            #[cfg(test)]
            growth_ceiling: None,
        }
    }

    /// Creates a heap that retains at most `bound` values.
    ///
    /// A `bound` of 0 creates an unbounded heap.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`] if `bound == 1`, or
    /// [`ReservoirError::AllocationFailed`] if storage for `bound` values
    /// cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use reservoircraft::core::{MinMaxHeap, Natural};
    ///
    /// let heap: MinMaxHeap<u32> = MinMaxHeap::bounded(4, Natural).unwrap();
    /// assert_eq!(heap.bound(), 4);
    /// assert_eq!(heap.capacity(), 4);
    ///
    /// assert!(MinMaxHeap::<u32>::bounded(1, Natural).is_err());
    /// ```
    pub fn bounded(bound: usize, cmp: C) -> Result<Self> {
        Self::with_limit(Bound::new(bound)?, cmp)
    }

    /// Creates a heap with the given [`Bound`].
    ///
    /// # Errors
    ///
    /// Same as [`bounded`](Self::bounded).
    pub fn with_limit(limit: Bound, cmp: C) -> Result<Self> {
        let capacity = match limit {
            Bound::Unbounded => DEFAULT_CHUNK_SIZE,
            Bound::AtMost(n) if n < 2 => {
                return Err(ReservoirError::invalid_bound(n as i64));
            }
            Bound::AtMost(n) => n,
        };

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| ReservoirError::allocation_failed(capacity))?;

        Ok(Self {
            data,
            capacity,
            limit,
            cmp,
            discard: None,
            #[cfg(test)]
            growth_ceiling: None,
        })
    }

    /// Inserts `value`, applying bounded eviction when the heap is full.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::AllocationFailed`] if an unbounded heap
    /// cannot grow its storage. `value` has already been discarded in that
    /// case and the heap is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use reservoircraft::core::{Insertion, MinMaxHeap, Natural};
    ///
    /// let mut heap = MinMaxHeap::bounded(2, Natural).unwrap();
    /// assert_eq!(heap.insert(10).unwrap(), Insertion::Inserted);
    /// assert_eq!(heap.insert(20).unwrap(), Insertion::Inserted);
    /// assert_eq!(heap.insert(5).unwrap(), Insertion::Rejected);
    /// assert_eq!(heap.insert(10).unwrap(), Insertion::Rejected);
    /// assert_eq!(heap.insert(15).unwrap(), Insertion::Replaced);
    /// assert_eq!(heap.peek_min(), Some(&15));
    /// ```
    pub fn insert(&mut self, value: T) -> Result<Insertion> {
        let mut outcome = Insertion::Inserted;

        if self.is_full() {
            let admit = match self.data.first() {
                Some(min) => self.cmp.greater(&value, min),
                None => true,
            };
            if !admit {
                #[cfg(feature = "trace")]
                tracing::trace!(len = self.data.len(), "min-max heap rejected value");
                self.dispose(value);
                return Ok(Insertion::Rejected);
            }
            if let Some(evicted) = self.pop_min() {
                #[cfg(feature = "trace")]
                tracing::trace!(len = self.data.len(), "min-max heap evicted minimum");
                self.dispose(evicted);
            }
            outcome = Insertion::Replaced;
        }

        if self.data.len() == self.capacity {
            if let Err(err) = self.grow() {
                self.dispose(value);
                return Err(err);
            }
        }

        self.data.push(value);
        self.bubble_up(self.data.len());
        Ok(outcome)
    }

    /// The maximum value, or `None` if the heap is empty.
    #[inline]
    pub fn peek_max(&self) -> Option<&T> {
        self.max_node().map(|n| self.at(n))
    }

    /// Removes and returns the minimum value.
    ///
    /// Ownership passes to the caller; the discard hook is not invoked.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.swap_remove(level::slot(ROOT));
        if !self.data.is_empty() {
            self.trickle_down(ROOT);
        }
        Some(min)
    }

    /// Removes and returns the maximum value.
    ///
    /// Ownership passes to the caller; the discard hook is not invoked.
    pub fn pop_max(&mut self) -> Option<T> {
        let node = self.max_node()?;
        let max = self.data.swap_remove(level::slot(node));
        if node <= self.data.len() {
            self.trickle_down(node);
        }
        Some(max)
    }

    /// Consumes the heap and returns its values in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(value) = self.pop_min() {
            sorted.push(value);
        }
        sorted
    }

    /// Removes and returns every value in descending order, leaving the heap
    /// empty but otherwise intact.
    pub fn drain_descending(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(value) = self.pop_max() {
            sorted.push(value);
        }
        sorted
    }

    fn grow(&mut self) -> Result<()> {
        let requested = self.capacity.saturating_mul(2).max(DEFAULT_CHUNK_SIZE);
        let additional = requested - self.data.len();
        #[cfg(test)]
        let refused = self.growth_ceiling.is_some_and(|max| requested > max);
        #[cfg(not(test))]
        let refused = false;
        if refused || self.data.try_reserve_exact(additional).is_err() {
            #[cfg(feature = "trace")]
            tracing::warn!(requested, "min-max heap failed to grow storage");
            return Err(ReservoirError::allocation_failed(requested));
        }
        self.capacity = requested;
        Ok(())
    }

    #[inline]
    fn at(&self, node: usize) -> &T {
        &self.data[level::slot(node)]
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(level::slot(a), level::slot(b));
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.cmp.less(self.at(a), self.at(b))
    }

    #[inline]
    fn greater(&self, a: usize, b: usize) -> bool {
        self.cmp.greater(self.at(a), self.at(b))
    }

    /// Node holding the maximum value.
    fn max_node(&self) -> Option<usize> {
        match self.data.len() {
            0 => None,
            1 => Some(ROOT),
            2 => Some(level::first_child(ROOT)),
            _ => {
                let left = level::first_child(ROOT);
                let right = level::second_child(ROOT);
                Some(if self.less(left, right) { right } else { left })
            }
        }
    }

    fn bubble_up(&mut self, node: usize) {
        if node == ROOT {
            return;
        }
        let parent = level::parent(node);
        if level::is_min_level(node) {
            if self.greater(node, parent) {
                self.swap(node, parent);
                self.bubble_up_max(parent);
            } else {
                self.bubble_up_min(node);
            }
        } else if self.less(node, parent) {
            self.swap(node, parent);
            self.bubble_up_min(parent);
        } else {
            self.bubble_up_max(node);
        }
    }

    fn bubble_up_min(&mut self, mut node: usize) {
        while node >= 4 {
            let grandparent = level::grandparent(node);
            if !self.less(node, grandparent) {
                break;
            }
            self.swap(node, grandparent);
            node = grandparent;
        }
    }

    fn bubble_up_max(&mut self, mut node: usize) {
        while node >= 4 {
            let grandparent = level::grandparent(node);
            if !self.greater(node, grandparent) {
                break;
            }
            self.swap(node, grandparent);
            node = grandparent;
        }
    }

    fn trickle_down(&mut self, node: usize) {
        if level::is_min_level(node) {
            self.trickle_down_min(node);
        } else {
            self.trickle_down_max(node);
        }
    }

    fn trickle_down_min(&mut self, mut node: usize) {
        let len = self.data.len();
        loop {
            let mut smallest = None;
            for candidate in level::descendants(node, len) {
                match smallest {
                    Some(best) if !self.less(candidate, best) => {}
                    _ => smallest = Some(candidate),
                }
            }
            let Some(m) = smallest else { return };

            if !self.less(m, node) {
                return;
            }
            self.swap(m, node);

            if !level::is_grandchild(node, m) {
                return;
            }
            let parent = level::parent(m);
            if self.greater(m, parent) {
                self.swap(m, parent);
            }
            node = m;
        }
    }

    fn trickle_down_max(&mut self, mut node: usize) {
        let len = self.data.len();
        loop {
            let mut largest = None;
            for candidate in level::descendants(node, len) {
                match largest {
                    Some(best) if !self.greater(candidate, best) => {}
                    _ => largest = Some(candidate),
                }
            }
            let Some(m) = largest else { return };

            if !self.greater(m, node) {
                return;
            }
            self.swap(m, node);

            if !level::is_grandchild(node, m) {
                return;
            }
            let parent = level::parent(m);
            if self.less(m, parent) {
                self.swap(m, parent);
            }
            node = m;
        }
    }

    /// Makes storage growth past `max` slots fail with `AllocationFailed`.
    #[cfg(test)]
    pub(crate) fn limit_growth(&mut self, max: usize) {
        self.growth_ceiling = Some(max);
    }

    /// Checks the min-max ordering of every node against its descendants.
    #[cfg(test)]
    pub(crate) fn is_well_ordered(&self) -> bool {
        let len = self.data.len();
        (ROOT..=len).all(|node| {
            let mut stack = vec![level::first_child(node), level::second_child(node)];
            while let Some(d) = stack.pop() {
                if d > len {
                    continue;
                }
                let ok = if level::is_min_level(node) {
                    !self.greater(node, d)
                } else {
                    !self.less(node, d)
                };
                if !ok {
                    return false;
                }
                stack.push(level::first_child(d));
                stack.push(level::second_child(d));
            }
            true
        })
    }
}

impl<'a, T, C> IntoIterator for &'a MinMaxHeap<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Inserts every value. An allocation failure cannot be reported through
/// `Extend`; the failed value goes to the discard hook, a warning is logged,
/// and the remaining values are still offered.
impl<T, C: Comparator<T>> Extend<T> for MinMaxHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

impl<T, C> Drop for MinMaxHeap<T, C> {
    fn drop(&mut self) {
        if let Some(hook) = self.discard.as_mut() {
            for value in self.data.drain(..) {
                hook(value);
            }
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for MinMaxHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinMaxHeap")
            .field("len", &self.data.len())
            .field("capacity", &self.capacity)
            .field("limit", &self.limit)
            .field("has_discard", &self.discard.is_some())
            .field("data", &self.data)
            .finish()
    }
}
