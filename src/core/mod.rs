//! Core data structures for bounded priority sampling.
//!
//! - **Data Structures**: [`MinMaxHeap`], a double-ended priority queue with
//!   built-in bounded eviction
//! - **Ordering**: the [`Comparator`] trait and its stock implementations
//! - **Limits**: [`Bound`], the validated retention limit of a heap
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── heap.rs     - MinMaxHeap and bubble-up / trickle-down
//! ├── level.rs    - 1-based index arithmetic for the implicit tree
//! ├── compare.rs  - Comparator trait, Natural, Reverse, ByKey
//! └── mod.rs      - This file (Bound, public API)
//! ```
//!
//! # Examples
//!
//! ```
//! use reservoircraft::core::{Bound, MinMaxHeap, Natural};
//!
//! let limit = Bound::try_from(3i64).unwrap();
//! let mut heap = MinMaxHeap::with_limit(limit, Natural).unwrap();
//! for v in 0..10u32 {
//!     heap.insert(v).unwrap();
//! }
//! assert_eq!(heap.len(), 3);
//! assert_eq!(heap.peek_min(), Some(&7));
//! assert_eq!(heap.peek_max(), Some(&9));
//! ```

pub mod compare;
pub mod heap;
pub mod level;

pub use compare::{ByKey, Comparator, Natural, Reverse};
pub use heap::{DiscardFn, Insertion, MinMaxHeap, DEFAULT_CHUNK_SIZE};

use crate::error::{ReservoirError, Result};
use std::fmt;

/// Retention limit of a heap.
///
/// A limit of exactly one value is never valid: a single slot has no
/// distinction between minimum and maximum, so it is rejected instead of
/// being silently widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bound {
    /// No limit; storage grows on demand.
    #[default]
    Unbounded,
    /// At most this many values are retained (always at least 2 when built
    /// through [`Bound::new`] or `TryFrom`).
    AtMost(usize),
}

impl Bound {
    /// Validates a raw bound. 0 means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`] if `bound == 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reservoircraft::core::Bound;
    ///
    /// assert_eq!(Bound::new(0).unwrap(), Bound::Unbounded);
    /// assert_eq!(Bound::new(4).unwrap(), Bound::AtMost(4));
    /// assert!(Bound::new(1).is_err());
    /// ```
    pub fn new(bound: usize) -> Result<Self> {
        match bound {
            0 => Ok(Bound::Unbounded),
            1 => Err(ReservoirError::invalid_bound(1)),
            n => Ok(Bound::AtMost(n)),
        }
    }

    /// The raw bound, 0 when unbounded.
    #[inline]
    pub fn get(self) -> usize {
        match self {
            Bound::Unbounded => 0,
            Bound::AtMost(n) => n,
        }
    }

    /// Returns `true` if a limit is set.
    #[inline]
    pub fn is_bounded(self) -> bool {
        matches!(self, Bound::AtMost(_))
    }
}

impl TryFrom<i64> for Bound {
    type Error = ReservoirError;

    /// Validates a signed bound, as read from configuration.
    ///
    /// Negative values and 1 are rejected.
    fn try_from(bound: i64) -> Result<Self> {
        let raw = usize::try_from(bound).map_err(|_| ReservoirError::invalid_bound(bound))?;
        Bound::new(raw)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Unbounded => f.write_str("unbounded"),
            Bound::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_new() {
        assert_eq!(Bound::new(0), Ok(Bound::Unbounded));
        assert_eq!(Bound::new(2), Ok(Bound::AtMost(2)));
        assert_eq!(Bound::new(1), Err(ReservoirError::InvalidBound { bound: 1 }));
    }

    #[test]
    fn test_bound_try_from_signed() {
        assert_eq!(Bound::try_from(0i64), Ok(Bound::Unbounded));
        assert_eq!(Bound::try_from(4i64), Ok(Bound::AtMost(4)));
        assert_eq!(
            Bound::try_from(-1i64),
            Err(ReservoirError::InvalidBound { bound: -1 })
        );
        assert_eq!(
            Bound::try_from(1i64),
            Err(ReservoirError::InvalidBound { bound: 1 })
        );
    }

    #[test]
    fn test_bound_accessors() {
        assert_eq!(Bound::Unbounded.get(), 0);
        assert_eq!(Bound::AtMost(9).get(), 9);
        assert!(!Bound::default().is_bounded());
        assert!(Bound::AtMost(2).is_bounded());
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(Bound::Unbounded.to_string(), "unbounded");
        assert_eq!(Bound::AtMost(8).to_string(), "at most 8");
    }
}
