//! Comparators for heap ordering.
//!
//! A [`Comparator`] is a three-way total order over heap values. It is fixed
//! when the heap is built and never replaced. Any `Fn(&T, &T) -> Ordering`
//! closure is a comparator, so state the order depends on is captured by the
//! closure itself.
//!
//! # Examples
//!
//! ```
//! use reservoircraft::core::{Comparator, Natural, Reverse};
//! use std::cmp::Ordering;
//!
//! assert_eq!(Natural.compare(&1, &2), Ordering::Less);
//! assert_eq!(Reverse(Natural).compare(&1, &2), Ordering::Greater);
//!
//! let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
//! assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A total order over values of type `T`.
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns `true` if `a` orders strictly before `b`.
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns `true` if `a` orders strictly after `b`.
    #[inline]
    fn greater(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Orders values by a key extracted with `F`.
///
/// ```
/// use reservoircraft::core::{ByKey, Comparator};
/// use std::cmp::Ordering;
///
/// let by_second = ByKey(|pair: &(u8, u32)| pair.1);
/// assert_eq!(by_second.compare(&(9, 1), &(0, 2)), Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<T, K, F> Comparator<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&3, &3), Ordering::Equal);
        assert!(Natural.less(&1, &2));
        assert!(Natural.greater(&"b", &"a"));
    }

    #[test]
    fn test_reverse() {
        let cmp = Reverse(Natural);
        assert!(cmp.less(&5, &1));
        assert!(cmp.greater(&1, &5));
        assert_eq!(cmp.compare(&2, &2), Ordering::Equal);
    }

    #[test]
    fn test_closure_captures_state() {
        let pivot = 10i32;
        let distance = move |a: &i32, b: &i32| (a - pivot).abs().cmp(&(b - pivot).abs());
        assert!(distance.less(&9, &0));
        assert!(distance.greater(&25, &12));
    }

    #[test]
    fn test_by_key() {
        let cmp = ByKey(|s: &String| s.len());
        assert!(cmp.less(&"a".to_string(), &"bb".to_string()));
    }
}
