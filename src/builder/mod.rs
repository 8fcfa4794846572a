//! Builder pattern for heap and reservoir construction.
//!
//! # Design Philosophy
//!
//! ## Type-State Pattern
//!
//! Builders use the type-state pattern to enforce parameter requirements at
//! compile time: a heap cannot be built before it has an order, and a
//! reservoir cannot be built before it has a capacity.
//!
//! ## Error Handling
//!
//! - **Compile-time errors**: missing comparator or capacity
//! - **Runtime errors**: invalid values (a bound of 1, a negative capacity)
//!
//! # Examples
//!
//! ## Reservoir Builder
//!
//! ```
//! use reservoircraft::builder::ReservoirBuilder;
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let reservoir: EventReservoir<Sample<u64>> = ReservoirBuilder::new()
//!     .capacity(1_000)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Heap Builder
//!
//! ```
//! use reservoircraft::builder::MinMaxHeapBuilder;
//! use reservoircraft::core::Reverse;
//! use reservoircraft::core::Natural;
//!
//! let heap = MinMaxHeapBuilder::<i32, _>::new()
//!     .comparator(Reverse(Natural))
//!     .bound(16)
//!     .build()
//!     .unwrap();
//! assert_eq!(heap.capacity(), 16);
//! ```
//!
//! # Builder Comparison
//!
//! | Builder | Required | Optional |
//! |---------|----------|----------|
//! | Heap | comparator | bound, on_discard |
//! | Reservoir | capacity | name, on_discard |

#![allow(clippy::module_name_repetitions)]

pub mod heap;
pub mod reservoir;

pub use heap::{MinMaxHeapBuilder, NoComparator};
pub use reservoir::ReservoirBuilder;

/// Validation shared by builders and configuration.
pub(crate) mod validation {
    use crate::core::Bound;
    use crate::error::{ReservoirError, Result};

    /// Validate a signed capacity.
    ///
    /// # Errors
    ///
    /// Returns error if `capacity < 0` or `capacity == 1`.
    #[inline]
    pub fn validate_capacity(capacity: i64) -> Result<Bound> {
        Bound::try_from(capacity)
    }

    /// Validate a reservoir name.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is empty or whitespace.
    #[inline]
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ReservoirError::invalid_parameters(
                "reservoir name must not be blank",
            ));
        }
        Ok(())
    }
}

/// Prelude for convenient builder imports.
pub mod prelude {
    pub use super::{MinMaxHeapBuilder, ReservoirBuilder};
}
