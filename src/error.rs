//! Error types for reservoir and heap operations.
//!
//! Construction problems (a bound of 1, a negative bound read from config) are
//! reported when the structure is built, never as a half-built value. The only
//! runtime failure is running out of memory while an unbounded heap grows,
//! which surfaces as [`ReservoirError::AllocationFailed`] instead of a silently
//! lost insert.
//!
//! # Error Propagation
//!
//! ```
//! use reservoircraft::{EventReservoir, Result, Sample};
//!
//! fn collect(capacity: usize, priorities: &[f64]) -> Result<u64> {
//!     let mut reservoir = EventReservoir::new(capacity)?;
//!     for (tick, priority) in priorities.iter().enumerate() {
//!         reservoir.add(Sample::new(*priority, tick as u64, ()))?;
//!     }
//!     Ok(reservoir.number_dropped())
//! }
//! # assert_eq!(collect(2, &[0.5, 0.9, 0.1]).unwrap(), 1);
//! # assert!(collect(1, &[0.5]).is_err());
//! ```

#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Result type alias for reservoir operations.
///
/// All fallible operations in this crate return [`Result<T>`] where the error
/// type is [`ReservoirError`].
pub type Result<T> = std::result::Result<T, ReservoirError>;

/// Errors that can occur while building or filling a heap or reservoir.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservoirError {
    /// The requested bound cannot describe a reservoir.
    ///
    /// Negative bounds are meaningless, and a bound of exactly 1 leaves no
    /// distinction between the minimum and the maximum, so it is rejected
    /// rather than coerced.
    InvalidBound {
        /// The bound that was provided.
        bound: i64,
    },

    /// Invalid parameters provided during construction.
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// Growing the backing storage of an unbounded heap failed.
    ///
    /// The value being inserted has been handed to the discard hook; the heap
    /// itself is unchanged.
    AllocationFailed {
        /// Number of element slots that could not be reserved.
        requested: usize,
    },

    /// Serialization or deserialization failed.
    #[cfg(feature = "serde")]
    SerializationError {
        /// Description of what failed.
        message: String,
    },
}

impl fmt::Display for ReservoirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBound { bound } => {
                write!(
                    f,
                    "Invalid bound: {}. Bound must be 0 (unbounded) or at least 2.",
                    bound
                )
            }
            Self::InvalidParameters { message } => {
                write!(f, "Invalid reservoir parameters: {}.", message)
            }
            Self::AllocationFailed { requested } => {
                write!(
                    f,
                    "Allocation failed while growing heap storage to {} slots; the pending value was discarded.",
                    requested
                )
            }
            #[cfg(feature = "serde")]
            Self::SerializationError { message } => {
                write!(f, "Serialization error: {}.", message)
            }
        }
    }
}

impl std::error::Error for ReservoirError {}

impl ReservoirError {
    /// Create an `InvalidBound` error.
    #[must_use]
    pub fn invalid_bound(bound: i64) -> Self {
        Self::InvalidBound { bound }
    }

    /// Create an `InvalidParameters` error with a formatted message.
    ///
    /// # Examples
    /// ```
    /// use reservoircraft::ReservoirError;
    ///
    /// let err = ReservoirError::invalid_parameters(
    ///     format!("reservoir name {:?} is empty", "")
    /// );
    /// assert!(err.to_string().contains("empty"));
    /// ```
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create an `AllocationFailed` error.
    #[must_use]
    pub fn allocation_failed(requested: usize) -> Self {
        Self::AllocationFailed { requested }
    }

    /// Create a `SerializationError`.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was raised while building a structure
    /// rather than while using one.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBound { .. } | Self::InvalidParameters { .. }
        )
    }
}
