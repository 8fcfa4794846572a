//! Builder for event reservoirs.
//!
//! # Type-State Pattern
//!
//! Capacity is the one required parameter, so `build()` is only available
//! after it has been chosen:
//!
//! ```text
//! Initial ──.capacity(n) / .unbounded()──► WithCapacity ──.build()──► EventReservoir
//! ```
//!
//! # Examples
//!
//! ```
//! use reservoircraft::builder::ReservoirBuilder;
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let reservoir: EventReservoir<Sample<&str>> = ReservoirBuilder::new()
//!     .capacity(100)
//!     .name("span_events")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(reservoir.capacity(), 100);
//! assert_eq!(reservoir.name(), "span_events");
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use reservoircraft::builder::ReservoirBuilder;
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let result: Result<EventReservoir<Sample<()>>, _> = ReservoirBuilder::new()
//!     .capacity(-1)
//!     .build();
//! assert!(result.is_err());
//! ```

use super::validation;
use crate::core::DiscardFn;
use crate::error::Result;
use crate::reservoir::config::DEFAULT_NAME;
use crate::reservoir::{Event, EventReservoir};
use std::marker::PhantomData;

/// Type-state marker: capacity not set.
pub struct Initial;

/// Type-state marker: capacity set, ready to build.
pub struct WithCapacity;

/// Builder for [`EventReservoir`] with type-state guarantees.
pub struct ReservoirBuilder<E, State = Initial> {
    capacity: i64,
    name: String,
    discard: Option<DiscardFn<E>>,
    _state: PhantomData<State>,
}

impl<E: Event> ReservoirBuilder<E, Initial> {
    /// Create a new reservoir builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: 0,
            name: DEFAULT_NAME.to_string(),
            discard: None,
            _state: PhantomData,
        }
    }

    /// Set the maximum number of retained events.
    ///
    /// Signed so values read from configuration can be passed through and
    /// rejected at [`build`](ReservoirBuilder::build) time when negative.
    #[must_use]
    pub fn capacity(self, capacity: i64) -> ReservoirBuilder<E, WithCapacity> {
        ReservoirBuilder {
            capacity,
            name: self.name,
            discard: self.discard,
            _state: PhantomData,
        }
    }

    /// Retain every event.
    #[must_use]
    pub fn unbounded(self) -> ReservoirBuilder<E, WithCapacity> {
        self.capacity(0)
    }
}

impl<E: Event> Default for ReservoirBuilder<E, Initial> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, State> ReservoirBuilder<E, State> {
    /// Set the name used in logs and metric names.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the hook that receives every discarded event.
    #[must_use]
    pub fn on_discard<F>(mut self, hook: F) -> Self
    where
        F: FnMut(E) + Send + 'static,
    {
        self.discard = Some(Box::new(hook));
        self
    }
}

impl<E: Event> ReservoirBuilder<E, WithCapacity> {
    /// Build the reservoir.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`](crate::ReservoirError::InvalidBound)
    /// for a negative capacity or a capacity of 1, and
    /// [`ReservoirError::InvalidParameters`](crate::ReservoirError::InvalidParameters)
    /// for a blank name.
    pub fn build(self) -> Result<EventReservoir<E>> {
        validation::validate_name(&self.name)?;
        let limit = validation::validate_capacity(self.capacity)?;
        let mut reservoir = EventReservoir::with_limit(limit, &self.name)?;
        if let Some(hook) = self.discard {
            reservoir.on_discard_boxed(hook);
        }
        Ok(reservoir)
    }
}
