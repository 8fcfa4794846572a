//! Reservoir configuration.
//!
//! Capacity is signed here because configuration arrives from files and
//! environment variables, where a negative value is a user error to report,
//! not a type error to hide.

use crate::builder::validation;
use crate::core::Bound;
use crate::error::Result;

/// Default number of events retained per harvest cycle.
pub const DEFAULT_CAPACITY: i64 = 10_000;

/// Default reservoir name used in logs and metric names.
pub const DEFAULT_NAME: &str = "events";

/// Configuration for an [`EventReservoir`](super::EventReservoir).
///
/// # Examples
///
/// ```
/// use reservoircraft::reservoir::ReservoirConfig;
/// use reservoircraft::EventReservoir;
/// use reservoircraft::Sample;
///
/// let config = ReservoirConfig {
///     capacity: 2,
///     name: "span_events".into(),
/// };
/// let reservoir: EventReservoir<Sample<()>> = EventReservoir::from_config(&config).unwrap();
/// assert_eq!(reservoir.name(), "span_events");
/// assert_eq!(reservoir.capacity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReservoirConfig {
    /// Maximum retained events; 0 for unbounded.
    pub capacity: i64,
    /// Name used in logs and metric names.
    pub name: String,
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl ReservoirConfig {
    /// Creates a configuration with the given capacity and the default name.
    #[must_use]
    pub fn with_capacity(capacity: i64) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Checks the configuration and returns the heap bound it describes.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::InvalidBound`](crate::ReservoirError::InvalidBound)
    /// for a negative capacity or a capacity of 1, and
    /// [`ReservoirError::InvalidParameters`](crate::ReservoirError::InvalidParameters)
    /// for a blank name.
    pub fn validate(&self) -> Result<Bound> {
        validation::validate_name(&self.name)?;
        validation::validate_capacity(self.capacity)
    }
}
