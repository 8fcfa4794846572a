//! Harvest payload handed to the transport layer.
//!
//! The payload is a two-element array: the cycle's statistics followed by
//! the harvested events, highest priority first.
//!
//! ```text
//! [ {"seen":8,"saved":4,"dropped":4,...}, [ event, event, ... ] ]
//! ```

use crate::error::{ReservoirError, Result};
use crate::metrics::ReservoirStats;
use crate::reservoir::{Event, EventReservoir, Harvest};
use serde::de::DeserializeOwned;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Statistics and events of one harvest cycle.
///
/// # Examples
///
/// ```
/// use reservoircraft::serde_support::ExportEnvelope;
/// use reservoircraft::{EventReservoir, Sample};
///
/// let mut reservoir = EventReservoir::new(2).unwrap();
/// for (tick, p) in [1.0, 5.0, 3.0].into_iter().enumerate() {
///     reservoir.add(Sample::new(p, tick as u64, tick)).unwrap();
/// }
///
/// let envelope = ExportEnvelope::from(reservoir.harvest());
/// let json = envelope.to_json().unwrap();
/// assert!(json.starts_with("[{\"seen\":3,\"saved\":2,\"dropped\":1"));
///
/// let decoded: ExportEnvelope<Sample<usize>> = ExportEnvelope::from_json(&json).unwrap();
/// assert_eq!(decoded, envelope);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEnvelope<E> {
    /// Accounting of the cycle.
    pub stats: ReservoirStats,
    /// Events, highest priority first.
    pub events: Vec<E>,
}

impl<E> ExportEnvelope<E> {
    /// Builds an envelope from a snapshot of `reservoir` without harvesting
    /// it.
    pub fn capture(reservoir: &EventReservoir<E>) -> Self
    where
        E: Event + Clone,
    {
        Self {
            stats: reservoir.stats(),
            events: reservoir.to_sorted_vec(),
        }
    }

    /// Encodes the envelope as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::SerializationError`] if an event fails to
    /// serialize.
    pub fn to_json(&self) -> Result<String>
    where
        E: Serialize,
    {
        serde_json::to_string(self).map_err(|e| ReservoirError::serialization_error(e.to_string()))
    }

    /// Decodes an envelope from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::SerializationError`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self>
    where
        E: DeserializeOwned,
    {
        serde_json::from_str(json).map_err(|e| ReservoirError::serialization_error(e.to_string()))
    }
}

impl<E> From<Harvest<E>> for ExportEnvelope<E> {
    fn from(harvest: Harvest<E>) -> Self {
        Self {
            stats: harvest.stats,
            events: harvest.events,
        }
    }
}

impl<E: Serialize> Serialize for ExportEnvelope<E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.stats)?;
        tuple.serialize_element(&self.events)?;
        tuple.end()
    }
}

impl<'de, E: Deserialize<'de>> Deserialize<'de> for ExportEnvelope<E> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (stats, events) = <(ReservoirStats, Vec<E>)>::deserialize(deserializer)?;
        Ok(Self { stats, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservoir::Sample;
    use serde_json::json;

    fn filled() -> EventReservoir<Sample<&'static str>> {
        let mut reservoir = EventReservoir::new(2).unwrap();
        reservoir.add(Sample::new(0.2, 1, "low")).unwrap();
        reservoir.add(Sample::new(0.9, 2, "high")).unwrap();
        reservoir.add(Sample::new(0.5, 3, "mid")).unwrap();
        reservoir
    }

    #[test]
    fn test_payload_shape() {
        let envelope = ExportEnvelope::capture(&filled());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!([
                {"seen": 3, "saved": 2, "dropped": 1, "rejected": 0, "evicted": 1, "capacity": 2},
                [
                    {"priority": 0.9, "timestamp": 2, "payload": "high"},
                    {"priority": 0.5, "timestamp": 3, "payload": "mid"}
                ]
            ])
        );
    }

    #[test]
    fn test_capture_does_not_mutate() {
        let reservoir = filled();
        let first = ExportEnvelope::capture(&reservoir);
        let second = ExportEnvelope::capture(&reservoir);
        assert_eq!(first, second);
        assert_eq!(reservoir.number_saved(), 2);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let err = ExportEnvelope::<Sample<u8>>::from_json("{\"stats\":{}}").unwrap_err();
        assert!(matches!(err, ReservoirError::SerializationError { .. }));
    }

    #[test]
    fn test_empty_harvest() {
        let mut reservoir: EventReservoir<Sample<u8>> = EventReservoir::new(4).unwrap();
        let envelope = ExportEnvelope::from(reservoir.harvest());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!([
                {"seen": 0, "saved": 0, "dropped": 0, "rejected": 0, "evicted": 0, "capacity": 4},
                []
            ])
        );
    }
}
