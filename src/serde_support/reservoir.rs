//! Serde support for event reservoirs.
//!
//! An [`EventReservoir`] serializes as a plain sequence of its retained
//! events in raw heap order, the same order [`EventReservoir::export`]
//! produces. Capacity and counters are not part of that sequence; use
//! [`ExportEnvelope`](super::ExportEnvelope) when the receiver needs them.
//!
//! Deserialization goes through [`ReservoirSerdeSupport::from_json`], which
//! needs a capacity to replay the events into.

use crate::error::{ReservoirError, Result};
use crate::reservoir::{Event, EventReservoir};
use serde::de::DeserializeOwned;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

impl<E: Event + Serialize> Serialize for EventReservoir<E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.heap().len()))?;
        for event in self.iter() {
            seq.serialize_element(event)?;
        }
        seq.end()
    }
}

/// JSON helpers for [`EventReservoir`].
pub struct ReservoirSerdeSupport;

impl ReservoirSerdeSupport {
    /// Serializes the retained events as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::SerializationError`] if an event fails to
    /// serialize.
    pub fn to_json<E: Event + Serialize>(reservoir: &EventReservoir<E>) -> Result<String> {
        serde_json::to_string(reservoir)
            .map_err(|e| ReservoirError::serialization_error(e.to_string()))
    }

    /// Rebuilds a reservoir of the given capacity from a JSON array of
    /// events.
    ///
    /// Each event is offered through [`EventReservoir::add`], so a capacity
    /// smaller than the array keeps only the highest-priority events and the
    /// rest count as dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::SerializationError`] for malformed input and
    /// [`ReservoirError::InvalidBound`] for a capacity of 1.
    pub fn from_json<E>(json: &str, capacity: usize) -> Result<EventReservoir<E>>
    where
        E: Event + DeserializeOwned,
    {
        let events: Vec<E> = serde_json::from_str(json)
            .map_err(|e| ReservoirError::serialization_error(e.to_string()))?;
        let mut reservoir = EventReservoir::new(capacity)?;
        for event in events {
            reservoir.add(event)?;
        }
        Ok(reservoir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservoir::Sample;

    #[test]
    fn test_serializes_as_sequence() {
        let mut reservoir = EventReservoir::new(4).unwrap();
        reservoir.add(Sample::new(2.0, 1, "b")).unwrap();
        reservoir.add(Sample::new(1.0, 2, "a")).unwrap();

        let value = serde_json::to_value(&reservoir).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        // Raw order: the minimum sits at the root.
        assert_eq!(array[0]["payload"], "a");
        assert_eq!(array[1]["priority"], 2.0);
    }

    #[test]
    fn test_empty_reservoir() {
        let reservoir: EventReservoir<Sample<u8>> = EventReservoir::new(4).unwrap();
        assert_eq!(ReservoirSerdeSupport::to_json(&reservoir).unwrap(), "[]");
    }

    #[test]
    fn test_json_round_trip_into_smaller_reservoir() {
        let mut reservoir = EventReservoir::new(0).unwrap();
        for i in 0..6u64 {
            reservoir.add(Sample::new(i as f64, i, i)).unwrap();
        }
        let json = ReservoirSerdeSupport::to_json(&reservoir).unwrap();

        let restored: EventReservoir<Sample<u64>> =
            ReservoirSerdeSupport::from_json(&json, 3).unwrap();
        assert_eq!(restored.number_seen(), 6);
        let mut payloads: Vec<u64> = restored.iter().map(|s| s.payload).collect();
        payloads.sort_unstable();
        assert_eq!(payloads, vec![3, 4, 5]);
    }

    #[test]
    fn test_malformed_json() {
        let err = ReservoirSerdeSupport::from_json::<Sample<u8>>("{not json", 4).unwrap_err();
        assert!(matches!(err, ReservoirError::SerializationError { .. }));
    }

    #[test]
    fn test_invalid_capacity() {
        let err = ReservoirSerdeSupport::from_json::<Sample<u8>>("[]", 1).unwrap_err();
        assert_eq!(err, ReservoirError::InvalidBound { bound: 1 });
    }
}
