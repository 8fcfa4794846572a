//! Serialization support for reservoirs and harvest payloads.
//!
//! # Feature Flag
//!
//! This module is only available when the `serde` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! reservoircraft = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Formats
//!
//! | Type | Shape |
//! |------|-------|
//! | [`Sample<T>`](crate::Sample) | `{"priority", "timestamp", "payload"}` |
//! | [`ReservoirStats`](crate::ReservoirStats) | `{"seen", "saved", "dropped", "rejected", "evicted", "capacity"}` |
//! | [`ReservoirConfig`](crate::ReservoirConfig) | `{"capacity", "name"}`, missing fields defaulted |
//! | [`EventReservoir<E>`](crate::EventReservoir) | `[event, ...]` in raw heap order |
//! | [`ExportEnvelope<E>`] | `[stats, [event, ...]]`, highest priority first |
//!
//! # Examples
//!
//! ```
//! use reservoircraft::serde_support::ReservoirSerdeSupport;
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let mut reservoir = EventReservoir::new(10).unwrap();
//! reservoir.add(Sample::new(0.7, 1, "checkout")).unwrap();
//!
//! let json = ReservoirSerdeSupport::to_json(&reservoir).unwrap();
//! assert_eq!(json, r#"[{"priority":0.7,"timestamp":1,"payload":"checkout"}]"#);
//! ```

pub mod envelope;
pub mod reservoir;

pub use envelope::ExportEnvelope;
pub use reservoir::ReservoirSerdeSupport;

#[cfg(test)]
mod tests {
    use crate::reservoir::{ReservoirConfig, Sample};
    use crate::EventReservoir;

    #[test]
    fn test_config_defaults_missing_fields() {
        let config: ReservoirConfig = serde_json::from_str(r#"{"capacity": 250}"#).unwrap();
        assert_eq!(config.capacity, 250);
        assert_eq!(config.name, ReservoirConfig::default().name);

        let reservoir: EventReservoir<Sample<()>> = EventReservoir::from_config(&config).unwrap();
        assert_eq!(reservoir.capacity(), 250);
    }

    #[test]
    fn test_negative_config_capacity_fails_validation() {
        let config: ReservoirConfig = serde_json::from_str(r#"{"capacity": -3}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_round_trip() {
        let sample = Sample::new(1.5, 42, vec![1u8, 2, 3]);
        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample<Vec<u8>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
