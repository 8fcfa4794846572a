//! ReservoirCraft: bounded priority sampling for telemetry events.
//!
//! A telemetry agent produces far more events than it can report. An
//! [`EventReservoir`] keeps a fixed number of them per collection cycle,
//! always the highest-priority ones seen so far, and counts the rest so the
//! agent can report how much was dropped.
//!
//! The reservoir is built on a [`MinMaxHeap`]: a complete binary tree whose
//! even levels are min-ordered and odd levels max-ordered, so both the
//! lowest and the highest value are reachable in O(1) and removable in
//! O(log n). A full reservoir compares every newcomer against its minimum and
//! either rejects the newcomer or evicts the minimum.
//!
//! # Quick Start
//!
//! ```
//! use reservoircraft::{EventReservoir, Sample};
//!
//! let mut reservoir = EventReservoir::new(3).unwrap();
//! for (tick, priority) in [0.4, 0.9, 0.1, 0.7, 0.2].into_iter().enumerate() {
//!     reservoir.add(Sample::new(priority, tick as u64, tick)).unwrap();
//! }
//!
//! assert_eq!(reservoir.number_seen(), 5);
//! assert_eq!(reservoir.number_saved(), 3);
//! assert_eq!(reservoir.number_dropped(), 2);
//!
//! let harvest = reservoir.harvest();
//! let kept: Vec<f64> = harvest.events.iter().map(|s| s.priority).collect();
//! assert_eq!(kept, vec![0.9, 0.7, 0.4]);
//! ```
//!
//! # The Heap on Its Own
//!
//! ```
//! use reservoircraft::MinMaxHeap;
//!
//! let mut heap = MinMaxHeap::new();
//! for v in [5, 1, 9, 3, 7] {
//!     heap.insert(v).unwrap();
//! }
//! assert_eq!(heap.peek_min(), Some(&1));
//! assert_eq!(heap.peek_max(), Some(&9));
//! assert_eq!(heap.pop_max(), Some(9));
//! assert_eq!(heap.pop_max(), Some(7));
//! ```
//!
//! # Discarded Values
//!
//! Values a heap gives up on (rejected newcomers, evicted minimums, anything
//! still stored when it is cleared or dropped) are handed to an optional
//! discard hook exactly once. Values taken out with `pop_min`/`pop_max` or
//! `into_vec` are returned to the caller instead.
//!
//! ```
//! use reservoircraft::{EventReservoir, Sample};
//! use std::sync::{Arc, Mutex};
//!
//! let dropped = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&dropped);
//!
//! let mut reservoir = EventReservoir::builder()
//!     .capacity(2)
//!     .on_discard(move |s: Sample<&str>| sink.lock().unwrap().push(s.payload))
//!     .build()
//!     .unwrap();
//!
//! reservoir.add(Sample::new(0.5, 1, "a")).unwrap();
//! reservoir.add(Sample::new(0.8, 2, "b")).unwrap();
//! reservoir.add(Sample::new(0.1, 3, "c")).unwrap(); // rejected
//! reservoir.add(Sample::new(0.9, 4, "d")).unwrap(); // evicts "a"
//!
//! assert_eq!(*dropped.lock().unwrap(), vec!["c", "a"]);
//! ```
//!
//! # Concurrency
//!
//! Heaps and reservoirs perform no locking. Share one between producer
//! threads through [`SharedReservoir`], or give each producer its own and
//! [`merge`](EventReservoir::merge) them.
//!
//! # Features
//!
//! - `trace` (default) - `tracing` events on construction, harvest, merge,
//!   eviction and allocation failure
//! - `serde` - `Serialize`/`Deserialize` for samples, stats and
//!   configuration, plus JSON export helpers in [`serde_support`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/reservoircraft/0.1.0")]

/// Min-max heap, comparators and bounds
pub mod core;

/// Error types and result aliases
pub mod error;

/// Event reservoirs, events, clocks and configuration
pub mod reservoir;

/// Reservoir statistics and cross-cycle metrics
pub mod metrics;

/// Mutex-guarded reservoir for concurrent producers
pub mod sync;

/// Type-safe builders for heaps and reservoirs
pub mod builder;

/// Serialization support (requires `serde` feature)
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_support;

// Re-export commonly used types at crate root
pub use error::{ReservoirError, Result};

pub use crate::core::{Bound, Comparator, Insertion, MinMaxHeap, Natural};

pub use reservoir::{
    Clock, Event, EventOrder, EventReservoir, Harvest, ManualClock, MonotonicClock,
    ReservoirConfig, Sample,
};

pub use metrics::{ReservoirMetrics, ReservoirStats};

pub use builder::{MinMaxHeapBuilder, ReservoirBuilder};

pub use sync::SharedReservoir;

#[cfg(feature = "serde")]
pub use serde_support::ExportEnvelope;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use reservoircraft::prelude::*;
///
/// let mut reservoir = EventReservoir::new(10).unwrap();
/// reservoir.add(Sample::new(1.0, 0, ())).unwrap();
/// assert_eq!(reservoir.stats().saved, 1);
/// ```
pub mod prelude {
    pub use crate::builder::{MinMaxHeapBuilder, ReservoirBuilder};
    pub use crate::core::{Bound, Comparator, Insertion, MinMaxHeap, Natural, Reverse};
    pub use crate::error::{ReservoirError, Result};
    pub use crate::metrics::{ReservoirMetrics, ReservoirStats};
    pub use crate::reservoir::{
        Clock, Event, EventOrder, EventReservoir, Harvest, ManualClock, MonotonicClock,
        ReservoirConfig, Sample,
    };
    pub use crate::sync::SharedReservoir;

    #[cfg(feature = "serde")]
    pub use crate::serde_support::{ExportEnvelope, ReservoirSerdeSupport};
}
