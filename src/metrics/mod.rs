//! Accounting and observability for reservoirs.
//!
//! - [`ReservoirStats`]: per-cycle snapshot of seen, saved and dropped counts
//! - [`ReservoirMetrics`]: lock-free running totals across harvest cycles
//! - [`SupportabilityMetric`]: named counters handed to the reporting layer
//!
//! # Architecture
//!
//! ```text
//!   EventReservoir ──stats()──► ReservoirStats ──supportability()──► [SupportabilityMetric]
//!         │
//!     harvest()
//!         │
//!         ▼
//!   ReservoirMetrics (totals across cycles, Send + Sync)
//! ```
//!
//! # Thread Safety
//!
//! `ReservoirStats` is a plain value. `ReservoirMetrics` uses relaxed atomic
//! counters and is safe to clone into every producer thread.

pub mod collector;
pub mod stats;

pub use collector::{MetricsSnapshot, ReservoirMetrics};
pub use stats::{ReservoirStats, SupportabilityMetric};
