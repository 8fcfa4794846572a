//! Thread-safe access to event reservoirs.
//!
//! [`EventReservoir`](crate::EventReservoir) performs no locking of its own;
//! it is meant to be owned by one producer for one collection cycle. Hosts
//! with concurrent producers have two options:
//!
//! - share one [`SharedReservoir`] (a mutex around a reservoir) between all
//!   producers, or
//! - give each producer a local reservoir and [`merge`](SharedReservoir::merge)
//!   it into a shared one when the producer finishes.
//!
//! # Safety
//!
//! - No data races: all access goes through a `parking_lot::Mutex`
//! - No lost events: each `add` is applied under the lock
//! - No poisoning: a panicking producer does not wedge the reservoir

pub mod shared;

pub use shared::SharedReservoir;
