//! Shared utilities and data generators for all benchmarks
//!
//! This module provides:
//! - Seeded priority generators (uniform, ascending, descending, clustered)
//! - Common benchmark constants (capacities, stream lengths)
//! - Helpers that turn priorities into timestamped samples
//!
//! Generators are seeded so every run sees the same stream.
#![allow(dead_code)]
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reservoircraft::{EventReservoir, Sample};

// CONSTANTS

/// Seed for every generator.
pub const SEED: u64 = 0x5EED_CAFE;

/// Reservoir capacities to sweep.
pub const CAPACITIES: &[usize] = &[100, 1_000, 10_000];

/// Number of events offered per cycle.
pub const STREAM_LEN: usize = 50_000;

// DATA GENERATORS

/// Seeded RNG for a benchmark.
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Uniform priorities in `[0, 1)`, the typical distribution of sampling
/// priorities assigned at random.
pub fn uniform_priorities(count: usize) -> Vec<f64> {
    let dist = Uniform::new(0.0, 1.0);
    let mut rng = rng();
    (0..count).map(|_| dist.sample(&mut rng)).collect()
}

/// Strictly increasing priorities: every newcomer beats the minimum, so a
/// full reservoir evicts on every insert.
pub fn ascending_priorities(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64).collect()
}

/// Strictly decreasing priorities: a full reservoir rejects every newcomer.
pub fn descending_priorities(count: usize) -> Vec<f64> {
    (0..count).rev().map(|i| i as f64).collect()
}

/// Priorities concentrated on a handful of values, with many ties broken by
/// timestamp.
pub fn clustered_priorities(count: usize) -> Vec<f64> {
    let mut rng = rng();
    (0..count).map(|_| f64::from(rng.gen_range(0u8..4))).collect()
}

// HELPERS

/// Wraps priorities into samples with increasing timestamps.
pub fn samples(priorities: &[f64]) -> Vec<Sample<u64>> {
    priorities
        .iter()
        .enumerate()
        .map(|(i, &p)| Sample::new(p, i as u64, i as u64))
        .collect()
}

/// A reservoir of `capacity` already filled from `priorities`.
pub fn filled_reservoir(capacity: usize, priorities: &[f64]) -> EventReservoir<Sample<u64>> {
    let mut reservoir = EventReservoir::new(capacity).unwrap();
    for sample in samples(priorities) {
        reservoir.add(sample).unwrap();
    }
    reservoir
}
