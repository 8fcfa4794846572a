//! Harvest loop example: several producer threads feed one shared reservoir
//! and a collector harvests it once per cycle.
//!
//! Run with: cargo run --example harvest_loop

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reservoircraft::prelude::*;
use std::sync::Arc;
use std::thread;

const CYCLES: usize = 3;
const PRODUCERS: u64 = 4;
const EVENTS_PER_PRODUCER: usize = 2_500;

fn main() -> Result<()> {
    println!("Harvest Loop Example\n");

    let clock = Arc::new(MonotonicClock::new());
    let reservoir = Arc::new(SharedReservoir::from_reservoir(
        ReservoirBuilder::<Sample<String>>::new()
            .capacity(500)
            .name("span_events")
            .build()?,
    ));

    for cycle in 0..CYCLES {
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|worker| {
                let reservoir = Arc::clone(&reservoir);
                let clock = Arc::clone(&clock);
                thread::spawn(move || -> Result<()> {
                    let mut rng = StdRng::seed_from_u64(cycle as u64 * 100 + worker);
                    for i in 0..EVENTS_PER_PRODUCER {
                        let payload = format!("worker-{worker}/span-{i}");
                        reservoir.add(Sample::now(rng.gen(), payload, clock.as_ref()))?;
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => eprintln!("producer thread panicked"),
            }
        }

        let harvest = reservoir.harvest();
        println!("Cycle {}", cycle + 1);
        println!(
            "  kept {} of {} events (drop rate {:.1}%)",
            harvest.stats.saved,
            harvest.stats.seen,
            harvest.stats.drop_rate() * 100.0
        );
        if let Some(top) = harvest.events.first() {
            println!("  highest priority: {:.4} ({})", top.priority, top.payload);
        }
        for metric in harvest.stats.supportability("span_events") {
            println!("  {} = {}", metric.name, metric.value);
        }
        println!();
    }

    let totals = reservoir.metrics().snapshot();
    println!(
        "Totals over {} cycles: seen {}, saved {}, dropped {}",
        totals.cycles, totals.seen, totals.saved, totals.dropped
    );
    Ok(())
}
