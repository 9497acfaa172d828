#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded drift system that makes every drop fall one row per tick.

use rain_dodge_core::{Command, Drift as DriftDirection, DropView, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the drift system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that assigns a random horizontal drift to each falling drop.
#[derive(Debug)]
pub struct Drift {
    rng: ChaCha8Rng,
}

impl Drift {
    /// Creates a new drift system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits one `AdvanceDrop` per drop, in identifier order, when time advanced.
    pub fn handle(&mut self, events: &[Event], drops: &DropView, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in drops.iter() {
            out.push(Command::AdvanceDrop {
                drop: snapshot.id,
                drift: self.next_drift(),
            });
        }
    }

    fn next_drift(&mut self) -> DriftDirection {
        DriftDirection::ALL[self.rng.gen_range(0..DriftDirection::ALL.len())]
    }
}
