#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting drop spawn commands.

use rain_dodge_core::{Command, Event, WorldDimensions};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ROLL_RANGE: u32 = 100;

/// Configuration parameters required to construct the spawning system.
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

/// Pure system that rolls once per tick for a new drop.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current world shape to emit spawn commands.
    ///
    /// `spawn_chance` is a percentage in `0..100`; each `TimeAdvanced` event
    /// produces at most one spawn in a uniformly chosen column.
    pub fn handle(
        &mut self,
        events: &[Event],
        dimensions: WorldDimensions,
        spawn_chance: u32,
        out: &mut Vec<Command>,
    ) {
        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();

        for _ in 0..ticks {
            if let Some(column) = self.roll(dimensions, spawn_chance) {
                out.push(Command::SpawnDrop { column });
            }
        }
    }

    fn roll(&mut self, dimensions: WorldDimensions, spawn_chance: u32) -> Option<u32> {
        let roll = self.rng.gen_range(0..ROLL_RANGE);
        if roll >= spawn_chance || dimensions.columns() == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..dimensions.columns()))
    }
}
