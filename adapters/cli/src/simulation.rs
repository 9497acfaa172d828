//! Fixed-step game loop that wires the world to the gameplay systems.

use std::time::Duration;

use rain_dodge_core::{CanvasSize, Command, Difficulty, Event};
use rain_dodge_system_collision::Collision;
use rain_dodge_system_drift::{Config as DriftConfig, Drift};
use rain_dodge_system_spawning::{Config as SpawningConfig, Spawning};
use rain_dodge_world::{self as world, query, World};

// Separate streams keep drift and spawning rolls independent for one seed.
const DRIFT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const SPAWNING_STREAM: u64 = 0xd1b5_4a32_d192_ed03;

/// Upper bound on ticks replayed by a single `advance` call.
pub(crate) const MAX_CATCH_UP_STEPS: u32 = 8;

/// Owns the world and every system that reacts to its events.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    drift: Drift,
    spawning: Spawning,
    collision: Collision,
    accumulator: Duration,
}

impl Simulation {
    /// Builds a configured, paused session.
    pub(crate) fn new(canvas: CanvasSize, grid_size: u32, difficulty: Difficulty, seed: u64) -> Self {
        let mut simulation = Self {
            world: World::new(),
            drift: Drift::new(DriftConfig::new(seed ^ DRIFT_STREAM)),
            spawning: Spawning::new(SpawningConfig::new(seed ^ SPAWNING_STREAM)),
            collision: Collision::new(),
            accumulator: Duration::ZERO,
        };
        let _ = simulation.apply(Command::Configure {
            canvas,
            grid_size,
            difficulty,
        });
        simulation
    }

    /// Read-only access to the world for queries.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a single command and returns the resulting events.
    pub(crate) fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        log_events(&events);
        if events.iter().any(restarts_clock) {
            self.accumulator = Duration::ZERO;
        }
        events
    }

    /// Advances the session by exactly one tick.
    ///
    /// Order: clock, drift, spawning, collision. New drops therefore never
    /// fall on the tick they appear.
    pub(crate) fn step(&mut self) -> Vec<Event> {
        let mut events = self.apply(Command::Tick);
        if events.is_empty() {
            return events;
        }
        let tick_events = events.clone();

        let mut commands = Vec::new();
        self.drift
            .handle(&tick_events, &query::drop_view(&self.world), &mut commands);
        self.execute(commands, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &tick_events,
            query::dimensions(&self.world),
            query::spawn_chance(&self.world),
            &mut commands,
        );
        self.execute(commands, &mut events);

        let mut commands = Vec::new();
        self.collision.handle(
            &tick_events,
            query::player(&self.world),
            &query::drop_view(&self.world),
            &mut commands,
        );
        self.execute(commands, &mut events);

        events
    }

    /// Feeds elapsed frame time and runs one step per whole tick interval.
    ///
    /// At most [`MAX_CATCH_UP_STEPS`] steps run per call; time beyond that is
    /// discarded. While the session is not running the accumulated time is
    /// kept as is.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        if !query::status(&self.world).is_running() {
            return events;
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while steps < MAX_CATCH_UP_STEPS {
            let interval = query::tick_interval(&self.world);
            if self.accumulator < interval || !query::status(&self.world).is_running() {
                return events;
            }
            self.accumulator -= interval;
            events.extend(self.step());
            steps += 1;
        }

        if self.accumulator >= query::tick_interval(&self.world) {
            log::debug!("dropping {:?} of frame time after a stall", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        events
    }

    fn execute(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            events.extend(self.apply(command));
        }
    }
}

fn restarts_clock(event: &Event) -> bool {
    matches!(
        event,
        Event::SessionReset { .. } | Event::SessionStarted { .. }
    )
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::SessionStarted { tick_interval } => {
                log::info!("session started, one tick every {tick_interval:?}");
            }
            Event::SessionEnded { score, ticks } => {
                log::info!("game over after {ticks} ticks with score {score}");
            }
            _ => {}
        }
    }
}
