#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rain Dodge.

use rain_dodge_core::{
    CanvasSize, CellCoord, Command, Difficulty, Drift, DropId, Event,
    HorizontalStep, SessionStatus, WorldDimensions, PLAYER_MAX_HEALTH,
};

const DEFAULT_CANVAS: CanvasSize = CanvasSize::new(400, 300);
const DEFAULT_GRID_SIZE: u32 = 10;

/// Represents the authoritative Rain Dodge world state.
#[derive(Debug)]
pub struct World {
    canvas: CanvasSize,
    grid_size: u32,
    difficulty: Difficulty,
    dimensions: WorldDimensions,
    player: CellCoord,
    health: u32,
    score: u32,
    dodged: u32,
    tick_index: u64,
    status: SessionStatus,
    drops: Vec<Raindrop>,
    next_drop_id: u32,
}

impl World {
    /// Creates a new world with the default canvas, cell size and difficulty.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            canvas: DEFAULT_CANVAS,
            grid_size: DEFAULT_GRID_SIZE,
            difficulty: Difficulty::default(),
            dimensions: WorldDimensions::default(),
            player: CellCoord::new(0, 0),
            health: PLAYER_MAX_HEALTH,
            score: 0,
            dodged: 0,
            tick_index: 0,
            status: SessionStatus::Paused,
            drops: Vec::new(),
            next_drop_id: 0,
        };
        let _ = world.reset();
        world
    }

    /// Stops the session and, for a usable cell size, restores the initial state.
    ///
    /// Returns the recomputed dimensions, or `None` when the cell size is zero
    /// and nothing but the stop took effect.
    fn reset(&mut self) -> Option<WorldDimensions> {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
        }

        let Some(dimensions) = self.canvas.dimensions_for(self.grid_size) else {
            log::warn!("ignoring reset for a zero cell size");
            return None;
        };

        self.status = SessionStatus::Paused;
        self.dimensions = dimensions;
        self.health = PLAYER_MAX_HEALTH;
        self.score = 0;
        self.dodged = 0;
        self.tick_index = 0;
        self.drops.clear();
        self.next_drop_id = 0;
        self.player = CellCoord::new(
            dimensions.signed_columns() / 2,
            dimensions.signed_rows() - 2,
        );
        log::debug!(
            "session reset: {}x{} cells, difficulty {}",
            dimensions.columns(),
            dimensions.rows(),
            self.difficulty
        );
        Some(dimensions)
    }

    fn reset_and_report(&mut self, out_events: &mut Vec<Event>) {
        if let Some(dimensions) = self.reset() {
            out_events.push(Event::SessionReset {
                dimensions,
                difficulty: self.difficulty,
            });
        }
    }

    fn is_operational(&self) -> bool {
        self.grid_size > 0
    }

    fn move_player_to(&mut self, column: i32, out_events: &mut Vec<Event>) {
        let from = self.player;
        if from.column() == column {
            return;
        }
        let to = CellCoord::new(column, from.row());
        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn drop_index(&self, drop: DropId) -> Option<usize> {
        self.drops.iter().position(|candidate| candidate.id == drop)
    }

    fn advance_drop(&mut self, drop: DropId, drift: Drift, out_events: &mut Vec<Event>) {
        let Some(index) = self.drop_index(drop) else {
            return;
        };

        let dimensions = self.dimensions;
        let entry = &mut self.drops[index];
        let from = entry.cell;
        let column = dimensions.clamp_column(from.column().saturating_add(drift.offset()));
        let to = CellCoord::new(column, from.row().saturating_add(1));
        entry.cell = to;
        out_events.push(Event::DropAdvanced { drop, from, to });

        if to.row() >= dimensions.signed_rows() {
            let _ = self.drops.remove(index);
            self.dodged = self.dodged.saturating_add(1);
            self.score = self.score.saturating_add(1);
            out_events.push(Event::DropDodged {
                drop,
                score: self.score,
            });
        }
    }

    fn spawn_drop(&mut self, column: u32, out_events: &mut Vec<Event>) {
        if column >= self.dimensions.columns() {
            return;
        }
        let Ok(column) = i32::try_from(column) else {
            return;
        };

        let id = DropId::new(self.next_drop_id);
        self.next_drop_id = self.next_drop_id.wrapping_add(1);
        let cell = CellCoord::new(column, 0);
        self.drops.push(Raindrop { id, cell });
        out_events.push(Event::DropSpawned { drop: id, cell });
    }

    fn strike_player(&mut self, drop: DropId, out_events: &mut Vec<Event>) {
        let Some(index) = self.drop_index(drop) else {
            return;
        };

        let _ = self.drops.remove(index);
        self.health = self.health.saturating_sub(1);
        out_events.push(Event::PlayerHit {
            drop,
            health: self.health,
        });

        if self.health == 0 {
            self.status = SessionStatus::Over;
            log::debug!(
                "session over after {} ticks with score {}",
                self.tick_index,
                self.score
            );
            out_events.push(Event::SessionEnded {
                score: self.score,
                ticks: self.tick_index,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure {
            canvas,
            grid_size,
            difficulty,
        } => {
            world.canvas = canvas;
            world.grid_size = grid_size;
            world.difficulty = difficulty;
            world.reset_and_report(out_events);
        }
        Command::SetGridSize { grid_size } => {
            world.grid_size = grid_size;
            world.reset_and_report(out_events);
        }
        Command::SetDifficulty { difficulty } => {
            world.difficulty = difficulty;
            world.reset_and_report(out_events);
        }
        Command::Reset => world.reset_and_report(out_events),
        Command::Start => {
            if !world.is_operational() || world.status == SessionStatus::Running {
                return;
            }
            if world.health == 0 {
                world.reset_and_report(out_events);
            }
            world.status = SessionStatus::Running;
            out_events.push(Event::SessionStarted {
                tick_interval: world.difficulty.tick_interval(),
            });
        }
        Command::TogglePause => {
            if !world.is_operational() {
                return;
            }
            match world.status {
                SessionStatus::Running => {
                    world.status = SessionStatus::Paused;
                    out_events.push(Event::SessionPaused);
                }
                SessionStatus::Paused => {
                    world.status = SessionStatus::Running;
                    out_events.push(Event::SessionResumed);
                }
                SessionStatus::Over => {}
            }
        }
        Command::Tick => {
            if !world.status.is_running() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::MovePlayer { step } => {
            if !world.status.is_running() {
                return;
            }
            let column = world.player.column();
            let columns = world.dimensions.signed_columns();
            match step {
                HorizontalStep::Left => {
                    if column - 1 > 0 {
                        world.move_player_to(column - 1, out_events);
                    }
                }
                HorizontalStep::Right => {
                    if column + 1 < columns - 1 {
                        world.move_player_to(column + 1, out_events);
                    }
                }
            }
        }
        Command::PointerMoved { x } => {
            if !world.status.is_running() || !world.is_operational() {
                return;
            }
            let target = i32::try_from(x / world.grid_size).unwrap_or(i32::MAX);
            let column = world.dimensions.clamp_column(target);
            world.move_player_to(column, out_events);
        }
        Command::AdvanceDrop { drop, drift } => {
            if world.status.is_running() {
                world.advance_drop(drop, drift, out_events);
            }
        }
        Command::SpawnDrop { column } => {
            if world.status.is_running() {
                world.spawn_drop(column, out_events);
            }
        }
        Command::StrikePlayer { drop } => {
            if world.status.is_running() {
                world.strike_player(drop, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use rain_dodge_core::{
        player_footprint, CanvasSize, CellCoord, Difficulty, DropSnapshot, DropView,
        PlayerSnapshot, SessionStatus, WorldDimensions, PLAYER_MAX_HEALTH,
    };

    /// Pixel dimensions of the play surface.
    #[must_use]
    pub fn canvas(world: &World) -> CanvasSize {
        world.canvas
    }

    /// Side length of a grid cell in pixels.
    #[must_use]
    pub fn grid_size(world: &World) -> u32 {
        world.grid_size
    }

    /// Dimensions computed by the most recent successful reset.
    #[must_use]
    pub fn dimensions(world: &World) -> WorldDimensions {
        world.dimensions
    }

    /// Captures the player's position and health.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player,
            health: world.health,
            max_health: PLAYER_MAX_HEALTH,
        }
    }

    /// Cells covered by the player sprite.
    #[must_use]
    pub fn player_cells(world: &World) -> [CellCoord; 9] {
        player_footprint(world.player)
    }

    /// Captures a read-only view of the falling drops.
    #[must_use]
    pub fn drop_view(world: &World) -> DropView {
        DropView::from_snapshots(
            world
                .drops
                .iter()
                .map(|drop| DropSnapshot {
                    id: drop.id,
                    cell: drop.cell,
                })
                .collect(),
        )
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of drops that left the world without hitting the player.
    #[must_use]
    pub fn dodged(world: &World) -> u32 {
        world.dodged
    }

    /// Number of ticks elapsed since the last reset.
    #[must_use]
    pub fn tick_count(world: &World) -> u64 {
        world.tick_index
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Active difficulty.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Percentage chance that a drop spawns on a tick.
    #[must_use]
    pub fn spawn_chance(world: &World) -> u32 {
        world.difficulty.spawn_chance()
    }

    /// Interval between ticks for the active difficulty.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.difficulty.tick_interval()
    }
}

#[derive(Clone, Copy, Debug)]
struct Raindrop {
    id: DropId,
    cell: CellCoord,
}
