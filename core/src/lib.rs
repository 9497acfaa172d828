#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rain Dodge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{error::Error, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Health assigned to the player whenever a session is reset.
pub const PLAYER_MAX_HEALTH: u32 = 5;

/// Offsets of the nine cells composing the player's "+"-shaped sprite,
/// relative to the anchor cell at the sprite's feet.
pub const PLAYER_FOOTPRINT_OFFSETS: [(i32, i32); 9] = [
    (0, -4),
    (-2, -3),
    (-1, -3),
    (0, -3),
    (1, -3),
    (2, -3),
    (0, -2),
    (0, -1),
    (0, 0),
];

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the canvas, cell size and difficulty, then resets the session.
    Configure {
        /// Pixel dimensions of the play surface.
        canvas: CanvasSize,
        /// Side length of a single grid cell in pixels.
        grid_size: u32,
        /// Difficulty that drives spawn chance and tick interval.
        difficulty: Difficulty,
    },
    /// Changes the cell size and resets the session.
    SetGridSize {
        /// Side length of a single grid cell in pixels.
        grid_size: u32,
    },
    /// Changes the difficulty and resets the session.
    SetDifficulty {
        /// Difficulty that should become active.
        difficulty: Difficulty,
    },
    /// Stops the session and restores the initial player and drop state.
    Reset,
    /// Starts the session, resetting first when the previous one ended.
    Start,
    /// Flips between running and paused.
    TogglePause,
    /// Advances the session clock by one fixed tick.
    Tick,
    /// Requests a single-cell horizontal step of the player.
    MovePlayer {
        /// Direction of the requested step.
        step: HorizontalStep,
    },
    /// Reports the pointer's horizontal position over the play surface.
    PointerMoved {
        /// Horizontal pointer position measured in canvas pixels.
        x: u32,
    },
    /// Requests that a drop fall by one row with the provided drift.
    AdvanceDrop {
        /// Identifier of the drop that should fall.
        drop: DropId,
        /// Horizontal drift applied while falling.
        drift: Drift,
    },
    /// Requests that a new drop appear at the top of the provided column.
    SpawnDrop {
        /// Column in which the drop appears.
        column: u32,
    },
    /// Reports that a drop struck the player.
    StrikePlayer {
        /// Identifier of the drop that collided with the player.
        drop: DropId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the session was restored to its initial state.
    SessionReset {
        /// Dimensions of the freshly computed world.
        dimensions: WorldDimensions,
        /// Difficulty in effect for the new session.
        difficulty: Difficulty,
    },
    /// Announces that the session began advancing.
    SessionStarted {
        /// Interval between consecutive ticks.
        tick_interval: Duration,
    },
    /// Announces that the player paused the session.
    SessionPaused,
    /// Announces that the player resumed the session.
    SessionResumed,
    /// Indicates that the session clock advanced by one tick.
    TimeAdvanced {
        /// Number of ticks elapsed since the last reset, including this one.
        tick: u64,
    },
    /// Confirms that the player changed position.
    PlayerMoved {
        /// Anchor cell before the move.
        from: CellCoord,
        /// Anchor cell after the move.
        to: CellCoord,
    },
    /// Confirms that a drop appeared at the top of the world.
    DropSpawned {
        /// Identifier assigned to the drop.
        drop: DropId,
        /// Cell the drop occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that a drop fell by one row.
    DropAdvanced {
        /// Identifier of the drop that moved.
        drop: DropId,
        /// Cell the drop occupied before falling.
        from: CellCoord,
        /// Cell the drop occupies after falling.
        to: CellCoord,
    },
    /// Reports that a drop left the bottom of the world without hitting the player.
    DropDodged {
        /// Identifier of the dodged drop.
        drop: DropId,
        /// Score after crediting the dodge.
        score: u32,
    },
    /// Reports that a drop struck the player.
    PlayerHit {
        /// Identifier of the drop that was absorbed.
        drop: DropId,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Announces that the player ran out of health.
    SessionEnded {
        /// Final score of the session.
        score: u32,
        /// Number of ticks the session survived.
        ticks: u64,
    },
}

/// Selectable difficulty levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Sparse rain with a relaxed tick rate.
    #[default]
    Easy,
    /// Moderate rain.
    Medium,
    /// Dense rain with a fast tick rate.
    Hard,
    /// Heaviest rain at the fastest tick rate.
    Nightmare,
}

impl Difficulty {
    /// Every difficulty in selector order.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    /// Percentage chance, in `0..100`, that a drop spawns on a given tick.
    #[must_use]
    pub const fn spawn_chance(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Medium => 8,
            Self::Hard => 12,
            Self::Nightmare => 16,
        }
    }

    /// Fixed interval between session ticks.
    #[must_use]
    pub const fn tick_interval(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(120),
            Self::Medium => Duration::from_millis(100),
            Self::Hard => Duration::from_millis(80),
            Self::Nightmare => Duration::from_millis(60),
        }
    }

    /// Human readable label shown by the difficulty selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Nightmare => "NIGHTMARE",
        }
    }

    /// Position of the difficulty within [`Difficulty::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Nightmare => 3,
        }
    }

    /// Looks up a difficulty by selector index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "nightmare" => Ok(Self::Nightmare),
            _ => Err(ParseDifficultyError {
                value: value.to_owned(),
            }),
        }
    }
}

/// Error returned when a string does not name a difficulty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDifficultyError {
    value: String,
}

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty `{}` (expected easy, medium, hard or nightmare)",
            self.value
        )
    }
}

impl Error for ParseDifficultyError {}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Not advancing, either freshly reset or paused by the player.
    #[default]
    Paused,
    /// Ticks advance the simulation.
    Running,
    /// The player ran out of health; only a reset or start revives the session.
    Over,
}

impl SessionStatus {
    /// Reports whether ticks currently mutate the session.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Direction of a keyboard-driven player step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalStep {
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
}

/// Horizontal drift applied to a falling drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Drift {
    /// One column toward zero.
    Left,
    /// No horizontal movement.
    Straight,
    /// One column toward the last column.
    Right,
}

impl Drift {
    /// Every drift in sampling order.
    pub const ALL: [Drift; 3] = [Drift::Left, Drift::Straight, Drift::Right];

    /// Column delta produced by the drift.
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Straight => 0,
            Self::Right => 1,
        }
    }
}

/// Identifier assigned to a drop by the world.
///
/// Identifiers only address drops inside commands; gameplay never inspects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropId(u32);

impl DropId {
    /// Creates a new drop identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed because sprite cells derived from an anchor near
/// the world edge may fall outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }

    /// Returns the cell directly above this one.
    #[must_use]
    pub const fn above(self) -> Self {
        self.offset(0, -1)
    }
}

/// Pixel dimensions of the play surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    width: u32,
    height: u32,
}

impl CanvasSize {
    /// Creates a new canvas size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the canvas in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the canvas in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of whole cells that fit on the canvas for the provided cell size.
    ///
    /// Returns `None` when `grid_size` is zero.
    #[must_use]
    pub const fn dimensions_for(&self, grid_size: u32) -> Option<WorldDimensions> {
        if grid_size == 0 {
            return None;
        }
        Some(WorldDimensions::new(
            self.width / grid_size,
            self.height / grid_size,
        ))
    }
}

/// Size of the world measured in whole cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldDimensions {
    columns: u32,
    rows: u32,
}

impl WorldDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns (`worldWidth`).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (`worldHeight`).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Column count as a signed value for coordinate arithmetic.
    #[must_use]
    pub fn signed_columns(&self) -> i32 {
        i32::try_from(self.columns).unwrap_or(i32::MAX)
    }

    /// Row count as a signed value for coordinate arithmetic.
    #[must_use]
    pub fn signed_rows(&self) -> i32 {
        i32::try_from(self.rows).unwrap_or(i32::MAX)
    }

    /// Clamps a column into `0..=columns-1`, yielding zero for an empty world.
    #[must_use]
    pub fn clamp_column(&self, column: i32) -> i32 {
        column.min(self.signed_columns() - 1).max(0)
    }

    /// Reports whether the cell lies inside the world.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && cell.column() < self.signed_columns()
            && cell.row() < self.signed_rows()
    }
}

/// Computes the nine cells occupied by the player sprite anchored at `anchor`.
#[must_use]
pub fn player_footprint(anchor: CellCoord) -> [CellCoord; 9] {
    PLAYER_FOOTPRINT_OFFSETS.map(|(columns, rows)| anchor.offset(columns, rows))
}

/// Immutable representation of a single drop used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DropSnapshot {
    /// Identifier assigned to the drop.
    pub id: DropId,
    /// Cell currently occupied by the drop.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all falling drops.
#[derive(Clone, Debug, Default)]
pub struct DropView {
    snapshots: Vec<DropSnapshot>,
}

impl DropView {
    /// Creates a new drop view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DropSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured drop snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DropSnapshot> {
        self.snapshots.iter()
    }

    /// Number of drops captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no drops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DropSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Anchor cell at the sprite's feet.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Health restored by a reset.
    pub max_health: u32,
}

impl PlayerSnapshot {
    /// Cells covered by the player sprite.
    #[must_use]
    pub fn footprint(&self) -> [CellCoord; 9] {
        player_footprint(self.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_table_matches_selector() {
        let expected = [(5, 120), (8, 100), (12, 80), (16, 60)];
        for (difficulty, (chance, millis)) in Difficulty::ALL.into_iter().zip(expected) {
            assert_eq!(difficulty.spawn_chance(), chance, "{difficulty}");
            assert_eq!(
                difficulty.tick_interval(),
                Duration::from_millis(millis),
                "{difficulty}"
            );
        }
    }

    #[test]
    fn nightmare_is_the_fastest_and_densest() {
        assert_eq!(Difficulty::Nightmare.spawn_chance(), 16);
        assert_eq!(
            Difficulty::Nightmare.tick_interval(),
            Duration::from_millis(60)
        );
    }

    #[test]
    fn difficulty_index_round_trips() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(difficulty.index()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_index(4), None);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("NIGHTMARE".parse::<Difficulty>(), Ok(Difficulty::Nightmare));
        assert_eq!(" medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        let error = "impossible"
            .parse::<Difficulty>()
            .expect_err("unknown names must be rejected");
        assert!(error.to_string().contains("impossible"));
    }

    #[test]
    fn difficulty_deserializes_from_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            difficulty: Difficulty,
        }

        let wrapper: Wrapper = toml::from_str("difficulty = \"hard\"").expect("valid toml");
        assert_eq!(wrapper.difficulty, Difficulty::Hard);
    }

    #[test]
    fn footprint_forms_a_plus_with_extended_arms() {
        let cells = player_footprint(CellCoord::new(20, 28));

        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&CellCoord::new(20, 24)), "head");
        for column in 18..=22 {
            assert!(cells.contains(&CellCoord::new(column, 25)), "arm {column}");
        }
        assert!(cells.contains(&CellCoord::new(20, 26)));
        assert!(cells.contains(&CellCoord::new(20, 27)));
        assert!(cells.contains(&CellCoord::new(20, 28)), "legs");
    }

    #[test]
    fn footprint_may_extend_outside_the_grid() {
        let cells = player_footprint(CellCoord::new(0, 2));
        assert!(cells.contains(&CellCoord::new(-2, -1)));
        assert!(cells.contains(&CellCoord::new(0, -2)));
    }

    #[test]
    fn canvas_dimensions_use_integer_division() {
        let canvas = CanvasSize::new(400, 300);
        assert_eq!(canvas.dimensions_for(10), Some(WorldDimensions::new(40, 30)));
        assert_eq!(canvas.dimensions_for(7), Some(WorldDimensions::new(57, 42)));
        assert_eq!(canvas.dimensions_for(0), None);
    }

    #[test]
    fn clamp_column_handles_empty_world() {
        let empty = WorldDimensions::new(0, 0);
        assert_eq!(empty.clamp_column(5), 0);
        assert_eq!(empty.clamp_column(-3), 0);

        let world = WorldDimensions::new(10, 4);
        assert_eq!(world.clamp_column(-1), 0);
        assert_eq!(world.clamp_column(10), 9);
        assert_eq!(world.clamp_column(4), 4);
    }

    #[test]
    fn dimensions_contain_only_in_bounds_cells() {
        let world = WorldDimensions::new(3, 2);
        assert!(world.contains(CellCoord::new(0, 0)));
        assert!(world.contains(CellCoord::new(2, 1)));
        assert!(!world.contains(CellCoord::new(3, 1)));
        assert!(!world.contains(CellCoord::new(0, -1)));
    }

    #[test]
    fn drift_offsets_cover_one_column_each_way() {
        let offsets: Vec<i32> = Drift::ALL.iter().map(|drift| drift.offset()).collect();
        assert_eq!(offsets, vec![-1, 0, 1]);
    }

    #[test]
    fn drop_view_sorts_by_identifier() {
        let view = DropView::from_snapshots(vec![
            DropSnapshot {
                id: DropId::new(3),
                cell: CellCoord::new(0, 0),
            },
            DropSnapshot {
                id: DropId::new(1),
                cell: CellCoord::new(1, 1),
            },
        ]);
        let ids: Vec<u32> = view.iter().map(|drop| drop.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(view.len(), 2);
    }
}
