#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision system that reports drops striking the player sprite.
//!
//! A drop counts as a hit when either the cell it occupies or the cell
//! directly above it overlaps the player's footprint. Checking the upper
//! cell catches drops that drifted diagonally through a sprite edge during
//! the same tick.

use rain_dodge_core::{CellCoord, Command, DropView, Event, PlayerSnapshot};

/// Pure system that converts overlaps into strike commands.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a `StrikePlayer` command for every drop touching the player.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: PlayerSnapshot,
        drops: &DropView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let footprint = player.footprint();
        for snapshot in drops.iter() {
            if touches(&footprint, snapshot.cell) {
                out.push(Command::StrikePlayer { drop: snapshot.id });
            }
        }
    }
}

fn touches(footprint: &[CellCoord], cell: CellCoord) -> bool {
    footprint.contains(&cell) || footprint.contains(&cell.above())
}
