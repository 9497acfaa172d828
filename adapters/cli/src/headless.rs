//! Windowless runner that plays a session without player input.

use std::fmt;

use anyhow::{Context, Result};
use rain_dodge_core::{Command, SessionStatus};
use rain_dodge_rendering::{raster::rasterize, Color, Scene};
use rain_dodge_world::query;

use crate::simulation::Simulation;

/// Outcome of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    ticks: u64,
    score: u32,
    dodged: u32,
    health: u32,
    max_health: u32,
    status: SessionStatus,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.status {
            SessionStatus::Over => "game over",
            SessionStatus::Running | SessionStatus::Paused => "survived",
        };
        write!(
            f,
            "{outcome} after {} ticks: score {}, {} drops dodged, health {}/{}",
            self.ticks, self.score, self.dodged, self.health, self.max_health
        )
    }
}

/// Starts the session and steps it until `max_ticks` or game over.
pub(crate) fn run(simulation: &mut Simulation, max_ticks: u64) -> Summary {
    let _ = simulation.apply(Command::Start);
    while query::tick_count(simulation.world()) < max_ticks
        && query::status(simulation.world()).is_running()
    {
        let _ = simulation.step();
    }

    let world = simulation.world();
    let player = query::player(world);
    Summary {
        ticks: query::tick_count(world),
        score: query::score(world),
        dodged: query::dodged(world),
        health: player.health,
        max_health: player.max_health,
        status: query::status(world),
    }
}

/// Renders the scene and samples each cell's centre pixel into a character map.
///
/// `@` marks the player, `o` a drop, `#` the banner and `.` an empty cell.
pub(crate) fn ascii_map(scene: &Scene) -> Result<String> {
    let Some(grid) = scene.grid else {
        return Ok(String::new());
    };
    let frame = rasterize(scene, Color::BACKGROUND).context("failed to rasterize scene")?;

    let player = Color::PLAYER.to_rgb_u8();
    let drop = Color::DROP.to_rgb_u8();
    let banner = Color::BANNER.to_rgb_u8();
    let half = grid.cell_length / 2;

    let mut map = String::new();
    for row in 0..grid.dimensions.rows() {
        for column in 0..grid.dimensions.columns() {
            let x = column * grid.cell_length + half;
            let y = row * grid.cell_length + half;
            let symbol = match frame.pixel(x, y) {
                Some(rgb) if rgb == player => '@',
                Some(rgb) if rgb == drop => 'o',
                Some(rgb) if rgb == banner => '#',
                _ => '.',
            };
            map.push(symbol);
        }
        map.push('\n');
    }
    Ok(map)
}
