#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Rain Dodge experience.

mod config;
mod headless;
mod input;
mod scene;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use rain_dodge_core::{Command, Difficulty};
use rain_dodge_rendering::{Color, FrameInput, Overlay, Presentation, RenderingBackend, Scene};
use rain_dodge_rendering_macroquad::MacroquadBackend;
use rain_dodge_world::query;

use crate::{
    config::{FileConfig, Overrides, Settings},
    input::{InputAdapter, Request},
    simulation::Simulation,
};

const WINDOW_TITLE: &str = "Rain Dodge";

/// Dodge the falling rain for as long as you can.
#[derive(Debug, Parser)]
#[command(name = "rain-dodge", version, about)]
struct Cli {
    /// TOML file with default settings; flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    canvas_width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    canvas_height: Option<u32>,

    /// Side length of a grid cell in pixels.
    #[arg(long)]
    grid_size: Option<u32>,

    /// One of easy, medium, hard or nightmare.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for drop spawning and drift; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Print the frame rate once per second.
    #[arg(long)]
    show_fps: bool,

    /// Run without a window and print the outcome.
    #[arg(long)]
    headless: bool,

    /// Maximum number of ticks played by the headless runner.
    #[arg(long, default_value_t = 500)]
    ticks: u64,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            grid_size: self.grid_size,
            difficulty: self.difficulty,
            seed: self.seed,
            vsync: self.vsync,
            show_fps: self.show_fps,
        }
    }
}

/// Entry point for the Rain Dodge command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("could not load settings from {}", path.display()))?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&cli.overrides(), &file)?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "canvas {}x{}, grid size {}, difficulty {}, seed {seed}",
        settings.canvas.width(),
        settings.canvas.height(),
        settings.grid_size,
        settings.difficulty
    );

    let simulation = Simulation::new(
        settings.canvas,
        settings.grid_size,
        settings.difficulty,
        seed,
    );

    if cli.headless {
        run_headless(simulation, cli.ticks)
    } else {
        run_interactive(simulation, settings)
    }
}

fn run_headless(mut simulation: Simulation, ticks: u64) -> Result<()> {
    let summary = headless::run(&mut simulation, ticks);
    log::info!("headless run finished: {summary}");

    let map = headless::ascii_map(&scene::compose(simulation.world(), None))?;
    println!("{summary}");
    print!("{map}");
    Ok(())
}

fn run_interactive(simulation: Simulation, settings: Settings) -> Result<()> {
    let scene = scene::compose(simulation.world(), None);
    let mut session = InteractiveSession {
        input: InputAdapter::new(settings.canvas),
        simulation,
        overlay: None,
    };

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(
            Presentation::new(WINDOW_TITLE, Color::BACKGROUND, scene),
            move |elapsed, frame_input, scene| session.update(elapsed, &frame_input, scene),
        )
}

/// State carried across frames by the interactive window.
struct InteractiveSession {
    simulation: Simulation,
    input: InputAdapter,
    overlay: Option<Overlay>,
}

impl InteractiveSession {
    fn update(&mut self, elapsed: Duration, frame_input: &FrameInput, scene: &mut Scene) {
        let grid_size = query::grid_size(self.simulation.world());
        for request in self.input.translate(frame_input, grid_size) {
            self.handle(request);
        }

        let _ = self.simulation.advance(elapsed);
        *scene = scene::compose(self.simulation.world(), self.overlay);
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Apply(command) => {
                if command == Command::Start {
                    self.overlay = None;
                }
                let _ = self.simulation.apply(command);
            }
            Request::ToggleInstructions => {
                self.overlay = match self.overlay {
                    Some(Overlay::Instructions) => None,
                    _ => Some(Overlay::Instructions),
                };
            }
            Request::ShowLeaderboard => {
                log::info!("leaderboard requested but not available");
                self.overlay = Some(Overlay::LeaderboardUnavailable);
            }
            Request::DismissOverlay => self.overlay = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rain_dodge_core::{CanvasSize, SessionStatus};
    use rain_dodge_rendering::InputAction;

    fn session() -> InteractiveSession {
        let canvas = CanvasSize::new(400, 300);
        InteractiveSession {
            simulation: Simulation::new(canvas, 10, Difficulty::Easy, 3),
            input: InputAdapter::new(canvas),
            overlay: None,
        }
    }

    fn frame(actions: Vec<InputAction>) -> FrameInput {
        FrameInput {
            actions,
            pointer: None,
        }
    }

    #[test]
    fn start_hides_the_instructions() {
        let mut session = session();
        let mut scene = scene::compose(session.simulation.world(), None);

        session.update(
            Duration::ZERO,
            &frame(vec![InputAction::ShowInstructions]),
            &mut scene,
        );
        assert_eq!(scene.overlay, Some(Overlay::Instructions));

        session.update(Duration::ZERO, &frame(vec![InputAction::Start]), &mut scene);
        assert_eq!(scene.overlay, None);
        assert_eq!(
            query::status(session.simulation.world()),
            SessionStatus::Running
        );
    }

    #[test]
    fn instructions_toggle_while_paused() {
        let mut session = session();

        session.handle(Request::ToggleInstructions);
        assert_eq!(session.overlay, Some(Overlay::Instructions));

        session.handle(Request::Apply(Command::TogglePause));
        assert_eq!(session.overlay, Some(Overlay::Instructions));

        session.handle(Request::ToggleInstructions);
        assert_eq!(session.overlay, None);
    }
}
