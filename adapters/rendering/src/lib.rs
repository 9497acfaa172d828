#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rain Dodge adapters.

pub mod font;
pub mod raster;

use anyhow::Result as AnyResult;
use glam::Vec2;
use rain_dodge_core::{CanvasSize, Difficulty, SessionStatus, WorldDimensions};
use std::{error::Error, fmt, time::Duration};

/// Static help text shown by the instructions overlay.
pub const INSTRUCTIONS_TEXT: &str = "**Controls:**\n \
A / Left Arrow : Move Left\n \
D / Right Arrow : Move Right\n\n\
**Hazards:**\n \
- Rain Drops (Blue): Fall straight down. Dodge them to survive.\n\n\
**Goal:** Survive as long as possible in the rain and get a high score! \
Score increases over time survived.";

/// Message shown when the leaderboard is requested.
pub const LEADERBOARD_UNAVAILABLE_TEXT: &str = "Leaderboard is not available yet.";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black used to clear the canvas.
    pub const BACKGROUND: Self = Self::from_rgb_u8(0, 0, 0);
    /// Dark grey used for grid lines.
    pub const GRID_LINE: Self = Self::from_rgb_u8(50, 50, 50);
    /// Fill of the player sprite.
    pub const PLAYER: Self = Self::from_rgb_u8(0, 255, 0);
    /// Fill of a raindrop.
    pub const DROP: Self = Self::from_rgb_u8(0, 0, 255);
    /// Fill of the game-over banner.
    pub const BANNER: Self = Self::from_rgb_u8(255, 0, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts the color back into byte RGB values, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Discrete action requested by the player during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Step the player one cell to the left.
    MoveLeft,
    /// Step the player one cell to the right.
    MoveRight,
    /// Flip between running and paused.
    TogglePause,
    /// Start the session.
    Start,
    /// Reset the session.
    Reset,
    /// Grow the grid cell by one pixel.
    IncreaseGridSize,
    /// Shrink the grid cell by one pixel.
    DecreaseGridSize,
    /// Switch to the provided difficulty.
    SelectDifficulty(Difficulty),
    /// Show or hide the instructions overlay.
    ShowInstructions,
    /// Request the leaderboard.
    ShowLeaderboard,
    /// Close whichever overlay is open.
    DismissOverlay,
    /// Close the window.
    Quit,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Actions observed this frame in the order they were detected.
    pub actions: Vec<InputAction>,
    /// Pointer position relative to the canvas origin, when the pointer moved.
    ///
    /// The position is not clamped and may lie outside the canvas.
    pub pointer: Option<Vec2>,
}

impl FrameInput {
    /// Reports whether the player asked to close the window this frame.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.actions.contains(&InputAction::Quit)
    }
}

/// Grid geometry derived from the canvas and the cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Dimensions of the world in cells.
    pub dimensions: WorldDimensions,
    /// Side length of a cell in pixels.
    pub cell_length: u32,
    /// Color used for grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates the grid for the canvas, or `None` when the cell size is zero.
    #[must_use]
    pub fn new(canvas: CanvasSize, cell_length: u32) -> Option<Self> {
        let dimensions = canvas.dimensions_for(cell_length)?;
        Some(Self {
            dimensions,
            cell_length,
            line_color: Color::GRID_LINE,
        })
    }
}

/// Single filled grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Column of the cell; may lie outside the world near the edges.
    pub column: i32,
    /// Row of the cell; may lie outside the world near the edges.
    pub row: i32,
    /// Fill color.
    pub color: Color,
}

impl CellPresentation {
    /// Creates a new cell descriptor.
    #[must_use]
    pub const fn new(column: i32, row: i32, color: Color) -> Self {
        Self { column, row, color }
    }
}

/// One line of blocky banner text anchored at a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerLine {
    /// Text drawn with the blocky font.
    pub text: String,
    /// Column of the first glyph's left edge.
    pub column: i32,
    /// Row of the glyphs' top edge.
    pub row: i32,
}

/// Multi-line banner drawn in grid cells.
#[derive(Clone, Debug, PartialEq)]
pub struct BannerPresentation {
    /// Lines of text, each with its own anchor.
    pub lines: Vec<BannerLine>,
    /// Fill color of every lit cell.
    pub color: Color,
}

impl BannerPresentation {
    /// Expands the banner into the cells lit by its glyphs.
    #[must_use]
    pub fn cells(&self) -> Vec<CellPresentation> {
        self.lines
            .iter()
            .flat_map(|line| font::text_cells(&line.text, line.column, line.row))
            .map(|(column, row)| CellPresentation::new(column, row, self.color))
            .collect()
    }
}

/// Textual status shown next to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Current score.
    pub score: u32,
    /// Remaining health.
    pub health: u32,
    /// Health restored by a reset.
    pub max_health: u32,
    /// Active difficulty.
    pub difficulty: Difficulty,
    /// Active cell size in pixels.
    pub grid_size: u32,
    /// Session lifecycle state.
    pub status: SessionStatus,
}

impl HudPresentation {
    /// Health readout in the form `Health: h/max`.
    #[must_use]
    pub fn health_label(&self) -> String {
        format!("Health: {}/{}", self.health, self.max_health)
    }

    /// Score readout.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Difficulty readout.
    #[must_use]
    pub fn difficulty_label(&self) -> String {
        format!("Difficulty: {}", self.difficulty)
    }

    /// Cell size readout.
    #[must_use]
    pub fn grid_size_label(&self) -> String {
        format!("Grid size: {}", self.grid_size)
    }

    /// Session state readout.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self.status {
            SessionStatus::Paused => "Paused",
            SessionStatus::Running => "Running",
            SessionStatus::Over => "Game over",
        }
    }
}

/// Modal text shown on top of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Static controls and goal description.
    Instructions,
    /// Notice that the leaderboard has not been built.
    LeaderboardUnavailable,
}

impl Overlay {
    /// Title of the overlay window.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Instructions => "Instructions",
            Self::LeaderboardUnavailable => "Leaderboard",
        }
    }

    /// Body text of the overlay.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Instructions => INSTRUCTIONS_TEXT,
            Self::LeaderboardUnavailable => LEADERBOARD_UNAVAILABLE_TEXT,
        }
    }
}

/// Declarative scene describing everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Pixel dimensions of the canvas.
    pub canvas: CanvasSize,
    /// Grid geometry; `None` leaves only the background.
    pub grid: Option<GridPresentation>,
    /// Filled cells in draw order.
    pub cells: Vec<CellPresentation>,
    /// Banner drawn above every cell.
    pub banner: Option<BannerPresentation>,
    /// Status readouts.
    pub hud: HudPresentation,
    /// Modal text, if any.
    pub overlay: Option<Overlay>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        canvas: CanvasSize,
        grid: Option<GridPresentation>,
        cells: Vec<CellPresentation>,
        banner: Option<BannerPresentation>,
        hud: HudPresentation,
        overlay: Option<Overlay>,
    ) -> Self {
        Self {
            canvas,
            grid,
            cells,
            banner,
            hud,
            overlay,
        }
    }

    /// Cells to fill in draw order, banner last. Empty when there is no grid.
    #[must_use]
    pub fn painted_cells(&self) -> Vec<CellPresentation> {
        if self.grid.is_none() {
            return Vec::new();
        }

        let mut painted = self.cells.clone();
        if let Some(banner) = &self.banner {
            painted.extend(banner.cells());
        }
        painted
    }
}

/// Top-level description handed to a backend when the window opens.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title of the window.
    pub window_title: String,
    /// Color used to clear the canvas.
    pub clear_color: Color,
    /// Scene shown before the first update.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Backend capable of presenting scenes and collecting frame input.
pub trait RenderingBackend {
    /// Opens the window and runs the frame loop until the player quits.
    ///
    /// `update_scene` receives the elapsed frame time and the input observed
    /// during the frame and mutates the scene in place.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors raised while turning scenes into pixels.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The canvas has no pixels to draw into.
    InvalidCanvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvas { width, height } => {
                write!(
                    f,
                    "canvas must have a positive area (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
