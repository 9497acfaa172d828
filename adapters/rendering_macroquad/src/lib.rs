#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Rain Dodge.
//!
//! Macroquad is used without its default `audio` feature because the audio
//! stack needs native ALSA development libraries that CI images lack.
//!
//! All `macroquad::ui` calls live inside the local `ui` module.

mod ui;

use self::ui::{draw_control_panel_ui, draw_overlay_ui, ControlPanelUiContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, mouse_position, KeyCode},
    math::Vec2 as MacroquadVec2,
};
use rain_dodge_core::{CanvasSize, Difficulty};
use rain_dodge_rendering::{
    Color, FrameInput, GridPresentation, InputAction, Presentation, RenderingBackend, Scene,
};
use std::{collections::VecDeque, time::Duration};

/// Width of the control panel docked to the right of the canvas, in screen pixels.
const PANEL_WIDTH: f32 = 260.0;

/// Smallest window height that still fits every control-panel widget.
const MIN_WINDOW_HEIGHT: u32 = 560;

const PANEL_BACKGROUND: Color = Color::from_rgb_u8(24, 24, 28);

/// Keys polled every frame together with the action each one triggers.
const SHORTCUTS: [(KeyCode, InputAction); 18] = [
    (KeyCode::Left, InputAction::MoveLeft),
    (KeyCode::A, InputAction::MoveLeft),
    (KeyCode::Right, InputAction::MoveRight),
    (KeyCode::D, InputAction::MoveRight),
    (KeyCode::P, InputAction::TogglePause),
    (KeyCode::Enter, InputAction::Start),
    (KeyCode::S, InputAction::Start),
    (KeyCode::R, InputAction::Reset),
    (KeyCode::Up, InputAction::IncreaseGridSize),
    (KeyCode::Down, InputAction::DecreaseGridSize),
    (KeyCode::Key1, InputAction::SelectDifficulty(Difficulty::Easy)),
    (KeyCode::Key2, InputAction::SelectDifficulty(Difficulty::Medium)),
    (KeyCode::Key3, InputAction::SelectDifficulty(Difficulty::Hard)),
    (KeyCode::Key4, InputAction::SelectDifficulty(Difficulty::Nightmare)),
    (KeyCode::I, InputAction::ShowInstructions),
    (KeyCode::L, InputAction::ShowLeaderboard),
    (KeyCode::Escape, InputAction::Quit),
    (KeyCode::Q, InputAction::Quit),
];

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    latched: Vec<InputAction>,
}

impl ControlPanelInputState {
    /// Returns the actions requested through widgets and clears the latch so
    /// each fires only once.
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.latched)
    }

    /// Records that a widget requested the provided action this frame.
    pub fn register(&mut self, action: InputAction) {
        self.latched.push(action);
    }
}

fn poll_keyboard() -> Vec<InputAction> {
    let mut actions = Vec::new();
    for (key, action) in SHORTCUTS {
        if is_key_pressed(key) && !actions.contains(&action) {
            actions.push(action);
        }
    }
    actions
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a frame and returns metrics once per elapsed second.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let (window_width, window_height) = window_size(scene.canvas);
        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let panel_background = to_macroquad_color(PANEL_BACKGROUND);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();
            let mut last_cursor: Option<Vec2> = None;

            loop {
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let (cursor_x, cursor_y) = mouse_position();
                let cursor = Vec2::new(cursor_x, cursor_y);
                let frame_input = gather_frame_input_from_observations(
                    &metrics_before,
                    cursor,
                    last_cursor,
                    poll_keyboard(),
                    control_panel_input.take_actions(),
                );
                last_cursor = Some(cursor);

                if frame_input.quit_requested() {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(panel_background);
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_canvas(&scene, &metrics, background);

                let panel_left = (screen_width - PANEL_WIDTH).max(0.0);
                let mut root_ui = macroquad::ui::root_ui();
                let panel_actions = draw_control_panel_ui(
                    &mut root_ui,
                    ControlPanelUiContext {
                        origin: MacroquadVec2::new(panel_left, 0.0),
                        size: MacroquadVec2::new(PANEL_WIDTH.min(screen_width), screen_height),
                        background: panel_background,
                        hud: scene.hud,
                    },
                );
                if let Some(overlay) = scene.overlay {
                    let origin = metrics.to_screen(Vec2::new(16.0, 16.0));
                    let size = Vec2::new(
                        (scene.canvas.width() as f32 - 32.0).max(160.0) * metrics.scale,
                        (scene.canvas.height() as f32 - 32.0).max(120.0) * metrics.scale,
                    );
                    if draw_overlay_ui(
                        &mut root_ui,
                        overlay,
                        MacroquadVec2::new(origin.x, origin.y),
                        MacroquadVec2::new(size.x, size.y),
                    ) {
                        control_panel_input.register(InputAction::DismissOverlay);
                    }
                }
                drop(root_ui);
                for action in panel_actions {
                    control_panel_input.register(action);
                }

                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                }) = fps_counter.record_frame(frame_dt)
                {
                    if show_fps {
                        println!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn window_size(canvas: CanvasSize) -> (i32, i32) {
    let width = canvas.width().saturating_add(PANEL_WIDTH as u32);
    let height = canvas.height().max(MIN_WINDOW_HEIGHT);
    (
        i32::try_from(width).unwrap_or(i32::MAX),
        i32::try_from(height).unwrap_or(i32::MAX),
    )
}

/// Placement of the canvas inside the window.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    canvas_width: f32,
    canvas_height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let canvas_width = scene.canvas.width() as f32;
        let canvas_height = scene.canvas.height() as f32;
        let available_width = (screen_width - PANEL_WIDTH).max(0.0);
        let scale = if canvas_width == 0.0 || canvas_height == 0.0 {
            1.0
        } else {
            (available_width / canvas_width).min(screen_height / canvas_height)
        };

        let offset_x = ((available_width - canvas_width * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - canvas_height * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            canvas_width,
            canvas_height,
        }
    }

    fn to_screen(&self, canvas_position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + canvas_position.x * self.scale,
            self.offset_y + canvas_position.y * self.scale,
        )
    }

    fn to_canvas(&self, screen_position: Vec2) -> Vec2 {
        Vec2::new(
            (screen_position.x - self.offset_x) / self.scale,
            (screen_position.y - self.offset_y) / self.scale,
        )
    }
}

/// Merges the frame's observations into a single input snapshot.
///
/// The pointer is only reported when it moved since the previous frame; it
/// is expressed in canvas pixels and left unclamped.
fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    previous_cursor: Option<Vec2>,
    keyboard_actions: Vec<InputAction>,
    panel_actions: Vec<InputAction>,
) -> FrameInput {
    let mut actions = panel_actions;
    actions.extend(keyboard_actions);

    let moved = previous_cursor != Some(cursor_position);
    let pointer = if moved && metrics.scale > f32::EPSILON {
        Some(metrics.to_canvas(cursor_position))
    } else {
        None
    };

    FrameInput { actions, pointer }
}

fn draw_canvas(scene: &Scene, metrics: &SceneMetrics, background: macroquad::color::Color) {
    let origin = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.canvas_width * metrics.scale,
        metrics.canvas_height * metrics.scale,
        background,
    );

    let Some(grid) = scene.grid else {
        return;
    };
    draw_grid_lines(&grid, metrics);

    let side = grid.cell_length as f32;
    for cell in scene.painted_cells() {
        let Some((top_left, size)) = clip_to_canvas(
            metrics,
            Vec2::new(cell.column as f32 * side, cell.row as f32 * side),
            side,
        ) else {
            continue;
        };
        let screen = metrics.to_screen(top_left);
        macroquad::shapes::draw_rectangle(
            screen.x,
            screen.y,
            size.x * metrics.scale,
            size.y * metrics.scale,
            to_macroquad_color(cell.color),
        );
    }
}

fn draw_grid_lines(grid: &GridPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(grid.line_color);
    let thickness = metrics.scale.max(1.0);
    let step = grid.cell_length as usize;
    let width = metrics.canvas_width as u32;
    let height = metrics.canvas_height as u32;

    for x in (0..=width).step_by(step) {
        let top = metrics.to_screen(Vec2::new(x as f32, 0.0));
        let bottom = metrics.to_screen(Vec2::new(x as f32, metrics.canvas_height));
        macroquad::shapes::draw_line(top.x, top.y, bottom.x, bottom.y, thickness, color);
    }
    for y in (0..=height).step_by(step) {
        let left = metrics.to_screen(Vec2::new(0.0, y as f32));
        let right = metrics.to_screen(Vec2::new(metrics.canvas_width, y as f32));
        macroquad::shapes::draw_line(left.x, left.y, right.x, right.y, thickness, color);
    }
}

/// Intersects a square in canvas pixels with the canvas bounds.
fn clip_to_canvas(metrics: &SceneMetrics, top_left: Vec2, side: f32) -> Option<(Vec2, Vec2)> {
    let min = top_left.max(Vec2::ZERO);
    let max = (top_left + Vec2::splat(side)).min(Vec2::new(
        metrics.canvas_width,
        metrics.canvas_height,
    ));
    if max.x <= min.x || max.y <= min.y {
        return None;
    }
    Some((min, max - min))
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
