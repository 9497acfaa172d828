//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use rain_dodge_core::Difficulty;
use rain_dodge_rendering::{HudPresentation, InputAction, Overlay};

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Readouts shown as labels.
    pub hud: HudPresentation,
}

fn push_panel_skin(ui: &mut Ui, background: Color) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .color_selected(background)
        .color_selected_hovered(background)
        .color_inactive(background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);
}

/// Renders the control panel and returns the actions requested through its buttons.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> Vec<InputAction> {
    push_panel_skin(ui, context.background);

    let hud = context.hud;
    let mut pressed = Vec::new();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, &hud.score_label());
        ui.label(None, &hud.health_label());
        ui.label(None, &hud.difficulty_label());
        ui.label(None, &hud.grid_size_label());
        ui.label(None, hud.status_label());
        ui.separator();

        if ui.button(None, "Start") {
            pressed.push(InputAction::Start);
        }
        if ui.button(None, "Pause") {
            pressed.push(InputAction::TogglePause);
        }
        if ui.button(None, "Reset") {
            pressed.push(InputAction::Reset);
        }
        if ui.button(None, "Grid -") {
            pressed.push(InputAction::DecreaseGridSize);
        }
        if ui.button(None, "Grid +") {
            pressed.push(InputAction::IncreaseGridSize);
        }
        ui.separator();

        for difficulty in Difficulty::ALL {
            if ui.button(None, difficulty.label()) {
                pressed.push(InputAction::SelectDifficulty(difficulty));
            }
        }
        ui.separator();

        if ui.button(None, "Instructions") {
            pressed.push(InputAction::ShowInstructions);
        }
        if ui.button(None, "Leaderboard") {
            pressed.push(InputAction::ShowLeaderboard);
        }
        if ui.button(None, "Quit") {
            pressed.push(InputAction::Quit);
        }
    });

    ui.pop_skin();
    pressed
}

/// Renders a modal overlay and reports whether its close button was pressed.
pub(crate) fn draw_overlay_ui(ui: &mut Ui, overlay: Overlay, origin: Vec2, size: Vec2) -> bool {
    let mut closed = false;
    let _ = ui.window(hash!("overlay"), origin, size, |ui| {
        ui.label(None, overlay.title());
        ui.separator();
        for line in overlay.text().lines() {
            ui.label(None, line);
        }
        ui.separator();
        closed = ui.button(None, "Close");
    });
    closed
}
