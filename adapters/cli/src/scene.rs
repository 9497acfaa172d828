//! Composes a backend-agnostic scene from the world state.

use rain_dodge_core::SessionStatus;
use rain_dodge_rendering::{
    BannerLine, BannerPresentation, CellPresentation, Color, GridPresentation, HudPresentation,
    Overlay, Scene,
};
use rain_dodge_world::{query, World};

const BANNER_WIDTH: i32 = 15;
const BANNER_LINE_SPACING: i32 = 6;

/// Builds the scene for the current world state and overlay.
pub(crate) fn compose(world: &World, overlay: Option<Overlay>) -> Scene {
    let canvas = query::canvas(world);
    let grid_size = query::grid_size(world);
    let status = query::status(world);
    let player = query::player(world);

    let mut cells = Vec::new();
    if status.is_running() {
        cells.extend(
            player
                .footprint()
                .iter()
                .map(|cell| CellPresentation::new(cell.column(), cell.row(), Color::PLAYER)),
        );
    }
    cells.extend(
        query::drop_view(world)
            .iter()
            .map(|drop| CellPresentation::new(drop.cell.column(), drop.cell.row(), Color::DROP)),
    );

    let banner = (status == SessionStatus::Over).then(|| game_over_banner(world));

    Scene::new(
        canvas,
        GridPresentation::new(canvas, grid_size),
        cells,
        banner,
        HudPresentation {
            score: query::score(world),
            health: player.health,
            max_health: player.max_health,
            difficulty: query::difficulty(world),
            grid_size,
            status,
        },
        overlay,
    )
}

fn game_over_banner(world: &World) -> BannerPresentation {
    let dimensions = query::dimensions(world);
    let column = (dimensions.signed_columns() - BANNER_WIDTH + 1) / 2;
    let row = dimensions.signed_rows() / 2 - 5;

    BannerPresentation {
        lines: vec![
            BannerLine {
                text: "END".to_string(),
                column,
                row,
            },
            BannerLine {
                text: "...".to_string(),
                column,
                row: row + BANNER_LINE_SPACING,
            },
        ],
        color: Color::BANNER,
    }
}
