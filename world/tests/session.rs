use std::time::Duration;

use rain_dodge_core::{
    CanvasSize, CellCoord, Command, Difficulty, Drift, DropId, Event, HorizontalStep,
    SessionStatus, WorldDimensions, PLAYER_MAX_HEALTH,
};
use rain_dodge_world::{self as world, query, World};

fn configured_world(width: u32, height: u32, grid_size: u32, difficulty: Difficulty) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Configure {
            canvas: CanvasSize::new(width, height),
            grid_size,
            difficulty,
        },
        &mut events,
    );
    world
}

fn started_world() -> World {
    let mut world = configured_world(400, 300, 10, Difficulty::Easy);
    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    world
}

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn move_player_to(world: &mut World, column: u32) {
    let _ = apply_all(world, [Command::PointerMoved { x: column * 10 }]);
    assert_eq!(query::player(world).cell.column(), column as i32);
}

#[test]
fn reset_places_player_above_bottom_margin() {
    let world = configured_world(400, 300, 10, Difficulty::Easy);

    assert_eq!(query::dimensions(&world), WorldDimensions::new(40, 30));
    let player = query::player(&world);
    assert_eq!(player.cell, CellCoord::new(20, 28));
    assert_eq!(player.health, PLAYER_MAX_HEALTH);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::dodged(&world), 0);
    assert_eq!(query::tick_count(&world), 0);
    assert!(query::drop_view(&world).is_empty());
}

#[test]
fn difficulty_drives_spawn_chance_and_interval() {
    let world = configured_world(400, 300, 10, Difficulty::Nightmare);

    assert_eq!(query::spawn_chance(&world), 16);
    assert_eq!(query::tick_interval(&world), Duration::from_millis(60));
}

#[test]
fn changing_difficulty_resets_the_session() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [Command::Tick, Command::SpawnDrop { column: 3 }]);

    let events = apply_all(
        &mut world,
        [Command::SetDifficulty {
            difficulty: Difficulty::Hard,
        }],
    );

    assert_eq!(
        events,
        vec![Event::SessionReset {
            dimensions: WorldDimensions::new(40, 30),
            difficulty: Difficulty::Hard,
        }]
    );
    assert_eq!(query::status(&world), SessionStatus::Paused);
    assert_eq!(query::tick_count(&world), 0);
    assert!(query::drop_view(&world).is_empty());
}

#[test]
fn changing_grid_size_recomputes_dimensions() {
    let mut world = started_world();

    let _ = apply_all(&mut world, [Command::SetGridSize { grid_size: 20 }]);

    assert_eq!(query::dimensions(&world), WorldDimensions::new(20, 15));
    assert_eq!(query::player(&world).cell, CellCoord::new(10, 13));
    assert_eq!(query::status(&world), SessionStatus::Paused);
}

#[test]
fn start_reports_tick_interval() {
    let mut world = configured_world(400, 300, 10, Difficulty::Medium);

    let events = apply_all(&mut world, [Command::Start]);

    assert_eq!(
        events,
        vec![Event::SessionStarted {
            tick_interval: Duration::from_millis(100),
        }]
    );
    assert_eq!(query::status(&world), SessionStatus::Running);
}

#[test]
fn ticks_are_ignored_until_started() {
    let mut world = configured_world(400, 300, 10, Difficulty::Easy);

    let events = apply_all(
        &mut world,
        [
            Command::Tick,
            Command::SpawnDrop { column: 1 },
            Command::MovePlayer {
                step: HorizontalStep::Left,
            },
        ],
    );

    assert!(events.is_empty());
    assert_eq!(query::tick_count(&world), 0);
    assert!(query::drop_view(&world).is_empty());
    assert_eq!(query::player(&world).cell, CellCoord::new(20, 28));
}

#[test]
fn toggle_pause_flips_running_state_and_keeps_counters() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [Command::Tick, Command::Tick]);

    let paused = apply_all(&mut world, [Command::TogglePause, Command::Tick]);
    assert_eq!(paused, vec![Event::SessionPaused]);
    assert_eq!(query::status(&world), SessionStatus::Paused);
    assert_eq!(query::tick_count(&world), 2);

    let resumed = apply_all(&mut world, [Command::TogglePause, Command::Tick]);
    assert_eq!(
        resumed,
        vec![Event::SessionResumed, Event::TimeAdvanced { tick: 3 }]
    );
}

#[test]
fn keyboard_left_is_rejected_at_column_one() {
    let mut world = started_world();
    move_player_to(&mut world, 1);

    let events = apply_all(
        &mut world,
        [Command::MovePlayer {
            step: HorizontalStep::Left,
        }],
    );

    assert!(events.is_empty());
    assert_eq!(query::player(&world).cell.column(), 1);
}

#[test]
fn keyboard_right_stops_two_columns_from_the_edge() {
    let mut world = started_world();
    move_player_to(&mut world, 37);

    let events = apply_all(
        &mut world,
        [
            Command::MovePlayer {
                step: HorizontalStep::Right,
            },
            Command::MovePlayer {
                step: HorizontalStep::Right,
            },
        ],
    );

    assert_eq!(
        events,
        vec![Event::PlayerMoved {
            from: CellCoord::new(37, 28),
            to: CellCoord::new(38, 28),
        }]
    );
    assert_eq!(query::player(&world).cell.column(), 38);
}

#[test]
fn keyboard_moves_one_cell_per_press() {
    let mut world = started_world();

    let _ = apply_all(
        &mut world,
        [
            Command::MovePlayer {
                step: HorizontalStep::Left,
            },
            Command::MovePlayer {
                step: HorizontalStep::Left,
            },
        ],
    );

    assert_eq!(query::player(&world).cell, CellCoord::new(18, 28));
}

#[test]
fn pointer_positions_clamp_to_full_width() {
    let mut world = started_world();

    let _ = apply_all(&mut world, [Command::PointerMoved { x: 5 }]);
    assert_eq!(query::player(&world).cell.column(), 0);

    let _ = apply_all(&mut world, [Command::PointerMoved { x: 399 }]);
    assert_eq!(query::player(&world).cell.column(), 39);

    let _ = apply_all(&mut world, [Command::PointerMoved { x: 10_000 }]);
    assert_eq!(query::player(&world).cell.column(), 39);

    let _ = apply_all(&mut world, [Command::PointerMoved { x: 155 }]);
    assert_eq!(query::player(&world).cell.column(), 15);
}

#[test]
fn pointer_is_ignored_while_paused() {
    let mut world = configured_world(400, 300, 10, Difficulty::Easy);

    let events = apply_all(&mut world, [Command::PointerMoved { x: 55 }]);

    assert!(events.is_empty());
    assert_eq!(query::player(&world).cell.column(), 20);
}

#[test]
fn drops_fall_one_row_and_drift_within_bounds() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            Command::SpawnDrop { column: 0 },
            Command::SpawnDrop { column: 39 },
        ],
    );

    let events = apply_all(
        &mut world,
        [
            Command::AdvanceDrop {
                drop: DropId::new(0),
                drift: Drift::Left,
            },
            Command::AdvanceDrop {
                drop: DropId::new(1),
                drift: Drift::Right,
            },
        ],
    );

    assert_eq!(
        events,
        vec![
            Event::DropAdvanced {
                drop: DropId::new(0),
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            },
            Event::DropAdvanced {
                drop: DropId::new(1),
                from: CellCoord::new(39, 0),
                to: CellCoord::new(39, 1),
            },
        ]
    );
}

#[test]
fn undisturbed_drop_exits_within_world_height_ticks() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [Command::SpawnDrop { column: 2 }]);
    let rows = query::dimensions(&world).rows();

    let mut exited_after = None;
    for step in 1..=rows {
        let events = apply_all(
            &mut world,
            [Command::AdvanceDrop {
                drop: DropId::new(0),
                drift: Drift::Straight,
            }],
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::DropDodged { .. }))
        {
            exited_after = Some(step);
            break;
        }
    }

    assert_eq!(exited_after, Some(rows));
    assert!(query::drop_view(&world).is_empty());
    assert_eq!(query::score(&world), 1);
    assert_eq!(query::dodged(&world), 1);
}

#[test]
fn each_dodge_adds_exactly_one_point() {
    let mut world = configured_world(40, 20, 10, Difficulty::Easy);
    let _ = apply_all(&mut world, [Command::Start]);

    let mut previous = query::score(&world);
    for round in 0..3u32 {
        let _ = apply_all(&mut world, [Command::SpawnDrop { column: 0 }]);
        let drop = DropId::new(round);
        for _ in 0..2 {
            let _ = apply_all(
                &mut world,
                [Command::AdvanceDrop {
                    drop,
                    drift: Drift::Straight,
                }],
            );
        }
        let score = query::score(&world);
        assert_eq!(score, previous + 1);
        previous = score;
    }
}

#[test]
fn duplicate_positions_are_allowed() {
    let mut world = started_world();

    let _ = apply_all(
        &mut world,
        [
            Command::SpawnDrop { column: 4 },
            Command::SpawnDrop { column: 4 },
        ],
    );

    let drops = query::drop_view(&world).into_vec();
    assert_eq!(drops.len(), 2);
    assert_eq!(drops[0].cell, drops[1].cell);
}

#[test]
fn strike_removes_drop_and_costs_one_health() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [Command::SpawnDrop { column: 20 }]);

    let events = apply_all(
        &mut world,
        [Command::StrikePlayer {
            drop: DropId::new(0),
        }],
    );

    assert_eq!(
        events,
        vec![Event::PlayerHit {
            drop: DropId::new(0),
            health: PLAYER_MAX_HEALTH - 1,
        }]
    );
    assert!(query::drop_view(&world).is_empty());
}

#[test]
fn losing_last_health_ends_the_session() {
    let mut world = started_world();
    let spawns: Vec<Command> = (0..6).map(|_| Command::SpawnDrop { column: 20 }).collect();
    let _ = apply_all(&mut world, spawns);
    let _ = apply_all(&mut world, [Command::Tick, Command::Tick]);

    let strikes: Vec<Command> = (0..6)
        .map(|id| Command::StrikePlayer {
            drop: DropId::new(id),
        })
        .collect();
    let events = apply_all(&mut world, strikes);

    assert_eq!(
        events.last(),
        Some(&Event::SessionEnded { score: 0, ticks: 2 })
    );
    assert_eq!(query::status(&world), SessionStatus::Over);
    assert_eq!(query::player(&world).health, 0);
    assert_eq!(
        query::drop_view(&world).len(),
        1,
        "strikes after game over are ignored"
    );
}

#[test]
fn ended_session_ignores_ticks_and_pause() {
    let mut world = started_world();
    let spawns: Vec<Command> = (0..5).map(|_| Command::SpawnDrop { column: 20 }).collect();
    let _ = apply_all(&mut world, spawns);
    let strikes: Vec<Command> = (0..5)
        .map(|id| Command::StrikePlayer {
            drop: DropId::new(id),
        })
        .collect();
    let _ = apply_all(&mut world, strikes);
    assert_eq!(query::status(&world), SessionStatus::Over);

    let events = apply_all(
        &mut world,
        [
            Command::Tick,
            Command::TogglePause,
            Command::SpawnDrop { column: 1 },
            Command::PointerMoved { x: 30 },
        ],
    );

    assert!(events.is_empty());
    assert_eq!(query::status(&world), SessionStatus::Over);
    assert_eq!(query::tick_count(&world), 0);
}

#[test]
fn start_after_game_over_resets_first() {
    let mut world = started_world();
    let spawns: Vec<Command> = (0..5).map(|_| Command::SpawnDrop { column: 20 }).collect();
    let _ = apply_all(&mut world, spawns);
    let strikes: Vec<Command> = (0..5)
        .map(|id| Command::StrikePlayer {
            drop: DropId::new(id),
        })
        .collect();
    let _ = apply_all(&mut world, strikes);

    let events = apply_all(&mut world, [Command::Start]);

    assert!(matches!(events.first(), Some(Event::SessionReset { .. })));
    assert_eq!(query::status(&world), SessionStatus::Running);
    assert_eq!(query::player(&world).health, PLAYER_MAX_HEALTH);
}
