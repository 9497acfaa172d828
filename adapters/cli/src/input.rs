//! Translates frame input into world commands and UI requests.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;
use rain_dodge_core::{CanvasSize, Command, HorizontalStep};
use rain_dodge_rendering::{FrameInput, InputAction};

/// Receives pointer positions that fell inside the canvas.
pub(crate) trait PointerObserver {
    /// Called with the pointer position in whole canvas pixels.
    fn pointer_moved(&mut self, x: u32, y: u32);
}

/// Pointer-capture surface covering the canvas.
///
/// Positions outside the canvas are dropped before reaching observers.
pub(crate) struct PointerSurface {
    canvas: CanvasSize,
    observers: Vec<Box<dyn PointerObserver>>,
}

impl PointerSurface {
    pub(crate) fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            observers: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, observer: Box<dyn PointerObserver>) {
        self.observers.push(observer);
    }

    /// Forwards the position to every observer when it lies inside the canvas.
    ///
    /// Returns whether the position was forwarded.
    pub(crate) fn report(&mut self, position: Vec2) -> bool {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return false;
        }
        let x = position.x.floor() as u32;
        let y = position.y.floor() as u32;
        if x >= self.canvas.width() || y >= self.canvas.height() {
            return false;
        }

        for observer in &mut self.observers {
            observer.pointer_moved(x, y);
        }
        true
    }
}

/// Observer that turns pointer positions into `PointerMoved` commands.
struct PointerForwarder {
    sender: Sender<Command>,
}

impl PointerObserver for PointerForwarder {
    fn pointer_moved(&mut self, x: u32, _y: u32) {
        if self.sender.send(Command::PointerMoved { x }).is_err() {
            log::debug!("pointer command receiver dropped");
        }
    }
}

/// Something the frame loop must do in response to player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    /// Apply the command to the world.
    Apply(Command),
    /// Show the instructions, or hide them when already shown.
    ToggleInstructions,
    /// Tell the player the leaderboard is unavailable.
    ShowLeaderboard,
    /// Close the open overlay.
    DismissOverlay,
}

/// Converts backend input into requests for the frame loop.
pub(crate) struct InputAdapter {
    surface: PointerSurface,
    pointer_commands: Receiver<Command>,
}

impl InputAdapter {
    /// Creates an adapter whose pointer surface covers `canvas`.
    pub(crate) fn new(canvas: CanvasSize) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut surface = PointerSurface::new(canvas);
        surface.register(Box::new(PointerForwarder { sender }));
        Self {
            surface,
            pointer_commands: receiver,
        }
    }

    /// Translates one frame of input given the current cell size.
    pub(crate) fn translate(&mut self, input: &FrameInput, grid_size: u32) -> Vec<Request> {
        let mut requests: Vec<Request> = input
            .actions
            .iter()
            .filter_map(|action| request_for(*action, grid_size))
            .collect();

        if let Some(position) = input.pointer {
            let _forwarded = self.surface.report(position);
        }
        requests.extend(self.pointer_commands.try_iter().map(Request::Apply));
        requests
    }
}

fn request_for(action: InputAction, grid_size: u32) -> Option<Request> {
    let command = match action {
        InputAction::MoveLeft => Command::MovePlayer {
            step: HorizontalStep::Left,
        },
        InputAction::MoveRight => Command::MovePlayer {
            step: HorizontalStep::Right,
        },
        InputAction::TogglePause => Command::TogglePause,
        InputAction::Start => Command::Start,
        InputAction::Reset => Command::Reset,
        InputAction::IncreaseGridSize => Command::SetGridSize {
            grid_size: grid_size.saturating_add(1),
        },
        InputAction::DecreaseGridSize => Command::SetGridSize {
            grid_size: grid_size.saturating_sub(1),
        },
        InputAction::SelectDifficulty(difficulty) => Command::SetDifficulty { difficulty },
        InputAction::ShowInstructions => return Some(Request::ToggleInstructions),
        InputAction::ShowLeaderboard => return Some(Request::ShowLeaderboard),
        InputAction::DismissOverlay => return Some(Request::DismissOverlay),
        InputAction::Quit => return None,
    };
    Some(Request::Apply(command))
}
