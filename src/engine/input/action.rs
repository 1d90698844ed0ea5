// Game action definitions and mappings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement / look
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,

    // Janken
    ChangeShape,

    // Meta actions
    Pause,
    Confirm,
    ToggleFullscreen,
}

/// Named group of actions that can be active at a time
///
/// Gameplay drives the player; Ui is used on pause/game-over/result screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionMap {
    #[default]
    Gameplay,
    Ui,
}

impl ActionMap {
    /// Check if an action is available in this map
    pub fn contains(self, action: Action) -> bool {
        match self {
            Self::Gameplay => !matches!(action, Action::Confirm),
            Self::Ui => matches!(
                action,
                Action::MoveUp
                    | Action::MoveDown
                    | Action::Confirm
                    | Action::Pause
                    | Action::ToggleFullscreen
            ),
        }
    }
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        // Movement (WASD and arrows)
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::KeyW), Action::MoveUp),
        (InputSource::key(KeyCode::KeyS), Action::MoveDown),
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::MoveUp),
        (InputSource::key(KeyCode::ArrowDown), Action::MoveDown),
        (InputSource::key(KeyCode::Space), Action::Jump),
        // Shape change
        (InputSource::key(KeyCode::KeyE), Action::ChangeShape),
        (InputSource::key(KeyCode::ShiftLeft), Action::ChangeShape),
        // Meta
        (InputSource::key(KeyCode::Escape), Action::Pause),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
        (InputSource::key(KeyCode::Enter), Action::Confirm),
        (InputSource::key(KeyCode::F11), Action::ToggleFullscreen),
    ]
}
