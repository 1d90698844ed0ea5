// Pause menu toggling and end screen freezes

use crate::engine::game_loop::GameLoop;

/// Sole owner of time scale changes driven by gameplay
///
/// End screens freeze time through `freeze` and lock the toggle so the
/// pause key cannot resume a finished stage.
#[derive(Debug, Default)]
pub struct PauseController {
    paused: bool,
    locked: bool,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Flip between paused and running; returns the new paused state, or
    /// `None` when an end screen is showing
    pub fn toggle(&mut self, game_loop: &mut GameLoop) -> Option<bool> {
        if self.locked {
            return None;
        }
        self.paused = !self.paused;
        game_loop.set_time_scale(if self.paused { 0.0 } else { 1.0 });
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        Some(self.paused)
    }

    /// Stop game time for an end screen
    pub fn freeze(&mut self, game_loop: &mut GameLoop) {
        self.paused = false;
        self.locked = true;
        game_loop.set_time_scale(0.0);
    }

    /// Back to normal speed, used before a new scene starts
    pub fn reset(&mut self, game_loop: &mut GameLoop) {
        self.paused = false;
        self.locked = false;
        game_loop.set_time_scale(1.0);
    }
}
