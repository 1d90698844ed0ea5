// Fade-out / fade-in scene switching driven by real time

use crate::core::math::lerp;
use crate::engine::game_loop::GameLoop;
use crate::game::stage::PauseController;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Waiting out the cue before fading
    Cue { elapsed: f32, length: f32 },
    FadeOut { from: f32, elapsed: f32 },
    FadeIn { from: f32, elapsed: f32 },
}

/// Switches scenes behind a full-screen fade
///
/// `tick` returns the scene name once the screen is fully covered; the
/// caller builds the new scene then and the fade back in starts.
#[derive(Debug)]
pub struct SceneTransition {
    fade_duration: f32,
    phase: Phase,
    /// Cover opacity, 0 = clear, 1 = black
    alpha: f32,
    pending: Option<String>,
}

impl SceneTransition {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            fade_duration,
            phase: Phase::Idle,
            alpha: 0.0,
            pending: None,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// A requested scene has not been activated yet
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a switch to `scene` after a cue of `cue_length` seconds;
    /// ignored while another switch is loading
    pub fn request(&mut self, scene: &str, cue_length: f32) -> bool {
        if self.is_loading() {
            log::debug!("Scene switch to '{}' ignored, already loading", scene);
            return false;
        }
        log::info!("Switching to scene '{}'", scene);
        self.pending = Some(scene.to_string());
        self.phase = Phase::Cue {
            elapsed: 0.0,
            length: cue_length.max(0.0),
        };
        true
    }

    /// Advance by real time. Returns the scene to activate on the tick the
    /// fade out completes, after time has been restored to normal speed.
    pub fn tick(
        &mut self,
        real_dt: f32,
        pause: &mut PauseController,
        game_loop: &mut GameLoop,
    ) -> Option<String> {
        match self.phase {
            Phase::Idle => None,
            Phase::Cue { elapsed, length } => {
                let elapsed = elapsed + real_dt;
                self.phase = if elapsed >= length {
                    Phase::FadeOut {
                        from: self.alpha,
                        elapsed: 0.0,
                    }
                } else {
                    Phase::Cue { elapsed, length }
                };
                None
            }
            Phase::FadeOut { from, elapsed } => {
                let elapsed = elapsed + real_dt;
                if elapsed < self.fade_duration {
                    self.alpha = lerp(from, 1.0, elapsed / self.fade_duration);
                    self.phase = Phase::FadeOut { from, elapsed };
                    return None;
                }

                self.alpha = 1.0;
                pause.reset(game_loop);
                self.phase = Phase::FadeIn {
                    from: 1.0,
                    elapsed: 0.0,
                };
                self.pending.take()
            }
            Phase::FadeIn { from, elapsed } => {
                let elapsed = elapsed + real_dt;
                if elapsed < self.fade_duration {
                    self.alpha = lerp(from, 0.0, elapsed / self.fade_duration);
                    self.phase = Phase::FadeIn { from, elapsed };
                } else {
                    self.alpha = 0.0;
                    self.phase = Phase::Idle;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(
        transition: &mut SceneTransition,
        pause: &mut PauseController,
        game_loop: &mut GameLoop,
        seconds: f32,
    ) -> Option<String> {
        let mut activated = None;
        let steps = (seconds / 0.1).round() as u32;
        for _ in 0..steps {
            if let Some(scene) = transition.tick(0.1, pause, game_loop) {
                activated = Some(scene);
            }
        }
        activated
    }

    #[test]
    fn test_full_transition() {
        let mut transition = SceneTransition::new(1.0);
        let mut pause = PauseController::new();
        let mut game_loop = GameLoop::new();
        pause.freeze(&mut game_loop);

        assert!(transition.request("level2", 0.5));
        assert!(transition.is_loading());

        // Cue plus part of the fade: nothing activated, time still frozen
        assert_eq!(run(&mut transition, &mut pause, &mut game_loop, 1.0), None);
        assert!(transition.alpha() > 0.0);
        assert!(game_loop.is_frozen());

        let activated = run(&mut transition, &mut pause, &mut game_loop, 1.0);
        assert_eq!(activated.as_deref(), Some("level2"));
        assert_eq!(game_loop.time_scale(), 1.0);
        assert!(!pause.is_locked());
        assert!(!transition.is_loading());

        run(&mut transition, &mut pause, &mut game_loop, 1.5);
        assert_relative_eq!(transition.alpha(), 0.0);
    }

    #[test]
    fn test_request_while_loading_ignored() {
        let mut transition = SceneTransition::new(0.5);
        assert!(transition.request("a", 0.0));
        assert!(!transition.request("b", 0.0));

        let mut pause = PauseController::new();
        let mut game_loop = GameLoop::new();
        let activated = run(&mut transition, &mut pause, &mut game_loop, 1.0);
        assert_eq!(activated.as_deref(), Some("a"));
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut transition = SceneTransition::new(0.5);
        let mut pause = PauseController::new();
        let mut game_loop = GameLoop::new();
        assert_eq!(transition.tick(1.0, &mut pause, &mut game_loop), None);
        assert_eq!(transition.alpha(), 0.0);
    }
}
