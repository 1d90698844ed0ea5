// Timed stage sequences, ticked with real time so they run while the game is frozen

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeathPhase {
    Idle,
    Waiting { elapsed: f32 },
    Finished,
}

/// Delay between the player dying and the game over screen
#[derive(Debug, Clone)]
pub struct DeathSequence {
    duration: f32,
    phase: DeathPhase,
}

impl DeathSequence {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            phase: DeathPhase::Idle,
        }
    }

    /// Start the sequence; false if it already ran or is running
    pub fn trigger(&mut self) -> bool {
        if self.phase != DeathPhase::Idle {
            return false;
        }
        log::info!("Player died");
        self.phase = DeathPhase::Waiting { elapsed: 0.0 };
        true
    }

    /// Advance by real time; true on the tick the wait ends
    pub fn tick(&mut self, real_dt: f32) -> bool {
        let DeathPhase::Waiting { elapsed } = self.phase else {
            return false;
        };
        let elapsed = elapsed + real_dt;
        if elapsed >= self.duration {
            self.phase = DeathPhase::Finished;
            true
        } else {
            self.phase = DeathPhase::Waiting { elapsed };
            false
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, DeathPhase::Waiting { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DeathPhase::Finished
    }

    /// Dying or already dead
    pub fn has_started(&self) -> bool {
        self.phase != DeathPhase::Idle
    }
}

/// Guards the goal so the result screen shows once
#[derive(Debug, Clone, Default)]
pub struct GoalSequence {
    reached: bool,
}

impl GoalSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only on the first call
    pub fn reach(&mut self) -> bool {
        if self.reached {
            return false;
        }
        log::info!("Goal reached");
        self.reached = true;
        true
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_waits_full_duration() {
        let mut death = DeathSequence::new(1.5);
        assert!(!death.tick(10.0));

        assert!(death.trigger());
        assert!(death.is_running());
        assert!(!death.tick(1.0));
        assert!(death.tick(0.5));
        assert!(death.is_finished());
        assert!(!death.tick(1.0));
    }

    #[test]
    fn test_death_reentry_guarded() {
        let mut death = DeathSequence::new(1.5);
        assert!(death.trigger());
        death.tick(1.0);
        assert!(!death.trigger());
        // Timer was not restarted
        assert!(death.tick(0.5));
        assert!(!death.trigger());
    }

    #[test]
    fn test_zero_duration_finishes_next_tick() {
        let mut death = DeathSequence::new(0.0);
        death.trigger();
        assert!(death.tick(0.0));
    }

    #[test]
    fn test_goal_once() {
        let mut goal = GoalSequence::new();
        assert!(goal.reach());
        assert!(!goal.reach());
        assert!(goal.is_reached());
    }
}
