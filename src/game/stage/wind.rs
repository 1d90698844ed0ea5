// Periodic gusts that push the player back

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindPhase {
    Calm,
    Blowing,
}

/// Leftward acceleration from a gust; lighter bodies are pushed harder
pub fn push_acceleration(force: f32, gravity_scale: f32) -> f32 {
    let weight = if gravity_scale <= 0.0 { 1.0 } else { gravity_scale };
    -force / weight
}

/// Alternates `interval` calm seconds with `duration` blowing seconds
#[derive(Debug, Clone)]
pub struct WindZone {
    interval: f32,
    duration: f32,
    force: f32,
    phase: WindPhase,
    elapsed: f32,
}

impl WindZone {
    pub fn new(interval: f32, duration: f32, force: f32) -> Self {
        Self {
            interval,
            duration,
            force,
            phase: WindPhase::Calm,
            elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> WindPhase {
        self.phase
    }

    pub fn force(&self) -> f32 {
        self.force
    }

    /// Advance by game time; returns whether the wind is blowing
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        loop {
            let limit = match self.phase {
                WindPhase::Calm => self.interval,
                WindPhase::Blowing => self.duration,
            };
            if self.elapsed < limit || (self.interval <= 0.0 && self.duration <= 0.0) {
                break;
            }
            self.elapsed -= limit;
            self.phase = match self.phase {
                WindPhase::Calm => {
                    log::debug!("Wind rising");
                    WindPhase::Blowing
                }
                WindPhase::Blowing => WindPhase::Calm,
            };
        }
        self.phase == WindPhase::Blowing
    }
}
