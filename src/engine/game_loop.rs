/// Game loop timing and control system
///
/// Fixed timestep physics with a variable frame phase. Game time runs
/// through a time scale (0 while paused or on an end screen); sequences that
/// must keep running while the game is frozen read the unscaled frame delta.
use std::time::{Duration, Instant};

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated scaled time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Multiplier applied to game time (0.0 = frozen, 1.0 = normal)
    time_scale: f32,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// Real (unscaled) time since the previous frame, in seconds
    unscaled_delta_time: f32,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            time_scale: 1.0,
            frame_count: 0,
            update_count: 0,
            unscaled_delta_time: 0.0,
        }
    }

    /// Begin a new frame from the wall clock, returns the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Advance by an explicit frame duration, returns the number of fixed updates to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.unscaled_delta_time = frame_time.as_secs_f32();

        // Frozen time accumulates nothing
        if self.time_scale <= 0.0 {
            return 0;
        }

        self.accumulator += if self.time_scale == 1.0 {
            frame_time
        } else {
            frame_time.mul_f64(f64::from(self.time_scale))
        };

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Drop whatever the step cap could not consume
        if updates == MAX_PHYSICS_STEPS {
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Real time elapsed over the last frame, unaffected by the time scale
    pub fn unscaled_delta_time(&self) -> f32 {
        self.unscaled_delta_time
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale, negative values clamp to 0
    pub fn set_time_scale(&mut self, scale: f32) {
        let scale = scale.max(0.0);
        if scale != self.time_scale {
            log::debug!("Time scale {} -> {}", self.time_scale, scale);
            if self.time_scale <= 0.0 {
                // Reset accumulator to prevent an update burst on resume
                self.accumulator = Duration::ZERO;
            }
            self.time_scale = scale;
        }
    }

    /// Check if game time is frozen
    pub fn is_frozen(&self) -> bool {
        self.time_scale <= 0.0
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
