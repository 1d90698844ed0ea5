// Player character: shape state, movement and water response

use glam::Vec2;

use crate::engine::physics::{
    nalgebra, presets, vector, ColliderHandle, CollisionGroups, PhysicsWorld, QueryFilter, RigidBodyHandle,
};

use super::immersion::{ImmersionChange, ImmersionCounter};
use super::movement::{self, JumpKind};
use super::pupil::Pupil;
use super::state::ShapeStateMachine;
use super::stats::{BodyConfig, PlayerConfig, VariantStats, VariantTable};
use super::variant::Variant;

/// Distance above the feet the ground ray starts from
const GROUND_PROBE_INSET: f32 = 0.1;
/// Ground ray length
const GROUND_PROBE_LENGTH: f32 = 0.2;

/// Visual state pushed out on every shape change
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub sprite: String,
    /// Eye anchor relative to the body; `None` when the eye is detached
    pub eye: Option<Vec2>,
}

/// Per-tick input snapshot fed to the character
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Movement axis, each component in -1..=1
    pub move_axis: Vec2,
    /// Jump pressed this tick
    pub jump: bool,
    /// Change shape pressed this tick
    pub change_shape: bool,
}

/// The player-controlled shape-shifting character
#[derive(Debug)]
pub struct Character {
    // Physics
    /// Handle to the character's rigid body in the physics world
    pub body_handle: RigidBodyHandle,
    /// Handle to the character's collider
    pub collider_handle: ColliderHandle,

    body: BodyConfig,
    variants: VariantTable,
    /// Tuning of the active shape
    active: VariantStats,
    shape: ShapeStateMachine,
    immersion: ImmersionCounter,
    appearance: Appearance,
    pupil: Pupil,

    grounded: bool,
    /// Direction the character is facing (1 = right, -1 = left)
    facing_direction: f32,
    /// Cleared by the death sequence
    controls_enabled: bool,
    /// Cleared once the character leaves play
    active_in_world: bool,

    input: ControlInput,
    /// Velocity change queued by contact handling, applied after movement
    pending_impulse: Vec2,
}

impl Character {
    /// Create the character in its default shape and add it to the physics world
    pub fn new(config: &PlayerConfig, physics: &mut PhysicsWorld, spawn: Vec2) -> Self {
        let body_handle = physics.add_rigid_body(presets::player_body(spawn.x, spawn.y));
        let collider_handle = physics.add_collider(
            presets::player_collider(config.body.width, config.body.height),
            body_handle,
        );

        let initial = Variant::default();
        let active = config.variants.get(initial).clone();
        let appearance = Appearance {
            sprite: active.sprite.clone(),
            eye: Some(active.eye_offset()),
        };

        let mut character = Self {
            body_handle,
            collider_handle,
            body: config.body.clone(),
            variants: config.variants.clone(),
            active,
            shape: ShapeStateMachine::new(initial),
            immersion: ImmersionCounter::new(),
            appearance,
            pupil: Pupil::new(config.body.eyeball_radius),
            grounded: false,
            facing_direction: 1.0,
            controls_enabled: true,
            active_in_world: true,
            input: ControlInput::default(),
            pending_impulse: Vec2::ZERO,
        };
        character.apply_variant(physics, initial);
        character
    }

    /// Current shape
    pub fn variant(&self) -> Variant {
        self.shape.current()
    }

    /// Tuning of the current shape
    pub fn stats(&self) -> &VariantStats {
        &self.active
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn pupil(&self) -> &Pupil {
        &self.pupil
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_immersed(&self) -> bool {
        self.immersion.is_immersed()
    }

    pub fn facing_direction(&self) -> f32 {
        self.facing_direction
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Still taking part in the simulation
    pub fn is_active(&self) -> bool {
        self.active_in_world
    }

    /// Store this tick's input; consumed by the next `fixed_update`
    pub fn set_input(&mut self, input: ControlInput) {
        self.input = input;
    }

    /// Cycle to the next shape and apply it
    pub fn advance_variant(&mut self, physics: &mut PhysicsWorld) -> Variant {
        let next = self.shape.advance();
        self.apply_variant(physics, next);
        log::info!("Shape changed {} -> {}", self.shape.previous(), next);
        next
    }

    /// Push `variant`'s tuning into movement, gravity and visuals
    pub fn apply_variant(&mut self, physics: &mut PhysicsWorld, variant: Variant) {
        if self.shape.current() != variant {
            self.shape.transition(variant);
        }
        self.active = self.variants.get(variant).clone();
        self.refresh_gravity(physics);

        self.appearance.sprite = self.active.sprite.clone();
        match self.appearance.eye.as_mut() {
            Some(eye) => *eye = self.active.eye_offset(),
            None => log::warn!("No eye anchor attached, skipping eye placement"),
        }
    }

    /// Remove the eye anchor (shape changes will no longer place it)
    pub fn detach_eye(&mut self) {
        self.appearance.eye = None;
    }

    /// Advance one physics tick
    pub fn fixed_update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        if !self.active_in_world {
            return;
        }
        self.grounded = self.probe_ground(physics);

        if self.controls_enabled {
            let input = self.input;
            self.pupil.look(input.move_axis);

            // Shape first so a simultaneous jump uses the new tuning
            if input.change_shape {
                self.advance_variant(physics);
            }
            if input.jump {
                self.try_jump(physics);
            }
            self.update_movement(physics, input.move_axis.x);
        }

        // Movement overwrites horizontal velocity, so queued pushes land after it
        if self.pending_impulse != Vec2::ZERO {
            let impulse = std::mem::take(&mut self.pending_impulse);
            self.add_velocity(physics, impulse);
        }
        self.apply_buoyancy(physics, dt);
        self.clear_input();
    }

    /// Jump from the ground or stroke in water; returns what happened
    pub fn try_jump(&mut self, physics: &mut PhysicsWorld) -> Option<JumpKind> {
        let kind = movement::jump_kind(self.grounded, self.is_immersed())?;
        let body = physics.get_rigid_body_mut(self.body_handle)?;

        let mut velocity = *body.linvel();
        velocity.y = movement::jump_velocity(&self.active, kind);
        body.set_linvel(velocity, true);

        log::debug!("{:?} jump as {}", kind, self.variant());
        Some(kind)
    }

    fn update_movement(&mut self, physics: &mut PhysicsWorld, input_x: f32) {
        let Some(body) = physics.get_rigid_body_mut(self.body_handle) else {
            return;
        };

        let mut velocity = *body.linvel();
        velocity.x = movement::horizontal_velocity(input_x, &self.active, self.grounded);
        body.set_linvel(velocity, true);

        if input_x > 0.0 {
            self.facing_direction = 1.0;
        } else if input_x < 0.0 {
            self.facing_direction = -1.0;
        }
    }

    fn apply_buoyancy(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let lift = movement::buoyancy(self.variant(), self.is_immersed(), self.body.buoyancy);
        if lift == 0.0 {
            return;
        }
        self.add_velocity(physics, Vec2::new(0.0, lift * dt));
    }

    /// Register entering a water volume
    pub fn enter_water(&mut self, physics: &mut PhysicsWorld) {
        if self.immersion.enter() == ImmersionChange::Submerged {
            log::debug!("Submerged as {}", self.variant());
            self.refresh_gravity(physics);
        }
    }

    /// Register leaving a water volume
    pub fn exit_water(&mut self, physics: &mut PhysicsWorld) {
        if self.immersion.exit() == ImmersionChange::Surfaced {
            log::debug!("Surfaced as {}", self.variant());
            self.refresh_gravity(physics);
        }
    }

    /// Gravity always comes from the current shape, never a cached value
    fn refresh_gravity(&mut self, physics: &mut PhysicsWorld) {
        if !self.controls_enabled {
            // Frozen by the death sequence
            return;
        }
        let scale = self.active.gravity_for(self.is_immersed());
        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            body.set_gravity_scale(scale, true);
        }
    }

    /// Instant velocity change (mass-normalised impulse)
    pub fn add_velocity(&self, physics: &mut PhysicsWorld, delta: Vec2) {
        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            let velocity = *body.linvel() + vector![delta.x, delta.y];
            body.set_linvel(velocity, true);
        }
    }

    /// Queue a velocity change for the next tick
    pub fn push(&mut self, impulse: Vec2) {
        self.pending_impulse += impulse;
    }

    /// Velocity change waiting for the next tick
    pub fn pending_impulse(&self) -> Vec2 {
        self.pending_impulse
    }

    /// Stop all motion and hand control over to the death sequence
    pub fn freeze(&mut self, physics: &mut PhysicsWorld) {
        self.controls_enabled = false;
        self.input = ControlInput::default();
        self.pending_impulse = Vec2::ZERO;
        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_gravity_scale(0.0, true);
        }
    }

    /// Take the character out of the simulation
    pub fn deactivate(&mut self, physics: &mut PhysicsWorld) {
        self.active_in_world = false;
        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            body.set_enabled(false);
        }
    }

    /// Downward ray against ground and breakable colliders
    fn probe_ground(&self, physics: &PhysicsWorld) -> bool {
        let Some(body) = physics.get_rigid_body(self.body_handle) else {
            return false;
        };

        let position = body.translation();
        let ray_origin = vector![
            position.x,
            position.y - self.body.height / 2.0 + GROUND_PROBE_INSET
        ];

        physics
            .raycast(
                ray_origin,
                vector![0.0, -1.0],
                GROUND_PROBE_LENGTH,
                true,
                QueryFilter::default()
                    .groups(CollisionGroups::ground_probe())
                    .exclude_rigid_body(self.body_handle),
            )
            .is_some()
    }

    /// Get character's current position
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }

    /// Get character's current velocity
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let vel = body.linvel();
            Vec2::new(vel.x, vel.y)
        })
    }

    /// Gravity multiplier currently on the body
    pub fn gravity_scale(&self, physics: &PhysicsWorld) -> Option<f32> {
        physics
            .get_rigid_body(self.body_handle)
            .map(|body| body.gravity_scale())
    }

    /// Clear edge-triggered input (called at the end of each tick)
    pub fn clear_input(&mut self) {
        self.input.jump = false;
        self.input.change_shape = false;
        // Movement axis is continuous, not cleared
    }
}
