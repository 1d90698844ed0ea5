// Obstacles that shatter under a fast falling rock

use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::player::Variant;

use super::level::BreakableConfig;

/// Whether an impact breaks the obstacle
///
/// `relative_velocity_y` is the player's vertical velocity relative to the
/// obstacle at the moment contact starts; downward is negative.
pub fn shatters(player: Variant, relative_velocity_y: f32, threshold: f32) -> bool {
    player == Variant::Rock && relative_velocity_y < -threshold
}

#[derive(Debug)]
pub struct Breakable {
    pub id: usize,
    pub threshold: f32,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

impl Breakable {
    pub fn spawn(id: usize, config: &BreakableConfig, physics: &mut PhysicsWorld) -> Self {
        let area = &config.area;
        let body_handle = physics.add_rigid_body(presets::static_body(area.x, area.y));
        let collider_handle = physics.add_collider(
            presets::breakable_collider(area.width, area.height),
            body_handle,
        );
        Self {
            id,
            threshold: config.threshold,
            body_handle,
            collider_handle,
        }
    }
}
