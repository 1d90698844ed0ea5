// Scissor gate: cut it as scissors to move a platform

use glam::Vec2;

use crate::engine::physics::{nalgebra, presets, vector, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::player::Variant;

/// Body moved when the gate fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateTarget {
    pub body: RigidBodyHandle,
    pub destination: Vec2,
}

#[derive(Debug)]
pub struct ScissorGate {
    pub id: usize,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    target: Option<GateTarget>,
    active: bool,
}

impl ScissorGate {
    pub fn spawn(
        id: usize,
        center: Vec2,
        size: Vec2,
        target: Option<GateTarget>,
        physics: &mut PhysicsWorld,
    ) -> Self {
        let body_handle = physics.add_rigid_body(presets::static_body(center.x, center.y));
        let collider_handle =
            physics.add_collider(presets::trigger_collider(size.x, size.y), body_handle);
        Self {
            id,
            body_handle,
            collider_handle,
            target,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Called every tick the player overlaps the gate; true when it fired
    ///
    /// A gate fires once. A missing target only skips the move.
    pub fn on_stay(&mut self, player: Variant, physics: &mut PhysicsWorld) -> bool {
        if !self.active || player != Variant::Scissors {
            return false;
        }

        match self.target {
            Some(target) => match physics.get_rigid_body_mut(target.body) {
                Some(body) => {
                    body.set_translation(vector![target.destination.x, target.destination.y], true)
                }
                None => log::warn!("Scissor gate {} target body is gone", self.id),
            },
            None => log::warn!("Scissor gate {} has no target to move", self.id),
        }

        self.active = false;
        if let Some(gate) = physics.get_rigid_body_mut(self.body_handle) {
            gate.set_enabled(false);
        }
        log::info!("Scissor gate {} cut", self.id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_with_platform(physics: &mut PhysicsWorld) -> (ScissorGate, RigidBodyHandle) {
        let platform = physics.add_rigid_body(presets::static_body(0.0, 0.0));
        physics.add_collider(presets::ground_collider(2.0, 0.5), platform);
        let gate = ScissorGate::spawn(
            0,
            Vec2::new(3.0, 0.0),
            Vec2::ONE,
            Some(GateTarget {
                body: platform,
                destination: Vec2::new(0.0, -4.0),
            }),
            physics,
        );
        (gate, platform)
    }

    #[test]
    fn test_only_scissors_cut() {
        let mut physics = PhysicsWorld::new();
        let (mut gate, platform) = gate_with_platform(&mut physics);

        assert!(!gate.on_stay(Variant::Rock, &mut physics));
        assert!(!gate.on_stay(Variant::Paper, &mut physics));
        assert!(gate.is_active());

        assert!(gate.on_stay(Variant::Scissors, &mut physics));
        let moved = physics.get_rigid_body(platform).unwrap().translation();
        assert_eq!((moved.x, moved.y), (0.0, -4.0));
        assert!(!gate.is_active());
        assert!(!physics.get_rigid_body(gate.body_handle).unwrap().is_enabled());
    }

    #[test]
    fn test_fires_only_once() {
        let mut physics = PhysicsWorld::new();
        let (mut gate, platform) = gate_with_platform(&mut physics);

        assert!(gate.on_stay(Variant::Scissors, &mut physics));
        physics
            .get_rigid_body_mut(platform)
            .unwrap()
            .set_translation(vector![5.0, 5.0], true);
        assert!(!gate.on_stay(Variant::Scissors, &mut physics));
        let platform = physics.get_rigid_body(platform).unwrap().translation();
        assert_eq!((platform.x, platform.y), (5.0, 5.0));
    }

    #[test]
    fn test_gate_without_target_still_deactivates() {
        let mut physics = PhysicsWorld::new();
        let mut gate = ScissorGate::spawn(1, Vec2::ZERO, Vec2::ONE, None, &mut physics);

        assert!(gate.on_stay(Variant::Scissors, &mut physics));
        assert!(!gate.is_active());
        assert!(!physics.get_rigid_body(gate.body_handle).unwrap().is_enabled());
        assert!(!gate.on_stay(Variant::Scissors, &mut physics));
    }

    #[test]
    fn test_gate_with_removed_target_still_deactivates() {
        let mut physics = PhysicsWorld::new();
        let (mut gate, platform) = gate_with_platform(&mut physics);
        physics.remove_rigid_body(platform);

        assert!(gate.on_stay(Variant::Scissors, &mut physics));
        assert!(!gate.is_active());
    }
}
