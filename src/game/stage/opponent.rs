// Janken opponents and contact resolution

use glam::Vec2;

use super::level::{MotionConfig, OpponentConfig};
use super::motion::Motion;
use crate::core::math::direction_or_up;
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::player::{ImmersionChange, ImmersionCounter, Outcome, Variant};

/// Unique identifier for an opponent
pub type OpponentId = u32;

/// What a contact between the player and an opponent leads to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResolution {
    /// Draw: push the player by this velocity change
    Repel(Vec2),
    /// Player wins: the opponent leaves the world
    OpponentDefeated,
    /// Opponent wins: the player dies
    PlayerDefeated,
}

/// Judge a contact. A draw pushes the player away from the opponent.
pub fn resolve_contact(
    player: Variant,
    player_position: Vec2,
    opponent: Variant,
    opponent_position: Vec2,
    repulsion: f32,
) -> ContactResolution {
    match player.against(opponent) {
        Outcome::Win => ContactResolution::OpponentDefeated,
        Outcome::Lose => ContactResolution::PlayerDefeated,
        Outcome::Draw => {
            let direction = direction_or_up(opponent_position, player_position);
            ContactResolution::Repel(direction * repulsion)
        }
    }
}

/// An enemy with a fixed shape
#[derive(Debug)]
pub struct Opponent {
    pub id: OpponentId,
    pub name: String,
    pub variant: Variant,
    pub repulsion: f32,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    /// Range sensor for ambushers and chasers
    pub detection_handle: Option<ColliderHandle>,
    motion: Option<Motion>,
    water: ImmersionCounter,
}

impl Opponent {
    pub fn spawn(id: OpponentId, config: &OpponentConfig, physics: &mut PhysicsWorld) -> Self {
        let body_handle = physics.add_rigid_body(presets::opponent_body(config.x, config.y));
        let collider_handle = physics.add_collider(
            presets::opponent_collider(config.width, config.height),
            body_handle,
        );

        let detect_radius = match &config.motion {
            Some(MotionConfig::Ambush { detect_radius, .. })
            | Some(MotionConfig::WaterChase { detect_radius, .. }) => Some(*detect_radius),
            _ => None,
        };
        let detection_handle = detect_radius
            .map(|radius| physics.add_collider(presets::detection_collider(radius), body_handle));

        let origin = Vec2::new(config.x, config.y);
        Self {
            id,
            name: config.name.clone(),
            variant: config.variant,
            repulsion: config.repulsion,
            body_handle,
            collider_handle,
            detection_handle,
            motion: config
                .motion
                .as_ref()
                .map(|motion| Motion::from_config(motion, origin)),
            water: ImmersionCounter::new(),
        }
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn is_in_water(&self) -> bool {
        self.water.is_immersed()
    }

    pub fn enter_water(&mut self) {
        if self.water.enter() == ImmersionChange::Submerged {
            log::debug!("{} entered water", self.name);
        }
    }

    pub fn exit_water(&mut self) {
        if self.water.exit() == ImmersionChange::Surfaced {
            log::debug!("{} left water", self.name);
        }
    }

    pub fn on_player_detected(&mut self, inside: bool) {
        if let Some(motion) = self.motion.as_mut() {
            motion.on_player_detected(inside);
        }
    }

    /// Move along the scripted path for one tick
    pub fn update(&mut self, physics: &mut PhysicsWorld, player: Option<Vec2>, dt: f32) {
        let Some(position) = self.position(physics) else {
            return;
        };
        let in_water = self.water.is_immersed();
        let Some(motion) = self.motion.as_mut() else {
            return;
        };

        let next = motion.step(position, player, in_water, dt);
        if next != position {
            physics.set_next_kinematic_position(self.body_handle, next.x, next.y);
        }
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(variant: Variant, motion: Option<MotionConfig>) -> OpponentConfig {
        OpponentConfig {
            name: "test".to_string(),
            variant,
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            repulsion: 5.0,
            motion,
        }
    }

    #[test]
    fn test_contact_table() {
        let here = Vec2::ZERO;
        let there = Vec2::new(1.0, 0.0);
        for player in Variant::ALL {
            for opponent in Variant::ALL {
                let resolution = resolve_contact(player, here, opponent, there, 5.0);
                let expected = if player.beats() == opponent {
                    ContactResolution::OpponentDefeated
                } else if opponent.beats() == player {
                    ContactResolution::PlayerDefeated
                } else {
                    ContactResolution::Repel(Vec2::new(-5.0, 0.0))
                };
                assert_eq!(resolution, expected, "{} vs {}", player, opponent);
            }
        }
    }

    #[test]
    fn test_draw_pushes_away_from_opponent() {
        let ContactResolution::Repel(push) = resolve_contact(
            Variant::Paper,
            Vec2::new(0.0, 2.0),
            Variant::Paper,
            Vec2::ZERO,
            4.0,
        ) else {
            panic!("expected a draw");
        };
        assert_relative_eq!(push.x, 0.0);
        assert_relative_eq!(push.y, 4.0);
    }

    #[test]
    fn test_draw_at_same_point_pushes_up() {
        let resolution = resolve_contact(Variant::Rock, Vec2::ONE, Variant::Rock, Vec2::ONE, 3.0);
        assert_eq!(resolution, ContactResolution::Repel(Vec2::new(0.0, 3.0)));
    }

    #[test]
    fn test_detection_sensor_only_for_reactive_motion() {
        let mut physics = PhysicsWorld::new();
        let plain = Opponent::spawn(0, &config(Variant::Rock, None), &mut physics);
        assert!(plain.detection_handle.is_none());

        let chaser = Opponent::spawn(
            1,
            &config(
                Variant::Rock,
                Some(MotionConfig::WaterChase {
                    chase_speed: 1.0,
                    detect_radius: 3.0,
                }),
            ),
            &mut physics,
        );
        assert!(chaser.detection_handle.is_some());
    }

    #[test]
    fn test_patrol_moves_kinematic_body() {
        let mut physics = PhysicsWorld::new();
        let mut opponent = Opponent::spawn(
            0,
            &config(
                Variant::Scissors,
                Some(MotionConfig::Patrol {
                    left_x: -2.0,
                    right_x: 2.0,
                    speed: 1.0,
                }),
            ),
            &mut physics,
        );

        for _ in 0..30 {
            opponent.update(&mut physics, None, 1.0 / 60.0);
            physics.step();
        }
        let position = opponent.position(&physics).unwrap();
        assert!(position.x > 0.4);
        assert_relative_eq!(position.y, 0.0);
    }

    #[test]
    fn test_water_counter() {
        let mut physics = PhysicsWorld::new();
        let mut opponent = Opponent::spawn(0, &config(Variant::Paper, None), &mut physics);
        opponent.enter_water();
        opponent.enter_water();
        opponent.exit_water();
        assert!(opponent.is_in_water());
        opponent.exit_water();
        opponent.exit_water();
        assert!(!opponent.is_in_water());
    }
}
