// Scripted enemy movement
//
// Each behaviour takes the current position and returns the next one; the
// opponent feeds it into its kinematic body.

use glam::Vec2;

use super::level::MotionConfig;
use crate::core::math::{approx_equal, move_towards};

/// Distance at which a patrol counts a bound as reached
const PATROL_ARRIVAL: f32 = 0.1;
/// Distance at which an ambush counts a point as reached
const AMBUSH_ARRIVAL: f32 = 0.01;

/// Horizontal ping-pong between two x bounds at a fixed height
#[derive(Debug, Clone, PartialEq)]
pub struct Patrol {
    left_x: f32,
    right_x: f32,
    speed: f32,
    heading_right: bool,
}

impl Patrol {
    pub fn new(left_x: f32, right_x: f32, speed: f32) -> Self {
        Self {
            left_x,
            right_x,
            speed,
            heading_right: true,
        }
    }

    pub fn heading_right(&self) -> bool {
        self.heading_right
    }

    pub fn step(&mut self, position: Vec2, dt: f32) -> Vec2 {
        let bound = if self.heading_right {
            self.right_x
        } else {
            self.left_x
        };
        let target = Vec2::new(bound, position.y);
        let next = move_towards(position, target, self.speed * dt);

        if approx_equal(next.x, bound, PATROL_ARRIVAL) {
            self.heading_right = !self.heading_right;
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbushPhase {
    Idle,
    Striking,
    Returning,
}

/// Waits until the player is detected, dashes to a point, then returns
#[derive(Debug, Clone, PartialEq)]
pub struct Ambush {
    target: Vec2,
    return_point: Vec2,
    speed: f32,
    phase: AmbushPhase,
}

impl Ambush {
    /// `return_point` defaults to where the opponent starts
    pub fn new(origin: Vec2, target: Vec2, return_point: Option<Vec2>, speed: f32) -> Self {
        Self {
            target,
            return_point: return_point.unwrap_or(origin),
            speed,
            phase: AmbushPhase::Idle,
        }
    }

    pub fn phase(&self) -> AmbushPhase {
        self.phase
    }

    /// Start the run; ignored while one is in progress
    pub fn trigger(&mut self) -> bool {
        if self.phase != AmbushPhase::Idle {
            return false;
        }
        self.phase = AmbushPhase::Striking;
        true
    }

    pub fn step(&mut self, position: Vec2, dt: f32) -> Vec2 {
        let goal = match self.phase {
            AmbushPhase::Idle => return position,
            AmbushPhase::Striking => self.target,
            AmbushPhase::Returning => self.return_point,
        };

        let next = move_towards(position, goal, self.speed * dt);
        if next.distance(goal) < AMBUSH_ARRIVAL {
            self.phase = match self.phase {
                AmbushPhase::Striking => AmbushPhase::Returning,
                _ => AmbushPhase::Idle,
            };
        }
        next
    }
}

/// Swims toward the player while both share the water
#[derive(Debug, Clone, PartialEq)]
pub struct WaterChase {
    chase_speed: f32,
    player_in_range: bool,
}

impl WaterChase {
    pub fn new(chase_speed: f32) -> Self {
        Self {
            chase_speed,
            player_in_range: false,
        }
    }

    pub fn set_player_in_range(&mut self, in_range: bool) {
        self.player_in_range = in_range;
    }

    pub fn player_in_range(&self) -> bool {
        self.player_in_range
    }

    pub fn step(&self, position: Vec2, player: Option<Vec2>, in_water: bool, dt: f32) -> Vec2 {
        match player {
            Some(player) if in_water && self.player_in_range => {
                move_towards(position, player, self.chase_speed * dt)
            }
            _ => position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Patrol(Patrol),
    Ambush(Ambush),
    WaterChase(WaterChase),
}

impl Motion {
    pub fn from_config(config: &MotionConfig, origin: Vec2) -> Self {
        match config {
            MotionConfig::Patrol {
                left_x,
                right_x,
                speed,
            } => Motion::Patrol(Patrol::new(*left_x, *right_x, *speed)),
            MotionConfig::Ambush {
                target,
                return_point,
                speed,
                ..
            } => Motion::Ambush(Ambush::new(
                origin,
                Vec2::from(*target),
                return_point.map(Vec2::from),
                *speed,
            )),
            MotionConfig::WaterChase { chase_speed, .. } => {
                Motion::WaterChase(WaterChase::new(*chase_speed))
            }
        }
    }

    /// The player entered or left the detection range
    pub fn on_player_detected(&mut self, inside: bool) {
        match self {
            Motion::Ambush(ambush) if inside => {
                if ambush.trigger() {
                    log::debug!("Ambush triggered");
                }
            }
            Motion::WaterChase(chase) => chase.set_player_in_range(inside),
            _ => {}
        }
    }

    pub fn step(&mut self, position: Vec2, player: Option<Vec2>, in_water: bool, dt: f32) -> Vec2 {
        match self {
            Motion::Patrol(patrol) => patrol.step(position, dt),
            Motion::Ambush(ambush) => ambush.step(position, dt),
            Motion::WaterChase(chase) => chase.step(position, player, in_water, dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_patrol_moves_toward_right_bound() {
        let mut patrol = Patrol::new(0.0, 4.0, 2.0);
        let next = patrol.step(Vec2::new(1.0, 3.0), 0.5);
        assert_eq!(next, Vec2::new(2.0, 3.0));
        assert!(patrol.heading_right());
    }

    #[test]
    fn test_patrol_flips_at_bounds() {
        let mut patrol = Patrol::new(0.0, 1.0, 1.0);
        let mut position = Vec2::new(0.5, 2.0);
        let mut flips = 0;
        let mut heading = patrol.heading_right();
        for _ in 0..300 {
            position = patrol.step(position, DT);
            assert!(position.x >= 0.0 && position.x <= 1.0);
            assert_eq!(position.y, 2.0);
            if patrol.heading_right() != heading {
                heading = patrol.heading_right();
                flips += 1;
            }
        }
        // 5 seconds at 1 unit/s over a 1 unit span
        assert!(flips >= 4);
    }

    #[test]
    fn test_ambush_idle_until_triggered() {
        let origin = Vec2::new(0.0, 0.0);
        let mut ambush = Ambush::new(origin, Vec2::new(2.0, 0.0), None, 4.0);
        assert_eq!(ambush.step(origin, DT), origin);
        assert_eq!(ambush.phase(), AmbushPhase::Idle);
    }

    #[test]
    fn test_ambush_round_trip() {
        let origin = Vec2::new(0.0, 0.0);
        let mut ambush = Ambush::new(origin, Vec2::new(1.0, 0.0), None, 2.0);
        assert!(ambush.trigger());
        assert!(!ambush.trigger());

        let mut position = origin;
        let mut reached_target = false;
        for _ in 0..120 {
            position = ambush.step(position, DT);
            if ambush.phase() == AmbushPhase::Returning {
                reached_target = true;
            }
            if ambush.phase() == AmbushPhase::Idle {
                break;
            }
        }
        assert!(reached_target);
        assert_eq!(ambush.phase(), AmbushPhase::Idle);
        assert_relative_eq!(position.x, origin.x, epsilon = AMBUSH_ARRIVAL);

        // Ready for another run
        assert!(ambush.trigger());
    }

    #[test]
    fn test_ambush_custom_return_point() {
        let mut ambush = Ambush::new(
            Vec2::ZERO,
            Vec2::new(0.5, 0.0),
            Some(Vec2::new(0.0, 1.0)),
            10.0,
        );
        ambush.trigger();
        let mut position = Vec2::ZERO;
        for _ in 0..60 {
            position = ambush.step(position, DT);
        }
        assert_eq!(position, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_chase_needs_water_and_range() {
        let mut chase = WaterChase::new(3.0);
        let start = Vec2::ZERO;
        let player = Some(Vec2::new(10.0, 0.0));

        assert_eq!(chase.step(start, player, true, 1.0), start);
        chase.set_player_in_range(true);
        assert_eq!(chase.step(start, player, false, 1.0), start);
        assert_eq!(chase.step(start, player, true, 1.0), Vec2::new(3.0, 0.0));
        assert_eq!(chase.step(start, None, true, 1.0), start);
    }

    #[test]
    fn test_detection_routing() {
        let mut motion = Motion::from_config(
            &MotionConfig::WaterChase {
                chase_speed: 1.0,
                detect_radius: 2.0,
            },
            Vec2::ZERO,
        );
        motion.on_player_detected(true);
        assert!(matches!(&motion, Motion::WaterChase(c) if c.player_in_range()));
        motion.on_player_detected(false);
        assert!(matches!(&motion, Motion::WaterChase(c) if !c.player_in_range()));
    }
}
