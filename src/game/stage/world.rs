// The running stage: physics world, player and everything they touch

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;

use super::breakable::{self, Breakable};
use super::interactable::{GateTarget, ScissorGate};
use super::level::LevelConfig;
use super::opponent::{resolve_contact, ContactResolution, Opponent, OpponentId};
use super::sequence::{DeathSequence, GoalSequence};
use super::wind::{self, WindZone};
use crate::engine::physics::{presets, ColliderHandle, CollisionEvent, PhysicsWorld, RigidBodyHandle};
use crate::game::player::{Character, ControlInput, PlayerConfig};

/// What a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Player,
    Ground(usize),
    Water(usize),
    Opponent(OpponentId),
    /// Detection range of an opponent
    Detection(OpponentId),
    Breakable(usize),
    Gate(usize),
    DeathZone,
    Goal,
}

/// Collision events the stage reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    PlayerEnter(EntityRef),
    PlayerExit(EntityRef),
    OpponentEnterWater(OpponentId),
    OpponentExitWater(OpponentId),
}

/// Requests from the stage to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    /// The death sequence took over the player
    DisableInput,
    /// Show the game over screen
    GameOver,
    /// Show the result screen
    Result,
}

pub struct Stage {
    name: String,
    next_scene: Option<String>,
    physics: PhysicsWorld,
    player: Character,
    grounds: Vec<RigidBodyHandle>,
    opponents: Vec<Opponent>,
    breakables: Vec<Breakable>,
    gates: Vec<ScissorGate>,
    wind: Option<WindZone>,
    colliders: HashMap<ColliderHandle, EntityRef>,
    /// Opponents touching the player, resolved again every tick
    opponent_contacts: BTreeSet<OpponentId>,
    /// Gates the player is standing in
    gate_overlaps: BTreeSet<usize>,
    death: DeathSequence,
    goal: GoalSequence,
    /// Player velocity before the last physics step
    pre_step_velocity: Vec2,
    signals: Vec<StageSignal>,
}

impl Stage {
    /// Build every entity of `level` in a fresh physics world
    pub fn new(player_config: &PlayerConfig, level: &LevelConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        let mut colliders = HashMap::new();

        let player = Character::new(player_config, &mut physics, level.spawn());
        colliders.insert(player.collider_handle, EntityRef::Player);

        let mut grounds = Vec::with_capacity(level.grounds.len());
        for (i, area) in level.grounds.iter().enumerate() {
            let body = physics.add_rigid_body(presets::static_body(area.x, area.y));
            let collider =
                physics.add_collider(presets::ground_collider(area.width, area.height), body);
            colliders.insert(collider, EntityRef::Ground(i));
            grounds.push(body);
        }

        for (i, area) in level.water.iter().enumerate() {
            let body = physics.add_rigid_body(presets::static_body(area.x, area.y));
            let collider =
                physics.add_collider(presets::water_collider(area.width, area.height), body);
            colliders.insert(collider, EntityRef::Water(i));
        }

        for area in &level.death_zones {
            let body = physics.add_rigid_body(presets::static_body(area.x, area.y));
            let collider =
                physics.add_collider(presets::trigger_collider(area.width, area.height), body);
            colliders.insert(collider, EntityRef::DeathZone);
        }

        if let Some(area) = &level.goal {
            let body = physics.add_rigid_body(presets::static_body(area.x, area.y));
            let collider =
                physics.add_collider(presets::trigger_collider(area.width, area.height), body);
            colliders.insert(collider, EntityRef::Goal);
        }

        let mut opponents = Vec::with_capacity(level.opponents.len());
        for (id, config) in (0..).zip(&level.opponents) {
            let opponent = Opponent::spawn(id, config, &mut physics);
            colliders.insert(opponent.collider_handle, EntityRef::Opponent(id));
            if let Some(detection) = opponent.detection_handle {
                colliders.insert(detection, EntityRef::Detection(id));
            }
            opponents.push(opponent);
        }

        let mut breakables = Vec::with_capacity(level.breakables.len());
        for (i, config) in level.breakables.iter().enumerate() {
            let breakable = Breakable::spawn(i, config, &mut physics);
            colliders.insert(breakable.collider_handle, EntityRef::Breakable(i));
            breakables.push(breakable);
        }

        let mut gates = Vec::with_capacity(level.gates.len());
        for (i, config) in level.gates.iter().enumerate() {
            let target = match config.target.map(|index| grounds.get(index)) {
                Some(Some(&body)) => Some(GateTarget {
                    body,
                    destination: Vec2::from(config.destination),
                }),
                Some(None) => {
                    log::warn!("Gate {} targets a missing ground slab", i);
                    None
                }
                None => None,
            };
            let area = &config.area;
            let gate = ScissorGate::spawn(
                i,
                area.center(),
                Vec2::new(area.width, area.height),
                target,
                &mut physics,
            );
            colliders.insert(gate.collider_handle, EntityRef::Gate(i));
            gates.push(gate);
        }

        log::info!(
            "Stage '{}' ready: {} bodies, {} opponents",
            level.name,
            physics.body_count(),
            opponents.len()
        );

        Self {
            name: level.name.clone(),
            next_scene: level.next_scene.clone(),
            physics,
            player,
            grounds,
            opponents,
            breakables,
            gates,
            wind: level
                .wind
                .map(|w| WindZone::new(w.interval, w.duration, w.force)),
            colliders,
            opponent_contacts: BTreeSet::new(),
            gate_overlaps: BTreeSet::new(),
            death: DeathSequence::new(level.death_sequence_time),
            goal: GoalSequence::new(),
            pre_step_velocity: Vec2::ZERO,
            signals: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene to load after the goal
    pub fn next_scene(&self) -> &str {
        self.next_scene.as_deref().unwrap_or(&self.name)
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    pub fn breakables(&self) -> &[Breakable] {
        &self.breakables
    }

    pub fn gates(&self) -> &[ScissorGate] {
        &self.gates
    }

    pub fn ground_bodies(&self) -> &[RigidBodyHandle] {
        &self.grounds
    }

    pub fn death(&self) -> &DeathSequence {
        &self.death
    }

    pub fn goal_reached(&self) -> bool {
        self.goal.is_reached()
    }

    /// Take the signals raised since the last call
    pub fn drain_signals(&mut self) -> Vec<StageSignal> {
        std::mem::take(&mut self.signals)
    }

    /// One physics tick of game time
    pub fn fixed_update(&mut self, input: ControlInput, dt: f32) {
        self.player.set_input(input);
        self.player.fixed_update(&mut self.physics, dt);
        self.apply_wind(dt);

        let player_position = self.player.position(&self.physics);
        for opponent in &mut self.opponents {
            opponent.update(&mut self.physics, player_position, dt);
        }

        self.pre_step_velocity = self.player.velocity(&self.physics).unwrap_or(Vec2::ZERO);
        self.physics.step();

        // Contacts that began earlier, then the ones this step produced
        self.resolve_ongoing_contacts();
        for event in self.physics.get_collision_events() {
            if let Some(event) = self.translate(event) {
                self.handle_event(event);
            }
        }
    }

    /// Once per rendered frame with unscaled time
    pub fn frame_update(&mut self, real_dt: f32) {
        if self.death.tick(real_dt) {
            self.player.deactivate(&mut self.physics);
            self.signals.push(StageSignal::GameOver);
        }
    }

    fn apply_wind(&mut self, dt: f32) {
        let Some(wind) = self.wind.as_mut() else {
            return;
        };
        if !wind.tick(dt) || !self.player.controls_enabled() {
            return;
        }
        let gravity_scale = self.player.gravity_scale(&self.physics).unwrap_or(1.0);
        let push = wind::push_acceleration(wind.force(), gravity_scale);
        self.player
            .add_velocity(&mut self.physics, Vec2::new(push * dt, 0.0));
    }

    fn translate(&self, event: CollisionEvent) -> Option<StageEvent> {
        let (collider1, collider2, started) = match event {
            CollisionEvent::Started {
                collider1,
                collider2,
                ..
            } => (collider1, collider2, true),
            CollisionEvent::Stopped {
                collider1,
                collider2,
                ..
            } => (collider1, collider2, false),
        };
        // Colliders of removed entities are no longer mapped
        let a = *self.colliders.get(&collider1)?;
        let b = *self.colliders.get(&collider2)?;

        let event = match (a, b) {
            (EntityRef::Player, other) | (other, EntityRef::Player) => {
                if started {
                    StageEvent::PlayerEnter(other)
                } else {
                    StageEvent::PlayerExit(other)
                }
            }
            (EntityRef::Opponent(id), EntityRef::Water(_))
            | (EntityRef::Water(_), EntityRef::Opponent(id)) => {
                if started {
                    StageEvent::OpponentEnterWater(id)
                } else {
                    StageEvent::OpponentExitWater(id)
                }
            }
            _ => return None,
        };
        Some(event)
    }

    /// React to one collision event
    pub fn handle_event(&mut self, event: StageEvent) {
        log::debug!("{:?}", event);
        match event {
            StageEvent::PlayerEnter(entity) => self.on_player_enter(entity),
            StageEvent::PlayerExit(entity) => self.on_player_exit(entity),
            StageEvent::OpponentEnterWater(id) => {
                if let Some(opponent) = self.opponent_mut(id) {
                    opponent.enter_water();
                }
            }
            StageEvent::OpponentExitWater(id) => {
                if let Some(opponent) = self.opponent_mut(id) {
                    opponent.exit_water();
                }
            }
        }
    }

    fn on_player_enter(&mut self, entity: EntityRef) {
        match entity {
            EntityRef::Water(_) => self.player.enter_water(&mut self.physics),
            EntityRef::Opponent(id) => {
                self.opponent_contacts.insert(id);
                self.resolve_opponent_contact(id);
            }
            EntityRef::Detection(id) => {
                if let Some(opponent) = self.opponent_mut(id) {
                    opponent.on_player_detected(true);
                }
            }
            EntityRef::Breakable(index) => self.on_breakable_impact(index),
            EntityRef::Gate(index) => {
                self.gate_overlaps.insert(index);
                self.gate_stay(index);
            }
            EntityRef::DeathZone => self.trigger_death(),
            EntityRef::Goal => self.reach_goal(),
            EntityRef::Player | EntityRef::Ground(_) => {}
        }
    }

    fn on_player_exit(&mut self, entity: EntityRef) {
        match entity {
            EntityRef::Water(_) => self.player.exit_water(&mut self.physics),
            EntityRef::Opponent(id) => {
                self.opponent_contacts.remove(&id);
            }
            EntityRef::Detection(id) => {
                if let Some(opponent) = self.opponent_mut(id) {
                    opponent.on_player_detected(false);
                }
            }
            EntityRef::Gate(index) => {
                self.gate_overlaps.remove(&index);
            }
            _ => {}
        }
    }

    fn resolve_ongoing_contacts(&mut self) {
        let contacts: Vec<OpponentId> = self.opponent_contacts.iter().copied().collect();
        for id in contacts {
            self.resolve_opponent_contact(id);
        }
        let overlaps: Vec<usize> = self.gate_overlaps.iter().copied().collect();
        for index in overlaps {
            self.gate_stay(index);
        }
    }

    fn resolve_opponent_contact(&mut self, id: OpponentId) {
        if !self.player.controls_enabled() {
            return;
        }
        let Some(opponent) = self.opponents.iter().find(|o| o.id == id) else {
            return;
        };
        let (Some(player_position), Some(opponent_position)) = (
            self.player.position(&self.physics),
            opponent.position(&self.physics),
        ) else {
            return;
        };

        match resolve_contact(
            self.player.variant(),
            player_position,
            opponent.variant,
            opponent_position,
            opponent.repulsion,
        ) {
            ContactResolution::Repel(push) => self.player.push(push),
            ContactResolution::OpponentDefeated => {
                log::info!("{} beat {}", self.player.variant(), opponent.name);
                self.remove_opponent(id);
            }
            ContactResolution::PlayerDefeated => {
                log::info!("{} lost to {}", self.player.variant(), opponent.name);
                self.trigger_death();
            }
        }
    }

    fn remove_opponent(&mut self, id: OpponentId) {
        let Some(index) = self.opponents.iter().position(|o| o.id == id) else {
            return;
        };
        let opponent = self.opponents.remove(index);
        self.physics.remove_rigid_body(opponent.body_handle);
        self.colliders.retain(|_, entity| {
            !matches!(entity, EntityRef::Opponent(o) | EntityRef::Detection(o) if *o == id)
        });
        self.opponent_contacts.remove(&id);
    }

    fn on_breakable_impact(&mut self, index: usize) {
        let Some(position) = self.breakables.iter().position(|b| b.id == index) else {
            return;
        };
        // Obstacles never move, so the player's velocity is the relative one
        let relative_velocity_y = self.pre_step_velocity.y;
        let threshold = self.breakables[position].threshold;
        if !breakable::shatters(self.player.variant(), relative_velocity_y, threshold) {
            return;
        }

        let obstacle = self.breakables.remove(position);
        self.physics.remove_rigid_body(obstacle.body_handle);
        self.colliders.remove(&obstacle.collider_handle);
        log::info!("Breakable {} shattered at {:.1} m/s", index, relative_velocity_y);
    }

    fn gate_stay(&mut self, index: usize) {
        let variant = self.player.variant();
        if let Some(gate) = self.gates.iter_mut().find(|g| g.id == index) {
            gate.on_stay(variant, &mut self.physics);
        }
    }

    /// Start the death sequence; repeated calls are ignored
    pub fn trigger_death(&mut self) {
        if !self.death.trigger() {
            return;
        }
        self.player.freeze(&mut self.physics);
        self.opponent_contacts.clear();
        self.signals.push(StageSignal::DisableInput);
    }

    fn reach_goal(&mut self) {
        if self.death.has_started() || !self.goal.reach() {
            return;
        }
        self.signals.push(StageSignal::Result);
    }

    fn opponent_mut(&mut self, id: OpponentId) -> Option<&mut Opponent> {
        self.opponents.iter_mut().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Variant;
    use crate::game::stage::level::{Area, BreakableConfig, GateConfig, OpponentConfig};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn opponent_at(variant: Variant, x: f32, y: f32) -> OpponentConfig {
        OpponentConfig {
            name: format!("{}_opponent", variant),
            variant,
            x,
            y,
            width: 0.9,
            height: 0.9,
            repulsion: 6.0,
            motion: None,
        }
    }

    fn stage(level: LevelConfig) -> Stage {
        Stage::new(&PlayerConfig::default(), &level)
    }

    fn player_velocity(stage: &Stage) -> Vec2 {
        stage.player.velocity(&stage.physics).unwrap()
    }

    fn set_player_variant(stage: &mut Stage, variant: Variant) {
        stage.player.apply_variant(&mut stage.physics, variant);
    }

    #[test]
    fn test_contact_resolution_table() {
        for player in Variant::ALL {
            for opponent in Variant::ALL {
                let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
                level.opponents.push(opponent_at(opponent, 2.0, 5.0));
                let mut stage = stage(level);
                set_player_variant(&mut stage, player);

                stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));

                match player.against(opponent) {
                    crate::game::player::Outcome::Win => {
                        assert!(stage.opponents().is_empty());
                        assert!(!stage.death().has_started());
                    }
                    crate::game::player::Outcome::Lose => {
                        assert_eq!(stage.opponents().len(), 1);
                        assert!(stage.death().is_running());
                        assert_eq!(stage.drain_signals(), vec![StageSignal::DisableInput]);
                    }
                    crate::game::player::Outcome::Draw => {
                        assert_eq!(stage.opponents().len(), 1);
                        assert!(!stage.death().has_started());
                        let push = stage.player().pending_impulse();
                        assert_relative_eq!(push.x, -6.0);
                        assert_relative_eq!(push.y, 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_defeated_opponent_leaves_physics() {
        let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
        level.opponents.push(opponent_at(Variant::Scissors, 2.0, 5.0));
        let mut stage = stage(level);
        let bodies = stage.physics.body_count();

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));
        assert_eq!(stage.physics.body_count(), bodies - 1);
        assert!(!stage.colliders.values().any(|e| *e == EntityRef::Opponent(0)));

        // Late events for the removed opponent are harmless
        stage.handle_event(StageEvent::PlayerExit(EntityRef::Opponent(0)));
        stage.handle_event(StageEvent::OpponentEnterWater(0));
    }

    #[test]
    fn test_draw_repels_every_tick_of_contact() {
        let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
        level.opponents.push(opponent_at(Variant::Rock, 2.0, 5.0));
        let mut stage = stage(level);

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));
        stage.resolve_ongoing_contacts();
        assert_relative_eq!(stage.player().pending_impulse().x, -12.0);

        stage.handle_event(StageEvent::PlayerExit(EntityRef::Opponent(0)));
        stage.resolve_ongoing_contacts();
        assert_relative_eq!(stage.player().pending_impulse().x, -12.0);
    }

    #[test]
    fn test_draw_pushes_player_away() {
        let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
        level.opponents.push(opponent_at(Variant::Rock, 2.0, 5.0));
        let mut stage = stage(level);

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));
        stage.fixed_update(ControlInput::default(), DT);

        let position = stage.player.position(&stage.physics).unwrap();
        assert!(position.x < -0.05, "player stayed at x = {}", position.x);
        assert!(player_velocity(&stage).x < 0.0);
    }

    #[test]
    fn test_draw_push_beats_walking_into_opponent() {
        let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
        level.opponents.push(opponent_at(Variant::Rock, 2.0, 5.0));
        let mut stage = stage(level);
        let walk = ControlInput {
            move_axis: Vec2::new(1.0, 0.0),
            ..Default::default()
        };

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));
        stage.fixed_update(walk, DT);

        let air_speed = stage.player().stats().air_speed;
        assert_relative_eq!(player_velocity(&stage).x, air_speed - 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_contact_ignored_while_dying() {
        let mut level = LevelConfig::empty("duel", Vec2::new(0.0, 5.0));
        level.opponents.push(opponent_at(Variant::Scissors, 2.0, 5.0));
        let mut stage = stage(level);
        stage.trigger_death();

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Opponent(0)));
        assert_eq!(stage.opponents().len(), 1);
    }

    #[test]
    fn test_two_overlapping_water_volumes() {
        let mut level = LevelConfig::empty("pool", Vec2::new(0.0, 5.0));
        level.water.push(Area::new(0.0, 5.0, 4.0, 4.0));
        level.water.push(Area::new(1.0, 5.0, 4.0, 4.0));
        let mut stage = stage(level);
        let rock = PlayerConfig::default().variants.get(Variant::Rock).clone();

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Water(0)));
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Water(1)));
        stage.handle_event(StageEvent::PlayerExit(EntityRef::Water(0)));
        assert!(stage.player().is_immersed());
        assert_relative_eq!(
            stage.player.gravity_scale(&stage.physics).unwrap(),
            rock.water_gravity_scale
        );

        stage.handle_event(StageEvent::PlayerExit(EntityRef::Water(1)));
        assert!(!stage.player().is_immersed());
        assert_relative_eq!(
            stage.player.gravity_scale(&stage.physics).unwrap(),
            rock.gravity_scale
        );
    }

    fn stage_with_breakable() -> Stage {
        let mut level = LevelConfig::empty("quarry", Vec2::new(0.0, 5.0));
        level.breakables.push(BreakableConfig {
            area: Area::new(0.0, 0.0, 1.0, 1.0),
            threshold: 5.0,
        });
        stage(level)
    }

    #[test]
    fn test_fast_rock_breaks_obstacle() {
        let mut stage = stage_with_breakable();
        stage.pre_step_velocity = Vec2::new(0.0, -8.0);
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Breakable(0)));
        assert!(stage.breakables().is_empty());
    }

    #[test]
    fn test_slow_rock_leaves_obstacle() {
        let mut stage = stage_with_breakable();
        stage.pre_step_velocity = Vec2::new(0.0, -3.0);
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Breakable(0)));
        assert_eq!(stage.breakables().len(), 1);
    }

    #[test]
    fn test_fast_paper_leaves_obstacle() {
        let mut stage = stage_with_breakable();
        set_player_variant(&mut stage, Variant::Paper);
        stage.pre_step_velocity = Vec2::new(0.0, -20.0);
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Breakable(0)));
        assert_eq!(stage.breakables().len(), 1);
    }

    #[test]
    fn test_death_sequence_runs_on_real_time() {
        let mut level = LevelConfig::empty("pit", Vec2::new(0.0, 5.0));
        level.death_zones.push(Area::new(0.0, -5.0, 10.0, 1.0));
        let mut stage = stage(level);

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::DeathZone));
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::DeathZone));
        assert_eq!(stage.drain_signals(), vec![StageSignal::DisableInput]);
        assert_eq!(player_velocity(&stage), Vec2::ZERO);

        stage.frame_update(1.0);
        assert!(stage.drain_signals().is_empty());
        assert!(stage.player().is_active());

        stage.frame_update(0.5);
        assert_eq!(stage.drain_signals(), vec![StageSignal::GameOver]);
        assert!(!stage.player().is_active());

        stage.frame_update(5.0);
        assert!(stage.drain_signals().is_empty());
    }

    #[test]
    fn test_goal_only_once() {
        let mut level = LevelConfig::empty("finish", Vec2::new(0.0, 5.0));
        level.goal = Some(Area::new(0.0, 5.0, 1.0, 1.0));
        let mut stage = stage(level);

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Goal));
        stage.handle_event(StageEvent::PlayerExit(EntityRef::Goal));
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Goal));
        assert_eq!(stage.drain_signals(), vec![StageSignal::Result]);
        assert!(stage.goal_reached());
    }

    #[test]
    fn test_no_goal_after_death() {
        let mut level = LevelConfig::empty("finish", Vec2::new(0.0, 5.0));
        level.goal = Some(Area::new(0.0, 5.0, 1.0, 1.0));
        let mut stage = stage(level);
        stage.trigger_death();
        stage.drain_signals();

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Goal));
        assert!(stage.drain_signals().is_empty());
    }

    #[test]
    fn test_scissor_gate_moves_platform() {
        let mut level = LevelConfig::empty("bridge", Vec2::new(0.0, 5.0));
        level.grounds.push(Area::new(4.0, 2.0, 2.0, 0.5));
        level.gates.push(GateConfig {
            area: Area::new(0.0, 5.0, 1.0, 1.0),
            target: Some(0),
            destination: [4.0, -3.0],
        });
        let mut stage = stage(level);

        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Gate(0)));
        assert!(stage.gates()[0].is_active());

        // Shifting shape while still inside cuts on the next tick
        set_player_variant(&mut stage, Variant::Scissors);
        stage.resolve_ongoing_contacts();
        assert!(!stage.gates()[0].is_active());
        let platform = stage.ground_bodies()[0];
        let moved = stage.physics.get_rigid_body(platform).unwrap().translation();
        assert_eq!((moved.x, moved.y), (4.0, -3.0));
    }

    #[test]
    fn test_gate_with_bad_target_still_closes() {
        let mut level = LevelConfig::empty("bridge", Vec2::new(0.0, 5.0));
        level.gates.push(GateConfig {
            area: Area::new(0.0, 5.0, 1.0, 1.0),
            target: Some(3),
            destination: [0.0, 0.0],
        });
        let mut stage = stage(level);
        set_player_variant(&mut stage, Variant::Scissors);
        stage.handle_event(StageEvent::PlayerEnter(EntityRef::Gate(0)));
        assert!(!stage.gates()[0].is_active());
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut level = LevelConfig::empty("field", Vec2::new(0.0, 2.0));
        level.grounds.push(Area::new(0.0, -0.5, 20.0, 1.0));
        let mut stage = stage(level);

        for _ in 0..120 {
            stage.fixed_update(ControlInput::default(), DT);
        }
        assert!(stage.player().is_grounded());
        let position = stage.player.position(&stage.physics).unwrap();
        assert!(position.y > 0.0 && position.y < 1.0);
    }

    /// Drop the player from `height` onto whatever the level puts at the origin
    fn drop_player(level: &mut LevelConfig, height: f32) {
        level.spawn = [0.0, height];
        level.grounds.push(Area::new(0.0, -0.5, 20.0, 1.0));
    }

    fn run_until(stage: &mut Stage, ticks: usize, done: impl Fn(&Stage) -> bool) {
        for _ in 0..ticks {
            stage.fixed_update(ControlInput::default(), DT);
            if done(stage) {
                break;
            }
        }
    }

    #[test]
    fn test_landing_on_weaker_opponent_defeats_it() {
        let mut level = LevelConfig::empty("duel", Vec2::ZERO);
        drop_player(&mut level, 3.0);
        level.opponents.push(opponent_at(Variant::Scissors, 0.0, 0.45));
        let mut stage = stage(level);

        run_until(&mut stage, 120, |s| s.opponents().is_empty());
        assert!(stage.opponents().is_empty());
        assert!(!stage.death().has_started());
    }

    #[test]
    fn test_landing_on_stronger_opponent_kills() {
        let mut level = LevelConfig::empty("duel", Vec2::ZERO);
        drop_player(&mut level, 3.0);
        level.opponents.push(opponent_at(Variant::Paper, 0.0, 0.45));
        let mut stage = stage(level);

        run_until(&mut stage, 120, |s| s.death().has_started());
        assert!(stage.death().is_running());
        assert_eq!(stage.opponents().len(), 1);
        assert_eq!(stage.drain_signals(), vec![StageSignal::DisableInput]);
    }

    #[test]
    fn test_heavy_landing_shatters_breakable() {
        let mut level = LevelConfig::empty("quarry", Vec2::ZERO);
        drop_player(&mut level, 6.0);
        level.breakables.push(BreakableConfig {
            area: Area::new(0.0, 0.5, 1.0, 1.0),
            threshold: 5.0,
        });
        let mut stage = stage(level);

        run_until(&mut stage, 120, |s| s.breakables().is_empty());
        assert!(stage.breakables().is_empty());
    }

    #[test]
    fn test_soft_landing_stands_on_breakable() {
        let mut level = LevelConfig::empty("quarry", Vec2::ZERO);
        drop_player(&mut level, 2.0);
        level.breakables.push(BreakableConfig {
            area: Area::new(0.0, 0.5, 1.0, 1.0),
            threshold: 50.0,
        });
        let mut stage = stage(level);

        run_until(&mut stage, 120, |_| false);
        assert_eq!(stage.breakables().len(), 1);
        assert!(stage.player().is_grounded());
        let position = stage.player.position(&stage.physics).unwrap();
        assert!(position.y > 1.0, "player sank to y = {}", position.y);

        // Standing on it counts as ground for jumping
        stage.fixed_update(
            ControlInput {
                jump: true,
                ..Default::default()
            },
            DT,
        );
        assert!(player_velocity(&stage).y > 0.0);
    }

    #[test]
    fn test_falling_into_death_zone() {
        let mut level = LevelConfig::empty("pit", Vec2::new(0.0, 2.0));
        level.death_zones.push(Area::new(0.0, -5.0, 100.0, 2.0));
        let mut stage = stage(level);

        for _ in 0..120 {
            stage.fixed_update(ControlInput::default(), DT);
            if stage.death().has_started() {
                break;
            }
        }
        assert!(stage.death().is_running());
        assert_eq!(stage.drain_signals(), vec![StageSignal::DisableInput]);
    }

    #[test]
    fn test_player_swims_into_water_volume() {
        let mut level = LevelConfig::empty("lake", Vec2::new(0.0, 1.0));
        level.water.push(Area::new(0.0, -10.0, 20.0, 20.0));
        let mut stage = stage(level);

        for _ in 0..30 {
            stage.fixed_update(ControlInput::default(), DT);
        }
        assert!(stage.player().is_immersed());
    }

    #[test]
    fn test_wind_pushes_left_while_blowing() {
        let mut level = LevelConfig::empty("cliff", Vec2::new(0.0, 5.0));
        level.wind = Some(crate::game::stage::level::WindConfig {
            interval: 0.0,
            duration: 10.0,
            force: 6.0,
        });
        let mut stage = stage(level);

        stage.fixed_update(ControlInput::default(), DT);
        let rock_gravity = PlayerConfig::default().variants.get(Variant::Rock).gravity_scale;
        assert_relative_eq!(player_velocity(&stage).x, -6.0 / rock_gravity * DT, epsilon = 1e-5);
    }
}
