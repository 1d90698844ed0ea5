// Stage layout loaded from data/<scene>.toml

use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use crate::game::data::{self, ensure_non_negative, ConfigError};
use crate::game::player::Variant;

/// Axis-aligned box given by its center and size
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::invalid(field, "width and height must be positive"))
        }
    }
}

/// How an opponent moves on its own
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionConfig {
    /// Back and forth between two x bounds
    Patrol { left_x: f32, right_x: f32, speed: f32 },
    /// Dash to `target` once the player comes close, then go back
    Ambush {
        target: [f32; 2],
        #[serde(default)]
        return_point: Option<[f32; 2]>,
        speed: f32,
        detect_radius: f32,
    },
    /// Follow the player while both are in water
    WaterChase { chase_speed: f32, detect_radius: f32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpponentConfig {
    pub name: String,
    pub variant: Variant,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_opponent_size")]
    pub width: f32,
    #[serde(default = "default_opponent_size")]
    pub height: f32,
    /// Push applied to the player on a draw
    #[serde(default = "default_repulsion")]
    pub repulsion: f32,
    #[serde(default)]
    pub motion: Option<MotionConfig>,
}

fn default_opponent_size() -> f32 {
    0.9
}

fn default_repulsion() -> f32 {
    6.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakableConfig {
    #[serde(flatten)]
    pub area: Area,
    /// Downward speed a rock needs to smash it
    #[serde(default = "default_break_threshold")]
    pub threshold: f32,
}

fn default_break_threshold() -> f32 {
    5.0
}

/// Sensor that moves a ground slab when touched as scissors
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GateConfig {
    #[serde(flatten)]
    pub area: Area,
    /// Index into `grounds` of the slab to move
    #[serde(default)]
    pub target: Option<usize>,
    pub destination: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WindConfig {
    /// Calm seconds between gusts
    pub interval: f32,
    /// Seconds a gust lasts
    pub duration: f32,
    pub force: f32,
}

/// A complete stage
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    /// Scene to load after the goal; the same stage when unset
    #[serde(default)]
    pub next_scene: Option<String>,
    pub spawn: [f32; 2],
    /// Real seconds between dying and the game over screen
    #[serde(default = "default_death_sequence_time")]
    pub death_sequence_time: f32,
    #[serde(default)]
    pub grounds: Vec<Area>,
    #[serde(default)]
    pub water: Vec<Area>,
    #[serde(default)]
    pub opponents: Vec<OpponentConfig>,
    #[serde(default)]
    pub breakables: Vec<BreakableConfig>,
    #[serde(default)]
    pub gates: Vec<GateConfig>,
    #[serde(default)]
    pub death_zones: Vec<Area>,
    #[serde(default)]
    pub goal: Option<Area>,
    #[serde(default)]
    pub wind: Option<WindConfig>,
}

fn default_death_sequence_time() -> f32 {
    1.5
}

impl LevelConfig {
    /// Empty stage with only a spawn point
    pub fn empty(name: &str, spawn: Vec2) -> Self {
        Self {
            name: name.to_string(),
            next_scene: None,
            spawn: spawn.to_array(),
            death_sequence_time: default_death_sequence_time(),
            grounds: Vec::new(),
            water: Vec::new(),
            opponents: Vec::new(),
            breakables: Vec::new(),
            gates: Vec::new(),
            death_zones: Vec::new(),
            goal: None,
            wind: None,
        }
    }

    /// Small stage used when no level file is present
    pub fn builtin() -> Self {
        let mut level = Self::empty("builtin", Vec2::new(0.0, 1.0));
        level.grounds = vec![
            Area::new(5.0, -0.5, 20.0, 1.0),
            Area::new(22.0, -0.5, 8.0, 1.0),
            Area::new(16.0, 3.0, 2.0, 0.5),
        ];
        level.water = vec![Area::new(30.0, -2.0, 8.0, 4.0)];
        level.opponents = vec![OpponentConfig {
            name: "scissor_guard".to_string(),
            variant: Variant::Scissors,
            x: 8.0,
            y: 0.45,
            width: default_opponent_size(),
            height: default_opponent_size(),
            repulsion: default_repulsion(),
            motion: Some(MotionConfig::Patrol {
                left_x: 6.0,
                right_x: 11.0,
                speed: 1.5,
            }),
        }];
        level.breakables = vec![BreakableConfig {
            area: Area::new(20.0, 0.5, 1.0, 1.0),
            threshold: default_break_threshold(),
        }];
        level.death_zones = vec![Area::new(15.0, -10.0, 100.0, 2.0)];
        level.goal = Some(Area::new(40.0, 1.0, 1.0, 2.0));
        level
    }

    pub fn spawn(&self) -> Vec2 {
        Vec2::from(self.spawn)
    }

    /// Parse and validate a level from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let level: Self = data::parse_toml(text, origin)?;
        level.validate()?;
        Ok(level)
    }

    /// Load `path`, falling back to the built-in stage when it is missing
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match data::load_toml::<Self>(path)? {
            Some(level) => {
                level.validate()?;
                Ok(level)
            }
            None => {
                log::info!("{} not found, using built-in level", path.display());
                Ok(Self::builtin())
            }
        }
    }

    /// Load `data/<scene>.toml`
    pub fn load_scene(scene: &str) -> Result<Self, ConfigError> {
        Self::load(&data::data_root().join(format!("{}.toml", scene)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("death_sequence_time", self.death_sequence_time)?;
        for (i, area) in self.grounds.iter().enumerate() {
            area.validate(&format!("grounds[{}]", i))?;
        }
        for (i, area) in self.water.iter().enumerate() {
            area.validate(&format!("water[{}]", i))?;
        }
        for (i, area) in self.death_zones.iter().enumerate() {
            area.validate(&format!("death_zones[{}]", i))?;
        }
        if let Some(goal) = &self.goal {
            goal.validate("goal")?;
        }
        for (i, breakable) in self.breakables.iter().enumerate() {
            let field = format!("breakables[{}]", i);
            breakable.area.validate(&field)?;
            ensure_non_negative(&format!("{}.threshold", field), breakable.threshold)?;
        }
        for (i, gate) in self.gates.iter().enumerate() {
            gate.area.validate(&format!("gates[{}]", i))?;
        }
        for (i, opponent) in self.opponents.iter().enumerate() {
            opponent.validate(&format!("opponents[{}]", i))?;
        }
        if let Some(wind) = &self.wind {
            ensure_non_negative("wind.interval", wind.interval)?;
            ensure_non_negative("wind.duration", wind.duration)?;
        }
        Ok(())
    }
}

impl OpponentConfig {
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        Area::new(self.x, self.y, self.width, self.height).validate(field)?;
        ensure_non_negative(&format!("{}.repulsion", field), self.repulsion)?;
        match &self.motion {
            Some(MotionConfig::Patrol {
                left_x,
                right_x,
                speed,
            }) => {
                ensure_non_negative(&format!("{}.speed", field), *speed)?;
                if left_x > right_x {
                    return Err(ConfigError::invalid(
                        format!("{}.left_x", field),
                        "must not exceed right_x",
                    ));
                }
            }
            Some(MotionConfig::Ambush {
                speed,
                detect_radius,
                ..
            }) => {
                ensure_non_negative(&format!("{}.speed", field), *speed)?;
                ensure_non_negative(&format!("{}.detect_radius", field), *detect_radius)?;
            }
            Some(MotionConfig::WaterChase {
                chase_speed,
                detect_radius,
            }) => {
                ensure_non_negative(&format!("{}.chase_speed", field), *chase_speed)?;
                ensure_non_negative(&format!("{}.detect_radius", field), *detect_radius)?;
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "cave"
spawn = [1.0, 2.0]

[[grounds]]
x = 0.0
y = -0.5
width = 10.0
height = 1.0

[[water]]
x = 4.0
y = -2.0
width = 3.0
height = 2.0

[[opponents]]
name = "paper_bat"
variant = "paper"
x = 3.0
y = 1.0
motion = { kind = "patrol", left_x = 2.0, right_x = 5.0, speed = 1.0 }

[[opponents]]
name = "lurker"
variant = "rock"
x = 4.0
y = -2.0
repulsion = 3.0
motion = { kind = "water_chase", chase_speed = 2.0, detect_radius = 4.0 }

[[breakables]]
x = 6.0
y = 0.5
width = 1.0
height = 1.0

[[gates]]
x = 8.0
y = 0.5
width = 1.0
height = 1.0
target = 0
destination = [0.0, -5.0]

[wind]
interval = 3.0
duration = 1.0
force = 4.0
"#;

    #[test]
    fn test_parse_level() {
        let level = LevelConfig::from_toml(SAMPLE, Path::new("cave.toml")).unwrap();
        assert_eq!(level.name, "cave");
        assert_eq!(level.spawn(), Vec2::new(1.0, 2.0));
        assert_eq!(level.death_sequence_time, 1.5);
        assert_eq!(level.grounds.len(), 1);
        assert_eq!(level.opponents[0].variant, Variant::Paper);
        assert_eq!(level.opponents[0].repulsion, 6.0);
        assert_eq!(
            level.opponents[1].motion,
            Some(MotionConfig::WaterChase {
                chase_speed: 2.0,
                detect_radius: 4.0
            })
        );
        assert_eq!(level.breakables[0].threshold, 5.0);
        assert_eq!(level.gates[0].target, Some(0));
        assert_eq!(level.wind.map(|w| w.force), Some(4.0));
        assert!(level.goal.is_none());
    }

    #[test]
    fn test_inverted_patrol_rejected() {
        let text = r#"
name = "bad"
spawn = [0.0, 0.0]

[[opponents]]
name = "lost"
variant = "scissors"
x = 0.0
y = 0.0
motion = { kind = "patrol", left_x = 5.0, right_x = 1.0, speed = 1.0 }
"#;
        let err = LevelConfig::from_toml(text, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_zero_sized_ground_rejected() {
        let text = r#"
name = "flat"
spawn = [0.0, 0.0]

[[grounds]]
x = 0.0
y = 0.0
width = 0.0
height = 1.0
"#;
        assert!(LevelConfig::from_toml(text, Path::new("flat.toml")).is_err());
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let path = std::env::temp_dir().join("janken-platformer-no-such-level.toml");
        let level = LevelConfig::load(&path).unwrap();
        assert_eq!(level, LevelConfig::builtin());
    }

    #[test]
    fn test_builtin_is_valid() {
        assert!(LevelConfig::builtin().validate().is_ok());
    }

    #[test]
    fn test_shipped_level_loads() {
        let level = LevelConfig::load_scene("level").unwrap();
        assert!(!level.grounds.is_empty());
        assert!(level.goal.is_some());
    }
}
