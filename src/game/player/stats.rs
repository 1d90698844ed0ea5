// Per-shape tuning and the player body config

use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use super::variant::Variant;
use crate::game::data::{self, ensure_non_negative, ConfigError};

/// Tuning for one shape, swapped in whole whenever the shape changes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantStats {
    /// Horizontal speed while grounded (units/second)
    pub ground_speed: f32,
    /// Horizontal speed while airborne or swimming
    pub air_speed: f32,
    /// Vertical velocity change of a jump from the ground
    pub jump_force: f32,
    /// Vertical velocity change of a stroke while in water
    pub water_jump_force: f32,
    /// Gravity multiplier on land
    pub gravity_scale: f32,
    /// Gravity multiplier while immersed
    pub water_gravity_scale: f32,
    /// Sprite shown for this shape
    pub sprite: String,
    /// Eye position relative to the body
    #[serde(default)]
    pub eye_offset: [f32; 2],
}

impl VariantStats {
    pub fn eye_offset(&self) -> Vec2 {
        Vec2::from(self.eye_offset)
    }

    /// Gravity multiplier for the given immersion state
    pub fn gravity_for(&self, immersed: bool) -> f32 {
        if immersed {
            self.water_gravity_scale
        } else {
            self.gravity_scale
        }
    }

    fn validate(&self, variant: Variant) -> Result<(), ConfigError> {
        let field = |name: &str| format!("variants.{}.{}", variant, name);
        ensure_non_negative(&field("ground_speed"), self.ground_speed)?;
        ensure_non_negative(&field("air_speed"), self.air_speed)?;
        ensure_non_negative(&field("jump_force"), self.jump_force)?;
        ensure_non_negative(&field("water_jump_force"), self.water_jump_force)?;
        ensure_non_negative(&field("gravity_scale"), self.gravity_scale)?;
        ensure_non_negative(&field("water_gravity_scale"), self.water_gravity_scale)?;
        if self.sprite.is_empty() {
            return Err(ConfigError::invalid(field("sprite"), "must not be empty"));
        }
        Ok(())
    }
}

/// Per-shape stats indexed by the shape's cycle position
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTable([VariantStats; 3]);

impl VariantTable {
    pub fn new(rock: VariantStats, scissors: VariantStats, paper: VariantStats) -> Self {
        Self([rock, scissors, paper])
    }

    pub fn get(&self, variant: Variant) -> &VariantStats {
        &self.0[variant.index()]
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::new(
            // Heavy and slow, sinks in water
            VariantStats {
                ground_speed: 4.0,
                air_speed: 3.5,
                jump_force: 9.0,
                water_jump_force: 5.0,
                gravity_scale: 1.5,
                water_gravity_scale: 1.0,
                sprite: "player_rock".to_string(),
                eye_offset: [0.0, 0.1],
            },
            VariantStats {
                ground_speed: 6.0,
                air_speed: 5.0,
                jump_force: 10.0,
                water_jump_force: 8.0,
                gravity_scale: 1.0,
                water_gravity_scale: 0.5,
                sprite: "player_scissors".to_string(),
                eye_offset: [0.1, 0.15],
            },
            // Light, floats in water
            VariantStats {
                ground_speed: 5.0,
                air_speed: 4.5,
                jump_force: 8.0,
                water_jump_force: 10.0,
                gravity_scale: 0.7,
                water_gravity_scale: 0.3,
                sprite: "player_paper".to_string(),
                eye_offset: [0.0, 0.2],
            },
        )
    }
}

/// Shape-independent player body settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyConfig {
    /// Collider width in world units
    pub width: f32,
    /// Collider height in world units
    pub height: f32,
    /// Upward acceleration while floating as Paper
    pub buoyancy: f32,
    /// How far the pupil can travel from the eye center
    #[serde(default = "default_eyeball_radius")]
    pub eyeball_radius: f32,
}

fn default_eyeball_radius() -> f32 {
    0.05
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 0.9,
            height: 0.9,
            buoyancy: 12.0,
            eyeball_radius: default_eyeball_radius(),
        }
    }
}

/// Everything needed to spawn the player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerConfig {
    pub body: BodyConfig,
    pub variants: VariantTable,
}

#[derive(Deserialize)]
struct PlayerConfigFile {
    #[serde(default)]
    body: Option<BodyConfig>,
    variants: VariantsFile,
}

#[derive(Deserialize)]
struct VariantsFile {
    rock: VariantStats,
    scissors: VariantStats,
    paper: VariantStats,
}

impl PlayerConfig {
    /// Parse and validate a player config from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: PlayerConfigFile = data::parse_toml(text, origin)?;
        Self::from_file(file)
    }

    /// Load `path`, falling back to the built-in tuning when it is missing
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match data::load_toml::<PlayerConfigFile>(path)? {
            Some(file) => Self::from_file(file),
            None => {
                log::info!("{} not found, using built-in player tuning", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Load `data/player.toml`
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&data::data_root().join("player.toml"))
    }

    fn from_file(file: PlayerConfigFile) -> Result<Self, ConfigError> {
        let config = Self {
            body: file.body.unwrap_or_default(),
            variants: VariantTable::new(
                file.variants.rock,
                file.variants.scissors,
                file.variants.paper,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for variant in Variant::ALL {
            self.variants.get(variant).validate(variant)?;
        }
        if self.body.width <= 0.0 || self.body.height <= 0.0 {
            return Err(ConfigError::invalid("body", "width and height must be positive"));
        }
        ensure_non_negative("body.buoyancy", self.body.buoyancy)?;
        ensure_non_negative("body.eyeball_radius", self.body.eyeball_radius)
    }
}
