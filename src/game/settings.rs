// Player-facing settings persisted between runs

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::math::linear_to_decibels;

/// Names of the quality presets, indexed by `Settings::quality`
pub const QUALITY_LEVELS: [&str; 6] = ["Very Low", "Low", "Medium", "High", "Very High", "Ultra"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("settings could not be written: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Linear volume, 0..=1
    pub master_volume: f32,
    pub fullscreen: bool,
    /// Index into `QUALITY_LEVELS`
    pub quality: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            fullscreen: true,
            quality: 3,
        }
    }
}

impl Settings {
    /// Read settings from `path`; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let mut settings: Self = toml::from_str(&text)?;
        // Hand-edited files may hold out of range values
        settings.set_master_volume(settings.master_volume);
        settings.set_quality(settings.quality);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Master volume as mixer attenuation
    pub fn master_volume_db(&self) -> f32 {
        linear_to_decibels(self.master_volume)
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn set_quality(&mut self, index: usize) {
        self.quality = index.min(QUALITY_LEVELS.len() - 1);
    }

    pub fn quality_name(&self) -> &'static str {
        QUALITY_LEVELS[self.quality.min(QUALITY_LEVELS.len() - 1)]
    }
}
