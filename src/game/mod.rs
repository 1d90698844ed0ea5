// Game logic: the Janken player, stages, scenes and settings

pub mod data;
pub mod player;
pub mod scene;
pub mod settings;
pub mod stage;
