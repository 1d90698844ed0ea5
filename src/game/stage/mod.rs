// Stage entities, sequences and the world that ties them together

pub mod breakable;
pub mod interactable;
pub mod level;
pub mod motion;
pub mod opponent;
pub mod pause;
pub mod sequence;
pub mod wind;
pub mod world;

pub use level::LevelConfig;
pub use pause::PauseController;
pub use world::{Stage, StageSignal};
