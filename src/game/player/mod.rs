// The shape-shifting player

pub mod character;
pub mod immersion;
pub mod movement;
pub mod pupil;
pub mod state;
pub mod stats;
pub mod variant;

pub use character::{Character, ControlInput};
pub use immersion::{ImmersionChange, ImmersionCounter};
pub use stats::PlayerConfig;
pub use variant::{Outcome, Variant};
