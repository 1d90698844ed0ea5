// Input handling system
//
// Keyboard input for the single local player, with edge detection, key
// remapping and switchable action maps.
//
// ## Architecture
//
// - `action`: Defines game actions, action maps and default key bindings
// - `player`: Pressed / just-pressed / just-released tracking
// - `config`: Input configuration and remapping system
// - `manager`: Ties winit keyboard events, bindings and the active map together
//
// ## Usage Example
//
// ```rust
// use engine::input::{InputManager, Action};
//
// let mut input = InputManager::new();
//
// // In your event loop, process keyboard events
// input.process_keyboard_event(&key_event);
//
// // Read edge-triggered actions before the frame ends
// if input.state().just_pressed(Action::ChangeShape) {
//     // Cycle the player's shape once per press
// }
//
// // At the end of each frame, roll the input state over
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

// Re-export commonly used types
pub use action::{Action, ActionMap};
pub use manager::InputManager;
