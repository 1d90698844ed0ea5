// Input manager - ties keyboard events, bindings and action maps together

use super::action::{Action, ActionMap, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Owns the key bindings and the local player's input state
pub struct InputManager {
    config: InputConfig,
    state: PlayerInput,
    action_map: ActionMap,
    enabled: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            state: PlayerInput::new(),
            action_map: ActionMap::Gameplay,
            enabled: true,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            let pressed = event.state == ElementState::Pressed;
            self.process_key(key_code, pressed, event.repeat);
        }
    }

    /// Process a raw key transition
    pub fn process_key(&mut self, key_code: KeyCode, pressed: bool, repeat: bool) {
        let Some(action) = self.config.get_action(InputSource::key(key_code)) else {
            return;
        };

        if pressed {
            // Key repeats and actions outside the active map are ignored
            if repeat || !self.enabled || !self.action_map.contains(action) {
                return;
            }
            self.state.press(action);
        } else {
            // Releases always go through so nothing stays stuck down
            self.state.release(action);
        }
    }

    /// Roll input state over to a new frame
    /// Call this once per frame after the frame's input has been consumed
    pub fn update(&mut self) {
        self.state.update();
    }

    /// Current input state
    pub fn state(&self) -> &PlayerInput {
        &self.state
    }

    /// Check if an action was pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.state.just_pressed(action)
    }

    /// Enable or disable all input; disabling drops any held actions
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("Input {}", if enabled { "enabled" } else { "disabled" });
            self.enabled = enabled;
            if !enabled {
                self.state.reset();
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch the active action map, dropping held actions from the old one
    pub fn switch_action_map(&mut self, map: ActionMap) {
        if self.action_map != map {
            log::info!("Action map switched to {:?}", map);
            self.action_map = map;
            self.state.reset();
        }
    }

    pub fn action_map(&self) -> ActionMap {
        self.action_map
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
