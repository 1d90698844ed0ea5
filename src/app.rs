// Application state: owns the stage and the services around it

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::event::KeyEvent;

use crate::engine::game_loop::GameLoop;
use crate::engine::input::{Action, ActionMap, InputManager};
use crate::game::data;
use crate::game::player::{ControlInput, PlayerConfig};
use crate::game::scene::SceneTransition;
use crate::game::settings::Settings;
use crate::game::stage::{LevelConfig, PauseController, Stage, StageSignal};

/// Scene loaded at startup
pub const START_SCENE: &str = "level";
/// Seconds each half of a scene fade takes
const FADE_DURATION: f32 = 1.0;
/// Pause before the fade, standing in for the transition sound
const TRANSITION_CUE: f32 = 0.3;

/// Which overlay is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
    Result,
}

pub struct App {
    player_config: PlayerConfig,
    level: LevelConfig,
    stage: Stage,
    game_loop: GameLoop,
    input: InputManager,
    pause: PauseController,
    transition: SceneTransition,
    settings: Settings,
    /// Where settings are written back; `None` keeps them in memory only
    settings_path: Option<PathBuf>,
    /// Fullscreen flag the window has not picked up yet
    fullscreen_change: Option<bool>,
    screen: Screen,
    /// Edge-triggered input waiting for the next physics tick
    pending: ControlInput,
}

impl App {
    pub fn new(player_config: PlayerConfig, level: LevelConfig, settings: Settings) -> Self {
        let stage = Stage::new(&player_config, &level);
        Self {
            player_config,
            level,
            stage,
            game_loop: GameLoop::new(),
            input: InputManager::new(),
            pause: PauseController::new(),
            transition: SceneTransition::new(FADE_DURATION),
            settings,
            settings_path: None,
            fullscreen_change: None,
            screen: Screen::Playing,
            pending: ControlInput::default(),
        }
    }

    /// Load data files and settings, then build the first scene
    pub fn load() -> Result<Self> {
        let player_config =
            PlayerConfig::load_default().context("Failed to load player tuning")?;
        let level = LevelConfig::load_scene(START_SCENE)
            .with_context(|| format!("Failed to load scene '{}'", START_SCENE))?;
        let settings_path = Self::settings_path();
        let settings = Settings::load(&settings_path).context("Failed to load settings")?;

        log::info!(
            "Settings: volume {:.0} dB, fullscreen {}, quality {}",
            settings.master_volume_db(),
            settings.fullscreen,
            settings.quality_name()
        );
        Ok(Self::new(player_config, level, settings).with_settings_path(settings_path))
    }

    /// Persist settings changes to `path`
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn settings_path() -> PathBuf {
        data::data_root().join("settings.toml")
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// New fullscreen state for the window, if it changed since the last call
    pub fn take_fullscreen_change(&mut self) -> Option<bool> {
        self.fullscreen_change.take()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        self.input.process_keyboard_event(event);
    }

    /// Run one frame from the wall clock
    pub fn frame(&mut self) {
        let updates = self.game_loop.begin_frame();
        self.run_frame(updates);
    }

    /// Run one frame of a given length
    pub fn advance(&mut self, frame_time: Duration) {
        let updates = self.game_loop.advance(frame_time);
        self.run_frame(updates);
    }

    fn run_frame(&mut self, updates: u32) {
        self.handle_menu_input();
        self.collect_control_input();

        let dt = self.game_loop.fixed_timestep();
        for _ in 0..updates {
            self.stage.fixed_update(self.pending, dt);
            self.pending.jump = false;
            self.pending.change_shape = false;
        }

        let real_dt = self.game_loop.unscaled_delta_time();
        self.stage.frame_update(real_dt);
        for signal in self.stage.drain_signals() {
            self.apply_signal(signal);
        }

        if let Some(scene) = self
            .transition
            .tick(real_dt, &mut self.pause, &mut self.game_loop)
        {
            self.activate_scene(&scene);
        }

        self.input.update();
    }

    fn handle_menu_input(&mut self) {
        if self.input.just_pressed(Action::ToggleFullscreen) {
            self.toggle_fullscreen();
        }

        if self.input.just_pressed(Action::Pause) {
            if let Some(paused) = self.pause.toggle(&mut self.game_loop) {
                self.input.switch_action_map(if paused {
                    ActionMap::Ui
                } else {
                    ActionMap::Gameplay
                });
            }
        }

        if self.input.just_pressed(Action::Confirm) {
            let scene = match self.screen {
                Screen::GameOver => self.stage.name().to_string(),
                Screen::Result => self.stage.next_scene().to_string(),
                Screen::Playing => return,
            };
            self.transition.request(&scene, TRANSITION_CUE);
        }
    }

    fn toggle_fullscreen(&mut self) {
        let fullscreen = !self.settings.fullscreen;
        self.settings.set_fullscreen(fullscreen);
        self.fullscreen_change = Some(fullscreen);
        log::info!("Fullscreen {}", if fullscreen { "on" } else { "off" });

        if let Some(path) = &self.settings_path {
            if let Err(err) = self.settings.save(path) {
                log::error!("Failed to save settings to {}: {}", path.display(), err);
            }
        }
    }

    /// Movement is continuous; presses are held until a tick consumes them
    fn collect_control_input(&mut self) {
        let state = self.input.state();
        self.pending.move_axis = state.move_axis();
        self.pending.jump |= state.just_pressed(Action::Jump);
        self.pending.change_shape |= state.just_pressed(Action::ChangeShape);
    }

    fn apply_signal(&mut self, signal: StageSignal) {
        match signal {
            StageSignal::DisableInput => {
                self.input.set_enabled(false);
                self.pending = ControlInput::default();
            }
            StageSignal::GameOver => self.show_end_screen(Screen::GameOver),
            StageSignal::Result => self.show_end_screen(Screen::Result),
        }
    }

    fn show_end_screen(&mut self, screen: Screen) {
        log::info!("Showing {:?} screen", screen);
        self.pause.freeze(&mut self.game_loop);
        self.input.set_enabled(true);
        self.input.switch_action_map(ActionMap::Ui);
        self.screen = screen;
    }

    fn activate_scene(&mut self, scene: &str) {
        if scene != self.level.name {
            match LevelConfig::load_scene(scene) {
                Ok(level) => self.level = level,
                Err(err) => log::error!("Scene '{}' failed to load, restarting: {}", scene, err),
            }
        }
        self.stage = Stage::new(&self.player_config, &self.level);
        self.screen = Screen::Playing;
        self.pending = ControlInput::default();
        self.input.set_enabled(true);
        self.input.switch_action_map(ActionMap::Gameplay);
    }
}
