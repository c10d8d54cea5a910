//! Fixed timestep simulation tick and the session facade
//!
//! [`tick`] advances one 60 Hz step. [`Simulation`] owns the config and state
//! and is the only thing the host talks to: input handlers call `jump`,
//! `start`, `restart` and `pause`, the frame loop drives `tick` through the
//! scheduler, and the renderer reads `state`.

use super::collision::{CollisionResult, check_collisions};
use super::events::{GameEvent, GameHooks, SessionOutcome, dispatch};
use super::physics;
use super::progression::{ProgressOutcome, advance_progress};
use super::screen::{Screen, ScreenAction};
use super::spawner::maybe_spawn_obstacle;
use super::state::GameState;
use crate::config::GameConfig;
use crate::settings::Settings;

/// Seed used when neither the config nor the host supplies one
pub const DEFAULT_SEED: u64 = 0x5EED_2024;

/// Advance the game state by one fixed timestep.
///
/// Order: character, obstacles, spawn, collision, progress. Does nothing
/// outside the `Playing` screen.
pub fn tick(state: &mut GameState, config: &GameConfig) {
    if !state.screen.is_simulating() {
        return;
    }

    state.time_ticks += 1;
    let now = state.now_ms();

    physics::update_character(&mut state.character, &config.character, 1.0);
    physics::update_obstacles(&mut state.obstacles, &config.field, 1.0);

    let forced_before = state.stats.forced_spawns;
    if let Some(obstacle) = maybe_spawn_obstacle(state, config, now) {
        state.events.push(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            kind: obstacle.kind,
            forced: state.stats.forced_spawns > forced_before,
        });
        state.obstacles.push(obstacle);
    }

    let hitbox = config.character_box(&state.character);
    if let CollisionResult::Hit(obstacle) =
        check_collisions(hitbox, &state.obstacles, config.collision.hitbox_margin)
    {
        state.events.push(GameEvent::Collision {
            obstacle_id: obstacle.id,
            kind: obstacle.kind,
        });
        state.end_session(SessionOutcome::Collided);
        return;
    }

    match advance_progress(state, config, config.progress.per_tick) {
        ProgressOutcome::Continue => {}
        ProgressOutcome::ScenarioAdvanced { index } => {
            let name = config.scenario(index).map_or("?", |s| s.name.as_str());
            log::info!(
                "Scenario {} ({}) - speed {:.1}, spawn every {}ms",
                index + 1,
                name,
                state.difficulty.obstacle_speed,
                state.difficulty.spawn_interval_ms
            );
            state.events.push(GameEvent::ScenarioAdvanced { index });
        }
        ProgressOutcome::Victory { grade } => {
            state.events.push(GameEvent::Victory { grade });
            state.end_session(SessionOutcome::Victory(grade));
        }
    }
}

/// HUD values for the on-page indicators
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub scenario_label: String,
    pub lives: u8,
    /// Progress floored to a whole percent
    pub progress_percent: u32,
}

/// Config plus live state, with guarded entry points for every input
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    state: GameState,
    /// Sole owner of the player's preferences; the host reads them from here
    settings: Settings,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let state = GameState::new(&config, seed);
        Self {
            config,
            state,
            settings: Settings::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    /// Flip the sound toggle, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.toggle_sound()
    }

    /// Apply `action`, logging and ignoring it when the current screen forbids it
    fn apply(&mut self, action: ScreenAction) -> bool {
        match self.state.transition(action) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("{}", e);
                false
            }
        }
    }

    /// All assets settled; leave the loading screen
    pub fn assets_ready(&mut self) -> bool {
        self.apply(ScreenAction::AssetsReady)
    }

    /// Start the first session from the start screen
    pub fn start(&mut self) -> bool {
        if !self.apply(ScreenAction::Start) {
            return false;
        }
        self.state.begin_session(&self.config);
        true
    }

    /// Start a fresh session from a terminal screen
    pub fn restart(&mut self) -> bool {
        if !self.apply(ScreenAction::Restart) {
            return false;
        }
        self.state.begin_session(&self.config);
        true
    }

    pub fn pause(&mut self) -> bool {
        self.apply(ScreenAction::Pause)
    }

    pub fn resume(&mut self) -> bool {
        self.apply(ScreenAction::Resume)
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.screen {
            Screen::Playing => self.pause(),
            Screen::Paused => self.resume(),
            _ => false,
        }
    }

    /// Jump input. No-op unless playing and the jump policy allows it.
    pub fn jump(&mut self) -> bool {
        if !self.state.screen.is_simulating() {
            return false;
        }
        let Some(outcome) = physics::jump(&mut self.state.character, &self.config.character) else {
            return false;
        };
        let now = self.state.now_ms();
        self.state.idle.record_jump(now);
        self.state.stats.jumps += 1;
        self.state.events.push(GameEvent::Jump {
            airborne: outcome.airborne,
        });
        log::debug!("Jump (airborne: {})", outcome.airborne);
        true
    }

    /// Advance one fixed step
    pub fn tick(&mut self) {
        tick(&mut self.state, &self.config);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Drain events into `hooks`
    pub fn dispatch_events<H: GameHooks + ?Sized>(&mut self, hooks: &mut H) {
        let events = self.drain_events();
        dispatch(&events, hooks);
    }

    pub fn hud(&self) -> Hud {
        let index = self.state.scenario_index;
        let scenario_label = match self.config.scenario(index) {
            Some(s) => format!("Scenario {}: {}", index + 1, s.name),
            None => "Treasure found!".to_string(),
        };
        Hud {
            scenario_label,
            lives: self.state.lives,
            progress_percent: self.state.progress.floor() as u32,
        }
    }

    /// Final message for the end screen, once the session is over
    pub fn final_message(&self) -> Option<&'static str> {
        self.state.outcome.map(|o| o.message())
    }
}
