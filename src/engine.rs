//! Engine lifecycle and per-frame scheduling
//!
//! The host owns the clock and calls `frame` once per animation tick. Each
//! frame samples input once, advances the simulation by the elapsed time in
//! reference frames, hands events to the listener and audio sink, renders,
//! and finally lets the input source retire its edge triggers.

use glam::Vec2;

use crate::audio::{AudioSink, SilentAudio};
use crate::consts::{MAX_FRAME_SCALE, REFERENCE_FRAME_MS, VIEW_HEIGHT, VIEW_WIDTH};
use crate::input::{InputSource, KeyboardInput};
use crate::level::{LevelData, get_level};
use crate::renderer::{RenderView, Renderer};
use crate::settings::Settings;
use crate::sim::{Abilities, GameEvent, GamePhase, GameState, Loadout, tick};

/// Outward notifications; every method defaults to a no-op
pub trait EngineListener {
    fn coins_changed(&mut self, _coins: u32, _gold: u32) {}
    fn health_changed(&mut self, _health: u32) {}
    fn abilities_changed(&mut self, _abilities: &Abilities) {}
    /// Exit reached, with the currency earned this session
    fn level_complete(&mut self, _level_id: u32, _coins: u32, _gold: u32) {}
    fn game_over(&mut self, _level_id: u32) {}
}

/// Elapsed wall time in reference frames, capped after a stall
pub fn frame_scale(elapsed_ms: f64) -> f32 {
    (elapsed_ms / REFERENCE_FRAME_MS).clamp(0.0, MAX_FRAME_SCALE as f64) as f32
}

pub struct Engine<I: InputSource = KeyboardInput> {
    state: Option<GameState>,
    level: Option<LevelData>,
    loadout: Loadout,
    settings: Settings,
    running: bool,
    last_time_ms: f64,
    view: Vec2,
    input: I,
    audio: Box<dyn AudioSink>,
    renderer: Option<Box<dyn Renderer>>,
    listener: Option<Box<dyn EngineListener>>,
}

impl Engine<KeyboardInput> {
    /// Engine reading keyboard/touch input, silent until an audio sink is attached
    pub fn new(settings: Settings) -> Self {
        Self::with_input(KeyboardInput::new(), settings)
    }
}

impl<I: InputSource> Engine<I> {
    pub fn with_input(input: I, settings: Settings) -> Self {
        Self {
            state: None,
            level: None,
            loadout: Loadout::default(),
            settings,
            running: false,
            last_time_ms: 0.0,
            view: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            input,
            audio: Box::new(SilentAudio),
            renderer: None,
            listener: None,
        }
    }

    pub fn set_audio(&mut self, mut audio: Box<dyn AudioSink>) {
        audio.apply_settings(&self.settings);
        self.audio = audio;
    }

    pub fn set_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        renderer.resize(self.view.x, self.view.y);
        self.renderer = Some(renderer);
    }

    pub fn set_listener(&mut self, listener: Box<dyn EngineListener>) {
        self.listener = Some(listener);
    }

    /// Ability levels and bonus health used by the next load
    pub fn set_loadout(&mut self, loadout: Loadout) {
        self.loadout = loadout;
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        if let Some(state) = self.state.as_mut() {
            state.max_particles = settings.max_particles();
            state.particles.truncate(state.max_particles);
        }
        self.settings = settings;
    }

    /// Load a campaign level (unknown ids are generated)
    pub fn load_level(&mut self, id: u32) {
        self.load(get_level(id));
    }

    /// Load any blueprint, e.g. a converted custom level
    pub fn load(&mut self, level: LevelData) {
        let mut state = GameState::load(&level, &self.loadout);
        state.set_view(self.view.x, self.view.y);
        state.max_particles = self.settings.max_particles();
        if let Some(listener) = self.listener.as_mut() {
            listener.coins_changed(0, 0);
            listener.health_changed(state.player.health);
            listener.abilities_changed(&state.player.abilities);
        }
        self.state = Some(state);
        self.level = Some(level);
    }

    /// Reload the current blueprint with the same loadout
    pub fn restart(&mut self) {
        if let Some(level) = self.level.take() {
            log::info!("Restarting level {}", level.id);
            self.load(level);
        }
    }

    /// Begin scheduling frames; a second call is a no-op
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        if self.renderer.is_none() {
            log::warn!("No renderer attached, running headless");
        }
        self.running = true;
        self.last_time_ms = now_ms;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle_pause(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.phase = match state.phase {
                GamePhase::Playing => GamePhase::Paused,
                GamePhase::Paused => GamePhase::Playing,
                other => other,
            };
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.view = Vec2::new(width.max(1.0), height.max(1.0));
        if let Some(state) = self.state.as_mut() {
            state.set_view(self.view.x, self.view.y);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(self.view.x, self.view.y);
        }
    }

    /// One animation tick at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        let dt = frame_scale(now_ms - self.last_time_ms);
        self.last_time_ms = now_ms;

        let input = self.input.snapshot();
        if input.restart {
            self.restart();
        } else if let Some(state) = self.state.as_mut() {
            tick(state, &input, dt);
            self.dispatch_events();
        }

        if let (Some(renderer), Some(state)) = (self.renderer.as_mut(), self.state.as_ref()) {
            renderer.render(&RenderView::new(state, &self.settings));
        }

        self.input.end_frame();
    }

    fn dispatch_events(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let events = state.drain_events();
        for event in events {
            if let GameEvent::Sound(cue) = event {
                self.audio.play(cue);
                continue;
            }
            let Some(listener) = self.listener.as_mut() else {
                continue;
            };
            match event {
                GameEvent::CoinsChanged { coins, gold } => listener.coins_changed(coins, gold),
                GameEvent::HealthChanged { health } => listener.health_changed(health),
                GameEvent::AbilitiesChanged => listener.abilities_changed(&state.player.abilities),
                GameEvent::LevelComplete { coins, gold } => {
                    listener.level_complete(state.level_id, coins, gold)
                }
                GameEvent::GameOver => listener.game_over(state.level_id),
                GameEvent::Sound(_) => {}
            }
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn level(&self) -> Option<&LevelData> {
        self.level.as_ref()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.state.as_ref().map(|s| s.phase)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}
