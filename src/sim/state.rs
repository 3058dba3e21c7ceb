//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`. It is built from a
//! `LevelData` blueprint at load and never touches the blueprint again.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{
    BossState, Checkpoint, Coin, Crumble, Enemy, EnemyKind, Particle, ParticleKind, Platform,
    PlatformKind, Projectile,
};
use super::player::{AnimState, Loadout, Player};
use super::rect::Rect;
use crate::audio::AudioCue;
use crate::consts::*;
use crate::level::{LevelData, WorldId};
use crate::palette;

/// Default cap on live particles
pub const MAX_PARTICLES: usize = 512;
/// Cap on ambient particles
pub const MAX_AMBIENT: usize = 60;

/// Current phase of a level session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Exit reached; terminal for this session
    LevelComplete,
    /// Died with no checkpoint; terminal for this session
    GameOver,
}

/// Notifications raised during a frame, drained by the engine afterwards
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CoinsChanged { coins: u32, gold: u32 },
    HealthChanged { health: u32 },
    /// An ability was cast or its state changed
    AbilitiesChanged,
    LevelComplete { coins: u32, gold: u32 },
    GameOver,
    Sound(AudioCue),
}

/// Follow camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Top-left of the view in world space
    pub pos: Vec2,
    pub target: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    /// Screen shake magnitude (pixels), decays every frame
    pub shake: f32,
    /// Viewport size in pixels
    pub view: Vec2,
}

impl Camera {
    fn new(view: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
            shake: 0.0,
            view,
        }
    }

    /// Raise shake to at least `amount` (a bigger shake is never cut short)
    pub fn shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }
}

/// Complete live state of one level session
#[derive(Debug, Clone)]
pub struct GameState {
    pub level_id: u32,
    pub level_name: String,
    pub world: WorldId,
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub ambient: Vec<Particle>,
    pub checkpoints: Vec<Checkpoint>,
    pub exit: Rect,
    pub phase: GamePhase,
    pub coins_collected: u32,
    pub gold_collected: u32,
    /// Reference frames elapsed in this session
    pub time: f32,
    /// Where the player respawns after dying, once a checkpoint is reached
    pub respawn: Option<Vec2>,
    pub camera: Camera,
    pub ambient_timer: f32,
    pub max_particles: usize,
    /// Cosmetic randomness only; level layout never reads it
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh session from a blueprint
    pub fn load(level: &LevelData, loadout: &Loadout) -> Self {
        let mut rng = Pcg32::seed_from_u64(level.id as u64);

        let platforms = level
            .platforms
            .iter()
            .map(|p| {
                let mut p = p.clone();
                match &mut p.kind {
                    PlatformKind::Moving(motion) => {
                        motion.origin = p.rect.pos();
                        motion.phase = rng.random::<f32>() * std::f32::consts::TAU;
                        let at = motion.position_at(motion.phase);
                        p.rect.x = at.x;
                        p.rect.y = at.y;
                    }
                    PlatformKind::Falling(crumble) => *crumble = Crumble::default(),
                    _ => {}
                }
                p
            })
            .collect();

        let coins = level
            .coins
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.collected = false;
                c.anim = rng.random::<f32>() * 100.0;
                c
            })
            .collect();

        let enemies = level
            .enemies
            .iter()
            .map(|e| {
                let mut e = e.clone();
                e.origin = e.rect.pos();
                e.alive = true;
                e.health = e.max_health;
                e.hit_timer = 0.0;
                e.kind = match e.kind {
                    EnemyKind::Patrol => EnemyKind::Patrol,
                    EnemyKind::Flying { .. } => EnemyKind::Flying { path_t: 0.0 },
                    EnemyKind::Boss(_) => EnemyKind::Boss(BossState::default()),
                };
                e
            })
            .collect();

        let checkpoints = level
            .checkpoints
            .iter()
            .map(|c| Checkpoint::new(c.pos))
            .collect();

        let view = Vec2::new(VIEW_WIDTH, VIEW_HEIGHT);
        let mut camera = Camera::new(view);
        camera.pos = level.player_start - view / 2.0;
        camera.target = camera.pos;

        log::info!(
            "Loaded level {} '{}' ({}), {}x{}, {} platforms, {} enemies",
            level.id,
            level.name,
            level.world.as_str(),
            level.width,
            level.height,
            level.platforms.len(),
            level.enemies.len()
        );
        let malformed = level.platforms.iter().filter(|p| !p.rect.is_valid()).count()
            + level.enemies.iter().filter(|e| !e.rect.is_valid()).count();
        if malformed > 0 {
            log::warn!(
                "Level {} has {} malformed entities; they will be skipped",
                level.id,
                malformed
            );
        }

        Self {
            level_id: level.id,
            level_name: level.name.clone(),
            world: level.world,
            width: level.width,
            height: level.height,
            player: Player::new(level.player_start, loadout),
            platforms,
            coins,
            enemies,
            projectiles: Vec::new(),
            particles: Vec::new(),
            ambient: Vec::new(),
            checkpoints,
            exit: level.exit,
            phase: GamePhase::Playing,
            coins_collected: 0,
            gold_collected: 0,
            time: 0.0,
            respawn: None,
            camera,
            ambient_timer: 0.0,
            max_particles: MAX_PARTICLES,
            rng,
            events: Vec::new(),
        }
    }

    /// Resize the viewport used by the camera and ambient spawns
    pub fn set_view(&mut self, width: f32, height: f32) {
        self.camera.view = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: AudioCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Uniform roll in [0, 1) from the cosmetic stream
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform roll in [-0.5, 0.5) scaled by `spread`
    pub fn jitter(&mut self, spread: f32) -> f32 {
        (self.roll() - 0.5) * spread
    }

    /// Whether a boss is still standing (blocks the exit)
    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.alive && e.is_boss())
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    // === Particles ===

    pub fn spawn_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    /// Radial burst of `count` particles with random velocity in a square of `speed`
    pub fn spawn_burst(
        &mut self,
        at: Vec2,
        count: usize,
        speed: f32,
        life: f32,
        color: u32,
        size: (f32, f32),
        kind: ParticleKind,
    ) {
        for _ in 0..count {
            let vel = Vec2::new(self.jitter(speed), self.jitter(speed));
            let size = size.0 + self.roll() * size.1;
            self.spawn_particle(Particle {
                pos: at,
                vel,
                life,
                max_life: life,
                color,
                size,
                kind,
            });
        }
    }

    pub fn spawn_dust(&mut self, at: Vec2, count: usize) {
        let color = self.world.theme().platform_color;
        for _ in 0..count {
            let vel = Vec2::new(self.jitter(4.0), -self.roll() * 3.0);
            let size = 3.0 + self.roll() * 3.0;
            self.spawn_particle(Particle {
                pos: at,
                vel,
                life: 15.0,
                max_life: 15.0,
                color,
                size,
                kind: ParticleKind::Dust,
            });
        }
    }

    /// Evenly spaced ring (double jump)
    pub fn spawn_ring(&mut self, at: Vec2) {
        for i in 0..12 {
            let a = (i as f32 / 12.0) * std::f32::consts::TAU;
            self.spawn_particle(Particle {
                pos: at,
                vel: Vec2::new(a.cos(), a.sin()) * 4.0,
                life: 12.0,
                max_life: 12.0,
                color: palette::SAPPHIRE,
                size: 3.0,
                kind: ParticleKind::Trail,
            });
        }
    }

    pub fn spawn_hit_particles(&mut self, at: Vec2) {
        self.spawn_burst(at, 8, 6.0, 15.0, palette::WHITE, (2.0, 4.0), ParticleKind::Hit);
    }

    // === Health ===

    /// Apply damage unless the player is immune
    ///
    /// Immune while the invulnerability timer runs, while the burst ability is
    /// active, and once the session has ended. Returns whether health changed.
    pub fn damage_player(&mut self, amount: u32) -> bool {
        if self.player.invincible_timer > 0.0 || self.player.is_bursting() {
            return false;
        }
        self.apply_damage(amount)
    }

    /// Falling out of the level: lethal regardless of immunity
    pub fn kill_player(&mut self) {
        self.apply_damage(self.player.max_health);
    }

    fn apply_damage(&mut self, amount: u32) -> bool {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::LevelComplete) || amount == 0 {
            return false;
        }
        let p = &mut self.player;
        p.health = p.health.saturating_sub(amount);
        p.invincible_timer = DAMAGE_INVULNERABILITY;
        p.anim = AnimState::Damage;
        p.anim_timer = 0.0;
        let health = p.health;
        let center = p.center();

        self.camera.shake(12.0);
        self.sound(AudioCue::Hit);
        self.emit(GameEvent::HealthChanged { health });
        self.spawn_hit_particles(center);

        if health == 0 {
            self.handle_death();
        }
        true
    }

    fn handle_death(&mut self) {
        match self.respawn {
            Some(at) => {
                let p = &mut self.player;
                p.pos = at;
                p.vel = Vec2::ZERO;
                p.health = p.max_health;
                p.invincible_timer = RESPAWN_INVULNERABILITY;
                let health = p.health;
                log::info!("Respawned at checkpoint ({:.0}, {:.0})", at.x, at.y);
                self.emit(GameEvent::HealthChanged { health });
            }
            None => {
                log::info!("Game over on level {}", self.level_id);
                self.phase = GamePhase::GameOver;
                self.sound(AudioCue::GameOver);
                self.emit(GameEvent::GameOver);
            }
        }
    }

    /// Drop collapsed platforms that have sunk out of the level
    ///
    /// Only called between update passes, so indices held within a pass stay
    /// valid.
    pub fn compact_platforms(&mut self) {
        let limit = self.height + FALLEN_CULL_MARGIN;
        self.platforms.retain(|p| !p.is_fallen() || p.rect.y < limit);
    }
}
