//! World entities: platforms, coins, enemies, projectiles, particles, checkpoints
//!
//! The same types serve as level blueprint records and as live simulation
//! state. Entities are never removed mid-frame; dead enemies and collected
//! coins stay in their lists with a flag so indices remain stable handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::TILE;

/// Phase advance per reference frame per unit of platform speed
pub const MOTION_RATE: f32 = 0.02;

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// Sinusoidal motion of a moving platform around its origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub axis: Axis,
    /// Amplitude in pixels
    pub range: f32,
    pub speed: f32,
    /// Current phase (radians); re-seeded at level load
    #[serde(default)]
    pub phase: f32,
    /// Rest position; set from the blueprint rectangle at level load
    #[serde(default)]
    pub origin: Vec2,
}

impl Motion {
    pub fn new(axis: Axis, range: f32, speed: f32) -> Self {
        Self {
            axis,
            range,
            speed,
            phase: 0.0,
            origin: Vec2::ZERO,
        }
    }

    /// Phase after advancing by `dt` reference frames
    #[inline]
    pub fn phase_after(&self, dt: f32) -> f32 {
        self.phase + self.speed * dt * MOTION_RATE
    }

    /// Top-left position of the platform at a given phase
    pub fn position_at(&self, phase: f32) -> Vec2 {
        let offset = phase.sin() * self.range;
        match self.axis {
            Axis::X => Vec2::new(self.origin.x + offset, self.origin.y),
            Axis::Y => Vec2::new(self.origin.x, self.origin.y + offset),
        }
    }
}

/// Contact bookkeeping for a crumbling platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crumble {
    /// Landing contacts accumulated so far
    pub contacts: u32,
    /// Collapsed and sinking; no longer solid
    pub fallen: bool,
}

/// Platform surface types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformKind {
    Solid,
    /// Near-frictionless ground
    Ice,
    /// Bounces the player on landing
    Trampoline,
    /// Hazard: damages on contact, never blocks movement
    Spike,
    Moving(Motion),
    /// Crumbles after sustained contact
    Falling(Crumble),
}

/// A platform entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(rect: Rect, kind: PlatformKind) -> Self {
        Self { rect, kind }
    }

    pub fn solid(rect: Rect) -> Self {
        Self::new(rect, PlatformKind::Solid)
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, PlatformKind::Spike)
    }

    pub fn is_fallen(&self) -> bool {
        matches!(self.kind, PlatformKind::Falling(Crumble { fallen: true, .. }))
    }

    /// Whether the platform stops the player (not a hazard, not collapsed)
    pub fn blocks(&self) -> bool {
        !self.is_hazard() && !self.is_fallen()
    }

    pub fn is_ice(&self) -> bool {
        matches!(self.kind, PlatformKind::Ice)
    }
}

/// Coin types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinKind {
    #[default]
    Coin,
    /// Rare currency
    Gold,
}

/// A collectible coin (position is its center)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub kind: CoinKind,
    #[serde(default)]
    pub collected: bool,
    /// Animation phase (cosmetic)
    #[serde(default)]
    pub anim: f32,
}

impl Coin {
    pub fn new(pos: Vec2, kind: CoinKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            anim: 0.0,
        }
    }

    /// Pickup box around the coin center
    pub fn hitbox(&self) -> Rect {
        Rect::around(self.pos, 10.0)
    }
}

/// Boss-only state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BossState {
    /// 0 (> 60% health), 1 (30-60%), 2 (<= 30%)
    pub phase: u8,
    /// Frames since the last attack
    pub attack_timer: f32,
    pub attack_pattern: u8,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyKind {
    /// Walks back and forth, affected by gravity
    Patrol,
    /// Follows a closed path around its origin, ignores platforms
    Flying {
        #[serde(default)]
        path_t: f32,
    },
    Boss(BossState),
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub kind: EnemyKind,
    pub vel: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub facing: f32,
    pub patrol_range: f32,
    /// Anchor for bounded motion; reset from `rect` at level load
    pub origin: Vec2,
    #[serde(default = "default_alive")]
    pub alive: bool,
    /// Hit flash frames remaining
    #[serde(default)]
    pub hit_timer: f32,
}

fn default_alive() -> bool {
    true
}

impl Enemy {
    fn with(rect: Rect, kind: EnemyKind, vel: Vec2, health: u32, patrol_range: f32) -> Self {
        Self {
            rect,
            kind,
            vel,
            health,
            max_health: health,
            facing: 1.0,
            patrol_range,
            origin: rect.pos(),
            alive: true,
            hit_timer: 0.0,
        }
    }

    /// Ground walker, one hit to defeat
    pub fn patrol(pos: Vec2, range: f32) -> Self {
        Self::with(
            Rect::new(pos.x, pos.y, 32.0, 32.0),
            EnemyKind::Patrol,
            Vec2::new(1.5, 0.0),
            1,
            range,
        )
    }

    pub fn flying(pos: Vec2, range: f32) -> Self {
        Self::with(
            Rect::new(pos.x, pos.y, 30.0, 30.0),
            EnemyKind::Flying { path_t: 0.0 },
            Vec2::ZERO,
            2,
            range,
        )
    }

    pub fn boss(pos: Vec2, health: u32) -> Self {
        Self::with(
            Rect::new(pos.x, pos.y, 64.0, 56.0),
            EnemyKind::Boss(BossState::default()),
            Vec2::new(1.0, 0.0),
            health,
            5.0 * TILE,
        )
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Enemy,
}

/// A projectile in flight (position is its center)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
    /// Frames until despawn
    pub lifetime: f32,
    pub source: ProjectileSource,
    /// Ability level that cast it (0 for enemy shots)
    pub level: u8,
    /// Enemies it may still pass through; `None` is unlimited
    pub pierce_left: Option<u32>,
    /// Indices of enemies already struck (each enemy is hit at most once)
    #[serde(default)]
    pub struck: Vec<usize>,
}

impl Projectile {
    pub fn hitbox(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// Max-level player projectiles grow and pass through walls
    pub fn is_unbounded(&self) -> bool {
        self.source == ProjectileSource::Player && self.pierce_left.is_none()
    }
}

/// Particle categories (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Sparkle,
    Hit,
    Burst,
    Trail,
    Dust,
    Ambient,
}

/// A cosmetic particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Remaining life as a fraction (for fading)
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A checkpoint (x is its center, y the ground it stands on)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
    #[serde(default)]
    pub activated: bool,
}

impl Checkpoint {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            activated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_position() {
        let mut m = Motion::new(Axis::X, 100.0, 1.0);
        m.origin = Vec2::new(200.0, 50.0);
        m.phase = std::f32::consts::FRAC_PI_2;
        let p = m.position_at(m.phase);
        assert!((p.x - 300.0).abs() < 1e-3);
        assert_eq!(p.y, 50.0);
        assert!((m.phase_after(10.0) - (m.phase + 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_platform_blocking() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(Platform::solid(rect).blocks());
        assert!(!Platform::new(rect, PlatformKind::Spike).blocks());
        let fallen = Platform::new(
            rect,
            PlatformKind::Falling(Crumble {
                contacts: 30,
                fallen: true,
            }),
        );
        assert!(fallen.is_fallen());
        assert!(!fallen.blocks());
    }

    #[test]
    fn test_enemy_constructors() {
        let boss = Enemy::boss(Vec2::new(10.0, 20.0), 15);
        assert!(boss.is_boss());
        assert_eq!(boss.max_health, 15);
        assert_eq!(boss.origin, Vec2::new(10.0, 20.0));
        let patrol = Enemy::patrol(Vec2::ZERO, 120.0);
        assert_eq!(patrol.health, 1);
        assert!(patrol.alive);
    }

    #[test]
    fn test_platform_json_tagging() {
        let p = Platform::new(
            Rect::new(0.0, 0.0, 40.0, 40.0),
            PlatformKind::Moving(Motion::new(Axis::Y, 80.0, 1.2)),
        );
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"type\":\"moving\""));
        let back: Platform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
