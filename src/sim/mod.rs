//! Frame-stepped simulation
//!
//! All gameplay logic lives here. Given the same blueprint, loadout and input
//! sequence, a session always plays out the same way:
//! - Level layout comes from the seeded level generator
//! - Cosmetic randomness comes from a per-session seeded stream
//! - Entities update in stored order
//! - No rendering, audio or platform dependencies (sounds are emitted as events)

pub mod abilities;
pub mod enemy;
pub mod entity;
pub mod physics;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use entity::{
    Axis, Checkpoint, Coin, CoinKind, Enemy, EnemyKind, Motion, Particle, ParticleKind, Platform,
    PlatformKind, Projectile, ProjectileSource,
};
pub use player::{Abilities, Ability, AbilityKind, AnimState, Loadout, Player};
pub use rect::Rect;
pub use state::{Camera, GameEvent, GamePhase, GameState, MAX_AMBIENT, MAX_PARTICLES};
pub use tick::{TickInput, tick};
