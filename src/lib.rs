//! Mystic Worlds - a side-scrolling platformer engine
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, abilities, enemies, game state)
//! - `level`: Handcrafted and seeded procedural level blueprints
//! - `engine`: Lifecycle and per-frame scheduling around the simulation
//! - `input`: Keyboard/touch state turned into per-frame snapshots
//! - `audio`: Named sound cues fired by the simulation
//! - `renderer`: Read-only view of the world and CPU tessellation
//! - `persistence`: Save data with corruption fallback
//! - `settings`: Host preferences

pub mod audio;
pub mod engine;
pub mod input;
pub mod level;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EngineListener};
pub use level::{LevelData, WorldId, get_level};
pub use settings::Settings;

/// Game configuration constants
///
/// All speeds are in pixels per reference frame (60 Hz) and all timers in
/// reference frames, matching the `dt` scale passed to `sim::tick`.
pub mod consts {
    /// Grid size used by level blueprints
    pub const TILE: f32 = 40.0;

    /// Player hitbox
    pub const PLAYER_W: f32 = 28.0;
    pub const PLAYER_H: f32 = 40.0;

    pub const GRAVITY: f32 = 0.55;
    pub const MAX_FALL: f32 = 14.0;
    pub const RUN_SPEED: f32 = 4.5;
    pub const SPRINT_SPEED: f32 = 7.5;
    pub const FRICTION_GROUND: f32 = 0.82;
    pub const FRICTION_AIR: f32 = 0.92;
    pub const ICE_FRICTION: f32 = 0.97;

    pub const JUMP_VEL: f32 = -11.5;
    pub const DOUBLE_JUMP_VEL: f32 = -10.0;
    pub const WALL_SLIDE_SPEED: f32 = 2.5;
    pub const WALL_JUMP_VEL_X: f32 = 7.0;
    pub const WALL_JUMP_VEL_Y: f32 = -11.0;
    pub const TRAMPOLINE_VEL: f32 = -16.0;
    /// Stomp bounce as a fraction of a normal jump
    pub const STOMP_BOUNCE: f32 = 0.7;

    /// Largest per-substep displacement (prevents tunneling through thin platforms)
    pub const MAX_SUBSTEP: f32 = 6.0;
    /// Width of the wall probe rectangles on each side of the player
    pub const WALL_PROBE: f32 = 4.0;
    /// Distance below the level bottom that counts as falling out
    pub const FALL_OUT_MARGIN: f32 = 200.0;
    /// Fallen platforms are dropped once this far below the level bottom
    pub const FALLEN_CULL_MARGIN: f32 = 500.0;
    /// Landing contacts before a crumbling platform collapses
    pub const CRUMBLE_CONTACTS: u32 = 25;
    pub const CRUMBLE_FALL_SPEED: f32 = 4.0;

    pub const BASE_HEALTH: u32 = 3;
    pub const DAMAGE_INVULNERABILITY: f32 = 90.0;
    pub const RESPAWN_INVULNERABILITY: f32 = 120.0;

    /// Real-time duration of one reference frame
    pub const REFERENCE_FRAME_MS: f64 = 16.667;
    /// Cap on the frame scale after a stall
    pub const MAX_FRAME_SCALE: f32 = 3.0;

    /// Default viewport size until the host reports one
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
}

/// Entity colors (0xRRGGBB) shared by particles and the renderer
pub mod palette {
    pub const GOLD: u32 = 0xFFD700;
    pub const GOLD_DARK: u32 = 0xB8860B;
    pub const COIN_GOLD: u32 = 0xFF8C00;
    pub const SAPPHIRE: u32 = 0x3498DB;
    pub const RUBY: u32 = 0xE74C3C;
    pub const WHITE: u32 = 0xFFFFFF;
    pub const CHECKPOINT: u32 = 0x3498DB;
    pub const CHECKPOINT_ACTIVE: u32 = 0x2ECC71;
    pub const PROJECTILE: u32 = 0x4FC3F7;
    pub const BURST: u32 = 0xFF6B6B;
    pub const DASH: u32 = 0xE0E0E0;
    pub const TRAMPOLINE: u32 = 0xFF6B9D;
    pub const SPIKE: u32 = 0xE74C3C;
    pub const ICE: u32 = 0xA8D8EA;
    pub const ENEMY: u32 = 0xE74C3C;
    pub const ENEMY_FLYING: u32 = 0x9B59B6;
    pub const BOSS: u32 = 0xC0392B;
    pub const PLAYER: u32 = 0x4ECDC4;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp with the lower bound winning when `min > max`
///
/// `f32::clamp` panics on inverted bounds; level geometry can produce them for
/// levels narrower than the viewport.
#[inline]
pub fn clamp_lenient(v: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(4.0, 4.0, 0.3), 4.0);
    }

    #[test]
    fn test_clamp_lenient_inverted_bounds() {
        assert_eq!(clamp_lenient(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_lenient(-1.0, 0.0, 10.0), 0.0);
        // Inverted: lower bound wins
        assert_eq!(clamp_lenient(3.0, 10.0, 0.0), 10.0);
    }
}
