//! Player state
//!
//! The player is a core record (position, velocity, contact flags, health)
//! plus three independent ability slots of uniform shape. Recreated in full
//! on every level load.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Animation states derived each frame from movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
    WallSlide,
    Dash,
    Damage,
}

/// The three player abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Instant cast: fires an energy orb
    Projectile,
    /// Timed speed/jump boost with damage immunity
    Burst,
    /// Timed intangible dash in the facing direction
    Dash,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 3] =
        [AbilityKind::Projectile, AbilityKind::Burst, AbilityKind::Dash];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AbilityKind::Projectile => 0,
            AbilityKind::Burst => 1,
            AbilityKind::Dash => 2,
        }
    }

    /// Persisted key for save data
    pub fn key(self) -> &'static str {
        match self {
            AbilityKind::Projectile => "projectile",
            AbilityKind::Burst => "burst",
            AbilityKind::Dash => "dash",
        }
    }
}

/// One ability slot: locked at level 0, otherwise cycles
/// available -> active -> cooldown -> available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    /// Purchased level (0 = not owned)
    pub level: u8,
    /// Frames until usable again
    pub cooldown: f32,
    pub active: bool,
    /// Frames of the active window remaining
    pub timer: f32,
}

impl Ability {
    pub fn new(kind: AbilityKind, level: u8) -> Self {
        Self {
            kind,
            level,
            cooldown: 0.0,
            active: false,
            timer: 0.0,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.level > 0
    }

    /// All activation preconditions hold
    pub fn is_ready(&self) -> bool {
        self.is_owned() && !self.active && self.cooldown <= 0.0
    }
}

/// The ordered set of ability slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abilities {
    slots: [Ability; 3],
}

impl Abilities {
    pub fn new(levels: [u8; 3]) -> Self {
        Self {
            slots: AbilityKind::ALL.map(|kind| Ability::new(kind, levels[kind.index()])),
        }
    }

    pub fn get(&self, kind: AbilityKind) -> &Ability {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: AbilityKind) -> &mut Ability {
        &mut self.slots[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ability> {
        self.slots.iter_mut()
    }

    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.get(kind).active
    }
}

impl Default for Abilities {
    fn default() -> Self {
        Self::new([0; 3])
    }
}

/// What the host supplies at level load (sourced from save data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    /// Indexed by `AbilityKind::index`
    pub ability_levels: [u8; 3],
    /// Added to `BASE_HEALTH`
    pub bonus_health: u32,
    pub skin: String,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            ability_levels: [0; 3],
            bonus_health: 0,
            skin: "default".to_string(),
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    /// -1 or 1
    pub facing: f32,
    pub grounded: bool,
    pub wall_sliding: bool,
    /// Side of the wall being slid on (-1 left, 1 right, 0 none)
    pub wall_dir: f32,
    pub can_double_jump: bool,
    pub health: u32,
    pub max_health: u32,
    /// Frames of damage immunity remaining
    pub invincible_timer: f32,
    pub anim: AnimState,
    pub anim_frame: u8,
    pub anim_timer: f32,
    pub abilities: Abilities,
    /// Locked-in direction for the dash ability
    pub dash_dir: f32,
    pub skin: String,
}

impl Player {
    pub fn new(start: Vec2, loadout: &Loadout) -> Self {
        let max_health = BASE_HEALTH + loadout.bonus_health;
        Self {
            pos: start,
            vel: Vec2::ZERO,
            facing: 1.0,
            grounded: false,
            wall_sliding: false,
            wall_dir: 0.0,
            can_double_jump: true,
            health: max_health,
            max_health,
            invincible_timer: 0.0,
            anim: AnimState::Idle,
            anim_frame: 0,
            anim_timer: 0.0,
            abilities: Abilities::new(loadout.ability_levels),
            dash_dir: 1.0,
            skin: loadout.skin.clone(),
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_W, PLAYER_H)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_W / 2.0, PLAYER_H / 2.0)
    }

    pub fn is_bursting(&self) -> bool {
        self.abilities.is_active(AbilityKind::Burst)
    }

    pub fn is_dashing(&self) -> bool {
        self.abilities.is_active(AbilityKind::Dash)
    }

    /// Enemies and hazards ignore the player entirely
    pub fn is_untouchable(&self) -> bool {
        self.is_dashing() || self.invincible_timer > 0.0
    }
}
