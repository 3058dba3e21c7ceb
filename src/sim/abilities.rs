//! Ability tables, activation and cooldown ticking
//!
//! Every slot shares the same lifecycle, so timers are advanced generically
//! over the slot set. Only activation differs per kind.

use glam::Vec2;

use super::entity::{Particle, ParticleKind, Projectile, ProjectileSource};
use super::player::{Ability, AbilityKind};
use super::state::{GameEvent, GameState};
use super::tick::TickInput;
use crate::audio::AudioCue;
use crate::consts::*;
use crate::palette;

/// Highest purchasable level
pub const MAX_LEVEL: u8 = 3;

pub const PROJECTILE_COOLDOWN: [f32; 3] = [600.0, 480.0, 360.0];
pub const PROJECTILE_DAMAGE: [u32; 3] = [1, 2, 5];
pub const PROJECTILE_SPEED: f32 = 8.0;

pub const BURST_DURATION: [f32; 3] = [240.0, 300.0, 420.0];
pub const BURST_COOLDOWN: [f32; 3] = [900.0, 720.0, 540.0];
pub const BURST_SPEED_MULT: [f32; 3] = [1.4, 1.6, 1.8];
pub const BURST_JUMP_MULT: [f32; 3] = [1.2, 1.3, 1.5];

pub const DASH_DURATION: [f32; 3] = [150.0, 180.0, 240.0];
pub const DASH_COOLDOWN: [f32; 3] = [1200.0, 960.0, 720.0];
pub const DASH_SPEED: f32 = 12.0;

/// Table index for a level; level 0 reads the first row
#[inline]
fn row(level: u8) -> usize {
    (level.clamp(1, MAX_LEVEL) - 1) as usize
}

pub fn cooldown_for(kind: AbilityKind, level: u8) -> f32 {
    match kind {
        AbilityKind::Projectile => PROJECTILE_COOLDOWN[row(level)],
        AbilityKind::Burst => BURST_COOLDOWN[row(level)],
        AbilityKind::Dash => DASH_COOLDOWN[row(level)],
    }
}

/// Length of the active window (zero for instant casts)
pub fn duration_for(kind: AbilityKind, level: u8) -> f32 {
    match kind {
        AbilityKind::Projectile => 0.0,
        AbilityKind::Burst => BURST_DURATION[row(level)],
        AbilityKind::Dash => DASH_DURATION[row(level)],
    }
}

pub fn burst_speed_mult(level: u8) -> f32 {
    BURST_SPEED_MULT[row(level)]
}

pub fn burst_jump_mult(level: u8) -> f32 {
    BURST_JUMP_MULT[row(level)]
}

/// Player projectile cast at a given level
pub fn player_projectile(origin: Vec2, facing: f32, level: u8) -> Projectile {
    let max = level >= MAX_LEVEL;
    Projectile {
        pos: origin,
        vel: Vec2::new(PROJECTILE_SPEED * facing, 0.0),
        radius: if max { 20.0 } else { 12.0 },
        damage: PROJECTILE_DAMAGE[row(level)],
        lifetime: if max { 60.0 } else { 180.0 },
        source: ProjectileSource::Player,
        level,
        pierce_left: if max { None } else { Some(level.max(1) as u32) },
        struck: Vec::new(),
    }
}

/// Activate abilities from this frame's input
///
/// Projectile and dash fire on their edge-triggered keys; burst fires while
/// sprint is held and it is ready.
pub fn handle_input(state: &mut GameState, input: &TickInput) {
    if input.projectile {
        try_activate(state, AbilityKind::Projectile);
    }
    if input.dash {
        try_activate(state, AbilityKind::Dash);
    }
    if input.sprint {
        try_activate(state, AbilityKind::Burst);
    }
}

/// Activate an ability if every precondition holds
///
/// Returns false with no side effects when the slot is locked, already active
/// or cooling down.
pub fn try_activate(state: &mut GameState, kind: AbilityKind) -> bool {
    let slot = *state.player.abilities.get(kind);
    if !slot.is_ready() {
        return false;
    }
    let level = slot.level;
    let center = state.player.center();

    match kind {
        AbilityKind::Projectile => {
            state.player.abilities.get_mut(kind).cooldown = cooldown_for(kind, level);
            let facing = state.player.facing;
            let origin = center + Vec2::new(facing * 20.0, 0.0);
            state.projectiles.push(player_projectile(origin, facing, level));
            state.camera.shake(4.0);
            state.sound(AudioCue::ProjectileCast);
        }
        AbilityKind::Burst => {
            start(state.player.abilities.get_mut(kind));
            state.camera.shake(6.0);
            state.sound(AudioCue::BurstCast);
            state.spawn_burst(
                center,
                20,
                10.0,
                30.0,
                palette::BURST,
                (5.0, 8.0),
                ParticleKind::Burst,
            );
        }
        AbilityKind::Dash => {
            start(state.player.abilities.get_mut(kind));
            state.player.dash_dir = state.player.facing;
            state.camera.target_zoom = 1.1;
            state.sound(AudioCue::DashCast);
            state.spawn_burst(
                center,
                15,
                8.0,
                25.0,
                palette::DASH,
                (4.0, 6.0),
                ParticleKind::Burst,
            );
        }
    }

    log::debug!("Activated {} (level {})", kind.key(), level);
    state.emit(GameEvent::AbilitiesChanged);
    true
}

fn start(slot: &mut Ability) {
    slot.active = true;
    slot.timer = duration_for(slot.kind, slot.level);
    slot.cooldown = 0.0;
}

/// Advance active windows and cooldowns by `dt`
///
/// An active slot counts its timer down and enters cooldown when it expires;
/// an idle slot counts its cooldown down to exactly zero. Also counts down
/// the player's invulnerability.
pub fn tick(state: &mut GameState, dt: f32) {
    let mut changed = false;
    for slot in state.player.abilities.iter_mut() {
        if slot.active {
            slot.timer -= dt;
            if slot.timer <= 0.0 {
                slot.active = false;
                slot.timer = 0.0;
                slot.cooldown = cooldown_for(slot.kind, slot.level);
                changed = true;
            }
        } else if slot.cooldown > 0.0 {
            slot.cooldown = (slot.cooldown - dt).max(0.0);
            changed |= slot.cooldown == 0.0;
        }
    }

    let p = &mut state.player;
    p.invincible_timer = (p.invincible_timer - dt).max(0.0);

    if changed {
        state.emit(GameEvent::AbilitiesChanged);
    }

    spawn_trails(state);
}

/// Cosmetic trails while burst or dash is running
fn spawn_trails(state: &mut GameState) {
    let (bursting, dashing) = (state.player.is_bursting(), state.player.is_dashing());
    let base = state.player.pos;
    let dash_dir = state.player.dash_dir;
    if bursting && state.roll() < 0.4 {
        let at = base + Vec2::new(state.roll() * PLAYER_W, state.roll() * PLAYER_H);
        let vel = Vec2::new(state.jitter(2.0), -state.roll() * 2.0);
        let size = 4.0 + state.roll() * 4.0;
        state.spawn_particle(trail(at, vel, 20.0, palette::BURST, size));
    }
    if dashing && state.roll() < 0.6 {
        let at = base + Vec2::new(state.roll() * PLAYER_W, state.roll() * PLAYER_H);
        let vel = Vec2::new(-dash_dir * 3.0 + state.jitter(1.0), state.jitter(2.0));
        let size = 3.0 + state.roll() * 5.0;
        state.spawn_particle(trail(at, vel, 15.0, palette::DASH, size));
    }
}

fn trail(pos: Vec2, vel: Vec2, life: f32, color: u32, size: f32) -> Particle {
    Particle {
        pos,
        vel,
        life,
        max_life: life,
        color,
        size,
        kind: ParticleKind::Trail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::get_level;
    use crate::sim::player::Loadout;
    use proptest::prelude::*;

    fn state_with(levels: [u8; 3]) -> GameState {
        let loadout = Loadout {
            ability_levels: levels,
            ..Default::default()
        };
        GameState::load(&get_level(1), &loadout)
    }

    #[test]
    fn test_locked_abilities_do_nothing() {
        let mut state = state_with([0, 0, 0]);
        state.drain_events();
        for kind in AbilityKind::ALL {
            assert!(!try_activate(&mut state, kind));
        }
        assert!(state.projectiles.is_empty());
        assert!(state.player.abilities.iter().all(|a| !a.active && a.cooldown == 0.0));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_projectile_cast() {
        let mut state = state_with([2, 0, 0]);
        state.player.facing = -1.0;
        assert!(try_activate(&mut state, AbilityKind::Projectile));
        let proj = &state.projectiles[0];
        assert_eq!(proj.vel, Vec2::new(-PROJECTILE_SPEED, 0.0));
        assert_eq!(proj.damage, 2);
        assert_eq!(proj.pierce_left, Some(2));
        assert_eq!(proj.pos.x, state.player.center().x - 20.0);
        let slot = state.player.abilities.get(AbilityKind::Projectile);
        assert!(!slot.active);
        assert_eq!(slot.cooldown, 480.0);
        // On cooldown now
        assert!(!try_activate(&mut state, AbilityKind::Projectile));
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::AbilitiesChanged));
    }

    #[test]
    fn test_max_level_projectile_is_unbounded() {
        let proj = player_projectile(Vec2::ZERO, 1.0, 3);
        assert!(proj.is_unbounded());
        assert_eq!(proj.radius, 20.0);
        assert_eq!(proj.lifetime, 60.0);
        assert_eq!(proj.damage, 5);
    }

    #[test]
    fn test_dash_lifecycle() {
        let mut state = state_with([0, 0, 1]);
        state.player.facing = -1.0;
        assert!(try_activate(&mut state, AbilityKind::Dash));
        assert!(state.player.is_dashing());
        assert_eq!(state.player.dash_dir, -1.0);
        assert_eq!(state.camera.target_zoom, 1.1);
        // Cannot re-trigger while active
        assert!(!try_activate(&mut state, AbilityKind::Dash));

        for _ in 0..150 {
            tick(&mut state, 1.0);
        }
        let slot = state.player.abilities.get(AbilityKind::Dash);
        assert!(!slot.active);
        assert_eq!(slot.cooldown, DASH_COOLDOWN[0]);
    }

    #[test]
    fn test_burst_cooldown_starts_after_window() {
        let mut state = state_with([0, 3, 0]);
        assert!(try_activate(&mut state, AbilityKind::Burst));
        tick(&mut state, 100.0);
        let slot = state.player.abilities.get(AbilityKind::Burst);
        assert!(slot.active);
        assert_eq!(slot.cooldown, 0.0);
        tick(&mut state, 400.0);
        let slot = state.player.abilities.get(AbilityKind::Burst);
        assert!(!slot.active);
        assert_eq!(slot.cooldown, BURST_COOLDOWN[2]);
    }

    #[test]
    fn test_sprint_triggers_burst() {
        let mut state = state_with([0, 1, 0]);
        let input = TickInput {
            sprint: true,
            ..Default::default()
        };
        handle_input(&mut state, &input);
        assert!(state.player.is_bursting());
    }

    proptest! {
        #[test]
        fn cooldown_decreases_by_dt_then_ready(level in 1u8..=3, dt in 0.1f32..3.0) {
            let mut state = state_with([level, 0, 0]);
            prop_assert!(try_activate(&mut state, AbilityKind::Projectile));
            let mut prev = state.player.abilities.get(AbilityKind::Projectile).cooldown;
            loop {
                tick(&mut state, dt);
                let cd = state.player.abilities.get(AbilityKind::Projectile).cooldown;
                prop_assert!(cd >= 0.0);
                if cd == 0.0 {
                    prop_assert!(prev <= dt + 1e-3);
                    break;
                }
                prop_assert!((prev - cd - dt).abs() < 1e-3);
                prev = cd;
            }
            prop_assert!(try_activate(&mut state, AbilityKind::Projectile));
        }
    }
}
