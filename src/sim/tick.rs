//! Per-frame simulation step
//!
//! One call advances the level by `dt` reference frames. Every pass reads the
//! same input snapshot; nothing re-samples input mid-frame.

use glam::Vec2;

use super::entity::{CoinKind, Particle, ParticleKind};
use super::player::AnimState;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState, MAX_AMBIENT};
use super::{abilities, enemy, physics};
use crate::audio::AudioCue;
use crate::consts::*;
use crate::{clamp_lenient, lerp, palette};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub left: bool,
    pub right: bool,
    /// Held; also triggers the burst ability when it is ready
    pub sprint: bool,
    /// Edge-triggered (true only on the frame the key went down)
    pub jump: bool,
    pub projectile: bool,
    pub dash: bool,
    pub pause: bool,
    /// Handled by the engine, which owns the blueprint
    pub restart: bool,
}

/// Advance the level by `dt` reference frames
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time += dt;

    physics::apply_input(state, input, dt);
    abilities::handle_input(state, input);
    abilities::tick(state, dt);

    physics::move_player(state, dt);
    physics::update_platforms(state, dt);
    state.compact_platforms();

    enemy::update_enemies(state, dt);
    enemy::update_projectiles(state, dt);

    update_particles(state, dt);
    update_ambient(state, dt);

    collect_coins(state, dt);
    activate_checkpoints(state);
    check_exit(state);
    check_hazards(state);

    update_animation(state, dt);
    update_camera(state, dt);
}

fn update_particles(state: &mut GameState, dt: f32) {
    state.particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        if matches!(p.kind, ParticleKind::Dust | ParticleKind::Hit) {
            p.vel.y += 0.1 * dt;
        }
        p.life > 0.0
    });
}

/// Drifting world-themed motes inside the view, oldest dropped past the cap
fn update_ambient(state: &mut GameState, dt: f32) {
    state.ambient_timer += dt;
    if state.ambient_timer > 3.0 {
        state.ambient_timer = 0.0;
        let theme = state.world.theme();
        let view = state.camera.view;
        let at = state.camera.pos + Vec2::new(state.roll() * view.x, state.roll() * view.y);
        let (a, b) = (state.roll(), state.roll());
        let size = 2.0 + state.roll() * 3.0;
        state.ambient.push(Particle {
            pos: at,
            vel: theme.ambient.drift(a, b),
            life: 120.0,
            max_life: 120.0,
            color: theme.ambient_color,
            size,
            kind: ParticleKind::Ambient,
        });
    }

    state.ambient.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        p.life > 0.0
    });
    if state.ambient.len() > MAX_AMBIENT {
        let excess = state.ambient.len() - MAX_AMBIENT;
        state.ambient.drain(..excess);
    }
}

fn collect_coins(state: &mut GameState, dt: f32) {
    let reach = state.player.hitbox().expanded(5.0);
    let mut picked = Vec::new();
    for (i, coin) in state.coins.iter_mut().enumerate() {
        if coin.collected {
            continue;
        }
        coin.anim += 0.05 * dt;
        if reach.overlaps(&coin.hitbox()) {
            coin.collected = true;
            picked.push(i);
        }
    }

    for i in picked {
        let (pos, kind) = (state.coins[i].pos, state.coins[i].kind);
        let color = match kind {
            CoinKind::Coin => {
                state.coins_collected += 1;
                state.sound(AudioCue::Coin);
                palette::GOLD
            }
            CoinKind::Gold => {
                state.gold_collected += 1;
                state.sound(AudioCue::GoldCoin);
                palette::COIN_GOLD
            }
        };
        state.emit(GameEvent::CoinsChanged {
            coins: state.coins_collected,
            gold: state.gold_collected,
        });
        state.spawn_burst(pos, 8, 5.0, 20.0, color, (3.0, 3.0), ParticleKind::Sparkle);
    }
}

fn activate_checkpoints(state: &mut GameState) {
    let center = state.player.center();
    for i in 0..state.checkpoints.len() {
        let cp = &mut state.checkpoints[i];
        if cp.activated
            || (center.x - cp.pos.x).abs() >= TILE
            || (center.y - cp.pos.y).abs() >= TILE * 1.5
        {
            continue;
        }
        cp.activated = true;
        let at = cp.pos;
        state.respawn = Some(Vec2::new(at.x - PLAYER_W / 2.0, at.y - PLAYER_H));
        log::debug!("Checkpoint {} activated at ({:.0}, {:.0})", i, at.x, at.y);
        state.sound(AudioCue::Checkpoint);
        for _ in 0..15 {
            let vel = Vec2::new(state.jitter(4.0), -state.roll() * 6.0);
            let size = 3.0 + state.roll() * 4.0;
            state.spawn_particle(Particle {
                pos: at,
                vel,
                life: 40.0,
                max_life: 40.0,
                color: palette::CHECKPOINT_ACTIVE,
                size,
                kind: ParticleKind::Sparkle,
            });
        }
    }
}

/// Reaching the exit ends the level, unless a boss still stands
fn check_exit(state: &mut GameState) {
    if state.phase != GamePhase::Playing
        || !state.player.hitbox().overlaps(&state.exit)
        || state.boss_alive()
    {
        return;
    }
    state.phase = GamePhase::LevelComplete;
    state.camera.shake(5.0);
    log::info!(
        "Level {} complete: {} coins, {} gold in {:.0} frames",
        state.level_id,
        state.coins_collected,
        state.gold_collected,
        state.time
    );
    state.sound(AudioCue::LevelComplete);
    state.emit(GameEvent::LevelComplete {
        coins: state.coins_collected,
        gold: state.gold_collected,
    });
}

fn check_hazards(state: &mut GameState) {
    if state.player.is_untouchable() {
        return;
    }
    let p = state.player.pos;
    let body = Rect::new(p.x + 2.0, p.y + 2.0, PLAYER_W - 4.0, PLAYER_H - 4.0);
    let touching = state
        .platforms
        .iter()
        .any(|pl| pl.is_hazard() && pl.rect.is_valid() && body.overlaps(&pl.rect));
    if touching {
        state.damage_player(1);
        state.player.vel.y = -8.0;
    }
}

/// Frames the damage pose is held after a hit
const DAMAGE_POSE: f32 = 10.0;

fn update_animation(state: &mut GameState, dt: f32) {
    let p = &mut state.player;
    p.anim_timer += dt;

    if p.anim == AnimState::Damage && p.invincible_timer <= DAMAGE_INVULNERABILITY - DAMAGE_POSE {
        p.anim = AnimState::Idle;
    }
    if p.anim != AnimState::Damage {
        p.anim = if p.is_dashing() {
            AnimState::Dash
        } else if p.wall_sliding {
            AnimState::WallSlide
        } else if !p.grounded && p.vel.y < 0.0 {
            AnimState::Jump
        } else if !p.grounded && p.vel.y > 0.0 {
            AnimState::Fall
        } else if p.vel.x.abs() > 1.0 {
            AnimState::Run
        } else {
            AnimState::Idle
        };
    }

    if p.anim_timer > 6.0 {
        p.anim_frame = (p.anim_frame + 1) % 4;
        p.anim_timer = 0.0;
    }
}

/// Look-ahead follow, clamped to the level, with dash zoom and shake decay
fn update_camera(state: &mut GameState, dt: f32) {
    let p = &state.player;
    let cam = &mut state.camera;
    let look = Vec2::new(p.vel.x * 15.0, p.vel.y * 5.0);
    let target = p.center() - cam.view / 2.0 + look;
    cam.target = Vec2::new(
        clamp_lenient(target.x, 0.0, (state.width - cam.view.x).max(0.0)),
        clamp_lenient(target.y, -100.0, state.height - cam.view.y + 100.0),
    );

    let follow = (0.08 * dt).min(1.0);
    cam.pos = Vec2::new(
        lerp(cam.pos.x, cam.target.x, follow),
        lerp(cam.pos.y, cam.target.y, follow),
    );

    if !p.is_dashing() {
        cam.target_zoom = 1.0;
    }
    cam.zoom = lerp(cam.zoom, cam.target_zoom, (0.05 * dt).min(1.0));
    cam.shake = (cam.shake - 0.5 * dt).max(0.0);
}
