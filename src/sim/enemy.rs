//! Enemy behavior, damage and projectiles
//!
//! Enemies stay in `GameState::enemies` for the whole session; death only
//! clears `alive`. Projectiles remember the indices of enemies they have
//! already struck, which relies on that stability.

use glam::Vec2;

use super::entity::{
    BossState, Coin, CoinKind, Enemy, EnemyKind, Particle, ParticleKind, Projectile,
    ProjectileSource,
};
use super::rect::Rect;
use super::state::GameState;
use crate::audio::AudioCue;
use crate::consts::*;
use crate::palette;

/// Radius growth per frame for max-level projectiles
const PROJECTILE_GROWTH: f32 = 2.0;
const PROJECTILE_MAX_RADIUS: f32 = 200.0;
const BOSS_SHOT_SPEED: f32 = 3.0;
const HIT_FLASH: f32 = 10.0;

/// Boss phase from remaining health: 0 above 60%, 1 down to 30%, 2 below
pub fn boss_phase(health: u32, max_health: u32) -> u8 {
    let (h, max) = (health as f32, max_health as f32);
    if h <= max * 0.3 {
        2
    } else if h <= max * 0.6 {
        1
    } else {
        0
    }
}

/// Frames between boss attacks in a given phase
pub fn boss_attack_interval(phase: u8) -> f32 {
    120.0 - 30.0 * phase as f32
}

/// Move every living enemy, then resolve contact with the player
pub fn update_enemies(state: &mut GameState, dt: f32) {
    for i in 0..state.enemies.len() {
        let e = &state.enemies[i];
        if !e.alive || !e.rect.is_valid() {
            continue;
        }
        state.enemies[i].hit_timer = (state.enemies[i].hit_timer - dt).max(0.0);

        match state.enemies[i].kind {
            EnemyKind::Patrol => update_patrol(state, i, dt),
            EnemyKind::Flying { .. } => update_flying(&mut state.enemies[i], dt),
            EnemyKind::Boss(_) => update_boss(state, i, dt),
        }

        player_contact(state, i);
    }
}

/// Reverse at the edges of the patrol range
fn bounce_at_range(e: &mut Enemy) {
    if (e.rect.x - e.origin.x).abs() > e.patrol_range {
        e.vel.x = -e.vel.x;
        e.facing = if e.vel.x > 0.0 { 1.0 } else { -1.0 };
    }
}

fn update_patrol(state: &mut GameState, i: usize, dt: f32) {
    let e = &mut state.enemies[i];
    e.rect.x += e.vel.x * dt;
    bounce_at_range(e);

    let probe = Rect::new(e.rect.x, e.rect.bottom(), e.rect.w, 4.0);
    let ground = state
        .platforms
        .iter()
        .find(|pl| pl.blocks() && pl.rect.is_valid() && probe.overlaps(&pl.rect));
    match ground {
        Some(pl) => {
            e.rect.y = pl.rect.y - e.rect.h;
            e.vel.y = 0.0;
        }
        None => {
            e.vel.y = (e.vel.y + GRAVITY * dt).min(MAX_FALL);
            e.rect.y += e.vel.y * dt;
        }
    }
}

fn update_flying(e: &mut Enemy, dt: f32) {
    let EnemyKind::Flying { path_t } = &mut e.kind else {
        return;
    };
    *path_t += dt * 0.03;
    let t = *path_t;
    e.rect.x = e.origin.x + t.sin() * e.patrol_range;
    e.rect.y = e.origin.y + (t * 0.7).cos() * (e.patrol_range * 0.5);
    e.facing = if (t + 0.1).sin() > t.sin() { 1.0 } else { -1.0 };
}

fn update_boss(state: &mut GameState, i: usize, dt: f32) {
    let target = state.player.center();
    let e = &mut state.enemies[i];
    let phase = boss_phase(e.health, e.max_health);
    let EnemyKind::Boss(boss) = &mut e.kind else {
        return;
    };
    boss.phase = phase;
    boss.attack_timer += dt;
    let fire = boss.attack_timer > boss_attack_interval(phase);
    if fire {
        boss.attack_timer = 0.0;
        boss.attack_pattern = (boss.attack_pattern + 1) % 3;
    }

    e.rect.x += e.vel.x * (1.5 + phase as f32 * 0.5) * dt;
    bounce_at_range(e);

    if fire {
        let origin = e.rect.center();
        let dir = (target - origin).try_normalize().unwrap_or(Vec2::X);
        state.projectiles.push(Projectile {
            pos: origin,
            vel: dir * BOSS_SHOT_SPEED,
            radius: 8.0,
            damage: 1,
            lifetime: 300.0,
            source: ProjectileSource::Enemy,
            level: 0,
            pierce_left: Some(1),
            struck: Vec::new(),
        });
    }
}

/// Stomp or take a hit when the player touches enemy `i`
fn player_contact(state: &mut GameState, i: usize) {
    if state.player.is_untouchable() {
        return;
    }
    let e = &state.enemies[i];
    let body = state.player.hitbox();
    if !body.overlaps(&e.rect) {
        return;
    }

    let p = &state.player;
    let stomp = p.vel.y > 0.0 && body.bottom() - 10.0 < e.rect.y + e.rect.h / 2.0 && !e.is_boss();
    if stomp {
        hit_enemy(state, i, 1);
        state.player.vel.y = JUMP_VEL * STOMP_BOUNCE;
        state.player.can_double_jump = true;
    } else if !p.is_bursting() {
        let away = if p.pos.x < e.rect.x { -6.0 } else { 6.0 };
        state.damage_player(1);
        state.player.vel = Vec2::new(away, -6.0);
    }
}

/// Deal damage to enemy `i`; at zero health it dies and drops coins
pub fn hit_enemy(state: &mut GameState, i: usize, damage: u32) {
    let Some(e) = state.enemies.get_mut(i) else {
        return;
    };
    if !e.alive {
        return;
    }
    e.health = e.health.saturating_sub(damage);
    e.hit_timer = HIT_FLASH;
    let (rect, dead, boss) = (e.rect, e.health == 0, e.is_boss());
    if dead {
        e.alive = false;
    }

    state.sound(AudioCue::EnemyHit);
    state.spawn_hit_particles(rect.center());

    if !dead {
        return;
    }
    log::debug!("Enemy {} defeated{}", i, if boss { " (boss)" } else { "" });
    state.sound(AudioCue::EnemyDeath);
    state.camera.shake(8.0);
    let color = if boss { palette::BOSS } else { palette::ENEMY };
    state.spawn_burst(rect.center(), 12, 8.0, 30.0, color, (4.0, 6.0), ParticleKind::Hit);

    let (drops, kind) = if boss { (10, CoinKind::Gold) } else { (2, CoinKind::Coin) };
    for _ in 0..drops {
        let at = Vec2::new(
            rect.x + state.roll() * rect.w,
            rect.y + state.roll() * rect.h / 2.0,
        );
        let mut coin = Coin::new(at, kind);
        coin.anim = state.roll() * 100.0;
        state.coins.push(coin);
    }
}

/// Move projectiles, apply hits and drop the spent ones
pub fn update_projectiles(state: &mut GameState, dt: f32) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.retain_mut(|proj| advance_projectile(state, proj, dt));
    // Anything spawned while the list was detached
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;
}

/// Returns whether the projectile survives this frame
fn advance_projectile(state: &mut GameState, proj: &mut Projectile, dt: f32) -> bool {
    proj.pos += proj.vel * dt;
    proj.lifetime -= dt;

    if state.roll() < 0.5 {
        let color = match proj.source {
            ProjectileSource::Player => palette::PROJECTILE,
            ProjectileSource::Enemy => palette::RUBY,
        };
        let vel = Vec2::new(state.jitter(2.0), state.jitter(2.0));
        state.spawn_particle(Particle {
            pos: proj.pos,
            vel,
            life: 10.0,
            max_life: 10.0,
            color,
            size: proj.radius * 0.5,
            kind: ParticleKind::Trail,
        });
    }

    if proj.lifetime <= 0.0 {
        return false;
    }

    match proj.source {
        ProjectileSource::Player => {
            if !strike_enemies(state, proj) {
                return false;
            }
            if proj.is_unbounded() {
                proj.radius = (proj.radius + PROJECTILE_GROWTH * dt).min(PROJECTILE_MAX_RADIUS);
                return true;
            }
            let hitbox = proj.hitbox();
            !state
                .platforms
                .iter()
                .any(|pl| pl.blocks() && pl.rect.is_valid() && hitbox.overlaps(&pl.rect))
        }
        ProjectileSource::Enemy => {
            let p = &state.player;
            if p.is_untouchable() || p.is_bursting() || !proj.hitbox().overlaps(&p.hitbox()) {
                return true;
            }
            state.damage_player(proj.damage);
            false
        }
    }
}

/// Hit every new enemy under the projectile until its pierce budget runs out
///
/// Returns false once the budget is spent.
fn strike_enemies(state: &mut GameState, proj: &mut Projectile) -> bool {
    let hitbox = proj.hitbox();
    for j in 0..state.enemies.len() {
        let e = &state.enemies[j];
        if !e.alive || proj.struck.contains(&j) || !hitbox.overlaps(&e.rect) {
            continue;
        }
        hit_enemy(state, j, proj.damage);
        proj.struck.push(j);
        if let Some(left) = proj.pierce_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                return false;
            }
        }
    }
    true
}

/// Boss state of enemy `i`, if it is a boss
pub fn boss_state(state: &GameState, i: usize) -> Option<BossState> {
    match state.enemies.get(i)?.kind {
        EnemyKind::Boss(b) => Some(b),
        _ => None,
    }
}
