//! Player integration and platform collision
//!
//! Movement is axis-separated and sub-stepped: the frame's displacement is cut
//! into steps of at most `MAX_SUBSTEP` pixels, and each step resolves X then Y
//! against every blocking platform.

use glam::Vec2;

use super::abilities;
use super::entity::{Platform, PlatformKind};
use super::player::AbilityKind;
use super::rect::Rect;
use super::state::GameState;
use super::tick::TickInput;
use crate::audio::AudioCue;
use crate::consts::*;

/// Outcome of a vertical resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    Landed,
    Trampoline,
    Ceiling,
}

/// Platforms that take part in collision this frame
#[inline]
fn collides(p: &Platform) -> bool {
    p.blocks() && p.rect.is_valid()
}

/// Horizontal control, jumps and gravity
///
/// Replaced entirely by a constant-velocity dash while the dash ability is
/// active.
pub fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let on_ice = is_on_ice(state);
    let p = &mut state.player;

    if p.is_dashing() {
        p.vel = Vec2::new(abilities::DASH_SPEED * p.dash_dir, 0.0);
        return;
    }

    let burst = *p.abilities.get(AbilityKind::Burst);
    let (speed_mult, jump_mult) = if burst.active {
        (abilities::burst_speed_mult(burst.level), abilities::burst_jump_mult(burst.level))
    } else {
        (1.0, 1.0)
    };
    let speed = (if input.sprint { SPRINT_SPEED } else { RUN_SPEED }) * speed_mult;

    let mut target_vx = 0.0;
    if input.left {
        target_vx = -speed;
        p.facing = -1.0;
    }
    if input.right {
        target_vx = speed;
        p.facing = 1.0;
    }

    let friction = if !p.grounded {
        FRICTION_AIR
    } else if on_ice {
        ICE_FRICTION
    } else {
        FRICTION_GROUND
    };
    p.vel.x = p.vel.x * friction + target_vx * (1.0 - friction);

    if input.jump {
        jump(state, jump_mult);
    }

    let p = &mut state.player;
    p.vel.y += GRAVITY * dt;
    if p.wall_sliding && p.vel.y > WALL_SLIDE_SPEED {
        p.vel.y = WALL_SLIDE_SPEED;
    }
    p.vel.y = p.vel.y.min(MAX_FALL);
}

/// Ground jump, then wall jump, then double jump
fn jump(state: &mut GameState, mult: f32) {
    let p = &mut state.player;
    if p.grounded {
        p.vel.y = JUMP_VEL * mult;
        p.grounded = false;
        p.can_double_jump = true;
        let feet = p.pos + Vec2::new(PLAYER_W / 2.0, PLAYER_H);
        state.sound(AudioCue::Jump);
        state.spawn_dust(feet, 5);
    } else if p.wall_sliding {
        p.vel.x = WALL_JUMP_VEL_X * -p.wall_dir;
        p.vel.y = WALL_JUMP_VEL_Y * mult;
        p.facing = -p.wall_dir;
        p.wall_sliding = false;
        p.can_double_jump = true;
        let side = if p.wall_dir > 0.0 { PLAYER_W } else { 0.0 };
        let at = p.pos + Vec2::new(side, PLAYER_H / 2.0);
        state.sound(AudioCue::WallJump);
        state.spawn_dust(at, 4);
    } else if p.can_double_jump {
        p.vel.y = DOUBLE_JUMP_VEL * mult;
        p.can_double_jump = false;
        let center = p.center();
        state.sound(AudioCue::DoubleJump);
        state.spawn_ring(center);
    }
}

/// Whether the player's feet rest on an ice platform
pub fn is_on_ice(state: &GameState) -> bool {
    let p = &state.player;
    let feet = Rect::new(p.pos.x, p.pos.y + PLAYER_H, PLAYER_W, 4.0);
    state
        .platforms
        .iter()
        .any(|pl| pl.is_ice() && collides(pl) && feet.overlaps(&pl.rect))
}

/// How far the moving platform under the player's feet travels this frame
pub fn moving_platform_delta(state: &GameState, dt: f32) -> Option<Vec2> {
    let p = &state.player;
    let feet = Rect::new(p.pos.x + 2.0, p.pos.y + PLAYER_H - 2.0, PLAYER_W - 4.0, 6.0);
    state.platforms.iter().find_map(|pl| match pl.kind {
        PlatformKind::Moving(motion) if pl.rect.is_valid() && feet.overlaps(&pl.rect) => {
            Some(motion.position_at(motion.phase_after(dt)) - pl.rect.pos())
        }
        _ => None,
    })
}

/// Integrate the player's velocity against the platforms
pub fn move_player(state: &mut GameState, dt: f32) {
    if state.player.grounded {
        if let Some(delta) = moving_platform_delta(state, dt) {
            state.player.pos += delta;
        }
    }

    let total = state.player.vel * dt;
    let steps = (total.x.abs().max(total.y.abs()) / MAX_SUBSTEP).ceil().max(1.0) as u32;
    let step = total / steps as f32;

    state.player.grounded = false;
    state.player.wall_sliding = false;

    for _ in 0..steps {
        state.player.pos.x += step.x;
        if resolve_x(state) {
            state.player.vel.x = 0.0;
        }

        state.player.pos.y += step.y;
        match resolve_y(state, step.y) {
            Some(VerticalContact::Landed) => {
                let p = &mut state.player;
                p.grounded = true;
                p.can_double_jump = true;
                p.vel.y = 0.0;
            }
            Some(VerticalContact::Trampoline) => {
                state.player.vel.y = TRAMPOLINE_VEL;
                state.player.grounded = false;
                let feet = state.player.pos + Vec2::new(PLAYER_W / 2.0, PLAYER_H);
                state.sound(AudioCue::Trampoline);
                state.spawn_dust(feet, 8);
            }
            Some(VerticalContact::Ceiling) => state.player.vel.y = 0.0,
            None => {}
        }
    }

    detect_walls(state);

    if state.player.pos.y > state.height + FALL_OUT_MARGIN {
        state.kill_player();
    }
}

/// Push the player out of the first blocking platform along X
///
/// Snaps to whichever platform edge is nearer. Returns whether a platform was
/// hit.
pub fn resolve_x(state: &mut GameState) -> bool {
    let p = &mut state.player;
    let body = Rect::new(p.pos.x, p.pos.y + 2.0, PLAYER_W, PLAYER_H - 4.0);
    let Some(pl) = state
        .platforms
        .iter()
        .find(|pl| collides(pl) && body.overlaps(&pl.rect))
    else {
        return false;
    };

    let overlap_left = (p.pos.x + PLAYER_W) - pl.rect.x;
    let overlap_right = pl.rect.right() - p.pos.x;
    p.pos.x = if overlap_left < overlap_right {
        pl.rect.x - PLAYER_W
    } else {
        pl.rect.right()
    };
    true
}

/// Push the player out of the first blocking platform along Y
///
/// `vy` is this substep's vertical displacement: moving down (or not at all)
/// lands on the platform top, moving up stops at its underside. Landing on a
/// crumbling platform counts one contact.
pub fn resolve_y(state: &mut GameState, vy: f32) -> Option<VerticalContact> {
    let p = &mut state.player;
    let body = Rect::new(p.pos.x + 2.0, p.pos.y, PLAYER_W - 4.0, PLAYER_H);
    let pl = state
        .platforms
        .iter_mut()
        .find(|pl| collides(pl) && body.overlaps(&pl.rect))?;

    if vy < 0.0 {
        p.pos.y = pl.rect.bottom();
        return Some(VerticalContact::Ceiling);
    }

    p.pos.y = pl.rect.y - PLAYER_H;
    match &mut pl.kind {
        PlatformKind::Trampoline => Some(VerticalContact::Trampoline),
        PlatformKind::Falling(crumble) => {
            crumble.contacts += 1;
            if crumble.contacts > CRUMBLE_CONTACTS {
                crumble.fallen = true;
            }
            Some(VerticalContact::Landed)
        }
        _ => Some(VerticalContact::Landed),
    }
}

/// Airborne wall probes; falling against a wall starts a wall slide
fn detect_walls(state: &mut GameState) {
    let p = &state.player;
    if p.grounded || p.is_dashing() {
        return;
    }
    let probe_h = PLAYER_H - 12.0;
    let left = Rect::new(p.pos.x - WALL_PROBE, p.pos.y + 6.0, WALL_PROBE, probe_h);
    let right = Rect::new(p.pos.x + PLAYER_W, p.pos.y + 6.0, WALL_PROBE, probe_h);
    let touches = |probe: &Rect| {
        state
            .platforms
            .iter()
            .any(|pl| collides(pl) && probe.overlaps(&pl.rect))
    };
    let (left_wall, right_wall) = (touches(&left), touches(&right));

    let p = &mut state.player;
    if (left_wall || right_wall) && p.vel.y > 0.0 {
        p.wall_sliding = true;
        p.wall_dir = if right_wall { 1.0 } else { -1.0 };
    }
}

/// Advance moving platforms and sink collapsed ones
pub fn update_platforms(state: &mut GameState, dt: f32) {
    for pl in state.platforms.iter_mut().filter(|pl| pl.rect.is_valid()) {
        match &mut pl.kind {
            PlatformKind::Moving(motion) => {
                motion.phase = motion.phase_after(dt);
                let pos = motion.position_at(motion.phase);
                pl.rect.x = pos.x;
                pl.rect.y = pos.y;
            }
            PlatformKind::Falling(crumble) if crumble.fallen => {
                pl.rect.y += CRUMBLE_FALL_SPEED * dt;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelData;
    use crate::level::WorldId;
    use crate::sim::entity::{Axis, Crumble, Motion};
    use crate::sim::player::Loadout;

    /// Empty 2000x1000 level with the given platforms
    fn arena(platforms: Vec<Platform>) -> GameState {
        let level = LevelData {
            id: 1,
            name: "Test".into(),
            width: 2000.0,
            height: 1000.0,
            world: WorldId::EnchantedForest,
            player_start: Vec2::new(100.0, 100.0),
            platforms,
            coins: Vec::new(),
            enemies: Vec::new(),
            checkpoints: Vec::new(),
            exit: Rect::new(1900.0, 0.0, 80.0, 80.0),
            boss_level: false,
        };
        GameState::load(&level, &Loadout::default())
    }

    fn floor() -> Platform {
        Platform::solid(Rect::new(0.0, 720.0, 2000.0, 120.0))
    }

    fn settle(state: &mut GameState, frames: usize) {
        let input = TickInput::default();
        for _ in 0..frames {
            apply_input(state, &input, 1.0);
            move_player(state, 1.0);
        }
    }

    #[test]
    fn test_lands_flush_on_platform_top() {
        let mut state = arena(vec![floor()]);
        state.player.pos = Vec2::new(100.0, 500.0);
        settle(&mut state, 120);
        assert!(state.player.grounded);
        assert_eq!(state.player.pos.y + PLAYER_H, 720.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_burst_keeps_ground_friction() {
        let mut state = arena(vec![floor()]);
        state.player.pos = Vec2::new(100.0, 500.0);
        settle(&mut state, 120);
        let burst = state.player.abilities.get_mut(AbilityKind::Burst);
        burst.level = 1;
        burst.active = true;
        state.player.vel.x = 0.0;

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &right, 1.0);
        let target = RUN_SPEED * abilities::burst_speed_mult(1);
        let expected = target * (1.0 - FRICTION_GROUND);
        assert!((state.player.vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel_thin_platform() {
        let thin = Platform::solid(Rect::new(0.0, 600.0, 400.0, 8.0));
        let mut state = arena(vec![thin]);
        state.player.pos = Vec2::new(100.0, 400.0);
        state.player.vel.y = MAX_FALL;
        move_player(&mut state, MAX_FRAME_SCALE);
        settle(&mut state, 30);
        assert_eq!(state.player.pos.y + PLAYER_H, 600.0);
    }

    #[test]
    fn test_horizontal_snaps_to_nearer_edge() {
        let wall = Platform::solid(Rect::new(200.0, 0.0, 40.0, 720.0));
        let mut state = arena(vec![floor(), wall]);
        state.player.pos = Vec2::new(168.0, 680.0);
        state.player.vel.x = 10.0;
        move_player(&mut state, 1.0);
        assert_eq!(state.player.pos.x, 200.0 - PLAYER_W);
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_ceiling_stops_upward_motion() {
        let ceiling = Platform::solid(Rect::new(0.0, 560.0, 400.0, 40.0));
        let mut state = arena(vec![floor(), ceiling]);
        state.player.pos = Vec2::new(100.0, 610.0);
        state.player.vel.y = -12.0;
        move_player(&mut state, 1.0);
        assert_eq!(state.player.pos.y, 600.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_trampoline_bounces() {
        let tramp = Platform::new(Rect::new(80.0, 700.0, 80.0, 24.0), PlatformKind::Trampoline);
        let mut state = arena(vec![floor(), tramp]);
        state.player.pos = Vec2::new(100.0, 655.0);
        state.player.vel.y = 6.0;
        move_player(&mut state, 1.0);
        assert_eq!(state.player.vel.y, TRAMPOLINE_VEL);
        assert!(!state.player.grounded);
    }

    #[test]
    fn test_spikes_never_block() {
        let spike = Platform::new(Rect::new(0.0, 700.0, 400.0, 20.0), PlatformKind::Spike);
        let mut state = arena(vec![floor(), spike]);
        state.player.pos = Vec2::new(100.0, 600.0);
        settle(&mut state, 60);
        assert_eq!(state.player.pos.y + PLAYER_H, 720.0);
    }

    #[test]
    fn test_crumbling_platform_collapses() {
        let crumble = Platform::new(
            Rect::new(0.0, 400.0, 400.0, 40.0),
            PlatformKind::Falling(Crumble::default()),
        );
        let mut state = arena(vec![crumble, floor()]);
        state.player.pos = Vec2::new(100.0, 360.0);
        settle(&mut state, 40);
        assert!(state.platforms[0].is_fallen());
        // Player drops through to the floor once it has gone
        settle(&mut state, 60);
        assert_eq!(state.player.pos.y + PLAYER_H, 720.0);
    }

    #[test]
    fn test_fallen_platform_sinks_then_compacts() {
        let mut state = arena(vec![Platform::new(
            Rect::new(0.0, 1400.0, 100.0, 40.0),
            PlatformKind::Falling(Crumble::default()),
        )]);
        // Load resets wear, so collapse the live platform
        state.platforms[0].kind = PlatformKind::Falling(Crumble {
            contacts: 26,
            fallen: true,
        });
        update_platforms(&mut state, 1.0);
        assert_eq!(state.platforms[0].rect.y, 1404.0);
        state.compact_platforms();
        assert_eq!(state.platforms.len(), 1);
        for _ in 0..30 {
            update_platforms(&mut state, 1.0);
        }
        state.compact_platforms();
        assert!(state.platforms.is_empty());
    }

    #[test]
    fn test_rides_moving_platform() {
        let lift = Platform::new(
            Rect::new(100.0, 600.0, 120.0, 40.0),
            PlatformKind::Moving(Motion::new(Axis::X, 80.0, 2.0)),
        );
        let mut state = arena(vec![lift]);
        if let PlatformKind::Moving(m) = &mut state.platforms[0].kind {
            m.phase = 0.0;
        }
        state.platforms[0].rect.x = 100.0;
        state.player.pos = Vec2::new(120.0, 560.0);
        settle(&mut state, 2);
        assert!(state.player.grounded);
        let offset = state.player.pos.x - state.platforms[0].rect.x;
        for _ in 0..20 {
            let delta = moving_platform_delta(&state, 1.0).expect("on lift");
            assert!(delta.y.abs() < 1e-4);
            apply_input(&mut state, &TickInput::default(), 1.0);
            move_player(&mut state, 1.0);
            update_platforms(&mut state, 1.0);
        }
        let drift = state.player.pos.x - state.platforms[0].rect.x - offset;
        assert!(drift.abs() < 0.5, "drift {drift}");
    }

    #[test]
    fn test_ice_keeps_momentum() {
        let ice = Platform::new(Rect::new(0.0, 720.0, 2000.0, 40.0), PlatformKind::Ice);
        let mut on_ice = arena(vec![ice]);
        let mut on_ground = arena(vec![floor()]);
        for state in [&mut on_ice, &mut on_ground] {
            state.player.pos = Vec2::new(100.0, 680.0);
            settle(state, 2);
            state.player.vel.x = 6.0;
            settle(state, 10);
        }
        assert!(on_ice.player.vel.x > on_ground.player.vel.x);
    }

    #[test]
    fn test_jump_tiers() {
        let mut state = arena(vec![floor()]);
        state.player.pos = Vec2::new(100.0, 680.0);
        settle(&mut state, 2);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        apply_input(&mut state, &jump, 1.0);
        assert!((state.player.vel.y - (JUMP_VEL + GRAVITY)).abs() < 1e-5);
        move_player(&mut state, 1.0);
        apply_input(&mut state, &jump, 1.0);
        assert!((state.player.vel.y - (DOUBLE_JUMP_VEL + GRAVITY)).abs() < 1e-5);
        assert!(!state.player.can_double_jump);
        // No third jump
        move_player(&mut state, 1.0);
        let before = state.player.vel.y;
        apply_input(&mut state, &jump, 1.0);
        assert!((state.player.vel.y - (before + GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_wall_slide_and_wall_jump() {
        let wall = Platform::solid(Rect::new(300.0, 0.0, 40.0, 700.0));
        let mut state = arena(vec![floor(), wall]);
        state.player.pos = Vec2::new(300.0 - PLAYER_W, 200.0);
        state.player.vel.y = 5.0;
        let hold_right = TickInput {
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &hold_right, 1.0);
        move_player(&mut state, 1.0);
        assert!(state.player.wall_sliding);
        assert_eq!(state.player.wall_dir, 1.0);

        apply_input(&mut state, &hold_right, 1.0);
        assert!(state.player.vel.y <= WALL_SLIDE_SPEED);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        apply_input(&mut state, &jump, 1.0);
        assert_eq!(state.player.vel.x, -WALL_JUMP_VEL_X);
        assert_eq!(state.player.facing, -1.0);
    }

    #[test]
    fn test_falling_out_is_lethal_without_checkpoint() {
        let mut state = arena(vec![]);
        state.player.pos = Vec2::new(100.0, state.height + FALL_OUT_MARGIN + 1.0);
        state.player.invincible_timer = 60.0;
        move_player(&mut state, 1.0);
        assert_eq!(state.phase, crate::sim::GamePhase::GameOver);
    }

    #[test]
    fn test_malformed_platform_is_skipped() {
        let bad = Platform::solid(Rect::new(f32::NAN, 0.0, 100.0, 100.0));
        let mut state = arena(vec![bad, floor()]);
        state.player.pos = Vec2::new(100.0, 600.0);
        settle(&mut state, 60);
        update_platforms(&mut state, 1.0);
        assert_eq!(state.player.pos.y + PLAYER_H, 720.0);
    }
}
