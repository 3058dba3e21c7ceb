//! Rendering
//!
//! The simulation exposes a read-only `RenderView` each frame; a `Renderer`
//! turns it into pixels. `DrawList` is the built-in CPU renderer: it
//! tessellates the view into a screen-space vertex list a host can upload
//! as-is.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, rgba};

use glam::Vec2;

use crate::consts::{CRUMBLE_CONTACTS, TILE};
use crate::level::WorldTheme;
use crate::palette;
use crate::settings::Settings;
use crate::sim::{CoinKind, EnemyKind, GameState, Platform, PlatformKind, ProjectileSource, Rect};

/// Everything a renderer may look at for one frame
pub struct RenderView<'a> {
    pub state: &'a GameState,
    /// Top-left of the view in world space
    pub camera: Vec2,
    pub zoom: f32,
    /// Screen-space jitter from camera shake (zero when shake is disabled)
    pub shake_offset: Vec2,
    pub theme: &'static WorldTheme,
    pub show_ambient: bool,
}

impl<'a> RenderView<'a> {
    pub fn new(state: &'a GameState, settings: &Settings) -> Self {
        let cam = &state.camera;
        let shake_offset = if settings.effective_screen_shake() && cam.shake > 0.0 {
            // Deterministic jitter keyed on session time
            let t = state.time;
            Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * cam.shake * 0.5
        } else {
            Vec2::ZERO
        };
        Self {
            state,
            camera: cam.pos,
            zoom: cam.zoom,
            shake_offset,
            theme: state.world.theme(),
            show_ambient: settings.quality.ambient_enabled() && settings.particles,
        }
    }

    /// World point to screen pixels
    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        let view = self.state.camera.view;
        (p - self.camera - view / 2.0) * self.zoom + view / 2.0 + self.shake_offset
    }

    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        let p = self.to_screen(r.pos());
        Rect::new(p.x, p.y, r.w * self.zoom, r.h * self.zoom)
    }

    /// World-space rectangle visible this frame, with a margin
    pub fn visible(&self) -> Rect {
        let view = self.state.camera.view / self.zoom.max(0.01);
        let center = self.camera + self.state.camera.view / 2.0;
        Rect::new(center.x - view.x / 2.0, center.y - view.y / 2.0, view.x, view.y).expanded(TILE)
    }
}

/// Draws a frame; must not mutate the simulation
pub trait Renderer {
    fn render(&mut self, view: &RenderView<'_>);

    fn resize(&mut self, _width: f32, _height: f32) {}
}

/// CPU renderer producing a screen-space triangle list
#[derive(Debug, Default)]
pub struct DrawList {
    pub vertices: Vec<Vertex>,
    pub frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    fn platform(&mut self, view: &RenderView<'_>, p: &Platform) {
        let theme = view.theme;
        let r = view.rect_to_screen(p.rect);
        let out = &mut self.vertices;
        match p.kind {
            PlatformKind::Spike => shapes::spikes(out, r, rgba(palette::SPIKE, 1.0)),
            PlatformKind::Ice => {
                shapes::quad(out, r, rgba(palette::ICE, 0.9));
                shapes::quad(out, Rect::new(r.x, r.y, r.w, 3.0), rgba(palette::WHITE, 0.6));
            }
            PlatformKind::Trampoline => {
                shapes::quad(out, r, rgba(palette::TRAMPOLINE, 1.0));
            }
            PlatformKind::Falling(crumble) => {
                let wear = crumble.contacts.min(CRUMBLE_CONTACTS) as f32 / CRUMBLE_CONTACTS as f32;
                let alpha = if crumble.fallen { 0.4 } else { 1.0 - wear * 0.5 };
                shapes::quad(out, r, rgba(theme.platform_accent, alpha));
            }
            PlatformKind::Solid | PlatformKind::Moving(_) => {
                shapes::quad(out, r, rgba(theme.platform_color, 1.0));
                let top = Rect::new(r.x, r.y, r.w, 4.0_f32.min(r.h));
                shapes::quad(out, top, rgba(theme.platform_top, 1.0));
            }
        }
    }

    fn player(&mut self, view: &RenderView<'_>) {
        let p = &view.state.player;
        // Blink while invulnerable
        if p.invincible_timer > 0.0 && (p.invincible_timer / 4.0) as u32 % 2 == 1 {
            return;
        }
        let color = if p.is_bursting() {
            palette::BURST
        } else if p.is_dashing() {
            palette::DASH
        } else {
            palette::PLAYER
        };
        let alpha = if p.is_dashing() { 0.6 } else { 1.0 };
        let r = view.rect_to_screen(p.hitbox());
        shapes::quad(&mut self.vertices, r, rgba(color, alpha));
        let eye = view.to_screen(p.center() + Vec2::new(p.facing * 6.0, -8.0));
        shapes::circle(&mut self.vertices, eye, 3.0 * view.zoom, rgba(palette::WHITE, 1.0), 8);
    }
}

impl Renderer for DrawList {
    fn render(&mut self, view: &RenderView<'_>) {
        self.vertices.clear();
        self.frames += 1;
        let state = view.state;
        let visible = view.visible();
        let screen = Rect::new(0.0, 0.0, state.camera.view.x, state.camera.view.y);
        let bg = view.theme.background;

        shapes::gradient_quad(&mut self.vertices, screen, rgba(bg[0], 1.0), rgba(bg[2], 1.0));

        if view.show_ambient {
            for a in &state.ambient {
                let at = view.to_screen(a.pos);
                shapes::circle(&mut self.vertices, at, a.size, rgba(a.color, a.alpha() * 0.6), 6);
            }
        }

        for p in state.platforms.iter().filter(|p| p.rect.overlaps(&visible)) {
            self.platform(view, p);
        }

        for cp in &state.checkpoints {
            let color = if cp.activated {
                palette::CHECKPOINT_ACTIVE
            } else {
                palette::CHECKPOINT
            };
            let pole = view.rect_to_screen(Rect::new(cp.pos.x - 3.0, cp.pos.y - 60.0, 6.0, 60.0));
            shapes::quad(&mut self.vertices, pole, rgba(palette::WHITE, 0.8));
            let flag = view.rect_to_screen(Rect::new(cp.pos.x + 3.0, cp.pos.y - 60.0, 24.0, 16.0));
            shapes::quad(&mut self.vertices, flag, rgba(color, 1.0));
        }

        let exit = state.exit;
        let glow = if state.boss_alive() { 0.3 } else { 0.9 };
        let radius = exit.w.min(exit.h) / 2.0 * view.zoom;
        shapes::ring(
            &mut self.vertices,
            view.to_screen(exit.center()),
            radius * 0.6,
            radius,
            rgba(view.theme.platform_top, glow),
            24,
        );

        for c in state.coins.iter().filter(|c| !c.collected) {
            let bob = (c.anim * 2.0).sin() * 3.0;
            let at = view.to_screen(c.pos + Vec2::new(0.0, bob));
            let color = match c.kind {
                CoinKind::Coin => palette::GOLD,
                CoinKind::Gold => palette::COIN_GOLD,
            };
            shapes::circle(&mut self.vertices, at, 8.0 * view.zoom, rgba(color, 1.0), 12);
        }

        for e in state.enemies.iter().filter(|e| e.alive && e.rect.is_valid()) {
            let color = match e.kind {
                EnemyKind::Patrol => palette::ENEMY,
                EnemyKind::Flying { .. } => palette::ENEMY_FLYING,
                EnemyKind::Boss(_) => palette::BOSS,
            };
            let color = if e.hit_timer > 0.0 { palette::WHITE } else { color };
            let r = view.rect_to_screen(e.rect);
            shapes::quad(&mut self.vertices, r, rgba(color, 1.0));
            if e.is_boss() && e.max_health > 0 {
                let frac = e.health as f32 / e.max_health as f32;
                let bar = Rect::new(r.x, r.y - 10.0, r.w, 5.0);
                shapes::quad(&mut self.vertices, bar, rgba(palette::WHITE, 0.3));
                shapes::quad(
                    &mut self.vertices,
                    Rect::new(bar.x, bar.y, bar.w * frac, bar.h),
                    rgba(palette::RUBY, 1.0),
                );
            }
        }

        for pr in &state.projectiles {
            let color = match pr.source {
                ProjectileSource::Player => palette::PROJECTILE,
                ProjectileSource::Enemy => palette::RUBY,
            };
            let at = view.to_screen(pr.pos);
            let r = pr.radius * view.zoom;
            shapes::circle(&mut self.vertices, at, r, rgba(color, 0.9), 16);
            shapes::ring(&mut self.vertices, at, r, r * 1.3, rgba(color, 0.3), 16);
        }

        self.player(view);

        for p in &state.particles {
            let at = view.to_screen(p.pos);
            shapes::circle(&mut self.vertices, at, p.size * view.zoom, rgba(p.color, p.alpha()), 6);
        }
    }
}
