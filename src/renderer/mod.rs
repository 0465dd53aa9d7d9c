//! Canvas-2D rendering module
//!
//! Draws the dungeon scene from a `RenderSnapshot` plus the cosmetic
//! animation state. Everything here is world-to-screen blitting; no game
//! decisions are made at render time. Decorative randomness (torch flicker
//! phases, lava bubbles) comes from a seeded PCG so frames are reproducible
//! for a given seed.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::anim::AnimState;
use crate::consts::{BLOCK_SIZE, LAVA_SURFACE_Y, LEVEL_WIDTH, VIEW_HEIGHT, VIEW_WIDTH};
use crate::sim::{PlatformKind, Rect, RenderSnapshot};

/// Wall pattern tile, dark/light stone
const WALL_PATTERN: [[u8; 8]; 8] = [
    [1, 1, 0, 1, 1, 0, 1, 1],
    [1, 0, 1, 1, 0, 1, 1, 0],
    [0, 1, 1, 0, 1, 1, 0, 1],
    [1, 1, 0, 1, 1, 0, 1, 1],
    [1, 0, 1, 1, 0, 1, 1, 0],
    [0, 1, 1, 0, 1, 1, 0, 1],
    [1, 1, 0, 1, 1, 0, 1, 1],
    [1, 0, 1, 1, 0, 1, 1, 0],
];

/// Per-kind alternating block colors, matching the level art
fn platform_colors(kind: PlatformKind) -> [&'static str; 2] {
    match kind {
        PlatformKind::Spawn => ["#2ecc71", "#27ae60"],
        PlatformKind::Brick => ["#666666", "#888888"],
        PlatformKind::Magma => ["#ff4400", "#ff8800"],
    }
}

struct Torch {
    x: f32,
    flicker_offset: f32,
}

struct LavaBubble {
    x: f32,
    y: f32,
    size: f32,
    speed: f32,
    offset: f32,
}

/// Owns the 2D context and the decorative background state
pub struct RenderState {
    ctx: CanvasRenderingContext2d,
    torches: Vec<Torch>,
    bubbles: Vec<LavaBubble>,
    lava_offset: f32,
    frame: u64,
}

impl RenderState {
    pub fn new(canvas: &HtmlCanvasElement, seed: u64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let torches = (0..)
            .map(|i| 200.0 + i as f32 * 400.0)
            .take_while(|x| *x < LEVEL_WIDTH + 100.0)
            .map(|x| Torch { x, flicker_offset: rng.random_range(0.0..TAU) })
            .collect();
        let bubbles = (0..20)
            .map(|_| LavaBubble {
                x: rng.random_range(0.0..LEVEL_WIDTH),
                y: rng.random_range(0.0..50.0),
                size: rng.random_range(5.0..15.0),
                speed: rng.random_range(0.2..0.7),
                offset: rng.random_range(0.0..TAU),
            })
            .collect();

        Ok(Self { ctx, torches, bubbles, lava_offset: 0.0, frame: 0 })
    }

    /// Draw one frame
    pub fn render(&mut self, snap: &RenderSnapshot, anim: &AnimState) {
        self.frame += 1;
        self.lava_offset += 0.02;

        self.ctx.clear_rect(0.0, 0.0, VIEW_WIDTH as f64, VIEW_HEIGHT as f64);
        self.draw_background(snap.camera.x, snap.camera.y);
        for (body, kind) in &snap.platforms {
            self.draw_platform(body, *kind, snap.camera.x, snap.camera.y);
        }
        for (i, bat) in snap.bats.iter().enumerate() {
            let phase = anim.wings.get(i).map_or(0.0, |w| w.phase);
            self.draw_bat(bat, phase, snap.camera.x, snap.camera.y);
        }
        self.draw_chest(&snap.chest, snap.chest_open, snap.camera.x, snap.camera.y);
        self.draw_player(snap, anim);
    }

    fn fill(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn draw_background(&mut self, cam_x: f32, cam_y: f32) {
        let ctx = &self.ctx;

        // Ceiling band
        self.fill("#2c1810");
        ctx.fill_rect(0.0, 0.0, VIEW_WIDTH as f64, 100.0);

        // Stone wall, pattern anchored to world space so it scrolls
        let tile = 8.0f32;
        let mut x = 0.0f32;
        while x < VIEW_WIDTH {
            let mut y = 100.0f32;
            while y < VIEW_HEIGHT {
                let px = (((x + cam_x) / tile).floor() as i64).rem_euclid(8) as usize;
                let py = (((y + cam_y) / tile).floor() as i64).rem_euclid(8) as usize;
                let dark = WALL_PATTERN[py][px] == 1;
                self.fill(if dark { "#3c2820" } else { "#4c3830" });
                ctx.fill_rect(x as f64, y as f64, tile as f64, tile as f64);
                y += tile;
            }
            x += tile;
        }

        self.draw_torches(cam_x);
        self.draw_lava(cam_x);
    }

    fn draw_torches(&self, cam_x: f32) {
        let ctx = &self.ctx;
        let t = self.frame as f32 * 0.08;
        for torch in &self.torches {
            let sx = (torch.x - cam_x) as f64;
            if !(-100.0..=(VIEW_WIDTH as f64 + 100.0)).contains(&sx) {
                continue;
            }
            let y = 100.0;

            self.fill("#8B4513");
            ctx.fill_rect(sx - 4.0, y, 8.0, 20.0);

            let flicker = ((t + torch.flicker_offset).sin() * 0.2 + 0.8) as f64;
            let flame_h = 30.0 * flicker;

            if let Ok(glow) = ctx.create_radial_gradient(sx, y, 0.0, sx, y, 40.0) {
                let _ = glow.add_color_stop(0.0, "rgba(255, 200, 50, 0.3)");
                let _ = glow.add_color_stop(1.0, "rgba(255, 100, 0, 0)");
                ctx.set_fill_style_canvas_gradient(&glow);
                ctx.fill_rect(sx - 40.0, y - 40.0, 80.0, 80.0);
            }

            self.fill("#ff6b1a");
            ctx.begin_path();
            ctx.move_to(sx - 4.0, y);
            ctx.line_to(sx + 4.0, y);
            ctx.line_to(sx, y - flame_h);
            ctx.close_path();
            ctx.fill();

            self.fill("#ffd700");
            ctx.begin_path();
            ctx.move_to(sx - 2.0, y);
            ctx.line_to(sx + 2.0, y);
            ctx.line_to(sx, y - flame_h * 0.7);
            ctx.close_path();
            ctx.fill();
        }
    }

    fn draw_lava(&mut self, cam_x: f32) {
        let ctx = &self.ctx;
        let base_y = (VIEW_HEIGHT - 50.0) as f64;
        let surface_y = LAVA_SURFACE_Y as f64;

        // Surface layer with a gradient and a rolling wave profile
        let grad = ctx.create_linear_gradient(0.0, surface_y, 0.0, base_y);
        let _ = grad.add_color_stop(0.0, "#ff8800");
        let _ = grad.add_color_stop(1.0, "#ff4400");
        ctx.set_fill_style_canvas_gradient(&grad);
        ctx.fill_rect(0.0, surface_y, VIEW_WIDTH as f64, 20.0);
        self.fill("#ffaa00");
        let mut x = 0.0f32;
        while x < VIEW_WIDTH {
            let wx = x + cam_x;
            let h = ((wx + self.lava_offset * 150.0) * 0.15).sin() * 3.0
                + ((wx - self.lava_offset * 75.0) * 0.08).sin() * 2.0;
            ctx.fill_rect(x as f64, surface_y + h as f64, 3.0, (20.0 - h) as f64);
            x += 3.0;
        }

        // Base layer
        let grad = ctx.create_linear_gradient(0.0, base_y, 0.0, VIEW_HEIGHT as f64);
        let _ = grad.add_color_stop(0.0, "#ff4400");
        let _ = grad.add_color_stop(1.0, "#ff8800");
        ctx.set_fill_style_canvas_gradient(&grad);
        ctx.fill_rect(0.0, base_y, VIEW_WIDTH as f64, 50.0);
        self.fill("#ff6600");
        let mut x = 0.0f32;
        while x < VIEW_WIDTH {
            let wx = x + cam_x;
            let h = ((wx + self.lava_offset * 100.0) * 0.1).sin() * 5.0
                + ((wx - self.lava_offset * 50.0) * 0.05).sin() * 3.0;
            ctx.fill_rect(x as f64, base_y + h as f64, 4.0, (50.0 - h) as f64);
            x += 4.0;
        }

        // Bubbles rise through the surface layer and respawn at the bottom.
        // `bubble.y` is the depth below the lava surface; negative means the
        // bubble has broken through.
        let t = self.frame as f32 * 0.016;
        for bubble in &mut self.bubbles {
            let sx = (bubble.x - cam_x) as f64;
            if (-50.0..=(VIEW_WIDTH as f64 + 50.0)).contains(&sx) {
                let by = surface_y + bubble.y as f64 + ((t + bubble.offset).sin() * 5.0) as f64;
                ctx.set_fill_style_str("#ff8800");
                ctx.begin_path();
                let _ = ctx.arc(sx, by, bubble.size as f64, 0.0, TAU as f64);
                ctx.fill();
                ctx.set_fill_style_str("#ffaa00");
                ctx.begin_path();
                let _ = ctx.arc(
                    sx - bubble.size as f64 * 0.3,
                    by - bubble.size as f64 * 0.3,
                    bubble.size as f64 * 0.3,
                    0.0,
                    TAU as f64,
                );
                ctx.fill();
            }
            bubble.y -= bubble.speed;
            if bubble.y < -bubble.size {
                bubble.y = 70.0;
                bubble.x = (bubble.x + 977.0) % LEVEL_WIDTH;
            }
        }
    }

    fn draw_platform(&self, body: &Rect, kind: PlatformKind, cam_x: f32, cam_y: f32) {
        let colors = platform_colors(kind);
        let mut i = 0.0f32;
        while i < body.w {
            let color = colors[((i / BLOCK_SIZE) as usize) % 2];
            self.fill(color);
            self.ctx.fill_rect(
                (body.x + i - cam_x) as f64,
                (body.y - cam_y) as f64,
                BLOCK_SIZE as f64,
                BLOCK_SIZE as f64,
            );
            i += BLOCK_SIZE;
        }
    }

    fn draw_bat(&self, bat: &Rect, wing_phase: f32, cam_x: f32, cam_y: f32) {
        let ctx = &self.ctx;
        let sx = (bat.x - cam_x) as f64;
        let sy = (bat.y - cam_y) as f64;
        if !(-50.0..=(VIEW_WIDTH as f64 + 50.0)).contains(&sx) {
            return;
        }
        let cx = sx + bat.w as f64 / 2.0;
        let cy = sy + bat.h as f64 / 2.0;

        self.fill("#333333");
        ctx.begin_path();
        let _ = ctx.ellipse(cx, cy, bat.w as f64 / 2.0, bat.h as f64 / 2.0, 0.0, 0.0, TAU as f64);
        ctx.fill();

        let flap = (wing_phase.sin() * 0.5) as f64;
        self.fill("#222222");
        for dir in [-1.0f64, 1.0] {
            ctx.save();
            let _ = ctx.translate(cx, cy);
            let _ = ctx.rotate(flap * dir);
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);
            ctx.quadratic_curve_to(15.0 * dir, -10.0, 20.0 * dir, 0.0);
            ctx.quadratic_curve_to(15.0 * dir, 10.0, 0.0, 0.0);
            ctx.fill();
            ctx.restore();
        }

        self.fill("red");
        ctx.begin_path();
        let _ = ctx.arc(cx - 2.0, cy - 1.0, 1.0, 0.0, TAU as f64);
        ctx.fill();
        ctx.begin_path();
        let _ = ctx.arc(cx + 2.0, cy - 1.0, 1.0, 0.0, TAU as f64);
        ctx.fill();
    }

    fn draw_chest(&self, chest: &Rect, open: bool, cam_x: f32, cam_y: f32) {
        let ctx = &self.ctx;
        let sx = (chest.x - cam_x) as f64;
        let sy = (chest.y - cam_y) as f64;
        let w = chest.w as f64;
        let h = chest.h as f64;
        if !(-100.0..=(VIEW_WIDTH as f64 + 100.0)).contains(&sx) {
            return;
        }

        // Ground shadow
        self.fill("rgba(0, 0, 0, 0.3)");
        ctx.begin_path();
        let _ = ctx.ellipse(sx + w / 2.0, sy + h + 2.0, w / 2.0, 2.0, 0.0, 0.0, TAU as f64);
        ctx.fill();

        // Base and metal bands
        self.fill("#8B4513");
        ctx.fill_rect(sx, sy, w, h);
        self.fill("#696969");
        ctx.fill_rect(sx, sy + 6.0, w, 2.0);
        ctx.fill_rect(sx, sy + h - 8.0, w, 2.0);
        ctx.fill_rect(sx + 15.0, sy, 2.0, h);
        ctx.fill_rect(sx + w - 17.0, sy, 2.0, h);

        // Lock
        self.fill("#4A4A4A");
        ctx.fill_rect(sx + w / 2.0 - 6.0, sy + 8.0, 12.0, 8.0);

        // Lid: flat when closed, tilted back when open
        self.fill("#A0522D");
        ctx.begin_path();
        if open {
            ctx.move_to(sx - 2.0, sy - 2.0);
            ctx.line_to(sx + w + 2.0, sy - 2.0);
            ctx.line_to(sx + w - 6.0, sy - 14.0);
            ctx.line_to(sx + 6.0, sy - 14.0);
        } else {
            ctx.move_to(sx - 2.0, sy);
            ctx.line_to(sx + w + 2.0, sy);
            ctx.line_to(sx + w, sy - 6.0);
            ctx.line_to(sx, sy - 6.0);
        }
        ctx.close_path();
        ctx.fill();

        if open {
            // Treasure glow
            self.fill("#ffd700");
            ctx.fill_rect(sx + 4.0, sy + 2.0, w - 8.0, 4.0);
        }
    }

    fn draw_player(&self, snap: &RenderSnapshot, anim: &AnimState) {
        let ctx = &self.ctx;
        let p = &anim.player;
        let rect = &snap.player;
        let sx = (rect.x - snap.camera.x) as f64;
        let sy = (rect.y - snap.camera.y) as f64;
        let w = rect.w as f64;
        let h = rect.h as f64;

        let squash = (1.0 - p.squash.min(1.0)) as f64;
        let stretch = (1.0 + p.squash.min(0.2)) as f64;

        // Backpack sits behind the body
        self.fill("#8B4513");
        ctx.fill_rect(sx - 4.0, sy + h / 3.0, 10.0, 12.0);
        self.fill("#DAA520");
        ctx.fill_rect(sx - 1.0, sy + h / 3.0 + 1.0, 4.0, 2.0);

        // Body with landing squash
        self.fill("#4a90e2");
        ctx.save();
        let _ = ctx.translate(sx + w / 2.0, sy + h);
        let _ = ctx.scale(squash, stretch);
        ctx.fill_rect(-w / 2.0, -h, w, h);
        ctx.restore();

        // Eyes
        for (ex, color, r) in [
            (4.0, "white", 2.0),
            (12.0, "white", 2.0),
            (4.0, "black", 1.0),
            (12.0, "black", 1.0),
        ] {
            self.fill(color);
            ctx.begin_path();
            let _ = ctx.arc(sx + ex, sy + 4.0 * stretch, r, 0.0, TAU as f64);
            ctx.fill();
        }

        // Legs swing while running, tuck while airborne
        let leg_len = if snap.player_airborne { 8.0 * 0.7 } else { 8.0 };
        self.fill("#4a90e2");
        for (lx, sign) in [(4.0f64, 1.0f32), (12.0, -1.0)] {
            ctx.save();
            let _ = ctx.translate(sx + lx, sy + h);
            let _ = ctx.rotate(((p.leg_angle * sign).sin() * 0.4) as f64);
            ctx.fill_rect(-2.0, 0.0, 4.0, leg_len);
            ctx.fill_rect(-3.0, leg_len, 6.0, 2.0);
            ctx.restore();
        }
    }
}
