//! Collision primitives for axis-aligned platformer geometry
//!
//! Every check in the game is an AABB test: a full box-overlap test for
//! lethal contacts (bats, the chest), and one-sided "band" tests for platform
//! surfaces. The bands reproduce the tolerance windows of the classic
//! formulation: a landing snaps the player onto a top the bottom edge has
//! already passed, within a small slack, rather than sweeping the motion.

use glam::Vec2;

use crate::consts::{BLOCK_SIZE, LANDING_SLACK, SIDE_SLACK};

/// Axis-aligned rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos(pos: Vec2, w: f32, h: f32) -> Self {
        Self { x: pos.x, y: pos.y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Strict AABB overlap (shared edges do not count)
#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Horizontal span overlap between the player box and a platform
#[inline]
fn spans_overlap_x(player: &Rect, plat: &Rect) -> bool {
    player.right() > plat.x && player.x < plat.right()
}

/// Vertical overlap between the player box and the platform's solid body
/// (one block tall), used as the precondition for side checks.
#[inline]
fn overlaps_body_y(player: &Rect, plat: &Rect) -> bool {
    player.bottom() > plat.y && player.y < plat.y + BLOCK_SIZE
}

/// Landing check: descending (or stationary) player whose bottom edge lies
/// within the tolerance band below the platform top. Returns the snapped
/// `y` for the player box if it should land.
pub fn landing_snap(player: &Rect, vy: f32, plat: &Rect) -> Option<f32> {
    if vy >= 0.0
        && spans_overlap_x(player, plat)
        && player.bottom() >= plat.y
        && player.bottom() <= plat.y + BLOCK_SIZE + LANDING_SLACK
    {
        Some(plat.y - player.h)
    } else {
        None
    }
}

/// Ceiling check: ascending player whose top edge is within one block of the
/// platform underside. Returns the snapped `y` below the platform.
pub fn ceiling_snap(player: &Rect, vy: f32, plat: &Rect) -> Option<f32> {
    if vy < 0.0
        && spans_overlap_x(player, plat)
        && player.y <= plat.y + BLOCK_SIZE
        && player.y >= plat.y
    {
        Some(plat.y + BLOCK_SIZE)
    } else {
        None
    }
}

/// Side check: player moving horizontally whose leading edge is within the
/// slack of the platform's facing edge at overlapping height. Returns the
/// clamped `x` for the player box.
pub fn side_clamp(player: &Rect, vx: f32, plat: &Rect) -> Option<f32> {
    if vx == 0.0 || !overlaps_body_y(player, plat) {
        return None;
    }
    if vx > 0.0 && player.right() >= plat.x && player.right() <= plat.x + SIDE_SLACK {
        // Running into the platform's left face
        Some(plat.x - player.w)
    } else if vx < 0.0 && player.x <= plat.right() && player.x >= plat.right() - SIDE_SLACK {
        // Running into the platform's right face
        Some(plat.right())
    } else {
        None
    }
}
