//! Dungeon Dash - a side-scrolling dungeon platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `anim`: Cosmetic animation derived from simulation snapshots
//! - `renderer`: Canvas-2D rendering

pub mod anim;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;

/// Game configuration constants
///
/// All gameplay quantities are expressed per tick. One tick is one rendered
/// frame (the loop is driven by requestAnimationFrame), so simulation speed
/// is tied to display refresh. Because `tick` takes no delta-time argument,
/// these constants stay meaningful if a fixed-step accumulator is introduced
/// later.
pub mod consts {
    /// Side length of one platform block (pixels)
    pub const BLOCK_SIZE: f32 = 8.0;
    /// Player bounding box is square
    pub const PLAYER_SIZE: f32 = 16.0;

    /// Downward acceleration, applied every tick
    pub const GRAVITY: f32 = 0.5;
    /// Jump impulse (negative = upward)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Horizontal run speed; velocity snaps to this, no accel curve
    pub const MOVE_SPEED: f32 = 5.0;
    /// Landing tolerance band below a platform top
    pub const LANDING_SLACK: f32 = 5.0;
    /// How far past a platform edge a side check still clamps
    pub const SIDE_SLACK: f32 = 10.0;

    /// Camera low-pass factor per tick
    pub const CAMERA_SMOOTHING: f32 = 0.1;

    /// Level dimensions (world pixels)
    pub const LEVEL_WIDTH: f32 = 2900.0;
    pub const LEVEL_HEIGHT: f32 = 600.0;
    /// Viewport dimensions
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Top of the lava plane; the player's bottom edge crossing it is
    /// instant death. 50px base layer plus a 20px surface layer.
    pub const LAVA_SURFACE_Y: f32 = VIEW_HEIGHT - 70.0;

    /// Chest dimensions
    pub const CHEST_WIDTH: f32 = 40.0;
    pub const CHEST_HEIGHT: f32 = 20.0;

    /// Player spawn point
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_Y: f32 = 300.0;
}
