//! Game state and core simulation types
//!
//! All mutable state is owned by the `GameState` aggregate; the tick
//! function is its only mutator. Cosmetic animation state lives outside the
//! simulation (see `crate::anim`).

use glam::Vec2;

use super::collision::Rect;
use super::level::{BatSpawn, Level, LevelError};
use crate::consts::{PLAYER_SIZE, SPAWN_X, SPAWN_Y, VIEW_HEIGHT, VIEW_WIDTH};

/// Current phase of gameplay
///
/// There is no Dead phase: every lethal contact resolves synchronously into
/// a reset back to the initial `Running` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Player is traversing the level
    Running,
    /// Chest reached; player updates are suspended until a reset
    Won,
}

/// What killed the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    Lava,
    MagmaPlatform,
    Bat,
    FellOffLevel,
    /// Defensive reset after non-finite physics state
    InvalidState,
}

/// Per-tick events for the shell and the animation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Chest reached and opened
    Won,
    /// Player was reset to spawn
    Respawned(ResetCause),
    /// Player landed on a platform; impact is the vertical speed absorbed
    Landed { impact: f32 },
}

/// The player-controlled character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// No supporting platform was found in the current tick. Re-derived
    /// every tick by the landing check, not carried across ticks.
    pub airborne: bool,
    /// Latch for the jump edge trigger: a jump fires only on a false→true
    /// transition of the jump input while grounded.
    pub jump_was_down: bool,
}

impl Player {
    fn at_spawn() -> Self {
        Self {
            pos: Vec2::new(SPAWN_X, SPAWN_Y),
            vel: Vec2::ZERO,
            airborne: true,
            jump_was_down: false,
        }
    }

    /// The player's bounding box (square, `PLAYER_SIZE` a side)
    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, PLAYER_SIZE, PLAYER_SIZE)
    }
}

/// A patrolling bat: a reflecting vertical oscillator, lethal on contact
#[derive(Debug, Clone, Copy)]
pub struct Bat {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Signed vertical speed per tick; sign flips at the patrol bounds
    pub speed_y: f32,
    /// Patrol origin; the bat stays within `start_y ± range` plus at most
    /// one step of overshoot before reflecting
    pub start_y: f32,
    pub range: f32,
}

impl Bat {
    fn from_spawn(spawn: &BatSpawn) -> Self {
        Self {
            pos: Vec2::new(spawn.x, spawn.y),
            width: spawn.width,
            height: spawn.height,
            speed_y: spawn.speed,
            start_y: spawn.y,
            range: spawn.range,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, self.width, self.height)
    }
}

/// The win chest at the end of the level
#[derive(Debug, Clone, Copy)]
pub struct Chest {
    pub rect: Rect,
    pub open: bool,
}

/// Follow camera: eases toward a player-centered target, clamped to the
/// level box. Derived purely from player position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub pos: Vec2,
    pub target: Vec2,
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: Level,
    pub phase: Phase,
    pub player: Player,
    pub bats: Vec<Bat>,
    pub chest: Chest,
    pub camera: Camera,
    /// Tick counter since creation (survives resets)
    pub time_ticks: u64,
    /// Events emitted by the most recent tick; cleared at the start of the
    /// next one
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game over a validated level
    pub fn new(level: Level) -> Self {
        let bats = level.bats().iter().map(Bat::from_spawn).collect();
        let chest = Chest { rect: level.chest_rect(), open: false };
        Self {
            level,
            phase: Phase::Running,
            player: Player::at_spawn(),
            bats,
            chest,
            camera: Camera::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Create a game from the JSON level wire format
    pub fn from_level_json(json: &str) -> Result<Self, LevelError> {
        Ok(Self::new(Level::from_json(json)?))
    }

    /// Synchronous death: back to the canonical spawn configuration.
    ///
    /// Idempotent - resetting twice yields the same state as resetting once.
    /// Bats keep patrolling; they are scenery hazards, not per-run state.
    pub fn reset(&mut self, cause: ResetCause) {
        self.player = Player::at_spawn();
        self.chest.open = false;
        self.phase = Phase::Running;
        self.events.push(GameEvent::Respawned(cause));
        log::debug!("reset: {:?}", cause);
    }

    /// Chest reached: open it and suspend player updates
    pub fn win(&mut self) {
        self.chest.open = true;
        self.phase = Phase::Won;
        self.events.push(GameEvent::Won);
        log::info!("level complete at tick {}", self.time_ticks);
    }

    pub fn won(&self) -> bool {
        self.phase == Phase::Won
    }

    /// Viewport size the camera centers within
    pub fn viewport() -> Vec2 {
        Vec2::new(VIEW_WIDTH, VIEW_HEIGHT)
    }
}
