//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed-size ticks only (one tick per rendered frame)
//! - No RNG
//! - Stable iteration order (level-data order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{rects_intersect, Rect};
pub use level::{dungeon_level, BatSpawn, Level, LevelError, Platform, PlatformKind};
pub use snapshot::RenderSnapshot;
pub use state::{Bat, Camera, Chest, GameEvent, GameState, Phase, Player, ResetCause};
pub use tick::{tick, TickInput};
