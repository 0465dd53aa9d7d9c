//! Read-only render snapshot
//!
//! Built once per tick after the simulation has settled. The renderer (and
//! the animation layer) work exclusively from this, so nothing downstream
//! can reach into mutable simulation state.

use glam::Vec2;

use super::collision::Rect;
use super::level::PlatformKind;
use super::state::GameState;

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub camera: Vec2,
    pub player: Rect,
    pub player_vel: Vec2,
    pub player_airborne: bool,
    pub platforms: Vec<(Rect, PlatformKind)>,
    pub bats: Vec<Rect>,
    pub chest: Rect,
    pub chest_open: bool,
    pub won: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            camera: state.camera.pos,
            player: state.player.rect(),
            player_vel: state.player.vel,
            player_airborne: state.player.airborne,
            platforms: state
                .level
                .platforms()
                .iter()
                .map(|p| (p.body(), p.kind))
                .collect(),
            bats: state.bats.iter().map(|b| b.rect()).collect(),
            chest: state.chest.rect,
            chest_open: state.chest.open,
            won: state.won(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::dungeon_level;
    use crate::sim::tick::{tick, TickInput};

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(dungeon_level());
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.player, state.player.rect());
        assert_eq!(snap.camera, state.camera.pos);
        assert_eq!(snap.platforms.len(), state.level.platforms().len());
        assert_eq!(snap.bats.len(), state.bats.len());
        assert!(!snap.won);
        assert!(!snap.chest_open);
    }
}
