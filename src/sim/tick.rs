//! Per-frame simulation tick
//!
//! One call advances the whole world by one frame: player physics and
//! platform resolution, bat patrols and lethal overlap, then the follow
//! camera. All state mutation happens here and in the `GameState` helpers
//! this calls.
//!
//! Position integrates by a plain Euler step before collision correction, so
//! a fast enough fall can pass clean through a one-block platform between
//! ticks. That is inherited arcade behavior, kept on purpose.

use glam::Vec2;

use super::collision::{ceiling_snap, landing_snap, rects_intersect, side_clamp};
use super::state::{GameEvent, GameState, ResetCause};
use crate::consts::{
    CAMERA_SMOOTHING, GRAVITY, JUMP_FORCE, LAVA_SURFACE_Y, LEVEL_HEIGHT, LEVEL_WIDTH, MOVE_SPEED,
    PLAYER_SIZE, VIEW_HEIGHT, VIEW_WIDTH,
};

/// Held-button snapshot for a single tick
///
/// The host event system updates a held-key set between frames; the
/// simulation treats the snapshot as immutable for the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    // Player updates are suspended once the chest is open
    if !state.won() {
        step_player(state, input);
    }

    step_bats(state);
    step_camera(state);
}

/// Player physics and platform resolution
fn step_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    // Non-finite values must never reach the platform math or the
    // renderer; treated as a death, not an error
    if !player.pos.is_finite() || !player.vel.is_finite() {
        log::warn!("non-finite player state, resetting");
        state.reset(ResetCause::InvalidState);
        return;
    }

    // Instantaneous horizontal speed, no accel curve
    player.vel.x = if input.left {
        -MOVE_SPEED
    } else if input.right {
        MOVE_SPEED
    } else {
        0.0
    };

    // Jump fires on the rising edge of the input while grounded; holding
    // the button across a landing does not re-trigger it
    let jump_pressed = input.jump && !player.jump_was_down;
    player.jump_was_down = input.jump;
    if jump_pressed && !player.airborne {
        player.vel.y = JUMP_FORCE;
        player.airborne = true;
    }

    // Gravity accumulates every tick, even while standing; the landing
    // check below re-zeroes it
    player.vel.y += GRAVITY;

    // Euler step
    player.pos += player.vel;

    // Lava plane: short-circuits the platform loop entirely
    if player.pos.y + PLAYER_SIZE > LAVA_SURFACE_Y {
        state.reset(ResetCause::Lava);
        return;
    }

    // Pessimistically airborne; only a landing this tick clears it. A
    // standing player is re-confirmed grounded every tick by the landing
    // band re-triggering.
    let was_airborne = player.airborne;
    player.airborne = true;

    for plat in state.level.platforms() {
        let body = plat.body();
        let rect = player.rect();

        if let Some(snap_y) = landing_snap(&rect, player.vel.y, &body) {
            let impact = player.vel.y;
            player.airborne = false;
            player.vel.y = 0.0;
            player.pos.y = snap_y;
            if was_airborne {
                state.events.push(GameEvent::Landed { impact });
            }
            if plat.kind.is_dangerous() {
                state.reset(ResetCause::MagmaPlatform);
                return;
            }
        }

        let rect = player.rect();
        if let Some(snap_y) = ceiling_snap(&rect, player.vel.y, &body) {
            player.vel.y = 0.0;
            player.pos.y = snap_y;
        }

        let rect = player.rect();
        if let Some(clamp_x) = side_clamp(&rect, player.vel.x, &body) {
            player.pos.x = clamp_x;
        }
    }

    // Chest overlap while closed wins the run
    if !state.chest.open && rects_intersect(&state.player.rect(), &state.chest.rect) {
        state.win();
        return;
    }

    // World bounds
    let player = &mut state.player;
    player.pos.x = player.pos.x.clamp(0.0, LEVEL_WIDTH - PLAYER_SIZE);
    if player.pos.y > VIEW_HEIGHT {
        // Stricter fallback for falls that somehow pass the lava plane
        state.reset(ResetCause::FellOffLevel);
    }
}

/// Bat patrols and lethal overlap
///
/// The oscillator reflects after the step, so a bat can overshoot its bound
/// by up to one step before turning around. Overlap resets the run
/// unconditionally, even while `Won`.
fn step_bats(state: &mut GameState) {
    for bat in &mut state.bats {
        bat.pos.y += bat.speed_y;
        if (bat.pos.y - bat.start_y).abs() > bat.range {
            bat.speed_y = -bat.speed_y;
        }
    }

    let player_rect = state.player.rect();
    let hit = state.bats.iter().any(|bat| rects_intersect(&player_rect, &bat.rect()));
    if hit {
        state.reset(ResetCause::Bat);
    }
}

/// First-order low-pass follow camera, clamped to the level box
fn step_camera(state: &mut GameState) {
    let cam = &mut state.camera;
    cam.target = state.player.pos - Vec2::new(VIEW_WIDTH, VIEW_HEIGHT) / 2.0;
    cam.pos += (cam.target - cam.pos) * CAMERA_SMOOTHING;
    cam.pos.x = cam.pos.x.clamp(0.0, LEVEL_WIDTH - VIEW_WIDTH);
    cam.pos.y = cam.pos.y.clamp(0.0, LEVEL_HEIGHT - VIEW_HEIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BLOCK_SIZE, SPAWN_X, SPAWN_Y};
    use crate::sim::level::{dungeon_level, BatSpawn, Level, Platform, PlatformKind};
    use crate::sim::state::Phase;

    /// Small level: a walkable floor plus a distant chest platform so the
    /// chest stays out of the way of the scenario under test.
    fn floor_level(extra: Vec<Platform>, bats: Vec<BatSpawn>) -> Level {
        let mut platforms = vec![Platform::new(0.0, 400.0, 104.0, PlatformKind::Spawn)];
        platforms.extend(extra);
        platforms.push(Platform::new(2790.0, 400.0, 104.0, PlatformKind::Brick));
        Level::new(platforms, bats).unwrap()
    }

    fn run_ticks(state: &mut GameState, input: TickInput, n: usize) {
        for _ in 0..n {
            tick(state, &input);
        }
    }

    #[test]
    fn test_freefall_lands_on_spawn_platform() {
        let mut state = GameState::new(dungeon_level());
        run_ticks(&mut state, TickInput::default(), 60);
        // Exactly on the spawn platform top, grounded, vertical rest
        assert_eq!(state.player.pos.y, 400.0 - 16.0);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(!state.player.airborne);
        assert_eq!(state.player.pos.x, SPAWN_X);
    }

    #[test]
    fn test_steady_stance_never_flickers_airborne() {
        let mut state = GameState::new(dungeon_level());
        run_ticks(&mut state, TickInput::default(), 60);
        assert!(!state.player.airborne);
        // The landing band must re-confirm grounding every single tick
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            assert!(!state.player.airborne);
            assert_eq!(state.player.pos.y, 400.0 - 16.0);
        }
    }

    #[test]
    fn test_landed_event_fires_once() {
        let mut state = GameState::new(dungeon_level());
        let mut landings = 0;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            landings += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Landed { .. }))
                .count();
        }
        assert_eq!(landings, 1);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut state = GameState::new(dungeon_level());
        run_ticks(&mut state, TickInput::default(), 60);

        let held = TickInput { jump: true, ..TickInput::default() };
        tick(&mut state, &held);
        assert!(state.player.airborne);
        assert_eq!(state.player.vel.y, JUMP_FORCE + GRAVITY);

        // Hold jump through the whole arc and past the landing: no bounce
        let mut landed_tick = None;
        for i in 0..120 {
            tick(&mut state, &held);
            if !state.player.airborne {
                landed_tick = Some(i);
                break;
            }
        }
        assert!(landed_tick.is_some(), "player should land again");
        run_ticks(&mut state, held, 5);
        assert!(!state.player.airborne, "held jump must not re-trigger");

        // Release, press again: jumps
        tick(&mut state, &TickInput::default());
        tick(&mut state, &held);
        assert!(state.player.airborne);
    }

    #[test]
    fn test_double_jump_is_a_noop() {
        let mut state = GameState::new(dungeon_level());
        run_ticks(&mut state, TickInput::default(), 60);

        let held = TickInput { jump: true, ..TickInput::default() };
        tick(&mut state, &held);
        let vy_after_jump = state.player.vel.y;
        // Release and press again mid-air
        tick(&mut state, &TickInput::default());
        tick(&mut state, &held);
        // Velocity followed gravity only; no second impulse
        assert_eq!(state.player.vel.y, vy_after_jump + 2.0 * GRAVITY);
    }

    #[test]
    fn test_walk_into_magma_resets() {
        // Magma flush against the spawn floor at the same height
        let level = floor_level(
            vec![Platform::new(104.0, 400.0, 64.0, PlatformKind::Magma)],
            vec![],
        );
        let mut state = GameState::new(level);
        run_ticks(&mut state, TickInput::default(), 60);

        let right = TickInput { right: true, ..TickInput::default() };
        let mut reset_seen = false;
        for _ in 0..60 {
            tick(&mut state, &right);
            if state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Respawned(ResetCause::MagmaPlatform)))
            {
                reset_seen = true;
                // Reset lands the player back at spawn within the same tick
                assert_eq!(state.player.pos, Vec2::new(SPAWN_X, SPAWN_Y));
                assert_eq!(state.player.vel, Vec2::ZERO);
                break;
            }
        }
        assert!(reset_seen, "walking onto magma must reset");
    }

    #[test]
    fn test_side_clamp_stops_player_at_wall() {
        // Platform 20px above the floor surface: too high for the landing
        // band to step onto, low enough for the side band to engage
        let level = floor_level(
            vec![Platform::new(104.0, 400.0 - 20.0, 64.0, PlatformKind::Brick)],
            vec![],
        );
        let mut state = GameState::new(level);
        run_ticks(&mut state, TickInput::default(), 60);

        let right = TickInput { right: true, ..TickInput::default() };
        run_ticks(&mut state, right, 30);
        // Flush against the wall, not inside it
        assert_eq!(state.player.pos.x, 104.0 - 16.0);
    }

    #[test]
    fn test_ceiling_stops_ascent() {
        // The overhang sits clear of the spawn drop so the settle lands on
        // the floor, not on top of it; the player walks beneath, then jumps
        let level = floor_level(
            vec![
                Platform::new(104.0, 400.0, 96.0, PlatformKind::Brick),
                Platform::new(120.0, 400.0 - 40.0, 64.0, PlatformKind::Brick),
            ],
            vec![],
        );
        let mut state = GameState::new(level);
        run_ticks(&mut state, TickInput::default(), 60);
        assert_eq!(state.player.pos.y, 400.0 - 16.0, "settle must land on the floor");

        let right = TickInput { right: true, ..TickInput::default() };
        run_ticks(&mut state, right, 16);
        assert_eq!(state.player.pos.x, 130.0);
        assert!(!state.player.airborne, "player stands under the overhang");

        let jump = TickInput { jump: true, ..TickInput::default() };
        tick(&mut state, &jump);
        let mut bonked = false;
        for _ in 0..10 {
            tick(&mut state, &jump);
            if state.player.pos.y == 400.0 - 40.0 + BLOCK_SIZE {
                bonked = true;
                break;
            }
        }
        assert!(bonked, "head should snap below the overhang");
    }

    #[test]
    fn test_lava_contact_resets() {
        let level = floor_level(vec![], vec![]);
        let mut state = GameState::new(level);
        // Drop the player straight at the lava plane
        state.player.pos = Vec2::new(500.0, LAVA_SURFACE_Y - 10.0);
        state.player.vel.y = 12.0;
        tick(&mut state, &TickInput::default());
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Respawned(ResetCause::Lava))));
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, SPAWN_Y));
    }

    #[test]
    fn test_chest_overlap_wins_and_freezes_player() {
        let level = dungeon_level();
        let chest = level.chest_rect();
        let mut state = GameState::new(level);
        // Stand on the final platform just left of the chest
        state.player.pos = Vec2::new(chest.x - 20.0, 400.0 - 16.0);
        state.player.vel = Vec2::ZERO;
        state.player.airborne = false;

        let right = TickInput { right: true, ..TickInput::default() };
        let mut won_tick = None;
        for i in 0..20 {
            tick(&mut state, &right);
            if state.won() {
                won_tick = Some(i);
                break;
            }
        }
        assert!(won_tick.is_some(), "walking into the chest must win");
        assert!(state.chest.open);

        // Subsequent ticks leave the player untouched
        let frozen = state.player;
        run_ticks(&mut state, right, 30);
        assert_eq!(state.player, frozen);
    }

    #[test]
    fn test_bat_reflects_after_overshoot() {
        let spawn = BatSpawn {
            x: 500.0,
            y: 200.0,
            width: 16.0,
            height: 12.0,
            speed: 3.0,
            range: 10.0,
        };
        let level = floor_level(vec![], vec![spawn]);
        let mut state = GameState::new(level);

        let mut max_y = f32::MIN;
        let mut min_y = f32::MAX;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
            max_y = max_y.max(state.bats[0].pos.y);
            min_y = min_y.min(state.bats[0].pos.y);
        }
        // Reflecting oscillator: bounded by range plus one step of overshoot
        assert!(max_y > 200.0 + 10.0, "bat must overshoot before reflecting");
        assert!(max_y <= 200.0 + 10.0 + 3.0);
        assert!(min_y >= 200.0 - 10.0 - 3.0);
    }

    #[test]
    fn test_bat_sign_flips_past_bound() {
        let spawn = BatSpawn {
            x: 500.0,
            y: 200.0,
            width: 16.0,
            height: 12.0,
            speed: 2.0,
            range: 5.0,
        };
        let level = floor_level(vec![], vec![spawn]);
        let mut state = GameState::new(level);
        // Step until the bat exceeds the upper bound, then confirm descent
        let mut flipped = false;
        let mut prev_y = state.bats[0].pos.y;
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
            let bat = &state.bats[0];
            if flipped {
                assert!(bat.pos.y < prev_y, "y must decrease after reflection");
                break;
            }
            if (bat.pos.y - bat.start_y).abs() > 5.0 {
                assert!(bat.speed_y < 0.0, "speed sign flips the tick the bound is exceeded");
                flipped = true;
            }
            prev_y = bat.pos.y;
        }
        assert!(flipped);
    }

    #[test]
    fn test_bat_hit_resets_even_when_won() {
        let spawn = BatSpawn {
            x: SPAWN_X,
            y: SPAWN_Y,
            width: 16.0,
            height: 12.0,
            speed: 0.0,
            range: 100.0,
        };
        let level = floor_level(vec![], vec![spawn]);
        let mut state = GameState::new(level);
        state.win();
        assert_eq!(state.phase, Phase::Won);

        tick(&mut state, &TickInput::default());
        // Bat overlap fires regardless of the win flag
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Respawned(ResetCause::Bat))));
        assert_eq!(state.phase, Phase::Running);
        assert!(!state.chest.open);
    }

    #[test]
    fn test_world_bounds_clamp_x() {
        let level = floor_level(vec![], vec![]);
        let mut state = GameState::new(level);
        run_ticks(&mut state, TickInput::default(), 60);
        let left = TickInput { left: true, ..TickInput::default() };
        run_ticks(&mut state, left, 30);
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_non_finite_state_resets() {
        let level = floor_level(vec![], vec![]);
        let mut state = GameState::new(level);
        state.player.pos.x = f32::NAN;
        tick(&mut state, &TickInput::default());
        assert!(state.player.pos.is_finite());
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, SPAWN_Y));
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Respawned(ResetCause::InvalidState))));
    }

    #[test]
    fn test_camera_converges_and_clamps() {
        let mut state = GameState::new(dungeon_level());
        run_ticks(&mut state, TickInput::default(), 60);

        // Stationary player: distance to target shrinks monotonically
        let mut prev = (state.camera.target - state.camera.pos).length();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
            let dist = (state.camera.target - state.camera.pos).length();
            assert!(dist <= prev + 1e-3);
            prev = dist;
        }
        // And the clamp always holds
        assert!(state.camera.pos.x >= 0.0);
        assert!(state.camera.pos.x <= LEVEL_WIDTH - VIEW_WIDTH);
        assert_eq!(state.camera.pos.y, 0.0);
    }
}
