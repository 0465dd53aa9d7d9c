//! Cosmetic animation state
//!
//! A pure-presentation layer derived from render snapshots and tick events.
//! Nothing in here feeds back into the simulation; deleting this module
//! changes pixels, never physics.

use std::f32::consts::FRAC_PI_2;

use crate::sim::{GameEvent, RenderSnapshot};

/// Leg swing increment per tick while running
const LEG_SWING_SPEED: f32 = 0.15;
/// Swing reverses past this amplitude
const LEG_SWING_LIMIT: f32 = 0.5;
/// Legs tuck up to this angle while airborne
const LEG_TUCK_LIMIT: f32 = 0.8;
/// Landing squash cap and per-impact scale
const SQUASH_MAX: f32 = 0.3;
const SQUASH_PER_IMPACT: f32 = 0.05;

/// Player body/leg animation
#[derive(Debug, Clone, Copy)]
pub struct PlayerAnim {
    /// Leg swing phase; drawn as a rotation of `sin(leg_angle) * 0.4`
    pub leg_angle: f32,
    swing_dir: f32,
    /// Landing squash amount, decays toward zero
    pub squash: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
}

impl Default for PlayerAnim {
    fn default() -> Self {
        Self { leg_angle: 0.0, swing_dir: 1.0, squash: 0.0, facing: 1.0 }
    }
}

/// Per-bat wing flap phase
#[derive(Debug, Clone, Copy)]
pub struct WingAnim {
    pub phase: f32,
    speed: f32,
}

/// All cosmetic state for one frame
#[derive(Debug, Clone)]
pub struct AnimState {
    pub player: PlayerAnim,
    pub wings: Vec<WingAnim>,
}

impl AnimState {
    pub fn new(bat_count: usize) -> Self {
        // Stagger phases and speeds so the flock does not flap in sync
        let wings = (0..bat_count)
            .map(|i| WingAnim {
                phase: i as f32 * FRAC_PI_2,
                speed: 0.15 + 0.05 * ((i % 3) as f32),
            })
            .collect();
        Self { player: PlayerAnim::default(), wings }
    }

    /// Advance one frame from the tick's snapshot and events
    pub fn advance(&mut self, snap: &RenderSnapshot, events: &[GameEvent]) {
        let p = &mut self.player;

        if snap.player_vel.x > 0.0 {
            p.facing = 1.0;
        } else if snap.player_vel.x < 0.0 {
            p.facing = -1.0;
        }

        let moving = snap.player_vel.x != 0.0;
        if moving && !snap.player_airborne {
            p.leg_angle += LEG_SWING_SPEED * p.swing_dir;
            if p.leg_angle.abs() > LEG_SWING_LIMIT {
                p.swing_dir = -p.swing_dir;
            }
        } else if snap.player_airborne {
            p.leg_angle = (p.leg_angle + 0.1).min(LEG_TUCK_LIMIT);
        } else if p.leg_angle != 0.0 {
            p.leg_angle *= 0.8;
            if p.leg_angle.abs() < 0.01 {
                p.leg_angle = 0.0;
            }
        }

        for event in events {
            match event {
                GameEvent::Landed { impact } => {
                    p.squash = (impact.abs() * SQUASH_PER_IMPACT).min(SQUASH_MAX);
                }
                GameEvent::Respawned(_) => {
                    *p = PlayerAnim { facing: p.facing, ..PlayerAnim::default() };
                }
                GameEvent::Won => {}
            }
        }

        if p.squash > 0.0 {
            p.squash *= 0.8;
            if p.squash < 0.01 {
                p.squash = 0.0;
            }
        }

        for wing in &mut self.wings {
            wing.phase += wing.speed;
        }
    }
}
