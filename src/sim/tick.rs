//! Fixed timestep simulation tick
//!
//! Advances the world by one step. Movement is in per-tick units; `dt_ms`
//! only drives the clock, the scheduler and the invulnerability timer.

use super::collision::resolve_collisions;
use super::state::{GamePhase, GameState};
use crate::normalize_angle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    /// Spray a volley this tick
    pub fire: bool,
    /// Absolute heading from touch aiming; overrides turning
    pub aim: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// -1 for left, 1 for right, 0 for neither or both
    pub fn turn(&self) -> f32 {
        match (self.turn_left, self.turn_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ms += dt_ms as f64;
    state.time_ticks += 1;
    state.run_due_events();

    // Ship intents
    let (width, height) = (state.width, state.height);
    if let Some(aim) = input.aim {
        state.ship.angle = normalize_angle(aim);
    }
    state.ship.steer(input.turn(), input.thrust, &state.tuning);
    if input.fire {
        state.fire();
    }

    // Movement
    state.ship.integrate(width, height, state.tuning.ship_friction);
    state.ship.update_invulnerability(dt_ms, &state.tuning);

    for enemy in &mut state.enemies {
        enemy.advance(width, height);
    }

    state
        .projectiles
        .update_retain(|droplet| droplet.advance(width, height));

    let (drag, gravity) = (state.tuning.particle_drag, state.tuning.particle_gravity);
    let shrink_below = state.tuning.particle_shrink_below_ticks;
    state
        .particles
        .update_retain(|particle| particle.advance(drag, gravity, shrink_below));

    state.background.update();

    resolve_collisions(state);
    state.poll_level_clear();
}
