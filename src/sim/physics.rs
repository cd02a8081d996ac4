//! Player vertical motion
//!
//! Gravity, jump and boost are per-tick quantities: the simulation is driven
//! at a fixed `SIM_DT`, so a tick is the unit of time here. Only the
//! invulnerability countdown is measured in seconds.

use super::state::Player;
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

/// What a jump press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Left the ground
    Jumped,
    /// Extra lift while still rising
    Boosted,
    /// Nothing (falling, too high, or boost spent)
    Ignored,
}

/// Apply a jump press
pub fn jump(player: &mut Player, tuning: &Tuning) -> JumpOutcome {
    if !player.jumping {
        player.vel = tuning.jump_force;
        player.jumping = true;
        player.boost_used = false;
        return JumpOutcome::Jumped;
    }
    if !player.boost_used && player.vel > 0.0 && player.pos.y < tuning.max_jump_height {
        player.vel += tuning.jump_force * tuning.air_control * 0.3;
        player.boost_used = true;
        return JumpOutcome::Boosted;
    }
    JumpOutcome::Ignored
}

/// Gravity, integration and the ground clamp for one tick
pub fn integrate(player: &mut Player, tuning: &Tuning) {
    player.vel -= tuning.gravity;
    player.pos.y += player.vel;

    if player.pos.y <= GROUND_Y {
        player.pos.y = GROUND_Y;
        player.vel = 0.0;
        player.jumping = false;
        player.boost_used = false;
    }
}

/// Count down invulnerability by `dt` seconds
pub fn tick_invulnerability(player: &mut Player, dt: f32) {
    if player.invulnerable {
        player.invulnerable_timer -= dt;
        if player.invulnerable_timer <= 0.0 {
            player.invulnerable = false;
            player.invulnerable_timer = 0.0;
        }
    }
}
