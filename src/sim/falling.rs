//! Pocket drop animation
//!
//! A captured ball sinks, spins and drifts toward the pocket centre until it
//! drops below the table. The caller then removes it, or for the cue ball,
//! parks it in the holding position.

use glam::{Quat, Vec3};

use super::state::{Ball, BallState};
use crate::consts::*;
use crate::flatten;

/// Outcome of one animation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    /// Not falling; nothing happened
    Idle,
    /// Still above the removal depth
    Sinking,
    /// Dropped below the removal depth this step
    Finished,
}

/// Advance a falling ball by one tick
pub fn advance_fall(ball: &mut Ball) -> FallStep {
    let BallState::Falling { target } = ball.state else {
        return FallStep::Idle;
    };

    ball.vel = Vec3::ZERO;
    ball.angular_vel = Vec3::ZERO;
    ball.pos.y -= FALL_SINK_PER_TICK;
    ball.rotation = (ball.rotation
        * Quat::from_rotation_x(FALL_SPIN_PER_TICK)
        * Quat::from_rotation_z(FALL_SPIN_PER_TICK))
    .normalize();

    let to_center = flatten(target - ball.pos).normalize_or_zero();
    ball.pos += to_center * FALL_PULL_PER_TICK;

    if ball.pos.y < FALL_REMOVE_Y {
        FallStep::Finished
    } else {
        FallStep::Sinking
    }
}

/// Park a pocketed cue ball off the table until it is placed again
pub fn park_cue_ball(ball: &mut Ball) {
    ball.place(CUE_HOLD_POSITION);
}
