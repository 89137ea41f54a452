//! Eightball - fixed-step billiards simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, collisions, pockets, turn rules)
//! - `renderer`: GPU-ready instance data derived from the simulation
//! - `audio`: Sound trigger dispatch with volume mixing
//! - `autoplay`: Seeded scripted player for demos and soak runs
//! - `settings`: Tunable physics and audio parameters

pub mod audio;
pub mod autoplay;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Ball radius in world units
    pub const BALL_RADIUS: f32 = 2.0;
    /// Height of the cloth surface
    pub const FLOOR_HEIGHT: f32 = 48.7811;
    /// Height of a resting ball's centre
    pub const BALL_REST_Y: f32 = FLOOR_HEIGHT + BALL_RADIUS;

    /// Velocity retained per tick while rolling
    pub const FRICTION: f32 = 0.98;
    /// Velocity retained after a ball-ball collision
    pub const RESTITUTION: f32 = 0.98;
    /// Squared speed below which a ball snaps to rest
    pub const REST_SPEED_SQ: f32 = 1e-5;
    /// Speed below which the rolling cue is not applied
    pub const ROLL_MIN_SPEED: f32 = 1e-4;

    /// Horizontal capture radius around a pocket centre
    pub const POCKET_RADIUS: f32 = 4.5;

    /// Impact speed range used to scale collision sounds
    pub const MIN_IMPACT_SPEED: f32 = 0.2;
    pub const MAX_IMPACT_SPEED: f32 = 5.0;

    /// Cue ball break position
    pub const CUE_START: Vec3 = Vec3::new(40.0, BALL_REST_Y, 0.0);
    /// Where a pocketed cue ball waits until it is repositioned
    pub const CUE_HOLD_POSITION: Vec3 = Vec3::new(0.0, -50.0, 0.0);
    /// X of the rack apex
    pub const RACK_APEX_X: f32 = -40.0;
    /// Centre spacing between racked balls (tiny gap so nothing overlaps)
    pub const RACK_SPACING: f32 = BALL_RADIUS * 2.0 + 0.01;
    /// Ball numbers in rack order, apex first, row by row
    pub const RACK_ORDER: [u8; 15] = [1, 4, 10, 14, 8, 6, 13, 15, 5, 11, 9, 3, 7, 12, 2];
    /// Balls each player must sink before the eight
    pub const BALLS_PER_SIDE: u32 = 7;

    /// Falling animation (per tick)
    pub const FALL_SINK_PER_TICK: f32 = 0.5;
    pub const FALL_SPIN_PER_TICK: f32 = 1.0;
    pub const FALL_PULL_PER_TICK: f32 = 0.2;
    /// A falling ball is finished once its centre drops below this height
    pub const FALL_REMOVE_Y: f32 = 45.0;

    /// Shot predictor
    pub const PREDICTION_POINTS: usize = 60;
    pub const PREDICTION_STEP: f32 = 3.0;
    /// (radius + radius)^2
    pub const PREDICTION_HIT_DIST_SQ: f32 = 16.0;
    /// Distance band in front of a rail where the path bends
    pub const PREDICTION_RAIL_BAND: f32 = 2.0;
    /// Path is drawn slightly under the ball centre
    pub const PREDICTION_DROP: f32 = 0.1;
    /// Value written into unused path slots
    pub const PREDICTION_SENTINEL: f32 = 9999.0;

    /// Power gained per tick while charging
    pub const POWER_CHARGE_RATE: f32 = 0.015;
    /// Cue ball speed at full power (units per tick)
    pub const MAX_SHOT_SPEED: f32 = 6.0;

    /// Seconds every ball must be at rest before a shot resolves
    pub const SETTLE_DELAY_SECS: f32 = 0.1;
    /// Seconds the result stays on screen before the rack resets
    pub const GAME_OVER_RESET_SECS: f32 = 3.0;

    /// Cue ball placement zone (half extents around the table centre)
    pub const PLACEMENT_HALF_X: f32 = (167.0 - 2.0 * BALL_RADIUS) / 2.0;
    pub const PLACEMENT_HALF_Z: f32 = (79.0 - 2.0 * BALL_RADIUS) / 2.0;
}

/// Project a vector onto the table plane (drop the vertical component)
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Table-plane coordinates of a world position
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Unit aim direction on the table plane for an angle around the vertical axis
///
/// Angle 0 points along +X, positive angles turn toward -Z.
#[inline]
pub fn aim_direction(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, -angle.sin())
}

/// Inverse of [`aim_direction`] (ignores the vertical component)
#[inline]
pub fn aim_angle(direction: Vec3) -> f32 {
    (-direction.z).atan2(direction.x)
}
