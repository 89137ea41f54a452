//! Collision detection and response
//!
//! Ball-rail reflection against planar boundaries, equal-mass ball-ball
//! exchange with de-penetration, and pocket capture. The functions here are
//! pure with respect to the rest of the game; sound and rule side effects are
//! raised by the tick from the returned impacts.

use glam::Vec3;

use super::state::Ball;
use super::table::{Boundary, Table};
use crate::consts::{MAX_IMPACT_SPEED, MIN_IMPACT_SPEED};

/// Centre distances below this are treated as coincident
const COINCIDENT_EPSILON: f32 = 1e-6;
/// Overlap left over from float rounding after de-penetration; pairs within
/// this of touching are resting contacts, not collisions
const CONTACT_SLOP: f32 = 1e-4;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlapped
    pub hit: bool,
    /// Contact normal (for a rail, the boundary normal; for a pair, a -> b)
    pub normal: Vec3,
    /// Overlap that was corrected
    pub penetration: f32,
    /// Speed along the normal at impact, 0 when the bodies were separating
    pub impact_speed: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            penetration: 0.0,
            impact_speed: 0.0,
        }
    }

    /// Overlapped and was moving into contact
    pub fn is_impact(&self) -> bool {
        self.hit && self.impact_speed > 0.0
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflection confined to the table plane
#[inline]
pub fn reflect_planar(velocity: Vec3, normal: Vec3) -> Vec3 {
    let mut reflected = reflect_velocity(velocity, normal);
    reflected.y = 0.0;
    reflected
}

/// Push a ball out of a rail and bounce it if it is moving into the rail
pub fn ball_boundary_collision(ball: &mut Ball, radius: f32, boundary: &Boundary) -> CollisionResult {
    let distance = boundary.distance(ball.pos);
    if distance >= radius {
        return CollisionResult::miss();
    }

    let penetration = radius - distance;
    ball.pos += boundary.normal * penetration;

    let v_dot_n = ball.vel.dot(boundary.normal);
    let impact_speed = if v_dot_n < 0.0 {
        ball.vel = reflect_planar(ball.vel, boundary.normal);
        -v_dot_n
    } else {
        0.0
    };

    CollisionResult {
        hit: true,
        normal: boundary.normal,
        penetration,
        impact_speed,
    }
}

/// Equal-mass exchange of normal velocity components between two balls
///
/// Tangential components are kept, both results are scaled by restitution,
/// and each ball is pushed back by half the overlap. The returned impact
/// speed is the magnitude of the relative velocity before contact. Balls
/// already touching (within rounding) are left alone.
pub fn ball_ball_collision(
    a: &mut Ball,
    b: &mut Ball,
    radius: f32,
    restitution: f32,
) -> CollisionResult {
    let min_dist = radius * 2.0;
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist >= min_dist - CONTACT_SLOP {
        return CollisionResult::miss();
    }

    let normal = if dist < COINCIDENT_EPSILON {
        Vec3::X
    } else {
        delta / dist
    };
    let tangent = Vec3::new(-normal.z, 0.0, normal.x);

    let va = a.vel;
    let vb = b.vel;
    let impact_speed = (va - vb).length();

    let va_n = normal * va.dot(normal);
    let va_t = tangent * va.dot(tangent);
    let vb_n = normal * vb.dot(normal);
    let vb_t = tangent * vb.dot(tangent);

    a.vel = (vb_n + va_t) * restitution;
    b.vel = (va_n + vb_t) * restitution;

    let penetration = min_dist - dist;
    let correction = normal * (penetration / 2.0);
    a.pos -= correction;
    b.pos += correction;

    CollisionResult {
        hit: true,
        normal,
        penetration,
        impact_speed,
    }
}

/// Capture a ball that has rolled over a pocket
///
/// Returns the fall target (pocket centre at the ball's height) when the ball
/// starts falling this call.
pub fn check_pocket_capture(ball: &mut Ball, table: &Table, capture_radius: f32) -> Option<Vec3> {
    if ball.is_falling() {
        return None;
    }
    let target = table.pocket_at(ball.pos, capture_radius)?.world(ball.pos.y);
    ball.start_falling(target);
    Some(target)
}

/// Fraction of the audible impact range covered by a speed
#[inline]
fn impact_fraction(speed: f32) -> f32 {
    let clamped = speed.clamp(MIN_IMPACT_SPEED, MAX_IMPACT_SPEED);
    (clamped - MIN_IMPACT_SPEED) / (MAX_IMPACT_SPEED - MIN_IMPACT_SPEED)
}

/// (volume, pitch) for a rail impact; `jitter` is a uniform sample in [0, 1)
pub fn rail_hit_sound(impact_speed: f32, jitter: f32) -> (f32, f32) {
    let volume = 0.1 + 0.5 * impact_fraction(impact_speed);
    let pitch = 0.5 + 0.2 * jitter;
    (volume, pitch)
}

/// (volume, pitch) for a ball-ball impact; `jitter` is a uniform sample in [0, 1)
pub fn ball_hit_sound(impact_speed: f32, jitter: f32) -> (f32, f32) {
    let volume = 0.25 + 0.75 * impact_fraction(impact_speed);
    let pitch = 0.6 * (0.5 + 0.5 * volume) + 0.4 * jitter;
    (volume, pitch)
}
