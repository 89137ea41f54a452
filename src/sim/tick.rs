//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{
    ball_ball_collision, ball_boundary_collision, ball_hit_sound, check_pocket_capture,
    rail_hit_sound,
};
use super::falling::{FallStep, advance_fall, park_cue_ball};
use super::input::InputEvent;
use super::integrator::integrate;
use super::rules;
use super::state::{GamePhase, GameState, Sound};
use crate::consts::*;

/// Advance the game state by one fixed timestep
///
/// `inputs` are the events drained from the input queue since the last tick.
pub fn tick(state: &mut GameState, inputs: &[InputEvent], dt: f32) {
    state.time_ticks += 1;

    for &event in inputs {
        rules::apply_input(state, event);
    }

    // Game over: let the last balls drop, then rack again
    if state.outcome.is_some() {
        state.game_over_secs += dt;
        if state.game_over_secs >= state.settings.game_over_reset_secs {
            state.reset_rack();
            return;
        }
    }

    match state.phase {
        GamePhase::Aiming => {
            let rate = state.settings.power_charge_rate;
            state.cue.charge(rate);
        }
        GamePhase::Moving => {
            step_physics(state);
            rules::update_settle(state, dt);
        }
        GamePhase::Idle | GamePhase::Repositioning => {}
    }
}

/// One physics step over every ball
fn step_physics(state: &mut GameState) {
    let friction = state.settings.friction;
    let restitution = state.settings.restitution;
    let pocket_radius = state.settings.pocket_radius;

    // Motion
    for ball in &mut state.balls {
        integrate(ball, friction);
    }

    // Pockets
    let mut drops = 0;
    for ball in &mut state.balls {
        if let Some(target) = check_pocket_capture(ball, &state.table, pocket_radius) {
            log::debug!("Ball {} captured, falling toward {:?}", ball.number, target);
            drops += 1;
        }
    }
    for _ in 0..drops {
        state.play_sound(Sound::PocketDrop, 0.7, 1.0);
    }

    // Falling animation, including balls captured just now
    let mut finished = Vec::new();
    for (i, ball) in state.balls.iter_mut().enumerate() {
        if advance_fall(ball) == FallStep::Finished {
            finished.push(i);
        }
    }

    // Rails
    let mut rail_impacts = Vec::new();
    for ball in state.balls.iter_mut().filter(|b| !b.is_falling()) {
        for boundary in &state.table.boundaries {
            let result = ball_boundary_collision(ball, BALL_RADIUS, boundary);
            if result.is_impact() {
                rail_impacts.push(result.impact_speed);
            }
        }
    }

    // Ball pairs, i < j
    let mut ball_impacts = Vec::new();
    let count = state.balls.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = state.balls.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if a.is_falling() || b.is_falling() {
                continue;
            }
            let result = ball_ball_collision(a, b, BALL_RADIUS, restitution);
            if result.hit {
                ball_impacts.push(result.impact_speed);
            }
        }
    }
    if !ball_impacts.is_empty() {
        state.shot.any_hit = true;
    }

    for speed in rail_impacts {
        let jitter = state.random_unit();
        let (volume, pitch) = rail_hit_sound(speed, jitter);
        state.play_sound(Sound::RailHit, volume, pitch);
    }
    for speed in ball_impacts {
        let jitter = state.random_unit();
        let (volume, pitch) = ball_hit_sound(speed, jitter);
        state.play_sound(Sound::BallHit, volume, pitch);
    }

    // Highest index first so earlier indices stay valid
    for i in finished.into_iter().rev() {
        let (number, kind) = (state.balls[i].number, state.balls[i].kind);
        if state.balls[i].is_cue() {
            park_cue_ball(&mut state.balls[i]);
        } else {
            state.balls.remove(i);
        }
        rules::on_ball_sunk(state, number, kind);
    }
}
