//! Scripted player for demo mode and soak runs
//!
//! Feeds the same input events a person would through the input queue, so
//! everything it does goes through the normal rules.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::aim_angle;
use crate::consts::{PLACEMENT_HALF_X, PLACEMENT_HALF_Z};
use crate::sim::rules::placement_spot;
use crate::sim::{Ball, BallKind, GamePhase, GameState, InputEvent, InputQueue};

/// Random cue-ball placements tried before keeping the current spot
const PLACEMENT_ATTEMPTS: usize = 32;
/// Aim noise in radians
const AIM_JITTER: f32 = 0.04;

/// Seeded autoplayer
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Power to release the gauge at for the shot being charged
    target_power: Option<f32>,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target_power: None,
        }
    }

    /// Queue this tick's inputs; call once per simulation tick
    pub fn drive(&mut self, state: &GameState, queue: &mut InputQueue) {
        if state.outcome.is_some() {
            return;
        }

        match state.phase {
            GamePhase::Idle => queue.push(InputEvent::BeginAim),
            GamePhase::Aiming => self.aim_and_shoot(state, queue),
            GamePhase::Moving => {}
            GamePhase::Repositioning => {
                self.place_cue_ball(state, queue);
                queue.push(InputEvent::ConfirmPlacement);
            }
        }
    }

    fn aim_and_shoot(&mut self, state: &GameState, queue: &mut InputQueue) {
        if !state.cue.charging {
            let Some(angle) = self.choose_aim(state) else {
                return;
            };
            let target = self.rng.random_range(0.35..0.95);
            log::debug!(
                "{} autoplay: aim {:.3}, power {:.2}",
                state.current_player,
                angle,
                target
            );
            self.target_power = Some(target);
            queue.push(InputEvent::Aim { angle });
            queue.push(InputEvent::Shoot);
            return;
        }

        let release = match self.target_power {
            Some(target) => state.cue.power >= target,
            // Gauge was started by someone else
            None => true,
        };
        if release {
            self.target_power = None;
            queue.push(InputEvent::Shoot);
        }
    }

    /// Aim at the nearest ball of the shooter's category, else the eight ball
    fn choose_aim(&mut self, state: &GameState) -> Option<f32> {
        let cue = state.cue_ball()?;
        let category = state.current_player.category();
        let nearest = |kind: BallKind| {
            state
                .balls
                .iter()
                .filter(|b| b.kind == kind && !b.is_falling())
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(cue.pos)
                        .total_cmp(&b.pos.distance_squared(cue.pos))
                })
        };
        let target: &Ball = nearest(category).or_else(|| nearest(BallKind::Eight))?;

        let jitter = self.rng.random_range(-AIM_JITTER..AIM_JITTER);
        Some(aim_angle(target.pos - cue.pos) + jitter)
    }

    fn place_cue_ball(&mut self, state: &GameState, queue: &mut InputQueue) {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = self.rng.random_range(-PLACEMENT_HALF_X..PLACEMENT_HALF_X);
            let z = self.rng.random_range(-PLACEMENT_HALF_Z..PLACEMENT_HALF_Z);
            if placement_spot(state, x, z).is_some() {
                queue.push(InputEvent::MoveCueBall { x, z });
                return;
            }
        }
        log::debug!("autoplay: no free spot found, keeping the cue ball where it is");
    }
}
