//! Turn and scoring rules
//!
//! Applies player inputs according to the current phase, credits pocketed
//! balls, and resolves a shot once the table has come to rest.

use glam::Vec3;

use super::input::InputEvent;
use super::state::{BallKind, GameEvent, GameOutcome, GamePhase, GameState, Sound};
use crate::aim_direction;
use crate::consts::*;

/// Rings of candidate spots, one ball radius apart, tried around the start
const RETURN_SEARCH_RINGS: usize = 20;
const RETURN_SEARCH_STEPS: usize = 16;

/// Apply one input event; anything not legal in the current phase is ignored
pub fn apply_input(state: &mut GameState, event: InputEvent) {
    if state.outcome.is_some() && event != InputEvent::Reset {
        log::debug!("Ignoring {:?} after game over", event);
        return;
    }

    let handled = match event {
        InputEvent::BeginAim => begin_aim(state),
        InputEvent::Aim { angle } => {
            let can_aim = matches!(state.phase, GamePhase::Idle | GamePhase::Aiming);
            if can_aim && angle.is_finite() {
                state.cue.aim_angle = angle;
            }
            can_aim
        }
        InputEvent::Shoot => {
            if state.phase != GamePhase::Aiming {
                false
            } else if state.cue.charging {
                fire_shot(state)
            } else {
                state.cue.start_charging();
                true
            }
        }
        InputEvent::MoveCueBall { x, z } => {
            state.phase == GamePhase::Repositioning && move_cue_ball(state, x, z)
        }
        InputEvent::ConfirmPlacement => {
            let placing = state.phase == GamePhase::Repositioning;
            if placing {
                state.set_phase(GamePhase::Idle);
            }
            placing
        }
        InputEvent::Reset => {
            state.reset_rack();
            true
        }
    };

    if !handled {
        log::debug!("Ignoring {:?} while {}", event, state.phase);
    }
}

fn begin_aim(state: &mut GameState) -> bool {
    let cue_ready = state.cue_ball().is_some_and(|b| !b.is_falling());
    if state.phase != GamePhase::Idle || !cue_ready {
        return false;
    }
    state.cue.charging = false;
    state.cue.power = 0.0;
    state.set_phase(GamePhase::Aiming);
    true
}

/// Strike the cue ball with the charged power
fn fire_shot(state: &mut GameState) -> bool {
    let power = state.cue.power;
    let velocity = aim_direction(state.cue.aim_angle) * power * state.settings.max_shot_speed;
    let Some(cue) = state.cue_ball_mut() else {
        return false;
    };
    cue.vel = velocity;

    state.cue.charging = false;
    state.cue.power = 0.0;
    state.shot = Default::default();
    state.rest_secs = 0.0;
    state.shots += 1;
    log::info!(
        "{} shoots: power {:.2}, angle {:.3}",
        state.current_player,
        power,
        state.cue.aim_angle
    );
    state.play_sound(Sound::BallHit, 1.0, 1.0);
    state.set_phase(GamePhase::Moving);
    true
}

/// Where the cue ball in hand would land for a pointer at (x, z)
///
/// The point is clamped to the playing surface. `None` if it would overlap
/// another ball or sit over a pocket.
pub fn placement_spot(state: &GameState, x: f32, z: f32) -> Option<Vec3> {
    if !x.is_finite() || !z.is_finite() {
        return None;
    }
    let candidate = Vec3::new(
        x.clamp(-PLACEMENT_HALF_X, PLACEMENT_HALF_X),
        BALL_REST_Y,
        z.clamp(-PLACEMENT_HALF_Z, PLACEMENT_HALF_Z),
    );

    let blocked = state
        .balls
        .iter()
        .filter(|b| !b.is_cue() && !b.is_falling())
        .any(|b| b.pos.distance_squared(candidate) < (2.0 * BALL_RADIUS).powi(2));
    let over_pocket = state
        .table
        .pocket_at(candidate, state.settings.pocket_radius)
        .is_some();
    (!blocked && !over_pocket).then_some(candidate)
}

/// Move the cue ball in hand; false leaves it where it was
pub fn move_cue_ball(state: &mut GameState, x: f32, z: f32) -> bool {
    let Some(spot) = placement_spot(state, x, z) else {
        return false;
    };
    match state.cue_ball_mut() {
        Some(cue) => {
            cue.place(spot);
            true
        }
        None => false,
    }
}

/// Free spot for a cue ball returned after a foul
///
/// The start position if it is clear, otherwise the first clear spot on
/// rings around it.
pub fn cue_return_spot(state: &GameState) -> Vec3 {
    if let Some(spot) = placement_spot(state, CUE_START.x, CUE_START.z) {
        return spot;
    }
    for ring in 1..=RETURN_SEARCH_RINGS {
        let radius = ring as f32 * BALL_RADIUS;
        for step in 0..RETURN_SEARCH_STEPS {
            let angle = step as f32 * std::f32::consts::TAU / RETURN_SEARCH_STEPS as f32;
            let x = CUE_START.x + radius * angle.cos();
            let z = CUE_START.z + radius * angle.sin();
            if let Some(spot) = placement_spot(state, x, z) {
                return spot;
            }
        }
    }
    log::warn!("No free spot near the start position for the cue ball");
    CUE_START
}

/// Credit a ball that finished dropping into a pocket
pub fn on_ball_sunk(state: &mut GameState, number: u8, kind: BallKind) {
    state.emit(GameEvent::BallPocketed { number, kind });
    let shooter = state.current_player;

    match kind {
        BallKind::Cue => {
            log::info!("Scratch by {}", shooter);
            state.shot.scratched = true;
        }
        BallKind::Eight => {
            if state.outcome.is_some() {
                return;
            }
            let outcome = if state.score(shooter) == BALLS_PER_SIDE {
                GameOutcome {
                    winner: shooter,
                    early_eight: false,
                }
            } else {
                GameOutcome {
                    winner: shooter.other(),
                    early_eight: true,
                }
            };
            log::info!(
                "Eight ball down: {} wins{}",
                outcome.winner,
                if outcome.early_eight { " (early eight)" } else { "" }
            );
            state.outcome = Some(outcome);
            state.game_over_secs = 0.0;
            state.emit(GameEvent::GameOver(outcome));
        }
        BallKind::Solid | BallKind::Striped => {
            let Some(owner) = kind.owner() else {
                return;
            };
            state.scores[owner.index()] += 1;
            if owner == shooter {
                state.shot.scored = true;
            }
            log::debug!("Ball {} down, scores {:?}", number, state.scores);
            state.emit(GameEvent::ScoreChanged {
                scores: state.scores,
            });
        }
    }
}

/// Count rest time while balls are moving and resolve the shot once settled
pub fn update_settle(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Moving {
        return;
    }
    if !state.all_at_rest() {
        state.rest_secs = 0.0;
        return;
    }
    state.rest_secs += dt;
    if state.rest_secs < state.settings.settle_delay_secs || state.outcome.is_some() {
        return;
    }
    resolve_shot(state);
}

/// Decide fouls and whose turn it is from the shot latches
pub fn resolve_shot(state: &mut GameState) {
    let shooter = state.current_player;
    let shot = std::mem::take(&mut state.shot);
    state.rest_secs = 0.0;

    if !shot.any_hit || shot.scratched {
        log::info!(
            "Foul by {}: {}",
            shooter,
            if shot.scratched { "scratch" } else { "no contact" }
        );
        state.emit(GameEvent::Foul {
            player: shooter,
            scratched: shot.scratched,
        });
        let spot = cue_return_spot(state);
        if let Some(cue) = state.cue_ball_mut() {
            cue.place(spot);
        }
        state.set_phase(GamePhase::Repositioning);
        state.switch_turn();
        return;
    }

    state.set_phase(GamePhase::Idle);
    if shot.scored {
        state.emit(GameEvent::Scored { player: shooter });
    } else {
        state.switch_turn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::state::{Player, ShotFlags};

    fn new_state() -> GameState {
        GameState::new(42, Settings::default())
    }

    fn settle(state: &mut GameState) {
        for _ in 0..60 {
            update_settle(state, SIM_DT);
            if state.phase != GamePhase::Moving {
                return;
            }
        }
    }

    #[test]
    fn test_aim_then_double_shoot_fires() {
        let mut state = new_state();
        apply_input(&mut state, InputEvent::BeginAim);
        assert_eq!(state.phase, GamePhase::Aiming);

        apply_input(&mut state, InputEvent::Aim { angle: 0.0 });
        apply_input(&mut state, InputEvent::Shoot);
        assert!(state.cue.charging);

        state.cue.power = 0.5;
        apply_input(&mut state, InputEvent::Shoot);
        assert_eq!(state.phase, GamePhase::Moving);
        assert_eq!(state.shots, 1);
        assert!(!state.cue.charging);

        let cue = state.cue_ball().unwrap();
        assert!((cue.vel - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(s) if s.sound == Sound::BallHit && s.volume == 1.0
        )));
    }

    #[test]
    fn test_inputs_ignored_in_wrong_phase() {
        let mut state = new_state();
        apply_input(&mut state, InputEvent::Shoot);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.cue.charging);

        apply_input(&mut state, InputEvent::ConfirmPlacement);
        apply_input(&mut state, InputEvent::MoveCueBall { x: 0.0, z: 0.0 });
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.cue_ball().unwrap().pos, CUE_START);

        state.phase = GamePhase::Moving;
        apply_input(&mut state, InputEvent::Aim { angle: 1.0 });
        assert_eq!(state.cue.aim_angle, std::f32::consts::PI);
    }

    #[test]
    fn test_eight_ball_after_clearing_wins() {
        let mut state = new_state();
        state.scores = [BALLS_PER_SIDE, 2];
        on_ball_sunk(&mut state, 8, BallKind::Eight);
        assert_eq!(
            state.outcome,
            Some(GameOutcome {
                winner: Player::One,
                early_eight: false
            })
        );
    }

    #[test]
    fn test_early_eight_ball_loses() {
        let mut state = new_state();
        state.current_player = Player::Two;
        state.scores = [6, 3];
        on_ball_sunk(&mut state, 8, BallKind::Eight);
        let outcome = state.outcome.unwrap();
        assert_eq!(outcome.winner, Player::One);
        assert_eq!(outcome.loser(), Player::Two);
        assert!(outcome.early_eight);
    }

    #[test]
    fn test_opponent_ball_scores_for_owner() {
        let mut state = new_state();
        on_ball_sunk(&mut state, 12, BallKind::Striped);
        assert_eq!(state.scores, [0, 1]);
        assert!(!state.shot.scored);

        on_ball_sunk(&mut state, 3, BallKind::Solid);
        assert_eq!(state.scores, [1, 1]);
        assert!(state.shot.scored);
    }

    #[test]
    fn test_no_contact_is_foul_even_when_scored() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.shot = ShotFlags {
            any_hit: false,
            scratched: false,
            scored: true,
        };
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Repositioning);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.cue_ball().unwrap().pos, CUE_START);
        assert_eq!(state.shot, ShotFlags::default());
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Foul {
                player: Player::One,
                scratched: false
            }
        )));
    }

    #[test]
    fn test_scratch_returns_cue_ball() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.cue_ball_mut().unwrap().place(CUE_HOLD_POSITION);
        state.shot.any_hit = true;
        on_ball_sunk(&mut state, 0, BallKind::Cue);
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Repositioning);
        assert_eq!(state.cue_ball().unwrap().pos, CUE_START);
        assert_eq!(state.current_player, Player::Two);
    }

    #[test]
    fn test_foul_return_avoids_ball_on_start_spot() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.cue_ball_mut().unwrap().place(CUE_HOLD_POSITION);
        state.balls[1].place(CUE_START + Vec3::new(0.5, 0.0, 0.5));
        on_ball_sunk(&mut state, 0, BallKind::Cue);
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Repositioning);
        let cue = state.cue_ball().unwrap().pos;
        assert_ne!(cue, CUE_START);
        assert!(placement_spot(&state, cue.x, cue.z).is_some());
        for ball in state.balls.iter().filter(|b| !b.is_cue()) {
            assert!(ball.pos.distance(cue) >= 2.0 * BALL_RADIUS);
        }

        // Confirming without moving leaves no overlap
        apply_input(&mut state, InputEvent::ConfirmPlacement);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_scoring_shot_keeps_turn() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.shot.any_hit = true;
        state.shot.scored = true;
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.current_player, Player::One);
        assert!(
            state
                .events
                .contains(&GameEvent::Scored { player: Player::One })
        );
    }

    #[test]
    fn test_clean_miss_passes_turn() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.shot.any_hit = true;
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.current_player, Player::Two);
    }

    #[test]
    fn test_settle_waits_for_motion_to_stop() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        state.shot.any_hit = true;
        state.balls[3].vel = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..30 {
            update_settle(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Moving);
        assert_eq!(state.rest_secs, 0.0);
    }

    #[test]
    fn test_game_over_holds_until_reset() {
        let mut state = new_state();
        state.phase = GamePhase::Moving;
        on_ball_sunk(&mut state, 8, BallKind::Eight);
        settle(&mut state);
        assert_eq!(state.phase, GamePhase::Moving);

        apply_input(&mut state, InputEvent::BeginAim);
        assert_eq!(state.phase, GamePhase::Moving);

        apply_input(&mut state, InputEvent::Reset);
        assert!(state.outcome.is_none());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.balls.len(), 16);
    }

    #[test]
    fn test_cue_placement() {
        let mut state = new_state();
        state.phase = GamePhase::Repositioning;

        // On top of the rack apex
        apply_input(&mut state, InputEvent::MoveCueBall { x: RACK_APEX_X, z: 0.0 });
        assert_eq!(state.cue_ball().unwrap().pos, CUE_START);

        // Far outside the cloth is clamped to the edge
        apply_input(&mut state, InputEvent::MoveCueBall { x: 10.0, z: -500.0 });
        let pos = state.cue_ball().unwrap().pos;
        assert_eq!(pos, Vec3::new(10.0, BALL_REST_Y, -PLACEMENT_HALF_Z));

        // Over a corner pocket
        apply_input(&mut state, InputEvent::MoveCueBall { x: 500.0, z: 500.0 });
        assert_eq!(state.cue_ball().unwrap().pos, pos);

        apply_input(&mut state, InputEvent::ConfirmPlacement);
        assert_eq!(state.phase, GamePhase::Idle);
    }
}
