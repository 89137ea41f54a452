//! Render feed
//!
//! Flattens the simulation into fixed-layout buffers a GPU renderer can
//! upload as-is. Nothing here touches a graphics API.

pub mod vertex;

pub use vertex::{BallInstance, PathVertex, SceneGlobals, colors};

use crate::consts::{BALL_RADIUS, PREDICTION_POINTS};
use crate::sim::{GamePhase, GameState, PredictedPath};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub globals: SceneGlobals,
    pub balls: Vec<BallInstance>,
    /// Always `PREDICTION_POINTS` long; unused slots have zero alpha
    pub path: Vec<PathVertex>,
}

impl FrameData {
    /// Build from the current state and the latest predicted path
    ///
    /// The guide line is only shown while aiming.
    pub fn build(state: &GameState, path: &PredictedPath) -> Self {
        let balls: Vec<BallInstance> = state
            .balls
            .iter()
            .map(|ball| BallInstance::from_ball(ball, BALL_RADIUS))
            .collect();

        let show_path = state.phase == GamePhase::Aiming;
        let visible = if show_path { path.len } else { 0 };
        let path: Vec<PathVertex> = path
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let alpha = if i < visible {
                    // Fade out toward the end of the guide
                    colors::GUIDE_LINE[3] * (1.0 - i as f32 / PREDICTION_POINTS as f32)
                } else {
                    0.0
                };
                PathVertex::new(p.to_array(), alpha)
            })
            .collect();

        let globals = SceneGlobals {
            ball_count: balls.len() as u32,
            path_count: visible as u32,
            phase: vertex::phase_index(state.phase),
            current_player: vertex::player_index(state.current_player),
            power: state.cue.power,
            aim_angle: state.cue.aim_angle,
            scores: state.scores,
        };

        Self {
            globals,
            balls,
            path,
        }
    }

    pub fn globals_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.globals)
    }

    pub fn ball_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.balls)
    }

    pub fn path_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.path)
    }
}
