//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball index)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod falling;
pub mod input;
pub mod integrator;
pub mod predictor;
pub mod rules;
pub mod state;
pub mod table;
pub mod tick;

pub use clock::FixedTimestep;
pub use collision::{CollisionResult, ball_ball_collision, ball_boundary_collision};
pub use input::{InputEvent, InputQueue};
pub use predictor::{PathIter, PredictedPath, predict_shot, update_prediction};
pub use state::{
    Ball, BallKind, BallState, GameEvent, GameOutcome, GamePhase, GameState, MatchSummary,
    Player, Sound, SoundEvent,
};
pub use table::{Boundary, Pocket, Table, TableGeometry};
pub use tick::tick;
