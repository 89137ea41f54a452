//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! hidden statics.

use std::fmt;

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::Settings;
use crate::consts::*;

/// Current phase of the turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the shooter to step up to the cue ball
    #[default]
    Idle,
    /// Cue stick out, power gauge may be charging
    Aiming,
    /// Balls in motion, gameplay input locked
    Moving,
    /// Cue ball in hand after a foul
    Repositioning,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Aiming => "aiming",
            GamePhase::Moving => "moving",
            GamePhase::Repositioning => "repositioning",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// 1-based number for display
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Ball category this player sinks
    pub fn category(self) -> BallKind {
        match self {
            Player::One => BallKind::Solid,
            Player::Two => BallKind::Striped,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Ball category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Cue,
    Solid,
    Striped,
    Eight,
}

impl BallKind {
    /// Category of a rack number (0 is the cue ball)
    pub fn from_number(number: u8) -> Self {
        match number {
            0 => BallKind::Cue,
            8 => BallKind::Eight,
            1..=7 => BallKind::Solid,
            _ => BallKind::Striped,
        }
    }

    /// Player credited when a ball of this kind drops
    pub fn owner(self) -> Option<Player> {
        match self {
            BallKind::Solid => Some(Player::One),
            BallKind::Striped => Some(Player::Two),
            BallKind::Cue | BallKind::Eight => None,
        }
    }
}

/// Ball state - on the cloth or dropping into a pocket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Ball is on the table and takes part in collisions
    #[default]
    Active,
    /// Ball was captured and is sinking toward the pocket centre
    Falling { target: Vec3 },
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// 0 for the cue ball, 1-15 otherwise
    pub number: u8,
    pub kind: BallKind,
    pub pos: Vec3,
    /// Displacement per tick
    pub vel: Vec3,
    /// Rolling cue for drawing only (axis * angle per tick)
    pub angular_vel: Vec3,
    /// Drawing orientation
    pub rotation: Quat,
    pub state: BallState,
}

impl Ball {
    pub fn new(number: u8, pos: Vec3) -> Self {
        Self {
            number,
            kind: BallKind::from_number(number),
            pos,
            vel: Vec3::ZERO,
            angular_vel: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            state: BallState::Active,
        }
    }

    pub fn cue(pos: Vec3) -> Self {
        Self::new(0, pos)
    }

    #[inline]
    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        matches!(self.state, BallState::Falling { .. })
    }

    /// Zero velocity and not sinking
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        !self.is_falling() && self.vel.length_squared() <= REST_SPEED_SQ
    }

    /// Start sinking toward a pocket centre
    pub fn start_falling(&mut self, target: Vec3) {
        self.vel = Vec3::ZERO;
        self.angular_vel = Vec3::ZERO;
        self.state = BallState::Falling { target };
    }

    /// Put the ball back on the table at rest
    pub fn place(&mut self, pos: Vec3) {
        self.pos = pos;
        self.vel = Vec3::ZERO;
        self.angular_vel = Vec3::ZERO;
        self.state = BallState::Active;
    }
}

/// Build the cue ball plus the fifteen racked balls
pub fn rack_balls() -> Vec<Ball> {
    let mut balls = Vec::with_capacity(RACK_ORDER.len() + 1);
    balls.push(Ball::cue(CUE_START));

    let mut order = RACK_ORDER.iter();
    for row in 0..5 {
        for col in 0..=row {
            let Some(&number) = order.next() else {
                break;
            };
            let x = RACK_APEX_X - row as f32 * RACK_SPACING * 0.866;
            let z = (col as f32 - row as f32 / 2.0) * RACK_SPACING;
            balls.push(Ball::new(number, Vec3::new(x, BALL_REST_Y, z)));
        }
    }
    balls
}

/// Per-shot latches, reset when a shot starts and consumed once when it settles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotFlags {
    /// Some ball-ball contact happened
    pub any_hit: bool,
    /// The cue ball dropped
    pub scratched: bool,
    /// The shooter sank one of their own balls
    pub scored: bool,
}

/// Cue stick control state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueControl {
    /// Aim angle around the vertical axis (see [`crate::aim_direction`])
    pub aim_angle: f32,
    /// Charged power (0.0 - 1.0)
    pub power: f32,
    /// Power gauge is cycling
    pub charging: bool,
    /// +1.0 while power rises, -1.0 while it falls
    pub power_direction: f32,
}

impl Default for CueControl {
    fn default() -> Self {
        Self {
            // Break shot points at the rack
            aim_angle: std::f32::consts::PI,
            power: 0.0,
            charging: false,
            power_direction: 1.0,
        }
    }
}

impl CueControl {
    /// Advance the power gauge one tick, bouncing between 0 and 1
    pub fn charge(&mut self, rate: f32) {
        if !self.charging {
            return;
        }
        self.power += rate * self.power_direction;
        if self.power >= 1.0 {
            self.power = 1.0;
            self.power_direction = -1.0;
        } else if self.power <= 0.0 {
            self.power = 0.0;
            self.power_direction = 1.0;
        }
    }

    pub fn start_charging(&mut self) {
        self.charging = true;
        self.power = 0.0;
        self.power_direction = 1.0;
    }
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Player,
    /// The loser sank the eight ball before clearing their category
    pub early_eight: bool,
}

impl GameOutcome {
    pub fn loser(&self) -> Player {
        self.winner.other()
    }
}

/// Named sound triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    BallHit,
    RailHit,
    PocketDrop,
}

impl Sound {
    pub fn name(&self) -> &'static str {
        match self {
            Sound::BallHit => "ballHit",
            Sound::RailHit => "railHit",
            Sound::PocketDrop => "pocketDrop",
        }
    }
}

/// Fire-and-forget sound trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    pub sound: Sound,
    pub volume: f32,
    /// Playback rate multiplier
    pub pitch: f32,
}

/// Events produced by the simulation for UI/audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEvent),
    PhaseChanged { from: GamePhase, to: GamePhase },
    TurnChanged { player: Player },
    ScoreChanged { scores: [u32; 2] },
    BallPocketed { number: u8, kind: BallKind },
    /// Shooter sank their own ball and keeps the table
    Scored { player: Player },
    Foul { player: Player, scratched: bool },
    GameOver(GameOutcome),
    RackReset,
}

/// Serializable end-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub ticks: u64,
    pub shots: u32,
    pub phase: GamePhase,
    pub current_player: Player,
    pub scores: [u32; 2],
    pub balls_on_table: Vec<u8>,
    pub outcome: Option<GameOutcome>,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for pitch jitter (and anything else random)
    pub seed: u64,
    pub settings: Settings,
    pub table: Table,
    /// Active balls; the cue ball is never removed
    pub balls: Vec<Ball>,
    pub phase: GamePhase,
    pub current_player: Player,
    /// Balls sunk per category: [solids, stripes]
    pub scores: [u32; 2],
    pub shot: ShotFlags,
    pub cue: CueControl,
    /// Simulated seconds every ball has been at rest during `Moving`
    pub rest_secs: f32,
    /// Set once the eight ball drops
    pub outcome: Option<GameOutcome>,
    /// Seconds since `outcome` was set
    pub game_over_secs: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Shots taken this rack
    pub shots: u32,
    /// Outbox drained by the host once per frame
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// New game on the standard table
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_table(seed, settings, Table::standard())
    }

    /// New game on caller-supplied table geometry
    pub fn with_table(seed: u64, settings: Settings, table: Table) -> Self {
        Self {
            seed,
            settings,
            table,
            balls: rack_balls(),
            phase: GamePhase::Idle,
            current_player: Player::One,
            scores: [0; 2],
            shot: ShotFlags::default(),
            cue: CueControl::default(),
            rest_secs: 0.0,
            outcome: None,
            game_over_secs: 0.0,
            time_ticks: 0,
            shots: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a fresh rack, keeping seed, settings and table
    pub fn reset_rack(&mut self) {
        let table = std::mem::take(&mut self.table);
        let events = std::mem::take(&mut self.events);
        let rng = self.rng.clone();
        *self = Self::with_table(self.seed, self.settings.clone(), table);
        self.events = events;
        self.rng = rng;
        self.emit(GameEvent::RackReset);
        log::info!("Rack reset");
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue())
    }

    pub fn cue_ball_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.is_cue())
    }

    pub fn ball(&self, number: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.number == number)
    }

    /// No ball is moving or sinking
    pub fn all_at_rest(&self) -> bool {
        self.balls.iter().all(Ball::is_at_rest)
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, sound: Sound, volume: f32, pitch: f32) {
        self.emit(GameEvent::Sound(SoundEvent {
            sound,
            volume,
            pitch,
        }));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Uniform sample in [0, 1) from the seeded stream
    pub fn random_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::debug!("Phase {} -> {}", from, to);
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    pub fn switch_turn(&mut self) {
        self.current_player = self.current_player.other();
        log::info!("{}'s turn", self.current_player);
        self.emit(GameEvent::TurnChanged {
            player: self.current_player,
        });
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            seed: self.seed,
            ticks: self.time_ticks,
            shots: self.shots,
            phase: self.phase,
            current_player: self.current_player,
            scores: self.scores,
            balls_on_table: self
                .balls
                .iter()
                .filter(|b| !b.is_cue())
                .map(|b| b.number)
                .collect(),
            outcome: self.outcome,
        }
    }
}
