//! GPU data layouts for the table scene

use bytemuck::{Pod, Zeroable};

use crate::sim::{Ball, BallKind, GamePhase, Player};

/// One ball, drawn as an instanced sphere
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub position: [f32; 3], // offset 0
    pub radius: f32,        // offset 12
    pub rotation: [f32; 4], // offset 16 - quaternion xyzw
    pub color: [f32; 4],    // offset 32
    pub number: u32,        // offset 48 - texture layer
    pub stripe: u32,        // offset 52 - 1 for striped balls
    pub falling: u32,       // offset 56 - 1 while dropping into a pocket
    _pad: u32,              // pad to 64 bytes
}

impl BallInstance {
    pub fn from_ball(ball: &Ball, radius: f32) -> Self {
        Self {
            position: ball.pos.to_array(),
            radius,
            rotation: ball.rotation.to_array(),
            color: colors::ball(ball.number),
            number: u32::from(ball.number),
            stripe: u32::from(ball.kind == BallKind::Striped),
            falling: u32::from(ball.is_falling()),
            _pad: 0,
        }
    }
}

/// One point of the aim guide line
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PathVertex {
    pub position: [f32; 3],
    /// 0 for unused (sentinel) slots
    pub alpha: f32,
}

impl PathVertex {
    pub const fn new(position: [f32; 3], alpha: f32) -> Self {
        Self { position, alpha }
    }
}

/// Per-frame uniform block
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SceneGlobals {
    pub ball_count: u32,     // offset 0
    pub path_count: u32,     // offset 4
    pub phase: u32,          // offset 8 - GamePhase as index
    pub current_player: u32, // offset 12 - 1 or 2
    pub power: f32,          // offset 16 - shot gauge 0-1
    pub aim_angle: f32,      // offset 20
    pub scores: [u32; 2],    // offset 24
}

/// Shader-side index of a phase
pub fn phase_index(phase: GamePhase) -> u32 {
    match phase {
        GamePhase::Idle => 0,
        GamePhase::Aiming => 1,
        GamePhase::Moving => 2,
        GamePhase::Repositioning => 3,
    }
}

pub fn player_index(player: Player) -> u32 {
    u32::from(player.number())
}

/// Colors for game elements
pub mod colors {
    pub const CUE_BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EIGHT_BALL: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const GUIDE_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

    /// Solid colors for balls 1-7; 9-15 reuse them on a white band
    const PALETTE: [[f32; 4]; 7] = [
        [0.95, 0.8, 0.1, 1.0],   // yellow
        [0.1, 0.25, 0.8, 1.0],   // blue
        [0.85, 0.1, 0.1, 1.0],   // red
        [0.45, 0.1, 0.6, 1.0],   // purple
        [0.95, 0.45, 0.05, 1.0], // orange
        [0.05, 0.5, 0.2, 1.0],   // green
        [0.5, 0.1, 0.1, 1.0],    // maroon
    ];

    pub fn ball(number: u8) -> [f32; 4] {
        match number {
            0 => CUE_BALL,
            8 => EIGHT_BALL,
            1..=7 => PALETTE[usize::from(number) - 1],
            9..=15 => PALETTE[usize::from(number) - 9],
            _ => CUE_BALL,
        }
    }
}
