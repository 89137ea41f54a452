//! Simulation and audio tuning
//!
//! Defaults come from [`crate::consts`]. A JSON file may override any subset
//! of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable parameters read by the simulation each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Velocity retained per tick while rolling
    pub friction: f32,
    /// Velocity retained after a ball-ball collision
    pub restitution: f32,
    /// Horizontal pocket capture radius
    pub pocket_radius: f32,
    /// Cue ball speed at full power
    pub max_shot_speed: f32,
    /// Power gained per tick while charging
    pub power_charge_rate: f32,

    // === Turn flow ===
    /// Seconds at rest before a shot resolves
    pub settle_delay_secs: f32,
    /// Seconds before the rack resets after the eight ball drops
    pub game_over_reset_secs: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all sound triggers
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            restitution: RESTITUTION,
            pocket_radius: POCKET_RADIUS,
            max_shot_speed: MAX_SHOT_SPEED,
            power_charge_rate: POWER_CHARGE_RATE,

            settle_delay_secs: SETTLE_DELAY_SECS,
            game_over_reset_secs: GAME_OVER_RESET_SECS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values into ranges the simulation can work with
    fn sanitized(mut self) -> Self {
        self.friction = self.friction.clamp(0.0, 1.0);
        self.restitution = self.restitution.clamp(0.0, 1.0);
        self.pocket_radius = self.pocket_radius.max(0.0);
        self.max_shot_speed = self.max_shot_speed.max(0.0);
        self.power_charge_rate = self.power_charge_rate.clamp(0.0, 1.0);
        self.settle_delay_secs = self.settle_delay_secs.max(0.0);
        self.game_over_reset_secs = self.game_over_reset_secs.max(0.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}
