//! Gameplay tuning
//!
//! Balance values grouped per system. Defaults come from `crate::consts`;
//! a JSON file can override any subset of them at startup. Tuning is never
//! changed while a match is running.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player vehicle handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Steering rate in radians per second
    pub turn_speed: f32,
    /// Forward acceleration (units/s²)
    pub accel: f32,
    /// Brake/reverse acceleration as a fraction of `accel`
    pub brake_factor: f32,
    /// Horizontal speed cap without boost
    pub max_speed: f32,
    /// Exponential horizontal decay when coasting (per second)
    pub rolling_resistance: f32,
    /// Vertical speed set on jump
    pub jump_speed: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            turn_speed: TURN_SPEED,
            accel: ACCEL,
            brake_factor: BRAKE_FACTOR,
            max_speed: MAX_SPEED,
            rolling_resistance: ROLLING_RESISTANCE,
            jump_speed: JUMP_SPEED,
        }
    }
}

/// Boost meter and boost pads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostTuning {
    /// Boost consumed per second while boosting
    pub drain: f32,
    /// Boost regained per second while not boosting
    pub regen: f32,
    /// Extra acceleration while boosting
    pub accel: f32,
    /// Max speed multiplier while boosting
    pub speed_multiplier: f32,
    /// Pickup radius of a pad
    pub pad_radius: f32,
    /// Seconds a pad stays inactive after pickup
    pub pad_cooldown: f32,
}

impl Default for BoostTuning {
    fn default() -> Self {
        Self {
            drain: BOOST_DRAIN,
            regen: BOOST_REGEN,
            accel: BOOST_ACCEL,
            speed_multiplier: BOOST_SPEED_MULTIPLIER,
            pad_radius: PAD_RADIUS,
            pad_cooldown: PAD_COOLDOWN,
        }
    }
}

/// Scripted opponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub turn_speed: f32,
    pub accel: f32,
    pub max_speed: f32,
    pub hang_back_far: f32,
    pub hang_back_near: f32,
    pub hang_back_distance: f32,
    pub jump_range: f32,
    /// Expected jumps per second while in range and grounded
    pub jump_rate: f32,
    pub jump_fraction: f32,
    pub idle_distance: f32,
    pub idle_damping: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            turn_speed: AI_TURN_SPEED,
            accel: AI_ACCEL,
            max_speed: AI_MAX_SPEED,
            hang_back_far: AI_HANG_BACK_FAR,
            hang_back_near: AI_HANG_BACK_NEAR,
            hang_back_distance: AI_HANG_BACK_DISTANCE,
            jump_range: AI_JUMP_RANGE,
            jump_rate: AI_JUMP_RATE,
            jump_fraction: AI_JUMP_FRACTION,
            idle_distance: AI_IDLE_DISTANCE,
            idle_damping: AI_IDLE_DAMPING,
        }
    }
}

/// Match flow timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    pub duration: f32,
    pub reset_delay: f32,
    pub kickoff_duration: f32,
    pub message_duration: f32,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            duration: MATCH_DURATION,
            reset_delay: RESET_DELAY,
            kickoff_duration: KICKOFF_DURATION,
            message_duration: MESSAGE_DURATION,
        }
    }
}

impl MatchTuning {
    /// Replace negative or non-finite timings with their defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let check = |name: &str, value: f32, fallback: f32| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                log::warn!("Invalid match.{name} {value}; using {fallback}");
                fallback
            }
        };
        Self {
            duration: check("duration", self.duration, defaults.duration),
            reset_delay: check("reset_delay", self.reset_delay, defaults.reset_delay),
            kickoff_duration: check(
                "kickoff_duration",
                self.kickoff_duration,
                defaults.kickoff_duration,
            ),
            message_duration: check(
                "message_duration",
                self.message_duration,
                defaults.message_duration,
            ),
        }
    }
}

/// All balance values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub vehicle: VehicleTuning,
    pub boost: BoostTuning,
    pub ai: AiTuning,
    #[serde(rename = "match")]
    pub match_flow: MatchTuning,
    /// Seed for the opponent's RNG
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            boost: BoostTuning::default(),
            ai: AiTuning::default(),
            match_flow: MatchTuning::default(),
            seed: 0x5eed,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults and
    /// out-of-range match timings fall back to theirs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Self = serde_json::from_str(json)?;
        tuning.match_flow = tuning.match_flow.sanitized();
        Ok(tuning)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
