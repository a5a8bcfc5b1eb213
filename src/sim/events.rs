//! Presentation-facing output
//!
//! The core never touches a scene or a DOM. Each frame yields `GameEvent`s
//! for the HUD, and body transforms are pushed through a `SceneMirror`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Things the HUD/scene layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Boost meter fraction in [0, 1], every simulated frame
    BoostMeter(f32),
    ScoreChanged { player: u32, ai: u32 },
    /// Formatted `M:SS` clock, only when the text changes
    ClockChanged(String),
    /// Transient banner; the collaborator clears it after `duration` seconds
    Message { text: String, duration: f32 },
    /// A pad's visual opacity should switch to active/inactive
    PadChanged { index: usize, active: bool },
    PauseChanged(bool),
}

/// Entities whose transforms are mirrored to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Ball,
    Player,
    Ai,
}

/// Receiver of body transforms after each physics step
pub trait SceneMirror {
    fn sync(&mut self, entity: Entity, position: Vec3, orientation: Quat);
}

/// Mirror that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMirror;

impl SceneMirror for NullMirror {
    fn sync(&mut self, _entity: Entity, _position: Vec3, _orientation: Quat) {}
}

/// Format seconds as `M:SS`, rounding up so `0:00` only shows at the end
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).ceil() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180.0), "3:00");
        assert_eq!(format_clock(179.2), "3:00");
        assert_eq!(format_clock(59.01), "1:00");
        assert_eq!(format_clock(9.0), "0:09");
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }
}
