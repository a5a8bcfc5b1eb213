//! Match rules: phases, clock, goals, pause and restart
//!
//! KICKOFF -> PLAYING -> (GOAL_RESET -> PLAYING)* -> FULL_TIME.
//! PAUSED can be entered from any phase except FULL_TIME and returns to the
//! phase it interrupted. Only the transitions here change scores or phase.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{GOAL_LINE_OFFSET, GOAL_WIDTH, PITCH_LENGTH};
use crate::tuning::MatchTuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Entities at kickoff layout, controls frozen for a short moment
    Kickoff,
    /// Active play, clock running
    Playing,
    /// A goal was scored; entities reset and controls frozen for the reset delay
    GoalReset,
    /// Whole simulation frozen
    Paused,
    /// Match over until restart
    FullTime,
}

/// Which side scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scorer {
    Player,
    Ai,
}

/// Transitions reported back to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    KickoffStarted,
    PlayStarted,
    Goal(Scorer),
    ResetFinished,
    FullTime,
    Paused,
    Resumed,
}

impl MatchEvent {
    /// Banner shown by the presentation layer, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            MatchEvent::KickoffStarted | MatchEvent::ResetFinished => Some("KICK-OFF"),
            MatchEvent::Goal(Scorer::Player) => Some("GOAL!"),
            MatchEvent::Goal(Scorer::Ai) => Some("AI SCORED!"),
            MatchEvent::FullTime => Some("FULL TIME"),
            _ => None,
        }
    }
}

/// Which goal, if any, a ball position is inside.
///
/// The player attacks +x and the AI attacks -x. Both lines are tested
/// independently; the player's scoring test runs first so a position that
/// satisfies both resolves the same way every time.
pub fn goal_scored(ball: Vec3) -> Option<Scorer> {
    let line = PITCH_LENGTH / 2.0 + GOAL_LINE_OFFSET;
    let within_mouth = ball.z.abs() < GOAL_WIDTH / 2.0;
    if !within_mouth {
        return None;
    }
    if ball.x > line {
        Some(Scorer::Player)
    } else if ball.x < -line {
        Some(Scorer::Ai)
    } else {
        None
    }
}

/// Score, clock and phase of the single running match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    phase: MatchPhase,
    /// Phase to return to when unpausing
    resume_phase: Option<MatchPhase>,
    pub player_score: u32,
    pub ai_score: u32,
    /// Seconds left, in [0, duration]
    remaining_time: f32,
    /// Seconds spent in the current GOAL_RESET
    reset_elapsed: f32,
    /// Seconds spent in the current KICKOFF
    kickoff_elapsed: f32,
    tuning: MatchTuning,
}

impl MatchState {
    pub fn new(tuning: MatchTuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            phase: MatchPhase::Kickoff,
            resume_phase: None,
            player_score: 0,
            ai_score: 0,
            remaining_time: tuning.duration,
            reset_elapsed: 0.0,
            kickoff_elapsed: 0.0,
            tuning,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }

    pub fn reset_elapsed(&self) -> f32 {
        self.reset_elapsed
    }

    pub fn duration(&self) -> f32 {
        self.tuning.duration
    }

    pub fn is_paused(&self) -> bool {
        self.phase == MatchPhase::Paused
    }

    /// Drivers may apply input only during open play
    pub fn controls_enabled(&self) -> bool {
        self.phase == MatchPhase::Playing
    }

    /// Advance timers by `dt`. Returns the transition it caused, if any.
    pub fn advance_clock(&mut self, dt: f32) -> Option<MatchEvent> {
        let dt = dt.max(0.0);
        match self.phase {
            MatchPhase::Kickoff => {
                self.kickoff_elapsed += dt;
                if self.kickoff_elapsed >= self.tuning.kickoff_duration {
                    self.kickoff_elapsed = 0.0;
                    self.phase = MatchPhase::Playing;
                    log::info!("Play started");
                    return Some(MatchEvent::PlayStarted);
                }
                None
            }
            MatchPhase::Playing => {
                self.remaining_time = (self.remaining_time - dt).clamp(0.0, self.tuning.duration);
                if self.remaining_time <= 0.0 {
                    self.remaining_time = 0.0;
                    self.phase = MatchPhase::FullTime;
                    log::info!("Full time: {} - {}", self.player_score, self.ai_score);
                    return Some(MatchEvent::FullTime);
                }
                None
            }
            MatchPhase::GoalReset => {
                self.reset_elapsed += dt;
                if self.reset_elapsed >= self.tuning.reset_delay {
                    self.phase = MatchPhase::Playing;
                    log::info!("Reset finished, play resumes");
                    return Some(MatchEvent::ResetFinished);
                }
                None
            }
            MatchPhase::Paused | MatchPhase::FullTime => None,
        }
    }

    /// Test the ball against both goals and award at most one goal.
    ///
    /// Only counts during open play, so a ball still sitting past the line
    /// while the reset runs can never score twice.
    pub fn check_goal(&mut self, ball: Vec3) -> Option<Scorer> {
        if self.phase != MatchPhase::Playing {
            return None;
        }
        let scorer = goal_scored(ball)?;
        match scorer {
            Scorer::Player => self.player_score += 1,
            Scorer::Ai => self.ai_score += 1,
        }
        self.phase = MatchPhase::GoalReset;
        self.reset_elapsed = 0.0;
        log::info!(
            "{:?} scored ({} - {})",
            scorer,
            self.player_score,
            self.ai_score
        );
        Some(scorer)
    }

    /// Toggle pause. FULL_TIME cannot be paused. Nothing else is touched.
    pub fn toggle_pause(&mut self) -> Option<MatchEvent> {
        match self.phase {
            MatchPhase::Paused => {
                self.phase = self.resume_phase.take().unwrap_or(MatchPhase::Playing);
                log::info!("Resumed ({:?})", self.phase);
                Some(MatchEvent::Resumed)
            }
            MatchPhase::FullTime => None,
            phase => {
                self.resume_phase = Some(phase);
                self.phase = MatchPhase::Paused;
                log::info!("Paused");
                Some(MatchEvent::Paused)
            }
        }
    }

    /// Back to 0-0 with a full clock, unpaused, at kickoff
    pub fn restart(&mut self) -> MatchEvent {
        *self = Self::new(self.tuning);
        log::info!("Match restarted");
        MatchEvent::KickoffStarted
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn playing() -> MatchState {
        let mut state = MatchState::default();
        state.advance_clock(KICKOFF_DURATION);
        assert_eq!(state.phase(), MatchPhase::Playing);
        state
    }

    fn own_goal_spot() -> Vec3 {
        Vec3::new(-(PITCH_LENGTH / 2.0 + 2.0), BALL_RADIUS, 0.0)
    }

    #[test]
    fn test_starts_in_kickoff() {
        let state = MatchState::default();
        assert_eq!(state.phase(), MatchPhase::Kickoff);
        assert_eq!(state.remaining_time(), MATCH_DURATION);
        assert!(!state.controls_enabled());
    }

    #[test]
    fn test_clock_frozen_during_kickoff() {
        let mut state = MatchState::default();
        state.advance_clock(KICKOFF_DURATION * 0.5);
        assert_eq!(state.remaining_time(), MATCH_DURATION);
        assert_eq!(state.advance_clock(KICKOFF_DURATION), Some(MatchEvent::PlayStarted));
    }

    #[test]
    fn test_ai_goal_then_reset() {
        let mut state = playing();
        assert_eq!(state.check_goal(own_goal_spot()), Some(Scorer::Ai));
        assert_eq!(state.ai_score, 1);
        assert_eq!(state.player_score, 0);
        assert_eq!(state.phase(), MatchPhase::GoalReset);
        assert_eq!(state.reset_elapsed(), 0.0);
        assert!(!state.controls_enabled());

        assert_eq!(state.advance_clock(RESET_DELAY - 0.5), None);
        assert_eq!(state.advance_clock(0.5), Some(MatchEvent::ResetFinished));
        assert_eq!(state.phase(), MatchPhase::Playing);
    }

    #[test]
    fn test_goal_counted_once_during_reset() {
        let mut state = playing();
        state.check_goal(own_goal_spot());
        for _ in 0..100 {
            assert_eq!(state.check_goal(own_goal_spot()), None);
            state.advance_clock(0.01);
        }
        assert_eq!(state.ai_score, 1);
    }

    #[test]
    fn test_goal_needs_ball_inside_mouth() {
        let wide = Vec3::new(PITCH_LENGTH / 2.0 + 3.0, BALL_RADIUS, GOAL_WIDTH / 2.0 + 0.1);
        assert_eq!(goal_scored(wide), None);
        let short = Vec3::new(PITCH_LENGTH / 2.0 + GOAL_LINE_OFFSET - 0.1, BALL_RADIUS, 0.0);
        assert_eq!(goal_scored(short), None);
        let inside = Vec3::new(PITCH_LENGTH / 2.0 + 2.0, BALL_RADIUS, 3.0);
        assert_eq!(goal_scored(inside), Some(Scorer::Player));
    }

    #[test]
    fn test_no_goal_outside_playing() {
        let mut state = MatchState::default();
        assert_eq!(state.check_goal(own_goal_spot()), None);
        assert_eq!(state.ai_score, 0);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut state = playing();
        state.remaining_time = 0.5;
        assert_eq!(state.advance_clock(1.0), Some(MatchEvent::FullTime));
        assert_eq!(state.remaining_time(), 0.0);
        assert_eq!(state.phase(), MatchPhase::FullTime);
        assert_eq!(state.advance_clock(1.0), None);
        assert_eq!(state.check_goal(own_goal_spot()), None);
    }

    #[test]
    fn test_pause_round_trip_preserves_state() {
        let mut state = playing();
        state.advance_clock(12.3);
        let before = state.clone();
        assert_eq!(state.toggle_pause(), Some(MatchEvent::Paused));
        assert!(state.is_paused());
        assert_eq!(state.advance_clock(5.0), None);
        assert_eq!(state.check_goal(own_goal_spot()), None);
        assert_eq!(state.toggle_pause(), Some(MatchEvent::Resumed));
        assert_eq!(state, before);
    }

    #[test]
    fn test_pause_returns_to_goal_reset() {
        let mut state = playing();
        state.check_goal(own_goal_spot());
        state.toggle_pause();
        state.toggle_pause();
        assert_eq!(state.phase(), MatchPhase::GoalReset);
    }

    #[test]
    fn test_full_time_cannot_pause() {
        let mut state = playing();
        state.advance_clock(MATCH_DURATION + 1.0);
        assert_eq!(state.toggle_pause(), None);
        assert_eq!(state.phase(), MatchPhase::FullTime);
    }

    #[test]
    fn test_restart_from_full_time() {
        let mut state = playing();
        state.check_goal(own_goal_spot());
        state.advance_clock(RESET_DELAY);
        state.check_goal(Vec3::new(PITCH_LENGTH / 2.0 + 2.0, BALL_RADIUS, 0.0));
        state.advance_clock(RESET_DELAY);
        state.advance_clock(MATCH_DURATION);
        assert_eq!(state.phase(), MatchPhase::FullTime);
        assert_eq!((state.player_score, state.ai_score), (1, 1));

        assert_eq!(state.restart(), MatchEvent::KickoffStarted);
        assert_eq!((state.player_score, state.ai_score), (0, 0));
        assert_eq!(state.phase(), MatchPhase::Kickoff);
        assert_eq!(state.remaining_time(), MATCH_DURATION);
    }

    #[test]
    fn test_restart_clears_pause() {
        let mut state = playing();
        state.toggle_pause();
        state.restart();
        assert!(!state.is_paused());
    }

    #[test]
    fn test_messages() {
        assert_eq!(MatchEvent::KickoffStarted.message(), Some("KICK-OFF"));
        assert_eq!(MatchEvent::ResetFinished.message(), Some("KICK-OFF"));
        assert_eq!(MatchEvent::Goal(Scorer::Player).message(), Some("GOAL!"));
        assert_eq!(MatchEvent::Goal(Scorer::Ai).message(), Some("AI SCORED!"));
        assert_eq!(MatchEvent::FullTime.message(), Some("FULL TIME"));
        assert_eq!(MatchEvent::Paused.message(), None);
    }

    proptest! {
        #[test]
        fn prop_clock_in_range(dts in prop::collection::vec(0.0f32..3.0, 1..400)) {
            let mut state = MatchState::default();
            for dt in dts {
                state.advance_clock(dt);
                prop_assert!(state.remaining_time() >= 0.0);
                prop_assert!(state.remaining_time() <= MATCH_DURATION);
            }
        }
    }
}
