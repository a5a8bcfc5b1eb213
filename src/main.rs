//! Turbo Pitch headless runner
//!
//! Plays one full match at 60 fps against the scripted opponent, with the
//! player's car driven by a simple chase autopilot, and prints the result.
//!
//! Usage: `turbo-pitch [tuning.json]`

use std::path::Path;

use glam::Vec3;

use turbo_pitch::Tuning;
use turbo_pitch::consts::PITCH_LENGTH;
use turbo_pitch::sim::{
    ArenaWorld, DrivableBody, GameEvent, InputSnapshot, MatchPhase, NullMirror, PhysicsWorld,
    Simulation,
};
use turbo_pitch::{heading_towards, wrap_angle};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Safety cap: a match plus every possible reset fits comfortably
const MAX_FRAMES: u32 = 60 * 60 * 30;

/// Steer toward a point behind the ball (relative to the AI goal) and drive
fn autopilot(sim: &Simulation<ArenaWorld>) -> InputSnapshot {
    let bodies = sim.bodies();
    let car = sim.world().body(bodies.player).position();
    let ball = sim.world().body(bodies.ball).position();

    let target_goal = Vec3::new(PITCH_LENGTH / 2.0, 0.0, 0.0);
    let approach = ball + (ball - target_goal).normalize_or_zero() * 3.0;
    let heading = sim.player().heading;
    let error = wrap_angle(heading_towards(car, approach) - heading);

    let distance = Vec3::new(ball.x - car.x, 0.0, ball.z - car.z).length();
    InputSnapshot {
        steer_left: error > 0.1,
        steer_right: error < -0.1,
        throttle: error.abs() < 1.8,
        brake: error.abs() >= 1.8,
        boost: error.abs() < 0.3 && distance > 20.0,
        jump: distance < 4.0 && ball.y > 2.5,
        reset_ball: false,
    }
}

fn main() {
    env_logger::init();
    log::info!("Turbo Pitch (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load_or_default(Path::new(&path)),
        None => Tuning::default(),
    };

    let mut sim = Simulation::new(ArenaWorld::new(), tuning);
    let mut mirror = NullMirror;
    let mut elapsed = 0.0f32;

    for _ in 0..MAX_FRAMES {
        let input = autopilot(&sim);
        for event in sim.frame(&input, FRAME_DT, &mut mirror) {
            match event {
                GameEvent::Message { text, .. } => {
                    println!("[{:>6.1}s] {text}", elapsed);
                }
                GameEvent::ScoreChanged { player, ai } => {
                    log::info!("Score {player} - {ai}");
                }
                GameEvent::ClockChanged(clock) => log::debug!("Clock {clock}"),
                GameEvent::PadChanged { index, active } => {
                    log::debug!("Pad {index} {}", if active { "ready" } else { "taken" });
                }
                GameEvent::BoostMeter(_) | GameEvent::PauseChanged(_) => {}
            }
        }
        elapsed += FRAME_DT;

        if sim.match_state().phase() == MatchPhase::FullTime {
            break;
        }
    }

    let state = sim.match_state();
    if state.phase() != MatchPhase::FullTime {
        log::warn!("Stopped before full time after {elapsed:.1}s");
    }
    println!(
        "Final score: player {} - {} AI ({:.1}s simulated)",
        state.player_score, state.ai_score, elapsed
    );
}
