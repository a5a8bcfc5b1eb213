//! Scripted opponent
//!
//! Purely reactive chase-and-jump: turn toward the ball at a bounded rate,
//! hang back on the defensive half, charge on the attacking half, and
//! occasionally jump when close. The only state is the heading and the RNG.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::DrivableBody;
use super::vehicle::{damp_horizontal, is_grounded};
use crate::tuning::{AiTuning, VehicleTuning};
use crate::{heading_forward, heading_towards, planar, wrap_angle, yaw_rotation};

/// What the opponent decided this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiDecision {
    /// Heading change applied this frame (|turn| <= turn_speed * dt)
    pub turn: f32,
    /// Requested acceleration (0 when at max speed)
    pub accel: f32,
    pub jumped: bool,
    pub distance_to_ball: f32,
}

/// The AI car's controller
#[derive(Debug, Clone)]
pub struct AiController {
    pub heading: f32,
    /// Sign of x on the half this car defends
    defending_side: f32,
    rng: Pcg32,
}

impl AiController {
    /// `defending_side` is +1 when the AI's own goal is at +x
    pub fn new(heading: f32, defending_side: f32, seed: u64) -> Self {
        Self {
            heading: wrap_angle(heading),
            defending_side: defending_side.signum(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn reset(&mut self, heading: f32) {
        self.heading = wrap_angle(heading);
    }

    /// Whether a ball at `ball` is on this car's own half
    pub fn ball_on_defensive_half(&self, ball: Vec3) -> bool {
        ball.x * self.defending_side > 0.0
    }

    pub fn update(
        &mut self,
        body: &mut impl DrivableBody,
        ball: Vec3,
        ai: &AiTuning,
        vehicle: &VehicleTuning,
        dt: f32,
    ) -> AiDecision {
        let dt = dt.max(0.0);
        let position = body.position();

        // Rate-limited turn toward the ball
        let desired = heading_towards(position, ball);
        let max_turn = ai.turn_speed * dt;
        let turn = wrap_angle(desired - self.heading).clamp(-max_turn, max_turn);
        self.heading = wrap_angle(self.heading + turn);
        body.set_orientation(yaw_rotation(self.heading));
        body.set_angular_velocity(Vec3::ZERO);

        let distance = planar(ball - position).length();
        let mut accel = if self.ball_on_defensive_half(ball) {
            if distance > ai.hang_back_distance {
                ai.accel * ai.hang_back_far
            } else {
                ai.accel * ai.hang_back_near
            }
        } else {
            ai.accel
        };

        let speed = planar(body.velocity()).length();
        if speed < ai.max_speed {
            let force = heading_forward(self.heading) * (accel * body.mass());
            body.apply_force(force, position);
        } else {
            accel = 0.0;
        }

        // Probability scales with dt so the jump rate is frame-rate independent
        let mut jumped = false;
        if distance < ai.jump_range && is_grounded(position) {
            let chance = (ai.jump_rate * dt).clamp(0.0, 1.0);
            if self.rng.random::<f32>() < chance {
                let v = body.velocity();
                body.set_velocity(Vec3::new(v.x, vehicle.jump_speed * ai.jump_fraction, v.z));
                jumped = true;
                log::debug!("AI jump at distance {distance:.1}");
            }
        }

        if distance > ai.idle_distance {
            damp_horizontal(body, ai.idle_damping, dt);
        }

        AiDecision {
            turn,
            accel,
            jumped,
            distance_to_ball: distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::body::{BodyDesc, Shape};
    use crate::sim::physics::RigidBody;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn ai_car(position: Vec3) -> RigidBody {
        RigidBody::new(BodyDesc::dynamic(
            Shape::Box {
                half_extents: Vec3::from(CAR_HALF_EXTENTS),
            },
            CAR_MASS,
            position,
        ))
    }

    fn update(ai: &mut AiController, body: &mut RigidBody, ball: Vec3, dt: f32) -> AiDecision {
        ai.update(body, ball, &AiTuning::default(), &VehicleTuning::default(), dt)
    }

    #[test]
    fn test_turns_toward_ball_at_bounded_rate() {
        let mut ai = AiController::new(0.0, 1.0, 1);
        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        // Ball straight behind
        let decision = update(&mut ai, &mut body, Vec3::new(-20.0, BALL_RADIUS, 0.0), 0.1);
        assert!((decision.turn.abs() - AI_TURN_SPEED * 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_small_correction_is_exact() {
        let mut ai = AiController::new(0.0, 1.0, 1);
        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        let ball = Vec3::new(40.0, BALL_RADIUS, -1.0);
        update(&mut ai, &mut body, ball, 0.1);
        let desired = heading_towards(body.position(), ball);
        assert!((ai.heading - desired).abs() < 1e-5);
    }

    #[test]
    fn test_turn_takes_short_way_across_pi() {
        let mut ai = AiController::new(PI - 0.05, 1.0, 1);
        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        // Ball at heading -π + 0.05: 0.1 rad away across the wrap
        let ball = Vec3::new(-10.0 * 0.05f32.cos(), BALL_RADIUS, 10.0 * 0.05f32.sin());
        let decision = update(&mut ai, &mut body, ball, 1.0);
        assert!((decision.turn - 0.1).abs() < 1e-3, "turn = {}", decision.turn);
    }

    #[test]
    fn test_hangs_back_on_defensive_half() {
        let tuning = AiTuning::default();
        let mut ai = AiController::new(0.0, 1.0, 1);

        let mut body = ai_car(Vec3::new(40.0, CAR_REST_HEIGHT, 0.0));
        let far = update(&mut ai, &mut body, Vec3::new(10.0, BALL_RADIUS, 0.0), 0.01);
        assert_eq!(far.accel, tuning.accel * tuning.hang_back_far);

        let mut body = ai_car(Vec3::new(15.0, CAR_REST_HEIGHT, 20.0));
        let near = update(&mut ai, &mut body, Vec3::new(10.0, BALL_RADIUS, 20.0), 0.01);
        assert_eq!(near.accel, tuning.accel * tuning.hang_back_near);

        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        let attack = update(&mut ai, &mut body, Vec3::new(-10.0, BALL_RADIUS, 0.0), 0.01);
        assert_eq!(attack.accel, tuning.accel);
    }

    #[test]
    fn test_no_drive_at_max_speed() {
        let mut ai = AiController::new(0.0, 1.0, 1);
        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        body.set_velocity(Vec3::new(AI_MAX_SPEED + 1.0, 0.0, 0.0));
        let decision = update(&mut ai, &mut body, Vec3::new(-10.0, BALL_RADIUS, 0.0), 0.01);
        assert_eq!(decision.accel, 0.0);
    }

    #[test]
    fn test_idle_damping_when_far() {
        let mut ai = AiController::new(0.0, 1.0, 1);
        let mut body = ai_car(Vec3::new(40.0, CAR_REST_HEIGHT, 0.0));
        body.set_velocity(Vec3::new(10.0, 0.0, 0.0));
        update(&mut ai, &mut body, Vec3::new(-40.0, BALL_RADIUS, 0.0), 0.1);
        let expected = 10.0 * (1.0 - AI_IDLE_DAMPING * 0.1);
        assert!((body.velocity().x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_never_jumps_out_of_range_or_airborne() {
        let mut ai = AiController::new(0.0, 1.0, 3);
        let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
        for _ in 0..200 {
            assert!(!update(&mut ai, &mut body, Vec3::new(20.0, BALL_RADIUS, 0.0), 0.1).jumped);
        }
        let mut body = ai_car(Vec3::new(0.0, 5.0, 0.0));
        for _ in 0..200 {
            assert!(!update(&mut ai, &mut body, Vec3::new(2.0, BALL_RADIUS, 0.0), 0.1).jumped);
        }
    }

    #[test]
    fn test_jumps_eventually_when_close() {
        let mut ai = AiController::new(0.0, 1.0, 42);
        let mut jumps = 0;
        for _ in 0..200 {
            let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
            let decision = update(&mut ai, &mut body, Vec3::new(3.0, BALL_RADIUS, 0.0), 0.1);
            if decision.jumped {
                jumps += 1;
                assert!((body.velocity().y - JUMP_SPEED * AI_JUMP_FRACTION).abs() < 1e-5);
            }
        }
        // Expected ~24 with p = 0.12 per frame
        assert!(jumps > 5 && jumps < 60, "jumps = {jumps}");
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let run = |seed| {
            let mut ai = AiController::new(0.0, 1.0, seed);
            (0..100)
                .map(|_| {
                    let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
                    update(&mut ai, &mut body, Vec3::new(2.0, BALL_RADIUS, 1.0), 0.05).jumped
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    proptest! {
        #[test]
        fn prop_turn_never_exceeds_rate(
            start in -PI..PI,
            frames in prop::collection::vec((-60.0f32..60.0, -40.0f32..40.0, 0.0f32..0.5), 1..100),
        ) {
            let mut ai = AiController::new(start, 1.0, 7);
            let mut body = ai_car(Vec3::new(0.0, CAR_REST_HEIGHT, 0.0));
            for (x, z, dt) in frames {
                let before = ai.heading;
                let decision = update(&mut ai, &mut body, Vec3::new(x, BALL_RADIUS, z), dt);
                let limit = AI_TURN_SPEED * dt + 1e-4;
                prop_assert!(decision.turn.abs() <= limit);
                prop_assert!(wrap_angle(ai.heading - before).abs() <= limit);
                prop_assert!(ai.heading > -PI - 1e-6 && ai.heading <= PI + 1e-6);
            }
        }
    }
}
