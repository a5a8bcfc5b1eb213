//! Player vehicle controller
//!
//! The car is an oriented box pushed around by direct forces. Heading is owned
//! here and written to the body as a yaw-only orientation every frame.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::body::DrivableBody;
use super::input::InputSnapshot;
use crate::consts::{BOOST_MAX, CAR_REST_HEIGHT, GROUND_EPSILON};
use crate::tuning::{BoostTuning, VehicleTuning};
use crate::{heading_forward, planar, wrap_angle, yaw_rotation};

/// Whether a body at this height is touching the ground
#[inline]
pub fn is_grounded(position: Vec3) -> bool {
    position.y <= CAR_REST_HEIGHT + GROUND_EPSILON
}

/// Scale horizontal velocity by `1 - rate * dt` (never below zero)
pub fn damp_horizontal(body: &mut impl DrivableBody, rate: f32, dt: f32) {
    let factor = (1.0 - rate * dt).clamp(0.0, 1.0);
    let v = body.velocity();
    body.set_velocity(Vec3::new(v.x * factor, v.y, v.z * factor));
}

/// Cosmetic mesh orientation: yaw plus a nose pitch from vertical speed.
/// Never fed back into the body.
pub fn visual_orientation(heading: f32, vertical_speed: f32) -> Quat {
    let pitch = (vertical_speed * 0.03).clamp(-0.35, 0.35);
    yaw_rotation(heading) * Quat::from_rotation_z(pitch)
}

/// What the controller did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveOutput {
    /// Boost meter as a fraction in [0, 1]
    pub boost_fraction: f32,
    pub boosting: bool,
    pub jumped: bool,
    /// Longitudinal acceleration that was requested (before the speed cap)
    pub accel: f32,
}

/// State of the player's car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Yaw in radians, kept in (-π, π]
    pub heading: f32,
    /// Boost meter in [0, 100]
    pub boost: f32,
    /// Refreshed from the body height each frame
    pub grounded: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl VehicleState {
    pub fn new(heading: f32) -> Self {
        Self {
            heading: wrap_angle(heading),
            boost: BOOST_MAX,
            grounded: true,
        }
    }

    pub fn boost_fraction(&self) -> f32 {
        (self.boost / BOOST_MAX).clamp(0.0, 1.0)
    }

    /// Apply one frame of input to the body
    pub fn drive(
        &mut self,
        body: &mut impl DrivableBody,
        input: &InputSnapshot,
        vehicle: &VehicleTuning,
        boost: &BoostTuning,
        dt: f32,
    ) -> DriveOutput {
        let dt = dt.max(0.0);

        // Steering: opposing keys cancel
        self.heading = wrap_angle(self.heading + input.steer_axis() * vehicle.turn_speed * dt);
        body.set_orientation(yaw_rotation(self.heading));
        body.set_angular_velocity(Vec3::ZERO);

        let mut accel = if input.throttle {
            vehicle.accel
        } else if input.brake {
            -vehicle.brake_factor * vehicle.accel
        } else {
            0.0
        };

        let boosting = input.boost && input.throttle && self.boost > 0.0;
        let mut max_speed = vehicle.max_speed;
        if boosting {
            self.boost -= boost.drain * dt;
            accel += boost.accel;
            max_speed *= boost.speed_multiplier;
        } else {
            self.boost += boost.regen * dt;
        }
        self.boost = self.boost.clamp(0.0, BOOST_MAX);

        if accel != 0.0 {
            let speed = planar(body.velocity()).length();
            // Braking always gets through the cap
            if speed < max_speed || accel < 0.0 {
                let force = heading_forward(self.heading) * (accel * body.mass());
                let point = body.position();
                body.apply_force(force, point);
                log::trace!("drive force {force:?}");
            }
        } else {
            damp_horizontal(body, vehicle.rolling_resistance, dt);
        }

        self.grounded = is_grounded(body.position());
        let jumped = input.jump && self.grounded;
        if jumped {
            let v = body.velocity();
            body.set_velocity(Vec3::new(v.x, vehicle.jump_speed, v.z));
        }

        DriveOutput {
            boost_fraction: self.boost_fraction(),
            boosting,
            jumped,
            accel,
        }
    }
}
