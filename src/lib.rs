//! Turbo Pitch - gameplay core for a two-car, one-ball arena sport
//!
//! Core modules:
//! - `sim`: Frame simulation (vehicle, AI, boost pads, match rules)
//! - `tuning`: Data-driven game balance, loaded once at startup
//!
//! Rigid-body dynamics and rendering are collaborators behind the traits in
//! `sim::body` and `sim::events`. A small reference world lives in
//! `sim::physics` for headless runs.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Nominal physics rate (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Maximum physics substeps per frame
    pub const MAX_SUBSTEPS: u32 = 3;
    /// Largest frame delta accepted from the host (prevents huge jumps after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Pitch dimensions (x = length, z = width, y = up)
    pub const PITCH_LENGTH: f32 = 100.0;
    pub const PITCH_WIDTH: f32 = 64.0;
    pub const WALL_HEIGHT: f32 = 12.0;
    pub const WALL_THICKNESS: f32 = 2.0;

    /// Goals sit in a recess behind each end wall
    pub const GOAL_WIDTH: f32 = 16.0;
    pub const GOAL_DEPTH: f32 = 6.0;
    pub const GOAL_HEIGHT: f32 = 8.0;
    /// Goal line distance beyond the end wall plane
    pub const GOAL_LINE_OFFSET: f32 = 1.5;

    /// Ball
    pub const BALL_RADIUS: f32 = 1.5;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_LINEAR_DAMPING: f32 = 0.1;
    pub const BALL_ANGULAR_DAMPING: f32 = 0.1;
    pub const BALL_RESTITUTION: f32 = 0.7;

    /// Cars are oriented boxes (half extents: length, height, width)
    pub const CAR_HALF_EXTENTS: [f32; 3] = [2.0, 0.6, 1.1];
    pub const CAR_MASS: f32 = 10.0;
    pub const CAR_LINEAR_DAMPING: f32 = 0.05;
    pub const CAR_ANGULAR_DAMPING: f32 = 0.9;
    pub const CAR_RESTITUTION: f32 = 0.2;
    /// Body centre height when resting on the ground
    pub const CAR_REST_HEIGHT: f32 = CAR_HALF_EXTENTS[1];
    /// Tolerance above rest height still counted as grounded
    pub const GROUND_EPSILON: f32 = 0.1;

    /// Player drive
    pub const TURN_SPEED: f32 = 2.6; // rad/s
    pub const ACCEL: f32 = 28.0;
    pub const BRAKE_FACTOR: f32 = 0.7;
    pub const MAX_SPEED: f32 = 30.0;
    pub const ROLLING_RESISTANCE: f32 = 1.5;
    pub const JUMP_SPEED: f32 = 11.0;

    /// Boost
    pub const BOOST_MAX: f32 = 100.0;
    pub const BOOST_DRAIN: f32 = 40.0; // per second
    pub const BOOST_REGEN: f32 = 6.0; // per second
    pub const BOOST_ACCEL: f32 = 45.0;
    pub const BOOST_SPEED_MULTIPLIER: f32 = 1.5;

    /// Boost pads
    pub const PAD_COUNT: usize = 6;
    pub const PAD_RADIUS: f32 = 2.5;
    pub const PAD_COOLDOWN: f32 = 10.0;

    /// AI opponent
    pub const AI_TURN_SPEED: f32 = 2.2;
    pub const AI_ACCEL: f32 = 24.0;
    pub const AI_MAX_SPEED: f32 = 24.0;
    /// Throttle scale on the defensive half, far from / close to the ball
    pub const AI_HANG_BACK_FAR: f32 = 0.6;
    pub const AI_HANG_BACK_NEAR: f32 = 0.3;
    pub const AI_HANG_BACK_DISTANCE: f32 = 15.0;
    pub const AI_JUMP_RANGE: f32 = 6.0;
    /// Expected jumps per second while in range
    pub const AI_JUMP_RATE: f32 = 1.2;
    /// Fraction of the player's jump speed
    pub const AI_JUMP_FRACTION: f32 = 0.8;
    pub const AI_IDLE_DISTANCE: f32 = 30.0;
    pub const AI_IDLE_DAMPING: f32 = 1.0;

    /// Match flow
    pub const MATCH_DURATION: f32 = 180.0;
    pub const RESET_DELAY: f32 = 3.0;
    pub const KICKOFF_DURATION: f32 = 1.5;
    pub const MESSAGE_DURATION: f32 = 2.0;

    /// Kickoff layout
    pub const KICKOFF_CAR_OFFSET: f32 = 30.0;
}

/// Wrap an angle to (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Forward direction of a vehicle for the given heading (yaw about +Y)
#[inline]
pub fn heading_forward(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), 0.0, -heading.sin())
}

/// Heading that points from `from` toward `to`, ignoring height
#[inline]
pub fn heading_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    (-d.z).atan2(d.x)
}

/// Yaw-only orientation for a heading
#[inline]
pub fn yaw_rotation(heading: f32) -> Quat {
    Quat::from_rotation_y(heading)
}

/// Project a vector onto the ground plane
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
