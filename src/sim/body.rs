//! Rigid-body collaborator boundary
//!
//! Controllers only see `DrivableBody`. Whatever engine resolves collisions
//! sits behind `PhysicsWorld`; `super::physics::ArenaWorld` is the built-in one.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The narrow view of a rigid body that gameplay code drives
pub trait DrivableBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn orientation(&self) -> Quat;
    fn set_orientation(&mut self, orientation: Quat);
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
    /// Apply a world-space force at a world-space point for the next step
    fn apply_force(&mut self, force: Vec3, point: Vec3);
    fn mass(&self) -> f32;

    /// Place the body at rest with the given pose
    fn teleport(&mut self, position: Vec3, orientation: Quat) {
        self.set_position(position);
        self.set_orientation(orientation);
        self.set_velocity(Vec3::ZERO);
        self.set_angular_velocity(Vec3::ZERO);
    }
}

/// Index of a body inside a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub usize);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl Shape {
    /// Radius of the smallest sphere enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { radius } => radius,
            Shape::Box { half_extents } => half_extents.length(),
        }
    }
}

/// Construction parameters for a body. Zero mass makes it static.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: Shape,
    pub mass: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
}

impl BodyDesc {
    /// Immovable box (walls, ground)
    pub fn fixed_box(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            shape: Shape::Box { half_extents },
            mass: 0.0,
            position: center,
            orientation: Quat::IDENTITY,
            linear_damping: 0.0,
            angular_damping: 0.0,
            restitution: 0.5,
        }
    }

    pub fn dynamic(shape: Shape, mass: f32, position: Vec3) -> Self {
        Self {
            shape,
            mass,
            position,
            orientation: Quat::IDENTITY,
            linear_damping: 0.01,
            angular_damping: 0.01,
            restitution: 0.5,
        }
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

/// A world of rigid bodies advanced in fixed steps
pub trait PhysicsWorld {
    type Body: DrivableBody;

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn body(&self, handle: BodyHandle) -> &Self::Body;
    fn body_mut(&mut self, handle: BodyHandle) -> &mut Self::Body;
    /// Advance by `real_dt`, using fixed substeps of `fixed_dt` (at most `max_substeps`)
    fn step(&mut self, fixed_dt: f32, real_dt: f32, max_substeps: u32);
}
