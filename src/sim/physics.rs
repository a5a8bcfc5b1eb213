//! Reference rigid-body world
//!
//! Small enough to reason about, good enough to play a match headless:
//! - Semi-implicit Euler under constant gravity
//! - Static bodies are axis-aligned boxes
//! - Dynamic boxes only rotate about Y in practice (the controllers pin pitch/roll),
//!   so their world AABB is used against static geometry
//! - Sphere vs oriented box uses the exact closest point; box vs box between
//!   dynamic bodies falls back to bounding spheres

use glam::{Quat, Vec3};

use super::body::{BodyDesc, BodyHandle, DrivableBody, PhysicsWorld, Shape};

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.82, 0.0);

/// Approach speed below which contacts do not bounce (kills resting jitter)
const REST_SPEED: f32 = 1.0;
/// Tolerance when deciding whether a whole substep fits in the accumulator
const STEP_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub shape: Shape,
    inv_mass: f32,
    inv_inertia: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    force: Vec3,
    torque: Vec3,
}

impl RigidBody {
    pub fn new(desc: BodyDesc) -> Self {
        let (inv_mass, inv_inertia) = if desc.is_static() {
            (0.0, 0.0)
        } else {
            let r = desc.shape.bounding_radius().max(0.01);
            (1.0 / desc.mass, 1.0 / (0.4 * desc.mass * r * r))
        };
        Self {
            shape: desc.shape,
            inv_mass,
            inv_inertia,
            position: desc.position,
            orientation: desc.orientation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            restitution: desc.restitution,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Half extents of the world-space bounding box
    pub fn aabb_half_extents(&self) -> Vec3 {
        match self.shape {
            Shape::Sphere { radius } => Vec3::splat(radius),
            Shape::Box { half_extents } => {
                let m = glam::Mat3::from_quat(self.orientation);
                let abs = glam::Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
                abs * half_extents
            }
        }
    }

    fn integrate(&mut self, h: f32) {
        if self.is_static() {
            return;
        }
        self.velocity += (GRAVITY + self.force * self.inv_mass) * h;
        self.velocity *= (1.0 - self.linear_damping).max(0.0).powf(h);
        self.angular_velocity += self.torque * self.inv_inertia * h;
        self.angular_velocity *= (1.0 - self.angular_damping).max(0.0).powf(h);

        self.position += self.velocity * h;
        if self.angular_velocity != Vec3::ZERO {
            let w = self.angular_velocity;
            let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.orientation;
            self.orientation = (self.orientation + spin * (0.5 * h)).normalize();
        }
    }

    fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

impl DrivableBody for RigidBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    fn apply_force(&mut self, force: Vec3, point: Vec3) {
        if self.is_static() {
            return;
        }
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    fn mass(&self) -> f32 {
        if self.is_static() { 0.0 } else { 1.0 / self.inv_mass }
    }
}

/// Contact between two bodies: `normal` points from B toward A
#[derive(Debug, Clone, Copy)]
struct Contact {
    normal: Vec3,
    depth: f32,
}

/// The built-in world used by the headless runner and the scenario tests
#[derive(Debug, Clone, Default)]
pub struct ArenaWorld {
    bodies: Vec<RigidBody>,
    accumulator: f32,
}

impl ArenaWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    fn substep(&mut self, h: f32) {
        for body in &mut self.bodies {
            body.integrate(h);
        }

        let n = self.bodies.len();
        for i in 0..n {
            if self.bodies[i].is_static() {
                continue;
            }
            for j in 0..n {
                if i == j {
                    continue;
                }
                // Dynamic pairs are visited once (i < j); statics from every dynamic
                if !self.bodies[j].is_static() && j < i {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                if let Some(contact) = detect(a, b) {
                    resolve(a, b, contact);
                }
            }
        }
    }
}

impl PhysicsWorld for ArenaWorld {
    type Body = RigidBody;

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.bodies.push(RigidBody::new(desc));
        BodyHandle(self.bodies.len() - 1)
    }

    fn body(&self, handle: BodyHandle) -> &RigidBody {
        &self.bodies[handle.0]
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle.0]
    }

    fn step(&mut self, fixed_dt: f32, real_dt: f32, max_substeps: u32) {
        if fixed_dt <= 0.0 {
            return;
        }
        self.accumulator += real_dt.max(0.0);

        let mut substeps = 0;
        while self.accumulator + STEP_EPSILON >= fixed_dt && substeps < max_substeps {
            self.substep(fixed_dt);
            self.accumulator = (self.accumulator - fixed_dt).max(0.0);
            substeps += 1;
        }
        // Drop time we could not simulate instead of spiralling next frame
        if substeps == max_substeps {
            self.accumulator = self.accumulator.min(fixed_dt * 0.5);
        }

        for body in &mut self.bodies {
            body.clear_forces();
        }
    }
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

fn detect(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    match (a.shape, b.shape) {
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => {
            sphere_box(a.position, radius, b.position, b.orientation, half_extents)
        }
        (Shape::Box { half_extents }, Shape::Sphere { radius }) => {
            sphere_box(b.position, radius, a.position, a.orientation, half_extents).map(|c| {
                Contact {
                    normal: -c.normal,
                    depth: c.depth,
                }
            })
        }
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            spheres(a.position, ra, b.position, rb)
        }
        (Shape::Box { .. }, Shape::Box { .. }) => {
            if b.is_static() {
                aabbs(a.position, a.aabb_half_extents(), b.position, b.aabb_half_extents())
            } else {
                spheres(
                    a.position,
                    a.shape.bounding_radius(),
                    b.position,
                    b.shape.bounding_radius(),
                )
            }
        }
    }
}

fn spheres(pa: Vec3, ra: f32, pb: Vec3, rb: f32) -> Option<Contact> {
    let d = pa - pb;
    let dist = d.length();
    let depth = ra + rb - dist;
    if depth <= 0.0 {
        return None;
    }
    let normal = if dist > 1e-6 { d / dist } else { Vec3::Y };
    Some(Contact { normal, depth })
}

/// Sphere (A) against an oriented box (B); normal points from box to sphere
fn sphere_box(center: Vec3, radius: f32, box_pos: Vec3, box_rot: Quat, half: Vec3) -> Option<Contact> {
    let inv = box_rot.inverse();
    let local = inv * (center - box_pos);
    let closest = local.clamp(-half, half);
    let delta = local - closest;
    let dist = delta.length();

    if dist > 1e-6 {
        if dist >= radius {
            return None;
        }
        return Some(Contact {
            normal: box_rot * (delta / dist),
            depth: radius - dist,
        });
    }

    // Centre inside the box: push out through the nearest face
    let gap = half - local.abs();
    let (axis, depth) = if gap.x <= gap.y && gap.x <= gap.z {
        (Vec3::X * local.x.signum(), gap.x)
    } else if gap.y <= gap.z {
        (Vec3::Y * local.y.signum(), gap.y)
    } else {
        (Vec3::Z * local.z.signum(), gap.z)
    };
    Some(Contact {
        normal: box_rot * axis,
        depth: depth + radius,
    })
}

fn aabbs(pa: Vec3, ha: Vec3, pb: Vec3, hb: Vec3) -> Option<Contact> {
    let d = pa - pb;
    let overlap = (ha + hb) - d.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }
    let (axis, depth) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::X * d.x.signum(), overlap.x)
    } else if overlap.y <= overlap.z {
        (Vec3::Y * d.y.signum(), overlap.y)
    } else {
        (Vec3::Z * d.z.signum(), overlap.z)
    };
    Some(Contact {
        normal: axis,
        depth,
    })
}

fn resolve(a: &mut RigidBody, b: &mut RigidBody, contact: Contact) {
    let inv_sum = a.inv_mass + b.inv_mass;
    if inv_sum == 0.0 {
        return;
    }

    let correction = contact.normal * (contact.depth / inv_sum);
    a.position += correction * a.inv_mass;
    b.position -= correction * b.inv_mass;

    let approach = (a.velocity - b.velocity).dot(contact.normal);
    if approach >= 0.0 {
        return;
    }
    let restitution = if -approach < REST_SPEED {
        0.0
    } else {
        (a.restitution * b.restitution).sqrt()
    };
    let j = -(1.0 + restitution) * approach / inv_sum;
    a.velocity += contact.normal * (j * a.inv_mass);
    b.velocity -= contact.normal * (j * b.inv_mass);
}
