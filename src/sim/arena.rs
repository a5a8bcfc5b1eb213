//! Pitch geometry and kickoff layout
//!
//! x runs along the pitch (player attacks +x), z across it, y is up.
//! Goals are recesses cut into the middle of each end wall.

use glam::Vec3;

use super::body::{BodyDesc, PhysicsWorld, Shape};
use crate::consts::*;
use crate::yaw_rotation;

/// Where an entity starts a kickoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub position: Vec3,
    pub heading: f32,
}

pub fn ball_spawn() -> Vec3 {
    Vec3::new(0.0, BALL_RADIUS, 0.0)
}

pub fn player_spawn() -> Spawn {
    Spawn {
        position: Vec3::new(-KICKOFF_CAR_OFFSET, CAR_REST_HEIGHT, 0.0),
        heading: 0.0,
    }
}

pub fn ai_spawn() -> Spawn {
    Spawn {
        position: Vec3::new(KICKOFF_CAR_OFFSET, CAR_REST_HEIGHT, 0.0),
        heading: std::f32::consts::PI,
    }
}

/// Side of x the AI defends
pub const AI_DEFENDING_SIDE: f32 = 1.0;

/// Boost pads: four corners and two on the halfway line
pub fn pad_layout() -> [Vec3; PAD_COUNT] {
    let x = PITCH_LENGTH / 2.0 - 10.0;
    let z = PITCH_WIDTH / 2.0 - 6.0;
    [
        Vec3::new(-x, 0.0, -z),
        Vec3::new(-x, 0.0, z),
        Vec3::new(x, 0.0, -z),
        Vec3::new(x, 0.0, z),
        Vec3::new(0.0, 0.0, -z),
        Vec3::new(0.0, 0.0, z),
    ]
}

/// Static boxes (centre, half extents) making up ground, walls and goals
pub fn static_geometry() -> Vec<(Vec3, Vec3)> {
    let half_len = PITCH_LENGTH / 2.0;
    let half_wid = PITCH_WIDTH / 2.0;
    let t = WALL_THICKNESS / 2.0;
    let h = WALL_HEIGHT / 2.0;
    let goal_half = GOAL_WIDTH / 2.0;
    let outer_len = half_len + GOAL_DEPTH + WALL_THICKNESS;

    let mut boxes = vec![
        // Ground slab, extended under the goal recesses
        (
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(outer_len, 1.0, half_wid + WALL_THICKNESS),
        ),
        // Side walls
        (Vec3::new(0.0, h, half_wid + t), Vec3::new(half_len, h, t)),
        (Vec3::new(0.0, h, -(half_wid + t)), Vec3::new(half_len, h, t)),
    ];

    let segment_half = (half_wid - goal_half) / 2.0;
    let segment_z = goal_half + segment_half;
    let goal_h = GOAL_HEIGHT / 2.0;
    let bar_h = (WALL_HEIGHT - GOAL_HEIGHT) / 2.0;

    for side in [-1.0f32, 1.0] {
        let wall_x = side * (half_len + t);
        // End wall either side of the mouth
        boxes.push((Vec3::new(wall_x, h, segment_z), Vec3::new(t, h, segment_half)));
        boxes.push((Vec3::new(wall_x, h, -segment_z), Vec3::new(t, h, segment_half)));
        // Crossbar filling the wall above the mouth
        boxes.push((
            Vec3::new(wall_x, GOAL_HEIGHT + bar_h, 0.0),
            Vec3::new(t, bar_h, goal_half),
        ));
        // Goal recess: back wall, side walls, roof
        let back_x = side * (half_len + GOAL_DEPTH + t);
        boxes.push((Vec3::new(back_x, goal_h, 0.0), Vec3::new(t, goal_h, goal_half + WALL_THICKNESS)));
        let recess_x = side * (half_len + GOAL_DEPTH / 2.0);
        let recess_half = GOAL_DEPTH / 2.0;
        boxes.push((Vec3::new(recess_x, goal_h, goal_half + t), Vec3::new(recess_half, goal_h, t)));
        boxes.push((Vec3::new(recess_x, goal_h, -(goal_half + t)), Vec3::new(recess_half, goal_h, t)));
        boxes.push((
            Vec3::new(recess_x, GOAL_HEIGHT + t, 0.0),
            Vec3::new(recess_half, t, goal_half + WALL_THICKNESS),
        ));
    }
    boxes
}

/// Body handles of the dynamic entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaBodies {
    pub ball: super::body::BodyHandle,
    pub player: super::body::BodyHandle,
    pub ai: super::body::BodyHandle,
}

/// Populate a world with the pitch and the three dynamic bodies at kickoff
pub fn build<W: PhysicsWorld>(world: &mut W) -> ArenaBodies {
    for (center, half_extents) in static_geometry() {
        world.add_body(BodyDesc::fixed_box(center, half_extents));
    }

    let ball = world.add_body(
        BodyDesc::dynamic(Shape::Sphere { radius: BALL_RADIUS }, BALL_MASS, ball_spawn())
            .with_damping(BALL_LINEAR_DAMPING, BALL_ANGULAR_DAMPING)
            .with_restitution(BALL_RESTITUTION),
    );

    let car = |spawn: Spawn| {
        BodyDesc::dynamic(
            Shape::Box {
                half_extents: Vec3::from(CAR_HALF_EXTENTS),
            },
            CAR_MASS,
            spawn.position,
        )
        .with_orientation(yaw_rotation(spawn.heading))
        .with_damping(CAR_LINEAR_DAMPING, CAR_ANGULAR_DAMPING)
        .with_restitution(CAR_RESTITUTION)
    };
    let player = world.add_body(car(player_spawn()));
    let ai = world.add_body(car(ai_spawn()));

    log::debug!("Arena built: ball {ball:?}, player {player:?}, ai {ai:?}");
    ArenaBodies { ball, player, ai }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::match_state::{Scorer, goal_scored};

    #[test]
    fn test_spawns_face_each_other() {
        let p = player_spawn();
        let a = ai_spawn();
        let to_ai = (a.position - p.position).normalize();
        assert!(crate::heading_forward(p.heading).distance(to_ai) < 1e-5);
        assert!(crate::heading_forward(a.heading).distance(-to_ai) < 1e-5);
    }

    #[test]
    fn test_pads_inside_pitch_and_not_on_spawns() {
        for pad in pad_layout() {
            assert!(pad.x.abs() < PITCH_LENGTH / 2.0);
            assert!(pad.z.abs() < PITCH_WIDTH / 2.0);
            for spawn in [player_spawn().position, ai_spawn().position, ball_spawn()] {
                let d = Vec3::new(pad.x - spawn.x, 0.0, pad.z - spawn.z).length();
                assert!(d > PAD_RADIUS * 2.0);
            }
        }
    }

    #[test]
    fn test_goal_line_inside_recess() {
        // The scoring line must be reachable before the back wall
        assert!(GOAL_LINE_OFFSET + BALL_RADIUS < GOAL_DEPTH);
        let deep = Vec3::new(PITCH_LENGTH / 2.0 + GOAL_DEPTH - BALL_RADIUS, BALL_RADIUS, 0.0);
        assert_eq!(goal_scored(deep), Some(Scorer::Player));
    }

    #[test]
    fn test_no_static_box_blocks_goal_mouth() {
        let mouth = Vec3::new(PITCH_LENGTH / 2.0 + 1.0, BALL_RADIUS + 0.5, 0.0);
        for (center, half) in static_geometry() {
            let inside = (mouth - center).abs().cmplt(half).all();
            assert!(!inside, "box at {center:?} blocks the mouth");
        }
    }
}
