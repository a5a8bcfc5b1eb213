//! Gameplay simulation module
//!
//! Everything between raw input and the physics step lives here:
//! - Single-threaded, one `Simulation::frame` per host refresh
//! - Controllers talk to bodies only through `DrivableBody`
//! - Seeded RNG only (the AI's jump roll)
//! - No rendering or platform dependencies

pub mod ai;
pub mod arena;
pub mod body;
pub mod boost;
pub mod events;
pub mod input;
pub mod match_state;
pub mod physics;
pub mod tick;
pub mod vehicle;

pub use ai::{AiController, AiDecision};
pub use arena::ArenaBodies;
pub use body::{BodyDesc, BodyHandle, DrivableBody, PhysicsWorld, Shape};
pub use boost::{BoostPad, BoostPads};
pub use events::{Entity, GameEvent, NullMirror, SceneMirror, format_clock};
pub use input::{Action, InputSnapshot, KeyMap};
pub use match_state::{MatchEvent, MatchPhase, MatchState, Scorer, goal_scored};
pub use physics::{ArenaWorld, RigidBody};
pub use tick::Simulation;
pub use vehicle::{DriveOutput, VehicleState};
