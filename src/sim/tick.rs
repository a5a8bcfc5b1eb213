//! Per-frame simulation update
//!
//! Order within a frame is fixed:
//! input -> match clock -> player -> AI -> goal check -> pad cooldowns ->
//! pad pickups -> physics step -> mirror to scene.
//! Everything before the physics step sees last frame's resolved bodies.

use super::ai::AiController;
use super::arena::{self, AI_DEFENDING_SIDE, ArenaBodies};
use super::body::{DrivableBody, PhysicsWorld};
use super::boost::BoostPads;
use super::events::{Entity, GameEvent, SceneMirror, format_clock};
use super::input::InputSnapshot;
use super::match_state::{MatchEvent, MatchState};
use super::vehicle::{VehicleState, visual_orientation};
use crate::Tuning;
use crate::consts::{BOOST_MAX, MAX_FRAME_DT, MAX_SUBSTEPS, PHYSICS_DT};

/// The whole gameplay layer over some physics world
#[derive(Debug, Clone)]
pub struct Simulation<W: PhysicsWorld> {
    world: W,
    bodies: ArenaBodies,
    match_state: MatchState,
    player: VehicleState,
    ai: AiController,
    pads: BoostPads,
    tuning: Tuning,
    /// HUD values last reported, to emit only on change
    shown_scores: (u32, u32),
    shown_clock: String,
    /// Events raised between frames (pause, restart)
    pending: Vec<GameEvent>,
}

impl<W: PhysicsWorld> Simulation<W> {
    /// Build the arena inside `world` and start at kickoff
    pub fn new(mut world: W, tuning: Tuning) -> Self {
        let bodies = arena::build(&mut world);
        let match_state = MatchState::new(tuning.match_flow);
        let shown_clock = format_clock(match_state.remaining_time());

        let mut sim = Self {
            world,
            bodies,
            match_state,
            player: VehicleState::new(arena::player_spawn().heading),
            ai: AiController::new(arena::ai_spawn().heading, AI_DEFENDING_SIDE, tuning.seed),
            pads: BoostPads::new(arena::pad_layout()),
            tuning,
            shown_scores: (0, 0),
            shown_clock: shown_clock.clone(),
            pending: Vec::new(),
        };
        sim.pending.push(GameEvent::ScoreChanged { player: 0, ai: 0 });
        sim.pending.push(GameEvent::ClockChanged(shown_clock));
        sim.push_message(MatchEvent::KickoffStarted);
        log::info!("Simulation ready, kickoff");
        sim
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn bodies(&self) -> ArenaBodies {
        self.bodies
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn player(&self) -> &VehicleState {
        &self.player
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn pads(&self) -> &BoostPads {
        &self.pads
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Pause or resume. Never touches scores, bodies or timers.
    pub fn toggle_pause(&mut self) {
        if self.match_state.toggle_pause().is_some() {
            self.pending
                .push(GameEvent::PauseChanged(self.match_state.is_paused()));
        }
    }

    /// Start a fresh match: 0-0, full clock, full boost, kickoff layout
    pub fn restart(&mut self) {
        let was_paused = self.match_state.is_paused();
        let event = self.match_state.restart();
        self.player.boost = BOOST_MAX;
        self.reset_to_kickoff();
        if was_paused {
            self.pending.push(GameEvent::PauseChanged(false));
        }
        self.push_message(event);
        self.report_hud();
    }

    /// Run one frame. `dt` is the real elapsed time since the last frame.
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        scene: &mut impl SceneMirror,
    ) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);
        if self.match_state.is_paused() {
            return events;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        if let Some(event) = self.match_state.advance_clock(dt) {
            self.push_message(event);
        }

        let controls = self.match_state.controls_enabled();
        let input = if controls {
            *input
        } else {
            InputSnapshot::default()
        };

        let drive = self.player.drive(
            self.world.body_mut(self.bodies.player),
            &input,
            &self.tuning.vehicle,
            &self.tuning.boost,
            dt,
        );
        events.push(GameEvent::BoostMeter(drive.boost_fraction));

        if input.reset_ball {
            log::debug!("Ball reset to centre");
            self.world
                .body_mut(self.bodies.ball)
                .teleport(arena::ball_spawn(), glam::Quat::IDENTITY);
        }

        if controls {
            let ball = self.world.body(self.bodies.ball).position();
            self.ai.update(
                self.world.body_mut(self.bodies.ai),
                ball,
                &self.tuning.ai,
                &self.tuning.vehicle,
                dt,
            );
        }

        let ball = self.world.body(self.bodies.ball).position();
        if let Some(scorer) = self.match_state.check_goal(ball) {
            self.push_message(MatchEvent::Goal(scorer));
            self.reset_to_kickoff();
        }

        for index in self.pads.update_cooldowns(dt) {
            self.pending.push(GameEvent::PadChanged { index, active: true });
        }

        let player_pos = self.world.body(self.bodies.player).position();
        for index in self
            .pads
            .try_pickup(player_pos, &mut self.player.boost, &self.tuning.boost)
        {
            self.pending.push(GameEvent::PadChanged {
                index,
                active: false,
            });
        }

        self.world.step(PHYSICS_DT, dt, MAX_SUBSTEPS);
        self.mirror(scene);

        self.report_hud();
        events.append(&mut self.pending);
        events
    }

    /// Push body transforms to the scene; car meshes get cosmetic pitch
    pub fn mirror(&self, scene: &mut impl SceneMirror) {
        let ball = self.world.body(self.bodies.ball);
        scene.sync(Entity::Ball, ball.position(), ball.orientation());

        let player = self.world.body(self.bodies.player);
        scene.sync(
            Entity::Player,
            player.position(),
            visual_orientation(self.player.heading, player.velocity().y),
        );

        let ai = self.world.body(self.bodies.ai);
        scene.sync(
            Entity::Ai,
            ai.position(),
            visual_orientation(self.ai.heading, ai.velocity().y),
        );
    }

    /// Ball, both cars and all pads back to the kickoff layout
    fn reset_to_kickoff(&mut self) {
        self.world
            .body_mut(self.bodies.ball)
            .teleport(arena::ball_spawn(), glam::Quat::IDENTITY);

        let spawn = arena::player_spawn();
        self.player.heading = spawn.heading;
        self.player.grounded = true;
        self.world
            .body_mut(self.bodies.player)
            .teleport(spawn.position, crate::yaw_rotation(spawn.heading));

        let spawn = arena::ai_spawn();
        self.ai.reset(spawn.heading);
        self.world
            .body_mut(self.bodies.ai)
            .teleport(spawn.position, crate::yaw_rotation(spawn.heading));

        for index in self.pads.reset() {
            self.pending.push(GameEvent::PadChanged { index, active: true });
        }
    }

    fn push_message(&mut self, event: MatchEvent) {
        if let Some(text) = event.message() {
            self.pending.push(GameEvent::Message {
                text: text.to_string(),
                duration: self.tuning.match_flow.message_duration,
            });
        }
    }

    /// Queue score/clock updates when their displayed value changed
    fn report_hud(&mut self) {
        let scores = (self.match_state.player_score, self.match_state.ai_score);
        if scores != self.shown_scores {
            self.shown_scores = scores;
            self.pending.push(GameEvent::ScoreChanged {
                player: scores.0,
                ai: scores.1,
            });
        }
        let clock = format_clock(self.match_state.remaining_time());
        if clock != self.shown_clock {
            self.shown_clock = clock.clone();
            self.pending.push(GameEvent::ClockChanged(clock));
        }
    }
}
