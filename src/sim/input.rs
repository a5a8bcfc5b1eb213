//! Per-frame input sampling
//!
//! The host keeps a map of held keys; once per frame it is turned into an
//! immutable `InputSnapshot` that every controller reads.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical driving actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    SteerLeft,
    SteerRight,
    Throttle,
    Brake,
    Boost,
    Jump,
    ResetBall,
}

/// Held state of every action for one frame. Default = nothing pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub steer_left: bool,
    pub steer_right: bool,
    pub throttle: bool,
    pub brake: bool,
    pub boost: bool,
    pub jump: bool,
    pub reset_ball: bool,
}

impl InputSnapshot {
    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::SteerLeft => self.steer_left,
            Action::SteerRight => self.steer_right,
            Action::Throttle => self.throttle,
            Action::Brake => self.brake,
            Action::Boost => self.boost,
            Action::Jump => self.jump,
            Action::ResetBall => self.reset_ball,
        }
    }

    pub fn set(&mut self, action: Action, held: bool) {
        let slot = match action {
            Action::SteerLeft => &mut self.steer_left,
            Action::SteerRight => &mut self.steer_right,
            Action::Throttle => &mut self.throttle,
            Action::Brake => &mut self.brake,
            Action::Boost => &mut self.boost,
            Action::Jump => &mut self.jump,
            Action::ResetBall => &mut self.reset_ball,
        };
        *slot = held;
    }

    /// Steering axis: +1 left, -1 right, 0 when both or neither are held
    pub fn steer_axis(&self) -> f32 {
        (self.steer_left as i8 - self.steer_right as i8) as f32
    }
}

/// Key name to action bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMap {
    bindings: HashMap<String, Action>,
    pause_keys: HashSet<String>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
            pause_keys: HashSet::new(),
        };
        for (key, action) in [
            ("ArrowLeft", Action::SteerLeft),
            ("a", Action::SteerLeft),
            ("ArrowRight", Action::SteerRight),
            ("d", Action::SteerRight),
            ("ArrowUp", Action::Throttle),
            ("w", Action::Throttle),
            ("ArrowDown", Action::Brake),
            ("s", Action::Brake),
            ("Shift", Action::Boost),
            (" ", Action::Jump),
            ("r", Action::ResetBall),
        ] {
            map.bind(key, action);
        }
        map.pause_keys.insert("p".to_string());
        map.pause_keys.insert("Escape".to_string());
        map
    }
}

impl KeyMap {
    /// Bind a key to an action (keys are matched case-insensitively)
    pub fn bind(&mut self, key: &str, action: Action) {
        self.bindings.insert(normalize_key(key), action);
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.bindings.get(&normalize_key(key)).copied()
    }

    pub fn is_pause_key(&self, key: &str) -> bool {
        self.pause_keys.contains(&normalize_key(key))
    }

    /// Build a snapshot from the keys currently held. Unknown keys are ignored.
    pub fn snapshot<'a>(&self, held: impl IntoIterator<Item = &'a str>) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        for key in held {
            if let Some(action) = self.action_for(key) {
                input.set(action, true);
            }
        }
        input
    }
}

fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}
