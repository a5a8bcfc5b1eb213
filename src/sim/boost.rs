//! Boost pads
//!
//! A fixed set of pads created once per session. Picking one up refills the
//! player's meter to full and starts the pad's cooldown.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::BOOST_MAX;
use crate::tuning::BoostTuning;

/// A single pad. `active` holds exactly when `cooldown_remaining == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostPad {
    pub position: Vec3,
    pub active: bool,
    pub cooldown_remaining: f32,
}

impl BoostPad {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            active: true,
            cooldown_remaining: 0.0,
        }
    }

    /// Squared ground-plane distance from a point to the pad centre
    pub fn planar_distance_sq(&self, point: Vec3) -> f32 {
        let dx = point.x - self.position.x;
        let dz = point.z - self.position.z;
        dx * dx + dz * dz
    }

    /// Advance the cooldown. Returns true when the pad just reactivated.
    fn tick(&mut self, dt: f32) -> bool {
        if self.active {
            return false;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.cooldown_remaining = 0.0;
            self.active = true;
            return true;
        }
        false
    }

    fn consume(&mut self, cooldown: f32) {
        self.active = false;
        self.cooldown_remaining = cooldown.max(0.0);
        // A zero cooldown would otherwise break the active/cooldown invariant
        if self.cooldown_remaining == 0.0 {
            self.active = true;
        }
    }
}

/// All pads on the pitch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPads {
    pads: Vec<BoostPad>,
}

impl BoostPads {
    pub fn new(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            pads: positions.into_iter().map(BoostPad::new).collect(),
        }
    }

    pub fn pads(&self) -> &[BoostPad] {
        &self.pads
    }

    /// Decay cooldowns of inactive pads. Returns indices of pads that became active.
    pub fn update_cooldowns(&mut self, dt: f32) -> Vec<usize> {
        self.pads
            .iter_mut()
            .enumerate()
            .filter_map(|(i, pad)| pad.tick(dt).then_some(i))
            .collect()
    }

    /// Consume every active pad within reach of `player`, refilling `boost`.
    ///
    /// Returns the indices of the consumed pads. Inactive pads are never touched.
    pub fn try_pickup(&mut self, player: Vec3, boost: &mut f32, tuning: &BoostTuning) -> Vec<usize> {
        let reach_sq = tuning.pad_radius * tuning.pad_radius;
        let mut picked = Vec::new();
        for (index, pad) in self.pads.iter_mut().enumerate() {
            if pad.active && pad.planar_distance_sq(player) <= reach_sq {
                pad.consume(tuning.pad_cooldown);
                picked.push(index);
                log::debug!("Boost pad {index} picked up");
            }
        }
        if !picked.is_empty() {
            *boost = BOOST_MAX;
        }
        picked
    }

    /// Reactivate every pad. Returns indices of pads that were inactive.
    pub fn reset(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for (i, pad) in self.pads.iter_mut().enumerate() {
            if !pad.active {
                changed.push(i);
            }
            pad.active = true;
            pad.cooldown_remaining = 0.0;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pads() -> BoostPads {
        BoostPads::new([Vec3::new(10.0, 0.0, 0.0), Vec3::new(-10.0, 0.0, 5.0)])
    }

    #[test]
    fn test_pickup_refills_to_full() {
        let mut pads = pads();
        let tuning = BoostTuning::default();
        let mut boost = 12.0;

        let picked = pads.try_pickup(Vec3::new(11.0, 3.0, 1.0), &mut boost, &tuning);
        assert_eq!(picked, vec![0]);
        assert_eq!(boost, BOOST_MAX);
        assert!(!pads.pads()[0].active);
        assert_eq!(pads.pads()[0].cooldown_remaining, tuning.pad_cooldown);
    }

    #[test]
    fn test_pickup_uses_planar_distance() {
        let mut pads = pads();
        let tuning = BoostTuning::default();
        let mut boost = 0.0;
        // Height is ignored: directly above the pad still counts
        assert_eq!(pads.try_pickup(Vec3::new(10.0, 50.0, 0.0), &mut boost, &tuning), vec![0]);

        let mut boost = 0.0;
        let outside = Vec3::new(-10.0, 0.0, 5.0 + tuning.pad_radius + 0.01);
        assert!(pads.try_pickup(outside, &mut boost, &tuning).is_empty());
        assert_eq!(boost, 0.0);
    }

    #[test]
    fn test_inactive_pad_yields_nothing() {
        let mut pads = pads();
        let tuning = BoostTuning::default();
        let mut boost = 0.0;
        pads.try_pickup(Vec3::new(10.0, 0.0, 0.0), &mut boost, &tuning);

        let mut boost = 5.0;
        let before = pads.clone();
        assert!(pads.try_pickup(Vec3::new(10.0, 0.0, 0.0), &mut boost, &tuning).is_empty());
        assert_eq!(boost, 5.0);
        assert_eq!(pads, before);
    }

    #[test]
    fn test_overlapping_pads_all_consumed() {
        let mut pads = BoostPads::new([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
        ]);
        let tuning = BoostTuning::default();
        let mut boost = 3.0;
        assert_eq!(pads.try_pickup(Vec3::new(0.5, 0.0, 0.0), &mut boost, &tuning), vec![0, 1]);
        assert_eq!(boost, BOOST_MAX);
        assert!(!pads.pads()[0].active);
        assert!(!pads.pads()[1].active);
        assert!(pads.pads()[2].active);
    }

    #[test]
    fn test_cooldown_reactivates() {
        let mut pads = pads();
        let tuning = BoostTuning::default();
        let mut boost = 0.0;
        pads.try_pickup(Vec3::new(10.0, 0.0, 0.0), &mut boost, &tuning);

        assert!(pads.update_cooldowns(tuning.pad_cooldown - 1.0).is_empty());
        assert!(!pads.pads()[0].active);
        assert_eq!(pads.update_cooldowns(2.0), vec![0]);
        assert!(pads.pads()[0].active);
        assert_eq!(pads.pads()[0].cooldown_remaining, 0.0);
    }

    #[test]
    fn test_reset_reports_changed_pads() {
        let mut pads = pads();
        let tuning = BoostTuning::default();
        let mut boost = 0.0;
        pads.try_pickup(Vec3::new(-10.0, 0.0, 5.0), &mut boost, &tuning);
        assert_eq!(pads.reset(), vec![1]);
        assert!(pads.pads().iter().all(|p| p.active && p.cooldown_remaining == 0.0));
        assert!(pads.reset().is_empty());
    }

    proptest! {
        #[test]
        fn prop_active_iff_no_cooldown(
            steps in prop::collection::vec((0.0f32..2.0, -12.0f32..12.0, -6.0f32..6.0), 1..200)
        ) {
            let mut pads = pads();
            let tuning = BoostTuning::default();
            for (dt, x, z) in steps {
                pads.update_cooldowns(dt);
                let mut boost = 0.0;
                let before = pads.clone();
                let picked = pads.try_pickup(Vec3::new(x, 0.0, z), &mut boost, &tuning);
                for &i in &picked {
                    prop_assert!(before.pads()[i].active);
                }
                if !picked.is_empty() {
                    prop_assert_eq!(boost, BOOST_MAX);
                }
                for pad in pads.pads() {
                    prop_assert_eq!(pad.active, pad.cooldown_remaining == 0.0);
                    prop_assert!(pad.cooldown_remaining >= 0.0);
                }
            }
        }
    }
}
