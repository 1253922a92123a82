//! Crowd formation for drawing the swarm
//!
//! The swarm is one box in the simulation but is drawn as a cloud of units
//! scattered around its centre. Offsets are kept between frames so units
//! don't jump around; new ones are appended as the count grows and the tail
//! is dropped as it shrinks.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_CROWD_SPRITES;

/// Size of one drawn unit
pub const UNIT_SPRITE_SIZE: i32 = 30;

#[derive(Debug, Clone)]
pub struct CrowdLayout {
    offsets: Vec<IVec2>,
    rng: Pcg32,
}

impl CrowdLayout {
    pub fn new(seed: u64) -> Self {
        Self {
            offsets: Vec::with_capacity(MAX_CROWD_SPRITES),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Grow or trim to match `count` (capped for performance)
    pub fn update(&mut self, count: u64) {
        let shown = count.min(MAX_CROWD_SPRITES as u64) as usize;

        // Bigger crowds spread wider
        let spread = 20 + shown as i32 / 5;
        while self.offsets.len() < shown {
            let dx = self.rng.random_range(-spread..=spread);
            let dy = self.rng.random_range(-spread..=spread);
            self.offsets.push(IVec2::new(dx, dy));
        }
        self.offsets.truncate(shown);
    }

    /// Offsets from the swarm centre
    pub fn offsets(&self) -> &[IVec2] {
        &self.offsets
    }
}
