//! Injectable random source for question and pattern generation.
//!
//! Drills own a [`DrillRng`]. Production code seeds from entropy; tests and
//! the CLI `--seed` flag get reproducible sequences from [`seeded`].

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub type DrillRng = Box<dyn RngCore>;

pub fn from_entropy() -> DrillRng {
    Box::new(StdRng::from_entropy())
}

pub fn seeded(seed: u64) -> DrillRng {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Child generator drawn from `parent`, so a seeded parent yields
/// reproducible children.
pub fn fork(parent: &mut dyn RngCore) -> DrillRng {
    seeded(parent.next_u64())
}
