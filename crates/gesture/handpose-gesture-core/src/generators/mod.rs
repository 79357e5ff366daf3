//! Procedural gesture generators.
//!
//! A [`ModuleGenerator`] produces a [`GestureSet`] from a seeded RNG.
//! Operators ([`AllOf`], [`OneOf`], [`SomeOf`]) combine generators; every
//! merge rejects duplicate gesture ids.

mod operators;
mod perlin;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::declaration::GestureSet;
use crate::error::Result;

pub use operators::{AllOf, OneOf, SomeOf};
pub use perlin::{PerlinRotationSineGenerator, PerlinRotationWaveGenerator, PerlinParams};

/// Highest priority; operators generate lower values first.
pub const HIGHEST_PRIORITY: u32 = 0;
pub const LOWEST_PRIORITY: u32 = u32::MAX;

/// Shared state threaded through a generation pass.
#[derive(Debug)]
pub struct GenContext {
    pub rng: StdRng,
    pub frame_rate: u32,
}

impl GenContext {
    pub fn new(seed: u64, frame_rate: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame_rate,
        }
    }

    /// Uniform draw from `[lo, hi)`, or `lo` when the range is empty.
    pub(crate) fn uniform(&mut self, (lo, hi): (f32, f32)) -> f32 {
        if hi > lo {
            self.rng.gen_range(lo..hi)
        } else {
            lo
        }
    }
}

pub trait ModuleGenerator: std::fmt::Debug {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet>;

    /// Relative selection weight inside [`OneOf`].
    fn weight(&self) -> f32 {
        1.0
    }

    fn priority(&self) -> u32 {
        LOWEST_PRIORITY
    }
}

/// Output of [`generate_gestures`]; keep the seed to reproduce the set.
#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    pub seed: u64,
    pub gestures: GestureSet,
}

/// Run every module in order and merge their gestures.
pub fn generate_gestures(
    modules: &[Box<dyn ModuleGenerator>],
    cfg: &GeneratorConfig,
) -> Result<Generated> {
    let seed = cfg.seed.unwrap_or_else(rand::random);
    info!("generating gestures from {} modules, seed {seed}", modules.len());
    let mut ctx = GenContext::new(seed, cfg.frame_rate);
    let mut gestures = GestureSet::new();
    for module in modules {
        gestures.merge(module.generate(&mut ctx)?)?;
    }
    Ok(Generated { seed, gestures })
}
