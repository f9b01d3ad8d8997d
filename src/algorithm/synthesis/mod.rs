//! Geography-parallel synthesis drivers
//!
//! This module contains the per-geography synthesis stage and the two
//! drivers that run it across a set of geographies:
//!
//! 1. Zero-guard preprocessing and category namespacing
//! 2. The per-geography stage (constraint fitting, weight fitting, drawing)
//! 3. A strictly ordered sequential driver
//! 4. A worker-pool driver with submission-order reassembly
//!
//! Both drivers produce the same aggregate population for the same inputs
//! and seed; household ids are globally unique and monotonically increasing
//! in either mode.

pub mod preprocess;
pub mod sequential;
pub mod stage;

mod aggregate;
pub mod parallel;

// Re-export key entry points
pub use parallel::synthesize_all_in_parallel;
pub use sequential::synthesize_all;
pub use stage::{GeographyInputs, StageOutput, fetch_geography_inputs, synthesize_geography};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::models::geography::GeographyId;
use crate::models::population::SyntheticPopulation;
use crate::recipe::Recipe;

/// Front door for running a configured synthesis
///
/// Dispatches to the sequential or parallel driver based on the
/// configuration.
#[derive(Debug)]
pub struct Synthesizer {
    /// Synthesis configuration
    config: SynthesisConfig,
}

impl Synthesizer {
    /// Create a new synthesizer with the given configuration
    #[must_use]
    pub const fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// The configuration in effect
    #[must_use]
    pub const fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize every geography the recipe offers
    pub fn run<R: Recipe + Sync + ?Sized>(&self, recipe: &R) -> Result<SyntheticPopulation> {
        self.run_for(recipe, None)
    }

    /// Synthesize an explicit set of geographies
    pub fn run_for<R: Recipe + Sync + ?Sized>(
        &self,
        recipe: &R,
        indexes: Option<Vec<GeographyId>>,
    ) -> Result<SyntheticPopulation> {
        if self.config.use_parallel {
            synthesize_all_in_parallel(recipe, indexes, &self.config)
        } else {
            synthesize_all(recipe, indexes, &self.config)
        }
    }
}

/// Per-geography random number generator
///
/// Derives a unique seed per submission index so sequential and parallel
/// runs draw identically for the same base seed and input order.
pub(crate) fn geography_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_os_rng(),
    }
}

/// Apply the optional geography cap, keeping enumeration order
pub(crate) fn select_geographies(
    mut ids: Vec<GeographyId>,
    cap: Option<usize>,
) -> Vec<GeographyId> {
    if let Some(cap) = cap {
        ids.truncate(cap);
    }
    ids
}
