//! A Rust library for synthesizing household and person populations that
//! reproduce known aggregate statistics for many independent geographies,
//! drawing from a reference survey sample.
//!
//! The synthesis pipeline fits a constraint vector per category (iterative
//! proportional fitting), fits per-household weights against household and
//! person constraints simultaneously (iterative proportional updating), and
//! draws weighted samples to materialize the target number of households per
//! geography. A sequential driver and a worker-pool driver stitch the
//! per-geography results into one population with globally unique,
//! monotonically increasing household ids.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod recipe;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::SynthesisConfig;
pub use error::{Result, SynthesisError};
pub use models::geography::GeographyId;
pub use models::population::{
    FitQuality, HouseholdRecord, HouseholdTable, PersonRecord, PersonTable, SynthesisFailure,
    SyntheticPopulation,
};
pub use models::tables::{
    CatId, Constraint, FrequencyTable, JointCell, JointDistribution, Marginal, MarginalGroup,
    SampleRecord, SampleTable,
};

// Data acquisition seam
pub use recipe::{GeographyData, InMemoryRecipe, Recipe};

// Synthesis entry points
pub use algorithm::synthesis::{Synthesizer, synthesize_all, synthesize_all_in_parallel};

// Logging setup
pub use utils::logging::enable_logging;
