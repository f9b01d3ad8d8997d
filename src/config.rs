//! Configuration for the population synthesis process
//!
//! This module provides the structure for configuring a synthesis run,
//! including zero-substitution thresholds, iteration budgets, and
//! parallelism settings.

use serde::{Deserialize, Serialize};

/// Configuration for a synthesis run
///
/// This struct defines the parameters shared by the sequential and parallel
/// drivers. The zero-substitution thresholds keep the fitting solvers
/// numerically well-posed on sparse inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Substitute for exact-zero marginal cells
    pub marginal_zero_sub: f64,

    /// Substitute for exact-zero joint-distribution frequencies
    pub jd_zero_sub: f64,

    /// Maximum number of iterations for the household weight fitting
    pub max_ipu_iterations: usize,

    /// Optional cap on the number of geographies to synthesize
    pub num_geographies: Option<usize>,

    /// Whether to use parallel processing across geographies
    pub use_parallel: bool,

    /// Number of worker threads for the parallel driver (CPU count if unset)
    pub num_threads: Option<usize>,

    /// Optional random seed for reproducible drawing
    pub random_seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            marginal_zero_sub: 0.01,    // Zero marginal problem
            jd_zero_sub: 0.001,         // Zero cell problem
            max_ipu_iterations: 20_000, // Logical bound, not a wall-clock one
            num_geographies: None,      // Synthesize every available geography
            use_parallel: true,         // Fan out across a worker pool
            num_threads: None,          // Size the pool from the CPU count
            random_seed: None,          // Draw from system entropy
        }
    }
}

impl SynthesisConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing a configuration
    #[must_use]
    pub fn builder() -> SynthesisConfigBuilder {
        SynthesisConfigBuilder::new()
    }
}

/// Builder for constructing synthesis configuration
#[derive(Debug, Clone)]
pub struct SynthesisConfigBuilder {
    config: SynthesisConfig,
}

impl Default for SynthesisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesisConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SynthesisConfig::default(),
        }
    }

    /// Set the marginal zero substitute
    #[must_use]
    pub const fn marginal_zero_sub(mut self, sub: f64) -> Self {
        self.config.marginal_zero_sub = sub;
        self
    }

    /// Set the joint-distribution zero substitute
    #[must_use]
    pub const fn jd_zero_sub(mut self, sub: f64) -> Self {
        self.config.jd_zero_sub = sub;
        self
    }

    /// Set the weight-fitting iteration budget
    #[must_use]
    pub const fn max_ipu_iterations(mut self, iterations: usize) -> Self {
        self.config.max_ipu_iterations = iterations;
        self
    }

    /// Cap the number of geographies to synthesize
    #[must_use]
    pub const fn num_geographies(mut self, num: usize) -> Self {
        self.config.num_geographies = Some(num);
        self
    }

    /// Set whether to use parallel processing
    #[must_use]
    pub const fn use_parallel(mut self, parallel: bool) -> Self {
        self.config.use_parallel = parallel;
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub const fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    /// Set the random seed
    #[must_use]
    pub const fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    /// Build the final configuration
    #[must_use]
    pub fn build(self) -> SynthesisConfig {
        self.config
    }
}
