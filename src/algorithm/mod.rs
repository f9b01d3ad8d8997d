//! Numeric solvers and the synthesis drivers
//!
//! This module contains the fitting solvers used by the per-geography
//! synthesis stage, and the stage itself together with its sequential and
//! parallel drivers:
//!
//! 1. Proportional fitting of joint distributions to marginal controls
//! 2. Proportional updating of household weights against joint constraints
//! 3. Frequency-table construction from categorized samples
//! 4. Weighted drawing of synthetic households and persons
//!
//! The drivers run the full pipeline once per geography and stitch the
//! results into a single population with globally unique household ids.

pub mod categorizer;
pub mod draw;
pub mod ipf;
pub mod ipu;
pub mod stats;
pub mod synthesis;

// Re-export key entry points
pub use draw::DrawResult;
pub use ipf::IpfStats;
pub use ipu::IpuSolution;
pub use synthesis::{Synthesizer, synthesize_all, synthesize_all_in_parallel};
