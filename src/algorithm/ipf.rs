//! Iterative proportional fitting
//!
//! Scales a joint distribution so that its aggregates over each control
//! group match the marginal targets. The fitted cell values become the
//! constraint vector the weight fitting works against.

use log::{debug, warn};

use crate::error::{Result, SynthesisError};
use crate::models::tables::{Constraint, JointDistribution, Marginal};

/// Upper bound on fitting passes over the control groups
const MAX_ITERATIONS: usize = 1000;

/// Largest tolerated deviation of a scaling factor from 1 at convergence
const TOLERANCE: f64 = 1e-6;

/// Iteration statistics of one proportional-fitting run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IpfStats {
    /// Number of passes performed
    pub iterations: usize,
    /// Largest scaling-factor deviation in the final pass
    pub max_deviation: f64,
}

/// Fit a constraint vector to the marginal targets
///
/// Returns one fitted target per `cat_id`, ordered as the joint
/// distribution's cells, plus iteration statistics. Exhausting the iteration
/// budget is a warning; the best-effort constraint is returned regardless.
pub fn calculate_constraints(
    marginal: &Marginal,
    joint_dist: &JointDistribution,
) -> Result<(Constraint, IpfStats)> {
    validate_inputs(marginal, joint_dist)?;

    let mut fitted: Vec<f64> = joint_dist.cells.iter().map(|c| c.frequency).collect();
    let mut stats = IpfStats {
        iterations: 0,
        max_deviation: f64::INFINITY,
    };

    for iteration in 1..=MAX_ITERATIONS {
        let mut max_deviation = 0.0_f64;

        // One pass scales each control group's categories to their targets
        for (group_idx, group) in marginal.groups.iter().enumerate() {
            for (label, target) in &group.cells {
                let current: f64 = joint_dist
                    .cells
                    .iter()
                    .zip(fitted.iter())
                    .filter(|(cell, _)| &cell.levels[group_idx] == label)
                    .map(|(_, value)| value)
                    .sum();

                if current <= 0.0 {
                    // No cell carries this category; nothing to scale
                    continue;
                }

                let factor = target / current;
                max_deviation = max_deviation.max((factor - 1.0).abs());

                for (cell, value) in joint_dist.cells.iter().zip(fitted.iter_mut()) {
                    if &cell.levels[group_idx] == label {
                        *value *= factor;
                    }
                }
            }
        }

        stats = IpfStats {
            iterations: iteration,
            max_deviation,
        };

        if max_deviation < TOLERANCE {
            debug!("IPF converged after {iteration} iterations");
            break;
        }

        if iteration == MAX_ITERATIONS {
            warn!(
                "IPF did not converge after {MAX_ITERATIONS} iterations \
                 (max deviation {max_deviation:.3e}); using best-effort constraint"
            );
        }
    }

    let entries = joint_dist
        .cells
        .iter()
        .map(|c| c.cat_id)
        .zip(fitted)
        .collect();

    Ok((Constraint::new(entries), stats))
}

fn validate_inputs(marginal: &Marginal, joint_dist: &JointDistribution) -> Result<()> {
    if marginal.is_empty() {
        return Err(SynthesisError::invalid_input(
            "marginal table has no control cells",
        ));
    }
    if joint_dist.is_empty() {
        return Err(SynthesisError::invalid_input(
            "joint distribution has no cells",
        ));
    }
    for cell in &joint_dist.cells {
        if cell.levels.len() != marginal.num_groups() {
            return Err(SynthesisError::invalid_input(format!(
                "joint cell {} carries {} category levels but the marginal has {} groups",
                cell.cat_id,
                cell.levels.len(),
                marginal.num_groups()
            )));
        }
    }
    Ok(())
}
