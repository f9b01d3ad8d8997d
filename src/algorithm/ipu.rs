//! Iterative proportional updating
//!
//! Fits one non-negative weight per household sample record so that the
//! weighted category incidences match the household and person constraints
//! simultaneously. The iteration budget is a logical bound: exhausting it
//! leaves the best weights found so far in effect and is reported through
//! the returned iteration count, never as an error.

use log::debug;

use crate::error::{Result, SynthesisError};
use crate::models::tables::{Constraint, FrequencyTable};

/// Mean relative deviation below which the fit is accepted
const FIT_TOLERANCE: f64 = 1e-4;

/// Fitted household weights together with fit diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct IpuSolution {
    /// One weight per household sample record
    pub weights: Vec<f64>,
    /// Mean relative deviation of the best pass
    pub fit_quality: f64,
    /// Number of passes performed
    pub iterations: usize,
}

/// Fit household weights against household and person constraints
///
/// Each pass scales the weights of records carrying a category so that the
/// weighted incidence matches the category's target, cycling through every
/// household and person category. The weights of the best-fitting pass are
/// retained, so a run that consumes the whole budget still returns usable
/// weights with `iterations == max_iterations`.
pub fn household_weights(
    household_freq: &FrequencyTable,
    person_freq: &FrequencyTable,
    h_constraint: &Constraint,
    p_constraint: &Constraint,
    max_iterations: usize,
) -> Result<IpuSolution> {
    validate_inputs(household_freq, person_freq, h_constraint, p_constraint)?;

    let num_records = household_freq.num_rows();
    let mut weights = vec![1.0_f64; num_records];
    let mut best_weights = weights.clone();
    let mut best_fit = f64::INFINITY;
    let mut iterations = 0;

    // Household columns first, then the namespaced person columns
    let targets: Vec<(&FrequencyTable, usize, f64)> = h_constraint
        .entries
        .iter()
        .enumerate()
        .map(|(col, (_, target))| (household_freq, col, *target))
        .chain(
            p_constraint
                .entries
                .iter()
                .enumerate()
                .map(|(col, (_, target))| (person_freq, col, *target)),
        )
        .collect();

    for iteration in 1..=max_iterations {
        iterations = iteration;

        for &(freq, col, target) in &targets {
            let weighted_sum = freq.weighted_column_sum(col, &weights);
            if weighted_sum <= 0.0 {
                // No record carries this category; the target is unreachable
                continue;
            }
            let ratio = target / weighted_sum;
            for (weight, row) in weights.iter_mut().zip(&freq.rows) {
                if row[col] > 0.0 {
                    *weight *= ratio;
                }
            }
        }

        let fit = mean_relative_deviation(&targets, &weights);
        if fit < best_fit {
            best_fit = fit;
            best_weights.copy_from_slice(&weights);
        }

        if fit < FIT_TOLERANCE {
            debug!("IPU converged after {iteration} iterations (fit {fit:.3e})");
            break;
        }
    }

    Ok(IpuSolution {
        weights: best_weights,
        fit_quality: best_fit,
        iterations,
    })
}

/// Mean of |weighted sum - target| / target across all constraint columns
fn mean_relative_deviation(targets: &[(&FrequencyTable, usize, f64)], weights: &[f64]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let sum: f64 = targets
        .iter()
        .map(|&(freq, col, target)| {
            let weighted_sum = freq.weighted_column_sum(col, weights);
            (weighted_sum - target).abs() / target
        })
        .sum();
    sum / targets.len() as f64
}

fn validate_inputs(
    household_freq: &FrequencyTable,
    person_freq: &FrequencyTable,
    h_constraint: &Constraint,
    p_constraint: &Constraint,
) -> Result<()> {
    if household_freq.num_rows() == 0 {
        return Err(SynthesisError::invalid_input(
            "household frequency table has no rows",
        ));
    }
    if household_freq.num_rows() != person_freq.num_rows() {
        return Err(SynthesisError::invalid_input(format!(
            "frequency tables disagree on record count: {} households vs {} person rows",
            household_freq.num_rows(),
            person_freq.num_rows()
        )));
    }
    if household_freq.num_columns() != h_constraint.len() {
        return Err(SynthesisError::invalid_input(format!(
            "household frequency table has {} columns but the constraint has {} entries",
            household_freq.num_columns(),
            h_constraint.len()
        )));
    }
    if person_freq.num_columns() != p_constraint.len() {
        return Err(SynthesisError::invalid_input(format!(
            "person frequency table has {} columns but the constraint has {} entries",
            person_freq.num_columns(),
            p_constraint.len()
        )));
    }
    Ok(())
}
