//! Stochastic drawing of synthetic households and persons
//!
//! Materializes the target number of households by weighted sampling with
//! replacement from the household sample, pulling each drawn household's
//! members along through the sample serial-number join. Several independent
//! draws are scored against the person constraint and the best one is kept.

use itertools::Itertools;
use log::debug;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::algorithm::stats::chisquare;
use crate::error::{Result, SynthesisError};
use crate::models::population::{DrawnHousehold, PersonRecord};
use crate::models::tables::{CatId, Constraint, FrequencyTable, SampleTable};

/// Number of independent draws scored before keeping the best
const DRAW_ATTEMPTS: usize = 20;

/// One geography's drawn records and person-level fit quality
#[derive(Debug, Clone, PartialEq)]
pub struct DrawResult {
    /// Drawn households with ids starting at the caller's offset
    pub households: Vec<DrawnHousehold>,
    /// Drawn persons with `hh_id` referencing the drawn households
    pub persons: Vec<PersonRecord>,
    /// Chi-square statistic of the drawn person categories
    pub chisq: f64,
    /// Corresponding p-value
    pub p_value: f64,
}

/// Draw households and their persons for one geography
///
/// Household ids are assigned sequentially from `hh_index_start`. Degenerate
/// weights (all zero, or non-finite) are a draw failure.
#[allow(clippy::too_many_arguments)]
pub fn draw_households(
    num_households: usize,
    h_pums: &SampleTable,
    p_pums: &SampleTable,
    household_freq: &FrequencyTable,
    h_constraint: &Constraint,
    p_constraint: &Constraint,
    weights: &[f64],
    hh_index_start: u64,
    rng: &mut StdRng,
) -> Result<DrawResult> {
    if weights.len() != h_pums.len() {
        return Err(SynthesisError::invalid_input(format!(
            "{} weights supplied for {} household sample records",
            weights.len(),
            h_pums.len()
        )));
    }

    if num_households == 0 {
        return Ok(DrawResult {
            households: Vec::new(),
            persons: Vec::new(),
            chisq: 0.0,
            p_value: 1.0,
        });
    }

    let distribution = WeightedIndex::new(weights.iter()).map_err(|e| {
        SynthesisError::draw(format!("degenerate household weights: {e}"))
    })?;

    // Person sample indices per household serial number
    let mut persons_by_serial: FxHashMap<u64, SmallVec<[usize; 8]>> = FxHashMap::default();
    for (idx, record) in p_pums.records.iter().enumerate() {
        persons_by_serial.entry(record.serialno).or_default().push(idx);
    }

    // Score several draws against the person constraint, keep the best
    let mut best_indices: Option<Vec<usize>> = None;
    let mut best_chisq = f64::INFINITY;
    let mut best_p = 0.0;

    for attempt in 0..DRAW_ATTEMPTS {
        let indices: Vec<usize> = (0..num_households)
            .map(|_| distribution.sample(rng))
            .collect();

        let (chisq, p_value) =
            score_person_fit(&indices, h_pums, p_pums, &persons_by_serial, p_constraint);

        if chisq < best_chisq {
            best_chisq = chisq;
            best_p = p_value;
            best_indices = Some(indices);
        }

        debug!("draw attempt {attempt}: chisq {chisq:.4}");
    }

    let indices = best_indices.expect("at least one draw attempt runs");
    log_household_fit(&indices, h_pums, household_freq, h_constraint);

    // Materialize the winning draw
    let mut households = Vec::with_capacity(num_households);
    let mut persons = Vec::new();
    for (offset, &sample_idx) in indices.iter().enumerate() {
        let sample = &h_pums.records[sample_idx];
        let id = hh_index_start + offset as u64;
        households.push(DrawnHousehold {
            id,
            serialno: sample.serialno,
            cat_id: sample.cat_id,
            values: sample.values.clone(),
        });

        if let Some(member_indices) = persons_by_serial.get(&sample.serialno) {
            for &person_idx in member_indices {
                let person = &p_pums.records[person_idx];
                persons.push(PersonRecord {
                    hh_id: id,
                    serialno: person.serialno,
                    cat_id: person.cat_id,
                    values: person.values.clone(),
                });
            }
        }
    }

    Ok(DrawResult {
        households,
        persons,
        chisq: best_chisq,
        p_value: best_p,
    })
}

/// Chi-square of one draw's person categories against the constraint
fn score_person_fit(
    indices: &[usize],
    h_pums: &SampleTable,
    p_pums: &SampleTable,
    persons_by_serial: &FxHashMap<u64, SmallVec<[usize; 8]>>,
    p_constraint: &Constraint,
) -> (f64, f64) {
    let counts: FxHashMap<CatId, usize> = indices
        .iter()
        .flat_map(|&idx| {
            persons_by_serial
                .get(&h_pums.records[idx].serialno)
                .into_iter()
                .flatten()
                .map(|&person_idx| p_pums.records[person_idx].cat_id)
        })
        .counts()
        .into_iter()
        .collect();

    compare_to_constraint(&counts, p_constraint)
}

/// Compare observed category counts to a constraint scaled to the same total
fn compare_to_constraint(counts: &FxHashMap<CatId, usize>, constraint: &Constraint) -> (f64, f64) {
    let observed: Vec<f64> = constraint
        .entries
        .iter()
        .map(|(cat_id, _)| counts.get(cat_id).copied().unwrap_or(0) as f64)
        .collect();
    let observed_total: f64 = observed.iter().sum();
    let constraint_total = constraint.total();

    if observed_total <= 0.0 || constraint_total <= 0.0 {
        return (0.0, 1.0);
    }

    let scale = observed_total / constraint_total;
    let expected: Vec<f64> = constraint.entries.iter().map(|(_, v)| v * scale).collect();

    chisquare(&observed, &expected)
}

/// Debug-log how the drawn households themselves fit their constraint
fn log_household_fit(
    indices: &[usize],
    h_pums: &SampleTable,
    household_freq: &FrequencyTable,
    h_constraint: &Constraint,
) {
    if household_freq.num_rows() != h_pums.len() {
        return;
    }
    let counts: FxHashMap<CatId, usize> = indices
        .iter()
        .map(|&idx| h_pums.records[idx].cat_id)
        .counts()
        .into_iter()
        .collect();
    let (chisq, p_value) = compare_to_constraint(&counts, h_constraint);
    debug!("household draw fit: chisq {chisq:.4}, p {p_value:.4}");
}
