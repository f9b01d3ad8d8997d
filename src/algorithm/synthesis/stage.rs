//! Per-geography synthesis stage
//!
//! Runs the full fitting pipeline for one geography on owned inputs:
//! zero-guard, constraint derivation for households and persons, category
//! namespacing, frequency tables, weight fitting, and the final draw. This
//! is the unit of parallel work; a failure in any step aborts this
//! geography only and is propagated to the driver.

use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::algorithm::categorizer::frequency_tables;
use crate::algorithm::draw::draw_households;
use crate::algorithm::ipf::calculate_constraints;
use crate::algorithm::ipu::household_weights;
use crate::algorithm::synthesis::preprocess::{
    namespace_person_categories, replace_zero_cells, replace_zero_frequencies,
};
use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::models::geography::GeographyId;
use crate::models::population::{DrawnHousehold, FitQuality, PersonRecord};
use crate::recipe::{GeographyData, Recipe};

/// Owned inputs for one geography's stage
#[derive(Debug, Clone)]
pub struct GeographyInputs {
    /// The geography being synthesized
    pub geography: GeographyId,
    /// The geography's input tables
    pub data: GeographyData,
}

/// One geography's synthesized records, before the geography key is attached
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// Drawn households with ids starting at the stage's offset
    pub households: Vec<DrawnHousehold>,
    /// Drawn persons referencing the drawn households
    pub persons: Vec<PersonRecord>,
    /// Household attribute column names
    pub household_columns: Vec<String>,
    /// Person attribute column names
    pub person_columns: Vec<String>,
    /// Person-level goodness of fit of the draw
    pub fit: FitQuality,
}

impl StageOutput {
    /// Shift household ids and person foreign keys by an offset
    ///
    /// Used by the parallel driver, which runs stages with a zero offset and
    /// stitches ids during sequential reassembly.
    pub fn shift_ids(&mut self, offset: u64) {
        for household in &mut self.households {
            household.id += offset;
        }
        for person in &mut self.persons {
            person.hh_id += offset;
        }
    }
}

/// Fetch one geography's inputs from the recipe
///
/// This is the fan-out unit of the parallel driver's first phase; it does no
/// numeric work.
pub fn fetch_geography_inputs<R: Recipe + ?Sized>(
    recipe: &R,
    geography: &GeographyId,
) -> Result<GeographyInputs> {
    let h_marg = recipe.household_marginal(geography)?;
    debug!("household marginal for {geography}: {h_marg:?}");

    let p_marg = recipe.person_marginal(geography)?;
    debug!("person marginal for {geography}: {p_marg:?}");

    let (h_pums, h_jd) = recipe.household_joint_dist(geography)?;
    debug!("household joint distribution for {geography}: {h_jd:?}");

    let (p_pums, p_jd) = recipe.person_joint_dist(geography)?;
    debug!("person joint distribution for {geography}: {p_jd:?}");

    Ok(GeographyInputs {
        geography: geography.clone(),
        data: GeographyData {
            h_marg,
            p_marg,
            h_pums,
            h_jd,
            p_pums,
            p_jd,
        },
    })
}

/// Synthesize one geography
///
/// Household ids are assigned sequentially from `hh_index_start`. Exhausting
/// the weight-fitting budget is a warning and the best weights are used; any
/// other failure aborts this geography.
pub fn synthesize_geography(
    inputs: GeographyInputs,
    config: &SynthesisConfig,
    hh_index_start: u64,
    rng: &mut StdRng,
) -> Result<StageOutput> {
    let GeographyInputs { geography, data } = inputs;
    let GeographyData {
        mut h_marg,
        mut p_marg,
        h_pums,
        mut h_jd,
        mut p_pums,
        mut p_jd,
    } = data;

    // Zero marginal and zero cell problems
    replace_zero_cells(&mut h_marg, config.marginal_zero_sub);
    replace_zero_cells(&mut p_marg, config.marginal_zero_sub);
    replace_zero_frequencies(&mut h_jd, config.jd_zero_sub);
    replace_zero_frequencies(&mut p_jd, config.jd_zero_sub);

    info!("Running ipf for households in {geography}");
    let (h_constraint, h_stats) = calculate_constraints(&h_marg, &h_jd)?;
    debug!("household constraint ({} ipf iterations): {h_constraint:?}", h_stats.iterations);

    info!("Running ipf for persons in {geography}");
    let (mut p_constraint, p_stats) = calculate_constraints(&p_marg, &p_jd)?;
    debug!("person constraint ({} ipf iterations): {p_constraint:?}", p_stats.iterations);

    // Make person category ids unique when combined with households
    namespace_person_categories(&h_jd, &mut p_jd, &mut p_pums, &mut p_constraint)?;

    let (household_freq, person_freq) = frequency_tables(&p_pums, &h_pums, &p_jd, &h_jd)?;

    info!("Running ipu for {geography}");
    let started = Instant::now();
    let solution = household_weights(
        &household_freq,
        &person_freq,
        &h_constraint,
        &p_constraint,
        config.max_ipu_iterations,
    )?;
    info!("Time to run ipu: {:.3?}", started.elapsed());
    debug!("ipu fit quality: {:.6}", solution.fit_quality);

    if solution.iterations == config.max_ipu_iterations {
        warn!(
            "ipu exhausted its {} iteration budget for {geography}; using best-effort weights",
            config.max_ipu_iterations
        );
    } else {
        debug!("ipu iterations: {}", solution.iterations);
    }

    // The marginal groups should agree on the household total; the mean
    // absorbs residual disagreement after zero-substitution
    let num_households = h_marg.mean_group_total().round() as usize;
    debug!("drawing {num_households} households for {geography}");

    let drawn = draw_households(
        num_households,
        &h_pums,
        &p_pums,
        &household_freq,
        &h_constraint,
        &p_constraint,
        &solution.weights,
        hh_index_start,
        rng,
    )?;

    Ok(StageOutput {
        households: drawn.households,
        persons: drawn.persons,
        household_columns: h_pums.columns,
        person_columns: p_pums.columns,
        fit: FitQuality {
            chisq: drawn.chisq,
            p_value: drawn.p_value,
        },
    })
}
