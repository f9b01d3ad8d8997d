//! Parallel synthesis driver
//!
//! Breaks the sequential driver's id-offset dependency by separating the
//! expensive independent work from the inherently sequential step: inputs
//! are fetched in one fan-out phase, stages run in a second fan-out phase
//! with a zero offset, and a single-threaded reassembly walks the results
//! in original submission order, shifting ids and isolating failures.
//! Submission-order reassembly keeps household ids reproducible; completion
//! order never influences the output.

use log::info;
use rayon::prelude::*;

use crate::algorithm::synthesis::aggregate::Aggregator;
use crate::algorithm::synthesis::stage::{
    StageOutput, fetch_geography_inputs, synthesize_geography,
};
use crate::algorithm::synthesis::{geography_rng, select_geographies};
use crate::config::SynthesisConfig;
use crate::error::{Result, SynthesisError};
use crate::models::geography::GeographyId;
use crate::models::population::SyntheticPopulation;
use crate::recipe::Recipe;
use crate::utils::progress;

/// Synthesize every requested geography on a worker pool
///
/// Pool construction failure is fatal for the run; every other failure is
/// local to its geography. The aggregated result covers exactly the
/// geographies that succeeded.
pub fn synthesize_all_in_parallel<R: Recipe + Sync + ?Sized>(
    recipe: &R,
    indexes: Option<Vec<GeographyId>>,
    config: &SynthesisConfig,
) -> Result<SyntheticPopulation> {
    let ids = match indexes {
        Some(ids) => ids,
        None => recipe.available_geography_ids()?,
    };
    let ids = select_geographies(ids, config.num_geographies);

    let num_threads = config.num_threads.unwrap_or_else(num_cpus::get);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| SynthesisError::Pool(e.to_string()))?;

    info!(
        "Synthesizing {} geographies in parallel on {num_threads} workers",
        ids.len()
    );

    // Phase 1: fetch every geography's inputs concurrently. Results land in
    // submission order; completion order is irrelevant.
    let pb = progress::create_main_progress_bar(ids.len() as u64, Some("Fetching inputs"));
    let fetched: Vec<_> = pool.install(|| {
        ids.par_iter()
            .map(|geography| {
                let inputs = fetch_geography_inputs(recipe, geography);
                pb.inc(1);
                inputs
            })
            .collect()
    });
    progress::finish_and_clear(&pb);

    // Phase 2: run the stages concurrently. The household-id offset is not
    // known yet, so every stage starts at zero.
    let pb = progress::create_main_progress_bar(ids.len() as u64, Some("Synthesizing geographies"));
    let outputs: Vec<Result<StageOutput>> = pool.install(|| {
        fetched
            .into_par_iter()
            .enumerate()
            .map(|(index, inputs)| {
                let output = inputs.and_then(|inputs| {
                    let mut rng = geography_rng(config.random_seed, index);
                    synthesize_geography(inputs, config, 0, &mut rng)
                });
                pb.inc(1);
                output
            })
            .collect()
    });
    progress::finish_progress_bar(&pb, Some("Synthesis complete"));

    // Phase 3: single-threaded reassembly in submission order. Offsets are
    // applied here and only here; a failed geography contributes no rows
    // and no offset change.
    let mut aggregator = Aggregator::new();
    for (geography, result) in ids.into_iter().zip(outputs) {
        match result {
            Ok(mut output) => {
                output.shift_ids(aggregator.offset());
                if let Err(error) = aggregator.push_success(&geography, output) {
                    aggregator.push_failure(geography, error);
                }
            }
            Err(error) => aggregator.push_failure(geography, error),
        }
    }

    Ok(aggregator.finish())
}
