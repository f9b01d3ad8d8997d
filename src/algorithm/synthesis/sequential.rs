//! Sequential synthesis driver
//!
//! Processes geographies one at a time in enumeration order, threading the
//! running household-id offset through successive stage calls so ids are
//! globally unique and increasing. A failed geography is logged, skipped,
//! and reported; the batch continues.

use log::info;

use crate::algorithm::synthesis::aggregate::Aggregator;
use crate::algorithm::synthesis::stage::{fetch_geography_inputs, synthesize_geography};
use crate::algorithm::synthesis::{geography_rng, select_geographies};
use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::models::geography::GeographyId;
use crate::models::population::SyntheticPopulation;
use crate::recipe::Recipe;
use crate::utils::progress;

/// Synthesize every requested geography, one at a time
///
/// Geographies come from `indexes` if supplied, otherwise from the recipe,
/// optionally capped by the configuration. The offset computation has a
/// sequential dependency on the previous geography's last assigned id, so
/// this driver never overlaps geographies.
pub fn synthesize_all<R: Recipe + ?Sized>(
    recipe: &R,
    indexes: Option<Vec<GeographyId>>,
    config: &SynthesisConfig,
) -> Result<SyntheticPopulation> {
    let ids = match indexes {
        Some(ids) => ids,
        None => recipe.available_geography_ids()?,
    };
    let ids = select_geographies(ids, config.num_geographies);

    info!("Synthesizing {} geographies sequentially", ids.len());
    let pb = progress::create_main_progress_bar(ids.len() as u64, Some("Synthesizing geographies"));

    let mut aggregator = Aggregator::new();
    for (index, geography) in ids.iter().enumerate() {
        let result = fetch_geography_inputs(recipe, geography).and_then(|inputs| {
            let mut rng = geography_rng(config.random_seed, index);
            synthesize_geography(inputs, config, aggregator.offset(), &mut rng)
        });

        match result {
            Ok(output) => {
                if let Err(error) = aggregator.push_success(geography, output) {
                    aggregator.push_failure(geography.clone(), error);
                }
            }
            Err(error) => aggregator.push_failure(geography.clone(), error),
        }

        pb.inc(1);
    }

    progress::finish_progress_bar(&pb, Some("Synthesis complete"));
    Ok(aggregator.finish())
}
