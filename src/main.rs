use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use log::{info, warn};
use popsynth::{
    FitQuality, GeographyData, GeographyId, InMemoryRecipe, JointCell, JointDistribution,
    Marginal, MarginalGroup, SampleRecord, SampleTable, SynthesisConfig, Synthesizer,
};

fn main() -> Result<()> {
    // Setup logging
    popsynth::enable_logging();

    let num_geographies = 12;
    let recipe = build_demo_recipe(num_geographies);

    let config = SynthesisConfig::builder().random_seed(42).build();
    let synthesizer = Synthesizer::new(config);

    info!("Synthesizing {num_geographies} demo geographies...");
    let start = Instant::now();
    let population = synthesizer.run(&recipe)?;
    info!(
        "Synthesized {} households and {} persons in {:?}",
        population.households.len(),
        population.persons.len(),
        start.elapsed()
    );

    for failure in &population.failures {
        warn!("geography {} was skipped: {}", failure.geography, failure.error);
    }

    // Fit-quality report keyed by geography, in key order
    let report: BTreeMap<String, FitQuality> = population
        .fit_quality
        .iter()
        .map(|(geography, fit)| (geography.to_string(), *fit))
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Build an in-memory recipe with generated tables for `num_geographies`
/// block groups
///
/// Households come in two size categories; persons in two age categories.
/// The marginals vary slightly per geography so the drawn populations do
/// too.
fn build_demo_recipe(num_geographies: usize) -> InMemoryRecipe {
    let mut recipe = InMemoryRecipe::new();

    for index in 0..num_geographies {
        let geography = GeographyId::new("06", "001", "400100", (index + 1).to_string());

        let small = 60.0 + index as f64;
        let large = 40.0 + index as f64;
        let h_marg = Marginal::new(vec![MarginalGroup::new(
            "hh_size",
            vec![("1".into(), small), ("3".into(), large)],
        )]);

        // Persons implied by the household mix: small households carry one
        // young adult, large ones a mixed trio
        let young = small + 2.0 * large;
        let old = large;
        let p_marg = Marginal::new(vec![MarginalGroup::new(
            "age",
            vec![("young".into(), young), ("old".into(), old)],
        )]);

        let h_jd = JointDistribution::new(vec![
            joint_cell(0, "1", 6.0),
            joint_cell(1, "3", 4.0),
        ]);
        let p_jd = JointDistribution::new(vec![
            joint_cell(0, "young", 14.0),
            joint_cell(1, "old", 4.0),
        ]);

        let mut h_records = Vec::new();
        let mut p_records = Vec::new();
        for household in 0..6u64 {
            let serialno = 1000 * (index as u64 + 1) + household;
            let cat_id = (household % 2) as u32;
            let size = if cat_id == 0 { "1" } else { "3" };
            h_records.push(SampleRecord {
                serialno,
                cat_id,
                values: vec![size.to_string()],
            });

            // One young person per small household; two young and one old
            // per large household
            let members: &[(u32, &str)] = if cat_id == 0 {
                &[(0, "young")]
            } else {
                &[(0, "young"), (0, "young"), (1, "old")]
            };
            for (person_cat, age) in members {
                p_records.push(SampleRecord {
                    serialno,
                    cat_id: *person_cat,
                    values: vec![(*age).to_string()],
                });
            }
        }

        recipe.insert(
            geography,
            GeographyData {
                h_marg,
                p_marg,
                h_pums: SampleTable::new(vec!["hh_size".into()], h_records),
                h_jd,
                p_pums: SampleTable::new(vec!["age".into()], p_records),
                p_jd,
            },
        );
    }

    recipe
}

fn joint_cell(cat_id: u32, level: &str, frequency: f64) -> JointCell {
    JointCell {
        cat_id,
        levels: vec![level.to_string()],
        frequency,
    }
}
