//! Parallel driver properties
//!
//! The parallel driver must reproduce the sequential driver's output
//! exactly for the same inputs and seed, and must isolate per-geography
//! failures without disturbing id stitching.

use popsynth::{
    SynthesisConfig, Synthesizer, synthesize_all, synthesize_all_in_parallel,
};
use rustc_hash::FxHashSet;

use crate::utils::{FailingRecipe, build_recipe, geography};

fn config(parallel: bool) -> SynthesisConfig {
    SynthesisConfig::builder()
        .use_parallel(parallel)
        .num_threads(2)
        .random_seed(42)
        .build()
}

#[test]
fn parallel_output_matches_sequential_output() {
    let recipe = build_recipe(6);

    let sequential = synthesize_all(&recipe, None, &config(false)).unwrap();
    let parallel = synthesize_all_in_parallel(&recipe, None, &config(true)).unwrap();

    assert_eq!(sequential.households, parallel.households);
    assert_eq!(sequential.persons, parallel.persons);
    assert_eq!(sequential.fit_quality, parallel.fit_quality);
}

#[test]
fn repeated_parallel_runs_are_identical() {
    let recipe = build_recipe(5);

    let first = synthesize_all_in_parallel(&recipe, None, &config(true)).unwrap();
    let second = synthesize_all_in_parallel(&recipe, None, &config(true)).unwrap();

    assert_eq!(first.households, second.households);
    assert_eq!(first.persons, second.persons);
    assert_eq!(first.fit_quality, second.fit_quality);
}

#[test]
fn failed_geography_is_skipped_and_reported() {
    // Five geographies; the third one's input fetch fails
    let failing = FailingRecipe::new(build_recipe(5), geography(2));

    let population = synthesize_all_in_parallel(&failing, None, &config(true)).unwrap();

    // The other four geographies survive with fit quality
    assert_eq!(population.fit_quality.len(), 4);
    assert!(!population.fit_quality.contains_key(&geography(2)));

    // The failure names the offending geography
    assert_eq!(population.failures.len(), 1);
    assert_eq!(population.failures[0].geography, geography(2));

    // No household carries the failed geography's key
    assert!(
        population
            .households
            .records
            .iter()
            .all(|h| h.geography != geography(2))
    );

    // Ids remain contiguous across the survivors in submission order
    let ids: Vec<u64> = population.households.records.iter().map(|h| h.id).collect();
    let expected: Vec<u64> = (0..ids.len() as u64).collect();
    assert_eq!(ids, expected);

    // Foreign keys still resolve
    let household_ids: FxHashSet<u64> =
        population.households.records.iter().map(|h| h.id).collect();
    for person in &population.persons.records {
        assert!(household_ids.contains(&person.hh_id));
    }
}

#[test]
fn synthesizer_dispatches_on_configuration() {
    let recipe = build_recipe(3);

    let sequential = Synthesizer::new(config(false)).run(&recipe).unwrap();
    let parallel = Synthesizer::new(config(true)).run(&recipe).unwrap();

    assert_eq!(sequential.households, parallel.households);
    assert_eq!(sequential.persons, parallel.persons);
}

#[test]
fn single_worker_pool_still_completes() {
    let recipe = build_recipe(4);
    let config = SynthesisConfig::builder()
        .num_threads(1)
        .random_seed(42)
        .build();

    let population = synthesize_all_in_parallel(&recipe, None, &config).unwrap();

    assert_eq!(population.fit_quality.len(), 4);
    assert!(population.failures.is_empty());
}
