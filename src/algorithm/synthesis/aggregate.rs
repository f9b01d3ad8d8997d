//! Sequential reassembly of per-geography results
//!
//! The aggregator is the only place where cross-geography state lives: the
//! accumulating household and person tables, the fit-quality map, and the
//! running household-id offset. Both drivers feed it strictly in submission
//! order, which keeps household ids reproducible and monotonically
//! increasing regardless of worker completion order.

use log::error;

use crate::algorithm::synthesis::stage::StageOutput;
use crate::error::{Result, SynthesisError};
use crate::models::geography::GeographyId;
use crate::models::population::{
    HouseholdRecord, SynthesisFailure, SyntheticPopulation,
};

/// Accumulator for the final population
#[derive(Debug, Default)]
pub(crate) struct Aggregator {
    population: SyntheticPopulation,
    hh_index_start: u64,
}

impl Aggregator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Offset the next geography's household ids must start at
    pub(crate) fn offset(&self) -> u64 {
        self.hh_index_start
    }

    /// Append one geography's output and advance the id offset
    ///
    /// The geography key columns are attached here. Nothing is appended and
    /// the offset does not move if the output's columns are incompatible
    /// with the tables accumulated so far.
    pub(crate) fn push_success(
        &mut self,
        geography: &GeographyId,
        output: StageOutput,
    ) -> Result<()> {
        // Validate both column sets before mutating either table
        self.check_columns(&output)?;

        let last_id = output.households.last().map(|h| h.id);

        let households: Vec<HouseholdRecord> = output
            .households
            .into_iter()
            .map(|h| HouseholdRecord {
                id: h.id,
                serialno: h.serialno,
                cat_id: h.cat_id,
                values: h.values,
                geography: geography.clone(),
            })
            .collect();

        self.population
            .households
            .append(&output.household_columns, households)?;
        self.population
            .persons
            .append(&output.person_columns, output.persons)?;
        self.population
            .fit_quality
            .insert(geography.clone(), output.fit);

        if let Some(last_id) = last_id {
            self.hh_index_start = last_id + 1;
        }

        Ok(())
    }

    /// Record a failed geography; it contributes no rows and no offset change
    pub(crate) fn push_failure(&mut self, geography: GeographyId, error: SynthesisError) {
        error!("synthesis failed for geography {geography}: {error}");
        self.population
            .failures
            .push(SynthesisFailure { geography, error });
    }

    pub(crate) fn finish(self) -> SyntheticPopulation {
        self.population
    }

    fn check_columns(&self, output: &StageOutput) -> Result<()> {
        if !output.households.is_empty()
            && !self.population.households.is_empty()
            && self.population.households.columns != output.household_columns
        {
            return Err(SynthesisError::invalid_input(format!(
                "household attribute columns differ between geographies: {:?} vs {:?}",
                self.population.households.columns, output.household_columns
            )));
        }
        if !output.persons.is_empty()
            && !self.population.persons.is_empty()
            && self.population.persons.columns != output.person_columns
        {
            return Err(SynthesisError::invalid_input(format!(
                "person attribute columns differ between geographies: {:?} vs {:?}",
                self.population.persons.columns, output.person_columns
            )));
        }
        Ok(())
    }
}
