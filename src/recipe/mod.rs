//! Data-acquisition seam for the synthesizer
//!
//! A recipe supplies the per-geography inputs the synthesis stage consumes:
//! marginal controls and (sample, joint distribution) pairs for households
//! and persons. How the tables are obtained is the recipe's business; the
//! drivers only depend on this trait.

use rustc_hash::FxHashMap;

use crate::error::{Result, SynthesisError};
use crate::models::geography::GeographyId;
use crate::models::tables::{JointDistribution, Marginal, SampleTable};

/// Source of per-geography synthesis inputs
pub trait Recipe: Send + Sync {
    /// Enumerate the geographies available for synthesis, in a fixed order
    fn available_geography_ids(&self) -> Result<Vec<GeographyId>>;

    /// Household marginal controls for one geography
    fn household_marginal(&self, geography: &GeographyId) -> Result<Marginal>;

    /// Person marginal controls for one geography
    fn person_marginal(&self, geography: &GeographyId) -> Result<Marginal>;

    /// Household sample and joint distribution for one geography
    fn household_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)>;

    /// Person sample and joint distribution for one geography
    fn person_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)>;
}

/// Complete set of input tables for one geography
#[derive(Debug, Clone)]
pub struct GeographyData {
    /// Household marginal controls
    pub h_marg: Marginal,
    /// Person marginal controls
    pub p_marg: Marginal,
    /// Household sample records
    pub h_pums: SampleTable,
    /// Household joint distribution
    pub h_jd: JointDistribution,
    /// Person sample records
    pub p_pums: SampleTable,
    /// Person joint distribution
    pub p_jd: JointDistribution,
}

/// Recipe backed by tables already held in memory
///
/// Used by tests and demos, and by library users who load their own data.
#[derive(Debug, Default)]
pub struct InMemoryRecipe {
    ids: Vec<GeographyId>,
    data: FxHashMap<GeographyId, GeographyData>,
}

impl InMemoryRecipe {
    /// Create an empty recipe
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one geography's tables, keeping enumeration order
    pub fn insert(&mut self, geography: GeographyId, data: GeographyData) {
        if !self.data.contains_key(&geography) {
            self.ids.push(geography.clone());
        }
        self.data.insert(geography, data);
    }

    fn get(&self, geography: &GeographyId) -> Result<&GeographyData> {
        self.data.get(geography).ok_or_else(|| {
            SynthesisError::invalid_input(format!("no data for geography {geography}"))
        })
    }
}

impl Recipe for InMemoryRecipe {
    fn available_geography_ids(&self) -> Result<Vec<GeographyId>> {
        Ok(self.ids.clone())
    }

    fn household_marginal(&self, geography: &GeographyId) -> Result<Marginal> {
        Ok(self.get(geography)?.h_marg.clone())
    }

    fn person_marginal(&self, geography: &GeographyId) -> Result<Marginal> {
        Ok(self.get(geography)?.p_marg.clone())
    }

    fn household_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)> {
        let data = self.get(geography)?;
        Ok((data.h_pums.clone(), data.h_jd.clone()))
    }

    fn person_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)> {
        let data = self.get(geography)?;
        Ok((data.p_pums.clone(), data.p_jd.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tables::MarginalGroup;

    fn empty_data() -> GeographyData {
        GeographyData {
            h_marg: Marginal::new(vec![MarginalGroup::new("hh_size", vec![])]),
            p_marg: Marginal::new(vec![MarginalGroup::new("age", vec![])]),
            h_pums: SampleTable::new(vec![], vec![]),
            h_jd: JointDistribution::new(vec![]),
            p_pums: SampleTable::new(vec![], vec![]),
            p_jd: JointDistribution::new(vec![]),
        }
    }

    #[test]
    fn test_in_memory_recipe_preserves_insertion_order() {
        let mut recipe = InMemoryRecipe::new();
        let a = GeographyId::new("06", "001", "400100", "1");
        let b = GeographyId::new("06", "001", "400100", "2");

        recipe.insert(b.clone(), empty_data());
        recipe.insert(a.clone(), empty_data());

        assert_eq!(recipe.available_geography_ids().unwrap(), vec![b, a]);
    }

    #[test]
    fn test_missing_geography_is_an_input_error() {
        let recipe = InMemoryRecipe::new();
        let id = GeographyId::new("06", "001", "400100", "1");

        assert!(recipe.household_marginal(&id).is_err());
    }
}
