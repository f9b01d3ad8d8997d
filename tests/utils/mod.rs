//! Shared fixtures for the driver integration tests

use popsynth::{
    GeographyData, GeographyId, InMemoryRecipe, JointCell, JointDistribution, Marginal,
    MarginalGroup, Recipe, Result, SampleRecord, SampleTable, SynthesisError,
};

/// Geography id of the `index`-th fixture block group (1-based block group)
pub fn geography(index: usize) -> GeographyId {
    GeographyId::new("06", "001", "400100", (index + 1).to_string())
}

/// Build an in-memory recipe with `num_geographies` generated block groups
///
/// Households come in two size categories (one- and three-person); persons
/// in two age categories. Household totals vary per geography so id
/// stitching is exercised with unequal table sizes.
pub fn build_recipe(num_geographies: usize) -> InMemoryRecipe {
    let mut recipe = InMemoryRecipe::new();

    for index in 0..num_geographies {
        let small = 6.0 + index as f64;
        let large = 4.0;
        let h_marg = Marginal::new(vec![MarginalGroup::new(
            "hh_size",
            vec![("1".into(), small), ("3".into(), large)],
        )]);
        let p_marg = Marginal::new(vec![MarginalGroup::new(
            "age",
            vec![
                ("young".into(), small + 2.0 * large),
                ("old".into(), large),
            ],
        )]);

        let h_jd = JointDistribution::new(vec![
            joint_cell(0, "1", 3.0),
            joint_cell(1, "3", 2.0),
        ]);
        let p_jd = JointDistribution::new(vec![
            joint_cell(0, "young", 7.0),
            joint_cell(1, "old", 2.0),
        ]);

        let mut h_records = Vec::new();
        let mut p_records = Vec::new();
        for household in 0..6u64 {
            let serialno = 1000 * (index as u64 + 1) + household;
            let cat_id = (household % 2) as u32;
            h_records.push(SampleRecord {
                serialno,
                cat_id,
                values: vec![if cat_id == 0 { "1" } else { "3" }.to_string()],
            });

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
            geography(index),
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

/// Recipe wrapper that fails the input fetch for one geography
pub struct FailingRecipe {
    inner: InMemoryRecipe,
    fail_for: GeographyId,
}

impl FailingRecipe {
    pub fn new(inner: InMemoryRecipe, fail_for: GeographyId) -> Self {
        Self { inner, fail_for }
    }

    fn check(&self, geography: &GeographyId) -> Result<()> {
        if geography == &self.fail_for {
            return Err(SynthesisError::InvalidInput(format!(
                "marginal table unavailable for {geography}"
            )));
        }
        Ok(())
    }
}

impl Recipe for FailingRecipe {
    fn available_geography_ids(&self) -> Result<Vec<GeographyId>> {
        self.inner.available_geography_ids()
    }

    fn household_marginal(&self, geography: &GeographyId) -> Result<Marginal> {
        self.check(geography)?;
        self.inner.household_marginal(geography)
    }

    fn person_marginal(&self, geography: &GeographyId) -> Result<Marginal> {
        self.check(geography)?;
        self.inner.person_marginal(geography)
    }

    fn household_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)> {
        self.check(geography)?;
        self.inner.household_joint_dist(geography)
    }

    fn person_joint_dist(
        &self,
        geography: &GeographyId,
    ) -> Result<(SampleTable, JointDistribution)> {
        self.check(geography)?;
        self.inner.person_joint_dist(geography)
    }
}
