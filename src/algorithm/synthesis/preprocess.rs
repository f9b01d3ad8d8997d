//! Zero-guard preprocessing and category namespacing
//!
//! The fitting solvers use multiplicative updates that are undefined at
//! zero, so exact-zero marginal cells and joint frequencies are replaced
//! with small positive substitutes before fitting. Person categories are
//! shifted past the household category range so both sets can be fit
//! jointly without identifier collisions.

use crate::error::{Result, SynthesisError};
use crate::models::tables::{CatId, Constraint, JointDistribution, Marginal, SampleTable};

/// Replace exact-zero marginal cells with a small positive substitute
///
/// Nonzero cells are left unchanged.
pub fn replace_zero_cells(marginal: &mut Marginal, sub: f64) {
    for group in &mut marginal.groups {
        for (_, value) in &mut group.cells {
            if *value == 0.0 {
                *value = sub;
            }
        }
    }
}

/// Replace exact-zero joint-distribution frequencies with a substitute
///
/// Nonzero frequencies are left unchanged.
pub fn replace_zero_frequencies(joint_dist: &mut JointDistribution, sub: f64) {
    for cell in &mut joint_dist.cells {
        if cell.frequency == 0.0 {
            cell.frequency = sub;
        }
    }
}

/// Shift person categories past the household category range
///
/// Applies `max(household cat_id) + 1` as an offset to the person joint
/// distribution, the person sample, and the person constraint, so the union
/// of household and person category ids is disjoint. Returns the offset.
pub fn namespace_person_categories(
    h_jd: &JointDistribution,
    p_jd: &mut JointDistribution,
    p_pums: &mut SampleTable,
    p_constraint: &mut Constraint,
) -> Result<CatId> {
    let offset = h_jd
        .max_cat_id()
        .ok_or_else(|| {
            SynthesisError::invalid_input("household joint distribution has no cells")
        })?
        + 1;

    p_jd.shift_cat_ids(offset);
    p_pums.shift_cat_ids(offset);
    p_constraint.shift_cat_ids(offset);

    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tables::{JointCell, MarginalGroup, SampleRecord};
    use rustc_hash::FxHashSet;

    fn jd(cells: Vec<(u32, f64)>) -> JointDistribution {
        JointDistribution::new(
            cells
                .into_iter()
                .map(|(cat_id, frequency)| JointCell {
                    cat_id,
                    levels: vec!["x".into()],
                    frequency,
                })
                .collect(),
        )
    }

    #[test]
    fn test_zero_cells_are_replaced_and_others_untouched() {
        let mut marginal = Marginal::new(vec![
            MarginalGroup::new("a", vec![("1".into(), 0.0), ("2".into(), 40.0)]),
            MarginalGroup::new("b", vec![("1".into(), 0.0), ("2".into(), 0.5)]),
        ]);

        replace_zero_cells(&mut marginal, 0.01);

        let values: Vec<f64> = marginal.values().collect();
        assert!(values.iter().all(|v| *v >= 0.01));
        assert_eq!(values, vec![0.01, 40.0, 0.01, 0.5]);
    }

    #[test]
    fn test_guarded_zeros_flow_into_the_household_count() {
        // A dead control group no longer zeroes out the mean total
        let mut marginal = Marginal::new(vec![
            MarginalGroup::new("cat1", vec![("all".into(), 0.0)]),
            MarginalGroup::new("cat2", vec![("all".into(), 40.0)]),
        ]);

        replace_zero_cells(&mut marginal, 0.01);

        assert_eq!(marginal.mean_group_total().round() as usize, 20);
    }

    #[test]
    fn test_zero_frequencies_are_replaced() {
        let mut joint_dist = jd(vec![(0, 0.0), (1, 3.0)]);

        replace_zero_frequencies(&mut joint_dist, 0.001);

        assert_eq!(joint_dist.cells[0].frequency, 0.001);
        assert_eq!(joint_dist.cells[1].frequency, 3.0);
    }

    #[test]
    fn test_namespacing_makes_category_sets_disjoint() {
        let h_jd = jd(vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
        let mut p_jd = jd(vec![(0, 1.0), (1, 1.0)]);
        let mut p_pums = SampleTable::new(
            vec![],
            vec![SampleRecord {
                serialno: 1,
                cat_id: 0,
                values: vec![],
            }],
        );
        let mut p_constraint = Constraint::new(vec![(0, 4.0), (1, 6.0)]);

        let offset =
            namespace_person_categories(&h_jd, &mut p_jd, &mut p_pums, &mut p_constraint).unwrap();

        assert_eq!(offset, 3);

        // The smallest person category sits one past the largest household
        // category, and the two sets do not intersect
        let h_set: FxHashSet<u32> = h_jd.cat_ids().into_iter().collect();
        let p_set: FxHashSet<u32> = p_jd.cat_ids().into_iter().collect();
        assert_eq!(p_set.iter().min(), Some(&(h_jd.max_cat_id().unwrap() + 1)));
        assert!(h_set.is_disjoint(&p_set));

        assert_eq!(p_pums.records[0].cat_id, 3);
        assert_eq!(p_constraint.get(3), Some(4.0));
        assert_eq!(p_constraint.get(4), Some(6.0));
    }

    #[test]
    fn test_namespacing_requires_household_cells() {
        let h_jd = jd(vec![]);
        let mut p_jd = jd(vec![(0, 1.0)]);
        let mut p_pums = SampleTable::new(vec![], vec![]);
        let mut p_constraint = Constraint::new(vec![(0, 1.0)]);

        assert!(
            namespace_person_categories(&h_jd, &mut p_jd, &mut p_pums, &mut p_constraint).is_err()
        );
    }
}
