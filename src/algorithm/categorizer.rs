//! Frequency-table construction from categorized samples
//!
//! Cross-tabulates the sample records by combined category into the two
//! tables the weight fitting expects: per-household category incidence and
//! per-household person category counts, both with one row per household
//! sample record.

use rustc_hash::FxHashMap;

use crate::error::{Result, SynthesisError};
use crate::models::tables::{CatId, FrequencyTable, JointDistribution, SampleTable};

/// Build household and person frequency tables
///
/// Rows follow the household sample's record order. Household cells are the
/// 0/1 incidence of the record's own category; person cells count the
/// household's members in each (namespaced) person category, joined through
/// the sample serial number.
pub fn frequency_tables(
    p_pums: &SampleTable,
    h_pums: &SampleTable,
    p_jd: &JointDistribution,
    h_jd: &JointDistribution,
) -> Result<(FrequencyTable, FrequencyTable)> {
    if h_pums.is_empty() {
        return Err(SynthesisError::invalid_input(
            "household sample has no records",
        ));
    }

    let h_cat_ids = h_jd.cat_ids();
    let p_cat_ids = p_jd.cat_ids();
    let h_col: FxHashMap<CatId, usize> = column_index(&h_cat_ids);
    let p_col: FxHashMap<CatId, usize> = column_index(&p_cat_ids);

    // Household incidence rows
    let mut h_rows = Vec::with_capacity(h_pums.len());
    let mut serial_to_row: FxHashMap<u64, usize> = FxHashMap::default();
    for (row_idx, record) in h_pums.records.iter().enumerate() {
        let col = *h_col.get(&record.cat_id).ok_or_else(|| {
            SynthesisError::invalid_input(format!(
                "household sample record {} has category {} not present in the joint distribution",
                record.serialno, record.cat_id
            ))
        })?;
        let mut row = vec![0.0; h_cat_ids.len()];
        row[col] = 1.0;
        h_rows.push(row);

        if serial_to_row.insert(record.serialno, row_idx).is_some() {
            return Err(SynthesisError::invalid_input(format!(
                "duplicate household serial number {} in sample",
                record.serialno
            )));
        }
    }

    // Person counts per household row
    let mut p_rows = vec![vec![0.0; p_cat_ids.len()]; h_pums.len()];
    for record in &p_pums.records {
        let row_idx = *serial_to_row.get(&record.serialno).ok_or_else(|| {
            SynthesisError::invalid_input(format!(
                "person record references unknown household serial number {}",
                record.serialno
            ))
        })?;
        let col = *p_col.get(&record.cat_id).ok_or_else(|| {
            SynthesisError::invalid_input(format!(
                "person sample record in household {} has category {} not present in the joint distribution",
                record.serialno, record.cat_id
            ))
        })?;
        p_rows[row_idx][col] += 1.0;
    }

    Ok((
        FrequencyTable {
            cat_ids: h_cat_ids,
            rows: h_rows,
        },
        FrequencyTable {
            cat_ids: p_cat_ids,
            rows: p_rows,
        },
    ))
}

fn column_index(cat_ids: &[CatId]) -> FxHashMap<CatId, usize> {
    cat_ids
        .iter()
        .enumerate()
        .map(|(idx, cat_id)| (*cat_id, idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tables::{JointCell, SampleRecord};

    fn jd(cat_ids: &[u32]) -> JointDistribution {
        JointDistribution::new(
            cat_ids
                .iter()
                .map(|&cat_id| JointCell {
                    cat_id,
                    levels: vec!["x".into()],
                    frequency: 1.0,
                })
                .collect(),
        )
    }

    fn sample(records: Vec<(u64, u32)>) -> SampleTable {
        SampleTable::new(
            vec!["attr".into()],
            records
                .into_iter()
                .map(|(serialno, cat_id)| SampleRecord {
                    serialno,
                    cat_id,
                    values: vec!["v".into()],
                })
                .collect(),
        )
    }

    #[test]
    fn test_frequency_tables() {
        let h_pums = sample(vec![(10, 0), (11, 1)]);
        // Household 10 has two persons of category 5, household 11 one of
        // each person category
        let p_pums = sample(vec![(10, 5), (10, 5), (11, 5), (11, 6)]);

        let (h_freq, p_freq) = frequency_tables(&p_pums, &h_pums, &jd(&[5, 6]), &jd(&[0, 1])).unwrap();

        assert_eq!(h_freq.rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(p_freq.rows, vec![vec![2.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(h_freq.cat_ids, vec![0, 1]);
        assert_eq!(p_freq.cat_ids, vec![5, 6]);
    }

    #[test]
    fn test_orphan_person_is_an_input_error() {
        let h_pums = sample(vec![(10, 0)]);
        let p_pums = sample(vec![(99, 5)]);

        assert!(frequency_tables(&p_pums, &h_pums, &jd(&[5]), &jd(&[0])).is_err());
    }

    #[test]
    fn test_duplicate_serialno_is_an_input_error() {
        let h_pums = sample(vec![(10, 0), (10, 1)]);
        let p_pums = sample(vec![]);

        assert!(frequency_tables(&p_pums, &h_pums, &jd(&[5]), &jd(&[0, 1])).is_err());
    }

    #[test]
    fn test_unknown_household_category_is_an_input_error() {
        let h_pums = sample(vec![(10, 7)]);
        let p_pums = sample(vec![]);

        assert!(frequency_tables(&p_pums, &h_pums, &jd(&[5]), &jd(&[0])).is_err());
    }
}
